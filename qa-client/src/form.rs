//! View state of the question form.

use tracing::warn;

use crate::transport::AskTransport;

/// Shown in place of an answer when the server could not be reached.
pub const FALLBACK_ANSWER: &str = "Sorry, something went wrong!";

/// What happened to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank question; nothing was sent.
    Skipped,
    /// The server answered.
    Answered,
    /// The server replied with an error envelope.
    Rejected { error: Option<String> },
    /// Transport failure; the fallback answer is shown.
    Failed,
}

/// Question text, last answer and loading flag of the form.
#[derive(Debug, Default)]
pub struct AskForm {
    question: String,
    answer: String,
    loading: bool,
}

/// Clears the loading flag when dropped, whatever way submission ends.
struct LoadingGuard<'a>(&'a mut bool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

impl AskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// True while a submission is in flight; the submit control is disabled.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Sends the current question through `transport` and stores the reply.
    ///
    /// The form stays mutably borrowed until the reply arrives, so a second
    /// submission cannot start while `loading` is set. Transport errors never
    /// escape: they become [`FALLBACK_ANSWER`].
    pub async fn submit<T>(&mut self, transport: &T) -> SubmitOutcome
    where
        T: AskTransport + ?Sized,
    {
        let question = self.question.trim();
        if question.is_empty() {
            return SubmitOutcome::Skipped;
        }
        let question = question.to_string();

        self.answer.clear();
        self.loading = true;
        let _loading = LoadingGuard(&mut self.loading);

        match transport.ask(&question).await {
            Ok(reply) => {
                self.answer = reply.answer.unwrap_or_default();
                if reply.success {
                    SubmitOutcome::Answered
                } else {
                    SubmitOutcome::Rejected { error: reply.error }
                }
            }
            Err(err) => {
                warn!(error = %err, "ask request failed");
                self.answer = FALLBACK_ANSWER.to_string();
                SubmitOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use async_trait::async_trait;

    use super::*;
    use crate::transport::{AskReply, HttpAskTransport, TransportError};

    enum Behavior {
        Answer(&'static str),
        ServerError(&'static str),
        Hang,
    }

    struct StubTransport {
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl StubTransport {
        fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AskTransport for StubTransport {
        async fn ask(&self, question: &str) -> Result<AskReply, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Answer(prefix) => Ok(AskReply {
                    success: true,
                    answer: Some(format!("{prefix}{question}")),
                    error: None,
                }),
                Behavior::ServerError(msg) => Ok(AskReply {
                    success: false,
                    answer: None,
                    error: Some(msg.to_string()),
                }),
                Behavior::Hang => std::future::pending().await,
            }
        }
    }

    #[tokio::test]
    async fn blank_question_sends_nothing() {
        let transport = StubTransport::new(Behavior::Answer(""));
        let mut form = AskForm::new();
        form.set_question("   \n");

        assert_eq!(form.submit(&transport).await, SubmitOutcome::Skipped);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert!(!form.is_loading());
    }

    #[tokio::test]
    async fn answer_replaces_previous_and_clears_loading() {
        let transport = StubTransport::new(Behavior::Answer("re: "));
        let mut form = AskForm::new();
        form.answer = "old answer".into();
        form.set_question("  why?  ");

        assert_eq!(form.submit(&transport).await, SubmitOutcome::Answered);
        assert_eq!(form.answer(), "re: why?");
        assert_eq!(form.question(), "  why?  ");
        assert!(!form.is_loading());
    }

    #[tokio::test]
    async fn server_error_leaves_answer_empty() {
        let transport = StubTransport::new(Behavior::ServerError("Internal server error"));
        let mut form = AskForm::new();
        form.answer = "old answer".into();
        form.set_question("q");

        let outcome = form.submit(&transport).await;
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                error: Some("Internal server error".into())
            }
        );
        assert_eq!(form.answer(), "");
        assert!(!form.is_loading());
    }

    #[tokio::test]
    async fn unreachable_server_shows_fallback() {
        // Port 9 (discard) is closed on test hosts.
        let transport =
            HttpAskTransport::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let mut form = AskForm::new();
        form.set_question("anyone?");

        assert_eq!(form.submit(&transport).await, SubmitOutcome::Failed);
        assert_eq!(form.answer(), FALLBACK_ANSWER);
        assert!(!form.is_loading());
    }

    #[tokio::test]
    async fn cancelled_submit_clears_loading() {
        let transport = StubTransport::new(Behavior::Hang);
        let mut form = AskForm::new();
        form.set_question("q");

        let res = tokio::time::timeout(Duration::from_millis(50), form.submit(&transport)).await;
        assert!(res.is_err());
        assert!(!form.is_loading());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }
}
