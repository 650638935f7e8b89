//! Terminal client for the Q&A server: a question form plus the HTTP
//! transport it submits through.

pub mod form;
pub mod transport;

pub use form::{AskForm, FALLBACK_ANSWER, SubmitOutcome};
pub use transport::{AskReply, AskTransport, HttpAskTransport, TransportError};
