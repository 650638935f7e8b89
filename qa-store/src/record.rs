//! Core data models used by the library.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// Store-assigned identifier. Supabase tables commonly use either an
/// identity `int8` or a `uuid` primary key; both are accepted.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExchangeId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeId::Int(v) => write!(f, "{v}"),
            ExchangeId::Text(v) => f.write_str(v),
        }
    }
}

/// One persisted question/answer pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub id: ExchangeId,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new [`Exchange`]; the store assigns the id.
///
/// Can only be built through [`NewExchange::new`], which trims the question
/// and refuses an empty one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewExchange {
    question: String,
    answer: String,
    created_at: DateTime<Utc>,
}

impl NewExchange {
    /// # Errors
    /// Returns [`StoreError::InvalidRecord`] if `question` is blank.
    pub fn new(
        question: &str,
        answer: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(StoreError::InvalidRecord("question must not be empty"));
        }
        Ok(Self {
            question: question.to_string(),
            answer: answer.into(),
            created_at,
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Materializes the exchange once the store has assigned an id.
    pub(crate) fn into_exchange(self, id: ExchangeId) -> Exchange {
        Exchange {
            id,
            question: self.question,
            answer: self.answer,
            created_at: self.created_at,
        }
    }
}
