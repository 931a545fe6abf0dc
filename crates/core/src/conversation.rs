//! Guest identity and conversation domain types.
//!
//! These are the value objects that flow through the ask path:
//! a visitor resolves to a `GuestIdentity`, asks a `Question`, and the
//! generator's reply is recorded as the question's `Answer`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique token identifying an anonymous visitor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuestId(pub String);

impl GuestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for GuestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GuestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An anonymous, session-bound visitor.
///
/// Created lazily on first contact; no mutable fields beyond the
/// creation timestamp. There is no authentication — whoever presents
/// the token is the guest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestIdentity {
    pub id: GuestId,
    pub created_at: DateTime<Utc>,
}

impl GuestIdentity {
    pub fn new() -> Self {
        Self {
            id: GuestId::new(),
            created_at: Utc::now(),
        }
    }
}

impl Default for GuestIdentity {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for QuestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A question asked by a guest. Immutable once created; belongs to
/// exactly one `GuestIdentity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub guest_id: GuestId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn new(guest_id: GuestId, content: impl Into<String>) -> Self {
        Self {
            id: QuestionId::new(),
            guest_id,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// The generated reply to a question. 0-or-1 per question; created only
/// after the question exists. A question without an answer is valid
/// (generation may have failed or be in flight) and is simply skipped
/// by history retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: QuestionId,
    pub content: String,
}

impl Answer {
    pub fn new(question_id: QuestionId, content: impl Into<String>) -> Self {
        Self {
            question_id,
            content: content.into(),
        }
    }
}

/// A completed question/answer exchange, ready for prompt assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}
