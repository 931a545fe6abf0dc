//! Storage traits — the seams between the service core and persistence.
//!
//! `HistoryStore` owns guest identities and the append-only question/answer
//! log. `PolicyCatalog` is the read-only, externally-populated policy
//! collection. Implementations: SQLite (production) and in-memory
//! (tests, ephemeral dev runs).

use async_trait::async_trait;

use crate::conversation::{Answer, GuestId, GuestIdentity, Question, QuestionId};
use crate::error::StoreError;
use crate::policy::PolicyRecord;

/// Guest identity and conversation history persistence.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// The backend name (e.g. "sqlite", "in_memory").
    fn name(&self) -> &str;

    /// Resolve a guest under a get-or-create contract.
    ///
    /// - `None`: first contact — create a fresh identity and return it.
    ///   Two racing tokenless requests may create two distinct identities;
    ///   each caller still receives exactly one token to reuse.
    /// - `Some(token)`: strict lookup. A token referencing no stored
    ///   identity fails with [`StoreError::UnknownGuest`] — recreating it
    ///   silently would orphan the guest's prior history.
    async fn resolve_guest(
        &self,
        token: Option<&str>,
    ) -> std::result::Result<GuestIdentity, StoreError>;

    /// Up to `limit` most recent questions for a guest, ordered by
    /// creation time descending.
    async fn recent_questions(
        &self,
        guest: &GuestId,
        limit: usize,
    ) -> std::result::Result<Vec<Question>, StoreError>;

    /// The answer paired with a question, if generation has completed.
    async fn answer_for(
        &self,
        question: &QuestionId,
    ) -> std::result::Result<Option<Answer>, StoreError>;

    /// Persist a completed exchange: the question, then its answer, as a
    /// single atomic write. Called only after generation succeeded, so a
    /// failed turn leaves no trace and cannot pollute future context.
    async fn record_turn(
        &self,
        guest: &GuestId,
        question_text: &str,
        answer_text: &str,
    ) -> std::result::Result<Question, StoreError>;
}

/// Read access to the policy catalog.
#[async_trait]
pub trait PolicyCatalog: Send + Sync {
    /// All records in storage order. No secondary sort is defined; result
    /// ordering downstream is whatever the backend returns.
    async fn records(&self) -> std::result::Result<Vec<PolicyRecord>, StoreError>;

    /// Insert or replace a record. Used by the seeding CLI; the catalog's
    /// real lifecycle is owned by an external ingestion process.
    async fn upsert_policy(&self, record: PolicyRecord) -> std::result::Result<(), StoreError>;
}
