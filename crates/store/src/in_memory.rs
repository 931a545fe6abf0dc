//! In-memory backend — useful for testing and ephemeral dev sessions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use youthdesk_core::conversation::{Answer, GuestId, GuestIdentity, Question, QuestionId};
use youthdesk_core::error::StoreError;
use youthdesk_core::policy::PolicyRecord;
use youthdesk_core::store::{HistoryStore, PolicyCatalog};

/// An in-memory backend holding guests, the append-only question log,
/// answers, and the policy catalog. Questions are stored in insertion
/// order, which for an append-only log is creation order.
#[derive(Default)]
pub struct InMemoryStore {
    guests: Arc<RwLock<HashMap<GuestId, GuestIdentity>>>,
    questions: Arc<RwLock<Vec<Question>>>,
    answers: Arc<RwLock<HashMap<QuestionId, Answer>>>,
    policies: Arc<RwLock<Vec<PolicyRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the catalog, preserving the given order.
    pub async fn with_policies(self, records: Vec<PolicyRecord>) -> Self {
        *self.policies.write().await = records;
        self
    }
}

#[async_trait]
impl HistoryStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn resolve_guest(&self, token: Option<&str>) -> Result<GuestIdentity, StoreError> {
        match token {
            Some(token) => {
                let guests = self.guests.read().await;
                guests
                    .get(&GuestId::from(token))
                    .cloned()
                    .ok_or_else(|| StoreError::UnknownGuest(token.to_string()))
            }
            None => {
                let guest = GuestIdentity::new();
                self.guests
                    .write()
                    .await
                    .insert(guest.id.clone(), guest.clone());
                Ok(guest)
            }
        }
    }

    async fn recent_questions(
        &self,
        guest: &GuestId,
        limit: usize,
    ) -> Result<Vec<Question>, StoreError> {
        let questions = self.questions.read().await;
        Ok(questions
            .iter()
            .rev()
            .filter(|q| &q.guest_id == guest)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn answer_for(&self, question: &QuestionId) -> Result<Option<Answer>, StoreError> {
        Ok(self.answers.read().await.get(question).cloned())
    }

    async fn record_turn(
        &self,
        guest: &GuestId,
        question_text: &str,
        answer_text: &str,
    ) -> Result<Question, StoreError> {
        // Hold both write locks for the duration of the turn so no reader
        // observes a question without its answer.
        let mut questions = self.questions.write().await;
        let mut answers = self.answers.write().await;

        let question = Question::new(guest.clone(), question_text);
        answers.insert(
            question.id.clone(),
            Answer::new(question.id.clone(), answer_text),
        );
        questions.push(question.clone());
        Ok(question)
    }
}

#[async_trait]
impl PolicyCatalog for InMemoryStore {
    async fn records(&self) -> Result<Vec<PolicyRecord>, StoreError> {
        Ok(self.policies.read().await.clone())
    }

    async fn upsert_policy(&self, record: PolicyRecord) -> Result<(), StoreError> {
        let mut policies = self.policies.write().await;
        match policies.iter_mut().find(|p| p.id == record.id) {
            Some(existing) => *existing = record,
            None => policies.push(record),
        }
        Ok(())
    }
}
