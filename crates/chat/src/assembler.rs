//! The conversation assembler — orchestrates one ask turn.
//!
//! Ordering is deliberate and load-bearing:
//! 1. history is fetched *before* the new question is persisted, so the
//!    prompt never includes the question currently being answered;
//! 2. the turn is persisted only *after* generation succeeded, so failed
//!    turns leave no trace and cannot pollute future context.

use std::sync::Arc;
use tracing::{debug, info};

use youthdesk_core::conversation::QaPair;
use youthdesk_core::error::{Error, Result, StoreError};
use youthdesk_core::store::HistoryStore;
use youthdesk_core::{Generator, GuestIdentity};

use crate::prompt::render_prompt;
use crate::{DEFAULT_HISTORY_WINDOW, EMPTY_QUESTION_MESSAGE};

/// The result of a successful ask turn.
#[derive(Debug, Clone)]
pub struct AskOutcome {
    /// The guest token to bind into the caller's session for reuse.
    pub guest_token: String,
    /// The original question text, echoed back.
    pub question: String,
    /// The generated answer text.
    pub answer: String,
}

/// Assembles conversational context and sequences persistence around the
/// generation call.
pub struct ConversationAssembler {
    store: Arc<dyn HistoryStore>,
    generator: Arc<dyn Generator>,
    history_window: usize,
}

impl ConversationAssembler {
    pub fn new(store: Arc<dyn HistoryStore>, generator: Arc<dyn Generator>) -> Self {
        Self {
            store,
            generator,
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }

    /// Override the number of history pairs fed into the prompt.
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    /// Answer a question for the session identified by `session_token`.
    ///
    /// Fails with [`Error::Validation`] on empty question text (before any
    /// side effect) and propagates [`StoreError::UnknownGuest`] for a token
    /// that references no stored identity.
    pub async fn ask(
        &self,
        session_token: Option<&str>,
        question_text: &str,
    ) -> Result<AskOutcome> {
        if question_text.is_empty() {
            return Err(Error::Validation(EMPTY_QUESTION_MESSAGE.into()));
        }

        let guest = self.store.resolve_guest(session_token).await?;

        let history = self.answered_history(&guest).await?;
        let prompt = render_prompt(&history, question_text);
        debug!(
            guest = %guest.id,
            pairs = history.len(),
            prompt_len = prompt.len(),
            "Prompt assembled"
        );

        let answer_text = self.generator.generate(&prompt).await?;

        // Persist only now: a generation failure above returns before any
        // write, and the store makes question+answer one atomic turn.
        self.store
            .record_turn(&guest.id, question_text, &answer_text)
            .await?;

        info!(guest = %guest.id, answer_len = answer_text.len(), "Turn completed");

        Ok(AskOutcome {
            guest_token: guest.id.to_string(),
            question: question_text.to_string(),
            answer: answer_text,
        })
    }

    /// Recent completed pairs in chronological order. Questions whose
    /// answer is missing (generation failed or in flight) are silently
    /// excluded — they are "not yet answerable", not errors.
    async fn answered_history(
        &self,
        guest: &GuestIdentity,
    ) -> std::result::Result<Vec<QaPair>, StoreError> {
        let recent = self
            .store
            .recent_questions(&guest.id, self.history_window)
            .await?;

        let mut pairs = Vec::with_capacity(recent.len());
        for question in recent.into_iter().rev() {
            if let Some(answer) = self.store.answer_for(&question.id).await? {
                pairs.push(QaPair {
                    question: question.content,
                    answer: answer.content,
                });
            }
        }
        Ok(pairs)
    }
}
