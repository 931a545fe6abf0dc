//! Conversational context assembly for youthdesk.
//!
//! The ask path: resolve the guest, fetch recent answered history, render
//! the prompt, invoke the generator, and persist the turn only on success.

pub mod assembler;
pub mod prompt;

pub use assembler::{AskOutcome, ConversationAssembler};
pub use prompt::render_prompt;

/// User-facing message for an empty/absent question.
pub const EMPTY_QUESTION_MESSAGE: &str = "질문이 없습니다.";

/// Default number of recent question/answer pairs fed into the prompt.
pub const DEFAULT_HISTORY_WINDOW: usize = 3;
