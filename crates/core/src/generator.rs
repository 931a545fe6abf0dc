//! Generator trait — the abstraction over the text generation backend.
//!
//! The conversation assembler hands a fully rendered prompt to the
//! generator and gets answer text back. The call is opaque and
//! synchronous from the caller's point of view: one prompt in, one
//! completion out, or a [`GenerationError`].
//!
//! Implementations: OpenAI-compatible HTTP endpoints, canned stub.

use async_trait::async_trait;

use crate::error::GenerationError;

#[async_trait]
pub trait Generator: Send + Sync {
    /// A human-readable name for this generator (e.g. "openai_compat").
    fn name(&self) -> &str;

    /// Generate answer text for a rendered prompt.
    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError>;
}
