//! Canned generator — deterministic replies without network access.
//!
//! Used by tests and keyless dev runs. Echoes the last question line of
//! the prompt back in a fixed Korean sentence, mirroring the shape of a
//! real completion.

use async_trait::async_trait;

use youthdesk_core::error::GenerationError;
use youthdesk_core::Generator;

#[derive(Default)]
pub struct StubGenerator;

#[async_trait]
impl Generator for StubGenerator {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        // The current question is the last "Q: " line of the prompt.
        let question = prompt
            .lines()
            .rev()
            .find_map(|line| line.strip_prefix("Q: "))
            .unwrap_or(prompt);

        Ok(format!("\"{question}\"에 대한 안내입니다. (stub)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_the_current_question() {
        let generator = StubGenerator;
        let answer = generator
            .generate("Q: 이전 질문\nA: 이전 답변\n\nQ: 월세 지원\nA:")
            .await
            .unwrap();
        assert!(answer.contains("월세 지원"));
        assert!(!answer.contains("이전 질문"));
    }
}
