//! Prompt rendering — the exact wire format handed to the generator.
//!
//! Each completed pair becomes the literal lines `Q: …\nA: …\n\n`, in
//! chronological order, followed by `Q: <new question>\nA:` with no
//! trailing newline. The generator continues the final `A:`.

use youthdesk_core::conversation::QaPair;

/// Render ordered history pairs plus the new question into a prompt.
pub fn render_prompt(pairs: &[QaPair], question: &str) -> String {
    let mut prompt = String::new();
    for pair in pairs {
        prompt.push_str(&format!("Q: {}\n", pair.question));
        prompt.push_str(&format!("A: {}\n\n", pair.answer));
    }
    prompt.push_str(&format!("Q: {question}\nA:"));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(q: &str, a: &str) -> QaPair {
        QaPair {
            question: q.into(),
            answer: a.into(),
        }
    }

    #[test]
    fn single_pair_renders_exact_format() {
        let prompt = render_prompt(&[pair("Q1", "A1")], "Q2");
        assert_eq!(prompt, "Q: Q1\nA: A1\n\nQ: Q2\nA:");
    }

    #[test]
    fn no_history_renders_bare_question() {
        let prompt = render_prompt(&[], "월세 지원 알려줘");
        assert_eq!(prompt, "Q: 월세 지원 알려줘\nA:");
    }

    #[test]
    fn pairs_stay_in_given_order() {
        let prompt = render_prompt(&[pair("첫째", "하나"), pair("둘째", "둘")], "셋째");
        assert_eq!(
            prompt,
            "Q: 첫째\nA: 하나\n\nQ: 둘째\nA: 둘\n\nQ: 셋째\nA:"
        );
    }
}
