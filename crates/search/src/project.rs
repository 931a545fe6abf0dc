//! Result projection — the bounded, truncated response shape.
//!
//! Matched records map to `PolicySummary`; descriptions longer than the
//! summary length are cut at a character boundary (the catalog is Korean
//! text, so byte slicing would split codepoints) and suffixed with a
//! literal ellipsis.

use serde::{Deserialize, Serialize};

use youthdesk_core::policy::PolicyRecord;

use crate::DEFAULT_SUMMARY_CHARS;

/// The projected search result entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub region: String,
    pub period: String,
    pub url: String,
}

/// Maps matched records into summaries.
pub struct ResultProjector {
    summary_chars: usize,
}

impl ResultProjector {
    pub fn new() -> Self {
        Self {
            summary_chars: DEFAULT_SUMMARY_CHARS,
        }
    }

    /// Override the description truncation length.
    pub fn with_summary_chars(mut self, chars: usize) -> Self {
        self.summary_chars = chars;
        self
    }

    pub fn project(&self, records: &[PolicyRecord]) -> Vec<PolicySummary> {
        records.iter().map(|r| self.summarize(r)).collect()
    }

    fn summarize(&self, record: &PolicyRecord) -> PolicySummary {
        PolicySummary {
            id: record.id.clone(),
            title: record.title.clone(),
            description: truncate_description(&record.description, self.summary_chars),
            region: record.region.clone(),
            period: record.application_period.clone(),
            url: record.url.clone(),
        }
    }
}

impl Default for ResultProjector {
    fn default() -> Self {
        Self::new()
    }
}

/// First `max_chars` characters plus `"..."` when the text has content;
/// empty descriptions stay empty, short ones pass through unchanged.
fn truncate_description(text: &str, max_chars: usize) -> String {
    if text.is_empty() {
        return String::new();
    }
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_description(description: &str) -> PolicyRecord {
        PolicyRecord {
            id: "P-1".into(),
            title: "청년 정책".into(),
            description: description.into(),
            keywords: String::new(),
            region: "서울특별시".into(),
            marital_status: String::new(),
            age_min: None,
            age_max: None,
            education_requirement: String::new(),
            major_requirement: String::new(),
            employment_status: String::new(),
            specialization: String::new(),
            application_period: "상시".into(),
            url: "https://example.org".into(),
        }
    }

    #[test]
    fn long_description_gets_ellipsis() {
        let long = "가".repeat(150);
        let projector = ResultProjector::new();
        let summary = projector.project(&[record_with_description(&long)]);

        let expected = format!("{}...", "가".repeat(100));
        assert_eq!(summary[0].description, expected);
    }

    #[test]
    fn short_description_passes_through() {
        let projector = ResultProjector::new();
        let summary = projector.project(&[record_with_description("짧은 설명")]);
        assert_eq!(summary[0].description, "짧은 설명");
    }

    #[test]
    fn empty_description_stays_empty() {
        let projector = ResultProjector::new();
        let summary = projector.project(&[record_with_description("")]);
        assert_eq!(summary[0].description, "");
    }

    #[test]
    fn exactly_at_the_limit_is_not_truncated() {
        let exact = "나".repeat(100);
        let projector = ResultProjector::new();
        let summary = projector.project(&[record_with_description(&exact)]);
        assert_eq!(summary[0].description, exact);
    }

    #[test]
    fn summary_carries_the_wire_fields() {
        let projector = ResultProjector::new();
        let summary = projector.project(&[record_with_description("설명")]);
        assert_eq!(summary[0].id, "P-1");
        assert_eq!(summary[0].region, "서울특별시");
        assert_eq!(summary[0].period, "상시");
        assert_eq!(summary[0].url, "https://example.org");
    }
}
