//! Policy catalog domain types.
//!
//! `PolicyRecord` mirrors the externally-ingested youth-policy catalog:
//! free-text Korean categorical fields with a "no restriction" sentinel,
//! and nullable/zero age bounds meaning "unbounded".

use serde::{Deserialize, Serialize};

/// Tag value meaning a facet imposes no constraint.
///
/// Appears both in catalog records ("이 정책은 제한없음") and in request
/// facet lists, where its presence disables that facet entirely.
pub const NO_RESTRICTION: &str = "제한없음";

/// A single youth-policy catalog record.
///
/// Read-only to this service; lifecycle is owned by an external ingestion
/// process. All categorical fields are free-text, comma/tag-like Korean
/// strings, matched by case-insensitive substring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: String,
    /// Free-text locale string, e.g. "서울특별시".
    #[serde(default)]
    pub region: String,
    /// Free-text categorical string: "미혼", "기혼", "제한없음", …
    #[serde(default)]
    pub marital_status: String,
    /// Lower age bound. `None` or `Some(0)` both mean "no lower bound".
    #[serde(default)]
    pub age_min: Option<u32>,
    /// Upper age bound. `None` or `Some(0)` both mean "no upper bound".
    #[serde(default)]
    pub age_max: Option<u32>,
    #[serde(default)]
    pub education_requirement: String,
    #[serde(default)]
    pub major_requirement: String,
    #[serde(default)]
    pub employment_status: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub application_period: String,
    #[serde(default)]
    pub url: String,
}

/// Marital-status facet category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaritalStatus {
    Single,
    Married,
}

impl MaritalStatus {
    /// Parse the wire category. Unknown or empty categories impose no
    /// constraint, so they map to `None` rather than an error.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single" => Some(Self::Single),
            "married" => Some(Self::Married),
            _ => None,
        }
    }
}

/// Request-scoped search criteria. Every field is optional; an empty
/// criteria object matches the entire catalog (bounded by the result cap).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Region code (e.g. "seoul") or a verbatim Korean region string.
    #[serde(default)]
    pub region: String,

    #[serde(default)]
    pub marital_status: Option<MaritalStatus>,

    #[serde(default)]
    pub age: Option<u32>,

    #[serde(default)]
    pub education: Vec<String>,

    #[serde(default)]
    pub major: Vec<String>,

    #[serde(default)]
    pub employment_status: Vec<String>,

    #[serde(default)]
    pub specialization: Vec<String>,

    /// Free-text query matched against title, description, and keywords.
    #[serde(default)]
    pub query: String,

    /// Accepted but not consulted by any predicate.
    #[serde(default)]
    pub income_min: Option<u64>,

    /// Accepted but not consulted by any predicate.
    #[serde(default)]
    pub income_max: Option<u64>,

    /// Accepted but not consulted by any predicate.
    #[serde(default)]
    pub exclude_closed: bool,
}

impl FilterCriteria {
    /// True when no facet imposes any constraint.
    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
            && self.marital_status.is_none()
            && self.age.is_none()
            && self.education.is_empty()
            && self.major.is_empty()
            && self.employment_status.is_empty()
            && self.specialization.is_empty()
            && self.query.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marital_status_parses_known_categories() {
        assert_eq!(MaritalStatus::parse("single"), Some(MaritalStatus::Single));
        assert_eq!(MaritalStatus::parse("married"), Some(MaritalStatus::Married));
        assert_eq!(MaritalStatus::parse(""), None);
        assert_eq!(MaritalStatus::parse("divorced"), None);
    }

    #[test]
    fn default_criteria_is_empty() {
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert!(!criteria.exclude_closed);
    }

    #[test]
    fn inert_fields_do_not_affect_emptiness() {
        let criteria = FilterCriteria {
            income_min: Some(0),
            income_max: Some(50_000_000),
            exclude_closed: true,
            ..Default::default()
        };
        assert!(criteria.is_empty());
    }

    #[test]
    fn record_deserializes_with_missing_optionals() {
        let record: PolicyRecord = serde_json::from_str(
            r#"{"id":"P-001","title":"청년 주거 지원"}"#,
        )
        .unwrap();
        assert_eq!(record.age_min, None);
        assert_eq!(record.description, "");
    }
}
