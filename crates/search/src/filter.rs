//! The filter engine — multi-criteria predicate composition.
//!
//! A `FilterCriteria` compiles into a list of independent predicate
//! functions; a record matches when ALL of them hold. Each facet builder
//! is a plain function, so composition is inspectable and testable
//! without a storage layer. Empty/absent criteria contribute no
//! predicate at all.

use std::sync::Arc;
use tracing::debug;

use youthdesk_core::error::StoreError;
use youthdesk_core::policy::{FilterCriteria, MaritalStatus, PolicyRecord, NO_RESTRICTION};
use youthdesk_core::store::PolicyCatalog;

use crate::DEFAULT_RESULT_CAP;

/// One independent filter dimension, applied to a candidate record.
pub type Predicate = Box<dyn Fn(&PolicyRecord) -> bool + Send + Sync>;

/// Caller-facing region codes mapped to the Korean names stored in the
/// catalog. Codes outside the table pass through verbatim.
const REGION_MAP: [(&str, &str); 9] = [
    ("seoul", "서울"),
    ("busan", "부산"),
    ("daegu", "대구"),
    ("incheon", "인천"),
    ("gwangju", "광주"),
    ("daejeon", "대전"),
    ("ulsan", "울산"),
    ("sejong", "세종"),
    ("gyeonggi", "경기"),
];

fn map_region(code: &str) -> &str {
    REGION_MAP
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Free text: case-insensitive substring of title OR description OR keywords.
fn text_predicate(query: &str) -> Predicate {
    let needle = query.to_lowercase();
    Box::new(move |record| {
        contains_ci(&record.title, &needle)
            || contains_ci(&record.description, &needle)
            || contains_ci(&record.keywords, &needle)
    })
}

/// Region: match the mapped local name as a substring of the record's
/// region field ("seoul" matches "서울특별시").
fn region_predicate(code: &str) -> Predicate {
    let needle = map_region(code).to_lowercase();
    Box::new(move |record| contains_ci(&record.region, &needle))
}

/// Marital status: the requested category or the no-restriction sentinel.
fn marital_predicate(status: MaritalStatus) -> Predicate {
    let category = match status {
        MaritalStatus::Single => "미혼",
        MaritalStatus::Married => "기혼",
    };
    Box::new(move |record| {
        record.marital_status.contains(category)
            || record.marital_status.contains(NO_RESTRICTION)
    })
}

/// Age: within [age_min, age_max], where a missing or zero bound is open.
fn age_predicate(age: u32) -> Predicate {
    Box::new(move |record| {
        let lower_ok = match record.age_min {
            None | Some(0) => true,
            Some(min) => min <= age,
        };
        let upper_ok = match record.age_max {
            None | Some(0) => true,
            Some(max) => max >= age,
        };
        lower_ok && upper_ok
    })
}

/// Tag facet: OR over the listed values against one record field.
///
/// Returns `None` (no constraint) when the list is empty or contains the
/// no-restriction sentinel — the sentinel disables the whole facet even
/// when other values sit alongside it.
fn tag_predicate(
    values: &[String],
    field: fn(&PolicyRecord) -> &str,
) -> Option<Predicate> {
    if values.is_empty() || values.iter().any(|v| v == NO_RESTRICTION) {
        return None;
    }
    let needles: Vec<String> = values.iter().map(|v| v.to_lowercase()).collect();
    Some(Box::new(move |record| {
        needles
            .iter()
            .any(|needle| contains_ci(field(record), needle))
    }))
}

/// Compile criteria into the predicate list. Facets combine with AND;
/// values within a tag facet combine with OR. The `income_min`,
/// `income_max`, and `exclude_closed` fields are accepted but
/// intentionally contribute nothing.
pub fn compile(criteria: &FilterCriteria) -> Vec<Predicate> {
    let mut predicates = Vec::new();

    if !criteria.query.is_empty() {
        predicates.push(text_predicate(&criteria.query));
    }
    if !criteria.region.is_empty() {
        predicates.push(region_predicate(&criteria.region));
    }
    if let Some(status) = criteria.marital_status {
        predicates.push(marital_predicate(status));
    }
    if let Some(age) = criteria.age {
        predicates.push(age_predicate(age));
    }
    if let Some(p) = tag_predicate(&criteria.education, |r| &r.education_requirement) {
        predicates.push(p);
    }
    if let Some(p) = tag_predicate(&criteria.major, |r| &r.major_requirement) {
        predicates.push(p);
    }
    if let Some(p) = tag_predicate(&criteria.employment_status, |r| &r.employment_status) {
        predicates.push(p);
    }
    if let Some(p) = tag_predicate(&criteria.specialization, |r| &r.specialization) {
        predicates.push(p);
    }

    predicates
}

/// Executes compiled criteria against a policy catalog.
pub struct FilterEngine {
    catalog: Arc<dyn PolicyCatalog>,
    result_cap: usize,
}

impl FilterEngine {
    pub fn new(catalog: Arc<dyn PolicyCatalog>) -> Self {
        Self {
            catalog,
            result_cap: DEFAULT_RESULT_CAP,
        }
    }

    /// Override the result cap.
    pub fn with_result_cap(mut self, cap: usize) -> Self {
        self.result_cap = cap;
        self
    }

    /// Records matching ALL compiled predicates, in catalog order,
    /// truncated to the result cap.
    pub async fn search(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<Vec<PolicyRecord>, StoreError> {
        let predicates = compile(criteria);
        let records = self.catalog.records().await?;
        let total = records.len();

        let matches: Vec<PolicyRecord> = records
            .into_iter()
            .filter(|record| predicates.iter().all(|p| p(record)))
            .take(self.result_cap)
            .collect();

        debug!(
            predicates = predicates.len(),
            scanned = total,
            matched = matches.len(),
            "Policy search executed"
        );
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use youthdesk_store::InMemoryStore;

    fn record(id: &str) -> PolicyRecord {
        PolicyRecord {
            id: id.into(),
            title: String::new(),
            description: String::new(),
            keywords: String::new(),
            region: String::new(),
            marital_status: String::new(),
            age_min: None,
            age_max: None,
            education_requirement: String::new(),
            major_requirement: String::new(),
            employment_status: String::new(),
            specialization: String::new(),
            application_period: String::new(),
            url: String::new(),
        }
    }

    fn matches(criteria: &FilterCriteria, record: &PolicyRecord) -> bool {
        compile(criteria).iter().all(|p| p(record))
    }

    #[test]
    fn empty_criteria_compile_to_no_predicates() {
        assert!(compile(&FilterCriteria::default()).is_empty());
    }

    #[test]
    fn text_matches_title_description_or_keywords() {
        let criteria = FilterCriteria {
            query: "월세".into(),
            ..Default::default()
        };

        let mut by_title = record("a");
        by_title.title = "청년 월세 지원".into();
        let mut by_keywords = record("b");
        by_keywords.keywords = "주거,월세,지원".into();
        let unrelated = record("c");

        assert!(matches(&criteria, &by_title));
        assert!(matches(&criteria, &by_keywords));
        assert!(!matches(&criteria, &unrelated));
    }

    #[test]
    fn region_code_maps_to_korean_substring() {
        let criteria = FilterCriteria {
            region: "seoul".into(),
            ..Default::default()
        };

        let mut seoul = record("a");
        seoul.region = "서울특별시".into();
        let mut busan = record("b");
        busan.region = "부산광역시".into();

        assert!(matches(&criteria, &seoul));
        assert!(!matches(&criteria, &busan));
    }

    #[test]
    fn unmapped_region_code_is_used_verbatim() {
        let criteria = FilterCriteria {
            region: "제주".into(),
            ..Default::default()
        };

        let mut jeju = record("a");
        jeju.region = "제주특별자치도".into();
        assert!(matches(&criteria, &jeju));
    }

    #[test]
    fn single_matches_single_or_no_restriction() {
        let criteria = FilterCriteria {
            marital_status: Some(MaritalStatus::Single),
            ..Default::default()
        };

        let mut single = record("a");
        single.marital_status = "미혼".into();
        let mut married = record("b");
        married.marital_status = "기혼".into();
        let mut open = record("c");
        open.marital_status = "제한없음".into();

        assert!(matches(&criteria, &single));
        assert!(!matches(&criteria, &married));
        assert!(matches(&criteria, &open));
    }

    #[test]
    fn age_bounds_honor_zero_and_null_sentinels() {
        let criteria = FilterCriteria {
            age: Some(25),
            ..Default::default()
        };

        let mut unbounded = record("a");
        unbounded.age_min = Some(0);
        unbounded.age_max = Some(0);
        assert!(matches(&criteria, &unbounded));

        let nulls = record("b");
        assert!(matches(&criteria, &nulls));

        let mut bounded = record("c");
        bounded.age_min = Some(20);
        bounded.age_max = Some(30);
        assert!(matches(&criteria, &bounded));

        let age_19 = FilterCriteria {
            age: Some(19),
            ..Default::default()
        };
        let age_31 = FilterCriteria {
            age: Some(31),
            ..Default::default()
        };
        assert!(!matches(&age_19, &bounded));
        assert!(!matches(&age_31, &bounded));
    }

    #[test]
    fn tag_facet_is_or_within_and_across() {
        let criteria = FilterCriteria {
            education: vec!["대학 재학".into(), "대학 졸업".into()],
            employment_status: vec!["미취업".into()],
            ..Default::default()
        };

        let mut both = record("a");
        both.education_requirement = "대학 졸업 이상".into();
        both.employment_status = "미취업자".into();
        assert!(matches(&criteria, &both));

        // Education matches but employment does not → AND across facets fails.
        let mut education_only = record("b");
        education_only.education_requirement = "대학 재학".into();
        education_only.employment_status = "재직자".into();
        assert!(!matches(&criteria, &education_only));
    }

    #[test]
    fn no_restriction_sentinel_disables_the_whole_facet() {
        let criteria = FilterCriteria {
            major: vec!["공학".into(), NO_RESTRICTION.into()],
            ..Default::default()
        };

        // 인문계열 record would fail the 공학 constraint, but the sentinel
        // in the list skips the facet entirely.
        let mut humanities = record("a");
        humanities.major_requirement = "인문계열".into();
        assert!(matches(&criteria, &humanities));
    }

    #[tokio::test]
    async fn engine_truncates_at_the_result_cap() {
        let records: Vec<PolicyRecord> = (0..80).map(|i| record(&format!("P-{i}"))).collect();
        let store = Arc::new(InMemoryStore::new().with_policies(records).await);
        let engine = FilterEngine::new(store);

        let results = engine.search(&FilterCriteria::default()).await.unwrap();
        assert_eq!(results.len(), 50);
        assert_eq!(results[0].id, "P-0"); // catalog order preserved
    }

    #[tokio::test]
    async fn marital_filter_end_to_end() {
        let mut single = record("P-single");
        single.marital_status = "미혼".into();
        let mut married = record("P-married");
        married.marital_status = "기혼".into();

        let store = Arc::new(
            InMemoryStore::new()
                .with_policies(vec![single, married])
                .await,
        );
        let engine = FilterEngine::new(store);

        let criteria = FilterCriteria {
            marital_status: Some(MaritalStatus::Single),
            ..Default::default()
        };
        let results = engine.search(&criteria).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "P-single");
    }

    #[tokio::test]
    async fn inert_fields_have_no_filtering_effect() {
        let mut open = record("P-1");
        open.application_period = "2024-01-01 ~ 2024-02-01".into();

        let store = Arc::new(InMemoryStore::new().with_policies(vec![open]).await);
        let engine = FilterEngine::new(store);

        let criteria = FilterCriteria {
            exclude_closed: true,
            income_min: Some(0),
            income_max: Some(10_000_000),
            ..Default::default()
        };
        let results = engine.search(&criteria).await.unwrap();
        assert_eq!(results.len(), 1);
    }
}
