//! Search payload parsing — the explicit two-stage parse.
//!
//! Clients send either a JSON body or a form-encoded fallback. Stage one
//! tries JSON; on a JSON parse failure stage two reads form fields. Both
//! stages produce a typed `FilterCriteria` or a typed `PayloadError` —
//! no exception-as-control-flow.
//!
//! The JSON stage is lenient the way the original wire format was loose:
//! `age` may arrive as a number or a numeric string (anything else is
//! treated as absent, not an error), tag facets may arrive as something
//! other than a list (imposing no constraint), and the inert
//! `income_min`/`income_max`/`exclude_closed` fields are accepted in any
//! coercible shape.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use youthdesk_core::policy::{FilterCriteria, MaritalStatus};

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Body is neither valid JSON nor form data: {0}")]
    Unparseable(String),
}

/// Lenient wire shape for the JSON stage.
#[derive(Default, Deserialize)]
struct SearchPayload {
    #[serde(default)]
    region: String,
    #[serde(default)]
    marital_status: String,
    #[serde(default)]
    age: Option<Value>,
    #[serde(default)]
    income_min: Option<Value>,
    #[serde(default)]
    income_max: Option<Value>,
    #[serde(default)]
    education: Option<Value>,
    #[serde(default)]
    major: Option<Value>,
    #[serde(default)]
    employment_status: Option<Value>,
    #[serde(default)]
    specialization: Option<Value>,
    #[serde(default)]
    query: String,
    #[serde(default)]
    exclude_closed: Option<Value>,
}

/// Parse an ask body into the question text: JSON first, form fallback.
/// An absent field yields an empty string; validation of emptiness is the
/// assembler's job, not the parser's.
pub fn parse_ask_payload(body: &[u8]) -> Result<String, PayloadError> {
    #[derive(Default, Deserialize)]
    struct AskPayload {
        #[serde(default)]
        question: String,
    }

    match serde_json::from_slice::<AskPayload>(body) {
        Ok(payload) => Ok(payload.question),
        Err(json_err) => {
            let pairs: Vec<(String, String)> =
                serde_urlencoded::from_bytes(body).map_err(|form_err| {
                    PayloadError::Unparseable(format!("json: {json_err}; form: {form_err}"))
                })?;
            Ok(pairs
                .into_iter()
                .find(|(key, _)| key == "question")
                .map(|(_, value)| value)
                .unwrap_or_default())
        }
    }
}

/// Parse a request body into criteria: JSON first, form fallback.
pub fn parse_search_payload(body: &[u8]) -> Result<FilterCriteria, PayloadError> {
    match serde_json::from_slice::<SearchPayload>(body) {
        Ok(payload) => Ok(payload.into_criteria()),
        Err(json_err) => parse_form(body).map_err(|form_err| {
            PayloadError::Unparseable(format!("json: {json_err}; form: {form_err}"))
        }),
    }
}

impl SearchPayload {
    fn into_criteria(self) -> FilterCriteria {
        FilterCriteria {
            region: self.region,
            marital_status: MaritalStatus::parse(&self.marital_status),
            age: self.age.as_ref().and_then(coerce_age),
            education: coerce_tags(self.education),
            major: coerce_tags(self.major),
            employment_status: coerce_tags(self.employment_status),
            specialization: coerce_tags(self.specialization),
            query: self.query,
            income_min: self.income_min.as_ref().and_then(coerce_u64),
            income_max: self.income_max.as_ref().and_then(coerce_u64),
            exclude_closed: self.exclude_closed.as_ref().map(coerce_bool).unwrap_or(false),
        }
    }
}

/// Number or numeric string; anything else is absent.
fn coerce_age(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true" || s == "1",
        _ => false,
    }
}

/// Only an actual list of strings constrains the facet; any other shape
/// imposes nothing.
fn coerce_tags(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Stage two: form-encoded fields. Tag facets come as repeated keys.
fn parse_form(body: &[u8]) -> Result<FilterCriteria, serde_urlencoded::de::Error> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;

    let mut criteria = FilterCriteria::default();
    for (key, value) in pairs {
        match key.as_str() {
            "region" => criteria.region = value,
            "marital_status" => criteria.marital_status = MaritalStatus::parse(&value),
            "age" => criteria.age = value.trim().parse().ok(),
            "income_min" => criteria.income_min = value.trim().parse().ok(),
            "income_max" => criteria.income_max = value.trim().parse().ok(),
            "education" => criteria.education.push(value),
            "major" => criteria.major.push(value),
            "employment_status" => criteria.employment_status.push(value),
            "specialization" => criteria.specialization.push(value),
            "query" => criteria.query = value,
            "exclude_closed" => criteria.exclude_closed = value == "true" || value == "1",
            _ => {} // unknown fields are ignored, as the original did
        }
    }
    Ok(criteria)
}
