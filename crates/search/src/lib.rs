//! Faceted policy search for youthdesk.
//!
//! `filter` compiles a `FilterCriteria` into a list of independent
//! predicates (all must hold); `project` maps matches into the bounded,
//! truncated response shape.

pub mod filter;
pub mod project;

pub use filter::{compile, FilterEngine};
pub use project::{PolicySummary, ResultProjector};

/// Default maximum number of records returned per search.
pub const DEFAULT_RESULT_CAP: usize = 50;

/// Default description truncation length (characters) in projections.
pub const DEFAULT_SUMMARY_CHARS: usize = 100;
