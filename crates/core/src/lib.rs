//! # Youthdesk Core
//!
//! Domain types, traits, and error definitions for the youthdesk
//! youth-policy information service. This crate has **zero framework
//! dependencies** — it defines the domain model that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator is defined as a trait here. Implementations live in
//! their respective crates. This enables:
//! - Swapping backends via configuration (in-memory vs. SQLite)
//! - Easy testing with stub stores and generators
//! - Clean dependency graph (all crates depend inward on core)

pub mod conversation;
pub mod error;
pub mod generator;
pub mod policy;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use conversation::{Answer, GuestId, GuestIdentity, Question, QuestionId};
pub use error::{Error, GenerationError, Result, StoreError};
pub use generator::Generator;
pub use policy::{FilterCriteria, MaritalStatus, PolicyRecord, NO_RESTRICTION};
pub use store::{HistoryStore, PolicyCatalog};
