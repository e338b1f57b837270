pub mod matching;
pub mod record;
pub mod stats_models;

pub use matching::{DuplicateGroup, MatchRule};
pub use record::{field, Fields, NewRecord, Record, RecordId, ScopeId};
pub use stats_models::{DedupeStats, ImportSummary};
