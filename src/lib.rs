// src/lib.rs
pub mod clustering;
pub mod config;
pub mod consolidation;
pub mod errors;
pub mod manager;
pub mod matching;
pub mod models;
pub mod store;
pub mod utils;

pub use clustering::DuplicateGrouper;
pub use config::{GroupingStrategy, MatchingConfig};
pub use consolidation::merge_group;
pub use errors::DedupeError;
pub use manager::DuplicateManager;
pub use matching::EquivalenceRules;
pub use models::{DuplicateGroup, MatchRule, Record, RecordId, ScopeId};
pub use store::{MemoryRecordStore, PgRecordStore, RecordStore};

/// Duplicate groups of `records` under the default matching configuration.
pub fn find_duplicates(records: &[Record]) -> Vec<DuplicateGroup> {
    DuplicateGrouper::default().group(records)
}
