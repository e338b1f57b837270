// src/errors.rs
use thiserror::Error;

use crate::models::ScopeId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DedupeError {
    /// A merge was requested for a group with no records.
    #[error("cannot merge an empty duplicate group")]
    EmptyGroup,
    /// A group handed to the manager holds records from another database.
    #[error("record {record_id} belongs to database {found}, expected database {expected}")]
    ScopeMismatch {
        record_id: i64,
        expected: ScopeId,
        found: ScopeId,
    },
    #[error("invalid configuration value for {key}: '{value}'")]
    InvalidConfig { key: String, value: String },
}
