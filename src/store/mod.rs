// src/store/mod.rs
//! Persistence for imported records. The matching code never touches a store
//! directly; the manager reads a snapshot, runs the pure passes and writes
//! the outcome back through this trait.

pub mod memory;
pub mod postgres;

use anyhow::Result;
use std::future::Future;

use crate::models::{NewRecord, Record, RecordId, ScopeId};

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;

pub trait RecordStore: Send + Sync {
    /// Consistent snapshot of one database, ordered by ascending id.
    fn list_records(&self, scope: ScopeId) -> impl Future<Output = Result<Vec<Record>>> + Send;

    /// Inserts in order and returns the stored records with their new ids.
    fn insert_records(
        &self,
        scope: ScopeId,
        records: Vec<NewRecord>,
    ) -> impl Future<Output = Result<Vec<Record>>> + Send;

    /// Deletes `remove` and inserts `insert` as one all-or-nothing step.
    /// Fails without changing anything if any id in `remove` is not stored
    /// in `scope`, so a retried merge cannot bring deleted duplicates back.
    fn replace_records(
        &self,
        scope: ScopeId,
        remove: &[RecordId],
        insert: Vec<NewRecord>,
    ) -> impl Future<Output = Result<Vec<Record>>> + Send;

    /// Deletes whichever of `ids` exist in `scope`; returns how many did.
    fn delete_records(
        &self,
        scope: ScopeId,
        ids: &[RecordId],
    ) -> impl Future<Output = Result<usize>> + Send;

    fn clear_scope(&self, scope: ScopeId) -> impl Future<Output = Result<usize>> + Send;
}
