// src/store/memory.rs
use anyhow::{bail, Result};
use log::debug;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::models::{NewRecord, Record, RecordId, ScopeId};
use crate::store::RecordStore;

#[derive(Debug)]
struct MemoryState {
    records: BTreeMap<RecordId, Record>,
    next_id: i64,
}

/// In-process store; ids start at 1 and are never reused.
#[derive(Debug)]
pub struct MemoryRecordStore {
    state: Mutex<MemoryState>,
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                records: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl MemoryState {
    fn insert(&mut self, scope: ScopeId, records: Vec<NewRecord>) -> Vec<Record> {
        records
            .into_iter()
            .map(|new_record| {
                let id = RecordId(self.next_id);
                self.next_id += 1;
                let record = new_record.into_record(id, scope);
                self.records.insert(id, record.clone());
                record
            })
            .collect()
    }

    fn contains(&self, scope: ScopeId, id: RecordId) -> bool {
        self.records
            .get(&id)
            .map_or(false, |r| r.database_id == scope)
    }
}

impl RecordStore for MemoryRecordStore {
    async fn list_records(&self, scope: ScopeId) -> Result<Vec<Record>> {
        let state = self.state.lock().await;
        Ok(state
            .records
            .values()
            .filter(|r| r.database_id == scope)
            .cloned()
            .collect())
    }

    async fn insert_records(&self, scope: ScopeId, records: Vec<NewRecord>) -> Result<Vec<Record>> {
        let mut state = self.state.lock().await;
        Ok(state.insert(scope, records))
    }

    async fn replace_records(
        &self,
        scope: ScopeId,
        remove: &[RecordId],
        insert: Vec<NewRecord>,
    ) -> Result<Vec<Record>> {
        let mut state = self.state.lock().await;
        if let Some(missing) = remove.iter().find(|id| !state.contains(scope, **id)) {
            bail!(
                "Record {} not found in database {}; nothing was replaced",
                missing,
                scope
            );
        }
        for id in remove {
            state.records.remove(id);
        }
        let inserted = state.insert(scope, insert);
        debug!(
            "Replaced {} records with {} in database {}",
            remove.len(),
            inserted.len(),
            scope
        );
        Ok(inserted)
    }

    async fn delete_records(&self, scope: ScopeId, ids: &[RecordId]) -> Result<usize> {
        let mut state = self.state.lock().await;
        let mut deleted = 0;
        for id in ids {
            if state.contains(scope, *id) {
                state.records.remove(id);
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn clear_scope(&self, scope: ScopeId) -> Result<usize> {
        let mut state = self.state.lock().await;
        let before = state.records.len();
        state.records.retain(|_, r| r.database_id != scope);
        Ok(before - state.records.len())
    }
}
