// src/store/postgres.rs
use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde_json::Value as JsonValue;
use tokio_postgres::{GenericClient, Row as PgRow};

use crate::models::{Fields, NewRecord, Record, RecordId, ScopeId};
use crate::store::RecordStore;
use crate::utils::db_connect::PgPool;

const CREATE_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS contact_records (
        id BIGSERIAL PRIMARY KEY,
        database_id BIGINT NOT NULL,
        fields JSONB NOT NULL DEFAULT '{}'::jsonb,
        merged BOOLEAN NOT NULL DEFAULT FALSE,
        is_duplicate BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMP NOT NULL DEFAULT NOW()
    )";

const CREATE_INDEX_SQL: &str = "
    CREATE INDEX IF NOT EXISTS idx_contact_records_database_id
    ON contact_records (database_id, id)";

const SELECT_RECORDS_SQL: &str = "
    SELECT id, database_id, fields, merged, is_duplicate
    FROM contact_records
    WHERE database_id = $1
    ORDER BY id ASC";

const INSERT_RECORD_SQL: &str = "
    INSERT INTO contact_records (database_id, fields, merged, is_duplicate)
    VALUES ($1, $2, $3, $4)
    RETURNING id";

const DELETE_RECORDS_SQL: &str = "
    DELETE FROM contact_records
    WHERE database_id = $1 AND id = ANY($2)";

const CLEAR_SCOPE_SQL: &str = "DELETE FROM contact_records WHERE database_id = $1";

/// Records stored as one JSONB document of fields per row.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        let conn = self
            .pool
            .get()
            .await
            .context("Failed to get DB connection for schema setup")?;
        conn.batch_execute(CREATE_TABLE_SQL)
            .await
            .context("Failed to create contact_records table")?;
        conn.batch_execute(CREATE_INDEX_SQL)
            .await
            .context("Failed to create contact_records index")?;
        info!("contact_records schema is ready");
        Ok(())
    }
}

fn row_to_record(row: &PgRow) -> Result<Record> {
    let fields_json: JsonValue = row.try_get("fields").context("Missing fields column")?;
    let fields: Fields =
        serde_json::from_value(fields_json).context("Failed to decode record fields")?;
    Ok(Record {
        id: RecordId(row.try_get("id")?),
        database_id: ScopeId(row.try_get("database_id")?),
        fields,
        merged: row.try_get("merged")?,
        is_duplicate: row.try_get("is_duplicate")?,
    })
}

async fn insert_all(
    client: &impl GenericClient,
    scope: ScopeId,
    records: Vec<NewRecord>,
) -> Result<Vec<Record>> {
    let stmt = client
        .prepare(INSERT_RECORD_SQL)
        .await
        .context("Failed to prepare record insert")?;
    let mut inserted = Vec::with_capacity(records.len());
    for new_record in records {
        let fields_json =
            serde_json::to_value(&new_record.fields).context("Failed to serialize record fields")?;
        let row = client
            .query_one(
                &stmt,
                &[&scope.0, &fields_json, &new_record.merged, &new_record.is_duplicate],
            )
            .await
            .context("Failed to insert record")?;
        let id = RecordId(row.get(0));
        inserted.push(new_record.into_record(id, scope));
    }
    Ok(inserted)
}

fn raw_ids(ids: &[RecordId]) -> Vec<i64> {
    ids.iter().map(|id| id.0).collect()
}

impl RecordStore for PgRecordStore {
    async fn list_records(&self, scope: ScopeId) -> Result<Vec<Record>> {
        let conn = self
            .pool
            .get()
            .await
            .context("Failed to get DB connection for list_records")?;
        let rows = conn
            .query(SELECT_RECORDS_SQL, &[&scope.0])
            .await
            .context(format!("Failed to query records of database {}", scope))?;
        rows.iter().map(row_to_record).collect()
    }

    async fn insert_records(&self, scope: ScopeId, records: Vec<NewRecord>) -> Result<Vec<Record>> {
        let mut conn = self
            .pool
            .get()
            .await
            .context("Failed to get DB connection for insert_records")?;
        let tx = conn
            .transaction()
            .await
            .context("Failed to start transaction for insert_records")?;
        let inserted = insert_all(&tx, scope, records).await?;
        tx.commit()
            .await
            .context("Failed to commit insert_records transaction")?;
        debug!("Inserted {} records into database {}", inserted.len(), scope);
        Ok(inserted)
    }

    async fn replace_records(
        &self,
        scope: ScopeId,
        remove: &[RecordId],
        insert: Vec<NewRecord>,
    ) -> Result<Vec<Record>> {
        let mut conn = self
            .pool
            .get()
            .await
            .context("Failed to get DB connection for replace_records")?;
        let tx = conn
            .transaction()
            .await
            .context("Failed to start transaction for replace_records")?;

        let ids = raw_ids(remove);
        let deleted = tx
            .execute(DELETE_RECORDS_SQL, &[&scope.0, &ids])
            .await
            .context("Failed to delete replaced records")?;
        if deleted as usize != remove.len() {
            // Dropping the transaction rolls it back.
            bail!(
                "Expected to replace {} records in database {} but found {}; nothing was replaced",
                remove.len(),
                scope,
                deleted
            );
        }

        let inserted = insert_all(&tx, scope, insert).await?;
        tx.commit()
            .await
            .context("Failed to commit replace_records transaction")?;
        debug!(
            "Replaced {} records with {} in database {}",
            remove.len(),
            inserted.len(),
            scope
        );
        Ok(inserted)
    }

    async fn delete_records(&self, scope: ScopeId, ids: &[RecordId]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let conn = self
            .pool
            .get()
            .await
            .context("Failed to get DB connection for delete_records")?;
        let deleted = conn
            .execute(DELETE_RECORDS_SQL, &[&scope.0, &raw_ids(ids)])
            .await
            .context("Failed to delete records")?;
        Ok(deleted as usize)
    }

    async fn clear_scope(&self, scope: ScopeId) -> Result<usize> {
        let conn = self
            .pool
            .get()
            .await
            .context("Failed to get DB connection for clear_scope")?;
        let deleted = conn
            .execute(CLEAR_SCOPE_SQL, &[&scope.0])
            .await
            .context(format!("Failed to clear database {}", scope))?;
        Ok(deleted as usize)
    }
}
