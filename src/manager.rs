// src/manager.rs - Store round-trips around the matching and merge passes
use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::info;
use uuid::Uuid;

use crate::clustering::DuplicateGrouper;
use crate::config::MatchingConfig;
use crate::consolidation::{self, find_exact_duplicates};
use crate::errors::DedupeError;
use crate::matching::screen_import;
use crate::models::{DedupeStats, DuplicateGroup, Fields, ImportSummary, NewRecord, Record, RecordId, ScopeId};
use crate::store::RecordStore;
use crate::utils::logging::{DedupeLogger, DedupeOperation};

pub struct DuplicateManager<S: RecordStore> {
    store: S,
    grouper: DuplicateGrouper,
}

impl<S: RecordStore> DuplicateManager<S> {
    pub fn new(store: S, config: MatchingConfig) -> Self {
        Self {
            store,
            grouper: DuplicateGrouper::new(config),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn find_duplicates(&self, scope: ScopeId) -> Result<Vec<DuplicateGroup>> {
        let (groups, _) = self.scan(scope).await?;
        Ok(groups)
    }

    /// Finds the duplicate groups of `scope` along with the run statistics
    /// of the search.
    pub async fn scan(&self, scope: ScopeId) -> Result<(Vec<DuplicateGroup>, DedupeStats)> {
        let logger = DedupeLogger::new(DedupeOperation::Find);
        let run_id = Uuid::new_v4().to_string();
        logger.log_start(scope, Some(&run_id));

        let mut stats = DedupeStats::new(run_id, Utc::now().naive_utc(), scope);
        let groups = self.load_and_group(scope, &logger, &mut stats).await?;

        stats.processing_time = logger.elapsed_secs();
        logger.log_completion(&format!(
            "{} groups, avg size {:.1}",
            stats.groups_found,
            stats.avg_group_size()
        ));
        Ok((groups, stats))
    }

    async fn load_and_group(
        &self,
        scope: ScopeId,
        logger: &DedupeLogger,
        stats: &mut DedupeStats,
    ) -> Result<Vec<DuplicateGroup>> {
        logger.log_phase("Loading records", None);
        let records = self
            .store
            .list_records(scope)
            .await
            .context(format!("Failed to load records of database {}", scope))?;
        logger.log_data_loaded(records.len());
        stats.records_scanned = records.len();

        logger.log_phase(
            "Grouping",
            Some(self.grouper.rules().config().grouping_strategy.as_str()),
        );
        let groups = self.grouper.group(&records);
        stats.record_groups(&groups);
        logger.log_groups_found(stats.groups_found, stats.records_in_groups);
        logger.log_rule_breakdown(&stats.rule_counts);
        Ok(groups)
    }

    /// Replaces every member of `group` with their merged record and returns
    /// the stored result. A single-record group is returned as is.
    pub async fn merge_group(&self, scope: ScopeId, group: &DuplicateGroup) -> Result<Record> {
        let anchor = group.anchor().ok_or(DedupeError::EmptyGroup)?;
        if let Some(stray) = group.records().iter().find(|r| r.database_id != scope) {
            return Err(DedupeError::ScopeMismatch {
                record_id: stray.id.0,
                expected: scope,
                found: stray.database_id,
            }
            .into());
        }
        if group.len() == 1 {
            return Ok(anchor.clone());
        }

        let merged = consolidation::merge_group(group)?;
        let ids = group.ids();
        let stored = self
            .store
            .replace_records(scope, &ids, vec![NewRecord::from(merged)])
            .await
            .context(format!(
                "Failed to replace records {:?} with their merge in database {}",
                ids, scope
            ))?;
        stored
            .into_iter()
            .next()
            .context("Store returned no record for the merge")
    }

    /// Finds every group in `scope` and merges each one.
    pub async fn merge_all(
        &self,
        scope: ScopeId,
        multi_progress: Option<MultiProgress>,
    ) -> Result<DedupeStats> {
        let logger = DedupeLogger::new(DedupeOperation::Merge);
        let run_id = Uuid::new_v4().to_string();
        logger.log_start(scope, Some(&run_id));

        let mut stats = DedupeStats::new(run_id, Utc::now().naive_utc(), scope);
        let groups = self.load_and_group(scope, &logger, &mut stats).await?;

        logger.log_phase("Merging", Some(&format!("{} groups", groups.len())));
        let merge_pb = match &multi_progress {
            Some(mp) => {
                let pb = mp.add(ProgressBar::new(groups.len() as u64));
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("  {spinner:.blue} [{elapsed_precise}] {bar:30.green/blue} {pos}/{len} {msg}")
                        .context("Invalid progress bar template")?
                        .progress_chars("█▉▊▋▌▍▎▏  "),
                );
                pb.set_message("Merging duplicate groups...");
                Some(pb)
            }
            None => None,
        };

        for group in &groups {
            let merged = self.merge_group(scope, group).await?;
            stats.groups_merged += 1;
            stats.records_removed += group.len() - 1;
            logger.log_debug(&format!(
                "Merged {:?} into record {}",
                group.ids(),
                merged.id
            ));
            if let Some(pb) = &merge_pb {
                pb.inc(1);
            }
        }
        if let Some(pb) = merge_pb {
            pb.finish_with_message(format!("Merged {} groups", stats.groups_merged));
        }

        stats.processing_time = logger.elapsed_secs();
        logger.log_completion(&format!(
            "{} groups merged, {} records removed",
            stats.groups_merged, stats.records_removed
        ));
        Ok(stats)
    }

    /// Screens `rows` against the stored records and inserts all of them,
    /// duplicates flagged.
    pub async fn import_records(&self, scope: ScopeId, rows: Vec<Fields>) -> Result<ImportSummary> {
        let logger = DedupeLogger::new(DedupeOperation::Import);
        logger.log_start(scope, None);

        logger.log_phase("Loading records", None);
        let existing = self
            .store
            .list_records(scope)
            .await
            .context(format!("Failed to load records of database {}", scope))?;
        logger.log_data_loaded(existing.len());

        logger.log_phase("Screening", Some(&format!("{} incoming rows", rows.len())));
        let screening = screen_import(self.grouper.rules(), &existing, rows);

        logger.log_phase("Inserting", None);
        self.store
            .insert_records(scope, screening.rows)
            .await
            .context(format!("Failed to insert imported rows into database {}", scope))?;

        let summary = screening.summary;
        if summary.duplicates > 0 {
            logger.log_warning(&format!(
                "{} of {} rows flagged as duplicates",
                summary.duplicates,
                summary.imported + summary.duplicates
            ));
        }
        logger.log_completion(&format!(
            "{} imported, {} duplicates",
            summary.imported, summary.duplicates
        ));
        Ok(summary)
    }

    /// Deletes records identical on name, address, phone and website,
    /// keeping the oldest of each set.
    pub async fn delete_exact_duplicates(&self, scope: ScopeId) -> Result<usize> {
        let logger = DedupeLogger::new(DedupeOperation::ExactCleanup);
        logger.log_start(scope, None);

        let ids = self.exact_duplicate_ids(scope).await?;
        logger.log_phase("Deleting", Some(&format!("{} exact duplicates", ids.len())));
        let deleted = self
            .store
            .delete_records(scope, &ids)
            .await
            .context("Failed to delete exact duplicates")?;

        logger.log_completion(&format!("{} records deleted", deleted));
        Ok(deleted)
    }

    /// Ids `delete_exact_duplicates` would remove.
    pub async fn exact_duplicate_ids(&self, scope: ScopeId) -> Result<Vec<RecordId>> {
        let records = self
            .store
            .list_records(scope)
            .await
            .context(format!("Failed to load records of database {}", scope))?;
        Ok(find_exact_duplicates(&records))
    }

    pub async fn flagged_duplicates(&self, scope: ScopeId) -> Result<Vec<Record>> {
        let records = self
            .store
            .list_records(scope)
            .await
            .context(format!("Failed to load records of database {}", scope))?;
        Ok(records.into_iter().filter(|r| r.is_duplicate).collect())
    }

    pub async fn flagged_duplicate_count(&self, scope: ScopeId) -> Result<usize> {
        Ok(self.flagged_duplicates(scope).await?.len())
    }

    pub async fn delete_flagged_duplicates(&self, scope: ScopeId) -> Result<usize> {
        let logger = DedupeLogger::new(DedupeOperation::FlaggedCleanup);
        logger.log_start(scope, None);

        let ids: Vec<RecordId> = self
            .flagged_duplicates(scope)
            .await?
            .iter()
            .map(|r| r.id)
            .collect();
        logger.log_phase("Deleting", Some(&format!("{} flagged records", ids.len())));
        let deleted = self
            .store
            .delete_records(scope, &ids)
            .await
            .context("Failed to delete flagged duplicates")?;

        logger.log_completion(&format!("{} records deleted", deleted));
        Ok(deleted)
    }

    pub async fn clear_scope(&self, scope: ScopeId) -> Result<usize> {
        let deleted = self
            .store
            .clear_scope(scope)
            .await
            .context(format!("Failed to clear database {}", scope))?;
        info!("Cleared {} records from database {}", deleted, scope);
        Ok(deleted)
    }
}
