// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::MultiProgress;
use log::info;
use std::time::Instant;

use dedupe_lib::config::MatchingConfig;
use dedupe_lib::manager::DuplicateManager;
use dedupe_lib::models::{DuplicateGroup, ScopeId};
use dedupe_lib::store::PgRecordStore;
use dedupe_lib::utils::db_connect::connect;
use dedupe_lib::utils::env::load_env;

#[derive(Parser)]
#[command(author, version, about = "Find and merge duplicate contact records", long_about = None)]
struct Args {
    /// Database (import scope) to process
    #[arg(long)]
    database_id: i64,

    /// Merge every duplicate group into one record
    #[arg(long)]
    merge: bool,

    /// Delete records identical on name, address, phone and website first
    #[arg(long)]
    delete_exact: bool,

    /// Delete rows flagged as duplicates during import
    #[arg(long)]
    delete_flagged: bool,

    /// Report only, never write
    #[arg(long)]
    dry_run: bool,
}

fn report_groups(groups: &[DuplicateGroup]) {
    for (idx, group) in groups.iter().enumerate() {
        let members: Vec<String> = group
            .records()
            .iter()
            .skip(1)
            .zip(group.matched_by())
            .map(|(record, rule)| format!("{} ({})", record.id, rule))
            .collect();
        if let Some(anchor) = group.anchor() {
            info!(
                "  Group {}: anchor {} <- {}",
                idx + 1,
                anchor.id,
                members.join(", ")
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let args = Args::parse();
    let start_time = Instant::now();
    let scope = ScopeId(args.database_id);
    info!("Starting duplicate detection for database {}", scope);

    load_env();
    let config = MatchingConfig::from_env();
    config.log_config();

    let pool = connect().await.context("Failed to connect to database")?;
    let store = PgRecordStore::new(pool);
    store
        .ensure_schema()
        .await
        .context("Failed to prepare contact_records schema")?;
    let manager = DuplicateManager::new(store, config);

    if args.delete_exact {
        if args.dry_run {
            let ids = manager.exact_duplicate_ids(scope).await?;
            info!("[dry run] Would delete {} exact duplicates", ids.len());
        } else {
            let deleted = manager.delete_exact_duplicates(scope).await?;
            info!("Deleted {} exact duplicates", deleted);
        }
    }

    let (groups, stats) = manager.scan(scope).await?;
    report_groups(&groups);

    if args.merge {
        if args.dry_run {
            info!(
                "[dry run] Would merge {} groups, removing {} records",
                stats.groups_found,
                stats.records_in_groups - stats.groups_found
            );
        } else {
            let merge_stats = manager
                .merge_all(scope, Some(MultiProgress::new()))
                .await
                .context("Merging duplicate groups failed")?;
            info!(
                "Merged {} groups, removed {} records (run {})",
                merge_stats.groups_merged, merge_stats.records_removed, merge_stats.run_id
            );
        }
    }

    if args.delete_flagged {
        if args.dry_run {
            let count = manager.flagged_duplicate_count(scope).await?;
            info!("[dry run] Would delete {} flagged duplicates", count);
        } else {
            let deleted = manager.delete_flagged_duplicates(scope).await?;
            info!("Deleted {} flagged duplicates", deleted);
        }
    }

    info!(
        "Finished in {:.2?} ({} records scanned, {} groups)",
        start_time.elapsed(),
        stats.records_scanned,
        stats.groups_found
    );
    Ok(())
}
