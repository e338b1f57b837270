// src/bin/exact_duplicates.rs
use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use dedupe_lib::config::MatchingConfig;
use dedupe_lib::manager::DuplicateManager;
use dedupe_lib::models::ScopeId;
use dedupe_lib::store::PgRecordStore;
use dedupe_lib::utils::db_connect::connect;
use dedupe_lib::utils::env::load_env;

#[derive(Parser)]
#[command(author, version, about = "Delete exact duplicate contact records", long_about = None)]
struct ExactArgs {
    /// Database (import scope) to clean
    #[arg(long)]
    database_id: i64,

    /// List the ids that would be deleted without deleting them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let args = ExactArgs::parse();
    let scope = ScopeId(args.database_id);
    load_env();

    let pool = connect().await.context("Failed to connect to database")?;
    let store = PgRecordStore::new(pool);
    store.ensure_schema().await?;
    let manager = DuplicateManager::new(store, MatchingConfig::default());

    if args.dry_run {
        let ids = manager.exact_duplicate_ids(scope).await?;
        let listed: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        info!(
            "[dry run] {} exact duplicates in database {}: [{}]",
            ids.len(),
            scope,
            listed.join(", ")
        );
    } else {
        let deleted = manager.delete_exact_duplicates(scope).await?;
        info!("Deleted {} exact duplicates from database {}", deleted, scope);
    }
    Ok(())
}
