//! `youthdesk seed` — Load policy records into the catalog.
//!
//! Expects a JSON array of policy records; existing records with the same
//! id are replaced, so re-running a seed file is safe.

use std::path::Path;

use youthdesk_config::AppConfig;
use youthdesk_core::policy::PolicyRecord;
use youthdesk_core::store::PolicyCatalog;
use youthdesk_store::SqliteStore;

pub async fn run(config: AppConfig, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if config.store.backend != "sqlite" {
        return Err("Seeding requires the sqlite store backend".into());
    }

    let raw = std::fs::read_to_string(file)
        .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;
    let records: Vec<PolicyRecord> = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse {}: {e}", file.display()))?;

    let store = SqliteStore::new(&config.store.path).await?;

    let total = records.len();
    for record in records {
        store.upsert_policy(record).await?;
    }

    println!("Seeded {total} policy records into {}", config.store.path);
    Ok(())
}
