use std::path::Path;
use std::sync::Arc;

use roster_core::SyncResult;
use roster_storage::{JsonFileStore, MemoryRosterStore, RosterStore};
use roster_sync::{SourceAdapter, SyncConfig, SyncCoordinator};

use super::{build_source, print_json};
use crate::config::Settings;
use crate::{MonthArgs, SourceArgs};

pub(crate) async fn cmd_sync(
    settings: &Settings,
    month: &MonthArgs,
    source_args: &SourceArgs,
    store: Option<&Path>,
) -> Result<(), String> {
    let config = settings.sync_config(source_args.degraded, source_args.timeout)?;
    let source = build_source(
        settings,
        source_args.source_file.as_deref(),
        config.fetch_timeout,
    )?;

    let result = match settings.store_path(store) {
        Some(path) => {
            let store = JsonFileStore::open(&path).map_err(|e| e.to_string())?;
            run(Arc::new(store), source, config, month).await?
        }
        None => run(Arc::new(MemoryRosterStore::new()), source, config, month).await?,
    };
    print_json(&result)
}

async fn run<S: RosterStore>(
    store: Arc<S>,
    source: Arc<dyn SourceAdapter>,
    config: SyncConfig,
    month: &MonthArgs,
) -> Result<SyncResult, String> {
    SyncCoordinator::new(store, source, config)
        .sync_employee_roster(&month.employee, month.year, month.month)
        .await
        .map_err(|e| e.to_string())
}
