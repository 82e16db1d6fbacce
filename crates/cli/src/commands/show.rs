use std::path::Path;

use roster_sync::{RosterService, SyncCoordinator};

use super::{build_source, open_store, print_json};
use crate::config::Settings;
use crate::{MonthArgs, SourceArgs};

pub(crate) async fn cmd_show(
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
    let store = open_store(settings, store)?;

    let service = RosterService::new(SyncCoordinator::new(store, source, config));
    let monthly = service
        .monthly_roster(&month.employee, month.year, month.month)
        .await
        .map_err(|e| e.to_string())?;
    print_json(&monthly)
}
