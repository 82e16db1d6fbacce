use std::path::Path;
use std::sync::Arc;

use roster_sync::source::UnconfiguredSource;
use roster_sync::{RosterService, SyncConfig, SyncCoordinator};

use super::{open_store, print_json};
use crate::config::Settings;

pub(crate) async fn cmd_publish(
    settings: &Settings,
    employee: &str,
    roster_id: u64,
    store: Option<&Path>,
) -> Result<(), String> {
    let store = open_store(settings, store)?;
    let service = RosterService::new(SyncCoordinator::new(
        store,
        Arc::new(UnconfiguredSource),
        SyncConfig::default(),
    ));
    let roster = service
        .publish_roster(employee, roster_id)
        .await
        .map_err(|e| e.to_string())?;
    print_json(&roster)
}
