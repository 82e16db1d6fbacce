use std::path::Path;
use std::sync::Arc;

use roster_sync::source::UnconfiguredSource;
use roster_sync::{RosterService, SyncConfig, SyncCoordinator};
use time::{Date, OffsetDateTime};

use super::{open_store, print_json};
use crate::config::Settings;

pub(crate) async fn cmd_upcoming(
    settings: &Settings,
    employee: &str,
    store: Option<&Path>,
    from: Option<Date>,
    count: usize,
) -> Result<(), String> {
    let store = open_store(settings, store)?;
    let from = from.unwrap_or_else(|| OffsetDateTime::now_utc().date());

    // Reads only; nothing is fetched.
    let service = RosterService::new(SyncCoordinator::new(
        store,
        Arc::new(UnconfiguredSource),
        SyncConfig::default(),
    ));
    let shifts = service
        .upcoming_shifts(employee, from, count)
        .await
        .map_err(|e| e.to_string())?;
    print_json(&shifts)
}
