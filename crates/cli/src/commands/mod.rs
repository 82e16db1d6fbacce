pub(crate) mod mock;
pub(crate) mod publish;
pub(crate) mod show;
pub(crate) mod sync;
pub(crate) mod upcoming;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use roster_storage::JsonFileStore;
use roster_sync::source::http::HttpSource;
use roster_sync::source::static_adapter::StaticSource;
use roster_sync::source::UnconfiguredSource;
use roster_sync::SourceAdapter;
use serde::Serialize;
use tracing::debug;

use crate::config::Settings;

/// Pick the roster source: a JSON file beats the configured API, and with
/// neither the source reports itself unconfigured.
pub(crate) fn build_source(
    settings: &Settings,
    source_file: Option<&Path>,
    timeout: Duration,
) -> Result<Arc<dyn SourceAdapter>, String> {
    if let Some(path) = source_file {
        let source = StaticSource::from_json_file(path).map_err(|e| e.to_string())?;
        debug!(path = %path.display(), "reading roster source from file");
        return Ok(Arc::new(source));
    }
    match settings.http_source(timeout) {
        Some(config) => {
            debug!(url = %config.base_url, "using scheduling API");
            let source = HttpSource::new(config).map_err(|e| e.to_string())?;
            Ok(Arc::new(source))
        }
        None => Ok(Arc::new(UnconfiguredSource)),
    }
}

pub(crate) fn open_store(
    settings: &Settings,
    flag: Option<&Path>,
) -> Result<Arc<JsonFileStore>, String> {
    let path = settings
        .store_path(flag)
        .ok_or_else(|| "no store given: pass --store or set `store` in the config".to_string())?;
    JsonFileStore::open(&path)
        .map(Arc::new)
        .map_err(|e| e.to_string())
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| format!("error serializing output: {}", e))?;
    println!("{}", text);
    Ok(())
}
