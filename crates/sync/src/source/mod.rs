//! Source adapters: where a month of schedule data comes from.
//!
//! Every strategy sits behind [`SourceAdapter`]:
//! - [`http::HttpSource`] -- the external scheduling API (feature `http`)
//! - [`synthetic::SyntheticSource`] -- a generated placeholder month, used as
//!   the degraded-mode fallback
//! - [`static_adapter::StaticSource`] -- fixed data for tests and demos
//!
//! Adapters only fetch. They never persist and never fall back on their own;
//! the coordinator decides what happens on failure.

#[cfg(feature = "http")]
pub mod http;
pub mod static_adapter;
pub mod synthetic;

use async_trait::async_trait;
use roster_core::{Period, SourceRoster};

use crate::error::SourceError;

/// Fetches one employee's month from one source.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    async fn fetch(&self, employee_id: &str, period: Period) -> Result<SourceRoster, SourceError>;

    /// Returns this adapter's identifier (e.g. "http", "synthetic", "static").
    fn adapter_id(&self) -> &str;
}

/// A source that always fails with a config error.
///
/// Stands in for the external API when no URL is configured, so degraded mode
/// still decides whether a sync can proceed.
pub struct UnconfiguredSource;

#[async_trait]
impl SourceAdapter for UnconfiguredSource {
    async fn fetch(&self, _employee_id: &str, _period: Period) -> Result<SourceRoster, SourceError> {
        Err(SourceError::Config {
            message: "no roster source URL configured".to_string(),
        })
    }

    fn adapter_id(&self) -> &str {
        "unconfigured"
    }
}

/// Reference used for a month the source did not name.
pub fn default_reference(employee_id: &str, period: Period) -> String {
    format!("OCT-{}{}-{}", period.year(), period.month(), employee_id)
}
