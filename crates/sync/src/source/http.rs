//! HTTP source adapter -- fetches a month from the scheduling API.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` to avoid
//! blocking the async runtime. Issues
//! `GET {base_url}/planning?employeeId=..&year=..&month=..` with a bearer
//! token and the company header, and expects `{"reference", "shifts"}`.

use async_trait::async_trait;
use roster_core::{Period, SourceRoster};

use super::SourceAdapter;
use crate::config::HttpSourceConfig;
use crate::error::SourceError;

const ADAPTER_ID: &str = "http";

/// Adapter for the external scheduling API.
#[derive(Debug, Clone)]
pub struct HttpSource {
    config: HttpSourceConfig,
}

impl HttpSource {
    /// Fails with `SourceError::Config` when the URL or the key is blank.
    pub fn new(config: HttpSourceConfig) -> Result<Self, SourceError> {
        if config.base_url.trim().is_empty() {
            return Err(SourceError::Config {
                message: "roster source base URL is empty".to_string(),
            });
        }
        if config.api_key.trim().is_empty() {
            return Err(SourceError::Config {
                message: "roster source API key is empty".to_string(),
            });
        }
        Ok(HttpSource { config })
    }

    /// `{base_url}/planning`, tolerating a trailing slash on the base.
    pub fn planning_url(&self) -> String {
        format!("{}/planning", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SourceAdapter for HttpSource {
    async fn fetch(&self, employee_id: &str, period: Period) -> Result<SourceRoster, SourceError> {
        let url = self.planning_url();
        let config = self.config.clone();
        let employee_id = employee_id.to_string();

        tracing::debug!(url = %url, employee_id = %employee_id, period = %period, "fetching roster");

        tokio::task::spawn_blocking(move || {
            let agent: ureq::Agent = ureq::Agent::config_builder()
                .timeout_global(Some(config.timeout))
                .build()
                .into();
            let mut request = agent
                .get(&url)
                .query("employeeId", &employee_id)
                .query("year", period.year().to_string())
                .query("month", period.month().to_string())
                .header("Authorization", &format!("Bearer {}", config.api_key))
                .header("Accept", "application/json");
            if let Some(ref company_id) = config.company_id {
                request = request.header("X-Company-Id", company_id);
            }

            let response = request.call().map_err(|e| match e {
                ureq::Error::Timeout(_) => SourceError::Timeout {
                    adapter_id: ADAPTER_ID.to_string(),
                    after: config.timeout,
                },
                other => SourceError::Unavailable {
                    adapter_id: ADAPTER_ID.to_string(),
                    message: other.to_string(),
                },
            })?;

            response
                .into_body()
                .read_json::<SourceRoster>()
                .map_err(|e| SourceError::InvalidPayload {
                    adapter_id: ADAPTER_ID.to_string(),
                    message: format!("failed to parse response as a roster: {}", e),
                })
        })
        .await
        .map_err(|e| SourceError::Unavailable {
            adapter_id: ADAPTER_ID.to_string(),
            message: format!("task join error: {}", e),
        })?
    }

    fn adapter_id(&self) -> &str {
        ADAPTER_ID
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_FETCH_TIMEOUT;
    use std::time::Duration;

    fn config(base_url: &str) -> HttpSourceConfig {
        HttpSourceConfig {
            base_url: base_url.to_string(),
            api_key: "key".to_string(),
            company_id: Some("acme".to_string()),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    #[test]
    fn planning_url_strips_trailing_slash() {
        let source = HttpSource::new(config("https://octime.example/api/")).unwrap();
        assert_eq!(source.planning_url(), "https://octime.example/api/planning");
    }

    #[test]
    fn blank_url_is_a_config_error() {
        assert!(matches!(
            HttpSource::new(config("  ")),
            Err(SourceError::Config { .. })
        ));
    }

    #[test]
    fn blank_key_is_a_config_error() {
        let mut cfg = config("https://octime.example");
        cfg.api_key = String::new();
        assert!(matches!(
            HttpSource::new(cfg),
            Err(SourceError::Config { .. })
        ));
    }

    #[tokio::test]
    async fn unreachable_host_is_unavailable() {
        let mut cfg = config("http://127.0.0.1:9");
        cfg.timeout = Duration::from_secs(2);
        let source = HttpSource::new(cfg).unwrap();
        let period = Period::new(2024, 2).unwrap();
        let result = source.fetch("e1", period).await;
        assert!(matches!(
            result,
            Err(SourceError::Unavailable { .. }) | Err(SourceError::Timeout { .. })
        ));
    }
}
