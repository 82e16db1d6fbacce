//! Sync settings passed to constructors.
//!
//! There is no process-wide configuration: the CLI (or any other host)
//! assembles a [`SyncConfig`] and, when a real source is configured, an
//! [`HttpSourceConfig`], then hands them to the coordinator and adapter.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Upper bound on a single source fetch when nothing else is configured.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// What to do when the source fetch fails or times out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DegradedMode {
    /// Surface `SourceUnavailable` and write nothing.
    #[default]
    Disabled,
    /// Fall back to a synthetic month drawn from OS entropy.
    Random,
    /// Fall back to a synthetic month that is reproducible for the seed.
    Seeded(u64),
}

impl DegradedMode {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, DegradedMode::Disabled)
    }
}

impl fmt::Display for DegradedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradedMode::Disabled => f.write_str("off"),
            DegradedMode::Random => f.write_str("random"),
            DegradedMode::Seeded(seed) => write!(f, "seeded:{}", seed),
        }
    }
}

/// `off`, `random` or `seeded:<u64>`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid degraded mode '{0}' (expected off, random or seeded:<n>)")]
pub struct ParseDegradedModeError(String);

impl FromStr for DegradedMode {
    type Err = ParseDegradedModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "off" | "disabled" | "none" => return Ok(DegradedMode::Disabled),
            "random" => return Ok(DegradedMode::Random),
            _ => {}
        }
        trimmed
            .strip_prefix("seeded:")
            .and_then(|seed| seed.parse().ok())
            .map(DegradedMode::Seeded)
            .ok_or_else(|| ParseDegradedModeError(s.to_string()))
    }
}

/// Coordinator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub fetch_timeout: Duration,
    pub degraded_mode: DegradedMode,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            degraded_mode: DegradedMode::Disabled,
        }
    }
}

/// Connection settings of the external scheduling API.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpSourceConfig {
    pub base_url: String,
    pub api_key: String,
    /// Sent as `X-Company-Id` when present.
    pub company_id: Option<String>,
    pub timeout: Duration,
}

// The API key never reaches logs.
impl fmt::Debug for HttpSourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSourceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("company_id", &self.company_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_mode_parses_all_forms() {
        assert_eq!("off".parse(), Ok(DegradedMode::Disabled));
        assert_eq!("Disabled".parse(), Ok(DegradedMode::Disabled));
        assert_eq!("random".parse(), Ok(DegradedMode::Random));
        assert_eq!("seeded:42".parse(), Ok(DegradedMode::Seeded(42)));
        assert_eq!(" seeded:7 ".parse(), Ok(DegradedMode::Seeded(7)));
    }

    #[test]
    fn degraded_mode_rejects_garbage() {
        assert!("seeded:".parse::<DegradedMode>().is_err());
        assert!("seeded:-1".parse::<DegradedMode>().is_err());
        assert!("sometimes".parse::<DegradedMode>().is_err());
    }

    #[test]
    fn degraded_mode_display_round_trips() {
        for mode in [
            DegradedMode::Disabled,
            DegradedMode::Random,
            DegradedMode::Seeded(9),
        ] {
            assert_eq!(mode.to_string().parse(), Ok(mode));
        }
    }

    #[test]
    fn default_timeout_is_thirty_seconds() {
        let config = SyncConfig::default();
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
        assert!(!config.degraded_mode.is_enabled());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = HttpSourceConfig {
            base_url: "https://octime.example".to_string(),
            api_key: "s3cret".to_string(),
            company_id: None,
            timeout: DEFAULT_FETCH_TIMEOUT,
        };
        assert!(!format!("{:?}", config).contains("s3cret"));
    }
}
