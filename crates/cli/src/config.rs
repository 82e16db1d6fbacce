//! Layered CLI settings: TOML file, then `ROSTER_*` environment variables,
//! then command-line flags.
//!
//! ```toml
//! store = "rosters.json"
//!
//! [source]
//! url = "https://scheduling.example.com/api"
//! api_key = "..."
//! company_id = "ACME"
//!
//! [sync]
//! fetch_timeout_secs = 20
//! degraded_mode = "seeded:7"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use roster_sync::{DegradedMode, HttpSourceConfig, SyncConfig, DEFAULT_FETCH_TIMEOUT};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub store: Option<PathBuf>,
    pub source: SourceSettings,
    pub sync: SyncSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SourceSettings {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub company_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SyncSettings {
    pub fetch_timeout_secs: Option<u64>,
    pub degraded_mode: Option<String>,
}

impl Settings {
    /// Read `path` if given, then overlay the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Settings::default(),
        };
        settings.overlay_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("error reading config '{}': {}", path.display(), e))?;
        toml::from_str(&text).map_err(|e| format!("error parsing config '{}': {}", path.display(), e))
    }

    /// Overlay `ROSTER_*` variables. Empty values are ignored.
    pub fn overlay_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("ROSTER_STORE") {
            self.store = Some(PathBuf::from(v));
        }
        if let Some(v) = get("ROSTER_SOURCE_URL") {
            self.source.url = Some(v);
        }
        if let Some(v) = get("ROSTER_SOURCE_API_KEY") {
            self.source.api_key = Some(v);
        }
        if let Some(v) = get("ROSTER_SOURCE_COMPANY_ID") {
            self.source.company_id = Some(v);
        }
        if let Some(v) = get("ROSTER_FETCH_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            self.sync.fetch_timeout_secs = Some(v);
        }
        if let Some(v) = get("ROSTER_DEGRADED_MODE") {
            self.sync.degraded_mode = Some(v);
        }
    }

    /// Store path from the flag, falling back to the settings.
    pub fn store_path(&self, flag: Option<&Path>) -> Option<PathBuf> {
        flag.map(Path::to_path_buf).or_else(|| self.store.clone())
    }

    pub fn sync_config(
        &self,
        degraded_flag: Option<DegradedMode>,
        timeout_flag: Option<u64>,
    ) -> Result<SyncConfig, String> {
        let degraded_mode = match (degraded_flag, self.sync.degraded_mode.as_deref()) {
            (Some(mode), _) => mode,
            (None, Some(text)) => text
                .parse()
                .map_err(|e| format!("invalid degraded_mode in settings: {}", e))?,
            (None, None) => DegradedMode::Disabled,
        };
        let fetch_timeout = timeout_flag
            .or(self.sync.fetch_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_FETCH_TIMEOUT);
        if fetch_timeout.is_zero() {
            return Err("fetch timeout must be at least one second".to_string());
        }
        Ok(SyncConfig {
            fetch_timeout,
            degraded_mode,
        })
    }

    /// Connection settings of the scheduling API, if a URL is configured.
    pub fn http_source(&self, timeout: Duration) -> Option<HttpSourceConfig> {
        let base_url = self.source.url.clone()?;
        Some(HttpSourceConfig {
            base_url,
            api_key: self.source.api_key.clone().unwrap_or_default(),
            company_id: self.source.company_id.clone(),
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn file_settings_parse() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
store = "rosters.json"

[source]
url = "https://scheduling.example.com/api"
api_key = "k"

[sync]
fetch_timeout_secs = 20
degraded_mode = "seeded:7"
"#
        )
        .unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.store, Some(PathBuf::from("rosters.json")));
        assert_eq!(settings.source.company_id, None);

        let config = settings.sync_config(None, None).unwrap();
        assert_eq!(config.fetch_timeout, Duration::from_secs(20));
        assert_eq!(config.degraded_mode, DegradedMode::Seeded(7));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[source]\nendpoint = \"x\"").unwrap();
        let err = Settings::from_file(file.path()).unwrap_err();
        assert!(err.contains("error parsing config"), "{}", err);
    }

    #[test]
    fn env_overrides_file_and_flags_override_env() {
        let mut settings = Settings {
            sync: SyncSettings {
                fetch_timeout_secs: Some(20),
                degraded_mode: Some("random".to_string()),
            },
            ..Settings::default()
        };
        settings.overlay_env(env(&[
            ("ROSTER_FETCH_TIMEOUT_SECS", "5"),
            ("ROSTER_SOURCE_URL", "http://localhost:8080"),
            ("ROSTER_DEGRADED_MODE", ""),
        ]));
        assert_eq!(settings.source.url.as_deref(), Some("http://localhost:8080"));

        let config = settings.sync_config(None, None).unwrap();
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert_eq!(config.degraded_mode, DegradedMode::Random);

        let config = settings
            .sync_config(Some(DegradedMode::Disabled), Some(9))
            .unwrap();
        assert_eq!(config.fetch_timeout, Duration::from_secs(9));
        assert_eq!(config.degraded_mode, DegradedMode::Disabled);
    }

    #[test]
    fn defaults_without_any_layer() {
        let config = Settings::default().sync_config(None, None).unwrap();
        assert_eq!(config, SyncConfig::default());
        assert!(Settings::default().http_source(DEFAULT_FETCH_TIMEOUT).is_none());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(Settings::default().sync_config(None, Some(0)).is_err());
    }

    #[test]
    fn bad_degraded_mode_in_settings_is_reported() {
        let settings = Settings {
            sync: SyncSettings {
                degraded_mode: Some("sometimes".to_string()),
                ..SyncSettings::default()
            },
            ..Settings::default()
        };
        let err = settings.sync_config(None, None).unwrap_err();
        assert!(err.contains("sometimes"), "{}", err);
    }
}
