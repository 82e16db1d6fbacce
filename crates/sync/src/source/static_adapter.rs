//! Static source adapter -- serves rosters that were handed to it up front.
//!
//! Used by tests and by the CLI's `--source-file` option, where the month is
//! read from a JSON file instead of the scheduling API.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use roster_core::{Period, SourceRoster};

use super::SourceAdapter;
use crate::error::SourceError;

/// Adapter that returns pre-populated rosters.
///
/// Lookup order:
/// 1. The roster registered for `(employee_id, period)`
/// 2. The catch-all roster, if one was set
///
/// Anything else is reported as `SourceError::Unavailable`.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    rosters: HashMap<(String, Period), SourceRoster>,
    catch_all: Option<SourceRoster>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source that answers every request with `roster`.
    pub fn serving(roster: SourceRoster) -> Self {
        StaticSource {
            rosters: HashMap::new(),
            catch_all: Some(roster),
        }
    }

    /// Register the month returned for one employee and period.
    pub fn with_roster(mut self, employee_id: &str, period: Period, roster: SourceRoster) -> Self {
        self.rosters
            .insert((employee_id.to_string(), period), roster);
        self
    }

    /// Load a catch-all roster from a JSON file shaped like the API payload
    /// (`{"reference": ..., "shifts": [...]}`).
    pub fn from_json_file(path: &Path) -> Result<Self, SourceError> {
        let text = std::fs::read_to_string(path).map_err(|e| SourceError::Config {
            message: format!("cannot read source file '{}': {}", path.display(), e),
        })?;
        let roster: SourceRoster =
            serde_json::from_str(&text).map_err(|e| SourceError::InvalidPayload {
                adapter_id: "static".to_string(),
                message: format!("'{}': {}", path.display(), e),
            })?;
        Ok(Self::serving(roster))
    }
}

#[async_trait]
impl SourceAdapter for StaticSource {
    async fn fetch(&self, employee_id: &str, period: Period) -> Result<SourceRoster, SourceError> {
        self.rosters
            .get(&(employee_id.to_string(), period))
            .or(self.catch_all.as_ref())
            .cloned()
            .ok_or_else(|| SourceError::Unavailable {
                adapter_id: self.adapter_id().to_string(),
                message: format!("no roster for employee {} in {}", employee_id, period),
            })
    }

    fn adapter_id(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{ExternalShift, ShiftKind};
    use std::io::Write;
    use time::macros::date;

    fn one_shift_roster(reference: &str) -> SourceRoster {
        SourceRoster {
            reference: Some(reference.to_string()),
            shifts: vec![ExternalShift {
                date: date!(2024 - 02 - 01),
                start_time: None,
                end_time: None,
                kind: ShiftKind::Rest,
                service: None,
                location: None,
                status: Default::default(),
                external_id: None,
            }],
            rejected: Vec::new(),
        }
    }

    #[tokio::test]
    async fn registered_roster_wins_over_catch_all() {
        let feb = Period::new(2024, 2).unwrap();
        let source = StaticSource::serving(one_shift_roster("any"))
            .with_roster("e1", feb, one_shift_roster("e1-feb"));

        let own = source.fetch("e1", feb).await.unwrap();
        assert_eq!(own.reference.as_deref(), Some("e1-feb"));
        let other = source.fetch("e2", feb).await.unwrap();
        assert_eq!(other.reference.as_deref(), Some("any"));
    }

    #[tokio::test]
    async fn unknown_key_is_unavailable() {
        let feb = Period::new(2024, 2).unwrap();
        let result = StaticSource::new().fetch("e1", feb).await;
        assert!(matches!(result, Err(SourceError::Unavailable { .. })));
    }

    #[test]
    fn loads_api_shaped_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"reference":"OCT-20242-e1","shifts":[{{"date":"2024-02-03","startTime":"07:00:00","endTime":"15:00:00","shiftType":"morning","service":"Service A","location":"Floor 1","status":"confirmed","octimeId":"X"}}]}}"#
        )
        .unwrap();
        let source = StaticSource::from_json_file(file.path()).unwrap();
        let roster = source.catch_all.unwrap();
        assert_eq!(roster.shifts.len(), 1);
        assert_eq!(roster.shifts[0].kind, ShiftKind::Morning);
        assert_eq!(roster.shifts[0].external_id.as_deref(), Some("X"));
    }

    #[test]
    fn malformed_file_is_invalid_payload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2").unwrap();
        assert!(matches!(
            StaticSource::from_json_file(file.path()),
            Err(SourceError::InvalidPayload { .. })
        ));
    }
}
