//! Fire-and-forget notification of roster events.
//!
//! The coordinator spawns the notifier after a successful sync and never
//! waits for it; a failure is logged and otherwise ignored.

use async_trait::async_trait;
use roster_core::SyncSummary;
use serde::Serialize;

/// Events a notifier can be told about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RosterEvent {
    #[serde(rename_all = "camelCase")]
    RosterSynced {
        year: i32,
        month: u32,
        summary: SyncSummary,
    },
}

#[derive(Debug, thiserror::Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Delivers roster events to an employee (mail, push, ...).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, employee_id: &str, event: &RosterEvent) -> Result<(), NotifyError>;
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _employee_id: &str, _event: &RosterEvent) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Records every event as an `info` log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, employee_id: &str, event: &RosterEvent) -> Result<(), NotifyError> {
        let payload = serde_json::to_string(event).map_err(|e| NotifyError(e.to_string()))?;
        tracing::info!(employee_id, event = %payload, "roster notification");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synced_event_shape() {
        let event = RosterEvent::RosterSynced {
            year: 2024,
            month: 2,
            summary: SyncSummary {
                total_shifts: 29,
                created: 29,
                updated: 0,
                unchanged: 0,
            },
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({
                "type": "rosterSynced",
                "year": 2024,
                "month": 2,
                "summary": {"totalShifts": 29, "created": 29, "updated": 0, "unchanged": 0}
            })
        );
    }

    #[tokio::test]
    async fn builtin_notifiers_succeed() {
        let event = RosterEvent::RosterSynced {
            year: 2024,
            month: 2,
            summary: SyncSummary::default(),
        };
        NoopNotifier.notify("e1", &event).await.unwrap();
        TracingNotifier.notify("e1", &event).await.unwrap();
    }
}
