//! One sync run per (employee, year, month).
//!
//! The coordinator validates the period, holds an exclusivity token for the
//! key while the run is in flight, fetches with a bounded timeout, falls back
//! to a synthetic month when degraded mode allows it, then finds or creates
//! the roster and reconciles it.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use roster_core::{Period, RosterRef, RosterStatus, SourceRoster, SyncResult, SyncSummary};
use roster_storage::{NewRoster, RosterRecord, RosterStore, StorageError};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::config::{DegradedMode, SyncConfig};
use crate::engine;
use crate::error::{SourceError, SyncError};
use crate::notify::{Notifier, RosterEvent, TracingNotifier};
use crate::source::synthetic::SyntheticSource;
use crate::source::{default_reference, SourceAdapter};

type SyncKey = (String, Period);

/// Releases its key when dropped, whatever way the run ends.
struct InFlightGuard {
    keys: Arc<Mutex<HashSet<SyncKey>>>,
    key: SyncKey,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        // Recover even if another task panicked while holding the lock
        self.keys
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.key);
    }
}

pub struct SyncCoordinator<S: RosterStore> {
    store: Arc<S>,
    source: Arc<dyn SourceAdapter>,
    fallback: Option<Arc<dyn SourceAdapter>>,
    notifier: Arc<dyn Notifier>,
    config: SyncConfig,
    in_flight: Arc<Mutex<HashSet<SyncKey>>>,
}

impl<S: RosterStore> SyncCoordinator<S> {
    /// The fallback follows `config.degraded_mode`; notifications go to the
    /// log until [`with_notifier`](Self::with_notifier) replaces them.
    pub fn new(store: Arc<S>, source: Arc<dyn SourceAdapter>, config: SyncConfig) -> Self {
        let fallback: Option<Arc<dyn SourceAdapter>> = match config.degraded_mode {
            DegradedMode::Disabled => None,
            DegradedMode::Random => Some(Arc::new(SyntheticSource::random())),
            DegradedMode::Seeded(seed) => Some(Arc::new(SyntheticSource::seeded(seed))),
        };
        SyncCoordinator {
            store,
            source,
            fallback,
            notifier: Arc::new(TracingNotifier),
            config,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Synchronize one employee's month from the source into the store.
    pub async fn sync_employee_roster(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> Result<SyncResult, SyncError> {
        let period = Period::new(year, month)?;
        let _guard = self.acquire(employee_id, period)?;
        let sync_id = new_sync_id();

        info!(
            sync_id = %sync_id,
            employee_id,
            period = %period,
            source = self.source.adapter_id(),
            "roster sync started"
        );

        let fetched = self.fetch(&sync_id, employee_id, period).await?;
        let roster = self.find_or_create_roster(employee_id, period, &fetched).await?;
        let summary = engine::reconcile(
            self.store.as_ref(),
            &roster,
            &fetched,
            OffsetDateTime::now_utc(),
        )
        .await
        .map_err(|e| {
            if let SyncError::Persistence { source, partial } = &e {
                warn!(
                    sync_id = %sync_id,
                    error = %source,
                    created = partial.created,
                    updated = partial.updated,
                    unchanged = partial.unchanged,
                    "roster sync aborted by the store"
                );
            }
            e
        })?;

        info!(
            sync_id = %sync_id,
            roster_id = roster.id,
            total = summary.total_shifts,
            created = summary.created,
            updated = summary.updated,
            unchanged = summary.unchanged,
            "roster sync finished"
        );

        self.notify(
            employee_id,
            RosterEvent::RosterSynced {
                year,
                month,
                summary,
            },
        );

        Ok(SyncResult {
            sync_id,
            roster: RosterRef {
                id: roster.id,
                month,
                year,
            },
            summary,
        })
    }

    fn acquire(&self, employee_id: &str, period: Period) -> Result<InFlightGuard, SyncError> {
        let key = (employee_id.to_string(), period);
        let mut keys = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !keys.insert(key.clone()) {
            warn!(employee_id, period = %period, "rejecting sync already in flight");
            return Err(SyncError::ConflictInFlight {
                employee_id: employee_id.to_string(),
                year: period.year(),
                month: period.month(),
            });
        }
        Ok(InFlightGuard {
            keys: Arc::clone(&self.in_flight),
            key,
        })
    }

    async fn fetch(
        &self,
        sync_id: &str,
        employee_id: &str,
        period: Period,
    ) -> Result<SourceRoster, SyncError> {
        let timeout = self.config.fetch_timeout;
        let primary = match tokio::time::timeout(timeout, self.source.fetch(employee_id, period))
            .await
        {
            Ok(result) => result,
            Err(_elapsed) => Err(SourceError::Timeout {
                adapter_id: self.source.adapter_id().to_string(),
                after: timeout,
            }),
        };

        let error = match primary {
            Ok(roster) => return Ok(roster),
            Err(e) => e,
        };

        match &self.fallback {
            Some(fallback) => {
                warn!(
                    sync_id,
                    error = %error,
                    fallback = fallback.adapter_id(),
                    "roster source failed, using degraded dataset"
                );
                fallback
                    .fetch(employee_id, period)
                    .await
                    .map_err(SyncError::SourceUnavailable)
            }
            None => {
                warn!(sync_id, error = %error, "roster source failed");
                Err(SyncError::SourceUnavailable(error))
            }
        }
    }

    async fn find_or_create_roster(
        &self,
        employee_id: &str,
        period: Period,
        fetched: &SourceRoster,
    ) -> Result<RosterRecord, SyncError> {
        let no_progress = |e| SyncError::store(e, SyncSummary::default());

        if let Some(roster) = self
            .store
            .find_roster(employee_id, period)
            .await
            .map_err(no_progress)?
        {
            return Ok(roster);
        }

        let reference = fetched
            .reference
            .clone()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| default_reference(employee_id, period));
        let created = self
            .store
            .create_roster(NewRoster {
                employee_id: employee_id.to_string(),
                period,
                status: RosterStatus::Draft,
                external_reference: Some(reference),
            })
            .await;

        match created {
            Ok(roster) => {
                info!(roster_id = roster.id, employee_id, period = %period, "created roster");
                Ok(roster)
            }
            // Another writer outside this process got there first.
            Err(StorageError::RosterAlreadyExists { .. }) => self
                .store
                .find_roster(employee_id, period)
                .await
                .map_err(no_progress)?
                .ok_or_else(|| {
                    no_progress(StorageError::Backend(format!(
                        "roster for {} in {} vanished after a create conflict",
                        employee_id, period
                    )))
                }),
            Err(e) => Err(no_progress(e)),
        }
    }

    fn notify(&self, employee_id: &str, event: RosterEvent) {
        let notifier = Arc::clone(&self.notifier);
        let employee_id = employee_id.to_string();
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&employee_id, &event).await {
                warn!(employee_id = %employee_id, error = %e, "roster notification failed");
            }
        });
    }
}

/// `sync_` followed by 16 random hex digits.
pub fn new_sync_id() -> String {
    format!("sync_{:016x}", rand::random::<u64>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_id_shape() {
        let id = new_sync_id();
        assert_eq!(id.len(), 21);
        assert!(id.starts_with("sync_"));
        assert!(id[5..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn sync_ids_differ() {
        assert_ne!(new_sync_id(), new_sync_id());
    }
}
