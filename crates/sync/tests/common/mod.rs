//! Shared fixtures for the roster-sync integration tests: a store that counts
//! and can fail writes, sources that stall or count calls, and a notifier
//! that records what it was told.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use roster_core::{
    AssignmentStatus, ExternalShift, Period, RecordId, ShiftKind, SourceRoster,
};
use roster_storage::{
    MemoryRosterStore, NewAssignment, NewRoster, RosterRecord, RosterStore,
    ShiftAssignmentRecord, StorageError,
};
use roster_sync::{
    Notifier, NotifyError, RosterEvent, SourceAdapter, SourceError, SyncConfig, SyncCoordinator,
};
use time::macros::time;
use time::{Date, OffsetDateTime, Weekday};
use tokio::sync::Notify;

pub fn feb_2024() -> Period {
    Period::new(2024, 2).unwrap()
}

pub fn morning(date: Date, employee_id: &str) -> ExternalShift {
    ExternalShift {
        date,
        start_time: Some(time!(7:00)),
        end_time: Some(time!(15:00)),
        kind: ShiftKind::Morning,
        service: Some("Service A".to_string()),
        location: Some("Floor 1".to_string()),
        status: AssignmentStatus::Confirmed,
        external_id: Some(format!("OCT-SHIFT-{}-{}", date, employee_id)),
    }
}

/// February 2024 with a morning shift on every weekday except the 29th:
/// 20 working days, leaving 9 days for the rest fill.
pub fn feb_2024_source(employee_id: &str) -> SourceRoster {
    let shifts = feb_2024()
        .days()
        .filter(|d| !matches!(d.weekday(), Weekday::Saturday | Weekday::Sunday))
        .filter(|d| d.day() != 29)
        .map(|d| morning(d, employee_id))
        .collect();
    SourceRoster {
        reference: Some(format!("OCT-REF-{}", employee_id)),
        shifts,
        rejected: Vec::new(),
    }
}

pub fn config(timeout: Duration) -> SyncConfig {
    SyncConfig {
        fetch_timeout: timeout,
        ..SyncConfig::default()
    }
}

pub fn coordinator(
    store: &Arc<TestStore>,
    source: impl SourceAdapter + 'static,
    config: SyncConfig,
) -> SyncCoordinator<TestStore> {
    SyncCoordinator::new(Arc::clone(store), Arc::new(source), config)
}

// ── Store ────────────────────────────────────────────────────────────────────

/// A memory store that counts writes and can fail the n-th assignment write.
#[derive(Default)]
pub struct TestStore {
    inner: MemoryRosterStore,
    writes: AtomicUsize,
    assignment_writes: AtomicUsize,
    /// 1-based index of the assignment write that fails; 0 = never.
    fail_at: AtomicUsize,
}

impl TestStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_at(n: usize) -> Arc<Self> {
        let store = Self::default();
        store.fail_at.store(n, Ordering::SeqCst);
        Arc::new(store)
    }

    pub fn heal(&self) {
        self.fail_at.store(0, Ordering::SeqCst);
    }

    /// All successful writes, rosters included.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn assignment_write(&self) -> Result<(), StorageError> {
        let n = self.assignment_writes.fetch_add(1, Ordering::SeqCst) + 1;
        if n == self.fail_at.load(Ordering::SeqCst) {
            return Err(StorageError::Backend(format!("injected failure on write {}", n)));
        }
        Ok(())
    }

    fn wrote<T>(&self, result: Result<T, StorageError>) -> Result<T, StorageError> {
        if result.is_ok() {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        result
    }
}

#[async_trait]
impl RosterStore for TestStore {
    async fn find_roster(
        &self,
        employee_id: &str,
        period: Period,
    ) -> Result<Option<RosterRecord>, StorageError> {
        self.inner.find_roster(employee_id, period).await
    }

    async fn get_roster(
        &self,
        employee_id: &str,
        roster_id: RecordId,
    ) -> Result<RosterRecord, StorageError> {
        self.inner.get_roster(employee_id, roster_id).await
    }

    async fn create_roster(&self, roster: NewRoster) -> Result<RosterRecord, StorageError> {
        let result = self.inner.create_roster(roster).await;
        self.wrote(result)
    }

    async fn update_roster(&self, roster: &RosterRecord) -> Result<(), StorageError> {
        let result = self.inner.update_roster(roster).await;
        self.wrote(result)
    }

    async fn touch_roster(
        &self,
        employee_id: &str,
        roster_id: RecordId,
        at: OffsetDateTime,
    ) -> Result<(), StorageError> {
        let result = self.inner.touch_roster(employee_id, roster_id, at).await;
        self.wrote(result)
    }

    async fn find_assignment(
        &self,
        employee_id: &str,
        roster_id: RecordId,
        date: Date,
    ) -> Result<Option<ShiftAssignmentRecord>, StorageError> {
        self.inner.find_assignment(employee_id, roster_id, date).await
    }

    async fn list_assignments(
        &self,
        employee_id: &str,
        roster_id: RecordId,
    ) -> Result<Vec<ShiftAssignmentRecord>, StorageError> {
        self.inner.list_assignments(employee_id, roster_id).await
    }

    async fn list_upcoming(
        &self,
        employee_id: &str,
        from: Date,
        limit: usize,
    ) -> Result<Vec<ShiftAssignmentRecord>, StorageError> {
        self.inner.list_upcoming(employee_id, from, limit).await
    }

    async fn create_assignment(
        &self,
        assignment: NewAssignment,
    ) -> Result<ShiftAssignmentRecord, StorageError> {
        self.assignment_write()?;
        let result = self.inner.create_assignment(assignment).await;
        self.wrote(result)
    }

    async fn update_assignment(
        &self,
        assignment: &ShiftAssignmentRecord,
    ) -> Result<(), StorageError> {
        self.assignment_write()?;
        let result = self.inner.update_assignment(assignment).await;
        self.wrote(result)
    }
}

// ── Sources ──────────────────────────────────────────────────────────────────

/// Counts fetches before delegating.
pub struct CountingSource<A> {
    inner: A,
    calls: Arc<AtomicUsize>,
}

impl<A> CountingSource<A> {
    pub fn new(inner: A) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            CountingSource {
                inner,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl<A: SourceAdapter> SourceAdapter for CountingSource<A> {
    async fn fetch(&self, employee_id: &str, period: Period) -> Result<SourceRoster, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(employee_id, period).await
    }

    fn adapter_id(&self) -> &str {
        self.inner.adapter_id()
    }
}

/// Sleeps before answering.
pub struct SlowSource {
    pub delay: Duration,
    pub roster: SourceRoster,
}

#[async_trait]
impl SourceAdapter for SlowSource {
    async fn fetch(&self, _employee_id: &str, _period: Period) -> Result<SourceRoster, SourceError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.roster.clone())
    }

    fn adapter_id(&self) -> &str {
        "slow"
    }
}

/// Signals `started` on entry, then waits for `release`.
pub struct GatedSource {
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
    pub roster: SourceRoster,
}

impl GatedSource {
    pub fn new(roster: SourceRoster) -> (Self, Arc<Notify>, Arc<Notify>) {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        (
            GatedSource {
                started: Arc::clone(&started),
                release: Arc::clone(&release),
                roster,
            },
            started,
            release,
        )
    }
}

#[async_trait]
impl SourceAdapter for GatedSource {
    async fn fetch(&self, _employee_id: &str, _period: Period) -> Result<SourceRoster, SourceError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(self.roster.clone())
    }

    fn adapter_id(&self) -> &str {
        "gated"
    }
}

/// Always fails as if the API were down.
pub struct DownSource;

#[async_trait]
impl SourceAdapter for DownSource {
    async fn fetch(&self, _employee_id: &str, _period: Period) -> Result<SourceRoster, SourceError> {
        Err(SourceError::Unavailable {
            adapter_id: "down".to_string(),
            message: "503 Service Unavailable".to_string(),
        })
    }

    fn adapter_id(&self) -> &str {
        "down"
    }
}

// ── Notifiers ────────────────────────────────────────────────────────────────

/// Keeps every event it receives and wakes waiters.
#[derive(Default)]
pub struct RecordingNotifier {
    pub events: Mutex<Vec<(String, RosterEvent)>>,
    pub received: Notify,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, employee_id: &str, event: &RosterEvent) -> Result<(), NotifyError> {
        self.events
            .lock()
            .unwrap()
            .push((employee_id.to_string(), event.clone()));
        self.received.notify_one();
        Ok(())
    }
}

/// Fails every delivery.
pub struct BrokenNotifier;

#[async_trait]
impl Notifier for BrokenNotifier {
    async fn notify(&self, _employee_id: &str, _event: &RosterEvent) -> Result<(), NotifyError> {
        Err(NotifyError("smtp relay refused".to_string()))
    }
}
