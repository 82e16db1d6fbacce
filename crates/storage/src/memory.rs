//! In-memory `RosterStore` backend.

use async_trait::async_trait;
use roster_core::{Period, RecordId};
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;

use crate::error::StorageError;
use crate::record::{NewAssignment, NewRoster, RosterRecord, ShiftAssignmentRecord};
use crate::state::StoreState;
use crate::RosterStore;

/// A `RosterStore` that keeps every table in process memory.
///
/// Each call takes the table lock once, so individual writes are atomic and
/// uniqueness checks cannot race.
#[derive(Debug, Default)]
pub struct MemoryRosterStore {
    state: Mutex<StoreState>,
}

impl MemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RosterStore for MemoryRosterStore {
    async fn find_roster(
        &self,
        employee_id: &str,
        period: Period,
    ) -> Result<Option<RosterRecord>, StorageError> {
        Ok(self.state.lock().await.find_roster(employee_id, period))
    }

    async fn get_roster(
        &self,
        employee_id: &str,
        roster_id: RecordId,
    ) -> Result<RosterRecord, StorageError> {
        self.state.lock().await.get_roster(employee_id, roster_id)
    }

    async fn create_roster(&self, roster: NewRoster) -> Result<RosterRecord, StorageError> {
        self.state.lock().await.create_roster(roster)
    }

    async fn update_roster(&self, roster: &RosterRecord) -> Result<(), StorageError> {
        self.state.lock().await.update_roster(roster)
    }

    async fn touch_roster(
        &self,
        employee_id: &str,
        roster_id: RecordId,
        at: OffsetDateTime,
    ) -> Result<(), StorageError> {
        self.state
            .lock()
            .await
            .touch_roster(employee_id, roster_id, at)
    }

    async fn find_assignment(
        &self,
        employee_id: &str,
        roster_id: RecordId,
        date: Date,
    ) -> Result<Option<ShiftAssignmentRecord>, StorageError> {
        Ok(self
            .state
            .lock()
            .await
            .find_assignment(employee_id, roster_id, date))
    }

    async fn list_assignments(
        &self,
        employee_id: &str,
        roster_id: RecordId,
    ) -> Result<Vec<ShiftAssignmentRecord>, StorageError> {
        Ok(self
            .state
            .lock()
            .await
            .list_assignments(employee_id, roster_id))
    }

    async fn list_upcoming(
        &self,
        employee_id: &str,
        from: Date,
        limit: usize,
    ) -> Result<Vec<ShiftAssignmentRecord>, StorageError> {
        Ok(self
            .state
            .lock()
            .await
            .list_upcoming(employee_id, from, limit))
    }

    async fn create_assignment(
        &self,
        assignment: NewAssignment,
    ) -> Result<ShiftAssignmentRecord, StorageError> {
        self.state.lock().await.create_assignment(assignment)
    }

    async fn update_assignment(
        &self,
        assignment: &ShiftAssignmentRecord,
    ) -> Result<(), StorageError> {
        self.state.lock().await.update_assignment(assignment)
    }
}
