//! Employee-facing roster operations built on the coordinator: the monthly
//! view (syncing on demand), upcoming shifts, publishing and signing.

use std::sync::Arc;

use roster_core::{Period, RecordId, RosterStatus};
use roster_storage::{RosterRecord, RosterStore, ShiftAssignmentRecord};
use serde::Serialize;
use time::{Date, OffsetDateTime};
use tracing::{info, warn};

use crate::coordinator::SyncCoordinator;
use crate::error::{RosterError, SyncError};
use crate::signing::{DocumentArchive, DocumentDescriptor, RosterSigner};

/// Number of shifts `upcoming_shifts` returns when the caller has no opinion.
pub const DEFAULT_UPCOMING_COUNT: usize = 5;

/// A roster with its days, as shown to the employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyRoster {
    /// `None` when the month has never been synchronized.
    pub roster: Option<RosterRecord>,
    pub assignments: Vec<ShiftAssignmentRecord>,
}

pub struct RosterService<S: RosterStore> {
    store: Arc<S>,
    coordinator: SyncCoordinator<S>,
}

impl<S: RosterStore> RosterService<S> {
    pub fn new(coordinator: SyncCoordinator<S>) -> Self {
        RosterService {
            store: Arc::clone(coordinator.store()),
            coordinator,
        }
    }

    pub fn coordinator(&self) -> &SyncCoordinator<S> {
        &self.coordinator
    }

    /// The month's roster and its days. A month with no stored days is
    /// synchronized first; if that sync fails, whatever is stored is returned.
    pub async fn monthly_roster(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> Result<MonthlyRoster, RosterError> {
        let period = Period::new(year, month)?;

        let current = self.load(employee_id, period).await?;
        if !current.assignments.is_empty() {
            return Ok(current);
        }

        match self
            .coordinator
            .sync_employee_roster(employee_id, year, month)
            .await
        {
            Ok(result) => {
                info!(sync_id = %result.sync_id, employee_id, period = %period, "synchronized on demand");
                self.load(employee_id, period).await
            }
            Err(SyncError::InvalidPeriod(e)) => Err(e.into()),
            Err(e) => {
                warn!(employee_id, period = %period, error = %e, "on-demand sync failed, returning stored data");
                self.load(employee_id, period).await
            }
        }
    }

    async fn load(&self, employee_id: &str, period: Period) -> Result<MonthlyRoster, RosterError> {
        let roster = self.store.find_roster(employee_id, period).await?;
        let assignments = match &roster {
            Some(r) => self.store.list_assignments(employee_id, r.id).await?,
            None => Vec::new(),
        };
        Ok(MonthlyRoster {
            roster,
            assignments,
        })
    }

    /// The next `count` working days on or after `from`, across months.
    pub async fn upcoming_shifts(
        &self,
        employee_id: &str,
        from: Date,
        count: usize,
    ) -> Result<Vec<ShiftAssignmentRecord>, RosterError> {
        Ok(self.store.list_upcoming(employee_id, from, count).await?)
    }

    /// Move a draft roster to `published`.
    pub async fn publish_roster(
        &self,
        employee_id: &str,
        roster_id: RecordId,
    ) -> Result<RosterRecord, RosterError> {
        let mut roster = self.store.get_roster(employee_id, roster_id).await?;
        roster.status = roster.status.publish()?;
        self.store.update_roster(&roster).await?;
        info!(roster_id, employee_id, "roster published");
        Ok(roster)
    }

    /// Sign a published roster on behalf of its employee.
    ///
    /// The signer is called first, then the archive; the roster is only
    /// marked signed once both have succeeded.
    pub async fn sign_roster(
        &self,
        signer: &dyn RosterSigner,
        archive: &dyn DocumentArchive,
        employee_id: &str,
        roster_id: RecordId,
        payload: &serde_json::Value,
    ) -> Result<RosterRecord, RosterError> {
        let mut roster = self.store.get_roster(employee_id, roster_id).await?;
        if roster.status == RosterStatus::Signed {
            return Err(RosterError::AlreadySigned { roster_id });
        }
        let next = roster.status.sign()?;

        let document = DocumentDescriptor::for_roster(roster.id, roster.period()?);
        let signature = signer.sign(&document, employee_id, payload).await?;
        let document_id = archive.archive(&document, &signature).await?;

        roster.status = next;
        roster.signed_at = Some(OffsetDateTime::now_utc());
        roster.signature_id = Some(signature.signature_id);
        roster.document_id = Some(document_id);
        self.store.update_roster(&roster).await?;

        info!(
            roster_id,
            employee_id,
            document_id = roster.document_id.as_deref().unwrap_or_default(),
            "roster signed"
        );
        Ok(roster)
    }
}
