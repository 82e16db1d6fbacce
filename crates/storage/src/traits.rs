use async_trait::async_trait;
use roster_core::{Period, RecordId};
use time::{Date, OffsetDateTime};

use crate::error::StorageError;
use crate::record::{NewAssignment, NewRoster, RosterRecord, ShiftAssignmentRecord};

/// The persistence boundary for rosters and their daily assignments.
///
/// Every operation is scoped to a single employee: a record that exists but
/// belongs to another employee is reported exactly like a missing one.
///
/// ## Atomicity
///
/// Each create or update call is atomic on its own row. The store offers no
/// multi-row transaction; callers that issue a sequence of writes must
/// tolerate a prefix of that sequence having been applied when a later call
/// fails.
///
/// ## Uniqueness
///
/// - at most one roster per `(employee_id, year, month)`:
///   `create_roster` returns `Err(StorageError::RosterAlreadyExists)` otherwise
/// - at most one assignment per `(employee_id, roster_id, date)`:
///   `create_assignment` returns `Err(StorageError::AssignmentAlreadyExists)`
///
/// ## Updates
///
/// `update_roster` and `update_assignment` replace the mutable fields of the
/// stored row identified by `id`. Natural-key fields (employee, period,
/// roster, date) are never rewritten. `touch_roster` changes the sync stamp
/// alone, so it cannot undo a concurrent publish or signature.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync + 'static` to be shared across async
/// task boundaries.
#[async_trait]
pub trait RosterStore: Send + Sync + 'static {
    // ── Rosters ───────────────────────────────────────────────────────────────

    /// Look up the roster of `employee_id` for `period`.
    async fn find_roster(
        &self,
        employee_id: &str,
        period: Period,
    ) -> Result<Option<RosterRecord>, StorageError>;

    /// Read a roster by id.
    ///
    /// Returns `Err(StorageError::RosterNotFound)` if it does not exist.
    async fn get_roster(
        &self,
        employee_id: &str,
        roster_id: RecordId,
    ) -> Result<RosterRecord, StorageError>;

    /// Create a roster and return it with its assigned id.
    async fn create_roster(&self, roster: NewRoster) -> Result<RosterRecord, StorageError>;

    /// Replace the mutable fields of an existing roster.
    async fn update_roster(&self, roster: &RosterRecord) -> Result<(), StorageError>;

    /// Set only `last_synced_at` of a roster. Status, signature and document
    /// fields are left as stored, whatever the caller last read.
    ///
    /// Returns `Err(StorageError::RosterNotFound)` if it does not exist.
    async fn touch_roster(
        &self,
        employee_id: &str,
        roster_id: RecordId,
        at: OffsetDateTime,
    ) -> Result<(), StorageError>;

    // ── Assignments ───────────────────────────────────────────────────────────

    /// Look up the assignment for one date of a roster.
    async fn find_assignment(
        &self,
        employee_id: &str,
        roster_id: RecordId,
        date: Date,
    ) -> Result<Option<ShiftAssignmentRecord>, StorageError>;

    /// All assignments of a roster, ordered by date.
    ///
    /// An unknown roster yields an empty list.
    async fn list_assignments(
        &self,
        employee_id: &str,
        roster_id: RecordId,
    ) -> Result<Vec<ShiftAssignmentRecord>, StorageError>;

    /// Working (non-rest) assignments dated on or after `from`, across all of
    /// the employee's rosters, ordered by date then start time.
    ///
    /// - `limit`: maximum number of results (0 = no limit)
    async fn list_upcoming(
        &self,
        employee_id: &str,
        from: Date,
        limit: usize,
    ) -> Result<Vec<ShiftAssignmentRecord>, StorageError>;

    /// Create an assignment and return it with its assigned id.
    ///
    /// Returns `Err(StorageError::RosterNotFound)` if the parent roster does
    /// not belong to `assignment.employee_id`.
    async fn create_assignment(
        &self,
        assignment: NewAssignment,
    ) -> Result<ShiftAssignmentRecord, StorageError>;

    /// Replace the fields, external id and sync stamp of an assignment.
    async fn update_assignment(
        &self,
        assignment: &ShiftAssignmentRecord,
    ) -> Result<(), StorageError>;
}
