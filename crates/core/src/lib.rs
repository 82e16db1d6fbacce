//! roster-core: domain types shared by the roster store, the source
//! adapters and the reconciliation engine.
//!
//! Nothing in this crate performs I/O. It provides:
//!
//! - [`Period`] -- a validated (year, month) pair with calendar arithmetic
//! - [`ShiftFields`] -- the comparable payload of one day's assignment
//! - [`ExternalShift`] / [`SourceRoster`] -- the shape delivered by a source
//! - [`RosterStatus`] -- roster lifecycle with its allowed transitions
//! - [`SyncSummary`] / [`SyncResult`] -- the caller-facing outcome of a sync run

pub mod period;
pub mod roster;
pub mod serde_fmt;
pub mod shift;
pub mod summary;

pub use period::{Period, PeriodError, MAX_YEAR, MIN_YEAR};
pub use roster::{RosterStatus, TransitionError};
pub use shift::{
    AssignmentStatus, ExternalShift, RejectedShift, ShiftFields, ShiftKind, SourceRoster,
};
pub use summary::{RosterRef, SyncResult, SyncSummary};

/// Identifier of an employee as known to the portal.
pub type EmployeeId = String;

/// Store-assigned identifier of a roster or an assignment row.
pub type RecordId = u64;
