use roster_core::RecordId;
use time::Date;

/// All errors that can be returned by a RosterStore implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A roster already exists for this (employee, year, month).
    #[error("roster already exists for employee {employee_id} in {year}-{month:02}")]
    RosterAlreadyExists {
        employee_id: String,
        year: i32,
        month: u32,
    },

    /// An assignment already exists for this (employee, roster, date).
    #[error("assignment already exists for employee {employee_id} on {date} (roster {roster_id})")]
    AssignmentAlreadyExists {
        employee_id: String,
        roster_id: RecordId,
        date: Date,
    },

    /// No roster with this id belongs to the employee.
    #[error("roster not found: {employee_id}/{roster_id}")]
    RosterNotFound {
        employee_id: String,
        roster_id: RecordId,
    },

    /// No assignment with this id belongs to the employee.
    #[error("assignment not found: {employee_id}/{assignment_id}")]
    AssignmentNotFound {
        employee_id: String,
        assignment_id: RecordId,
    },

    /// The stored data does not describe a valid roster period.
    #[error("invalid roster period: {0}")]
    InvalidPeriod(#[from] roster_core::PeriodError),

    /// A backend-specific storage error (I/O, serialization, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}
