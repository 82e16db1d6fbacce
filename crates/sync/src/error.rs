use std::fmt;
use std::time::Duration;

use roster_core::{PeriodError, RecordId, SyncSummary, TransitionError};
use roster_storage::StorageError;

use crate::signing::{ArchiveError, SigningError};

// ──────────────────────────────────────────────
// SourceError
// ──────────────────────────────────────────────

/// Errors that can occur when a source adapter fetches a month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The source could not be reached or answered with an error status.
    Unavailable { adapter_id: String, message: String },
    /// The fetch did not complete within the configured bound.
    Timeout { adapter_id: String, after: Duration },
    /// The source answered but the payload is not a roster.
    InvalidPayload { adapter_id: String, message: String },
    /// The adapter is missing its URL, credentials or similar.
    Config { message: String },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Unavailable {
                adapter_id,
                message,
            } => write!(f, "source '{}' unavailable: {}", adapter_id, message),
            SourceError::Timeout { adapter_id, after } => write!(
                f,
                "source '{}' timed out after {} ms",
                adapter_id,
                after.as_millis()
            ),
            SourceError::InvalidPayload {
                adapter_id,
                message,
            } => write!(f, "source '{}' sent an invalid roster: {}", adapter_id, message),
            SourceError::Config { message } => write!(f, "source config error: {}", message),
        }
    }
}

impl std::error::Error for SourceError {}

// ──────────────────────────────────────────────
// SyncError
// ──────────────────────────────────────────────

/// Caller-visible failure of one sync run.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Rejected before any fetch or write.
    #[error("invalid roster period: {0}")]
    InvalidPeriod(#[from] PeriodError),

    /// Another run for the same (employee, year, month) is still in flight.
    #[error("a sync for employee {employee_id} in {year}-{month:02} is already running")]
    ConflictInFlight {
        employee_id: String,
        year: i32,
        month: u32,
    },

    /// The fetch failed or timed out and no fallback was configured.
    /// Nothing was written.
    #[error("roster source unavailable: {0}")]
    SourceUnavailable(#[source] SourceError),

    /// A store call failed mid-run. Writes issued before the failure stay in
    /// place; `partial` counts the days that were fully processed.
    #[error(
        "roster store failed after {} processed days: {source}",
        .partial.processed()
    )]
    Persistence {
        source: StorageError,
        partial: SyncSummary,
    },
}

impl SyncError {
    pub(crate) fn store(source: StorageError, partial: SyncSummary) -> Self {
        SyncError::Persistence { source, partial }
    }
}

// ──────────────────────────────────────────────
// RosterError
// ──────────────────────────────────────────────

/// Failures of the roster read and lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("invalid roster period: {0}")]
    InvalidPeriod(#[from] PeriodError),

    #[error("roster not found: {employee_id}/{roster_id}")]
    RosterNotFound {
        employee_id: String,
        roster_id: RecordId,
    },

    #[error("roster {roster_id} is already signed")]
    AlreadySigned { roster_id: RecordId },

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("roster store failed: {0}")]
    Storage(#[source] StorageError),
}

impl From<StorageError> for RosterError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::RosterNotFound {
                employee_id,
                roster_id,
            } => RosterError::RosterNotFound {
                employee_id,
                roster_id,
            },
            other => RosterError::Storage(other),
        }
    }
}
