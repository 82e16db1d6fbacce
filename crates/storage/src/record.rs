use roster_core::serde_fmt;
use roster_core::{Period, PeriodError, RecordId, RosterStatus, ShiftFields};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// One employee's roster for one calendar month, as stored.
///
/// `(employee_id, year, month)` is the natural key and never changes after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRecord {
    pub id: RecordId,
    pub employee_id: String,
    pub year: i32,
    pub month: u32,
    pub status: RosterStatus,
    #[serde(default, with = "serde_fmt::timestamp::option")]
    pub last_synced_at: Option<OffsetDateTime>,
    /// Reference of this month in the external scheduling system.
    pub external_reference: Option<String>,
    /// Identifier of the signed document, once the roster has been signed.
    pub document_id: Option<String>,
    pub signature_id: Option<String>,
    #[serde(default, with = "serde_fmt::timestamp::option")]
    pub signed_at: Option<OffsetDateTime>,
}

impl RosterRecord {
    pub fn period(&self) -> Result<Period, PeriodError> {
        Period::new(self.year, self.month)
    }
}

/// Input for [`RosterStore::create_roster`](crate::RosterStore::create_roster).
#[derive(Debug, Clone)]
pub struct NewRoster {
    pub employee_id: String,
    pub period: Period,
    pub status: RosterStatus,
    pub external_reference: Option<String>,
}

/// One day of a roster, as stored.
///
/// `(employee_id, roster_id, date)` is the natural key and never changes after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignmentRecord {
    pub id: RecordId,
    pub roster_id: RecordId,
    pub employee_id: String,
    #[serde(with = "serde_fmt::date")]
    pub date: Date,
    #[serde(flatten)]
    pub fields: ShiftFields,
    pub external_id: Option<String>,
    #[serde(default, with = "serde_fmt::timestamp::option")]
    pub last_synced_at: Option<OffsetDateTime>,
}

/// Input for [`RosterStore::create_assignment`](crate::RosterStore::create_assignment).
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub roster_id: RecordId,
    pub employee_id: String,
    pub date: Date,
    pub fields: ShiftFields,
    pub external_id: Option<String>,
    pub last_synced_at: OffsetDateTime,
}
