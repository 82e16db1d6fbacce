//! Shift kinds, assignment statuses and the comparable field set of a day.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Date, Time};

use crate::serde_fmt;

/// The kind of work scheduled on a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftKind {
    Morning,
    Afternoon,
    Night,
    Rest,
}

impl ShiftKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftKind::Morning => "morning",
            ShiftKind::Afternoon => "afternoon",
            ShiftKind::Night => "night",
            ShiftKind::Rest => "rest",
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, ShiftKind::Rest)
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShiftKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "morning" => Ok(ShiftKind::Morning),
            "afternoon" => Ok(ShiftKind::Afternoon),
            "night" => Ok(ShiftKind::Night),
            "rest" => Ok(ShiftKind::Rest),
            other => Err(format!("unknown shift kind '{}'", other)),
        }
    }
}

/// Status of a single day's assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    #[default]
    Draft,
    Confirmed,
    Pending,
    Modified,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Draft => "draft",
            AssignmentStatus::Confirmed => "confirmed",
            AssignmentStatus::Pending => "pending",
            AssignmentStatus::Modified => "modified",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fields of an assignment that reconciliation compares and overwrites.
///
/// Values are only meaningful once [`normalized`](Self::normalized): clock
/// times truncated to the minute, labels trimmed with blanks dropped, and a
/// `rest` day stripped of times and labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftFields {
    #[serde(default, with = "serde_fmt::clock")]
    pub start_time: Option<Time>,
    #[serde(default, with = "serde_fmt::clock")]
    pub end_time: Option<Time>,
    pub kind: ShiftKind,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub status: AssignmentStatus,
}

impl ShiftFields {
    /// A confirmed rest day: no times, no service, no location.
    pub fn rest() -> Self {
        ShiftFields {
            start_time: None,
            end_time: None,
            kind: ShiftKind::Rest,
            service: None,
            location: None,
            status: AssignmentStatus::Confirmed,
        }
    }

    pub fn normalized(self) -> Self {
        if self.kind.is_rest() {
            return ShiftFields {
                start_time: None,
                end_time: None,
                kind: ShiftKind::Rest,
                service: None,
                location: None,
                status: self.status,
            };
        }
        ShiftFields {
            start_time: self.start_time.map(serde_fmt::truncate_to_minute),
            end_time: self.end_time.map(serde_fmt::truncate_to_minute),
            kind: self.kind,
            service: normalize_label(self.service),
            location: normalize_label(self.location),
            status: self.status,
        }
    }
}

fn normalize_label(label: Option<String>) -> Option<String> {
    label
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// One day of schedule data as delivered by an external source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalShift {
    #[serde(with = "serde_fmt::date")]
    pub date: Date,
    #[serde(default, with = "serde_fmt::clock")]
    pub start_time: Option<Time>,
    #[serde(default, with = "serde_fmt::clock")]
    pub end_time: Option<Time>,
    #[serde(rename = "shiftType", alias = "kind")]
    pub kind: ShiftKind,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub status: AssignmentStatus,
    #[serde(default, alias = "octimeId")]
    pub external_id: Option<String>,
}

impl ExternalShift {
    /// The normalized comparable fields of this entry.
    pub fn fields(&self) -> ShiftFields {
        ShiftFields {
            start_time: self.start_time,
            end_time: self.end_time,
            kind: self.kind,
            service: self.service.clone(),
            location: self.location.clone(),
            status: self.status,
        }
        .normalized()
    }
}

/// A month of schedule data for one employee, as fetched from a source.
///
/// Reading is per entry: an entry that does not parse (an impossible date
/// such as `2024-02-30`, an unknown shift type) lands in `rejected` instead
/// of failing the month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawSourceRoster")]
pub struct SourceRoster {
    /// Source-side reference for the whole month, if the source has one.
    pub reference: Option<String>,
    pub shifts: Vec<ExternalShift>,
    #[serde(skip)]
    pub rejected: Vec<RejectedShift>,
}

/// A source entry that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedShift {
    /// The entry's `date` text, when it had one.
    pub date: Option<String>,
    pub reason: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSourceRoster {
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    shifts: Vec<serde_json::Value>,
}

impl From<RawSourceRoster> for SourceRoster {
    fn from(raw: RawSourceRoster) -> Self {
        let mut shifts = Vec::with_capacity(raw.shifts.len());
        let mut rejected = Vec::new();
        for entry in raw.shifts {
            let date = entry
                .get("date")
                .and_then(|d| d.as_str())
                .map(str::to_string);
            match serde_json::from_value::<ExternalShift>(entry) {
                Ok(shift) => shifts.push(shift),
                Err(e) => rejected.push(RejectedShift {
                    date,
                    reason: e.to_string(),
                }),
            }
        }
        SourceRoster {
            reference: raw.reference,
            shifts,
            rejected,
        }
    }
}

impl SourceRoster {
    pub fn new(shifts: Vec<ExternalShift>) -> Self {
        SourceRoster {
            reference: None,
            shifts,
            rejected: Vec::new(),
        }
    }
}
