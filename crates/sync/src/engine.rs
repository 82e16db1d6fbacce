//! Reconciliation of a fetched month against the stored roster.
//!
//! Runs in two steps:
//!
//! 1. [`plan`] is pure. It decides, for every calendar day of the month,
//!    whether the stored assignment must be created, overwritten or left
//!    alone. Days the source does not mention become rest days.
//! 2. [`apply`] issues the store writes in date order and counts them.
//!
//! ## No month-wide transaction
//!
//! Each write is atomic on its own row and nothing more. If a store call
//! fails, the writes already issued stay in place and the error carries the
//! summary of the days processed so far. Running the same month again
//! converges on the source data, because a day whose stored fields already
//! match is never written.

use std::collections::BTreeMap;

use roster_core::{ExternalShift, Period, ShiftFields, SourceRoster, SyncSummary};
use roster_storage::{NewAssignment, RosterRecord, RosterStore, ShiftAssignmentRecord};
use time::{Date, OffsetDateTime};
use tracing::{debug, warn};

use crate::error::SyncError;

/// What happens to one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayAction {
    /// No stored row yet.
    Create {
        fields: ShiftFields,
        external_id: Option<String>,
    },
    /// The stored row differs; `assignment` already carries the new values.
    Update { assignment: ShiftAssignmentRecord },
    /// The stored row matches; no write.
    Unchanged,
}

impl DayAction {
    fn label(&self) -> &'static str {
        match self {
            DayAction::Create { .. } => "create",
            DayAction::Update { .. } => "update",
            DayAction::Unchanged => "unchanged",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPlan {
    pub date: Date,
    pub action: DayAction,
}

/// Every day of one month, in date order, with the action it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub days: Vec<DayPlan>,
    /// Source entries dropped because a later entry had the same date.
    pub dropped_duplicates: u32,
    /// Source entries dated outside the month.
    pub ignored_out_of_month: u32,
    /// Source entries that could not be read at all.
    pub rejected_entries: u32,
}

impl ReconcilePlan {
    /// The summary `apply` returns when every write succeeds.
    pub fn expected_summary(&self) -> SyncSummary {
        let mut summary = SyncSummary::default();
        for day in &self.days {
            count(&mut summary, &day.action);
        }
        summary
    }
}

fn count(summary: &mut SyncSummary, action: &DayAction) {
    summary.total_shifts += 1;
    match action {
        DayAction::Create { .. } => summary.created += 1,
        DayAction::Update { .. } => summary.updated += 1,
        DayAction::Unchanged => summary.unchanged += 1,
    }
}

/// Decide the action for every day of `period`.
///
/// - Source entries outside `period` are ignored.
/// - When the source lists a date more than once, the last entry wins.
/// - Fields are compared after normalization; the external id alone never
///   triggers an update, and an update keeps the stored external id when the
///   source has none.
/// - A day the source omits becomes a confirmed rest day. A stored rest day
///   is left as is.
pub fn plan(period: Period, fetched: &[ExternalShift], existing: &[ShiftAssignmentRecord]) -> ReconcilePlan {
    let mut dropped_duplicates = 0;
    let mut ignored_out_of_month = 0;

    let mut source: BTreeMap<Date, &ExternalShift> = BTreeMap::new();
    for shift in fetched {
        if !period.contains(shift.date) {
            warn!(date = %shift.date, period = %period, "ignoring source entry outside the month");
            ignored_out_of_month += 1;
            continue;
        }
        if let Some(earlier) = source.insert(shift.date, shift) {
            warn!(
                date = %shift.date,
                dropped_kind = %earlier.kind,
                kept_kind = %shift.kind,
                "duplicate source date, keeping the last entry"
            );
            dropped_duplicates += 1;
        }
    }

    let stored: BTreeMap<Date, &ShiftAssignmentRecord> =
        existing.iter().map(|a| (a.date, a)).collect();

    let days = period
        .days()
        .map(|date| {
            let action = match (source.get(&date), stored.get(&date)) {
                (Some(shift), None) => DayAction::Create {
                    fields: shift.fields(),
                    external_id: shift.external_id.clone(),
                },
                (Some(shift), Some(record)) => {
                    let desired = shift.fields();
                    if record.fields.clone().normalized() == desired {
                        DayAction::Unchanged
                    } else {
                        let mut assignment = (*record).clone();
                        assignment.fields = desired;
                        if shift.external_id.is_some() {
                            assignment.external_id = shift.external_id.clone();
                        }
                        DayAction::Update { assignment }
                    }
                }
                (None, None) => DayAction::Create {
                    fields: ShiftFields::rest(),
                    external_id: None,
                },
                (None, Some(record)) if record.fields.kind.is_rest() => DayAction::Unchanged,
                (None, Some(record)) => {
                    let mut assignment = (*record).clone();
                    assignment.fields = ShiftFields::rest();
                    DayAction::Update { assignment }
                }
            };
            debug!(date = %date, action = action.label(), "planned day");
            DayPlan { date, action }
        })
        .collect();

    ReconcilePlan {
        days,
        dropped_duplicates,
        ignored_out_of_month,
        rejected_entries: 0,
    }
}

/// Issue the writes of `plan` for `roster`, then stamp the roster's
/// last-synchronized time. Every written row is stamped with `now`.
pub async fn apply<S: RosterStore + ?Sized>(
    store: &S,
    roster: &RosterRecord,
    plan: &ReconcilePlan,
    now: OffsetDateTime,
) -> Result<SyncSummary, SyncError> {
    let mut summary = SyncSummary::default();

    for day in &plan.days {
        match &day.action {
            DayAction::Create {
                fields,
                external_id,
            } => {
                store
                    .create_assignment(NewAssignment {
                        roster_id: roster.id,
                        employee_id: roster.employee_id.clone(),
                        date: day.date,
                        fields: fields.clone(),
                        external_id: external_id.clone(),
                        last_synced_at: now,
                    })
                    .await
                    .map_err(|e| SyncError::store(e, summary))?;
            }
            DayAction::Update { assignment } => {
                let mut assignment = assignment.clone();
                assignment.last_synced_at = Some(now);
                store
                    .update_assignment(&assignment)
                    .await
                    .map_err(|e| SyncError::store(e, summary))?;
            }
            DayAction::Unchanged => {}
        }
        count(&mut summary, &day.action);
    }

    debug!(
        dropped_duplicates = plan.dropped_duplicates,
        ignored_out_of_month = plan.ignored_out_of_month,
        rejected_entries = plan.rejected_entries,
        "applied plan"
    );

    // Only the timestamp: `roster` is a snapshot and its status may be stale.
    store
        .touch_roster(&roster.employee_id, roster.id, now)
        .await
        .map_err(|e| SyncError::store(e, summary))?;

    Ok(summary)
}

/// Reconcile `fetched` into `roster`: load the stored days, plan, apply.
///
/// Entries the source delivered but that could not be read are logged and
/// left out, like entries outside the month.
pub async fn reconcile<S: RosterStore + ?Sized>(
    store: &S,
    roster: &RosterRecord,
    fetched: &SourceRoster,
    now: OffsetDateTime,
) -> Result<SyncSummary, SyncError> {
    let period = roster.period()?;
    let existing = store
        .list_assignments(&roster.employee_id, roster.id)
        .await
        .map_err(|e| SyncError::store(e, SyncSummary::default()))?;
    let mut plan = plan(period, &fetched.shifts, &existing);
    for entry in &fetched.rejected {
        warn!(
            date = entry.date.as_deref().unwrap_or("-"),
            reason = %entry.reason,
            "ignoring unreadable source entry"
        );
    }
    plan.rejected_entries = u32::try_from(fetched.rejected.len()).unwrap_or(u32::MAX);
    apply(store, roster, &plan, now).await
}
