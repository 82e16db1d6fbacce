//! In-process table state shared by the memory and file backends.

use std::collections::BTreeMap;

use roster_core::{Period, RecordId};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::error::StorageError;
use crate::record::{NewAssignment, NewRoster, RosterRecord, ShiftAssignmentRecord};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StoreState {
    next_id: RecordId,
    rosters: BTreeMap<RecordId, RosterRecord>,
    assignments: BTreeMap<RecordId, ShiftAssignmentRecord>,
}

impl StoreState {
    fn allocate_id(&mut self) -> RecordId {
        self.next_id += 1;
        self.next_id
    }

    pub(crate) fn find_roster(&self, employee_id: &str, period: Period) -> Option<RosterRecord> {
        self.rosters
            .values()
            .find(|r| {
                r.employee_id == employee_id
                    && r.year == period.year()
                    && r.month == period.month()
            })
            .cloned()
    }

    pub(crate) fn get_roster(
        &self,
        employee_id: &str,
        roster_id: RecordId,
    ) -> Result<RosterRecord, StorageError> {
        self.rosters
            .get(&roster_id)
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .ok_or_else(|| StorageError::RosterNotFound {
                employee_id: employee_id.to_string(),
                roster_id,
            })
    }

    pub(crate) fn create_roster(&mut self, new: NewRoster) -> Result<RosterRecord, StorageError> {
        if self.find_roster(&new.employee_id, new.period).is_some() {
            return Err(StorageError::RosterAlreadyExists {
                employee_id: new.employee_id,
                year: new.period.year(),
                month: new.period.month(),
            });
        }
        let record = RosterRecord {
            id: self.allocate_id(),
            employee_id: new.employee_id,
            year: new.period.year(),
            month: new.period.month(),
            status: new.status,
            last_synced_at: None,
            external_reference: new.external_reference,
            document_id: None,
            signature_id: None,
            signed_at: None,
        };
        self.rosters.insert(record.id, record.clone());
        Ok(record)
    }

    pub(crate) fn update_roster(&mut self, roster: &RosterRecord) -> Result<(), StorageError> {
        let stored = self
            .rosters
            .get_mut(&roster.id)
            .filter(|r| r.employee_id == roster.employee_id)
            .ok_or_else(|| StorageError::RosterNotFound {
                employee_id: roster.employee_id.clone(),
                roster_id: roster.id,
            })?;
        stored.status = roster.status;
        stored.last_synced_at = roster.last_synced_at;
        stored.external_reference = roster.external_reference.clone();
        stored.document_id = roster.document_id.clone();
        stored.signature_id = roster.signature_id.clone();
        stored.signed_at = roster.signed_at;
        Ok(())
    }

    /// Stamp the last-synchronized time and nothing else.
    pub(crate) fn touch_roster(
        &mut self,
        employee_id: &str,
        roster_id: RecordId,
        at: OffsetDateTime,
    ) -> Result<(), StorageError> {
        let stored = self
            .rosters
            .get_mut(&roster_id)
            .filter(|r| r.employee_id == employee_id)
            .ok_or_else(|| StorageError::RosterNotFound {
                employee_id: employee_id.to_string(),
                roster_id,
            })?;
        stored.last_synced_at = Some(at);
        Ok(())
    }

    pub(crate) fn find_assignment(
        &self,
        employee_id: &str,
        roster_id: RecordId,
        date: Date,
    ) -> Option<ShiftAssignmentRecord> {
        self.assignments
            .values()
            .find(|a| a.employee_id == employee_id && a.roster_id == roster_id && a.date == date)
            .cloned()
    }

    pub(crate) fn list_assignments(
        &self,
        employee_id: &str,
        roster_id: RecordId,
    ) -> Vec<ShiftAssignmentRecord> {
        let mut out: Vec<ShiftAssignmentRecord> = self
            .assignments
            .values()
            .filter(|a| a.employee_id == employee_id && a.roster_id == roster_id)
            .cloned()
            .collect();
        out.sort_by_key(|a| a.date);
        out
    }

    pub(crate) fn list_upcoming(
        &self,
        employee_id: &str,
        from: Date,
        limit: usize,
    ) -> Vec<ShiftAssignmentRecord> {
        let mut out: Vec<ShiftAssignmentRecord> = self
            .assignments
            .values()
            .filter(|a| a.employee_id == employee_id && a.date >= from && !a.fields.kind.is_rest())
            .cloned()
            .collect();
        out.sort_by_key(|a| (a.date, a.fields.start_time));
        if limit > 0 {
            out.truncate(limit);
        }
        out
    }

    pub(crate) fn create_assignment(
        &mut self,
        new: NewAssignment,
    ) -> Result<ShiftAssignmentRecord, StorageError> {
        self.get_roster(&new.employee_id, new.roster_id)?;
        if self
            .find_assignment(&new.employee_id, new.roster_id, new.date)
            .is_some()
        {
            return Err(StorageError::AssignmentAlreadyExists {
                employee_id: new.employee_id,
                roster_id: new.roster_id,
                date: new.date,
            });
        }
        let record = ShiftAssignmentRecord {
            id: self.allocate_id(),
            roster_id: new.roster_id,
            employee_id: new.employee_id,
            date: new.date,
            fields: new.fields,
            external_id: new.external_id,
            last_synced_at: Some(new.last_synced_at),
        };
        self.assignments.insert(record.id, record.clone());
        Ok(record)
    }

    pub(crate) fn update_assignment(
        &mut self,
        assignment: &ShiftAssignmentRecord,
    ) -> Result<(), StorageError> {
        let stored = self
            .assignments
            .get_mut(&assignment.id)
            .filter(|a| a.employee_id == assignment.employee_id)
            .ok_or_else(|| StorageError::AssignmentNotFound {
                employee_id: assignment.employee_id.clone(),
                assignment_id: assignment.id,
            })?;
        stored.fields = assignment.fields.clone();
        stored.external_id = assignment.external_id.clone();
        stored.last_synced_at = assignment.last_synced_at;
        Ok(())
    }
}
