use serde::{Deserialize, Serialize};

use crate::RecordId;

/// Counts produced by one reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub total_shifts: u32,
    pub created: u32,
    pub updated: u32,
    pub unchanged: u32,
}

impl SyncSummary {
    /// Days that reached a decision: created, updated or left unchanged.
    pub fn processed(&self) -> u32 {
        self.created + self.updated + self.unchanged
    }
}

/// The roster a sync run targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRef {
    pub id: RecordId,
    pub month: u32,
    pub year: i32,
}

/// Caller-facing outcome of a successful sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    /// Opaque per-call token for correlating logs and audits.
    pub sync_id: String,
    pub roster: RosterRef,
    pub summary: SyncSummary,
}
