//! Roster lifecycle.
//!
//! ```text
//! draft ──publish──▶ published ──sign──▶ signed
//! ```
//!
//! Synchronization never changes the status; only the publishing and
//! signing workflows do.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterStatus {
    #[default]
    Draft,
    Published,
    Signed,
}

/// A lifecycle move that the current status does not allow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    pub from: RosterStatus,
    pub to: RosterStatus,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "roster cannot move from {} to {}", self.from, self.to)
    }
}

impl std::error::Error for TransitionError {}

impl RosterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RosterStatus::Draft => "draft",
            RosterStatus::Published => "published",
            RosterStatus::Signed => "signed",
        }
    }

    /// Status after publishing.
    pub fn publish(self) -> Result<RosterStatus, TransitionError> {
        match self {
            RosterStatus::Draft => Ok(RosterStatus::Published),
            from => Err(TransitionError {
                from,
                to: RosterStatus::Published,
            }),
        }
    }

    /// Status after signing. Only a published roster is ready to sign.
    pub fn sign(self) -> Result<RosterStatus, TransitionError> {
        match self {
            RosterStatus::Published => Ok(RosterStatus::Signed),
            from => Err(TransitionError {
                from,
                to: RosterStatus::Signed,
            }),
        }
    }
}

impl fmt::Display for RosterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_publishes_then_signs() {
        let published = RosterStatus::Draft.publish().unwrap();
        assert_eq!(published, RosterStatus::Published);
        assert_eq!(published.sign().unwrap(), RosterStatus::Signed);
    }

    #[test]
    fn draft_cannot_be_signed() {
        let err = RosterStatus::Draft.sign().unwrap_err();
        assert_eq!(err.from, RosterStatus::Draft);
        assert_eq!(err.to_string(), "roster cannot move from draft to signed");
    }

    #[test]
    fn signed_is_terminal() {
        assert!(RosterStatus::Signed.publish().is_err());
        assert!(RosterStatus::Signed.sign().is_err());
    }
}
