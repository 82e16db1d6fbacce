//! Boundaries to the e-signature provider and the document archive.
//!
//! Neither is implemented here; hosts plug in their provider. The roster
//! service only needs a signature id back from the signer and a document id
//! back from the archive.

use async_trait::async_trait;
use roster_core::{Period, RecordId};
use serde::Serialize;

/// What is being signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDescriptor {
    /// Human-readable title, e.g. `Roster 2/2024`.
    pub title: String,
    pub roster_id: RecordId,
    pub period: Period,
}

impl DocumentDescriptor {
    pub fn for_roster(roster_id: RecordId, period: Period) -> Self {
        DocumentDescriptor {
            title: format!("Roster {}/{}", period.month(), period.year()),
            roster_id,
            period,
        }
    }
}

/// What the signer hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub signature_id: String,
    /// Provider-specific details, kept opaque.
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SigningError {
    #[error("signature rejected: {0}")]
    Rejected(String),
    #[error("signature provider unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("document archive failed: {0}")]
pub struct ArchiveError(pub String);

#[async_trait]
pub trait RosterSigner: Send + Sync {
    /// Sign `document` on behalf of `signer_id`. `payload` is whatever the
    /// signer submitted (drawn signature, OTP, ...).
    async fn sign(
        &self,
        document: &DocumentDescriptor,
        signer_id: &str,
        payload: &serde_json::Value,
    ) -> Result<Signature, SigningError>;
}

#[async_trait]
pub trait DocumentArchive: Send + Sync {
    /// Store the signed document and return its identifier.
    async fn archive(
        &self,
        document: &DocumentDescriptor,
        signature: &Signature,
    ) -> Result<String, ArchiveError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_title_uses_month_slash_year() {
        let period = Period::new(2024, 2).unwrap();
        let doc = DocumentDescriptor::for_roster(3, period);
        assert_eq!(doc.title, "Roster 2/2024");
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            serde_json::json!({
                "title": "Roster 2/2024",
                "rosterId": 3,
                "period": {"year": 2024, "month": 2}
            })
        );
    }
}
