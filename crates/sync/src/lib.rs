//! roster-sync: pulls a month of shifts from an external scheduling source
//! and reconciles it into a [`RosterStore`](roster_storage::RosterStore).
//!
//! - [`source`] -- the [`SourceAdapter`] trait and its HTTP, synthetic and
//!   static strategies
//! - [`engine`] -- the pure plan and the write-issuing apply step
//! - [`SyncCoordinator`] -- one run per (employee, year, month), with
//!   exclusivity, fetch timeout and degraded-mode fallback
//! - [`RosterService`] -- monthly view, upcoming shifts, publish and sign

pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod notify;
pub mod service;
pub mod signing;
pub mod source;

pub use config::{DegradedMode, HttpSourceConfig, SyncConfig, DEFAULT_FETCH_TIMEOUT};
pub use coordinator::SyncCoordinator;
pub use error::{RosterError, SourceError, SyncError};
pub use notify::{NoopNotifier, Notifier, NotifyError, RosterEvent, TracingNotifier};
pub use service::{MonthlyRoster, RosterService, DEFAULT_UPCOMING_COUNT};
pub use signing::{
    ArchiveError, DocumentArchive, DocumentDescriptor, RosterSigner, Signature, SigningError,
};
pub use source::SourceAdapter;
