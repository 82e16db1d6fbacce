//! roster-storage: the `RosterStore` persistence boundary.
//!
//! Provides the trait, its record and error types, two backends
//! ([`MemoryRosterStore`] and [`JsonFileStore`]) and a backend-agnostic
//! [`conformance`] suite that any implementation can run.

pub mod conformance;
mod error;
mod file;
mod memory;
mod record;
mod state;
mod traits;

pub use error::StorageError;
pub use file::JsonFileStore;
pub use memory::MemoryRosterStore;
pub use record::{NewAssignment, NewRoster, RosterRecord, ShiftAssignmentRecord};
pub use traits::RosterStore;
