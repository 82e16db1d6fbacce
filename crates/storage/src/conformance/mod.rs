//! Conformance test suite for `RosterStore` implementations.
//!
//! This module provides a backend-agnostic test suite that any `RosterStore`
//! implementation can run to verify correctness. The suite covers:
//!
//! - **Rosters**: creation, lookup by period and id, uniqueness, updates
//! - **Assignments**: creation, lookup by date, ordering, uniqueness, updates,
//!   upcoming-shift queries
//! - **Error handling**: correct error variants and employee scoping
//! - **Concurrency**: racing creates admit exactly one winner
//!
//! # Usage
//!
//! Backend crates call [`run_conformance_suite`] with a factory function that
//! creates a fresh, empty store instance for each test:
//!
//! ```ignore
//! use roster_storage::conformance::run_conformance_suite;
//!
//! #[tokio::test]
//! async fn postgres_conformance() {
//!     let report = run_conformance_suite(|| async {
//!         create_test_postgres_store().await
//!     }).await;
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

mod assignment;
mod concurrent;
mod error;
mod roster;

use std::fmt;
use std::future::Future;

use roster_core::{AssignmentStatus, Period, RecordId, RosterStatus, ShiftFields, ShiftKind};
use time::macros::{date, time};
use time::{Date, Duration, OffsetDateTime};

use crate::record::{NewAssignment, NewRoster};
use crate::RosterStore;

/// Result of a single conformance test.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test category (e.g. "roster", "assignment", "concurrent").
    pub category: String,
    /// Test name (e.g. "create_roster_assigns_id").
    pub name: String,
    /// Whether the test passed.
    pub passed: bool,
    /// Error message if the test failed.
    pub message: Option<String>,
}

impl TestResult {
    fn pass(category: &str, name: &str) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed: true,
            message: None,
        }
    }

    fn fail(category: &str, name: &str, msg: String) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed: false,
            message: Some(msg),
        }
    }

    fn from_result(category: &str, name: &str, result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::pass(category, name),
            Err(msg) => Self::fail(category, name, msg),
        }
    }
}

/// Aggregated report from a full conformance suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in &self.results {
            if !r.passed {
                writeln!(
                    f,
                    "  FAIL [{}/{}]: {}",
                    r.category,
                    r.name,
                    r.message.as_deref().unwrap_or("(no message)")
                )?;
            }
        }
        Ok(())
    }
}

/// Run the full conformance suite against a store backend.
///
/// The `factory` function is called once per test to create a fresh, empty
/// store instance, ensuring test isolation.
pub async fn run_conformance_suite<S, F, Fut>(factory: F) -> ConformanceReport
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.extend(roster::run_roster_tests(&factory).await);
    results.extend(assignment::run_assignment_tests(&factory).await);
    results.extend(error::run_error_tests(&factory).await);
    results.extend(concurrent::run_concurrent_tests(&factory).await);

    let passed = results.iter().filter(|r| r.passed).count();
    let total = results.len();

    ConformanceReport {
        results,
        passed,
        failed: total - passed,
        total,
    }
}

// ── Helpers: record constructors with sensible defaults ──────────────────────

const FEB_1: Date = date!(2024 - 02 - 01);

fn feb_2024() -> Period {
    Period::of(FEB_1)
}

/// Day `d` of February 2024.
fn day(d: i64) -> Date {
    FEB_1.saturating_add(Duration::days(d - 1))
}

fn make_roster(employee_id: &str, period: Period) -> NewRoster {
    NewRoster {
        employee_id: employee_id.to_string(),
        period,
        status: RosterStatus::Draft,
        external_reference: Some(format!(
            "OCT-{}{}-{}",
            period.year(),
            period.month(),
            employee_id
        )),
    }
}

fn morning_fields() -> ShiftFields {
    ShiftFields {
        start_time: Some(time!(7:00)),
        end_time: Some(time!(15:00)),
        kind: ShiftKind::Morning,
        service: Some("Service A".to_string()),
        location: Some("Floor 1".to_string()),
        status: AssignmentStatus::Confirmed,
    }
}

fn make_assignment(
    employee_id: &str,
    roster_id: RecordId,
    date: Date,
    fields: ShiftFields,
) -> NewAssignment {
    NewAssignment {
        roster_id,
        employee_id: employee_id.to_string(),
        date,
        fields,
        external_id: Some(format!("OCT-SHIFT-{}-{}", date, employee_id)),
        last_synced_at: OffsetDateTime::UNIX_EPOCH,
    }
}
