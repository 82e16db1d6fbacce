use std::future::Future;
use std::sync::Arc;

use roster_core::ShiftFields;

use super::{day, feb_2024, make_assignment, make_roster, morning_fields, TestResult};
use crate::{RosterStore, StorageError};

/// Number of concurrent tasks to spawn in each test.
const N: usize = 10;

pub(super) async fn run_concurrent_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(TestResult::from_result(
        "concurrent",
        "concurrent_create_roster_exactly_one_wins",
        concurrent_create_roster_exactly_one_wins(factory).await,
    ));
    results.push(TestResult::from_result(
        "concurrent",
        "concurrent_create_assignment_exactly_one_wins",
        concurrent_create_assignment_exactly_one_wins(factory).await,
    ));
    results.push(TestResult::from_result(
        "concurrent",
        "concurrent_creates_for_different_employees_all_succeed",
        concurrent_creates_for_different_employees_all_succeed(factory).await,
    ));
    results.push(TestResult::from_result(
        "concurrent",
        "concurrent_day_fill_leaves_one_row_per_date",
        concurrent_day_fill_leaves_one_row_per_date(factory).await,
    ));

    results
}

// ── Concurrent roster creation: exactly one wins ─────────────────────────────

/// N tasks race to create the same (employee, year, month) roster. Exactly one
/// succeeds; the rest must get RosterAlreadyExists.
async fn concurrent_create_roster_exactly_one_wins<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let storage = Arc::new(factory().await);

    let mut handles = Vec::new();
    for _ in 0..N {
        let s = storage.clone();
        handles.push(tokio::spawn(async move {
            match s.create_roster(make_roster("emp-1", feb_2024())).await {
                Ok(_) => Ok(true),
                Err(StorageError::RosterAlreadyExists { .. }) => Ok(false),
                Err(e) => Err(e),
            }
        }));
    }

    let mut winners = 0usize;
    let mut losers = 0usize;
    for handle in handles {
        let won = handle
            .await
            .map_err(|e| format!("task panic: {e}"))?
            .map_err(|e: StorageError| format!("storage error: {e}"))?;
        if won {
            winners += 1;
        } else {
            losers += 1;
        }
    }

    if winners != 1 {
        return Err(format!("expected exactly 1 winner, got {winners}"));
    }
    if losers != N - 1 {
        return Err(format!("expected {} losers, got {losers}", N - 1));
    }
    Ok(())
}

// ── Concurrent assignment creation: exactly one wins ─────────────────────────

/// N tasks race to create the assignment for the same date. Exactly one row
/// is written; the rest must get AssignmentAlreadyExists.
async fn concurrent_create_assignment_exactly_one_wins<S, F, Fut>(
    factory: &F,
) -> Result<(), String>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let storage = Arc::new(factory().await);
    let roster = storage
        .create_roster(make_roster("emp-1", feb_2024()))
        .await
        .map_err(|e| format!("create roster: {e}"))?;

    let mut handles = Vec::new();
    for i in 0..N {
        let s = storage.clone();
        let fields = if i % 2 == 0 {
            morning_fields()
        } else {
            ShiftFields::rest()
        };
        handles.push(tokio::spawn(async move {
            match s
                .create_assignment(make_assignment("emp-1", roster.id, day(15), fields))
                .await
            {
                Ok(_) => Ok(true),
                Err(StorageError::AssignmentAlreadyExists { .. }) => Ok(false),
                Err(e) => Err(e),
            }
        }));
    }

    let mut winners = 0usize;
    for handle in handles {
        let won = handle
            .await
            .map_err(|e| format!("task panic: {e}"))?
            .map_err(|e: StorageError| format!("storage error: {e}"))?;
        if won {
            winners += 1;
        }
    }
    if winners != 1 {
        return Err(format!("expected exactly 1 winner, got {winners}"));
    }

    let rows = storage
        .list_assignments("emp-1", roster.id)
        .await
        .map_err(|e| format!("list: {e}"))?;
    if rows.len() != 1 {
        return Err(format!("expected 1 stored row, got {}", rows.len()));
    }
    Ok(())
}

// ── Concurrent creates with no contention: all succeed ───────────────────────

/// N tasks each create the roster of a different employee for the same month.
/// No false conflicts when the keys differ.
async fn concurrent_creates_for_different_employees_all_succeed<S, F, Fut>(
    factory: &F,
) -> Result<(), String>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let storage = Arc::new(factory().await);

    let mut handles = Vec::new();
    for i in 0..N {
        let s = storage.clone();
        handles.push(tokio::spawn(async move {
            s.create_roster(make_roster(&format!("emp-{i}"), feb_2024()))
                .await
        }));
    }

    let mut ids = Vec::new();
    for (i, handle) in handles.into_iter().enumerate() {
        let rec = handle
            .await
            .map_err(|e| format!("task {i} panic: {e}"))?
            .map_err(|e| format!("task {i} failed: {e}"))?;
        ids.push(rec.id);
    }
    ids.sort_unstable();
    ids.dedup();
    if ids.len() != N {
        return Err(format!("expected {N} distinct ids, got {}", ids.len()));
    }

    for i in 0..N {
        storage
            .find_roster(&format!("emp-{i}"), feb_2024())
            .await
            .map_err(|e| format!("find emp-{i}: {e}"))?
            .ok_or_else(|| format!("emp-{i}: roster missing"))?;
    }
    Ok(())
}

// ── Concurrent fill of a month: one row per date ─────────────────────────────

/// Two tasks fill the whole month for the same roster, each skipping dates the
/// other already wrote. The month ends with exactly one row per calendar day.
async fn concurrent_day_fill_leaves_one_row_per_date<S, F, Fut>(
    factory: &F,
) -> Result<(), String>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let storage = Arc::new(factory().await);
    let roster = storage
        .create_roster(make_roster("emp-1", feb_2024()))
        .await
        .map_err(|e| format!("create roster: {e}"))?;

    let mut handles = Vec::new();
    for _ in 0..2 {
        let s = storage.clone();
        handles.push(tokio::spawn(async move {
            for date in feb_2024().days() {
                match s
                    .create_assignment(make_assignment("emp-1", roster.id, date, morning_fields()))
                    .await
                {
                    Ok(_) | Err(StorageError::AssignmentAlreadyExists { .. }) => {}
                    Err(e) => return Err(e),
                }
            }
            Ok(())
        }));
    }
    for handle in handles {
        handle
            .await
            .map_err(|e| format!("task panic: {e}"))?
            .map_err(|e: StorageError| format!("storage error: {e}"))?;
    }

    let rows = storage
        .list_assignments("emp-1", roster.id)
        .await
        .map_err(|e| format!("list: {e}"))?;
    let expected = feb_2024().days_in_month() as usize;
    if rows.len() != expected {
        return Err(format!("expected {expected} rows, got {}", rows.len()));
    }
    Ok(())
}
