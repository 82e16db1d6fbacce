use std::future::Future;

use roster_core::RosterStatus;

use super::{day, feb_2024, make_assignment, make_roster, morning_fields, TestResult};
use crate::{RosterStore, StorageError};

pub(super) async fn run_error_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(TestResult::from_result(
        "error",
        "get_roster_unknown_id",
        get_roster_unknown_id(factory).await,
    ));
    results.push(TestResult::from_result(
        "error",
        "get_roster_of_other_employee",
        get_roster_of_other_employee(factory).await,
    ));
    results.push(TestResult::from_result(
        "error",
        "update_roster_unknown_id",
        update_roster_unknown_id(factory).await,
    ));
    results.push(TestResult::from_result(
        "error",
        "touch_roster_of_other_employee",
        touch_roster_of_other_employee(factory).await,
    ));
    results.push(TestResult::from_result(
        "error",
        "update_assignment_unknown_id",
        update_assignment_unknown_id(factory).await,
    ));
    results.push(TestResult::from_result(
        "error",
        "create_assignment_on_foreign_roster",
        create_assignment_on_foreign_roster(factory).await,
    ));
    results.push(TestResult::from_result(
        "error",
        "update_assignment_of_other_employee",
        update_assignment_of_other_employee(factory).await,
    ));

    results
}

// ── RosterNotFound ───────────────────────────────────────────────────────────

async fn get_roster_unknown_id<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    match s.get_roster("emp-1", 4242).await {
        Err(StorageError::RosterNotFound {
            employee_id,
            roster_id,
        }) => {
            if employee_id != "emp-1" || roster_id != 4242 {
                return Err(format!(
                    "wrong error fields: {}/{}",
                    employee_id, roster_id
                ));
            }
            Ok(())
        }
        other => Err(format!("expected RosterNotFound, got {:?}", other)),
    }
}

async fn get_roster_of_other_employee<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let rec = s
        .create_roster(make_roster("emp-1", feb_2024()))
        .await
        .map_err(|e| e.to_string())?;
    match s.get_roster("emp-2", rec.id).await {
        Err(StorageError::RosterNotFound { .. }) => Ok(()),
        other => Err(format!(
            "another employee could read the roster: {:?}",
            other
        )),
    }
}

async fn update_roster_unknown_id<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let mut rec = s
        .create_roster(make_roster("emp-1", feb_2024()))
        .await
        .map_err(|e| e.to_string())?;
    rec.id += 1000;
    rec.status = RosterStatus::Published;
    match s.update_roster(&rec).await {
        Err(StorageError::RosterNotFound { roster_id, .. }) if roster_id == rec.id => Ok(()),
        other => Err(format!("expected RosterNotFound, got {:?}", other)),
    }
}

async fn touch_roster_of_other_employee<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let rec = s
        .create_roster(make_roster("emp-1", feb_2024()))
        .await
        .map_err(|e| e.to_string())?;
    let at = time::OffsetDateTime::UNIX_EPOCH;
    match s.touch_roster("emp-2", rec.id, at).await {
        Err(StorageError::RosterNotFound { roster_id, .. }) if roster_id == rec.id => {}
        other => return Err(format!("expected RosterNotFound, got {:?}", other)),
    }
    let untouched = s
        .get_roster("emp-1", rec.id)
        .await
        .map_err(|e| e.to_string())?;
    if untouched.last_synced_at.is_some() {
        return Err("foreign touch stamped the roster".to_string());
    }
    Ok(())
}

// ── AssignmentNotFound ───────────────────────────────────────────────────────

async fn update_assignment_unknown_id<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let roster = s
        .create_roster(make_roster("emp-1", feb_2024()))
        .await
        .map_err(|e| e.to_string())?;
    let mut rec = s
        .create_assignment(make_assignment("emp-1", roster.id, day(1), morning_fields()))
        .await
        .map_err(|e| e.to_string())?;
    rec.id += 1000;
    match s.update_assignment(&rec).await {
        Err(StorageError::AssignmentNotFound { assignment_id, .. })
            if assignment_id == rec.id =>
        {
            Ok(())
        }
        other => Err(format!("expected AssignmentNotFound, got {:?}", other)),
    }
}

// ── Employee scoping ─────────────────────────────────────────────────────────

/// Writing a day into another employee's roster is refused and leaves no row.
async fn create_assignment_on_foreign_roster<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let roster = s
        .create_roster(make_roster("emp-1", feb_2024()))
        .await
        .map_err(|e| e.to_string())?;
    match s
        .create_assignment(make_assignment("emp-2", roster.id, day(1), morning_fields()))
        .await
    {
        Err(StorageError::RosterNotFound { .. }) => {}
        other => return Err(format!("expected RosterNotFound, got {:?}", other)),
    }
    let rows = s
        .list_assignments("emp-1", roster.id)
        .await
        .map_err(|e| e.to_string())?;
    if !rows.is_empty() {
        return Err(format!("refused write left {} rows", rows.len()));
    }
    Ok(())
}

async fn update_assignment_of_other_employee<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let roster = s
        .create_roster(make_roster("emp-1", feb_2024()))
        .await
        .map_err(|e| e.to_string())?;
    let mut rec = s
        .create_assignment(make_assignment("emp-1", roster.id, day(2), morning_fields()))
        .await
        .map_err(|e| e.to_string())?;
    rec.employee_id = "emp-2".to_string();
    match s.update_assignment(&rec).await {
        Err(StorageError::AssignmentNotFound { .. }) => Ok(()),
        other => Err(format!("expected AssignmentNotFound, got {:?}", other)),
    }
}
