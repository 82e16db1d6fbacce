use std::future::Future;

use roster_core::{AssignmentStatus, Period, ShiftFields, ShiftKind};
use time::macros::time;
use time::OffsetDateTime;

use super::{day, feb_2024, make_assignment, make_roster, morning_fields, TestResult};
use crate::{RosterStore, StorageError};

pub(super) async fn run_assignment_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(TestResult::from_result(
        "assignment",
        "create_assignment_round_trips_fields",
        create_assignment_round_trips_fields(factory).await,
    ));
    results.push(TestResult::from_result(
        "assignment",
        "rest_assignment_keeps_null_fields",
        rest_assignment_keeps_null_fields(factory).await,
    ));
    results.push(TestResult::from_result(
        "assignment",
        "duplicate_date_rejected",
        duplicate_date_rejected(factory).await,
    ));
    results.push(TestResult::from_result(
        "assignment",
        "list_assignments_ordered_by_date",
        list_assignments_ordered_by_date(factory).await,
    ));
    results.push(TestResult::from_result(
        "assignment",
        "list_assignments_scoped_to_roster",
        list_assignments_scoped_to_roster(factory).await,
    ));
    results.push(TestResult::from_result(
        "assignment",
        "update_assignment_overwrites_fields",
        update_assignment_overwrites_fields(factory).await,
    ));
    results.push(TestResult::from_result(
        "assignment",
        "list_upcoming_skips_rest_and_past",
        list_upcoming_skips_rest_and_past(factory).await,
    ));
    results.push(TestResult::from_result(
        "assignment",
        "list_upcoming_honours_limit_across_rosters",
        list_upcoming_honours_limit_across_rosters(factory).await,
    ));

    results
}

// ── 1. create + find returns identical fields ────────────────────────────────

async fn create_assignment_round_trips_fields<S, F, Fut>(factory: &F) -> Result<(), String>
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
    let created = s
        .create_assignment(make_assignment("emp-1", roster.id, day(5), morning_fields()))
        .await
        .map_err(|e| format!("create: {e}"))?;
    if created.last_synced_at != Some(OffsetDateTime::UNIX_EPOCH) {
        return Err(format!("sync stamp not stored: {:?}", created.last_synced_at));
    }

    let found = s
        .find_assignment("emp-1", roster.id, day(5))
        .await
        .map_err(|e| format!("find: {e}"))?
        .ok_or("assignment not found after create")?;
    if found != created {
        return Err(format!("found {:?}, expected {:?}", found, created));
    }
    if found.fields != morning_fields() {
        return Err(format!("fields changed in storage: {:?}", found.fields));
    }
    Ok(())
}

// ── 2. rest days store no times or labels ────────────────────────────────────

async fn rest_assignment_keeps_null_fields<S, F, Fut>(factory: &F) -> Result<(), String>
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
    s.create_assignment(make_assignment("emp-1", roster.id, day(10), ShiftFields::rest()))
        .await
        .map_err(|e| e.to_string())?;
    let found = s
        .find_assignment("emp-1", roster.id, day(10))
        .await
        .map_err(|e| e.to_string())?
        .ok_or("rest day not found")?;
    if found.fields != ShiftFields::rest() {
        return Err(format!("rest day stored as {:?}", found.fields));
    }
    Ok(())
}

// ── 3. one assignment per (employee, roster, date) ───────────────────────────

async fn duplicate_date_rejected<S, F, Fut>(factory: &F) -> Result<(), String>
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
    s.create_assignment(make_assignment("emp-1", roster.id, day(3), morning_fields()))
        .await
        .map_err(|e| e.to_string())?;
    match s
        .create_assignment(make_assignment("emp-1", roster.id, day(3), ShiftFields::rest()))
        .await
    {
        Err(StorageError::AssignmentAlreadyExists { date, .. }) if date == day(3) => Ok(()),
        other => Err(format!("expected AssignmentAlreadyExists, got {:?}", other)),
    }
}

// ── 4. list_assignments returns date order regardless of insert order ────────

async fn list_assignments_ordered_by_date<S, F, Fut>(factory: &F) -> Result<(), String>
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
    for d in [9, 2, 29, 14] {
        s.create_assignment(make_assignment("emp-1", roster.id, day(d), morning_fields()))
            .await
            .map_err(|e| format!("create day {d}: {e}"))?;
    }
    let listed = s
        .list_assignments("emp-1", roster.id)
        .await
        .map_err(|e| e.to_string())?;
    let dates: Vec<_> = listed.iter().map(|a| a.date).collect();
    let expected = vec![day(2), day(9), day(14), day(29)];
    if dates != expected {
        return Err(format!("expected {:?}, got {:?}", expected, dates));
    }
    Ok(())
}

// ── 5. assignments of other rosters and employees are not listed ─────────────

async fn list_assignments_scoped_to_roster<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let march = Period::new(2024, 3).map_err(|e| e.to_string())?;
    let feb = s
        .create_roster(make_roster("emp-1", feb_2024()))
        .await
        .map_err(|e| e.to_string())?;
    let mar = s
        .create_roster(make_roster("emp-1", march))
        .await
        .map_err(|e| e.to_string())?;
    let other = s
        .create_roster(make_roster("emp-2", feb_2024()))
        .await
        .map_err(|e| e.to_string())?;

    s.create_assignment(make_assignment("emp-1", feb.id, day(1), morning_fields()))
        .await
        .map_err(|e| e.to_string())?;
    s.create_assignment(make_assignment(
        "emp-1",
        mar.id,
        march.days().next().ok_or("march has no days")?,
        morning_fields(),
    ))
    .await
    .map_err(|e| e.to_string())?;
    s.create_assignment(make_assignment("emp-2", other.id, day(1), morning_fields()))
        .await
        .map_err(|e| e.to_string())?;

    let listed = s
        .list_assignments("emp-1", feb.id)
        .await
        .map_err(|e| e.to_string())?;
    if listed.len() != 1 || listed[0].roster_id != feb.id {
        return Err(format!("expected exactly the February row, got {:?}", listed));
    }
    let foreign = s
        .list_assignments("emp-1", other.id)
        .await
        .map_err(|e| e.to_string())?;
    if !foreign.is_empty() {
        return Err("listed another employee's roster".to_string());
    }
    Ok(())
}

// ── 6. update_assignment replaces fields, external id and sync stamp ─────────

async fn update_assignment_overwrites_fields<S, F, Fut>(factory: &F) -> Result<(), String>
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
        .create_assignment(make_assignment("emp-1", roster.id, day(7), morning_fields()))
        .await
        .map_err(|e| e.to_string())?;

    rec.fields = ShiftFields {
        start_time: Some(time!(23:00)),
        end_time: Some(time!(7:00)),
        kind: ShiftKind::Night,
        service: Some("Service C".to_string()),
        location: Some("Floor 3".to_string()),
        status: AssignmentStatus::Modified,
    };
    rec.external_id = Some("OCT-SHIFT-updated".to_string());
    rec.last_synced_at = OffsetDateTime::from_unix_timestamp(1_707_000_000).ok();
    s.update_assignment(&rec).await.map_err(|e| e.to_string())?;

    let found = s
        .find_assignment("emp-1", roster.id, day(7))
        .await
        .map_err(|e| e.to_string())?
        .ok_or("assignment vanished after update")?;
    if found != rec {
        return Err(format!("after update got {:?}, expected {:?}", found, rec));
    }
    Ok(())
}

// ── 7. upcoming excludes rest days and earlier dates ─────────────────────────

async fn list_upcoming_skips_rest_and_past<S, F, Fut>(factory: &F) -> Result<(), String>
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
    s.create_assignment(make_assignment("emp-1", roster.id, day(1), morning_fields()))
        .await
        .map_err(|e| e.to_string())?;
    s.create_assignment(make_assignment("emp-1", roster.id, day(10), ShiftFields::rest()))
        .await
        .map_err(|e| e.to_string())?;
    s.create_assignment(make_assignment("emp-1", roster.id, day(12), morning_fields()))
        .await
        .map_err(|e| e.to_string())?;
    s.create_assignment(make_assignment("emp-1", roster.id, day(11), morning_fields()))
        .await
        .map_err(|e| e.to_string())?;

    let upcoming = s
        .list_upcoming("emp-1", day(10), 0)
        .await
        .map_err(|e| e.to_string())?;
    let dates: Vec<_> = upcoming.iter().map(|a| a.date).collect();
    if dates != vec![day(11), day(12)] {
        return Err(format!("expected days 11 and 12, got {:?}", dates));
    }
    Ok(())
}

// ── 8. upcoming spans months and truncates to the limit ──────────────────────

async fn list_upcoming_honours_limit_across_rosters<S, F, Fut>(
    factory: &F,
) -> Result<(), String>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let march = Period::new(2024, 3).map_err(|e| e.to_string())?;
    let feb = s
        .create_roster(make_roster("emp-1", feb_2024()))
        .await
        .map_err(|e| e.to_string())?;
    let mar = s
        .create_roster(make_roster("emp-1", march))
        .await
        .map_err(|e| e.to_string())?;
    let march_days: Vec<_> = march.days().take(3).collect();
    for d in &march_days {
        s.create_assignment(make_assignment("emp-1", mar.id, *d, morning_fields()))
            .await
            .map_err(|e| e.to_string())?;
    }
    s.create_assignment(make_assignment("emp-1", feb.id, day(28), morning_fields()))
        .await
        .map_err(|e| e.to_string())?;

    let upcoming = s
        .list_upcoming("emp-1", day(20), 2)
        .await
        .map_err(|e| e.to_string())?;
    let dates: Vec<_> = upcoming.iter().map(|a| a.date).collect();
    let expected = vec![day(28), march_days[0]];
    if dates != expected {
        return Err(format!("expected {:?}, got {:?}", expected, dates));
    }
    Ok(())
}
