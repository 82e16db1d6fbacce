use std::future::Future;

use roster_core::{Period, RosterStatus};
use time::OffsetDateTime;

use super::{feb_2024, make_roster, TestResult};
use crate::{RosterStore, StorageError};

pub(super) async fn run_roster_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(TestResult::from_result(
        "roster",
        "create_roster_assigns_id_and_copies_fields",
        create_roster_assigns_id_and_copies_fields(factory).await,
    ));
    results.push(TestResult::from_result(
        "roster",
        "find_roster_by_period",
        find_roster_by_period(factory).await,
    ));
    results.push(TestResult::from_result(
        "roster",
        "find_roster_absent_returns_none",
        find_roster_absent_returns_none(factory).await,
    ));
    results.push(TestResult::from_result(
        "roster",
        "duplicate_roster_rejected",
        duplicate_roster_rejected(factory).await,
    ));
    results.push(TestResult::from_result(
        "roster",
        "same_period_different_employees_independent",
        same_period_different_employees_independent(factory).await,
    ));
    results.push(TestResult::from_result(
        "roster",
        "update_roster_persists_mutable_fields",
        update_roster_persists_mutable_fields(factory).await,
    ));
    results.push(TestResult::from_result(
        "roster",
        "update_roster_keeps_natural_key",
        update_roster_keeps_natural_key(factory).await,
    ));
    results.push(TestResult::from_result(
        "roster",
        "touch_roster_only_stamps_sync_time",
        touch_roster_only_stamps_sync_time(factory).await,
    ));

    results
}

// ── 1. create_roster returns the stored record ───────────────────────────────

async fn create_roster_assigns_id_and_copies_fields<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let rec = s
        .create_roster(make_roster("emp-1", feb_2024()))
        .await
        .map_err(|e| format!("create: {e}"))?;
    if rec.employee_id != "emp-1" || rec.year != 2024 || rec.month != 2 {
        return Err(format!("unexpected key fields: {:?}", rec));
    }
    if rec.status != RosterStatus::Draft {
        return Err(format!("expected draft, got {}", rec.status));
    }
    if rec.last_synced_at.is_some() || rec.document_id.is_some() {
        return Err("new roster must not carry sync or document stamps".to_string());
    }
    let fetched = s
        .get_roster("emp-1", rec.id)
        .await
        .map_err(|e| format!("get: {e}"))?;
    if fetched != rec {
        return Err(format!("get_roster returned {:?}, expected {:?}", fetched, rec));
    }
    Ok(())
}

// ── 2. find_roster locates by (employee, year, month) ────────────────────────

async fn find_roster_by_period<S, F, Fut>(factory: &F) -> Result<(), String>
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

    let found = s
        .find_roster("emp-1", march)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("march roster not found")?;
    if found.id != mar.id || found.id == feb.id {
        return Err(format!("found roster {} for March, expected {}", found.id, mar.id));
    }
    Ok(())
}

// ── 3. find_roster on an empty store returns None ────────────────────────────

async fn find_roster_absent_returns_none<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    match s.find_roster("emp-1", feb_2024()).await {
        Ok(None) => Ok(()),
        other => Err(format!("expected Ok(None), got {:?}", other)),
    }
}

// ── 4. second create for the same key is rejected ────────────────────────────

async fn duplicate_roster_rejected<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.create_roster(make_roster("emp-1", feb_2024()))
        .await
        .map_err(|e| e.to_string())?;
    match s.create_roster(make_roster("emp-1", feb_2024())).await {
        Err(StorageError::RosterAlreadyExists {
            employee_id,
            year,
            month,
        }) => {
            if employee_id != "emp-1" || year != 2024 || month != 2 {
                return Err(format!(
                    "wrong error fields: {}/{}-{}",
                    employee_id, year, month
                ));
            }
            Ok(())
        }
        other => Err(format!("expected RosterAlreadyExists, got {:?}", other)),
    }
}

// ── 5. the uniqueness key includes the employee ──────────────────────────────

async fn same_period_different_employees_independent<S, F, Fut>(
    factory: &F,
) -> Result<(), String>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let a = s
        .create_roster(make_roster("emp-1", feb_2024()))
        .await
        .map_err(|e| format!("emp-1: {e}"))?;
    let b = s
        .create_roster(make_roster("emp-2", feb_2024()))
        .await
        .map_err(|e| format!("emp-2: {e}"))?;
    if a.id == b.id {
        return Err("distinct rosters share an id".to_string());
    }
    Ok(())
}

// ── 6. update_roster persists status, stamps and references ──────────────────

async fn update_roster_persists_mutable_fields<S, F, Fut>(factory: &F) -> Result<(), String>
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

    let stamp = OffsetDateTime::from_unix_timestamp(1_706_745_600).map_err(|e| e.to_string())?;
    rec.status = RosterStatus::Published;
    rec.last_synced_at = Some(stamp);
    rec.document_id = Some("doc-9".to_string());
    rec.signature_id = Some("sig-9".to_string());
    rec.signed_at = Some(stamp);
    s.update_roster(&rec).await.map_err(|e| e.to_string())?;

    let fetched = s
        .get_roster("emp-1", rec.id)
        .await
        .map_err(|e| e.to_string())?;
    if fetched != rec {
        return Err(format!("after update got {:?}, expected {:?}", fetched, rec));
    }
    Ok(())
}

// ── 7. update_roster never moves a roster to another period ──────────────────

async fn update_roster_keeps_natural_key<S, F, Fut>(factory: &F) -> Result<(), String>
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
    rec.month = 5;
    s.update_roster(&rec).await.map_err(|e| e.to_string())?;

    let fetched = s
        .get_roster("emp-1", rec.id)
        .await
        .map_err(|e| e.to_string())?;
    if fetched.month != 2 {
        return Err(format!("month rewritten to {}", fetched.month));
    }
    Ok(())
}

// ── 8. touch_roster writes the sync stamp and leaves the rest alone ──────────

async fn touch_roster_only_stamps_sync_time<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: RosterStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let stale = s
        .create_roster(make_roster("emp-1", feb_2024()))
        .await
        .map_err(|e| e.to_string())?;

    let signed_at =
        OffsetDateTime::from_unix_timestamp(1_706_745_600).map_err(|e| e.to_string())?;
    let mut signed = stale.clone();
    signed.status = RosterStatus::Signed;
    signed.document_id = Some("doc-1".to_string());
    signed.signature_id = Some("sig-1".to_string());
    signed.signed_at = Some(signed_at);
    s.update_roster(&signed).await.map_err(|e| e.to_string())?;

    let synced_at =
        OffsetDateTime::from_unix_timestamp(1_706_749_200).map_err(|e| e.to_string())?;
    s.touch_roster(&stale.employee_id, stale.id, synced_at)
        .await
        .map_err(|e| e.to_string())?;

    let fetched = s
        .get_roster("emp-1", stale.id)
        .await
        .map_err(|e| e.to_string())?;
    let mut expected = signed;
    expected.last_synced_at = Some(synced_at);
    if fetched != expected {
        return Err(format!("after touch got {:?}, expected {:?}", fetched, expected));
    }
    Ok(())
}
