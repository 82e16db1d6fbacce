//! Runs the backend-agnostic conformance suite against the bundled stores.

use std::sync::atomic::{AtomicUsize, Ordering};

use roster_storage::conformance::run_conformance_suite;
use roster_storage::{JsonFileStore, MemoryRosterStore};

#[tokio::test]
async fn memory_store_conformance() {
    let report = run_conformance_suite(|| async { MemoryRosterStore::new() }).await;
    assert!(report.total > 0);
    assert!(report.failed == 0, "{report}");
}

#[tokio::test]
async fn json_file_store_conformance() {
    let dir = tempfile::tempdir().unwrap();
    let next = AtomicUsize::new(0);
    let report = run_conformance_suite(|| {
        let path = dir
            .path()
            .join(format!("store-{}.json", next.fetch_add(1, Ordering::SeqCst)));
        async move { JsonFileStore::open(path).unwrap() }
    })
    .await;
    assert!(report.total > 0);
    assert!(report.failed == 0, "{report}");
}
