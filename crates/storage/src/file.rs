//! JSON-file `RosterStore` backend for single-host use (the CLI).
//!
//! The whole table set lives in one JSON document, guarded by an advisory
//! lock on `<path>.lock`. Every call locks (shared for reads, exclusive for
//! writes) and reads the document fresh from disk, so several processes can
//! share one store and a write always starts from the latest committed
//! state. A write serializes the result to `<path>.tmp` and renames it over
//! `<path>`: a crash leaves either the previous or the new state on disk,
//! never a torn file.
//!
//! Lock waits and file I/O run on tokio's blocking pool.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use roster_core::{Period, RecordId};
use time::{Date, OffsetDateTime};

use crate::error::StorageError;
use crate::record::{NewAssignment, NewRoster, RosterRecord, ShiftAssignmentRecord};
use crate::state::StoreState;
use crate::RosterStore;

pub struct JsonFileStore {
    files: StoreFiles,
}

#[derive(Debug, Clone)]
struct StoreFiles {
    data: PathBuf,
    lock: PathBuf,
    tmp: PathBuf,
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

impl StoreFiles {
    fn new(path: &Path) -> Self {
        StoreFiles {
            data: path.to_path_buf(),
            lock: sibling(path, ".lock"),
            tmp: sibling(path, ".tmp"),
        }
    }

    /// The returned handle holds the lock until it is dropped.
    fn lock(&self, exclusive: bool) -> Result<File, StorageError> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.lock)
            .map_err(|e| {
                StorageError::Backend(format!("open lock '{}': {}", self.lock.display(), e))
            })?;
        let locked = if exclusive {
            FileExt::lock_exclusive(&file)
        } else {
            FileExt::lock_shared(&file)
        };
        locked.map_err(|e| {
            StorageError::Backend(format!("lock '{}': {}", self.lock.display(), e))
        })?;
        Ok(file)
    }

    fn load(&self) -> Result<StoreState, StorageError> {
        match std::fs::read_to_string(&self.data) {
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                StorageError::Backend(format!(
                    "corrupt store file '{}': {}",
                    self.data.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreState::default()),
            Err(e) => Err(StorageError::Backend(format!(
                "cannot read store file '{}': {}",
                self.data.display(),
                e
            ))),
        }
    }

    fn save(&self, state: &StoreState) -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(state)
            .map_err(|e| StorageError::Backend(format!("serialize store: {}", e)))?;
        std::fs::write(&self.tmp, text).map_err(|e| {
            StorageError::Backend(format!("write '{}': {}", self.tmp.display(), e))
        })?;
        std::fs::rename(&self.tmp, &self.data).map_err(|e| {
            StorageError::Backend(format!("replace '{}': {}", self.data.display(), e))
        })
    }

    fn read<T>(&self, op: impl FnOnce(&StoreState) -> T) -> Result<T, StorageError> {
        let _lock = self.lock(false)?;
        let state = self.load()?;
        Ok(op(&state))
    }

    /// Nothing reaches disk when `op` fails.
    fn write<T>(
        &self,
        op: impl FnOnce(&mut StoreState) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let _lock = self.lock(true)?;
        let mut state = self.load()?;
        let out = op(&mut state)?;
        self.save(&state)?;
        Ok(out)
    }
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    ///
    /// An existing file is read once here so a corrupt store fails early.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let files = StoreFiles::new(path.as_ref());
        files.read(|_| ())?;
        Ok(JsonFileStore { files })
    }

    pub fn path(&self) -> &Path {
        &self.files.data
    }

    async fn read<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        F: FnOnce(&StoreState) -> T + Send + 'static,
        T: Send + 'static,
    {
        let files = self.files.clone();
        tokio::task::spawn_blocking(move || files.read(op))
            .await
            .map_err(|e| StorageError::Backend(format!("store task failed: {}", e)))?
    }

    async fn write<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut StoreState) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let files = self.files.clone();
        tokio::task::spawn_blocking(move || files.write(op))
            .await
            .map_err(|e| StorageError::Backend(format!("store task failed: {}", e)))?
    }
}

#[async_trait]
impl RosterStore for JsonFileStore {
    async fn find_roster(
        &self,
        employee_id: &str,
        period: Period,
    ) -> Result<Option<RosterRecord>, StorageError> {
        let employee_id = employee_id.to_string();
        self.read(move |s| s.find_roster(&employee_id, period)).await
    }

    async fn get_roster(
        &self,
        employee_id: &str,
        roster_id: RecordId,
    ) -> Result<RosterRecord, StorageError> {
        let employee_id = employee_id.to_string();
        self.read(move |s| s.get_roster(&employee_id, roster_id))
            .await?
    }

    async fn create_roster(&self, roster: NewRoster) -> Result<RosterRecord, StorageError> {
        self.write(move |s| s.create_roster(roster)).await
    }

    async fn update_roster(&self, roster: &RosterRecord) -> Result<(), StorageError> {
        let roster = roster.clone();
        self.write(move |s| s.update_roster(&roster)).await
    }

    async fn touch_roster(
        &self,
        employee_id: &str,
        roster_id: RecordId,
        at: OffsetDateTime,
    ) -> Result<(), StorageError> {
        let employee_id = employee_id.to_string();
        self.write(move |s| s.touch_roster(&employee_id, roster_id, at))
            .await
    }

    async fn find_assignment(
        &self,
        employee_id: &str,
        roster_id: RecordId,
        date: Date,
    ) -> Result<Option<ShiftAssignmentRecord>, StorageError> {
        let employee_id = employee_id.to_string();
        self.read(move |s| s.find_assignment(&employee_id, roster_id, date))
            .await
    }

    async fn list_assignments(
        &self,
        employee_id: &str,
        roster_id: RecordId,
    ) -> Result<Vec<ShiftAssignmentRecord>, StorageError> {
        let employee_id = employee_id.to_string();
        self.read(move |s| s.list_assignments(&employee_id, roster_id))
            .await
    }

    async fn list_upcoming(
        &self,
        employee_id: &str,
        from: Date,
        limit: usize,
    ) -> Result<Vec<ShiftAssignmentRecord>, StorageError> {
        let employee_id = employee_id.to_string();
        self.read(move |s| s.list_upcoming(&employee_id, from, limit))
            .await
    }

    async fn create_assignment(
        &self,
        assignment: NewAssignment,
    ) -> Result<ShiftAssignmentRecord, StorageError> {
        self.write(move |s| s.create_assignment(assignment)).await
    }

    async fn update_assignment(
        &self,
        assignment: &ShiftAssignmentRecord,
    ) -> Result<(), StorageError> {
        let assignment = assignment.clone();
        self.write(move |s| s.update_assignment(&assignment)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::RosterStatus;
    use std::sync::Arc;

    fn feb_2024() -> Period {
        Period::new(2024, 2).unwrap()
    }

    fn new_roster(employee: &str) -> NewRoster {
        NewRoster {
            employee_id: employee.to_string(),
            period: feb_2024(),
            status: RosterStatus::Draft,
            external_reference: Some(format!("OCT-20242-{}", employee)),
        }
    }

    #[tokio::test]
    async fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let created = {
            let store = JsonFileStore::open(&path).unwrap();
            store.create_roster(new_roster("e1")).await.unwrap()
        };

        let reopened = JsonFileStore::open(&path).unwrap();
        let found = reopened
            .find_roster("e1", feb_2024())
            .await
            .unwrap()
            .expect("roster persisted");
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn rejected_write_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = JsonFileStore::open(&path).unwrap();
        store.create_roster(new_roster("e1")).await.unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let dup = store.create_roster(new_roster("e1")).await;
        assert!(matches!(dup, Err(StorageError::RosterAlreadyExists { .. })));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn corrupt_file_is_a_backend_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StorageError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn two_handles_on_one_file_keep_each_others_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let a = JsonFileStore::open(&path).unwrap();
        let b = JsonFileStore::open(&path).unwrap();

        let e1 = a.create_roster(new_roster("e1")).await.unwrap();
        let e2 = b.create_roster(new_roster("e2")).await.unwrap();
        assert_ne!(e1.id, e2.id);

        // Each handle sees the other's roster, and so does a fresh one.
        assert_eq!(b.find_roster("e1", feb_2024()).await.unwrap(), Some(e1.clone()));
        assert_eq!(a.find_roster("e2", feb_2024()).await.unwrap(), Some(e2.clone()));
        let c = JsonFileStore::open(&path).unwrap();
        assert_eq!(c.find_roster("e1", feb_2024()).await.unwrap(), Some(e1));
        assert_eq!(c.find_roster("e2", feb_2024()).await.unwrap(), Some(e2));

        // The uniqueness check runs against the latest state on disk.
        let dup = b.create_roster(new_roster("e1")).await;
        assert!(matches!(dup, Err(StorageError::RosterAlreadyExists { .. })));
    }

    #[tokio::test]
    async fn interleaved_writers_on_one_file_lose_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let handles = [
            Arc::new(JsonFileStore::open(&path).unwrap()),
            Arc::new(JsonFileStore::open(&path).unwrap()),
        ];

        let mut tasks = Vec::new();
        for i in 0..12 {
            let store = Arc::clone(&handles[i % 2]);
            tasks.push(tokio::spawn(async move {
                store.create_roster(new_roster(&format!("e{}", i))).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let fresh = JsonFileStore::open(&path).unwrap();
        for i in 0..12 {
            let found = fresh
                .find_roster(&format!("e{}", i), feb_2024())
                .await
                .unwrap();
            assert!(found.is_some(), "roster of e{} lost", i);
        }
    }
}
