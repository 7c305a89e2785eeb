use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::{Doctor, Patient};

use super::{doctors, patients, StoredRecord};

/// Owner of the single SQLite connection used for the whole session.
///
/// The connection is held in an `Option` so [`RecordStore::close`] can release
/// it explicitly and stay idempotent; dropping the store releases it too, which
/// covers early-return and panic paths.
#[derive(Debug)]
pub struct RecordStore {
    conn: Option<Connection>,
    path: PathBuf,
}

impl RecordStore {
    /// Open (creating if absent) the database file at `path`. Missing parent
    /// directories are created first so a fresh install works out of the box.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::DataDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(&path).map_err(StoreError::sqlite("open SQLite database"))?;
        info!(path = %path.display(), "opened record store");

        Ok(Self {
            conn: Some(conn),
            path,
        })
    }

    /// Create the `doctors` and `patients` tables when they do not exist yet.
    /// Safe to call on every startup.
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS doctors (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                age INTEGER NOT NULL CHECK (age > 0),
                specialty TEXT NOT NULL
            )",
            [],
        )
        .map_err(StoreError::sqlite("create doctors table"))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS patients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                age INTEGER NOT NULL CHECK (age > 0),
                condition TEXT NOT NULL
            )",
            [],
        )
        .map_err(StoreError::sqlite("create patients table"))?;

        debug!("record store schema ready");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Release the connection. Calling this again after a successful close is
    /// a no-op.
    pub fn close(&mut self) -> Result<(), StoreError> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        conn.close().map_err(|(_, source)| StoreError::Sqlite {
            action: "close SQLite database",
            source,
        })?;
        info!(path = %self.path.display(), "closed record store");
        Ok(())
    }

    pub fn insert_doctor(&self, name: &str, age: u32, specialty: &str) -> Result<i64, StoreError> {
        doctors::insert_doctor(self.conn()?, name, age, specialty)
    }

    pub fn insert_patient(&self, name: &str, age: u32, condition: &str) -> Result<i64, StoreError> {
        patients::insert_patient(self.conn()?, name, age, condition)
    }

    pub fn exists_doctor_by_name(&self, name: &str) -> Result<bool, StoreError> {
        doctors::doctor_exists(self.conn()?, name)
    }

    pub fn exists_patient_by_name(&self, name: &str) -> Result<bool, StoreError> {
        patients::patient_exists(self.conn()?, name)
    }

    pub fn list_doctors(&self) -> Result<Vec<StoredRecord<Doctor>>, StoreError> {
        doctors::fetch_doctors(self.conn()?)
    }

    pub fn list_patients(&self) -> Result<Vec<StoredRecord<Patient>>, StoreError> {
        patients::fetch_patients(self.conn()?)
    }

    fn conn(&self) -> Result<&Connection, StoreError> {
        self.conn.as_ref().ok_or(StoreError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, RecordStore) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = RecordStore::open(dir.path().join("clinic.sqlite")).expect("open store");
        store.ensure_schema().expect("schema");
        (dir, store)
    }

    #[test]
    fn open_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("clinic.sqlite");

        let store = RecordStore::open(&path).unwrap();

        assert!(store.is_open());
        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn open_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"occupied").unwrap();

        let err = RecordStore::open(blocker.join("clinic.sqlite")).unwrap_err();

        assert!(matches!(err, StoreError::DataDir { .. }));
    }

    #[test]
    fn ensure_schema_is_idempotent() {
        let (_dir, store) = temp_store();
        store.ensure_schema().unwrap();
        store.ensure_schema().unwrap();
        assert!(store.list_doctors().unwrap().is_empty());
        assert!(store.list_patients().unwrap().is_empty());
    }

    #[test]
    fn ids_increase_with_each_insert() {
        let (_dir, store) = temp_store();
        let first = store.insert_doctor("dr. Panji", 40, "Umum").unwrap();
        let second = store.insert_doctor("dr. Rifqi", 45, "Penyakit Hati").unwrap();
        assert!(second > first);
    }

    #[test]
    fn rows_survive_reopening_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic.sqlite");

        {
            let mut store = RecordStore::open(&path).unwrap();
            store.ensure_schema().unwrap();
            store.insert_patient("Andi", 30, "Demam").unwrap();
            store.close().unwrap();
        }

        let store = RecordStore::open(&path).unwrap();
        store.ensure_schema().unwrap();
        let patients = store.list_patients().unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].record, Patient::new("Andi", 30, "Demam"));
    }

    #[test]
    fn close_twice_is_a_no_op() {
        let (_dir, mut store) = temp_store();
        store.close().unwrap();
        store.close().unwrap();
        assert!(!store.is_open());
    }

    #[test]
    fn operations_after_close_report_closed() {
        let (_dir, mut store) = temp_store();
        store.close().unwrap();

        assert!(matches!(store.list_doctors(), Err(StoreError::Closed)));
        assert!(matches!(
            store.insert_patient("Andi", 30, "Demam"),
            Err(StoreError::Closed)
        ));
    }
}
