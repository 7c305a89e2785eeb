use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::StoreError;
use crate::models::Doctor;

use super::StoredRecord;

/// Retrieve every doctor in insertion order. Ordering by `id` keeps the list
/// stable between calls as long as nobody writes in between.
pub(crate) fn fetch_doctors(conn: &Connection) -> Result<Vec<StoredRecord<Doctor>>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT id, name, age, specialty FROM doctors ORDER BY id")
        .map_err(StoreError::sqlite("prepare doctor query"))?;

    let doctors = stmt
        .query_map([], |row| {
            Ok(StoredRecord {
                id: row.get(0)?,
                record: Doctor::new(
                    row.get::<_, String>(1)?,
                    row.get(2)?,
                    row.get::<_, String>(3)?,
                ),
            })
        })
        .map_err(StoreError::sqlite("load doctors"))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::sqlite("collect doctors"))?;

    Ok(doctors)
}

/// Insert one doctor row and hand back the id SQLite assigned to it.
pub(crate) fn insert_doctor(
    conn: &Connection,
    name: &str,
    age: u32,
    specialty: &str,
) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO doctors (name, age, specialty) VALUES (?1, ?2, ?3)",
        params![name, age, specialty],
    )
    .map_err(StoreError::sqlite("insert doctor"))?;

    let id = conn.last_insert_rowid();
    debug!(id, name, "inserted doctor");
    Ok(id)
}

/// Exact, case-sensitive name lookup.
pub(crate) fn doctor_exists(conn: &Connection, name: &str) -> Result<bool, StoreError> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM doctors WHERE name = ?1)",
        params![name],
        |row| row.get(0),
    )
    .map_err(StoreError::sqlite("check doctor name"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::RecordStore;
    use crate::models::Person;

    fn temp_store() -> (tempfile::TempDir, RecordStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("clinic.sqlite")).unwrap();
        store.ensure_schema().unwrap();
        (dir, store)
    }

    #[test]
    fn inserted_doctor_is_listed_with_its_id() {
        let (_dir, store) = temp_store();
        let id = store.insert_doctor("dr. Rifqi", 45, "Penyakit Hati").unwrap();

        let doctors = store.list_doctors().unwrap();
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].id, id);
        assert_eq!(doctors[0].record.name(), "dr. Rifqi");
        assert_eq!(doctors[0].record.age(), 45);
        assert_eq!(doctors[0].record.specialty(), "Penyakit Hati");
    }

    #[test]
    fn listing_preserves_insertion_order() {
        let (_dir, store) = temp_store();
        for name in ["dr. B", "dr. A", "dr. C"] {
            store.insert_doctor(name, 50, "Umum").unwrap();
        }

        let names: Vec<_> = store
            .list_doctors()
            .unwrap()
            .into_iter()
            .map(|row| row.record.name().to_string())
            .collect();
        assert_eq!(names, ["dr. B", "dr. A", "dr. C"]);
    }

    #[test]
    fn existence_check_is_case_sensitive() {
        let (_dir, store) = temp_store();
        store.insert_doctor("dr. Panji", 40, "Umum").unwrap();

        assert!(store.exists_doctor_by_name("dr. Panji").unwrap());
        assert!(!store.exists_doctor_by_name("DR. PANJI").unwrap());
        assert!(!store.exists_doctor_by_name("dr. Panj").unwrap());
        assert!(!store.exists_patient_by_name("dr. Panji").unwrap());
    }

    #[test]
    fn non_positive_age_is_rejected_by_the_schema() {
        let (_dir, store) = temp_store();
        let err = store.insert_doctor("dr. Nol", 0, "Umum").unwrap_err();
        assert!(matches!(err, StoreError::Sqlite { action: "insert doctor", .. }));
        assert!(store.list_doctors().unwrap().is_empty());
    }
}
