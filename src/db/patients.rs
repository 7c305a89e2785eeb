use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::StoreError;
use crate::models::Patient;

use super::StoredRecord;

pub(crate) fn fetch_patients(conn: &Connection) -> Result<Vec<StoredRecord<Patient>>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT id, name, age, condition FROM patients ORDER BY id")
        .map_err(StoreError::sqlite("prepare patient query"))?;

    let patients = stmt
        .query_map([], |row| {
            Ok(StoredRecord {
                id: row.get(0)?,
                record: Patient::new(
                    row.get::<_, String>(1)?,
                    row.get(2)?,
                    row.get::<_, String>(3)?,
                ),
            })
        })
        .map_err(StoreError::sqlite("load patients"))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::sqlite("collect patients"))?;

    Ok(patients)
}

pub(crate) fn insert_patient(
    conn: &Connection,
    name: &str,
    age: u32,
    condition: &str,
) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO patients (name, age, condition) VALUES (?1, ?2, ?3)",
        params![name, age, condition],
    )
    .map_err(StoreError::sqlite("insert patient"))?;

    let id = conn.last_insert_rowid();
    debug!(id, name, "inserted patient");
    Ok(id)
}

pub(crate) fn patient_exists(conn: &Connection, name: &str) -> Result<bool, StoreError> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM patients WHERE name = ?1)",
        params![name],
        |row| row.get(0),
    )
    .map_err(StoreError::sqlite("check patient name"))
}
