//! Persistence module split across logical submodules: the connection owner
//! plus one file of queries per table.

mod connection;
mod doctors;
mod patients;

pub use connection::RecordStore;

/// A row as it comes back from the store: the store-assigned id plus the
/// domain value built from the remaining columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord<T> {
    pub id: i64,
    pub record: T,
}
