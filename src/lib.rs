//! Core library surface for the clinic roster console application.
//!
//! The binary wires these pieces together; tests and other tooling can reuse
//! them directly, for example to drive a [`Session`] with a scripted view.
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod roster;
pub mod session;
pub mod ui;

/// The persistence layer.
pub use db::{RecordStore, StoredRecord};

pub use error::{PromptError, StoreError, ValidationError};

/// Domain types the roster and the view exchange.
pub use models::{Doctor, Patient, Person, Role};

pub use roster::{AddOutcome, Clinic, Verification};

/// The interactive controller and the display interface it drives.
pub use session::{parse_age, MenuChoice, Session, SessionEnd, SessionState};
pub use ui::{ClinicView, ConsoleView, Severity};

pub use config::Config;
