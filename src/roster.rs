//! The clinic roster: the in-memory list of who is known this session, kept in
//! step with the record store. The roster is append-only. Every add checks
//! memory first, then the store, and only touches memory after the row is
//! safely on disk.

use std::path::Path;

use tracing::{debug, warn};

use crate::db::RecordStore;
use crate::error::StoreError;
use crate::models::{Doctor, Patient, Person};

/// Result of an add request. Duplicates are ordinary outcomes, not errors.
#[derive(Debug)]
pub enum AddOutcome {
    /// Persisted under the given store id and appended to memory.
    Added(i64),
    AlreadyInMemory,
    AlreadyInStore,
    /// The store could not check or persist the record; memory is unchanged.
    PersistFailed(StoreError),
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added(_))
    }
}

/// Outcome of pairing a doctor with a patient.
#[derive(Debug, PartialEq, Eq)]
pub enum Verification<'a> {
    Confirmed {
        doctor: &'a Doctor,
        patient: &'a Patient,
    },
    /// At least one side is unknown; each `Some` names a missing person.
    NotFound {
        doctor: Option<String>,
        patient: Option<String>,
    },
}

/// Aggregate root: the clinic's name, its doctors and patients, and the one
/// store connection it owns for the lifetime of the process.
#[derive(Debug)]
pub struct Clinic {
    name: String,
    doctors: Vec<Doctor>,
    patients: Vec<Patient>,
    store: RecordStore,
}

impl Clinic {
    /// Open the store at `path`, make sure the schema exists, and hydrate the
    /// roster from whatever is already on disk.
    pub fn open(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = RecordStore::open(path)?;
        store.ensure_schema()?;
        Self::with_store(name, store)
    }

    /// Build a clinic around an already opened store and run the load phase.
    pub fn with_store(name: impl Into<String>, store: RecordStore) -> Result<Self, StoreError> {
        let mut clinic = Self {
            name: name.into(),
            doctors: Vec::new(),
            patients: Vec::new(),
            store,
        };
        clinic.load()?;
        Ok(clinic)
    }

    /// Pull every stored doctor and patient into memory. Rows whose name is
    /// already present are skipped, which makes repeated loads harmless.
    pub fn load(&mut self) -> Result<(), StoreError> {
        for row in self.store.list_doctors()? {
            if contains_name(&self.doctors, row.record.name()) {
                warn!(name = row.record.name(), "skipping duplicate doctor row");
                continue;
            }
            self.doctors.push(row.record);
        }

        for row in self.store.list_patients()? {
            if contains_name(&self.patients, row.record.name()) {
                warn!(name = row.record.name(), "skipping duplicate patient row");
                continue;
            }
            self.patients.push(row.record);
        }

        debug!(
            doctors = self.doctors.len(),
            patients = self.patients.len(),
            "roster loaded"
        );
        Ok(())
    }

    pub fn add_doctor(&mut self, doctor: Doctor) -> AddOutcome {
        if contains_name(&self.doctors, doctor.name()) {
            return AddOutcome::AlreadyInMemory;
        }

        match self.store.exists_doctor_by_name(doctor.name()) {
            Ok(true) => return AddOutcome::AlreadyInStore,
            Ok(false) => {}
            Err(err) => return persist_failed(&doctor, err),
        }

        match self
            .store
            .insert_doctor(doctor.name(), doctor.age(), doctor.specialty())
        {
            Ok(id) => {
                self.doctors.push(doctor);
                AddOutcome::Added(id)
            }
            Err(err) => persist_failed(&doctor, err),
        }
    }

    pub fn add_patient(&mut self, patient: Patient) -> AddOutcome {
        if contains_name(&self.patients, patient.name()) {
            return AddOutcome::AlreadyInMemory;
        }

        match self.store.exists_patient_by_name(patient.name()) {
            Ok(true) => return AddOutcome::AlreadyInStore,
            Ok(false) => {}
            Err(err) => return persist_failed(&patient, err),
        }

        match self
            .store
            .insert_patient(patient.name(), patient.age(), patient.condition())
        {
            Ok(id) => {
                self.patients.push(patient);
                AddOutcome::Added(id)
            }
            Err(err) => persist_failed(&patient, err),
        }
    }

    pub fn find_doctor_by_name(&self, name: &str) -> Option<&Doctor> {
        self.doctors.iter().find(|doctor| doctor.name() == name)
    }

    pub fn find_patient_by_name(&self, name: &str) -> Option<&Patient> {
        self.patients.iter().find(|patient| patient.name() == name)
    }

    /// Look up both people. Display-only: nothing is recorded.
    pub fn verify(&self, doctor_name: &str, patient_name: &str) -> Verification<'_> {
        match (
            self.find_doctor_by_name(doctor_name),
            self.find_patient_by_name(patient_name),
        ) {
            (Some(doctor), Some(patient)) => Verification::Confirmed { doctor, patient },
            (doctor, patient) => Verification::NotFound {
                doctor: doctor.is_none().then(|| doctor_name.to_string()),
                patient: patient.is_none().then(|| patient_name.to_string()),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn all_doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn all_patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn store_path(&self) -> &Path {
        self.store.path()
    }

    pub fn is_open(&self) -> bool {
        self.store.is_open()
    }

    /// Release the store connection. Idempotent.
    pub fn close(&mut self) -> Result<(), StoreError> {
        self.store.close()
    }
}

fn contains_name<P: Person>(people: &[P], name: &str) -> bool {
    people.iter().any(|person| person.name() == name)
}

fn persist_failed<P: Person>(person: &P, err: StoreError) -> AddOutcome {
    warn!(role = %person.role(), name = person.name(), error = %err, "record not persisted");
    AddOutcome::PersistFailed(err)
}
