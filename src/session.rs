//! Session controller: turns raw menu input into validated roster operations
//! and routes every result to the [`ClinicView`]. Input is validated before
//! any entity is built, so a rejected add never reaches the roster.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::error::{PromptError, ValidationError};
use crate::models::{Doctor, Patient, Role};
use crate::roster::{AddOutcome, Clinic, Verification};
use crate::ui::{surface_error, ClinicView, Severity};

/// Entries of the main menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddDoctor,
    AddPatient,
    ShowData,
    VerifyPatient,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 5] = [
        MenuChoice::AddDoctor,
        MenuChoice::AddPatient,
        MenuChoice::ShowData,
        MenuChoice::VerifyPatient,
        MenuChoice::Exit,
    ];

    /// Number the user types to pick this entry.
    pub fn key(self) -> u8 {
        match self {
            MenuChoice::AddDoctor => 1,
            MenuChoice::AddPatient => 2,
            MenuChoice::ShowData => 3,
            MenuChoice::VerifyPatient => 4,
            MenuChoice::Exit => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::AddDoctor => "Add Doctor",
            MenuChoice::AddPatient => "Add Patient",
            MenuChoice::ShowData => "Show Data",
            MenuChoice::VerifyPatient => "Verify Patient by Doctor",
            MenuChoice::Exit => "Exit",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let key: u8 = input.trim().parse().ok()?;
        Self::ALL.into_iter().find(|choice| choice.key() == key)
    }
}

/// Where the controller is in its loop. `Exited` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingChoice,
    AddingDoctor,
    AddingPatient,
    Listing,
    Verifying,
    Exiting,
    Exited,
}

impl From<MenuChoice> for SessionState {
    fn from(choice: MenuChoice) -> Self {
        match choice {
            MenuChoice::AddDoctor => SessionState::AddingDoctor,
            MenuChoice::AddPatient => SessionState::AddingPatient,
            MenuChoice::ShowData => SessionState::Listing,
            MenuChoice::VerifyPatient => SessionState::Verifying,
            MenuChoice::Exit => SessionState::Exiting,
        }
    }
}

/// How a finished session ended. Both count as a clean exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Exited,
    Interrupted,
}

/// Accept only a run of ASCII digits that parses to a number above zero.
pub fn parse_age(raw: &str) -> Result<u32, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::EmptyAge);
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::NotDigits);
    }

    let age: u32 = raw.parse().map_err(|_| ValidationError::OutOfRange)?;
    if age == 0 {
        return Err(ValidationError::NotPositive);
    }
    Ok(age)
}

pub fn require_name(raw: &str) -> Result<&str, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        Err(ValidationError::EmptyName)
    } else {
        Ok(name)
    }
}

/// Drives one interactive run against a clinic and a view.
pub struct Session<V: ClinicView> {
    clinic: Clinic,
    view: V,
    state: SessionState,
}

impl<V: ClinicView> Session<V> {
    pub fn new(clinic: Clinic, view: V) -> Self {
        Self {
            clinic,
            view,
            state: SessionState::AwaitingChoice,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn clinic(&self) -> &Clinic {
        &self.clinic
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_parts(self) -> (Clinic, V) {
        (self.clinic, self.view)
    }

    /// Run the menu loop until the user exits or interrupts. The store is
    /// closed on every way out, including errors.
    pub fn run(&mut self) -> Result<SessionEnd> {
        let result = self.announce_store().and_then(|()| self.drive());

        match result {
            Ok(()) => Ok(SessionEnd::Exited),
            Err(err) if is_cancellation(&err) => {
                info!("session interrupted");
                let notice = self
                    .view
                    .show_message("Input cancelled by user, exiting.", Severity::Warning);
                self.shutdown()?;
                notice?;
                Ok(SessionEnd::Interrupted)
            }
            Err(err) => {
                // Keep the original error; shutdown problems are secondary here.
                let _ = self.shutdown();
                Err(err)
            }
        }
    }

    fn drive(&mut self) -> Result<()> {
        while self.state != SessionState::Exited {
            self.step()?;
        }
        Ok(())
    }

    /// Execute the current state and move to the next one.
    pub fn step(&mut self) -> Result<()> {
        debug!(state = ?self.state, "session step");
        self.state = match self.state {
            SessionState::AwaitingChoice => self.await_choice()?,
            SessionState::AddingDoctor => {
                self.add_doctor()?;
                SessionState::AwaitingChoice
            }
            SessionState::AddingPatient => {
                self.add_patient()?;
                SessionState::AwaitingChoice
            }
            SessionState::Listing => {
                self.show_data()?;
                SessionState::AwaitingChoice
            }
            SessionState::Verifying => {
                self.verify()?;
                SessionState::AwaitingChoice
            }
            SessionState::Exiting => {
                self.shutdown()?;
                SessionState::Exited
            }
            SessionState::Exited => SessionState::Exited,
        };
        Ok(())
    }

    fn announce_store(&mut self) -> Result<()> {
        let path = self.clinic.store_path().display().to_string();
        self.view.show_message(
            &format!("Connected to database '{path}'."),
            Severity::Success,
        )?;
        self.view
            .show_message("Database tables created/checked.", Severity::Success)?;
        Ok(())
    }

    fn await_choice(&mut self) -> Result<SessionState> {
        self.view.show_menu(&MenuChoice::ALL)?;
        let input = self.prompt("Enter your choice (1-5): ")?;

        match MenuChoice::parse(&input) {
            Some(choice) => Ok(choice.into()),
            None => {
                self.view.show_message(
                    "Invalid choice, please pick a number from 1 to 5.",
                    Severity::Error,
                )?;
                Ok(SessionState::AwaitingChoice)
            }
        }
    }

    fn add_doctor(&mut self) -> Result<()> {
        let name = self.prompt("Doctor name: ")?;
        let age = self.prompt("Doctor age: ")?;
        let specialty = self.prompt("Doctor specialty: ")?;

        let Some((name, age)) = self.validate(&name, &age)? else {
            return Ok(());
        };

        let outcome = self
            .clinic
            .add_doctor(Doctor::new(name, age, specialty.trim()));
        self.report(Role::Doctor, name, outcome)
    }

    fn add_patient(&mut self) -> Result<()> {
        let name = self.prompt("Patient name: ")?;
        let age = self.prompt("Patient age: ")?;
        let condition = self.prompt("Patient condition: ")?;

        let Some((name, age)) = self.validate(&name, &age)? else {
            return Ok(());
        };

        let outcome = self
            .clinic
            .add_patient(Patient::new(name, age, condition.trim()));
        self.report(Role::Patient, name, outcome)
    }

    /// Validate name and age, showing the first problem to the user. `None`
    /// means the add is abandoned.
    fn validate<'a>(&mut self, name: &'a str, age: &str) -> Result<Option<(&'a str, u32)>> {
        let checked = require_name(name).and_then(|name| Ok((name, parse_age(age)?)));
        match checked {
            Ok(valid) => Ok(Some(valid)),
            Err(err) => {
                debug!(%err, "rejected input");
                self.view.show_message(&err.to_string(), Severity::Error)?;
                Ok(None)
            }
        }
    }

    fn report(&mut self, role: Role, name: &str, outcome: AddOutcome) -> Result<()> {
        let (text, severity) = match outcome {
            AddOutcome::Added(id) => (
                format!("{role} '{name}' saved with id {id}."),
                Severity::Success,
            ),
            AddOutcome::AlreadyInMemory => (
                format!("{role} '{name}' is already registered."),
                Severity::Info,
            ),
            AddOutcome::AlreadyInStore => (
                format!("{role} '{name}' already exists in the database."),
                Severity::Info,
            ),
            AddOutcome::PersistFailed(err) => {
                let cause = surface_error(&anyhow::Error::new(err));
                (
                    format!(
                        "Could not save {} '{name}': {cause}",
                        role.to_string().to_lowercase()
                    ),
                    Severity::Error,
                )
            }
        };
        self.view.show_message(&text, severity)?;
        Ok(())
    }

    fn show_data(&mut self) -> Result<()> {
        self.view.show_header(self.clinic.name())?;
        self.view.show_doctors(self.clinic.all_doctors())?;
        self.view.show_patients(self.clinic.all_patients())?;
        Ok(())
    }

    fn verify(&mut self) -> Result<()> {
        let doctor_name = self.prompt("Doctor name: ")?;
        let patient_name = self.prompt("Patient name: ")?;

        match self.clinic.verify(doctor_name.trim(), patient_name.trim()) {
            Verification::Confirmed { doctor, patient } => {
                self.view.show_verification(doctor, patient)?;
            }
            Verification::NotFound { doctor, patient } => {
                if let Some(name) = doctor {
                    self.view.show_message(
                        &format!("Doctor '{name}' not found."),
                        Severity::Error,
                    )?;
                }
                if let Some(name) = patient {
                    self.view.show_message(
                        &format!("Patient '{name}' not found."),
                        Severity::Error,
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Close the store and say goodbye. Runs at most once per session.
    fn shutdown(&mut self) -> Result<()> {
        if self.state == SessionState::Exited {
            return Ok(());
        }
        self.state = SessionState::Exited;

        match self.clinic.close() {
            Ok(()) => self
                .view
                .show_message("Database connection closed.", Severity::Success)?,
            Err(err) => {
                let cause = surface_error(&anyhow::Error::new(err));
                self.view.show_message(
                    &format!("Failed to close the database: {cause}"),
                    Severity::Error,
                )?;
            }
        }

        let farewell = format!("Thank you for using the {} system!", self.clinic.name());
        self.view.show_message(&farewell, Severity::Success)?;
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<String> {
        let line = self.view.prompt_line(text).context("failed to read input")?;
        Ok(line.trim().to_string())
    }
}

fn is_cancellation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<PromptError>()
        .is_some_and(PromptError::is_cancellation)
}
