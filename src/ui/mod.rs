//! Console front-end. The session controller only ever talks to the
//! [`ClinicView`] trait; colours, tables and prompt mechanics stay in here.

mod console;
mod helpers;
mod terminal;
mod widgets;

use std::io;

use crate::error::PromptError;
use crate::models::{Doctor, Patient};
use crate::session::MenuChoice;

pub use console::ConsoleView;
pub use helpers::surface_error;

/// Severity levels for one-line messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// The narrow display interface the session controller drives.
pub trait ClinicView {
    fn show_menu(&mut self, choices: &[MenuChoice]) -> io::Result<()>;

    fn show_header(&mut self, clinic_name: &str) -> io::Result<()>;

    fn show_doctors(&mut self, doctors: &[Doctor]) -> io::Result<()>;

    fn show_patients(&mut self, patients: &[Patient]) -> io::Result<()>;

    fn show_verification(&mut self, doctor: &Doctor, patient: &Patient) -> io::Result<()>;

    fn show_message(&mut self, text: &str, severity: Severity) -> io::Result<()>;

    /// Show `text` and read one line of input, without the trailing newline.
    fn prompt_line(&mut self, text: &str) -> Result<String, PromptError>;
}
