use std::io::{self, IsTerminal, Stdout, Write};

use crossterm::queue;
use crossterm::style::{PrintStyledContent, Stylize};
use ratatui::buffer::Buffer;

use crate::error::PromptError;
use crate::models::{Doctor, Patient};
use crate::session::MenuChoice;

use super::helpers::{buffer_lines, write_buffer};
use super::terminal::read_line;
use super::widgets::{doctor_table, header_panel, patient_table, verification_panel};
use super::{ClinicView, Severity};

/// [`ClinicView`] that draws to a terminal. Tables and panels are rendered
/// with ratatui into an off-screen buffer and then printed inline, so the
/// scrollback keeps the whole session. With `styled` off, output is plain
/// text (useful when stdout is piped).
pub struct ConsoleView<W: Write> {
    out: W,
    styled: bool,
}

impl ConsoleView<Stdout> {
    /// Write to stdout, with colours only when stdout is a terminal.
    pub fn stdout() -> Self {
        let out = io::stdout();
        let styled = out.is_terminal();
        Self::new(out, styled)
    }
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W, styled: bool) -> Self {
        Self { out, styled }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, buffer: &Buffer) -> io::Result<()> {
        if self.styled {
            write_buffer(&mut self.out, buffer)
        } else {
            for line in buffer_lines(buffer) {
                writeln!(self.out, "{line}")?;
            }
            self.out.flush()
        }
    }
}

impl<W: Write> ClinicView for ConsoleView<W> {
    fn show_menu(&mut self, choices: &[MenuChoice]) -> io::Result<()> {
        writeln!(self.out)?;
        if self.styled {
            queue!(
                self.out,
                PrintStyledContent("Clinic Menu".bold().underlined().cyan())
            )?;
            writeln!(self.out)?;
        } else {
            writeln!(self.out, "Clinic Menu")?;
        }
        for choice in choices {
            writeln!(self.out, "[{}] {}", choice.key(), choice.label())?;
        }
        self.out.flush()
    }

    fn show_header(&mut self, clinic_name: &str) -> io::Result<()> {
        writeln!(self.out)?;
        self.emit(&header_panel(clinic_name).into_buffer())
    }

    fn show_doctors(&mut self, doctors: &[Doctor]) -> io::Result<()> {
        self.emit(&doctor_table(doctors).into_buffer())
    }

    fn show_patients(&mut self, patients: &[Patient]) -> io::Result<()> {
        self.emit(&patient_table(patients).into_buffer())
    }

    fn show_verification(&mut self, doctor: &Doctor, patient: &Patient) -> io::Result<()> {
        self.emit(&verification_panel(doctor, patient).into_buffer())
    }

    fn show_message(&mut self, text: &str, severity: Severity) -> io::Result<()> {
        if !self.styled {
            writeln!(self.out, "{text}")?;
            return self.out.flush();
        }

        let styled = match severity {
            Severity::Info => text.bold(),
            Severity::Success => text.bold().green(),
            Severity::Warning => text.bold().yellow(),
            Severity::Error => text.bold().red(),
        };
        queue!(self.out, PrintStyledContent(styled))?;
        writeln!(self.out)?;
        self.out.flush()
    }

    fn prompt_line(&mut self, text: &str) -> Result<String, PromptError> {
        write!(self.out, "{text}")?;
        read_line(&mut self.out)
    }
}
