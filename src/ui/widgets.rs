use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Widget, Wrap};

use crate::models::{Doctor, Patient, Person};

/// Width every panel and table is drawn at.
pub(crate) const VIEW_WIDTH: u16 = 78;

/// Column widths shared by both roster tables: number, name, age, detail.
const COLUMN_WIDTHS: [Constraint; 4] = [
    Constraint::Length(5),
    Constraint::Length(25),
    Constraint::Length(10),
    Constraint::Length(25),
];

/// Everything needed to print a widget once: the widget and how tall it is.
pub(crate) struct Rendered<W> {
    pub(crate) widget: W,
    pub(crate) height: u16,
}

impl<W: Widget> Rendered<W> {
    /// Draw into an off-screen buffer `VIEW_WIDTH` columns wide.
    pub(crate) fn into_buffer(self) -> Buffer {
        let area = Rect::new(0, 0, VIEW_WIDTH, self.height);
        let mut buffer = Buffer::empty(area);
        self.widget.render(area, &mut buffer);
        buffer
    }
}

/// Banner naming the clinic above the data listing.
pub(crate) fn header_panel(clinic_name: &str) -> Rendered<Paragraph<'_>> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            "Clinic Data",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let widget = Paragraph::new(Line::from(Span::styled(
        clinic_name,
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )))
    .block(block);

    Rendered { widget, height: 3 }
}

pub(crate) fn doctor_table(doctors: &[Doctor]) -> Rendered<Table<'_>> {
    let rows = doctors
        .iter()
        .enumerate()
        .map(|(idx, doctor)| person_row(idx, doctor, doctor.specialty(), Color::Green));
    roster_table("Doctors", "Specialty", Color::Green, rows, "(no doctors yet)")
}

pub(crate) fn patient_table(patients: &[Patient]) -> Rendered<Table<'_>> {
    let rows = patients
        .iter()
        .enumerate()
        .map(|(idx, patient)| person_row(idx, patient, patient.condition(), Color::Red));
    roster_table("Patients", "Condition", Color::Blue, rows, "(no patients yet)")
}

/// Pairing confirmation: doctor, patient and what the patient is treated for.
pub(crate) fn verification_panel<'a>(
    doctor: &'a Doctor,
    patient: &'a Patient,
) -> Rendered<Paragraph<'a>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let line = Line::from(vec![
        Span::styled(format!("Doctor {}", doctor.name()), bold.fg(Color::Green)),
        Span::raw(" verified patient "),
        Span::styled(patient.name(), bold.fg(Color::Cyan)),
        Span::raw(" with condition "),
        Span::styled(patient.condition(), bold.fg(Color::Red)),
    ]);

    // Measure the wrapped body at the width left inside the borders.
    let body = Paragraph::new(line).wrap(Wrap { trim: true });
    let text_rows = u16::try_from(body.line_count(VIEW_WIDTH - 2)).unwrap_or(u16::MAX);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled("Patient Verification", bold.fg(Color::Yellow)));

    Rendered {
        widget: body.block(block),
        height: text_rows.saturating_add(2),
    }
}

fn person_row<'a, P: Person>(
    idx: usize,
    person: &'a P,
    detail: &'a str,
    detail_color: Color,
) -> Row<'a> {
    Row::new(vec![
        Cell::from(Line::from((idx + 1).to_string()).alignment(Alignment::Center))
            .style(Style::default().fg(Color::Cyan)),
        Cell::from(person.name()).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Cell::from(Line::from(person.age().to_string()).alignment(Alignment::Center))
            .style(Style::default().fg(Color::Yellow)),
        Cell::from(detail).style(Style::default().fg(detail_color)),
    ])
}

fn roster_table<'a>(
    title: &'a str,
    detail_heading: &'a str,
    accent: Color,
    rows: impl Iterator<Item = Row<'a>>,
    placeholder: &'a str,
) -> Rendered<Table<'a>> {
    let mut rows: Vec<Row<'a>> = rows.collect();
    if rows.is_empty() {
        rows.push(
            Row::new(vec![Cell::from(""), Cell::from(placeholder)])
                .style(Style::default().add_modifier(Modifier::DIM)),
        );
    }
    let height = u16::try_from(rows.len()).unwrap_or(u16::MAX).saturating_add(3);

    let heading = Style::default().fg(accent).add_modifier(Modifier::BOLD);
    let header = Row::new(vec![
        Cell::from(Line::from("No").alignment(Alignment::Center)),
        Cell::from("Name"),
        Cell::from(Line::from("Age").alignment(Alignment::Center)),
        Cell::from(detail_heading),
    ])
    .style(heading);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(title, heading));

    Rendered {
        widget: Table::new(rows, COLUMN_WIDTHS).header(header).block(block),
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::helpers::buffer_lines;

    #[test]
    fn doctor_table_lists_every_doctor_in_order() {
        let doctors = vec![
            Doctor::new("dr. Rifqi", 45, "Penyakit Hati"),
            Doctor::new("dr. Panji", 40, "Umum"),
        ];

        let lines = buffer_lines(&doctor_table(&doctors).into_buffer());

        assert!(lines[0].contains("Doctors"));
        assert!(lines[1].contains("Name") && lines[1].contains("Specialty"));
        assert!(lines[2].contains("dr. Rifqi"));
        assert!(lines[2].contains("45"));
        assert!(lines[2].contains("Penyakit Hati"));
        assert!(lines[3].contains("dr. Panji"));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn empty_patient_table_shows_placeholder() {
        let lines = buffer_lines(&patient_table(&[]).into_buffer());

        assert!(lines[1].contains("Condition"));
        assert!(lines[2].contains("(no patients yet)"));
    }

    #[test]
    fn table_height_saturates_instead_of_overflowing() {
        let patients = vec![Patient::new("Andi", 30, "Demam"); 70_000];
        assert_eq!(patient_table(&patients).height, u16::MAX);
    }

    #[test]
    fn verification_panel_grows_to_fit_wrapped_text() {
        for name_len in [1, 24, 40, 70] {
            for condition_len in [10, 30, 50, 70] {
                let doctor = Doctor::new("d".repeat(name_len), 40, "Umum");
                let patient = Patient::new(
                    "p".repeat(name_len),
                    30,
                    format!("{}END", "c".repeat(condition_len - 3)),
                );

                let rendered = verification_panel(&doctor, &patient);
                let height = rendered.height;
                let lines = buffer_lines(&rendered.into_buffer());

                assert_eq!(lines.len(), usize::from(height));
                assert!(
                    lines.iter().any(|line| line.contains("END")),
                    "condition cut off for name {name_len}, condition {condition_len}"
                );
                assert!(lines.last().unwrap().starts_with('╰'));
            }
        }
    }

    #[test]
    fn header_panel_names_the_clinic() {
        let lines = buffer_lines(&header_panel("Rumah Sakit Mini").into_buffer());
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Rumah Sakit Mini"));
    }

    #[test]
    fn verification_panel_mentions_both_people_and_condition() {
        let doctor = Doctor::new("dr. Panji", 40, "Umum");
        let patient = Patient::new("Andi", 30, "Demam");

        let text = buffer_lines(&verification_panel(&doctor, &patient).into_buffer()).join("\n");

        assert!(text.contains("Doctor dr. Panji"));
        assert!(text.contains("Andi"));
        assert!(text.contains("Demam"));
    }
}
