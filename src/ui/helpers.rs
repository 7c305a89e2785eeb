use std::io::{self, Write};

use anyhow::Error;
use crossterm::queue;
use crossterm::style::{
    Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetForegroundColor,
};
use ratatui::buffer::Buffer;
use ratatui::style::{Color, Modifier};

/// Extract the most relevant error message from a chained error.
pub fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Flatten a rendered buffer into plain text rows with trailing blanks removed.
pub(crate) fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    rows(buffer)
        .map(|row| {
            let line: String = row
                .iter()
                .filter(|cell| !cell.skip)
                .map(|cell| cell.symbol())
                .collect();
            line.trim_end().to_string()
        })
        .collect()
}

/// Write a rendered buffer to a real terminal, switching colours only where
/// the style actually changes between cells.
pub(crate) fn write_buffer<W: Write>(out: &mut W, buffer: &Buffer) -> io::Result<()> {
    for row in rows(buffer) {
        let mut current: Option<(Color, Modifier)> = None;
        for cell in row.iter().filter(|cell| !cell.skip) {
            let style = (cell.fg, cell.modifier);
            if current != Some(style) {
                queue!(
                    out,
                    SetAttribute(Attribute::Reset),
                    SetForegroundColor(term_color(cell.fg))
                )?;
                for attribute in attributes(cell.modifier) {
                    queue!(out, SetAttribute(attribute))?;
                }
                current = Some(style);
            }
            queue!(out, Print(cell.symbol()))?;
        }
        queue!(out, SetAttribute(Attribute::Reset), ResetColor, Print("\n"))?;
    }
    out.flush()
}

fn rows(buffer: &Buffer) -> impl Iterator<Item = &[ratatui::buffer::Cell]> {
    let width = usize::from(buffer.area.width).max(1);
    buffer.content.chunks(width)
}

fn attributes(modifier: Modifier) -> impl Iterator<Item = Attribute> {
    [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::DIM, Attribute::Dim),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::UNDERLINED, Attribute::Underlined),
        (Modifier::REVERSED, Attribute::Reverse),
    ]
    .into_iter()
    .filter(move |(flag, _)| modifier.contains(*flag))
    .map(|(_, attribute)| attribute)
}

/// Map ratatui's palette onto crossterm's; the two name the bright and dark
/// variants differently.
pub(crate) fn term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(value) => TermColor::AnsiValue(value),
    }
}
