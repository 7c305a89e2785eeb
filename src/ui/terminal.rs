use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, OnceLock};
use std::thread;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::warn;

use crate::error::PromptError;

/// What a single key press does to the line being edited.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum LineEdit {
    Ignored,
    Inserted(char),
    Erased,
    Submit,
    Interrupt,
    EndOfInput,
}

/// Keeps raw mode on for as long as the guard lives, so every exit path out
/// of the read loop (including `?`) restores the terminal.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Read one line from the user. On a real terminal the line is read in raw
/// mode so Ctrl-C comes through as a key press instead of killing the
/// process. Piped input is read through [`LineFeed`], where SIGINT is
/// delivered as an interrupt event instead.
pub(crate) fn read_line<W: Write>(out: &mut W) -> Result<String, PromptError> {
    out.flush()?;

    if io::stdin().is_terminal() {
        read_line_raw(out)
    } else {
        read_line_buffered()
    }
}

fn read_line_raw<W: Write>(out: &mut W) -> Result<String, PromptError> {
    let mut line = String::new();
    let guard = RawModeGuard::enable()?;

    let outcome = loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match edit_line(&mut line, key) {
            LineEdit::Ignored => {}
            LineEdit::Inserted(ch) => {
                write!(out, "{ch}")?;
                out.flush()?;
            }
            LineEdit::Erased => {
                write!(out, "\u{8} \u{8}")?;
                out.flush()?;
            }
            LineEdit::Submit => break Ok(()),
            LineEdit::Interrupt => break Err(PromptError::Interrupted),
            LineEdit::EndOfInput => break Err(PromptError::EndOfInput),
        }
    };

    drop(guard);
    writeln!(out)?;
    outcome.map(|()| line)
}

fn read_line_buffered() -> Result<String, PromptError> {
    let mut feed = stdin_feed()
        .lock()
        .map_err(|_| io::Error::other("stdin reader lock poisoned"))?;
    feed.next_line()
}

/// The process-wide feed over stdin, created on first use together with the
/// SIGINT handler that pushes interrupts into it.
fn stdin_feed() -> &'static Mutex<LineFeed> {
    static FEED: OnceLock<Mutex<LineFeed>> = OnceLock::new();

    FEED.get_or_init(|| {
        let (feed, interrupts) = LineFeed::spawn(BufReader::new(io::stdin()));
        if let Err(err) = ctrlc::set_handler(move || {
            let _ = interrupts.send(FeedEvent::Interrupt);
        }) {
            warn!(%err, "failed to install interrupt handler");
        }
        Mutex::new(feed)
    })
}

/// Messages from the background reader and the interrupt handler.
#[derive(Debug)]
pub(crate) enum FeedEvent {
    Line(String),
    Closed,
    Failed(io::Error),
    Interrupt,
}

/// Lines read on a background thread, so an interrupt can end a prompt that
/// is still blocked waiting for piped input.
pub(crate) struct LineFeed {
    events: Receiver<FeedEvent>,
    ended: bool,
}

impl LineFeed {
    /// Start reading `reader` line by line. The returned sender injects
    /// events (interrupts) alongside the lines.
    pub(crate) fn spawn<R>(mut reader: R) -> (Self, Sender<FeedEvent>)
    where
        R: BufRead + Send + 'static,
    {
        let (tx, events) = mpsc::channel();
        let lines = tx.clone();

        thread::spawn(move || loop {
            let mut line = String::new();
            let event = match reader.read_line(&mut line) {
                Ok(0) => FeedEvent::Closed,
                Ok(_) => FeedEvent::Line(line),
                Err(err) => FeedEvent::Failed(err),
            };
            let last = !matches!(event, FeedEvent::Line(_));
            if lines.send(event).is_err() || last {
                break;
            }
        });

        (
            Self {
                events,
                ended: false,
            },
            tx,
        )
    }

    /// Block until the next line or interrupt. Once input has closed every
    /// later call reports `EndOfInput`.
    pub(crate) fn next_line(&mut self) -> Result<String, PromptError> {
        if self.ended {
            return Err(PromptError::EndOfInput);
        }

        match self.events.recv() {
            Ok(FeedEvent::Line(mut line)) => {
                let trimmed = line.trim_end_matches(['\r', '\n']).len();
                line.truncate(trimmed);
                Ok(line)
            }
            Ok(FeedEvent::Interrupt) => Err(PromptError::Interrupted),
            Ok(FeedEvent::Failed(err)) => {
                self.ended = true;
                Err(PromptError::Io(err))
            }
            Ok(FeedEvent::Closed) | Err(_) => {
                self.ended = true;
                Err(PromptError::EndOfInput)
            }
        }
    }
}

/// Apply one key press to `line`. Ctrl-C interrupts; Ctrl-D only ends input
/// on an empty line, like a shell.
pub(crate) fn edit_line(line: &mut String, key: KeyEvent) -> LineEdit {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => LineEdit::Interrupt,
            KeyCode::Char('d') if line.is_empty() => LineEdit::EndOfInput,
            _ => LineEdit::Ignored,
        };
    }

    match key.code {
        KeyCode::Enter => LineEdit::Submit,
        KeyCode::Backspace => match line.pop() {
            Some(_) => LineEdit::Erased,
            None => LineEdit::Ignored,
        },
        KeyCode::Char(ch) if !ch.is_control() => {
            line.push(ch);
            LineEdit::Inserted(ch)
        }
        _ => LineEdit::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn typing_and_erasing_edits_the_line() {
        let mut line = String::new();
        assert_eq!(edit_line(&mut line, key(KeyCode::Char('4'))), LineEdit::Inserted('4'));
        assert_eq!(edit_line(&mut line, key(KeyCode::Char('6'))), LineEdit::Inserted('6'));
        assert_eq!(edit_line(&mut line, key(KeyCode::Backspace)), LineEdit::Erased);
        assert_eq!(edit_line(&mut line, key(KeyCode::Char('5'))), LineEdit::Inserted('5'));
        assert_eq!(edit_line(&mut line, key(KeyCode::Enter)), LineEdit::Submit);
        assert_eq!(line, "45");
    }

    #[test]
    fn backspace_on_empty_line_is_ignored() {
        let mut line = String::new();
        assert_eq!(edit_line(&mut line, key(KeyCode::Backspace)), LineEdit::Ignored);
    }

    #[test]
    fn ctrl_c_interrupts_even_mid_line() {
        let mut line = "dr. Pan".to_string();
        assert_eq!(edit_line(&mut line, ctrl('c')), LineEdit::Interrupt);
        assert_eq!(line, "dr. Pan");
    }

    #[test]
    fn ctrl_d_ends_input_only_when_line_is_empty() {
        let mut line = String::new();
        assert_eq!(edit_line(&mut line, ctrl('d')), LineEdit::EndOfInput);

        let mut line = "Andi".to_string();
        assert_eq!(edit_line(&mut line, ctrl('d')), LineEdit::Ignored);
    }

    /// Reader that blocks until released, like a pipe nobody writes to.
    struct Stalled(Receiver<()>);

    impl io::Read for Stalled {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            let _ = self.0.recv();
            Ok(0)
        }
    }

    #[test]
    fn piped_lines_arrive_without_line_endings() {
        let (mut feed, _interrupts) = LineFeed::spawn(io::Cursor::new("3\r\nAndi\n5"));

        assert_eq!(feed.next_line().unwrap(), "3");
        assert_eq!(feed.next_line().unwrap(), "Andi");
        assert_eq!(feed.next_line().unwrap(), "5");
        assert!(matches!(feed.next_line(), Err(PromptError::EndOfInput)));
        assert!(matches!(feed.next_line(), Err(PromptError::EndOfInput)));
    }

    #[test]
    fn interrupt_ends_a_read_still_waiting_on_the_pipe() {
        let (release, stall) = mpsc::channel();
        let (mut feed, interrupts) = LineFeed::spawn(BufReader::new(Stalled(stall)));

        interrupts.send(FeedEvent::Interrupt).unwrap();
        assert!(matches!(feed.next_line(), Err(PromptError::Interrupted)));

        drop(release);
        assert!(matches!(feed.next_line(), Err(PromptError::EndOfInput)));
    }

    #[test]
    fn navigation_keys_are_ignored() {
        let mut line = "x".to_string();
        assert_eq!(edit_line(&mut line, key(KeyCode::Left)), LineEdit::Ignored);
        assert_eq!(edit_line(&mut line, key(KeyCode::Tab)), LineEdit::Ignored);
        assert_eq!(line, "x");
    }
}
