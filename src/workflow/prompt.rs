//! Yes/no confirmation prompts

use std::io::{self, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

/// Asks the user a yes/no question
pub trait Confirm {
    fn confirm(&self, question: &str) -> io::Result<bool>;
}

/// Answers every question with yes (`--yes`)
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, question: &str) -> io::Result<bool> {
        tracing::info!(question, "assuming yes");
        Ok(true)
    }
}

/// Single-keypress prompt on the controlling terminal
///
/// Without a terminal on stdin the answer is no.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&self, question: &str) -> io::Result<bool> {
        if !io::stdin().is_terminal() {
            tracing::warn!(question, "no terminal to ask on; declining");
            return Ok(false);
        }

        let mut stderr = io::stderr();
        write!(stderr, "{} [y/N] ", question)?;
        stderr.flush()?;

        terminal::enable_raw_mode()?;
        let raw_mode = scopeguard::guard((), |_| {
            let _ = terminal::disable_raw_mode();
        });

        let answer = loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(answer) = answer_for_key(key) {
                    break answer;
                }
            }
        };

        drop(raw_mode);
        writeln!(stderr, "{}", if answer { "y" } else { "n" })?;
        Ok(answer)
    }
}

/// Map a keypress to an answer; `None` keeps waiting
fn answer_for_key(key: KeyEvent) -> Option<bool> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(false),
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc | KeyCode::Enter => Some(false),
        _ => None,
    }
}
