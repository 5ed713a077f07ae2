//! Interactive healthiness question for items the ledger has not learned.

use std::{error::Error, io::Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};

#[derive(Debug, PartialEq, Eq)]
enum Answer {
    Healthy,
    Unhealthy,
    Interrupted,
    Invalid,
}

fn answer_for(code: KeyCode, modifiers: KeyModifiers) -> Answer {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Answer::Interrupted,
        KeyCode::Esc => Answer::Interrupted,
        KeyCode::Char('1') => Answer::Healthy,
        KeyCode::Char('0') => Answer::Unhealthy,
        _ => Answer::Invalid,
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Asks whether `item` is healthy (1) or unhealthy (0) until one of the two
/// keys is pressed.
pub(crate) fn ask_healthy(item: &str) -> Result<bool, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    execute!(
        out,
        Print(format!("\n❓ Unknown Item: '{item}'\n")),
        Print("   Is this Healthy (1) or Unhealthy (0)?\n")
    )?;

    let _raw = RawModeGuard::enter()?;
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print("   Enter 1 or 0: ")
    )?;
    out.flush()?;

    loop {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read()?
        else {
            continue;
        };
        if kind != KeyEventKind::Press {
            continue;
        }

        match answer_for(code, modifiers) {
            answer @ (Answer::Healthy | Answer::Unhealthy) => {
                let healthy = answer == Answer::Healthy;
                execute!(out, Print(if healthy { "1" } else { "0" }), Print("\r\n"))?;
                out.flush()?;
                return Ok(healthy);
            }
            Answer::Interrupted => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            Answer::Invalid => {
                execute!(
                    out,
                    Print("\r\n   Invalid input. Please enter 1 for Healthy or 0 for Unhealthy.\r\n"),
                    cursor::MoveToColumn(0),
                    Print("   Enter 1 or 0: ")
                )?;
                out.flush()?;
            }
        }
    }
}
