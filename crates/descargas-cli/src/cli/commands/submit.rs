//! `descargas submit` – start a download task and follow it.

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use descargas_core::form::{Credentials, DownloadForm};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use super::follow::follow;
use super::AppContext;

#[derive(Debug, PartialEq, Eq)]
enum KeyStep {
    Continue,
    Done,
    Abort,
}

/// Feeds one key of a hidden prompt into `buf`.
fn push_key(buf: &mut String, key: KeyEvent) -> KeyStep {
    if key.kind != KeyEventKind::Press {
        return KeyStep::Continue;
    }
    match key.code {
        KeyCode::Enter => KeyStep::Done,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyStep::Abort,
        KeyCode::Esc => KeyStep::Abort,
        KeyCode::Char(c) => {
            buf.push(c);
            KeyStep::Continue
        }
        KeyCode::Backspace => {
            buf.pop();
            KeyStep::Continue
        }
        _ => KeyStep::Continue,
    }
}

/// Raw mode for the lifetime of the guard; restores the terminal on drop.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to switch terminal to raw mode")?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Reads keys without echo until Enter.
fn read_hidden() -> Result<String> {
    let mut buf = String::new();
    let raw = RawMode::enable()?;
    let outcome = loop {
        if let Event::Key(key) = event::read().context("failed to read key")? {
            match push_key(&mut buf, key) {
                KeyStep::Continue => {}
                step => break step,
            }
        }
    };
    drop(raw);
    eprintln!();
    if outcome == KeyStep::Abort {
        anyhow::bail!("password entry cancelled");
    }
    Ok(buf)
}

/// Prompts for the password on stderr. Echo is off when stdin is a terminal;
/// piped input is read as one line, without the trailing newline.
fn read_password() -> Result<String> {
    eprint!("Clave: ");
    io::stderr().flush()?;
    if io::stdin().is_terminal() {
        return read_hidden();
    }
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn run_submit(
    ctx: &AppContext,
    usuario: String,
    clave: Option<String>,
    parametros: String,
    no_wait: bool,
    save_to: Option<PathBuf>,
) -> Result<()> {
    let clave = match clave {
        Some(c) => c,
        None => read_password()?,
    };
    let form = DownloadForm::new(Credentials::new(usuario, clave), parametros);

    let mut session = ctx.session();
    let id = session.submit(&form).await?;
    println!("Task {id} started.");
    if no_wait {
        return Ok(());
    }

    let save_to = ctx.save_dir(save_to);
    follow(ctx, &mut session, save_to.as_deref()).await
}
