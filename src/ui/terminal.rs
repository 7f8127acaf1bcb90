use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use crate::db::PersonStore;

use super::app::App;
use super::dialogs::TerminalDialogs;

pub(crate) type Tui = Terminal<CrosstermBackend<Stdout>>;

/// How long a single poll waits before the caller redraws.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Spin up the terminal backend, load the records, and keep processing input
/// until the user quits. The terminal is restored even when setup or the loop
/// fails.
pub fn run_app<S: PersonStore>(app: &mut App<S>) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut terminal = undo_on_error(enter_terminal(), || {
        disable_raw_mode().context("failed to disable raw mode")
    })?;

    let result = event_loop(app, &mut terminal);

    cleanup_terminal(&mut terminal)?;
    info!("terminal restored");
    result
}

fn enter_terminal() -> Result<Tui> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    undo_on_error(
        Terminal::new(backend).context("failed to create terminal backend"),
        || execute!(io::stdout(), LeaveAlternateScreen).context("failed to leave alternate screen"),
    )
}

/// Run `undo` when `result` is an error, keeping the original error. A failing
/// undo is only logged.
fn undo_on_error<T>(result: Result<T>, undo: impl FnOnce() -> Result<()>) -> Result<T> {
    if result.is_err() {
        if let Err(err) = undo() {
            warn!(error = %err, "terminal restore after failed setup also failed");
        }
    }
    result
}

fn event_loop<S: PersonStore>(app: &mut App<S>, terminal: &mut Tui) -> Result<()> {
    let mut dialogs = TerminalDialogs::new(terminal, app.table_view());
    app.start(&mut dialogs)?;

    loop {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        if let Some(key) = next_key()? {
            let mut dialogs = TerminalDialogs::new(terminal, app.table_view());
            if app.handle_key(key, &mut dialogs)? {
                return Ok(());
            }
        }
    }
}

/// Wait up to one poll interval for a key press.
pub(crate) fn next_key() -> Result<Option<KeyEvent>> {
    if event::poll(POLL_INTERVAL).context("event polling failed")? {
        if let Event::Key(key_event) = event::read().context("failed to read event")? {
            if key_event.kind == KeyEventKind::Press {
                return Ok(Some(key_event));
            }
        }
    }
    Ok(None)
}

fn cleanup_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal
        .show_cursor()
        .context("failed to restore cursor visibility")
}
