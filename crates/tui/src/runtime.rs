//! Runtime: terminal lifecycle and the input loop.
//!
//! The loop is synchronous. It redraws, then blocks on
//! `crossterm::event::read()` and routes the event to `App`. Key releases and
//! repeats are filtered by `App::handle_key`; mouse moves are ignored by
//! `App::handle_mouse`.

use std::io::Stdout;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, prelude::CrosstermBackend};
use tracing::{debug, info, warn};

use crate::app::App;
use crate::ui;

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    if let Err(error) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        restore_after_failed_setup(&mut stdout);
        return Err(error.into());
    }
    let backend = CrosstermBackend::new(stdout);
    match Terminal::new(backend) {
        Ok(terminal) => Ok(terminal),
        Err(error) => {
            restore_after_failed_setup(&mut std::io::stdout());
            Err(error.into())
        }
    }
}

/// Undo a partial `setup_terminal`. Errors here are logged, not returned, so
/// the caller sees the original setup failure.
fn restore_after_failed_setup(out: &mut impl std::io::Write) {
    if let Err(error) = execute!(out, LeaveAlternateScreen, DisableMouseCapture) {
        warn!(error = %error, "Failed to leave the alternate screen after setup error");
    }
    if let Err(error) = disable_raw_mode() {
        warn!(error = %error, "Failed to disable raw mode after setup error");
    }
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn handle_input_event(app: &mut App, input_event: Event) {
    match input_event {
        Event::Key(key_event) => app.handle_key(key_event),
        Event::Mouse(mouse_event) => app.handle_mouse(mouse_event),
        Event::Resize(width, height) => {
            debug!(width, height, "terminal resized");
            app.set_viewport_width(width);
        }
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
    }
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;
        if app.should_quit {
            return Ok(());
        }
        handle_input_event(app, event::read()?);
    }
}

/// Sets up the terminal, runs the loop until the user quits, and restores
/// the terminal even when the loop fails.
pub fn run_app(app: &mut App) -> Result<()> {
    let mut terminal = setup_terminal()?;
    info!(path = app.panel.current_path(), "sidebar shell started");
    let outcome = event_loop(&mut terminal, app);
    cleanup_terminal(&mut terminal)?;
    app.panel.unmount();
    info!("sidebar shell stopped");
    outcome
}
