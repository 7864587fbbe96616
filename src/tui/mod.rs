//! Full-screen menu entrypoint.
//!
//! This module is intentionally small: it wires together the terminal, the event queue and the
//! task runner, and delegates state/event/rendering to submodules.
//!
//! Modules:
//! - `app`: session state machine, selectable list, spinner
//! - `input`: key classification
//! - `view`: rendering (ratatui)
//! - `runtime`: the serialized event queue (input, ticks, completions)
//! - `tasks`: background action runner
//! - `theme`: colours and styles

pub mod app;
pub mod input;
pub mod runtime;
pub mod tasks;
pub mod theme;
pub mod view;

use std::any::Any;
use std::io;
use std::panic::{self, Location};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, error, info};
use ratatui::{backend::CrosstermBackend, Terminal};

use app::{App, Effect};
use runtime::EventQueue;
use tasks::{CancelPolicy, TaskHandle, TaskRunner};

#[derive(Debug, Clone)]
pub struct TuiOptions {
    pub tick_rate: Duration,
    pub min_visible: Duration,
    pub cancel_policy: CancelPolicy,
}

/// Raw mode + alternate screen for as long as this value lives.
///
/// Panics are sent to the log file instead of stderr meanwhile, so a panicking action
/// does not scribble over the menu.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            disable_raw_mode().ok();
            return Err(e).context("Failed to enter alternate screen");
        }
        panic::set_hook(Box::new(|info| {
            error!("{}", panic_message(info.payload(), info.location()));
        }));
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Back to the default hook; not allowed while unwinding.
        if !std::thread::panicking() {
            let _ = panic::take_hook();
        }
        // Restore terminal state, best-effort.
        disable_raw_mode().ok();
        execute!(io::stdout(), LeaveAlternateScreen, Show).ok();
    }
}

fn panic_message(payload: &(dyn Any + Send), location: Option<&Location<'_>>) -> String {
    let what = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown payload");
    match location {
        Some(loc) => format!("Panic at {}:{}: {}", loc.file(), loc.line(), what),
        None => format!("Panic: {}", what),
    }
}

/// Run the menu until the user quits.
///
/// Every event pulled from the queue goes through `App::update`, its effect is executed, and a
/// frame is drawn. The loop ends right after the farewell frame.
pub fn run_tui(mut app: App, options: &TuiOptions) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    let guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("Failed to create terminal backend")?;
    terminal.clear().ok();

    let mut queue = EventQueue::new(options.tick_rate);
    let runner = TaskRunner::new(rt.handle().clone(), queue.sender(), options.min_visible);
    let mut in_flight: Option<TaskHandle> = None;

    info!(
        "Menu started ({} actions, tick {:?}, min visible {:?})",
        app.list.len(),
        options.tick_rate,
        runner.min_visible()
    );

    terminal
        .draw(|f| view::draw(f, &app))
        .context("Failed to draw frame")?;

    loop {
        let event = queue.next()?;
        match app.update(event) {
            Effect::None => {}
            Effect::Start { task_id, action } => {
                in_flight = Some(runner.start(task_id, action));
            }
            Effect::Quit => debug!("Quit requested"),
        }

        terminal
            .draw(|f| view::draw(f, &app))
            .context("Failed to draw frame")?;

        if app.is_quitting() {
            break;
        }
    }

    if let Some(task) = in_flight.filter(|t| !t.is_finished()) {
        match options.cancel_policy {
            CancelPolicy::Detach => info!("Leaving task #{} running on exit", task.id()),
            CancelPolicy::Abort => {
                info!("Cancelling task #{} on exit", task.id());
                task.cancel();
            }
        }
    }

    drop(terminal);
    drop(guard);

    // Detached work is dropped with the runtime when the process exits; don't block on it.
    rt.shutdown_background();
    debug!("Menu closed");

    Ok(())
}
