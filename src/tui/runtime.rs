use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;

use super::app::Event;
use super::input;

/// The single serialized queue the UI thread drains.
///
/// Three sources feed it:
/// - messages sent through `sender()` (task completions from the runner)
/// - terminal input, polled on the UI thread
/// - a `Tick` every `tick_rate`
///
/// Channel messages are always handed out first so a completion never waits behind input.
pub struct EventQueue {
    tx: Sender<Event>,
    rx: Receiver<Event>,
    tick_rate: Duration,
    last_tick: Instant,
}

impl EventQueue {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            tick_rate,
            last_tick: Instant::now(),
        }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    /// Block until the next event is available.
    pub fn next(&mut self) -> Result<Event> {
        loop {
            if let Some(ev) = self.try_next_message() {
                return Ok(ev);
            }

            if let Some(tick) = self.due_tick() {
                return Ok(tick);
            }

            let timeout = self.tick_rate.saturating_sub(self.last_tick.elapsed());
            if event::poll(timeout).context("Failed to poll events")? {
                let raw = event::read().context("Failed to read event")?;
                if let Some(ev) = input::translate(raw) {
                    return Ok(ev);
                }
            }
        }
    }

    fn try_next_message(&self) -> Option<Event> {
        match self.rx.try_recv() {
            Ok(ev) => Some(ev),
            // We hold a sender ourselves, so the channel never disconnects.
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    fn due_tick(&mut self) -> Option<Event> {
        if self.last_tick.elapsed() >= self.tick_rate {
            self.last_tick = Instant::now();
            Some(Event::Tick)
        } else {
            None
        }
    }
}
