use std::{
    sync::{mpsc::Sender, Arc},
    time::{Duration, Instant},
};

use log::{info, warn};
use tokio::{
    runtime::Handle,
    task::{AbortHandle, JoinHandle},
};

use crate::actions::Action;

use super::app::Event;

pub type TaskId = u64;

/// How long a task stays visible at minimum, so the spinner is perceptible.
pub const DEFAULT_MIN_VISIBLE: Duration = Duration::from_millis(2000);

/// Result of one action run, as reported to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ok(String),
    Failed(String),
}

/// The one-shot completion signal for a started task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub task_id: TaskId,
    pub outcome: Outcome,
}

/// What happens to an in-flight task when the menu exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CancelPolicy {
    /// Leave the task running (fire-and-forget).
    #[default]
    Detach,
    /// Abort the task; it will not emit a completion.
    Abort,
}

/// A background runner for menu actions.
///
/// Model:
/// - The UI thread calls `start(...)`; it never blocks.
/// - The action's work runs on the tokio runtime.
/// - Exactly one `Event::Completed` is sent back on the UI's event channel per `start`,
///   no earlier than `min_visible` after the start.
///
/// The runner does not enforce single-task semantics itself; the session state machine only
/// starts a task from `Idle`, so at most one is ever outstanding.
pub struct TaskRunner {
    runtime: Handle,
    tx: Sender<Event>,
    min_visible: Duration,
}

/// Handle to a started task, kept by the loop driver.
#[derive(Debug)]
pub struct TaskHandle {
    id: TaskId,
    join: JoinHandle<()>,
    work: AbortHandle,
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// True once the completion has been sent (or the task was cancelled).
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Abort both the action's work and the pending completion signal.
    pub fn cancel(self) {
        self.work.abort();
        self.join.abort();
    }
}

impl TaskRunner {
    pub fn new(runtime: Handle, tx: Sender<Event>, min_visible: Duration) -> Self {
        Self {
            runtime,
            tx,
            min_visible,
        }
    }

    pub fn min_visible(&self) -> Duration {
        self.min_visible
    }

    pub fn start(&self, task_id: TaskId, action: Arc<Action>) -> TaskHandle {
        let started_at = Instant::now();
        info!("Task #{} started: {}", task_id, action.name());

        // The work gets its own task so a panic inside it still yields a completion.
        let work = self.runtime.spawn(action.run());
        let work_abort = work.abort_handle();

        let tx = self.tx.clone();
        let min_visible = self.min_visible;
        let name = action.name().to_string();

        let join = self.runtime.spawn(async move {
            let outcome = match work.await {
                Ok(Ok(summary)) => {
                    info!("Task #{} finished: {} ({})", task_id, name, summary);
                    Outcome::Ok(summary)
                }
                Ok(Err(e)) => {
                    warn!("Task #{} failed: {}: {:#}", task_id, name, e);
                    Outcome::Failed(format!("{:#}", e))
                }
                Err(e) => {
                    warn!("Task #{} aborted: {}: {}", task_id, name, e);
                    Outcome::Failed(e.to_string())
                }
            };

            let elapsed = started_at.elapsed();
            if elapsed < min_visible {
                tokio::time::sleep(min_visible - elapsed).await;
            }

            // The receiver is gone once the menu has exited; nothing left to notify.
            let _ = tx.send(Event::Completed(Completion { task_id, outcome }));
        });

        TaskHandle {
            id: task_id,
            join,
            work: work_abort,
        }
    }
}

/// Braille "dot" spinner sequence.
pub fn spinner_frames() -> &'static [&'static str] {
    &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"]
}
