use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::actions::{Action, ActionRegistry};
use crate::tui::tasks::{spinner_frames, Completion, Outcome, TaskId};
use crate::tui::theme::Theme;

/// Default spinner cadence.
pub const DEFAULT_TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Up,
    Down,
    First,
    Last,
}

/// Everything the session state machine reacts to.
///
/// Keys are classified by `input`, ticks come from the event queue and completions from the
/// task runner; all of them arrive through the same queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Navigate(Nav),
    Confirm,
    Quit,
    Tick,
    Completed(Completion),
    /// Terminal resized; only needs a redraw.
    Resize,
    /// Any other key press.
    Other,
}

/// Side effect requested by `App::update`, carried out by the loop driver.
#[derive(Debug)]
pub enum Effect {
    None,
    Start { task_id: TaskId, action: Arc<Action> },
    Quit,
}

#[derive(Debug, Clone)]
pub enum Session {
    Idle,
    Running {
        action: Arc<Action>,
        task_id: TaskId,
    },
    Completed {
        action: Arc<Action>,
        outcome: Outcome,
    },
    Quitting,
}

impl Session {
    pub fn name(&self) -> &'static str {
        match self {
            Session::Idle => "Idle",
            Session::Running { .. } => "Running",
            Session::Completed { .. } => "Completed",
            Session::Quitting => "Quitting",
        }
    }
}

type Filter = Box<dyn Fn(&Action) -> bool>;

/// Ordered, navigable list of actions.
///
/// Invariant: `cursor < items().len()` whenever the visible list is non-empty.
pub struct SelectableList {
    actions: Vec<Arc<Action>>,
    cursor: usize,
    filter: Option<Filter>,
}

impl SelectableList {
    pub fn new(actions: Vec<Arc<Action>>) -> Self {
        Self {
            actions,
            cursor: 0,
            filter: None,
        }
    }

    /// Visible actions in display order.
    pub fn items(&self) -> Vec<&Arc<Action>> {
        match &self.filter {
            Some(keep) => self.actions.iter().filter(|a| keep(a)).collect(),
            None => self.actions.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        match &self.filter {
            Some(keep) => self.actions.iter().filter(|a| keep(a)).count(),
            None => self.actions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&Arc<Action>> {
        self.items().get(self.cursor).copied()
    }

    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_down(&mut self) {
        let len = self.len();
        if len == 0 {
            return;
        }
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn first(&mut self) {
        self.cursor = 0;
    }

    pub fn last(&mut self) {
        self.cursor = self.len().saturating_sub(1);
    }

    pub fn navigate(&mut self, nav: Nav) {
        match nav {
            Nav::Up => self.move_up(),
            Nav::Down => self.move_down(),
            Nav::First => self.first(),
            Nav::Last => self.last(),
        }
    }

    /// Restrict the visible items. `None` shows everything.
    pub fn set_filter(&mut self, filter: Option<Filter>) {
        self.filter = filter;
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let len = self.len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }
}

/// Spinner frame state. Advances one frame per tick, wrapping around.
#[derive(Debug, Clone)]
pub struct Spinner {
    frames: &'static [&'static str],
    index: usize,
}

impl Default for Spinner {
    fn default() -> Self {
        Self {
            frames: spinner_frames(),
            index: 0,
        }
    }
}

impl Spinner {
    pub fn tick(&mut self) -> &'static str {
        self.index = (self.index + 1) % self.frames.len();
        self.glyph()
    }

    pub fn glyph(&self) -> &'static str {
        self.frames[self.index]
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

pub struct App {
    pub list: SelectableList,
    pub spinner: Spinner,
    pub theme: Theme,
    session: Session,
    next_task_id: TaskId,
}

impl App {
    pub fn new(registry: ActionRegistry, theme: Theme) -> Self {
        Self {
            list: SelectableList::new(registry.into_actions()),
            spinner: Spinner::default(),
            theme,
            session: Session::Idle,
            next_task_id: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_quitting(&self) -> bool {
        matches!(self.session, Session::Quitting)
    }

    /// Apply one event to the session and return the side effect to run.
    ///
    /// Pure state transition: no I/O besides logging. Once `Quitting` is reached every
    /// further event is ignored.
    pub fn update(&mut self, event: Event) -> Effect {
        let from = self.session.name();
        let current = std::mem::replace(&mut self.session, Session::Quitting);

        let (next, effect) = match (current, event) {
            (Session::Quitting, _) => (Session::Quitting, Effect::None),

            (_, Event::Quit) => (Session::Quitting, Effect::Quit),

            // Idle: the list owns the keys.
            (Session::Idle, Event::Navigate(nav)) => {
                self.list.navigate(nav);
                (Session::Idle, Effect::None)
            }
            (Session::Idle, Event::Confirm) => match self.list.current().cloned() {
                Some(action) => {
                    self.next_task_id += 1;
                    let task_id = self.next_task_id;
                    self.spinner.reset();
                    info!("Selected '{}' (task #{})", action.name(), task_id);
                    (
                        Session::Running {
                            action: action.clone(),
                            task_id,
                        },
                        Effect::Start { task_id, action },
                    )
                }
                None => (Session::Idle, Effect::None),
            },
            (Session::Idle, Event::Completed(c)) => {
                warn!("Ignoring completion of task #{} while idle", c.task_id);
                (Session::Idle, Effect::None)
            }
            (Session::Idle, Event::Tick | Event::Resize | Event::Other) => {
                (Session::Idle, Effect::None)
            }

            // Running: only ticks and our own completion matter.
            (running @ Session::Running { .. }, Event::Tick) => {
                self.spinner.tick();
                (running, Effect::None)
            }
            (Session::Running { action, task_id, .. }, Event::Completed(c))
                if c.task_id == task_id =>
            {
                (
                    Session::Completed {
                        action,
                        outcome: c.outcome,
                    },
                    Effect::None,
                )
            }
            (running @ Session::Running { .. }, Event::Completed(c)) => {
                warn!("Ignoring stale completion of task #{}", c.task_id);
                (running, Effect::None)
            }
            (
                running @ Session::Running { .. },
                Event::Navigate(_) | Event::Confirm | Event::Resize | Event::Other,
            ) => (running, Effect::None),

            // Completed: any key returns to the menu.
            (Session::Completed { .. }, Event::Navigate(_) | Event::Confirm | Event::Other) => {
                (Session::Idle, Effect::None)
            }
            (done @ Session::Completed { .. }, Event::Tick | Event::Resize) => (done, Effect::None),
            (done @ Session::Completed { .. }, Event::Completed(c)) => {
                warn!("Ignoring completion of task #{} after finish", c.task_id);
                (done, Effect::None)
            }
        };

        if from != next.name() {
            debug!("Session {} -> {}", from, next.name());
        }
        self.session = next;
        effect
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::test_support::test_app;

    fn done(task_id: TaskId) -> Event {
        Event::Completed(Completion {
            task_id,
            outcome: Outcome::Ok("ok".to_string()),
        })
    }

    fn loading(app: &App) -> bool {
        matches!(app.session(), Session::Running { .. })
    }

    /// The action picked for the current run, if any.
    fn selected(app: &App) -> Option<&Arc<Action>> {
        match app.session() {
            Session::Running { action, .. } | Session::Completed { action, .. } => Some(action),
            Session::Idle | Session::Quitting => None,
        }
    }

    fn start(app: &mut App) -> TaskId {
        match app.update(Event::Confirm) {
            Effect::Start { task_id, .. } => task_id,
            other => panic!("expected start, got {:?}", other),
        }
    }

    #[test]
    fn test_app_new_defaults() {
        let app = test_app(&["Database Demo", "SSH Demo"]);
        assert!(matches!(app.session(), Session::Idle));
        assert_eq!(app.list.cursor(), 0);
        assert!(!loading(&app));
        assert!(selected(&app).is_none());
    }

    #[test]
    fn test_move_saturates_at_ends() {
        let mut app = test_app(&["a", "b", "c"]);
        app.list.move_up();
        assert_eq!(app.list.cursor(), 0);
        app.list.move_down();
        app.list.move_down();
        app.list.move_down();
        assert_eq!(app.list.cursor(), 2);
        app.list.first();
        assert_eq!(app.list.cursor(), 0);
        app.list.last();
        assert_eq!(app.list.cursor(), 2);
    }

    #[test]
    fn test_empty_list_is_inert() {
        let mut app = test_app(&[]);
        app.list.move_down();
        app.list.move_up();
        app.list.last();
        assert_eq!(app.list.cursor(), 0);
        assert!(app.list.current().is_none());

        assert!(matches!(app.update(Event::Confirm), Effect::None));
        assert!(matches!(app.session(), Session::Idle));
    }

    #[test]
    fn test_filter_hides_items_and_clamps_cursor() {
        let mut app = test_app(&["alpha", "beta", "gamma"]);
        app.list.last();
        app.list
            .set_filter(Some(Box::new(|a: &Action| a.name() != "gamma")));

        let names: Vec<&str> = app.list.items().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
        assert_eq!(app.list.cursor(), 1);
        assert_eq!(app.list.current().unwrap().name(), "beta");

        app.list.set_filter(None);
        assert_eq!(app.list.len(), 3);
    }

    #[test]
    fn test_spinner_wraps() {
        let mut spinner = Spinner::default();
        let frames = spinner_frames();
        for _ in 0..frames.len() {
            spinner.tick();
        }
        assert_eq!(spinner.glyph(), frames[0]);
        assert_eq!(spinner.tick(), frames[1]);
    }

    #[test]
    fn test_scenario_select_second_action() {
        let mut app = test_app(&["Database Demo", "SSH Demo"]);

        app.update(Event::Navigate(Nav::Down));
        assert_eq!(app.list.cursor(), 1);

        let task_id = match app.update(Event::Confirm) {
            Effect::Start { task_id, action } => {
                assert_eq!(action.label(), "SSH Demo");
                task_id
            }
            other => panic!("expected start, got {:?}", other),
        };
        assert!(loading(&app));
        assert_eq!(selected(&app).unwrap().label(), "SSH Demo");

        app.update(done(task_id));
        match app.session() {
            Session::Completed { action, outcome } => {
                assert_eq!(action.label(), "SSH Demo");
                assert_eq!(*outcome, Outcome::Ok("ok".to_string()));
            }
            other => panic!("expected completed, got {:?}", other),
        }

        app.update(Event::Other);
        assert!(matches!(app.session(), Session::Idle));
        assert!(selected(&app).is_none());
    }

    #[test]
    fn test_navigation_ignored_while_running() {
        let mut app = test_app(&["a", "b", "c"]);
        start(&mut app);

        app.update(Event::Navigate(Nav::Down));
        app.update(Event::Navigate(Nav::Last));
        app.update(Event::Confirm);

        assert_eq!(app.list.cursor(), 0);
        assert_eq!(selected(&app).unwrap().name(), "a");
        assert!(loading(&app));
    }

    #[test]
    fn test_ticks_only_advance_spinner_while_running() {
        let mut app = test_app(&["a"]);
        let frames = spinner_frames();
        app.update(Event::Tick);
        assert_eq!(app.spinner.glyph(), frames[0]);

        let task_id = start(&mut app);
        app.update(Event::Tick);
        app.update(Event::Tick);
        assert_eq!(app.spinner.glyph(), frames[2]);

        app.update(done(task_id));
        app.update(Event::Tick);
        assert_eq!(app.spinner.glyph(), frames[2]);
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut app = test_app(&["a"]);
        let task_id = start(&mut app);

        app.update(done(task_id + 1));
        assert!(loading(&app));

        app.update(done(task_id));
        assert!(matches!(app.session(), Session::Completed { .. }));
    }

    #[test]
    fn test_failure_is_reported_as_completed() {
        let mut app = test_app(&["a"]);
        let task_id = start(&mut app);

        app.update(Event::Completed(Completion {
            task_id,
            outcome: Outcome::Failed("boom".to_string()),
        }));
        match app.session() {
            Session::Completed { outcome, .. } => {
                assert_eq!(*outcome, Outcome::Failed("boom".to_string()))
            }
            other => panic!("expected completed, got {:?}", other),
        }
    }

    #[test]
    fn test_resize_does_not_leave_completed() {
        let mut app = test_app(&["a"]);
        let task_id = start(&mut app);
        app.update(done(task_id));
        app.update(Event::Resize);
        assert!(matches!(app.session(), Session::Completed { .. }));
    }

    #[test]
    fn test_quit_from_every_state() {
        let mut idle = test_app(&["a"]);
        assert!(matches!(idle.update(Event::Quit), Effect::Quit));
        assert!(idle.is_quitting());

        let mut running = test_app(&["a"]);
        start(&mut running);
        assert!(matches!(running.update(Event::Quit), Effect::Quit));
        assert!(running.is_quitting());

        let mut completed = test_app(&["a"]);
        let task_id = start(&mut completed);
        completed.update(done(task_id));
        assert!(matches!(completed.update(Event::Quit), Effect::Quit));
        assert!(completed.is_quitting());
    }

    #[test]
    fn test_quitting_is_terminal() {
        let mut app = test_app(&["a", "b"]);
        let task_id = start(&mut app);
        app.update(Event::Quit);

        for event in [
            Event::Navigate(Nav::Down),
            Event::Confirm,
            Event::Tick,
            done(task_id),
            Event::Other,
            Event::Quit,
        ] {
            assert!(matches!(app.update(event), Effect::None));
        }
        assert!(app.is_quitting());
        assert_eq!(app.list.cursor(), 0);
        assert_eq!(app.spinner.glyph(), spinner_frames()[0]);
    }

    proptest! {
        #[test]
        fn prop_cursor_stays_in_bounds(len in 1usize..12, moves in prop::collection::vec(any::<bool>(), 0..64)) {
            let names: Vec<String> = (0..len).map(|i| format!("action-{}", i)).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let mut app = test_app(&refs);

            for down in moves {
                let before = app.list.cursor();
                let nav = if down { Nav::Down } else { Nav::Up };
                app.update(Event::Navigate(nav));
                let after = app.list.cursor();

                prop_assert!(after < len);
                prop_assert!(before.abs_diff(after) <= 1);
                if !down && before == 0 {
                    prop_assert_eq!(after, 0);
                }
                if down && before == len - 1 {
                    prop_assert_eq!(after, len - 1);
                }
            }
        }

        #[test]
        fn prop_confirm_runs_action_under_cursor(len in 1usize..8, downs in 0usize..10) {
            let names: Vec<String> = (0..len).map(|i| format!("action-{}", i)).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let mut app = test_app(&refs);

            for _ in 0..downs {
                app.update(Event::Navigate(Nav::Down));
            }
            let expected = app.list.current().unwrap().name().to_string();

            match app.update(Event::Confirm) {
                Effect::Start { action, .. } => prop_assert_eq!(action.name(), expected.as_str()),
                other => prop_assert!(false, "expected start, got {:?}", other),
            }
            prop_assert_eq!(selected(&app).unwrap().name(), expected.as_str());
        }
    }
}
