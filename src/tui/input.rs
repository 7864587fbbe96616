use crossterm::event::{Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::{Event, Nav};

/// Translate a raw terminal event into a session event.
///
/// Returns `None` for terminal events the menu does not react to (mouse, focus, paste) and
/// for key releases/repeats.
pub fn translate(event: TermEvent) -> Option<Event> {
    match event {
        TermEvent::Key(key) => classify_key(key),
        TermEvent::Resize(_, _) => Some(Event::Resize),
        _ => None,
    }
}

/// Classify a key press.
///
/// Bindings:
/// - Ctrl+C, `q`, Esc quit from any state
/// - ↑/`k`, ↓/`j`, Home/`g`, End/`G` move the cursor
/// - Enter confirms
/// - everything else is `Other` (which still matters: it dismisses the result screen)
pub fn classify_key(key: KeyEvent) -> Option<Event> {
    // Only process key presses; ignore repeats/releases to avoid accidental double actions.
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let event = match (key.code, key.modifiers) {
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Event::Quit,
        (KeyCode::Esc, _) => Event::Quit,
        (KeyCode::Char('q'), KeyModifiers::NONE) => Event::Quit,

        (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => Event::Navigate(Nav::Up),
        (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => {
            Event::Navigate(Nav::Down)
        }
        (KeyCode::Home, _) | (KeyCode::Char('g'), KeyModifiers::NONE) => {
            Event::Navigate(Nav::First)
        }
        (KeyCode::End, _) => Event::Navigate(Nav::Last),
        // Terminals report `G` with or without SHIFT.
        (KeyCode::Char('G'), m) if !m.contains(KeyModifiers::CONTROL) => {
            Event::Navigate(Nav::Last)
        }

        (KeyCode::Enter, _) => Event::Confirm,

        _ => Event::Other,
    };
    Some(event)
}
