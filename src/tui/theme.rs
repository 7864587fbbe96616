//! Colours and styles for the menu.
//!
//! Passed into `App::new` explicitly; there is no global style state.

use log::warn;
use ratatui::style::{Color, Modifier, Style};

pub const DEFAULT_ACCENT: &str = "#25A065";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub title_fg: Color,
    pub accent: Color,
    pub spinner_fg: Color,
    pub success: Color,
    pub failure: Color,
    pub selected: Color,
    pub text: Color,
    pub dim: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title_fg: Color::Rgb(0xFF, 0xFD, 0xF5), // #FFFDF5
            accent: Color::Rgb(0x25, 0xA0, 0x65),   // #25A065
            spinner_fg: Color::Indexed(205),
            success: Color::Rgb(0x04, 0xB5, 0x75), // #04B575
            failure: Color::Rgb(0xF8, 0x51, 0x49), // #F85149
            selected: Color::Rgb(0xEE, 0x6F, 0xF8), // #EE6FF8
            text: Color::White,
            dim: Color::DarkGray,
        }
    }
}

impl Theme {
    /// Default theme with the title badge in the given colour (`#RRGGBB` or a colour name).
    ///
    /// Unparseable values fall back to the default accent.
    pub fn with_accent(accent: &str) -> Self {
        let mut theme = Self::default();
        match accent.parse::<Color>() {
            Ok(color) => theme.accent = color,
            Err(_) => warn!("Ignoring invalid accent colour '{}'", accent),
        }
        theme
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.title_fg)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn spinner(&self) -> Style {
        Style::default().fg(self.spinner_fg)
    }

    pub fn status_ok(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn status_failed(&self) -> Style {
        Style::default().fg(self.failure)
    }

    pub fn item_selected(&self) -> Style {
        Style::default()
            .fg(self.selected)
            .add_modifier(Modifier::BOLD)
    }

    pub fn item(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn description(&self) -> Style {
        Style::default().fg(self.dim)
    }
}
