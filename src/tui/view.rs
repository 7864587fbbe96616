use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::app::{App, Session};
use super::tasks::Outcome;

pub const MENU_TITLE: &str = "EHRPlus CLI Demo";

const HELP: &str = "↑/k up • ↓/j down • enter select • q quit";

/// Render the current session. Output depends only on `app`.
pub fn draw(f: &mut Frame<'_>, app: &App) {
    let area = f.area();

    match app.session() {
        Session::Idle => draw_menu(f, app, area),
        Session::Running { action, .. } => {
            let line = Line::from(vec![
                Span::raw("   "),
                Span::styled(app.spinner.glyph(), app.theme.spinner()),
                Span::raw(format!(" Loading {}...", action.label())),
            ]);
            f.render_widget(
                Paragraph::new(Text::from(vec![Line::from(""), Line::from(""), line])),
                area,
            );
        }
        Session::Completed { action, outcome } => {
            let headline = match outcome {
                Outcome::Ok(_) => Line::from(Span::styled(
                    format!("  ✓ {} completed successfully!", action.label()),
                    app.theme.status_ok(),
                )),
                Outcome::Failed(reason) => Line::from(Span::styled(
                    format!("  ✗ {} failed: {}", action.label(), reason),
                    app.theme.status_failed(),
                )),
            };
            let text = Text::from(vec![
                Line::from(""),
                headline,
                Line::from(""),
                Line::from(Span::styled(
                    "  Press any key to return to menu or Ctrl+C to exit.",
                    app.theme.description(),
                )),
            ]);
            f.render_widget(Paragraph::new(text), area);
        }
        Session::Quitting => {
            f.render_widget(
                Paragraph::new(Text::from(vec![Line::from(""), Line::from("  Goodbye!")])),
                area,
            );
        }
    }
}

fn draw_menu(f: &mut Frame<'_>, app: &App, area: Rect) {
    let inner = Rect {
        x: area.x + 2,
        y: area.y,
        width: area.width.saturating_sub(2),
        height: area.height,
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // spacer
            Constraint::Length(1), // title
            Constraint::Length(1), // spacer
            Constraint::Min(1),    // items
            Constraint::Length(1), // help
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {} ", MENU_TITLE),
            app.theme.title(),
        ))),
        layout[1],
    );

    if app.list.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("No items.", app.theme.description())),
            layout[3],
        );
    } else {
        render_items(f, app, layout[3]);
    }

    f.render_widget(
        Paragraph::new(Span::styled(HELP, app.theme.description())),
        layout[4],
    );
}

fn render_items(f: &mut Frame<'_>, app: &App, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;
    let cursor = app.list.cursor();

    let items: Vec<ListItem> = app
        .list
        .items()
        .iter()
        .enumerate()
        .map(|(idx, action)| {
            let is_selected = idx == cursor;
            let (bar, label_style, desc_style) = if is_selected {
                ("│ ", app.theme.item_selected(), app.theme.item_selected())
            } else {
                ("  ", app.theme.item(), app.theme.description())
            };

            ListItem::new(Text::from(vec![
                Line::from(vec![
                    Span::styled(bar, label_style),
                    Span::styled(truncate_to_width(action.label(), width), label_style),
                ]),
                Line::from(vec![
                    Span::styled(bar, desc_style),
                    Span::styled(truncate_to_width(action.description(), width), desc_style),
                ]),
                Line::from(""),
            ]))
        })
        .collect();

    let mut state = ListState::default().with_selected(Some(cursor));
    f.render_stateful_widget(List::new(items), area, &mut state);
}

fn truncate_to_width(s: &str, max: usize) -> String {
    if UnicodeWidthStr::width(s) <= max {
        return s.to_string();
    }
    if max <= 1 {
        return "…".to_string();
    }

    let mut out = String::new();
    let mut width = 0usize;
    for ch in s.chars() {
        let ch_w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_w > max - 1 {
            break;
        }
        out.push(ch);
        width += ch_w;
    }
    out.push('…');
    out
}
