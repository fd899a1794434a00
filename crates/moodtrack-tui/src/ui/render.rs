use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use moodtrack_core::utils::truncate;

use crate::app::{App, AppState, LoginFocus, Tab};

use super::styles;
use super::tabs::{history, team, today, units};

/// Widest a toast may grow before wrapping
const TOAST_WIDTH: u16 = 48;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::LoggingIn) {
        render_login_overlay(frame, app);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }

    render_toasts(frame, app, chunks[2]);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  moodtrack";
    let help_hint = "[?] Help";

    let user = app
        .dashboard
        .as_ref()
        .map(|d| {
            let user = &d.personal().user;
            format!("{} · {}  ", user.full_name(), user.role.label())
        })
        .unwrap_or_default();

    let used = title.chars().count() + user.chars().count() + help_hint.len() + 4;
    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(user, styles::list_item_style()),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in app.tabs().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        if *tab == app.current_tab {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    if app.dashboard.is_none() {
        let text = if app.loading {
            "Loading your dashboard..."
        } else {
            "Not signed in"
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(text, styles::muted_style())))
            .block(Block::default().borders(Borders::ALL).border_style(styles::border_style(false)));
        frame.render_widget(paragraph, area);
        return;
    }

    match app.current_tab {
        Tab::Today => today::render(frame, app, area),
        Tab::History => history::render(frame, app, area),
        Tab::Team => team::render(frame, app, area),
        Tab::Units => units::render(frame, app, area),
    }
}

/// Shortcuts for a paged list, offering only the page keys that lead somewhere
fn list_shortcuts(has_previous: bool, has_next: bool) -> String {
    let paging = match (has_previous, has_next) {
        (true, true) => "[ ] page | ",
        (true, false) => "[ prev page | ",
        (false, true) => "] next page | ",
        (false, false) => "",
    };
    format!("{}[u]pdate | [L]ogout | [q]uit", paging)
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.current_tab {
        Tab::Today => "[Enter] submit | [c]omment | [u]pdate | [L]ogout | [q]uit".to_string(),
        Tab::History => list_shortcuts(app.history.has_previous(), app.history.has_next()),
        Tab::Team => list_shortcuts(app.team.has_previous(), app.team.has_next()),
        Tab::Units => "[s]ection | [r]eport | [u]pdate | [L]ogout | [q]uit".to_string(),
    };

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => String::from(" Ready "),
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

/// Stack active notifications in the bottom-right corner of `area`
fn render_toasts(frame: &mut Frame, app: &App, area: Rect) {
    let toasts = app.toasts.active();
    if toasts.is_empty() {
        return;
    }

    let width = TOAST_WIDTH.min(area.width);
    let mut bottom = area.y + area.height;

    for toast in toasts.iter().rev() {
        let text = truncate(&toast.message, (width as usize).saturating_sub(4) * 2);
        let inner = (width as usize).saturating_sub(2).max(1);
        let lines = text.chars().count().div_ceil(inner).max(1) as u16;
        let height = lines + 2;
        if bottom < area.y + height {
            break;
        }
        bottom -= height;

        let rect = Rect::new(area.x + area.width - width, bottom, width, height);
        frame.render_widget(Clear, rect);

        let style = styles::toast_style(toast.level);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style);
        let paragraph = Paragraph::new(Line::from(Span::styled(text, style)))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, rect);
    }
}

/// One line of `key action` pairs, e.g. `y quit · n stay`
fn key_hints(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" · ", styles::muted_style()));
        }
        spans.push(Span::styled(*key, styles::help_key_style()));
        spans.push(Span::styled(format!(" {}", action), styles::muted_style()));
    }
    Line::from(spans)
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 25, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  moodtrack", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-4", "Switch tabs"),
        help_line("←/→", "Previous/next tab"),
        help_line("↑/↓", "Move selection"),
        help_line("[ / ]", "Previous/next page"),
        Line::from(""),
        Line::from(Span::styled(" Check-in", styles::highlight_style())),
        help_line("Enter", "Submit the selected emotion"),
        help_line("c", "Edit the comment"),
        Line::from(""),
        Line::from(Span::styled(" Units", styles::highlight_style())),
        help_line("s", "Next organizational level"),
        help_line("r", "Download the unit's PDF report"),
        Line::from(""),
        Line::from(Span::styled(" General", styles::highlight_style())),
        help_line("u", "Reload from the server"),
        help_line("L", "Log out"),
        help_line("q", "Quit"),
        Line::from(""),
        key_hints(&[("?", "close"), ("Esc", "close")]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn login_field<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw("      "),
        Span::styled(label, styles::muted_style()),
        Span::styled(format!("{:<16}{}", value, cursor), style),
        Span::styled("]", styles::muted_style()),
    ])
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() { 11 } else { 9 };
    let area = centered_rect_fixed(46, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled("   Sign in to moodtrack", styles::title_style())),
        Line::from(""),
        login_field(
            "Username: [",
            truncate(&app.login_username, 16),
            app.login_focus == LoginFocus::Username,
        ),
        login_field(
            "Password: [",
            "*".repeat(app.login_password.chars().count().min(16)),
            app.login_focus == LoginFocus::Password,
        ),
        Line::from(""),
    ];

    let button_focused = app.login_focus == LoginFocus::Button;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let button_label = if button_focused { " ▶ Login ◀ " } else { "   Login   " };
    lines.push(Line::from(vec![
        Span::raw("            ["),
        Span::styled(button_label, button_style),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 6, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Leave moodtrack?", styles::highlight_style())),
        Line::from(""),
        key_hints(&[("y", "quit"), ("n", "stay")]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_shortcuts_follow_page_links() {
        assert!(list_shortcuts(true, true).starts_with("[ ] page"));
        assert!(list_shortcuts(false, true).starts_with("] next page"));
        assert!(list_shortcuts(true, false).starts_with("[ prev page"));
        assert_eq!(list_shortcuts(false, false), "[u]pdate | [L]ogout | [q]uit");
    }

    #[test]
    fn test_centered_rect_fixed() {
        let outer = Rect::new(0, 0, 100, 40);
        let rect = centered_rect_fixed(46, 10, outer);
        assert_eq!(rect, Rect::new(27, 15, 46, 10));

        // Never larger than the frame
        let small = Rect::new(0, 0, 20, 5);
        let rect = centered_rect_fixed(46, 10, small);
        assert_eq!((rect.width, rect.height), (20, 5));
    }
}
