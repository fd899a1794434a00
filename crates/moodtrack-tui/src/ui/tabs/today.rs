use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use moodtrack_core::dashboard::PersonalDashboard;
use moodtrack_core::models::{Emotion, Mood};
use moodtrack_core::period::{current_half_day, local_now, HalfDay};
use moodtrack_core::utils::{format_date, format_degree};

use crate::app::{App, AppState};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(dashboard) = app.dashboard.as_ref() else {
        return;
    };
    let personal = dashboard.personal();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_overview(frame, app, personal, chunks[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(chunks[1]);

    render_emotion_picker(frame, app, personal, right[0]);
    render_comment(frame, app, right[1]);
}

fn mood_line(label: &str, mood: Option<Mood>, degree: Option<i64>) -> Line<'static> {
    let value = match mood {
        Some(mood) => Span::styled(
            format!(
                "{} {}{}",
                mood.glyph(),
                mood.label(),
                degree.map(|d| format!(" ({})", format_degree(d))).unwrap_or_default()
            ),
            styles::mood_style(mood),
        ),
        None => Span::styled("no data yet", styles::muted_style()),
    };
    Line::from(vec![
        Span::styled(format!("{:<12}", label), styles::highlight_style()),
        value,
    ])
}

fn entry_line(half: HalfDay, entry: Option<&Emotion>) -> Line<'static> {
    let label = format!("{:<12}", capitalize(half.label()));
    match entry {
        Some(emotion) => {
            let mood = emotion.mood();
            Line::from(vec![
                Span::styled(label, styles::highlight_style()),
                Span::styled(
                    format!("{} {}", mood.glyph(), mood.label()),
                    styles::mood_style(mood),
                ),
                Span::styled(format!("  at {}", emotion.submitted_at()), styles::muted_style()),
            ])
        }
        None => Line::from(vec![
            Span::styled(label, styles::highlight_style()),
            Span::styled("not submitted", styles::muted_style()),
        ]),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn render_overview(frame: &mut Frame, app: &App, personal: &PersonalDashboard, area: Rect) {
    let now = local_now(app.config.utc_offset_hours);
    let half = current_half_day(&now);
    let entry = |h: HalfDay| personal.today.iter().find(|e| e.half_day() == Some(h));

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Hello, {}", personal.user.first_name),
            styles::title_style(),
        )),
        Line::from(Span::styled(
            format!("{} · {} check-in", format_date(now.date_naive()), half.label()),
            styles::muted_style(),
        )),
        Line::from(""),
    ];

    if let Some(eligibility) = app.eligibility() {
        let style = if eligibility.is_open() {
            styles::success_style()
        } else {
            styles::muted_style()
        };
        lines.push(Line::from(Span::styled(eligibility.message(), style)));
        lines.push(Line::from(""));
    }

    lines.push(entry_line(HalfDay::Morning, entry(HalfDay::Morning)));
    lines.push(entry_line(HalfDay::Evening, entry(HalfDay::Evening)));
    lines.push(Line::from(""));

    let overview = &personal.overview;
    lines.push(mood_line("This week", overview.week_mood(), overview.week_degree));
    lines.push(mood_line("This month", overview.month_mood(), overview.month_degree));

    let block = Block::default()
        .title(" Today ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_emotion_picker(frame: &mut Frame, app: &App, personal: &PersonalDashboard, area: Rect) {
    let items: Vec<ListItem> = personal
        .emotion_types
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let style = if i == app.emotion_selection {
                styles::selected_style()
            } else {
                styles::mood_style(kind.name)
            };
            ListItem::new(Line::from(format!(" {}", kind.display()))).style(style)
        })
        .collect();

    let focused = matches!(app.state, AppState::Normal);
    let block = Block::default()
        .title(" How do you feel? ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    if items.is_empty() {
        let paragraph = Paragraph::new(Span::styled("No emotion types available", styles::muted_style()))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(app.emotion_selection));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_comment(frame: &mut Frame, app: &App, area: Rect) {
    let editing = matches!(app.state, AppState::EditingComment);
    let content = if app.comment.is_empty() && !editing {
        Span::styled("press c to add a comment", styles::muted_style())
    } else {
        let cursor = if editing { "▌" } else { "" };
        Span::styled(format!("{}{}", app.comment, cursor), styles::list_item_style())
    };

    let block = Block::default()
        .title(" Comment ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(editing));

    frame.render_widget(Paragraph::new(Line::from(content)).block(block), area);
}
