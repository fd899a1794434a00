use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use moodtrack_core::period::local_now;
use moodtrack_core::utils::{format_date, format_degree, relative_period, truncate};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_entries(frame, app, chunks[0]);
    render_entry_detail(frame, app, chunks[1]);
}

fn render_entries(frame: &mut Frame, app: &App, area: Rect) {
    let today = local_now(app.config.utc_offset_hours).date_naive();

    let items: Vec<ListItem> = app
        .history
        .results
        .iter()
        .enumerate()
        .map(|(i, emotion)| {
            let mood = emotion.mood();
            let half = emotion.half_day().map(|h| h.label()).unwrap_or("-");
            let line = Line::from(vec![
                Span::raw(format!(
                    " {}  {:<10} {:<8} ",
                    format_date(emotion.date),
                    truncate(&relative_period(emotion.date, today), 10),
                    half
                )),
                Span::styled(
                    format!("{:<10} {:>3}", mood.label(), format_degree(emotion.emotion_degree)),
                    styles::mood_style(mood),
                ),
            ]);

            let style = if i == app.history_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let title = format!(
        " History ({}) · {} ",
        app.history.count,
        app.history.position_label(app.history_request)
    );
    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if items.is_empty() {
        let paragraph = Paragraph::new(Span::styled(" No check-ins yet", styles::muted_style()))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(app.history_selection));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_entry_detail(frame: &mut Frame, app: &App, area: Rect) {
    let lines = match app.history.results.get(app.history_selection) {
        Some(emotion) => {
            let mood = emotion.mood();
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("Date:     ", styles::highlight_style()),
                    Span::raw(format_date(emotion.date)),
                ]),
                Line::from(vec![
                    Span::styled("Time:     ", styles::highlight_style()),
                    Span::raw(emotion.submitted_at().to_string()),
                ]),
                Line::from(vec![
                    Span::styled("Emotion:  ", styles::highlight_style()),
                    Span::styled(
                        format!("{} {} ({})", mood.glyph(), mood.label(), format_degree(emotion.emotion_degree)),
                        styles::mood_style(mood),
                    ),
                ]),
            ];
            if let Some(ref status) = emotion.emotion_status {
                lines.push(Line::from(vec![
                    Span::styled("Status:   ", styles::highlight_style()),
                    Span::raw(status.clone()),
                ]));
            }
            lines.push(Line::from(""));
            match emotion.comment.as_deref().filter(|c| !c.trim().is_empty()) {
                Some(comment) => lines.push(Line::from(Span::raw(comment.to_string()))),
                None => lines.push(Line::from(Span::styled("No comment", styles::muted_style()))),
            }
            lines
        }
        None => vec![Line::from(Span::styled(
            "Select an entry from the list",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Entry ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
