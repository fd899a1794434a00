use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use moodtrack_core::models::{PeriodAverage, UnitOverview};
use moodtrack_core::utils::{format_average, format_percent, truncate};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_unit_list(frame, app, chunks[0]);
    render_unit_detail(frame, app, chunks[1]);
}

fn render_unit_list(frame: &mut Frame, app: &App, area: Rect) {
    let Some(section) = app.current_section() else {
        let block = Block::default()
            .title(" Units ")
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(true));
        let paragraph = Paragraph::new(Span::styled(" No units to show", styles::muted_style()))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let items: Vec<ListItem> = section
        .units
        .iter()
        .enumerate()
        .map(|(i, unit)| {
            let daily = &unit.emotions_average.daily;
            let line = Line::from(vec![
                Span::raw(format!(" {:<22} ", truncate(&unit.name, 22))),
                Span::styled(format_average(daily.average), styles::mood_style(daily.mood())),
            ]);
            let style = if i == app.unit_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let section_count = app.unit_sections().len();
    let title = if section_count > 1 {
        format!(
            " {} ({}/{}) ",
            section.kind.label(),
            app.section_index + 1,
            section_count
        )
    } else {
        format!(" {} ", section.kind.label())
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(app.unit_selection));
    frame.render_stateful_widget(list, area, &mut state);
}

fn average_lines(label: &'static str, average: &PeriodAverage) -> Vec<Line<'static>> {
    let mood = average.mood();
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{:<10}", label), styles::highlight_style()),
            Span::styled(
                format!("{} {} {}", format_average(average.average), mood.glyph(), mood.label()),
                styles::mood_style(mood),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                "          {} collaborators · participation {}",
                average.collaborators_count,
                format_percent(average.participation_rate)
            ),
            styles::muted_style(),
        )),
    ];
    let span = average.span();
    if !span.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("          {}", span),
            styles::muted_style(),
        )));
    }
    lines
}

fn unit_detail_lines(unit: &UnitOverview) -> Vec<Line<'static>> {
    let averages = &unit.emotions_average;
    let mut lines = Vec::new();
    lines.extend(average_lines("Today", &averages.daily));
    lines.push(Line::from(""));
    lines.extend(average_lines("Week", &averages.weekly));
    lines.push(Line::from(""));
    lines.extend(average_lines("Month", &averages.monthly));

    if let Some(ref summary) = unit.emotions_summary {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(summary.clone(), styles::muted_style())));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[r]", styles::help_key_style()),
        Span::styled(" download PDF report", styles::help_desc_style()),
    ]));
    lines
}

fn render_unit_detail(frame: &mut Frame, app: &App, area: Rect) {
    let (title, lines) = match app.selected_unit() {
        Some((_, unit)) => (format!(" {} ", unit.name), unit_detail_lines(unit)),
        None => (
            " No Unit Selected ".to_string(),
            vec![Line::from(Span::styled(
                "Select a unit from the list",
                styles::muted_style(),
            ))],
        ),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
