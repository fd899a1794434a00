use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use moodtrack_core::dashboard::Dashboard;
use moodtrack_core::models::CollaboratorSummary;
use moodtrack_core::utils::{format_average, format_degree, truncate};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    // Managers see their service averages above the member list
    let service_rows = match app.dashboard.as_ref() {
        Some(Dashboard::Manager(m)) => m.service.units.len() as u16,
        _ => 0,
    };

    if service_rows == 0 {
        render_members(frame, app, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(service_rows + 2), Constraint::Min(5)])
        .split(area);

    render_service_summary(frame, app, chunks[0]);
    render_members(frame, app, chunks[1]);
}

fn render_service_summary(frame: &mut Frame, app: &App, area: Rect) {
    let Some(Dashboard::Manager(manager)) = app.dashboard.as_ref() else {
        return;
    };

    let lines: Vec<Line> = manager
        .service
        .units
        .iter()
        .map(|unit| {
            let daily = &unit.emotions_average.daily;
            let weekly = &unit.emotions_average.weekly;
            Line::from(vec![
                Span::styled(format!(" {:<24}", truncate(&unit.name, 24)), styles::highlight_style()),
                Span::raw("today "),
                Span::styled(
                    format!("{:<8}", format_average(daily.average)),
                    styles::mood_style(daily.mood()),
                ),
                Span::raw("week "),
                Span::styled(
                    format!("{} {}", format_average(weekly.average), weekly.mood().label()),
                    styles::mood_style(weekly.mood()),
                ),
            ])
        })
        .collect();

    let block = Block::default()
        .title(" Service ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn member_line(member: &CollaboratorSummary) -> Line<'static> {
    let morning = match member.has_submitted_morning_emotion {
        Some(true) => Span::styled("✓ morning ", styles::success_style()),
        Some(false) => Span::styled("✗ morning ", styles::error_style()),
        None => Span::styled("  -       ", styles::muted_style()),
    };

    let week = match (member.week_total(), member.week_mood()) {
        (Some(total), Some(mood)) => Span::styled(
            format!("{:>4} {}", format_degree(total), mood.label()),
            styles::mood_style(mood),
        ),
        _ => Span::styled("   -", styles::muted_style()),
    };

    Line::from(vec![
        Span::raw(format!(
            " {:<28} {:<14} ",
            truncate(&member.full_name(), 28),
            member.role.label()
        )),
        morning,
        week,
    ])
}

fn render_members(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .team
        .results
        .iter()
        .enumerate()
        .map(|(i, member)| {
            let style = if i == app.team_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(member_line(member)).style(style)
        })
        .collect();

    let scope = app
        .dashboard
        .as_ref()
        .and_then(|d| d.collaborator_scope())
        .map(|k| k.label())
        .unwrap_or("Team");
    let title = format!(
        " {} members ({}) · {} ",
        scope,
        app.team.count,
        app.team.position_label(app.team_request)
    );
    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if items.is_empty() {
        let paragraph = Paragraph::new(Span::styled(" No collaborators", styles::muted_style()))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(app.team_selection));
    frame.render_stateful_widget(list, area, &mut state);
}
