use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::ui::truncate;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_form(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let tracked = &app.tracked;

    // a failed add only flags the form; the reason is in the log
    let border = if tracked.alert() {
        Style::default().fg(Color::Red)
    } else if tracked.editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let title = if tracked.submit.is_loading() {
        " Add Repository (checking...) "
    } else if tracked.alert() {
        " Add Repository (could not add) "
    } else {
        " Add Repository "
    };

    let text = if tracked.input.is_empty() && !tracked.editing {
        Line::from(Span::styled(
            "owner/repo - press a to type",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut spans = vec![Span::raw(tracked.input.as_str())];
        if tracked.editing {
            spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
        }
        Line::from(spans)
    };

    let form = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border),
    );
    frame.render_widget(form, area);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let repos = app.tracked.repos();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" My Repositories ({}) ", repos.len()));

    if repos.is_empty() {
        let empty = Paragraph::new("No tracked repositories")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let w = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = repos
        .iter()
        .enumerate()
        .map(|(i, repo)| {
            let style = if i == app.tracked.selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(truncate(&repo.name, w), style)))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(app.tracked.selected));

    frame.render_stateful_widget(list, area, &mut state);
}
