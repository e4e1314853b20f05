use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::browser::IssueBrowser;
use crate::types::{Issue, LoadState, RepositoryDetail};
use crate::ui::truncate;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(browser) = &app.browser else {
        return;
    };

    match (&browser.load, &browser.detail) {
        (LoadState::Failed(reason), _) => render_failed(frame, reason, area),
        (LoadState::Success, Some(detail)) => render_loaded(frame, browser, detail, area),
        _ => render_loading(frame, area),
    }
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let loading = Paragraph::new("Loading...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(loading, area);
}

fn render_failed(frame: &mut Frame, reason: &str, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "Could not load repository",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(reason, Style::default().fg(Color::Gray))),
        Line::from(""),
        Line::from(Span::styled(
            "r: retry | q: back",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let failed = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(failed, area);
}

fn render_loaded(frame: &mut Frame, browser: &IssueBrowser, detail: &RepositoryDetail, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_owner(frame, detail, chunks[0]);
    render_filters(frame, browser, chunks[1]);
    render_issues(frame, browser, chunks[2]);
    render_pager(frame, browser, chunks[3]);
}

fn render_owner(frame: &mut Frame, detail: &RepositoryDetail, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled(
                detail.name.as_str(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("@{}", detail.owner.login),
                Style::default().fg(Color::Gray),
            ),
        ]),
        Line::from(Span::raw(
            detail.description.as_deref().unwrap_or("No description"),
        )),
        Line::from(Span::styled(
            detail.owner.avatar_url.as_str(),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let owner = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Repository "));
    frame.render_widget(owner, area);
}

fn render_filters(frame: &mut Frame, browser: &IssueBrowser, area: Rect) {
    let titles: Vec<String> = browser
        .filters
        .iter()
        .enumerate()
        .map(|(i, f)| format!("[{}] {}", i + 1, f))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" Filter "))
        .select(browser.filter_index)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_issues(frame: &mut Frame, browser: &IssueBrowser, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Issues ({}) ", browser.issues.len()));

    if let LoadState::Failed(reason) = &browser.issues_state {
        let failed = Paragraph::new(format!("Could not load issues: {}", reason))
            .block(block)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Red));
        frame.render_widget(failed, area);
        return;
    }

    if browser.issues.is_empty() && !browser.issues_state.is_loading() {
        let empty = Paragraph::new("No issues on this page")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let w = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = browser
        .issues
        .iter()
        .enumerate()
        .map(|(i, issue)| issue_item(issue, i == browser.selected, w))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    if !browser.issues.is_empty() {
        state.select(Some(browser.selected));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn issue_item(issue: &Issue, selected: bool, width: usize) -> ListItem<'_> {
    let title_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().add_modifier(Modifier::UNDERLINED)
    };

    let mut first = vec![
        Span::styled(format!("#{:<6}", issue.number), Style::default().fg(Color::Cyan)),
        Span::styled(truncate(&issue.title, width.saturating_sub(8)), title_style),
    ];
    for label in &issue.labels {
        first.push(Span::raw(" "));
        first.push(Span::styled(
            format!("[{}]", label.name),
            Style::default().fg(Color::Magenta),
        ));
    }

    let second = Line::from(vec![
        Span::raw("        "),
        Span::styled(
            format!("@{}", issue.user.login),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("  "),
        Span::styled(
            issue.user.avatar_url.as_str(),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    ListItem::new(vec![Line::from(first), second])
}

fn render_pager(frame: &mut Frame, browser: &IssueBrowser, area: Rect) {
    let back_style = if browser.page.is_first() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };

    let line = Line::from(vec![
        Span::styled("< back", back_style),
        Span::raw(format!("   page {}   ", browser.page)),
        Span::styled("next >", Style::default().fg(Color::White)),
    ]);

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
