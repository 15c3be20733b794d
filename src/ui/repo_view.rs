use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};

use super::styles;
use super::table;
use super::HitMap;
use crate::app::RepositoryScreen;
use crate::github::Repository;

fn summary_lines(repo: &Repository) -> Vec<Line<'static>> {
    let description = repo
        .description
        .clone()
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| "No description".to_string());
    let visibility = if repo.private {
        Span::styled(" private ", styles::badge_style(styles::YELLOW))
    } else {
        Span::styled(" public ", styles::badge_style(styles::GREEN))
    };
    let stat = |label: &str, value: u64| {
        vec![
            Span::styled(format!("{label} "), styles::key_hint_style()),
            Span::styled(format!("{value}   "), Style::default().fg(styles::BRIGHT)),
        ]
    };

    let mut stats = vec![visibility, Span::raw("  ")];
    stats.extend(stat("★", repo.stargazers_count));
    stats.extend(stat("forks", repo.forks_count));
    stats.extend(stat("open issues", repo.open_issues_count));
    stats.extend(stat("size KB", repo.size));

    let mut lines = vec![
        Line::from(Span::styled(description, styles::surface_style())),
        Line::from(stats),
    ];
    if !repo.topics.is_empty() {
        let topics: Vec<Span> = repo
            .topics
            .iter()
            .map(|t| Span::styled(format!("#{t} "), Style::default().fg(styles::PURPLE)))
            .collect();
        lines.push(Line::from(topics));
    }
    lines
}

/// Repository summary above its issue table
pub fn render(f: &mut Frame, area: Rect, screen: &RepositoryScreen, hits: &mut HitMap) {
    let summary = summary_lines(&screen.repo);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(summary.len() as u16 + 2),
            Constraint::Min(1),
        ])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style())
        .padding(Padding::horizontal(1))
        .title(Line::from(Span::styled(
            format!(" {} ", screen.repo.full_name),
            styles::title_style(),
        )))
        .style(styles::surface_style());
    f.render_widget(
        Paragraph::new(summary).block(block).wrap(Wrap { trim: true }),
        chunks[0],
    );

    let title = format!(" ISSUES ({}) ", screen.issues.len());
    table::render(f, chunks[1], &screen.issues, &title, true, hits);
}
