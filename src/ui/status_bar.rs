use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::styles;
use crate::app::{App, Notice, TopLevel};

/// Top bar: top-level screens on the first row, breadcrumbs on the second
pub fn render_top_bar(f: &mut Frame, area: Rect, app: &App) {
    let panel_bg = Style::default().bg(styles::PANEL);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let mut spans = vec![
        Span::styled(" ghtui ", styles::badge_style(styles::BLUE)),
        Span::raw(" "),
    ];
    for which in TopLevel::ALL {
        let style = if which == app.nav.current() {
            Style::default()
                .fg(styles::BRIGHT)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(styles::DIM)
        };
        spans.push(Span::styled(format!("{} ", which.key()), styles::key_hint_style()));
        spans.push(Span::styled(which.label(), style));
        spans.push(Span::styled("  │  ", Style::default().fg(styles::BORDER)));
    }
    spans.pop();
    f.render_widget(Paragraph::new(Line::from(spans)).style(panel_bg), rows[0]);

    let mut crumbs: Vec<Span> = Vec::new();
    for (i, screen) in app.nav.frames().enumerate() {
        if i > 0 {
            crumbs.push(Span::styled(" › ", Style::default().fg(styles::DIM)));
        }
        crumbs.push(Span::styled(screen.title(), Style::default().fg(styles::TEXT)));
    }
    if let Some(subtitle) = app.nav.top().subtitle() {
        crumbs.push(Span::styled(format!("  {subtitle}"), styles::dim_style()));
    }
    crumbs.insert(0, Span::raw(" "));
    f.render_widget(Paragraph::new(Line::from(crumbs)).style(panel_bg), rows[1]);
}

/// Bottom bar: key hints for the top screen, then the global ones
pub fn render_bottom_bar(f: &mut Frame, area: Rect, app: &App) {
    let panel_bg = Style::default().bg(styles::PANEL);
    let top = app.nav.top();

    let mut hints: Vec<(&str, &str)> = top.hints().to_vec();
    if !top.captures_text() {
        if app.nav.depth() > 0 {
            hints.push(("Esc", "back"));
        }
        hints.push(("q", "quit"));
    }

    let mut spans = vec![Span::raw(" ")];
    for (key, action) in hints {
        spans.push(Span::styled(key, styles::key_hint_style()));
        spans.push(Span::styled(format!(" {action}  "), Style::default().fg(styles::DIM)));
    }
    if app.editor.command().is_none() {
        spans.push(Span::styled(
            "no editor configured",
            Style::default().fg(styles::YELLOW),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).style(panel_bg), area);
}

/// Transient status message in the top-right corner
pub fn render_notice(f: &mut Frame, area: Rect, notice: &Notice) {
    let notif_width = notice.text.chars().count() as u16 + 4;
    let notif_x = area.x + area.width.saturating_sub(notif_width + 2);
    let notif_y = area.y + 2;

    let notif_area = Rect {
        x: notif_x,
        y: notif_y,
        width: notif_width.min(area.width),
        height: 1,
    }
    .intersection(area);

    let dot = if notice.is_error { styles::RED } else { styles::GREEN };
    let notif = Paragraph::new(Line::from(vec![
        Span::styled(" ● ", Style::default().fg(dot)),
        Span::styled(notice.text.as_str(), Style::default().fg(styles::TEXT)),
        Span::raw(" "),
    ]))
    .style(Style::default().bg(styles::PANEL).fg(styles::TEXT));

    f.render_widget(notif, notif_area);
}
