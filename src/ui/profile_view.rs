use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};

use super::styles;
use crate::app::ProfileScreen;

pub fn render(f: &mut Frame, area: Rect, screen: &ProfileScreen) {
    let p = &screen.profile;
    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<14}"), styles::key_hint_style()),
            Span::styled(value, Style::default().fg(styles::BRIGHT)),
        ])
    };
    let or_dash = |v: &Option<String>| v.clone().filter(|s| !s.is_empty()).unwrap_or_else(|| "-".into());

    let lines = vec![
        field("Name", p.display_name().to_string()),
        field("Login", p.login.clone()),
        field("Company", or_dash(&p.company)),
        field("Email", or_dash(&p.email)),
        field("Bio", or_dash(&p.bio)),
        Line::default(),
        field("Public repos", p.public_repos.to_string()),
        field("Followers", p.followers.to_string()),
        field("Following", p.following.to_string()),
        Line::default(),
        field("URL", p.html_url.clone()),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style())
        .padding(Padding::uniform(1))
        .title(Line::from(Span::styled(" PROFILE ", styles::title_style())))
        .style(styles::surface_style());
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
