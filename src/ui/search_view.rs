use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::styles;
use super::table;
use super::HitMap;
use crate::app::{ClickTarget, RepositoriesScreen, SearchFocus};

/// Search input above the results table
pub fn render(f: &mut Frame, area: Rect, screen: &RepositoriesScreen, hits: &mut HitMap) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let typing = screen.focus == SearchFocus::Input;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if typing {
            styles::focus_border()
        } else {
            styles::border_style()
        })
        .title(Line::from(Span::styled(" SEARCH ", styles::title_style())))
        .style(styles::surface_style());
    let inner = block.inner(chunks[0]);

    let text = screen.input.text();
    let line = if text.is_empty() {
        Line::from(Span::styled(screen.input.placeholder.clone(), styles::dim_style()))
    } else {
        Line::from(Span::raw(text.to_string()))
    };
    f.render_widget(Paragraph::new(line).block(block), chunks[0]);
    hits.add(chunks[0], ClickTarget::Input);

    if typing {
        let column = (screen.input.cursor() as u16).min(inner.width.saturating_sub(1));
        f.set_cursor_position(Position::new(inner.x + column, inner.y));
    }

    let title = match &screen.last_query {
        Some(_) => format!(" REPOSITORIES ({}) ", screen.list.len()),
        None => " REPOSITORIES ".to_string(),
    };
    table::render(f, chunks[1], &screen.list, &title, !typing, hits);
}
