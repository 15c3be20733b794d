mod markdown;
mod profile_view;
mod repo_view;
mod search_view;
mod status_bar;
mod styles;
mod table;
mod thread_view;

use crate::app::{App, ClickTarget, Screen};
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::widgets::Block;
use ratatui::Frame;

/// Screen regions from the last frame, used to resolve mouse clicks.
#[derive(Debug, Default)]
pub struct HitMap {
    regions: Vec<(Rect, ClickTarget)>,
}

impl HitMap {
    pub fn add(&mut self, area: Rect, target: ClickTarget) {
        self.regions.push((area, target));
    }

    /// Later regions win where they overlap
    pub fn target_at(&self, column: u16, row: u16) -> Option<ClickTarget> {
        let pos = Position::new(column, row);
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| area.contains(pos))
            .map(|(_, target)| *target)
    }
}

/// Render the entire UI
pub fn draw(f: &mut Frame, app: &App) -> HitMap {
    let mut hits = HitMap::default();
    f.render_widget(Block::default().style(styles::default_style()), f.area());

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // top bar: screens + breadcrumbs
            Constraint::Min(1),    // main content
            Constraint::Length(1), // key hints
        ])
        .split(f.area());

    status_bar::render_top_bar(f, outer[0], app);

    let main = outer[1];
    match app.nav.top() {
        Screen::Repositories(screen) => search_view::render(f, main, screen, &mut hits),
        Screen::Repository(screen) => repo_view::render(f, main, screen, &mut hits),
        Screen::Issue(screen) => thread_view::render(f, main, screen, &mut hits),
        Screen::Profile(screen) => profile_view::render(f, main, screen),
        Screen::Notifications(screen) => {
            let title = format!(" NOTIFICATIONS ({}) ", screen.list.len());
            table::render(f, main, &screen.list, &title, true, &mut hits);
        }
    }

    status_bar::render_bottom_bar(f, outer[2], app);

    if let Some(ref notice) = app.notice {
        status_bar::render_notice(f, f.area(), notice);
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_map_resolves_innermost_region() {
        let mut hits = HitMap::default();
        hits.add(Rect::new(0, 0, 20, 10), ClickTarget::Panel(0));
        hits.add(Rect::new(0, 3, 20, 1), ClickTarget::Row(2));
        assert_eq!(hits.target_at(5, 3), Some(ClickTarget::Row(2)));
        assert_eq!(hits.target_at(5, 4), Some(ClickTarget::Panel(0)));
        assert_eq!(hits.target_at(25, 4), None);
    }
}
