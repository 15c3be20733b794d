use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use super::markdown;
use super::styles;
use super::HitMap;
use crate::app::{ClickTarget, CommentPanel, IssueScreen, PanelTarget};

/// First panel to draw so the active one fits on screen. When the active
/// panel alone is taller than the viewport it is drawn first and clipped.
fn first_visible(heights: &[u16], active: usize, viewport: u16) -> usize {
    let mut start = 0;
    while start < active {
        let needed: u32 = heights[start..=active].iter().map(|h| *h as u32).sum();
        if needed <= viewport as u32 {
            break;
        }
        start += 1;
    }
    start
}

/// Body lines plus the two border rows, saturating at `u16::MAX`
fn panel_height(body_lines: usize) -> u16 {
    u16::try_from(body_lines)
        .unwrap_or(u16::MAX)
        .saturating_add(2)
}

fn panel_title(panel: &CommentPanel) -> Line<'static> {
    let date = panel.created_at.split('T').next().unwrap_or_default().to_string();
    let label = match panel.target {
        PanelTarget::IssueBody => "opened",
        PanelTarget::Comment(_) => "commented",
    };
    Line::from(vec![
        Span::styled(format!(" {} ", panel.author), styles::title_style()),
        Span::styled(format!("{label} {date} "), styles::dim_style()),
    ])
}

/// Render the issue body and replies as stacked panels
pub fn render(f: &mut Frame, area: Rect, screen: &IssueScreen, hits: &mut HitMap) {
    let thread = &screen.thread;
    // Borders plus one column of padding on each side
    let text_width = area.width.saturating_sub(4) as usize;

    let bodies: Vec<Vec<Line<'static>>> = thread
        .panels()
        .iter()
        .map(|p| markdown::render(&p.body, text_width))
        .collect();
    let heights: Vec<u16> = bodies
        .iter()
        .map(|lines| panel_height(lines.len()))
        .collect();

    let start = first_visible(&heights, thread.active_index(), area.height);
    let mut y = area.y;
    for (index, (panel, lines)) in thread.panels().iter().zip(bodies).enumerate().skip(start) {
        if y >= area.bottom() {
            break;
        }
        let height = heights[index].min(area.bottom() - y);
        let rect = Rect {
            x: area.x,
            y,
            width: area.width,
            height,
        };

        let border = if panel.active {
            styles::focus_border()
        } else {
            styles::border_style()
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .padding(Padding::horizontal(1))
            .title(panel_title(panel))
            .style(styles::surface_style());
        if panel.target == PanelTarget::IssueBody {
            let state = format!(" {} · {} comments ", screen.issue.state, screen.issue.comments);
            block = block.title_bottom(Line::from(Span::styled(state, styles::dim_style())));
        }

        f.render_widget(Paragraph::new(lines).block(block), rect);
        hits.add(rect, ClickTarget::Panel(index));
        y += height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_fits_starts_at_top() {
        assert_eq!(first_visible(&[5, 5, 5], 2, 20), 0);
    }

    #[test]
    fn scrolls_until_active_panel_fits() {
        assert_eq!(first_visible(&[10, 10, 10, 4], 3, 15), 2);
    }

    #[test]
    fn oversized_active_panel_is_drawn_first() {
        assert_eq!(first_visible(&[3, 50], 1, 20), 1);
        assert_eq!(first_visible(&[50], 0, 20), 0);
    }

    #[test]
    fn panel_height_saturates_for_huge_bodies() {
        assert_eq!(panel_height(3), 5);
        assert_eq!(panel_height(70_000), u16::MAX);
        assert_eq!(panel_height(usize::MAX), u16::MAX);
    }
}
