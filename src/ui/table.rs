use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row as TableRow, Table},
    Frame,
};

use super::styles;
use super::HitMap;
use crate::app::{ClickTarget, Row, SelectionList};

/// Widest a column may grow before the table truncates it
const MAX_COLUMN_WIDTH: usize = 60;

/// First row to show so the cursor stays in view, centered when possible
pub(super) fn scroll_offset(cursor: usize, len: usize, viewport: usize) -> usize {
    if len <= viewport || cursor < viewport / 2 {
        0
    } else if cursor > len.saturating_sub(viewport / 2) {
        len.saturating_sub(viewport)
    } else {
        cursor.saturating_sub(viewport / 2)
    }
}

fn column_widths<T>(headers: &[&str], list: &SelectionList<T>) -> Vec<Constraint>
where
    T: Row + Clone,
{
    headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let widest = list
                .rows()
                .iter()
                .filter_map(|row| row.columns.get(col))
                .map(|text| text.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
                .min(MAX_COLUMN_WIDTH);
            Constraint::Length(widest as u16)
        })
        .collect()
}

/// Render a selection list as a bordered table. Only the rows inside the
/// viewport are built.
pub fn render<T>(
    f: &mut Frame,
    area: Rect,
    list: &SelectionList<T>,
    title: &str,
    focused: bool,
    hits: &mut HitMap,
) where
    T: Row + Clone,
{
    let border = if focused {
        styles::focus_border()
    } else {
        styles::border_style()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Line::from(Span::styled(title.to_string(), styles::title_style())))
        .style(styles::surface_style());
    let inner = block.inner(area);
    f.render_widget(block, area);

    if list.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(" Nothing here", styles::dim_style())));
        f.render_widget(empty, inner);
        return;
    }

    let headers = T::headers();
    let viewport_height = inner.height.saturating_sub(1) as usize; // -1 for header
    let cursor = list.cursor().unwrap_or(0);
    let scroll = scroll_offset(cursor, list.len(), viewport_height);
    let end = (scroll + viewport_height).min(list.len());

    let rows: Vec<TableRow> = list.rows()[scroll..end]
        .iter()
        .enumerate()
        .map(|(offset, entry)| {
            let style = if list.cursor() == Some(scroll + offset) {
                styles::selected_style()
            } else {
                styles::surface_style()
            };
            TableRow::new(entry.columns.iter().map(|c| Cell::from(c.clone()))).style(style)
        })
        .collect();

    let header = TableRow::new(headers.iter().map(|h| Cell::from(h.to_uppercase())))
        .style(styles::column_header_style());
    let table = Table::new(rows, column_widths(headers, list))
        .header(header)
        .column_spacing(2);
    f.render_widget(table, inner);

    for offset in 0..end - scroll {
        let row_area = Rect {
            x: inner.x,
            y: inner.y + 1 + offset as u16,
            width: inner.width,
            height: 1,
        };
        hits.add(row_area, ClickTarget::Row(scroll + offset));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_lists_never_scroll() {
        assert_eq!(scroll_offset(4, 5, 10), 0);
    }

    #[test]
    fn cursor_is_centered_then_pinned_to_bottom() {
        assert_eq!(scroll_offset(2, 100, 10), 0);
        assert_eq!(scroll_offset(50, 100, 10), 45);
        assert_eq!(scroll_offset(99, 100, 10), 90);
    }

    #[test]
    fn cursor_always_inside_viewport() {
        for len in 1..40 {
            for cursor in 0..len {
                let viewport = 7;
                let start = scroll_offset(cursor, len, viewport);
                assert!(start <= cursor && cursor < start + viewport);
            }
        }
    }
}
