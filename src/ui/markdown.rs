use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use super::styles;

/// Light markdown styling for issue and comment bodies: headings, quotes,
/// bullets and fenced code. Prose is wrapped to `width`; code is not.
pub fn render(text: &str, width: usize) -> Vec<Line<'static>> {
    if text.trim().is_empty() {
        return vec![Line::from(Span::styled(
            "No description provided.",
            styles::dim_style().add_modifier(Modifier::ITALIC),
        ))];
    }

    let mut lines = Vec::new();
    let mut in_code = false;
    for raw in text.lines() {
        let trimmed = raw.trim_start();
        if trimmed.starts_with("```") {
            in_code = !in_code;
            lines.push(Line::from(Span::styled(raw.to_string(), styles::dim_style())));
            continue;
        }
        if in_code {
            lines.push(Line::from(Span::styled(
                raw.to_string(),
                Style::default().fg(styles::CYAN),
            )));
            continue;
        }

        let (content, style) = if trimmed.starts_with('#') {
            (
                trimmed.trim_start_matches('#').trim_start().to_string(),
                styles::title_style(),
            )
        } else if let Some(quote) = trimmed.strip_prefix('>') {
            (
                format!("│ {}", quote.trim_start()),
                Style::default().fg(styles::MUTED).add_modifier(Modifier::ITALIC),
            )
        } else if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            let indent = raw.len() - trimmed.len();
            (format!("{}• {}", " ".repeat(indent), item), styles::surface_style())
        } else {
            (raw.to_string(), styles::surface_style())
        };

        for wrapped in wrap(&content, width) {
            lines.push(Line::from(Span::styled(wrapped, style)));
        }
    }
    lines
}

/// Greedy word wrap measured in chars. Words wider than `width` are split.
fn wrap(line: &str, width: usize) -> Vec<String> {
    if width == 0 || line.chars().count() <= width {
        return vec![line.to_string()];
    }
    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            out.push(word.into_iter().collect());
            word = rest;
        }
        if current_len > 0 && current_len + 1 + word.len() > width {
            out.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }
    if current_len > 0 || out.is_empty() {
        out.push(current);
    }
    out
}
