use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{Handled, Redraw};

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Submitted(String),
}

/// Single-line text input with emacs-style editing keys.
#[derive(Debug)]
pub struct LineInput {
    text: String,
    /// Cursor position in chars
    cursor: usize,
    pub placeholder: String,
    redraw: Redraw,
}

impl LineInput {
    pub fn new(placeholder: &str, redraw: Redraw) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            placeholder: placeholder.to_string(),
            redraw,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.chars().count();
        self.redraw.notify_changed();
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    /// Every key except Esc and Tab is consumed while the input has focus.
    pub fn handle_key(&mut self, key: KeyEvent) -> Handled<InputEvent> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => return Handled::Emit(InputEvent::Submitted(self.text.clone())),
            KeyCode::Esc | KeyCode::Tab => return Handled::Ignored,
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.len_chars(),
            KeyCode::Char('b') if ctrl => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Char('f') if ctrl => self.cursor = (self.cursor + 1).min(self.len_chars()),
            KeyCode::Char('k') if ctrl => {
                let at = self.byte_offset(self.cursor);
                self.text.truncate(at);
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len_chars(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len_chars()),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    let at = self.byte_offset(self.cursor - 1);
                    self.text.remove(at);
                    self.cursor -= 1;
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.len_chars() {
                    let at = self.byte_offset(self.cursor);
                    self.text.remove(at);
                }
            }
            KeyCode::Char(c) if !ctrl => {
                let at = self.byte_offset(self.cursor);
                self.text.insert(at, c);
                self.cursor += 1;
            }
            _ => return Handled::Consumed,
        }
        self.redraw.notify_changed();
        Handled::Consumed
    }
}
