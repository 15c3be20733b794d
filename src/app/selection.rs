use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{Handled, Redraw};
use crate::error::{Error, Result};

/// A domain value that can be shown as one table row.
pub trait Row {
    fn headers() -> &'static [&'static str];
    fn columns(&self) -> Vec<String>;
}

/// Emitted towards the owning screen. The list never navigates itself.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent<T> {
    Selected(T),
}

#[derive(Debug, Clone)]
pub struct RowEntry<T> {
    pub value: T,
    pub columns: Vec<String>,
}

/// Ordered rows with a single cursor clamped to `[0, len-1]`.
#[derive(Debug)]
pub struct SelectionList<T> {
    rows: Vec<RowEntry<T>>,
    cursor: Option<usize>,
    redraw: Redraw,
}

impl<T: Row + Clone> SelectionList<T> {
    pub fn new(redraw: Redraw) -> Self {
        Self {
            rows: Vec::new(),
            cursor: None,
            redraw,
        }
    }

    /// Replace every row. The cursor goes back to the first row (or is
    /// cleared), never kept at a stale position.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.rows = items
            .into_iter()
            .map(|value| RowEntry {
                columns: value.columns(),
                value,
            })
            .collect();
        self.cursor = if self.rows.is_empty() { None } else { Some(0) };
        self.redraw.notify_changed();
    }

    pub fn current(&self) -> Result<&T> {
        self.cursor
            .and_then(|i| self.rows.get(i))
            .map(|row| &row.value)
            .ok_or_else(|| Error::NotFound("no row selected".into()))
    }

    /// Swap in a newer copy of the first row matching `is_same`, keeping
    /// the cursor where it is. Returns whether a row matched.
    pub fn replace(&mut self, is_same: impl Fn(&T) -> bool, value: T) -> bool {
        let Some(row) = self.rows.iter_mut().find(|row| is_same(&row.value)) else {
            return false;
        };
        *row = RowEntry {
            columns: value.columns(),
            value,
        };
        self.redraw.notify_changed();
        true
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn rows(&self) -> &[RowEntry<T>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn move_down(&mut self) -> bool {
        self.move_to(self.cursor.map_or(0, |c| c + 1))
    }

    pub fn move_up(&mut self) -> bool {
        self.move_to(self.cursor.map_or(0, |c| c.saturating_sub(1)))
    }

    /// Clamp and move; returns whether the cursor changed
    fn move_to(&mut self, index: usize) -> bool {
        if self.rows.is_empty() {
            return false;
        }
        let clamped = index.min(self.rows.len() - 1);
        if self.cursor == Some(clamped) {
            return false;
        }
        self.cursor = Some(clamped);
        self.redraw.notify_changed();
        true
    }

    /// Pointer click on a row: move there, then select it
    pub fn click(&mut self, row: usize) -> Handled<ListEvent<T>> {
        if row >= self.rows.len() {
            return Handled::Ignored;
        }
        self.move_to(row);
        self.select_current()
    }

    fn select_current(&self) -> Handled<ListEvent<T>> {
        match self.current() {
            Ok(value) => Handled::Emit(ListEvent::Selected(value.clone())),
            Err(_) => Handled::Consumed,
        }
    }

    /// Arrow keys plus the emacs (`Ctrl-n`/`Ctrl-p`) and vi (`j`/`k`) sets.
    /// Bare movement emits nothing.
    pub fn handle_key(&mut self, key: KeyEvent) -> Handled<ListEvent<T>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => self.select_current(),
            KeyCode::Down | KeyCode::Char('j') if !ctrl => {
                self.move_down();
                Handled::Consumed
            }
            KeyCode::Up | KeyCode::Char('k') if !ctrl => {
                self.move_up();
                Handled::Consumed
            }
            KeyCode::Char('n') if ctrl => {
                self.move_down();
                Handled::Consumed
            }
            KeyCode::Char('p') if ctrl => {
                self.move_up();
                Handled::Consumed
            }
            KeyCode::Home => {
                self.move_to(0);
                Handled::Consumed
            }
            KeyCode::End => {
                self.move_to(usize::MAX);
                Handled::Consumed
            }
            _ => Handled::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(&'static str);

    impl Row for Item {
        fn headers() -> &'static [&'static str] {
            &["name"]
        }

        fn columns(&self) -> Vec<String> {
            vec![self.0.to_string()]
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn list_of(items: &[&'static str]) -> SelectionList<Item> {
        let mut list = SelectionList::new(Redraw::new());
        list.set_items(items.iter().map(|s| Item(*s)).collect());
        list
    }

    #[test]
    fn empty_list_current_is_not_found() {
        let list = list_of(&[]);
        assert!(matches!(list.current(), Err(Error::NotFound(_))));
        assert_eq!(list.cursor(), None);
    }

    #[test]
    fn set_items_resets_cursor_to_first() {
        let list = list_of(&["a", "b", "c"]);
        assert_eq!(list.cursor(), Some(0));
        assert_eq!(list.current().unwrap(), &Item("a"));
    }

    #[test]
    fn set_items_never_keeps_stale_cursor() {
        let mut list = list_of(&["a", "b", "c"]);
        list.move_down();
        list.move_down();
        list.set_items(vec![Item("x"), Item("y")]);
        assert_eq!(list.current().unwrap(), &Item("x"));
        list.set_items(Vec::new());
        assert!(list.current().is_err());
    }

    #[test]
    fn set_items_renders_columns() {
        let list = list_of(&["a"]);
        assert_eq!(list.rows()[0].columns, vec!["a".to_string()]);
    }

    #[test]
    fn replace_updates_value_and_columns_in_place() {
        let mut list = list_of(&["a", "b", "c"]);
        list.move_down();
        list.move_down();
        assert!(list.replace(|item| item.0 == "b", Item("B")));
        assert_eq!(list.rows()[1].value, Item("B"));
        assert_eq!(list.rows()[1].columns, vec!["B".to_string()]);
        assert_eq!(list.cursor(), Some(2));
        assert!(!list.replace(|item| item.0 == "z", Item("Z")));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn movement_is_clamped_without_wraparound() {
        let mut list = list_of(&["a", "b"]);
        assert!(!list.move_up());
        assert_eq!(list.cursor(), Some(0));
        assert!(list.move_down());
        assert!(!list.move_down());
        assert_eq!(list.cursor(), Some(1));
    }

    #[test]
    fn bare_movement_emits_nothing() {
        let mut list = list_of(&["a", "b", "c"]);
        assert_eq!(list.handle_key(key(KeyCode::Down)), Handled::Consumed);
        assert_eq!(list.handle_key(ctrl('n')), Handled::Consumed);
        assert_eq!(list.cursor(), Some(2));
        assert_eq!(list.handle_key(ctrl('p')), Handled::Consumed);
        assert_eq!(list.handle_key(key(KeyCode::Char('k'))), Handled::Consumed);
        assert_eq!(list.cursor(), Some(0));
    }

    #[test]
    fn enter_selects_current_value() {
        let mut list = list_of(&["a", "b"]);
        list.handle_key(key(KeyCode::Char('j')));
        assert_eq!(
            list.handle_key(key(KeyCode::Enter)),
            Handled::Emit(ListEvent::Selected(Item("b")))
        );
    }

    #[test]
    fn enter_on_empty_list_emits_nothing() {
        let mut list = list_of(&[]);
        assert_eq!(list.handle_key(key(KeyCode::Enter)), Handled::Consumed);
    }

    #[test]
    fn click_moves_cursor_and_selects() {
        let mut list = list_of(&["a", "b", "c"]);
        assert_eq!(list.click(2), Handled::Emit(ListEvent::Selected(Item("c"))));
        assert_eq!(list.cursor(), Some(2));
    }

    #[test]
    fn click_outside_rows_is_ignored() {
        let mut list = list_of(&["a"]);
        assert_eq!(list.click(5), Handled::Ignored);
        assert_eq!(list.cursor(), Some(0));
    }

    #[test]
    fn unrelated_keys_bubble() {
        let mut list = list_of(&["a"]);
        assert_eq!(list.handle_key(key(KeyCode::Char('n'))), Handled::Ignored);
        assert_eq!(list.handle_key(key(KeyCode::Char('q'))), Handled::Ignored);
    }

    #[test]
    fn setters_request_redraw() {
        let redraw = Redraw::new();
        let mut list: SelectionList<Item> = SelectionList::new(redraw.clone());
        list.set_items(vec![Item("a"), Item("b")]);
        assert!(redraw.take());
        list.move_down();
        assert!(redraw.take());
        list.move_down();
        assert!(!redraw.take());
    }
}
