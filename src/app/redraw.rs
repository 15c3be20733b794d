use std::cell::Cell;
use std::rc::Rc;

/// Shared "something changed" flag. Components call `notify_changed()` from
/// every state setter; the event loop redraws when `take()` reports a change.
#[derive(Debug, Clone, Default)]
pub struct Redraw(Rc<Cell<bool>>);

impl Redraw {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify_changed(&self) {
        self.0.set(true);
    }

    /// Consume the pending change, if any
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_flag() {
        let a = Redraw::new();
        let b = a.clone();
        b.notify_changed();
        assert!(a.take());
        assert!(!b.take());
    }
}
