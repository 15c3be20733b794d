mod input;
mod navigation;
mod redraw;
mod screens;
mod selection;
mod state;
mod thread;

pub use input::{InputEvent, LineInput};
pub use navigation::{NavigationStack, TopLevel};
pub use redraw::Redraw;
pub use screens::{
    Context, IssueScreen, NotificationsScreen, ProfileScreen, RepositoriesScreen,
    RepositoryScreen, Screen, SearchFocus, Transition,
};
pub use selection::{ListEvent, Row, SelectionList};
pub use state::{App, Notice};
pub use thread::{CommentPanel, CommentThread, PanelTarget, ThreadEvent};

/// Outcome of offering an input event to a component. `Ignored` events
/// bubble to the owner; `Emit` carries a typed message up one level.
#[derive(Debug, Clone, PartialEq)]
pub enum Handled<E> {
    Ignored,
    Consumed,
    Emit(E),
}

/// What a pointer click landed on, resolved from the last rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Input,
    Row(usize),
    Panel(usize),
}
