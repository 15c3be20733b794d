use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{Handled, Redraw};
use crate::github::{Comment, Issue};

/// What a panel's text belongs to on GitHub
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTarget {
    IssueBody,
    Comment(u64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentPanel {
    pub target: PanelTarget,
    pub author: String,
    pub created_at: String,
    pub body: String,
    pub html_url: String,
    pub editable: bool,
    pub active: bool,
}

impl CommentPanel {
    pub fn from_issue(issue: &Issue) -> Self {
        Self {
            target: PanelTarget::IssueBody,
            author: issue.user.login.clone(),
            created_at: issue.created_at.clone(),
            body: issue.body.clone().unwrap_or_default(),
            html_url: issue.html_url.clone(),
            editable: true,
            active: false,
        }
    }

    pub fn from_comment(comment: &Comment) -> Self {
        Self {
            target: PanelTarget::Comment(comment.id),
            author: comment.user.login.clone(),
            created_at: comment.created_at.clone(),
            body: comment.body.clone().unwrap_or_default(),
            html_url: comment.html_url.clone(),
            editable: true,
            active: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadEvent {
    /// The active panel moved to this index
    Activated(usize),
}

/// Issue body plus replies, exactly one panel active.
#[derive(Debug)]
pub struct CommentThread {
    panels: Vec<CommentPanel>,
    active: usize,
    redraw: Redraw,
}

impl CommentThread {
    /// Panel 0 is the issue body, followed by the replies in order.
    pub fn new(issue: &Issue, comments: &[Comment], redraw: Redraw) -> Self {
        let mut panels = Vec::with_capacity(comments.len() + 1);
        panels.push(CommentPanel::from_issue(issue));
        panels.extend(comments.iter().map(CommentPanel::from_comment));
        panels[0].active = true;
        Self {
            panels,
            active: 0,
            redraw,
        }
    }

    pub fn panels(&self) -> &[CommentPanel] {
        &self.panels
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_panel(&self) -> &CommentPanel {
        &self.panels[self.active]
    }

    pub fn step_next(&mut self) -> bool {
        self.activate(self.active.saturating_add(1))
    }

    pub fn step_previous(&mut self) -> bool {
        self.activate(self.active.saturating_sub(1))
    }

    /// Deactivate the old panel and activate `index` (clamped) in one step
    fn activate(&mut self, index: usize) -> bool {
        let index = index.min(self.panels.len() - 1);
        if index == self.active {
            return false;
        }
        self.panels[self.active].active = false;
        self.panels[index].active = true;
        self.active = index;
        self.redraw.notify_changed();
        tracing::debug!(index, "active panel");
        true
    }

    /// Selection request from a panel (click or Enter). Only editable,
    /// non-active panels can take over.
    pub fn request_select(&mut self, index: usize) -> Handled<ThreadEvent> {
        match self.panels.get(index) {
            Some(panel) if panel.editable && !panel.active => {
                self.activate(index);
                Handled::Emit(ThreadEvent::Activated(index))
            }
            Some(_) => Handled::Consumed,
            None => Handled::Ignored,
        }
    }

    /// New replies land at the end; the active panel stays where it is.
    pub fn append_comment(&mut self, comment: &Comment) {
        self.panels.push(CommentPanel::from_comment(comment));
        self.redraw.notify_changed();
    }

    pub fn set_body(&mut self, index: usize, body: String) {
        if let Some(panel) = self.panels.get_mut(index) {
            panel.body = body;
            self.redraw.notify_changed();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Handled<ThreadEvent> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let moved = match key.code {
            KeyCode::Down | KeyCode::Char('j') if !ctrl => self.step_next(),
            KeyCode::Up | KeyCode::Char('k') if !ctrl => self.step_previous(),
            KeyCode::Char('n') if ctrl => self.step_next(),
            KeyCode::Char('p') if ctrl => self.step_previous(),
            KeyCode::Enter => return self.request_select(self.active),
            _ => return Handled::Ignored,
        };
        if moved {
            Handled::Emit(ThreadEvent::Activated(self.active))
        } else {
            Handled::Consumed
        }
    }
}
