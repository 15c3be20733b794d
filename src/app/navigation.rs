use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Screen;
use crate::error::Result;

/// Screens reachable from anywhere with a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopLevel {
    #[default]
    Repositories,
    Profile,
    Notifications,
}

impl TopLevel {
    pub const ALL: [TopLevel; 3] = [
        TopLevel::Repositories,
        TopLevel::Profile,
        TopLevel::Notifications,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TopLevel::Repositories => "Repositories",
            TopLevel::Profile => "Profile",
            TopLevel::Notifications => "Notifications",
        }
    }

    pub fn key(&self) -> char {
        match self {
            TopLevel::Repositories => 'r',
            TopLevel::Profile => 'p',
            TopLevel::Notifications => 'n',
        }
    }

    pub fn from_key(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == c)
    }
}

/// A top-level screen with detail screens stacked on top of it. Top-level
/// screens are built on first visit and then kept alive, so switching back
/// restores their cursor and contents. Only the top screen takes input.
pub struct NavigationStack {
    current: TopLevel,
    root: Screen,
    parked: HashMap<TopLevel, Screen>,
    details: Vec<Screen>,
}

impl NavigationStack {
    pub fn new(current: TopLevel, root: Screen) -> Self {
        Self {
            current,
            root,
            parked: HashMap::new(),
            details: Vec::new(),
        }
    }

    pub fn current(&self) -> TopLevel {
        self.current
    }

    /// Number of screens above the top-level one
    pub fn depth(&self) -> usize {
        self.details.len()
    }

    pub fn top(&self) -> &Screen {
        self.details.last().unwrap_or(&self.root)
    }

    pub fn top_mut(&mut self) -> &mut Screen {
        self.details.last_mut().unwrap_or(&mut self.root)
    }

    /// Every screen from the top-level one up, bottom first
    pub fn frames(&self) -> impl Iterator<Item = &Screen> {
        std::iter::once(&self.root).chain(self.details.iter())
    }

    pub fn push(&mut self, screen: Screen) {
        tracing::debug!(screen = %screen.title(), depth = self.details.len() + 1, "push");
        self.details.push(screen);
    }

    /// Drop the top detail screen. The top-level screen is never popped.
    pub fn pop(&mut self) -> Option<Screen> {
        let popped = self.details.pop();
        if let Some(screen) = &popped {
            tracing::debug!(screen = %screen.title(), "pop");
        }
        popped
    }

    /// Show `which`, discarding detail screens. `build` runs only on the
    /// first visit; if it fails nothing changes.
    pub fn switch_to(
        &mut self,
        which: TopLevel,
        build: impl FnOnce() -> Result<Screen>,
    ) -> Result<()> {
        if which != self.current {
            let next = match self.parked.remove(&which) {
                Some(screen) => screen,
                None => build()?,
            };
            let previous = std::mem::replace(&mut self.root, next);
            self.parked.insert(self.current, previous);
            self.current = which;
        }
        self.details.clear();
        tracing::debug!(screen = which.label(), "switch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ProfileScreen;
    use crate::error::Error;
    use crate::github::Profile;

    fn profile_screen(login: &str) -> Screen {
        let profile = Profile {
            login: login.to_string(),
            name: None,
            company: None,
            email: None,
            bio: None,
            public_repos: 0,
            followers: 0,
            following: 0,
            html_url: String::new(),
        };
        Screen::Profile(ProfileScreen::new(profile))
    }

    fn title(nav: &NavigationStack) -> String {
        nav.top().title()
    }

    #[test]
    fn top_level_key_bindings() {
        assert_eq!(TopLevel::from_key('r'), Some(TopLevel::Repositories));
        assert_eq!(TopLevel::from_key('p'), Some(TopLevel::Profile));
        assert_eq!(TopLevel::from_key('n'), Some(TopLevel::Notifications));
        assert_eq!(TopLevel::from_key('x'), None);
    }

    #[test]
    fn push_pop_never_removes_root() {
        let mut nav = NavigationStack::new(TopLevel::Profile, profile_screen("root"));
        nav.push(profile_screen("detail"));
        assert_eq!(nav.depth(), 1);
        assert_eq!(title(&nav), "detail");
        assert!(nav.pop().is_some());
        assert!(nav.pop().is_none());
        assert_eq!(title(&nav), "root");
    }

    #[test]
    fn switch_builds_once_and_keeps_state() {
        let mut nav = NavigationStack::new(TopLevel::Profile, profile_screen("me"));
        nav.switch_to(TopLevel::Notifications, || Ok(profile_screen("inbox")))
            .unwrap();
        assert_eq!(title(&nav), "inbox");
        nav.switch_to(TopLevel::Profile, || panic!("profile already built"))
            .unwrap();
        assert_eq!(title(&nav), "me");
        nav.switch_to(TopLevel::Notifications, || panic!("inbox already built"))
            .unwrap();
        assert_eq!(title(&nav), "inbox");
    }

    #[test]
    fn switch_clears_detail_screens() {
        let mut nav = NavigationStack::new(TopLevel::Profile, profile_screen("me"));
        nav.push(profile_screen("a"));
        nav.push(profile_screen("b"));
        nav.switch_to(TopLevel::Profile, || unreachable!()).unwrap();
        assert_eq!(nav.depth(), 0);
        assert_eq!(title(&nav), "me");
    }

    #[test]
    fn failed_build_leaves_stack_untouched() {
        let mut nav = NavigationStack::new(TopLevel::Profile, profile_screen("me"));
        nav.push(profile_screen("detail"));
        let result = nav.switch_to(TopLevel::Notifications, || {
            Err(Error::Network("offline".into()))
        });
        assert!(matches!(result, Err(Error::Network(_))));
        assert_eq!(nav.current(), TopLevel::Profile);
        assert_eq!(nav.depth(), 1);
        assert_eq!(title(&nav), "detail");
    }
}
