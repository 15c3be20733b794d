use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{
    ClickTarget, Context, Handled, NavigationStack, NotificationsScreen, ProfileScreen, Redraw,
    RepositoriesScreen, Screen, TopLevel, Transition,
};
use crate::browser;
use crate::config::Config;
use crate::editor::{ExternalEditor, Suspend};
use crate::error::{Error, Result};
use crate::github::RemoteHost;

/// Ticks a status message stays visible (one tick ≈ 100ms)
const NOTICE_TICKS: u8 = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

pub struct App {
    /// Top-level screen plus any detail screens opened from it
    pub nav: NavigationStack,

    pub config: Config,

    /// Shared by every screen; at most one session at a time
    pub editor: ExternalEditor,

    pub redraw: Redraw,

    /// Status line message (auto-clears)
    pub notice: Option<Notice>,

    notice_ticks: u8,

    pub should_quit: bool,
}

impl App {
    /// Build the app and show the configured start screen. A start screen
    /// that fails to load falls back to repository search.
    pub fn new(config: Config, host: &dyn RemoteHost) -> Self {
        let redraw = Redraw::new();
        let editor = ExternalEditor::new(config.resolve_editor());
        if editor.command().is_none() {
            tracing::warn!("no editor configured; editing is disabled");
        }
        let search = RepositoriesScreen::new(redraw.clone(), config.search.default_query.clone());
        let mut app = App {
            nav: NavigationStack::new(TopLevel::Repositories, Screen::Repositories(search)),
            config,
            editor,
            redraw,
            notice: None,
            notice_ticks: 0,
            should_quit: false,
        };

        let start = app.config.ui.start_screen;
        if start != TopLevel::Repositories {
            app.switch_to(start, host);
        }
        app.run_pending_query(host);
        app.redraw.notify_changed();
        app
    }

    // ── Status line ──

    pub fn notify(&mut self, msg: &str) {
        self.set_notice(msg, false);
    }

    pub fn notify_error(&mut self, msg: &str) {
        self.set_notice(msg, true);
    }

    fn set_notice(&mut self, msg: &str, is_error: bool) {
        self.notice = Some(Notice {
            text: msg.to_string(),
            is_error,
        });
        self.notice_ticks = 0;
        self.redraw.notify_changed();
    }

    /// Surface a failed action. Cancellations are silent.
    pub fn report(&mut self, err: Error) {
        if err.is_cancellation() {
            tracing::debug!("action cancelled");
            return;
        }
        tracing::warn!(error = %err, "action failed");
        self.notify_error(&err.to_string());
    }

    /// Called once per event loop iteration; expires the status notice
    pub fn tick(&mut self) {
        if self.notice.is_some() {
            self.notice_ticks += 1;
            if self.notice_ticks > NOTICE_TICKS {
                self.notice = None;
                self.notice_ticks = 0;
                self.redraw.notify_changed();
            }
        }
    }

    // ── Navigation ──

    /// Show a top-level screen, building it on first visit.
    pub fn switch_to(&mut self, which: TopLevel, host: &dyn RemoteHost) {
        let config = &self.config;
        let redraw = &self.redraw;
        let result = self.nav.switch_to(which, || match which {
            TopLevel::Repositories => Ok(Screen::Repositories(RepositoriesScreen::new(
                redraw.clone(),
                config.search.default_query.clone(),
            ))),
            TopLevel::Profile => Ok(Screen::Profile(ProfileScreen::open(host)?)),
            TopLevel::Notifications => Ok(Screen::Notifications(NotificationsScreen::open(
                host,
                redraw.clone(),
            )?)),
        });
        match result {
            Ok(()) => {
                self.redraw.notify_changed();
                self.run_pending_query(host);
            }
            Err(e) => self.report(e),
        }
    }

    pub fn pop(&mut self) {
        let Some(popped) = self.nav.pop() else {
            return;
        };
        if let (Screen::Issue(closed), Screen::Repository(owner)) = (&popped, self.nav.top_mut()) {
            owner.sync_issue(&closed.issue);
        }
        self.redraw.notify_changed();
    }

    fn run_pending_query(&mut self, host: &dyn RemoteHost) {
        let Screen::Repositories(screen) = self.nav.top_mut() else {
            return;
        };
        let Some(query) = screen.take_pending_query() else {
            return;
        };
        let result = screen.search(&query, host, &self.config);
        if let Err(e) = result {
            self.report(e);
        }
    }

    // ── Input ──

    pub fn handle_key(&mut self, key: KeyEvent, host: &dyn RemoteHost, terminal: &mut dyn Suspend) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let captured = self.nav.top().captures_text();
        let result = {
            let mut ctx = Context {
                host,
                editor: &self.editor,
                terminal,
                config: &self.config,
                redraw: &self.redraw,
            };
            self.nav.top_mut().handle_key(key, &mut ctx)
        };
        if !self.apply(result) && !captured {
            self.handle_global_key(key, host);
        }
    }

    pub fn handle_click(
        &mut self,
        target: ClickTarget,
        host: &dyn RemoteHost,
        terminal: &mut dyn Suspend,
    ) {
        let result = {
            let mut ctx = Context {
                host,
                editor: &self.editor,
                terminal,
                config: &self.config,
                redraw: &self.redraw,
            };
            self.nav.top_mut().handle_click(target, &mut ctx)
        };
        self.apply(result);
    }

    /// Bindings that work on every screen once the screen ignored the key
    fn handle_global_key(&mut self, key: KeyEvent, host: &dyn RemoteHost) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => self.pop(),
            KeyCode::Char(c) => {
                if let Some(which) = TopLevel::from_key(c) {
                    self.switch_to(which, host);
                }
            }
            _ => {}
        }
    }

    /// Act on a screen's answer. Returns false when the key was ignored.
    fn apply(&mut self, result: Result<Handled<Transition>>) -> bool {
        match result {
            Ok(Handled::Ignored) => false,
            Ok(Handled::Consumed) => true,
            Ok(Handled::Emit(transition)) => {
                self.transition(transition);
                true
            }
            Err(e) => {
                self.report(e);
                true
            }
        }
    }

    fn transition(&mut self, transition: Transition) {
        match transition {
            Transition::Push(screen) => {
                self.nav.push(screen);
                self.redraw.notify_changed();
            }
            Transition::OpenUrl(url) => match browser::open_url(&url) {
                Ok(()) => self.notify(&format!("Opened {url}")),
                Err(e) => self.report(e),
            },
            Transition::Notify(msg) => self.notify(&msg),
        }
    }
}
