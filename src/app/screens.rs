use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{
    ClickTarget, CommentThread, Handled, InputEvent, LineInput, ListEvent, PanelTarget, Redraw,
    Row, SelectionList, ThreadEvent,
};
use crate::config::Config;
use crate::editor::{split_issue, ExternalEditor, Suspend};
use crate::error::{Error, Result};
use crate::github::{Comment, Issue, Notification, Profile, RemoteHost, Repository};

const DESCRIPTION_WIDTH: usize = 32;

/// Everything a screen may touch while handling one input event.
pub struct Context<'a> {
    pub host: &'a dyn RemoteHost,
    pub editor: &'a ExternalEditor,
    pub terminal: &'a mut dyn Suspend,
    pub config: &'a Config,
    pub redraw: &'a Redraw,
}

/// Requests a screen hands to the app after handling input.
pub enum Transition {
    Push(Screen),
    OpenUrl(String),
    Notify(String),
}

pub enum Screen {
    Repositories(RepositoriesScreen),
    Profile(ProfileScreen),
    Notifications(NotificationsScreen),
    Repository(RepositoryScreen),
    Issue(IssueScreen),
}

impl Screen {
    pub fn title(&self) -> String {
        match self {
            Screen::Repositories(_) => "Repositories".into(),
            Screen::Profile(s) => s.profile.display_name().to_string(),
            Screen::Notifications(_) => "Notifications".into(),
            Screen::Repository(s) => s.repo.full_name.clone(),
            Screen::Issue(s) => s.issue.title.clone(),
        }
    }

    pub fn subtitle(&self) -> Option<String> {
        match self {
            Screen::Repositories(s) => s.last_query.as_ref().map(|q| format!("search: {q}")),
            Screen::Profile(s) => Some(s.profile.login.clone()),
            Screen::Notifications(s) => Some(format!("{} unread", s.unread_count())),
            Screen::Repository(s) => s.repo.description.clone(),
            Screen::Issue(s) => Some(format!("{}#{}", s.issue.repo_full_name(), s.issue.number)),
        }
    }

    /// Key hints for the footer, screen-specific bindings only
    pub fn hints(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Screen::Repositories(s) if s.focus == SearchFocus::Input => {
                &[("Enter", "search"), ("Tab/Esc", "results")]
            }
            Screen::Repositories(_) => &[
                ("j/k", "move"),
                ("Enter", "open"),
                ("/", "search"),
                ("g", "browser"),
            ],
            Screen::Profile(_) => &[("g", "browser")],
            Screen::Notifications(_) => &[("j/k", "move"), ("Enter", "open")],
            Screen::Repository(_) => &[
                ("j/k", "move"),
                ("Enter", "open"),
                ("c", "new issue"),
                ("g", "browser"),
            ],
            Screen::Issue(_) => &[
                ("j/k", "panel"),
                ("e", "edit"),
                ("c", "comment"),
                ("g", "browser"),
            ],
        }
    }

    /// True while a text input owns the keyboard, so global bindings
    /// must not fire.
    pub fn captures_text(&self) -> bool {
        matches!(self, Screen::Repositories(s) if s.focus == SearchFocus::Input)
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Result<Handled<Transition>> {
        match self {
            Screen::Repositories(s) => s.handle_key(key, ctx),
            Screen::Profile(s) => Ok(s.handle_key(key)),
            Screen::Notifications(s) => s.handle_key(key, ctx),
            Screen::Repository(s) => s.handle_key(key, ctx),
            Screen::Issue(s) => s.handle_key(key, ctx),
        }
    }

    pub fn handle_click(
        &mut self,
        target: ClickTarget,
        ctx: &mut Context,
    ) -> Result<Handled<Transition>> {
        match (self, target) {
            (Screen::Repositories(s), target) => s.handle_click(target, ctx),
            (Screen::Notifications(s), ClickTarget::Row(row)) => {
                let handled = s.list.click(row);
                open_selected(handled, |n| s.open_notification(&n, ctx))
            }
            (Screen::Repository(s), ClickTarget::Row(row)) => {
                let handled = s.issues.click(row);
                open_selected(handled, |issue| open_issue(issue, ctx))
            }
            (Screen::Issue(s), ClickTarget::Panel(index)) => Ok(s.select_panel(index)),
            _ => Ok(Handled::Ignored),
        }
    }
}

/// Turn a list selection into a pushed screen. Building the screen may
/// fail, in which case the stack is left alone.
fn open_selected<T>(
    handled: Handled<ListEvent<T>>,
    open: impl FnOnce(T) -> Result<Screen>,
) -> Result<Handled<Transition>> {
    match handled {
        Handled::Emit(ListEvent::Selected(value)) => Ok(Handled::Emit(Transition::Push(open(value)?))),
        Handled::Consumed => Ok(Handled::Consumed),
        Handled::Ignored => Ok(Handled::Ignored),
    }
}

fn open_issue(issue: Issue, ctx: &Context) -> Result<Screen> {
    IssueScreen::load(issue.repo_full_name(), issue.number, ctx).map(Screen::Issue)
}

fn is_plain(key: &KeyEvent, c: char) -> bool {
    key.code == KeyCode::Char(c) && !key.modifiers.contains(KeyModifiers::CONTROL)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

impl Row for Repository {
    fn headers() -> &'static [&'static str] {
        &["owner", "name", "description", "public", "stars"]
    }

    fn columns(&self) -> Vec<String> {
        vec![
            self.full_name.clone(),
            self.name.clone(),
            truncate(self.description.as_deref().unwrap_or(""), DESCRIPTION_WIDTH),
            (!self.private).to_string(),
            self.stargazers_count.to_string(),
        ]
    }
}

impl Row for Issue {
    fn headers() -> &'static [&'static str] {
        &["number", "title", "comments"]
    }

    fn columns(&self) -> Vec<String> {
        vec![
            format!("#{}", self.number),
            self.title.clone(),
            self.comments.to_string(),
        ]
    }
}

impl Row for Notification {
    fn headers() -> &'static [&'static str] {
        &["repository", "subject", "reason"]
    }

    fn columns(&self) -> Vec<String> {
        let marker = if self.unread { "● " } else { "  " };
        vec![
            format!("{marker}{}", self.repository.full_name),
            self.subject.title.clone(),
            self.reason.replace('_', " "),
        ]
    }
}

// ── Repositories ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    Input,
    Table,
}

/// Repository search: a query input above a results table.
pub struct RepositoriesScreen {
    pub input: LineInput,
    pub list: SelectionList<Repository>,
    pub focus: SearchFocus,
    pub last_query: Option<String>,
    /// Query to run the first time the screen is shown
    pending_query: Option<String>,
    redraw: Redraw,
}

impl RepositoriesScreen {
    pub fn new(redraw: Redraw, default_query: Option<String>) -> Self {
        Self {
            input: LineInput::new("Search repositories (e.g. language:rust stars:>500)", redraw.clone()),
            list: SelectionList::new(redraw.clone()),
            focus: SearchFocus::Input,
            last_query: None,
            pending_query: default_query.filter(|q| !q.trim().is_empty()),
            redraw,
        }
    }

    pub fn take_pending_query(&mut self) -> Option<String> {
        self.pending_query.take()
    }

    fn set_focus(&mut self, focus: SearchFocus) {
        if self.focus != focus {
            self.focus = focus;
            self.redraw.notify_changed();
        }
    }

    /// Run a search and replace the results. On failure the previous
    /// results stay.
    pub fn search(&mut self, query: &str, host: &dyn RemoteHost, config: &Config) -> Result<()> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::EmptyInput);
        }
        let repos = host.search_repositories(query, config.search.max_repositories)?;
        tracing::info!(query, count = repos.len(), "repository search");
        self.list.set_items(repos);
        if self.input.text() != query {
            self.input.set_text(query);
        }
        self.last_query = Some(query.to_string());
        self.set_focus(SearchFocus::Table);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Result<Handled<Transition>> {
        if self.focus == SearchFocus::Input {
            return match self.input.handle_key(key) {
                Handled::Emit(InputEvent::Submitted(query)) => {
                    self.search(&query, ctx.host, ctx.config)?;
                    Ok(Handled::Consumed)
                }
                Handled::Ignored => {
                    self.set_focus(SearchFocus::Table);
                    Ok(Handled::Consumed)
                }
                Handled::Consumed => Ok(Handled::Consumed),
            };
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('/') | KeyCode::Tab => {
                self.set_focus(SearchFocus::Input);
                return Ok(Handled::Consumed);
            }
            KeyCode::Char('s') if ctrl => {
                self.set_focus(SearchFocus::Input);
                return Ok(Handled::Consumed);
            }
            _ if is_plain(&key, 'g') => {
                let repo = self.list.current()?;
                return Ok(Handled::Emit(Transition::OpenUrl(repo.html_url.clone())));
            }
            _ => {}
        }

        let handled = self.list.handle_key(key);
        open_selected(handled, |repo| {
            RepositoryScreen::open(repo, ctx).map(Screen::Repository)
        })
    }

    fn handle_click(&mut self, target: ClickTarget, ctx: &mut Context) -> Result<Handled<Transition>> {
        match target {
            ClickTarget::Input => {
                self.set_focus(SearchFocus::Input);
                Ok(Handled::Consumed)
            }
            ClickTarget::Row(row) => {
                self.set_focus(SearchFocus::Table);
                let handled = self.list.click(row);
                open_selected(handled, |repo| {
                    RepositoryScreen::open(repo, ctx).map(Screen::Repository)
                })
            }
            ClickTarget::Panel(_) => Ok(Handled::Ignored),
        }
    }
}

// ── Repository ──

/// One repository: summary header plus its issues.
pub struct RepositoryScreen {
    pub repo: Repository,
    pub issues: SelectionList<Issue>,
    redraw: Redraw,
}

impl RepositoryScreen {
    pub fn open(repo: Repository, ctx: &Context) -> Result<Self> {
        let issues = ctx.host.get_issues(
            &repo,
            &ctx.config.issues.state,
            ctx.config.issues.max_issues,
        )?;
        tracing::debug!(repo = %repo.full_name, count = issues.len(), "loaded issues");
        let mut list = SelectionList::new(ctx.redraw.clone());
        list.set_items(issues);
        Ok(Self {
            repo,
            issues: list,
            redraw: ctx.redraw.clone(),
        })
    }

    /// Compose an issue in the editor: first line is the title, the rest
    /// the body. Returns the new issue's screen.
    pub fn create_issue(&mut self, ctx: &mut Context) -> Result<Screen> {
        let text = ctx
            .editor
            .create_text(&mut *ctx.terminal)?
            .ok_or(Error::EmptyInput)?;
        let (title, body) = split_issue(&text).ok_or(Error::EmptyInput)?;
        let issue = ctx.host.create_issue(&self.repo, &title, &body)?;
        tracing::info!(repo = %self.repo.full_name, number = issue.number, "created issue");

        let issues = std::iter::once(issue.clone())
            .chain(self.issues.rows().iter().map(|row| row.value.clone()))
            .collect();
        self.issues.set_items(issues);
        self.repo.open_issues_count += 1;
        self.redraw.notify_changed();

        Ok(Screen::Issue(IssueScreen::new(issue, &[], ctx.redraw.clone())))
    }

    /// Take back an issue changed on a detail screen so the table matches
    /// what GitHub holds.
    pub fn sync_issue(&mut self, issue: &Issue) {
        self.issues.replace(|row| row.number == issue.number, issue.clone());
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Result<Handled<Transition>> {
        if is_plain(&key, 'c') {
            return Ok(Handled::Emit(Transition::Push(self.create_issue(ctx)?)));
        }
        if is_plain(&key, 'g') {
            return Ok(Handled::Emit(Transition::OpenUrl(self.repo.html_url.clone())));
        }
        let handled = self.issues.handle_key(key);
        open_selected(handled, |issue| open_issue(issue, ctx))
    }
}

// ── Issue ──

/// An issue and its comment thread.
pub struct IssueScreen {
    pub issue: Issue,
    pub thread: CommentThread,
}

impl IssueScreen {
    pub fn new(issue: Issue, comments: &[Comment], redraw: Redraw) -> Self {
        let thread = CommentThread::new(&issue, comments, redraw);
        Self { issue, thread }
    }

    /// Fetch the issue and its comments. Always goes to the host so edits
    /// made on an earlier visit show up.
    pub fn load(repo_full_name: &str, number: u64, ctx: &Context) -> Result<Self> {
        let issue = ctx.host.get_issue(repo_full_name, number)?;
        let comments = ctx.host.get_comments(&issue)?;
        tracing::debug!(number = issue.number, count = comments.len(), "loaded comments");
        Ok(Self::new(issue, &comments, ctx.redraw.clone()))
    }

    fn select_panel(&mut self, index: usize) -> Handled<Transition> {
        match self.thread.request_select(index) {
            Handled::Ignored => Handled::Ignored,
            Handled::Consumed | Handled::Emit(ThreadEvent::Activated(_)) => Handled::Consumed,
        }
    }

    /// Edit the active panel in the editor and push the result to GitHub.
    /// The panel only changes once the update succeeded.
    pub fn edit_active(&mut self, ctx: &mut Context) -> Result<Option<String>> {
        let index = self.thread.active_index();
        let panel = self.thread.active_panel().clone();
        if !panel.editable {
            return Ok(Some("This panel cannot be edited".into()));
        }
        let edited = ctx.editor.edit_text(&mut *ctx.terminal, &panel.body)?;
        if edited == panel.body.trim_end() {
            return Ok(Some("No changes".into()));
        }
        // An issue body may be cleared; GitHub rejects blank comments
        if edited.is_empty() && panel.target != PanelTarget::IssueBody {
            return Err(Error::EmptyInput);
        }

        match panel.target {
            PanelTarget::IssueBody => {
                ctx.host.edit_issue_body(&self.issue, &edited)?;
                self.issue.body = Some(edited.clone());
            }
            PanelTarget::Comment(id) => ctx.host.edit_comment(&self.issue, id, &edited)?,
        }
        tracing::info!(number = self.issue.number, panel = index, "edited");
        self.thread.set_body(index, edited);
        Ok(Some("Saved".into()))
    }

    /// Compose a reply and append it once GitHub accepted it.
    pub fn add_comment(&mut self, ctx: &mut Context) -> Result<()> {
        let body = ctx
            .editor
            .create_text(&mut *ctx.terminal)?
            .ok_or(Error::EmptyInput)?;
        let comment = ctx.host.create_comment(&self.issue, &body)?;
        tracing::info!(number = self.issue.number, id = comment.id, "commented");
        self.thread.append_comment(&comment);
        self.issue.comments += 1;
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Result<Handled<Transition>> {
        match self.thread.handle_key(key) {
            Handled::Ignored => {}
            _ => return Ok(Handled::Consumed),
        }
        if is_plain(&key, 'e') {
            return Ok(match self.edit_active(ctx)? {
                Some(message) => Handled::Emit(Transition::Notify(message)),
                None => Handled::Consumed,
            });
        }
        if is_plain(&key, 'c') {
            self.add_comment(ctx)?;
            return Ok(Handled::Emit(Transition::Notify("Comment added".into())));
        }
        if is_plain(&key, 'g') {
            let url = self.thread.active_panel().html_url.clone();
            let url = if url.is_empty() { self.issue.html_url.clone() } else { url };
            return Ok(Handled::Emit(Transition::OpenUrl(url)));
        }
        Ok(Handled::Ignored)
    }
}

// ── Profile ──

pub struct ProfileScreen {
    pub profile: Profile,
}

impl ProfileScreen {
    pub fn new(profile: Profile) -> Self {
        Self { profile }
    }

    pub fn open(host: &dyn RemoteHost) -> Result<Self> {
        Ok(Self::new(host.get_user()?))
    }

    fn handle_key(&mut self, key: KeyEvent) -> Handled<Transition> {
        if is_plain(&key, 'g') && !self.profile.html_url.is_empty() {
            return Handled::Emit(Transition::OpenUrl(self.profile.html_url.clone()));
        }
        Handled::Ignored
    }
}

// ── Notifications ──

pub struct NotificationsScreen {
    pub list: SelectionList<Notification>,
}

impl NotificationsScreen {
    pub fn open(host: &dyn RemoteHost, redraw: Redraw) -> Result<Self> {
        let notifications = host.get_notifications()?;
        let mut list = SelectionList::new(redraw);
        list.set_items(notifications);
        Ok(Self { list })
    }

    pub fn unread_count(&self) -> usize {
        self.list.rows().iter().filter(|row| row.value.unread).count()
    }

    /// Resolve a notification to its issue. Other subject kinds (releases,
    /// discussions, ...) have no issue to show.
    fn open_notification(&self, notification: &Notification, ctx: &Context) -> Result<Screen> {
        let number = notification.issue_number().ok_or_else(|| {
            Error::NotFound(format!(
                "{} ({}) is not an issue",
                notification.subject.title, notification.subject.kind
            ))
        })?;
        IssueScreen::load(&notification.repository.full_name, number, ctx).map(Screen::Issue)
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Result<Handled<Transition>> {
        let handled = self.list.handle_key(key);
        open_selected(handled, |n| self.open_notification(&n, ctx))
    }
}
