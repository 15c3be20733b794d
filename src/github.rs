use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::process::{Command, Output};

const API_PREFIX: &str = "https://api.github.com/repos/";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub login: String,
    #[serde(default)]
    pub html_url: String,
}

/// Repository as returned by `search/repositories`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Repository {
    pub full_name: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub user: User,
    #[serde(default)]
    pub created_at: String,
    /// Reply count
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub html_url: String,
    /// `https://api.github.com/repos/{owner}/{repo}`
    pub repository_url: String,
    #[serde(default)]
    pub state: String,
}

impl Issue {
    /// `owner/repo` derived from the API repository URL
    pub fn repo_full_name(&self) -> &str {
        self.repository_url
            .strip_prefix(API_PREFIX)
            .unwrap_or(&self.repository_url)
    }
}

/// Issue comment (`repos/{o}/{r}/issues/{n}/comments`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub body: Option<String>,
    pub user: User,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub html_url: String,
}

/// Authenticated user (`user`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Profile {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub html_url: String,
}

impl Profile {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(&self.login)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NotificationSubject {
    pub title: String,
    /// API URL of the subject; absent for some subject kinds
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NotificationRepository {
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub unread: bool,
    pub subject: NotificationSubject,
    pub repository: NotificationRepository,
}

impl Notification {
    /// Issue number of the subject, for issue and pull request notifications.
    /// Pull requests are issues as far as the issues API is concerned.
    pub fn issue_number(&self) -> Option<u64> {
        if self.subject.kind != "Issue" && self.subject.kind != "PullRequest" {
            return None;
        }
        self.subject
            .url
            .as_deref()?
            .rsplit('/')
            .next()?
            .parse()
            .ok()
    }
}

/// The handful of GitHub operations the UI needs. All calls block.
pub trait RemoteHost {
    fn search_repositories(&self, query: &str, limit: usize) -> Result<Vec<Repository>>;
    fn get_user(&self) -> Result<Profile>;
    fn get_notifications(&self) -> Result<Vec<Notification>>;
    fn get_issues(&self, repo: &Repository, state: &str, limit: usize) -> Result<Vec<Issue>>;
    fn get_issue(&self, repo_full_name: &str, number: u64) -> Result<Issue>;
    fn create_issue(&self, repo: &Repository, title: &str, body: &str) -> Result<Issue>;
    fn get_comments(&self, issue: &Issue) -> Result<Vec<Comment>>;
    fn create_comment(&self, issue: &Issue, body: &str) -> Result<Comment>;
    fn edit_comment(&self, issue: &Issue, comment_id: u64, body: &str) -> Result<()>;
    fn edit_issue_body(&self, issue: &Issue, body: &str) -> Result<()>;
}

/// `RemoteHost` backed by `gh api`. Authentication is whatever `gh` is
/// configured with (`gh auth login`, `GH_TOKEN`).
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
}

impl Default for GhCli {
    fn default() -> Self {
        Self {
            program: "gh".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse<T> {
    items: Vec<T>,
}

impl GhCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that `gh` is installed and authenticated
    pub fn ensure_ready(&self) -> Result<()> {
        let output = Command::new(&self.program)
            .arg("--version")
            .output()
            .map_err(|_| {
                Error::Configuration(
                    "GitHub CLI (gh) is not installed. Install it: https://cli.github.com".into(),
                )
            })?;

        if !output.status.success() {
            return Err(Error::Configuration(
                "GitHub CLI (gh) is not working properly".into(),
            ));
        }

        let auth = Command::new(&self.program).args(["auth", "status"]).output()?;
        if !auth.status.success() {
            return Err(Error::Configuration(
                "GitHub CLI is not authenticated. Run: gh auth login".into(),
            ));
        }

        Ok(())
    }

    fn api(&self, args: &[&str]) -> Result<String> {
        tracing::debug!(?args, "gh api");
        let output = Command::new(&self.program)
            .arg("api")
            .args(args)
            .output()
            .map_err(|e| Error::Configuration(format!("failed to run gh: {e}")))?;
        check_output(output)
    }

    fn api_json<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T> {
        let stdout = self.api(args)?;
        Ok(serde_json::from_str(&stdout)?)
    }
}

impl RemoteHost for GhCli {
    fn search_repositories(&self, query: &str, limit: usize) -> Result<Vec<Repository>> {
        let per_page = limit.clamp(1, 100).to_string();
        let resp: SearchResponse<Repository> = self.api_json(&[
            "-X",
            "GET",
            "search/repositories",
            "-f",
            &format!("q={query}"),
            "-f",
            &format!("per_page={per_page}"),
        ])?;
        let mut items = resp.items;
        items.truncate(limit);
        Ok(items)
    }

    fn get_user(&self) -> Result<Profile> {
        self.api_json(&["user"])
    }

    fn get_notifications(&self) -> Result<Vec<Notification>> {
        self.api_json(&["notifications"])
    }

    fn get_issues(&self, repo: &Repository, state: &str, limit: usize) -> Result<Vec<Issue>> {
        let per_page = limit.clamp(1, 100).to_string();
        let mut issues: Vec<Issue> = self.api_json(&[
            "-X",
            "GET",
            &format!("repos/{}/issues", repo.full_name),
            "-f",
            &format!("state={state}"),
            "-f",
            &format!("per_page={per_page}"),
        ])?;
        issues.truncate(limit);
        Ok(issues)
    }

    fn get_issue(&self, repo_full_name: &str, number: u64) -> Result<Issue> {
        self.api_json(&[&format!("repos/{repo_full_name}/issues/{number}")])
    }

    fn create_issue(&self, repo: &Repository, title: &str, body: &str) -> Result<Issue> {
        self.api_json(&[
            "-X",
            "POST",
            &format!("repos/{}/issues", repo.full_name),
            "-f",
            &format!("title={title}"),
            "-f",
            &format!("body={body}"),
        ])
    }

    fn get_comments(&self, issue: &Issue) -> Result<Vec<Comment>> {
        let stdout = self.api(&[
            &format!(
                "repos/{}/issues/{}/comments",
                issue.repo_full_name(),
                issue.number
            ),
            "--paginate",
        ])?;
        parse_paginated(&stdout)
    }

    fn create_comment(&self, issue: &Issue, body: &str) -> Result<Comment> {
        self.api_json(&[
            "-X",
            "POST",
            &format!(
                "repos/{}/issues/{}/comments",
                issue.repo_full_name(),
                issue.number
            ),
            "-f",
            &format!("body={body}"),
        ])
    }

    fn edit_comment(&self, issue: &Issue, comment_id: u64, body: &str) -> Result<()> {
        self.api(&[
            "-X",
            "PATCH",
            &format!(
                "repos/{}/issues/comments/{}",
                issue.repo_full_name(),
                comment_id
            ),
            "-f",
            &format!("body={body}"),
        ])?;
        Ok(())
    }

    fn edit_issue_body(&self, issue: &Issue, body: &str) -> Result<()> {
        self.api(&[
            "-X",
            "PATCH",
            &format!("repos/{}/issues/{}", issue.repo_full_name(), issue.number),
            "-f",
            &format!("body={body}"),
        ])?;
        Ok(())
    }
}

fn check_output(output: Output) -> Result<String> {
    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(classify_failure(stderr.trim()))
}

/// Map `gh api` stderr to a network or API error.
/// gh reports API failures as `gh: <message> (HTTP <status>)`.
fn classify_failure(stderr: &str) -> Error {
    if let Some(status) = http_status(stderr) {
        let message = stderr
            .strip_prefix("gh: ")
            .unwrap_or(stderr)
            .split(" (HTTP")
            .next()
            .unwrap_or(stderr)
            .trim();
        return Error::host_api(Some(status), message);
    }

    let lower = stderr.to_lowercase();
    let network_markers = [
        "error connecting",
        "dial tcp",
        "no such host",
        "connection refused",
        "timeout",
        "tls",
    ];
    if network_markers.iter().any(|m| lower.contains(m)) {
        Error::Network(stderr.to_string())
    } else {
        Error::host_api(None, stderr)
    }
}

fn http_status(stderr: &str) -> Option<u16> {
    let idx = stderr.find("HTTP ")?;
    let digits: String = stderr[idx + 5..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// `gh api --paginate` concatenates JSON arrays: `[...][...]`.
/// Parse each top-level array separately and merge.
fn parse_paginated<T: DeserializeOwned>(stdout: &str) -> Result<Vec<T>> {
    if !stdout.contains("][") {
        return Ok(serde_json::from_str(stdout)?);
    }

    let mut results = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut in_string = false;
    let mut escaped = false;
    for (i, ch) in stdout.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            ']' => {
                depth -= 1;
                if depth == 0 {
                    let mut batch: Vec<T> = serde_json::from_str(&stdout[start..=i])?;
                    results.append(&mut batch);
                }
            }
            _ => {}
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue_json(number: u64) -> String {
        format!(
            r#"{{"number": {number}, "title": "Bug {number}", "body": "details",
                "user": {{"login": "octocat"}}, "created_at": "2024-01-02T03:04:05Z",
                "comments": 2, "html_url": "https://github.com/o/r/issues/{number}",
                "repository_url": "https://api.github.com/repos/o/r", "state": "open"}}"#
        )
    }

    #[test]
    fn issue_repo_full_name_from_repository_url() {
        let issue: Issue = serde_json::from_str(&issue_json(7)).unwrap();
        assert_eq!(issue.repo_full_name(), "o/r");
        assert_eq!(issue.number, 7);
        assert_eq!(issue.user.login, "octocat");
    }

    #[test]
    fn repository_parses_with_missing_optional_fields() {
        let json = r#"{"full_name": "o/r", "name": "r"}"#;
        let repo: Repository = serde_json::from_str(json).unwrap();
        assert_eq!(repo.full_name, "o/r");
        assert!(repo.description.is_none());
        assert!(repo.topics.is_empty());
        assert!(!repo.private);
    }

    #[test]
    fn search_response_items_parsed() {
        let json = r#"{"total_count": 2, "items": [
            {"full_name": "a/one", "name": "one", "stargazers_count": 5},
            {"full_name": "b/two", "name": "two", "private": true}
        ]}"#;
        let resp: SearchResponse<Repository> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.items.len(), 2);
        assert_eq!(resp.items[0].stargazers_count, 5);
        assert!(resp.items[1].private);
    }

    #[test]
    fn notification_issue_number_from_subject_url() {
        let json = r#"{"id": "1", "reason": "mention", "unread": true,
            "subject": {"title": "Crash", "url": "https://api.github.com/repos/o/r/issues/42", "type": "Issue"},
            "repository": {"full_name": "o/r"}}"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.issue_number(), Some(42));
    }

    #[test]
    fn notification_for_release_has_no_issue() {
        let json = r#"{"id": "2", "reason": "subscribed",
            "subject": {"title": "v1.0", "url": "https://api.github.com/repos/o/r/releases/9", "type": "Release"},
            "repository": {"full_name": "o/r"}}"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.issue_number(), None);
    }

    #[test]
    fn profile_display_name_falls_back_to_login() {
        let p: Profile = serde_json::from_str(r#"{"login": "octocat", "name": null}"#).unwrap();
        assert_eq!(p.display_name(), "octocat");
        let p: Profile = serde_json::from_str(r#"{"login": "octocat", "name": "Mona"}"#).unwrap();
        assert_eq!(p.display_name(), "Mona");
    }

    #[test]
    fn paginated_single_array() {
        let users: Vec<User> = parse_paginated(r#"[{"login": "a"}, {"login": "b"}]"#).unwrap();
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn paginated_concatenated_arrays_merged() {
        let out = r#"[{"login": "a"}][{"login": "b"},{"login": "c"}]"#;
        let users: Vec<User> = parse_paginated(out).unwrap();
        let logins: Vec<&str> = users.iter().map(|u| u.login.as_str()).collect();
        assert_eq!(logins, vec!["a", "b", "c"]);
    }

    #[test]
    fn paginated_ignores_brackets_inside_strings() {
        let out = r#"[{"login": "a]["}][{"login": "[b]"}]"#;
        let users: Vec<User> = parse_paginated(out).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].login, "a][");
        assert_eq!(users[1].login, "[b]");
    }

    #[test]
    fn classify_http_failure_as_host_api() {
        let err = classify_failure("gh: Not Found (HTTP 404)");
        match err {
            Error::HostApi { status, message } => {
                assert_eq!(status, Some(404));
                assert_eq!(message, "Not Found");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn classify_connection_failure_as_network() {
        let err = classify_failure(
            "error connecting to api.github.com\ncheck your internet connection",
        );
        assert!(matches!(err, Error::Network(_)));
    }

    #[test]
    fn classify_unknown_failure_as_host_api_without_status() {
        let err = classify_failure("something odd");
        assert!(matches!(err, Error::HostApi { status: None, .. }));
    }
}
