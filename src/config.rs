use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::app::TopLevel;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub issues: IssuesConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// [editor] section. No built-in default editor exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub start_screen: TopLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub max_repositories: usize,
    /// Query run the first time the repositories screen is shown
    #[serde(default)]
    pub default_query: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuesConfig {
    #[serde(default = "default_limit")]
    pub max_issues: usize,
    #[serde(default = "default_issue_state")]
    pub state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_limit() -> usize {
    100
}

fn default_issue_state() -> String {
    "open".into()
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            start_screen: TopLevel::Repositories,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_repositories: default_limit(),
            default_query: None,
        }
    }
}

impl Default for IssuesConfig {
    fn default() -> Self {
        Self {
            max_issues: default_limit(),
            state: default_issue_state(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Editor command: `[editor] command`, then `$VISUAL`, then `$EDITOR`.
    /// `None` when nothing is configured.
    pub fn resolve_editor(&self) -> Option<String> {
        self.resolve_editor_with(|key| std::env::var(key).ok())
    }

    fn resolve_editor_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.editor
            .command
            .clone()
            .or_else(|| env("VISUAL"))
            .or_else(|| env("EDITOR"))
            .filter(|cmd| !cmd.trim().is_empty())
    }
}

/// Default config location: `~/.config/ghtui/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ghtui/config.toml"))
}

/// Load config from the default location. A missing or unreadable file
/// yields built-in defaults; a file that does not parse is an error so the
/// caller can report it once logging is up.
pub fn load_config() -> Result<Config> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(Config::default()),
    }
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Ok(Config::default());
    };
    toml::from_str(&content)
        .map_err(|e| Error::Configuration(format!("invalid config {}: {e}", path.display())))
}
