//! External editor sessions.
//!
//! A session hands the terminal to the user's editor: the renderer is
//! suspended, the editor runs against a seeded temp file, the file is read
//! back and removed, and the renderer is resumed. Resume and temp-file
//! removal happen on every exit path because both are tied to `Drop`.
//! Only one session may be open at a time.

use crate::error::{Error, Result};
use std::cell::Cell;
use std::process::Command;

/// Something that owns the terminal and can hand it over temporarily.
pub trait Suspend {
    fn suspend(&mut self) -> Result<()>;
    fn resume(&mut self) -> Result<()>;
}

/// Scoped exclusive terminal access. Resumes the renderer when dropped.
pub struct SuspendGuard<'a> {
    target: &'a mut dyn Suspend,
}

impl<'a> SuspendGuard<'a> {
    pub fn acquire(target: &'a mut dyn Suspend) -> Result<Self> {
        if let Err(e) = target.suspend() {
            // A half-suspended terminal must not be left behind
            if let Err(resume_err) = target.resume() {
                tracing::error!(error = %resume_err, "resume after failed suspend");
            }
            return Err(e);
        }
        Ok(Self { target })
    }
}

impl Drop for SuspendGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.target.resume() {
            tracing::error!(error = %e, "failed to resume terminal");
        }
    }
}

/// Marks the single open session; releases it when dropped.
struct SessionToken<'a>(&'a Cell<bool>);

impl Drop for SessionToken<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

#[derive(Debug, Default)]
pub struct ExternalEditor {
    command: Option<String>,
    busy: Cell<bool>,
}

impl ExternalEditor {
    pub fn new(command: Option<String>) -> Self {
        Self {
            command,
            busy: Cell::new(false),
        }
    }

    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Edit `initial` and return the result, which may be empty. Whether
    /// empty text is acceptable is up to the caller.
    pub fn edit_text(&self, terminal: &mut dyn Suspend, initial: &str) -> Result<String> {
        let text = self.run_session(terminal, Some(initial))?;
        Ok(text.trim_end().to_string())
    }

    /// Compose new text from an empty file. `None` means cancelled.
    pub fn create_text(&self, terminal: &mut dyn Suspend) -> Result<Option<String>> {
        let text = self.run_session(terminal, None)?;
        Ok(non_blank(text))
    }

    fn begin(&self) -> Result<SessionToken<'_>> {
        if self.busy.replace(true) {
            return Err(Error::SessionBusy);
        }
        Ok(SessionToken(&self.busy))
    }

    fn argv(&self) -> Result<(String, Vec<String>)> {
        let command = self.command.as_deref().ok_or_else(|| {
            Error::Configuration(
                "no editor configured: set [editor] command, $VISUAL or $EDITOR".into(),
            )
        })?;
        let mut parts = shell_words::split(command)
            .map_err(|e| Error::Configuration(format!("cannot parse editor command: {e}")))?;
        if parts.is_empty() {
            return Err(Error::Configuration("editor command is empty".into()));
        }
        let program = parts.remove(0);
        Ok((program, parts))
    }

    fn run_session(&self, terminal: &mut dyn Suspend, initial: Option<&str>) -> Result<String> {
        let _session = self.begin()?;
        let (program, args) = self.argv()?;

        // Declaration order is drop order reversed: temp file first, then resume.
        let _suspended = SuspendGuard::acquire(terminal)?;
        let file = tempfile::Builder::new()
            .prefix("ghtui-")
            .suffix(".md")
            .tempfile()?;
        if let Some(text) = initial {
            std::fs::write(file.path(), text)?;
        }

        tracing::debug!(%program, path = %file.path().display(), "launching editor");
        let status = Command::new(&program)
            .args(&args)
            .arg(file.path())
            .status()
            .map_err(|e| Error::Configuration(format!("failed to launch editor `{program}`: {e}")))?;
        if !status.success() {
            // Content is the source of truth, not the exit code
            tracing::warn!(%status, "editor exited unsuccessfully");
        }

        let content = std::fs::read_to_string(file.path())?;
        Ok(content)
    }
}

/// Editors append a final newline; trailing whitespace is not content.
fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim_end();
    if trimmed.trim().is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Split editor output into an issue title (first line) and body (the rest).
/// `None` when either part is empty.
pub fn split_issue(text: &str) -> Option<(String, String)> {
    let (title, body) = text.split_once('\n').unwrap_or((text, ""));
    let title = title.trim();
    let body = body.trim_start_matches(['\n', '\r']).trim_end();
    if title.is_empty() || body.trim().is_empty() {
        return None;
    }
    Some((title.to_string(), body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records suspend/resume calls in order
    #[derive(Default)]
    struct FakeTerminal {
        calls: Rc<RefCell<Vec<&'static str>>>,
        fail_suspend: bool,
    }

    impl Suspend for FakeTerminal {
        fn suspend(&mut self) -> Result<()> {
            self.calls.borrow_mut().push("suspend");
            if self.fail_suspend {
                return Err(Error::Io(std::io::Error::other("no tty")));
            }
            Ok(())
        }

        fn resume(&mut self) -> Result<()> {
            self.calls.borrow_mut().push("resume");
            Ok(())
        }
    }

    fn sh_editor(script: &str) -> ExternalEditor {
        ExternalEditor::new(Some(format!("sh -c '{script}'")))
    }

    #[test]
    fn split_issue_title_and_body() {
        let (title, body) = split_issue("  Crash on start \n\nSteps:\n1. run\n").unwrap();
        assert_eq!(title, "Crash on start");
        assert_eq!(body, "Steps:\n1. run");
    }

    #[test]
    fn split_issue_title_only_is_cancelled() {
        assert!(split_issue("Title\n").is_none());
        assert!(split_issue("Title").is_none());
        assert!(split_issue("Title\n   \n\n").is_none());
    }

    #[test]
    fn split_issue_empty_title_is_cancelled() {
        assert!(split_issue("\nbody text").is_none());
        assert!(split_issue("   \nbody text").is_none());
    }

    #[test]
    fn non_blank_trims_trailing_newline() {
        assert_eq!(non_blank("hi\n".into()).as_deref(), Some("hi"));
        assert_eq!(non_blank(" \n\t\n".into()), None);
        assert_eq!(non_blank(String::new()), None);
    }

    #[test]
    fn missing_editor_is_configuration_error_and_terminal_untouched() {
        let editor = ExternalEditor::new(None);
        let mut term = FakeTerminal::default();
        let err = editor.edit_text(&mut term, "x").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(term.calls.borrow().is_empty());
        assert!(!editor.is_busy());
    }

    #[test]
    fn failed_suspend_still_resumes() {
        let editor = ExternalEditor::new(Some("true".into()));
        let mut term = FakeTerminal {
            fail_suspend: true,
            ..Default::default()
        };
        assert!(editor.create_text(&mut term).is_err());
        assert_eq!(*term.calls.borrow(), vec!["suspend", "resume"]);
        assert!(!editor.is_busy());
    }

    #[test]
    fn open_session_rejects_another() {
        let editor = ExternalEditor::new(Some("true".into()));
        let _open = editor.begin().unwrap();
        let mut term = FakeTerminal::default();
        let err = editor.create_text(&mut term).unwrap_err();
        assert!(matches!(err, Error::SessionBusy));
        assert!(term.calls.borrow().is_empty());
    }

    #[cfg(unix)]
    mod with_shell {
        use super::*;

        #[test]
        fn unchanged_edit_returns_initial_text() {
            let editor = ExternalEditor::new(Some("true".into()));
            let mut term = FakeTerminal::default();
            let text = editor.edit_text(&mut term, "hello").unwrap();
            assert_eq!(text, "hello");
            assert_eq!(*term.calls.borrow(), vec!["suspend", "resume"]);
        }

        #[test]
        fn create_with_nothing_written_is_none() {
            let editor = ExternalEditor::new(Some("true".into()));
            let mut term = FakeTerminal::default();
            assert_eq!(editor.create_text(&mut term).unwrap(), None);
        }

        #[test]
        fn editor_output_is_read_back() {
            let editor = sh_editor(r#"printf "new body\n" > "$0""#);
            let mut term = FakeTerminal::default();
            let text = editor.edit_text(&mut term, "old").unwrap();
            assert_eq!(text, "new body");
        }

        #[test]
        fn cleared_edit_returns_empty_text() {
            let editor = sh_editor(r#"printf "  \n\n" > "$0""#);
            let mut term = FakeTerminal::default();
            assert_eq!(editor.edit_text(&mut term, "old").unwrap(), "");
        }

        #[test]
        fn content_wins_over_failing_exit_code() {
            let editor = sh_editor(r#"printf "kept" > "$0"; exit 3"#);
            let mut term = FakeTerminal::default();
            assert_eq!(editor.create_text(&mut term).unwrap().as_deref(), Some("kept"));
            assert_eq!(*term.calls.borrow(), vec!["suspend", "resume"]);
        }

        #[test]
        fn temp_file_is_seeded_and_removed() {
            let record = tempfile::NamedTempFile::new().unwrap();
            let record_path = record.path().display().to_string();
            let editor = sh_editor(&format!(r#"cat "$0" > {record_path}; echo "$0" >> {record_path}"#));
            let mut term = FakeTerminal::default();
            editor.edit_text(&mut term, "seed").unwrap();

            let recorded = std::fs::read_to_string(record.path()).unwrap();
            let (seed, path) = recorded.split_at(4);
            assert_eq!(seed, "seed");
            let path = path.trim();
            assert!(path.ends_with(".md"));
            assert!(!std::path::Path::new(path).exists());
        }

        #[test]
        fn temp_file_is_removed_when_reading_it_back_fails() {
            let record = tempfile::NamedTempFile::new().unwrap();
            let record_path = record.path().display().to_string();
            // Not valid UTF-8, so reading the result fails after a failing exit
            let editor = sh_editor(&format!(
                r#"echo "$0" > {record_path}; printf "\377\376" > "$0"; exit 1"#
            ));
            let mut term = FakeTerminal::default();
            let err = editor.edit_text(&mut term, "seed").unwrap_err();

            assert!(matches!(err, Error::Io(_)));
            let recorded = std::fs::read_to_string(record.path()).unwrap();
            let path = recorded.trim();
            assert!(path.ends_with(".md"));
            assert!(!std::path::Path::new(path).exists());
            assert_eq!(*term.calls.borrow(), vec!["suspend", "resume"]);
            assert!(!editor.is_busy());
        }

        #[test]
        fn unknown_editor_program_still_resumes() {
            let editor = ExternalEditor::new(Some("/definitely/not/an/editor".into()));
            let mut term = FakeTerminal::default();
            let err = editor.create_text(&mut term).unwrap_err();
            assert!(matches!(err, Error::Configuration(_)));
            assert_eq!(*term.calls.borrow(), vec!["suspend", "resume"]);
            assert!(!editor.is_busy());
        }

        #[test]
        fn nested_session_from_inside_editor_window_is_rejected() {
            struct Reentrant<'e> {
                editor: &'e ExternalEditor,
                nested: Option<Result<Option<String>>>,
            }

            impl Suspend for Reentrant<'_> {
                fn suspend(&mut self) -> Result<()> {
                    let mut inner = FakeTerminal::default();
                    self.nested = Some(self.editor.create_text(&mut inner));
                    Ok(())
                }

                fn resume(&mut self) -> Result<()> {
                    Ok(())
                }
            }

            let editor = ExternalEditor::new(Some("true".into()));
            let mut term = Reentrant {
                editor: &editor,
                nested: None,
            };
            editor.create_text(&mut term).unwrap();
            assert!(matches!(term.nested, Some(Err(Error::SessionBusy))));
            assert!(!editor.is_busy());
        }
    }
}
