use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Platform command that opens a URL in the default browser
fn opener() -> (&'static str, Vec<&'static str>) {
    if cfg!(target_os = "macos") {
        ("open", vec![])
    } else if cfg!(target_os = "windows") {
        ("cmd", vec!["/C", "start", ""])
    } else {
        ("xdg-open", vec![])
    }
}

/// Open `url` without blocking the UI. The child is reaped on a helper
/// thread.
pub fn open_url(url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(Error::NotFound("nothing to open in the browser".into()));
    }
    let (cmd, args) = opener();
    let mut child = Command::new(cmd)
        .args(&args)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| Error::Configuration(format!("failed to run `{cmd}`: {e}")))?;
    tracing::debug!(url, cmd, "opening browser");
    std::thread::spawn(move || {
        let _ = child.wait();
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_url_is_rejected_without_spawning() {
        assert!(matches!(open_url(""), Err(Error::NotFound(_))));
    }

    #[test]
    fn opener_matches_platform() {
        let (cmd, _) = opener();
        if cfg!(target_os = "linux") {
            assert_eq!(cmd, "xdg-open");
        }
    }
}
