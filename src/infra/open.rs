use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenUrlError {
    #[error("failed to launch {command}: {source}")]
    Spawn {
        command: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Hand a URL to the platform opener, detached from the TUI's terminal.
pub fn open_url(url: &str) -> Result<(), OpenUrlError> {
    let command = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "cmd"
    } else {
        "xdg-open"
    };

    let mut invocation = Command::new(command);
    if cfg!(target_os = "windows") {
        invocation.args(["/C", "start", "", url]);
    } else {
        invocation.arg(url);
    }

    invocation
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|source| OpenUrlError::Spawn { command, source })
}
