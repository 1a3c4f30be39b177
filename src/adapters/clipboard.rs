//! System clipboard via the platform's copy utility.
//!
//! Spawns `pbcopy`, `clip`, `wl-copy`, `xclip` or `xsel` and pipes the text
//! to stdin. The first tool that exits successfully wins.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use super::Clipboard;

const COPY_TIMEOUT: Duration = Duration::from_secs(5);

/// Copy command candidates for the current platform
fn default_commands() -> Vec<Vec<String>> {
    let raw: &[&[&str]] = if cfg!(target_os = "macos") {
        &[&["pbcopy"]]
    } else if cfg!(target_os = "windows") {
        &[&["clip"]]
    } else {
        &[
            &["wl-copy"],
            &["xclip", "-selection", "clipboard"],
            &["xsel", "--clipboard", "--input"],
        ]
    };

    raw.iter()
        .map(|cmd| cmd.iter().map(|s| s.to_string()).collect())
        .collect()
}

/// Clipboard backed by external copy utilities
pub struct SystemClipboard {
    commands: Vec<Vec<String>>,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self {
            commands: default_commands(),
        }
    }

    /// Use specific copy commands (program followed by its arguments)
    pub fn with_commands(commands: Vec<Vec<String>>) -> Self {
        Self { commands }
    }

    async fn copy_with(&self, command: &[String], text: &str) -> Result<()> {
        let (program, args) = command
            .split_first()
            .context("Empty clipboard command")?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn {}", program))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .with_context(|| format!("Failed to write to {} stdin", program))?;
            // Drop stdin to signal EOF
        }

        let output = timeout(COPY_TIMEOUT, child.wait_with_output())
            .await
            .with_context(|| format!("{} timed out after {:?}", program, COPY_TIMEOUT))?
            .with_context(|| format!("Failed to wait for {}", program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("{} failed: {}", program, stderr.trim());
        }

        Ok(())
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    fn name(&self) -> &str {
        "system"
    }

    async fn copy(&self, text: &str) -> Result<()> {
        let mut last_error = None;

        for command in &self.commands {
            match self.copy_with(command, text).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::debug!(error = %e, "Clipboard command unavailable");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("No clipboard command configured")))
    }
}

/// Clipboard that is never available; links are always displayed
#[derive(Debug, Default)]
pub struct NoClipboard;

#[async_trait]
impl Clipboard for NoClipboard {
    fn name(&self) -> &str {
        "none"
    }

    async fn copy(&self, _text: &str) -> Result<()> {
        anyhow::bail!("Clipboard disabled")
    }
}
