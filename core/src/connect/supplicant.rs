use std::collections::VecDeque;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::debug;

use airlink_common::error::{Result, WifiError};

/// Lines of supplicant output kept for the error message.
const OUTPUT_TAIL: usize = 10;

/// The 802.11 authentication daemon for one interface.
#[async_trait]
pub trait Supplicant: Send + Sync {
    /// Runs the supplicant for `interface` with the profile at `profile_path`.
    ///
    /// Returns when the process exits, which may be never.
    async fn run(&self, interface: &str, profile_path: &Path) -> Result<()>;
}

pub struct WpaSupplicant {
    binary: String,
}

impl WpaSupplicant {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl Supplicant for WpaSupplicant {
    async fn run(&self, interface: &str, profile_path: &Path) -> Result<()> {
        let invocation_error = |output: String, reason: String| WifiError::ToolInvocation {
            tool: self.binary.clone(),
            output,
            reason,
        };

        let mut child = Command::new(&self.binary)
            .arg(format!("-i{interface}"))
            .arg(format!("-c{}", profile_path.display()))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| invocation_error(String::new(), e.to_string()))?;

        let stdout = child.stdout.take().map(|out| forward_lines(interface, out));
        let stderr = child.stderr.take().map(|err| forward_lines(interface, err));

        let status = child
            .wait()
            .await
            .map_err(|e| invocation_error(String::new(), e.to_string()))?;

        if status.success() {
            return Ok(());
        }

        let mut tail: Vec<String> = Vec::new();
        for reader in [stdout, stderr].into_iter().flatten() {
            if let Ok(lines) = reader.await {
                tail.extend(lines);
            }
        }
        Err(invocation_error(tail.join("\n"), status.to_string()))
    }
}

/// Logs every line of `stream`, keeping the last few for error reporting.
fn forward_lines<R>(interface: &str, stream: R) -> JoinHandle<Vec<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let interface: String = interface.to_string();
    tokio::spawn(async move {
        let mut tail: VecDeque<String> = VecDeque::with_capacity(OUTPUT_TAIL);
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(target: "airlink::supplicant", "{interface}: {line}");
            if tail.len() == OUTPUT_TAIL {
                tail.pop_front();
            }
            tail.push_back(line);
        }
        tail.into()
    })
}
