use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use airlink_common::error::{Result, WifiError};

/// Runs external programs on behalf of the core.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Runs `tool` to completion and returns its combined stdout and stderr.
    ///
    /// A tool that cannot be started or exits unsuccessfully yields
    /// [`WifiError::ToolInvocation`] carrying whatever it printed.
    async fn run(&self, tool: &str, args: &[&str]) -> Result<String>;
}

pub struct SystemTools;

#[async_trait]
impl ToolRunner for SystemTools {
    async fn run(&self, tool: &str, args: &[&str]) -> Result<String> {
        debug!("running {tool} {}", args.join(" "));

        // Dropping the future (e.g. on a timeout) must not leave the child behind.
        let output: Output = Command::new(tool)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| WifiError::ToolInvocation {
                tool: tool.to_string(),
                output: String::new(),
                reason: e.to_string(),
            })?;

        let combined: String = combined_output(&output);
        if !output.status.success() {
            return Err(WifiError::ToolInvocation {
                tool: tool.to_string(),
                output: combined.trim().to_string(),
                reason: output.status.to_string(),
            });
        }
        Ok(combined)
    }
}

fn combined_output(output: &Output) -> String {
    let mut text: String = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}
