//! Tool for capturing the current screen

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use finquest_core::Result as AgentResult;
use finquest_tools::Tool;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::error::{MarketError, Result};

/// Tool that captures the screen via the platform screenshot utility and
/// returns the image as base64-encoded PNG
pub struct ScreenshotTool;

/// Candidate capture commands per platform, tried in order
fn capture_commands(output: &Path) -> Vec<(&'static str, Vec<String>)> {
    let path = output.display().to_string();
    if cfg!(target_os = "macos") {
        vec![("screencapture", vec!["-x".to_string(), path])]
    } else {
        vec![
            ("gnome-screenshot", vec!["-f".to_string(), path.clone()]),
            (
                "import",
                vec!["-window".to_string(), "root".to_string(), path.clone()],
            ),
            ("scrot", vec![path]),
        ]
    }
}

fn temp_output_path() -> PathBuf {
    std::env::temp_dir().join(format!("finquest-screenshot-{}.png", std::process::id()))
}

impl ScreenshotTool {
    /// Create a new screenshot tool
    pub fn new() -> Self {
        Self
    }

    async fn capture(&self) -> Result<Value> {
        let output = temp_output_path();

        let mut last_failure = String::new();
        for (program, args) in capture_commands(&output) {
            let status = Command::new(program).args(&args).status().await;
            match status {
                Ok(status) if status.success() => {
                    let bytes = tokio::fs::read(&output).await?;
                    let _ = tokio::fs::remove_file(&output).await;

                    tracing::info!(size = bytes.len(), "Screenshot captured");
                    return Ok(json!({
                        "status": "success",
                        "image_base64": BASE64.encode(&bytes),
                        "note": "Screen capture returned as base64-encoded PNG.",
                    }));
                }
                Ok(status) => {
                    last_failure = format!("{program} exited with {status}");
                }
                Err(e) => {
                    last_failure = format!("{program} could not be started: {e}");
                }
            }
        }

        Err(MarketError::Other(format!(
            "Screenshot failed: {last_failure}"
        )))
    }
}

impl Default for ScreenshotTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ScreenshotTool {
    async fn execute(&self, _params: Value) -> AgentResult<Value> {
        self.capture().await.map_err(Into::into)
    }

    fn name(&self) -> &'static str {
        "capture_screenshot"
    }

    fn description(&self) -> &'static str {
        "Take a screenshot of the current screen and return the image encoded \
         as base64."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }
}
