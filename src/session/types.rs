// Core session types and traits
use crate::error::{ProbeError, ProbeResult};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct ScreenCapture {
    pub path: PathBuf,
    pub byte_len: usize,
    pub duration_ms: u128,
}

// Trait implemented by each way of driving a device (Appium server or local adb)
#[allow(async_fn_in_trait)]
pub trait AutomationSession: Send + Sync {
    // Raw backend-specific capture, PNG bytes
    async fn screenshot_bytes(&self) -> ProbeResult<Vec<u8>>;

    // Save a screenshot to `destination`, with timing
    async fn capture_screenshot(&self, destination: &Path) -> ProbeResult<ScreenCapture> {
        let start = std::time::Instant::now();
        let bytes = self.screenshot_bytes().await?;
        tokio::fs::write(destination, &bytes)
            .await
            .map_err(|e| ProbeError::io(destination, e))?;
        Ok(ScreenCapture {
            path: destination.to_path_buf(),
            byte_len: bytes.len(),
            duration_ms: start.elapsed().as_millis(),
        })
    }

    async fn close(&self) -> ProbeResult<()>;

    fn device_name(&self) -> &str;
}
