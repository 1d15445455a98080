use crate::error::{ProbeError, ProbeResult};
use crate::session::SessionConfig;
use crate::template_matching::MatchConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SCREENSHOT_PATH: &str = "./appium_screenshot.png";

/// Everything one probe run needs, usually read from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProbeConfig {
    pub session: SessionConfig,
    pub matching: MatchConfig,
    /// Where the captured screenshot is written
    pub screenshot_path: PathBuf,
    /// Reference image to look for
    pub template_path: PathBuf,
    /// Write the screenshot with the match box drawn on it
    pub annotated_path: Option<PathBuf>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            matching: MatchConfig::default(),
            screenshot_path: PathBuf::from(DEFAULT_SCREENSHOT_PATH),
            template_path: PathBuf::new(),
            annotated_path: None,
        }
    }
}

impl ProbeConfig {
    pub fn load(path: &Path) -> ProbeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ProbeError::io(path, e))?;
        let config: ProbeConfig = serde_json::from_str(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> ProbeResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ProbeError::io(path, e))?;
        Ok(())
    }

    /// Fail before any device work if the run cannot succeed
    pub fn validate(&self) -> ProbeResult<()> {
        self.matching.policy().validate()?;
        if self.template_path.as_os_str().is_empty() {
            return Err(ProbeError::invalid_config("templatePath is not set"));
        }
        if self.screenshot_path.as_os_str().is_empty() {
            return Err(ProbeError::invalid_config("screenshotPath is empty"));
        }
        Ok(())
    }
}
