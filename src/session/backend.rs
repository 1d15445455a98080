use super::appium::AppiumSession;
use super::config::{BackendKind, SessionConfig};
use super::shell::AdbShellSession;
use super::types::AutomationSession;
use crate::error::ProbeResult;

pub enum SessionBackend {
    Appium(AppiumSession),
    Adb(AdbShellSession),
}

impl SessionBackend {
    pub async fn open(config: &SessionConfig) -> ProbeResult<Self> {
        match config.backend {
            BackendKind::Appium => Ok(SessionBackend::Appium(
                AppiumSession::create(&config.server_url, &config.platform).await?,
            )),
            BackendKind::Adb => Ok(SessionBackend::Adb(
                AdbShellSession::open(&config.platform).await?,
            )),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            SessionBackend::Appium(_) => BackendKind::Appium,
            SessionBackend::Adb(_) => BackendKind::Adb,
        }
    }
}

impl AutomationSession for SessionBackend {
    async fn screenshot_bytes(&self) -> ProbeResult<Vec<u8>> {
        match self {
            SessionBackend::Appium(a) => a.screenshot_bytes().await,
            SessionBackend::Adb(s) => s.screenshot_bytes().await,
        }
    }

    async fn close(&self) -> ProbeResult<()> {
        match self {
            SessionBackend::Appium(a) => a.close().await,
            SessionBackend::Adb(s) => s.close().await,
        }
    }

    fn device_name(&self) -> &str {
        match self {
            SessionBackend::Appium(a) => a.device_name(),
            SessionBackend::Adb(s) => s.device_name(),
        }
    }
}
