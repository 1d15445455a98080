// Session module - remote automation sessions that can hand back a screenshot.
// Two backends: an Appium server spoken to over WebDriver HTTP, or the local
// adb binary for devices reachable without Appium.

pub mod appium;
pub mod backend;
pub mod config;
pub mod shell;
pub mod types;

#[cfg(test)]
pub(crate) mod test_server;

// Re-export the main types for easy access
pub use appium::AppiumSession;
pub use backend::SessionBackend;
pub use config::{BackendKind, DEFAULT_SERVER_URL, PlatformDescriptor, SessionConfig};
pub use shell::{AdbShellSession, Device};
pub use types::{AutomationSession, ScreenCapture};
