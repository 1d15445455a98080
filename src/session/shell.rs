use super::config::PlatformDescriptor;
use super::types::AutomationSession;
use crate::error::{ProbeError, ProbeResult};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::process::Command;

#[derive(Debug, PartialEq, Clone)]
pub struct Device {
    pub name: String,
    pub transport_id: Option<String>,
}

/// Session backed by the local `adb` binary
pub struct AdbShellSession {
    pub device: Device,
    closed: AtomicBool,
}

impl AdbShellSession {
    fn new(device: Device) -> Self {
        Self {
            device,
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self, step: &'static str) -> ProbeResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ProbeError::session(
                step,
                format!("adb session for {} is closed", self.device.name),
            ));
        }
        Ok(())
    }

    async fn ensure_adb_available() -> ProbeResult<()> {
        match Command::new("adb").arg("version").output().await {
            Ok(out) => {
                if !out.status.success() {
                    return Err(ProbeError::session(
                        "create",
                        format!(
                            "'adb' command found but returned non-zero ({}). Ensure Android Platform Tools are properly installed, or use the appium backend.",
                            out.status
                        ),
                    ));
                }
                Ok(())
            }
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Err(ProbeError::session(
                        "create",
                        "'adb' binary not found in PATH. Install Android Platform Tools (https://developer.android.com/tools/adb) or use the appium backend.",
                    ))
                } else {
                    Err(ProbeError::session(
                        "create",
                        format!("Failed to invoke 'adb': {e}"),
                    ))
                }
            }
        }
    }

    /// Pick the device named by `platform.device_id` (or the first one) and
    /// launch the configured app on it
    pub async fn open(platform: &PlatformDescriptor) -> ProbeResult<Self> {
        Self::ensure_adb_available().await?;
        let devices = Self::list_devices().await?;
        let device = Self::select_device(devices, platform.device_id.as_deref())?;
        log::info!(
            "Using adb device {} (transport_id={:?})",
            device.name,
            device.transport_id
        );

        let session = Self::new(device);
        if let Some(component) = platform.launch_component() {
            session.launch_activity(&component).await?;
        }
        Ok(session)
    }

    fn select_device(devices: Vec<Device>, wanted: Option<&str>) -> ProbeResult<Device> {
        let no_devices = || {
            ProbeError::session(
                "create",
                "No devices available (adb backend). Connect a device or start an emulator.",
            )
        };
        if devices.is_empty() {
            return Err(no_devices());
        }
        let mut devices = devices.into_iter();
        match wanted {
            Some(name) => devices
                .find(|d| d.name == name)
                .ok_or_else(|| ProbeError::session("create", format!("Device '{name}' not found"))),
            None => devices.next().ok_or_else(no_devices),
        }
    }

    pub fn parse_devices(output: &str) -> Vec<Device> {
        output
            .lines()
            .skip(1)
            .filter_map(|line| {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() >= 2 && parts[1] == "device" {
                    let name = parts[0].to_string();
                    let transport_id = parts
                        .iter()
                        .find_map(|part| part.strip_prefix("transport_id:"))
                        .map(str::to_string);
                    Some(Device { name, transport_id })
                } else {
                    None
                }
            })
            .collect()
    }

    pub async fn list_devices() -> ProbeResult<Vec<Device>> {
        let output = Command::new("adb")
            .arg("devices")
            .arg("-l")
            .output()
            .await
            .map_err(|e| ProbeError::session("create", format!("Failed to execute adb: {e}")))?;
        if !output.status.success() {
            return Err(ProbeError::session(
                "create",
                format!(
                    "adb devices failed: {}",
                    String::from_utf8_lossy(&output.stderr)
                ),
            ));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(Self::parse_devices(&stdout))
    }

    async fn launch_activity(&self, component: &str) -> ProbeResult<()> {
        log::info!("Starting {component} on {}", self.device.name);
        let output = Command::new("adb")
            .arg("-s")
            .arg(&self.device.name)
            .args(["shell", "am", "start", "-W", "-n", component])
            .output()
            .await
            .map_err(|e| ProbeError::session("create", format!("Failed to run adb am start: {e}")))?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        // am start reports failures on stdout with exit code 0
        if !output.status.success() || stdout.contains("Error:") {
            return Err(ProbeError::session(
                "create",
                format!(
                    "am start {component} failed: {}{}",
                    stdout.trim(),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }
        Ok(())
    }
}

impl AutomationSession for AdbShellSession {
    async fn screenshot_bytes(&self) -> ProbeResult<Vec<u8>> {
        self.ensure_open("screenshot")?;
        let output = Command::new("adb")
            .arg("-s")
            .arg(&self.device.name)
            .args(["exec-out", "screencap", "-p"])
            .output()
            .await
            .map_err(|e| {
                ProbeError::session("screenshot", format!("Failed to run adb screencap: {e}"))
            })?;
        if !output.status.success() {
            return Err(ProbeError::session(
                "screenshot",
                format!(
                    "adb screencap failed: {}",
                    String::from_utf8_lossy(&output.stderr)
                ),
            ));
        }
        Ok(output.stdout)
    }

    /// adb keeps no server-side session, closing only stops further captures
    async fn close(&self) -> ProbeResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn device_name(&self) -> &str {
        &self.device.name
    }
}
