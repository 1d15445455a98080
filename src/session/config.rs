//! Session configuration: which server, which backend, which device and app

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:4723/wd/hub";

/// W3C capabilities that are sent without a vendor prefix
const W3C_CAPABILITIES: [&str; 11] = [
    "browserName",
    "browserVersion",
    "platformName",
    "acceptInsecureCerts",
    "pageLoadStrategy",
    "proxy",
    "setWindowRect",
    "timeouts",
    "strictFileInteractability",
    "unhandledPromptBehavior",
    "webSocketUrl",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Remote WebDriver session on an Appium server
    #[default]
    Appium,
    /// Local `adb` binary, no Appium server needed
    Adb,
}

/// Device and app the session should target
///
/// Every field is optional; unset fields are left out of the capabilities so
/// the driver falls back to its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlatformDescriptor {
    /// e.g. "Android"
    pub platform_name: Option<String>,
    /// e.g. "11"
    pub platform_version: Option<String>,
    /// adb serial / udid, e.g. "emulator-5554"
    #[serde(alias = "udid")]
    pub device_id: Option<String>,
    /// e.g. "UiAutomator2"
    pub automation_name: Option<String>,
    pub app_package: Option<String>,
    pub app_activity: Option<String>,
    /// Empty string for native apps
    pub browser_name: Option<String>,
    pub ensure_webviews_have_pages: Option<bool>,
    /// Any other capability, passed through as-is (non-W3C keys get `appium:`)
    pub extra: Map<String, Value>,
}

impl PlatformDescriptor {
    /// Capabilities object for a W3C `alwaysMatch` block
    pub fn to_capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        let named: [(&str, Option<Value>); 8] = [
            ("platformName", self.platform_name.clone().map(Value::from)),
            (
                "platformVersion",
                self.platform_version.clone().map(Value::from),
            ),
            ("udid", self.device_id.clone().map(Value::from)),
            (
                "automationName",
                self.automation_name.clone().map(Value::from),
            ),
            ("appPackage", self.app_package.clone().map(Value::from)),
            ("appActivity", self.app_activity.clone().map(Value::from)),
            ("browserName", self.browser_name.clone().map(Value::from)),
            (
                "ensureWebviewsHavePages",
                self.ensure_webviews_have_pages.map(Value::from),
            ),
        ];
        for (key, value) in named {
            if let Some(value) = value {
                caps.insert(vendor_key(key), value);
            }
        }
        for (key, value) in &self.extra {
            caps.insert(vendor_key(key), value.clone());
        }
        caps
    }

    /// `package/activity` component name when both are set
    pub fn launch_component(&self) -> Option<String> {
        match (&self.app_package, &self.app_activity) {
            (Some(package), Some(activity)) => Some(format!("{package}/{activity}")),
            _ => None,
        }
    }
}

fn vendor_key(key: &str) -> String {
    if key.contains(':') || W3C_CAPABILITIES.contains(&key) {
        key.to_string()
    } else {
        format!("appium:{key}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub backend: BackendKind,
    /// Appium server base URL, ignored by the adb backend
    pub server_url: String,
    pub platform: PlatformDescriptor,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Appium,
            server_url: DEFAULT_SERVER_URL.to_string(),
            platform: PlatformDescriptor::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn youtube_emulator() -> PlatformDescriptor {
        PlatformDescriptor {
            platform_name: Some("Android".into()),
            platform_version: Some("11".into()),
            device_id: Some("emulator-5554".into()),
            automation_name: Some("UiAutomator2".into()),
            app_package: Some("com.google.android.youtube".into()),
            app_activity: Some("com.google.android.youtube.HomeActivity".into()),
            browser_name: Some(String::new()),
            ensure_webviews_have_pages: Some(true),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_capabilities_are_prefixed() {
        let caps = Value::Object(youtube_emulator().to_capabilities());
        assert_eq!(
            caps,
            json!({
                "platformName": "Android",
                "appium:platformVersion": "11",
                "appium:udid": "emulator-5554",
                "appium:automationName": "UiAutomator2",
                "appium:appPackage": "com.google.android.youtube",
                "appium:appActivity": "com.google.android.youtube.HomeActivity",
                "browserName": "",
                "appium:ensureWebviewsHavePages": true
            })
        );
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let descriptor = PlatformDescriptor {
            platform_name: Some("Android".into()),
            ..Default::default()
        };
        let caps = descriptor.to_capabilities();
        assert_eq!(caps.len(), 1);
        assert!(descriptor.launch_component().is_none());
    }

    #[test]
    fn test_extra_capabilities_pass_through() {
        let mut descriptor = PlatformDescriptor::default();
        descriptor.extra.insert("noReset".into(), json!(true));
        descriptor
            .extra
            .insert("goog:chromeOptions".into(), json!({"w3c": true}));
        descriptor
            .extra
            .insert("pageLoadStrategy".into(), json!("eager"));

        let caps = descriptor.to_capabilities();
        assert_eq!(caps["appium:noReset"], json!(true));
        assert_eq!(caps["goog:chromeOptions"], json!({"w3c": true}));
        assert_eq!(caps["pageLoadStrategy"], json!("eager"));
    }

    #[test]
    fn test_session_config_from_json() {
        let config: SessionConfig = serde_json::from_value(json!({
            "backend": "adb",
            "platform": {
                "platformName": "Android",
                "udid": "emulator-5554",
                "appPackage": "com.example",
                "appActivity": ".Main"
            }
        }))
        .unwrap();
        assert_eq!(config.backend, BackendKind::Adb);
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.platform.device_id.as_deref(), Some("emulator-5554"));
        assert_eq!(
            config.platform.launch_component().as_deref(),
            Some("com.example/.Main")
        );
    }
}
