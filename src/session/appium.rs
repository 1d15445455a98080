//! Appium backend: a minimal W3C WebDriver client over HTTP
//!
//! Only the three endpoints the probe needs are spoken: new session,
//! screenshot and delete session.

use super::config::PlatformDescriptor;
use super::types::AutomationSession;
use crate::error::{ProbeError, ProbeResult};
use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};

pub struct AppiumSession {
    client: Client,
    server_url: String,
    session_id: String,
    device_name: String,
    closed: AtomicBool,
}

impl AppiumSession {
    pub async fn create(server_url: &str, platform: &PlatformDescriptor) -> ProbeResult<Self> {
        let server_url = server_url.trim_end_matches('/').to_string();
        let client = Client::new();
        let endpoint = format!("{server_url}/session");

        log::info!("Creating Appium session at {endpoint}");
        log::debug!("Capabilities: {:?}", platform.to_capabilities());

        let response = client
            .post(&endpoint)
            .json(&new_session_body(platform))
            .send()
            .await
            .map_err(|e| ProbeError::session("create", format!("{endpoint}: {e}")))?;
        let body = read_response(response, "create").await?;
        let session_id = parse_session_id(&body)?;

        let device_name = platform
            .device_id
            .clone()
            .unwrap_or_else(|| format!("appium-{session_id}"));
        log::info!("Appium session {session_id} ready on {device_name}");

        Ok(Self {
            client,
            server_url,
            session_id,
            device_name,
            closed: AtomicBool::new(false),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn session_url(&self) -> String {
        format!("{}/session/{}", self.server_url, self.session_id)
    }

    fn ensure_open(&self, step: &'static str) -> ProbeResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ProbeError::session(
                step,
                format!("session {} is closed", self.session_id),
            ));
        }
        Ok(())
    }
}

impl AutomationSession for AppiumSession {
    async fn screenshot_bytes(&self) -> ProbeResult<Vec<u8>> {
        self.ensure_open("screenshot")?;
        let response = self
            .client
            .get(format!("{}/screenshot", self.session_url()))
            .send()
            .await?;
        let body = read_response(response, "screenshot").await?;
        decode_screenshot(&body)
    }

    async fn close(&self) -> ProbeResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let response = self.client.delete(self.session_url()).send().await?;
        read_response(response, "close").await?;
        log::debug!("Appium session {} deleted", self.session_id);
        Ok(())
    }

    fn device_name(&self) -> &str {
        &self.device_name
    }
}

fn new_session_body(platform: &PlatformDescriptor) -> Value {
    json!({
        "capabilities": {
            "alwaysMatch": Value::Object(platform.to_capabilities()),
            "firstMatch": [{}]
        }
    })
}

async fn read_response(response: reqwest::Response, step: &'static str) -> ProbeResult<Value> {
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .map_err(|e| ProbeError::session(step, format!("unreadable response ({status}): {e}")))?;

    if let Some(message) = webdriver_error(&body) {
        return Err(ProbeError::session(step, format!("{status}: {message}")));
    }
    if !status.is_success() {
        return Err(ProbeError::session(step, format!("HTTP {status}")));
    }
    Ok(body)
}

/// Error carried in a WebDriver response body, W3C or legacy JSON wire format
fn webdriver_error(body: &Value) -> Option<String> {
    let value = body.get("value");
    let message = value
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("");

    if let Some(error) = value.and_then(|v| v.get("error")).and_then(Value::as_str) {
        return Some(format!("{error}: {message}"));
    }
    match body.get("status").and_then(Value::as_i64) {
        Some(code) if code != 0 => Some(format!("status {code}: {message}")),
        _ => None,
    }
}

fn parse_session_id(body: &Value) -> ProbeResult<String> {
    body.get("value")
        .and_then(|v| v.get("sessionId"))
        .or_else(|| body.get("sessionId"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ProbeError::session("create", "response has no sessionId"))
}

fn decode_screenshot(body: &Value) -> ProbeResult<Vec<u8>> {
    let encoded = body
        .get("value")
        .and_then(Value::as_str)
        .ok_or_else(|| ProbeError::session("screenshot", "response has no base64 value"))?;
    // some drivers wrap the base64 payload at 76 columns
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| ProbeError::session("screenshot", format!("invalid base64 payload: {e}")))
}
