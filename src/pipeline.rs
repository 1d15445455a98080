//! The probe run: capture a screenshot, find the template, decide

use crate::config::ProbeConfig;
use crate::error::ProbeResult;
use crate::session::{AutomationSession, ScreenCapture, SessionBackend, SessionConfig};
use crate::template_matching::visualizer::{annotate, save_annotated};
use crate::template_matching::{
    ComparisonMode, MatchConfig, MatchResult, decide, load_scene_and_template, match_images,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Outcome of one probe run
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub present: bool,
    pub result: MatchResult,
    pub threshold: f32,
    pub comparison_mode: ComparisonMode,
    pub screenshot_path: PathBuf,
    pub annotated_path: Option<PathBuf>,
}

/// Open a session, save one screenshot, close the session
///
/// The session is closed even when the capture fails; a failing close is only
/// logged.
pub async fn capture_screenshot(
    session_config: &SessionConfig,
    destination: &Path,
) -> ProbeResult<ScreenCapture> {
    let session = SessionBackend::open(session_config).await?;
    log::info!(
        "Session open on {} ({:?} backend)",
        session.device_name(),
        session.kind()
    );

    let capture = session.capture_screenshot(destination).await;
    if let Err(e) = session.close().await {
        log::warn!("Closing session on {} failed: {e}", session.device_name());
    }

    let capture = capture?;
    log::info!(
        "Screenshot saved to {} ({} bytes, {}ms)",
        capture.path.display(),
        capture.byte_len,
        capture.duration_ms
    );
    Ok(capture)
}

/// Match `template_path` inside `scene_path` and apply the acceptance policy
pub async fn match_files(
    scene_path: &Path,
    template_path: &Path,
    matching: &MatchConfig,
    annotated_path: Option<&Path>,
) -> ProbeResult<Verdict> {
    let policy = matching.policy();
    let comparison_mode = policy.validate()?;

    let (scene, template) = load_scene_and_template(scene_path, template_path).await?;
    let result = match_images(&scene, &template, matching.method)?;
    let present = decide(&result, &policy)?;
    log::info!(
        "{} in {}: {result} ({comparison_mode}, threshold {}) -> {}",
        template_path.display(),
        scene_path.display(),
        policy.threshold,
        if present { "present" } else { "absent" }
    );

    if let Some(path) = annotated_path {
        save_annotated(&annotate(&scene, &result), path)?;
    }

    Ok(Verdict {
        present,
        result,
        threshold: policy.threshold,
        comparison_mode,
        screenshot_path: scene_path.to_path_buf(),
        annotated_path: annotated_path.map(Path::to_path_buf),
    })
}

/// Full run: validate, capture, match, decide
pub async fn run(config: &ProbeConfig) -> ProbeResult<Verdict> {
    config.validate()?;
    capture_screenshot(&config.session, &config.screenshot_path).await?;
    match_files(
        &config.screenshot_path,
        &config.template_path,
        &config.matching,
        config.annotated_path.as_deref(),
    )
    .await
}
