/// Template matching module for checking whether a UI element is on screen
///
/// This module provides:
/// - Image loading, with scene and template decoded concurrently
/// - Best-match location and score through imageproc, or the zero-mean
///   correlation coefficient computed here
/// - The acceptance decision (threshold + comparison mode)
/// - Optional bounding-box rendering for debugging
pub mod ccoeff;
pub mod config;
pub mod decision;
pub mod matcher;
pub mod types;
pub mod visualizer;


pub use config::{MatchConfig, create_sqdiff_config, create_strict_config};
pub use decision::{DecisionPolicy, decide};
pub use matcher::{load_image, load_scene_and_template, match_images, match_template};
pub use types::{ComparisonMode, MatchMethod, MatchResult};
