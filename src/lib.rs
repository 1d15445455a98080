pub mod config;
pub mod error;
pub mod pipeline;
pub mod session;
pub mod template_matching;

pub use config::ProbeConfig;
pub use error::{ProbeError, ProbeResult};
pub use pipeline::{Verdict, capture_screenshot, match_files, run};
