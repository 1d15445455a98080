use appium_image_match::template_matching::{ComparisonMode, MatchConfig, MatchMethod};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "appium-image-match", version)]
#[command(about = "Check whether a template image is visible on a mobile device screen")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Capture a screenshot from the device and look for the template
    Run {
        /// Probe configuration (JSON)
        #[arg(short, long, default_value = "probe.json")]
        config: PathBuf,

        /// Template image, overrides templatePath
        #[arg(long)]
        template: Option<PathBuf>,

        /// Screenshot destination, overrides screenshotPath
        #[arg(long)]
        screenshot: Option<PathBuf>,

        #[command(flatten)]
        matching: MatchArgs,
    },

    /// Look for a template in an existing screenshot, no device needed
    Match {
        /// Screenshot to search in
        scene: PathBuf,

        /// Image to look for
        template: PathBuf,

        #[command(flatten)]
        matching: MatchArgs,
    },

    /// Capture a screenshot only
    Capture {
        /// Probe configuration (JSON)
        #[arg(short, long, default_value = "probe.json")]
        config: PathBuf,

        /// Screenshot destination, overrides screenshotPath
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a starter configuration file
    Init {
        #[arg(default_value = "probe.json")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Default, clap::Args)]
pub struct MatchArgs {
    /// Acceptance threshold
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// ccoeff-normed, ccorr-normed, ccorr, sqdiff or sqdiff-normed
    #[arg(short, long)]
    pub method: Option<MatchMethod>,

    /// higher-is-better or lower-is-better (default: natural for the method)
    #[arg(long)]
    pub mode: Option<ComparisonMode>,

    /// Save the screenshot with the match box drawn on it
    #[arg(short, long)]
    pub annotate: Option<PathBuf>,

    /// Wait for Enter after writing the annotated image (needs --annotate)
    #[arg(long, requires = "annotate")]
    pub show: bool,

    /// Print the verdict as JSON
    #[arg(long)]
    pub json: bool,
}

impl MatchArgs {
    pub fn apply(&self, config: &mut MatchConfig) {
        if let Some(method) = self.method {
            config.method = method;
            // a mode chosen for the old method no longer applies
            config.comparison_mode = None;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(mode) = self.mode {
            config.comparison_mode = Some(mode);
        }
    }
}
