mod args;

use appium_image_match::pipeline::{self, Verdict};
use appium_image_match::session::{
    BackendKind, DEFAULT_SERVER_URL, PlatformDescriptor, SessionConfig,
};
use appium_image_match::template_matching::{MatchConfig, visualizer};
use appium_image_match::{ProbeConfig, ProbeError, ProbeResult};
use args::{Args, Command, MatchArgs};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match execute(args.command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {} step failed: {e}", e.step());
            if e.is_configuration_bug() {
                eprintln!("   Check the configuration file and command-line flags.");
            }
            ExitCode::from(2)
        }
    }
}

async fn execute(command: Command) -> ProbeResult<ExitCode> {
    match command {
        Command::Run {
            config,
            template,
            screenshot,
            matching,
        } => {
            let mut config = ProbeConfig::load(&config)?;
            if let Some(template) = template {
                config.template_path = template;
            }
            if let Some(screenshot) = screenshot {
                config.screenshot_path = screenshot;
            }
            if let Some(annotated) = &matching.annotate {
                config.annotated_path = Some(annotated.clone());
            }
            matching.apply(&mut config.matching);

            println!(
                "📱 Probing {} for {}",
                config
                    .session
                    .platform
                    .device_id
                    .as_deref()
                    .unwrap_or("the default device"),
                config.template_path.display()
            );
            let verdict = pipeline::run(&config).await?;
            report(&verdict, &matching).await
        }
        Command::Match {
            scene,
            template,
            matching,
        } => {
            let mut config = MatchConfig::default();
            matching.apply(&mut config);
            let verdict =
                pipeline::match_files(&scene, &template, &config, matching.annotate.as_deref())
                    .await?;
            report(&verdict, &matching).await
        }
        Command::Capture { config, output } => {
            let config = ProbeConfig::load(&config)?;
            let destination = output.unwrap_or(config.screenshot_path);
            let capture = pipeline::capture_screenshot(&config.session, &destination).await?;
            println!(
                "✅ Screenshot ({}ms) saved to {}",
                capture.duration_ms,
                capture.path.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Init { path, force } => {
            if path.exists() && !force {
                return Err(ProbeError::invalid_config(format!(
                    "{} already exists, pass --force to overwrite",
                    path.display()
                )));
            }
            starter_config().save(&path)?;
            println!("📝 Wrote starter config to {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn report(verdict: &Verdict, matching: &MatchArgs) -> ProbeResult<ExitCode> {
    if matching.json {
        println!("{}", serde_json::to_string_pretty(verdict)?);
    } else {
        let icon = if verdict.present { "✅" } else { "❌" };
        println!(
            "{icon} Template {} at ({},{}) score={:.4} threshold={} ({})",
            if verdict.present { "found" } else { "not found" },
            verdict.result.location.0,
            verdict.result.location.1,
            verdict.result.score,
            verdict.threshold,
            verdict.comparison_mode
        );
    }

    if matching.show
        && let Some(path) = verdict.annotated_path.as_deref()
    {
        visualizer::display(path).await?;
    }

    Ok(if verdict.present {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn starter_config() -> ProbeConfig {
    ProbeConfig {
        session: SessionConfig {
            backend: BackendKind::Appium,
            server_url: DEFAULT_SERVER_URL.to_string(),
            platform: PlatformDescriptor {
                platform_name: Some("Android".into()),
                platform_version: Some("11".into()),
                device_id: Some("emulator-5554".into()),
                automation_name: Some("UiAutomator2".into()),
                ..Default::default()
            },
        },
        template_path: PathBuf::from("template.png"),
        annotated_path: Some(PathBuf::from("match.png")),
        ..Default::default()
    }
}
