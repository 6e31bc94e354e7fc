use adam_capture::{Camera, CapturedImage, Countdown};
use adam_client::{
    analyze_or_mock, compare_or_mock, models_or_builtin, quick_or_mock, HttpScoringClient,
    ScoringService,
};
use adam_core::display::{self, GlossaryEntry};
use adam_core::{App, CaptureMode, Theme};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod config;
mod engine;
mod flow;
mod render;
mod session;

use config::Config;
use flow::Output;

#[derive(Parser)]
#[command(name = "adam", version, about = "Project Adam facial-aesthetics client")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    /// Colour scheme (dark or light)
    #[arg(long, global = true)]
    theme: Option<Theme>,
    /// Scoring service base URL
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a front and side photo
    Analyze {
        front: PathBuf,
        side: PathBuf,
        /// Backend model (see `adam models`)
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Fast analysis from the front photo only
    Quick {
        front: PathBuf,
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Score the same photos with every backend model
    Compare {
        front: PathBuf,
        side: Option<PathBuf>,
    },
    /// Take the photos interactively, then analyze
    Capture {
        /// Compare all models instead of a single analysis
        #[arg(long)]
        compare: bool,
        /// Do not open the camera; choose image files instead
        #[arg(long)]
        no_camera: bool,
        /// V4L2 device path
        #[arg(short, long)]
        device: Option<String>,
    },
    /// Show the canned demo result
    Demo {
        #[arg(long)]
        compare: bool,
    },
    /// List the backend models
    Models,
    /// Check that the scoring service is up
    Health,
    /// List V4L2 capture devices
    Devices,
    /// Explain an aesthetics term used in results (all terms if none given)
    Explain { term: Option<String> },
}

fn load_image(path: &Path) -> Result<CapturedImage> {
    CapturedImage::from_path(path).with_context(|| format!("cannot use {} as a photo", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }

    let output = if cli.json {
        Output::Json
    } else {
        Output::Styled {
            color: std::io::stdout().is_terminal(),
        }
    };
    let client = HttpScoringClient::new(&config.api_url, config.request_timeout())
        .context("failed to set up HTTP client")?;
    let mut app = App::new(config.theme);
    let mut stdout = std::io::stdout().lock();

    tracing::debug!(api_url = %config.api_url, model = %config.model, "adam starting");

    match cli.command {
        Commands::Analyze { front, side, model } => {
            let front = load_image(&front)?;
            let side = load_image(&side)?;
            let model = config.model_or(model);
            flow::run_once(
                &mut app,
                CaptureMode::Analyze,
                analyze_or_mock(&client, &front, &side, &model),
            )
            .await?;
            flow::show(&mut stdout, &app, output)?;
        }
        Commands::Quick { front, model } => {
            let front = load_image(&front)?;
            let model = config.model_or(model);
            flow::run_once(&mut app, CaptureMode::Analyze, quick_or_mock(&client, &front, &model)).await?;
            flow::show(&mut stdout, &app, output)?;
        }
        Commands::Compare { front, side } => {
            let front = load_image(&front)?;
            let side = side.as_deref().map(load_image).transpose()?;
            flow::run_once(
                &mut app,
                CaptureMode::Compare,
                compare_or_mock(&client, &front, side.as_ref()),
            )
            .await?;
            flow::show(&mut stdout, &app, output)?;
        }
        Commands::Capture {
            compare,
            no_camera,
            device,
        } => {
            let camera = if no_camera {
                None
            } else {
                let device = device.unwrap_or_else(|| config.camera_device.clone());
                match engine::open_camera(
                    &device,
                    config.max_capture_attempts,
                    config.warmup_frames,
                    config.jpeg_quality,
                ) {
                    Ok(handle) => Some(handle),
                    Err(e) => {
                        tracing::warn!(device = %device, error = %e, "camera unavailable");
                        eprintln!("Camera unavailable ({e}); choose image files with `f <path>`.");
                        None
                    }
                }
            };
            let mode = if compare {
                CaptureMode::Compare
            } else {
                CaptureMode::Analyze
            };
            let service: Arc<dyn ScoringService> = Arc::new(client);
            let mut interactive = flow::Interactive::new(
                app,
                service,
                camera,
                config.model_or(None),
                Countdown::new(config.countdown_secs),
                output,
            );
            let mut input = BufReader::new(tokio::io::stdin()).lines();
            interactive.run(mode, &mut input, &mut stdout).await?;
        }
        Commands::Demo { compare } => {
            let mode = if compare {
                CaptureMode::Compare
            } else {
                CaptureMode::Analyze
            };
            app.show_demo(mode)?;
            flow::show(&mut stdout, &app, output)?;
        }
        Commands::Models => {
            let (models, source) = models_or_builtin(&client).await;
            if cli.json {
                serde_json::to_writer_pretty(&mut stdout, &models)?;
                writeln!(stdout)?;
            } else {
                let palette = render::Palette::for_stdout(app.theme());
                render::models(&mut stdout, &models, source, &config.model, &palette)?;
            }
        }
        Commands::Health => {
            let status = client
                .health()
                .await
                .with_context(|| format!("scoring service at {} is not reachable", client.base_url()))?;
            if cli.json {
                serde_json::to_writer_pretty(&mut stdout, &status)?;
                writeln!(stdout)?;
            } else {
                let palette = render::Palette::for_stdout(app.theme());
                render::health(&mut stdout, client.base_url(), &status, &palette)?;
            }
        }
        Commands::Devices => {
            let devices = Camera::list_devices();
            render::devices(&mut stdout, &devices)?;
        }
        Commands::Explain { term } => {
            let entries: Vec<&GlossaryEntry> = match term {
                Some(term) => vec![display::lookup_term(&term)
                    .with_context(|| format!("unknown term {term:?}; run `adam explain` for the list"))?],
                None => display::GLOSSARY.iter().collect(),
            };
            let palette = render::Palette::for_stdout(app.theme());
            render::glossary(&mut stdout, &entries, &palette)?;
        }
    }

    Ok(())
}
