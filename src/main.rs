//! `animegan-serve` - Anime stylization web UI.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use animegan_serve::server::{self, AppState};
use animegan_serve::{ModelConfig, ServerConfig, StyleVariant, Stylizer};

/// Serve a single-page web UI that turns photos into anime-style images.
#[derive(Parser, Debug)]
#[command(name = "animegan-serve")]
#[command(version, about, long_about = None)]
struct Args {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value = "8501")]
    port: u16,

    /// Model to serve: face2paint (AnimeGANv2) or hayao (AnimeGANv3).
    #[arg(
        long,
        env = "ANIMEGAN_VARIANT",
        default_value = "hayao",
        value_name = "NAME",
        value_parser = parse_variant
    )]
    variant: StyleVariant,

    /// Model file to load instead of the variant's default location.
    #[arg(long, env = "ANIMEGAN_MODEL_PATH", value_name = "FILE")]
    model_path: Option<PathBuf>,

    /// URL to download the model from when no local copy exists.
    #[arg(long, env = "ANIMEGAN_MODEL_URL", value_name = "URL")]
    model_url: Option<String>,

    /// Directory for downloaded models.
    #[arg(long, env = "ANIMEGAN_CACHE_DIR", value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Run on CPU even if a GPU is available.
    #[arg(long, env = "ANIMEGAN_FORCE_CPU")]
    cpu: bool,

    /// Largest accepted upload, in MiB.
    #[arg(long, env = "MAX_UPLOAD_MB", default_value = "20", value_name = "INT")]
    max_upload_mb: usize,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("animegan_serve={log_level},tower_http={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn parse_variant(s: &str) -> Result<StyleVariant, String> {
    s.parse().map_err(|e: animegan_serve::Error| e.to_string())
}

fn run(args: Args) -> Result<()> {
    // Build configuration
    let model_config = ModelConfig {
        variant: args.variant,
        model_path: args.model_path,
        model_url: args.model_url,
        cache_dir: args.cache_dir,
        force_cpu: args.cpu,
    };

    let server_config = ServerConfig {
        host: args.host,
        port: args.port,
        max_upload_mb: args.max_upload_mb,
    };
    server_config
        .validate()
        .context("Invalid server configuration")?;

    // The model may be downloaded with a blocking client, so load it before
    // the async runtime starts.
    let stylizer = Stylizer::load(&model_config).context("Failed to load stylization model")?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime
        .block_on(server::serve(AppState::new(stylizer, server_config)))
        .context("Server error")?;

    Ok(())
}
