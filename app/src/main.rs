//! Main application entry point for the photo admin console.

mod config;

use clap::Parser;
use std::path::PathBuf;
use tracing_appender::rolling;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "photoadmin",
    author,
    version,
    about = "Photo gallery admin console"
)]
struct Cli {
    /// Override log level (e.g. info, debug)
    #[arg(long)]
    log_level: Option<String>,
    /// Base URL of the admin API server
    #[arg(long)]
    api_url: Option<String>,
    /// Override number of concurrent thumbnail downloads
    #[arg(long)]
    thumbnails_preload: Option<usize>,
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = config::AppConfigOverrides {
        log_level: cli.log_level.clone(),
        api_base_url: cli.api_url.clone(),
        thumbnails_preload: cli.thumbnails_preload,
    };
    let cfg = config::AppConfig::load_from(cli.config.clone()).apply_overrides(&overrides);

    let cache_dir = cfg.cache_path.clone();
    std::fs::create_dir_all(&cache_dir)?;
    let file_appender = rolling::daily(&cache_dir, "photoadmin.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cfg.log_level.clone()))
        .with_writer(std::io::stdout.and(file_writer))
        .init();

    tracing::info!("starting photo admin console against {}", cfg.api_base_url);

    ui::run(cfg.api_base_url, cache_dir, cfg.thumbnails_preload)?;
    Ok(())
}
