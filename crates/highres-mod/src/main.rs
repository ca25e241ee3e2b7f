//! HighresScreenshots standalone host.
//!
//! Drives the mod lifecycle the way the game would: pre-init against a
//! config directory, post-init, then a fixed-rate tick loop until Ctrl-C.
//! Useful for exercising the settings file and its live reload outside the
//! game.
//!
//! # Usage
//!
//! ```text
//! highres-screenshots [--config-dir DIR] [--width N] [--height N]
//!                     [--format PNG|JPEG|BMP] [--tick-rate TPS]
//! ```
//!
//! Set `RUST_LOG=debug` to see reload activity.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use highres_core::ScreenshotFormat;
use highres_mod::{paths, HighresScreenshots};

const DEFAULT_TICK_RATE: u32 = 20;
const MAX_TICK_RATE: i64 = 1000;

#[derive(Debug, Parser)]
#[command(
    name = "highres-screenshots",
    about = "Screenshot resolution settings host with live file reload",
    version
)]
struct Cli {
    /// Directory holding `highres_screenshots.cfg`.
    ///
    /// Defaults to the platform config directory.
    #[arg(long, env = "HIGHRES_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Screenshot width to set after loading.
    #[arg(long)]
    width: Option<u32>,

    /// Screenshot height to set after loading.
    #[arg(long)]
    height: Option<u32>,

    /// Screenshot format to set after loading (PNG, JPEG or BMP).
    #[arg(long)]
    format: Option<ScreenshotFormat>,

    /// Ticks per second, between 1 and 1000.
    #[arg(
        long,
        default_value_t = DEFAULT_TICK_RATE,
        env = "HIGHRES_TICK_RATE",
        value_parser = clap::value_parser!(u32).range(1..=MAX_TICK_RATE)
    )]
    tick_rate: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => paths::config_dir().context("pass --config-dir explicitly")?,
    };

    let mut mod_ = HighresScreenshots::new();
    mod_.events()
        .subscribe(|event| info!("screenshot settings changed: {event:?}"));

    mod_.on_pre_init(&config_dir)
        .with_context(|| format!("loading settings from {}", config_dir.display()))?;

    // ── Command-line overrides ────────────────────────────────────────────────
    if let Some(width) = cli.width {
        mod_.config_mut().set_width(width);
    }
    if let Some(height) = cli.height {
        mod_.config_mut().set_height(height);
    }
    if let Some(format) = cli.format {
        mod_.config_mut().set_format(format);
    }

    mod_.on_post_init();

    let state = mod_.config().state();
    info!(
        "screenshots will be {}x{} {}",
        state.width, state.height, state.format
    );

    // ── Tick loop ─────────────────────────────────────────────────────────────
    let mut ticker = tokio::time::interval(Duration::from_secs(1) / cli.tick_rate);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => mod_.on_tick(),
            result = &mut shutdown => {
                if let Err(e) = result {
                    error!("failed to listen for shutdown signal: {e}");
                }
                break;
            }
        }
    }

    info!("HighresScreenshots stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_rate_defaults_to_twenty() {
        let cli = Cli::try_parse_from(["highres-screenshots"]).expect("parse");
        assert_eq!(cli.tick_rate, 20);
    }

    #[test]
    fn test_tick_rate_outside_range_is_rejected() {
        assert!(Cli::try_parse_from(["highres-screenshots", "--tick-rate", "0"]).is_err());
        assert!(Cli::try_parse_from(["highres-screenshots", "--tick-rate", "2000000000"]).is_err());
        assert!(Cli::try_parse_from(["highres-screenshots", "--tick-rate", "1000"]).is_ok());
    }

    #[test]
    fn test_format_flag_is_case_insensitive() {
        let cli = Cli::try_parse_from(["highres-screenshots", "--format", "jpeg"]).expect("parse");
        assert_eq!(cli.format, Some(ScreenshotFormat::Jpeg));
    }
}
