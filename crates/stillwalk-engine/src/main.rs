//! # Stillwalk Engine
//!
//! Headless entry point for Stillwalk.
//!
//! Loads `stillwalk.toml` (or the path given as the first argument), the
//! level set and an input script, then runs the gameplay simulation and
//! prints the final frame snapshot as JSON.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod script;
mod timing;

use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{EngineConfig, CONFIG_FILE};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    let filter = EnvFilter::from_default_env().add_directive("stillwalk=info".parse()?);
    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var_os("STILLWALK_LOG_JSON").is_some() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }

    info!("Stillwalk starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    let config = EngineConfig::load_from(&config_path);
    if !config_path.exists() {
        if let Err(e) = config.save_to(&config_path) {
            warn!("Could not write default config: {e}");
        }
    }

    app::run(config)?;

    info!("Stillwalk shutdown complete");
    Ok(())
}
