//! Tracing subscriber for the binary.
//!
//! # Priority (highest to lowest)
//!
//! 1. `RENDERCHECK_LOG` env var (directives, e.g. `rendercheck=debug,warn`)
//! 2. `RUST_LOG`
//! 3. `--debug-plugin` → `debug`
//! 4. `warn`

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "RENDERCHECK_LOG";

pub fn default_level(debug: bool) -> Level {
    if debug {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Installs the global subscriber writing to stderr. A second call is a
/// no-op.
pub fn init(debug: bool, ansi: bool) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(debug);

    let registry = tracing_subscriber::registry().with(build_env_filter(debug));
    let installed = if debug {
        registry.with(layer.with_timer(fmt::time::uptime())).try_init()
    } else {
        registry.with(layer.without_time().compact()).try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

fn build_env_filter(debug: bool) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV) {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            return filter;
        }
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = default_level(debug);
    EnvFilter::try_new(level.as_str()).unwrap_or_else(|_| EnvFilter::new("warn"))
}
