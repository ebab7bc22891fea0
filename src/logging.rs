//! Tracing subscriber setup for the CLI.
//!
//! Logs go to stderr so command output on stdout stays clean for piping.
//! `RUST_LOG` takes precedence over the built-in default filter.

use anyhow::{Context, Result};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "brand_console=debug"
    } else {
        "brand_console=info"
    }
}

fn build_env_filter(verbose: bool) -> Result<EnvFilter> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(spec) if !spec.trim().is_empty() => {
            EnvFilter::try_new(&spec).with_context(|| format!("Invalid RUST_LOG filter '{}'", spec))
        }
        _ => EnvFilter::try_new(default_directive(verbose)).context("Invalid default log filter"),
    }
}

/// Install the global subscriber. Call once, before any command runs.
pub fn init(verbose: bool, json: bool) -> Result<()> {
    let env_filter = build_env_filter(verbose)?;
    let console = layer().with_writer(std::io::stderr).with_target(verbose);
    let boxed = if json {
        console.json().with_ansi(false).boxed()
    } else {
        console.compact().boxed()
    };
    tracing_subscriber::registry()
        .with(env_filter)
        .with(boxed)
        .try_init()
        .context("Failed to install the log subscriber")
}
