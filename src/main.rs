// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coach onboarding CLI
//!
//! Records a runner's capability, negotiates a feasible goal with the
//! planning service and shows the resulting training plan.

use clap::Parser;
use coach_onboarding::{
    cli::{self, Cli},
    config::{Config, LogFormat},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Load configuration from environment
    let config = Config::from_env()?;
    init_logging(config.log_format, args.log_level.as_deref())?;
    tracing::debug!(api = %config.api_base_url, "Configuration loaded");

    let state = AppState::from_config(config);

    if let Err(e) = cli::run(&state, args.command).await {
        tracing::debug!(code = e.code(), "Command failed");
        if e.is_auth_error() {
            eprintln!("Error: {}. Log in again with `coach login`.", e);
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Directives used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "coach_onboarding=info,warn";

/// `RUST_LOG` if set, else the defaults, plus the `--log-level` directive.
fn log_filter(rust_log: Option<&str>, level: Option<&str>) -> anyhow::Result<EnvFilter> {
    let mut filter = match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::new(DEFAULT_LOG_FILTER),
    };
    if let Some(level) = level {
        filter = filter.add_directive(level.parse()?);
    }
    Ok(filter)
}

/// Initialize logging to stderr, as text or structured JSON.
fn init_logging(format: LogFormat, level: Option<&str>) -> anyhow::Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(rust_log.as_deref(), level)?;

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }

    Ok(())
}
