//! Tracing setup
//!
//! The terminal is owned by the UI, so events only go to a log file. Without
//! `--log-file` no subscriber is installed and every event is dropped.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::{LogArgs, DEFAULT_LOG_FILTER};

/// `RUST_LOG` wins; otherwise the configured directives, then the default
pub fn build_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

pub fn init_logging(args: &LogArgs) -> io::Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .with_filter(build_filter(&args.log_filter));

    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .map_err(|err| io::Error::other(format!("failed to install logger: {err}")))?;

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(())
}
