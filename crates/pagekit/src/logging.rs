#![forbid(unsafe_code)]

//! Console logging setup for hosts that do not install their own subscriber.
//!
//! Filters follow `RUST_LOG` when it is set. A global subscriber can be
//! installed only once per process; later calls return the error from
//! `tracing-subscriber` instead of panicking.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::prelude::*;

/// Install a fmt subscriber filtered by `RUST_LOG`, defaulting to `info`.
///
/// # Errors
///
/// When a global subscriber is already installed.
pub fn init() -> Result<(), TryInitError> {
    init_with_filter("info")
}

/// Install a fmt subscriber with `default_filter` unless `RUST_LOG` is set.
///
/// # Errors
///
/// When a global subscriber is already installed.
pub fn init_with_filter(default_filter: &str) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
}
