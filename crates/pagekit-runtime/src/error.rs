#![forbid(unsafe_code)]

//! Runtime error type.

use std::fmt;
use std::time::Duration;

use crate::config::ConfigError;

/// Errors raised while driving page time or loading configuration.
#[derive(Debug)]
pub enum RuntimeError {
    /// One advance ran more timer tasks than allowed; usually a task that
    /// keeps rescheduling itself with zero delay.
    StepLimitExceeded {
        limit: usize,
        now: Duration,
        pending: usize,
    },
    /// `advance_to` was asked to move into the past.
    ClockRegression { now: Duration, target: Duration },
    /// Configuration could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StepLimitExceeded {
                limit,
                now,
                pending,
            } => write!(
                f,
                "timer step limit {limit} exceeded at {}ms ({pending} tasks pending)",
                now.as_millis()
            ),
            Self::ClockRegression { now, target } => write!(
                f,
                "cannot move clock from {}ms back to {}ms",
                now.as_millis(),
                target.as_millis()
            ),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for RuntimeError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
