#![forbid(unsafe_code)]

//! Facade error type.

use std::fmt;

use pagekit_core::DomError;
use pagekit_runtime::{ConfigError, RuntimeError};

/// Host misuse reported by [`App`](crate::App).
///
/// Page-level problems (missing anchors, invalid form input, broken images)
/// are handled inside the behaviours and never surface here.
#[derive(Debug)]
pub enum AppError {
    /// An event or mutation named a node the document does not know.
    Dom(DomError),
    /// Driving page time failed.
    Runtime(RuntimeError),
    /// The supplied configuration is unusable.
    Config(ConfigError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dom(err) => write!(f, "document error: {err}"),
            Self::Runtime(err) => write!(f, "runtime error: {err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Dom(err) => Some(err),
            Self::Runtime(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<DomError> for AppError {
    fn from(err: DomError) -> Self {
        Self::Dom(err)
    }
}

impl From<RuntimeError> for AppError {
    fn from(err: RuntimeError) -> Self {
        Self::Runtime(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
