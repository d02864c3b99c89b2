#![forbid(unsafe_code)]

//! pagekit: progressive enhancement for brochure sites, driven from Rust.
//!
//! The crate re-exports the workspace pieces and adds the [`App`]
//! coordinator:
//!
//! - [`pagekit_core`]: document model and events,
//! - [`pagekit_runtime`]: virtual-time scheduler, throttle/debounce, module
//!   lifecycle, [`SiteConfig`],
//! - [`pagekit_widgets`]: the page behaviours.
//!
//! Most hosts only need the [`prelude`].

pub mod app;
pub mod error;
#[cfg(feature = "tracing-fmt")]
pub mod logging;
pub mod prelude;

pub use app::{App, Dispatch, ModuleStatus};
pub use error::AppError;

pub use pagekit_core;
pub use pagekit_runtime;
pub use pagekit_widgets;

pub use pagekit_core::{Document, DomError, Event, KeyCode, KeyEvent, Modifiers, NodeId};
pub use pagekit_runtime::{ConfigError, ModuleId, RuntimeError, SiteConfig};
pub use pagekit_widgets::{Effect, FieldValue, FormData, NotificationId, Severity};
