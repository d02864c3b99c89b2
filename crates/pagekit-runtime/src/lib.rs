#![forbid(unsafe_code)]

//! Runtime services for pagekit behaviours.
//!
//! - [`clock`]: page-relative time sources (virtual and wall clock).
//! - [`scheduler`]: cancellable timed tasks advanced on virtual time.
//! - [`timing`]: leading-edge throttle and last-call-wins debounce.
//! - [`lifecycle`]: init-once flags for page modules.
//! - [`config`]: [`SiteConfig`] tunables, optionally loaded from TOML.
//!
//! Nothing here touches the document; the widgets crate composes these
//! pieces into page behaviours.

pub mod clock;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod scheduler;
pub mod timing;

pub use clock::{Clock, SystemClock, VirtualClock};
pub use config::{ConfigError, SiteConfig};
pub use error::RuntimeError;
pub use lifecycle::{Lifecycle, ModuleId, ModuleSet};
pub use scheduler::{PendingTask, Scheduler, TaskId};
pub use timing::{Debounce, Debounced, Throttle, Throttled};
