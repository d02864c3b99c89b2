#![forbid(unsafe_code)]

//! Common imports for hosts.

pub use crate::app::{App, Dispatch, ModuleStatus};
pub use crate::error::AppError;
pub use pagekit_core::{Document, Event, KeyCode, KeyEvent, Modifiers, NodeId, ReadyState};
pub use pagekit_runtime::{Clock, ModuleId, SiteConfig, SystemClock, VirtualClock};
pub use pagekit_widgets::{Effect, FieldValue, FormData, NotificationId, Severity};
