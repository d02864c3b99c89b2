#![forbid(unsafe_code)]

//! Page behaviours for pagekit.
//!
//! Each behaviour implements [`Behavior`] and owns one
//! [`ModuleId`](pagekit_runtime::ModuleId) slot. [`standard_behaviors`]
//! returns them in bootstrap order; the `pagekit` facade drives them.
//!
//! Shared building blocks:
//!
//! - [`focus_trap`]: Tab / Shift+Tab containment for open panels.
//! - [`scroll_lock`]: body scroll lock.
//! - [`notify`]: the notification surface.
//! - [`validation`]: contact-form field rules and field state machine.

pub mod accordion;
pub mod active_menu;
pub mod anchors;
pub mod behavior;
pub mod focus_trap;
pub mod forms;
pub mod images;
pub mod nav;
pub mod notify;
pub mod privacy_link;
pub mod scroll_lock;
pub mod scroll_spy;
pub mod scroll_top;
pub mod validation;

pub use accordion::Accordion;
pub use active_menu::ActiveMenu;
pub use anchors::Anchors;
pub use behavior::{Behavior, Cx, Effect, EventFlow, Mount, Phase, Task, header_height};
pub use focus_trap::{FocusTrap, TrapOutcome};
pub use forms::{FieldValue, FormData, Forms};
pub use images::Images;
pub use nav::NavToggle;
pub use notify::{Notification, NotificationId, NotificationSurface, Severity};
pub use privacy_link::PrivacyLinks;
pub use scroll_spy::ScrollSpy;
pub use scroll_top::ScrollToTop;
pub use validation::{Field, FieldError, FieldState, FormState, Reason, Rules, ValidationReport};

/// Every page behaviour, in bootstrap order.
#[must_use]
pub fn standard_behaviors() -> Vec<Box<dyn Behavior>> {
    vec![
        Box::new(NavToggle::new()),
        Box::new(Anchors::new()),
        Box::new(ActiveMenu::new()),
        Box::new(ScrollSpy::new()),
        Box::new(Images::new()),
        Box::new(Forms::new()),
        Box::new(Accordion::new()),
        Box::new(ScrollToTop::new()),
        Box::new(PrivacyLinks::new()),
    ]
}
