#![forbid(unsafe_code)]

//! Transient notifications ("toasts").
//!
//! The [`NotificationSurface`] owns a single container element, created on
//! the first [`notify`](NotificationSurface::notify) and appended to
//! `<body>`. Each notification walks a short lifecycle driven by scheduler
//! tasks:
//!
//! ```text
//! Visible --(notify_visible)--> Fading --(notify_fade)--> removed
//!    |                            |
//!    +-------- dismiss ----------+--> removed (pending timer cancelled)
//! ```
//!
//! # Invariants
//!
//! 1. At most one container exists per surface.
//! 2. Every live notification has exactly one pending timer.
//! 3. Removal is idempotent: a notification already detached or already
//!    removed is never touched again.
//!
//! # Failure Modes
//!
//! - A host that detached the container by hand gets it re-appended on the
//!   next `notify`.

use std::fmt;
use std::time::Duration;

use pagekit_core::{Document, NodeId};
use pagekit_runtime::{Scheduler, SiteConfig, TaskId};

use crate::behavior::Task;

const CONTAINER_CLASS: &str = "position-fixed top-0 end-0 p-3";
const CLOSE_CLASS: &str = "btn-close";
const SHOW_CLASS: &str = "show";

/// Visual severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Danger,
}

impl Severity {
    /// Lenient parse; empty or unknown names fall back to [`Severity::Info`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "success" => Self::Success,
            "danger" => Self::Danger,
            _ => Self::Info,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl NotificationId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    Visible,
    Fading,
}

/// A live notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub node: NodeId,
    pub message: String,
    pub severity: Severity,
    pub created_at: Duration,
    pub phase: NotificationPhase,
    timer: TaskId,
}

/// Owner of the notification container and every live notification.
#[derive(Debug, Clone)]
pub struct NotificationSurface {
    container: Option<NodeId>,
    live: Vec<Notification>,
    next_id: u64,
    visible_for: Duration,
    fade_for: Duration,
}

impl NotificationSurface {
    #[must_use]
    pub const fn new(visible_for: Duration, fade_for: Duration) -> Self {
        Self {
            container: None,
            live: Vec::new(),
            next_id: 0,
            visible_for,
            fade_for,
        }
    }

    #[must_use]
    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.notify_visible(), config.notify_fade())
    }

    /// Container element, once created.
    #[must_use]
    pub const fn container(&self) -> Option<NodeId> {
        self.container
    }

    /// Live notifications in creation order.
    #[must_use]
    pub fn live(&self) -> &[Notification] {
        &self.live
    }

    #[must_use]
    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.live.iter().find(|n| n.id == id)
    }

    fn ensure_container(&mut self, doc: &mut Document) -> NodeId {
        let body = doc.body();
        if let Some(container) = self.container {
            if !doc.is_connected(container) {
                if let Err(err) = doc.append_child(body, container) {
                    tracing::debug!(%err, %container, "notification container not reattached");
                }
            }
            return container;
        }
        let container = doc
            .build("div")
            .class(CONTAINER_CLASS)
            .style("z-index", "9999")
            .finish();
        if let Err(err) = doc.append_child(body, container) {
            tracing::debug!(%err, %container, "notification container not attached");
        }
        tracing::debug!(%container, "notification container created");
        self.container = Some(container);
        container
    }

    /// Show `message` and schedule its fade-out.
    pub fn notify(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler<Task>,
        message: &str,
        severity: impl Into<Option<Severity>>,
    ) -> NotificationId {
        let severity = severity.into().unwrap_or_default();
        let container = self.ensure_container(doc);

        let id = NotificationId(self.next_id);
        self.next_id += 1;

        let node = doc
            .build("div")
            .class(&format!(
                "alert alert-{severity} alert-dismissible fade {SHOW_CLASS}"
            ))
            .attr("role", "alert")
            .text(message)
            .finish();
        let close = doc
            .build("button")
            .attr("type", "button")
            .class(CLOSE_CLASS)
            .attr("aria-label", "Close")
            .finish();
        if let Err(err) = doc
            .append_child(node, close)
            .and_then(|()| doc.append_child(container, node))
        {
            tracing::debug!(%err, %id, "notification not attached");
        }

        let timer = scheduler.schedule(self.visible_for, Task::FadeNotification(id));
        tracing::info!(%id, %severity, text = message, "notification shown");
        self.live.push(Notification {
            id,
            node,
            message: message.to_owned(),
            severity,
            created_at: scheduler.now(),
            phase: NotificationPhase::Visible,
            timer,
        });
        id
    }

    /// Start the fade of a visible notification.
    pub fn begin_fade(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler<Task>,
        id: NotificationId,
    ) -> bool {
        let fade_for = self.fade_for;
        let Some(entry) = self.live.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        if entry.phase != NotificationPhase::Visible {
            return false;
        }
        doc.remove_class(entry.node, SHOW_CLASS);
        entry.phase = NotificationPhase::Fading;
        entry.timer = scheduler.schedule(fade_for, Task::RemoveNotification(id));
        tracing::trace!(%id, "notification fading");
        true
    }

    /// Detach a notification. Returns `false` when it was already gone.
    pub fn remove(&mut self, doc: &mut Document, id: NotificationId) -> bool {
        let Some(pos) = self.live.iter().position(|n| n.id == id) else {
            return false;
        };
        let entry = self.live.remove(pos);
        if doc.parent(entry.node).is_some() {
            doc.detach(entry.node);
        }
        tracing::debug!(%id, "notification removed");
        true
    }

    /// Remove immediately and cancel the pending timer.
    pub fn dismiss(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler<Task>,
        id: NotificationId,
    ) -> bool {
        let Some(timer) = self.get(id).map(|n| n.timer) else {
            return false;
        };
        scheduler.cancel(timer);
        self.remove(doc, id)
    }

    /// Route a click to a close button. Returns `true` when it dismissed one.
    pub fn handle_click(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler<Task>,
        target: NodeId,
    ) -> bool {
        let Some(close) = doc.closest(target, |el| el.has_class(CLOSE_CLASS)) else {
            return false;
        };
        let Some(id) = self
            .live
            .iter()
            .find(|n| doc.contains(n.node, close))
            .map(|n| n.id)
        else {
            return false;
        };
        self.dismiss(doc, scheduler, id)
    }

    /// Run a notification task. Returns `false` for tasks owned elsewhere.
    pub fn run_task(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler<Task>,
        task: &Task,
    ) -> bool {
        match task {
            Task::FadeNotification(id) => {
                self.begin_fade(doc, scheduler, *id);
                true
            }
            Task::RemoveNotification(id) => {
                self.remove(doc, *id);
                true
            }
            _ => false,
        }
    }
}
