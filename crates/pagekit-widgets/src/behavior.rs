#![forbid(unsafe_code)]

//! Plumbing shared by every page behaviour.
//!
//! A behaviour is a [`Behavior`] implementation: it resolves its document
//! handles once in [`Behavior::mount`], then reacts to events in
//! [`Behavior::handle`] and to its own timers in [`Behavior::run_task`]. All
//! side effects go through the [`Cx`] handed in by the coordinator:
//!
//! - document mutations (`cx.doc`),
//! - timed follow-ups (`cx.schedule`, returning cancellable [`TaskId`]s),
//! - notifications (`cx.notify`),
//! - host effects the document model cannot perform (`cx.emit`).
//!
//! # Dispatch phases
//!
//! Listeners bound to specific elements run in [`Phase::Target`]; listeners
//! bound to the document or window run in [`Phase::Document`]. The
//! coordinator runs the target phase for every active behaviour first and
//! skips the document phase when a target listener stopped propagation.

use std::time::Duration;

use pagekit_core::{Document, Event, NodeId};
use pagekit_runtime::{ModuleId, Scheduler, SiteConfig, TaskId};

use crate::forms::FormData;
use crate::notify::{NotificationId, NotificationSurface, Severity};

/// Class of the page header measured for scroll offsets.
pub const HEADER_CLASS: &str = "l-header";

/// Listener placement for one dispatch pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Listeners attached to specific elements.
    Target,
    /// Listeners attached to the document or window.
    Document,
}

/// Timed work owned by the coordinator's scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Start the fade-out of a notification.
    FadeNotification(NotificationId),
    /// Detach a faded notification.
    RemoveNotification(NotificationId),
    /// Finish the simulated submission of a form.
    CompleteSubmission(NodeId),
    /// Leave the page for `href`.
    Redirect(String),
}

/// Side effects only the host can carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Scroll the window to a document offset.
    ScrollTo { top: f64, smooth: bool },
    /// Navigate the window.
    Navigate { href: String },
    /// A form passed validation; this is what would have been sent.
    FormCollected { form: NodeId, data: FormData },
}

/// Outcome flags of one event dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFlow {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

/// Result of mounting a behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mount {
    /// Handles resolved; the behaviour receives events.
    Active,
    /// Required document anchors are missing; the behaviour stays inert.
    Skipped(&'static str),
}

/// Context for one callback.
pub struct Cx<'a> {
    pub doc: &'a mut Document,
    pub config: &'a SiteConfig,
    scheduler: &'a mut Scheduler<Task>,
    notifications: &'a mut NotificationSurface,
    effects: &'a mut Vec<Effect>,
    flow: EventFlow,
}

impl std::fmt::Debug for Cx<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cx")
            .field("now", &self.scheduler.now())
            .field("flow", &self.flow)
            .finish_non_exhaustive()
    }
}

impl<'a> Cx<'a> {
    pub fn new(
        doc: &'a mut Document,
        config: &'a SiteConfig,
        scheduler: &'a mut Scheduler<Task>,
        notifications: &'a mut NotificationSurface,
        effects: &'a mut Vec<Effect>,
    ) -> Self {
        Self {
            doc,
            config,
            scheduler,
            notifications,
            effects,
            flow: EventFlow::default(),
        }
    }

    /// Page time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn schedule(&mut self, delay: Duration, task: Task) -> TaskId {
        self.scheduler.schedule(delay, task)
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.scheduler.cancel(id)
    }

    /// Show a notification on the shared surface.
    pub fn notify(
        &mut self,
        message: &str,
        severity: impl Into<Option<Severity>>,
    ) -> NotificationId {
        self.notifications
            .notify(self.doc, self.scheduler, message, severity)
    }

    pub fn emit(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn prevent_default(&mut self) {
        self.flow.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.flow.propagation_stopped = true;
    }

    #[must_use]
    pub const fn flow(&self) -> EventFlow {
        self.flow
    }
}

/// An independently initialisable unit of page behaviour.
pub trait Behavior {
    /// Lifecycle slot of this behaviour.
    fn module(&self) -> ModuleId;

    /// Resolve document handles and perform one-time setup.
    fn mount(&mut self, cx: &mut Cx<'_>) -> Mount;

    /// React to an event in the given phase.
    fn handle(&mut self, phase: Phase, event: &Event, cx: &mut Cx<'_>) {
        let _ = (phase, event, cx);
    }

    /// Run a scheduled task. Returns `true` when the task belonged to this
    /// behaviour.
    fn run_task(&mut self, task: &Task, cx: &mut Cx<'_>) -> bool {
        let _ = (task, cx);
        false
    }
}

/// Height of `.l-header`, or the configured default when it is missing or
/// unmeasured.
#[must_use]
pub fn header_height(doc: &Document, config: &SiteConfig) -> f64 {
    doc.find(doc.root(), |el| el.has_class(HEADER_CLASS))
        .map(|header| doc.offset_height(header))
        .filter(|height| *height > 0.0)
        .unwrap_or(config.default_header_height)
}
