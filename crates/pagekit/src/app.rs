#![forbid(unsafe_code)]

//! The page coordinator.
//!
//! [`App`] owns everything a page needs: the [`Document`], the
//! [`SiteConfig`], the virtual-time [`Scheduler`], the notification surface,
//! the init-once [`Lifecycle`] and the behaviour modules. The host feeds it
//! events and time; it answers with document mutations and [`Effect`]s.
//!
//! ```
//! use pagekit::prelude::*;
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! doc.build("a").attr("href", "#privacy").append_to(body).unwrap();
//!
//! let mut app = App::with_defaults(doc);
//! app.boot();
//! assert_eq!(app.status(ModuleId::PrivacyLinks), ModuleStatus::Active);
//! ```
//!
//! # Invariants
//!
//! 1. Each module mounts at most once, however often `init` is called.
//! 2. Timer tasks run in `(due, insertion)` order; a task scheduled while
//!    another runs also runs in the same advance if it is due.
//! 3. The clock never moves backwards.
//!
//! # Failure Modes
//!
//! - Events naming unknown nodes are rejected with [`AppError::Dom`] before
//!   any behaviour sees them.
//! - A timer cascade longer than `timer_step_limit` aborts the advance with
//!   [`RuntimeError::StepLimitExceeded`]; the remaining tasks stay queued.

use std::time::Duration;

use pagekit_core::{Document, DomError, Event, ReadyState};
use pagekit_runtime::{Clock, Lifecycle, ModuleId, RuntimeError, Scheduler, SiteConfig};
use pagekit_widgets::{
    Behavior, Cx, Effect, Mount, NotificationId, NotificationSurface, Phase, Severity, Task,
    standard_behaviors,
};

use crate::error::AppError;

/// Outcome of [`App::dispatch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

/// Init state of one module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    /// Not initialised yet.
    Pending,
    /// Mounted and receiving events.
    Active,
    /// Initialised, but its document anchors were missing.
    Skipped(&'static str),
}

struct Slot {
    behavior: Box<dyn Behavior>,
    status: ModuleStatus,
}

/// Page coordinator.
pub struct App {
    doc: Document,
    config: SiteConfig,
    scheduler: Scheduler<Task>,
    surface: NotificationSurface,
    effects: Vec<Effect>,
    lifecycle: Lifecycle,
    slots: Vec<Slot>,
    awaiting_ready: bool,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("now", &self.scheduler.now())
            .field("initialized", &self.lifecycle.initialized())
            .field("pending_timers", &self.scheduler.pending())
            .field("notifications", &self.surface.live().len())
            .finish_non_exhaustive()
    }
}

impl App {
    /// Coordinator over `doc` with a validated `config`.
    ///
    /// # Errors
    ///
    /// [`AppError::Config`] when `config` fails validation.
    pub fn new(doc: Document, config: SiteConfig) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self::assemble(doc, config))
    }

    /// Coordinator with the stock configuration.
    #[must_use]
    pub fn with_defaults(doc: Document) -> Self {
        Self::assemble(doc, SiteConfig::default())
    }

    fn assemble(doc: Document, config: SiteConfig) -> Self {
        let surface = NotificationSurface::from_config(&config);
        let slots = standard_behaviors()
            .into_iter()
            .map(|behavior| Slot {
                behavior,
                status: ModuleStatus::Pending,
            })
            .collect();
        Self {
            doc,
            config,
            scheduler: Scheduler::new(),
            surface,
            effects: Vec::new(),
            lifecycle: Lifecycle::new(),
            slots,
            awaiting_ready: false,
        }
    }

    /// Initialise every module now, or on `DOMContentLoaded` while the
    /// document is still loading.
    pub fn boot(&mut self) {
        if self.doc.ready_state() == ReadyState::Loading {
            tracing::debug!("boot deferred until DOMContentLoaded");
            self.awaiting_ready = true;
        } else {
            self.init_all();
        }
    }

    /// Initialise every module in bootstrap order.
    pub fn init_all(&mut self) {
        let span = tracing::debug_span!("init_all");
        let _guard = span.enter();
        for module in ModuleId::ALL {
            self.init(module);
        }
    }

    /// Initialise one module. Repeated calls are no-ops.
    pub fn init(&mut self, module: ModuleId) -> ModuleStatus {
        if !self.lifecycle.begin(module) {
            return self.status(module);
        }
        let Some(slot) = self.slots.iter_mut().find(|s| s.behavior.module() == module) else {
            return ModuleStatus::Pending;
        };
        let mut cx = Cx::new(
            &mut self.doc,
            &self.config,
            &mut self.scheduler,
            &mut self.surface,
            &mut self.effects,
        );
        slot.status = match slot.behavior.mount(&mut cx) {
            Mount::Active => {
                tracing::debug!(%module, "module mounted");
                ModuleStatus::Active
            }
            Mount::Skipped(reason) => {
                tracing::debug!(%module, reason, "module skipped");
                ModuleStatus::Skipped(reason)
            }
        };
        slot.status
    }

    #[must_use]
    pub fn status(&self, module: ModuleId) -> ModuleStatus {
        self.slots
            .iter()
            .find(|s| s.behavior.module() == module)
            .map_or(ModuleStatus::Pending, |s| s.status)
    }

    /// Deliver one event.
    ///
    /// # Errors
    ///
    /// [`AppError::Dom`] when the event targets an unknown node.
    pub fn dispatch(&mut self, event: Event) -> Result<Dispatch, AppError> {
        let span = tracing::debug_span!("dispatch", kind = event.kind());
        let _guard = span.enter();

        if let Some(target) = event.target()
            && self.doc.element(target).is_none()
        {
            return Err(DomError::UnknownNode(target).into());
        }

        match event {
            Event::DomContentLoaded => {
                if self.doc.ready_state() == ReadyState::Loading {
                    self.doc.set_ready_state(ReadyState::Interactive);
                }
                if std::mem::take(&mut self.awaiting_ready) {
                    self.init_all();
                }
                return Ok(Dispatch::default());
            }
            Event::Scroll { y } => self.doc.viewport_mut().scroll_y = y,
            Event::Resize { width } => self.doc.viewport_mut().width = width,
            Event::Click(target) => {
                self.surface
                    .handle_click(&mut self.doc, &mut self.scheduler, target);
            }
            _ => {}
        }

        let mut cx = Cx::new(
            &mut self.doc,
            &self.config,
            &mut self.scheduler,
            &mut self.surface,
            &mut self.effects,
        );
        let active = |slot: &&mut Slot| slot.status == ModuleStatus::Active;
        for slot in self.slots.iter_mut().filter(active) {
            slot.behavior.handle(Phase::Target, &event, &mut cx);
        }
        if !cx.flow().propagation_stopped {
            for slot in self.slots.iter_mut().filter(active) {
                slot.behavior.handle(Phase::Document, &event, &mut cx);
            }
        }
        let flow = cx.flow();
        Ok(Dispatch {
            default_prevented: flow.default_prevented,
            propagation_stopped: flow.propagation_stopped,
        })
    }

    /// Move page time forward by `delta`, running due tasks.
    ///
    /// # Errors
    ///
    /// As [`App::advance_to`].
    pub fn advance(&mut self, delta: Duration) -> Result<usize, AppError> {
        let target = self.scheduler.now().saturating_add(delta);
        self.advance_to(target)
    }

    /// Move page time to `target`, running every task due by then. Returns
    /// how many tasks ran.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::ClockRegression`] when `target` is in the past,
    /// [`RuntimeError::StepLimitExceeded`] when more than `timer_step_limit`
    /// tasks would run.
    pub fn advance_to(&mut self, target: Duration) -> Result<usize, AppError> {
        let now = self.scheduler.now();
        if target < now {
            return Err(RuntimeError::ClockRegression { now, target }.into());
        }
        let limit = self.config.timer_step_limit;
        let mut ran = 0usize;
        while self.scheduler.next_deadline().is_some_and(|due| due <= target) {
            if ran >= limit {
                return Err(RuntimeError::StepLimitExceeded {
                    limit,
                    now: self.scheduler.now(),
                    pending: self.scheduler.pending(),
                }
                .into());
            }
            let Some((id, task)) = self.scheduler.pop_due(target) else {
                break;
            };
            tracing::trace!(task = id.id(), ?task, "timer fired");
            self.run_task(&task);
            ran += 1;
        }
        self.scheduler.advance_clock_to(target);
        Ok(ran)
    }

    /// Catch up with an external clock.
    ///
    /// # Errors
    ///
    /// As [`App::advance_to`].
    pub fn sync(&mut self, clock: &impl Clock) -> Result<usize, AppError> {
        let now = clock.now();
        if now <= self.scheduler.now() {
            return Ok(0);
        }
        self.advance_to(now)
    }

    fn run_task(&mut self, task: &Task) {
        if self
            .surface
            .run_task(&mut self.doc, &mut self.scheduler, task)
        {
            return;
        }
        let mut cx = Cx::new(
            &mut self.doc,
            &self.config,
            &mut self.scheduler,
            &mut self.surface,
            &mut self.effects,
        );
        for slot in &mut self.slots {
            if slot.behavior.run_task(task, &mut cx) {
                return;
            }
        }
        tracing::debug!(?task, "timer task had no owner");
    }

    /// Show a notification.
    pub fn notify(
        &mut self,
        message: &str,
        severity: impl Into<Option<Severity>>,
    ) -> NotificationId {
        self.surface
            .notify(&mut self.doc, &mut self.scheduler, message, severity)
    }

    /// Remove a notification immediately.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        self.surface
            .dismiss(&mut self.doc, &mut self.scheduler, id)
    }

    /// Drain the effects produced since the last call.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    #[must_use]
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    #[must_use]
    pub const fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[must_use]
    pub const fn notifications(&self) -> &NotificationSurface {
        &self.surface
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Number of scheduled tasks.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    #[must_use]
    pub const fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}
