#![forbid(unsafe_code)]

//! Mobile navigation toggle.
//!
//! Anchors: `nav.c-nav#main-nav`, its `.c-nav__toggle` button and its
//! `.c-nav__list`. Opening the panel marks the nav `is-open`, flips
//! `aria-expanded` on the toggle, locks body scroll and traps focus inside
//! the list. Closing reverses all of it.
//!
//! The panel closes on Escape, on a click outside the nav, on a click of one
//! of its `.c-nav__link`s, and when the viewport grows to the desktop
//! breakpoint (resize handling is throttled).

use pagekit_core::{Document, Event, KeyCode, NodeId};
use pagekit_runtime::{ModuleId, Throttle};

use crate::behavior::{Behavior, Cx, Mount, Phase};
use crate::focus_trap::{FocusTrap, TrapOutcome};
use crate::scroll_lock;

pub const OPEN_CLASS: &str = "is-open";
const LINK_CLASS: &str = "c-nav__link";

#[derive(Debug, Clone, PartialEq, Eq)]
struct NavHandles {
    nav: NodeId,
    toggle: NodeId,
    list: NodeId,
    links: Vec<NodeId>,
}

impl NavHandles {
    fn resolve(doc: &Document) -> Option<Self> {
        let nav = doc
            .by_id("main-nav")
            .filter(|&nav| doc.has_class(nav, "c-nav"))?;
        let toggle = doc.find(nav, |el| el.has_class("c-nav__toggle"))?;
        let list = doc.find(nav, |el| el.has_class("c-nav__list"))?;
        let links = doc.find_all(list, |el| el.has_class(LINK_CLASS));
        Some(Self {
            nav,
            toggle,
            list,
            links,
        })
    }
}

/// Navigation open/close behaviour.
#[derive(Debug)]
pub struct NavToggle {
    handles: Option<NavHandles>,
    open: bool,
    trap: Option<FocusTrap>,
    resize: Throttle,
    breakpoint: f64,
}

impl Default for NavToggle {
    fn default() -> Self {
        Self::new()
    }
}

impl NavToggle {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handles: None,
            open: false,
            trap: None,
            resize: Throttle::new(std::time::Duration::ZERO),
            breakpoint: 0.0,
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    fn open(&mut self, doc: &mut Document) {
        let Some(h) = &self.handles else { return };
        doc.add_class(h.nav, OPEN_CLASS);
        doc.set_attr(h.toggle, "aria-expanded", "true");
        scroll_lock::lock(doc);
        self.trap = FocusTrap::activate(doc, h.list, Some(h.toggle));
        self.open = true;
        tracing::debug!("nav opened");
    }

    fn close(&mut self, doc: &mut Document) {
        let Some(h) = &self.handles else { return };
        doc.remove_class(h.nav, OPEN_CLASS);
        doc.set_attr(h.toggle, "aria-expanded", "false");
        scroll_lock::unlock(doc);
        if let Some(trap) = self.trap.take() {
            trap.release();
        }
        self.open = false;
        tracing::debug!("nav closed");
    }
}

impl Behavior for NavToggle {
    fn module(&self) -> ModuleId {
        ModuleId::NavToggle
    }

    fn mount(&mut self, cx: &mut Cx<'_>) -> Mount {
        let Some(handles) = NavHandles::resolve(cx.doc) else {
            return Mount::Skipped("nav.c-nav#main-nav with toggle and list not found");
        };
        self.handles = Some(handles);
        self.resize = Throttle::new(cx.config.resize_throttle());
        self.breakpoint = cx.config.nav_breakpoint;
        Mount::Active
    }

    fn handle(&mut self, phase: Phase, event: &Event, cx: &mut Cx<'_>) {
        let Some(h) = &self.handles else { return };
        let (nav, toggle) = (h.nav, h.toggle);
        match (phase, event) {
            (Phase::Target, Event::Click(target)) => {
                let on_link = h.links.iter().any(|&link| cx.doc.contains(link, *target));
                if cx.doc.contains(toggle, *target) {
                    cx.stop_propagation();
                    if self.open {
                        self.close(cx.doc);
                    } else {
                        self.open(cx.doc);
                    }
                } else if on_link {
                    self.close(cx.doc);
                }
            }
            (Phase::Target, Event::Key(key)) => {
                if let Some(trap) = &self.trap
                    && let TrapOutcome::Wrapped(_) = trap.handle_key(cx.doc, key)
                {
                    cx.prevent_default();
                }
            }
            (Phase::Document, Event::Key(key)) if key.code == KeyCode::Escape && self.open => {
                self.close(cx.doc);
            }
            (Phase::Document, Event::Click(target)) if self.open => {
                if !cx.doc.contains(nav, *target) {
                    self.close(cx.doc);
                }
            }
            (Phase::Document, Event::Resize { width }) => {
                if self.resize.try_acquire(cx.now()) && *width >= self.breakpoint && self.open {
                    self.close(cx.doc);
                }
            }
            _ => {}
        }
    }
}
