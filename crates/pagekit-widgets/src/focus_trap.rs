#![forbid(unsafe_code)]

//! Keyboard focus containment for an open panel.
//!
//! A [`FocusTrap`] captures the focusable descendants of a container once, at
//! activation, and wraps Tab / Shift+Tab at the ends of that list. The toggle
//! that opened the panel counts as the element "before" the first focusable,
//! so Shift+Tab from it jumps to the last one.
//!
//! # Invariants
//!
//! 1. The focusable list is fixed for the lifetime of the session; elements
//!    added to the container later are not part of the cycle.
//! 2. Only key presses whose focus target lies inside the container, or is
//!    the toggle, are considered. Everything else passes through.
//! 3. A container without focusable descendants yields no session.

use pagekit_core::{Document, Element, KeyCode, KeyEvent, Modifiers, NodeId};

/// Whether an element participates in sequential focus navigation.
#[must_use]
pub fn is_focusable(el: &Element) -> bool {
    let control = ["button", "input", "select", "textarea"]
        .iter()
        .any(|tag| el.is(tag));
    (el.is("a") && el.has_attr("href"))
        || (control && !el.is_disabled())
        || el.attr("tabindex").is_some_and(|t| t.trim() != "-1")
}

/// What [`FocusTrap::handle_key`] did with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapOutcome {
    /// Focus moved to the given element; the caller should prevent default.
    Wrapped(NodeId),
    /// The key press is not the trap's business.
    PassThrough,
}

/// An active focus-trap session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTrap {
    container: NodeId,
    toggle: Option<NodeId>,
    focusable: Vec<NodeId>,
}

impl FocusTrap {
    /// Start trapping focus inside `container`.
    ///
    /// Returns `None` when the container has no focusable descendants.
    #[must_use]
    pub fn activate(doc: &Document, container: NodeId, toggle: Option<NodeId>) -> Option<Self> {
        let focusable: Vec<NodeId> = doc
            .find_all(container, is_focusable)
            .into_iter()
            .filter(|&node| node != container)
            .collect();
        if focusable.is_empty() {
            tracing::debug!(%container, "focus trap not armed: nothing focusable");
            return None;
        }
        tracing::trace!(%container, count = focusable.len(), "focus trap armed");
        Some(Self {
            container,
            toggle,
            focusable,
        })
    }

    #[must_use]
    pub const fn container(&self) -> NodeId {
        self.container
    }

    #[must_use]
    pub fn focusable(&self) -> &[NodeId] {
        &self.focusable
    }

    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.focusable.first().copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<NodeId> {
        self.focusable.last().copied()
    }

    fn in_scope(&self, doc: &Document, node: NodeId) -> bool {
        Some(node) == self.toggle || doc.contains(self.container, node)
    }

    /// Apply a key press to the current focus.
    pub fn handle_key(&self, doc: &mut Document, key: &KeyEvent) -> TrapOutcome {
        if key.code != KeyCode::Tab {
            return TrapOutcome::PassThrough;
        }
        let Some(active) = doc.active_element() else {
            return TrapOutcome::PassThrough;
        };
        if !self.in_scope(doc, active) {
            return TrapOutcome::PassThrough;
        }
        let (Some(first), Some(last)) = (self.first(), self.last()) else {
            return TrapOutcome::PassThrough;
        };

        let target = if key.shift() {
            (active == first || Some(active) == self.toggle).then_some(last)
        } else if key.modifiers == Modifiers::empty() {
            (active == last).then_some(first)
        } else {
            None
        };

        match target {
            Some(node) if doc.focus(node) => TrapOutcome::Wrapped(node),
            _ => TrapOutcome::PassThrough,
        }
    }

    /// End the session.
    pub fn release(self) {
        tracing::trace!(container = %self.container, "focus trap released");
    }
}
