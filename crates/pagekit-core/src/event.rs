#![forbid(unsafe_code)]

//! Page events delivered by the host.
//!
//! The host translates whatever its platform produces (DOM events, a test
//! script, a recorded trace) into [`Event`] values and hands them to the
//! coordinator one at a time. Events carry only what the behaviours need:
//! the target node for element-bound events and viewport facts for scroll
//! and resize.
//!
//! # Invariants
//!
//! - `Scroll` and `Resize` carry the *new* viewport value; the coordinator
//!   writes it into the document before any behaviour observes the event.
//! - Key events target the document's active element at dispatch time, so
//!   they carry no explicit target.

use bitflags::bitflags;

use crate::dom::NodeId;

/// A single event delivered to the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The document finished parsing (`DOMContentLoaded`).
    DomContentLoaded,
    /// Pointer activation of an element.
    Click(NodeId),
    /// Key press, routed to the active element.
    Key(KeyEvent),
    /// The window scrolled to a new vertical offset.
    Scroll { y: f64 },
    /// The window was resized to a new inner width.
    Resize { width: f64 },
    /// A form submission was requested.
    Submit(NodeId),
    /// An image failed to load its source.
    ImageError(NodeId),
}

impl Event {
    /// Node the event was dispatched at, if it is element-bound.
    #[must_use]
    pub const fn target(&self) -> Option<NodeId> {
        match self {
            Self::Click(node) | Self::Submit(node) | Self::ImageError(node) => Some(*node),
            _ => None,
        }
    }

    /// Short name used in trace output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::Click(_) => "click",
            Self::Key(_) => "keydown",
            Self::Scroll { .. } => "scroll",
            Self::Resize { .. } => "resize",
            Self::Submit(_) => "submit",
            Self::ImageError(_) => "error",
        }
    }
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Logical key.
    pub code: KeyCode,
    /// Modifier keys held during the press.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Key press without modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// Attach modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether Shift is held.
    #[inline]
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

/// Logical key codes the page reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Tab,
    Escape,
    Enter,
    Char(char),
}

bitflags! {
    /// Modifier keys.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_only_for_element_events() {
        let node = NodeId::from_raw(3);
        assert_eq!(Event::Click(node).target(), Some(node));
        assert_eq!(Event::Submit(node).target(), Some(node));
        assert_eq!(Event::Scroll { y: 10.0 }.target(), None);
        assert_eq!(Event::Key(KeyCode::Tab.into()).target(), None);
    }

    #[test]
    fn shift_detection() {
        let key = KeyEvent::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT | Modifiers::CTRL);
        assert!(key.shift());
        assert!(!KeyEvent::new(KeyCode::Tab).shift());
    }
}
