#![forbid(unsafe_code)]

//! Core types for pagekit: the in-memory document and the page event model.
//!
//! Everything above this crate manipulates a [`Document`](dom::Document)
//! through [`NodeId`](dom::NodeId) handles and reacts to
//! [`Event`](event::Event)s supplied by the host.

pub mod builder;
pub mod dom;
pub mod event;

pub use builder::ElementBuilder;
pub use dom::{Document, DomError, Element, LayoutBox, NodeId, ReadyState, Viewport};
pub use event::{Event, KeyCode, KeyEvent, Modifiers};
