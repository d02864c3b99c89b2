#![forbid(unsafe_code)]

//! Fluent element construction.
//!
//! ```
//! use pagekit_core::dom::Document;
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let nav = doc
//!     .build("nav")
//!     .id("main-nav")
//!     .class("c-nav")
//!     .append_to(body)
//!     .unwrap();
//! assert_eq!(doc.by_id("main-nav"), Some(nav));
//! ```

use crate::dom::{Document, DomError, NodeId};

/// Builder for a single element, created by [`Document::build`].
#[derive(Debug)]
#[must_use = "the element is detached until appended"]
pub struct ElementBuilder<'a> {
    doc: &'a mut Document,
    node: NodeId,
}

impl Document {
    /// Start building a new detached element.
    pub fn build(&mut self, tag: &str) -> ElementBuilder<'_> {
        let node = self.create_element(tag);
        ElementBuilder { doc: self, node }
    }
}

impl ElementBuilder<'_> {
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Add one or more whitespace-separated classes.
    pub fn class(self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            self.doc.add_class(self.node, class);
        }
        self
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        self.doc.set_attr(self.node, name, value);
        self
    }

    /// Boolean attribute (`required`, `disabled`, `data-critical`, ...).
    pub fn flag(self, name: &str) -> Self {
        self.attr(name, "")
    }

    pub fn text(self, text: &str) -> Self {
        self.doc.set_text(self.node, text);
        self
    }

    /// Initial value; also the value a form reset restores.
    pub fn value(self, value: &str) -> Self {
        self.doc.init_value(self.node, value);
        self
    }

    /// Initial checkedness; also what a form reset restores.
    pub fn checked(self, checked: bool) -> Self {
        self.doc.init_checked(self.node, checked);
        self
    }

    pub fn style(self, property: &str, value: &str) -> Self {
        self.doc.set_style(self.node, property, value);
        self
    }

    /// Layout box as measured by the host.
    pub fn layout(self, top: f64, height: f64) -> Self {
        self.doc.set_layout(self.node, top, height);
        self
    }

    /// Finish without attaching.
    #[must_use]
    pub fn finish(self) -> NodeId {
        self.node
    }

    /// Finish and append under `parent`.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] when `parent` is not part of the document.
    pub fn append_to(self, parent: NodeId) -> Result<NodeId, DomError> {
        self.doc.append_child(parent, self.node)?;
        Ok(self.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_defaults_for_reset() {
        let mut doc = Document::new();
        let body = doc.body();
        let input = doc
            .build("input")
            .id("email")
            .flag("required")
            .value("a@b.lv")
            .append_to(body)
            .unwrap();
        let el = doc.element(input).unwrap();
        assert!(el.is_required());
        assert_eq!(el.value(), "a@b.lv");
        assert_eq!(el.default_value(), "a@b.lv");
    }

    #[test]
    fn finish_leaves_node_detached() {
        let mut doc = Document::new();
        let node = doc.build("div").class("a b").finish();
        assert!(!doc.is_connected(node));
        assert!(doc.has_class(node, "a") && doc.has_class(node, "b"));
    }
}
