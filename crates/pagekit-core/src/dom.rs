#![forbid(unsafe_code)]

//! In-memory document tree.
//!
//! [`Document`] is an arena of nodes addressed by [`NodeId`]. It models only
//! what page behaviours read and write: tags, attributes, class lists, inline
//! style declarations, own text, form-control state, a layout box per
//! element, focus, and the window facts (viewport, location, ready state).
//!
//! # Invariants
//!
//! - Node ids are never reused. Detaching a node unlinks its subtree from the
//!   tree but keeps it addressable, so handles held by behaviours stay valid.
//! - The tree is acyclic: [`Document::append_child`] rejects appending a node
//!   into its own subtree.
//! - Queries walk connected nodes in document order (pre-order DFS).
//! - `class` and `style` are not stored as raw attributes; writing them
//!   through [`Document::set_attr`] replaces the class list / declarations.
//!
//! # Failure Modes
//!
//! - Structural edits with unknown ids return [`DomError::UnknownNode`].
//! - Property writes on unknown ids are ignored and report `false`.
//! - Reads on unknown ids return `None` / empty defaults.

use std::fmt;

use ahash::AHashMap;

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Build an id from its raw arena index.
    #[must_use]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Raw arena index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors from structural document edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomError {
    /// The id does not address a node of this document.
    UnknownNode(NodeId),
    /// The edit would make a node its own ancestor, or move the document root.
    HierarchyRequest { parent: NodeId, child: NodeId },
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "unknown node {id}"),
            Self::HierarchyRequest { parent, child } => {
                write!(f, "cannot insert {child} under {parent}")
            }
        }
    }
}

impl std::error::Error for DomError {}

/// Layout box reported by the host (CSS pixels, document coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutBox {
    /// Distance from the document top (`offsetTop`).
    pub top: f64,
    /// Rendered height (`offsetHeight`).
    pub height: f64,
}

/// Window viewport state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Vertical scroll offset (`pageYOffset`).
    pub scroll_y: f64,
    /// Inner width (`innerWidth`).
    pub width: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_y: 0.0,
            width: 1280.0,
        }
    }
}

/// Document parsing state (`document.readyState`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    Loading,
    Interactive,
    #[default]
    Complete,
}

/// An element node.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attrs: AHashMap<String, String>,
    classes: Vec<String>,
    style: Vec<(String, String)>,
    text: String,
    value: String,
    default_value: String,
    checked: bool,
    default_checked: bool,
    layout: LayoutBox,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: AHashMap::new(),
            classes: Vec::new(),
            style: Vec::new(),
            text: String::new(),
            value: String::new(),
            default_value: String::new(),
            checked: false,
            default_checked: false,
            layout: LayoutBox::default(),
        }
    }

    /// Lowercase tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Case-insensitive tag comparison.
    #[must_use]
    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// The `id` attribute.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    /// Inline style value for a CSS property.
    #[must_use]
    pub fn style(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Own text content.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Live form-control value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Value restored by a form reset.
    #[must_use]
    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    #[must_use]
    pub fn checked(&self) -> bool {
        self.checked
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.has_attr("disabled")
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.has_attr("required")
    }

    /// `input[type=checkbox]`.
    #[must_use]
    pub fn is_checkbox(&self) -> bool {
        self.is("input")
            && self
                .attr("type")
                .is_some_and(|t| t.eq_ignore_ascii_case("checkbox"))
    }

    /// `input`, `textarea` or `select`.
    #[must_use]
    pub fn is_form_control(&self) -> bool {
        self.is("input") || self.is("textarea") || self.is("select")
    }

    #[must_use]
    pub fn layout(&self) -> LayoutBox {
        self.layout
    }

    fn serialize_style(&self) -> String {
        self.style
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Document,
    Element(Element),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// The page document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
    active: Option<NodeId>,
    viewport: Viewport,
    location: String,
    ready_state: ReadyState,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document with a `<body>` at path `/`.
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            root: NodeId(0),
            body: NodeId(0),
            active: None,
            viewport: Viewport::default(),
            location: "/".to_string(),
            ready_state: ReadyState::default(),
        };
        let body = doc.create_element("body");
        doc.nodes[body.0].parent = Some(doc.root);
        doc.nodes[doc.root.0].children.push(body);
        doc.body = body;
        doc
    }

    /// Empty document served at `path`.
    #[must_use]
    pub fn at_path(path: impl Into<String>) -> Self {
        let mut doc = Self::new();
        doc.location = path.into();
        doc
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    /// Current location path (`location.pathname`).
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn set_location(&mut self, path: impl Into<String>) {
        self.location = path.into();
    }

    #[must_use]
    pub const fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Number of nodes ever created, detached ones included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Element(Element::new(tag)),
        });
        id
    }

    /// Append `child` as the last child of `parent`, moving it if attached.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] for foreign ids, [`DomError::HierarchyRequest`]
    /// when `child` is the root or an inclusive ancestor of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_child(parent, child, None)
    }

    /// Insert `child` as the first child of `parent`.
    ///
    /// # Errors
    ///
    /// Same as [`Document::append_child`].
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_child(parent, child, Some(0))
    }

    fn insert_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        position: Option<usize>,
    ) -> Result<(), DomError> {
        self.check(parent)?;
        self.check(child)?;
        if child == self.root || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        match position {
            Some(index) => children.insert(index.min(children.len()), child),
            None => children.push(child),
        }
        self.nodes[child.0].parent = Some(parent);
        #[cfg(feature = "tracing")]
        tracing::trace!(%parent, %child, "dom insert");
        Ok(())
    }

    /// Unlink `node` from its parent. Returns `false` when it had none.
    pub fn detach(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.parent(node) else {
            return false;
        };
        self.nodes[parent.0].children.retain(|&c| c != node);
        self.nodes[node.0].parent = None;
        if self.active.is_some_and(|active| self.contains(node, active)) {
            self.active = None;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(%parent, %node, "dom detach");
        true
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Inclusive ancestry test.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Whether `node` is reachable from the document root.
    #[must_use]
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.nodes.get(node.0).is_some() && self.contains(self.root, node)
    }

    fn check(&self, node: NodeId) -> Result<(), DomError> {
        if node.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(DomError::UnknownNode(node))
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    #[must_use]
    pub fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Document => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node.0)?.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Document => None,
        }
    }

    /// Element descendants of `scope` in document order, `scope` excluded.
    pub fn descendants(&self, scope: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(scope).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// First descendant of `scope` matching `pred`.
    pub fn find(&self, scope: NodeId, pred: impl Fn(&Element) -> bool) -> Option<NodeId> {
        self.descendants(scope)
            .find(|&node| self.element(node).is_some_and(&pred))
    }

    /// All descendants of `scope` matching `pred`.
    pub fn find_all(&self, scope: NodeId, pred: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        self.descendants(scope)
            .filter(|&node| self.element(node).is_some_and(&pred))
            .collect()
    }

    /// First connected element with the given `id` attribute.
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.find(self.root, |el| el.id() == Some(id))
    }

    /// Connected elements carrying `class`.
    #[must_use]
    pub fn with_class(&self, class: &str) -> Vec<NodeId> {
        self.find_all(self.root, |el| el.has_class(class))
    }

    /// Connected elements with tag `tag`.
    #[must_use]
    pub fn with_tag(&self, tag: &str) -> Vec<NodeId> {
        self.find_all(self.root, |el| el.is(tag))
    }

    /// Nearest inclusive ancestor matching `pred`.
    pub fn closest(&self, node: NodeId, pred: impl Fn(&Element) -> bool) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.element(current).is_some_and(&pred) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    // ------------------------------------------------------------------
    // Attributes, classes, style
    // ------------------------------------------------------------------

    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attr(name)
    }

    #[must_use]
    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.element(node).is_some_and(|el| el.has_attr(name))
    }

    /// Set an attribute. `class`, `style`, `value` and `checked` also update
    /// the corresponding element state.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> bool {
        let Some(el) = self.element_mut(node) else {
            return false;
        };
        match name {
            "class" => {
                el.classes = value.split_whitespace().map(str::to_owned).collect();
            }
            "style" => {
                el.style = parse_style(value);
            }
            _ => {
                if name == "value" {
                    el.default_value = value.to_owned();
                }
                if name == "checked" {
                    el.default_checked = true;
                }
                el.attrs.insert(name.to_owned(), value.to_owned());
            }
        }
        true
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> bool {
        self.element_mut(node)
            .is_some_and(|el| el.attrs.remove(name).is_some())
    }

    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|el| el.has_class(class))
    }

    /// Add a class. Returns `true` when the list changed.
    pub fn add_class(&mut self, node: NodeId, class: &str) -> bool {
        match self.element_mut(node) {
            Some(el) if !el.has_class(class) => {
                el.classes.push(class.to_owned());
                true
            }
            _ => false,
        }
    }

    /// Remove a class. Returns `true` when the list changed.
    pub fn remove_class(&mut self, node: NodeId, class: &str) -> bool {
        let Some(el) = self.element_mut(node) else {
            return false;
        };
        let before = el.classes.len();
        el.classes.retain(|c| c != class);
        el.classes.len() != before
    }

    /// Toggle a class, returning whether it is now present.
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class)
        }
    }

    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node)?.style(property)
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> bool {
        let Some(el) = self.element_mut(node) else {
            return false;
        };
        match el.style.iter_mut().find(|(name, _)| name == property) {
            Some((_, existing)) => *existing = value.to_owned(),
            None => el.style.push((property.to_owned(), value.to_owned())),
        }
        true
    }

    /// Serialized inline style (`style` attribute text).
    #[must_use]
    pub fn style_text(&self, node: NodeId) -> String {
        self.element(node)
            .map(Element::serialize_style)
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Content and form state
    // ------------------------------------------------------------------

    #[must_use]
    pub fn text(&self, node: NodeId) -> &str {
        self.element(node).map(Element::text).unwrap_or("")
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) -> bool {
        self.element_mut(node).is_some_and(|el| {
            el.text = text.to_owned();
            true
        })
    }

    #[must_use]
    pub fn value(&self, node: NodeId) -> &str {
        self.element(node).map(Element::value).unwrap_or("")
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) -> bool {
        self.element_mut(node).is_some_and(|el| {
            el.value = value.to_owned();
            true
        })
    }

    #[must_use]
    pub fn checked(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(Element::checked)
    }

    pub fn set_checked(&mut self, node: NodeId, checked: bool) -> bool {
        self.element_mut(node).is_some_and(|el| {
            el.checked = checked;
            true
        })
    }

    pub fn set_disabled(&mut self, node: NodeId, disabled: bool) -> bool {
        if disabled {
            self.set_attr(node, "disabled", "")
        } else {
            self.remove_attr(node, "disabled")
        }
    }

    /// Restore every form control under `form` to its default state.
    pub fn reset_form(&mut self, form: NodeId) {
        for node in self.find_all(form, Element::is_form_control) {
            if let Some(el) = self.element_mut(node) {
                el.value = el.default_value.clone();
                el.checked = el.default_checked;
            }
        }
    }

    // ------------------------------------------------------------------
    // Layout and focus
    // ------------------------------------------------------------------

    pub fn set_layout(&mut self, node: NodeId, top: f64, height: f64) -> bool {
        self.element_mut(node).is_some_and(|el| {
            el.layout = LayoutBox { top, height };
            true
        })
    }

    #[must_use]
    pub fn offset_top(&self, node: NodeId) -> f64 {
        self.element(node).map_or(0.0, |el| el.layout.top)
    }

    #[must_use]
    pub fn offset_height(&self, node: NodeId) -> f64 {
        self.element(node).map_or(0.0, |el| el.layout.height)
    }

    #[must_use]
    pub const fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    /// Focus a connected element. Returns `false` otherwise.
    pub fn focus(&mut self, node: NodeId) -> bool {
        if self.element(node).is_some() && self.is_connected(node) {
            self.active = Some(node);
            true
        } else {
            false
        }
    }

    pub fn blur(&mut self) {
        self.active = None;
    }

    // Builder-only setters for default form state.
    pub(crate) fn init_value(&mut self, node: NodeId, value: &str) {
        if let Some(el) = self.element_mut(node) {
            el.value = value.to_owned();
            el.default_value = value.to_owned();
        }
    }

    pub(crate) fn init_checked(&mut self, node: NodeId, checked: bool) {
        if let Some(el) = self.element_mut(node) {
            el.checked = checked;
            el.default_checked = checked;
        }
    }
}

/// Pre-order iterator over element descendants.
#[derive(Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(node).iter().rev().copied());
        Some(node)
    }
}

fn parse_style(text: &str) -> Vec<(String, String)> {
    text.split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            (!name.is_empty()).then(|| (name.to_ascii_lowercase(), value.to_owned()))
        })
        .collect()
}
