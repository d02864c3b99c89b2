#![forbid(unsafe_code)]

//! Scroll-spy: highlight the navigation link of the section in view.
//!
//! A section is current when the scroll offset lies in
//! `[top, top + height)`, where `top` is the section's document offset minus
//! the header height and a fixed margin. When sections overlap, the last one
//! in document order wins. Updates run once at mount and then on throttled
//! scroll events.

use pagekit_core::{Document, Event, NodeId};
use pagekit_runtime::{ModuleId, Throttle};

use crate::behavior::{Behavior, Cx, Mount, Phase, header_height};

const LINK_CLASS: &str = "c-nav__link";
const ACTIVE_CLASS: &str = "active";

/// Last section containing `scroll_y` once shifted up by `offset`.
#[must_use]
pub fn current_section(
    doc: &Document,
    sections: &[NodeId],
    scroll_y: f64,
    offset: f64,
) -> Option<NodeId> {
    sections
        .iter()
        .copied()
        .filter(|&section| {
            let top = doc.offset_top(section) - offset;
            let bottom = top + doc.offset_height(section);
            scroll_y >= top && scroll_y < bottom
        })
        .last()
}

/// Section tracking for fragment navigation links.
#[derive(Debug)]
pub struct ScrollSpy {
    sections: Vec<NodeId>,
    links: Vec<NodeId>,
    throttle: Throttle,
}

impl Default for ScrollSpy {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollSpy {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            links: Vec::new(),
            throttle: Throttle::new(std::time::Duration::ZERO),
        }
    }

    fn update(&self, cx: &mut Cx<'_>) {
        let offset = header_height(cx.doc, cx.config) + cx.config.scroll_spy_margin;
        let scroll_y = cx.doc.viewport().scroll_y;
        let current = current_section(cx.doc, &self.sections, scroll_y, offset)
            .and_then(|section| cx.doc.attr(section, "id"))
            .map(str::to_owned);

        for &link in &self.links {
            let target = cx
                .doc
                .attr(link, "href")
                .and_then(|href| href.split_once('#'))
                .map(|(_, id)| id);
            let active = current.is_some() && target == current.as_deref();
            if active {
                cx.doc.add_class(link, ACTIVE_CLASS);
                cx.doc.set_attr(link, "aria-current", "page");
            } else {
                cx.doc.remove_class(link, ACTIVE_CLASS);
                cx.doc.remove_attr(link, "aria-current");
            }
        }
        tracing::trace!(scroll_y, section = current.as_deref(), "scroll-spy updated");
    }
}

impl Behavior for ScrollSpy {
    fn module(&self) -> ModuleId {
        ModuleId::ScrollSpy
    }

    fn mount(&mut self, cx: &mut Cx<'_>) -> Mount {
        let root = cx.doc.root();
        self.sections = cx.doc.find_all(root, |el| el.is("section") && el.has_attr("id"));
        self.links = cx.doc.find_all(root, |el| {
            el.has_class(LINK_CLASS) && el.attr("href").is_some_and(|href| href.starts_with('#'))
        });
        if self.sections.is_empty() || self.links.is_empty() {
            return Mount::Skipped("no section[id] or fragment .c-nav__link");
        }
        self.throttle = Throttle::new(cx.config.scroll_throttle());
        self.update(cx);
        Mount::Active
    }

    fn handle(&mut self, phase: Phase, event: &Event, cx: &mut Cx<'_>) {
        if let (Phase::Document, Event::Scroll { .. }) = (phase, event)
            && self.throttle.try_acquire(cx.now())
        {
            self.update(cx);
        }
    }
}
