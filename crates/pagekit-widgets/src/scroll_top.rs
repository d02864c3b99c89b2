#![forbid(unsafe_code)]

//! Floating "back to top" button.

use pagekit_core::{Document, Event, NodeId};
use pagekit_runtime::{ModuleId, Throttle};

use crate::behavior::{Behavior, Cx, Effect, Mount, Phase};

pub const BUTTON_CLASS: &str = "c-scroll-to-top";

const BUTTON_STYLE: &str = "position: fixed; bottom: 20px; right: 20px; width: 50px; \
    height: 50px; border-radius: 50%; background-color: #007bff; color: white; \
    border: none; font-size: 24px; cursor: pointer; opacity: 0; visibility: hidden; \
    transition: opacity 0.3s, visibility 0.3s; z-index: 1000; \
    box-shadow: 0 2px 10px rgba(0,0,0,0.2)";

/// Back-to-top button behaviour.
#[derive(Debug)]
pub struct ScrollToTop {
    button: Option<NodeId>,
    throttle: Throttle,
    threshold: f64,
}

impl Default for ScrollToTop {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollToTop {
    #[must_use]
    pub fn new() -> Self {
        Self {
            button: None,
            throttle: Throttle::new(std::time::Duration::ZERO),
            threshold: 0.0,
        }
    }

    #[must_use]
    pub const fn button(&self) -> Option<NodeId> {
        self.button
    }

    fn sync_visibility(&self, doc: &mut Document) {
        let Some(button) = self.button else { return };
        let visible = doc.viewport().scroll_y > self.threshold;
        let (opacity, visibility) = if visible {
            ("1", "visible")
        } else {
            ("0", "hidden")
        };
        doc.set_style(button, "opacity", opacity);
        doc.set_style(button, "visibility", visibility);
    }
}

impl Behavior for ScrollToTop {
    fn module(&self) -> ModuleId {
        ModuleId::ScrollToTop
    }

    fn mount(&mut self, cx: &mut Cx<'_>) -> Mount {
        let body = cx.doc.body();
        let button = match cx
            .doc
            .build("button")
            .class(BUTTON_CLASS)
            .attr("aria-label", "Back to top")
            .attr("style", BUTTON_STYLE)
            .text("\u{2191}")
            .append_to(body)
        {
            Ok(button) => button,
            Err(err) => {
                tracing::debug!(%err, "scroll-to-top button not inserted");
                return Mount::Skipped("body unavailable");
            }
        };
        self.button = Some(button);
        self.threshold = cx.config.scroll_top_threshold;
        self.throttle = Throttle::new(cx.config.scroll_throttle());
        self.sync_visibility(cx.doc);
        Mount::Active
    }

    fn handle(&mut self, phase: Phase, event: &Event, cx: &mut Cx<'_>) {
        let Some(button) = self.button else { return };
        match (phase, event) {
            (Phase::Document, Event::Scroll { .. }) => {
                if self.throttle.try_acquire(cx.now()) {
                    self.sync_visibility(cx.doc);
                }
            }
            (Phase::Target, Event::Click(target)) if cx.doc.contains(button, *target) => {
                cx.emit(Effect::ScrollTo {
                    top: 0.0,
                    smooth: true,
                });
            }
            _ => {}
        }
    }
}
