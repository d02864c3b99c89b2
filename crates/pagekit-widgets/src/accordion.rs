#![forbid(unsafe_code)]

//! Accordion panels.
//!
//! Each `.accordion-button` inside an `.accordion` names its panel with
//! `data-bs-target="#panel-id"`. A click toggles the panel's `show` class and
//! keeps the button's `aria-expanded` and `collapsed` in step. Panels open
//! independently of each other.

use pagekit_core::{Document, Event, NodeId};
use pagekit_runtime::ModuleId;

use crate::behavior::{Behavior, Cx, Mount, Phase};

const BUTTON_CLASS: &str = "accordion-button";

/// Toggle the panel driven by `button`. Returns whether it is now expanded,
/// or `None` when the panel cannot be found.
pub fn toggle_panel(doc: &mut Document, button: NodeId) -> Option<bool> {
    let target = doc.attr(button, "data-bs-target")?;
    let Some(panel) = target.strip_prefix('#').and_then(|id| doc.by_id(id)) else {
        tracing::debug!(%button, target, "accordion panel not found");
        return None;
    };
    let expanded = doc.attr(button, "aria-expanded") == Some("true");
    if expanded {
        doc.remove_class(panel, "show");
        doc.set_attr(button, "aria-expanded", "false");
        doc.add_class(button, "collapsed");
    } else {
        doc.add_class(panel, "show");
        doc.set_attr(button, "aria-expanded", "true");
        doc.remove_class(button, "collapsed");
    }
    Some(!expanded)
}

/// Accordion toggling behaviour.
#[derive(Debug, Default)]
pub struct Accordion {
    buttons: Vec<NodeId>,
}

impl Accordion {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Behavior for Accordion {
    fn module(&self) -> ModuleId {
        ModuleId::Accordion
    }

    fn mount(&mut self, cx: &mut Cx<'_>) -> Mount {
        for accordion in cx.doc.with_class("accordion") {
            for button in cx.doc.find_all(accordion, |el| el.has_class(BUTTON_CLASS)) {
                if !self.buttons.contains(&button) {
                    self.buttons.push(button);
                }
            }
        }
        if self.buttons.is_empty() {
            return Mount::Skipped("no .accordion .accordion-button");
        }
        Mount::Active
    }

    fn handle(&mut self, phase: Phase, event: &Event, cx: &mut Cx<'_>) {
        let (Phase::Target, Event::Click(target)) = (phase, event) else {
            return;
        };
        let Some(button) = self
            .buttons
            .iter()
            .copied()
            .filter(|&button| cx.doc.contains(button, *target))
            .last()
        else {
            return;
        };
        toggle_panel(cx.doc, button);
    }
}
