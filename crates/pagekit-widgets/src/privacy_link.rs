#![forbid(unsafe_code)]

//! Privacy-policy links whose page is not available yet.
//!
//! Links to `privacy.html` navigate normally. Links that only point at a
//! `#privacy` fragment are intercepted and answered with an info
//! notification instead.

use pagekit_core::{Event, NodeId};
use pagekit_runtime::ModuleId;

use crate::behavior::{Behavior, Cx, Mount, Phase};
use crate::notify::Severity;

pub const LOADING_MESSAGE: &str = "Privacy policy is loading...";

/// Whether `href` names the privacy policy.
#[must_use]
pub fn is_privacy_href(href: &str) -> bool {
    href.contains("privacy.html") || href.contains("#privacy")
}

/// Interception of placeholder privacy links.
#[derive(Debug, Default)]
pub struct PrivacyLinks {
    links: Vec<NodeId>,
}

impl PrivacyLinks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Behavior for PrivacyLinks {
    fn module(&self) -> ModuleId {
        ModuleId::PrivacyLinks
    }

    fn mount(&mut self, cx: &mut Cx<'_>) -> Mount {
        self.links = cx.doc.find_all(cx.doc.root(), |el| {
            el.is("a") && el.attr("href").is_some_and(is_privacy_href)
        });
        if self.links.is_empty() {
            return Mount::Skipped("no privacy links");
        }
        Mount::Active
    }

    fn handle(&mut self, phase: Phase, event: &Event, cx: &mut Cx<'_>) {
        let (Phase::Target, Event::Click(target)) = (phase, event) else {
            return;
        };
        let Some(link) = self
            .links
            .iter()
            .copied()
            .find(|&link| cx.doc.contains(link, *target))
        else {
            return;
        };
        if cx.doc.attr(link, "href").is_some_and(|href| href.contains(".html")) {
            return;
        }
        cx.prevent_default();
        cx.notify(LOADING_MESSAGE, Severity::Info);
    }
}
