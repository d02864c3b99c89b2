#![forbid(unsafe_code)]

//! Marks the navigation link of the current page.

use pagekit_core::Document;
use pagekit_runtime::ModuleId;

use crate::behavior::{Behavior, Cx, Mount};

const LINK_CLASS: &str = "c-nav__link";
pub const ACTIVE_CLASS: &str = "active";

/// Path part of a link href; an empty path means the home page.
#[must_use]
pub fn link_path(href: &str) -> &str {
    match href.split('#').next() {
        Some("") | None => "/",
        Some(path) => path,
    }
}

fn is_current(path: &str, href: &str) -> bool {
    let target = link_path(href);
    if target == path {
        return true;
    }
    matches!(path, "/" | "/index.html") && matches!(target, "/" | "/index.html" | "index.html")
}

/// Mark the first matching `.c-nav__link`. Returns it, if any.
pub fn mark_current(doc: &mut Document) -> Option<pagekit_core::NodeId> {
    let path = doc.location().to_owned();
    let link = doc
        .with_class(LINK_CLASS)
        .into_iter()
        .find(|&link| is_current(&path, doc.attr(link, "href").unwrap_or_default()))?;
    doc.set_attr(link, "aria-current", "page");
    doc.add_class(link, ACTIVE_CLASS);
    Some(link)
}

/// Current-page highlighting for the navigation menu.
#[derive(Debug, Default)]
pub struct ActiveMenu;

impl ActiveMenu {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Behavior for ActiveMenu {
    fn module(&self) -> ModuleId {
        ModuleId::ActiveMenu
    }

    fn mount(&mut self, cx: &mut Cx<'_>) -> Mount {
        if cx.doc.with_class(LINK_CLASS).is_empty() {
            return Mount::Skipped("no .c-nav__link links");
        }
        match mark_current(cx.doc) {
            Some(link) => tracing::debug!(%link, "current page link marked"),
            None => tracing::debug!(path = cx.doc.location(), "no link for current page"),
        }
        Mount::Active
    }
}
