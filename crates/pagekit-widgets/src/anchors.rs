#![forbid(unsafe_code)]

//! In-page anchor links.
//!
//! On pages other than the home page, fragment-only links (`#about`) are
//! rewritten to point at the home page (`/#about`), since the sections they
//! name live there. Clicks on links whose fragment target exists on the
//! current page are turned into a smooth scroll that leaves room for the
//! sticky header. A fragment whose target is absent is not intercepted, so a
//! rewritten `/#id` still navigates to the home page.

use pagekit_core::{Document, Event};
use pagekit_runtime::ModuleId;

use crate::behavior::{Behavior, Cx, Effect, Mount, Phase, header_height};

/// Whether `path` is the home page.
#[must_use]
pub fn is_home_path(path: &str) -> bool {
    matches!(path, "/" | "/index.html" | "index.html")
}

/// Fragment id of an in-page link (`#id` or `/#id`).
#[must_use]
pub fn fragment_target(href: &str) -> Option<&str> {
    let rest = href.strip_prefix('/').unwrap_or(href);
    rest.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Point fragment-only links at the home page. Returns how many changed.
pub fn rewrite_for_home(doc: &mut Document) -> usize {
    let links = doc.find_all(doc.root(), |el| {
        el.is("a")
            && el
                .attr("href")
                .is_some_and(|href| href.starts_with('#') && href != "#" && href != "#!")
    });
    for &link in &links {
        let href = format!("/{}", doc.attr(link, "href").unwrap_or_default());
        doc.set_attr(link, "href", &href);
    }
    links.len()
}

/// Smooth scrolling for in-page anchors.
#[derive(Debug, Default)]
pub struct Anchors;

impl Anchors {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Behavior for Anchors {
    fn module(&self) -> ModuleId {
        ModuleId::Anchors
    }

    fn mount(&mut self, cx: &mut Cx<'_>) -> Mount {
        if !is_home_path(cx.doc.location()) {
            let rewritten = rewrite_for_home(cx.doc);
            tracing::debug!(rewritten, "anchor links pointed at home page");
        }
        Mount::Active
    }

    fn handle(&mut self, phase: Phase, event: &Event, cx: &mut Cx<'_>) {
        let (Phase::Document, Event::Click(target)) = (phase, event) else {
            return;
        };
        let Some(link) = cx.doc.closest(*target, |el| el.is("a")) else {
            return;
        };
        let Some(href) = cx.doc.attr(link, "href") else {
            return;
        };
        if matches!(href, "" | "#" | "#!") {
            return;
        }
        let Some(section) = fragment_target(href).and_then(|id| cx.doc.by_id(id)) else {
            return;
        };
        cx.prevent_default();
        let top = cx.doc.offset_top(section) - header_height(cx.doc, cx.config);
        cx.emit(Effect::ScrollTo { top, smooth: true });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_paths() {
        assert!(is_home_path("/"));
        assert!(is_home_path("/index.html"));
        assert!(is_home_path("index.html"));
        assert!(!is_home_path("/about.html"));
    }

    #[test]
    fn fragment_targets() {
        assert_eq!(fragment_target("#about"), Some("about"));
        assert_eq!(fragment_target("/#about"), Some("about"));
        assert_eq!(fragment_target("#"), None);
        assert_eq!(fragment_target("/about.html#team"), None);
    }

    #[test]
    fn rewrite_skips_bare_fragments() {
        let mut doc = Document::at_path("/about.html");
        let body = doc.body();
        let services = doc.build("a").attr("href", "#services").append_to(body).unwrap();
        let bare = doc.build("a").attr("href", "#").append_to(body).unwrap();
        let bang = doc.build("a").attr("href", "#!").append_to(body).unwrap();
        let page = doc.build("a").attr("href", "/contact.html").append_to(body).unwrap();
        assert_eq!(rewrite_for_home(&mut doc), 1);
        assert_eq!(doc.attr(services, "href"), Some("/#services"));
        assert_eq!(doc.attr(bare, "href"), Some("#"));
        assert_eq!(doc.attr(bang, "href"), Some("#!"));
        assert_eq!(doc.attr(page, "href"), Some("/contact.html"));
    }
}
