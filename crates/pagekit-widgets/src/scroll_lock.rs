#![forbid(unsafe_code)]

//! Body scroll lock while an overlay panel is open.

use pagekit_core::Document;

/// Class on `<body>` that disables page scrolling.
pub const NO_SCROLL_CLASS: &str = "u-no-scroll";

pub fn lock(doc: &mut Document) {
    let body = doc.body();
    doc.add_class(body, NO_SCROLL_CLASS);
}

pub fn unlock(doc: &mut Document) {
    let body = doc.body();
    doc.remove_class(body, NO_SCROLL_CLASS);
}

#[must_use]
pub fn is_locked(doc: &Document) -> bool {
    doc.has_class(doc.body(), NO_SCROLL_CLASS)
}
