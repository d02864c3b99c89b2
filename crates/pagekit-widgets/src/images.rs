#![forbid(unsafe_code)]

//! Responsive images, lazy loading and broken-image placeholders.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use pagekit_core::{Event, NodeId};
use pagekit_runtime::ModuleId;

use crate::behavior::{Behavior, Cx, Mount, Phase};

const LOGO_CLASS: &str = "c-logo__img";

const PLACEHOLDER_SVG: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">"##,
    r##"<rect width="100" height="100" fill="#e0e0e0"/>"##,
    r##"<text x="50" y="50" text-anchor="middle" dy=".3em" fill="#999" font-size="14">Image</text>"##,
    "</svg>",
);

/// `data:` URI of the grey "Image" placeholder.
#[must_use]
pub fn placeholder_data_uri() -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(PLACEHOLDER_SVG))
}

/// Image enhancement behaviour.
#[derive(Debug, Default)]
pub struct Images {
    images: Vec<NodeId>,
}

impl Images {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Behavior for Images {
    fn module(&self) -> ModuleId {
        ModuleId::Images
    }

    fn mount(&mut self, cx: &mut Cx<'_>) -> Mount {
        self.images = cx.doc.with_tag("img");
        if self.images.is_empty() {
            return Mount::Skipped("no img elements");
        }
        let mut lazy = 0usize;
        for &img in &self.images {
            cx.doc.add_class(img, "img-fluid");
            let eager = cx.doc.element(img).is_some_and(|el| {
                el.has_attr("loading") || el.has_attr("data-critical") || el.has_class(LOGO_CLASS)
            });
            if !eager {
                cx.doc.set_attr(img, "loading", "lazy");
                lazy += 1;
            }
        }
        tracing::debug!(images = self.images.len(), lazy, "images enhanced");
        Mount::Active
    }

    fn handle(&mut self, phase: Phase, event: &Event, cx: &mut Cx<'_>) {
        let (Phase::Target, Event::ImageError(img)) = (phase, event) else {
            return;
        };
        if !self.images.contains(img) {
            return;
        }
        let img = *img;
        tracing::debug!(
            %img,
            src = cx.doc.attr(img, "src").unwrap_or_default(),
            "image failed, using placeholder"
        );
        cx.doc.set_attr(img, "src", &placeholder_data_uri());
        cx.doc.set_style(img, "object-fit", "contain");
        if cx.doc.has_class(img, LOGO_CLASS) {
            cx.doc.set_style(img, "max-height", "40px");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_decodes_to_svg() {
        let uri = placeholder_data_uri();
        let encoded = uri.strip_prefix("data:image/svg+xml;base64,").unwrap();
        let decoded = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert!(decoded.starts_with("<svg"));
        assert!(decoded.contains(">Image</text>"));
        assert!(decoded.contains("fill=\"#e0e0e0\""));
    }
}
