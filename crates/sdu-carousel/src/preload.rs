//! Eager fetching of lazily loaded slide images

use sdu_dom::{ElementId, ImageRequest, Selector, Window};

/// Attributes holding an image source, in priority order
const SOURCE_ATTRIBUTES: [&str; 4] = ["data-src", "data-lazy", "src", "srcset"];

/// Collect deduplicated image sources from every slide
pub(crate) fn collect_sources(
    window: &Window,
    slides: &[ElementId],
    selector: &Selector,
) -> Vec<ImageRequest> {
    let doc = &window.document;
    let mut requests: Vec<ImageRequest> = Vec::new();

    for slide in slides {
        for image in doc.query_selector_all(*slide, selector) {
            let source = SOURCE_ATTRIBUTES
                .iter()
                .filter_map(|attr| doc.attribute(image, attr))
                .find(|value| !value.is_empty());

            let Some(source) = source else {
                continue;
            };

            if requests.iter().any(|r| r.source == source) {
                continue;
            }

            let request = if doc.tag_name(image) == "source" {
                ImageRequest::srcset(source)
            } else {
                ImageRequest::src(source)
            };
            requests.push(request);
        }
    }

    requests
}

/// Fire-and-forget preload; returns how many new fetches were queued
pub(crate) fn preload(window: &Window, slides: &[ElementId], selector: &Selector) -> usize {
    collect_sources(window, slides, selector)
        .into_iter()
        .map(|request| window.preload_image(request))
        .filter(|queued| *queued)
        .count()
}
