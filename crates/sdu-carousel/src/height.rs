//! Track height synchronization
//!
//! Inactive slides are usually taken out of flow by CSS, so measuring them
//! means briefly pulling them back in. The transient styles are applied and
//! restored inside one synchronous call; nothing can observe the slide in
//! between as long as layout and script share a single thread.

use sdu_dom::{Document, ElementId, Window};

use crate::config::HeightSync;

/// Inline styles that make a slide measurable without showing it
const MEASURE_STYLES: [(&str, &str); 5] = [
    ("transition", "none"),
    ("position", "relative"),
    ("opacity", "0"),
    ("visibility", "hidden"),
    ("pointer-events", "none"),
];

/// Natural height of a slide, restoring its inline style afterwards
pub(crate) fn measure_slide(doc: &mut Document, slide: ElementId, active_class: &str) -> u32 {
    if doc.has_class(slide, active_class) {
        return doc.offset_height(slide);
    }

    let previous: Vec<(&str, Option<String>)> = MEASURE_STYLES
        .iter()
        .map(|(property, _)| (*property, doc.inline_style(slide, property).map(str::to_owned)))
        .collect();

    for (property, value) in MEASURE_STYLES {
        doc.set_inline_style(slide, property, value);
    }

    let height = doc.offset_height(slide);

    for (property, value) in previous {
        doc.set_inline_style(slide, property, value.as_deref().unwrap_or(""));
    }

    height
}

pub(crate) struct HeightTarget<'a> {
    pub mode: HeightSync,
    pub track: ElementId,
    pub slides: &'a [ElementId],
    pub active: usize,
    pub active_class: &'a str,
    pub narrow_breakpoint_px: u32,
}

/// Apply the height policy to the track
pub(crate) fn sync(window: &mut Window, target: HeightTarget<'_>) {
    match target.mode {
        HeightSync::None => {}
        HeightSync::Tallest => {
            if window.matches_max_width(target.narrow_breakpoint_px) {
                window.document.set_inline_style(target.track, "height", "");
                return;
            }

            let tallest = target
                .slides
                .iter()
                .map(|slide| measure_slide(&mut window.document, *slide, target.active_class))
                .max()
                .unwrap_or(0);

            if tallest == 0 {
                return;
            }

            window
                .document
                .set_inline_style(target.track, "height", &format!("{}px", tallest));
        }
        HeightSync::Active => {
            let Some(slide) = target.slides.get(target.active) else {
                return;
            };
            let height = window.document.offset_height(*slide);
            window
                .document
                .set_inline_style(target.track, "height", &format!("{}px", height));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdu_dom::Selector;

    const MARKUP: &str = r#"
        <div data-track>
            <div class="slide is-active"></div>
            <div class="slide" style="opacity: 0.5"></div>
            <div class="slide"></div>
        </div>
    "#;

    fn setup() -> (Window, ElementId, Vec<ElementId>) {
        let mut window = Window::from_html(MARKUP, "https://example.com/").unwrap();
        let doc = &mut window.document;
        let track = doc
            .query_selector(doc.root(), &Selector::parse("[data-track]").unwrap())
            .unwrap();
        let slides = doc.query_selector_all(track, &Selector::parse(".slide").unwrap());
        doc.set_layout_height(slides[0], 300);
        doc.set_layout_height(slides[1], 420);
        doc.set_layout_height(slides[2], 380);
        (window, track, slides)
    }

    fn target(mode: HeightSync, track: ElementId, slides: &[ElementId]) -> HeightTarget<'_> {
        HeightTarget {
            mode,
            track,
            slides,
            active: 0,
            active_class: "is-active",
            narrow_breakpoint_px: 768,
        }
    }

    #[test]
    fn test_measure_restores_inline_style() {
        let (mut window, _, slides) = setup();
        let before = window.document.attribute(slides[1], "style");

        assert_eq!(measure_slide(&mut window.document, slides[1], "is-active"), 420);
        assert_eq!(window.document.attribute(slides[1], "style"), before);
        assert_eq!(window.document.inline_style(slides[2], "visibility"), None);
    }

    #[test]
    fn test_tallest_slide_wins() {
        let (mut window, track, slides) = setup();
        sync(&mut window, target(HeightSync::Tallest, track, &slides));
        assert_eq!(window.document.inline_style(track, "height"), Some("420px"));
    }

    #[test]
    fn test_narrow_viewport_clears_height() {
        let (mut window, track, slides) = setup();
        sync(&mut window, target(HeightSync::Tallest, track, &slides));

        window.set_viewport(600, 900);
        sync(&mut window, target(HeightSync::Tallest, track, &slides));
        assert_eq!(window.document.inline_style(track, "height"), None);
    }

    #[test]
    fn test_zero_heights_leave_track_alone() {
        let (mut window, track, slides) = setup();
        window.document.set_inline_style(track, "height", "250px");
        for slide in &slides {
            window.document.set_layout_height(*slide, 0);
        }
        sync(&mut window, target(HeightSync::Tallest, track, &slides));
        assert_eq!(window.document.inline_style(track, "height"), Some("250px"));
    }

    #[test]
    fn test_active_mode_follows_active_slide() {
        let (mut window, track, slides) = setup();
        let mut active = target(HeightSync::Active, track, &slides);
        active.active = 2;
        sync(&mut window, active);
        assert_eq!(window.document.inline_style(track, "height"), Some("380px"));

        // Active mode ignores the breakpoint
        window.set_viewport(400, 800);
        sync(&mut window, target(HeightSync::Active, track, &slides));
        assert_eq!(window.document.inline_style(track, "height"), Some("300px"));
    }
}
