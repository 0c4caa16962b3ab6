//! CSS selectors
//!
//! Selector lists are parsed with `scraper`'s selector grammar and matched
//! against the owned [`Document`] through the `selectors` matching engine, so
//! the tree stays mutable while queries keep full CSS syntax.

use scraper::error::SelectorErrorKind;
use scraper::selector::{CssLocalName, CssString, NonTSPseudoClass, PseudoElement, Simple};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::bloom::BloomFilter;
use selectors::matching::{self, ElementSelectorFlags, MatchingContext};
use selectors::parser::{ParseRelative, SelectorImpl};
use selectors::{Element, OpaqueElement, SelectorList};

use crate::document::{Document, ElementId};
use crate::error::DomError;
use crate::Result;

/// A parsed selector list
#[derive(Debug, Clone)]
pub struct Selector {
    source: String,
    list: SelectorList<Simple>,
}

impl Selector {
    /// Parse a selector list such as `img[data-src], picture > source`
    pub fn parse(input: &str) -> Result<Self> {
        let source = input.trim();
        let mut parser_input = cssparser::ParserInput::new(source);
        let mut parser = cssparser::Parser::new(&mut parser_input);

        let list = SelectorList::parse(&scraper::selector::Parser, &mut parser, ParseRelative::No)
            .map_err(|e| DomError::InvalidSelector {
                selector: input.to_string(),
                reason: SelectorErrorKind::from(e).to_string(),
            })?;

        Ok(Self {
            source: source.to_string(),
            list,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check whether an element matches any selector in the list
    pub fn matches(&self, doc: &Document, element: ElementId) -> bool {
        let element = DomElement { doc, id: element };
        let mut caches = matching::SelectorCaches::default();
        let mut context = MatchingContext::new(
            matching::MatchingMode::Normal,
            None,
            &mut caches,
            matching::QuirksMode::NoQuirks,
            matching::NeedsSelectorFlags::No,
            matching::MatchingForInvalidation::No,
        );

        self.list
            .slice()
            .iter()
            .any(|selector| matching::matches_selector(selector, 0, None, &element, &mut context))
    }
}

impl PartialEq for Selector {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Selector {}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::str::FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// An element of a [`Document`] as seen by the matcher
#[derive(Clone, Copy)]
struct DomElement<'a> {
    doc: &'a Document,
    id: ElementId,
}

impl DomElement<'_> {
    fn with(&self, id: ElementId) -> Self {
        Self { doc: self.doc, id }
    }

    fn siblings(&self) -> (&[ElementId], Option<usize>) {
        let Some(parent) = self.doc.parent(self.id) else {
            return (&[], None);
        };
        let siblings = self.doc.children(parent);
        let position = siblings.iter().position(|el| *el == self.id);
        (siblings, position)
    }
}

impl std::fmt::Debug for DomElement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}> {:?}", self.doc.tag_name(self.id), self.id)
    }
}

/// Text is not kept in the tree, so `:empty` only looks at child elements.
/// Pseudo-classes beyond the tree-structural ones never match.
impl Element for DomElement<'_> {
    type Impl = Simple;

    fn opaque(&self) -> OpaqueElement {
        self.doc.opaque(self.id)
    }

    fn parent_element(&self) -> Option<Self> {
        self.doc.parent(self.id).map(|parent| self.with(parent))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let (siblings, position) = self.siblings();
        let position = position?.checked_sub(1)?;
        siblings.get(position).map(|el| self.with(*el))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let (siblings, position) = self.siblings();
        siblings.get(position? + 1).map(|el| self.with(*el))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.doc.children(self.id).first().map(|el| self.with(*el))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &<Simple as SelectorImpl>::BorrowedLocalName) -> bool {
        self.doc.tag_name(self.id) == &*local_name.0
    }

    fn has_namespace(&self, ns: &<Simple as SelectorImpl>::BorrowedNamespaceUrl) -> bool {
        &**ns == "http://www.w3.org/1999/xhtml"
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.doc.tag_name(self.id) == other.doc.tag_name(other.id)
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&<Simple as SelectorImpl>::NamespaceUrl>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        // Attributes all live in the null namespace
        if matches!(ns, NamespaceConstraint::Specific(url) if !url.is_empty()) {
            return false;
        }

        self.doc
            .attribute(self.id, &local_name.0)
            .is_some_and(|value| operation.eval_str(&value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Simple>,
    ) -> bool {
        match *pc {}
    }

    fn match_pseudo_element(
        &self,
        pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Simple>,
    ) -> bool {
        match *pe {}
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(self.doc.tag_name(self.id), "a" | "area") && self.doc.has_attribute(self.id, "href")
    }

    fn is_html_slot_element(&self) -> bool {
        self.doc.tag_name(self.id) == "slot"
    }

    fn has_id(&self, id: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.doc
            .attribute(self.id, "id")
            .is_some_and(|value| case_sensitivity.eq(id.0.as_bytes(), value.as_bytes()))
    }

    fn has_class(&self, name: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.doc
            .classes(self.id)
            .iter()
            .any(|class| case_sensitivity.eq(name.0.as_bytes(), class.as_bytes()))
    }

    fn has_custom_state(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn imported_part(&self, _name: &CssLocalName) -> Option<CssLocalName> {
        None
    }

    fn is_part(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.doc.children(self.id).is_empty()
    }

    fn is_root(&self) -> bool {
        self.id == self.doc.root()
    }

    fn add_element_unique_hashes(&self, _filter: &mut BloomFilter) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKUP: &str = r#"
        <div class="hero" data-hero-slider>
            <div data-hero-slide class="slide is-active">
                <picture><source srcset="a.webp"><img class="bg" src="a.jpg"></picture>
            </div>
            <div data-hero-slide class="slide"><img data-src="b.jpg"></div>
            <button role="tab" aria-controls="panel-a">A</button>
            <span id="a:b" data-hero-dot="10"></span>
        </div>
    "#;

    fn select(doc: &Document, selector: &str) -> Vec<ElementId> {
        doc.query_selector_all(doc.root(), &Selector::parse(selector).unwrap())
    }

    #[test]
    fn test_parse_forms() {
        for selector in [
            "[data-hero-slider]",
            "img[data-preload], img.bg, picture source",
            "[role=\"tab\"]",
            "[role='tab']",
            "*",
            ".site-header .container",
            ".site-header > .container",
            "img:not([data-src])",
            "[data-hero-slide]:first-child",
            "[data-hero-dot^=\"1\"]",
            "#a\\:b",
        ] {
            assert!(Selector::parse(selector).is_ok(), "{} should parse", selector);
        }
    }

    #[test]
    fn test_parse_rejects_invalid() {
        for selector in ["", "[data-x", "a,", ".", "div >", "::nonsense"] {
            let err = Selector::parse(selector).unwrap_err();
            assert!(matches!(err, DomError::InvalidSelector { .. }), "{}", selector);
        }
    }

    #[test]
    fn test_matching() {
        let doc = Document::parse_html(MARKUP);

        let slides = select(&doc, "[data-hero-slide]");
        assert_eq!(slides.len(), 2);

        assert_eq!(select(&doc, ".slide.is-active"), vec![slides[0]]);
        assert_eq!(select(&doc, "img[data-src], img.bg, picture source").len(), 3);
        assert_eq!(select(&doc, "[role='tab'][aria-controls=panel-a]").len(), 1);
        assert_eq!(select(&doc, "div"), select(&doc, "DIV"));
    }

    #[test]
    fn test_combinators() {
        let doc = Document::parse_html(MARKUP);

        assert_eq!(select(&doc, "[data-hero-slider] picture source").len(), 1);
        assert!(select(&doc, "button picture").is_empty());

        // Child, not descendant
        assert!(select(&doc, "[data-hero-slider] > img").is_empty());
        assert_eq!(select(&doc, "[data-hero-slide] > img").len(), 1);

        assert_eq!(select(&doc, "[data-hero-slide] + [data-hero-slide]").len(), 1);
        assert_eq!(select(&doc, "[data-hero-slide] ~ button").len(), 1);
    }

    #[test]
    fn test_structural_and_negation() {
        let doc = Document::parse_html(MARKUP);
        let slides = select(&doc, "[data-hero-slide]");

        assert_eq!(select(&doc, "[data-hero-slide]:first-child"), vec![slides[0]]);
        assert_eq!(select(&doc, "[data-hero-slide]:nth-of-type(2)"), vec![slides[1]]);
        assert_eq!(select(&doc, "img:not([data-src])").len(), 1);
        assert_eq!(select(&doc, ":root"), vec![doc.root()]);
        assert_eq!(select(&doc, "source:empty").len(), 1);
    }

    #[test]
    fn test_attribute_operators_and_escapes() {
        let doc = Document::parse_html(MARKUP);

        assert_eq!(select(&doc, "[data-hero-dot^=\"1\"]").len(), 1);
        assert_eq!(select(&doc, "[data-src$='.jpg']").len(), 1);
        assert_eq!(select(&doc, "[class~=is-active]").len(), 1);
        assert_eq!(select(&doc, "#a\\:b").len(), 1);
    }

    #[test]
    fn test_matches_after_mutation() {
        let mut doc = Document::parse_html(MARKUP);
        let slides = select(&doc, "[data-hero-slide]");
        let active = Selector::parse(".is-active").unwrap();

        doc.toggle_class(slides[0], "is-active", false);
        doc.add_class(slides[1], "is-active");

        assert!(!active.matches(&doc, slides[0]));
        assert!(active.matches(&doc, slides[1]));
    }

    #[test]
    fn test_display_is_source() {
        let selector: Selector = " .site-header  .container ".parse().unwrap();
        assert_eq!(selector.to_string(), ".site-header  .container");
        assert_eq!(selector.as_str(), selector.to_string());
    }
}
