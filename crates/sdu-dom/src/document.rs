//! Document tree
//!
//! Markup is parsed once with `scraper` into an owned, mutable element tree.
//! Structure is fixed after parsing; classes, attributes and inline style can
//! change. Every write goes through a counted mutation so callers can verify
//! that a component left the document untouched.

use scraper::{ElementRef, Html};
use selectors::OpaqueElement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::selector::Selector;
use crate::Result;

/// Handle to an element in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(usize);

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    /// All attributes except `class` and `style`
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    style: Vec<(String, String)>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    layout_height: u32,
}

#[derive(Debug, Clone)]
struct StyleRule {
    selector: Selector,
    declarations: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    rules: Vec<StyleRule>,
    focused: Option<ElementId>,
    mutations: u64,
}

impl Document {
    /// Parse a full HTML document
    pub fn parse_html(markup: &str) -> Self {
        let html = Html::parse_document(markup);
        let mut doc = Self {
            nodes: Vec::new(),
            rules: Vec::new(),
            focused: None,
            mutations: 0,
        };
        doc.append_element(html.root_element(), None);
        doc
    }

    fn append_element(&mut self, element: ElementRef<'_>, parent: Option<ElementId>) -> ElementId {
        let value = element.value();
        let mut attributes = BTreeMap::new();
        let mut classes = Vec::new();
        let mut style = Vec::new();

        for (name, attr_value) in value.attrs() {
            match name {
                "class" => classes = split_classes(attr_value),
                "style" => style = parse_declarations(attr_value),
                _ => {
                    attributes.insert(name.to_ascii_lowercase(), attr_value.to_string());
                }
            }
        }

        let id = ElementId(self.nodes.len());
        self.nodes.push(Node {
            tag: value.name().to_ascii_lowercase(),
            attributes,
            classes,
            style,
            parent,
            children: Vec::new(),
            layout_height: 0,
        });

        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }

        for child in element.children().filter_map(ElementRef::wrap) {
            self.append_element(child, Some(id));
        }

        id
    }

    fn node(&self, element: ElementId) -> &Node {
        &self.nodes[element.0]
    }

    fn node_mut(&mut self, element: ElementId) -> &mut Node {
        self.mutations += 1;
        &mut self.nodes[element.0]
    }

    /// The `<html>` element
    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn tag_name(&self, element: ElementId) -> &str {
        &self.node(element).tag
    }

    pub fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.node(element).parent
    }

    pub fn children(&self, element: ElementId) -> &[ElementId] {
        &self.node(element).children
    }

    /// Identity of the element's node for the selector matcher
    pub(crate) fn opaque(&self, element: ElementId) -> OpaqueElement {
        OpaqueElement::new(self.node(element))
    }

    /// Number of write operations applied since parsing
    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    // === Attributes ===

    pub fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        let node = self.node(element);
        match name {
            "class" if !node.classes.is_empty() => Some(node.classes.join(" ")),
            "class" => None,
            "style" if !node.style.is_empty() => Some(serialize_declarations(&node.style)),
            "style" => None,
            _ => node.attributes.get(name).cloned(),
        }
    }

    pub fn has_attribute(&self, element: ElementId, name: &str) -> bool {
        let node = self.node(element);
        match name {
            "class" => !node.classes.is_empty(),
            "style" => !node.style.is_empty(),
            _ => node.attributes.contains_key(name),
        }
    }

    pub fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        let node = self.node_mut(element);
        match name.as_str() {
            "class" => node.classes = split_classes(value),
            "style" => node.style = parse_declarations(value),
            _ => {
                node.attributes.insert(name, value.to_string());
            }
        }
    }

    pub fn remove_attribute(&mut self, element: ElementId, name: &str) {
        let node = self.node_mut(element);
        match name {
            "class" => node.classes.clear(),
            "style" => node.style.clear(),
            _ => {
                node.attributes.remove(name);
            }
        }
    }

    // === Classes ===

    pub fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.classes(element).iter().any(|c| c == class)
    }

    /// Class list in source order, without duplicates
    pub fn classes(&self, element: ElementId) -> &[String] {
        &self.node(element).classes
    }

    /// Add or remove a class depending on `on`
    pub fn toggle_class(&mut self, element: ElementId, class: &str, on: bool) {
        let node = self.node_mut(element);
        let present = node.classes.iter().position(|c| c == class);
        match (present, on) {
            (None, true) => node.classes.push(class.to_string()),
            (Some(index), false) => {
                node.classes.remove(index);
            }
            _ => {}
        }
    }

    pub fn add_class(&mut self, element: ElementId, class: &str) {
        self.toggle_class(element, class, true);
    }

    // === Style ===

    pub fn inline_style(&self, element: ElementId, property: &str) -> Option<&str> {
        self.node(element)
            .style
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Set an inline style property; an empty value removes it
    pub fn set_inline_style(&mut self, element: ElementId, property: &str, value: &str) {
        let node = self.node_mut(element);
        let existing = node.style.iter().position(|(name, _)| name == property);
        match (existing, value.is_empty()) {
            (Some(index), true) => {
                node.style.remove(index);
            }
            (Some(index), false) => node.style[index].1 = value.to_string(),
            (None, false) => node.style.push((property.to_string(), value.to_string())),
            (None, true) => {}
        }
    }

    /// Register a stylesheet rule. Later rules win, inline style wins over all.
    pub fn add_style_rule(&mut self, selector: &str, declarations: &[(&str, &str)]) -> Result<()> {
        let selector = Selector::parse(selector)?;
        self.rules.push(StyleRule {
            selector,
            declarations: declarations
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        });
        Ok(())
    }

    pub fn computed_style(&self, element: ElementId, property: &str) -> Option<String> {
        if let Some(value) = self.inline_style(element, property) {
            return Some(value.to_string());
        }

        let mut computed = None;
        for rule in &self.rules {
            if !rule.selector.matches(self, element) {
                continue;
            }
            if let Some((_, value)) = rule.declarations.iter().rev().find(|(name, _)| name == property) {
                computed = Some(value.clone());
            }
        }
        computed
    }

    // === Layout ===

    /// Set the natural rendered height of an element
    pub fn set_layout_height(&mut self, element: ElementId, height: u32) {
        self.nodes[element.0].layout_height = height;
    }

    /// Rendered height; zero when the element or an ancestor is not rendered
    pub fn offset_height(&self, element: ElementId) -> u32 {
        let mut current = Some(element);
        while let Some(el) = current {
            if self.has_attribute(el, "hidden")
                || self.computed_style(el, "display").as_deref() == Some("none")
            {
                return 0;
            }
            current = self.parent(el);
        }
        self.node(element).layout_height
    }

    // === Focus ===

    pub fn focus(&mut self, element: ElementId) {
        self.mutations += 1;
        self.focused = Some(element);
    }

    pub fn blur(&mut self) {
        self.mutations += 1;
        self.focused = None;
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    // === Queries ===

    /// Inclusive containment, like `Node.contains`
    pub fn contains(&self, ancestor: ElementId, element: ElementId) -> bool {
        let mut current = Some(element);
        while let Some(el) = current {
            if el == ancestor {
                return true;
            }
            current = self.parent(el);
        }
        false
    }

    /// Descendants of `scope` in document order, excluding `scope` itself
    pub fn descendants(&self, scope: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut stack: Vec<ElementId> = self.children(scope).iter().rev().copied().collect();
        while let Some(el) = stack.pop() {
            result.push(el);
            stack.extend(self.children(el).iter().rev().copied());
        }
        result
    }

    pub fn query_selector(&self, scope: ElementId, selector: &Selector) -> Option<ElementId> {
        self.descendants(scope)
            .into_iter()
            .find(|el| selector.matches(self, *el))
    }

    pub fn query_selector_all(&self, scope: ElementId, selector: &Selector) -> Vec<ElementId> {
        self.descendants(scope)
            .into_iter()
            .filter(|el| selector.matches(self, *el))
            .collect()
    }

    pub fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.nodes
            .iter()
            .position(|node| node.attributes.get("id").map(String::as_str) == Some(id))
            .map(ElementId)
    }
}

fn split_classes(value: &str) -> Vec<String> {
    let mut classes: Vec<String> = Vec::new();
    for class in value.split_whitespace() {
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }
    classes
}

fn parse_declarations(value: &str) -> Vec<(String, String)> {
    value
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .filter(|(name, value)| !name.is_empty() && !value.is_empty())
        .collect()
}

fn serialize_declarations(style: &[(String, String)]) -> String {
    style
        .iter()
        .map(|(name, value)| format!("{}: {};", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKUP: &str = r#"
        <html><body>
            <section id="slider" class="slider  slider" style="height: 10px; --hero-background: red">
                <div class="slide is-active">One</div>
                <div class="slide" hidden><span>Two</span></div>
            </section>
        </body></html>
    "#;

    fn slides(doc: &Document) -> Vec<ElementId> {
        doc.query_selector_all(doc.root(), &Selector::parse(".slide").unwrap())
    }

    #[test]
    fn test_parse_structure() {
        let doc = Document::parse_html(MARKUP);
        assert_eq!(doc.tag_name(doc.root()), "html");

        let slider = doc.element_by_id("slider").unwrap();
        assert_eq!(doc.tag_name(slider), "section");
        assert_eq!(doc.attribute(slider, "class").as_deref(), Some("slider"));
        assert_eq!(doc.inline_style(slider, "height"), Some("10px"));
        assert_eq!(doc.inline_style(slider, "--hero-background"), Some("red"));
        assert_eq!(slides(&doc).len(), 2);
        assert!(doc.contains(slider, slides(&doc)[1]));
        assert!(!doc.contains(slides(&doc)[0], slider));
        assert_eq!(doc.mutation_count(), 0);
    }

    #[test]
    fn test_class_and_attribute_writes() {
        let mut doc = Document::parse_html(MARKUP);
        let second = slides(&doc)[1];

        doc.toggle_class(second, "is-active", true);
        doc.toggle_class(second, "is-active", true);
        assert!(doc.has_class(second, "is-active"));
        assert_eq!(doc.attribute(second, "class").as_deref(), Some("slide is-active"));

        doc.remove_attribute(second, "hidden");
        doc.set_attribute(second, "aria-hidden", "false");
        assert!(!doc.has_attribute(second, "hidden"));
        assert_eq!(doc.attribute(second, "aria-hidden").as_deref(), Some("false"));
        assert_eq!(doc.mutation_count(), 4);
    }

    #[test]
    fn test_inline_style_removal() {
        let mut doc = Document::parse_html(MARKUP);
        let slider = doc.element_by_id("slider").unwrap();

        doc.set_inline_style(slider, "height", "");
        assert_eq!(doc.inline_style(slider, "height"), None);

        doc.set_inline_style(slider, "opacity", "0");
        assert_eq!(
            doc.attribute(slider, "style").as_deref(),
            Some("--hero-background: red; opacity: 0;")
        );
    }

    #[test]
    fn test_computed_style_and_offset_height() {
        let mut doc = Document::parse_html(MARKUP);
        let all = slides(&doc);
        doc.set_layout_height(all[0], 320);
        doc.set_layout_height(all[1], 400);

        assert_eq!(doc.offset_height(all[0]), 320);
        // hidden attribute
        assert_eq!(doc.offset_height(all[1]), 0);

        doc.add_style_rule(".slide", &[("display", "none")]).unwrap();
        doc.add_style_rule(".slide.is-active", &[("display", "block")]).unwrap();
        assert_eq!(doc.computed_style(all[0], "display").as_deref(), Some("block"));
        assert_eq!(doc.offset_height(all[0]), 320);

        doc.remove_attribute(all[1], "hidden");
        assert_eq!(doc.offset_height(all[1]), 0);
        doc.set_inline_style(all[1], "display", "block");
        assert_eq!(doc.offset_height(all[1]), 400);
    }

    #[test]
    fn test_focus_tracking() {
        let mut doc = Document::parse_html(MARKUP);
        let first = slides(&doc)[0];
        assert!(doc.focused().is_none());
        doc.focus(first);
        assert_eq!(doc.focused(), Some(first));
        doc.blur();
        assert!(doc.focused().is_none());
    }
}
