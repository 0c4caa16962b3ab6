//! Carousel configuration
//!
//! The three site sliders differ only in selectors, timing and a handful of
//! presentation switches, all captured here.

use serde::{Deserialize, Serialize};

use sdu_dom::{Document, ElementId, Selector};

use crate::error::CarouselError;
use crate::Result;

/// How the track height follows the slides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightSync {
    /// Leave height to CSS
    None,
    /// Tallest slide, disabled at or below the narrow breakpoint
    Tallest,
    /// Height of the active slide
    Active,
}

/// Which hover events pause autoplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverPause {
    Pointer,
    Mouse,
}

/// How a dot click resolves to a slide index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DotTarget {
    /// Numeric value of the named attribute; non-numeric values make the dot inert
    Attribute(String),
    /// Position of the dot among its siblings
    Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Name used in logs and lookups
    pub name: String,
    pub root: String,
    /// When set, a root without a matching track is left alone
    pub track: Option<String>,
    pub slide: String,
    pub dot: String,
    pub prev: String,
    pub next: String,
    /// Attribute on the root holding the interval in milliseconds
    pub interval_attribute: String,
    /// Used when the attribute is absent or not a positive number; 0 disables autoplay
    pub default_interval_ms: u64,
    pub active_class: String,
    pub height_sync: HeightSync,
    pub narrow_breakpoint_px: u32,
    pub hover_pause: HoverPause,
    pub dot_target: DotTarget,
    /// Mirror `data-active="true|false"` on dots
    pub dot_data_active: bool,
    /// Active dot gets `tabindex=0`, the rest `-1`
    pub dot_roving_tabindex: bool,
    pub keyboard: bool,
    /// Custom property copied from the active slide onto the root
    pub background_property: Option<String>,
    /// Images inside slides to fetch eagerly; `None` disables preloading
    pub preload_selector: Option<String>,
    /// Mount every matching root instead of the first
    pub all_instances: bool,
}

impl CarouselConfig {
    /// Full-width hero slider on the landing page
    pub fn hero() -> Self {
        Self {
            name: "hero".to_string(),
            root: "[data-hero-slider]".to_string(),
            track: Some("[data-hero-track]".to_string()),
            slide: "[data-hero-slide]".to_string(),
            dot: "[data-hero-dot]".to_string(),
            prev: "[data-hero-prev]".to_string(),
            next: "[data-hero-next]".to_string(),
            interval_attribute: "data-hero-interval".to_string(),
            default_interval_ms: 8000,
            active_class: "is-active".to_string(),
            height_sync: HeightSync::Tallest,
            narrow_breakpoint_px: 768,
            hover_pause: HoverPause::Pointer,
            dot_target: DotTarget::Attribute("data-hero-dot".to_string()),
            dot_data_active: true,
            dot_roving_tabindex: false,
            keyboard: true,
            background_property: Some("--hero-background".to_string()),
            preload_selector: Some(
                "img[data-preload], img[data-src], img[data-lazy], img.bg, picture source"
                    .to_string(),
            ),
            all_instances: false,
        }
    }

    /// Image slider in the about section
    pub fn about() -> Self {
        Self {
            name: "about".to_string(),
            root: "[data-about-slider]".to_string(),
            track: None,
            slide: "[data-about-slide]".to_string(),
            dot: "[data-about-dot]".to_string(),
            prev: "[data-about-prev]".to_string(),
            next: "[data-about-next]".to_string(),
            interval_attribute: "data-about-interval".to_string(),
            default_interval_ms: 5000,
            height_sync: HeightSync::None,
            hover_pause: HoverPause::Mouse,
            dot_target: DotTarget::Position,
            dot_roving_tabindex: true,
            keyboard: false,
            background_property: None,
            preload_selector: None,
            ..Self::hero()
        }
    }

    /// Video testimonial sliders; a page may carry several
    pub fn video() -> Self {
        Self {
            name: "video".to_string(),
            root: "[data-video-slider]".to_string(),
            track: Some("[data-video-track]".to_string()),
            slide: "[data-video-slide]".to_string(),
            dot: "[data-video-dot]".to_string(),
            prev: "[data-video-prev]".to_string(),
            next: "[data-video-next]".to_string(),
            interval_attribute: "data-video-interval".to_string(),
            default_interval_ms: 12000,
            height_sync: HeightSync::Active,
            dot_target: DotTarget::Attribute("data-video-dot".to_string()),
            dot_data_active: false,
            background_property: None,
            preload_selector: None,
            all_instances: true,
            ..Self::hero()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check names and parse every selector
    pub fn validate(&self) -> Result<()> {
        self.compile().map(|_| ())
    }

    pub fn compile(&self) -> Result<CompiledCarousel> {
        if self.name.trim().is_empty() {
            return Err(CarouselError::InvalidConfig("carousel name is empty".to_string()));
        }
        if self.active_class.trim().is_empty() {
            return Err(CarouselError::InvalidConfig(format!(
                "carousel `{}` has an empty active class",
                self.name
            )));
        }
        if let DotTarget::Attribute(attr) = &self.dot_target {
            if attr.trim().is_empty() {
                return Err(CarouselError::InvalidConfig(format!(
                    "carousel `{}` reads dot targets from an unnamed attribute",
                    self.name
                )));
            }
        }

        let parse = |source: &str| {
            Selector::parse(source).map_err(|source| CarouselError::Selector {
                carousel: self.name.clone(),
                source,
            })
        };

        Ok(CompiledCarousel {
            root: parse(&self.root)?,
            track: self.track.as_deref().map(parse).transpose()?,
            slide: parse(&self.slide)?,
            dot: parse(&self.dot)?,
            prev: parse(&self.prev)?,
            next: parse(&self.next)?,
            preload: self.preload_selector.as_deref().map(parse).transpose()?,
            config: self.clone(),
        })
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self::hero()
    }
}

/// A configuration with its selectors parsed
#[derive(Debug, Clone)]
pub struct CompiledCarousel {
    pub config: CarouselConfig,
    pub(crate) root: Selector,
    pub(crate) track: Option<Selector>,
    pub(crate) slide: Selector,
    pub(crate) dot: Selector,
    pub(crate) prev: Selector,
    pub(crate) next: Selector,
    pub(crate) preload: Option<Selector>,
}

impl CompiledCarousel {
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Roots to mount on: the first match, or all of them
    pub fn find_roots(&self, doc: &Document) -> Vec<ElementId> {
        if self.config.all_instances {
            doc.query_selector_all(doc.root(), &self.root)
        } else {
            doc.query_selector(doc.root(), &self.root)
                .into_iter()
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_compile() {
        for config in [CarouselConfig::hero(), CarouselConfig::about(), CarouselConfig::video()] {
            assert!(config.validate().is_ok(), "{} should compile", config.name);
        }
    }

    #[test]
    fn test_preset_differences() {
        let about = CarouselConfig::about();
        assert_eq!(about.hover_pause, HoverPause::Mouse);
        assert_eq!(about.dot_target, DotTarget::Position);
        assert!(about.track.is_none());
        assert_eq!(about.active_class, "is-active");

        let video = CarouselConfig::video();
        assert!(video.all_instances);
        assert_eq!(video.height_sync, HeightSync::Active);
        assert_eq!(video.default_interval_ms, 12000);
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let config = CarouselConfig {
            slide: "[data-hero-slide] >".to_string(),
            ..CarouselConfig::hero()
        };
        assert!(matches!(config.validate(), Err(CarouselError::Selector { .. })));

        let config = CarouselConfig {
            name: " ".to_string(),
            ..CarouselConfig::hero()
        };
        assert!(matches!(config.validate(), Err(CarouselError::InvalidConfig(_))));
    }

    #[test]
    fn test_json_overrides_fill_defaults() {
        let config = CarouselConfig::from_json(
            r#"{ "name": "promo", "root": "[data-promo]", "default_interval_ms": 0,
                 "dot_target": "position", "height_sync": "none" }"#,
        )
        .unwrap();

        assert_eq!(config.name, "promo");
        assert_eq!(config.default_interval_ms, 0);
        assert_eq!(config.dot_target, DotTarget::Position);
        assert_eq!(config.height_sync, HeightSync::None);
        // Unspecified fields come from the hero preset
        assert_eq!(config.slide, "[data-hero-slide]");
    }

    #[test]
    fn test_find_roots_first_or_all() {
        let doc = Document::parse_html(
            r#"<div data-video-slider></div><div data-video-slider></div>"#,
        );
        let video = CarouselConfig::video().compile().unwrap();
        assert_eq!(video.find_roots(&doc).len(), 2);

        let single = CarouselConfig {
            all_instances: false,
            ..CarouselConfig::video()
        };
        assert_eq!(single.compile().unwrap().find_roots(&doc).len(), 1);
    }
}
