//! Site configuration

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use sdu_carousel::CarouselConfig;
use sdu_dom::Selector;
use sdu_tabs::TabsConfig;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Carousels to mount, in order
    pub carousels: Vec<CarouselConfig>,
    pub tabs: TabsConfig,
    /// Viewport width at or below which tallest-slide height sync is off
    pub narrow_breakpoint_px: u32,
    /// Present once the shared header include has been injected
    pub ready_selector: String,
    /// Added to the `<html>` element when scripting runs
    pub js_enabled_class: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            carousels: vec![
                CarouselConfig::hero(),
                CarouselConfig::about(),
                CarouselConfig::video(),
            ],
            tabs: TabsConfig::default(),
            narrow_breakpoint_px: 768,
            ready_selector: ".site-header .container".to_string(),
            js_enabled_class: "js-enabled".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load a configuration file, filling unspecified fields with defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;

        tracing::info!(path = %path.display(), carousels = config.carousels.len(), "Site config loaded");

        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every selector parses and carousel names are unique
    pub fn validate(&self) -> Result<()> {
        if self.js_enabled_class.trim().is_empty() {
            return Err(CoreError::Config("js-enabled class is empty".to_string()));
        }

        Selector::parse(&self.ready_selector)?;
        self.tabs.validate()?;

        let mut names = HashSet::new();
        for carousel in &self.carousels {
            carousel.validate()?;
            if !names.insert(carousel.name.as_str()) {
                return Err(CoreError::Config(format!(
                    "duplicate carousel name `{}`",
                    carousel.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdu_carousel::HeightSync;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert!(config.validate().is_ok());

        let names: Vec<&str> = config.carousels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["hero", "about", "video"]);
        assert_eq!(config.ready_selector, ".site-header .container");
    }

    #[test]
    fn test_partial_json() {
        let config = SiteConfig::from_json_str(
            r#"{
                "narrow_breakpoint_px": 640,
                "carousels": [
                    { "name": "hero" },
                    { "name": "gallery", "root": "[data-gallery]", "height_sync": "active" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.narrow_breakpoint_px, 640);
        assert_eq!(config.carousels.len(), 2);
        assert_eq!(config.carousels[1].height_sync, HeightSync::Active);
        assert_eq!(config.tabs, TabsConfig::default());
        assert_eq!(config.js_enabled_class, "js-enabled");
    }

    #[test]
    fn test_accepts_full_css_selectors() {
        let config = SiteConfig::from_json_str(
            r#"{
                "ready_selector": ".site-header > .container",
                "tabs": { "tab": "[role=tab]:not([aria-disabled=true])" },
                "carousels": [{ "name": "hero", "dot": "[data-hero-dot^=\"\"]" }]
            }"#,
        )
        .unwrap();
        assert_eq!(config.ready_selector, ".site-header > .container");
    }

    #[test]
    fn test_rejects_bad_config() {
        let bad_selector = SiteConfig::from_json_str(r#"{ "ready_selector": "header >" }"#);
        assert!(matches!(bad_selector, Err(CoreError::Dom(_))));

        let duplicate = SiteConfig::from_json_str(
            r#"{ "carousels": [{ "name": "hero" }, { "name": "hero" }] }"#,
        );
        assert!(matches!(duplicate, Err(CoreError::Config(_))));

        let bad_tabs = SiteConfig::from_json_str(r#"{ "tabs": { "tab": "[role=" } }"#);
        assert!(matches!(bad_tabs, Err(CoreError::Tabs(_))));

        assert!(matches!(
            SiteConfig::from_json_str("{ not json"),
            Err(CoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("sdu-site-config-{}.json", std::process::id()));
        std::fs::write(&path, SiteConfig::default().to_json().unwrap()).unwrap();

        let loaded = SiteConfig::load(&path).unwrap();
        assert_eq!(loaded, SiteConfig::default());

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(SiteConfig::load(&path), Err(CoreError::Io(_))));
    }
}
