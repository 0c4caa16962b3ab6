//! Tab group configuration

use serde::{Deserialize, Serialize};

use sdu_dom::{Document, ElementId, Selector};

use crate::error::TabsError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabsConfig {
    /// Container of one tab group
    pub group: String,
    /// Tab list inside the group; the group itself is used when absent
    pub tablist: String,
    pub tab: String,
    /// Attribute on a tab naming its panel's id
    pub panel_attribute: String,
    pub active_class: String,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            group: ".department-tabs".to_string(),
            tablist: "[role=\"tablist\"]".to_string(),
            tab: "[role=\"tab\"]".to_string(),
            panel_attribute: "aria-controls".to_string(),
            active_class: "is-active".to_string(),
        }
    }
}

impl TabsConfig {
    pub fn validate(&self) -> Result<()> {
        self.compile().map(|_| ())
    }

    pub fn compile(&self) -> Result<CompiledTabs> {
        if self.panel_attribute.trim().is_empty() {
            return Err(TabsError::InvalidConfig("panel attribute is empty".to_string()));
        }
        if self.active_class.trim().is_empty() {
            return Err(TabsError::InvalidConfig("active class is empty".to_string()));
        }

        Ok(CompiledTabs {
            group: Selector::parse(&self.group)?,
            tablist: Selector::parse(&self.tablist)?,
            tab: Selector::parse(&self.tab)?,
            config: self.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct CompiledTabs {
    pub config: TabsConfig,
    pub(crate) group: Selector,
    pub(crate) tablist: Selector,
    pub(crate) tab: Selector,
}

impl CompiledTabs {
    pub fn find_groups(&self, doc: &Document) -> Vec<ElementId> {
        doc.query_selector_all(doc.root(), &self.group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_compiles() {
        assert!(TabsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let config = TabsConfig {
            tab: "[role=".to_string(),
            ..TabsConfig::default()
        };
        assert!(matches!(config.validate(), Err(TabsError::Selector(_))));

        let config = TabsConfig {
            panel_attribute: String::new(),
            ..TabsConfig::default()
        };
        assert!(matches!(config.validate(), Err(TabsError::InvalidConfig(_))));
    }
}
