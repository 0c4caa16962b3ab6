//! SDU Tab Panels
//!
//! Department tab groups:
//! - Exactly one selected tab with its panel visible
//! - Roving tabindex keyboard navigation (arrows, Home, End)
//! - Selection mirrored into the URL fragment and restored from it

mod config;
mod error;
mod keyboard;
mod tab_panel;

pub use config::{CompiledTabs, TabsConfig};
pub use error::TabsError;
pub use keyboard::roving_target;
pub use tab_panel::{SelectOptions, TabEntry, TabPanel};

pub type Result<T> = std::result::Result<T, TabsError>;
