//! SDU Core
//!
//! Page-level context for the site widgets. A [`Site`] owns the window, mounts
//! every configured carousel and tab group exactly once, and routes platform
//! events, timer ticks and animation frames to the component that owns them.

mod config;
mod error;
mod site;

pub use config::SiteConfig;
pub use error::CoreError;
pub use site::{InitState, Site};

// Re-export the components
pub use sdu_carousel::{Carousel, CarouselConfig, CarouselError, DotTarget, HeightSync, HoverPause};
pub use sdu_dom::{
    Document, DomError, DomEvent, ElementId, EventOutcome, ImageCache, Key, Location, Selector,
    Timers, Viewport, Window,
};
pub use sdu_tabs::{SelectOptions, TabPanel, TabsConfig, TabsError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
