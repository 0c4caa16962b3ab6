//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("DOM error: {0}")]
    Dom(#[from] sdu_dom::DomError),

    #[error("Carousel error: {0}")]
    Carousel(#[from] sdu_carousel::CarouselError),

    #[error("Tabs error: {0}")]
    Tabs(#[from] sdu_tabs::TabsError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
