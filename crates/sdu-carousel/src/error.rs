//! Carousel error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CarouselError {
    #[error("Invalid selector for carousel `{carousel}`: {source}")]
    Selector {
        carousel: String,
        #[source]
        source: sdu_dom::DomError,
    },

    #[error("Invalid carousel configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
