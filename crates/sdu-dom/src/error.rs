//! Platform error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomError {
    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
