//! Tab panel error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabsError {
    #[error("Invalid tabs selector: {0}")]
    Selector(#[from] sdu_dom::DomError),

    #[error("Invalid tabs configuration: {0}")]
    InvalidConfig(String),
}
