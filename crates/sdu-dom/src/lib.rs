//! SDU Site Platform Model
//!
//! A headless stand-in for the browser surface the site widgets run against:
//! - Document tree parsed from markup, with classes, attributes and inline style
//! - CSS selector subset for querying
//! - Location and session history for hash routing
//! - Virtual-clock timers and animation frames
//! - Image preload cache
//!
//! Everything is single-threaded. Components borrow the [`Window`] mutably for
//! the duration of one event or timer callback.

mod document;
mod error;
mod event;
mod images;
mod location;
mod selector;
mod timers;
mod window;

pub use document::{Document, ElementId};
pub use error::DomError;
pub use event::{DomEvent, EventOutcome, Key};
pub use images::{ImageCache, ImageRequest, ImageSourceKind};
pub use location::Location;
pub use selector::Selector;
pub use timers::{TaskOwner, TimerId, Timers};
pub use window::{Viewport, Window};

pub type Result<T> = std::result::Result<T, DomError>;
