//! SDU Carousel
//!
//! One parametrized slide carousel backing the hero, about and video sliders:
//! - Mutually exclusive slides with mirrored indicator dots
//! - Autoplay on a single replaceable interval timer
//! - Pause on hover/focus, restart after explicit navigation
//! - Arrow-key navigation
//! - Track height synchronized to the slides

mod carousel;
mod config;
mod error;
mod height;
mod preload;

pub use carousel::{wrap_index, Carousel};
pub use config::{CarouselConfig, CompiledCarousel, DotTarget, HeightSync, HoverPause};
pub use error::CarouselError;

pub type Result<T> = std::result::Result<T, CarouselError>;
