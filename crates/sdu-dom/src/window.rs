//! Window: the document plus everything around it

use std::collections::VecDeque;

use crate::document::Document;
use crate::event::DomEvent;
use crate::images::{ImageCache, ImageRequest};
use crate::location::Location;
use crate::timers::Timers;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
        }
    }
}

#[derive(Debug)]
pub struct Window {
    pub document: Document,
    pub location: Location,
    pub timers: Timers,
    viewport: Viewport,
    images: ImageCache,
    /// Events raised by the platform itself, such as `hashchange`
    pending: VecDeque<DomEvent>,
    includes_ready: bool,
}

impl Window {
    pub fn new(document: Document, location: Location) -> Self {
        Self {
            document,
            location,
            timers: Timers::new(),
            viewport: Viewport::default(),
            images: ImageCache::new(),
            pending: VecDeque::new(),
            includes_ready: false,
        }
    }

    /// Parse markup and open it at `href`
    pub fn from_html(markup: &str, href: &str) -> Result<Self> {
        Ok(Self::new(Document::parse_html(markup), Location::new(href)?))
    }

    /// Share an image cache with other windows
    pub fn with_image_cache(mut self, images: ImageCache) -> Self {
        self.images = images;
        self
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Viewport { width, height };
    }

    /// Equivalent of `matchMedia('(max-width: Npx)').matches`
    pub fn matches_max_width(&self, px: u32) -> bool {
        self.viewport.width <= px
    }

    pub fn image_cache(&self) -> &ImageCache {
        &self.images
    }

    pub fn preload_image(&self, request: ImageRequest) -> bool {
        self.images.request(request)
    }

    /// `location.hash = hash`; queues `hashchange` when the fragment changes
    pub fn assign_hash(&mut self, hash: &str) -> bool {
        let changed = self.location.assign_hash(hash);
        if changed {
            self.queue_event(DomEvent::HashChange);
        }
        changed
    }

    /// `history.back()`; queues `hashchange` when the fragment changes
    pub fn history_back(&mut self) -> bool {
        let changed = self.location.back();
        if changed {
            self.queue_event(DomEvent::HashChange);
        }
        changed
    }

    pub fn queue_event(&mut self, event: DomEvent) {
        self.pending.push_back(event);
    }

    pub fn pop_pending_event(&mut self) -> Option<DomEvent> {
        self.pending.pop_front()
    }

    pub fn includes_ready(&self) -> bool {
        self.includes_ready
    }

    pub fn mark_includes_ready(&mut self) {
        self.includes_ready = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_hash_queues_hashchange() {
        let mut window = Window::from_html("<p>hi</p>", "https://example.com/").unwrap();
        assert!(window.assign_hash("#panel-a"));
        assert!(!window.assign_hash("#panel-a"));
        assert_eq!(window.pop_pending_event(), Some(DomEvent::HashChange));
        assert_eq!(window.pop_pending_event(), None);

        assert!(window.history_back());
        assert_eq!(window.location.hash(), "");
        assert_eq!(window.pop_pending_event(), Some(DomEvent::HashChange));
    }

    #[test]
    fn test_windows_share_image_cache() {
        let shared = ImageCache::new();
        let first = Window::from_html("", "https://example.com/")
            .unwrap()
            .with_image_cache(shared.clone());
        let second = Window::from_html("", "https://example.com/about.html")
            .unwrap()
            .with_image_cache(shared.clone());

        assert!(first.preload_image(ImageRequest::src("hero.jpg")));
        assert!(!second.preload_image(ImageRequest::src("hero.jpg")));
        assert_eq!(shared.len(), 1);
        assert!(second.image_cache().contains("hero.jpg"));
    }

    #[test]
    fn test_max_width_query() {
        let mut window = Window::from_html("", "https://example.com/").unwrap();
        assert!(!window.matches_max_width(768));
        window.set_viewport(768, 1024);
        assert!(window.matches_max_width(768));
    }
}
