//! Page context
//!
//! Owns the window and the mounted components. Initialization runs at most
//! once and only after the shared header include is present:
//! ```text
//! Pending ──run_when_ready──▶ Ready                 (header present or includes flagged)
//!    │                          ▲
//!    └──────────────▶ WaitingForIncludes ──IncludesReady──┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use sdu_carousel::{Carousel, CompiledCarousel};
use sdu_dom::{DomEvent, EventOutcome, Selector, TaskOwner, Window};
use sdu_tabs::{CompiledTabs, TabPanel};

use crate::config::SiteConfig;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Pending,
    WaitingForIncludes,
    Ready,
}

pub struct Site {
    window: Window,
    config: SiteConfig,
    carousel_configs: Vec<Arc<CompiledCarousel>>,
    tabs_config: Arc<CompiledTabs>,
    ready_selector: Selector,
    state: InitState,
    /// Indexed by the `TaskOwner` each carousel was mounted with
    carousels: Vec<Carousel>,
    tab_panels: Vec<TabPanel>,
}

impl Site {
    /// Create the page context and flag the document as scripted
    pub fn new(mut window: Window, mut config: SiteConfig) -> Result<Self> {
        config.validate()?;

        for carousel in &mut config.carousels {
            carousel.narrow_breakpoint_px = config.narrow_breakpoint_px;
        }

        let carousel_configs = config
            .carousels
            .iter()
            .map(|carousel| carousel.compile().map(Arc::new))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let tabs_config = Arc::new(config.tabs.compile()?);
        let ready_selector = Selector::parse(&config.ready_selector)?;

        let root = window.document.root();
        if !window.document.has_class(root, &config.js_enabled_class) {
            window.document.add_class(root, &config.js_enabled_class);
        }

        Ok(Self {
            window,
            config,
            carousel_configs,
            tabs_config,
            ready_selector,
            state: InitState::Pending,
            carousels: Vec::new(),
            tab_panels: Vec::new(),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn state(&self) -> InitState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == InitState::Ready
    }

    pub fn carousels(&self) -> &[Carousel] {
        &self.carousels
    }

    /// First mounted carousel with the given name
    pub fn carousel(&self, name: &str) -> Option<&Carousel> {
        self.carousels.iter().find(|carousel| carousel.name() == name)
    }

    pub fn carousel_mut(&mut self, name: &str) -> Option<&mut Carousel> {
        self.carousels.iter_mut().find(|carousel| carousel.name() == name)
    }

    pub fn tab_panels(&self) -> &[TabPanel] {
        &self.tab_panels
    }

    /// Mount every component. Returns false if the site was already initialized.
    pub fn init(&mut self) -> bool {
        if self.state == InitState::Ready {
            return false;
        }
        self.state = InitState::Ready;

        for config in &self.carousel_configs {
            for root in config.find_roots(&self.window.document) {
                let owner = TaskOwner(self.carousels.len());
                if let Some(carousel) =
                    Carousel::mount(&mut self.window, Arc::clone(config), root, owner)
                {
                    self.carousels.push(carousel);
                }
            }
        }

        for group in self.tabs_config.find_groups(&self.window.document) {
            if let Some(panel) = TabPanel::mount(&mut self.window, Arc::clone(&self.tabs_config), group)
            {
                self.tab_panels.push(panel);
            }
        }

        tracing::info!(
            carousels = self.carousels.len(),
            tab_groups = self.tab_panels.len(),
            "Site initialized"
        );

        true
    }

    fn header_present(&self) -> bool {
        let doc = &self.window.document;
        doc.query_selector(doc.root(), &self.ready_selector).is_some()
    }

    /// Initialize now if the header is in place, otherwise wait for `IncludesReady`.
    ///
    /// Returns true if this call ran initialization.
    pub fn run_when_ready(&mut self) -> bool {
        if self.state == InitState::Ready {
            return false;
        }

        if self.header_present() || self.window.includes_ready() {
            return self.init();
        }

        if self.state == InitState::Pending {
            tracing::debug!(selector = %self.ready_selector, "Header not present, waiting for includes");
            self.state = InitState::WaitingForIncludes;
        }
        false
    }

    /// Deliver a platform event, then any events it caused
    pub fn dispatch(&mut self, event: DomEvent) -> EventOutcome {
        let outcome = self.deliver(&event);
        outcome.merge(self.drain_pending())
    }

    fn deliver(&mut self, event: &DomEvent) -> EventOutcome {
        tracing::trace!(event = event.name(), target = ?event.target(), "Dispatching event");

        match event {
            DomEvent::DomContentLoaded => {
                return if self.run_when_ready() {
                    EventOutcome::handled()
                } else {
                    EventOutcome::IGNORED
                };
            }
            DomEvent::IncludesReady => {
                self.window.mark_includes_ready();
                return if self.state == InitState::WaitingForIncludes && self.init() {
                    EventOutcome::handled()
                } else {
                    EventOutcome::IGNORED
                };
            }
            DomEvent::Resize { width, height } => self.window.set_viewport(*width, *height),
            _ => {}
        }

        let window = &mut self.window;
        let carousels = self
            .carousels
            .iter_mut()
            .fold(EventOutcome::IGNORED, |acc, carousel| {
                acc.merge(carousel.handle_event(window, event))
            });

        self.tab_panels
            .iter_mut()
            .fold(carousels, |acc, panel| acc.merge(panel.handle_event(window, event)))
    }

    /// Move the clock forward, firing due timers in order
    pub fn advance(&mut self, duration: Duration) {
        let deadline = self.window.timers.now() + duration;

        while let Some((timer, owner)) = self.window.timers.pop_due(deadline) {
            match self.carousels.get_mut(owner.0) {
                Some(carousel) => carousel.on_timer(&mut self.window, timer),
                None => {
                    tracing::warn!(owner = owner.0, "Timer has no owner, clearing");
                    self.window.timers.clear(timer);
                }
            }
        }

        self.window.timers.settle(deadline);
        self.drain_pending();
    }

    /// Run the queued animation frames. Returns how many ran.
    pub fn run_animation_frames(&mut self) -> usize {
        let frames = self.window.timers.take_animation_frames();
        let mut ran = 0;

        for owner in frames {
            if let Some(carousel) = self.carousels.get_mut(owner.0) {
                carousel.on_animation_frame(&mut self.window);
                ran += 1;
            }
        }

        ran
    }

    /// Navigate to a fragment as a link or the address bar would
    pub fn navigate_fragment(&mut self, fragment: &str) -> EventOutcome {
        let hash = if fragment.starts_with('#') {
            fragment.to_string()
        } else {
            format!("#{}", fragment)
        };

        if !self.window.assign_hash(&hash) {
            return EventOutcome::IGNORED;
        }
        self.drain_pending()
    }

    /// Browser back button
    pub fn back(&mut self) -> EventOutcome {
        if !self.window.history_back() {
            return EventOutcome::IGNORED;
        }
        self.drain_pending()
    }

    fn drain_pending(&mut self) -> EventOutcome {
        let mut outcome = EventOutcome::IGNORED;
        while let Some(pending) = self.window.pop_pending_event() {
            outcome = outcome.merge(self.deliver(&pending));
        }
        outcome
    }
}
