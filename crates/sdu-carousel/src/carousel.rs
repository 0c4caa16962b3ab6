//! Carousel controller
//!
//! State machine over a fixed set of slides:
//! ```text
//! go_to(i) ── wrap i into [0, n) ── mark slide/dot i active, others inactive
//!     │
//!     └── sync background + track height
//!
//! autoplay: Stopped ⇄ Running(timer)   start always replaces the live timer
//! ```
//! Element references are captured once at mount and never re-queried.

use std::sync::Arc;
use std::time::Duration;

use sdu_dom::{DomEvent, ElementId, EventOutcome, Key, TaskOwner, TimerId, Timers, Window};

use crate::config::{CompiledCarousel, DotTarget, HeightSync, HoverPause};
use crate::height::{self, HeightTarget};
use crate::preload;

/// Wrap any index into `[0, len)`; `-1` maps to `len - 1`. `None` for an empty set.
pub fn wrap_index(index: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(index.rem_euclid(len as isize) as usize)
}

#[derive(Debug)]
pub struct Carousel {
    config: Arc<CompiledCarousel>,
    owner: TaskOwner,
    root: ElementId,
    track: Option<ElementId>,
    slides: Vec<ElementId>,
    dots: Vec<ElementId>,
    prev: Option<ElementId>,
    next: Option<ElementId>,
    /// `None` when autoplay is disabled
    interval: Option<Duration>,
    active: usize,
    autoplay: Option<TimerId>,
}

impl Carousel {
    /// Wire a carousel onto `root`.
    ///
    /// Returns `None`, leaving the document untouched, when the track (if the
    /// configuration requires one) or every slide is missing.
    pub fn mount(
        window: &mut Window,
        config: Arc<CompiledCarousel>,
        root: ElementId,
        owner: TaskOwner,
    ) -> Option<Self> {
        let doc = &window.document;
        let settings = &config.config;

        let track = match &config.track {
            Some(selector) => match doc.query_selector(root, selector) {
                Some(track) => Some(track),
                None => {
                    tracing::debug!(carousel = %settings.name, "Carousel track missing, not wiring");
                    return None;
                }
            },
            None => None,
        };

        let slides = doc.query_selector_all(root, &config.slide);
        if slides.is_empty() {
            tracing::debug!(carousel = %settings.name, "Carousel has no slides, not wiring");
            return None;
        }

        let dots = doc.query_selector_all(root, &config.dot);
        let prev = doc.query_selector(root, &config.prev);
        let next = doc.query_selector(root, &config.next);
        let interval = parse_interval(
            doc.attribute(root, &settings.interval_attribute).as_deref(),
            settings.default_interval_ms,
        );
        let active = slides
            .iter()
            .position(|slide| doc.has_class(*slide, &settings.active_class))
            .unwrap_or(0);

        if !dots.is_empty() && dots.len() != slides.len() {
            tracing::warn!(
                carousel = %settings.name,
                slides = slides.len(),
                dots = dots.len(),
                "Indicator count does not match slide count"
            );
        }

        let mut carousel = Self {
            config,
            owner,
            root,
            track,
            slides,
            dots,
            prev,
            next,
            interval,
            active,
            autoplay: None,
        };

        if let Some(selector) = &carousel.config.preload {
            let queued = preload::preload(window, &carousel.slides, selector);
            tracing::debug!(carousel = %carousel.name(), queued, "Slide assets preloaded");
        }

        carousel.go_to(window, active as isize);
        carousel.start_autoplay(&mut window.timers);

        tracing::info!(
            carousel = %carousel.name(),
            slides = carousel.slides.len(),
            active,
            interval_ms = carousel.interval.map(|i| i.as_millis() as u64),
            "Carousel mounted"
        );

        Some(carousel)
    }

    pub fn name(&self) -> &str {
        &self.config.config.name
    }

    pub fn owner(&self) -> TaskOwner {
        self.owner
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn slides(&self) -> &[ElementId] {
        &self.slides
    }

    pub fn dots(&self) -> &[ElementId] {
        &self.dots
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn autoplay_timer(&self) -> Option<TimerId> {
        self.autoplay
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay.is_some()
    }

    // === Navigation ===

    /// Activate the slide at `index`, wrapping out-of-range values
    pub fn go_to(&mut self, window: &mut Window, index: isize) {
        let Some(target) = wrap_index(index, self.slides.len()) else {
            return;
        };
        let settings = &self.config.config;
        let doc = &mut window.document;

        for (i, slide) in self.slides.iter().enumerate() {
            let is_active = i == target;
            doc.toggle_class(*slide, &settings.active_class, is_active);
            doc.set_attribute(*slide, "aria-hidden", bool_str(!is_active));
        }

        // Dots past the slide count never match `target`.
        for (i, dot) in self.dots.iter().enumerate() {
            let is_active = i == target;
            doc.toggle_class(*dot, &settings.active_class, is_active);
            if settings.dot_data_active {
                doc.set_attribute(*dot, "data-active", bool_str(is_active));
            }
            doc.set_attribute(*dot, "aria-selected", bool_str(is_active));
            if settings.dot_roving_tabindex {
                doc.set_attribute(*dot, "tabindex", if is_active { "0" } else { "-1" });
            }
            if is_active {
                doc.set_attribute(*dot, "aria-current", "true");
            } else {
                doc.remove_attribute(*dot, "aria-current");
            }
        }

        self.active = target;
        tracing::debug!(carousel = %self.name(), index = target, "Carousel slide activated");

        self.sync_background(window);
        self.sync_height(window);
    }

    pub fn next(&mut self, window: &mut Window) {
        self.go_to(window, self.active as isize + 1);
    }

    pub fn prev(&mut self, window: &mut Window) {
        self.go_to(window, self.active as isize - 1);
    }

    // === Autoplay ===

    /// Start (or restart) the autoplay countdown
    pub fn start_autoplay(&mut self, timers: &mut Timers) {
        if self.slides.len() < 2 {
            return;
        }
        let Some(interval) = self.interval else {
            return;
        };

        self.stop_autoplay(timers);
        self.autoplay = Some(timers.set_interval(self.owner, interval));
    }

    pub fn stop_autoplay(&mut self, timers: &mut Timers) {
        if let Some(id) = self.autoplay.take() {
            timers.clear(id);
        }
    }

    /// Timer callback; ticks from a replaced timer are ignored
    pub fn on_timer(&mut self, window: &mut Window, timer: TimerId) {
        if self.autoplay == Some(timer) {
            self.next(window);
        }
    }

    // === Presentation ===

    fn sync_background(&self, window: &mut Window) {
        let Some(property) = &self.config.config.background_property else {
            return;
        };

        let doc = &mut window.document;
        let value = doc
            .computed_style(self.slides[self.active], property)
            .map(|v| v.trim().to_string())
            .unwrap_or_default();

        doc.set_inline_style(self.root, property, &value);
    }

    /// Recompute the track height for the current viewport and slide
    pub fn sync_height(&self, window: &mut Window) {
        let Some(track) = self.track else {
            return;
        };
        let settings = &self.config.config;

        height::sync(
            window,
            HeightTarget {
                mode: settings.height_sync,
                track,
                slides: &self.slides,
                active: self.active,
                active_class: &settings.active_class,
                narrow_breakpoint_px: settings.narrow_breakpoint_px,
            },
        );
    }

    /// Animation frame callback queued by a resize
    pub fn on_animation_frame(&mut self, window: &mut Window) {
        self.sync_height(window);
    }

    // === Events ===

    pub fn handle_event(&mut self, window: &mut Window, event: &DomEvent) -> EventOutcome {
        let hover = self.config.config.hover_pause;

        match event {
            DomEvent::Click { target } => self.handle_click(window, *target),
            DomEvent::KeyDown { target, key } => self.handle_key(window, *target, key),
            DomEvent::PointerEnter { target } if hover == HoverPause::Pointer => {
                self.pause_if_root(window, *target)
            }
            DomEvent::MouseEnter { target } if hover == HoverPause::Mouse => {
                self.pause_if_root(window, *target)
            }
            DomEvent::PointerLeave { target } if hover == HoverPause::Pointer => {
                self.resume_if_root(window, *target)
            }
            DomEvent::MouseLeave { target } if hover == HoverPause::Mouse => {
                self.resume_if_root(window, *target)
            }
            DomEvent::FocusIn { target } => {
                if !window.document.contains(self.root, *target) {
                    return EventOutcome::IGNORED;
                }
                self.stop_autoplay(&mut window.timers);
                EventOutcome::handled()
            }
            DomEvent::FocusOut { target, related } => {
                let doc = &window.document;
                if !doc.contains(self.root, *target) {
                    return EventOutcome::IGNORED;
                }
                // Moving between children keeps the carousel paused.
                if related.is_some_and(|r| doc.contains(self.root, r)) {
                    return EventOutcome::IGNORED;
                }
                self.start_autoplay(&mut window.timers);
                EventOutcome::handled()
            }
            DomEvent::Resize { .. } => {
                if self.track.is_none() || self.config.config.height_sync == HeightSync::None {
                    return EventOutcome::IGNORED;
                }
                window.timers.request_animation_frame(self.owner);
                EventOutcome::handled()
            }
            DomEvent::Load => {
                self.sync_height(window);
                EventOutcome::handled()
            }
            _ => EventOutcome::IGNORED,
        }
    }

    fn handle_click(&mut self, window: &mut Window, target: ElementId) -> EventOutcome {
        let doc = &window.document;
        if !doc.contains(self.root, target) {
            return EventOutcome::IGNORED;
        }

        let hits = |control: Option<ElementId>| control.is_some_and(|c| doc.contains(c, target));

        if hits(self.prev) {
            self.prev(window);
        } else if hits(self.next) {
            self.next(window);
        } else if let Some(position) = self.dots.iter().position(|dot| doc.contains(*dot, target)) {
            let Some(index) = self.dot_index(window, position) else {
                return EventOutcome::IGNORED;
            };
            self.go_to(window, index);
        } else {
            return EventOutcome::IGNORED;
        }

        self.start_autoplay(&mut window.timers);
        EventOutcome::handled()
    }

    fn handle_key(&mut self, window: &mut Window, target: ElementId, key: &Key) -> EventOutcome {
        if !self.config.config.keyboard || !window.document.contains(self.root, target) {
            return EventOutcome::IGNORED;
        }

        match key {
            Key::ArrowLeft => self.prev(window),
            Key::ArrowRight => self.next(window),
            _ => return EventOutcome::IGNORED,
        }

        self.start_autoplay(&mut window.timers);
        EventOutcome::prevented()
    }

    fn pause_if_root(&mut self, window: &mut Window, target: ElementId) -> EventOutcome {
        if target != self.root {
            return EventOutcome::IGNORED;
        }
        self.stop_autoplay(&mut window.timers);
        EventOutcome::handled()
    }

    fn resume_if_root(&mut self, window: &mut Window, target: ElementId) -> EventOutcome {
        if target != self.root {
            return EventOutcome::IGNORED;
        }
        self.start_autoplay(&mut window.timers);
        EventOutcome::handled()
    }

    fn dot_index(&self, window: &Window, position: usize) -> Option<isize> {
        match &self.config.config.dot_target {
            DotTarget::Position => Some(position as isize),
            DotTarget::Attribute(attr) => {
                let value = window.document.attribute(self.dots[position], attr)?;
                parse_dot_index(&value)
            }
        }
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Interval from the root attribute, falling back to the configured default.
/// A default of zero disables autoplay.
fn parse_interval(attribute: Option<&str>, default_ms: u64) -> Option<Duration> {
    let from_attribute = attribute
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|ms| ms.is_finite() && *ms >= 1.0)
        .map(|ms| Duration::from_millis(ms as u64));

    from_attribute.or_else(|| (default_ms > 0).then(|| Duration::from_millis(default_ms)))
}

/// An empty attribute counts as zero; anything non-integral is rejected
fn parse_dot_index(value: &str) -> Option<isize> {
    let value = value.trim();
    if value.is_empty() {
        return Some(0);
    }
    value.parse().ok()
}
