//! Tab panel controller
//!
//! Selection state machine over a fixed tab list. Every selection rewrites
//! the whole group so the selected tab and the visible panel always match:
//! ```text
//! select(i) ── tab i: active, aria-selected=true, tabindex=0
//!          ├─ others: inactive, aria-selected=false, tabindex=-1
//!          ├─ panel(i) shown, all other panels hidden
//!          └─ fragment := #panel(i)   (unless suppressed or already equal)
//! ```

use std::sync::Arc;

use sdu_dom::{DomEvent, ElementId, EventOutcome, Key, Window};

use crate::config::CompiledTabs;
use crate::keyboard::roving_target;

/// Options for [`TabPanel::select`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOptions {
    /// Move keyboard focus to the selected tab
    pub focus: bool,
    /// Mirror the selection into the URL fragment
    pub update_hash: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            focus: false,
            update_hash: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabEntry {
    pub tab: ElementId,
    /// Referenced panel id, if the tab names one
    pub panel_id: Option<String>,
    /// Resolved panel element
    pub panel: Option<ElementId>,
}

#[derive(Debug)]
pub struct TabPanel {
    config: Arc<CompiledTabs>,
    group: ElementId,
    tabs: Vec<TabEntry>,
    selected: usize,
}

impl TabPanel {
    /// Wire a tab group.
    ///
    /// Returns `None` without touching the document when the group has no tabs.
    pub fn mount(window: &mut Window, config: Arc<CompiledTabs>, group: ElementId) -> Option<Self> {
        let doc = &window.document;
        let settings = &config.config;

        let list = doc.query_selector(group, &config.tablist).unwrap_or(group);
        let tabs: Vec<TabEntry> = doc
            .query_selector_all(list, &config.tab)
            .into_iter()
            .map(|tab| {
                let panel_id = doc
                    .attribute(tab, &settings.panel_attribute)
                    .filter(|id| !id.is_empty());
                let panel = panel_id.as_deref().and_then(|id| doc.element_by_id(id));
                TabEntry { tab, panel_id, panel }
            })
            .collect();

        if tabs.is_empty() {
            tracing::debug!("Tab group has no tabs, not wiring");
            return None;
        }

        for entry in tabs.iter().filter(|entry| entry.panel.is_none()) {
            tracing::debug!(panel_id = ?entry.panel_id, "Tab has no resolvable panel");
        }

        let initial = tabs
            .iter()
            .position(|entry| doc.has_class(entry.tab, &settings.active_class))
            .unwrap_or(0);

        let mut panel = Self {
            config,
            group,
            tabs,
            selected: initial,
        };

        panel.normalize_attributes(window);
        panel.select(
            window,
            initial,
            SelectOptions {
                focus: false,
                update_hash: false,
            },
        );
        panel.sync_with_hash(window, false);

        tracing::info!(
            tabs = panel.tabs.len(),
            selected = panel.selected,
            "Tab group mounted"
        );

        Some(panel)
    }

    pub fn group(&self) -> ElementId {
        self.group
    }

    pub fn tabs(&self) -> &[TabEntry] {
        &self.tabs
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> &TabEntry {
        &self.tabs[self.selected]
    }

    /// Position of the tab whose panel id is `panel_id`
    pub fn index_of_panel(&self, panel_id: &str) -> Option<usize> {
        self.tabs
            .iter()
            .position(|entry| entry.panel_id.as_deref() == Some(panel_id))
    }

    /// Fill in `aria-selected` and `tabindex` on tabs that lack them
    fn normalize_attributes(&self, window: &mut Window) {
        let active_class = &self.config.config.active_class;
        let doc = &mut window.document;

        for entry in &self.tabs {
            let is_active = doc.has_class(entry.tab, active_class);
            if !doc.has_attribute(entry.tab, "aria-selected") {
                doc.set_attribute(entry.tab, "aria-selected", if is_active { "true" } else { "false" });
            }
            if !doc.has_attribute(entry.tab, "tabindex") {
                doc.set_attribute(entry.tab, "tabindex", if is_active { "0" } else { "-1" });
            }
        }
    }

    /// Select the tab at `index`; out-of-range indices are ignored
    pub fn select(&mut self, window: &mut Window, index: usize, options: SelectOptions) {
        if index >= self.tabs.len() {
            return;
        }

        let active_class = &self.config.config.active_class;
        let doc = &mut window.document;

        for (i, entry) in self.tabs.iter().enumerate() {
            let is_active = i == index;
            doc.toggle_class(entry.tab, active_class, is_active);
            doc.set_attribute(entry.tab, "aria-selected", if is_active { "true" } else { "false" });
            doc.set_attribute(entry.tab, "tabindex", if is_active { "0" } else { "-1" });

            let Some(panel) = entry.panel else {
                continue;
            };
            doc.toggle_class(panel, active_class, is_active);
            if is_active {
                doc.remove_attribute(panel, "hidden");
            } else {
                doc.set_attribute(panel, "hidden", "");
            }
        }

        self.selected = index;
        let entry = &self.tabs[index];

        tracing::debug!(index, panel_id = ?entry.panel_id, "Tab selected");

        if options.update_hash {
            if let Some(panel_id) = &entry.panel_id {
                write_hash(window, panel_id);
            }
        }

        if options.focus {
            window.document.focus(entry.tab);
        }
    }

    /// Keyboard move: select and focus, wrapping around the ends
    pub fn focus_by_index(&mut self, window: &mut Window, index: isize) {
        let target = index.rem_euclid(self.tabs.len() as isize) as usize;
        self.select(
            window,
            target,
            SelectOptions {
                focus: true,
                update_hash: true,
            },
        );
    }

    /// Select the tab named by the current fragment, if any.
    ///
    /// Never rewrites the fragment. Returns true if a tab matched.
    pub fn sync_with_hash(&mut self, window: &mut Window, focus: bool) -> bool {
        let Some(index) = window
            .location
            .fragment()
            .and_then(|fragment| self.index_of_panel(fragment))
        else {
            return false;
        };

        self.select(
            window,
            index,
            SelectOptions {
                focus,
                update_hash: false,
            },
        );
        true
    }

    fn tab_containing(&self, window: &Window, target: ElementId) -> Option<usize> {
        self.tabs
            .iter()
            .position(|entry| window.document.contains(entry.tab, target))
    }

    pub fn handle_event(&mut self, window: &mut Window, event: &DomEvent) -> EventOutcome {
        match event {
            DomEvent::Click { target } => {
                let Some(index) = self.tab_containing(window, *target) else {
                    return EventOutcome::IGNORED;
                };
                self.select(window, index, SelectOptions::default());
                EventOutcome::prevented()
            }
            DomEvent::KeyDown { target, key } => self.handle_key(window, *target, key),
            // Presumed user-initiated, so focus follows.
            DomEvent::HashChange => {
                if self.sync_with_hash(window, true) {
                    EventOutcome::handled()
                } else {
                    EventOutcome::IGNORED
                }
            }
            _ => EventOutcome::IGNORED,
        }
    }

    fn handle_key(&mut self, window: &mut Window, target: ElementId, key: &Key) -> EventOutcome {
        let Some(index) = self.tab_containing(window, target) else {
            return EventOutcome::IGNORED;
        };
        let Some(next) = roving_target(key, index, self.tabs.len()) else {
            return EventOutcome::IGNORED;
        };

        self.focus_by_index(window, next);
        EventOutcome::prevented()
    }
}

/// Mirror a panel id into the fragment without adding history when possible
fn write_hash(window: &mut Window, panel_id: &str) {
    let hash = format!("#{}", panel_id);
    if window.location.hash() == hash {
        return;
    }

    if window.location.supports_replace_state() {
        window.location.replace_state(&hash);
    } else {
        window.assign_hash(&hash);
    }
}
