//! Platform events delivered to components

use crate::document::ElementId;

/// Keyboard key, by its DOM `key` name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    Enter,
    Escape,
    Tab,
    Other(String),
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "Home" => Key::Home,
            "End" => Key::End,
            "Enter" => Key::Enter,
            "Escape" => Key::Escape,
            "Tab" => Key::Tab,
            other => Key::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Key::ArrowLeft => "ArrowLeft",
            Key::ArrowRight => "ArrowRight",
            Key::ArrowUp => "ArrowUp",
            Key::ArrowDown => "ArrowDown",
            Key::Home => "Home",
            Key::End => "End",
            Key::Enter => "Enter",
            Key::Escape => "Escape",
            Key::Tab => "Tab",
            Key::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    Click { target: ElementId },
    KeyDown { target: ElementId, key: Key },
    /// Does not bubble; `target` is the element entered
    PointerEnter { target: ElementId },
    PointerLeave { target: ElementId },
    MouseEnter { target: ElementId },
    MouseLeave { target: ElementId },
    /// Bubbles from the element gaining focus
    FocusIn { target: ElementId },
    /// Bubbles from the element losing focus; `related` is where focus went
    FocusOut {
        target: ElementId,
        related: Option<ElementId>,
    },
    Resize { width: u32, height: u32 },
    /// Window `load`, after late resources such as images
    Load,
    HashChange,
    DomContentLoaded,
    /// Header/footer fragments have been injected
    IncludesReady,
}

impl DomEvent {
    pub fn target(&self) -> Option<ElementId> {
        match self {
            DomEvent::Click { target }
            | DomEvent::KeyDown { target, .. }
            | DomEvent::PointerEnter { target }
            | DomEvent::PointerLeave { target }
            | DomEvent::MouseEnter { target }
            | DomEvent::MouseLeave { target }
            | DomEvent::FocusIn { target }
            | DomEvent::FocusOut { target, .. } => Some(*target),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DomEvent::Click { .. } => "click",
            DomEvent::KeyDown { .. } => "keydown",
            DomEvent::PointerEnter { .. } => "pointerenter",
            DomEvent::PointerLeave { .. } => "pointerleave",
            DomEvent::MouseEnter { .. } => "mouseenter",
            DomEvent::MouseLeave { .. } => "mouseleave",
            DomEvent::FocusIn { .. } => "focusin",
            DomEvent::FocusOut { .. } => "focusout",
            DomEvent::Resize { .. } => "resize",
            DomEvent::Load => "load",
            DomEvent::HashChange => "hashchange",
            DomEvent::DomContentLoaded => "DOMContentLoaded",
            DomEvent::IncludesReady => "includes:ready",
        }
    }
}

/// What a handler did with an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub handled: bool,
    pub default_prevented: bool,
}

impl EventOutcome {
    pub const IGNORED: Self = Self {
        handled: false,
        default_prevented: false,
    };

    pub fn handled() -> Self {
        Self {
            handled: true,
            default_prevented: false,
        }
    }

    /// Handled, with the default action (scrolling, link navigation) suppressed
    pub fn prevented() -> Self {
        Self {
            handled: true,
            default_prevented: true,
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            handled: self.handled || other.handled,
            default_prevented: self.default_prevented || other.default_prevented,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_round_trip() {
        for name in ["ArrowLeft", "ArrowRight", "ArrowUp", "ArrowDown", "Home", "End"] {
            assert_eq!(Key::from_name(name).as_str(), name);
        }
        assert_eq!(Key::from_name("a"), Key::Other("a".to_string()));
    }

    #[test]
    fn test_target_only_on_element_events() {
        let doc = crate::Document::parse_html("<button>Go</button>");
        let target = doc.root();

        let focus_out = DomEvent::FocusOut {
            target,
            related: None,
        };
        assert_eq!(focus_out.target(), Some(target));
        assert_eq!(
            DomEvent::KeyDown {
                target,
                key: Key::End
            }
            .target(),
            Some(target)
        );
        assert_eq!(DomEvent::HashChange.target(), None);
        assert_eq!(DomEvent::Resize { width: 1, height: 1 }.target(), None);
    }

    #[test]
    fn test_outcome_merge() {
        let merged = EventOutcome::IGNORED.merge(EventOutcome::handled());
        assert!(merged.handled);
        assert!(!merged.default_prevented);
        assert!(merged.merge(EventOutcome::prevented()).default_prevented);
    }
}
