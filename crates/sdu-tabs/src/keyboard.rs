//! Roving focus key mapping

use sdu_dom::Key;

/// Index the key moves selection to within a list of `len` tabs.
///
/// Returns the unwrapped target (`current + 1` may equal `len`, `current - 1`
/// may be `-1`); callers wrap it. `None` for keys that do not navigate.
pub fn roving_target(key: &Key, current: usize, len: usize) -> Option<isize> {
    if len == 0 {
        return None;
    }

    let current = current as isize;
    match key {
        Key::ArrowRight | Key::ArrowDown => Some(current + 1),
        Key::ArrowLeft | Key::ArrowUp => Some(current - 1),
        Key::Home => Some(0),
        Key::End => Some(len as isize - 1),
        _ => None,
    }
}
