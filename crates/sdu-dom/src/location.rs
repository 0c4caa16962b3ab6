//! Location and session history
//!
//! Only the fragment changes within a page, so history entries are full URLs
//! that differ in their fragment.

use url::Url;

use crate::error::DomError;
use crate::Result;

#[derive(Debug, Clone)]
pub struct Location {
    entries: Vec<Url>,
    index: usize,
    replace_state_supported: bool,
}

impl Location {
    pub fn new(href: &str) -> Result<Self> {
        let url = Url::parse(href).map_err(|e| DomError::InvalidUrl(format!("{}: {}", href, e)))?;

        Ok(Self {
            entries: vec![url],
            index: 0,
            replace_state_supported: true,
        })
    }

    fn current(&self) -> &Url {
        &self.entries[self.index]
    }

    pub fn href(&self) -> &str {
        self.current().as_str()
    }

    /// `""` or `"#fragment"`, like `location.hash`. The fragment is kept
    /// percent-encoded, so ids with spaces or non-ASCII text never compare
    /// equal to their raw form.
    pub fn hash(&self) -> String {
        match self.fragment() {
            Some(fragment) => format!("#{}", fragment),
            None => String::new(),
        }
    }

    /// The fragment without the leading `#`; `None` when empty
    pub fn fragment(&self) -> Option<&str> {
        self.current().fragment().filter(|f| !f.is_empty())
    }

    pub fn supports_replace_state(&self) -> bool {
        self.replace_state_supported
    }

    pub fn set_replace_state_supported(&mut self, supported: bool) {
        self.replace_state_supported = supported;
    }

    /// Rewrite the fragment of the current entry without navigating
    pub fn replace_state(&mut self, hash: &str) {
        let url = self.with_hash(hash);
        tracing::debug!(href = %url, "History entry replaced");
        self.entries[self.index] = url;
    }

    /// Navigate to a fragment, pushing a history entry.
    ///
    /// Returns true when the fragment changed, which is when the platform
    /// fires `hashchange`.
    pub fn assign_hash(&mut self, hash: &str) -> bool {
        let url = self.with_hash(hash);
        if &url == self.current() {
            return false;
        }

        tracing::debug!(href = %url, "History entry pushed");
        self.entries.truncate(self.index + 1);
        self.entries.push(url);
        self.index += 1;
        true
    }

    /// Step back one entry. Returns true when the fragment changed.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        let before = self.fragment().map(str::to_owned);
        self.index -= 1;
        before.as_deref() != self.fragment()
    }

    pub fn history_len(&self) -> usize {
        self.entries.len()
    }

    fn with_hash(&self, hash: &str) -> Url {
        let fragment = hash.strip_prefix('#').unwrap_or(hash);
        let mut url = self.current().clone();
        url.set_fragment(if fragment.is_empty() { None } else { Some(fragment) });
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_forms() {
        let location = Location::new("https://example.com/departments.html").unwrap();
        assert_eq!(location.hash(), "");
        assert!(location.fragment().is_none());

        let location = Location::new("https://example.com/departments.html#panel-b").unwrap();
        assert_eq!(location.hash(), "#panel-b");
        assert_eq!(location.fragment(), Some("panel-b"));
    }

    #[test]
    fn test_hash_is_percent_encoded() {
        let mut location = Location::new("https://example.com/").unwrap();
        location.replace_state("#dental care");
        assert_eq!(location.hash(), "#dental%20care");
        assert_ne!(location.fragment(), Some("dental care"));

        let location = Location::new("https://example.com/#caf\u{e9}").unwrap();
        assert_eq!(location.hash(), "#caf%C3%A9");
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(Location::new("not a url").is_err());
    }

    #[test]
    fn test_replace_state_keeps_history_length() {
        let mut location = Location::new("https://example.com/").unwrap();
        location.replace_state("#panel-a");
        assert_eq!(location.hash(), "#panel-a");
        assert_eq!(location.history_len(), 1);
        assert_eq!(location.href(), "https://example.com/#panel-a");
    }

    #[test]
    fn test_assign_and_back() {
        let mut location = Location::new("https://example.com/#panel-a").unwrap();
        assert!(!location.assign_hash("#panel-a"));
        assert!(location.assign_hash("panel-b"));
        assert_eq!(location.history_len(), 2);
        assert_eq!(location.fragment(), Some("panel-b"));

        assert!(location.back());
        assert_eq!(location.fragment(), Some("panel-a"));
        assert!(!location.back());
    }
}
