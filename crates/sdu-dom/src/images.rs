//! Image preload cache
//!
//! Records eager image fetches. Requests are fire-and-forget: nothing tracks
//! completion, the cache only guarantees each source is requested once.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSourceKind {
    /// Plain `src`
    Src,
    /// Responsive `srcset` candidate list
    Srcset,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRequest {
    pub source: String,
    pub kind: ImageSourceKind,
}

impl ImageRequest {
    pub fn src(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            kind: ImageSourceKind::Src,
        }
    }

    pub fn srcset(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            kind: ImageSourceKind::Srcset,
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    requested: Vec<ImageRequest>,
    seen: HashSet<String>,
}

/// Shared handle; clones refer to the same cache
#[derive(Debug, Default)]
pub struct ImageCache {
    state: Arc<RwLock<CacheState>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a fetch. Returns false if the source was already requested.
    pub fn request(&self, request: ImageRequest) -> bool {
        let mut state = self.state.write();
        if !state.seen.insert(request.source.clone()) {
            return false;
        }

        tracing::trace!(source = %request.source, "Image preload requested");
        state.requested.push(request);
        true
    }

    pub fn contains(&self, source: &str) -> bool {
        self.state.read().seen.contains(source)
    }

    pub fn requested(&self) -> Vec<ImageRequest> {
        self.state.read().requested.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().requested.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Clone for ImageCache {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}
