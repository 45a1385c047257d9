//! Path ownership matching for transformers.

use std::collections::HashSet;

/// Decides which archive-internal paths a transformer takes ownership of.
///
/// Two sets, fixed after construction: `claimed` paths the transformer owns,
/// and `excluded` paths carved out even when also claimed. A path matches
/// iff it is claimed and not excluded. Matching is read-only and safe to
/// call repeatedly from any context.
#[derive(Clone, Debug, Default)]
pub struct PathMatcher {
    claimed: HashSet<String>,
    excluded: HashSet<String>,
}

impl PathMatcher {
    /// An empty matcher that matches nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one claimed path.
    pub fn claim(mut self, path: impl Into<String>) -> Self {
        self.claimed.insert(path.into());
        self
    }

    /// Add many claimed paths.
    pub fn claim_all<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.claimed.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Carve out one path from the claimed set.
    pub fn exclude(mut self, path: impl Into<String>) -> Self {
        self.excluded.insert(path.into());
        self
    }

    /// Carve out many paths from the claimed set.
    pub fn exclude_all<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Returns `true` iff `path` is claimed and not excluded.
    pub fn matches(&self, path: &str) -> bool {
        self.claimed.contains(path) && !self.excluded.contains(path)
    }

    /// Returns `true` if no path can ever match.
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
