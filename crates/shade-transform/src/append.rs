//! Plain concatenation of same-named resources, service-file style.

use std::io::Read;

use shade_archive::{ArchiveSink, TimestampMode};
use tracing::debug;

use crate::error::{TransformError, TransformResult};
use crate::matcher::PathMatcher;
use crate::transformer::Transformer;

/// Concatenates every occurrence of a claimed resource into one entry.
///
/// Unlike [`ResourceMergeTransformer`](crate::ResourceMergeTransformer) this
/// keeps every occurrence: the use case is line-oriented registry files
/// (service locators, plugin lists) where each input archive contributes
/// entries that must all survive. A newline is inserted between occurrences
/// when the previous one did not end with one, so lines from different
/// inputs never fuse.
pub struct AppendingTransformer {
    matcher: PathMatcher,
    destination: String,
    buffer: Vec<u8>,
}

impl AppendingTransformer {
    /// Create a transformer concatenating into `destination`.
    pub fn new(destination: impl Into<String>, matcher: PathMatcher) -> Self {
        Self {
            matcher,
            destination: destination.into(),
            buffer: Vec::new(),
        }
    }

    /// The archive-internal path the concatenated resource is written to.
    pub fn destination(&self) -> &str {
        &self.destination
    }
}

impl Transformer for AppendingTransformer {
    fn name(&self) -> &str {
        "append"
    }

    fn claims(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }

    fn absorb(&mut self, path: &str, content: &mut dyn Read) -> TransformResult<()> {
        if !self.buffer.is_empty() && self.buffer.last() != Some(&b'\n') {
            self.buffer.push(b'\n');
        }
        content
            .read_to_end(&mut self.buffer)
            .map_err(|source| TransformError::Read {
                path: path.to_string(),
                source,
            })?;
        debug!(path, total = self.buffer.len(), "appended resource content");
        Ok(())
    }

    fn has_output(&self) -> bool {
        !self.buffer.is_empty()
    }

    fn finalize(
        &mut self,
        sink: &mut dyn ArchiveSink,
        timestamps: TimestampMode,
    ) -> TransformResult<()> {
        sink.put_entry(&self.destination, &self.buffer, timestamps)
            .map_err(|source| TransformError::Write {
                path: self.destination.clone(),
                source,
            })?;
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }
}
