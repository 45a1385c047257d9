//! Dedup-and-aggregate merging of same-named text resources.

use std::io::Read;

use shade_archive::{ArchiveSink, TimestampMode};
use tracing::debug;

use crate::error::{TransformError, TransformResult};
use crate::matcher::PathMatcher;
use crate::transformer::Transformer;

/// Width of the dash rule separating aggregated resources.
const SEPARATOR_WIDTH: usize = 20;

/// Collects every occurrence of a set of text resources across all input
/// archives, deduplicates them by normalized content, and emits exactly one
/// merged entry at a fixed destination path.
///
/// Normalization collapses Windows line breaks (`\r\n` -> `\n`) so two
/// logically identical texts authored on different platforms compare equal.
/// The dedup key additionally trims leading and trailing whitespace, but the
/// surviving rendering kept in the output is the normalized, untrimmed text
/// of whichever occurrence arrived first. Each kept text is followed by a
/// dash-rule separator so distinct texts never run together, even when
/// neither ends with a newline.
///
/// State is append-only during collection and consumed once by finalize,
/// which clears it; an accidental second finalize writes nothing observable.
pub struct ResourceMergeTransformer {
    matcher: PathMatcher,
    destination: String,
    seen: Vec<String>,
    buffer: String,
}

impl ResourceMergeTransformer {
    /// Create a transformer aggregating into `destination`.
    pub fn new(destination: impl Into<String>, matcher: PathMatcher) -> Self {
        Self {
            matcher,
            destination: destination.into(),
            seen: Vec::new(),
            buffer: String::new(),
        }
    }

    /// The archive-internal path the merged resource is written to.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Number of distinct texts accepted so far.
    pub fn unique_count(&self) -> usize {
        self.seen.len()
    }

    /// The aggregated output bytes accumulated so far.
    pub fn buffer(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    fn separator() -> String {
        format!("\n{}\n\n", "-".repeat(SEPARATOR_WIDTH))
    }
}

impl Transformer for ResourceMergeTransformer {
    fn name(&self) -> &str {
        "resource-merge"
    }

    fn claims(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }

    fn absorb(&mut self, path: &str, content: &mut dyn Read) -> TransformResult<()> {
        let mut text = String::new();
        content
            .read_to_string(&mut text)
            .map_err(|source| TransformError::Read {
                path: path.to_string(),
                source,
            })?;

        let normalized = text.replace("\r\n", "\n");
        let key = normalized.trim();

        if self.seen.iter().any(|s| s == key) {
            debug!(path, "duplicate resource content, discarding");
            return Ok(());
        }

        self.buffer.push_str(&normalized);
        self.buffer.push_str(&Self::separator());
        self.seen.push(key.to_string());
        debug!(path, unique = self.seen.len(), "absorbed resource content");
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
        sink.put_entry(&self.destination, self.buffer.as_bytes(), timestamps)
            .map_err(|source| TransformError::Write {
                path: self.destination.clone(),
                source,
            })?;
        debug!(
            destination = %self.destination,
            unique = self.seen.len(),
            bytes = self.buffer.len(),
            "finalized merged resource"
        );
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shade_archive::MemorySink;

    const SEP: &str = "\n--------------------\n\n";

    fn license_transformer() -> ResourceMergeTransformer {
        ResourceMergeTransformer::new(
            "META-INF/LICENSE",
            PathMatcher::new().claim("META-INF/LICENSE").claim("LICENSE"),
        )
    }

    fn absorb(t: &mut ResourceMergeTransformer, text: &str) {
        let mut content = text.as_bytes();
        t.absorb("LICENSE", &mut content).unwrap();
    }

    #[test]
    fn separator_between_distinct_texts() {
        let mut t = license_transformer();
        absorb(&mut t, "A");
        absorb(&mut t, "B");
        assert_eq!(t.buffer(), format!("A{SEP}B{SEP}").as_bytes());
    }

    #[test]
    fn identical_text_absorbed_once() {
        let mut t = license_transformer();
        for _ in 0..5 {
            absorb(&mut t, "MIT License");
        }
        assert_eq!(t.unique_count(), 1);
        assert_eq!(t.buffer(), format!("MIT License{SEP}").as_bytes());
    }

    #[test]
    fn crlf_and_lf_variants_dedup_together() {
        let mut t = license_transformer();
        absorb(&mut t, "MIT\r\nCopyright X");
        absorb(&mut t, "MIT\nCopyright X");
        assert_eq!(t.unique_count(), 1);
        // Both normalize to the same text, so the survivor is LF-normalized.
        assert_eq!(t.buffer(), format!("MIT\nCopyright X{SEP}").as_bytes());
    }

    #[test]
    fn trailing_whitespace_dedups_but_first_rendering_survives() {
        let mut t = license_transformer();
        absorb(&mut t, "MIT\n");
        absorb(&mut t, "  MIT");
        assert_eq!(t.unique_count(), 1);
        assert_eq!(t.buffer(), format!("MIT\n{SEP}").as_bytes());
    }

    #[test]
    fn mixed_duplicate_and_distinct_scenario() {
        let mut t = license_transformer();
        absorb(&mut t, "MIT\r\nCopyright X");
        absorb(&mut t, "MIT\nCopyright X");
        absorb(&mut t, "MIT\nCopyright Y");
        assert_eq!(t.unique_count(), 2);
        assert_eq!(
            t.buffer(),
            format!("MIT\nCopyright X{SEP}MIT\nCopyright Y{SEP}").as_bytes()
        );
    }

    #[test]
    fn empty_session_has_no_output_and_finalize_is_harmless() {
        let mut t = license_transformer();
        assert!(!t.has_output());

        let mut sink = MemorySink::new();
        t.finalize(&mut sink, TimestampMode::Deterministic).unwrap();
        assert_eq!(sink.entry("META-INF/LICENSE").unwrap().data, b"");
    }

    #[test]
    fn finalize_writes_destination_and_clears_state() {
        let mut t = license_transformer();
        absorb(&mut t, "Apache-2.0");
        assert!(t.has_output());

        let mut sink = MemorySink::new();
        t.finalize(&mut sink, TimestampMode::Deterministic).unwrap();

        let entry = sink.entry("META-INF/LICENSE").unwrap();
        assert_eq!(entry.data, format!("Apache-2.0{SEP}").as_bytes());
        assert_eq!(entry.mtime, 0);
        assert!(!t.has_output());
        assert_eq!(t.unique_count(), 0);

        // Double finalize appends only an empty entry, never duplicate bytes.
        t.finalize(&mut sink, TimestampMode::Deterministic).unwrap();
        assert_eq!(sink.entries()[1].data, b"");
    }

    #[test]
    fn invalid_utf8_is_a_fatal_read_error() {
        let mut t = license_transformer();
        let mut content: &[u8] = &[0xff, 0xfe, 0x00];
        let err = t.absorb("LICENSE", &mut content).unwrap_err();
        assert!(matches!(err, TransformError::Read { .. }));
        assert!(!t.has_output());
    }

    #[test]
    fn claims_follows_matcher() {
        let t = license_transformer();
        assert!(t.claims("LICENSE"));
        assert!(t.claims("META-INF/LICENSE"));
        assert!(!t.claims("META-INF/NOTICE"));
    }

    #[test]
    fn two_sessions_with_same_inputs_produce_identical_bytes() {
        let run = || {
            let mut t = license_transformer();
            absorb(&mut t, "MIT\r\n");
            absorb(&mut t, "BSD");
            let mut sink = MemorySink::new();
            t.finalize(&mut sink, TimestampMode::Deterministic).unwrap();
            sink.entries()[0].clone()
        };
        assert_eq!(run(), run());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Duplicate multiplicity and position never change the output:
            // absorbing a sequence with repeats equals absorbing only the
            // first occurrence of each distinct text.
            #[test]
            fn dedup_ignores_duplicate_multiplicity(
                indices in proptest::collection::vec(0usize..4, 0..24)
            ) {
                let pool = ["alpha", "beta", "gamma", "delta"];

                let mut with_dups = license_transformer();
                for &i in &indices {
                    absorb(&mut with_dups, pool[i]);
                }

                let mut firsts_only = license_transformer();
                let mut taken = Vec::new();
                for &i in &indices {
                    if !taken.contains(&i) {
                        taken.push(i);
                        absorb(&mut firsts_only, pool[i]);
                    }
                }

                prop_assert_eq!(with_dups.buffer(), firsts_only.buffer());
                prop_assert_eq!(with_dups.unique_count(), taken.len());
            }
        }
    }
}
