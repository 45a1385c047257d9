//! The transformer seam between the merge host and resource-specific logic.

use std::io::Read;

use shade_archive::{ArchiveSink, TimestampMode};

use crate::error::TransformResult;

/// A resource transformer participating in an archive merge session.
///
/// The host drives the two-phase lifecycle: during collection it asks
/// [`claims`](Self::claims) for every entry of every input archive and
/// streams claimed entries into [`absorb`](Self::absorb); after all inputs
/// are exhausted it calls [`finalize`](Self::finalize) once, guarded by
/// [`has_output`](Self::has_output), to append the aggregated entry to the
/// output sink.
///
/// A transformer instance is spent after finalize. Hosts running multiple
/// merge sessions must construct a fresh instance (or call
/// [`reset`](Self::reset)) per session.
///
/// Absorb calls never interleave: the host enumerates entries sequentially,
/// and `absorb`/`finalize` take `&mut self`. `claims` is read-only and may
/// be called concurrently. The trait is `Send` so a parallel host can move
/// transformers behind a lock.
pub trait Transformer: Send {
    /// Short name used in logs and merge reports.
    fn name(&self) -> &str;

    /// Whether this transformer takes ownership of the entry at `path`,
    /// suppressing the host's default verbatim copy.
    fn claims(&self, path: &str) -> bool;

    /// Consume one claimed entry's content.
    ///
    /// The host only calls this for paths where [`claims`](Self::claims)
    /// returned `true`. The stream is read to exhaustion inside the call;
    /// the transformer must not retain it.
    fn absorb(&mut self, path: &str, content: &mut dyn Read) -> TransformResult<()>;

    /// Whether any absorbed content is waiting to be written.
    ///
    /// Hosts use this to skip [`finalize`](Self::finalize) entirely when no
    /// input archive contained a claimed path.
    fn has_output(&self) -> bool;

    /// Append the aggregated output entry to `sink` and clear session state.
    ///
    /// Writing an empty aggregate is harmless, so calling this without
    /// checking [`has_output`](Self::has_output) is safe; a second call with
    /// no intervening absorb writes nothing observable.
    fn finalize(&mut self, sink: &mut dyn ArchiveSink, timestamps: TimestampMode)
        -> TransformResult<()>;

    /// Discard all session state, returning the transformer to collecting.
    fn reset(&mut self);
}
