//! Resource transformers for shade.
//!
//! When many input archives are merged into one shaded output, same-named
//! resources collide. A [`Transformer`] claims a configured set of
//! archive-internal paths, accumulates the claimed entries' content across
//! the whole merge session, and appends one aggregated entry to the output
//! at finalize time.
//!
//! Two implementations ship:
//!
//! - [`ResourceMergeTransformer`] deduplicates near-identical text (license
//!   files being the canonical case) by normalized content, keeping the
//!   first-seen rendering of each distinct text.
//! - [`AppendingTransformer`] concatenates every occurrence verbatim, for
//!   line-oriented registry resources.

pub mod append;
pub mod error;
pub mod matcher;
pub mod merge;
pub mod transformer;

pub use append::AppendingTransformer;
pub use error::{TransformError, TransformResult};
pub use matcher::PathMatcher;
pub use merge::ResourceMergeTransformer;
pub use transformer::Transformer;
