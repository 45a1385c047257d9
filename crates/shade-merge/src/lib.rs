//! Merge session for shade.
//!
//! Combines many input archives into one shaded output archive. Entries
//! claimed by a configured transformer are aggregated; everything else is
//! copied verbatim with first-wins handling of duplicate paths. The session
//! enumerates inputs in stable sorted order and, by default, stamps
//! deterministic timestamps, so identical inputs always produce a
//! byte-identical output archive.

pub mod config;
pub mod error;
pub mod session;

pub use config::{MergeConfig, ResourceRule};
pub use error::{MergeError, MergeResult};
pub use session::{collect_inputs, MergeReport, MergeSession};
