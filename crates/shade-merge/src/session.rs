//! The merge session: one full run combining input archives into one output.

use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};

use shade_archive::{ArchiveReader, ArchiveSink, TarSink, TimestampMode};
use shade_transform::Transformer;
use tracing::{debug, info, warn};

use crate::config::MergeConfig;
use crate::error::{MergeError, MergeResult};

/// Summary of one completed merge session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Input archives walked.
    pub archives_read: usize,
    /// Unclaimed entries copied verbatim to the output.
    pub entries_copied: usize,
    /// Claimed entries absorbed, keyed by transformer name.
    pub entries_absorbed: BTreeMap<String, usize>,
    /// Later occurrences of already-copied paths that were dropped.
    pub duplicates_skipped: usize,
    /// Aggregated entries written by transformer finalization.
    pub transformed_entries: usize,
}

impl MergeReport {
    /// Total claimed entries absorbed across all transformers.
    pub fn total_absorbed(&self) -> usize {
        self.entries_absorbed.values().sum()
    }
}

/// Drives a set of transformers over every entry of every input archive and
/// assembles the shaded output.
///
/// Enumeration is sequential and stable: inputs are visited in sorted path
/// order, entries in container order. Together with deterministic
/// timestamps this makes rebuilds from identical inputs byte-identical,
/// which matters because the merge transformer keeps the first occurrence
/// of each distinct resource text.
///
/// For each regular entry, the first transformer claiming its path absorbs
/// it; unclaimed entries are copied verbatim, with later occurrences of an
/// already-copied path dropped (first wins). After all inputs, every
/// transformer holding output finalizes exactly once.
///
/// A session is single-use: transformers are spent after the run.
pub struct MergeSession {
    transformers: Vec<Box<dyn Transformer>>,
    timestamps: TimestampMode,
}

impl MergeSession {
    /// Create an empty session with the given timestamp policy.
    pub fn new(timestamps: TimestampMode) -> Self {
        Self {
            transformers: Vec::new(),
            timestamps,
        }
    }

    /// Create a session with fresh transformers from `config`.
    pub fn from_config(config: &MergeConfig) -> Self {
        Self {
            transformers: config.build_transformers(),
            timestamps: config.timestamp_mode(),
        }
    }

    /// Append a transformer. Earlier transformers win claim ties.
    pub fn add_transformer(&mut self, transformer: Box<dyn Transformer>) {
        self.transformers.push(transformer);
    }

    /// Number of transformers registered.
    pub fn transformer_count(&self) -> usize {
        self.transformers.len()
    }

    /// Merge `inputs` into a new gzip-compressed tar archive at `output`.
    pub fn run(mut self, inputs: &[PathBuf], output: &Path) -> MergeResult<MergeReport> {
        let inputs = collect_inputs(inputs)?;
        let mut sink = TarSink::create(output)?;
        let report = self.run_into(&inputs, &mut sink)?;
        sink.finish()?;
        info!(
            output = %output.display(),
            archives = report.archives_read,
            copied = report.entries_copied,
            absorbed = report.total_absorbed(),
            transformed = report.transformed_entries,
            "merge session complete"
        );
        Ok(report)
    }

    /// Merge already-collected `inputs` into an arbitrary sink.
    ///
    /// `inputs` are visited in the order given; [`Self::run`] sorts them
    /// first. Exposed separately so hosts can target in-memory sinks.
    pub fn run_into(
        &mut self,
        inputs: &[PathBuf],
        sink: &mut dyn ArchiveSink,
    ) -> MergeResult<MergeReport> {
        let mut report = MergeReport::default();
        let mut written: HashSet<String> = HashSet::new();
        let timestamps = self.timestamps;
        let transformers = &mut self.transformers;

        for input in inputs {
            let reader = ArchiveReader::open(input)?;
            debug!(archive = %input.display(), "walking input archive");
            reader.for_each_entry::<MergeError, _>(|meta, content| {
                if !meta.is_file() {
                    return Ok(());
                }
                if let Some(t) = transformers.iter_mut().find(|t| t.claims(&meta.path)) {
                    t.absorb(&meta.path, content)?;
                    *report.entries_absorbed.entry(t.name().to_string()).or_default() += 1;
                    return Ok(());
                }
                if !written.insert(meta.path.clone()) {
                    warn!(path = %meta.path, archive = %input.display(), "duplicate path, keeping first occurrence");
                    report.duplicates_skipped += 1;
                    return Ok(());
                }
                let mut data = Vec::with_capacity(meta.size as usize);
                content.read_to_end(&mut data).map_err(MergeError::Io)?;
                sink.put_entry(&meta.path, &data, timestamps)?;
                report.entries_copied += 1;
                Ok(())
            })?;
            report.archives_read += 1;
        }

        for t in transformers.iter_mut() {
            if t.has_output() {
                t.finalize(&mut *sink, timestamps)?;
                report.transformed_entries += 1;
            }
        }

        Ok(report)
    }
}

/// Expand and order the input set.
///
/// Directories are searched recursively for `.tar.gz` / `.tgz` files; plain
/// paths are taken as-is. The result is sorted lexicographically and
/// deduplicated, giving the stable enumeration order reproducible builds
/// require.
pub fn collect_inputs(paths: &[PathBuf]) -> MergeResult<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in walkdir::WalkDir::new(path).sort_by_file_name() {
                let entry = entry.map_err(|e| MergeError::Io(e.into()))?;
                if entry.file_type().is_file() && is_archive_name(entry.path()) {
                    inputs.push(entry.into_path());
                }
            }
        } else {
            inputs.push(path.clone());
        }
    }
    inputs.sort();
    inputs.dedup();
    if inputs.is_empty() {
        return Err(MergeError::NoInputs);
    }
    Ok(inputs)
}

fn is_archive_name(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.ends_with(".tar.gz") || name.ends_with(".tgz")
}
