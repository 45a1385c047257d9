//! Output sink: the writable surface merged entries are appended to.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::ArchiveResult;

/// Timestamp policy for entries written to a sink.
///
/// Under `Deterministic`, every entry gets a fixed epoch-zero mtime so that
/// two builds from identical inputs produce byte-identical output archives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimestampMode {
    /// Fixed mtime of zero (reproducible builds).
    #[default]
    Deterministic,
    /// Wall-clock mtime at write time.
    Wallclock,
}

impl TimestampMode {
    /// The mtime to stamp on an entry written now, in seconds since the epoch.
    pub fn mtime(self) -> u64 {
        match self {
            Self::Deterministic => 0,
            Self::Wallclock => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }
}

/// A writable archive being assembled.
///
/// Implementations append named entries in call order. The sink never
/// deduplicates or reorders; that policy belongs to the caller. All write
/// errors are propagated, never silently ignored.
pub trait ArchiveSink {
    /// Append one entry at `path` containing `data`.
    fn put_entry(&mut self, path: &str, data: &[u8], timestamps: TimestampMode) -> ArchiveResult<()>;

    /// Number of entries appended so far.
    fn entry_count(&self) -> usize;
}

// ---------------------------------------------------------------------------
// TarSink
// ---------------------------------------------------------------------------

/// An [`ArchiveSink`] writing a gzip-compressed tar stream.
pub struct TarSink<W: Write> {
    builder: tar::Builder<GzEncoder<W>>,
    entries: usize,
}

impl TarSink<File> {
    /// Create a sink writing to a new file at `path`.
    pub fn create(path: &Path) -> ArchiveResult<Self> {
        let file = File::create(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> TarSink<W> {
    /// Wrap an arbitrary writer in a gzip-compressed tar sink.
    pub fn new(writer: W) -> Self {
        let encoder = GzEncoder::new(writer, Compression::default());
        Self {
            builder: tar::Builder::new(encoder),
            entries: 0,
        }
    }

    /// Flush the tar trailer and the gzip stream, returning the inner writer.
    ///
    /// Must be called exactly once; dropping the sink without finishing
    /// produces a truncated archive.
    pub fn finish(self) -> ArchiveResult<W> {
        let encoder = self.builder.into_inner()?;
        let writer = encoder.finish()?;
        Ok(writer)
    }
}

impl<W: Write> ArchiveSink for TarSink<W> {
    fn put_entry(&mut self, path: &str, data: &[u8], timestamps: TimestampMode) -> ArchiveResult<()> {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(timestamps.mtime());
        header.set_cksum();
        self.builder.append_data(&mut header, path, data)?;
        self.entries += 1;
        tracing::debug!(path, size = data.len(), "appended entry to sink");
        Ok(())
    }

    fn entry_count(&self) -> usize {
        self.entries
    }
}

// ---------------------------------------------------------------------------
// MemorySink
// ---------------------------------------------------------------------------

/// An in-memory [`ArchiveSink`] keeping entries in insertion order.
///
/// Backs unit tests and the dry-run inspection path; no container format
/// involved.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Vec<MemoryEntry>,
}

/// One entry captured by a [`MemorySink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryEntry {
    pub path: String,
    pub data: Vec<u8>,
    pub mtime: u64,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured entries in insertion order.
    pub fn entries(&self) -> &[MemoryEntry] {
        &self.entries
    }

    /// Look up an entry by path.
    pub fn entry(&self, path: &str) -> Option<&MemoryEntry> {
        self.entries.iter().find(|e| e.path == path)
    }
}

impl ArchiveSink for MemorySink {
    fn put_entry(&mut self, path: &str, data: &[u8], timestamps: TimestampMode) -> ArchiveResult<()> {
        self.entries.push(MemoryEntry {
            path: path.to_string(),
            data: data.to_vec(),
            mtime: timestamps.mtime(),
        });
        Ok(())
    }

    fn entry_count(&self) -> usize {
        self.entries.len()
    }
}
