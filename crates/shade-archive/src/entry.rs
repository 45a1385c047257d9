//! Entry metadata for archive contents.

/// The kind of an archive entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file with content bytes.
    File,
    /// A directory marker.
    Directory,
    /// Anything else the container format can carry (links, devices).
    Other,
}

/// Metadata for one entry inside an archive.
///
/// Paths are archive-internal: forward-slash separated, relative, no leading
/// `/`. This is the identity entries are matched and deduplicated by.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryMeta {
    /// Archive-internal path of the entry.
    pub path: String,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Modification time as seconds since the Unix epoch.
    pub mtime: u64,
    /// Unix permission bits.
    pub mode: u32,
    /// What kind of entry this is.
    pub kind: EntryKind,
}

impl EntryMeta {
    /// Returns `true` if this entry is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}
