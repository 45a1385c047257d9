//! Streaming reader over the entries of one input archive.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::entry::{EntryKind, EntryMeta};
use crate::error::{ArchiveError, ArchiveResult};

/// Reads one gzip-compressed tar archive entry by entry.
///
/// The reader holds only the path; each walk opens the file fresh, so the
/// same reader can be walked more than once.
#[derive(Clone, Debug)]
pub struct ArchiveReader {
    path: PathBuf,
}

impl ArchiveReader {
    /// Open an input archive at `path`.
    ///
    /// Fails with [`ArchiveError::NotFound`] if the path is missing or not a
    /// regular file. The container format is not validated until a walk
    /// actually decodes bytes.
    pub fn open(path: &Path) -> ArchiveResult<Self> {
        if !path.is_file() {
            return Err(ArchiveError::NotFound(path.to_path_buf()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// The filesystem path of this archive.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Walk every entry, handing the callback the entry's metadata and a
    /// streaming reader over its content bytes.
    ///
    /// Entries are visited in container order. The walk is fail-fast: the
    /// first callback error aborts and propagates.
    pub fn for_each_entry<E, F>(&self, mut f: F) -> Result<(), E>
    where
        E: From<ArchiveError>,
        F: FnMut(&EntryMeta, &mut dyn Read) -> Result<(), E>,
    {
        let file = File::open(&self.path).map_err(ArchiveError::from)?;
        let decoder = GzDecoder::new(file);
        let mut archive = tar::Archive::new(decoder);

        let entries = archive.entries().map_err(ArchiveError::from)?;
        for entry in entries {
            let mut entry = entry.map_err(ArchiveError::from)?;
            let meta = self.entry_meta(&entry)?;
            f(&meta, &mut entry)?;
        }
        Ok(())
    }

    /// Collect metadata for every entry without reading content bytes.
    pub fn list_entries(&self) -> ArchiveResult<Vec<EntryMeta>> {
        let mut listed = Vec::new();
        self.for_each_entry::<ArchiveError, _>(|meta, _| {
            listed.push(meta.clone());
            Ok(())
        })?;
        Ok(listed)
    }

    fn entry_meta<R: Read>(&self, entry: &tar::Entry<'_, R>) -> ArchiveResult<EntryMeta> {
        let path = entry
            .path()
            .map_err(|e| self.malformed(format!("undecodable entry path: {e}")))?
            .to_string_lossy()
            .replace('\\', "/");

        let header = entry.header();
        let kind = match header.entry_type() {
            tar::EntryType::Regular | tar::EntryType::Continuous => EntryKind::File,
            tar::EntryType::Directory => EntryKind::Directory,
            _ => EntryKind::Other,
        };

        Ok(EntryMeta {
            path,
            size: entry.size(),
            mtime: header.mtime().unwrap_or(0),
            mode: header.mode().unwrap_or(0o644),
            kind,
        })
    }

    fn malformed(&self, reason: String) -> ArchiveError {
        ArchiveError::MalformedEntry {
            archive: self.path.clone(),
            reason,
        }
    }
}
