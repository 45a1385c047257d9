//! Archive container plumbing for shade.
//!
//! The merge pipeline treats archives through two narrow surfaces: a
//! streaming [`ArchiveReader`] over each input's entries, and an
//! [`ArchiveSink`] the assembled output is appended to. The shipped
//! container format is gzip-compressed tar; [`MemorySink`] backs tests and
//! dry runs.
//!
//! Reproducibility: [`TimestampMode::Deterministic`] stamps every written
//! entry with a fixed epoch-zero mtime, so identical inputs always produce
//! byte-identical output archives.

pub mod entry;
pub mod error;
pub mod reader;
pub mod sink;

pub use entry::{EntryKind, EntryMeta};
pub use error::{ArchiveError, ArchiveResult};
pub use reader::ArchiveReader;
pub use sink::{ArchiveSink, MemoryEntry, MemorySink, TarSink, TimestampMode};

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::path::Path;

    fn write_archive(path: &Path, entries: &[(&str, &[u8])], timestamps: TimestampMode) {
        let mut sink = TarSink::create(path).unwrap();
        for (name, data) in entries {
            sink.put_entry(name, data, timestamps).unwrap();
        }
        sink.finish().unwrap();
    }

    #[test]
    fn sink_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tar.gz");
        write_archive(
            &path,
            &[("a.txt", b"alpha"), ("dir/b.txt", b"beta")],
            TimestampMode::Deterministic,
        );

        let reader = ArchiveReader::open(&path).unwrap();
        let mut seen = Vec::new();
        reader
            .for_each_entry::<ArchiveError, _>(|meta, content| {
                let mut bytes = Vec::new();
                content.read_to_end(&mut bytes)?;
                seen.push((meta.path.clone(), bytes));
                Ok(())
            })
            .unwrap();

        assert_eq!(
            seen,
            vec![
                ("a.txt".to_string(), b"alpha".to_vec()),
                ("dir/b.txt".to_string(), b"beta".to_vec()),
            ]
        );
    }

    #[test]
    fn deterministic_timestamps_are_epoch_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tar.gz");
        write_archive(&path, &[("a.txt", b"x")], TimestampMode::Deterministic);

        let entries = ArchiveReader::open(&path).unwrap().list_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mtime, 0);
        assert!(entries[0].is_file());
    }

    #[test]
    fn wallclock_timestamps_are_recent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tar.gz");
        write_archive(&path, &[("a.txt", b"x")], TimestampMode::Wallclock);

        let entries = ArchiveReader::open(&path).unwrap().list_entries().unwrap();
        assert!(entries[0].mtime > 0);
    }

    #[test]
    fn deterministic_rebuild_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.tar.gz");
        let second = dir.path().join("second.tar.gz");
        let entries: &[(&str, &[u8])] = &[("LICENSE", b"MIT"), ("readme.md", b"hello")];
        write_archive(&first, entries, TimestampMode::Deterministic);
        write_archive(&second, entries, TimestampMode::Deterministic);

        let a = std::fs::read(&first).unwrap();
        let b = std::fs::read(&second).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn open_missing_archive() {
        let err = ArchiveReader::open(Path::new("/nonexistent/input.tar.gz")).unwrap_err();
        assert!(matches!(err, ArchiveError::NotFound(_)));
    }

    #[test]
    fn memory_sink_preserves_order_and_data() {
        let mut sink = MemorySink::new();
        sink.put_entry("b", b"2", TimestampMode::Deterministic).unwrap();
        sink.put_entry("a", b"1", TimestampMode::Deterministic).unwrap();

        assert_eq!(sink.entry_count(), 2);
        assert_eq!(sink.entries()[0].path, "b");
        assert_eq!(sink.entry("a").unwrap().data, b"1");
        assert_eq!(sink.entry("a").unwrap().mtime, 0);
        assert!(sink.entry("missing").is_none());
    }
}
