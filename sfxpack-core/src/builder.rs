use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Read};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::container::{ContainerWriter, ZipContainer};
use crate::error::{Error, Result};
use crate::fs::{canonical_or_joined, staging_file};
use crate::path::{BasePath, EntryName};

/// Size of the buffer each file is streamed through.
pub const CHUNK_SIZE: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub entries: u64,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    pub entries: u64,
    pub bytes: u64,
}

/// Walks a directory tree depth-first and streams every regular file into a
/// container, naming entries relative to a [`BasePath`].
///
/// Siblings are visited in file name order and symlinks are followed.
/// Directories only contribute the files beneath them, so empty directories
/// do not appear in the archive. A file reachable through several symlinks
/// is stored once, under its canonical name.
#[derive(Debug, Clone)]
pub struct ArchiveBuilder<'a> {
    base: &'a BasePath,
    excluded: Vec<PathBuf>,
}

impl<'a> ArchiveBuilder<'a> {
    pub fn new(base: &'a BasePath) -> ArchiveBuilder<'a> {
        ArchiveBuilder {
            base,
            excluded: vec![],
        }
    }

    /// Never archive `path`, even when it lies inside the input tree. The
    /// path does not have to exist yet.
    pub fn exclude<P: AsRef<Path>>(mut self, path: P) -> ArchiveBuilder<'a> {
        self.excluded.push(canonical_or_joined(path.as_ref()));
        self
    }

    /// Streams the tree under `input_dir` into `container`. The container is
    /// left open; finishing it is up to the caller.
    pub fn write_tree<C: ContainerWriter>(
        &self,
        input_dir: &Path,
        container: &mut C,
    ) -> Result<TreeStats> {
        self.walk(input_dir, container, None)
    }

    /// Builds a zip archive of `input_dir` at `archive_path`.
    ///
    /// The archive is written to a temporary file next to `archive_path` and
    /// only moved into place once it has been closed, so a failed build
    /// leaves nothing behind. An existing file at `archive_path` is replaced.
    pub fn build<P: AsRef<Path>>(
        &self,
        input_dir: &Path,
        archive_path: P,
    ) -> Result<ArchiveSummary> {
        self.build_with(input_dir, archive_path.as_ref(), ZipContainer::new)
    }

    fn build_with<C, F>(
        &self,
        input_dir: &Path,
        archive_path: &Path,
        make_container: F,
    ) -> Result<ArchiveSummary>
    where
        C: ContainerWriter<Output = BufWriter<File>>,
        F: FnOnce(BufWriter<File>) -> C,
    {
        let creation_error = |source: io::Error| Error::ArchiveCreation {
            path: archive_path.to_path_buf(),
            source,
        };

        let temp = staging_file(archive_path).map_err(creation_error)?;
        let temp_path = temp.path().canonicalize().map_err(creation_error)?;
        let file = temp.as_file().try_clone().map_err(creation_error)?;

        tracing::info!(archive = %archive_path.display(), "creating archive");

        let mut container = make_container(BufWriter::new(file));
        let stats = self.walk(input_dir, &mut container, Some(temp_path.as_path()))?;
        let file = container
            .finish()
            .map_err(creation_error)?
            .into_inner()
            .map_err(|e| creation_error(e.into_error()))?;
        file.sync_all().map_err(creation_error)?;
        drop(file);

        temp.persist(archive_path)
            .map_err(|e| creation_error(e.error))?;

        tracing::info!(
            archive = %archive_path.display(),
            entries = stats.entries,
            bytes = stats.bytes,
            "archive complete"
        );

        Ok(ArchiveSummary {
            path: archive_path.to_path_buf(),
            entries: stats.entries,
            bytes: stats.bytes,
        })
    }

    fn walk<C: ContainerWriter>(
        &self,
        input_dir: &Path,
        container: &mut C,
        skip: Option<&Path>,
    ) -> Result<TreeStats> {
        if !input_dir.is_dir() {
            return Err(Error::DirectoryNotFound {
                path: input_dir.to_path_buf(),
            });
        }

        let mut stats = TreeStats::default();
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut archived = HashSet::new();

        let walker = WalkDir::new(input_dir)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| walk_error(input_dir, e))?;
            let path = entry.path();
            let file_type = entry.file_type();

            if file_type.is_dir() {
                tracing::debug!(path = %path.display(), "visiting directory");
                continue;
            }

            if !file_type.is_file() {
                tracing::warn!(path = %path.display(), "skipping non-regular file");
                continue;
            }

            let entry_error = |source: io::Error| Error::EntryWrite {
                path: path.to_path_buf(),
                source,
            };

            let canonical = path.canonicalize().map_err(entry_error)?;
            if skip == Some(canonical.as_path()) || self.excluded.contains(&canonical) {
                tracing::debug!(path = %path.display(), "skipping excluded file");
                continue;
            }

            // Symlinks to an already archived file would repeat its entry name.
            if archived.contains(&canonical) {
                tracing::debug!(path = %path.display(), "skipping already archived file");
                continue;
            }

            let name = self.base.entry_name(&canonical)?;
            let len = entry.metadata().map_err(|e| entry_error(e.into()))?.len();

            stats.bytes += append_entry(container, &name, path, len, &mut buf)?;
            stats.entries += 1;
            archived.insert(canonical);
        }

        Ok(stats)
    }
}

/// Shorthand for `ArchiveBuilder::new(base).build(input_dir, archive_path)`.
pub fn build<P: AsRef<Path>>(
    input_dir: &Path,
    base: &BasePath,
    archive_path: P,
) -> Result<ArchiveSummary> {
    ArchiveBuilder::new(base).build(input_dir, archive_path)
}

fn append_entry<C: ContainerWriter>(
    container: &mut C,
    name: &EntryName,
    path: &Path,
    len: u64,
    buf: &mut [u8],
) -> Result<u64> {
    let entry_error = |source: io::Error| Error::EntryWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(entry_error)?;

    tracing::debug!(entry = %name, len, "adding entry");
    container.start_entry(name, len).map_err(entry_error)?;

    let mut written = 0u64;
    loop {
        let n = match file.read(buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(entry_error(e)),
        };
        container.write_chunk(&buf[..n]).map_err(entry_error)?;
        written += n as u64;
    }

    container.finish_entry().map_err(entry_error)?;
    Ok(written)
}

fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err.path().unwrap_or(root).to_path_buf();

    if err.loop_ancestor().is_some() {
        return Error::InvalidPath {
            path,
            source: io::Error::other(err),
        };
    }

    Error::EntryWrite {
        path,
        source: err.into(),
    }
}
