//! Filesystem helpers shared by the archive builder and the assembler.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// The directory `path` will be created in, `.` for a bare file name.
pub fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Canonical form of `path`, or of its parent joined with the file name when
/// `path` does not exist yet.
pub fn canonical_or_joined(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    match (parent_dir(path).canonicalize(), path.file_name()) {
        (Ok(parent), Some(name)) => parent.join(name),
        _ => path.to_path_buf(),
    }
}

/// A hidden temporary file in the same directory as `target`, so that it can
/// later be renamed over `target` without crossing filesystems.
pub fn staging_file(target: &Path) -> io::Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix(".sfxpack-")
        .suffix(".tmp")
        .tempfile_in(parent_dir(target))
}

#[cfg(unix)]
pub fn set_executable(file: &File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = file.metadata()?.permissions();
    permissions.set_mode(0o755);
    file.set_permissions(permissions)
}

#[cfg(not(unix))]
pub fn set_executable(_file: &File) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_dir_of_bare_name() {
        assert_eq!(parent_dir(Path::new("out.zip")), Path::new("."));
        assert_eq!(parent_dir(Path::new("dir/out.zip")), Path::new("dir"));
    }

    #[test]
    fn canonical_of_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("later.exe");
        assert_eq!(
            canonical_or_joined(&missing),
            dir.path().canonicalize().unwrap().join("later.exe")
        );
    }

    #[test]
    fn staging_file_is_a_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let temp = staging_file(&dir.path().join("out.zip")).unwrap();
        assert_eq!(temp.path().parent().unwrap(), dir.path());
        drop(temp);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
