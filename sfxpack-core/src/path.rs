use std::fmt;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

use crate::error::{Error, Result};

/// The separator used between components of an `EntryName`, regardless of
/// platform.
pub const ENTRY_SEP: &str = "/";

/// Why a relative path cannot be used as an archive entry name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EntryNameError {
    #[error("entry name is not valid UTF-8")]
    NotUtf8,

    #[error("entry name contains a backslash")]
    Backslash,

    #[error("entry name is not a plain relative path")]
    NotRelative,

    #[error("file is the base directory itself")]
    Empty,
}

impl From<EntryNameError> for std::io::Error {
    fn from(err: EntryNameError) -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
    }
}

/// Canonical directory that archive entry names are relative to.
///
/// Displays with a trailing platform separator, so `/a/b` is shown as `/a/b/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePath(PathBuf);

/// Resolves the base path for a build.
///
/// The explicit `working_dir` wins if given, otherwise the input directory
/// itself is the base. Only reads the filesystem.
pub fn resolve<P: AsRef<Path>>(input_dir: P, working_dir: Option<&Path>) -> Result<BasePath> {
    let path = working_dir.unwrap_or_else(|| input_dir.as_ref());

    let canonical = path.canonicalize().map_err(|source| Error::InvalidPath {
        path: path.to_path_buf(),
        source,
    })?;

    if !canonical.is_dir() {
        return Err(Error::InvalidPath {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        });
    }

    let base = BasePath(canonical);
    tracing::info!(working_directory = %base, "resolved working directory");
    Ok(base)
}

impl BasePath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Computes the entry name for an already canonicalized file path.
    pub fn entry_name(&self, file: &Path) -> Result<EntryName> {
        let relative = file.strip_prefix(&self.0).map_err(|_| Error::OutsideBase {
            path: file.to_path_buf(),
            base: self.clone(),
        })?;

        EntryName::from_relative(relative).map_err(|e| Error::InvalidPath {
            path: file.to_path_buf(),
            source: e.into(),
        })
    }
}

impl fmt::Display for BasePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.display().to_string();
        f.write_str(&s)?;
        if !s.ends_with(MAIN_SEPARATOR) {
            write!(f, "{}", MAIN_SEPARATOR)?;
        }
        Ok(())
    }
}

/// Name of a file inside the archive: relative, `/`-separated, never empty.
#[derive(Debug, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EntryName(String);

impl EntryName {
    pub fn from_relative<P: AsRef<Path>>(
        path: P,
    ) -> std::result::Result<EntryName, EntryNameError> {
        let mut out = vec![];

        for component in path.as_ref().components() {
            match component {
                Component::Normal(os_str) => {
                    let part = os_str.to_str().ok_or(EntryNameError::NotUtf8)?;
                    // Windows extractors read it as a separator.
                    if part.contains('\\') {
                        return Err(EntryNameError::Backslash);
                    }
                    out.push(part);
                }
                Component::CurDir
                | Component::ParentDir
                | Component::RootDir
                | Component::Prefix(_) => return Err(EntryNameError::NotRelative),
            }
        }

        if out.is_empty() {
            return Err(EntryNameError::Empty);
        }

        Ok(EntryName(out.join(ENTRY_SEP)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
