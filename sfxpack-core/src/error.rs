use std::fmt;
use std::path::PathBuf;

use crate::path::BasePath;

pub type Result<T> = std::result::Result<T, Error>;

/// The byte source or destination involved in a failed assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Stub,
    Config,
    Archive,
    Output,
}

impl Segment {
    pub fn as_str(&self) -> &str {
        match self {
            Segment::Stub => "stub",
            Segment::Config => "config",
            Segment::Archive => "archive",
            Segment::Output => "output",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot resolve path `{}`", .path.display())]
    InvalidPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path `{}` is outside of working directory `{base}`", .path.display())]
    OutsideBase { path: PathBuf, base: BasePath },

    #[error("Directory `{}` does not exist", .path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Cannot create archive `{}`", .path.display())]
    ArchiveCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write entry for `{}`", .path.display())]
    EntryWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot assemble executable from {segment} `{}`", .path.display())]
    Assembly {
        segment: Segment,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
