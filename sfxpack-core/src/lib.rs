//! Packs a directory tree into a zip archive and glues that archive onto an
//! extraction stub, producing a single self-extracting executable.
//!
//! The stub must read zip archives, such as Info-ZIP's `unzipsfx`. Zip
//! readers locate the archive from its end, so the bytes in front of it are
//! ignored.
//!
//! The pipeline is [`resolve`] → [`build`] → [`assemble`]:
//!
//! ```no_run
//! use std::path::Path;
//! use sfxpack_core::{assemble, build, resolve, Asset};
//!
//! # fn main() -> sfxpack_core::Result<()> {
//! let input = Path::new("dist/app");
//! let base = resolve(input, None)?;
//! let archive = build(input, &base, "app.zip")?;
//! assemble(
//!     &Asset::File("unzipsfx.exe".into()),
//!     &Asset::embedded(b""),
//!     &archive.path,
//!     "app.exe",
//! )?;
//! # Ok(())
//! # }
//! ```

mod assemble;
mod builder;
pub mod container;
mod error;
mod fs;
pub mod path;

pub use assemble::{assemble, Asset, AssemblySummary};
pub use builder::{build, ArchiveBuilder, ArchiveSummary, TreeStats, CHUNK_SIZE};
pub use container::{ContainerWriter, ZipContainer};
pub use error::{Error, Result, Segment};
pub use path::{resolve, BasePath, EntryName};
