use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result, Segment};
use crate::fs::{set_executable, staging_file};

/// A byte source copied verbatim into the executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asset {
    File(PathBuf),
    Bytes(Cow<'static, [u8]>),
}

impl Asset {
    pub fn embedded(bytes: &'static [u8]) -> Asset {
        Asset::Bytes(Cow::Borrowed(bytes))
    }

    pub fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        match self {
            Asset::File(path) => Ok(Box::new(File::open(path)?)),
            Asset::Bytes(bytes) => Ok(Box::new(&bytes[..])),
        }
    }

    /// Path used when reporting errors; in-memory assets have none.
    pub fn path(&self) -> PathBuf {
        match self {
            Asset::File(path) => path.clone(),
            Asset::Bytes(_) => PathBuf::from("<embedded>"),
        }
    }
}

impl From<PathBuf> for Asset {
    fn from(path: PathBuf) -> Asset {
        Asset::File(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblySummary {
    pub path: PathBuf,
    pub len: u64,
}

/// Writes `stub ++ config ++ archive` to `output` and marks it executable.
///
/// Nothing separates the segments; the stub locates its payload itself. Each
/// source is closed as soon as it has been copied. The output is staged in a
/// temporary file and only appears at `output` once complete.
pub fn assemble<P, Q>(
    stub: &Asset,
    config: &Asset,
    archive: P,
    output: Q,
) -> Result<AssemblySummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let output = output.as_ref();
    let archive = Asset::File(archive.as_ref().to_path_buf());

    let output_error = |source: io::Error| Error::Assembly {
        segment: Segment::Output,
        path: output.to_path_buf(),
        source,
    };

    let mut temp = staging_file(output).map_err(output_error)?;

    tracing::info!(output = %output.display(), "assembling executable");

    let mut len = 0u64;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        let segments = [
            (Segment::Stub, stub),
            (Segment::Config, config),
            (Segment::Archive, &archive),
        ];

        for (segment, asset) in segments {
            len += copy_segment(segment, asset, &mut writer, output)?;
        }

        writer
            .into_inner()
            .map_err(|e| output_error(e.into_error()))?;
    }

    set_executable(temp.as_file()).map_err(output_error)?;
    temp.as_file().sync_all().map_err(output_error)?;
    temp.persist(output).map_err(|e| output_error(e.error))?;

    tracing::info!(output = %output.display(), len, "executable complete");

    Ok(AssemblySummary {
        path: output.to_path_buf(),
        len,
    })
}

fn copy_segment<W: Write>(
    segment: Segment,
    asset: &Asset,
    writer: &mut W,
    output: &Path,
) -> Result<u64> {
    let read_error = |source: io::Error| Error::Assembly {
        segment,
        path: asset.path(),
        source,
    };
    let write_error = |source: io::Error| Error::Assembly {
        segment: Segment::Output,
        path: output.to_path_buf(),
        source,
    };

    let mut reader = asset.open().map_err(read_error)?;
    let mut buf = [0u8; 8 * 1024];
    let mut copied = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(read_error(e)),
        };
        writer.write_all(&buf[..n]).map_err(write_error)?;
        copied += n as u64;
    }

    tracing::debug!(%segment, bytes = copied, "copied segment");
    Ok(copied)
}
