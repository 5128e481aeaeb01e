//! The seam between directory traversal and the compression codec.

use std::io::{self, Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::path::EntryName;

/// A compressed container that accepts one file entry at a time.
///
/// Callers drive it as `start_entry`, any number of `write_chunk`s,
/// `finish_entry`, repeated per file, then `finish` once.
pub trait ContainerWriter {
    type Output;

    /// Begins a new file entry. `len` is the expected length in bytes and is
    /// only a hint for the codec.
    fn start_entry(&mut self, name: &EntryName, len: u64) -> io::Result<()>;

    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()>;

    fn finish_entry(&mut self) -> io::Result<()>;

    /// Flushes all buffered compression state and closes the container.
    fn finish(self) -> io::Result<Self::Output>
    where
        Self: Sized;
}

/// Deflate-compressed zip container.
///
/// Entry timestamps are pinned to the zip epoch so that identical trees
/// produce identical bytes.
pub struct ZipContainer<W: Write + Seek> {
    inner: ZipWriter<W>,
    options: SimpleFileOptions,
    in_entry: bool,
}

impl<W: Write + Seek> ZipContainer<W> {
    pub fn new(writer: W) -> ZipContainer<W> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        ZipContainer {
            inner: ZipWriter::new(writer),
            options,
            in_entry: false,
        }
    }
}

impl<W: Write + Seek> ContainerWriter for ZipContainer<W> {
    type Output = W;

    fn start_entry(&mut self, name: &EntryName, len: u64) -> io::Result<()> {
        let options = self.options.large_file(len >= u32::MAX as u64);
        self.inner
            .start_file(name.as_str(), options)
            .map_err(io::Error::other)?;
        self.in_entry = true;
        Ok(())
    }

    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        if !self.in_entry {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "no entry started",
            ));
        }
        self.inner.write_all(chunk)
    }

    fn finish_entry(&mut self) -> io::Result<()> {
        // The zip writer closes an entry lazily on the next `start_file`.
        self.in_entry = false;
        Ok(())
    }

    fn finish(self) -> io::Result<W> {
        self.inner.finish().map_err(io::Error::other)
    }
}
