use flate2::write::DeflateEncoder;
use flate2::{Compression, Crc};
use std::io::Write;

use anyhow::{bail, Context, Result};

use super::structures::*;

/// Streaming ZIP archive writer.
///
/// Members are written one after another as they are added; the central
/// directory is emitted by [`finish`](Self::finish). Archives are limited to
/// the classic (non-ZIP64) format: at most 65535 members and 4 GiB per
/// member and offset.
pub struct ArchiveWriter<W: Write> {
    inner: W,
    /// Bytes written so far, i.e. the offset of the next record
    offset: u64,
    entries: Vec<CentralDirectoryHeader>,
    method: CompressionMethod,
    modified: DosDateTime,
}

impl<W: Write> ArchiveWriter<W> {
    pub fn new(inner: W, method: CompressionMethod) -> Self {
        Self {
            inner,
            offset: 0,
            entries: Vec::new(),
            method,
            modified: DosDateTime::EPOCH,
        }
    }

    /// Timestamp stamped on every member added afterwards.
    pub fn with_modified(mut self, modified: DosDateTime) -> Self {
        self.modified = modified;
        self
    }

    /// Number of members added so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add one member with the given name and contents.
    pub fn add_file(&mut self, name: &str, data: &[u8]) -> Result<()> {
        if self.entries.len() >= u16::MAX as usize {
            bail!("Too many archive members (ZIP64 is not supported)");
        }
        if name.len() > u16::MAX as usize {
            bail!("Archive member name too long: {}", name);
        }

        let mut crc = Crc::new();
        crc.update(data);

        let compressed = match self.method {
            CompressionMethod::Stored => data.to_vec(),
            CompressionMethod::Deflate => {
                let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(data)?;
                encoder.finish()?
            }
        };

        let lfh_offset = to_u32(self.offset, "archive offset")?;
        let compressed_size = to_u32(compressed.len() as u64, name)?;
        let uncompressed_size = to_u32(data.len() as u64, name)?;

        let header = LocalFileHeader {
            compression_method: self.method,
            modified: self.modified,
            crc32: crc.sum(),
            compressed_size,
            uncompressed_size,
            file_name: name,
        };
        let written = header
            .write_to(&mut self.inner)
            .with_context(|| format!("Failed to write header for {}", name))?;
        self.inner.write_all(&compressed)?;
        self.offset += (written + compressed.len()) as u64;

        self.entries.push(CentralDirectoryHeader {
            compression_method: self.method,
            modified: self.modified,
            crc32: header.crc32,
            compressed_size,
            uncompressed_size,
            lfh_offset,
            file_name: name.to_string(),
        });

        Ok(())
    }

    /// Write the central directory and return the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        let cd_offset = to_u32(self.offset, "central directory offset")?;

        let mut cd_size = 0u64;
        for entry in &self.entries {
            cd_size += entry.write_to(&mut self.inner)? as u64;
        }

        EndOfCentralDirectory {
            total_entries: self.entries.len() as u16,
            cd_size: to_u32(cd_size, "central directory size")?,
            cd_offset,
        }
        .write_to(&mut self.inner)?;

        self.inner.flush()?;
        Ok(self.inner)
    }
}

fn to_u32(value: u64, what: &str) -> Result<u32> {
    u32::try_from(value)
        .with_context(|| format!("{} exceeds 4 GiB (ZIP64 is not supported)", what))
}
