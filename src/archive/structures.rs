use byteorder::{LittleEndian, WriteBytesExt};
use chrono::{Datelike, NaiveDateTime, Timelike};
use std::io::Write;

use anyhow::Result;

/// ZIP compression methods supported by the writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionMethod {
    #[default]
    Stored,
    Deflate,
}

impl CompressionMethod {
    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
        }
    }
}

/// "Version needed to extract": 2.0 covers DEFLATE
pub const VERSION_NEEDED: u16 = 20;

/// Modification timestamp in MS-DOS format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosDateTime {
    pub time: u16,
    pub date: u16,
}

impl DosDateTime {
    /// Earliest representable timestamp, 1980-01-01 00:00:00
    pub const EPOCH: DosDateTime = DosDateTime {
        time: 0,
        date: (1 << 5) | 1,
    };

    /// Encode a local timestamp. Years outside 1980..=2107 clamp to the
    /// nearest representable year; seconds lose their lowest bit.
    pub fn from_naive(dt: NaiveDateTime) -> Self {
        let year = dt.year().clamp(1980, 2107) as u16;
        let date = ((year - 1980) << 9) | ((dt.month() as u16) << 5) | dt.day() as u16;
        let time = ((dt.hour() as u16) << 11) | ((dt.minute() as u16) << 5) | (dt.second() as u16 / 2);
        Self { time, date }
    }
}

/// Local File Header (LFH) - 30 bytes + file name
pub struct LocalFileHeader<'a> {
    pub compression_method: CompressionMethod,
    pub modified: DosDateTime,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name: &'a str,
}

impl LocalFileHeader<'_> {
    pub const SIGNATURE: &'static [u8] = b"PK\x03\x04";
    pub const SIZE: usize = 30;

    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<usize> {
        out.write_all(Self::SIGNATURE)?;
        out.write_u16::<LittleEndian>(VERSION_NEEDED)?;
        out.write_u16::<LittleEndian>(0)?; // flags
        out.write_u16::<LittleEndian>(self.compression_method.as_u16())?;
        out.write_u16::<LittleEndian>(self.modified.time)?;
        out.write_u16::<LittleEndian>(self.modified.date)?;
        out.write_u32::<LittleEndian>(self.crc32)?;
        out.write_u32::<LittleEndian>(self.compressed_size)?;
        out.write_u32::<LittleEndian>(self.uncompressed_size)?;
        out.write_u16::<LittleEndian>(self.file_name.len() as u16)?;
        out.write_u16::<LittleEndian>(0)?; // extra field length
        out.write_all(self.file_name.as_bytes())?;
        Ok(Self::SIZE + self.file_name.len())
    }
}

/// Central Directory File Header (CDFH) - 46 bytes + file name
#[derive(Debug, Clone)]
pub struct CentralDirectoryHeader {
    pub compression_method: CompressionMethod,
    pub modified: DosDateTime,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub lfh_offset: u32,
    pub file_name: String,
}

impl CentralDirectoryHeader {
    pub const SIGNATURE: &'static [u8] = b"PK\x01\x02";
    pub const SIZE: usize = 46;

    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<usize> {
        out.write_all(Self::SIGNATURE)?;
        out.write_u16::<LittleEndian>(VERSION_NEEDED)?; // version made by
        out.write_u16::<LittleEndian>(VERSION_NEEDED)?;
        out.write_u16::<LittleEndian>(0)?; // flags
        out.write_u16::<LittleEndian>(self.compression_method.as_u16())?;
        out.write_u16::<LittleEndian>(self.modified.time)?;
        out.write_u16::<LittleEndian>(self.modified.date)?;
        out.write_u32::<LittleEndian>(self.crc32)?;
        out.write_u32::<LittleEndian>(self.compressed_size)?;
        out.write_u32::<LittleEndian>(self.uncompressed_size)?;
        out.write_u16::<LittleEndian>(self.file_name.len() as u16)?;
        out.write_u16::<LittleEndian>(0)?; // extra field length
        out.write_u16::<LittleEndian>(0)?; // file comment length
        out.write_u16::<LittleEndian>(0)?; // disk number start
        out.write_u16::<LittleEndian>(0)?; // internal attributes
        out.write_u32::<LittleEndian>(0)?; // external attributes
        out.write_u32::<LittleEndian>(self.lfh_offset)?;
        out.write_all(self.file_name.as_bytes())?;
        Ok(Self::SIZE + self.file_name.len())
    }
}

/// End of Central Directory (EOCD) - 22 bytes, no comment
pub struct EndOfCentralDirectory {
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<usize> {
        out.write_all(Self::SIGNATURE)?;
        out.write_u16::<LittleEndian>(0)?; // disk number
        out.write_u16::<LittleEndian>(0)?; // disk with central directory
        out.write_u16::<LittleEndian>(self.total_entries)?; // entries on this disk
        out.write_u16::<LittleEndian>(self.total_entries)?;
        out.write_u32::<LittleEndian>(self.cd_size)?;
        out.write_u32::<LittleEndian>(self.cd_offset)?;
        out.write_u16::<LittleEndian>(0)?; // comment length
        Ok(Self::SIZE)
    }
}
