//! ZIP archive writing.
//!
//! Produces standard PKZIP archives for bundling extracted media:
//!
//! 1. For each member, a Local File Header followed by the member data
//! 2. The Central Directory, one header per member
//! 3. The End of Central Directory record
//!
//! ## Supported Features
//!
//! - STORED and DEFLATE members
//! - CRC-32 and MS-DOS timestamps on every member
//!
//! ## Limitations
//!
//! - No ZIP64: members, offsets and the directory must stay below 4 GiB
//! - No encryption, comments or extra fields

mod structures;
mod writer;

pub use structures::{CompressionMethod, DosDateTime};
pub use writer::ArchiveWriter;
