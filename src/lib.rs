//! # harmedia
//!
//! Extract images and videos embedded in HAR capture files.
//!
//! Browsers record response bodies in HAR files as base64 text. Large media
//! responses are usually recorded as a series of HTTP 206 partial responses,
//! so one video is spread over many entries, each covering a byte range. This
//! library finds the media entries, reassembles range fragments in offset
//! order and hands back one [`MediaRecord`] per logical image or video.
//!
//! ## Features
//!
//! - Load captures from the local filesystem or an HTTP/HTTPS URL
//! - Reassemble videos from `Content-Range` fragments
//! - Gallery listings with `data:` URIs for previews
//! - Retrieve single files by name, save everything to a directory, or
//!   bundle everything into a ZIP archive
//!
//! ## Example
//!
//! ```no_run
//! use harmedia::{extract_media, parse_document};
//!
//! fn main() -> anyhow::Result<()> {
//!     let data = std::fs::read("session.har")?;
//!     let document = parse_document(&data)?;
//!
//!     for record in extract_media(&document) {
//!         if let Ok(bytes) = record.decode() {
//!             println!("{} ({}, {} bytes)", record.filename(), record.mime_type, bytes.len());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod cli;
pub mod export;
pub mod extract;
pub mod har;
pub mod io;

pub use cli::Cli;
pub use extract::{decode_payload, extract_media, DecodeError, MediaKind, MediaRecord};
pub use har::{parse_document, CaptureDocument, HarError};
pub use io::{HttpSource, LocalFileSource, Source};
