//! Media extraction engine.
//!
//! Turns a parsed [`CaptureDocument`](crate::har::CaptureDocument) into an
//! ordered list of [`MediaRecord`]s: one per image, and one per video
//! reassembled from its HTTP 206 byte-range fragments.
//!
//! ## Components
//!
//! - [`record`]: fragment and record types, filename derivation
//! - [`engine`]: classification, grouping, ordering and concatenation
//! - [`decode`]: base64 payload decoding for consumers of the records
//!
//! The engine is a pure function. It performs no I/O, keeps no state between
//! calls and never logs, so the same capture always yields the same records.
//!
//! ## Known limitations
//!
//! - Video fragments are grouped by filename only, so distinct resources that
//!   share a final path segment are merged
//! - Fragments without a usable `Content-Range` sort as offset 0
//! - Base64 text is concatenated as-is; padding from intermediate fragments
//!   is handled at decode time, not realigned

mod decode;
mod engine;
mod record;

pub use decode::{decode_payload, DecodeError};
pub use engine::{extract_media, fragment_from_entry, parse_range_start};
pub use record::{derive_filename, MediaFragment, MediaKind, MediaRecord};

use crate::har::{parse_document, HarError};

/// Parse capture JSON and extract its media in one step.
pub fn extract_from_slice(data: &[u8]) -> Result<Vec<MediaRecord>, HarError> {
    let document = parse_document(data)?;
    Ok(extract_media(&document))
}
