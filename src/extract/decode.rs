//! Base64 payload decoding.
//!
//! Reassembled videos are the text concatenation of several independently
//! encoded fragments, so a payload may contain padding in the middle
//! (`QUE=QkI=`). The payload is split after each padding run that is followed
//! by more data and every segment is decoded on its own.

use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

/// Standard alphabet with padding, tolerant of non-zero trailing bits.
pub(crate) const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// A payload that is not valid base64.
#[derive(Debug, thiserror::Error)]
#[error("Invalid base64 payload: {0}")]
pub struct DecodeError(#[from] base64::DecodeError);

/// Decode a base64 payload into raw bytes.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, DecodeError> {
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let mut out = Vec::with_capacity(compact.len() / 4 * 3);
    for segment in padded_segments(&compact) {
        PAYLOAD_ENGINE.decode_vec(segment, &mut out)?;
    }
    Ok(out)
}

/// Split after every `=` run that is followed by a non-`=` character.
fn padded_segments(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;

    for i in 1..bytes.len() {
        if bytes[i - 1] == b'=' && bytes[i] != b'=' {
            segments.push(&text[start..i]);
            start = i;
        }
    }
    segments.push(&text[start..]);
    segments
}
