use base64::Engine as _;
use url::Url;

use super::decode::{decode_payload, DecodeError, PAYLOAD_ENGINE};

/// Broad media class, decided by mime type prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a mime type. Anything that is not `image/*` or `video/*`
    /// is not media.
    pub fn classify(mime_type: &str) -> Option<Self> {
        if mime_type.starts_with("image/") {
            Some(MediaKind::Image)
        } else if mime_type.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

/// A candidate piece of media taken from one capture entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFragment {
    pub kind: MediaKind,
    pub source_url: String,
    pub mime_type: String,
    pub payload: Option<String>,
    pub content_length: Option<u64>,
    /// Offset of this fragment within the full resource. Always 0 for images.
    pub start_byte: u64,
}

/// One logical media item: a single image, or a video reassembled from all
/// of its byte-range fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRecord {
    pub kind: MediaKind,
    pub source_url: String,
    pub mime_type: String,
    /// Base64 text. `None` when the capture did not embed the body.
    pub payload: Option<String>,
    /// Declared `Content-Length`, only carried for images.
    pub content_length: Option<u64>,
}

impl MediaRecord {
    /// True if the record carries a non-empty payload.
    pub fn has_payload(&self) -> bool {
        self.payload.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Final path segment of the source URL.
    pub fn filename(&self) -> String {
        derive_filename(&self.source_url)
    }

    /// Mime subtype used as a file extension (`video/mp4; codecs=x` → `mp4`).
    pub fn extension(&self) -> &str {
        let subtype = self.mime_type.rsplit('/').next().unwrap_or_default();
        subtype.split(';').next().unwrap_or_default().trim()
    }

    /// Decode the payload to raw bytes.
    ///
    /// A record without a payload decodes to an empty buffer; callers are
    /// expected to check [`has_payload`](Self::has_payload) first.
    pub fn decode(&self) -> Result<Vec<u8>, DecodeError> {
        decode_payload(self.payload.as_deref().unwrap_or_default())
    }

    /// `data:` URI suitable for inline previews.
    pub fn data_uri(&self) -> Option<String> {
        self.payload
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("data:{};base64,{}", self.mime_type, p))
    }

    /// Build a record from raw bytes, encoding them the way a capture would.
    pub fn from_bytes(
        kind: MediaKind,
        source_url: impl Into<String>,
        mime_type: impl Into<String>,
        data: &[u8],
    ) -> Self {
        Self {
            kind,
            source_url: source_url.into(),
            mime_type: mime_type.into(),
            payload: Some(PAYLOAD_ENGINE.encode(data)),
            content_length: Some(data.len() as u64),
        }
    }
}

impl From<MediaFragment> for MediaRecord {
    fn from(fragment: MediaFragment) -> Self {
        Self {
            kind: fragment.kind,
            source_url: fragment.source_url,
            mime_type: fragment.mime_type,
            payload: fragment.payload,
            content_length: fragment.content_length,
        }
    }
}

/// Final path segment of a URL, ignoring query, fragment and `;params`.
///
/// `https://cdn.test/video/clip.mp4;sid=1?x=1` → `clip.mp4`. A path ending
/// in `/` yields an empty name.
pub fn derive_filename(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        // Relative or otherwise unparseable: strip query and fragment by hand
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let segment = path.rsplit('/').next().unwrap_or_default();
    segment.split(';').next().unwrap_or_default().to_string()
}
