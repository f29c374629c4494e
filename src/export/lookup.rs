use crate::extract::{DecodeError, MediaRecord};

/// Why a single-file retrieval produced no bytes
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("No media named '{0}'")]
    NotFound(String),

    #[error("Media '{0}' has no embedded payload")]
    NoPayload(String),

    #[error("Failed to decode '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: DecodeError,
    },
}

/// Decoded contents of one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retrieved {
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Find the first record whose derived filename matches `requested`,
/// ignoring case and surrounding whitespace, and decode it.
///
/// Only the first match is considered: if it has no payload or fails to
/// decode, later records with the same name are not tried.
pub fn find_by_filename(records: &[MediaRecord], requested: &str) -> Result<Retrieved, LookupError> {
    let wanted = requested.trim().to_lowercase();

    let (record, filename) = records
        .iter()
        .map(|r| (r, r.filename()))
        .find(|(_, name)| name.trim().to_lowercase() == wanted)
        .ok_or_else(|| LookupError::NotFound(requested.to_string()))?;

    if !record.has_payload() {
        return Err(LookupError::NoPayload(filename));
    }

    let data = record.decode().map_err(|source| LookupError::Decode {
        name: filename.clone(),
        source,
    })?;

    Ok(Retrieved {
        filename,
        mime_type: record.mime_type.clone(),
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::MediaKind;

    fn records() -> Vec<MediaRecord> {
        let mut broken = MediaRecord::from_bytes(MediaKind::Image, "https://a.test/bad.png", "image/png", b"");
        broken.payload = Some("%%%".to_string());
        let mut empty = MediaRecord::from_bytes(MediaKind::Image, "https://a.test/empty.png", "image/png", b"");
        empty.payload = None;

        vec![
            MediaRecord::from_bytes(MediaKind::Image, "https://a.test/x/Photo.JPG?w=1", "image/jpeg", b"jpeg"),
            broken,
            empty,
            MediaRecord::from_bytes(MediaKind::Image, "https://b.test/photo.jpg", "image/jpeg", b"other"),
        ]
    }

    #[test]
    fn matches_case_insensitively_first_wins() {
        let found = find_by_filename(&records(), "  photo.jpg ").unwrap();
        assert_eq!(found.filename, "Photo.JPG");
        assert_eq!(found.mime_type, "image/jpeg");
        assert_eq!(found.data, b"jpeg");
    }

    #[test]
    fn reports_missing_names() {
        assert!(matches!(
            find_by_filename(&records(), "nope.png"),
            Err(LookupError::NotFound(name)) if name == "nope.png"
        ));
    }

    #[test]
    fn reports_records_without_payload() {
        assert!(matches!(
            find_by_filename(&records(), "EMPTY.png"),
            Err(LookupError::NoPayload(_))
        ));
    }

    #[test]
    fn reports_decode_failures() {
        assert!(matches!(
            find_by_filename(&records(), "bad.png"),
            Err(LookupError::Decode { .. })
        ));
    }
}
