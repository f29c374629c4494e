//! Capture document parsing.
//!
//! Only the outer shape of the document is validated: a JSON object with a
//! `log` object holding an `entries` array. Individual entries are parsed
//! leniently, so a broken entry degrades to an empty one and is later ignored
//! by the extraction engine instead of failing the whole document.

use serde_json::Value;

use super::structures::{CaptureDocument, Entry};

/// Structural errors in a capture document.
///
/// These are fatal for the document as a whole, unlike per-entry problems
/// which are tolerated silently.
#[derive(Debug, thiserror::Error)]
pub enum HarError {
    #[error("Capture document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Capture document has no `log` object")]
    MissingLog,

    #[error("Capture document has no `log.entries` array")]
    MissingEntries,
}

/// Parse a capture document from raw JSON bytes.
pub fn parse_document(data: &[u8]) -> Result<CaptureDocument, HarError> {
    let value: Value = serde_json::from_slice(data)?;
    from_value(value)
}

/// Build a capture document from an already-decoded JSON value.
pub fn from_value(value: Value) -> Result<CaptureDocument, HarError> {
    let Value::Object(mut root) = value else {
        return Err(HarError::MissingLog);
    };

    let Some(Value::Object(mut log)) = root.remove("log") else {
        return Err(HarError::MissingLog);
    };

    let Some(Value::Array(raw_entries)) = log.remove("entries") else {
        return Err(HarError::MissingEntries);
    };

    let entries = raw_entries
        .into_iter()
        .map(|raw| serde_json::from_value::<Entry>(raw).unwrap_or_default())
        .collect();

    Ok(CaptureDocument::new(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entries_in_order() {
        let json = br#"{
            "log": {
                "version": "1.2",
                "entries": [
                    {
                        "request": { "method": "GET", "url": "https://a.test/one.png" },
                        "response": {
                            "status": 200,
                            "headers": [{ "name": "Content-Length", "value": "4" }],
                            "content": { "size": 4, "mimeType": "image/png", "encoding": "base64", "text": "AAAA" }
                        }
                    },
                    {
                        "request": { "url": "https://a.test/two.css" },
                        "response": { "content": { "mimeType": "text/css", "text": "body{}" } }
                    }
                ]
            }
        }"#;

        let doc = parse_document(json).unwrap();
        assert_eq!(doc.len(), 2);

        let first = &doc.entries()[0];
        assert_eq!(first.url(), "https://a.test/one.png");
        assert_eq!(first.mime_type(), "image/png");
        assert_eq!(first.base64_body(), Some("AAAA"));
        assert_eq!(first.header("content-length"), Some("4"));

        let second = &doc.entries()[1];
        assert_eq!(second.mime_type(), "text/css");
        assert_eq!(second.encoding(), None);
        assert_eq!(second.base64_body(), None);
    }

    #[test]
    fn tolerates_missing_and_mistyped_fields() {
        let json = br#"{
            "log": {
                "entries": [
                    {},
                    "not an entry",
                    { "request": 42, "response": { "content": { "mimeType": null } } },
                    { "response": { "headers": [{ "name": "content-range", "value": 7 }] } }
                ]
            }
        }"#;

        let doc = parse_document(json).unwrap();
        assert_eq!(doc.len(), 4);
        for entry in doc.entries() {
            assert_eq!(entry.url(), "");
            assert_eq!(entry.mime_type(), "");
        }
        assert_eq!(doc.entries()[3].header("Content-Range"), Some("7"));
    }

    #[test]
    fn empty_entries_is_valid() {
        let doc = parse_document(br#"{"log":{"entries":[]}}"#).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(parse_document(b"{not json"), Err(HarError::Json(_))));
    }

    #[test]
    fn rejects_missing_log() {
        assert!(matches!(
            parse_document(br#"{"entries":[]}"#),
            Err(HarError::MissingLog)
        ));
        assert!(matches!(parse_document(b"[]"), Err(HarError::MissingLog)));
    }

    #[test]
    fn rejects_missing_or_mistyped_entries() {
        assert!(matches!(
            parse_document(br#"{"log":{}}"#),
            Err(HarError::MissingEntries)
        ));
        assert!(matches!(
            parse_document(br#"{"log":{"entries":"oops"}}"#),
            Err(HarError::MissingEntries)
        ));
    }
}
