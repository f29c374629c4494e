//! Media extraction and byte-range reassembly.
//!
//! ## Algorithm
//!
//! 1. Walk the capture entries in document order
//! 2. Keep entries whose mime type is `image/*` or `video/*`
//! 3. Images become one record each, as encountered
//! 4. Video fragments are grouped by the final path segment of their URL,
//!    stable-sorted by the start offset of their `Content-Range`, and their
//!    base64 text is concatenated into one record per group
//!
//! Malformed metadata never fails extraction: a missing or unparseable
//! `Content-Range` counts as offset 0 and a bad `Content-Length` is dropped.

use std::collections::HashMap;

use crate::har::{CaptureDocument, Entry};

use super::record::{derive_filename, MediaFragment, MediaKind, MediaRecord};

/// Extract every media record from a capture document.
///
/// Image records come first in entry order, followed by one reassembled
/// record per video group in order of each group's first fragment.
pub fn extract_media(document: &CaptureDocument) -> Vec<MediaRecord> {
    let mut records = Vec::new();
    let mut groups: Vec<Vec<MediaFragment>> = Vec::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();

    for entry in document.entries() {
        let Some(fragment) = fragment_from_entry(entry) else {
            continue;
        };

        match fragment.kind {
            MediaKind::Image => records.push(MediaRecord::from(fragment)),
            MediaKind::Video => {
                let key = derive_filename(&fragment.source_url);
                let slot = *group_index.entry(key).or_insert_with(|| {
                    groups.push(Vec::new());
                    groups.len() - 1
                });
                groups[slot].push(fragment);
            }
        }
    }

    records.extend(groups.into_iter().filter_map(reassemble));
    records
}

/// Turn a capture entry into a media fragment, if it is media at all.
pub fn fragment_from_entry(entry: &Entry) -> Option<MediaFragment> {
    let kind = MediaKind::classify(entry.mime_type())?;

    let start_byte = match kind {
        MediaKind::Video => entry.header("content-range").map_or(0, parse_range_start),
        MediaKind::Image => 0,
    };

    Some(MediaFragment {
        kind,
        source_url: entry.url().to_string(),
        mime_type: entry.mime_type().to_string(),
        payload: entry.base64_body().map(str::to_string),
        content_length: entry.header("content-length").and_then(parse_content_length),
        start_byte,
    })
}

/// Combine the fragments of one video group into a single record.
///
/// Returns `None` when no fragment contributes any payload text.
fn reassemble(mut fragments: Vec<MediaFragment>) -> Option<MediaRecord> {
    // sort_by_key is stable, so equal offsets keep capture order
    fragments.sort_by_key(|f| f.start_byte);

    let payload: String = fragments
        .iter()
        .filter_map(|f| f.payload.as_deref())
        .collect();

    if payload.is_empty() {
        return None;
    }

    let first = fragments.into_iter().next()?;
    Some(MediaRecord {
        kind: first.kind,
        source_url: first.source_url,
        mime_type: first.mime_type,
        payload: Some(payload),
        content_length: None,
    })
}

/// Start offset of a `Content-Range` value (`bytes <start>-<end>/<total>`).
///
/// Anything that does not parse counts as 0.
pub fn parse_range_start(value: &str) -> u64 {
    value
        .split(' ')
        .nth(1)
        .and_then(|range| range.split('-').next())
        .and_then(|start| start.trim().parse().ok())
        .unwrap_or(0)
}

fn parse_content_length(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(url: &str, range: Option<&str>, payload: Option<&str>) -> Entry {
        let mut entry = Entry::new(url, "video/mp4");
        if let Some(range) = range {
            entry = entry.with_header("Content-Range", range);
        }
        if let Some(payload) = payload {
            entry = entry.with_base64_body(payload);
        }
        entry
    }

    fn payloads(records: &[MediaRecord]) -> Vec<Option<&str>> {
        records.iter().map(|r| r.payload.as_deref()).collect()
    }

    #[test]
    fn image_and_reordered_video_fragments() {
        let doc = CaptureDocument::new(vec![
            Entry::new("https://a.test/img/logo.png", "image/png").with_base64_body("iVBORw0KGgo="),
            video("https://a.test/video/clip.mp4", Some("bytes 10-19/20"), Some("QkI=")),
            video("https://a.test/video/clip.mp4", Some("bytes 0-9/20"), Some("QUE=")),
        ]);

        let records = extract_media(&doc);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].kind, MediaKind::Image);
        assert_eq!(records[0].payload.as_deref(), Some("iVBORw0KGgo="));

        assert_eq!(records[1].kind, MediaKind::Video);
        assert_eq!(records[1].payload.as_deref(), Some("QUE=QkI="));
        assert_eq!(records[1].mime_type, "video/mp4");
        assert_eq!(records[1].content_length, None);
        assert_eq!(records[1].decode().unwrap(), b"AABB");
    }

    #[test]
    fn non_media_entries_are_ignored() {
        let doc = CaptureDocument::new(vec![
            Entry::new("https://a.test/index.html", "text/html").with_base64_body("PGh0bWw+"),
            Entry::new("https://a.test/app.js", "application/javascript"),
            Entry::new("https://a.test/blank", ""),
        ]);
        assert!(extract_media(&doc).is_empty());
    }

    #[test]
    fn fragments_sorted_by_start_byte_regardless_of_entry_order() {
        let doc = CaptureDocument::new(vec![
            video("https://a.test/v.mp4", Some("bytes 50-99/150"), Some("B")),
            video("https://a.test/v.mp4", Some("bytes 0-49/150"), Some("A")),
            video("https://a.test/v.mp4", Some("bytes 100-149/150"), Some("C")),
        ]);

        let records = extract_media(&doc);
        assert_eq!(payloads(&records), vec![Some("ABC")]);
        // URL of the lowest offset fragment wins
        assert_eq!(records[0].source_url, "https://a.test/v.mp4");
    }

    #[test]
    fn distinct_keys_never_merge() {
        let doc = CaptureDocument::new(vec![
            video("https://a.test/one.mp4", Some("bytes 0-1/2"), Some("AA")),
            video("https://a.test/two.mp4", Some("bytes 0-1/2"), Some("BB")),
            video("https://a.test/one.mp4", Some("bytes 2-3/4"), Some("CC")),
        ]);

        let records = extract_media(&doc);
        assert_eq!(payloads(&records), vec![Some("AACC"), Some("BB")]);
    }

    #[test]
    fn same_filename_under_different_paths_merges() {
        let doc = CaptureDocument::new(vec![
            video("https://a.test/x/seg.mp4?q=1", Some("bytes 4-7/8"), Some("2")),
            video("https://b.test/y/seg.mp4?q=2", Some("bytes 0-3/8"), Some("1")),
        ]);

        let records = extract_media(&doc);
        assert_eq!(payloads(&records), vec![Some("12")]);
        assert_eq!(records[0].source_url, "https://b.test/y/seg.mp4?q=2");
    }

    #[test]
    fn fragments_differing_only_in_path_params_merge() {
        let doc = CaptureDocument::new(vec![
            video("https://a.test/v/clip.mp4;sid=2?range=2", Some("bytes 2-3/4"), Some("QkI=")),
            video("https://a.test/v/clip.mp4;sid=1?range=1", Some("bytes 0-1/4"), Some("QUE=")),
        ]);

        let records = extract_media(&doc);
        assert_eq!(payloads(&records), vec![Some("QUE=QkI=")]);
        assert_eq!(records[0].filename(), "clip.mp4");
    }

    #[test]
    fn missing_range_defaults_to_zero_and_keeps_capture_order() {
        let doc = CaptureDocument::new(vec![
            video("https://a.test/v.mp4", Some("bytes 5-9/10"), Some("Z")),
            video("https://a.test/v.mp4", None, Some("X")),
            video("https://a.test/v.mp4", Some("garbage"), Some("Y")),
            video("https://a.test/v.mp4", Some("bytes 0-4/10"), Some("W")),
        ]);

        assert_eq!(payloads(&extract_media(&doc)), vec![Some("XYWZ")]);
    }

    #[test]
    fn fragments_without_payload_are_skipped() {
        let doc = CaptureDocument::new(vec![
            video("https://a.test/v.mp4", Some("bytes 0-1/6"), Some("AA")),
            video("https://a.test/v.mp4", Some("bytes 2-3/6"), None),
            video("https://a.test/v.mp4", Some("bytes 4-5/6"), Some("CC")),
        ]);

        assert_eq!(payloads(&extract_media(&doc)), vec![Some("AACC")]);
    }

    #[test]
    fn first_fragment_metadata_is_kept_even_without_payload() {
        let doc = CaptureDocument::new(vec![
            video("https://a.test/late/v.mp4", Some("bytes 2-3/4"), Some("BB")),
            Entry::new("https://a.test/early/v.mp4", "video/webm")
                .with_header("content-range", "bytes 0-1/4"),
        ]);

        let records = extract_media(&doc);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_url, "https://a.test/early/v.mp4");
        assert_eq!(records[0].mime_type, "video/webm");
        assert_eq!(records[0].payload.as_deref(), Some("BB"));
    }

    #[test]
    fn all_empty_video_group_emits_nothing() {
        let doc = CaptureDocument::new(vec![
            video("https://a.test/v.mp4", Some("bytes 0-1/4"), None),
            video("https://a.test/v.mp4", Some("bytes 2-3/4"), Some("")),
        ]);
        assert!(extract_media(&doc).is_empty());
    }

    #[test]
    fn non_base64_encoding_contributes_no_payload() {
        let doc = CaptureDocument::new(vec![
            Entry::new("https://a.test/p.png", "image/png").with_body(None, "iVBORw0KGgo="),
            Entry::new("https://a.test/q.png", "image/png").with_body(Some("utf-8"), "iVBORw0KGgo="),
            Entry::new("https://a.test/r.png", "image/png").with_body(Some("BASE64"), "iVBORw0KGgo="),
            video("https://a.test/v.mp4", None, None).with_body(Some("gzip"), "QUE="),
        ]);

        let records = extract_media(&doc);
        // Images survive structurally, the video group has nothing to emit
        assert_eq!(payloads(&records), vec![None, None, None]);
        assert!(records.iter().all(|r| r.kind == MediaKind::Image));
    }

    #[test]
    fn images_keep_declared_content_length() {
        let doc = CaptureDocument::new(vec![
            Entry::new("https://a.test/a.png", "image/png")
                .with_header("Content-Length", "1234")
                .with_header("content-length", "99"),
            Entry::new("https://a.test/b.png", "image/png").with_header("CONTENT-LENGTH", "n/a"),
            Entry::new("https://a.test/c.png", "image/png"),
        ]);

        let lengths: Vec<_> = extract_media(&doc).iter().map(|r| r.content_length).collect();
        assert_eq!(lengths, vec![Some(1234), None, None]);
    }

    #[test]
    fn images_precede_videos() {
        let doc = CaptureDocument::new(vec![
            video("https://a.test/v.mp4", None, Some("VV")),
            Entry::new("https://a.test/a.png", "image/png").with_base64_body("AA"),
            Entry::new("https://a.test/b.gif", "image/gif").with_base64_body("BB"),
        ]);

        let records = extract_media(&doc);
        let kinds: Vec<_> = records.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![MediaKind::Image, MediaKind::Image, MediaKind::Video]);
        assert_eq!(payloads(&records), vec![Some("AA"), Some("BB"), Some("VV")]);
    }

    #[test]
    fn range_start_parsing() {
        assert_eq!(parse_range_start("bytes 0-99/100"), 0);
        assert_eq!(parse_range_start("bytes 1048576-2097151/5000000"), 1048576);
        assert_eq!(parse_range_start("bytes 7-/100"), 7);
        assert_eq!(parse_range_start("bytes */100"), 0);
        assert_eq!(parse_range_start("bytes"), 0);
        assert_eq!(parse_range_start(""), 0);
        assert_eq!(parse_range_start("bytes  5-9/10"), 0);
    }
}
