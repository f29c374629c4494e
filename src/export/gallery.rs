use serde::Serialize;

use crate::extract::MediaRecord;

/// One previewable item in a gallery listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    /// Position among the listed items, starting at 0
    pub id: usize,
    pub url: String,
    pub mime_type: String,
    pub filename: String,
    pub data_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_length: Option<u64>,
}

/// Build the gallery listing: every record that carries a payload, in
/// extraction order.
pub fn gallery(records: &[MediaRecord]) -> Vec<GalleryItem> {
    records
        .iter()
        .filter_map(|record| {
            let data_uri = record.data_uri()?;
            Some((record, data_uri))
        })
        .enumerate()
        .map(|(id, (record, data_uri))| GalleryItem {
            id,
            url: record.source_url.clone(),
            mime_type: record.mime_type.clone(),
            filename: record.filename(),
            data_uri,
            content_length: record.content_length,
        })
        .collect()
}
