use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tokio::task::JoinSet;

use crate::archive::{ArchiveWriter, CompressionMethod, DosDateTime};
use crate::extract::{decode_payload, MediaRecord};

/// Name a record is stored under: `media_<index>.<extension>`, `index`
/// starting at 1.
pub fn archive_name(index: usize, record: &MediaRecord) -> String {
    format!("media_{}.{}", index, record.extension())
}

/// What happened to one record during a directory save
#[derive(Debug)]
pub enum SaveStatus {
    /// Written, with the number of decoded bytes
    Written(u64),
    /// The target file exists and overwriting was not requested
    Exists,
    /// Decoding or writing failed
    Failed(anyhow::Error),
}

/// Result of saving one record
#[derive(Debug)]
pub struct SaveOutcome {
    /// 1-based position among the records that carry a payload
    pub index: usize,
    pub name: String,
    pub path: PathBuf,
    pub status: SaveStatus,
}

/// Decode every record that carries a payload and write it into `dir` as
/// `media_<index>.<ext>`.
///
/// Records without a payload are dropped before numbering, so the written
/// files are numbered without gaps. Records are decoded and written
/// concurrently. Failures are reported per record and never abort the batch;
/// only failing to create `dir` is fatal. Outcomes are returned in
/// extraction order.
pub async fn save_all(records: &[MediaRecord], dir: &Path, overwrite: bool) -> Result<Vec<SaveOutcome>> {
    fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut tasks = JoinSet::new();
    let mut outcomes = Vec::with_capacity(records.len());

    for (i, record) in records.iter().filter(|r| r.has_payload()).enumerate() {
        let index = i + 1;
        let name = archive_name(index, record);
        let path = dir.join(&name);
        let payload = record.payload.clone().unwrap_or_default();

        tasks.spawn(async move {
            let status = write_record(&payload, &path, overwrite).await;
            SaveOutcome {
                index,
                name,
                path,
                status,
            }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        outcomes.push(joined.context("Save task panicked")?);
    }

    outcomes.sort_by_key(|o| o.index);
    Ok(outcomes)
}

async fn write_record(payload: &str, path: &Path, overwrite: bool) -> SaveStatus {
    if !overwrite && fs::try_exists(path).await.unwrap_or(false) {
        return SaveStatus::Exists;
    }

    let data = match decode_payload(payload) {
        Ok(data) => data,
        Err(e) => return SaveStatus::Failed(e.into()),
    };

    match fs::write(path, &data).await {
        Ok(()) => {
            tracing::debug!(path = %path.display(), bytes = data.len(), "wrote media file");
            SaveStatus::Written(data.len() as u64)
        }
        Err(e) => SaveStatus::Failed(
            anyhow::Error::new(e).context(format!("Failed to write {}", path.display())),
        ),
    }
}

/// Summary of a bundled archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Members written
    pub stored: usize,
    /// Records skipped because they had no payload
    pub without_payload: usize,
    /// Records skipped because their payload did not decode
    pub failed: usize,
}

/// Bundle every decodable record into an in-memory ZIP archive.
///
/// Members are named with [`archive_name`] by position in the extraction
/// output; records without payload or with an undecodable payload are
/// skipped but still consume their index.
pub fn build_archive(
    records: &[MediaRecord],
    method: CompressionMethod,
    modified: DosDateTime,
) -> Result<(Vec<u8>, ArchiveSummary)> {
    let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()), method).with_modified(modified);
    let mut summary = ArchiveSummary::default();

    for (i, record) in records.iter().enumerate() {
        let name = archive_name(i + 1, record);

        if !record.has_payload() {
            summary.without_payload += 1;
            continue;
        }

        match record.decode() {
            Ok(data) => {
                writer.add_file(&name, &data)?;
                summary.stored += 1;
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", name, e);
                summary.failed += 1;
            }
        }
    }

    if writer.is_empty() {
        tracing::warn!("No media could be archived; writing an empty archive");
    }

    let buf = writer.finish()?.into_inner();
    Ok((buf, summary))
}
