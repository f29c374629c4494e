use super::Source;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// Capture document on the local filesystem
pub struct LocalFileSource {
    path: PathBuf,
    display: String,
}

impl LocalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display = path.display().to_string();
        Self { path, display }
    }
}

#[async_trait]
impl Source for LocalFileSource {
    async fn read_all(&self) -> Result<Vec<u8>> {
        let data = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.display))?;
        tracing::debug!(path = %self.display, bytes = data.len(), "read capture file");
        Ok(data)
    }

    fn location(&self) -> &str {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_reports_path() {
        let source = LocalFileSource::new("/definitely/not/here.har");
        let err = source.read_all().await.unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.har"));
    }
}
