mod http;
mod local;

pub use http::HttpSource;
pub use local::LocalFileSource;

use anyhow::Result;
use async_trait::async_trait;

/// Trait for loading a capture document from somewhere
#[async_trait]
pub trait Source: Send + Sync {
    /// Read the complete document
    async fn read_all(&self) -> Result<Vec<u8>>;

    /// Human-readable location, for messages
    fn location(&self) -> &str;
}

/// True if `input` should be fetched over HTTP rather than read from disk
pub fn is_http_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}
