use async_trait::async_trait;
use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::Source;
use anyhow::{bail, Result};

/// Capture document served over HTTP(S)
pub struct HttpSource {
    client: Client,
    url: String,
    transferred_bytes: AtomicU64,
    max_retry: u32,
}

impl HttpSource {
    pub fn new(url: String) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            url,
            transferred_bytes: AtomicU64::new(0),
            max_retry: 10,
        })
    }

    /// Get total bytes transferred from network
    pub fn transferred_bytes(&self) -> u64 {
        self.transferred_bytes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Source for HttpSource {
    async fn read_all(&self) -> Result<Vec<u8>> {
        let mut retry_count = 0;

        loop {
            match self.client.get(&self.url).send().await {
                Ok(resp) => {
                    if !resp.status().is_success() {
                        bail!("HTTP request failed with status: {}", resp.status());
                    }

                    let bytes = resp.bytes().await?;
                    self.transferred_bytes
                        .fetch_add(bytes.len() as u64, Ordering::Relaxed);
                    tracing::debug!(url = %self.url, bytes = bytes.len(), "downloaded capture");
                    return Ok(bytes.to_vec());
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    retry_count += 1;
                    if retry_count >= self.max_retry {
                        bail!("Max retries exceeded");
                    }
                    tracing::warn!(
                        "Connection error, retry {}/{}: {}",
                        retry_count,
                        self.max_retry,
                        e
                    );
                    tokio::time::sleep(Duration::from_millis(500 * retry_count as u64)).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn location(&self) -> &str {
        &self.url
    }
}
