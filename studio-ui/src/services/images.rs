//! Product image downloader
//!
//! Downloads run with bounded concurrency and come back in URL order.
//! Failed downloads are logged and skipped.

use futures::stream::{self, StreamExt};

/// A downloaded image held in memory
#[derive(Debug, Clone)]
pub struct DownloadedImage {
    /// 1-based position of the URL in the product's list
    pub position: usize,
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

impl DownloadedImage {
    /// File name inside the export folder, e.g. `img_03.png`
    pub fn file_name(&self) -> String {
        format!("img_{:02}{}", self.position, self.extension)
    }
}

/// File extension guessed from a `content-type` header; later rules win
pub fn extension_for(content_type: &str) -> &'static str {
    let content_type = content_type.to_lowercase();
    let mut ext = ".jpg";
    if content_type.contains("png") {
        ext = ".png";
    }
    if content_type.contains("webp") {
        ext = ".webp";
    }
    if content_type.contains("jpeg") || content_type.contains("jpg") {
        ext = ".jpg";
    }
    ext
}

pub struct ImageDownloader {
    http: reqwest::Client,
    concurrency: usize,
}

impl ImageDownloader {
    pub fn new(http: reqwest::Client, concurrency: usize) -> Self {
        Self {
            http,
            concurrency: concurrency.max(1),
        }
    }

    /// Download every URL; failures are skipped.
    ///
    /// Each future owns its client handle and URL so the stream stays `Send`
    /// inside axum handlers.
    pub async fn download_all(&self, urls: &[String]) -> Vec<DownloadedImage> {
        let http = self.http.clone();
        stream::iter(urls.to_vec().into_iter().enumerate())
            .map(move |(i, url)| {
                let http = http.clone();
                async move {
                    match download_one(&http, &url).await {
                        Ok((content_type, bytes)) => {
                            tracing::debug!(url = %url, bytes = bytes.len(), "Downloaded image");
                            Some(DownloadedImage {
                                position: i + 1,
                                extension: extension_for(&content_type),
                                bytes,
                            })
                        }
                        Err(e) => {
                            tracing::warn!(url = %url, "Skipping image: {}", e);
                            None
                        }
                    }
                }
            })
            .buffered(self.concurrency)
            .filter_map(|image| async move { image })
            .collect()
            .await
    }
}

async fn download_one(
    http: &reqwest::Client,
    url: &str,
) -> Result<(String, Vec<u8>), reqwest::Error> {
    let response = http.get(url).send().await?.error_for_status()?;
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let bytes = response.bytes().await?;
    Ok((content_type, bytes.to_vec()))
}
