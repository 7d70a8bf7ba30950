//! Input resolution: normalise a user-supplied path or URL to a [`Document`].
//!
//! Local paths are read and magic-byte validated by
//! [`Document::from_path`]; URLs are downloaded straight into memory with a
//! bounded timeout and validated the same way, so callers get a meaningful
//! error rather than a pdfium parse failure on garbage bytes.

use crate::document::Document;
use crate::error::RuleCheckError;
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to a [`Document`].
///
/// If the input is a URL, download it; if a local file, read and validate it.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<Document, RuleCheckError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        let doc = Document::from_path(input)?;
        debug!("Resolved local PDF: {} ({} bytes)", input, doc.bytes.len());
        Ok(doc)
    }
}

/// Download a URL into memory and validate the PDF magic bytes.
async fn download_url(url: &str, timeout_secs: u64) -> Result<Document, RuleCheckError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| RuleCheckError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            RuleCheckError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            RuleCheckError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(RuleCheckError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| RuleCheckError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(RuleCheckError::NotAPdf {
            path: std::path::PathBuf::from(url),
            magic,
        });
    }

    info!("Downloaded {} bytes", bytes.len());
    Ok(Document::pdf(bytes.to_vec()))
}
