//! Input document model and extracted-text representation.
//!
//! A [`Document`] is raw byte content plus a declared media type. It is
//! created once (from caller-supplied bytes or a local file), consumed once
//! by text extraction, and discarded after the run. Only `application/pdf`
//! is accepted; the media type is validated before any extraction I/O.
//!
//! [`ExtractedText`] holds the per-page text in page order and materialises
//! the single page-delimited blob (`--- Page N ---` markers) that every
//! downstream rule evaluation reuses.

use crate::error::RuleCheckError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The only media type the pipeline accepts.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A binary document awaiting rule evaluation.
#[derive(Debug, Clone)]
pub struct Document {
    /// Raw file content.
    pub bytes: Vec<u8>,
    /// Declared media type, e.g. `application/pdf`.
    pub media_type: String,
}

impl Document {
    /// Create a document from raw bytes with an explicit media type.
    pub fn new(bytes: impl Into<Vec<u8>>, media_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            media_type: media_type.into(),
        }
    }

    /// Create a PDF document from raw bytes.
    pub fn pdf(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(bytes, PDF_MEDIA_TYPE)
    }

    /// Read a PDF document from a local file, validating existence,
    /// readability, and the `%PDF` magic bytes.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RuleCheckError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(RuleCheckError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(RuleCheckError::PermissionDenied {
                    path: path.to_path_buf(),
                });
            }
            Err(_) => {
                return Err(RuleCheckError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
        };

        if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
            let mut magic = [0u8; 4];
            let n = bytes.len().min(4);
            magic[..n].copy_from_slice(&bytes[..n]);
            return Err(RuleCheckError::NotAPdf {
                path: path.to_path_buf(),
                magic,
            });
        }

        Ok(Self::pdf(bytes))
    }

    /// Whether the declared media type is the accepted PDF format.
    pub fn is_pdf(&self) -> bool {
        self.media_type == PDF_MEDIA_TYPE
    }
}

/// Text content of a single page, 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-indexed page number.
    pub number: usize,
    /// Page text with fragments joined by single spaces. May be empty for
    /// pages without extractable text.
    pub text: String,
}

/// Ordered per-page text extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    pages: Vec<PageText>,
}

impl ExtractedText {
    /// Wrap a page-ordered sequence of page texts.
    pub fn new(pages: Vec<PageText>) -> Self {
        Self { pages }
    }

    /// The pages, in page order.
    pub fn pages(&self) -> &[PageText] {
        &self.pages
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Materialise the single delimited blob consumed by rule evaluation.
    ///
    /// Each page contributes `\n--- Page N ---\n<text>\n`, in page order.
    /// Pages with empty text still contribute their header and an empty body.
    pub fn to_delimited(&self) -> String {
        let mut blob = String::with_capacity(
            self.pages.iter().map(|p| p.text.len() + 24).sum::<usize>(),
        );
        for page in &self.pages {
            blob.push_str(&format!("\n--- Page {} ---\n{}\n", page.number, page.text));
        }
        blob
    }
}
