//! Text extraction: pull per-page text out of a PDF via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto a dedicated
//! thread pool thread so the Tokio workers never stall on CPU-heavy parsing.
//!
//! ## Why a trait seam?
//!
//! The orchestrator consumes [`TextExtractor`], not pdfium directly. Tests
//! substitute a stub extractor to exercise the pipeline without a pdfium
//! binding, and the host can swap in a different backend without touching
//! orchestration.

use crate::document::{Document, ExtractedText, PageText};
use crate::error::RuleCheckError;
use async_trait::async_trait;
use pdfium_render::prelude::*;
use tracing::{debug, info};

/// The document-parsing capability consumed by the orchestrator.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract page-ordered text from the document.
    ///
    /// Fails with an extraction-class [`RuleCheckError`] when the document
    /// cannot be parsed or a page's text cannot be decoded.
    async fn extract(&self, document: &Document) -> Result<ExtractedText, RuleCheckError>;
}

/// [`TextExtractor`] backed by pdfium.
#[derive(Debug, Default)]
pub struct PdfiumExtractor;

#[async_trait]
impl TextExtractor for PdfiumExtractor {
    async fn extract(&self, document: &Document) -> Result<ExtractedText, RuleCheckError> {
        let bytes = document.bytes.clone();

        tokio::task::spawn_blocking(move || extract_blocking(&bytes))
            .await
            .map_err(|e| RuleCheckError::Internal(format!("Extraction task panicked: {e}")))?
    }
}

/// Blocking implementation of page-text extraction.
fn extract_blocking(bytes: &[u8]) -> Result<ExtractedText, RuleCheckError> {
    let pdfium = Pdfium::default();

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| RuleCheckError::ExtractionFailed {
            detail: format!("{e:?}"),
        })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let mut out = Vec::with_capacity(total_pages);

    for (index, page) in pages.iter().enumerate() {
        let page_num = index + 1;

        let text = page.text().map_err(|e| RuleCheckError::PageTextFailed {
            page: page_num,
            detail: format!("{e:?}"),
        })?;

        // Join text fragments with single spaces, mirroring how a reader
        // would flow the page's runs together. Empty pages contribute an
        // empty body under their header.
        let joined = text
            .segments()
            .iter()
            .map(|segment| segment.text())
            .collect::<Vec<_>>()
            .join(" ");

        debug!("Extracted page {} → {} chars", page_num, joined.chars().count());

        out.push(PageText {
            number: page_num,
            text: joined,
        });
    }

    Ok(ExtractedText::new(out))
}
