// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — load PDF documents from memory and decode their text streams
// using the `lopdf` crate.
//
// Embedded images are not extracted from PDFs; the image list is always empty.

use einlass_core::error::{EinlassError, ExtractionCause, Result};
use einlass_core::types::{DocumentKind, ExtractedDocument};
use lopdf::Document;
use tracing::{debug, info, instrument};

/// Reads text out of existing PDF files.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Create a reader from raw PDF bytes already in memory.
    ///
    /// Documents that remain encrypted after loading are rejected with
    /// [`ExtractionCause::Encrypted`].
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            let detail = err.to_string();
            let cause = if detail.to_ascii_lowercase().contains("crypt") {
                ExtractionCause::Encrypted
            } else {
                ExtractionCause::Malformed(format!("failed to load PDF: {detail}"))
            };
            EinlassError::Extraction {
                format: DocumentKind::Pdf,
                cause,
            }
        })?;

        if document.is_encrypted() {
            return Err(EinlassError::Extraction {
                format: DocumentKind::Pdf,
                cause: ExtractionCause::Encrypted,
            });
        }

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    // -- Extraction -----------------------------------------------------------

    /// Decode the text of every page, in page order, into one string.
    #[instrument(skip(self))]
    pub fn extract_text(&self) -> Result<String> {
        let mut page_numbers: Vec<u32> = self.document.get_pages().keys().copied().collect();
        page_numbers.sort_unstable();

        if page_numbers.is_empty() {
            return Ok(String::new());
        }

        let text = self.document.extract_text(&page_numbers).map_err(|err| {
            EinlassError::malformed(
                DocumentKind::Pdf,
                format!("failed to decode text streams: {err}"),
            )
        })?;

        info!(pages = page_numbers.len(), chars = text.len(), "PDF text extracted");
        Ok(text)
    }

    /// Full extraction: concatenated text and no images.
    pub fn extract(&self) -> Result<ExtractedDocument> {
        Ok(ExtractedDocument::text_only(self.extract_text()?))
    }
}
