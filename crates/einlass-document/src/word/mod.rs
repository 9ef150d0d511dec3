// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Word extractor — stages the upload on disk, runs the text pass and the
// image pass over the staged file, and releases the staging area on every
// exit path.
//
// If the image pass fails the whole extraction fails, even when the text pass
// succeeded: an empty image list must always mean "no images".

pub mod docx;
pub mod legacy;

use einlass_core::IngestConfig;
use einlass_core::error::{EinlassError, Result};
use einlass_core::types::{DocumentKind, ExtractedDocument};
use tracing::{info, instrument};

use crate::staging::StagingArea;

/// Extracts text and images from `.docx` and legacy `.doc` documents.
#[derive(Debug, Clone)]
pub struct WordExtractor {
    config: IngestConfig,
}

impl WordExtractor {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    /// Extract a Word document of the declared `kind`.
    ///
    /// `kind` must be [`DocumentKind::Word`] or [`DocumentKind::LegacyWord`].
    #[instrument(skip(self, bytes), fields(bytes_len = bytes.len()))]
    pub fn extract(&self, bytes: &[u8], kind: DocumentKind) -> Result<ExtractedDocument> {
        let staging = StagingArea::acquire(&self.config)?;
        let outcome = self.extract_staged(&staging, bytes, kind);
        let released = staging.release();

        let document = outcome?;
        released?;

        info!(
            chars = document.text.len(),
            images = document.images.len(),
            "Word document extracted"
        );
        Ok(document)
    }

    fn extract_staged(
        &self,
        staging: &StagingArea,
        bytes: &[u8],
        kind: DocumentKind,
    ) -> Result<ExtractedDocument> {
        let staged = match kind {
            DocumentKind::LegacyWord => {
                if !legacy::is_compound_file(bytes) {
                    return Err(EinlassError::malformed(
                        kind,
                        "not an OLE2 compound document",
                    ));
                }
                let source = staging.write("input.doc", bytes)?;
                legacy::convert_to_docx(&self.config.legacy_word_converter, staging, &source)?
            }
            _ => staging.write("input.docx", bytes)?,
        };

        let text = docx::read_text(&staged)?;
        let images = docx::read_images(&staged)?;
        Ok(ExtractedDocument { text, images })
    }
}
