// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain text extractor.

use einlass_core::types::ExtractedDocument;
use tracing::{debug, instrument};

/// Decodes a buffer as UTF-8 text.
///
/// Invalid byte sequences are replaced with U+FFFD rather than rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

impl TextExtractor {
    #[instrument(skip_all, fields(bytes_len = bytes.len()))]
    pub fn extract(&self, bytes: &[u8]) -> ExtractedDocument {
        let text = String::from_utf8_lossy(bytes).into_owned();
        debug!(chars = text.chars().count(), "Plain text decoded");
        ExtractedDocument::text_only(text)
    }
}
