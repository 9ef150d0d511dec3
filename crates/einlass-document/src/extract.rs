// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document extraction entry point — classify the declared media type, then
// hand the bytes to the one extractor for that format.
//
// Every extractor runs behind `catch_unwind`, so a parser that panics on
// hostile input is reported as an internal extraction fault instead of
// taking the worker down.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use einlass_core::IngestConfig;
use einlass_core::error::{EinlassError, ExtractionCause, Result};
use einlass_core::types::{DocumentKind, ExtractedDocument, MediaBlob};
use tracing::{instrument, warn};

use crate::classify::classify_document;
use crate::pdf::PdfReader;
use crate::sheet::SheetExtractor;
use crate::text::TextExtractor;
use crate::word::WordExtractor;

/// Dispatches a [`MediaBlob`] to the extractor for its declared format.
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    word: WordExtractor,
}

impl DocumentExtractor {
    pub fn new(config: IngestConfig) -> Self {
        Self {
            word: WordExtractor::new(config),
        }
    }

    /// Extract text and embedded images from `blob`.
    ///
    /// Unsupported media types fail with [`EinlassError::UnsupportedFormat`]
    /// before any byte of the blob is inspected.
    #[instrument(
        skip(self, blob),
        fields(file = %blob.file_name(), media_type = %blob.media_type(), bytes_len = blob.len())
    )]
    pub fn extract(&self, blob: &MediaBlob) -> Result<ExtractedDocument> {
        let kind = classify_document(blob.media_type())?;
        guarded(kind, || self.extract_kind(kind, blob.bytes()))
    }

    fn extract_kind(&self, kind: DocumentKind, bytes: &[u8]) -> Result<ExtractedDocument> {
        match kind {
            DocumentKind::Pdf => PdfReader::from_bytes(bytes)?.extract(),
            DocumentKind::Word | DocumentKind::LegacyWord => self.word.extract(bytes, kind),
            DocumentKind::Excel | DocumentKind::LegacyExcel => SheetExtractor.extract(bytes, kind),
            DocumentKind::PlainText => Ok(TextExtractor.extract(bytes)),
        }
    }
}

/// Run `f`, turning a panic into an `Internal` extraction error for `kind`.
fn guarded<F>(kind: DocumentKind, f: F) -> Result<ExtractedDocument>
where
    F: FnOnce() -> Result<ExtractedDocument>,
{
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let detail = panic_message(payload.as_ref());
        warn!(format = %kind, detail = %detail, "Extractor panicked");
        Err(EinlassError::Extraction {
            format: kind,
            cause: ExtractionCause::Internal(detail),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "parser panicked".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, Cell};

    fn extractor() -> DocumentExtractor {
        DocumentExtractor::new(IngestConfig::default())
    }

    #[test]
    fn unsupported_type_is_rejected_before_parsing() {
        let blob = MediaBlob::new(b"%PDF-1.7 whatever".to_vec(), "video/mp4", "clip.mp4");
        assert!(matches!(
            extractor().extract(&blob),
            Err(EinlassError::UnsupportedFormat(t)) if t == "video/mp4"
        ));
    }

    #[test]
    fn images_are_not_documents() {
        let blob = MediaBlob::new(fixtures::png(2, 2), "image/png", "a.png");
        assert!(matches!(
            extractor().extract(&blob),
            Err(EinlassError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn every_supported_family_extracts() {
        let cases = [
            MediaBlob::new(
                fixtures::pdf_with_pages(&["Hello PDF"]),
                "application/pdf",
                "a.pdf",
            ),
            MediaBlob::new(
                fixtures::docx_text_only(&["Hello Word"]),
                DocumentKind::Word.mime_type(),
                "a.docx",
            ),
            MediaBlob::new(
                fixtures::xlsx(&[("Only", vec![vec![Cell::Text("Hello Excel")]])]),
                DocumentKind::Excel.mime_type(),
                "a.xlsx",
            ),
            MediaBlob::new(b"Hello text".to_vec(), "text/plain; charset=utf-8", "a.txt"),
        ];

        for blob in &cases {
            let doc = extractor()
                .extract(blob)
                .unwrap_or_else(|err| panic!("{}: {err}", blob.file_name()));
            assert!(doc.text.contains("Hello"), "{}: {:?}", blob.file_name(), doc.text);
        }
    }

    #[test]
    fn xlsx_declared_as_legacy_excel_still_loads() {
        let blob = MediaBlob::new(
            fixtures::xlsx(&[("S", vec![vec![Cell::Number(3.0)]])]),
            "application/vnd.ms-excel",
            "old-name.xls",
        );
        assert_eq!(extractor().extract(&blob).unwrap().text, "S\n3\n\n");
    }

    #[test]
    fn word_images_follow_document_order() {
        let root = tempfile::tempdir().unwrap();
        let extractor = DocumentExtractor::new(IngestConfig {
            staging_root: Some(root.path().to_path_buf()),
            ..IngestConfig::default()
        });
        let blob = MediaBlob::new(
            fixtures::docx_with_images(),
            DocumentKind::Word.mime_type(),
            "report.docx",
        );

        let doc = extractor.extract(&blob).unwrap();
        let types: Vec<_> = doc.images.iter().map(|i| i.content_type.as_str()).collect();
        assert_eq!(types, ["image/jpeg", "image/png"]);
    }

    #[test]
    fn plain_text_extraction_is_idempotent() {
        let blob = MediaBlob::new(vec![b'a', 0xc3, b'\n', b'z'], "text/plain", "notes.txt");
        let first = extractor().extract(&blob).unwrap();
        let second = extractor().extract(&blob).unwrap();
        assert_eq!(first.text.as_bytes(), second.text.as_bytes());
    }

    #[test]
    fn corrupt_pdf_is_an_extraction_error() {
        let blob = MediaBlob::new(b"\x00\x01garbage".to_vec(), "application/pdf", "x.pdf");
        assert!(matches!(
            extractor().extract(&blob),
            Err(EinlassError::Extraction {
                format: DocumentKind::Pdf,
                ..
            })
        ));
    }

    #[test]
    fn panics_become_internal_faults() {
        let result = guarded(DocumentKind::Excel, || panic!("index out of bounds"));
        match result {
            Err(EinlassError::Extraction {
                format: DocumentKind::Excel,
                cause: ExtractionCause::Internal(detail),
            }) => assert_eq!(detail, "index out of bounds"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
