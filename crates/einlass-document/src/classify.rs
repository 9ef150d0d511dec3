// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Format classifier — maps a caller-declared MIME string onto the closed set
// of extractors and transform inputs. Bytes are never inspected here.

use einlass_core::error::{EinlassError, Result};
use einlass_core::types::{DocumentKind, ImageKind, MediaClass};

/// Classify a declared media type.
///
/// Matching is case-insensitive and ignores MIME parameters, so
/// `Text/Plain; charset=utf-8` is plain text.
pub fn classify(media_type: &str) -> Result<MediaClass> {
    let essence = essence(media_type);
    if let Some(kind) = document_kind(&essence) {
        return Ok(MediaClass::Document(kind));
    }
    if let Some(kind) = image_kind(&essence) {
        return Ok(MediaClass::Image(kind));
    }
    Err(EinlassError::UnsupportedFormat(media_type.to_string()))
}

/// Classify a media type for document extraction only.
///
/// Image types are rejected here: they have no extractor.
pub fn classify_document(media_type: &str) -> Result<DocumentKind> {
    document_kind(&essence(media_type))
        .ok_or_else(|| EinlassError::UnsupportedFormat(media_type.to_string()))
}

fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn document_kind(essence: &str) -> Option<DocumentKind> {
    match essence {
        "application/pdf" => Some(DocumentKind::Pdf),
        "application/msword" => Some(DocumentKind::LegacyWord),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
            Some(DocumentKind::Word)
        }
        "application/vnd.ms-excel" => Some(DocumentKind::LegacyExcel),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
            Some(DocumentKind::Excel)
        }
        "text/plain" => Some(DocumentKind::PlainText),
        _ => None,
    }
}

fn image_kind(essence: &str) -> Option<ImageKind> {
    match essence {
        "image/png" => Some(ImageKind::Png),
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(ImageKind::Jpeg),
        "image/webp" => Some(ImageKind::Webp),
        "image/gif" => Some(ImageKind::Gif),
        "image/bmp" | "image/x-ms-bmp" => Some(ImageKind::Bmp),
        "image/tiff" => Some(ImageKind::Tiff),
        _ => None,
    }
}
