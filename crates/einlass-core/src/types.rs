// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Einlass ingestion pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EinlassError;

/// Unique identifier for one ingestion or batch-transform request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A raw uploaded byte buffer plus its caller-declared media type.
///
/// Immutable once received. The declared media type is trusted as-is; the
/// upload boundary is responsible for size limits and sniffing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBlob {
    bytes: Vec<u8>,
    media_type: String,
    file_name: String,
}

impl MediaBlob {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
            file_name: file_name.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The media type exactly as the caller declared it.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Original file name from the upload.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Document formats the extractors understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    /// Office Open XML word processing document (`.docx`).
    Word,
    /// Word 97-2003 binary document (`.doc`).
    LegacyWord,
    /// Office Open XML spreadsheet (`.xlsx`).
    Excel,
    /// Excel 97-2003 binary workbook (`.xls`).
    LegacyExcel,
    PlainText,
}

impl DocumentKind {
    /// Canonical MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Word => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::LegacyWord => "application/msword",
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::LegacyExcel => "application/vnd.ms-excel",
            Self::PlainText => "text/plain",
        }
    }

    /// Extractor family name, used in error reports and log fields.
    pub fn family(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Word | Self::LegacyWord => "word",
            Self::Excel | Self::LegacyExcel => "excel",
            Self::PlainText => "text",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.family())
    }
}

/// Raster image formats accepted as transform inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageKind {
    Png,
    Jpeg,
    Webp,
    Gif,
    Bmp,
    Tiff,
}

impl ImageKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }
}

/// Result of classifying a declared media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaClass {
    Document(DocumentKind),
    Image(ImageKind),
}

/// An image found inside a structured document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedImage {
    /// Raw image bytes, exactly as stored in the source document.
    pub bytes: Vec<u8>,
    /// Content type declared by the source document.
    pub content_type: String,
    /// File extension derived from `content_type` (no leading dot).
    pub extension: String,
}

/// Normalised text plus embedded images, produced once per `MediaBlob`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub text: String,
    /// Images in the order they appear in the source document.
    pub images: Vec<EmbeddedImage>,
}

impl ExtractedDocument {
    /// A text-only document.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            images: Vec::new(),
        }
    }
}

/// Compression quality factor, always within `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Result<Self, EinlassError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(EinlassError::InvalidRequest(format!(
                "quality must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Quality {
    type Error = EinlassError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// Output formats a convert request may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetFormat {
    Png,
    Jpeg,
    Webp,
}

impl TargetFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }
}

impl FromStr for TargetFormat {
    type Err = EinlassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::Webp),
            other => Err(EinlassError::InvalidRequest(format!(
                "unsupported target format '{other}', expected png, jpg or webp"
            ))),
        }
    }
}

/// The operation a transform batch applies to every item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformKind {
    /// Re-encode as JPEG at the given quality.
    Compress { quality: Quality },
    /// Re-encode into the target format.
    Convert { target: TargetFormat },
}

impl TransformKind {
    /// Format every successful output of this operation is encoded in.
    pub fn output_format(&self) -> TargetFormat {
        match self {
            Self::Compress { .. } => TargetFormat::Jpeg,
            Self::Convert { target } => *target,
        }
    }
}

/// An ordered batch of images plus one validated operation.
///
/// Parameters are validated on construction so that an invalid quality or
/// target rejects the whole request before any item is decoded.
#[derive(Debug, Clone)]
pub struct TransformRequest {
    pub id: RequestId,
    pub items: Vec<MediaBlob>,
    pub kind: TransformKind,
}

impl TransformRequest {
    pub fn compress(items: Vec<MediaBlob>, quality: u8) -> Result<Self, EinlassError> {
        let quality = Quality::new(quality)?;
        Ok(Self::with_kind(items, TransformKind::Compress { quality }))
    }

    pub fn convert(items: Vec<MediaBlob>, target: &str) -> Result<Self, EinlassError> {
        let target = target.parse::<TargetFormat>()?;
        Ok(Self::with_kind(items, TransformKind::Convert { target }))
    }

    pub fn with_kind(items: Vec<MediaBlob>, kind: TransformKind) -> Self {
        Self {
            id: RequestId::new(),
            items,
            kind,
        }
    }
}
