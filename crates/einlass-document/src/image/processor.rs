// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image transform engine — lossy recompression and format conversion of
// in-memory images using the `image` crate.
//
// Nothing here touches the filesystem: bytes in, bytes out. Persisting the
// result is the caller's job.

use std::io::Cursor;

use einlass_core::error::TransformError;
use einlass_core::types::{Quality, TargetFormat, TransformKind};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageFormat};
use tracing::{debug, instrument};

/// A single decoded image ready to be re-encoded.
pub struct ImageProcessor {
    /// The decoded working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode raw encoded bytes (JPEG, PNG, WebP, GIF, BMP, TIFF).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, TransformError> {
        let img = image::load_from_memory(data)
            .map_err(|err| TransformError::Decode(err.to_string()))?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    // -- Output ---------------------------------------------------------------

    /// Encode as PNG.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, TransformError> {
        let mut buffer = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|err| TransformError::Encode(format!("PNG encoding failed: {err}")))?;
        Ok(buffer.into_inner())
    }

    /// Encode as JPEG at `quality`. Alpha is dropped.
    pub fn to_jpeg_bytes(&self, quality: Quality) -> Result<Vec<u8>, TransformError> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.get());
        rgb.write_with_encoder(encoder)
            .map_err(|err| TransformError::Encode(format!("JPEG encoding failed: {err}")))?;
        Ok(buffer)
    }

    /// Encode as lossless WebP.
    pub fn to_webp_bytes(&self) -> Result<Vec<u8>, TransformError> {
        let mut buffer = Vec::new();
        let rgba = self.image.to_rgba8();
        let encoder = WebPEncoder::new_lossless(&mut buffer);
        rgba.write_with_encoder(encoder)
            .map_err(|err| TransformError::Encode(format!("WebP encoding failed: {err}")))?;
        Ok(buffer)
    }

    /// Encode into `format`, using `quality` where the format is lossy.
    pub fn encode(&self, format: TargetFormat, quality: Quality) -> Result<Vec<u8>, TransformError> {
        match format {
            TargetFormat::Png => self.to_png_bytes(),
            TargetFormat::Jpeg => self.to_jpeg_bytes(quality),
            TargetFormat::Webp => self.to_webp_bytes(),
        }
    }
}

/// Applies one [`TransformKind`] to single images.
#[derive(Debug, Clone, Copy)]
pub struct TransformEngine {
    /// Quality for lossy outputs of convert requests.
    convert_quality: Quality,
}

impl TransformEngine {
    pub fn new(convert_quality: Quality) -> Self {
        Self { convert_quality }
    }

    /// Transform one encoded image.
    ///
    /// Compress always re-encodes as JPEG regardless of the input format;
    /// convert re-encodes into the requested target.
    #[instrument(skip(self, bytes), fields(bytes_len = bytes.len(), kind = ?kind))]
    pub fn transform_one(&self, bytes: &[u8], kind: TransformKind) -> Result<Vec<u8>, TransformError> {
        let processor = ImageProcessor::from_bytes(bytes)?;
        let output = match kind {
            TransformKind::Compress { quality } => processor.to_jpeg_bytes(quality)?,
            TransformKind::Convert { target } => processor.encode(target, self.convert_quality)?,
        };
        debug!(
            input_bytes = bytes.len(),
            output_bytes = output.len(),
            "Image transformed"
        );
        Ok(output)
    }
}
