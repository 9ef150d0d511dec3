// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// einlass-document — Document extraction and image transforms.
//
// Classifies declared media types, extracts normalised text and embedded
// images from PDF, Word, Excel and plain text documents, and recompresses or
// converts raster images. Everything here is synchronous; the batch crate
// moves the work onto blocking threads.

pub mod classify;
pub mod extract;
pub mod image;
pub mod media;
pub mod pdf;
pub mod sheet;
pub mod staging;
pub mod text;
pub mod word;

#[cfg(test)]
pub(crate) mod fixtures;

pub use classify::{classify, classify_document};
pub use extract::DocumentExtractor;
pub use image::processor::{ImageProcessor, TransformEngine};
pub use pdf::reader::PdfReader;
pub use sheet::SheetExtractor;
pub use staging::StagingArea;
pub use text::TextExtractor;
pub use word::WordExtractor;
