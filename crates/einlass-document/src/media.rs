// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content-type to file-extension lookup for embedded images.

/// Extension used for content types missing from the table.
pub const GENERIC_EXTENSION: &str = "bin";

/// Content type used when a document does not declare one.
pub const GENERIC_CONTENT_TYPE: &str = "application/octet-stream";

/// Derive a file extension (without the dot) from a declared content type.
///
/// Unknown types map to [`GENERIC_EXTENSION`]; that is lossy, not an error.
pub fn extension_for(content_type: &str) -> &'static str {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    match essence.to_ascii_lowercase().as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
        "image/gif" => "gif",
        "image/bmp" | "image/x-ms-bmp" => "bmp",
        "image/tiff" => "tiff",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/x-emf" | "image/emf" => "emf",
        "image/x-wmf" | "image/wmf" => "wmf",
        _ => GENERIC_EXTENSION,
    }
}
