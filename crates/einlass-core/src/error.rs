// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Einlass.

use thiserror::Error;

use crate::types::DocumentKind;

/// Top-level error type for all Einlass operations.
#[derive(Debug, Error)]
pub enum EinlassError {
    // -- Client input --
    #[error("unsupported media type: {0}")]
    UnsupportedFormat(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    // -- Extraction --
    #[error("{format} extraction failed: {cause}")]
    Extraction {
        format: DocumentKind,
        cause: ExtractionCause,
    },

    // -- Staging area (transient, safe to retry) --
    #[error("staging area {operation} failed: {source}")]
    Staging {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    // -- Configuration / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EinlassError {
    /// Shorthand for a malformed-input extraction failure.
    pub fn malformed(format: DocumentKind, detail: impl Into<String>) -> Self {
        Self::Extraction {
            format,
            cause: ExtractionCause::Malformed(detail.into()),
        }
    }

    /// Shorthand for a staging-area filesystem fault.
    pub fn staging(operation: &'static str, source: std::io::Error) -> Self {
        Self::Staging { operation, source }
    }
}

/// Why an extractor gave up on a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionCause {
    /// The bytes do not form a valid document of the declared format.
    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("document is encrypted")]
    Encrypted,

    /// The legacy-format converter could not be run or rejected the file.
    #[error("conversion failed: {0}")]
    Conversion(String),

    /// The underlying parser faulted unexpectedly (e.g. panicked).
    #[error("internal parser fault: {0}")]
    Internal(String),
}

/// Failure of a single batch item. Never aborts sibling items.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("failed to store artifact: {0}")]
    Store(String),

    /// The worker processing the item stopped before producing a result.
    #[error("item processing aborted: {0}")]
    Aborted(String),
}

impl TransformError {
    /// Human-oriented failure reason for this item.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, EinlassError>;
