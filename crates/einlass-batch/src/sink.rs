// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Artifact sinks — where transformed images go once encoded.
//
// The orchestrator never decides how artifacts are persisted; it hands each
// encoded image to an `ArtifactSink` and records the reference it gets back.
// `MemorySink` keeps everything in process, addressed by SHA-256.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use einlass_core::error::TransformError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Opaque reference to a stored artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    /// Suggested download name, e.g. `holiday.webp`.
    pub name: String,
    /// Sink-specific locator (URL, object key, ...).
    pub location: String,
    pub content_type: String,
    pub size: usize,
    /// Lowercase hex SHA-256 of the stored bytes.
    pub sha256: String,
}

/// Persistence seam for transformed images.
///
/// Called from blocking worker threads, so implementations may do
/// synchronous I/O.
pub trait ArtifactSink: Send + Sync {
    fn store(&self, name: &str, content_type: &str, bytes: Vec<u8>) -> Result<ArtifactRef, TransformError>;
}

/// Derive an artifact name from the upload's file name and the output
/// extension: `photos/cat.png` + `webp` becomes `cat.webp`.
pub fn artifact_name(file_name: &str, extension: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("image");
    format!("{stem}.{extension}")
}

/// In-memory, content-addressed sink.
///
/// Identical outputs share one entry; the location is
/// `memory://<sha256>.<ext>`.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes stored at `location`, if any.
    pub fn get(&self, location: &str) -> Option<Vec<u8>> {
        self.artifacts.lock().ok()?.get(location).cloned()
    }

    /// Number of distinct artifacts held.
    pub fn len(&self) -> usize {
        self.artifacts.lock().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactSink for MemorySink {
    fn store(&self, name: &str, content_type: &str, bytes: Vec<u8>) -> Result<ArtifactRef, TransformError> {
        let sha256 = hash_bytes(&bytes);
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let location = format!("memory://{sha256}.{extension}");
        let size = bytes.len();

        let mut artifacts = self
            .artifacts
            .lock()
            .map_err(|_| TransformError::Store("memory sink lock poisoned".into()))?;
        artifacts.entry(location.clone()).or_insert(bytes);
        debug!(name, %location, size, "Artifact stored");

        Ok(ArtifactRef {
            name: name.to_owned(),
            location,
            content_type: content_type.to_owned(),
            size,
            sha256,
        })
    }
}
