// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EinlassError, Result};
use crate::types::{MediaBlob, Quality, TransformKind, TransformRequest};

/// Largest accepted `max_batch_workers`.
pub const MAX_BATCH_WORKERS: usize = 1024;

/// Settings for extraction and batch transforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Parent directory for staging areas. `None` uses the system temp dir.
    pub staging_root: Option<PathBuf>,
    /// Prefix for staging directory names; a random suffix is appended.
    pub staging_prefix: String,
    /// Upper bound on batch items processed concurrently.
    pub max_batch_workers: usize,
    /// Quality used for compress requests that do not specify one, and for
    /// JPEG output of convert requests.
    pub default_compress_quality: u8,
    /// Program that converts legacy `.doc` files to `.docx` (LibreOffice CLI).
    pub legacy_word_converter: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            staging_root: None,
            staging_prefix: "einlass-".into(),
            max_batch_workers: 4,
            default_compress_quality: 80,
            legacy_word_converter: "soffice".into(),
        }
    }
}

impl IngestConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_BATCH_WORKERS).contains(&self.max_batch_workers) {
            return Err(EinlassError::InvalidRequest(format!(
                "max_batch_workers must be between 1 and {MAX_BATCH_WORKERS}, got {}",
                self.max_batch_workers
            )));
        }
        Quality::new(self.default_compress_quality)?;
        Ok(())
    }

    /// The default compression quality as a validated value.
    pub fn default_quality(&self) -> Result<Quality> {
        Quality::new(self.default_compress_quality)
    }

    /// Build a compress request, falling back to the configured default
    /// quality when the caller gives none.
    pub fn compress_request(
        &self,
        items: Vec<MediaBlob>,
        quality: Option<u8>,
    ) -> Result<TransformRequest> {
        let quality = match quality {
            Some(value) => Quality::new(value)?,
            None => self.default_quality()?,
        };
        Ok(TransformRequest::with_kind(
            items,
            TransformKind::Compress { quality },
        ))
    }
}
