// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Staging areas — uniquely named scratch directories for extractors that need
// their input on disk.
//
// A `StagingArea` owns a `tempfile::TempDir`. Dropping it removes the
// directory and everything inside it, so early returns, `?`, panics that
// unwind, and cancelled callers all release the same way. `release` is the
// explicit path that also reports removal failures.

use std::path::{Path, PathBuf};

use einlass_core::IngestConfig;
use einlass_core::error::{EinlassError, Result};
use tempfile::TempDir;
use tracing::{debug, instrument, warn};

/// A process-local scratch directory for one extraction.
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// Create a fresh, uniquely named directory under the configured root.
    #[instrument(skip_all, fields(prefix = %config.staging_prefix))]
    pub fn acquire(config: &IngestConfig) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(&config.staging_prefix);
        let dir = match &config.staging_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|err| EinlassError::staging("create", err))?;

        debug!(path = %dir.path().display(), "Staging area acquired");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `bytes` to `file_name` inside the staging area.
    ///
    /// `file_name` must be a bare name; path separators are rejected so that
    /// nothing is ever written outside the directory.
    pub fn write(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        if file_name.is_empty()
            || file_name.contains(['/', '\\'])
            || file_name == "."
            || file_name == ".."
        {
            return Err(EinlassError::staging(
                "write",
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("invalid staged file name '{file_name}'"),
                ),
            ));
        }
        let path = self.dir.path().join(file_name);
        std::fs::write(&path, bytes).map_err(|err| EinlassError::staging("write", err))?;
        debug!(path = %path.display(), bytes = bytes.len(), "Staged file written");
        Ok(path)
    }

    /// Remove the directory now, reporting any filesystem error.
    pub fn release(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(|err| {
            warn!(path = %path.display(), %err, "Staging area removal failed");
            EinlassError::staging("remove", err)
        })?;
        debug!(path = %path.display(), "Staging area released");
        Ok(())
    }
}
