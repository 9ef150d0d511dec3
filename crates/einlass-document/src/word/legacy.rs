// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Legacy `.doc` conversion.
//
// Word 97-2003 files are OLE compound documents. Rather than parse that
// format, the staged file is converted to `.docx` by a headless office suite
// (LibreOffice's `soffice`) writing into the same staging area, and the OOXML
// passes then run on the result. The converter's user profile is also placed
// in the staging area so concurrent conversions never share one.

use std::path::{Path, PathBuf};
use std::process::Command;

use einlass_core::error::{EinlassError, ExtractionCause, Result};
use einlass_core::types::DocumentKind;
use tracing::{debug, info, instrument};

use crate::staging::StagingArea;

/// Compound File Binary signature shared by all OLE2 documents.
pub const CFB_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Convert the staged legacy document at `source` to `.docx`.
///
/// Returns the path of the converted file inside `staging`.
#[instrument(skip(staging), fields(source = %source.display()))]
pub fn convert_to_docx(program: &str, staging: &StagingArea, source: &Path) -> Result<PathBuf> {
    let out_dir = staging.path().join("converted");
    std::fs::create_dir(&out_dir).map_err(|err| EinlassError::staging("create", err))?;
    let profile = staging.path().join("profile");

    info!(program, "Converting legacy Word document");
    let output = Command::new(program)
        .arg(format!("-env:UserInstallation=file://{}", profile.display()))
        .args(["--headless", "--convert-to", "docx", "--outdir"])
        .arg(&out_dir)
        .arg(source)
        .output()
        .map_err(|err| conversion(format!("failed to launch '{program}': {err}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(conversion(format!(
            "'{program}' exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let stem = source
        .file_stem()
        .ok_or_else(|| conversion("staged file has no name".into()))?;
    let converted = out_dir.join(stem).with_extension("docx");
    if !converted.is_file() {
        return Err(conversion(format!(
            "'{program}' reported success but produced no {}",
            converted.display()
        )));
    }

    debug!(converted = %converted.display(), "Legacy document converted");
    Ok(converted)
}

/// True when `bytes` start with the OLE2 compound file signature.
pub fn is_compound_file(bytes: &[u8]) -> bool {
    bytes.starts_with(&CFB_SIGNATURE)
}

fn conversion(detail: String) -> EinlassError {
    EinlassError::Extraction {
        format: DocumentKind::LegacyWord,
        cause: ExtractionCause::Conversion(detail),
    }
}
