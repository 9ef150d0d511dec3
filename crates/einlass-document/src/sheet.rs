// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spreadsheet extractor — renders every sheet of an `.xls` / `.xlsx`
// workbook as a tab-separated text block using `calamine`.
//
// Workbooks are read straight from memory. Embedded images are not
// extracted; the image list is always empty.

use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use einlass_core::error::{EinlassError, Result};
use einlass_core::types::{DocumentKind, ExtractedDocument};
use tracing::{debug, info, instrument};

/// Extracts workbook contents as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SheetExtractor;

impl SheetExtractor {
    /// Render every sheet, in workbook order, as
    /// `<sheet name>\n<row>\n<row>\n\n`.
    ///
    /// `kind` only labels errors; the workbook format is detected from the
    /// bytes so that `.xlsx` files declared as `vnd.ms-excel` still load.
    #[instrument(skip(self, bytes), fields(bytes_len = bytes.len()))]
    pub fn extract(&self, bytes: &[u8], kind: DocumentKind) -> Result<ExtractedDocument> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|err| EinlassError::malformed(kind, format!("failed to open workbook: {err}")))?;

        let mut text = String::new();
        for name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&name).map_err(|err| {
                EinlassError::malformed(kind, format!("failed to read sheet '{name}': {err}"))
            })?;
            debug!(sheet = %name, rows = range.height(), "Rendering sheet");
            render_sheet(&mut text, &name, &range);
        }

        info!(chars = text.len(), "Workbook extracted");
        Ok(ExtractedDocument::text_only(text))
    }
}

/// Append one sheet block: header line, one line per row, blank line.
fn render_sheet(out: &mut String, name: &str, range: &Range<Data>) {
    out.push_str(name);
    out.push('\n');
    for row in range.rows() {
        let mut first = true;
        for cell in row {
            if !first {
                out.push('\t');
            }
            first = false;
            out.push_str(&cell.to_string());
        }
        out.push('\n');
    }
    out.push('\n');
}
