//! Markdown export functionality.
//!
//! Renders the worksheet as a Markdown table with spreadsheet-style
//! column letters and row numbers. Formula cells are recalculated so the
//! table always shows display values.

use crate::document::Worksheet;
use crate::error::Result;
use splitsheet_engine::engine::CellRef;
use std::path::Path;

/// Render the worksheet as a Markdown document.
pub fn markdown_content(ws: &Worksheet) -> Result<String> {
    let (max_row, max_col) = ws.layout().bounds();
    let mut out = String::new();

    out.push_str("# Distribution statement\n\n");

    out.push_str("|   |");
    for col in 0..=max_col {
        out.push_str(&format!(" {} |", CellRef::col_to_letters(col)));
    }
    out.push('\n');

    out.push_str("|---|");
    for _ in 0..=max_col {
        out.push_str("---|");
    }
    out.push('\n');

    for row in 0..=max_row {
        out.push_str(&format!("| {} |", row + 1));
        for col in 0..=max_col {
            let display = ws.display_value(&CellRef::new(col, row))?;
            out.push_str(&format!(" {} |", escape_markdown(&display)));
        }
        out.push('\n');
    }

    Ok(out)
}

/// Write the worksheet to a Markdown file.
pub fn write_markdown(path: &Path, ws: &Worksheet) -> Result<()> {
    std::fs::write(path, markdown_content(ws)?)?;
    Ok(())
}

/// Escape special markdown characters in cell content.
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}
