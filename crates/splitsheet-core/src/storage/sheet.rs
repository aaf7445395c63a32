//! Writer for the plain cell-listing sheet format.
//!
//! One line per populated cell, sorted by row then column: `B5: =IF(...)`.
//! Text is quoted and escaped; numbers and formulas are written as typed.
//! The format round-trips through any tool that understands A1 cell
//! addresses.

use crate::document::Worksheet;
use crate::error::Result;
use splitsheet_engine::engine::CellType;
use std::path::Path;

/// Render the worksheet as a cell listing.
pub fn sheet_content(ws: &Worksheet) -> String {
    let mut lines = vec!["# splitsheet statement".to_string()];

    // Collect and sort cells by position for consistent output.
    let mut cells: Vec<_> = ws
        .grid
        .iter()
        .map(|entry| (entry.key().clone(), entry.value().clone()))
        .collect();
    cells.sort_by(|a, b| a.0.row.cmp(&b.0.row).then(a.0.col.cmp(&b.0.col)));

    for (cell_ref, cell) in cells {
        let value_str = match &cell.contents {
            CellType::Empty => continue,
            CellType::Number(n) => n.to_string(),
            CellType::Text(s) => format!("\"{}\"", escape_text(s)),
            CellType::Script(s) => format!("={}", s),
        };
        lines.push(format!("{}: {}", cell_ref, value_str));
    }

    lines.join("\n") + "\n"
}

/// Write the worksheet to a sheet file.
pub fn write_sheet(path: &Path, ws: &Worksheet) -> Result<()> {
    std::fs::write(path, sheet_content(ws))?;
    Ok(())
}

fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
    out
}
