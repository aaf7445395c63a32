//! CSV export.
//!
//! Cells are written as they would be typed: numbers plain, formula cells
//! with their leading '=', so a formula-mode sheet imported into a
//! spreadsheet application stays live. Quoting follows the usual CSV
//! rules (fields with commas, quotes, or newlines are quoted, quotes
//! doubled).

use crate::document::Worksheet;
use crate::error::Result;
use splitsheet_engine::engine::CellRef;
use std::path::Path;

/// Render the worksheet as CSV text.
pub fn csv_content(ws: &Worksheet) -> String {
    let (max_row, max_col) = ws.layout().bounds();
    let mut lines = Vec::with_capacity(max_row + 1);

    for row in 0..=max_row {
        let mut fields = Vec::with_capacity(max_col + 1);
        for col in 0..=max_col {
            let cell_ref = CellRef::new(col, row);
            let raw = ws
                .grid
                .get(&cell_ref)
                .map(|c| c.to_input_string())
                .unwrap_or_default();
            fields.push(csv_field(&raw));
        }
        lines.push(fields.join(","));
    }

    lines.join("\n") + "\n"
}

/// Write the worksheet to a CSV file.
pub fn write_csv(path: &Path, ws: &Worksheet) -> Result<()> {
    std::fs::write(path, csv_content(ws))?;
    Ok(())
}

fn csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Mode, Worksheet};
    use splitsheet_engine::engine::{Distribution, Money, Party, Share};

    fn ws() -> Worksheet {
        let parties = vec![
            Party::new("A").with_share(Share::new(0.5).unwrap()),
            Party::new("B").with_share(Share::new(0.5).unwrap()),
        ];
        let dist = Distribution::new(Money::new(1_000), parties).unwrap();
        Worksheet::build(&dist, Mode::Formulas).unwrap()
    }

    #[test]
    fn test_formula_cells_keep_equals_prefix() {
        let content = csv_content(&ws());
        assert!(content.contains(r#""=IF(B4<>"""", ROUND(B4*$B$1, 0), """")""#));
    }

    #[test]
    fn test_total_price_row() {
        let content = csv_content(&ws());
        let first_line = content.lines().next().unwrap();
        assert_eq!(first_line, "Total sale price,1000,,");
    }

    #[test]
    fn test_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
