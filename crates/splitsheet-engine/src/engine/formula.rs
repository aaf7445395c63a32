//! Formula emission.
//!
//! The alternate output mode of the engine: each derived cell becomes a
//! spreadsheet-native text expression instead of a computed number, so a
//! downstream spreadsheet keeps recalculating when inputs change. The
//! emitted dialect is the `IF` / `ROUND` / `SUM` subset the evaluator in
//! this crate understands, with `<>""` blank guards that yield blank (not
//! zero) for parties without a share.
//!
//! Emitted formulas follow the same cumulative-remainder algorithm as
//! [`allocate`](super::allocate): evaluating them must give the same
//! numbers as value mode.

use super::cell_ref::{CellRange, CellRef};

/// Allocation formula for the party in `col`.
///
/// The first party rounds its own share of the total; every later party
/// takes the rounded cumulative target minus everything already allocated,
/// so the running sum tracks the rounded cumulative share exactly.
pub fn allocation_formula(
    total: &CellRef,
    share_row: usize,
    alloc_row: usize,
    first_party_col: usize,
    col: usize,
) -> String {
    let share = CellRef::new(col, share_row);
    let total = total.to_absolute();
    if col == first_party_col {
        format!(r#"IF({share}<>"", ROUND({share}*{total}, 0), "")"#)
    } else {
        let cumulative = CellRange::row_span(share_row, first_party_col, col);
        let already = CellRange::row_span(alloc_row, first_party_col, col - 1);
        format!(r#"IF({share}<>"", ROUND(SUM({cumulative})*{total}, 0)-SUM({already}), "")"#)
    }
}

/// Expense-total formula for the party in `col`: blank until the party has
/// a share, otherwise the sum of its expense column.
pub fn expense_total_formula(
    share_row: usize,
    expense_start_row: usize,
    expense_end_row: usize,
    col: usize,
) -> String {
    let share = CellRef::new(col, share_row);
    let expenses = CellRange::col_span(col, expense_start_row, expense_end_row);
    format!(r#"IF({share}<>"", SUM({expenses}), "")"#)
}

/// Balance formula for the party in `col`: allocated minus expense total.
pub fn balance_formula(
    share_row: usize,
    alloc_row: usize,
    expense_total_row: usize,
    col: usize,
) -> String {
    let share = CellRef::new(col, share_row);
    let allocated = CellRef::new(col, alloc_row);
    let expense_total = CellRef::new(col, expense_total_row);
    format!(r#"IF({share}<>"", {allocated}-{expense_total}, "")"#)
}

/// Cross-check total for one computed row, summed over the party columns.
pub fn row_total_formula(row: usize, first_col: usize, last_col: usize) -> String {
    format!("SUM({})", CellRange::row_span(row, first_col, last_col))
}
