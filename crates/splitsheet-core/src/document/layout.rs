//! Statement sheet geometry.
//!
//! The layout is the transposed form of the source sheets: rows are items,
//! columns are parties, with a trailing cross-check total column. All
//! coordinates are 0-indexed; only the party count varies.

use splitsheet_engine::engine::{CellRef, EXPENSE_ROW_COUNT};

/// Row/column positions for a statement with a given number of parties.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheetLayout {
    party_count: usize,
}

impl SheetLayout {
    /// Column A holds the item labels.
    pub const LABEL_COL: usize = 0;

    pub fn new(party_count: usize) -> SheetLayout {
        SheetLayout { party_count }
    }

    pub fn party_count(&self) -> usize {
        self.party_count
    }

    /// The total sale price input cell (B1).
    pub fn total_cell() -> CellRef {
        CellRef::new(1, 0)
    }

    pub fn header_row() -> usize {
        2
    }

    pub fn share_row() -> usize {
        3
    }

    pub fn alloc_row() -> usize {
        4
    }

    pub fn separator_row() -> usize {
        6
    }

    pub fn expense_start_row() -> usize {
        7
    }

    pub fn expense_row(slot_index: usize) -> usize {
        Self::expense_start_row() + slot_index
    }

    pub fn expense_end_row() -> usize {
        Self::expense_start_row() + EXPENSE_ROW_COUNT - 1
    }

    pub fn expense_total_row() -> usize {
        Self::expense_end_row() + 2
    }

    pub fn balance_row() -> usize {
        Self::expense_total_row() + 2
    }

    pub fn confirmation_row() -> usize {
        Self::balance_row() + 3
    }

    pub fn date_row() -> usize {
        Self::confirmation_row() + 2
    }

    pub fn first_party_col() -> usize {
        1
    }

    pub fn party_col(&self, party_index: usize) -> usize {
        Self::first_party_col() + party_index
    }

    pub fn last_party_col(&self) -> usize {
        Self::first_party_col() + self.party_count - 1
    }

    pub fn total_col(&self) -> usize {
        self.last_party_col() + 1
    }

    /// Rows that get a cross-check total in the total column.
    pub fn computed_rows(&self) -> Vec<usize> {
        let mut rows = vec![Self::share_row(), Self::alloc_row()];
        rows.extend((0..EXPENSE_ROW_COUNT).map(Self::expense_row));
        rows.push(Self::expense_total_row());
        rows.push(Self::balance_row());
        rows
    }

    /// Inclusive (rows, cols) bounds of the rendered sheet.
    pub fn bounds(&self) -> (usize, usize) {
        (Self::date_row(), self.total_col())
    }
}
