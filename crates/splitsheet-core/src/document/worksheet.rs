//! Statement worksheet building and recalculation.
//!
//! A [`Worksheet`] is the grid form of a distribution statement. It can be
//! built in two modes with identical rounding semantics:
//!
//! - [`Mode::Values`] writes the computed numbers from
//!   [`Distribution::compute`], with explicit blanks for parties that have
//!   no share yet.
//! - [`Mode::Formulas`] writes the emitted formula text instead, keeping
//!   the sheet live when opened in a spreadsheet application. The built-in
//!   evaluator can recalculate these in-process; [`verify_modes`] proves
//!   both modes agree cell-for-cell.

use rhai::Engine;

use splitsheet_engine::engine::{
    Cell, CellRef, CellType, Distribution, Dynamic, ExpenseSlot, Grid, Money, Party, Statement,
    allocation_formula, balance_formula, create_engine, eval_formula, expense_total_formula,
    format_dynamic, format_number, format_percent, row_total_formula,
};

use super::layout::SheetLayout;
use crate::error::{Result, SplitsheetError};

/// How derived cells are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Computed numbers, blanks for incomplete parties.
    Values,
    /// Spreadsheet formulas following the same allocation algorithm.
    Formulas,
}

/// A built statement sheet: sparse grid plus its geometry and an engine
/// for recalculating formula cells.
pub struct Worksheet {
    pub grid: Grid,
    layout: SheetLayout,
    mode: Mode,
    engine: Engine,
}

impl Worksheet {
    /// Build a worksheet for a distribution. The distribution is validated
    /// (share sum, negative amounts) in both modes.
    pub fn build(distribution: &Distribution, mode: Mode) -> Result<Worksheet> {
        let statement = distribution.compute()?;
        Ok(Self::build_inner(distribution, mode, Some(&statement)))
    }

    /// Build a blank N-party template: empty input cells, live formulas.
    /// This is the counterpart of the source's pre-sized per-headcount
    /// sheets.
    pub fn template(party_count: usize) -> Result<Worksheet> {
        if party_count == 0 {
            return Err(SplitsheetError::NoParties);
        }
        let parties = (0..party_count)
            .map(|i| Party::new(format!("Party {}", CellRef::col_to_letters(i))))
            .collect();
        let distribution = Distribution::new(Money::ZERO, parties)?;
        Ok(Self::build_inner(&distribution, Mode::Formulas, None))
    }

    fn build_inner(
        distribution: &Distribution,
        mode: Mode,
        statement: Option<&Statement>,
    ) -> Worksheet {
        let layout = SheetLayout::new(distribution.parties().len());
        // DashMap is internally Arc-based, clones are cheap.
        let grid: Grid = std::sync::Arc::new(dashmap::DashMap::new());

        grid.insert(
            CellRef::new(SheetLayout::LABEL_COL, 0),
            Cell::new_text("Total sale price"),
        );
        grid.insert(
            SheetLayout::total_cell(),
            Cell::new_number(distribution.total().as_f64()),
        );

        // Header row: item label, one column per party, cross-check total.
        let header = SheetLayout::header_row();
        grid.insert(
            CellRef::new(SheetLayout::LABEL_COL, header),
            Cell::new_text("Item"),
        );
        for (i, party) in distribution.parties().iter().enumerate() {
            grid.insert(
                CellRef::new(layout.party_col(i), header),
                Cell::new_text(party.name()),
            );
        }
        grid.insert(
            CellRef::new(layout.total_col(), header),
            Cell::new_text("Total"),
        );

        // Item labels down column A.
        let labels = [
            (SheetLayout::share_row(), "Ownership share".to_string()),
            (SheetLayout::alloc_row(), "Allocated amount".to_string()),
            (SheetLayout::separator_row(), "--- Expenses ---".to_string()),
            (SheetLayout::expense_total_row(), "Expense total".to_string()),
            (SheetLayout::balance_row(), "Closing balance".to_string()),
        ];
        for (row, label) in labels {
            grid.insert(
                CellRef::new(SheetLayout::LABEL_COL, row),
                Cell::new_text(&label),
            );
        }
        for slot in ExpenseSlot::all() {
            grid.insert(
                CellRef::new(SheetLayout::LABEL_COL, SheetLayout::expense_row(slot.index())),
                Cell::new_text(&distribution.slot_label(slot)),
            );
        }

        // Input cells: shares and itemized expenses. Blank inputs are
        // simply absent from the sparse grid.
        for (i, party) in distribution.parties().iter().enumerate() {
            let col = layout.party_col(i);
            if let Some(share) = party.share() {
                grid.insert(
                    CellRef::new(col, SheetLayout::share_row()),
                    Cell::new_number(share.fraction()),
                );
            }
            for slot in ExpenseSlot::all() {
                if let Some(amount) = party.expenses().get(slot) {
                    grid.insert(
                        CellRef::new(col, SheetLayout::expense_row(slot.index())),
                        Cell::new_number(amount.as_f64()),
                    );
                }
            }
        }

        match (mode, statement) {
            (Mode::Formulas, _) => Self::write_formula_cells(&grid, &layout),
            (Mode::Values, Some(statement)) => {
                Self::write_value_cells(&grid, &layout, statement)
            }
            // Templates are always formula sheets.
            (Mode::Values, None) => {}
        }

        grid.insert(
            CellRef::new(SheetLayout::LABEL_COL, SheetLayout::confirmation_row()),
            Cell::new_text("Amounts confirmed by all co-owners."),
        );
        if layout.total_col() > SheetLayout::first_party_col() {
            grid.insert(
                CellRef::new(layout.total_col() - 1, SheetLayout::confirmation_row()),
                Cell::new_text("Signature:"),
            );
        }
        grid.insert(
            CellRef::new(SheetLayout::LABEL_COL, SheetLayout::date_row()),
            Cell::new_text("Date:  ____ / ____ / ____"),
        );

        let engine = create_engine(grid.clone());
        Worksheet {
            grid,
            layout,
            mode,
            engine,
        }
    }

    fn write_formula_cells(grid: &Grid, layout: &SheetLayout) {
        let total = SheetLayout::total_cell();
        let first = SheetLayout::first_party_col();
        for i in 0..layout.party_count() {
            let col = layout.party_col(i);
            grid.insert(
                CellRef::new(col, SheetLayout::alloc_row()),
                Cell::new_script(&allocation_formula(
                    &total,
                    SheetLayout::share_row(),
                    SheetLayout::alloc_row(),
                    first,
                    col,
                )),
            );
            grid.insert(
                CellRef::new(col, SheetLayout::expense_total_row()),
                Cell::new_script(&expense_total_formula(
                    SheetLayout::share_row(),
                    SheetLayout::expense_start_row(),
                    SheetLayout::expense_end_row(),
                    col,
                )),
            );
            grid.insert(
                CellRef::new(col, SheetLayout::balance_row()),
                Cell::new_script(&balance_formula(
                    SheetLayout::share_row(),
                    SheetLayout::alloc_row(),
                    SheetLayout::expense_total_row(),
                    col,
                )),
            );
        }
        for row in layout.computed_rows() {
            grid.insert(
                CellRef::new(layout.total_col(), row),
                Cell::new_script(&row_total_formula(row, first, layout.last_party_col())),
            );
        }
    }

    fn write_value_cells(grid: &Grid, layout: &SheetLayout, statement: &Statement) {
        for (i, outcome) in statement.parties.iter().enumerate() {
            let col = layout.party_col(i);
            let derived = [
                (SheetLayout::alloc_row(), outcome.allocated),
                (SheetLayout::expense_total_row(), outcome.expense_total),
                (SheetLayout::balance_row(), outcome.balance),
            ];
            for (row, value) in derived {
                if let Some(amount) = value {
                    grid.insert(CellRef::new(col, row), Cell::new_number(amount.as_f64()));
                }
            }
        }

        let totals = &statement.totals;
        let total_col = layout.total_col();
        grid.insert(
            CellRef::new(total_col, SheetLayout::share_row()),
            Cell::new_number(totals.share),
        );
        grid.insert(
            CellRef::new(total_col, SheetLayout::alloc_row()),
            Cell::new_number(totals.allocated.as_f64()),
        );
        for slot in ExpenseSlot::all() {
            grid.insert(
                CellRef::new(total_col, SheetLayout::expense_row(slot.index())),
                Cell::new_number(totals.expenses[slot.index()].as_f64()),
            );
        }
        grid.insert(
            CellRef::new(total_col, SheetLayout::expense_total_row()),
            Cell::new_number(totals.expense_total.as_f64()),
        );
        grid.insert(
            CellRef::new(total_col, SheetLayout::balance_row()),
            Cell::new_number(totals.balance.as_f64()),
        );
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Evaluate one formula cell through the engine.
    pub fn eval_script(&self, cell_ref: &CellRef, script: &str) -> Result<Dynamic> {
        eval_formula(&self.engine, script).map_err(|e| SplitsheetError::Eval {
            cell: cell_ref.to_string(),
            message: e.to_string(),
        })
    }

    /// Display string for a cell: labels verbatim, shares as percentages,
    /// money grouped, formula cells recalculated, blanks empty.
    pub fn display_value(&self, cell_ref: &CellRef) -> Result<String> {
        // Clone out of the map so the shard lock is released before any
        // recursive evaluation touches the grid again.
        let Some(cell) = self.grid.get(cell_ref).map(|c| c.clone()) else {
            return Ok(String::new());
        };
        match &cell.contents {
            CellType::Empty => Ok(String::new()),
            CellType::Text(s) => Ok(s.clone()),
            CellType::Number(n) => Ok(self.format_at(cell_ref, *n)),
            CellType::Script(s) => {
                let value = self.eval_script(cell_ref, s)?;
                if let Ok(n) = value.as_float() {
                    Ok(self.format_at(cell_ref, n))
                } else if let Ok(n) = value.as_int() {
                    Ok(self.format_at(cell_ref, n as f64))
                } else {
                    Ok(format_dynamic(&value))
                }
            }
        }
    }

    fn format_at(&self, cell_ref: &CellRef, n: f64) -> String {
        if cell_ref.row == SheetLayout::share_row()
            && cell_ref.col >= SheetLayout::first_party_col()
        {
            format_percent(n)
        } else {
            format_number(n)
        }
    }
}

/// Prove value mode and formula mode agree for a distribution: every
/// formula cell, recalculated in-process, must match the value-mode cell
/// (within f64 display noise), and blanks must line up exactly.
pub fn verify_modes(distribution: &Distribution) -> Result<()> {
    let values = Worksheet::build(distribution, Mode::Values)?;
    let formulas = Worksheet::build(distribution, Mode::Formulas)?;

    let mut scripts: Vec<(CellRef, String)> = formulas
        .grid
        .iter()
        .filter_map(|entry| match &entry.value().contents {
            CellType::Script(s) => Some((entry.key().clone(), s.clone())),
            _ => None,
        })
        .collect();
    scripts.sort_by(|a, b| a.0.row.cmp(&b.0.row).then(a.0.col.cmp(&b.0.col)));

    for (cell_ref, script) in scripts {
        let computed = formulas.eval_script(&cell_ref, &script)?;
        let computed_num = computed
            .as_float()
            .ok()
            .or_else(|| computed.as_int().ok().map(|n| n as f64));
        let expected = values.grid.get(&cell_ref).map(|c| c.clone());

        match expected.as_ref().map(|c| &c.contents) {
            Some(CellType::Number(n)) => {
                let matches = computed_num.is_some_and(|c| (c - n).abs() < 1e-6);
                if !matches {
                    return Err(SplitsheetError::RecalcMismatch {
                        cell: cell_ref.to_string(),
                        computed: format_dynamic(&computed),
                        expected: format_number(*n),
                    });
                }
            }
            None | Some(CellType::Empty) => {
                let blank = computed.is_unit()
                    || computed.clone().into_string().is_ok_and(|s| s.is_empty());
                if !blank {
                    return Err(SplitsheetError::RecalcMismatch {
                        cell: cell_ref.to_string(),
                        computed: format_dynamic(&computed),
                        expected: String::new(),
                    });
                }
            }
            Some(CellType::Text(_)) | Some(CellType::Script(_)) => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitsheet_engine::engine::{ExpenseCategory, Share};

    fn scenario() -> Distribution {
        let parties = vec![
            Party::new("Alice")
                .with_share(Share::new(0.25).unwrap())
                .with_expense(
                    ExpenseSlot::Fixed(ExpenseCategory::AgencyFee),
                    Money::new(100_000),
                ),
            Party::new("Bob").with_share(Share::new(0.25).unwrap()),
            Party::new("Carol").with_share(Share::new(0.5).unwrap()),
        ];
        Distribution::new(Money::new(18_300_000), parties).unwrap()
    }

    #[test]
    fn test_values_sheet_cells() {
        let ws = Worksheet::build(&scenario(), Mode::Values).unwrap();
        let alloc = CellRef::new(1, SheetLayout::alloc_row());
        match ws.grid.get(&alloc).map(|c| c.clone()).map(|c| c.contents) {
            Some(CellType::Number(n)) => assert_eq!(n, 4_575_000.0),
            other => panic!("unexpected cell {other:?}"),
        }
        let total = CellRef::new(4, SheetLayout::alloc_row());
        match ws.grid.get(&total).map(|c| c.clone()).map(|c| c.contents) {
            Some(CellType::Number(n)) => assert_eq!(n, 18_300_000.0),
            other => panic!("unexpected cell {other:?}"),
        }
    }

    #[test]
    fn test_blank_party_has_blank_derived_cells() {
        let parties = vec![
            Party::new("A").with_share(Share::new(1.0).unwrap()),
            Party::new("B").with_expense(
                ExpenseSlot::Fixed(ExpenseCategory::Utilities),
                Money::new(500),
            ),
        ];
        let dist = Distribution::new(Money::new(1_000), parties).unwrap();
        let ws = Worksheet::build(&dist, Mode::Values).unwrap();

        let b_col = ws.layout().party_col(1);
        for row in [
            SheetLayout::alloc_row(),
            SheetLayout::expense_total_row(),
            SheetLayout::balance_row(),
        ] {
            assert!(
                ws.grid.get(&CellRef::new(b_col, row)).is_none(),
                "expected blank at row {row}"
            );
        }
        // The entered expense input is still present.
        let utilities_row =
            SheetLayout::expense_row(ExpenseSlot::Fixed(ExpenseCategory::Utilities).index());
        assert!(ws.grid.get(&CellRef::new(b_col, utilities_row)).is_some());
    }

    #[test]
    fn test_template_formulas() {
        let ws = Worksheet::template(3).unwrap();
        let alloc = CellRef::new(1, SheetLayout::alloc_row());
        match ws.grid.get(&alloc).map(|c| c.clone()).map(|c| c.contents) {
            Some(CellType::Script(s)) => {
                assert_eq!(s, r#"IF(B4<>"", ROUND(B4*$B$1, 0), "")"#)
            }
            other => panic!("unexpected cell {other:?}"),
        }
        // No share inputs yet.
        assert!(
            ws.grid
                .get(&CellRef::new(1, SheetLayout::share_row()))
                .is_none()
        );
    }

    #[test]
    fn test_display_formats() {
        let ws = Worksheet::build(&scenario(), Mode::Values).unwrap();
        assert_eq!(
            ws.display_value(&SheetLayout::total_cell()).unwrap(),
            "18,300,000"
        );
        assert_eq!(
            ws.display_value(&CellRef::new(1, SheetLayout::share_row()))
                .unwrap(),
            "25.00%"
        );
        assert_eq!(
            ws.display_value(&CellRef::new(9, 9)).unwrap(),
            ""
        );
    }

    #[test]
    fn test_modes_agree() {
        verify_modes(&scenario()).unwrap();
    }

    #[test]
    fn test_modes_agree_with_blank_party() {
        let parties = vec![
            Party::new("A").with_share(Share::new(0.5).unwrap()),
            Party::new("B").with_share(Share::new(0.5).unwrap()),
            Party::new("C").with_expense(
                ExpenseSlot::Fixed(ExpenseCategory::ScrivenerFee),
                Money::new(3_000),
            ),
        ];
        let dist = Distribution::new(Money::new(1_001), parties).unwrap();
        verify_modes(&dist).unwrap();
    }

    #[test]
    fn test_formula_display_recalculates() {
        let ws = Worksheet::build(&scenario(), Mode::Formulas).unwrap();
        assert_eq!(
            ws.display_value(&CellRef::new(3, SheetLayout::alloc_row()))
                .unwrap(),
            "9,150,000"
        );
    }
}
