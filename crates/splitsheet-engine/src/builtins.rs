//! Built-in spreadsheet functions (Rust) and their metadata.
//!
//! Conventions:
//! - Formula-facing built-in names are ALL CAPS (e.g. `SUM`, `ROUND`).
//! - Range built-ins rewrite to ALLCAPS Rhai function names (e.g.
//!   `SUM_RANGE`).
//! - If you add a new built-in range function, update `RANGE_BUILTINS` and
//!   register its implementation in `register_builtins`.

use crate::engine::{Cell, CellRef, CellType, Grid, preprocess_formula};
use regex::Regex;
use rhai::{Dynamic, Engine, NativeCallContext};
use std::sync::OnceLock;

pub struct RangeBuiltin {
    pub sheet_name: &'static str,
    pub rhai_name: &'static str,
    #[allow(dead_code)]
    pub description: &'static str,
}

pub const RANGE_BUILTINS: &[RangeBuiltin] = &[RangeBuiltin {
    sheet_name: "SUM",
    rhai_name: "SUM_RANGE",
    description: "Sum of numeric values in a cell range, blanks skipped",
}];

/// Regex that matches built-in range calls like `SUM(B4:E4)`.
///
/// Captures:
/// - group 1: function name (e.g. `SUM`)
/// - group 2: start cell ref (e.g. `B4`)
/// - group 3: end cell ref (e.g. `E4`)
pub fn range_fn_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let names = RANGE_BUILTINS
            .iter()
            .map(|b| b.sheet_name)
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(
            r"\b({})\(\$?([A-Za-z]+\$?[0-9]+):\$?([A-Za-z]+\$?[0-9]+)\)",
            names
        ))
        .expect("built-in range regex must compile")
    })
}

pub fn range_rhai_name(sheet_name: &str) -> Option<&'static str> {
    RANGE_BUILTINS
        .iter()
        .find(|b| b.sheet_name == sheet_name)
        .map(|b| b.rhai_name)
}

fn eval_script_cell(ctx: &NativeCallContext, script: &str) -> Option<Dynamic> {
    // `script` is stored without the leading '='.
    let processed = preprocess_formula(script);
    ctx.engine().eval::<Dynamic>(&processed).ok()
}

fn numeric(value: &Dynamic) -> Option<f64> {
    if let Ok(n) = value.as_float() {
        return Some(n);
    }
    if let Ok(n) = value.as_int() {
        return Some(n as f64);
    }
    None
}

fn cell_at(grid: &Grid, col: i64, row: i64) -> Option<Cell> {
    let col = usize::try_from(col).ok()?;
    let row = usize::try_from(row).ok()?;
    grid.get(&CellRef::new(col, row)).map(|c| c.clone())
}

/// Numeric cell value: blanks and text coerce to 0, formula cells are
/// evaluated recursively.
fn cell_number(ctx: &NativeCallContext, grid: &Grid, col: i64, row: i64) -> f64 {
    let Some(cell) = cell_at(grid, col, row) else {
        return 0.0;
    };
    match &cell.contents {
        CellType::Number(n) => *n,
        CellType::Script(s) => eval_script_cell(ctx, s)
            .as_ref()
            .and_then(numeric)
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Raw cell value: numbers stay numbers, text stays text, blanks are the
/// empty string so `<>""` guards behave like the spreadsheet original.
fn cell_value(ctx: &NativeCallContext, grid: &Grid, col: i64, row: i64) -> Dynamic {
    let Some(cell) = cell_at(grid, col, row) else {
        return Dynamic::from("");
    };
    match &cell.contents {
        CellType::Number(n) => Dynamic::from(*n),
        CellType::Text(s) => Dynamic::from(s.clone()),
        CellType::Script(s) => eval_script_cell(ctx, s).unwrap_or_else(|| Dynamic::from("")),
        CellType::Empty => Dynamic::from(""),
    }
}

/// Round half away from zero, the mode the whole engine uses.
fn round_half_away(value: f64, digits: i64) -> f64 {
    let factor = 10f64.powi(digits.clamp(-12, 12) as i32);
    (value * factor).round() / factor
}

/// Register the formula built-ins on a Rhai engine.
pub fn register_builtins(engine: &mut Engine, grid: Grid) {
    {
        let grid = grid.clone();
        engine.register_fn("CELL", move |ctx: NativeCallContext, col: i64, row: i64| {
            cell_number(&ctx, &grid, col, row)
        });
    }

    {
        let grid = grid.clone();
        engine.register_fn("VALUE", move |ctx: NativeCallContext, col: i64, row: i64| {
            cell_value(&ctx, &grid, col, row)
        });
    }

    {
        let grid = grid.clone();
        engine.register_fn(
            "SUM_RANGE",
            move |ctx: NativeCallContext, c1: i64, r1: i64, c2: i64, r2: i64| {
                let (c1, c2) = (c1.min(c2), c1.max(c2));
                let (r1, r2) = (r1.min(r2), r1.max(r2));
                let mut sum = 0.0;
                for row in r1..=r2 {
                    for col in c1..=c2 {
                        let Some(cell) = cell_at(&grid, col, row) else {
                            continue;
                        };
                        match &cell.contents {
                            CellType::Number(n) => sum += n,
                            CellType::Script(s) => {
                                if let Some(n) = eval_script_cell(&ctx, s).as_ref().and_then(numeric)
                                {
                                    sum += n;
                                }
                            }
                            _ => {}
                        }
                    }
                }
                sum
            },
        );
    }

    engine.register_fn("ROUND", round_half_away);
    engine.register_fn("ROUND", |value: i64, digits: i64| {
        round_half_away(value as f64, digits)
    });

    engine.register_fn("IF", |cond: bool, then_value: Dynamic, else_value: Dynamic| {
        if cond { then_value } else { else_value }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{create_engine, eval_formula};

    fn new_grid() -> Grid {
        std::sync::Arc::new(dashmap::DashMap::new())
    }

    #[test]
    fn test_round_half_away() {
        assert_eq!(round_half_away(2.5, 0), 3.0);
        assert_eq!(round_half_away(-2.5, 0), -3.0);
        assert_eq!(round_half_away(66.666_666, 0), 67.0);
        // 1.25 and 12.5 are exactly representable, so the half-case is real.
        assert_eq!(round_half_away(1.25, 1), 1.3);
    }

    #[test]
    fn test_sum_skips_blanks_and_text() {
        let grid = new_grid();
        grid.insert(CellRef::new(1, 0), Cell::new_number(10.0));
        grid.insert(CellRef::new(2, 0), Cell::new_text("n/a"));
        grid.insert(CellRef::new(4, 0), Cell::new_number(5.0));
        let engine = create_engine(grid);
        let result = eval_formula(&engine, "SUM(B1:E1)").unwrap();
        assert_eq!(result.as_float().unwrap(), 15.0);
    }

    #[test]
    fn test_nested_formula_cells_evaluate_recursively() {
        let grid = new_grid();
        grid.insert(CellRef::new(0, 0), Cell::new_number(2.0));
        grid.insert(CellRef::new(1, 0), Cell::new_script("A1*3"));
        grid.insert(CellRef::new(2, 0), Cell::new_script("SUM(A1:B1)"));
        let engine = create_engine(grid);
        let result = eval_formula(&engine, "C1+1").unwrap();
        assert_eq!(result.as_float().unwrap(), 9.0);
    }

    #[test]
    fn test_blank_guard_semantics() {
        let grid = new_grid();
        grid.insert(CellRef::new(1, 3), Cell::new_number(0.25));
        let engine = create_engine(grid);

        let filled = eval_formula(&engine, r#"IF(B4<>"", 1, "")"#).unwrap();
        assert_eq!(filled.as_int().unwrap(), 1);

        // C4 was never written: the guard must see blank and return blank.
        let blank = eval_formula(&engine, r#"IF(C4<>"", 1, "")"#).unwrap();
        assert_eq!(blank.into_string().unwrap(), "");
    }
}
