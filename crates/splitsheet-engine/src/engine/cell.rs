//! Cell data structures for the statement grid.
//!
//! - [`CellType`] - The type of content in a cell (empty, text, number, or
//!   formula)
//! - [`Cell`] - A cell in the sparse grid
//! - [`Grid`] - Thread-safe sparse storage (backed by `DashMap`), shared
//!   with the formula evaluator's builtins

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::cell_ref::CellRef;

/// The type of content stored in a cell.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CellType {
    Empty,
    Text(String),
    Number(f64),
    Script(String),
}

/// A cell in the statement grid.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cell {
    pub contents: CellType,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell {
            contents: CellType::Empty,
        }
    }

    pub fn new_text(text: &str) -> Cell {
        Cell {
            contents: CellType::Text(text.to_string()),
        }
    }

    pub fn new_number(n: f64) -> Cell {
        Cell {
            contents: CellType::Number(n),
        }
    }

    /// A formula cell. The script is stored without the leading '='.
    pub fn new_script(script: &str) -> Cell {
        Cell {
            contents: CellType::Script(script.to_string()),
        }
    }

    /// The cell content as it would be typed: formulas get a leading '='.
    pub fn to_input_string(&self) -> String {
        match &self.contents {
            CellType::Empty => String::new(),
            CellType::Text(s) => s.clone(),
            CellType::Number(n) => n.to_string(),
            CellType::Script(s) => format!("={}", s),
        }
    }
}

/// Thread-safe sparse grid storage (DashMap is internally Arc-based,
/// clones are cheap).
pub type Grid = Arc<DashMap<CellRef, Cell>>;
