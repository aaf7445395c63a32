//! Allocation engine API.
//!
//! This module provides the core computation engine for distribution
//! statements:
//!
//! - [`Money`], [`Share`] - Currency and ownership-fraction types
//! - [`allocate`] - Remainder-safe proportional allocation
//! - [`Distribution`], [`Statement`] - Statement inputs and derived results
//! - [`Cell`], [`CellType`], [`Grid`] - Data structures for cell storage
//! - [`CellRef`], [`CellRange`] - Cell reference parsing and formatting
//! - [`preprocess_formula`] - Transform emitted formulas for Rhai evaluation
//! - [`create_engine`] - Create a Rhai engine with built-in functions
//! - [`format_dynamic`] - Format values for display

mod allocate;
mod cell;
mod cell_ref;
mod error;
mod eval;
mod format;
mod formula;
mod money;
mod preprocess;
mod share;
mod statement;

pub use allocate::allocate;
pub use cell::{Cell, CellType, Grid};
pub use cell_ref::{CellRange, CellRef};
pub use error::AllocationError;
pub use eval::{create_engine, eval_formula};
pub use format::{format_dynamic, format_number, format_percent, group_thousands};
pub use formula::{
    allocation_formula, balance_formula, expense_total_formula, row_total_formula,
};
pub use money::Money;
pub use preprocess::preprocess_formula;
pub use share::{SHARE_SUM_TOLERANCE, Share};
pub use statement::{
    Distribution, EXPENSE_ROW_COUNT, ExpenseCategory, ExpenseEntries, ExpenseSlot,
    MAX_OTHER_SLOTS, Party, PartyOutcome, Statement, StatementTotals,
};

pub use rhai::Dynamic;
