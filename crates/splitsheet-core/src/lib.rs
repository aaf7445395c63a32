//! splitsheet-core - UI-agnostic worksheet model + storage.

pub mod document;
pub mod error;
pub mod storage;

pub use document::{Mode, SheetLayout, Worksheet, verify_modes};
pub use error::{Result, SplitsheetError};

pub use splitsheet_engine::engine::CellRef;
