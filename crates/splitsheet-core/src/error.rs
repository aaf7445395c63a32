//! Error types for splitsheet core.

use thiserror::Error;

use splitsheet_engine::engine::AllocationError;

/// Errors that can occur while building or exporting worksheets.
#[derive(Error, Debug)]
pub enum SplitsheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("formula evaluation failed at {cell}: {message}")]
    Eval { cell: String, message: String },

    #[error("recalculated value at {cell} is {computed}, expected {expected}")]
    RecalcMismatch {
        cell: String,
        computed: String,
        expected: String,
    },

    #[error("worksheet needs at least one party")]
    NoParties,
}

pub type Result<T> = std::result::Result<T, SplitsheetError>;
