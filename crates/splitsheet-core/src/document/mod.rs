//! Worksheet document model.

mod layout;
mod worksheet;

pub use layout::SheetLayout;
pub use worksheet::{Mode, Worksheet, verify_modes};
