//! Worksheet export formats.

pub mod csv;
pub mod md;
pub mod sheet;

pub use csv::{csv_content, write_csv};
pub use md::{markdown_content, write_markdown};
pub use sheet::{sheet_content, write_sheet};
