//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style cell
//! references (e.g., "A1", "B2", "AA100") and zero-indexed column/row
//! coordinates, plus the absolute (`$B$1`) and range (`B4:E4`) spellings
//! the emitted formulas use.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// A reference to a cell by column and row indices (0-indexed).
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell reference from spreadsheet notation (e.g., "A1", "B2",
    /// "AA10"). Leading `$` markers are accepted and ignored. Returns None
    /// if the input is invalid.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        Self::parse_a1(name)
    }

    fn parse_a1(name: &str) -> Option<CellRef> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"^\$?(?<letters>[A-Za-z]+)\$?(?<numbers>[0-9]+)$")
                .expect("cell reference regex must compile")
        });
        let caps = re.captures(name)?;
        let letters = &caps["letters"];
        let numbers = &caps["numbers"];

        let mut col_acc = 0usize;
        for c in letters.to_ascii_uppercase().bytes() {
            let digit = (c - b'A') as usize + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
        }
        let col = col_acc.checked_sub(1)?;

        let row = numbers.parse::<usize>().ok()?.checked_sub(1)?;

        Some(CellRef::new(col, row))
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z,
    /// 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }

    /// Absolute spelling with `$` markers, e.g. `$B$1`.
    pub fn to_absolute(&self) -> String {
        format!("${}${}", CellRef::col_to_letters(self.col), self.row + 1)
    }
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row + 1)
    }
}

/// An inclusive rectangular cell range, e.g. `B4:E4`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CellRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl CellRange {
    pub fn new(start: CellRef, end: CellRef) -> CellRange {
        CellRange { start, end }
    }

    /// A horizontal run of cells on one row.
    pub fn row_span(row: usize, first_col: usize, last_col: usize) -> CellRange {
        CellRange::new(CellRef::new(first_col, row), CellRef::new(last_col, row))
    }

    /// A vertical run of cells in one column.
    pub fn col_span(col: usize, first_row: usize, last_row: usize) -> CellRange {
        CellRange::new(CellRef::new(col, first_row), CellRef::new(col, last_row))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::{CellRange, CellRef};

    #[test]
    fn test_parse_round_trip() {
        let cell = CellRef::from_str("B3").unwrap();
        assert_eq!(cell.col, 1);
        assert_eq!(cell.row, 2);
        assert_eq!(cell.to_string(), "B3");
    }

    #[test]
    fn test_parse_absolute_markers() {
        assert_eq!(CellRef::from_str("$B$1"), Some(CellRef::new(1, 0)));
        assert_eq!(CellRef::from_str("$AA10"), Some(CellRef::new(26, 9)));
    }

    #[test]
    fn test_to_absolute() {
        assert_eq!(CellRef::new(1, 0).to_absolute(), "$B$1");
    }

    #[test]
    fn test_parse_a1_overflow_returns_none() {
        let huge = format!("{}1", "Z".repeat(40));
        assert!(CellRef::from_str(&huge).is_none());
    }

    #[test]
    fn test_range_display() {
        assert_eq!(CellRange::row_span(3, 1, 4).to_string(), "B4:E4");
        assert_eq!(CellRange::col_span(1, 7, 19).to_string(), "B8:B20");
    }
}
