//! Cell positions and A1 notation.
//!
//! Provides bidirectional conversion between spreadsheet-style references
//! (e.g., "A1", "B2", "AA100") and zero-indexed row/column coordinates.
//!
//! # Examples
//!
//! ```
//! use cellgraph_engine::engine::Position;
//!
//! let pos = Position::from_a1("B3").unwrap();
//! assert_eq!(pos.col, 1);  // 0-indexed
//! assert_eq!(pos.row, 2);
//! assert_eq!(pos.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Number of addressable rows.
pub const MAX_ROWS: usize = 16384;
/// Number of addressable columns.
pub const MAX_COLS: usize = 16384;

/// A cell coordinate (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    /// Whether the position lies inside the addressable grid.
    pub fn is_valid(&self) -> bool {
        self.row < MAX_ROWS && self.col < MAX_COLS
    }

    /// Parse a position from spreadsheet notation (e.g., "A1", "b2", "AA10").
    ///
    /// Returns None if the input is malformed or its coordinates overflow.
    /// Well-formed references beyond the grid bounds parse to an invalid
    /// position; check [`Position::is_valid`] separately.
    pub fn from_a1(name: &str) -> Option<Position> {
        let caps = a1_re().captures(name)?;
        let letters = &caps["letters"];
        let numbers = &caps["numbers"];

        let mut col_acc = 0usize;
        for c in letters.to_ascii_uppercase().bytes() {
            let digit = (c - b'A') as usize + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
        }
        let col = col_acc.checked_sub(1)?;

        let row = numbers.parse::<usize>().ok()?.checked_sub(1)?;

        Some(Position::new(row, col))
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
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
}

fn a1_re() -> &'static Regex {
    static A1_RE: OnceLock<Regex> = OnceLock::new();
    A1_RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$")
            .expect("A1 reference regex must compile")
    })
}

impl std::str::FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_a1(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Position::col_to_letters(self.col), self.row as u128 + 1)
    }
}

/// Extent of a rectangular region anchored at A1.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub rows: usize,
    pub cols: usize,
}
