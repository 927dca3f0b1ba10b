//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style cell references
//! (e.g., "A1", "B2", "AA100") and zero-indexed row/column coordinates, plus the
//! fixed bounds every sheet address is validated against.
//!
//! # Examples
//!
//! ```
//! use cellgraph_engine::engine::CellRef;
//!
//! let cell = CellRef::parse_a1("B3").unwrap();
//! assert_eq!(cell.col, 1); // 0-indexed
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Number of addressable rows.
pub const MAX_ROWS: usize = 16384;
/// Number of addressable columns (A..XFD).
pub const MAX_COLS: usize = 16384;

/// A reference to a cell by row and column indices (0-indexed).
///
/// Ordering is row-major: `(row, col)` lexicographic.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    /// A reference that can never be valid. Produced for references whose
    /// coordinates do not even fit in a `usize`.
    pub const INVALID: CellRef = CellRef {
        row: usize::MAX,
        col: usize::MAX,
    };

    pub fn new(row: usize, col: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Whether this reference lies inside the sheet bounds.
    pub fn is_valid(&self) -> bool {
        self.row < MAX_ROWS && self.col < MAX_COLS
    }

    /// Parse a cell reference from spreadsheet notation (e.g., "A1", "b2", "AA10").
    ///
    /// Returns None if the input is malformed or its coordinates overflow. A
    /// well-formed reference beyond [`MAX_ROWS`]/[`MAX_COLS`] is returned as-is;
    /// callers decide what an out-of-bounds reference means.
    pub fn parse_a1(name: &str) -> Option<CellRef> {
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

        Some(CellRef::new(row, col))
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
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$").expect("static A1 pattern")
    })
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            CellRef::col_to_letters(self.col),
            self.row as u128 + 1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_a1_single_letter_columns() {
        assert_eq!(CellRef::parse_a1("A1"), Some(CellRef::new(0, 0)));
        assert_eq!(CellRef::parse_a1("B1"), Some(CellRef::new(0, 1)));
        assert_eq!(CellRef::parse_a1("Z1"), Some(CellRef::new(0, 25)));
    }

    #[test]
    fn test_parse_a1_multi_letter_columns_and_rows() {
        assert_eq!(CellRef::parse_a1("AA1").unwrap().col, 26);
        assert_eq!(CellRef::parse_a1("AZ1").unwrap().col, 51);
        assert_eq!(CellRef::parse_a1("BA1").unwrap().col, 52);
        assert_eq!(CellRef::parse_a1("A100").unwrap().row, 99);
        assert_eq!(CellRef::parse_a1("xfd1").unwrap().col, MAX_COLS - 1);
    }

    #[test]
    fn test_parse_a1_invalid_inputs() {
        assert!(CellRef::parse_a1("").is_none());
        assert!(CellRef::parse_a1("123").is_none());
        assert!(CellRef::parse_a1("ABC").is_none());
        assert!(CellRef::parse_a1("A0").is_none());
        assert!(CellRef::parse_a1("1A").is_none());
        assert!(CellRef::parse_a1("A 1").is_none());
    }

    #[test]
    fn test_parse_a1_overflow_returns_none() {
        let huge = format!("{}1", "Z".repeat(40));
        assert!(CellRef::parse_a1(&huge).is_none());
    }

    #[test]
    fn test_out_of_bounds_reference_parses_but_is_invalid() {
        let far = CellRef::parse_a1("XFE1").unwrap();
        assert!(!far.is_valid());
        let deep = CellRef::parse_a1("A16385").unwrap();
        assert!(!deep.is_valid());
        assert!(CellRef::parse_a1("A16384").unwrap().is_valid());
        assert!(!CellRef::INVALID.is_valid());
    }

    #[test]
    fn test_ordering_is_row_major() {
        let mut refs = vec![
            CellRef::new(1, 0),
            CellRef::new(0, 5),
            CellRef::new(0, 1),
        ];
        refs.sort();
        assert_eq!(
            refs,
            vec![CellRef::new(0, 1), CellRef::new(0, 5), CellRef::new(1, 0)]
        );
    }

    #[test]
    fn test_display_round_trips() {
        for name in ["A1", "Z9", "AA10", "XFD16384"] {
            assert_eq!(CellRef::parse_a1(name).unwrap().to_string(), name);
        }
        assert!(!CellRef::INVALID.to_string().is_empty());
    }
}
