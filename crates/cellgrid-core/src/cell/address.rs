//! Cell address type

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// One corner of a reference in A1 notation (`C7`, `$C$7`)
///
/// `row` and `col` hold the numbers exactly as written: row 1 is the first row and
/// column `A` is 1, up to `MAX_ROWS` and `MAX_COLS` (`XFD`). The two flags record
/// which coordinates carried a `$`, which decides how the corner reacts to
/// [`ShiftMode::FixedOnly`](crate::ShiftMode::FixedOnly) rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    /// Row number (1-based)
    pub row: u32,
    /// Column number (1-based, A=1, B=2, ..., XFD=16384)
    pub col: u16,
    /// Whether the row is `$`-fixed
    pub row_fixed: bool,
    /// Whether the column is `$`-fixed
    pub col_fixed: bool,
}

impl CellAddress {
    /// Create a new cell address with relative coordinates
    pub fn new(row: u32, col: u16) -> Self {
        Self {
            row,
            col,
            row_fixed: false,
            col_fixed: false,
        }
    }

    /// Create a new cell address with specified fixed flags
    pub fn with_fixed(row: u32, col: u16, row_fixed: bool, col_fixed: bool) -> Self {
        Self {
            row,
            col,
            row_fixed,
            col_fixed,
        }
    }

    /// Create a fully fixed cell address ($A$1 style)
    pub fn fixed(row: u32, col: u16) -> Self {
        Self::with_fixed(row, col, true, true)
    }

    /// Parse a cell address from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use cellgrid_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("A1").unwrap();
    /// assert_eq!(addr.row, 1);
    /// assert_eq!(addr.col, 1);
    ///
    /// let addr = CellAddress::parse("$B$2").unwrap();
    /// assert_eq!(addr.row, 2);
    /// assert_eq!(addr.col, 2);
    /// assert!(addr.row_fixed);
    /// assert!(addr.col_fixed);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        let col_fixed = if bytes.get(pos) == Some(&b'$') {
            pos += 1;
            true
        } else {
            false
        };

        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }

        if pos == col_start {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }

        let col = Self::letters_to_column(&s[col_start..pos])?;

        let row_fixed = if bytes.get(pos) == Some(&b'$') {
            pos += 1;
            true
        } else {
            false
        };

        let row_str = &s[pos..];
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }
        let row = Self::parse_row(row_str)?;

        Ok(Self {
            row,
            col,
            row_fixed,
            col_fixed,
        })
    }

    /// Parse a 1-based row number, checking it against the sheet limit
    pub fn parse_row(digits: &str) -> Result<u32> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "invalid row number '{}'",
                digits
            )));
        }
        let row: u64 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number '{}'", digits)))?;
        if row == 0 {
            return Err(Error::InvalidAddress("row number must be >= 1".into()));
        }
        if row > MAX_ROWS as u64 {
            return Err(Error::RowOutOfBounds(
                u32::try_from(row).unwrap_or(u32::MAX),
                MAX_ROWS,
            ));
        }
        Ok(row as u32)
    }

    /// Column letters for a column number (`1` is `A`, `28` is `AB`, `16384` is `XFD`)
    ///
    /// Zero yields an empty string.
    pub fn column_to_letters(col: u16) -> String {
        // bijective base 26: digits run 1..=26 with no zero
        let mut digits = [0u8; 4];
        let mut len = 0;
        let mut rest = col as u32;
        while rest > 0 {
            let digit = (rest - 1) % 26;
            digits[len] = b'A' + digit as u8;
            len += 1;
            rest = (rest - 1) / 26;
        }
        digits[..len].iter().rev().map(|&b| b as char).collect()
    }

    /// Convert column letters to a 1-based column number (A = 1, Z = 26, AA = 27, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
            if col > MAX_COLS as u32 {
                return Err(Error::ColumnOutOfBounds(col, MAX_COLS));
            }
        }

        Ok(col as u16)
    }

    /// Render in A1 notation, `$` markers included
    pub fn to_a1_string(&self) -> String {
        let dollar = |fixed: bool| if fixed { "$" } else { "" };
        format!(
            "{}{}{}{}",
            dollar(self.col_fixed),
            Self::column_to_letters(self.col),
            dollar(self.row_fixed),
            self.row
        )
    }

    /// Whether both coordinates are inside the sheet
    pub fn is_valid(&self) -> bool {
        (1..=MAX_ROWS).contains(&self.row) && (1..=MAX_COLS).contains(&self.col)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
