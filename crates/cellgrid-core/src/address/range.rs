//! Address range types
//!
//! - [`SheetRef`] - the worksheet qualifier of a reference, or the broken `#REF!` marker
//! - [`AddressRange`] - one rectangular, optionally qualified range (e.g. `'Data'!$A$1:B10`)
//! - [`Addresses`] - a single range or a comma-separated list of ranges

use std::fmt;
use std::str::FromStr;

use super::format;
use super::parse;
use super::shift::{delete_span, insert_span, ShiftMode, Span};
use crate::cell::CellAddress;
use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS, REF_ERROR};

/// Worksheet qualifier of a reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SheetRef {
    /// A worksheet by name
    Named(String),
    /// The referenced worksheet no longer exists (`#REF!`)
    BrokenRef,
}

impl SheetRef {
    /// Create a named qualifier
    pub fn named(name: impl Into<String>) -> Self {
        SheetRef::Named(name.into())
    }

    /// The worksheet name, if not broken
    pub fn name(&self) -> Option<&str> {
        match self {
            SheetRef::Named(name) => Some(name),
            SheetRef::BrokenRef => None,
        }
    }

    /// Whether this is the broken-reference marker
    pub fn is_broken(&self) -> bool {
        matches!(self, SheetRef::BrokenRef)
    }

    /// Case-insensitive comparison with a worksheet name
    pub fn matches(&self, name: &str) -> bool {
        match self {
            SheetRef::Named(own) => own.to_lowercase() == name.to_lowercase(),
            SheetRef::BrokenRef => false,
        }
    }

    /// Whether two qualifiers denote the same worksheet
    pub fn same_sheet(&self, other: &SheetRef) -> bool {
        match (self, other) {
            (SheetRef::Named(a), _) => other.matches(a),
            (SheetRef::BrokenRef, SheetRef::BrokenRef) => true,
            (SheetRef::BrokenRef, SheetRef::Named(_)) => false,
        }
    }
}

impl fmt::Display for SheetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetRef::Named(name) => f.write_str(name),
            SheetRef::BrokenRef => f.write_str(REF_ERROR),
        }
    }
}

/// A rectangular range of cells, optionally qualified with a worksheet and workbook
///
/// Corners are 1-based and normalized so that `start` is the top-left and `end` the
/// bottom-right corner. Each corner carries its own `$` flags. Full-column ranges
/// (`A:A`) span rows `1..=MAX_ROWS`; full-row ranges (`1:1`) span columns `1..=MAX_COLS`.
///
/// The rewrite operations ([`insert_rows`](Self::insert_rows) and friends) return a new
/// range, or `None` when the edit leaves nothing of the range.
///
/// # Example
///
/// ```
/// use cellgrid_core::{AddressRange, ShiftMode};
///
/// let range = AddressRange::parse("Sheet1!C3:E5").unwrap();
/// let moved = range.insert_rows(2, 3, ShiftMode::All).unwrap();
/// assert_eq!(moved.to_full_text(), "'Sheet1'!C6:E8");
/// assert!(range.delete_rows(2, 4, ShiftMode::All).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddressRange {
    start: CellAddress,
    end: CellAddress,
    worksheet: Option<SheetRef>,
    workbook: Option<String>,
}

impl AddressRange {
    /// Create a range from two corners, normalizing their order
    pub fn from_corners(start: CellAddress, end: CellAddress) -> Self {
        let (start_row, end_row, start_row_fixed, end_row_fixed) = if start.row <= end.row {
            (start.row, end.row, start.row_fixed, end.row_fixed)
        } else {
            (end.row, start.row, end.row_fixed, start.row_fixed)
        };
        let (start_col, end_col, start_col_fixed, end_col_fixed) = if start.col <= end.col {
            (start.col, end.col, start.col_fixed, end.col_fixed)
        } else {
            (end.col, start.col, end.col_fixed, start.col_fixed)
        };

        Self {
            start: CellAddress::with_fixed(start_row, start_col, start_row_fixed, start_col_fixed),
            end: CellAddress::with_fixed(end_row, end_col, end_row_fixed, end_col_fixed),
            worksheet: None,
            workbook: None,
        }
    }

    /// Create a relative range from numeric corners
    pub fn new(from_row: u32, from_col: u16, to_row: u32, to_col: u16) -> Self {
        Self::from_corners(
            CellAddress::new(from_row, from_col),
            CellAddress::new(to_row, to_col),
        )
    }

    /// Create a single-cell range
    pub fn cell(row: u32, col: u16) -> Self {
        Self::new(row, col, row, col)
    }

    /// Create a full-column range (`B:D`)
    pub fn full_columns(from_col: u16, to_col: u16) -> Self {
        Self::new(1, from_col, MAX_ROWS, to_col)
    }

    /// Create a full-row range (`2:4`)
    pub fn full_rows(from_row: u32, to_row: u32) -> Self {
        Self::new(from_row, 1, to_row, MAX_COLS)
    }

    /// Set the worksheet qualifier
    pub fn with_worksheet(mut self, name: impl Into<String>) -> Self {
        self.worksheet = Some(SheetRef::Named(name.into()));
        self
    }

    /// Set or clear the worksheet qualifier
    pub fn with_sheet_ref(mut self, sheet: Option<SheetRef>) -> Self {
        self.worksheet = sheet;
        self
    }

    /// Set the workbook qualifier
    pub fn with_workbook(mut self, name: impl Into<String>) -> Self {
        self.workbook = Some(name.into());
        self
    }

    /// Set or clear the workbook qualifier
    pub fn with_workbook_name(mut self, name: Option<String>) -> Self {
        self.workbook = name;
        self
    }

    /// Set the four `$` flags
    pub fn with_fixed(
        mut self,
        from_row_fixed: bool,
        from_col_fixed: bool,
        to_row_fixed: bool,
        to_col_fixed: bool,
    ) -> Self {
        self.start.row_fixed = from_row_fixed;
        self.start.col_fixed = from_col_fixed;
        self.end.row_fixed = to_row_fixed;
        self.end.col_fixed = to_col_fixed;
        self
    }

    /// Parse a single range such as `A1`, `$A$1:B2`, `Sheet1!A:A` or `'My Sheet'!1:3`
    ///
    /// A comma-separated list is rejected; use [`Addresses::parse`] for those.
    pub fn parse(text: &str) -> Result<Self> {
        match Addresses::parse(text)? {
            Addresses::Single(range) => Ok(range),
            Addresses::List(_) => Err(Error::InvalidRange(format!(
                "expected a single range, got a list in '{}'",
                text
            ))),
        }
    }

    // === Accessors ===

    /// Top-left corner
    pub fn start(&self) -> CellAddress {
        self.start
    }

    /// Bottom-right corner
    pub fn end(&self) -> CellAddress {
        self.end
    }

    pub fn from_row(&self) -> u32 {
        self.start.row
    }

    pub fn from_col(&self) -> u16 {
        self.start.col
    }

    pub fn to_row(&self) -> u32 {
        self.end.row
    }

    pub fn to_col(&self) -> u16 {
        self.end.col
    }

    /// Worksheet qualifier
    pub fn worksheet(&self) -> Option<&SheetRef> {
        self.worksheet.as_ref()
    }

    /// Worksheet name, if qualified and not broken
    pub fn worksheet_name(&self) -> Option<&str> {
        self.worksheet.as_ref().and_then(|s| s.name())
    }

    /// Workbook qualifier
    pub fn workbook(&self) -> Option<&str> {
        self.workbook.as_deref()
    }

    /// Whether the worksheet qualifier is `#REF!`
    pub fn is_broken(&self) -> bool {
        self.worksheet.as_ref().is_some_and(|s| s.is_broken())
    }

    /// Number of rows covered
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Number of columns covered
    pub fn col_count(&self) -> u16 {
        self.end.col - self.start.col + 1
    }

    /// Whether the range is a single cell
    pub fn is_single_cell(&self) -> bool {
        self.start.row == self.end.row && self.start.col == self.end.col
    }

    /// Whether the range spans every row (`A:A`)
    pub fn is_full_column(&self) -> bool {
        self.start.row == 1 && self.end.row == MAX_ROWS
    }

    /// Whether the range spans every column (`1:1`)
    pub fn is_full_row(&self) -> bool {
        self.start.col == 1 && self.end.col == MAX_COLS
    }

    /// Check if a cell is within this range
    pub fn contains(&self, row: u32, col: u16) -> bool {
        row >= self.start.row && row <= self.end.row && col >= self.start.col && col <= self.end.col
    }

    /// Check if this range overlaps with another
    pub fn overlaps(&self, other: &AddressRange) -> bool {
        self.start.row <= other.end.row
            && self.end.row >= other.start.row
            && self.start.col <= other.end.col
            && self.end.col >= other.start.col
    }

    /// Whether the corners are ordered and inside the sheet
    pub fn is_valid_row_col(&self) -> bool {
        self.start.row <= self.end.row
            && self.start.col <= self.end.col
            && self.start.is_valid()
            && self.end.is_valid()
    }

    // === Text ===

    /// Address without qualifiers (`$A$1:B2`, `A:A`, `1:1`)
    pub fn to_text(&self) -> String {
        format::local_text(self)
    }

    /// Address with workbook and worksheet qualifiers (`'Sheet1'!A1:B2`)
    pub fn to_full_text(&self) -> String {
        format::qualified_text(self, self.workbook(), self.worksheet())
    }

    // === Structural rewrites ===

    fn row_span(&self) -> Span {
        Span::new(self.start.row, self.end.row, self.start.row_fixed, self.end.row_fixed)
    }

    fn col_span(&self) -> Span {
        Span::new(
            self.start.col as u32,
            self.end.col as u32,
            self.start.col_fixed,
            self.end.col_fixed,
        )
    }

    /// Rebuild from rewritten corners, which may arrive reversed
    fn rebuilt(&self, start: CellAddress, end: CellAddress) -> Self {
        let mut range = Self::from_corners(start, end);
        range.worksheet = self.worksheet.clone();
        range.workbook = self.workbook.clone();
        range
    }

    fn with_rows(&self, (from, to): (u32, u32)) -> Self {
        self.rebuilt(
            CellAddress { row: from, ..self.start },
            CellAddress { row: to, ..self.end },
        )
    }

    fn with_cols(&self, (from, to): (u32, u32)) -> Self {
        self.rebuilt(
            CellAddress { col: from as u16, ..self.start },
            CellAddress { col: to as u16, ..self.end },
        )
    }

    /// Rewrite for `count` rows inserted at `at_row`
    ///
    /// Returns `None` when the range is pushed entirely beyond the last row. Full-column
    /// ranges are unaffected.
    pub fn insert_rows(&self, at_row: u32, count: u32, mode: ShiftMode) -> Option<Self> {
        if self.is_full_column() {
            return Some(self.clone());
        }
        insert_span(self.row_span(), at_row, count, MAX_ROWS, mode).map(|span| self.with_rows(span))
    }

    /// Rewrite for `count` rows deleted starting at `from_row`
    ///
    /// Returns `None` when every row of the range is deleted.
    pub fn delete_rows(&self, from_row: u32, count: u32, mode: ShiftMode) -> Option<Self> {
        let span = delete_span(self.row_span(), from_row, count, MAX_ROWS, mode)?;
        if self.is_full_column() {
            return Some(self.clone());
        }
        Some(self.with_rows(span))
    }

    /// Rewrite for `count` columns inserted at `at_col`
    ///
    /// Returns `None` when the range is pushed entirely beyond the last column. Full-row
    /// ranges are unaffected.
    pub fn insert_columns(&self, at_col: u16, count: u16, mode: ShiftMode) -> Option<Self> {
        if self.is_full_row() {
            return Some(self.clone());
        }
        insert_span(self.col_span(), at_col as u32, count as u32, MAX_COLS as u32, mode)
            .map(|span| self.with_cols(span))
    }

    /// Rewrite for `count` columns deleted starting at `from_col`
    ///
    /// Returns `None` when every column of the range is deleted.
    pub fn delete_columns(&self, from_col: u16, count: u16, mode: ShiftMode) -> Option<Self> {
        let span = delete_span(self.col_span(), from_col as u32, count as u32, MAX_COLS as u32, mode)?;
        if self.is_full_row() {
            return Some(self.clone());
        }
        Some(self.with_cols(span))
    }

    /// Rename the worksheet qualifier when it matches `old` (case-insensitive)
    ///
    /// A `new` of `None` marks the worksheet as deleted, turning the qualifier into `#REF!`.
    pub fn change_worksheet(&self, old: &str, new: Option<&str>) -> Self {
        let mut range = self.clone();
        if range.worksheet.as_ref().is_some_and(|s| s.matches(old)) {
            range.worksheet = Some(match new {
                Some(name) => SheetRef::Named(name.to_string()),
                None => SheetRef::BrokenRef,
            });
        }
        range
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_full_text())
    }
}

impl FromStr for AddressRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A parsed address: one range, or a comma-separated list of ranges
///
/// A list is a multi-area reference on a single worksheet; it always holds at least two
/// ranges.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Addresses {
    Single(AddressRange),
    List(Vec<AddressRange>),
}

impl Addresses {
    /// Parse an address such as `A1:B2` or `Sheet1!C3,D4,E5`
    ///
    /// # Examples
    /// ```
    /// use cellgrid_core::Addresses;
    ///
    /// let addresses = Addresses::parse("Sheet!C3,Sheet2!D4,Sheet3!E5").unwrap();
    /// assert_eq!(addresses.len(), 3);
    /// assert_eq!(addresses.to_full_text(), "'Sheet'!C3,'Sheet'!D4,'Sheet'!E5");
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        parse::parse_addresses(text)
    }

    /// Build from a list of ranges; `None` when the list is empty
    pub fn from_ranges(mut ranges: Vec<AddressRange>) -> Option<Self> {
        match ranges.len() {
            0 => None,
            1 => ranges.pop().map(Addresses::Single),
            _ => Some(Addresses::List(ranges)),
        }
    }

    /// All ranges in order
    pub fn ranges(&self) -> &[AddressRange] {
        match self {
            Addresses::Single(range) => std::slice::from_ref(range),
            Addresses::List(ranges) => ranges,
        }
    }

    /// The sibling list of a multi-area address, empty for a single range
    pub fn addresses(&self) -> &[AddressRange] {
        match self {
            Addresses::Single(_) => &[],
            Addresses::List(ranges) => ranges,
        }
    }

    /// The first range
    pub fn first(&self) -> &AddressRange {
        &self.ranges()[0]
    }

    /// Number of ranges
    pub fn len(&self) -> usize {
        self.ranges().len()
    }

    /// Always false; an `Addresses` holds at least one range
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether this is a multi-area list
    pub fn is_list(&self) -> bool {
        matches!(self, Addresses::List(_))
    }

    /// Worksheet qualifier of the first range
    pub fn worksheet(&self) -> Option<&SheetRef> {
        self.first().worksheet()
    }

    /// Whether any range contains the cell
    pub fn contains(&self, row: u32, col: u16) -> bool {
        self.ranges().iter().any(|r| r.contains(row, col))
    }

    /// Unqualified addresses joined with `,`
    pub fn to_text(&self) -> String {
        self.ranges()
            .iter()
            .map(|r| r.to_text())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Qualified addresses joined with `,`
    ///
    /// Each range uses its own worksheet qualifier, or the first range's when it has none.
    pub fn to_full_text(&self) -> String {
        let first = self.first();
        self.ranges()
            .iter()
            .map(|r| {
                let sheet = r.worksheet().or(first.worksheet());
                let workbook = r.workbook().or(first.workbook());
                format::qualified_text(r, workbook, sheet)
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Unqualified address of the first range
    pub fn to_first_range_text(&self) -> String {
        self.first().to_text()
    }

    fn rewrite(&self, f: impl Fn(&AddressRange) -> Option<AddressRange>) -> Option<Self> {
        match self {
            Addresses::Single(range) => f(range).map(Addresses::Single),
            Addresses::List(ranges) => Self::from_ranges(ranges.iter().filter_map(f).collect()),
        }
    }

    /// Rewrite every range for inserted rows, dropping ranges pushed off the sheet
    pub fn insert_rows(&self, at_row: u32, count: u32, mode: ShiftMode) -> Option<Self> {
        self.rewrite(|r| r.insert_rows(at_row, count, mode))
    }

    /// Rewrite every range for deleted rows, dropping fully deleted ranges
    pub fn delete_rows(&self, from_row: u32, count: u32, mode: ShiftMode) -> Option<Self> {
        self.rewrite(|r| r.delete_rows(from_row, count, mode))
    }

    /// Rewrite every range for inserted columns
    pub fn insert_columns(&self, at_col: u16, count: u16, mode: ShiftMode) -> Option<Self> {
        self.rewrite(|r| r.insert_columns(at_col, count, mode))
    }

    /// Rewrite every range for deleted columns
    pub fn delete_columns(&self, from_col: u16, count: u16, mode: ShiftMode) -> Option<Self> {
        self.rewrite(|r| r.delete_columns(from_col, count, mode))
    }

    /// Rename (or break, with `None`) every matching worksheet qualifier
    pub fn change_worksheet(&self, old: &str, new: Option<&str>) -> Self {
        match self {
            Addresses::Single(range) => Addresses::Single(range.change_worksheet(old, new)),
            Addresses::List(ranges) => Addresses::List(
                ranges.iter().map(|r| r.change_worksheet(old, new)).collect(),
            ),
        }
    }
}

impl From<AddressRange> for Addresses {
    fn from(range: AddressRange) -> Self {
        Addresses::Single(range)
    }
}

impl fmt::Display for Addresses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_full_text())
    }
}

impl FromStr for Addresses {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bounds(range: &AddressRange) -> (u32, u16, u32, u16) {
        (range.from_row(), range.from_col(), range.to_row(), range.to_col())
    }

    #[test]
    fn test_new_normalizes() {
        let range = AddressRange::new(5, 4, 2, 1);
        assert_eq!(bounds(&range), (2, 1, 5, 4));
        assert_eq!(range.row_count(), 4);
        assert_eq!(range.col_count(), 4);
    }

    #[test]
    fn test_from_corners_keeps_flags_with_coordinates() {
        let range = AddressRange::from_corners(
            CellAddress::with_fixed(5, 1, true, false),
            CellAddress::with_fixed(2, 3, false, true),
        );
        assert_eq!(range.start(), CellAddress::with_fixed(2, 1, false, false));
        assert_eq!(range.end(), CellAddress::with_fixed(5, 3, true, true));
    }

    #[test]
    fn test_contains() {
        let range = AddressRange::new(2, 2, 4, 4);
        assert!(range.contains(2, 2));
        assert!(range.contains(4, 4));
        assert!(range.contains(3, 3));
        assert!(!range.contains(1, 1));
        assert!(!range.contains(5, 2));
    }

    #[test]
    fn test_is_valid_row_col() {
        assert!(AddressRange::new(1, 1, MAX_ROWS, MAX_COLS).is_valid_row_col());
        assert!(!AddressRange::new(0, 1, 3, 3).is_valid_row_col());
        assert!(!AddressRange::new(1, 1, MAX_ROWS + 1, 3).is_valid_row_col());
        assert!(!AddressRange::new(1, 1, 3, MAX_COLS + 1).is_valid_row_col());
    }

    #[test]
    fn test_insert_rows() {
        let range = AddressRange::new(3, 3, 5, 5);
        let at = |row| bounds(&range.insert_rows(row, 3, ShiftMode::All).unwrap());
        assert_eq!(at(2), (6, 3, 8, 5));
        assert_eq!(at(4), (3, 3, 8, 5));
        assert_eq!(at(6), (3, 3, 5, 5));
    }

    #[test]
    fn test_delete_rows() {
        let range = AddressRange::new(3, 3, 5, 5);
        assert_eq!(bounds(&range.delete_rows(1, 2, ShiftMode::All).unwrap()), (1, 3, 3, 5));
        assert_eq!(bounds(&range.delete_rows(4, 1, ShiftMode::All).unwrap()), (3, 3, 4, 5));
        assert!(range.delete_rows(2, 4, ShiftMode::All).is_none());
    }

    #[test]
    fn test_column_rewrites() {
        let range = AddressRange::new(3, 3, 5, 5);
        assert_eq!(bounds(&range.insert_columns(1, 2, ShiftMode::All).unwrap()), (3, 5, 5, 7));
        assert_eq!(bounds(&range.delete_columns(4, 5, ShiftMode::All).unwrap()), (3, 3, 5, 3));
        assert!(range.delete_columns(1, 10, ShiftMode::All).is_none());
    }

    #[test]
    fn test_full_column_is_stable() {
        let range = AddressRange::full_columns(1, 1);
        for at in [0, 1, 50, MAX_ROWS, MAX_ROWS + 1] {
            assert_eq!(range.insert_rows(at, 10, ShiftMode::All), Some(range.clone()));
        }
        assert_eq!(range.delete_rows(5, 10, ShiftMode::All), Some(range.clone()));
        assert!(range.delete_rows(1, MAX_ROWS, ShiftMode::All).is_none());

        let shifted = range.insert_columns(1, 2, ShiftMode::All).unwrap();
        assert_eq!(shifted.to_text(), "C:C");
    }

    #[test]
    fn test_fixed_only_moves_fixed_corners() {
        let range = AddressRange::parse("A$3:B5").unwrap();
        let moved = range.insert_rows(1, 2, ShiftMode::FixedOnly).unwrap();
        assert_eq!(moved.to_text(), "A$5:B5");
        let moved = range.insert_rows(1, 2, ShiftMode::All).unwrap();
        assert_eq!(moved.to_text(), "A$5:B7");
    }

    #[test]
    fn test_fixed_only_keeps_flags_with_moved_corner() {
        let range = AddressRange::parse("A$3:A5").unwrap();
        let moved = range.insert_rows(1, 3, ShiftMode::FixedOnly).unwrap();
        assert_eq!(moved.to_text(), "A5:A$6");

        let range = AddressRange::parse("A3:A$5").unwrap();
        let moved = range.delete_rows(1, 4, ShiftMode::FixedOnly).unwrap();
        assert_eq!(moved.to_text(), "A$1:A3");

        let range = AddressRange::parse("$C1:E1").unwrap().with_worksheet("Data");
        let moved = range.insert_columns(1, 3, ShiftMode::FixedOnly).unwrap();
        assert_eq!(moved.to_full_text(), "'Data'!E1:$F1");

        let range = AddressRange::parse("C1:$E1").unwrap();
        let moved = range.delete_columns(1, 4, ShiftMode::FixedOnly).unwrap();
        assert_eq!(moved.to_text(), "$A1:C1");
    }

    #[test]
    fn test_insert_pushes_range_off_sheet() {
        let range = AddressRange::new(MAX_ROWS - 1, 1, MAX_ROWS, 1);
        assert!(range.insert_rows(2, 5, ShiftMode::All).is_none());
        assert!(range.insert_rows(2, 5, ShiftMode::Pinned).is_some());
    }

    #[test]
    fn test_change_worksheet() {
        let range = AddressRange::new(1, 1, 2, 2).with_worksheet("Data");
        let renamed = range.change_worksheet("DATA", Some("Input"));
        assert_eq!(renamed.worksheet_name(), Some("Input"));

        let untouched = range.change_worksheet("Other", Some("Input"));
        assert_eq!(untouched, range);

        let broken = range.change_worksheet("data", None);
        assert!(broken.is_broken());
        assert_eq!(broken.to_full_text(), "#REF!A1:B2");

        let unqualified = AddressRange::cell(1, 1).change_worksheet("Data", None);
        assert!(unqualified.worksheet().is_none());
    }

    #[test]
    fn test_list_rewrite_drops_deleted_members() {
        let list = Addresses::parse("A1:A2,C5,D10:D20").unwrap();
        let rewritten = list.delete_rows(1, 4, ShiftMode::All).unwrap();
        assert_eq!(rewritten.to_text(), "C1,D6:D16");

        let single = list.delete_rows(1, 9, ShiftMode::All).unwrap();
        assert!(!single.is_list());
        assert_eq!(single.to_text(), "D1:D11");

        assert!(list.delete_rows(1, 20, ShiftMode::All).is_none());
    }

    #[test]
    fn test_addresses_accessors() {
        let single = Addresses::parse("B2").unwrap();
        assert!(single.addresses().is_empty());
        assert_eq!(single.ranges().len(), 1);

        let list = Addresses::parse("C3,D4,E5").unwrap();
        assert_eq!(list.addresses().len(), 3);
        assert!(list.contains(4, 4));
        assert!(!list.contains(4, 3));
        assert_eq!(list.to_first_range_text(), "C3");
    }

    #[test]
    fn test_list_change_worksheet() {
        let list = Addresses::parse("'Old'!A1,B2").unwrap();
        let renamed = list.change_worksheet("old", Some("New"));
        assert_eq!(renamed.to_full_text(), "'New'!A1,'New'!B2");
        let broken = list.change_worksheet("Old", None);
        assert_eq!(broken.to_full_text(), "#REF!A1,#REF!B2");
    }
}
