//! Two-level paged cell store
//!
//! Storage is an outer [`PagedAxis`] over rows whose slots own an inner [`PagedAxis`]
//! over columns. Only occupied pages exist, and every page and axis carries its occupied
//! bounds, so lookups, traversal and [`CellStore::dimension`] scale with the number of
//! stored cells rather than with the 1,048,576 x 16,384 grid.
//!
//! All coordinates are 1-based. Coordinates outside `1..=MAX_ROWS` / `1..=MAX_COLS`
//! are never an error: reads return nothing and writes are dropped.

use log::{debug, trace};

use super::axis::PagedAxis;
use super::iter::CellIter;
use crate::error::Result;
use crate::options::StoreOptions;
use crate::{MAX_COLS, MAX_ROWS};

type Row<T> = PagedAxis<T>;

/// Sparse matrix of `T` keyed by 1-based `(row, col)`
#[derive(Debug, Clone)]
pub struct CellStore<T> {
    rows: PagedAxis<Row<T>>,
    options: StoreOptions,
}

#[inline]
fn row_index(row: u32) -> Option<usize> {
    (1..=MAX_ROWS).contains(&row).then(|| (row - 1) as usize)
}

#[inline]
fn col_index(col: u16) -> Option<usize> {
    (1..=MAX_COLS).contains(&col).then(|| (col - 1) as usize)
}

impl<T> CellStore<T> {
    /// Create an empty store with the default page layout
    pub fn new() -> Self {
        Self::with_valid_options(StoreOptions::default())
    }

    /// Create an empty store with a custom page layout
    pub fn with_options(options: StoreOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::with_valid_options(options))
    }

    fn with_valid_options(options: StoreOptions) -> Self {
        Self {
            rows: PagedAxis::new(options.row_page_bits, MAX_ROWS as usize),
            options,
        }
    }

    /// Get the page layout
    pub fn options(&self) -> StoreOptions {
        self.options
    }

    // === Cell access ===

    /// Get a cell value
    pub fn get(&self, row: u32, col: u16) -> Option<&T> {
        let (ri, ci) = (row_index(row)?, col_index(col)?);
        self.rows.get(ri).and_then(|r| r.get(ci))
    }

    /// Get a mutable cell value
    pub fn get_mut(&mut self, row: u32, col: u16) -> Option<&mut T> {
        let (ri, ci) = (row_index(row)?, col_index(col)?);
        self.rows.get_mut(ri).and_then(|r| r.get_mut(ci))
    }

    /// Get a cell value, or `T::default()` when the cell is vacant or out of range
    pub fn value(&self, row: u32, col: u16) -> T
    where
        T: Clone + Default,
    {
        self.get(row, col).cloned().unwrap_or_default()
    }

    /// Check whether a cell holds a value
    pub fn exists(&self, row: u32, col: u16) -> bool {
        self.get(row, col).is_some()
    }

    /// Set a cell value, returning the previous one
    ///
    /// Writes outside the sheet bounds are ignored.
    pub fn set(&mut self, row: u32, col: u16, value: T) -> Option<T> {
        let (Some(ri), Some(ci)) = (row_index(row), col_index(col)) else {
            trace!("ignoring write outside sheet bounds at ({}, {})", row, col);
            return None;
        };
        let bits = self.options.col_page_bits;
        self.rows
            .get_or_insert_with(ri, || PagedAxis::new(bits, MAX_COLS as usize))
            .insert(ci, value)
    }

    /// Remove a cell, returning its value
    pub fn remove(&mut self, row: u32, col: u16) -> Option<T> {
        let (ri, ci) = (row_index(row)?, col_index(col)?);
        let cells = self.rows.get_mut(ri)?;
        let removed = cells.remove(ci);
        if cells.is_empty() {
            self.rows.remove(ri);
        }
        removed
    }

    /// Number of stored cells
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|(_, cells)| cells.len()).sum()
    }

    /// Number of rows holding at least one cell
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the store holds no cells
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Remove every cell
    pub fn clear_all(&mut self) {
        self.rows.clear();
    }

    // === Traversal ===

    /// First occupied cell in row-major order
    pub fn first_cell(&self) -> Option<(u32, u16)> {
        let ri = self.rows.min_index()?;
        let ci = self.rows.get(ri)?.min_index()?;
        Some(((ri + 1) as u32, (ci + 1) as u16))
    }

    /// Last occupied cell in row-major order
    pub fn last_cell(&self) -> Option<(u32, u16)> {
        let ri = self.rows.max_index()?;
        let ci = self.rows.get(ri)?.max_index()?;
        Some(((ri + 1) as u32, (ci + 1) as u16))
    }

    /// The occupied cell that follows `(row, col)` in row-major order
    ///
    /// The start need not be occupied. A row below 1 starts the search at the first
    /// cell; a row beyond `MAX_ROWS` has no successor.
    pub fn next_cell(&self, row: u32, col: u16) -> Option<(u32, u16)> {
        if row == 0 {
            return self.first_cell();
        }
        let ri = row_index(row)?;
        // 0-based index `col` is the 1-based column right after `col`
        if let Some(ci) = self.rows.get(ri).and_then(|r| r.next_occupied(col as usize)) {
            return Some((row, (ci + 1) as u16));
        }
        let next_ri = self.rows.next_occupied(ri + 1)?;
        let ci = self.rows.get(next_ri)?.min_index()?;
        Some(((next_ri + 1) as u32, (ci + 1) as u16))
    }

    /// The occupied cell that precedes `(row, col)` in row-major order
    ///
    /// A row beyond `MAX_ROWS` starts the search at the last cell; a row below 1 has
    /// no predecessor.
    pub fn prev_cell(&self, row: u32, col: u16) -> Option<(u32, u16)> {
        if row > MAX_ROWS {
            return self.last_cell();
        }
        let ri = row_index(row)?;
        if col > 1 {
            let from = (col as usize - 2).min(MAX_COLS as usize - 1);
            if let Some(ci) = self.rows.get(ri).and_then(|r| r.prev_occupied(from)) {
                return Some((row, (ci + 1) as u16));
            }
        }
        let prev_ri = self.rows.prev_occupied(ri.checked_sub(1)?)?;
        let ci = self.rows.get(prev_ri)?.max_index()?;
        Some(((prev_ri + 1) as u32, (ci + 1) as u16))
    }

    /// Bounding box of all occupied cells as `(from_row, from_col, to_row, to_col)`
    ///
    /// Built from the row axis bounds and the column bounds of each stored row, without
    /// visiting individual cells.
    pub fn dimension(&self) -> Option<(u32, u16, u32, u16)> {
        let (min_row, max_row) = (self.rows.min_index()?, self.rows.max_index()?);
        let (min_col, max_col) = self
            .rows
            .iter()
            .filter_map(|(_, cells)| Some((cells.min_index()?, cells.max_index()?)))
            .fold((usize::MAX, 0), |(lo, hi), (min, max)| {
                (lo.min(min), hi.max(max))
            });
        debug_assert!(min_col <= max_col, "stored row without cells");
        Some((
            (min_row + 1) as u32,
            (min_col + 1) as u16,
            (max_row + 1) as u32,
            (max_col + 1) as u16,
        ))
    }

    /// Iterate all cells in row-major order
    pub fn iter(&self) -> CellIter<'_, T> {
        CellIter::new(&self.rows, 0, 0, MAX_ROWS as usize - 1, MAX_COLS as usize - 1)
    }

    /// Iterate the cells inside a rectangle in row-major order
    ///
    /// The rectangle is clamped to the sheet bounds; an inverted rectangle yields nothing.
    pub fn iter_range(&self, from_row: u32, from_col: u16, to_row: u32, to_col: u16) -> CellIter<'_, T> {
        let from_row = from_row.max(1) as usize - 1;
        let from_col = from_col.max(1) as usize - 1;
        let to_row = to_row.min(MAX_ROWS) as usize;
        let to_col = to_col.min(MAX_COLS) as usize;
        if to_row == 0 || to_col == 0 {
            return CellIter::empty(&self.rows);
        }
        CellIter::new(&self.rows, from_row, from_col, to_row - 1, to_col - 1)
    }

    // === Structural edits ===

    /// Remove all cells inside a closed rectangle without shifting
    pub fn clear(&mut self, from_row: u32, from_col: u16, to_row: u32, to_col: u16) {
        let (from_row, to_row) = (from_row.max(1), to_row.min(MAX_ROWS));
        let (from_col, to_col) = (from_col.max(1), to_col.min(MAX_COLS));
        if from_row > to_row || from_col > to_col {
            trace!(
                "ignoring clear of empty rectangle ({}, {}):({}, {})",
                from_row,
                from_col,
                to_row,
                to_col
            );
            return;
        }
        let (fc, tc) = (from_col as usize - 1, to_col as usize - 1);
        self.rows
            .retain_range(from_row as usize - 1, to_row as usize - 1, |_, cells| {
                cells.clear_range(fc, tc);
                !cells.is_empty()
            });
    }

    /// Delete a block of rows or columns
    ///
    /// A non-zero `row_count` deletes rows `from_row..from_row + row_count` across all
    /// columns; otherwise a non-zero `col_count` deletes columns across all rows. With
    /// `shift` the following rows (columns) move back to close the gap; without it the
    /// block is only cleared.
    pub fn delete(&mut self, from_row: u32, from_col: u16, row_count: u32, col_count: u16, shift: bool) {
        if row_count > 0 {
            if shift {
                self.delete_rows(from_row, row_count);
            } else if row_index(from_row).is_some() {
                let to_row = from_row.saturating_add(row_count - 1);
                self.clear(from_row, 1, to_row, MAX_COLS);
            } else {
                trace!("ignoring row clear at out-of-range row {}", from_row);
            }
        } else if col_count > 0 {
            if shift {
                self.delete_columns(from_col, col_count);
            } else if col_index(from_col).is_some() {
                let to_col = from_col.saturating_add(col_count - 1);
                self.clear(1, from_col, MAX_ROWS, to_col);
            } else {
                trace!("ignoring column clear at out-of-range column {}", from_col);
            }
        }
    }

    /// Insert a block of empty rows or columns
    ///
    /// A non-zero `row_count` inserts rows at `from_row`; otherwise a non-zero
    /// `col_count` inserts columns at `from_col`. Cells pushed past the sheet edge are
    /// dropped.
    pub fn insert(&mut self, from_row: u32, from_col: u16, row_count: u32, col_count: u16) {
        if row_count > 0 {
            self.insert_rows(from_row, row_count);
        } else if col_count > 0 {
            self.insert_columns(from_col, col_count);
        }
    }

    /// Delete `count` rows starting at `from_row`, moving later rows up
    pub fn delete_rows(&mut self, from_row: u32, count: u32) {
        let Some(ri) = row_index(from_row) else {
            trace!("ignoring row delete at out-of-range row {}", from_row);
            return;
        };
        let moved = self.rows.delete_shift(ri, count as usize);
        debug!("deleted {} rows at {}, {} rows moved", count, from_row, moved);
    }

    /// Delete `count` columns starting at `from_col`, moving later columns left
    pub fn delete_columns(&mut self, from_col: u16, count: u16) {
        let Some(ci) = col_index(from_col) else {
            trace!("ignoring column delete at out-of-range column {}", from_col);
            return;
        };
        let mut moved = 0;
        self.rows.retain_range(0, MAX_ROWS as usize - 1, |_, cells| {
            moved += cells.delete_shift(ci, count as usize);
            !cells.is_empty()
        });
        debug!("deleted {} columns at {}, {} cells moved", count, from_col, moved);
    }

    /// Insert `count` empty rows at `at_row`, moving it and later rows down
    pub fn insert_rows(&mut self, at_row: u32, count: u32) {
        let Some(ri) = row_index(at_row) else {
            trace!("ignoring row insert at out-of-range row {}", at_row);
            return;
        };
        let moved = self.rows.insert_shift(ri, count as usize);
        debug!("inserted {} rows at {}, {} rows moved", count, at_row, moved);
    }

    /// Insert `count` empty columns at `at_col`, moving it and later columns right
    pub fn insert_columns(&mut self, at_col: u16, count: u16) {
        let Some(ci) = col_index(at_col) else {
            trace!("ignoring column insert at out-of-range column {}", at_col);
            return;
        };
        let mut moved = 0;
        self.rows.retain_range(0, MAX_ROWS as usize - 1, |_, cells| {
            moved += cells.insert_shift(ci, count as usize);
            !cells.is_empty()
        });
        debug!("inserted {} columns at {}, {} cells moved", count, at_col, moved);
    }
}

impl<T> Default for CellStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cells(store: &CellStore<i32>) -> Vec<(u32, u16, i32)> {
        store.iter().map(|(r, c, v)| (r, c, *v)).collect()
    }

    #[test]
    fn test_basic_operations() {
        let mut store = CellStore::new();

        store.set(1, 1, 42);
        assert_eq!(store.get(1, 1), Some(&42));
        assert!(store.exists(1, 1));
        assert_eq!(store.value(1, 1), 42);

        assert!(store.get(2, 2).is_none());
        assert_eq!(store.value(2, 2), 0);

        assert_eq!(store.set(1, 1, 7), Some(42));
        assert_eq!(store.cell_count(), 1);
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut store = CellStore::new();
        assert_eq!(store.set(0, 1, 1), None);
        assert_eq!(store.set(1, 0, 1), None);
        assert_eq!(store.set(MAX_ROWS + 1, 1, 1), None);
        assert_eq!(store.set(1, MAX_COLS + 1, 1), None);
        assert!(store.is_empty());

        assert!(!store.exists(0, 0));
        assert_eq!(store.get(MAX_ROWS + 1, MAX_COLS + 1), None);
        assert_eq!(store.value(0, 5), 0);

        store.set(MAX_ROWS, MAX_COLS, 9);
        assert_eq!(store.get(MAX_ROWS, MAX_COLS), Some(&9));
    }

    #[test]
    fn test_remove_releases_rows() {
        let mut store = CellStore::new();
        store.set(10, 3, 1);
        store.set(10, 4, 2);
        assert_eq!(store.row_count(), 1);

        assert_eq!(store.remove(10, 3), Some(1));
        assert_eq!(store.row_count(), 1);
        assert_eq!(store.remove(10, 4), Some(2));
        assert_eq!(store.row_count(), 0);
        assert!(store.is_empty());
        assert_eq!(store.remove(10, 4), None);
    }

    #[test]
    fn test_dimension() {
        let mut store = CellStore::new();
        assert_eq!(store.dimension(), None);

        store.set(20, 100, 1);
        store.set(15, 300, 1);
        store.set(400, 6000, 1);
        store.set(500, 5000, 1);
        assert_eq!(store.dimension(), Some((15, 100, 500, 6000)));

        store.remove(400, 6000);
        assert_eq!(store.dimension(), Some((15, 100, 500, 5000)));
    }

    #[test]
    fn test_next_and_prev_cell() {
        let mut store = CellStore::new();
        for (r, c) in [(1, 1), (1, 5), (3, 2), (2000, 16384)] {
            store.set(r, c, 0);
        }

        assert_eq!(store.next_cell(0, 0), Some((1, 1)));
        assert_eq!(store.next_cell(1, 1), Some((1, 5)));
        assert_eq!(store.next_cell(1, 5), Some((3, 2)));
        assert_eq!(store.next_cell(2, 100), Some((3, 2)));
        assert_eq!(store.next_cell(3, 2), Some((2000, 16384)));
        assert_eq!(store.next_cell(2000, 16384), None);
        assert_eq!(store.next_cell(MAX_ROWS + 1, 1), None);

        assert_eq!(store.prev_cell(MAX_ROWS + 1, MAX_COLS + 1), Some((2000, 16384)));
        assert_eq!(store.prev_cell(2000, 16384), Some((3, 2)));
        assert_eq!(store.prev_cell(3, 2), Some((1, 5)));
        assert_eq!(store.prev_cell(1, 5), Some((1, 1)));
        assert_eq!(store.prev_cell(1, 1), None);
        assert_eq!(store.prev_cell(0, 0), None);
    }

    #[test]
    fn test_clear_rectangle() {
        let mut store = CellStore::new();
        for r in 1..=5 {
            for c in 1..=5 {
                store.set(r, c, (r * 10) as i32 + c as i32);
            }
        }
        store.clear(2, 2, 4, 4);
        assert_eq!(store.cell_count(), 16);
        assert!(!store.exists(3, 3));
        assert!(store.exists(1, 1));
        assert!(store.exists(5, 5));

        store.clear(0, 0, MAX_ROWS + 5, MAX_COLS + 5);
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_rows_shifts_up() {
        let mut store = CellStore::new();
        store.set(1, 1, 1);
        store.set(5, 2, 5);
        store.set(6, 3, 6);
        store.set(3000, 4, 3000);

        store.delete(5, 1, 1, 0, true);
        assert_eq!(cells(&store), vec![(1, 1, 1), (5, 3, 6), (2999, 4, 3000)]);
    }

    #[test]
    fn test_delete_columns_shifts_left() {
        let mut store = CellStore::new();
        store.set(1, 1, 1);
        store.set(1, 3, 3);
        store.set(2, 3, 23);
        store.set(2, 300, 2300);

        store.delete(1, 2, 0, 2, true);
        assert_eq!(cells(&store), vec![(1, 1, 1), (2, 298, 2300)]);
    }

    #[test]
    fn test_delete_without_shift_only_clears() {
        let mut store = CellStore::new();
        store.set(1, 1, 1);
        store.set(2, 1, 2);
        store.set(3, 1, 3);

        store.delete(2, 1, 1, 0, false);
        assert_eq!(cells(&store), vec![(1, 1, 1), (3, 1, 3)]);
    }

    #[test]
    fn test_delete_at_out_of_range_position_is_ignored() {
        let mut store = CellStore::new();
        store.set(1, 1, 1);
        store.set(1, 2, 2);
        store.set(2, 1, 3);
        let before = cells(&store);

        for shift in [false, true] {
            store.delete(0, 1, 2, 0, shift);
            store.delete(1, 0, 0, 2, shift);
            store.delete(MAX_ROWS + 1, 1, 5, 0, shift);
            store.delete(1, MAX_COLS + 1, 0, 5, shift);
            assert_eq!(cells(&store), before);
        }
    }

    #[test]
    fn test_insert_rows_and_columns() {
        let mut store = CellStore::new();
        store.set(2, 2, 22);
        store.set(5, 5, 55);

        store.insert(3, 1, 10, 0);
        assert_eq!(cells(&store), vec![(2, 2, 22), (15, 5, 55)]);

        store.insert(1, 1, 0, 3);
        assert_eq!(cells(&store), vec![(2, 5, 22), (15, 8, 55)]);
    }

    #[test]
    fn test_insert_drops_cells_past_edge() {
        let mut store = CellStore::new();
        store.set(MAX_ROWS - 1, 1, 1);
        store.set(1, MAX_COLS, 2);
        store.insert_rows(10, 5);
        store.insert_columns(10, 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_custom_options() {
        let mut store = CellStore::with_options(StoreOptions::new(2, 2)).unwrap();
        for r in 1..=20 {
            store.set(r, r as u16, r as i32);
        }
        store.delete_rows(5, 4);
        assert_eq!(store.get(5, 9), Some(&9));
        assert_eq!(store.dimension(), Some((1, 1, 16, 20)));

        assert!(CellStore::<i32>::with_options(StoreOptions::new(0, 2)).is_err());
    }
}
