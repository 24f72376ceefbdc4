//! Row-major cursor over a [`CellStore`](super::CellStore)

use std::iter::FusedIterator;

use super::axis::PagedAxis;

/// Iterator over the occupied cells of a store, optionally bounded to a rectangle
///
/// Yields `(row, col, &value)` with 1-based coordinates in row-major order. Rows and
/// column pages without cells are skipped through the axis bounds, so the cost follows
/// the number of occupied cells in the rectangle.
#[derive(Debug, Clone)]
pub struct CellIter<'a, T> {
    rows: &'a PagedAxis<PagedAxis<T>>,
    from_col: usize,
    to_row: usize,
    to_col: usize,
    row: Option<usize>,
    next_col: usize,
}

impl<'a, T> CellIter<'a, T> {
    /// Bounds are 0-based and inclusive
    pub(crate) fn new(
        rows: &'a PagedAxis<PagedAxis<T>>,
        from_row: usize,
        from_col: usize,
        to_row: usize,
        to_col: usize,
    ) -> Self {
        let row = if from_row <= to_row && from_col <= to_col {
            rows.next_occupied(from_row).filter(|&r| r <= to_row)
        } else {
            None
        };
        Self {
            rows,
            from_col,
            to_row,
            to_col,
            row,
            next_col: from_col,
        }
    }

    pub(crate) fn empty(rows: &'a PagedAxis<PagedAxis<T>>) -> Self {
        Self {
            rows,
            from_col: 0,
            to_row: 0,
            to_col: 0,
            row: None,
            next_col: 0,
        }
    }
}

impl<'a, T> Iterator for CellIter<'a, T> {
    type Item = (u32, u16, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let ri = self.row?;
            if let Some(cells) = self.rows.get(ri) {
                let found = cells
                    .next_occupied(self.next_col)
                    .filter(|&ci| ci <= self.to_col);
                if let Some(ci) = found {
                    self.next_col = ci + 1;
                    if let Some(value) = cells.get(ci) {
                        return Some(((ri + 1) as u32, (ci + 1) as u16, value));
                    }
                }
            }
            self.row = if ri >= self.to_row {
                None
            } else {
                self.rows
                    .next_occupied(ri + 1)
                    .filter(|&r| r <= self.to_row)
            };
            self.next_col = self.from_col;
        }
    }
}

impl<T> FusedIterator for CellIter<'_, T> {}
