//! Structural edits
//!
//! A [`StructuralEdit`] describes one row or column insertion or deletion. The same
//! value is applied to the [`CellStore`] holding a worksheet's cells and to every
//! reference pointing at that worksheet, so values and references stay in step.

use crate::address::{AddressRange, Addresses, ShiftMode};
use crate::cell::CellStore;

/// A row or column insertion or deletion
///
/// Positions are 1-based. An edit with a zero count, or a position outside the sheet,
/// changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralEdit {
    /// Insert `count` rows before row `at`
    InsertRows { at: u32, count: u32 },
    /// Delete `count` rows starting at row `from`
    DeleteRows { from: u32, count: u32 },
    /// Insert `count` columns before column `at`
    InsertColumns { at: u16, count: u16 },
    /// Delete `count` columns starting at column `from`
    DeleteColumns { from: u16, count: u16 },
}

impl StructuralEdit {
    /// Whether the edit works on rows
    pub fn is_row_edit(&self) -> bool {
        matches!(
            self,
            StructuralEdit::InsertRows { .. } | StructuralEdit::DeleteRows { .. }
        )
    }

    /// Whether the edit removes cells
    pub fn is_delete(&self) -> bool {
        matches!(
            self,
            StructuralEdit::DeleteRows { .. } | StructuralEdit::DeleteColumns { .. }
        )
    }

    /// Apply the edit to a store, moving cells
    pub fn apply_to_store<T>(&self, store: &mut CellStore<T>) {
        log::debug!("applying {:?} to store of {} cells", self, store.cell_count());
        match *self {
            StructuralEdit::InsertRows { at, count } => store.insert_rows(at, count),
            StructuralEdit::DeleteRows { from, count } => store.delete_rows(from, count),
            StructuralEdit::InsertColumns { at, count } => store.insert_columns(at, count),
            StructuralEdit::DeleteColumns { from, count } => store.delete_columns(from, count),
        }
    }

    /// Rewrite a range; `None` when the range no longer exists
    pub fn apply_to_range(&self, range: &AddressRange, mode: ShiftMode) -> Option<AddressRange> {
        match *self {
            StructuralEdit::InsertRows { at, count } => range.insert_rows(at, count, mode),
            StructuralEdit::DeleteRows { from, count } => range.delete_rows(from, count, mode),
            StructuralEdit::InsertColumns { at, count } => range.insert_columns(at, count, mode),
            StructuralEdit::DeleteColumns { from, count } => {
                range.delete_columns(from, count, mode)
            }
        }
    }

    /// Rewrite every range of an address, dropping the ones that no longer exist
    pub fn apply_to_addresses(&self, addresses: &Addresses, mode: ShiftMode) -> Option<Addresses> {
        match *self {
            StructuralEdit::InsertRows { at, count } => addresses.insert_rows(at, count, mode),
            StructuralEdit::DeleteRows { from, count } => addresses.delete_rows(from, count, mode),
            StructuralEdit::InsertColumns { at, count } => {
                addresses.insert_columns(at, count, mode)
            }
            StructuralEdit::DeleteColumns { from, count } => {
                addresses.delete_columns(from, count, mode)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_store_and_reference_move_together() {
        let mut store = CellStore::new();
        store.set(10, 3, "total");
        let reference = AddressRange::parse("Sheet1!C10").unwrap();

        let edit = StructuralEdit::InsertRows { at: 5, count: 2 };
        edit.apply_to_store(&mut store);
        let moved = edit.apply_to_range(&reference, ShiftMode::All).unwrap();

        assert_eq!(store.get(moved.from_row(), moved.from_col()), Some(&"total"));
        assert_eq!(moved.to_text(), "C12");
    }

    #[test]
    fn test_delete_edits() {
        let mut store = CellStore::new();
        store.set(2, 2, 1);
        store.set(2, 5, 2);

        let edit = StructuralEdit::DeleteColumns { from: 3, count: 2 };
        edit.apply_to_store(&mut store);
        assert_eq!(store.get(2, 3), Some(&2));
        assert!(edit.is_delete());
        assert!(!edit.is_row_edit());

        let range = AddressRange::parse("C1:D4").unwrap();
        assert!(edit.apply_to_range(&range, ShiftMode::All).is_none());

        let list = Addresses::parse("C1,E1").unwrap();
        let rewritten = edit.apply_to_addresses(&list, ShiftMode::All).unwrap();
        assert_eq!(rewritten.to_text(), "C1");
    }
}
