//! # cellgrid-core
//!
//! Storage and addressing kernel for spreadsheet worksheets.
//!
//! This crate provides the two building blocks a worksheet engine sits on:
//! - [`CellStore`] - A paged sparse matrix holding one value per occupied cell
//! - [`AddressRange`] and [`Addresses`] - A1 references with their insert/delete algebra
//! - [`StructuralEdit`] - One row or column edit, applied alike to stores and references
//! - [`NamedRangeCollection`](named_range::NamedRangeCollection) - Defined names that follow edits
//!
//! ## Example
//!
//! ```rust
//! use cellgrid_core::{AddressRange, CellStore, ShiftMode, StructuralEdit};
//!
//! let mut store = CellStore::new();
//! store.set(3, 2, 42.0);
//! let reference = AddressRange::parse("Sheet1!$B$3").unwrap();
//!
//! // Insert two rows above row 3 in both the store and the reference
//! let edit = StructuralEdit::InsertRows { at: 1, count: 2 };
//! edit.apply_to_store(&mut store);
//! let moved = edit.apply_to_range(&reference, ShiftMode::All).unwrap();
//!
//! assert_eq!(moved.to_full_text(), "'Sheet1'!$B$5");
//! assert_eq!(store.get(5, 2), Some(&42.0));
//! ```

pub mod address;
pub mod cell;
pub mod edit;
pub mod error;
pub mod named_range;
pub mod options;

// Re-exports for convenience
pub use address::{AddressRange, Addresses, SheetRef, ShiftMode};
pub use cell::{CellAddress, CellIter, CellStore};
pub use edit::StructuralEdit;
pub use error::{Error, Result};
pub use options::StoreOptions;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Text of a broken reference
pub const REF_ERROR: &str = "#REF!";
