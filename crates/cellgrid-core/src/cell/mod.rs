//! Cell storage and cell addressing
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location (e.g., "A1", "$B$2")
//! - [`CellStore`] - The paged sparse matrix holding a worksheet's values
//! - [`CellIter`] - Row-major enumeration of a store
//! - [`PagedAxis`] - One paged dimension of the store

mod address;
mod axis;
mod iter;
mod page;
mod store;

pub use address::CellAddress;
pub use axis::PagedAxis;
pub use iter::CellIter;
pub use store::CellStore;
