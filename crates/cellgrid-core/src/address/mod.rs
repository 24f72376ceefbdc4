//! Address ranges and their structural rewrites
//!
//! An [`AddressRange`] is what a formula or defined name holds on to: a rectangle on
//! some worksheet. When rows or columns are inserted or deleted, the owner rewrites its
//! ranges with the same edit applied to the [`CellStore`](crate::CellStore).

mod format;
mod parse;
mod range;
mod shift;

pub use range::{AddressRange, Addresses, SheetRef};
pub use shift::ShiftMode;
