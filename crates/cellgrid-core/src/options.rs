//! Store configuration

use crate::error::{Error, Result};

/// Smallest accepted page exponent
pub const MIN_PAGE_BITS: u32 = 1;

/// Largest accepted page exponent
pub const MAX_PAGE_BITS: u32 = 16;

/// Page layout of a [`CellStore`](crate::CellStore)
///
/// Each axis is split into pages of `2^bits` slots. The defaults give 1024 rows per
/// row page and 128 columns per column page, which keeps a full-height sheet at 1024
/// row pages and a full-width row at 128 column pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoreOptions {
    /// Page exponent of the outer (row) axis
    pub row_page_bits: u32,
    /// Page exponent of the inner (column) axes
    pub col_page_bits: u32,
}

impl StoreOptions {
    /// Create options with explicit page exponents
    pub fn new(row_page_bits: u32, col_page_bits: u32) -> Self {
        Self {
            row_page_bits,
            col_page_bits,
        }
    }

    /// Check that both exponents are in `MIN_PAGE_BITS..=MAX_PAGE_BITS`
    pub fn validate(&self) -> Result<()> {
        for (axis, bits) in [("row", self.row_page_bits), ("column", self.col_page_bits)] {
            if !(MIN_PAGE_BITS..=MAX_PAGE_BITS).contains(&bits) {
                return Err(Error::InvalidOptions(format!(
                    "{} page bits must be in {}..={}, got {}",
                    axis, MIN_PAGE_BITS, MAX_PAGE_BITS, bits
                )));
            }
        }
        Ok(())
    }

    /// Rows per row page
    pub fn rows_per_page(&self) -> usize {
        1 << self.row_page_bits
    }

    /// Columns per column page
    pub fn cols_per_page(&self) -> usize {
        1 << self.col_page_bits
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            row_page_bits: 10,
            col_page_bits: 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = StoreOptions::default();
        assert_eq!(opts.rows_per_page(), 1024);
        assert_eq!(opts.cols_per_page(), 128);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_bits() {
        assert!(StoreOptions::new(0, 7).validate().is_err());
        assert!(StoreOptions::new(10, 17).validate().is_err());
        assert!(StoreOptions::new(1, 16).validate().is_ok());
    }
}
