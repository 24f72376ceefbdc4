//! Rendering of ranges as A1 text

use super::range::{AddressRange, SheetRef};
use crate::cell::CellAddress;
use crate::REF_ERROR;

fn dollar(fixed: bool) -> &'static str {
    if fixed {
        "$"
    } else {
        ""
    }
}

/// Unqualified text: `A:B` for full columns, `1:3` for full rows, `A1` for a single
/// cell and `A1:B2` otherwise
pub(crate) fn local_text(range: &AddressRange) -> String {
    let (start, end) = (range.start(), range.end());

    if range.is_full_column() {
        format!(
            "{}{}:{}{}",
            dollar(start.col_fixed),
            CellAddress::column_to_letters(start.col),
            dollar(end.col_fixed),
            CellAddress::column_to_letters(end.col)
        )
    } else if range.is_full_row() {
        format!(
            "{}{}:{}{}",
            dollar(start.row_fixed),
            start.row,
            dollar(end.row_fixed),
            end.row
        )
    } else if start == end {
        start.to_a1_string()
    } else {
        format!("{}:{}", start.to_a1_string(), end.to_a1_string())
    }
}

/// Quote a worksheet name, doubling embedded quotes
fn quote_sheet(workbook: Option<&str>, name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    out.push('\'');
    if let Some(wb) = workbook {
        out.push('[');
        out.push_str(wb);
        out.push(']');
    }
    for c in name.chars() {
        if c == '\'' {
            out.push('\'');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Qualified text: `'Sheet'!A1`, `'[Book]Sheet'!A1`, `#REF!A1` or `[Book]A1`
pub(crate) fn qualified_text(
    range: &AddressRange,
    workbook: Option<&str>,
    sheet: Option<&SheetRef>,
) -> String {
    let local = local_text(range);
    match sheet {
        Some(SheetRef::Named(name)) => format!("{}!{}", quote_sheet(workbook, name), local),
        Some(SheetRef::BrokenRef) => format!("{}{}", REF_ERROR, local),
        None => match workbook {
            Some(wb) => format!("[{}]{}", wb, local),
            None => local,
        },
    }
}
