//! A1 reference text parser
//!
//! Grammar accepted, per comma-separated part:
//!
//! ```text
//! part      = corner [ ":" corner ]
//! corner    = [ qualifier ] local
//! qualifier = [ "[" book "]" ] ( sheet | "'" [ "[" book "]" ] quoted "'" ) "!"
//! local     = ["$"] letters ["$"] digits | ["$"] letters | ["$"] digits
//! ```
//!
//! Quoted sheet names escape `'` as `''`. The qualifier `#REF!` parses to a broken
//! reference. Delimiters are ASCII, so splitting works on byte offsets.

use super::range::{AddressRange, Addresses, SheetRef};
use crate::cell::CellAddress;
use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// Split on `sep` outside quotes and workbook brackets
fn split_top_level(text: &str, sep: u8) -> Result<Vec<&str>> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut in_quote = false;
    let mut depth = 0usize;
    let mut start = 0;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            // `''` inside a quoted name toggles twice, which is a no-op
            b'\'' => in_quote = !in_quote,
            b'[' if !in_quote => depth += 1,
            b']' if !in_quote => depth = depth.saturating_sub(1),
            _ if b == sep && !in_quote && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if in_quote {
        return Err(Error::InvalidAddress(format!(
            "unterminated quote in '{}'",
            text
        )));
    }
    if depth != 0 {
        return Err(Error::InvalidAddress(format!(
            "unterminated workbook bracket in '{}'",
            text
        )));
    }
    parts.push(&text[start..]);
    Ok(parts)
}

/// Strip a leading `[book]`
fn take_workbook(text: &str) -> Result<(Option<String>, &str)> {
    let Some(rest) = text.strip_prefix('[') else {
        return Ok((None, text));
    };
    let close = rest
        .find(']')
        .ok_or_else(|| Error::InvalidAddress(format!("unterminated workbook in '{}'", text)))?;
    let book = &rest[..close];
    if book.is_empty() {
        return Err(Error::InvalidAddress(format!("empty workbook name in '{}'", text)));
    }
    Ok((Some(book.to_string()), &rest[close + 1..]))
}

/// A corner's qualifiers and its local A1 text
struct Qualified<'a> {
    workbook: Option<String>,
    sheet: Option<SheetRef>,
    local: &'a str,
}

fn parse_qualifier(text: &str) -> Result<Qualified<'_>> {
    let (mut workbook, rest) = take_workbook(text)?;

    if let Some(quoted) = rest.strip_prefix('\'') {
        let bytes = quoted.as_bytes();
        let mut name = String::new();
        let mut i = 0;
        let mut seg = 0;
        loop {
            match bytes.get(i) {
                Some(b'\'') if bytes.get(i + 1) == Some(&b'\'') => {
                    name.push_str(&quoted[seg..=i]);
                    i += 2;
                    seg = i;
                }
                Some(b'\'') => {
                    name.push_str(&quoted[seg..i]);
                    break;
                }
                Some(_) => i += 1,
                None => {
                    return Err(Error::InvalidAddress(format!(
                        "unterminated quote in '{}'",
                        text
                    )))
                }
            }
        }
        let local = quoted[i + 1..].strip_prefix('!').ok_or_else(|| {
            Error::InvalidAddress(format!("expected '!' after sheet name in '{}'", text))
        })?;

        let (inner_book, sheet_name) = take_workbook(&name)?;
        if let Some(book) = inner_book {
            if workbook.is_some() {
                return Err(Error::InvalidAddress(format!("two workbooks in '{}'", text)));
            }
            workbook = Some(book);
        }
        if sheet_name.is_empty() {
            return Err(Error::InvalidAddress(format!("empty sheet name in '{}'", text)));
        }
        return Ok(Qualified {
            workbook,
            sheet: Some(SheetRef::Named(sheet_name.to_string())),
            local,
        });
    }

    match rest.split_once('!') {
        Some((name, local)) => {
            let sheet = if name == "#REF" {
                SheetRef::BrokenRef
            } else if name.is_empty()
                || name.contains(|c: char| matches!(c, ' ' | '\'' | '[' | ']'))
                || CellAddress::parse(name).is_ok()
            {
                return Err(Error::InvalidAddress(format!(
                    "invalid unquoted sheet name '{}'",
                    name
                )));
            } else {
                SheetRef::Named(name.to_string())
            };
            Ok(Qualified {
                workbook,
                sheet: Some(sheet),
                local,
            })
        }
        None => Ok(Qualified {
            workbook,
            sheet: None,
            local: rest,
        }),
    }
}

/// One corner of a range in local A1 text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Corner {
    Cell(CellAddress),
    Column { col: u16, fixed: bool },
    Row { row: u32, fixed: bool },
}

fn parse_corner(text: &str) -> Result<Corner> {
    let text = text.trim();
    let bytes = text.as_bytes();
    let mut pos = 0;

    let lead_fixed = bytes.first() == Some(&b'$');
    if lead_fixed {
        pos += 1;
    }

    let letters_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
        pos += 1;
    }
    let letters = &text[letters_start..pos];

    if letters.is_empty() {
        let row = CellAddress::parse_row(&text[pos..])?;
        return Ok(Corner::Row {
            row,
            fixed: lead_fixed,
        });
    }

    let col = CellAddress::letters_to_column(letters)?;
    if pos == bytes.len() {
        return Ok(Corner::Column {
            col,
            fixed: lead_fixed,
        });
    }

    let row_fixed = bytes[pos] == b'$';
    if row_fixed {
        pos += 1;
    }
    let row = CellAddress::parse_row(&text[pos..])?;
    Ok(Corner::Cell(CellAddress::with_fixed(
        row, col, row_fixed, lead_fixed,
    )))
}

fn range_from_corners(first: Corner, second: Corner, text: &str) -> Result<AddressRange> {
    let range = match (first, second) {
        (Corner::Cell(a), Corner::Cell(b)) => AddressRange::from_corners(a, b),
        (Corner::Column { col: a, fixed: fa }, Corner::Column { col: b, fixed: fb }) => {
            AddressRange::from_corners(
                CellAddress::with_fixed(1, a, false, fa),
                CellAddress::with_fixed(MAX_ROWS, b, false, fb),
            )
        }
        (Corner::Row { row: a, fixed: fa }, Corner::Row { row: b, fixed: fb }) => {
            AddressRange::from_corners(
                CellAddress::with_fixed(a, 1, fa, false),
                CellAddress::with_fixed(b, MAX_COLS, fb, false),
            )
        }
        _ => {
            return Err(Error::InvalidRange(format!(
                "corners of different kinds in '{}'",
                text
            )))
        }
    };
    Ok(range)
}

/// Parse one comma-free part into a range
fn parse_range(text: &str) -> Result<AddressRange> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::InvalidAddress("empty address".into()));
    }

    let pieces = split_top_level(text, b':')?;
    let (first, second) = match pieces.as_slice() {
        [single] => (parse_qualifier(single)?, None),
        [a, b] => (parse_qualifier(a)?, Some(parse_qualifier(b)?)),
        _ => {
            return Err(Error::InvalidRange(format!(
                "too many ':' in '{}'",
                text
            )))
        }
    };

    let start = parse_corner(first.local)?;
    let (range, sheet, workbook) = match second {
        None => match start {
            Corner::Cell(addr) => (
                AddressRange::from_corners(addr, addr),
                first.sheet,
                first.workbook,
            ),
            _ => {
                return Err(Error::InvalidAddress(format!(
                    "a lone column or row needs a second corner in '{}'",
                    text
                )))
            }
        },
        Some(second) => {
            let end = parse_corner(second.local)?;
            let range = range_from_corners(start, end, text)?;
            if let (Some(a), Some(b)) = (&first.sheet, &second.sheet) {
                if !a.same_sheet(b) {
                    return Err(Error::InvalidRange(format!(
                        "corners on different sheets in '{}'",
                        text
                    )));
                }
            }
            (
                range,
                first.sheet.or(second.sheet),
                first.workbook.or(second.workbook),
            )
        }
    };

    Ok(range.with_sheet_ref(sheet).with_workbook_name(workbook))
}

/// Parse a full address, which may be a comma-separated list
///
/// When the first member of a list is qualified, every member takes its worksheet and
/// workbook.
pub(crate) fn parse_addresses(text: &str) -> Result<Addresses> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::InvalidAddress("empty address".into()));
    }

    let mut ranges = split_top_level(text, b',')?
        .into_iter()
        .map(parse_range)
        .collect::<Result<Vec<_>>>()?;

    if ranges.len() > 1 {
        let sheet = ranges[0].worksheet().cloned();
        let workbook = ranges[0].workbook().map(str::to_string);
        if sheet.is_some() {
            ranges = ranges
                .into_iter()
                .map(|r| {
                    r.with_sheet_ref(sheet.clone())
                        .with_workbook_name(workbook.clone())
                })
                .collect();
        }
    }

    Addresses::from_ranges(ranges)
        .ok_or_else(|| Error::InvalidAddress("empty address".into()))
}
