//! Named range definitions
//!
//! Named ranges allow users to assign meaningful names to cells or ranges of cells,
//! making formulas easier to read and maintain. A name refers to an [`Addresses`]
//! value, so it follows the same structural rewrites as any other reference: when rows
//! or columns of a worksheet change, [`NamedRangeCollection::apply_edit`] moves every
//! name pointing at that worksheet, and names whose cells were deleted become `#REF!`.
//!
//! # Example
//!
//! ```
//! use cellgrid_core::named_range::{NameScope, NamedRange, NamedRangeCollection};
//! use cellgrid_core::{ShiftMode, StructuralEdit};
//!
//! let mut names = NamedRangeCollection::new();
//! names
//!     .define(NamedRange::parse("TaxRate", "Sheet1!$B$4", NameScope::Workbook).unwrap())
//!     .unwrap();
//!
//! names.apply_edit("Sheet1", StructuralEdit::InsertRows { at: 2, count: 1 }, ShiftMode::All);
//! let rate = names.get("taxrate", "Sheet1").unwrap();
//! assert_eq!(rate.refers_to.to_text(), "'Sheet1'!$B$5");
//! ```

use ahash::AHashMap;
use log::debug;

use crate::address::{Addresses, ShiftMode};
use crate::cell::CellAddress;
use crate::edit::StructuralEdit;
use crate::error::{Error, Result};
use crate::REF_ERROR;

/// Maximum length of a defined name
pub const MAX_NAME_LEN: usize = 255;

/// Scope of a named range
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameScope {
    /// Available throughout the workbook (global)
    Workbook,
    /// Scoped to a specific sheet (local), by sheet name
    Sheet(String),
}

impl NameScope {
    fn key(&self) -> Option<String> {
        match self {
            NameScope::Workbook => None,
            NameScope::Sheet(sheet) => Some(sheet.to_lowercase()),
        }
    }

    fn is_sheet(&self, name: &str) -> bool {
        matches!(self, NameScope::Sheet(sheet) if sheet.to_lowercase() == name.to_lowercase())
    }
}

/// What a name points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefersTo {
    /// A live reference
    Range(Addresses),
    /// The referenced cells were deleted
    Broken,
}

impl RefersTo {
    /// Formula text of the target (`'Sheet1'!$A$1:$B$2` or `#REF!`)
    pub fn to_text(&self) -> String {
        match self {
            RefersTo::Range(addresses) => addresses.to_full_text(),
            RefersTo::Broken => REF_ERROR.to_string(),
        }
    }

    /// The target addresses, if not broken
    pub fn addresses(&self) -> Option<&Addresses> {
        match self {
            RefersTo::Range(addresses) => Some(addresses),
            RefersTo::Broken => None,
        }
    }

    /// Whether the target is `#REF!`, either fully or through its worksheet qualifier
    pub fn is_broken(&self) -> bool {
        match self {
            RefersTo::Range(addresses) => addresses.first().is_broken(),
            RefersTo::Broken => true,
        }
    }
}

/// A named range definition
#[derive(Debug, Clone)]
pub struct NamedRange {
    /// The name (e.g., "SalesData", "TaxRate")
    /// Names are case-insensitive
    pub name: String,
    /// Scope of this name (workbook-wide or sheet-specific)
    pub scope: NameScope,
    /// What the name refers to
    pub refers_to: RefersTo,
    /// Optional comment/description for documentation
    pub comment: Option<String>,
    /// Whether this name is hidden from the UI
    pub hidden: bool,
}

impl NamedRange {
    /// Create a new named range
    pub fn new(name: impl Into<String>, refers_to: Addresses, scope: NameScope) -> Self {
        Self {
            name: name.into(),
            scope,
            refers_to: RefersTo::Range(refers_to),
            comment: None,
            hidden: false,
        }
    }

    /// Create a named range from reference text such as `Sheet1!$A$1:$D$10`
    pub fn parse(name: impl Into<String>, refers_to: &str, scope: NameScope) -> Result<Self> {
        Ok(Self::new(name, Addresses::parse(refers_to)?, scope))
    }

    /// Set a comment for this named range
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Mark this named range as hidden
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Whether the target lives on `sheet`
    ///
    /// An unqualified target of a sheet-scoped name lives on its scope sheet.
    fn targets_sheet(&self, sheet: &str) -> bool {
        let Some(addresses) = self.refers_to.addresses() else {
            return false;
        };
        match addresses.worksheet() {
            Some(qualifier) => qualifier.matches(sheet),
            None => self.scope.is_sheet(sheet),
        }
    }
}

/// Check a defined name against the naming rules
///
/// A name starts with a letter, `_` or `\`, continues with letters, digits, `_`, `.`,
/// `\` or `?`, and must not read as a cell reference (`A1`, `XFD100`) or as `R`/`C`.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = |why: &str| Err(Error::InvalidName(format!("'{}' {}", name, why)));

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(Error::InvalidName("empty name".into()));
    };
    if name.chars().count() > MAX_NAME_LEN {
        return invalid("is too long");
    }
    if !(first.is_alphabetic() || first == '_' || first == '\\') {
        return invalid("must start with a letter, '_' or '\\'");
    }
    if let Some(c) = chars.find(|&c| !(c.is_alphanumeric() || matches!(c, '_' | '.' | '\\' | '?'))) {
        return invalid(&format!("contains '{}'", c));
    }
    if name.eq_ignore_ascii_case("r") || name.eq_ignore_ascii_case("c") {
        return invalid("is reserved");
    }
    if CellAddress::parse(name).is_ok() {
        return invalid("looks like a cell reference");
    }
    Ok(())
}

/// Collection of named ranges with efficient lookup
///
/// Keys are the lowercased scope sheet (`None` for workbook scope) and the lowercased
/// name.
#[derive(Debug, Default, Clone)]
pub struct NamedRangeCollection {
    ranges: AHashMap<(Option<String>, String), NamedRange>,
}

impl NamedRangeCollection {
    /// Create a new empty collection
    pub fn new() -> Self {
        Self::default()
    }

    fn make_key(name: &str, scope: &NameScope) -> (Option<String>, String) {
        (scope.key(), name.to_lowercase())
    }

    /// Define a new named range
    ///
    /// Fails with [`Error::DuplicateName`] if the name already exists in the same scope.
    pub fn define(&mut self, range: NamedRange) -> Result<()> {
        validate_name(&range.name)?;
        let key = Self::make_key(&range.name, &range.scope);

        if self.ranges.contains_key(&key) {
            return Err(Error::DuplicateName(range.name));
        }

        self.ranges.insert(key, range);
        Ok(())
    }

    /// Define or update a named range, returning the definition it replaced
    pub fn define_or_update(&mut self, range: NamedRange) -> Result<Option<NamedRange>> {
        validate_name(&range.name)?;
        let key = Self::make_key(&range.name, &range.scope);
        Ok(self.ranges.insert(key, range))
    }

    /// Get a named range by name and current sheet context
    ///
    /// A name scoped to `current_sheet` shadows a workbook-scoped name.
    pub fn get(&self, name: &str, current_sheet: &str) -> Option<&NamedRange> {
        let sheet_key = Self::make_key(name, &NameScope::Sheet(current_sheet.to_string()));
        if let Some(range) = self.ranges.get(&sheet_key) {
            return Some(range);
        }

        let workbook_key = Self::make_key(name, &NameScope::Workbook);
        self.ranges.get(&workbook_key)
    }

    /// Get a named range by exact scope
    pub fn get_exact(&self, name: &str, scope: &NameScope) -> Option<&NamedRange> {
        self.ranges.get(&Self::make_key(name, scope))
    }

    /// Remove a named range
    pub fn remove(&mut self, name: &str, scope: &NameScope) -> Option<NamedRange> {
        self.ranges.remove(&Self::make_key(name, scope))
    }

    /// Check if a name exists in the given scope
    pub fn contains(&self, name: &str, scope: &NameScope) -> bool {
        self.ranges.contains_key(&Self::make_key(name, scope))
    }

    /// Iterate over all named ranges
    pub fn iter(&self) -> impl Iterator<Item = &NamedRange> {
        self.ranges.values()
    }

    /// Get the number of named ranges
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Get all workbook-scoped names
    pub fn workbook_names(&self) -> impl Iterator<Item = &NamedRange> {
        self.ranges
            .values()
            .filter(|r| matches!(r.scope, NameScope::Workbook))
    }

    /// Get all names scoped to a specific sheet
    pub fn sheet_names<'a>(&'a self, sheet: &'a str) -> impl Iterator<Item = &'a NamedRange> {
        self.ranges.values().filter(move |r| r.scope.is_sheet(sheet))
    }

    /// Rewrite every name whose target lives on `sheet` for a structural edit
    ///
    /// Targets the edit deletes entirely become [`RefersTo::Broken`]. Returns the number
    /// of names whose target changed.
    pub fn apply_edit(&mut self, sheet: &str, edit: StructuralEdit, mode: ShiftMode) -> usize {
        let mut changed = 0;
        for range in self.ranges.values_mut() {
            if !range.targets_sheet(sheet) {
                continue;
            }
            let RefersTo::Range(addresses) = &range.refers_to else {
                continue;
            };
            let rewritten = match edit.apply_to_addresses(addresses, mode) {
                Some(next) => RefersTo::Range(next),
                None => RefersTo::Broken,
            };
            if rewritten != range.refers_to {
                range.refers_to = rewritten;
                changed += 1;
            }
        }
        debug!("{:?} on '{}' rewrote {} names", edit, sheet, changed);
        changed
    }

    /// Follow a worksheet rename in both targets and scopes
    ///
    /// Fails with [`Error::DuplicateName`], leaving the collection unchanged, when a name
    /// scoped to `old` is also defined in the scope of `new`.
    pub fn rename_sheet(&mut self, old: &str, new: &str) -> Result<()> {
        if old.to_lowercase() != new.to_lowercase() {
            let target = NameScope::Sheet(new.to_string());
            let clash = self
                .ranges
                .values()
                .find(|r| r.scope.is_sheet(old) && self.contains(&r.name, &target));
            if let Some(range) = clash {
                return Err(Error::DuplicateName(range.name.clone()));
            }
        }

        let ranges = std::mem::take(&mut self.ranges);
        self.ranges = ranges
            .into_iter()
            .map(|(_, mut range)| {
                if let RefersTo::Range(addresses) = &range.refers_to {
                    range.refers_to = RefersTo::Range(addresses.change_worksheet(old, Some(new)));
                }
                if range.scope.is_sheet(old) {
                    range.scope = NameScope::Sheet(new.to_string());
                }
                (Self::make_key(&range.name, &range.scope), range)
            })
            .collect();
        debug!("renamed sheet '{}' to '{}' in {} names", old, new, self.ranges.len());
        Ok(())
    }

    /// Follow a worksheet deletion
    ///
    /// Names scoped to the sheet are dropped and returned; targets on the sheet become
    /// `#REF!`-qualified.
    pub fn remove_sheet(&mut self, sheet: &str) -> Vec<NamedRange> {
        let mut removed = Vec::new();
        self.ranges.retain(|_, range| {
            if range.scope.is_sheet(sheet) {
                removed.push(range.clone());
                return false;
            }
            if let RefersTo::Range(addresses) = &range.refers_to {
                range.refers_to = RefersTo::Range(addresses.change_worksheet(sheet, None));
            }
            true
        });
        debug!("removed sheet '{}', dropped {} scoped names", sheet, removed.len());
        removed
    }
}
