//! Insert/delete arithmetic for one axis of a range
//!
//! Rows and columns share the same arithmetic. A range contributes a [`Span`]: its two
//! corner coordinates on the edited axis plus their fixed flags. Everything is computed
//! in `u64` so that `position + count` never overflows before it is compared with the
//! axis limit.

/// Which corners take part in a structural rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShiftMode {
    /// Every corner moves with the edit
    #[default]
    All,
    /// Only `$`-fixed corners move; relative corners keep their coordinate
    ///
    /// Used for references whose relative parts are re-resolved by their owner, such as
    /// defined names.
    FixedOnly,
    /// No corner moves
    ///
    /// Inserts leave the range untouched. Deletes still remove a range that the deleted
    /// block fully covers.
    Pinned,
}

impl ShiftMode {
    fn moves(self, fixed: bool) -> bool {
        match self {
            ShiftMode::All => true,
            ShiftMode::FixedOnly => fixed,
            ShiftMode::Pinned => false,
        }
    }
}

/// The two corners of a range on the edited axis, `from <= to`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub from: u32,
    pub to: u32,
    pub from_fixed: bool,
    pub to_fixed: bool,
}

impl Span {
    pub(crate) fn new(from: u32, to: u32, from_fixed: bool, to_fixed: bool) -> Self {
        Self {
            from,
            to,
            from_fixed,
            to_fixed,
        }
    }
}

/// Rewrite a span for `count` units inserted at `at`
///
/// Returns the new `(from, to)` pair, or `None` when both corners are pushed beyond
/// `limit`; a corner past the limit is otherwise clamped to it. An insertion point
/// outside `1..=limit` is a no-op.
///
/// Under [`ShiftMode::FixedOnly`] a fixed `from` can move past a relative `to`, so the
/// pair is not ordered. Callers rebuild the range from corners to keep each `$` flag
/// with its coordinate.
pub(crate) fn insert_span(
    span: Span,
    at: u32,
    count: u32,
    limit: u32,
    mode: ShiftMode,
) -> Option<(u32, u32)> {
    if at < 1 || at > limit || count == 0 {
        return Some((span.from, span.to));
    }
    let (at, count, limit) = (at as u64, count as u64, limit as u64);
    let (mut from, mut to) = (span.from as u64, span.to as u64);

    if at <= from {
        if mode.moves(span.from_fixed) {
            from += count;
        }
        if mode.moves(span.to_fixed) {
            to += count;
        }
    } else if at <= to && mode.moves(span.to_fixed) {
        to += count;
    }

    if from > limit && to > limit {
        return None;
    }
    Some((from.min(limit) as u32, to.min(limit) as u32))
}

/// Rewrite a span for the block `from..from + count` being deleted
///
/// Returns `None` when the block covers the whole span. Otherwise the near corner
/// moves back by the units deleted before it, and the far corner additionally by the
/// units deleted inside the span. As with [`insert_span`] the pair may come back
/// reversed when only one corner moves.
pub(crate) fn delete_span(
    span: Span,
    from: u32,
    count: u32,
    limit: u32,
    mode: ShiftMode,
) -> Option<(u32, u32)> {
    if from < 1 || from > limit || count == 0 {
        return Some((span.from, span.to));
    }
    let start = from as i64;
    let last = (from as i64 + count as i64 - 1).min(limit as i64);
    let (f, t) = (span.from as i64, span.to as i64);

    if start <= f && last >= t {
        return None;
    }

    let before = ((last + 1).min(f) - start).max(0);
    let within = (last.min(t) - start.max(f) + 1).max(0);

    let new_from = if mode.moves(span.from_fixed) { f - before } else { f };
    let new_to = if mode.moves(span.to_fixed) {
        t - before - within
    } else {
        t
    };
    debug_assert!(new_from >= 1 && new_to >= 1, "delete moved a corner below 1");
    Some((new_from as u32, new_to as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: u32 = 1_048_576;

    fn span(from: u32, to: u32) -> Span {
        Span::new(from, to, false, false)
    }

    #[test]
    fn test_insert_before_inside_after() {
        let s = span(3, 5);
        assert_eq!(insert_span(s, 2, 3, LIMIT, ShiftMode::All), Some((6, 8)));
        assert_eq!(insert_span(s, 3, 3, LIMIT, ShiftMode::All), Some((6, 8)));
        assert_eq!(insert_span(s, 4, 3, LIMIT, ShiftMode::All), Some((3, 8)));
        assert_eq!(insert_span(s, 5, 3, LIMIT, ShiftMode::All), Some((3, 8)));
        assert_eq!(insert_span(s, 6, 3, LIMIT, ShiftMode::All), Some((3, 5)));
    }

    #[test]
    fn test_insert_out_of_range_position() {
        let s = span(3, 5);
        assert_eq!(insert_span(s, 0, 3, LIMIT, ShiftMode::All), Some((3, 5)));
        assert_eq!(insert_span(s, LIMIT + 1, 3, LIMIT, ShiftMode::All), Some((3, 5)));
    }

    #[test]
    fn test_insert_clamps_and_pushes_off() {
        let s = span(LIMIT - 2, LIMIT);
        assert_eq!(insert_span(s, LIMIT - 1, 10, LIMIT, ShiftMode::All), Some((LIMIT - 2, LIMIT)));
        assert_eq!(insert_span(s, 1, 10, LIMIT, ShiftMode::All), None);
        assert_eq!(insert_span(span(10, 20), 1, LIMIT - 15, LIMIT, ShiftMode::All), Some((LIMIT - 5, LIMIT)));
    }

    #[test]
    fn test_insert_fixed_only() {
        // the fixed corner overtakes the relative one
        let s = Span::new(3, 5, true, false);
        assert_eq!(insert_span(s, 2, 3, LIMIT, ShiftMode::FixedOnly), Some((6, 5)));
        let s = Span::new(3, 5, false, true);
        assert_eq!(insert_span(s, 2, 3, LIMIT, ShiftMode::FixedOnly), Some((3, 8)));
        assert_eq!(insert_span(s, 4, 3, LIMIT, ShiftMode::FixedOnly), Some((3, 8)));
        let s = Span::new(3, 5, true, false);
        assert_eq!(insert_span(s, 4, 3, LIMIT, ShiftMode::FixedOnly), Some((3, 5)));
    }

    #[test]
    fn test_insert_pinned() {
        let s = Span::new(3, 5, true, true);
        assert_eq!(insert_span(s, 1, 3, LIMIT, ShiftMode::Pinned), Some((3, 5)));
    }

    #[test]
    fn test_delete_cases() {
        let s = span(3, 5);
        // entirely before
        assert_eq!(delete_span(s, 1, 2, LIMIT, ShiftMode::All), Some((1, 3)));
        // interior
        assert_eq!(delete_span(s, 4, 1, LIMIT, ShiftMode::All), Some((3, 4)));
        // covering
        assert_eq!(delete_span(s, 2, 4, LIMIT, ShiftMode::All), None);
        assert_eq!(delete_span(s, 3, 3, LIMIT, ShiftMode::All), None);
        // entirely after
        assert_eq!(delete_span(s, 6, 10, LIMIT, ShiftMode::All), Some((3, 5)));
        // overlapping the start
        assert_eq!(delete_span(span(3, 10), 1, 4, LIMIT, ShiftMode::All), Some((1, 6)));
        // overlapping the end
        assert_eq!(delete_span(span(3, 10), 8, 5, LIMIT, ShiftMode::All), Some((3, 7)));
    }

    #[test]
    fn test_delete_out_of_range_position() {
        let s = span(3, 5);
        assert_eq!(delete_span(s, 0, 4, LIMIT, ShiftMode::All), Some((3, 5)));
        assert_eq!(delete_span(s, LIMIT + 1, 4, LIMIT, ShiftMode::All), Some((3, 5)));
        assert_eq!(delete_span(s, 4, 0, LIMIT, ShiftMode::All), Some((3, 5)));
    }

    #[test]
    fn test_delete_clamps_count_to_limit() {
        assert_eq!(delete_span(span(1, 10), 5, u32::MAX, LIMIT, ShiftMode::All), Some((1, 4)));
    }

    #[test]
    fn test_delete_fixed_only() {
        let s = Span::new(3, 5, false, true);
        assert_eq!(delete_span(s, 1, 2, LIMIT, ShiftMode::FixedOnly), Some((3, 3)));
        assert_eq!(delete_span(s, 1, 4, LIMIT, ShiftMode::FixedOnly), Some((3, 1)));
        let s = Span::new(3, 5, true, false);
        assert_eq!(delete_span(s, 1, 2, LIMIT, ShiftMode::FixedOnly), Some((1, 5)));
        // containment is still geometric
        assert_eq!(delete_span(s, 3, 3, LIMIT, ShiftMode::FixedOnly), None);
    }

    #[test]
    fn test_delete_pinned() {
        let s = span(3, 5);
        assert_eq!(delete_span(s, 1, 2, LIMIT, ShiftMode::Pinned), Some((3, 5)));
        assert_eq!(delete_span(s, 1, 10, LIMIT, ShiftMode::Pinned), None);
    }
}
