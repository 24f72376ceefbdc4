//! Single-axis sparse array built from pages
//!
//! An index is split into a page number (`index >> bits`) and an offset inside that
//! page (`index & mask`). Pages are allocated on first write and dropped as soon as
//! they become empty, so memory follows the occupied slots rather than the axis length.

use super::page::Page;

/// Sparse array over `0..limit` addressed through fixed-size pages
///
/// The axis caches the inclusive `(min, max)` occupied index. It is refreshed by
/// [`PagedAxis::sync_page`] after every page mutation, which is the only place where
/// page bookkeeping is folded into the axis bookkeeping.
#[derive(Debug, Clone)]
pub struct PagedAxis<T> {
    bits: u32,
    mask: usize,
    limit: usize,
    pages: Vec<Option<Page<T>>>,
    bounds: Option<(usize, usize)>,
    len: usize,
}

impl<T> PagedAxis<T> {
    /// Create an empty axis with `2^bits` slots per page and indices `0..limit`
    pub fn new(bits: u32, limit: usize) -> Self {
        Self {
            bits,
            mask: (1 << bits) - 1,
            limit,
            pages: Vec::new(),
            bounds: None,
            len: 0,
        }
    }

    /// Number of valid indices
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no slot is occupied
    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Lowest occupied index
    pub fn min_index(&self) -> Option<usize> {
        self.bounds.map(|(min, _)| min)
    }

    /// Highest occupied index
    pub fn max_index(&self) -> Option<usize> {
        self.bounds.map(|(_, max)| max)
    }

    /// Number of allocated pages
    pub fn page_count(&self) -> usize {
        self.pages.iter().filter(|p| p.is_some()).count()
    }

    #[inline]
    fn split(&self, index: usize) -> (usize, usize) {
        (index >> self.bits, index & self.mask)
    }

    #[inline]
    fn join(&self, page_no: usize, offset: usize) -> usize {
        (page_no << self.bits) | offset
    }

    fn page(&self, page_no: usize) -> Option<&Page<T>> {
        self.pages.get(page_no).and_then(|p| p.as_ref())
    }

    /// Get the value at `index`
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.limit {
            return None;
        }
        let (page_no, offset) = self.split(index);
        self.page(page_no).and_then(|p| p.get(offset))
    }

    /// Get a mutable reference to the value at `index`
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.limit {
            return None;
        }
        let (page_no, offset) = self.split(index);
        self.pages
            .get_mut(page_no)
            .and_then(|p| p.as_mut())
            .and_then(|p| p.get_mut(offset))
    }

    /// Whether `index` is occupied
    pub fn contains(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    fn page_mut_or_alloc(&mut self, page_no: usize) -> &mut Page<T> {
        if self.pages.len() <= page_no {
            self.pages.resize_with(page_no + 1, || None);
        }
        let capacity = 1 << self.bits;
        self.pages[page_no].get_or_insert_with(|| Page::new(capacity))
    }

    /// Store `value` at `index`, returning the previous value
    ///
    /// Indices outside `0..limit` are ignored and the value is dropped.
    pub fn insert(&mut self, index: usize, value: T) -> Option<T> {
        if index >= self.limit {
            return None;
        }
        let (page_no, offset) = self.split(index);
        let previous = self.page_mut_or_alloc(page_no).insert(offset, value);
        if previous.is_none() {
            self.len += 1;
        }
        self.sync_page(page_no);
        previous
    }

    /// Get the value at `index`, creating it with `f` when vacant
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside `0..limit`.
    pub fn get_or_insert_with(&mut self, index: usize, f: impl FnOnce() -> T) -> &mut T {
        assert!(
            index < self.limit,
            "index {} outside axis limit {}",
            index,
            self.limit
        );
        let (page_no, offset) = self.split(index);
        if self.page(page_no).and_then(|p| p.get(offset)).is_none() {
            self.len += 1;
            self.page_mut_or_alloc(page_no).insert(offset, f());
            self.sync_page(page_no);
        }
        match self.get_mut(index) {
            Some(value) => value,
            None => unreachable!("slot {} initialised above", index),
        }
    }

    /// Remove and return the value at `index`
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.limit {
            return None;
        }
        let (page_no, offset) = self.split(index);
        let removed = self
            .pages
            .get_mut(page_no)
            .and_then(|p| p.as_mut())
            .and_then(|p| p.remove(offset));
        if removed.is_some() {
            self.len -= 1;
            self.sync_page(page_no);
        }
        removed
    }

    /// Fold the state of one page into the axis bookkeeping
    ///
    /// Empty pages are released. The axis bounds are widened when the page grew and
    /// recomputed from the outermost pages when the page was on an edge.
    fn sync_page(&mut self, page_no: usize) {
        let page_bounds = match self.pages.get(page_no).and_then(|p| p.as_ref()) {
            Some(page) => page.bounds(),
            None => None,
        };
        if page_bounds.is_none() && page_no < self.pages.len() {
            self.pages[page_no] = None;
            while matches!(self.pages.last(), Some(None)) {
                self.pages.pop();
            }
        }

        let first = self.join(page_no, 0);
        let last = self.join(page_no, self.mask);
        match (self.bounds, page_bounds) {
            (None, Some((min, max))) => {
                self.bounds = Some((self.join(page_no, min), self.join(page_no, max)));
            }
            (Some((min, max)), Some((pmin, pmax))) => {
                let (pmin, pmax) = (self.join(page_no, pmin), self.join(page_no, pmax));
                let min = if min >= first && min <= last { pmin } else { min.min(pmin) };
                let max = if max >= first && max <= last { pmax } else { max.max(pmax) };
                self.bounds = Some((min, max));
            }
            (Some((min, max)), None) => {
                if (min >= first && min <= last) || (max >= first && max <= last) {
                    self.rebuild_bounds();
                }
            }
            (None, None) => {}
        }
        debug_assert_eq!(self.bounds.is_none(), self.len == 0, "axis bounds out of sync");
    }

    /// Recompute the axis bounds from the first and last allocated pages
    fn rebuild_bounds(&mut self) {
        let first = self
            .pages
            .iter()
            .enumerate()
            .find_map(|(no, p)| p.as_ref().and_then(|p| p.bounds()).map(|(min, _)| (no, min)));
        let last = self
            .pages
            .iter()
            .enumerate()
            .rev()
            .find_map(|(no, p)| p.as_ref().and_then(|p| p.bounds()).map(|(_, max)| (no, max)));
        self.bounds = match (first, last) {
            (Some((fno, min)), Some((lno, max))) => Some((self.join(fno, min), self.join(lno, max))),
            _ => None,
        };
    }

    /// First occupied index `>= from`
    pub fn next_occupied(&self, from: usize) -> Option<usize> {
        let (min, max) = self.bounds?;
        if from > max {
            return None;
        }
        let from = from.max(min);
        let (start_page, start_offset) = self.split(from);
        for page_no in start_page..self.pages.len() {
            let Some(page) = self.page(page_no) else {
                continue;
            };
            let offset = if page_no == start_page { start_offset } else { 0 };
            if let Some(found) = page.next_occupied(offset) {
                return Some(self.join(page_no, found));
            }
        }
        None
    }

    /// Last occupied index `<= from`
    pub fn prev_occupied(&self, from: usize) -> Option<usize> {
        let (min, max) = self.bounds?;
        if from < min {
            return None;
        }
        let from = from.min(max);
        let (start_page, start_offset) = self.split(from);
        for page_no in (0..=start_page).rev() {
            let Some(page) = self.page(page_no) else {
                continue;
            };
            let offset = if page_no == start_page {
                start_offset
            } else {
                self.mask
            };
            if let Some(found) = page.prev_occupied(offset) {
                return Some(self.join(page_no, found));
            }
        }
        None
    }

    /// Remove every value in `from..=to`
    pub fn clear_range(&mut self, from: usize, to: usize) {
        self.retain_range(from, to, |_, _| false);
    }

    /// Remove every value
    pub fn clear(&mut self) {
        self.pages.clear();
        self.bounds = None;
        self.len = 0;
    }

    /// Keep only the values in `from..=to` for which `keep` returns true
    ///
    /// Values outside the interval are untouched. `keep` may mutate the value it keeps.
    pub fn retain_range(
        &mut self,
        from: usize,
        to: usize,
        mut keep: impl FnMut(usize, &mut T) -> bool,
    ) {
        let Some((min, max)) = self.bounds else {
            return;
        };
        let (from, to) = (from.max(min), to.min(max));
        if from > to {
            return;
        }
        let (first_page, first_offset) = self.split(from);
        let (last_page, last_offset) = self.split(to);
        let bits = self.bits;
        for page_no in first_page..=last_page.min(self.pages.len().saturating_sub(1)) {
            let Some(page) = self.pages.get_mut(page_no).and_then(|p| p.as_mut()) else {
                continue;
            };
            let lo = if page_no == first_page { first_offset } else { 0 };
            let hi = if page_no == last_page {
                last_offset
            } else {
                page.capacity() - 1
            };
            let before = page.len();
            page.retain(|offset, value| {
                if offset < lo || offset > hi {
                    return true;
                }
                keep((page_no << bits) | offset, value)
            });
            self.len -= before - page.len();
            self.sync_page(page_no);
        }
    }

    /// Take out every value with index `>= from`, in ascending order
    fn split_off(&mut self, from: usize) -> Vec<(usize, T)> {
        let mut taken = Vec::new();
        if self.max_index().map_or(true, |max| from > max) {
            return taken;
        }
        let (first_page, first_offset) = self.split(from);
        for page_no in first_page..self.pages.len() {
            let Some(page) = self.pages[page_no].as_mut() else {
                continue;
            };
            let lo = if page_no == first_page { first_offset } else { 0 };
            let hi = page.capacity() - 1;
            let base = page_no << self.bits;
            taken.extend(
                page.drain_range(lo, hi)
                    .into_iter()
                    .map(|(offset, value)| (base | offset, value)),
            );
            if page.is_empty() {
                self.pages[page_no] = None;
            }
        }
        while matches!(self.pages.last(), Some(None)) {
            self.pages.pop();
        }
        self.len -= taken.len();
        self.rebuild_bounds();
        taken
    }

    /// Delete `count` slots starting at `from`, moving later slots back by `count`
    ///
    /// When `from` and `count` are both page aligned whole pages are removed from the
    /// page table; otherwise the values past `from` are re-slotted one by one.
    /// Returns the number of values that changed index.
    pub fn delete_shift(&mut self, from: usize, count: usize) -> usize {
        if count == 0 || from >= self.limit || self.is_empty() {
            return 0;
        }
        let end = from.saturating_add(count);
        if from & self.mask == 0 && count & self.mask == 0 {
            let first_page = from >> self.bits;
            if first_page >= self.pages.len() {
                return 0;
            }
            let last_page = (end >> self.bits).min(self.pages.len());
            let moved = self.pages[last_page..]
                .iter()
                .flatten()
                .map(|p| p.len())
                .sum();
            let removed: usize = self
                .pages
                .drain(first_page..last_page)
                .flatten()
                .map(|p| p.len())
                .sum();
            while matches!(self.pages.last(), Some(None)) {
                self.pages.pop();
            }
            self.len -= removed;
            self.rebuild_bounds();
            return moved;
        }

        let tail = self.split_off(from);
        let mut moved = 0;
        for (index, value) in tail {
            if index >= end {
                self.insert(index - count, value);
                moved += 1;
            }
        }
        moved
    }

    /// Open a gap of `count` slots at `at`, moving later slots forward by `count`
    ///
    /// Values pushed to `limit` or beyond are dropped. Returns the number of values
    /// that changed index.
    pub fn insert_shift(&mut self, at: usize, count: usize) -> usize {
        if count == 0 || at >= self.limit || self.max_index().map_or(true, |max| at > max) {
            return 0;
        }
        if at & self.mask == 0 && count & self.mask == 0 {
            let at_page = at >> self.bits;
            let gap = count >> self.bits;
            self.pages
                .splice(at_page..at_page, std::iter::repeat_with(|| None).take(gap));
            let page_limit = (self.limit + self.mask) >> self.bits;
            if self.pages.len() > page_limit {
                let dropped: usize = self
                    .pages
                    .drain(page_limit..)
                    .flatten()
                    .map(|p| p.len())
                    .sum();
                self.len -= dropped;
            }
            while matches!(self.pages.last(), Some(None)) {
                self.pages.pop();
            }
            self.trim_to_limit();
            self.rebuild_bounds();
            return self
                .pages
                .iter()
                .skip(at_page + gap)
                .flatten()
                .map(|p| p.len())
                .sum();
        }

        let tail = self.split_off(at);
        let mut moved = 0;
        for (index, value) in tail {
            let target = index + count;
            if target < self.limit {
                self.insert(target, value);
                moved += 1;
            }
        }
        moved
    }

    /// Drop values at or beyond `limit` inside the last, partially valid page
    fn trim_to_limit(&mut self) {
        if self.limit & self.mask == 0 {
            return;
        }
        let (page_no, offset) = self.split(self.limit);
        if let Some(page) = self.pages.get_mut(page_no).and_then(|p| p.as_mut()) {
            let hi = page.capacity() - 1;
            let dropped = page.drain_range(offset, hi).len();
            self.len -= dropped;
            if page.is_empty() {
                self.pages[page_no] = None;
            }
        }
        while matches!(self.pages.last(), Some(None)) {
            self.pages.pop();
        }
    }

    /// Iterate occupied `(index, value)` pairs in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.range(0, self.limit.saturating_sub(1))
    }

    /// Iterate occupied `(index, value)` pairs in `from..=to`, skipping unallocated pages
    pub fn range(&self, from: usize, to: usize) -> impl Iterator<Item = (usize, &T)> {
        let (first_page, _) = self.split(from);
        let (last_page, _) = self.split(to);
        let bits = self.bits;
        let mask = self.mask;
        self.pages
            .iter()
            .enumerate()
            .skip(first_page)
            .take((last_page + 1).saturating_sub(first_page))
            .filter_map(|(no, p)| p.as_ref().map(|p| (no, p)))
            .flat_map(move |(no, page)| {
                let base = no << bits;
                let lo = if no == first_page { from & mask } else { 0 };
                let hi = if no == last_page { to & mask } else { mask };
                page.iter_range(lo, hi).map(move |(offset, v)| (base | offset, v))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn indices<T>(axis: &PagedAxis<T>) -> Vec<usize> {
        axis.iter().map(|(i, _)| i).collect()
    }

    #[test]
    fn test_insert_get_remove() {
        let mut axis = PagedAxis::new(3, 100);
        assert!(axis.is_empty());

        axis.insert(5, "five");
        axis.insert(42, "forty-two");
        assert_eq!(axis.get(5), Some(&"five"));
        assert_eq!(axis.get(42), Some(&"forty-two"));
        assert_eq!(axis.get(6), None);
        assert_eq!(axis.len(), 2);
        assert_eq!((axis.min_index(), axis.max_index()), (Some(5), Some(42)));
        assert_eq!(axis.page_count(), 2);

        assert_eq!(axis.remove(42), Some("forty-two"));
        assert_eq!(axis.max_index(), Some(5));
        assert_eq!(axis.page_count(), 1);
        assert_eq!(axis.remove(5), Some("five"));
        assert!(axis.is_empty());
        assert_eq!(axis.page_count(), 0);
    }

    #[test]
    fn test_out_of_limit_is_ignored() {
        let mut axis = PagedAxis::new(3, 10);
        assert_eq!(axis.insert(10, 1), None);
        assert!(axis.is_empty());
        assert_eq!(axis.get(10), None);
        assert_eq!(axis.remove(10), None);
    }

    #[test]
    fn test_next_prev_across_pages() {
        let mut axis = PagedAxis::new(2, 64);
        for i in [1, 9, 30, 31] {
            axis.insert(i, ());
        }
        assert_eq!(axis.next_occupied(0), Some(1));
        assert_eq!(axis.next_occupied(2), Some(9));
        assert_eq!(axis.next_occupied(10), Some(30));
        assert_eq!(axis.next_occupied(32), None);

        assert_eq!(axis.prev_occupied(63), Some(31));
        assert_eq!(axis.prev_occupied(29), Some(9));
        assert_eq!(axis.prev_occupied(8), Some(1));
        assert_eq!(axis.prev_occupied(0), None);
    }

    #[test]
    fn test_get_or_insert_with() {
        let mut axis: PagedAxis<Vec<u8>> = PagedAxis::new(4, 100);
        axis.get_or_insert_with(7, Vec::new).push(1);
        axis.get_or_insert_with(7, Vec::new).push(2);
        assert_eq!(axis.get(7), Some(&vec![1, 2]));
        assert_eq!(axis.len(), 1);
        assert_eq!(axis.min_index(), Some(7));
    }

    #[test]
    fn test_retain_range_updates_bounds() {
        let mut axis = PagedAxis::new(2, 32);
        for i in 0..20 {
            axis.insert(i, i);
        }
        axis.retain_range(0, 9, |_, v| *v % 5 == 0);
        assert_eq!(indices(&axis), vec![0, 5, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19]);

        axis.clear_range(0, 30);
        assert!(axis.is_empty());
        assert_eq!(axis.len(), 0);
        assert_eq!(axis.page_count(), 0);
    }

    #[test]
    fn test_delete_shift_unaligned() {
        let mut axis = PagedAxis::new(2, 32);
        for i in [0, 3, 4, 5, 9, 17] {
            axis.insert(i, i);
        }
        let moved = axis.delete_shift(3, 3);
        assert_eq!(moved, 2);
        assert_eq!(indices(&axis), vec![0, 6, 14]);
        assert_eq!(axis.get(6), Some(&9));
        assert_eq!(axis.get(14), Some(&17));
        assert_eq!(axis.len(), 3);
    }

    #[test]
    fn test_delete_shift_page_aligned() {
        let mut axis = PagedAxis::new(2, 32);
        for i in [1, 4, 7, 8, 13] {
            axis.insert(i, i);
        }
        let moved = axis.delete_shift(4, 4);
        assert_eq!(moved, 2);
        assert_eq!(indices(&axis), vec![1, 4, 9]);
        assert_eq!(axis.get(4), Some(&8));
        assert_eq!(axis.max_index(), Some(9));
    }

    #[test]
    fn test_insert_shift_drops_past_limit() {
        let mut axis = PagedAxis::new(2, 10);
        for i in [2, 6, 9] {
            axis.insert(i, i);
        }
        let moved = axis.insert_shift(3, 2);
        assert_eq!(moved, 1);
        assert_eq!(indices(&axis), vec![2, 8]);
        assert_eq!(axis.len(), 2);
    }

    #[test]
    fn test_insert_shift_page_aligned() {
        let mut axis = PagedAxis::new(2, 18);
        for i in [1, 4, 9, 13] {
            axis.insert(i, i);
        }
        axis.insert_shift(4, 4);
        assert_eq!(indices(&axis), vec![1, 8, 13, 17]);
        assert_eq!(axis.len(), 4);

        axis.insert_shift(8, 8);
        assert_eq!(indices(&axis), vec![1, 16]);
        assert_eq!(axis.len(), 2);
        assert_eq!(axis.max_index(), Some(16));
    }

    #[test]
    fn test_delete_then_insert_restores_indices() {
        let mut axis = PagedAxis::new(3, 1000);
        let cells = [0, 5, 17, 40, 41, 300, 999];
        for i in cells {
            axis.insert(i, i);
        }
        axis.delete_shift(20, 10);
        axis.insert_shift(20, 10);
        assert_eq!(indices(&axis), vec![0, 5, 17, 40, 41, 300, 999]);
        for (i, v) in axis.iter() {
            assert_eq!(i, *v);
        }
    }

    #[test]
    fn test_range_iteration() {
        let mut axis = PagedAxis::new(2, 64);
        for i in [0, 3, 4, 11, 12, 40] {
            axis.insert(i, ());
        }
        let got: Vec<_> = axis.range(3, 12).map(|(i, _)| i).collect();
        assert_eq!(got, vec![3, 4, 11, 12]);
        let got: Vec<_> = axis.range(13, 39).map(|(i, _)| i).collect();
        assert!(got.is_empty());
    }
}
