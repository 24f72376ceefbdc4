//! Fixed-capacity block of slots along one axis

/// A page of `2^bits` optional slots
///
/// `bounds` is the inclusive `(min, max)` offset range of occupied slots, `None` when the
/// page is empty. Every mutation goes through [`Page::insert`] or [`Page::remove`], which
/// keep `bounds` and `len` exact.
#[derive(Debug, Clone)]
pub(crate) struct Page<T> {
    slots: Box<[Option<T>]>,
    bounds: Option<(usize, usize)>,
    len: usize,
}

impl<T> Page<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            bounds: None,
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    pub(crate) fn bounds(&self) -> Option<(usize, usize)> {
        self.bounds
    }

    pub(crate) fn get(&self, offset: usize) -> Option<&T> {
        self.slots[offset].as_ref()
    }

    pub(crate) fn get_mut(&mut self, offset: usize) -> Option<&mut T> {
        self.slots[offset].as_mut()
    }

    /// Store a value, returning the previous occupant
    pub(crate) fn insert(&mut self, offset: usize, value: T) -> Option<T> {
        let previous = self.slots[offset].replace(value);
        if previous.is_none() {
            self.len += 1;
            self.bounds = Some(match self.bounds {
                Some((min, max)) => (min.min(offset), max.max(offset)),
                None => (offset, offset),
            });
        }
        previous
    }

    /// Take a value out of its slot
    pub(crate) fn remove(&mut self, offset: usize) -> Option<T> {
        let removed = self.slots[offset].take();
        if removed.is_some() {
            self.len -= 1;
            self.shrink_bounds(offset);
        }
        removed
    }

    /// First occupied offset `>= from`
    pub(crate) fn next_occupied(&self, from: usize) -> Option<usize> {
        let (min, max) = self.bounds?;
        if from > max {
            return None;
        }
        (from.max(min)..=max).find(|&i| self.slots[i].is_some())
    }

    /// Last occupied offset `<= from`
    pub(crate) fn prev_occupied(&self, from: usize) -> Option<usize> {
        let (min, max) = self.bounds?;
        if from < min {
            return None;
        }
        (min..=from.min(max)).rev().find(|&i| self.slots[i].is_some())
    }

    /// Recompute bounds after the slot at `offset` was vacated
    fn shrink_bounds(&mut self, offset: usize) {
        let Some((min, max)) = self.bounds else {
            debug_assert!(false, "removal from a page without bounds");
            return;
        };
        if self.len == 0 {
            self.bounds = None;
            return;
        }
        let min = if offset == min {
            self.next_slot(min + 1, max)
        } else {
            min
        };
        let max = if offset == max {
            self.prev_slot(max.saturating_sub(1), min)
        } else {
            max
        };
        debug_assert!(min <= max, "page bounds inverted after removal");
        self.bounds = Some((min, max));
    }

    fn next_slot(&self, from: usize, to: usize) -> usize {
        match (from..=to).find(|&i| self.slots[i].is_some()) {
            Some(i) => i,
            None => panic!("page len {} but no slot in {}..={}", self.len, from, to),
        }
    }

    fn prev_slot(&self, from: usize, to: usize) -> usize {
        match (to..=from).rev().find(|&i| self.slots[i].is_some()) {
            Some(i) => i,
            None => panic!("page len {} but no slot in {}..={}", self.len, to, from),
        }
    }

    /// Remove every occupied slot in `from..=to`, yielding `(offset, value)` in order
    pub(crate) fn drain_range(&mut self, from: usize, to: usize) -> Vec<(usize, T)> {
        let mut drained = Vec::new();
        let Some((min, max)) = self.bounds else {
            return drained;
        };
        let (from, to) = (from.max(min), to.min(max));
        if from > to {
            return drained;
        }
        for offset in from..=to {
            if let Some(value) = self.slots[offset].take() {
                drained.push((offset, value));
            }
        }
        self.len -= drained.len();
        self.rebuild_bounds();
        drained
    }

    /// Keep only the occupied slots for which `keep` returns true
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(usize, &mut T) -> bool) {
        let Some((min, max)) = self.bounds else {
            return;
        };
        for offset in min..=max {
            let drop = match self.slots[offset].as_mut() {
                Some(value) => !keep(offset, value),
                None => false,
            };
            if drop {
                self.slots[offset] = None;
                self.len -= 1;
            }
        }
        self.rebuild_bounds();
    }

    fn rebuild_bounds(&mut self) {
        if self.len == 0 {
            self.bounds = None;
            return;
        }
        let Some((min, max)) = self.bounds else {
            debug_assert!(false, "non-empty page without bounds");
            return;
        };
        let min = self.next_slot(min, max);
        let max = self.prev_slot(max, min);
        self.bounds = Some((min, max));
    }

    /// Iterate occupied slots in `from..=to`
    pub(crate) fn iter_range(&self, from: usize, to: usize) -> impl Iterator<Item = (usize, &T)> {
        let (lo, hi) = match self.bounds {
            Some((min, max)) => (from.max(min), to.min(max)),
            None => (1, 0),
        };
        let slots = &self.slots;
        (lo..=hi).filter_map(move |i| slots[i].as_ref().map(|v| (i, v)))
    }
}
