// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Pairwise compatibility cache
//!
//! The bid selector asks the same question many times: is bid `x_index` of
//! slot `x_slot` compatible with bid `y_index` of slot `y_slot`? A
//! [`PairCache`] memoizes those verdicts so each pair is compared at most
//! once per selection.
//!
//! Two implementations are provided:
//!
//! - [`MapPairCache`]: a hash map keyed by [`PairKey`]. Memory grows with
//!   the number of pairs actually visited.
//! - [`DensePairCache`]: a flat table over every (slot, bid) pair, sized up
//!   front from the slot list lengths. Constant-time lookups without
//!   hashing at the price of quadratic memory in the total bid count.

use rustc_hash::FxHashMap;

/// Identifies one pairwise comparison between two slot positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    pub x_slot: usize,
    pub x_index: usize,
    pub y_slot: usize,
    pub y_index: usize,
}

impl PairKey {
    #[inline]
    pub const fn new(x_slot: usize, x_index: usize, y_slot: usize, y_index: usize) -> Self {
        Self {
            x_slot,
            x_index,
            y_slot,
            y_index,
        }
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.x_slot, self.x_index, self.y_slot, self.y_index
        )
    }
}

/// Lookup counters of a [`PairCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    #[inline]
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups answered from the cache, `0.0` before any lookup.
    #[inline]
    pub fn hit_ratio(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

pub trait PairCache {
    /// Returns the stored verdict for `key`, counting a hit or a miss.
    fn lookup(&mut self, key: PairKey) -> Option<bool>;

    fn store(&mut self, key: PairKey, verdict: bool);

    fn stats(&self) -> CacheStats;

    /// Number of stored verdicts.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all verdicts and resets the counters.
    fn clear(&mut self);

    /// Returns the cached verdict for `key`, computing and storing it on a miss.
    #[inline]
    fn get_or_compute<F>(&mut self, key: PairKey, compute: F) -> bool
    where
        F: FnOnce() -> bool,
        Self: Sized,
    {
        match self.lookup(key) {
            Some(v) => v,
            None => {
                let v = compute();
                self.store(key, v);
                v
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapPairCache {
    map: FxHashMap<PairKey, bool>,
    stats: CacheStats,
}

impl MapPairCache {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            stats: CacheStats::default(),
        }
    }
}

impl PairCache for MapPairCache {
    #[inline]
    fn lookup(&mut self, key: PairKey) -> Option<bool> {
        let v = self.map.get(&key).copied();
        if v.is_some() {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        v
    }

    #[inline]
    fn store(&mut self, key: PairKey, verdict: bool) {
        self.map.insert(key, verdict);
    }

    #[inline]
    fn stats(&self) -> CacheStats {
        self.stats
    }

    #[inline]
    fn len(&self) -> usize {
        self.map.len()
    }

    fn clear(&mut self) {
        self.map.clear();
        self.stats = CacheStats::default();
    }
}

const UNKNOWN: u8 = 0;
const INCOMPATIBLE: u8 = 1;
const COMPATIBLE: u8 = 2;

/// Flat verdict table over all `(slot, bid)` positions.
///
/// Keys outside the slot lengths given at construction are never stored
/// and always report a miss.
#[derive(Debug, Clone)]
pub struct DensePairCache {
    offsets: Vec<usize>,
    lens: Vec<usize>,
    width: usize,
    cells: Vec<u8>,
    stored: usize,
    stats: CacheStats,
}

impl DensePairCache {
    /// Sizes the table for slots holding `slot_lens[i]` bids each.
    pub fn new(slot_lens: &[usize]) -> Self {
        let mut offsets = Vec::with_capacity(slot_lens.len());
        let mut width = 0usize;
        for &len in slot_lens {
            offsets.push(width);
            width += len;
        }
        Self {
            offsets,
            lens: slot_lens.to_vec(),
            width,
            cells: vec![UNKNOWN; width * width],
            stored: 0,
            stats: CacheStats::default(),
        }
    }

    /// Creates a cache shaped after per-slot bid lists.
    pub fn for_slots<B>(slots: &[Vec<B>]) -> Self {
        let lens: Vec<usize> = slots.iter().map(Vec::len).collect();
        Self::new(&lens)
    }

    #[inline]
    fn flat(&self, slot: usize, index: usize) -> Option<usize> {
        let len = *self.lens.get(slot)?;
        if index < len {
            Some(self.offsets[slot] + index)
        } else {
            None
        }
    }

    #[inline]
    fn cell(&self, key: PairKey) -> Option<usize> {
        let x = self.flat(key.x_slot, key.x_index)?;
        let y = self.flat(key.y_slot, key.y_index)?;
        Some(x * self.width + y)
    }
}

impl PairCache for DensePairCache {
    #[inline]
    fn lookup(&mut self, key: PairKey) -> Option<bool> {
        let v = match self.cell(key).map(|c| self.cells[c]) {
            Some(COMPATIBLE) => Some(true),
            Some(INCOMPATIBLE) => Some(false),
            _ => None,
        };
        if v.is_some() {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        v
    }

    #[inline]
    fn store(&mut self, key: PairKey, verdict: bool) {
        if let Some(c) = self.cell(key) {
            if self.cells[c] == UNKNOWN {
                self.stored += 1;
            }
            self.cells[c] = if verdict { COMPATIBLE } else { INCOMPATIBLE };
        }
    }

    #[inline]
    fn stats(&self) -> CacheStats {
        self.stats
    }

    #[inline]
    fn len(&self) -> usize {
        self.stored
    }

    fn clear(&mut self) {
        self.cells.fill(UNKNOWN);
        self.stored = 0;
        self.stats = CacheStats::default();
    }
}
