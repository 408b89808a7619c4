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

//! # Bid combination selector
//!
//! Picks one bid per slot such that every pair of picked bids satisfies a
//! compatibility comparator. The search is an odometer over per-slot
//! indices (rightmost wheel turns fastest) with two refinements:
//!
//! - Pairwise verdicts are memoized in a [`PairCache`], so each
//!   `(slot, bid) x (slot, bid)` pair is compared at most once.
//! - On a conflict the odometer advances at the later position `j` of the
//!   first failing pair instead of the rightmost wheel. Every assignment
//!   sharing positions `0..=j` contains the same failing pair, so that
//!   whole subtree is skipped.
//!
//! Pairs are checked with `j` ascending, so the first failing pair has the
//! smallest possible `j` and skips the largest subtree.
//!
//! Slot lists are expected in preference order (usually by descending
//! price); the first selection returned is the lexicographically smallest
//! compatible index vector. Calling [`BidCombinationSelector::get_ad_pod`]
//! again resumes the search after the previous selection.

use crate::cache::{MapPairCache, PairCache, PairKey};
use crate::err::SelectorSetupError;
use tracing::{debug, instrument, trace};

/// Counters of one selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SelectorStats {
    /// Odometer advances performed.
    pub advances: u64,
    /// Index vectors validated.
    pub validations: u64,
}

pub struct BidCombinationSelector<'a, B, F, C = MapPairCache>
where
    F: Fn(&B, &B) -> bool,
    C: PairCache,
{
    slots: &'a [Vec<B>],
    comparator: F,
    cache: C,
    indices: Vec<usize>,
    cursor: usize,
    started: bool,
    exhausted: bool,
    stats: SelectorStats,
}

impl<'a, B, F> BidCombinationSelector<'a, B, F, MapPairCache>
where
    F: Fn(&B, &B) -> bool,
{
    /// Creates a selector backed by a [`MapPairCache`].
    ///
    /// `comparator(a, b)` returns `true` when `a` and `b` may appear in the
    /// same pod.
    ///
    /// # Examples
    ///
    /// ```
    /// use adpod_solver::selector::BidCombinationSelector;
    ///
    /// let slots = vec![vec!["acme", "zeta"], vec!["acme", "nova"]];
    /// let mut selector = BidCombinationSelector::new(&slots, |a: &&str, b: &&str| a != b).unwrap();
    /// assert_eq!(selector.get_ad_pod(), Some(vec![&"acme", &"nova"]));
    /// ```
    pub fn new(slots: &'a [Vec<B>], comparator: F) -> Result<Self, SelectorSetupError> {
        Self::with_cache(slots, comparator, MapPairCache::new())
    }
}

impl<'a, B, F, C> BidCombinationSelector<'a, B, F, C>
where
    F: Fn(&B, &B) -> bool,
    C: PairCache,
{
    /// Creates a selector backed by the given cache.
    pub fn with_cache(
        slots: &'a [Vec<B>],
        comparator: F,
        cache: C,
    ) -> Result<Self, SelectorSetupError> {
        if slots.is_empty() {
            return Err(SelectorSetupError::NoSlots);
        }
        Ok(Self {
            slots,
            comparator,
            cache,
            indices: vec![0; slots.len()],
            cursor: slots.len() - 1,
            started: false,
            exhausted: false,
            stats: SelectorStats::default(),
        })
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Index vector of the most recently validated selection.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    #[inline]
    pub fn cache(&self) -> &C {
        &self.cache
    }

    #[inline]
    pub fn stats(&self) -> SelectorStats {
        self.stats
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Returns the next compatible selection, one bid per slot, or `None`
    /// once the search space is exhausted.
    #[instrument(level = "debug", skip_all, fields(slots = self.slots.len()))]
    pub fn get_ad_pod(&mut self) -> Option<Vec<&'a B>> {
        if self.exhausted {
            return None;
        }
        if self.slots.iter().any(Vec::is_empty) {
            debug!("A slot has no candidate bids");
            self.exhausted = true;
            return None;
        }

        loop {
            if !self.started {
                self.started = true;
            } else if !self.advance() {
                self.exhausted = true;
                let cache = self.cache.stats();
                debug!(
                    advances = self.stats.advances,
                    validations = self.stats.validations,
                    hits = cache.hits,
                    misses = cache.misses,
                    "Bid search exhausted"
                );
                return None;
            }

            self.stats.validations += 1;
            match self.first_conflict() {
                None => {
                    self.cursor = self.slots.len() - 1;
                    trace!(indices = ?self.indices, "Found compatible selection");
                    let slots = self.slots;
                    return Some(
                        self.indices
                            .iter()
                            .enumerate()
                            .map(|(s, &i)| &slots[s][i])
                            .collect(),
                    );
                }
                Some(j) => {
                    trace!(indices = ?self.indices, at = j, "Conflict");
                    self.cursor = j;
                }
            }
        }
    }

    /// Turns the wheel at the cursor, carrying left on overflow. Positions
    /// right of the turned wheel restart at zero.
    fn advance(&mut self) -> bool {
        let mut pos = self.cursor;
        loop {
            self.indices[pos] += 1;
            if self.indices[pos] < self.slots[pos].len() {
                self.indices[pos + 1..].fill(0);
                self.stats.advances += 1;
                return true;
            }
            if pos == 0 {
                return false;
            }
            pos -= 1;
        }
    }

    /// Later position of the first incompatible pair, pairs ordered by the
    /// later position first.
    fn first_conflict(&mut self) -> Option<usize> {
        let slots = self.slots;
        for j in 1..slots.len() {
            for i in 0..j {
                let key = PairKey::new(i, self.indices[i], j, self.indices[j]);
                let (a, b) = (&slots[i][key.x_index], &slots[j][key.y_index]);
                let comparator = &self.comparator;
                if !self.cache.get_or_compute(key, || comparator(a, b)) {
                    return Some(j);
                }
            }
        }
        None
    }
}

/// Convenience for the first compatible selection with a fresh map cache.
pub fn select_ad_pod<'a, B, F>(slots: &'a [Vec<B>], comparator: F) -> Option<Vec<&'a B>>
where
    F: Fn(&B, &B) -> bool,
{
    BidCombinationSelector::new(slots, comparator)
        .ok()?
        .get_ad_pod()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DensePairCache;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq)]
    struct Ad {
        name: &'static str,
        advertiser: &'static str,
    }

    fn ad(name: &'static str, advertiser: &'static str) -> Ad {
        Ad { name, advertiser }
    }

    fn distinct_advertiser(a: &Ad, b: &Ad) -> bool {
        a.advertiser != b.advertiser
    }

    fn names(sel: &[&Ad]) -> Vec<&'static str> {
        sel.iter().map(|a| a.name).collect()
    }

    fn three_slot_fixture() -> Vec<Vec<Ad>> {
        vec![
            vec![ad("A", "acme"), ad("B", "bolt")],
            vec![ad("C", "core")],
            vec![ad("D", "acme"), ad("E", "echo")],
        ]
    }

    #[test]
    fn test_skips_conflicting_pair() {
        let slots = three_slot_fixture();
        let mut s = BidCombinationSelector::new(&slots, distinct_advertiser).unwrap();
        let first = s.get_ad_pod().unwrap();
        assert_eq!(names(&first), vec!["A", "C", "E"]);
        assert_eq!(s.indices(), &[0, 0, 1]);
    }

    #[test]
    fn test_resumes_after_selection() {
        let slots = three_slot_fixture();
        let mut s = BidCombinationSelector::new(&slots, distinct_advertiser).unwrap();
        let all: Vec<Vec<&str>> = std::iter::from_fn(|| s.get_ad_pod().map(|v| names(&v))).collect();
        assert_eq!(
            all,
            vec![vec!["A", "C", "E"], vec!["B", "C", "D"], vec!["B", "C", "E"]]
        );
        assert!(s.is_exhausted());
        assert!(s.get_ad_pod().is_none());
    }

    #[test]
    fn test_comparator_calls_equal_cache_misses() {
        let slots = three_slot_fixture();
        let calls = Cell::new(0u64);
        let mut s = BidCombinationSelector::new(&slots, |a: &Ad, b: &Ad| {
            calls.set(calls.get() + 1);
            distinct_advertiser(a, b)
        })
        .unwrap();
        while s.get_ad_pod().is_some() {}
        let stats = s.cache().stats();
        assert_eq!(calls.get(), stats.misses);
        assert_eq!(s.cache().len() as u64, stats.misses);
        assert!(stats.hits > 0);
    }

    #[test]
    fn test_cache_hits_exceed_misses_on_repeated_conflicts() {
        // Slot 0 and slot 1 always clash on their first bids, forcing the
        // search to re-check the same pairs many times.
        let slots = vec![
            vec![ad("A1", "acme"), ad("A2", "acme"), ad("A3", "acme")],
            vec![ad("X", "acme"), ad("Y", "yolo")],
            vec![ad("P", "pine"), ad("Q", "quux"), ad("R", "rust")],
            vec![ad("S", "acme"), ad("T", "tide")],
        ];
        let mut s = BidCombinationSelector::new(&slots, distinct_advertiser).unwrap();
        let mut found = 0;
        while s.get_ad_pod().is_some() {
            found += 1;
        }
        assert_eq!(found, 3 * 3);
        let stats = s.cache().stats();
        assert!(stats.hits > stats.misses, "{:?}", stats);
    }

    #[test]
    fn test_empty_slot_list_exhausts_immediately() {
        let slots: Vec<Vec<Ad>> = vec![vec![ad("A", "a")], vec![]];
        let mut s = BidCombinationSelector::new(&slots, distinct_advertiser).unwrap();
        assert!(s.get_ad_pod().is_none());
        assert!(s.is_exhausted());
    }

    #[test]
    fn test_no_slots_is_setup_error() {
        let slots: Vec<Vec<Ad>> = vec![];
        let err = BidCombinationSelector::new(&slots, distinct_advertiser).err();
        assert_eq!(err, Some(SelectorSetupError::NoSlots));
        assert!(select_ad_pod(&slots, distinct_advertiser).is_none());
    }

    #[test]
    fn test_single_slot_iterates_all_bids() {
        let slots = vec![vec![ad("A", "a"), ad("B", "b")]];
        let mut s = BidCombinationSelector::new(&slots, |_: &Ad, _: &Ad| false).unwrap();
        assert_eq!(names(&s.get_ad_pod().unwrap()), vec!["A"]);
        assert_eq!(names(&s.get_ad_pod().unwrap()), vec!["B"]);
        assert!(s.get_ad_pod().is_none());
    }

    #[test]
    fn test_all_incompatible_exhausts() {
        let slots = vec![vec![ad("A", "x"), ad("B", "x")], vec![ad("C", "x")]];
        assert!(select_ad_pod(&slots, distinct_advertiser).is_none());
    }

    #[test]
    fn test_conflict_jump_skips_subtree() {
        // Slot 0 and 1 clash on every pair with A; the wide tail slots must
        // not be enumerated for that prefix.
        let tail: Vec<Ad> = (0..10).map(|_| ad("t", "tail")).collect();
        let slots = vec![
            vec![ad("A", "acme"), ad("B", "bolt")],
            vec![ad("X", "acme")],
            tail.clone(),
            tail.iter().map(|a| ad(a.name, "tail2")).collect(),
        ];
        let mut s = BidCombinationSelector::new(&slots, distinct_advertiser).unwrap();
        let first = s.get_ad_pod().unwrap();
        assert_eq!(first[0].name, "B");
        assert_eq!(s.stats().validations, 2);
        assert_eq!(s.stats().advances, 1);
    }

    #[test]
    fn test_dense_cache_matches_map_cache() {
        let slots = three_slot_fixture();
        let mut map = BidCombinationSelector::new(&slots, distinct_advertiser).unwrap();
        let mut dense = BidCombinationSelector::with_cache(
            &slots,
            distinct_advertiser,
            DensePairCache::for_slots(&slots),
        )
        .unwrap();
        loop {
            let a = map.get_ad_pod();
            let b = dense.get_ad_pod();
            assert_eq!(a, b);
            if a.is_none() {
                break;
            }
        }
        assert_eq!(map.cache().stats(), dense.cache().stats());
    }

    fn brute_force(slots: &[Vec<u32>], ok: &dyn Fn(&u32, &u32) -> bool) -> Vec<Vec<usize>> {
        let k = slots.len();
        let mut out = Vec::new();
        let mut idx = vec![0usize; k];
        if slots.iter().any(Vec::is_empty) {
            return out;
        }
        loop {
            let valid = (0..k).all(|j| (0..j).all(|i| ok(&slots[i][idx[i]], &slots[j][idx[j]])));
            if valid {
                out.push(idx.clone());
            }
            let mut pos = k;
            loop {
                if pos == 0 {
                    return out;
                }
                pos -= 1;
                idx[pos] += 1;
                if idx[pos] < slots[pos].len() {
                    break;
                }
                idx[pos] = 0;
            }
        }
    }

    #[test]
    fn test_matches_brute_force_on_random_instances() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..300 {
            let k = rng.random_range(1..=4);
            let slots: Vec<Vec<u32>> = (0..k)
                .map(|_| {
                    let n = rng.random_range(0..=4);
                    (0..n).map(|_| rng.random_range(0..5)).collect()
                })
                .collect();
            let ok = |a: &u32, b: &u32| a != b;

            let want = brute_force(&slots, &ok);
            let mut s = BidCombinationSelector::new(&slots, ok).unwrap();
            let mut got = Vec::new();
            while let Some(sel) = s.get_ad_pod() {
                for j in 0..sel.len() {
                    for i in 0..j {
                        assert!(ok(sel[i], sel[j]));
                    }
                }
                got.push(s.indices().to_vec());
            }
            assert_eq!(got, want, "slots {:?}", slots);
        }
    }
}
