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

//! # Duration combinations
//!
//! [`DurationCombinations`] lazily enumerates the multisets of candidate
//! durations that could fill a pod. Combinations are produced by length
//! (`min_ads` first), and within one length in lexicographic order of
//! candidate indices, which are non-decreasing within a combination.
//!
//! A candidate may be repeated up to its available ad count; a candidate
//! with a single ad therefore never repeats. Length-`r` selections whose
//! total falls outside the pod bounds are skipped.
//!
//! The enumerator is an explicit cursor: the current length and the index
//! vector of the last visited selection. Each call to `next` advances the
//! cursor from where it stopped.

use crate::err::CombinationSetupError;
use adpod_core::{SolverVariable, bounds::Bounds, duration::Duration};
use adpod_model::{
    candidate::{Combination, DurationCandidate},
    err::{InvertedBoundsError, NegativeDurationError, ZeroMinAdsError},
};
use rustc_hash::FxHashSet;
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CursorState {
    Fresh,
    Active,
    Exhausted,
}

/// Counters of one enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EnumerationStats {
    /// Length-`r` selections assembled by the cursor.
    pub generated: u64,
    /// Selections that passed the pod duration check and were returned.
    pub emitted: u64,
}

#[derive(Debug, Clone)]
pub struct DurationCombinations<T: SolverVariable> {
    candidates: Vec<DurationCandidate<T>>,
    pod: Bounds<Duration<T>>,
    min_ads: usize,
    max_ads: usize,
    max_len: usize,
    r: usize,
    indices: Vec<usize>,
    state: CursorState,
    expected_total: u128,
    stats: EnumerationStats,
}

impl<T: SolverVariable> DurationCombinations<T> {
    /// Creates an enumerator over `candidates`.
    ///
    /// # Errors
    ///
    /// Fails on an empty candidate set, negative or duplicate durations, a
    /// candidate without available ads, `min_ads == 0` and inverted ad
    /// count or pod duration bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use adpod_core::duration::Duration;
    /// use adpod_model::candidate::DurationCandidate;
    /// use adpod_solver::combinations::DurationCombinations;
    ///
    /// let d = Duration::<i64>::new;
    /// let candidates = vec![DurationCandidate::new(d(5), 2), DurationCandidate::new(d(10), 1)];
    /// let all: Vec<Vec<i64>> = DurationCombinations::new(d(10), d(20), 1, 3, candidates)
    ///     .unwrap()
    ///     .map(|c| c.values())
    ///     .collect();
    /// assert_eq!(all, vec![vec![10], vec![5, 5], vec![5, 10], vec![5, 5, 10]]);
    /// ```
    pub fn new(
        pod_min: Duration<T>,
        pod_max: Duration<T>,
        min_ads: usize,
        max_ads: usize,
        candidates: Vec<DurationCandidate<T>>,
    ) -> Result<Self, CombinationSetupError<T>> {
        if candidates.is_empty() {
            return Err(CombinationSetupError::EmptyCandidates);
        }
        if min_ads == 0 {
            return Err(ZeroMinAdsError.into());
        }
        if min_ads > max_ads {
            return Err(InvertedBoundsError::new("ad_count", min_ads, max_ads).into());
        }
        if pod_min.is_negative() {
            return Err(NegativeDurationError::new("pod_min", pod_min).into());
        }
        let pod = Bounds::checked(pod_min, pod_max)
            .ok_or_else(|| InvertedBoundsError::new("pod_duration", pod_min, pod_max))?;

        let mut seen = FxHashSet::default();
        for c in &candidates {
            if c.duration().is_negative() {
                return Err(NegativeDurationError::new("candidate", c.duration()).into());
            }
            if c.available_ad_count() == 0 {
                return Err(CombinationSetupError::ZeroAvailableCount(c.duration()));
            }
            if !seen.insert(c.duration()) {
                return Err(CombinationSetupError::DuplicateDuration(c.duration()));
            }
        }

        let capacity: usize = candidates
            .iter()
            .fold(0usize, |acc, c| acc.saturating_add(c.available_ad_count()));
        let max_len = max_ads.min(capacity);
        let expected_total = expected_total(&candidates, min_ads, max_ads);
        debug!(
            candidates = candidates.len(),
            min_ads, max_ads, max_len, expected_total, "Initialized duration combinations"
        );

        Ok(Self {
            candidates,
            pod,
            min_ads,
            max_ads,
            max_len,
            r: min_ads,
            indices: Vec::with_capacity(max_len),
            state: CursorState::Fresh,
            expected_total,
            stats: EnumerationStats::default(),
        })
    }

    #[inline]
    pub fn candidates(&self) -> &[DurationCandidate<T>] {
        &self.candidates
    }

    #[inline]
    pub fn pod_duration(&self) -> Bounds<Duration<T>> {
        self.pod
    }

    #[inline]
    pub fn ad_count(&self) -> Bounds<usize> {
        Bounds::new(self.min_ads, self.max_ads)
    }

    /// Advisory count of length-`r` selections over all `r` in the ad count
    /// bounds, before repetition limits and pod bounds are applied.
    #[inline]
    pub fn expected_total(&self) -> u128 {
        self.expected_total
    }

    #[inline]
    pub fn stats(&self) -> EnumerationStats {
        self.stats
    }

    /// The current combination length and candidate indices.
    #[inline]
    pub fn cursor(&self) -> (usize, &[usize]) {
        (self.r, &self.indices)
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.state == CursorState::Exhausted
    }

    /// Smallest candidate index legal at position `p` given the prefix.
    #[inline]
    fn min_next(&self, p: usize) -> Option<usize> {
        if p == 0 {
            return Some(0);
        }
        let prev = self.indices[p - 1];
        let run = self.indices[..p]
            .iter()
            .rev()
            .take_while(|&&i| i == prev)
            .count();
        if run < self.candidates[prev].available_ad_count() {
            Some(prev)
        } else if prev + 1 < self.candidates.len() {
            Some(prev + 1)
        } else {
            None
        }
    }

    /// Fills positions `from..r` with the smallest legal indices.
    fn fill_from(&mut self, from: usize) -> bool {
        for p in from..self.r {
            match self.min_next(p) {
                Some(i) => self.indices[p] = i,
                None => return false,
            }
        }
        true
    }

    /// Moves to the first selection of the smallest length `>= r`.
    fn seek_length(&mut self, mut r: usize) -> bool {
        while r <= self.max_len {
            self.r = r;
            self.indices.clear();
            self.indices.resize(r, 0);
            if self.fill_from(0) {
                trace!(r, "Started combinations of new length");
                return true;
            }
            r += 1;
        }
        self.state = CursorState::Exhausted;
        false
    }

    /// Moves to the next selection of the current length.
    fn advance_within_length(&mut self) -> bool {
        let n = self.candidates.len();
        for pos in (0..self.r).rev() {
            let next = self.indices[pos] + 1;
            if next >= n {
                continue;
            }
            self.indices[pos] = next;
            if self.fill_from(pos + 1) {
                return true;
            }
        }
        false
    }

    fn step(&mut self) -> bool {
        match self.state {
            CursorState::Exhausted => false,
            CursorState::Fresh => {
                self.state = CursorState::Active;
                self.seek_length(self.min_ads)
            }
            CursorState::Active => self.advance_within_length() || self.seek_length(self.r + 1),
        }
    }

    fn current_total(&self) -> Duration<T> {
        self.indices
            .iter()
            .map(|&i| self.candidates[i].duration())
            .sum()
    }
}

impl<T: SolverVariable> Iterator for DurationCombinations<T> {
    type Item = Combination<T>;

    /// Returns the next valid combination, or `None` once exhausted.
    #[instrument(level = "trace", skip_all)]
    fn next(&mut self) -> Option<Self::Item> {
        while self.step() {
            self.stats.generated += 1;
            if self.pod.contains(self.current_total()) {
                self.stats.emitted += 1;
                let durations = self
                    .indices
                    .iter()
                    .map(|&i| self.candidates[i].duration())
                    .collect();
                return Some(Combination::new(durations));
            }
        }
        None
    }
}

impl<T: SolverVariable> std::iter::FusedIterator for DurationCombinations<T> {}

/// `C(n, k)`, saturating at `u128::MAX`.
fn binomial(n: u128, k: u128) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc * (n - i) / (i + 1) is exact at every step.
        match acc.checked_mul(n - i) {
            Some(v) => acc = v / (i + 1),
            None => return u128::MAX,
        }
    }
    acc
}

/// Sum over `r` in `[min_ads, max_ads]` of `C(r + n - 1, r)` when any
/// candidate allows repetition, `C(n, r)` otherwise.
fn expected_total<T: SolverVariable>(
    candidates: &[DurationCandidate<T>],
    min_ads: usize,
    max_ads: usize,
) -> u128 {
    let n = candidates.len() as u128;
    let repetition = candidates.iter().any(|c| c.allows_repetition());
    (min_ads..=max_ads).fold(0u128, |acc, r| {
        let r = r as u128;
        let count = if repetition {
            binomial(r + n - 1, r)
        } else {
            binomial(n, r)
        };
        acc.saturating_add(count)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn d(v: i64) -> Duration<i64> {
        Duration::new(v)
    }

    fn cands(pool: &[(i64, usize)]) -> Vec<DurationCandidate<i64>> {
        pool.iter()
            .map(|&(v, c)| DurationCandidate::new(d(v), c))
            .collect()
    }

    fn collect(
        pod: (i64, i64),
        ads: (usize, usize),
        pool: &[(i64, usize)],
    ) -> Vec<Vec<i64>> {
        DurationCombinations::new(d(pod.0), d(pod.1), ads.0, ads.1, cands(pool))
            .unwrap()
            .map(|c| c.values())
            .collect()
    }

    /// All non-decreasing index vectors of length `r` honoring the
    /// repetition limits, in lexicographic order.
    fn brute(pool: &[(i64, usize)], r: usize) -> Vec<Vec<usize>> {
        fn rec(
            pool: &[(i64, usize)],
            r: usize,
            start: usize,
            cur: &mut Vec<usize>,
            out: &mut Vec<Vec<usize>>,
        ) {
            if cur.len() == r {
                out.push(cur.clone());
                return;
            }
            for i in start..pool.len() {
                let used = cur.iter().filter(|&&x| x == i).count();
                if used < pool[i].1 {
                    cur.push(i);
                    rec(pool, r, i, cur, out);
                    cur.pop();
                }
            }
        }
        let mut out = Vec::new();
        rec(pool, r, 0, &mut Vec::new(), &mut out);
        out
    }

    #[test]
    fn test_repetition_up_to_available_count() {
        let all = collect((10, 20), (1, 3), &[(5, 2), (10, 1)]);
        assert_eq!(all, vec![vec![10], vec![5, 5], vec![5, 10], vec![5, 5, 10]]);
    }

    #[test]
    fn test_expected_total_with_repetition() {
        let e = DurationCombinations::new(d(10), d(20), 1, 3, cands(&[(5, 2), (10, 1)])).unwrap();
        assert_eq!(e.expected_total(), 9);
    }

    #[test]
    fn test_expected_total_without_repetition() {
        let e = DurationCombinations::new(
            d(10),
            d(14),
            3,
            4,
            cands(&[(4, 1), (5, 1), (8, 1), (7, 1)]),
        )
        .unwrap();
        assert_eq!(e.expected_total(), 4 + 1);
    }

    #[test]
    fn test_single_ad_durations_never_repeat() {
        let pool = [(4, 1), (5, 1), (8, 1), (7, 1)];
        assert!(collect((10, 14), (3, 4), &pool).is_empty());
        let all = collect((10, 20), (3, 4), &pool);
        assert_eq!(
            all,
            vec![vec![4, 5, 8], vec![4, 5, 7], vec![4, 8, 7], vec![5, 8, 7]]
        );
    }

    #[test]
    fn test_single_candidate() {
        assert_eq!(collect((10, 14), (1, 2), &[(14, 1)]), vec![vec![14]]);
        assert_eq!(
            collect((10, 30), (1, 3), &[(10, 3)]),
            vec![vec![10], vec![10, 10], vec![10, 10, 10]]
        );
    }

    #[test]
    fn test_max_ads_beyond_capacity() {
        let mut e =
            DurationCombinations::new(d(0), d(100), 1, 20, cands(&[(5, 1), (10, 1)])).unwrap();
        let all: Vec<Vec<i64>> = e.by_ref().map(|c| c.values()).collect();
        assert_eq!(all, vec![vec![5], vec![10], vec![5, 10]]);
        assert!(e.is_exhausted());
    }

    #[test]
    fn test_min_ads_beyond_capacity_yields_nothing() {
        let mut e =
            DurationCombinations::new(d(0), d(100), 3, 4, cands(&[(5, 1), (10, 1)])).unwrap();
        assert_eq!(e.next(), None);
        assert!(e.is_exhausted());
        assert_eq!(e.stats().generated, 0);
    }

    #[test]
    fn test_exhausted_stays_exhausted() {
        let mut e = DurationCombinations::new(d(14), d(14), 1, 1, cands(&[(14, 1)])).unwrap();
        assert!(e.next().is_some());
        assert!(e.next().is_none());
        assert!(e.next().is_none());
    }

    #[test]
    fn test_resumes_between_calls() {
        let pool = [(5, 2), (10, 1), (15, 2)];
        let all = collect((0, 100), (1, 3), &pool);

        let mut e = DurationCombinations::new(d(0), d(100), 1, 3, cands(&pool)).unwrap();
        let mut stepwise = Vec::new();
        while let Some(c) = e.next() {
            let (r, idx) = e.cursor();
            assert_eq!(r, c.len());
            assert_eq!(idx.len(), r);
            stepwise.push(c.values());
        }
        assert_eq!(stepwise, all);
    }

    #[test]
    fn test_stats_count_skipped_selections() {
        let mut e = DurationCombinations::new(d(10), d(20), 1, 3, cands(&[(5, 2), (10, 1)])).unwrap();
        let emitted = e.by_ref().count();
        assert_eq!(emitted, 4);
        assert_eq!(e.stats().emitted, 4);
        // [5] is generated but outside the pod bounds.
        assert_eq!(e.stats().generated, 5);
    }

    #[test]
    fn test_setup_errors() {
        let err = DurationCombinations::<i64>::new(d(0), d(10), 1, 2, vec![]).unwrap_err();
        assert_eq!(err, CombinationSetupError::EmptyCandidates);

        let err =
            DurationCombinations::new(d(0), d(10), 1, 2, cands(&[(5, 1), (5, 2)])).unwrap_err();
        assert_eq!(err, CombinationSetupError::DuplicateDuration(d(5)));

        let err = DurationCombinations::new(d(0), d(10), 1, 2, cands(&[(5, 0)])).unwrap_err();
        assert_eq!(err, CombinationSetupError::ZeroAvailableCount(d(5)));

        let err = DurationCombinations::new(d(0), d(10), 0, 2, cands(&[(5, 1)])).unwrap_err();
        assert!(matches!(err, CombinationSetupError::ZeroMinAds(_)));

        let err = DurationCombinations::new(d(0), d(10), 3, 1, cands(&[(5, 1)])).unwrap_err();
        assert!(matches!(err, CombinationSetupError::InvertedAdCount(_)));

        let err = DurationCombinations::new(d(20), d(10), 1, 2, cands(&[(5, 1)])).unwrap_err();
        assert!(matches!(err, CombinationSetupError::InvertedPodDuration(_)));

        let err = DurationCombinations::new(d(0), d(10), 1, 2, cands(&[(-5, 1)])).unwrap_err();
        assert!(matches!(err, CombinationSetupError::NegativeDuration(_)));
    }

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(5, 0), 1);
        assert_eq!(binomial(5, 2), 10);
        assert_eq!(binomial(4, 5), 0);
        assert_eq!(binomial(60, 30), 118_264_581_564_861_424);
        assert_eq!(binomial(1000, 500), u128::MAX);
    }

    #[test]
    fn test_matches_brute_force_on_random_sets() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let n = rng.random_range(1..=5);
            let mut values: Vec<i64> = Vec::new();
            while values.len() < n {
                let v = rng.random_range(1..=12) * 5;
                if !values.contains(&v) {
                    values.push(v);
                }
            }
            let pool: Vec<(i64, usize)> = values
                .into_iter()
                .map(|v| (v, rng.random_range(1..=3)))
                .collect();
            let min_ads = rng.random_range(1..=3);
            let max_ads = min_ads + rng.random_range(0..=3);
            let pod_min = rng.random_range(0..=60);
            let pod_max = pod_min + rng.random_range(0..=90);

            let got = collect((pod_min, pod_max), (min_ads, max_ads), &pool);

            let mut want = Vec::new();
            for r in min_ads..=max_ads {
                for idx in brute(&pool, r) {
                    let vals: Vec<i64> = idx.iter().map(|&i| pool[i].0).collect();
                    let sum: i64 = vals.iter().sum();
                    if (pod_min..=pod_max).contains(&sum) {
                        want.push(vals);
                    }
                }
            }
            assert_eq!(got, want, "pool {:?} ads {}..={} pod {}..={}", pool, min_ads, max_ads, pod_min, pod_max);

            for c in &got {
                assert!(c.len() >= min_ads && c.len() <= max_ads);
                for (v, count) in &pool {
                    let used = c.iter().filter(|x| *x == v).count();
                    assert!(used <= *count);
                }
            }
        }
    }
}
