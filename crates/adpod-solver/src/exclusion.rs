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

//! Pairwise exclusion rules for bids within one pod.

use crate::err::ExclusionPercentError;
use adpod_core::SolverVariable;
use adpod_model::bid::Bid;

/// Which business rules two bids in the same pod must satisfy.
///
/// The default enforces nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ExclusionPolicy {
    pub exclude_same_advertiser: bool,
    pub exclude_shared_category: bool,
}

impl ExclusionPolicy {
    #[inline]
    pub const fn new(exclude_same_advertiser: bool, exclude_shared_category: bool) -> Self {
        Self {
            exclude_same_advertiser,
            exclude_shared_category,
        }
    }

    /// Builds a policy from exclusion percentages in `0..=100`.
    ///
    /// `100` allows every ad in the pod to share an advertiser (or
    /// category); any lower value enforces the exclusion.
    ///
    /// ```
    /// use adpod_solver::exclusion::ExclusionPolicy;
    ///
    /// let p = ExclusionPolicy::from_percents(0, 100).unwrap();
    /// assert!(p.exclude_same_advertiser);
    /// assert!(!p.exclude_shared_category);
    /// assert!(ExclusionPolicy::from_percents(101, 0).is_err());
    /// ```
    pub fn from_percents(
        advertiser_percent: i32,
        category_percent: i32,
    ) -> Result<Self, ExclusionPercentError> {
        let check = |field, v: i32| {
            if (0..=100).contains(&v) {
                Ok(v)
            } else {
                Err(ExclusionPercentError::new(field, v))
            }
        };
        let adv = check("advertiser_exclusion_percent", advertiser_percent)?;
        let cat = check("category_exclusion_percent", category_percent)?;
        Ok(Self::new(adv < 100, cat < 100))
    }

    /// Returns `true` if `a` and `b` may appear in the same pod.
    pub fn compatible<T: SolverVariable>(&self, a: &Bid<T>, b: &Bid<T>) -> bool {
        if self.exclude_same_advertiser && a.shares_advertiser_with(b) {
            return false;
        }
        if self.exclude_shared_category && a.shares_category_with(b) {
            return false;
        }
        true
    }

    /// The policy as a comparator for the bid selector.
    pub fn comparator<T: SolverVariable>(self) -> impl Fn(&Bid<T>, &Bid<T>) -> bool + Copy {
        move |a, b| self.compatible(a, b)
    }
}
