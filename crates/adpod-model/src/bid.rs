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

use crate::id::BidId;
use adpod_core::{SolverVariable, duration::Duration};
use serde::Serialize;
use std::fmt::Display;

/// A candidate bid for one slot of a pod.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bid<T: SolverVariable> {
    id: BidId,
    price: f64,
    duration: Duration<T>,
    advertiser_domains: Vec<String>,
    categories: Vec<String>,
}

impl<T: SolverVariable> Bid<T> {
    #[inline]
    pub fn new(id: BidId, price: f64, duration: Duration<T>) -> Self {
        Self {
            id,
            price,
            duration,
            advertiser_domains: Vec::new(),
            categories: Vec::new(),
        }
    }

    pub fn with_advertiser_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.advertiser_domains = domains.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn id(&self) -> BidId {
        self.id
    }

    #[inline]
    pub fn price(&self) -> f64 {
        self.price
    }

    #[inline]
    pub fn duration(&self) -> Duration<T> {
        self.duration
    }

    #[inline]
    pub fn advertiser_domains(&self) -> &[String] {
        &self.advertiser_domains
    }

    #[inline]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Returns `true` if both bids name at least one common advertiser domain.
    pub fn shares_advertiser_with(&self, other: &Self) -> bool {
        self.advertiser_domains
            .iter()
            .any(|d| other.advertiser_domains.contains(d))
    }

    /// Returns `true` if both bids carry at least one common category.
    pub fn shares_category_with(&self, other: &Self) -> bool {
        self.categories.iter().any(|c| other.categories.contains(c))
    }

    /// Sorts one slot's bids by descending price. Equal prices keep
    /// their arrival order.
    ///
    /// ```
    /// use adpod_core::duration::Duration;
    /// use adpod_model::{bid::Bid, id::BidId};
    ///
    /// let mut bids = vec![
    ///     Bid::new(BidId::new(1), 1.5, Duration::new(15_i64)),
    ///     Bid::new(BidId::new(2), 4.0, Duration::new(15)),
    /// ];
    /// Bid::sort_by_price_desc(&mut bids);
    /// assert_eq!(bids[0].id(), BidId::new(2));
    /// ```
    pub fn sort_by_price_desc(bids: &mut [Bid<T>]) {
        bids.sort_by(|a, b| b.price.total_cmp(&a.price));
    }
}

impl<T: SolverVariable> Display for Bid<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bid({}, price: {:.2}, duration: {})",
            self.id.value(),
            self.price,
            self.duration.value()
        )
    }
}
