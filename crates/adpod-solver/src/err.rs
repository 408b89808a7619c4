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

use adpod_core::{SolverVariable, duration::Duration};
use adpod_model::err::{InvertedBoundsError, NegativeDurationError, ZeroMinAdsError};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombinationSetupError<T: SolverVariable> {
    EmptyCandidates,
    NegativeDuration(NegativeDurationError<T>),
    DuplicateDuration(Duration<T>),
    ZeroAvailableCount(Duration<T>),
    ZeroMinAds(ZeroMinAdsError),
    InvertedAdCount(InvertedBoundsError<usize>),
    InvertedPodDuration(InvertedBoundsError<Duration<T>>),
}

impl<T: SolverVariable> Display for CombinationSetupError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CombinationSetupError::*;
        match self {
            EmptyCandidates => write!(f, "Candidate set is empty"),
            NegativeDuration(e) => write!(f, "{}", e),
            DuplicateDuration(d) => write!(f, "Duration {} appears more than once", d),
            ZeroAvailableCount(d) => write!(f, "Duration {} has no available ads", d),
            ZeroMinAds(e) => write!(f, "{}", e),
            InvertedAdCount(e) => write!(f, "{}", e),
            InvertedPodDuration(e) => write!(f, "{}", e),
        }
    }
}

impl<T: SolverVariable> std::error::Error for CombinationSetupError<T> {}

impl<T: SolverVariable> From<NegativeDurationError<T>> for CombinationSetupError<T> {
    fn from(err: NegativeDurationError<T>) -> Self {
        Self::NegativeDuration(err)
    }
}

impl<T: SolverVariable> From<ZeroMinAdsError> for CombinationSetupError<T> {
    fn from(err: ZeroMinAdsError) -> Self {
        Self::ZeroMinAds(err)
    }
}

impl<T: SolverVariable> From<InvertedBoundsError<usize>> for CombinationSetupError<T> {
    fn from(err: InvertedBoundsError<usize>) -> Self {
        Self::InvertedAdCount(err)
    }
}

impl<T: SolverVariable> From<InvertedBoundsError<Duration<T>>> for CombinationSetupError<T> {
    fn from(err: InvertedBoundsError<Duration<T>>) -> Self {
        Self::InvertedPodDuration(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorSetupError {
    NoSlots,
}

impl Display for SelectorSetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectorSetupError::NoSlots => write!(f, "Selector needs at least one slot"),
        }
    }
}

impl std::error::Error for SelectorSetupError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExclusionPercentError {
    field: &'static str,
    value: i32,
}

impl ExclusionPercentError {
    #[inline]
    pub fn new(field: &'static str, value: i32) -> Self {
        Self { field, value }
    }

    #[inline]
    pub fn field(&self) -> &'static str {
        self.field
    }

    #[inline]
    pub fn value(&self) -> i32 {
        self.value
    }
}

impl Display for ExclusionPercentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} must be a number between 0 and 100, got {}",
            self.field, self.value
        )
    }
}

impl std::error::Error for ExclusionPercentError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combination_setup_messages() {
        let e = CombinationSetupError::<i64>::DuplicateDuration(Duration::new(15));
        assert_eq!(e.to_string(), "Duration Duration(15) appears more than once");
        let e: CombinationSetupError<i64> = ZeroMinAdsError.into();
        assert!(matches!(e, CombinationSetupError::ZeroMinAds(_)));
        let e: CombinationSetupError<i64> =
            InvertedBoundsError::new("pod_duration", Duration::new(20), Duration::new(10)).into();
        assert!(matches!(e, CombinationSetupError::InvertedPodDuration(_)));
    }

    #[test]
    fn test_exclusion_percent_message() {
        let e = ExclusionPercentError::new("advertiser_exclusion_percent", 120);
        assert_eq!(
            e.to_string(),
            "advertiser_exclusion_percent must be a number between 0 and 100, got 120"
        );
    }
}
