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

//! Pod configuration.
//!
//! A [`PodConfig`] holds the requested bounds for one ad pod: the total
//! pod duration, the duration of each individual slot, the number of ads
//! and the granularity durations are rounded onto. It is immutable once
//! built and is validated on construction, so every value the planner
//! sees is non-negative, ordered and has a positive rounding unit.

use crate::err::{
    InvalidGranularityError, InvertedBoundsError, NegativeDurationError, PodConfigError,
    ZeroMinAdsError,
};
use adpod_core::{
    SolverVariable, bounds::Bounds, duration::Duration, granularity::Granularity,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PodConfig<T: SolverVariable> {
    pod_duration: Bounds<Duration<T>>,
    slot_duration: Bounds<Duration<T>>,
    ad_count: Bounds<usize>,
    granularity: Granularity<T>,
}

fn non_negative<T: SolverVariable>(
    field: &'static str,
    d: Duration<T>,
) -> Result<Duration<T>, NegativeDurationError<T>> {
    if d.is_negative() {
        Err(NegativeDurationError::new(field, d))
    } else {
        Ok(d)
    }
}

fn ordered<V: Ord + Copy>(
    field: &'static str,
    min: V,
    max: V,
) -> Result<Bounds<V>, InvertedBoundsError<V>> {
    Bounds::checked(min, max).ok_or_else(|| InvertedBoundsError::new(field, min, max))
}

impl<T: SolverVariable> PodConfig<T> {
    /// Creates a validated pod configuration.
    ///
    /// # Errors
    ///
    /// Fails on negative durations, inverted pod, slot or ad count bounds,
    /// `min_ads == 0` and a granularity that is not positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use adpod_core::duration::Duration;
    /// use adpod_model::config::PodConfig;
    ///
    /// let cfg = PodConfig::new(
    ///     Duration::new(1_i64),
    ///     Duration::new(90),
    ///     Duration::new(11),
    ///     Duration::new(15),
    ///     2,
    ///     8,
    ///     5,
    /// )
    /// .unwrap();
    /// assert_eq!(cfg.ad_count().max(), 8);
    ///
    /// assert!(PodConfig::new(
    ///     Duration::new(90_i64),
    ///     Duration::new(1),
    ///     Duration::new(11),
    ///     Duration::new(15),
    ///     2,
    ///     8,
    ///     5,
    /// )
    /// .is_err());
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pod_min: Duration<T>,
        pod_max: Duration<T>,
        slot_min: Duration<T>,
        slot_max: Duration<T>,
        min_ads: usize,
        max_ads: usize,
        granularity: T,
    ) -> Result<Self, PodConfigError<T>> {
        let pod_min = non_negative("pod_min", pod_min)?;
        let pod_max = non_negative("pod_max", pod_max)?;
        let slot_min = non_negative("slot_min", slot_min)?;
        let slot_max = non_negative("slot_max", slot_max)?;
        let pod_duration = ordered("pod_duration", pod_min, pod_max)?;
        let slot_duration = ordered("slot_duration", slot_min, slot_max)?;
        if min_ads == 0 {
            return Err(ZeroMinAdsError.into());
        }
        let ad_count = ordered("ad_count", min_ads, max_ads)?;
        let granularity =
            Granularity::new(granularity).ok_or(InvalidGranularityError::new(granularity))?;

        Ok(Self {
            pod_duration,
            slot_duration,
            ad_count,
            granularity,
        })
    }

    #[inline]
    pub fn builder() -> PodConfigBuilder<T> {
        PodConfigBuilder::new()
    }

    #[inline]
    pub fn pod_duration(&self) -> Bounds<Duration<T>> {
        self.pod_duration
    }

    #[inline]
    pub fn slot_duration(&self) -> Bounds<Duration<T>> {
        self.slot_duration
    }

    #[inline]
    pub fn ad_count(&self) -> Bounds<usize> {
        self.ad_count
    }

    #[inline]
    pub fn granularity(&self) -> Granularity<T> {
        self.granularity
    }

    /// The same configuration with different pod duration bounds.
    pub fn with_pod_duration(
        &self,
        min: Duration<T>,
        max: Duration<T>,
    ) -> Result<Self, PodConfigError<T>> {
        Self::new(
            min,
            max,
            self.slot_duration.min(),
            self.slot_duration.max(),
            self.ad_count.min(),
            self.ad_count.max(),
            self.granularity.value(),
        )
    }

    /// The same configuration with different ad count bounds.
    pub fn with_ad_count(&self, min: usize, max: usize) -> Result<Self, PodConfigError<T>> {
        Self::new(
            self.pod_duration.min(),
            self.pod_duration.max(),
            self.slot_duration.min(),
            self.slot_duration.max(),
            min,
            max,
            self.granularity.value(),
        )
    }
}

impl<T: SolverVariable> std::fmt::Display for PodConfig<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PodConfig(pod: {}, slot: {}, ads: {}, {})",
            self.pod_duration, self.slot_duration, self.ad_count, self.granularity
        )
    }
}

/// Builder for [`PodConfig`].
///
/// Only the pod duration is required. Slot bounds default to half of the
/// pod bounds, the ad count to `2..=3` and the granularity to `5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PodConfigBuilder<T: SolverVariable> {
    pod_duration: Option<(Duration<T>, Duration<T>)>,
    slot_duration: Option<(Duration<T>, Duration<T>)>,
    min_ads: usize,
    max_ads: usize,
    granularity: T,
}

impl<T: SolverVariable> Default for PodConfigBuilder<T> {
    fn default() -> Self {
        Self {
            pod_duration: None,
            slot_duration: None,
            min_ads: 2,
            max_ads: 3,
            granularity: Granularity::<T>::default().value(),
        }
    }
}

impl<T: SolverVariable> PodConfigBuilder<T> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn pod_duration(mut self, min: Duration<T>, max: Duration<T>) -> Self {
        self.pod_duration = Some((min, max));
        self
    }

    #[inline]
    pub fn slot_duration(mut self, min: Duration<T>, max: Duration<T>) -> Self {
        self.slot_duration = Some((min, max));
        self
    }

    #[inline]
    pub fn ad_count(mut self, min: usize, max: usize) -> Self {
        self.min_ads = min;
        self.max_ads = max;
        self
    }

    #[inline]
    pub fn granularity(mut self, v: T) -> Self {
        self.granularity = v;
        self
    }

    pub fn build(self) -> Result<PodConfig<T>, PodConfigError<T>> {
        let (pod_min, pod_max) = self
            .pod_duration
            .ok_or(PodConfigError::MissingPodDuration)?;
        let (slot_min, slot_max) = self.slot_duration.unwrap_or_else(|| {
            let two = T::one() + T::one();
            (
                Duration::new(pod_min.value() / two),
                Duration::new(pod_max.value() / two),
            )
        });

        PodConfig::new(
            pod_min,
            pod_max,
            slot_min,
            slot_max,
            self.min_ads,
            self.max_ads,
            self.granularity,
        )
    }
}
