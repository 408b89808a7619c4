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

//! # Pod slot planner
//!
//! Turns a [`PodConfig`] into an ordered list of slots:
//!
//! 1. Requested pod and slot bounds are rounded onto the granularity
//!    ([`NormalizedBounds`]).
//! 2. The slot count is derived from the rounded pod maximum and clamped
//!    to the ad count bounds.
//! 3. A base per-slot duration is handed out to every slot, after which
//!    the remaining time is distributed in granularity-sized steps
//!    (water-filling) until the requested pod maximum is reached or no
//!    slot can take more.
//! 4. The result is validated as a whole. A plan that violates the ad
//!    count or duration bounds is discarded entirely.
//!
//! Failure is not an error: it is reported as an empty plan whose free
//! time equals the requested pod maximum.

use adpod_core::{SolverVariable, duration::Duration, granularity::Granularity};
use adpod_model::{
    config::PodConfig,
    err::PodConfigError,
    slot::{PlanResult, Slot},
};
use num_traits::NumCast;
use std::fmt::Display;
use tracing::{debug, instrument, trace, warn};

/// Requested bounds after rounding onto the granularity.
///
/// Slot bounds are kept as computed and may be inverted (`slot_min >
/// slot_max`) when the requested slot range contains no multiple of the
/// granularity. Pod bounds never are: an inverted pair is pinned to the
/// rounded maximum.
///
/// Construction fails when a bound cannot be rounded without overflowing
/// the time type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NormalizedBounds<T: SolverVariable> {
    pod_min: Duration<T>,
    pod_max: Duration<T>,
    slot_min: Duration<T>,
    slot_max: Duration<T>,
}

impl<T: SolverVariable> NormalizedBounds<T> {
    pub fn from_config(config: &PodConfig<T>) -> Option<Self> {
        let g = config.granularity();
        let pod = config.pod_duration();
        let slot = config.slot_duration();

        let (mut pod_min, pod_max) = g.checked_round_bounds(pod.min(), pod.max())?;
        if pod_max < pod_min {
            pod_min = pod_max;
        }
        let (slot_min, slot_max) = g.checked_round_bounds(slot.min(), slot.max())?;

        Some(Self {
            pod_min,
            pod_max,
            slot_min,
            slot_max,
        })
    }

    #[inline]
    pub fn pod_min(&self) -> Duration<T> {
        self.pod_min
    }

    #[inline]
    pub fn pod_max(&self) -> Duration<T> {
        self.pod_max
    }

    #[inline]
    pub fn slot_min(&self) -> Duration<T> {
        self.slot_min
    }

    #[inline]
    pub fn slot_max(&self) -> Duration<T> {
        self.slot_max
    }
}

impl<T: SolverVariable> Display for NormalizedBounds<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pod [{}, {}], slot [{}, {}]",
            self.pod_min.value(),
            self.pod_max.value(),
            self.slot_min.value(),
            self.slot_max.value()
        )
    }
}

/// How a pod configuration is re-derived before planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanStrategy {
    /// Plan the configuration unchanged.
    AsRequested,
    /// Exact pod duration at the requested maximum, requested ad count.
    MaxPodDuration,
    /// Exact pod duration at the requested maximum, exactly `min_ads` ads.
    MaxPodDurationMinAds,
    /// Exact pod duration at the requested minimum, requested ad count.
    MinPodDuration,
    /// Exact pod duration at the requested minimum, exactly `min_ads` ads.
    MinPodDurationMinAds,
}

impl PlanStrategy {
    pub const ALL: [PlanStrategy; 5] = [
        PlanStrategy::AsRequested,
        PlanStrategy::MaxPodDuration,
        PlanStrategy::MaxPodDurationMinAds,
        PlanStrategy::MinPodDuration,
        PlanStrategy::MinPodDurationMinAds,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PlanStrategy::AsRequested => "as_requested",
            PlanStrategy::MaxPodDuration => "max_pod_duration",
            PlanStrategy::MaxPodDurationMinAds => "max_pod_duration_min_ads",
            PlanStrategy::MinPodDuration => "min_pod_duration",
            PlanStrategy::MinPodDurationMinAds => "min_pod_duration_min_ads",
        }
    }

    /// Derives the configuration this strategy plans.
    pub fn apply<T: SolverVariable>(
        &self,
        config: &PodConfig<T>,
    ) -> Result<PodConfig<T>, PodConfigError<T>> {
        let pod = config.pod_duration();
        let ads = config.ad_count();
        match self {
            PlanStrategy::AsRequested => Ok(*config),
            PlanStrategy::MaxPodDuration => config.with_pod_duration(pod.max(), pod.max()),
            PlanStrategy::MaxPodDurationMinAds => config
                .with_pod_duration(pod.max(), pod.max())?
                .with_ad_count(ads.min(), ads.min()),
            PlanStrategy::MinPodDuration => config.with_pod_duration(pod.min(), pod.min()),
            PlanStrategy::MinPodDurationMinAds => config
                .with_pod_duration(pod.min(), pod.min())?
                .with_ad_count(ads.min(), ads.min()),
        }
    }
}

impl Display for PlanStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Running allocation state of a single planning call.
struct SlotAllocator<T: SolverVariable> {
    slots: Vec<(Duration<T>, Duration<T>)>,
    allocated: Duration<T>,
    slot_max: Duration<T>,
    requested_pod_max: Duration<T>,
    requested_slot_min: Duration<T>,
    match_up: Duration<T>,
}

impl<T: SolverVariable> SlotAllocator<T> {
    fn new(count: usize, bounds: &NormalizedBounds<T>, config: &PodConfig<T>) -> Self {
        let requested_pod_max = config.pod_duration().max();
        Self {
            slots: vec![(Duration::zero(), Duration::zero()); count],
            allocated: Duration::zero(),
            slot_max: bounds.slot_max(),
            requested_pod_max,
            requested_slot_min: config.slot_duration().min(),
            match_up: requested_pod_max - bounds.pod_max(),
        }
    }

    /// Offers `inc` to every slot in order. Returns `true` once every slot
    /// is saturated.
    ///
    /// A slot is saturated when it reached the slot maximum or could not
    /// take `inc` at the start of the pass. The increment that equals the
    /// rounding remainder pins the receiving slot's minimum to the
    /// requested slot minimum. A sum that overflows the time type never
    /// fits.
    fn add_time(&mut self, inc: Duration<T>) -> bool {
        let mut saturated = 0usize;
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let grown = slot.1.checked_add(inc).filter(|&v| v <= self.slot_max);
            let total = self
                .allocated
                .checked_add(inc)
                .filter(|&v| v <= self.requested_pod_max);
            let fits_slot = grown.is_some();
            if let (Some(grown), Some(total)) = (grown, total) {
                slot.1 = grown;
                slot.0 = if inc == self.match_up {
                    self.requested_slot_min
                } else {
                    slot.0.saturating_add(inc)
                };
                self.allocated = total;
                trace!(slot = i, added = %inc.value(), now = %slot.1.value(), "Added time to slot");
            }
            if slot.1 == self.slot_max || !fits_slot {
                saturated += 1;
            }
        }
        saturated == self.slots.len()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PodSlotPlanner;

impl PodSlotPlanner {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Plans the slots of one pod.
    ///
    /// # Examples
    ///
    /// ```
    /// use adpod_core::duration::Duration;
    /// use adpod_model::config::PodConfig;
    /// use adpod_solver::planner::PodSlotPlanner;
    ///
    /// let d = Duration::<i64>::new;
    /// let cfg = PodConfig::new(d(1), d(90), d(11), d(15), 2, 8, 5).unwrap();
    /// let plan = PodSlotPlanner::new().plan(&cfg);
    /// assert_eq!(plan.len(), 6);
    /// assert!(plan.slots().iter().all(|s| s.max() == d(15)));
    /// assert!(plan.free_time().is_zero());
    /// ```
    #[instrument(level = "debug", skip_all, fields(pod = %config.pod_duration(), slot = %config.slot_duration(), ads = %config.ad_count()))]
    pub fn plan<T: SolverVariable>(&self, config: &PodConfig<T>) -> PlanResult<T> {
        let requested = config.pod_duration();
        let ads = config.ad_count();
        let g = config.granularity();

        let Some(bounds) = NormalizedBounds::from_config(config) else {
            warn!("Requested bounds overflow when rounded onto the granularity");
            return PlanResult::failed(requested.max());
        };
        debug!(%bounds, "Normalized bounds");

        if !bounds.slot_min().is_positive() || !bounds.slot_max().is_positive() {
            warn!(%bounds, "Slot bounds round to zero; no slot can be planned");
            return PlanResult::failed(requested.max());
        }

        let Some(total_ads) = Self::slot_count(&bounds, ads.min(), ads.max()) else {
            warn!(%bounds, "Slot count is not representable");
            return PlanResult::failed(requested.max());
        };
        let Some(base) = Self::base_duration(&bounds, total_ads, g) else {
            warn!(total_ads, "Base slot duration is not representable");
            return PlanResult::failed(requested.max());
        };
        debug!(total_ads, base = %base.value(), "Derived slot count and base duration");

        let mut alloc = SlotAllocator::new(total_ads, &bounds, config);
        let mut inc = base;
        while alloc.allocated < requested.max() && inc.is_positive() {
            let all_saturated = alloc.add_time(inc);
            inc = g.as_duration().min(requested.max() - alloc.allocated);
            if all_saturated {
                trace!("All slots saturated");
                break;
            }
        }

        Self::validate(alloc, config)
    }

    /// Plans the configuration derived by `strategy`.
    pub fn plan_with_strategy<T: SolverVariable>(
        &self,
        config: &PodConfig<T>,
        strategy: PlanStrategy,
    ) -> Result<PlanResult<T>, PodConfigError<T>> {
        let derived = strategy.apply(config)?;
        debug!(%strategy, "Planning with strategy");
        Ok(self.plan(&derived))
    }

    /// Plans every [`PlanStrategy`] in declaration order.
    pub fn plan_all_strategies<T: SolverVariable>(
        &self,
        config: &PodConfig<T>,
    ) -> Result<Vec<(PlanStrategy, PlanResult<T>)>, PodConfigError<T>> {
        PlanStrategy::ALL
            .iter()
            .map(|&s| self.plan_with_strategy(config, s).map(|p| (s, p)))
            .collect()
    }

    /// `max(pod_max / slot_max, pod_max / slot_min)` clamped to the ad count.
    fn slot_count<T: SolverVariable>(
        bounds: &NormalizedBounds<T>,
        min_ads: usize,
        max_ads: usize,
    ) -> Option<usize> {
        let by_max = bounds.pod_max().checked_div_duration(bounds.slot_max())?;
        let by_min = bounds.pod_max().checked_div_duration(bounds.slot_min())?;
        let count = by_max.max(by_min).to_usize()?;
        Some(count.max(min_ads).min(max_ads))
    }

    fn base_duration<T: SolverVariable>(
        bounds: &NormalizedBounds<T>,
        total_ads: usize,
        g: Granularity<T>,
    ) -> Option<Duration<T>> {
        let n: T = NumCast::from(total_ads)?;
        let base = bounds
            .pod_max()
            .checked_div(n)?
            .clamp_lenient(bounds.slot_min(), bounds.slot_max());
        if g.is_multiple(base) {
            Some(base)
        } else {
            g.checked_round_nearest(base)
        }
    }

    fn validate<T: SolverVariable>(alloc: SlotAllocator<T>, config: &PodConfig<T>) -> PlanResult<T> {
        let requested = config.pod_duration();
        let ads = config.ad_count();
        let total = alloc.allocated;

        let planned = alloc.slots.len();
        let slots: Vec<Slot<T>> = alloc
            .slots
            .into_iter()
            .map(|(min, max)| Slot::new(min, max))
            .filter(|s| !s.is_unfilled())
            .collect();
        if slots.len() < planned {
            warn!(
                dropped = planned - slots.len(),
                "Dropped slots with zero duration"
            );
        }

        if !ads.contains(slots.len()) {
            warn!(count = slots.len(), ads = %ads, "Slot count outside ad count bounds");
            return PlanResult::failed(requested.max());
        }
        if requested.is_exact() && total != requested.max() {
            warn!(total = %total.value(), pod = %requested.max().value(), "Allocated time does not match exact pod duration");
            return PlanResult::failed(requested.max());
        }
        if !requested.contains(total) {
            warn!(total = %total.value(), pod = %requested, "Allocated time outside pod duration bounds");
            return PlanResult::failed(requested.max());
        }

        let plan = PlanResult::allocated(slots, requested.max());
        if plan.free_time().is_positive() {
            warn!(free = %plan.free_time().value(), "Free time not allocated");
        }
        plan
    }
}
