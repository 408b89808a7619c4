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

//! # Ad Pod Solver (`adpod-solver`)
//!
//! The three search procedures behind ad pod planning.
//!
//! - **`PodSlotPlanner`** (`planner`): normalizes a [`PodConfig`] to its
//!   granularity, picks a slot count and water-fills time into the slots
//!   one increment at a time. [`PlanStrategy`] derives the four corner
//!   configurations of the requested bounds.
//! - **`DurationCombinations`** (`combinations`): a resumable iterator over
//!   the multisets of candidate durations whose total fits the pod, with
//!   per-duration repetition limits.
//! - **`BidCombinationSelector`** (`selector`): an odometer search over
//!   price-sorted bid lists that returns one bid per slot such that every
//!   pair passes a caller-supplied comparator. Comparator verdicts are
//!   memoized in a [`PairCache`](cache::PairCache).
//! - **`ExclusionPolicy`** (`exclusion`): advertiser and category exclusion
//!   rules packaged as a comparator for the selector.
//!
//! [`PodConfig`]: adpod_model::config::PodConfig
//! [`PlanStrategy`]: planner::PlanStrategy

pub mod cache;
pub mod combinations;
pub mod err;
pub mod exclusion;
pub mod planner;
pub mod selector;
