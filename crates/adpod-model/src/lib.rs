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

//! # Ad Pod Model (`adpod-model`)
//!
//! Domain types for planning connected-TV ad pods, built on the
//! primitives in `adpod-core`.
//!
//! - **`PodConfig<T>`** (`config`): requested pod duration, slot duration and
//!   ad count bounds plus the rounding granularity. Validated on
//!   construction, with a builder for the common defaults.
//! - **`Slot<T>` / `PlanResult<T>`** (`slot`): the planner's output. An empty
//!   plan whose free time equals the requested maximum signals failure.
//!   `PlanResult::impressions` turns slots into numbered sub-impressions.
//! - **`DurationCandidate<T>` / `Combination<T>`** (`candidate`): durations
//!   with their available ad counts, and the combinations enumerated from them.
//! - **`Bid<T>`** (`bid`): a priced candidate for one slot, carrying the
//!   advertiser domains and categories exclusion rules look at.
//!
//! All types are generic over the duration primitive `T` and serialize with
//! `serde` for reporting.

pub mod bid;
pub mod candidate;
pub mod config;
pub mod err;
pub mod id;
pub mod slot;
