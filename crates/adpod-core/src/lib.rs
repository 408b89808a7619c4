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

//! # Ad Pod Core (`adpod-core`)
//!
//! Numeric building blocks shared by the ad pod model and solver crates.
//!
//! - `duration`: `Duration<T>`, a signed amount of time units with checked
//!   arithmetic.
//! - `granularity`: `Granularity<T>`, the rounding unit every requested
//!   duration is normalized onto, together with the directional rounding
//!   helpers (nearest, up for lower bounds, down for upper bounds).
//! - `bounds`: `Bounds<T>`, a closed `[min, max]` range used for pod
//!   durations, slot durations and ad counts.

use num_traits::{PrimInt, Signed, Zero};
use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

pub mod bounds;
pub mod duration;
pub mod granularity;

pub trait SolverVariable: PrimInt + Signed + Zero + Hash + Send + Sync + Debug + Display {}
impl<T> SolverVariable for T where T: PrimInt + Signed + Zero + Hash + Send + Sync + Debug + Display {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::Duration;
    use std::collections::HashSet;

    fn distinct<T: SolverVariable>(values: &[T]) -> usize {
        values
            .iter()
            .map(|&v| Duration::new(v))
            .collect::<HashSet<Duration<T>>>()
            .len()
    }

    #[test]
    fn test_solver_variable_durations_are_hashable() {
        assert_eq!(distinct(&[15_i64, 30, 15]), 2);
        assert_eq!(distinct(&[5_i32, 5, 5]), 1);
    }
}
