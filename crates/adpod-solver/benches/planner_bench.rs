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

use adpod_core::duration::Duration;
use adpod_model::{candidate::DurationCandidate, config::PodConfig};
use adpod_solver::{combinations::DurationCombinations, planner::PodSlotPlanner};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::{env, hint::black_box};

#[inline]
fn d(x: i64) -> Duration<i64> {
    Duration::new(x)
}

fn gen_configs(n: usize, rng: &mut impl Rng) -> Vec<PodConfig<i64>> {
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        let pod_min = rng.random_range(0..=240);
        let pod_max = pod_min + rng.random_range(0..=120);
        let slot_min = rng.random_range(0..=60);
        let slot_max = slot_min + rng.random_range(0..=60);
        let min_ads = rng.random_range(1..=6);
        let max_ads = min_ads + rng.random_range(0..=6);
        let granularity = rng.random_range(1..=15);
        if let Ok(cfg) = PodConfig::new(
            d(pod_min),
            d(pod_max),
            d(slot_min),
            d(slot_max),
            min_ads,
            max_ads,
            granularity,
        ) {
            out.push(cfg);
        }
    }
    out
}

fn register_plan(c: &mut Criterion, configs_n: usize) {
    let mut group = c.benchmark_group("planner");
    group.throughput(Throughput::Elements(configs_n as u64));

    let mut rng = ChaCha8Rng::seed_from_u64(0x5107_F111_0000_0001);
    let configs = gen_configs(configs_n, &mut rng);
    let planner = PodSlotPlanner::new();

    group.bench_function(BenchmarkId::new("plan", configs_n), |b| {
        b.iter(|| {
            let mut feasible = 0usize;
            for cfg in &configs {
                if planner.plan(black_box(cfg)).is_feasible() {
                    feasible += 1;
                }
            }
            black_box(feasible)
        })
    });
    group.bench_function(BenchmarkId::new("plan_all_strategies", configs_n), |b| {
        b.iter(|| {
            let mut slots = 0usize;
            for cfg in &configs {
                if let Ok(plans) = planner.plan_all_strategies(black_box(cfg)) {
                    slots += plans.iter().map(|(_, p)| p.len()).sum::<usize>();
                }
            }
            black_box(slots)
        })
    });
    group.finish();
}

fn register_enumerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("combinations");

    let mut rng = ChaCha8Rng::seed_from_u64(0xC0B1_7A7E_0000_0002);
    for &distinct in &[4usize, 8, 12] {
        let candidates: Vec<DurationCandidate<i64>> = (0..distinct)
            .map(|i| DurationCandidate::new(d(5 * (i as i64 + 1)), rng.random_range(1..=3)))
            .collect();
        group.bench_function(BenchmarkId::new("enumerate", distinct), |b| {
            b.iter(|| {
                let Ok(it) = DurationCombinations::new(d(60), d(120), 1, 6, candidates.clone())
                else {
                    return black_box(0usize);
                };
                black_box(it.count())
            })
        });
    }
    group.finish();
}

fn planner_benches(c: &mut Criterion) {
    let configs_n = env::var("ADPOD_BENCH_CONFIGS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(2_000usize);

    register_plan(c, configs_n);
    register_enumerate(c);
}

criterion_group!(benches, planner_benches);
criterion_main!(benches);
