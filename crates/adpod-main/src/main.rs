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
use adpod_model::{
    bid::Bid,
    candidate::DurationCandidate,
    config::PodConfig,
    id::BidId,
    slot::{PlanResult, SlotImpression},
};
use adpod_solver::{
    cache::PairCache,
    combinations::DurationCombinations,
    exclusion::ExclusionPolicy,
    planner::{PlanStrategy, PodSlotPlanner},
    selector::BidCombinationSelector,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp, Normal};
use rayon::prelude::*;
use serde::Serialize;
use std::{env, fs::File, io::BufWriter, time::Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

type Tm = i64;

const ADVERTISERS: [&str; 8] = [
    "acme.com",
    "beta.tv",
    "gamma.io",
    "delta.net",
    "zeta.org",
    "nova.co",
    "orbit.media",
    "pulse.ads",
];
const RESPONSE_DURATIONS: [Tm; 6] = [5, 10, 15, 20, 30, 45];
const MAX_COMBINATIONS: usize = 32;
const BIDS_PER_SLOT: usize = 12;

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn env_or<V: std::str::FromStr>(key: &str, default: V) -> V {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize)]
struct StrategyPlan {
    strategy: &'static str,
    plan: PlanResult<Tm>,
}

#[derive(Debug, Clone, Serialize)]
struct EnumerationSummary {
    candidates: Vec<DurationCandidate<Tm>>,
    expected_total: u128,
    generated: u64,
    emitted: u64,
    first: Vec<Vec<Tm>>,
}

#[derive(Debug, Clone, Serialize)]
struct SelectionSummary {
    advertiser_exclusion_percent: i32,
    category_exclusion_percent: i32,
    selected: Option<Vec<BidId>>,
    total_price: f64,
    advances: u64,
    validations: u64,
    cache_hits: u64,
    cache_misses: u64,
}

#[derive(Debug, Clone, Serialize)]
struct InstanceReport {
    idx: usize,
    seed: u64,
    config: PodConfig<Tm>,
    plans: Vec<StrategyPlan>,
    impressions: Vec<SlotImpression<Tm>>,
    enumeration: Option<EnumerationSummary>,
    selection: Option<SelectionSummary>,
    elapsed_us: u128,
}

#[derive(Debug, Clone, Serialize)]
struct Report {
    description: String,
    base_seed: u64,
    feasible: usize,
    instances: Vec<InstanceReport>,
}

fn sample_config(rng: &mut ChaCha8Rng) -> Option<PodConfig<Tm>> {
    let pod_len = Normal::new(90.0_f64, 30.0).ok()?;
    let pod_max = (pod_len.sample(rng).round() as Tm).clamp(10, 240);
    let pod_min = pod_max - rng.random_range(0..=pod_max / 2);
    let slot_max = rng.random_range(10..=pod_max.min(60));
    let slot_min = rng.random_range(0..=slot_max);
    let min_ads = rng.random_range(1..=3);
    let max_ads = min_ads + rng.random_range(0..=4);

    match PodConfig::builder()
        .pod_duration(Duration::new(pod_min), Duration::new(pod_max))
        .slot_duration(Duration::new(slot_min), Duration::new(slot_max))
        .ad_count(min_ads, max_ads)
        .granularity(*[1, 5, 5, 10].get(rng.random_range(0..4))?)
        .build()
    {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!(error = %e, "Skipping sampled configuration");
            None
        }
    }
}

fn enumerate(rng: &mut ChaCha8Rng, cfg: &PodConfig<Tm>) -> Option<EnumerationSummary> {
    let n = rng.random_range(4..=16);
    let raw: Vec<Duration<Tm>> = (0..n)
        .map(|_| Duration::new(RESPONSE_DURATIONS[rng.random_range(0..RESPONSE_DURATIONS.len())]))
        .collect();
    let candidates = DurationCandidate::from_durations(raw);
    let pod = cfg.pod_duration();
    let ads = cfg.ad_count();

    let mut it = match DurationCombinations::new(
        pod.min(),
        pod.max(),
        ads.min(),
        ads.max(),
        candidates.clone(),
    ) {
        Ok(it) => it,
        Err(e) => {
            warn!(error = %e, "Cannot enumerate duration combinations");
            return None;
        }
    };
    let first = it.by_ref().take(MAX_COMBINATIONS).map(|c| c.values()).collect();
    let stats = it.stats();
    Some(EnumerationSummary {
        candidates,
        expected_total: it.expected_total(),
        generated: stats.generated,
        emitted: stats.emitted,
        first,
    })
}

fn sample_bids(
    rng: &mut ChaCha8Rng,
    plan: &PlanResult<Tm>,
    next_id: &mut u64,
) -> Vec<Vec<Bid<Tm>>> {
    let price = Exp::new(0.25_f64).ok();
    let mut out = Vec::with_capacity(plan.len());
    for slot in plan.slots() {
        let lo = slot.min().value();
        let hi = slot.max().value().max(lo);
        let mut bids = Vec::with_capacity(BIDS_PER_SLOT);
        for _ in 0..BIDS_PER_SLOT {
            *next_id += 1;
            let cpm = price.map_or(1.0, |p| p.sample(rng)) + 0.5;
            let advertiser = ADVERTISERS[rng.random_range(0..ADVERTISERS.len())];
            let category = format!("IAB{}", rng.random_range(1..=12));
            bids.push(
                Bid::new(BidId::new(*next_id), cpm, Duration::new(rng.random_range(lo..=hi)))
                    .with_advertiser_domains([advertiser])
                    .with_categories([category]),
            );
        }
        Bid::sort_by_price_desc(&mut bids);
        out.push(bids);
    }
    out
}

fn select(rng: &mut ChaCha8Rng, slots: &[Vec<Bid<Tm>>]) -> Option<SelectionSummary> {
    let adv = *[0, 50, 100].get(rng.random_range(0..3))?;
    let cat = *[0, 100].get(rng.random_range(0..2))?;
    let policy = match ExclusionPolicy::from_percents(adv, cat) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "Invalid exclusion settings");
            return None;
        }
    };
    let mut selector = BidCombinationSelector::new(slots, policy.comparator()).ok()?;
    let pod = selector.get_ad_pod();
    let stats = selector.stats();
    let cache = selector.cache().stats();
    Some(SelectionSummary {
        advertiser_exclusion_percent: adv,
        category_exclusion_percent: cat,
        total_price: pod.as_ref().map_or(0.0, |p| p.iter().map(|b| b.price()).sum()),
        selected: pod.map(|p| p.iter().map(|b| b.id()).collect()),
        advances: stats.advances,
        validations: stats.validations,
        cache_hits: cache.hits,
        cache_misses: cache.misses,
    })
}

fn run_instance(idx: usize, seed: u64) -> Option<InstanceReport> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let cfg = sample_config(&mut rng)?;
    let planner = PodSlotPlanner::new();

    let t0 = Instant::now();
    let plans = match planner.plan_all_strategies(&cfg) {
        Ok(p) => p,
        Err(e) => {
            warn!(idx, error = %e, "Strategy derivation failed");
            return None;
        }
    };
    let requested = plans
        .iter()
        .find(|(s, _)| *s == PlanStrategy::AsRequested)
        .map(|(_, p)| p.clone())
        .unwrap_or_else(|| planner.plan(&cfg));

    let enumeration = enumerate(&mut rng, &cfg);
    let mut next_id = (idx as u64) << 32;
    let selection = if requested.is_feasible() {
        let slots = sample_bids(&mut rng, &requested, &mut next_id);
        select(&mut rng, &slots)
    } else {
        None
    };
    let elapsed = t0.elapsed();

    info!(idx, %cfg, slots = requested.len(), free = %requested.free_time(), "Planned pod");

    Some(InstanceReport {
        idx,
        seed,
        config: cfg,
        impressions: requested.impressions(&format!("pod{idx}")),
        plans: plans
            .into_iter()
            .map(|(s, plan)| StrategyPlan {
                strategy: s.name(),
                plan,
            })
            .collect(),
        enumeration,
        selection,
        elapsed_us: elapsed.as_micros(),
    })
}

fn main() {
    enable_tracing();

    let report_path: String = env_or("ADPOD_REPORT", "adpod_report.json".to_string());
    let n_instances: usize = env_or("ADPOD_INSTANCES", 50);
    let base_seed: u64 = env_or("ADPOD_SEED", 42);

    let t0 = Instant::now();
    let instances: Vec<InstanceReport> = (0..n_instances)
        .into_par_iter()
        .filter_map(|i| run_instance(i, base_seed + i as u64))
        .collect();
    let feasible = instances
        .iter()
        .filter(|r| r.plans.first().is_some_and(|p| p.plan.is_feasible()))
        .count();

    let report = Report {
        description: "Ad pod planning run: seeded synthetic pods planned under every strategy, with duration combinations and a bid selection per pod.".into(),
        base_seed,
        feasible,
        instances,
    };

    let file = File::create(&report_path).expect("create report file");
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report).expect("write json report");

    info!(
        instances = report.instances.len(),
        feasible,
        elapsed_ms = t0.elapsed().as_millis(),
        "Done"
    );
    println!("Wrote: {report_path}");
}
