//! Meta-search: runs independent planner/scheduler candidates under
//! fresh seeds until a wall-clock budget runs out, keeping whichever
//! candidate the scorer's comparator prefers.
//!
//! Each candidate gets its own `StdRng` seeded from a caller-supplied
//! master seed, so the whole search is deterministic given the master
//! seed, even though individual candidates aren't.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use krpsim_core::{Catalog, Schedule, Stock};

use crate::planner::retrieve_instructions;
use crate::scheduler::finalize_process;
use crate::scorer::{beats_incumbent, score_schedule, ScoreResult};

#[derive(Debug, Clone)]
pub struct MetaSearchConfig {
    pub max_instructions: u32,
    pub max_cycle: u64,
    pub max_delay: u64,
    pub generation_cap: u32,
    pub wall_clock_budget: Duration,
    pub master_seed: u64,
}

#[derive(Debug, Clone)]
pub struct MetaSearchOutcome {
    pub schedule: Schedule,
    pub score: ScoreResult,
    pub generations_run: u32,
}

pub fn run_meta_search(
    initial_stock: &Stock,
    target: &str,
    catalog: &Catalog,
    complex: bool,
    config: &MetaSearchConfig,
) -> MetaSearchOutcome {
    let deadline = Instant::now() + config.wall_clock_budget;
    let mut master_rng = StdRng::seed_from_u64(config.master_seed);
    let mut incumbent: Option<(Schedule, ScoreResult)> = None;
    let mut generations_run = 0;

    for generation in 0..config.generation_cap {
        // The first candidate always runs; the budget is only checked
        // *between* candidates, never preempting one mid-run.
        if generation > 0 && Instant::now() >= deadline {
            break;
        }

        let candidate_seed: u64 = master_rng.gen();
        let mut candidate_rng = StdRng::seed_from_u64(candidate_seed);

        let instructions = retrieve_instructions(
            initial_stock,
            target,
            catalog,
            config.max_instructions,
            complex,
            &mut candidate_rng,
        );
        let (schedule, final_stock) = finalize_process(
            instructions,
            initial_stock,
            catalog,
            config.max_cycle,
            config.max_delay,
            complex,
        );
        let score = score_schedule(&schedule, initial_stock, &final_stock, target);
        generations_run += 1;

        let replace = match &incumbent {
            None => true,
            Some((_, incumbent_score)) => beats_incumbent(&score, incumbent_score),
        };
        if replace {
            tracing::info!(
                generation,
                score = score.score,
                self_sustaining = score.self_sustaining,
                "meta-search improved incumbent"
            );
            incumbent = Some((schedule, score));
        }
    }

    let (schedule, score) = incumbent.unwrap_or_else(|| {
        let empty = Schedule::new();
        let score = score_schedule(&empty, initial_stock, initial_stock, target);
        (empty, score)
    });

    MetaSearchOutcome {
        schedule,
        score,
        generations_run,
    }
}
