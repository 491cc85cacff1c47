//! Scoring: turns a finished schedule into the numbers the meta-search
//! comparator ranks candidates by. Plain arithmetic over
//! [`Schedule`]/[`Stock`] — no crate earns its keep here.

use krpsim_core::{Schedule, Stock};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    /// Units of the optimization target present in the final stock.
    pub created: i64,
    /// `created / last_cycle`, or `0.0` for an empty schedule or one
    /// that never advances past cycle 0.
    pub score: f64,
    /// True unless the schedule is empty, some initial-stock resource
    /// ended below its starting quantity, or nothing started at cycle 0.
    pub self_sustaining: bool,
}

pub fn score_schedule(schedule: &Schedule, initial_stock: &Stock, final_stock: &Stock, target: &str) -> ScoreResult {
    let created = final_stock.get(target);
    let score = match schedule.last_cycle() {
        None | Some(0) => 0.0,
        Some(last) => created as f64 / last as f64,
    };
    let self_sustaining = !schedule.is_empty()
        && initial_stock.keys().all(|r| final_stock.get(r) >= initial_stock.get(r))
        && schedule.started_at_zero();

    ScoreResult {
        created,
        score,
        self_sustaining,
    }
}

/// The meta-search's incumbent-replacement rule: a self-sustaining
/// candidate always beats a non-self-sustaining one; among candidates
/// that agree on that, the higher score wins (ties favor the newer
/// candidate, so later generations can displace an equally-good
/// earlier one).
pub fn beats_incumbent(candidate: &ScoreResult, incumbent: &ScoreResult) -> bool {
    if candidate.self_sustaining != incumbent.self_sustaining {
        return candidate.self_sustaining;
    }
    candidate.score >= incumbent.score
}
