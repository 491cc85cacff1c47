//! Backward-chaining planner: starting from the optimization target,
//! walks demand backwards through the catalog's producer/consumer
//! relation, building an advisory [`InstructionSet`] the scheduler
//! later tries to realize under the real stock and delay constraints.
//!
//! The RNG is injected rather than owned, via a `&mut impl Rng`
//! parameter, so callers (tests, the meta-search loop) control
//! reproducibility.

use std::collections::HashMap;

use rand::Rng;

use krpsim_core::{Catalog, InstructionSet, Process, Stock};

/// `resource -> remaining demand`. Unlike [`Stock`], entries may be
/// negative (a surplus left over from production that outran demand).
/// A key is only ever absent when its demand is exactly satisfied —
/// "absent key ≡ 0" still holds, surplus is the one case a zero
/// multiset entry carries information worth keeping.
#[derive(Debug, Default)]
struct Demand {
    order: Vec<String>,
    values: HashMap<String, i64>,
}

impl Demand {
    fn new() -> Self {
        Demand::default()
    }

    fn get(&self, name: &str) -> i64 {
        self.values.get(name).copied().unwrap_or(0)
    }

    fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn first_key(&self) -> Option<&str> {
        self.order.first().map(String::as_str)
    }

    fn first_positive_key(&self) -> Option<&str> {
        self.order
            .iter()
            .find(|name| self.get(name) > 0)
            .map(String::as_str)
    }

    fn remove(&mut self, name: &str) {
        if self.values.remove(name).is_some() {
            self.order.retain(|n| n != name);
        }
    }

    fn set(&mut self, name: &str, value: i64) {
        if value == 0 {
            self.remove(name);
            return;
        }
        if !self.values.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.values.insert(name.to_string(), value);
    }

    fn bump(&mut self, name: &str, delta: i64) {
        let next = self.get(name) + delta;
        self.set(name, next);
    }

    fn add_multiset(&mut self, stock: &Stock) {
        for (name, qty) in stock.iter() {
            self.bump(name, *qty);
        }
    }

    fn subtract_multiset(&mut self, stock: &Stock) {
        for (name, qty) in stock.iter() {
            self.bump(name, -qty);
        }
    }

    /// Complex mode only: drop every entry whose demand is already met
    /// or in surplus before picking the next key.
    fn prune_non_positive(&mut self) {
        let spent: Vec<String> = self
            .order
            .iter()
            .filter(|name| self.get(name) <= 0)
            .cloned()
            .collect();
        for name in spent {
            self.remove(&name);
        }
    }
}

/// Walk demand backwards from `target`, returning an advisory bill of
/// materials capped at `max_instructions` total `select` calls that
/// pick a producer.
pub fn retrieve_instructions(
    initial_stock: &Stock,
    target: &str,
    catalog: &Catalog,
    max_instructions: u32,
    complex: bool,
    rng: &mut impl Rng,
) -> InstructionSet {
    let mut current_stock = initial_stock.clone();
    let mut required = Demand::new();
    let mut instructions = InstructionSet::new();
    let mut budget = max_instructions;

    select(
        target,
        -1,
        target,
        catalog,
        complex,
        &mut current_stock,
        &mut required,
        &mut instructions,
        &mut budget,
        rng,
    );

    loop {
        if required.is_empty() || budget == 0 {
            break;
        }
        let name = if complex {
            required.prune_non_positive();
            required
                .first_positive_key()
                .or_else(|| required.first_key())
                .map(str::to_string)
        } else {
            required.first_key().map(str::to_string)
        };
        let Some(name) = name else {
            break;
        };
        let qty = required.get(&name);
        let satisfied = select(
            &name,
            qty,
            target,
            catalog,
            complex,
            &mut current_stock,
            &mut required,
            &mut instructions,
            &mut budget,
            rng,
        );
        if !satisfied {
            break;
        }
    }

    instructions
}

/// Try to satisfy `qty` units of `name`, either by drawing from stock
/// (90% of the time, when there's any stock and budget remains) or by
/// picking a producer and recording it in `instructions`. Returns
/// `false` only when demand can't be advanced at all (no stock draw,
/// no producer, or no budget) — the caller treats that as the signal
/// to stop the outer loop.
#[allow(clippy::too_many_arguments)]
fn select(
    name: &str,
    qty: i64,
    target: &str,
    catalog: &Catalog,
    complex: bool,
    current_stock: &mut Stock,
    required: &mut Demand,
    instructions: &mut InstructionSet,
    budget: &mut u32,
    rng: &mut impl Rng,
) -> bool {
    if qty != -1 && current_stock.get(name) > 0 && *budget > 0 && rng.gen_range(0..10) < 9 {
        let available = current_stock.get(name);
        current_stock.set(name, (available - qty).max(0));
        if qty > available {
            required.bump(name, -available);
        } else {
            required.remove(name);
        }
        return true;
    }

    let candidates: Vec<&Process> = catalog.producers_of(name).collect();
    if candidates.is_empty() || *budget == 0 {
        return false;
    }

    let chosen = choose_producer(complex, name, target, &candidates, rng);
    apply_production(chosen, name, qty, required, instructions, budget);
    true
}

fn choose_producer<'a>(
    complex: bool,
    name: &str,
    target: &str,
    candidates: &[&'a Process],
    rng: &mut impl Rng,
) -> &'a Process {
    if !complex {
        let idx = rng.gen_range(0..candidates.len());
        return candidates[idx];
    }
    if name == target {
        // First occurrence wins ties, so scan left-to-right and only
        // replace on a strictly better ratio (`Iterator::max_by` would
        // keep the *last* of equal maxima instead).
        let mut best = candidates[0];
        let mut best_ratio = yield_ratio(best, target);
        for &p in &candidates[1..] {
            let ratio = yield_ratio(p, target);
            if ratio > best_ratio {
                best = p;
                best_ratio = ratio;
            }
        }
        return best;
    }
    let mut ranked: Vec<&Process> = candidates.to_vec();
    ranked.sort_by(|a, b| {
        a.delay
            .cmp(&b.delay)
            .then(b.results.get(name).cmp(&a.results.get(name)))
            .then(a.needs.len().cmp(&b.needs.len()))
    });
    ranked[0]
}

fn yield_ratio(p: &Process, resource: &str) -> f64 {
    p.results.get(resource) as f64 / p.delay.max(1) as f64
}

fn apply_production(
    p: &Process,
    name: &str,
    qty: i64,
    required: &mut Demand,
    instructions: &mut InstructionSet,
    budget: &mut u32,
) {
    let mut run_once = |required: &mut Demand, instructions: &mut InstructionSet, budget: &mut u32| {
        instructions.bump(&p.name, 1);
        required.add_multiset(&p.needs);
        required.subtract_multiset(&p.results);
        *budget = budget.saturating_sub(1);
    };
    run_once(required, instructions, budget);
    loop {
        let remaining = required.get(name);
        if remaining > 0 && remaining < qty && *budget > 0 {
            run_once(required, instructions, budget);
        } else {
            break;
        }
    }
}
