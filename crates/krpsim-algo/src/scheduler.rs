//! Discrete-event scheduler (`finalize_process`, `pick_starts`):
//! replays an [`InstructionSet`] against the real stock
//! and each process's `delay`, producing the [`Schedule`] that gets
//! written out as a trace.
//!
//! The producer/consumer relation needed by Pass A's need-closure is
//! just two `HashMap`-backed lookups with a depth cap — not enough
//! traversal to earn a graph crate.

use std::collections::{HashMap, HashSet};

use krpsim_core::{Catalog, InstructionSet, Process, Schedule, Stock};

/// How many expansion rounds Pass A's need-closure runs before giving
/// up. Three rounds catches "I need C, C needs B, B needs A" chains
/// without unbounded traversal of adversarial catalogs.
const NEED_CLOSURE_DEPTH: usize = 3;

/// Replay `instructions` cycle by cycle until no more completions are
/// pending, `max_cycle` is passed, or `max_delay` is passed. Returns
/// the emitted schedule and the stock left over at the end of the run.
pub fn finalize_process(
    mut instructions: InstructionSet,
    initial_stock: &Stock,
    catalog: &Catalog,
    max_cycle: u64,
    max_delay: u64,
    complex: bool,
) -> (Schedule, Stock) {
    let mut stock = initial_stock.clone();
    let mut todo: HashMap<u64, Vec<String>> = HashMap::new();
    let mut schedule = Schedule::new();

    let starts = run_cycle(0, &mut instructions, &mut stock, catalog, &mut todo, max_delay, complex);
    schedule.push(0, starts);
    tracing::debug!(cycle = 0, "scheduled cycle");

    loop {
        let Some(&next) = todo.keys().min() else {
            break;
        };
        if next > max_cycle || next > max_delay {
            break;
        }
        let starts = run_cycle(next, &mut instructions, &mut stock, catalog, &mut todo, max_delay, complex);
        schedule.push(next, starts);
        tracing::debug!(cycle = next, "scheduled cycle");
    }

    (schedule, stock)
}

/// Fully settle one cycle: apply any completions already queued for
/// `t` (including ones a delay-0 start in this same cycle just
/// re-queued), call `pickStarts`, and repeat until a pass produces no
/// new starts and nothing new lands in `todo[t]`. This is what keeps
/// "at most one record per cycle" true even though a `delay = 0`
/// process's completion is visible within the cycle it started in.
fn run_cycle(
    t: u64,
    instructions: &mut InstructionSet,
    stock: &mut Stock,
    catalog: &Catalog,
    todo: &mut HashMap<u64, Vec<String>>,
    max_delay: u64,
    complex: bool,
) -> Vec<String> {
    let mut all_starts = Vec::new();
    loop {
        if let Some(completions) = todo.remove(&t) {
            for name in completions {
                if let Some(process) = catalog.get(&name) {
                    stock.add(&process.results);
                }
            }
        }

        let starts = pick_starts(instructions, stock, catalog, complex);
        if starts.is_empty() {
            break;
        }
        for name in &starts {
            let Some(process) = catalog.get(name) else {
                continue;
            };
            if process.delay == 0 {
                todo.entry(t).or_default().push(name.clone());
            } else {
                let completion = t + process.delay as u64;
                if completion <= max_delay {
                    todo.entry(completion).or_default().push(name.clone());
                }
            }
        }
        all_starts.extend(starts);
    }
    all_starts
}

/// One call to the four-pass starter policy (§4.5). Passes A, C, and D
/// only run in complex mode; simple mode is just Pass B.
fn pick_starts(instructions: &mut InstructionSet, stock: &mut Stock, catalog: &Catalog, complex: bool) -> Vec<String> {
    let mut starts = Vec::new();

    if complex {
        starts.extend(pass_a_preroll_conversions(instructions, stock, catalog));
    }

    starts.extend(pass_b_planned_execution(instructions, stock, catalog));

    if complex {
        let already: HashSet<&str> = starts.iter().map(String::as_str).collect();
        starts.extend(pass_c_need_chasing(instructions, stock, catalog, &already));

        if starts.is_empty() {
            starts.extend(pass_d_desperation(stock, catalog));
        }
    }

    starts
}

/// Pass A (complex only): pre-roll whatever conversion processes feed
/// the need-closure of the still-planned instructions, even if the
/// planner never explicitly scheduled them. Ordered cheapest-delay
/// first; repeats a process as long as it stays feasible.
fn pass_a_preroll_conversions(instructions: &InstructionSet, stock: &mut Stock, catalog: &Catalog) -> Vec<String> {
    let closure = need_closure(instructions, catalog);
    if closure.is_empty() {
        return Vec::new();
    }
    let planned: HashSet<&str> = instructions.pending().map(String::as_str).collect();

    let mut candidates: Vec<&Process> = catalog
        .in_declaration_order()
        .filter(|p| !planned.contains(p.name.as_str()) && p.results.keys().any(|r| closure.contains(r)))
        .collect();
    candidates.sort_by_key(|p| p.delay);

    let mut starts = Vec::new();
    loop {
        match candidates.iter().find(|p| p.is_feasible(stock)) {
            Some(p) => {
                stock.subtract(&p.needs);
                starts.push(p.name.clone());
            }
            None => break,
        }
    }
    starts
}

/// `resource -> {needs of any process up to NEED_CLOSURE_DEPTH steps
/// of producer-chasing away}`, seeded from the needs of every process
/// still carrying planned instructions.
fn need_closure(instructions: &InstructionSet, catalog: &Catalog) -> HashSet<String> {
    let mut closure: HashSet<String> = HashSet::new();
    for name in instructions.pending() {
        if let Some(p) = catalog.get(name) {
            closure.extend(p.needs.keys().cloned());
        }
    }
    for _ in 0..NEED_CLOSURE_DEPTH {
        let mut next = closure.clone();
        for resource in &closure {
            for producer in catalog.producers_of(resource) {
                next.extend(producer.needs.keys().cloned());
            }
        }
        closure = next;
    }
    closure
}

/// Pass B: the planner's actual bill of materials, in reverse
/// lexicographic order of process name, each started as many times as
/// its remaining instruction count and the stock allow.
fn pass_b_planned_execution(instructions: &mut InstructionSet, stock: &mut Stock, catalog: &Catalog) -> Vec<String> {
    let mut names: Vec<String> = instructions.pending().cloned().collect();
    names.sort();
    names.reverse();

    let mut starts = Vec::new();
    for name in names {
        let Some(process) = catalog.get(&name) else {
            continue;
        };
        while instructions.get(&name) > 0 && process.is_feasible(stock) {
            stock.subtract(&process.needs);
            instructions.decrement(&name);
            starts.push(name.clone());
        }
    }
    starts
}

/// Pass C (complex only): a single, unsorted sweep over the catalog
/// for anything — not already started this cycle — whose output is
/// still needed by a pending instruction.
fn pass_c_need_chasing(
    instructions: &InstructionSet,
    stock: &mut Stock,
    catalog: &Catalog,
    already_started: &HashSet<&str>,
) -> Vec<String> {
    let still_needed: HashSet<String> = instructions
        .pending()
        .filter_map(|name| catalog.get(name))
        .flat_map(|p| p.needs.keys().cloned())
        .collect();
    if still_needed.is_empty() {
        return Vec::new();
    }

    let mut starts = Vec::new();
    for p in catalog.in_declaration_order() {
        if already_started.contains(p.name.as_str()) {
            continue;
        }
        if p.results.keys().any(|r| still_needed.contains(r)) && p.is_feasible(stock) {
            stock.subtract(&p.needs);
            starts.push(p.name.clone());
        }
    }
    starts
}

/// Pass D (complex only): if nothing at all has started this cycle,
/// start the first feasible process in catalog order — anything beats
/// stalling outright.
fn pass_d_desperation(stock: &mut Stock, catalog: &Catalog) -> Vec<String> {
    for p in catalog.in_declaration_order() {
        if p.is_feasible(stock) {
            stock.subtract(&p.needs);
            return vec![p.name.clone()];
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(entries: &[(&str, i64)]) -> Stock {
        Stock::from_entries(entries.iter().map(|(n, q)| (n.to_string(), *q)))
    }

    fn linear_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert(Process::new("buy_material", stock(&[("euro", 8)]), stock(&[("material", 1)]), 10));
        catalog.insert(Process::new("buy_tools", stock(&[("euro", 7)]), stock(&[("tools", 1)]), 10));
        catalog.insert(Process::new(
            "do_montage",
            stock(&[("material", 1), ("tools", 1)]),
            stock(&[("product", 1)]),
            30,
        ));
        catalog.insert(Process::new("deliver", stock(&[("product", 1)]), stock(&[("client_content", 1)]), 20));
        catalog
    }

    #[test]
    fn simple_mode_only_runs_planned_instructions() {
        let catalog = linear_catalog();
        let mut instructions = InstructionSet::new();
        instructions.bump("buy_material", 1);
        instructions.bump("buy_tools", 1);
        let initial = stock(&[("euro", 20)]);
        let (schedule, final_stock) = finalize_process(instructions, &initial, &catalog, 100, 100, false);
        assert!(!schedule.is_empty());
        assert_eq!(final_stock.get("material"), 1);
        assert_eq!(final_stock.get("tools"), 1);
    }

    #[test]
    fn at_most_one_record_per_cycle_even_with_zero_delay() {
        let mut catalog = Catalog::new();
        catalog.insert(Process::new("instant", stock(&[("a", 1)]), stock(&[("b", 1)]), 0));
        catalog.insert(Process::new("chain", stock(&[("b", 1)]), stock(&[("c", 1)]), 0));
        let mut instructions = InstructionSet::new();
        instructions.bump("instant", 1);
        instructions.bump("chain", 1);
        let initial = stock(&[("a", 1)]);
        let (schedule, final_stock) = finalize_process(instructions, &initial, &catalog, 10, 10, false);

        let mut cycles: Vec<u64> = schedule.records.iter().map(|r| r.cycle).collect();
        let before_dedup = cycles.len();
        cycles.dedup();
        assert_eq!(cycles.len(), before_dedup, "no cycle number repeats across records");
        assert_eq!(final_stock.get("c"), 1);
    }

    #[test]
    fn infeasible_instructions_produce_an_empty_but_valid_schedule() {
        let catalog = linear_catalog();
        let mut instructions = InstructionSet::new();
        instructions.bump("do_montage", 1);
        let initial = stock(&[]);
        let (schedule, final_stock) = finalize_process(instructions, &initial, &catalog, 10, 10, false);
        assert_eq!(schedule.records.len(), 1);
        assert!(schedule.records[0].starts.is_empty());
        assert!(final_stock.is_empty());
    }

    #[test]
    fn max_delay_zero_caps_the_schedule_at_cycle_zero() {
        let catalog = linear_catalog();
        let mut instructions = InstructionSet::new();
        instructions.bump("buy_material", 1);
        let initial = stock(&[("euro", 20)]);
        let (schedule, _) = finalize_process(instructions, &initial, &catalog, 100, 0, false);
        assert_eq!(schedule.records.len(), 1);
        assert_eq!(schedule.records[0].cycle, 0);
    }

    #[test]
    fn complex_mode_pass_d_starts_something_when_nothing_else_can() {
        let mut catalog = Catalog::new();
        catalog.insert(Process::new("p1", stock(&[("a", 1)]), stock(&[("b", 1)]), 1));
        catalog.insert(Process::new("p2", stock(&[("b", 1)]), stock(&[("c", 1)]), 1));
        catalog.insert(Process::new("p3", stock(&[("a", 1)]), stock(&[("d", 1)]), 1));
        catalog.insert(Process::new("p4", stock(&[("d", 1)]), stock(&[("c", 1)]), 1));
        let instructions = InstructionSet::new();
        let initial = stock(&[("a", 2)]);
        let (schedule, _) = finalize_process(instructions, &initial, &catalog, 10, 10, true);
        assert!(!schedule.records[0].starts.is_empty());
    }
}
