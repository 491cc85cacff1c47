//! Scenario classifier: decides whether a catalog is
//! "simple" or "complex" so the planner and scheduler can pick the
//! cheaper code path when the extra machinery buys nothing.
//!
//! A catalog is complex iff it has at least 4 processes *and* some
//! resource is produced by one process and needed by a different one
//! — there's a real producer/consumer edge, not just a pile of
//! unrelated conversions.

use krpsim_core::Catalog;

pub fn is_complex(catalog: &Catalog) -> bool {
    if catalog.len() < 4 {
        return false;
    }
    let processes: Vec<_> = catalog.values().collect();
    for (i, consumer) in processes.iter().enumerate() {
        for need in consumer.needs.keys() {
            let produced_elsewhere = processes
                .iter()
                .enumerate()
                .any(|(j, producer)| i != j && producer.results.contains(need));
            if produced_elsewhere {
                return true;
            }
        }
    }
    false
}
