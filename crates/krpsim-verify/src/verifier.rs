//! Independent trace replay. This does not reuse any planner/scheduler
//! state — it takes a catalog and a trace and decides feasibility from
//! scratch, rule by rule. `krpsim-io::trace` already enforces line shape,
//! cycle non-negativity, and cycle ordering while parsing; this module
//! owns process-name validity and resource feasibility, which need the
//! catalog.
//!
//! Replay applies a process's `needs` and `results` at the *same*
//! cycle, ignoring `delay` — the lenient variant, fixed here for
//! compatibility rather than left as an implementer's choice.

use std::path::Path;

use krpsim_core::{Catalog, KrpsimError, KrpsimResult, Stock};
use krpsim_io::{load_config, load_trace, TraceLine};

/// Replay `trace` against `catalog` starting from `initial_stock`,
/// returning the final stock on success or the first rule violation
/// encountered.
pub fn verify_trace(initial_stock: &Stock, catalog: &Catalog, trace: &[TraceLine]) -> KrpsimResult<Stock> {
    let mut stock = initial_stock.clone();

    for line in trace {
        let process = catalog.get(&line.process).ok_or_else(|| KrpsimError::UnknownProcess {
            line: line.line_no,
            process: line.process.clone(),
        })?;

        if !process.is_feasible(&stock) {
            let err = KrpsimError::UnsatisfiedNeeds {
                line: line.line_no,
                process: line.process.clone(),
                needed: format_stock(&process.needs),
                available: format_stock(&stock),
            };
            tracing::warn!(error = %err, "trace replay rejected");
            return Err(err);
        }

        stock.subtract(&process.needs);
        stock.add(&process.results);
    }

    Ok(stock)
}

/// Load a configuration and trace from disk and verify the trace
/// against it end to end. This is what the `krpsim_verif` binary calls.
pub fn verify_files(config_path: &Path, trace_path: &Path) -> KrpsimResult<Stock> {
    let config = load_config(config_path)?;
    let trace = load_trace(trace_path)?;
    verify_trace(&config.initial_stock, &config.catalog, &trace)
}

/// Render a stock as a sorted, comma-separated `name:qty` list for
/// diagnostics — sorted so the same stock always prints the same way.
fn format_stock(stock: &Stock) -> String {
    let mut entries: Vec<(&String, &i64)> = stock.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
        .iter()
        .map(|(name, qty)| format!("{name}:{qty}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use krpsim_core::Process;
    use krpsim_io::parse_trace;

    fn stock(entries: &[(&str, i64)]) -> Stock {
        Stock::from_entries(entries.iter().map(|(n, q)| (n.to_string(), *q)))
    }

    fn simple_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert(Process::new("p1", stock(&[("a", 1)]), stock(&[("b", 1)]), 2));
        catalog
    }

    #[test]
    fn feasible_trace_applies_needs_then_results() {
        let catalog = simple_catalog();
        let trace = parse_trace("0:p1\n0:no_more_process_doable\n").unwrap();
        let final_stock = verify_trace(&stock(&[("a", 1)]), &catalog, &trace).unwrap();
        assert_eq!(final_stock.get("a"), 0);
        assert_eq!(final_stock.get("b"), 1);
    }

    #[test]
    fn unknown_process_is_rejected() {
        let catalog = simple_catalog();
        let trace = parse_trace("0:nonexistent\n").unwrap();
        let err = verify_trace(&stock(&[("a", 1)]), &catalog, &trace).unwrap_err();
        assert!(matches!(err, KrpsimError::UnknownProcess { line: 1, .. }));
    }

    #[test]
    fn unsatisfied_needs_reports_needed_and_available() {
        let catalog = simple_catalog();
        let trace = parse_trace("0:p1\n").unwrap();
        let err = verify_trace(&stock(&[]), &catalog, &trace).unwrap_err();
        match err {
            KrpsimError::UnsatisfiedNeeds { needed, available, .. } => {
                assert_eq!(needed, "a:1");
                assert_eq!(available, "");
            }
            other => panic!("expected UnsatisfiedNeeds, got {other:?}"),
        }
    }

    #[test]
    fn same_cycle_consumes_and_produces_without_delay_accounting() {
        let mut catalog = Catalog::new();
        catalog.insert(Process::new("chain", stock(&[("a", 1)]), stock(&[("b", 1)]), 100));
        catalog.insert(Process::new("next", stock(&[("b", 1)]), stock(&[("c", 1)]), 100));
        let trace = parse_trace("0:chain\n0:next\n").unwrap();
        let final_stock = verify_trace(&stock(&[("a", 1)]), &catalog, &trace).unwrap();
        assert_eq!(final_stock.get("c"), 1);
    }

    #[test]
    fn needs_exceeding_stock_mid_trace_fails_at_that_line() {
        let catalog = simple_catalog();
        let trace = parse_trace("0:p1\n1:p1\n").unwrap();
        let err = verify_trace(&stock(&[("a", 1)]), &catalog, &trace).unwrap_err();
        assert!(matches!(err, KrpsimError::UnsatisfiedNeeds { line: 2, .. }));
    }
}
