//! `krpsim <config> <delay>`: load a configuration, classify it,
//! run the meta-search, and emit the winning schedule as a trace.
//!
//! `main` is a thin shell around a `run() -> anyhow::Result<()>` inner
//! function: a `tracing_subscriber::FmtSubscriber` is installed from
//! the CLI's `--log-level` before anything else runs, and a non-zero
//! exit with a one-line diagnostic follows on failure.

use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use krpsim_algo::{is_complex, run_meta_search, MetaSearchConfig};
use krpsim_cli::cli::KrpsimArgs;
use krpsim_io::{load_config, render_trace, write_trace};

fn main() {
    let args = KrpsimArgs::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(args.log_level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    if let Err(err) = run(&args) {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(args: &KrpsimArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    let target = config.optimization_target()?;
    let complex = is_complex(&config.catalog);

    info!(
        target = target.as_str(),
        complex,
        processes = config.catalog.len(),
        "configuration loaded"
    );

    let search_config = MetaSearchConfig {
        max_instructions: args.max_instructions,
        max_cycle: args.max_cycle,
        max_delay: args.max_delay,
        generation_cap: args.generation_cap,
        wall_clock_budget: Duration::from_secs(args.delay),
        master_seed: args.seed,
    };

    let outcome = run_meta_search(&config.initial_stock, &target, &config.catalog, complex, &search_config);

    info!(
        generations = outcome.generations_run,
        created = outcome.score.created,
        score = outcome.score.score,
        self_sustaining = outcome.score.self_sustaining,
        "meta-search finished"
    );

    let trace_text = render_trace(&outcome.schedule);
    match &args.out {
        Some(path) => {
            write_trace(path, &outcome.schedule)
                .with_context(|| format!("writing trace to {}", path.display()))?;
            info!(path = %path.display(), "trace written");
        }
        None => {
            std::io::stdout().write_all(trace_text.as_bytes())?;
        }
    }

    Ok(())
}
