//! `krpsim_verif <config> <trace>`: independently replay a schedule
//! trace against a configuration and report pass/fail.

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use krpsim_cli::cli::KrpsimVerifArgs;
use krpsim_io::{load_config, load_trace};
use krpsim_verify::verify_trace;

fn main() {
    let args = KrpsimVerifArgs::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(args.log_level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    if let Err(err) = run(&args) {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(args: &KrpsimVerifArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    let trace = load_trace(&args.trace)
        .with_context(|| format!("loading trace from {}", args.trace.display()))?;

    match verify_trace(&config.initial_stock, &config.catalog, &trace) {
        Ok(final_stock) => {
            info!(entries = final_stock.len(), "trace verified successfully");
            println!("OK");
            Ok(())
        }
        Err(err) => {
            error!(stock = ?config.initial_stock, "trace rejected: {err}");
            Err(err.into())
        }
    }
}
