//! `clap` argument definitions for the `krpsim` and `krpsim_verif`
//! binaries: a flat struct per binary with a shared `log_level` flag
//! plus whatever positional arguments each one actually needs.

use std::path::PathBuf;

use clap::Parser;

/// `krpsim <config> <delay>`: run the planner, scheduler, and
/// meta-search, then emit the resulting schedule trace.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct KrpsimArgs {
    /// Path to the configuration file.
    pub config: PathBuf,

    /// Wall-clock budget for the meta-search, in seconds.
    pub delay: u64,

    /// Write the schedule trace here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Logging verbosity.
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    /// Cap on the planner's `select`-picks-a-producer budget.
    #[arg(long, default_value_t = 2000)]
    pub max_instructions: u32,

    /// Hard ceiling on the scheduler's virtual clock.
    #[arg(long, default_value_t = 5000)]
    pub max_cycle: u64,

    /// Hard ceiling on any completion cycle the scheduler will queue.
    #[arg(long, default_value_t = 5000)]
    pub max_delay: u64,

    /// Meta-search generation cap.
    #[arg(long, default_value_t = 1000)]
    pub generation_cap: u32,

    /// Master RNG seed; each generation derives its own seed from this
    /// one, so a run is reproducible end to end.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

/// `krpsim_verif <config> <trace>`: replay a trace against a
/// configuration and report pass/fail.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct KrpsimVerifArgs {
    /// Path to the configuration file the trace was produced against.
    pub config: PathBuf,

    /// Path to the schedule trace to verify.
    pub trace: PathBuf,

    /// Logging verbosity.
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,
}
