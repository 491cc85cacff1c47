//! # krpsim-cli: command-line argument definitions
//!
//! The actual `main` wiring lives in `src/bin/krpsim.rs` and
//! `src/bin/krpsim_verif.rs`; this crate only holds the shared
//! [`cli::KrpsimArgs`] / [`cli::KrpsimVerifArgs`] parsers so integration
//! tests can exercise them without going through a subprocess.

pub mod cli;

pub use cli::{KrpsimArgs, KrpsimVerifArgs};
