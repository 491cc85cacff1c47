//! # krpsim-verify: independent trace verification
//!
//! See [`verifier`] for the replay rules.

pub mod verifier;

pub use verifier::{verify_files, verify_trace};
