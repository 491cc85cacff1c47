//! # krpsim-core: shared data model for the krpsim scheduler
//!
//! Provides the resource multiset ([`Stock`]), the process catalog
//! ([`Process`], [`Catalog`]), the plan/schedule types
//! ([`InstructionSet`], [`Schedule`], [`ScheduleRecord`]), and the
//! unified error type ([`KrpsimError`]) shared by the parser, the
//! planner/scheduler, and the verifier.
//!
//! ## Modules
//!
//! - [`stock`] — multiset arithmetic (add/subtract with
//!   prune-on-non-positive).
//! - [`process`] — `Process` and `Catalog`.
//! - [`schedule`] — `InstructionSet`, `Schedule`, `ScheduleRecord`.
//! - [`error`] — `KrpsimError` / `KrpsimResult`.

pub mod error;
pub mod process;
pub mod schedule;
pub mod stock;

pub use error::{KrpsimError, KrpsimResult};
pub use process::{Catalog, Process};
pub use schedule::{InstructionSet, Schedule, ScheduleRecord};
pub use stock::Stock;
