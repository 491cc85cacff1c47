//! Plan and schedule types shared by the planner, scheduler, and verifier:
//! `InstructionSet`, `ScheduleRecord`, `Schedule`.

use std::collections::HashMap;

/// `process_name -> remaining count`, mutated by the scheduler as it
/// consumes the planner's advisory bill of materials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionSet(HashMap<String, u64>);

impl InstructionSet {
    pub fn new() -> Self {
        InstructionSet::default()
    }

    pub fn get(&self, name: &str) -> u64 {
        self.0.get(name).copied().unwrap_or(0)
    }

    pub fn bump(&mut self, name: &str, delta: u64) {
        *self.0.entry(name.to_string()).or_insert(0) += delta;
    }

    /// Decrement by one; no-op (saturating) if already zero.
    pub fn decrement(&mut self, name: &str) {
        if let Some(count) = self.0.get_mut(name) {
            *count = count.saturating_sub(1);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|&count| count == 0)
    }

    /// Names with a strictly positive remaining count, in the iteration
    /// order callers supply their own sort over (this map has no
    /// ordering of its own).
    pub fn pending(&self) -> impl Iterator<Item = &String> {
        self.0.iter().filter(|(_, &count)| count > 0).map(|(name, _)| name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.0.iter()
    }
}

impl FromIterator<(String, u64)> for InstructionSet {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        InstructionSet(iter.into_iter().collect())
    }
}

/// One emitted `(cycle, [process_names started])` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRecord {
    pub cycle: u64,
    pub starts: Vec<String>,
}

/// The ordered sequence of records a scheduler run produces, plus the
/// derived fields the scorer computes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    pub records: Vec<ScheduleRecord>,
}

impl Schedule {
    pub fn new() -> Self {
        Schedule::default()
    }

    pub fn push(&mut self, cycle: u64, starts: Vec<String>) {
        self.records.push(ScheduleRecord { cycle, starts });
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last_cycle(&self) -> Option<u64> {
        self.records.last().map(|r| r.cycle)
    }

    /// `true` iff this schedule started at least one process at cycle 0.
    pub fn started_at_zero(&self) -> bool {
        self.records
            .first()
            .map(|r| r.cycle == 0 && !r.starts.is_empty())
            .unwrap_or(false)
    }
}
