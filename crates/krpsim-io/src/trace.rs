//! Schedule trace I/O: one `cycle:process_name` per line, an optional
//! `cycle:no_more_process_doable` sentinel marking the end.

use std::fs;
use std::io::Write;
use std::path::Path;

use krpsim_core::{KrpsimError, KrpsimResult, Schedule};

pub const END_SENTINEL: &str = "no_more_process_doable";

/// A single raw trace line, before any catalog-aware replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceLine {
    pub line_no: usize,
    pub cycle: i64,
    pub process: String,
}

/// Parse trace text into lines, stopping at (and excluding) the end
/// sentinel. Blank lines are skipped. This performs only syntactic
/// validation (line shape, cycle non-negativity and ordering);
/// process-name and feasibility checks belong to the verifier, which
/// needs the catalog.
///
/// Input with nothing but blank lines (no sentinel, no process lines)
/// is rejected as empty. A trace consisting of only the end sentinel is
/// not: that's the correct rendering of a schedule that starts nothing,
/// e.g. a target with no possible path to production.
pub fn parse_trace(text: &str) -> KrpsimResult<Vec<TraceLine>> {
    let mut lines = Vec::new();
    let mut previous_cycle: Option<i64> = None;
    let mut saw_any_line = false;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        saw_any_line = true;

        let colon = line.find(':').ok_or_else(|| KrpsimError::MalformedTraceLine {
            line: line_no,
            content: line.to_string(),
        })?;
        let (cycle_str, process) = line.split_at(colon);
        let process = &process[1..];
        if process.is_empty() {
            return Err(KrpsimError::MalformedTraceLine {
                line: line_no,
                content: line.to_string(),
            });
        }

        let cycle: i64 = cycle_str.parse().map_err(|_| KrpsimError::BadCycleNumber {
            line: line_no,
            content: line.to_string(),
        })?;
        if cycle < 0 {
            return Err(KrpsimError::NegativeCycle {
                line: line_no,
                cycle,
            });
        }
        if let Some(previous) = previous_cycle {
            if cycle < previous {
                return Err(KrpsimError::CyclesOutOfOrder {
                    line: line_no,
                    cycle,
                    previous,
                });
            }
        }
        previous_cycle = Some(cycle);

        if process == END_SENTINEL {
            break;
        }

        lines.push(TraceLine {
            line_no,
            cycle,
            process: process.to_string(),
        });
    }

    if !saw_any_line {
        return Err(KrpsimError::EmptyTrace);
    }
    Ok(lines)
}

pub fn load_trace(path: &Path) -> KrpsimResult<Vec<TraceLine>> {
    let text = fs::read_to_string(path)?;
    parse_trace(&text)
}

/// Render a schedule as trace text, one `cycle:process_name` per
/// started process, terminated by the end-of-schedule sentinel.
pub fn render_trace(schedule: &Schedule) -> String {
    let mut out = String::new();
    for record in &schedule.records {
        for process in &record.starts {
            out.push_str(&format!("{}:{}\n", record.cycle, process));
        }
    }
    let last_cycle = schedule.last_cycle().unwrap_or(0);
    out.push_str(&format!("{last_cycle}:{END_SENTINEL}\n"));
    out
}

pub fn write_trace(path: &Path, schedule: &Schedule) -> KrpsimResult<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(render_trace(schedule).as_bytes())?;
    Ok(())
}
