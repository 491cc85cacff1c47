//! Configuration-file parser.
//!
//! Grammar, line-oriented:
//!
//! - `# ...` starts a comment (stripped before classification); blank
//!   lines are ignored.
//! - `name:quantity` declares a stock.
//! - `name:(need1:q1;need2:q2;…):(result1:q1;result2:q2;…):delay`
//!   declares a process. Inner groups may be empty.
//! - `optimize:(target1;target2;…)` names the optimization targets; the
//!   **last** one is the scored target.
//!
//! This is a hand-written recursive-descent line parser: the grammar is
//! a handful of nested delimiters, not enough structure to earn a
//! parser-combinator dependency.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use krpsim_core::{Catalog, KrpsimError, KrpsimResult, Process, Stock};

/// A fully parsed, but not yet target-validated, configuration.
#[derive(Debug, Clone)]
pub struct ParsedConfig {
    pub initial_stock: Stock,
    pub catalog: Catalog,
    /// Targets named by `optimize:(...)`, in file order. The last entry
    /// is the one the scorer uses; see [`ParsedConfig::optimization_target`].
    pub optimize_targets: Vec<String>,
}

impl ParsedConfig {
    /// The last `optimize:(...)` entry, validated against every resource
    /// name that appears anywhere in the file (a stock, or a need/result
    /// of some process). If the target isn't among those names, this is
    /// a malformed configuration.
    pub fn optimization_target(&self) -> KrpsimResult<String> {
        let target = self
            .optimize_targets
            .last()
            .ok_or_else(|| KrpsimError::BadFile {
                line: 0,
                reason: "optimize directive names no targets".to_string(),
            })?
            .clone();
        if self.known_resource_names().contains(&target) {
            Ok(target)
        } else {
            Err(KrpsimError::BadFile {
                line: 0,
                reason: format!("optimization target {target:?} names no known resource"),
            })
        }
    }

    fn known_resource_names(&self) -> HashSet<String> {
        let mut names: HashSet<String> = self.initial_stock.keys().cloned().collect();
        for process in self.catalog.values() {
            names.extend(process.needs.keys().cloned());
            names.extend(process.results.keys().cloned());
        }
        names
    }
}

/// Load and parse a configuration file from disk.
pub fn load_config(path: &Path) -> KrpsimResult<ParsedConfig> {
    let text = fs::read_to_string(path)?;
    parse_config(&text)
}

/// Parse configuration text already read into memory.
pub fn parse_config(text: &str) -> KrpsimResult<ParsedConfig> {
    let mut stock_entries = Vec::new();
    let mut catalog = Catalog::new();
    let mut optimize_targets = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("optimize:") {
            let targets = parse_optimize(rest, line_no)?;
            optimize_targets = targets;
            continue;
        }

        let (name, rest) = split_identifier(line, line_no)?;
        if rest.starts_with('(') {
            let process = parse_process(&name, rest, line_no)?;
            catalog.insert(process);
        } else {
            let qty: i64 = rest.parse().map_err(|_| KrpsimError::BadFile {
                line: line_no,
                reason: format!("expected a non-negative integer quantity, got {rest:?}"),
            })?;
            if qty < 0 {
                return Err(KrpsimError::BadFile {
                    line: line_no,
                    reason: format!("stock quantity must be non-negative, got {qty}"),
                });
            }
            stock_entries.push((name, qty));
        }
    }

    if catalog.is_empty() {
        return Err(KrpsimError::NoProcesses);
    }

    Ok(ParsedConfig {
        initial_stock: Stock::from_entries(stock_entries),
        catalog,
        optimize_targets,
    })
}

/// Strip a `#`-introduced trailing comment. No escaping is supported:
/// `#` always starts a comment, matching the grammar's "`#` starts a
/// comment" rule.
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Split `name:rest` on the first colon, validating the identifier.
fn split_identifier(line: &str, line_no: usize) -> KrpsimResult<(String, &str)> {
    let colon = line.find(':').ok_or_else(|| KrpsimError::BadFile {
        line: line_no,
        reason: format!("expected a ':' separator in {line:?}"),
    })?;
    let (name, rest) = line.split_at(colon);
    let rest = &rest[1..]; // drop the colon itself
    validate_identifier(name, line_no)?;
    Ok((name.to_string(), rest))
}

fn validate_identifier(name: &str, line_no: usize) -> KrpsimResult<()> {
    let mut chars = name.chars();
    let ok = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(KrpsimError::BadFile {
            line: line_no,
            reason: format!("{name:?} is not a valid identifier"),
        })
    }
}

/// Consume a `(...)` group from the start of `s`, returning its inner
/// text and whatever follows the closing paren. No nested parens are
/// supported (the grammar has none).
fn take_group(s: &str, line_no: usize) -> KrpsimResult<(&str, &str)> {
    let s = s.strip_prefix('(').ok_or_else(|| KrpsimError::BadFile {
        line: line_no,
        reason: format!("expected '(' at start of {s:?}"),
    })?;
    let close = s.find(')').ok_or_else(|| KrpsimError::BadFile {
        line: line_no,
        reason: "unterminated '(' group".to_string(),
    })?;
    Ok((&s[..close], &s[close + 1..]))
}

/// Parse a `;`-separated list of `name:qty` pairs inside a group.
fn parse_pairs(inner: &str, line_no: usize) -> KrpsimResult<Stock> {
    if inner.is_empty() {
        return Ok(Stock::new());
    }
    let mut entries = Vec::new();
    for pair in inner.split(';') {
        let colon = pair.find(':').ok_or_else(|| KrpsimError::BadFile {
            line: line_no,
            reason: format!("expected 'name:qty' in {pair:?}"),
        })?;
        let (name, qty_str) = pair.split_at(colon);
        let qty_str = &qty_str[1..];
        validate_identifier(name, line_no)?;
        let qty: i64 = qty_str.parse().map_err(|_| KrpsimError::BadFile {
            line: line_no,
            reason: format!("expected an integer quantity in {pair:?}"),
        })?;
        if qty <= 0 {
            return Err(KrpsimError::BadFile {
                line: line_no,
                reason: format!("need/result quantity must be positive, got {qty} in {pair:?}"),
            });
        }
        entries.push((name.to_string(), qty));
    }
    Ok(Stock::from_entries(entries))
}

fn parse_process(name: &str, rest: &str, line_no: usize) -> KrpsimResult<Process> {
    let (needs_inner, rest) = take_group(rest, line_no)?;
    let rest = rest.strip_prefix(':').ok_or_else(|| KrpsimError::BadFile {
        line: line_no,
        reason: format!("expected ':' between need and result groups in {rest:?}"),
    })?;
    let (results_inner, rest) = take_group(rest, line_no)?;
    let delay_str = rest.strip_prefix(':').ok_or_else(|| KrpsimError::BadFile {
        line: line_no,
        reason: format!("expected ':delay' after result group in {rest:?}"),
    })?;
    let delay: u32 = delay_str.parse().map_err(|_| KrpsimError::BadFile {
        line: line_no,
        reason: format!("expected a non-negative integer delay, got {delay_str:?}"),
    })?;
    let needs = parse_pairs(needs_inner, line_no)?;
    let results = parse_pairs(results_inner, line_no)?;
    Ok(Process::new(name, needs, results, delay))
}

fn parse_optimize(rest: &str, line_no: usize) -> KrpsimResult<Vec<String>> {
    let (inner, trailing) = take_group(rest, line_no)?;
    if !trailing.trim().is_empty() {
        return Err(KrpsimError::BadFile {
            line: line_no,
            reason: format!("unexpected trailing text {trailing:?} after optimize group"),
        });
    }
    if inner.is_empty() {
        return Err(KrpsimError::BadFile {
            line: line_no,
            reason: "optimize group names no targets".to_string(),
        });
    }
    let mut targets = Vec::new();
    for target in inner.split(';') {
        validate_identifier(target, line_no)?;
        targets.push(target.to_string());
    }
    Ok(targets)
}
