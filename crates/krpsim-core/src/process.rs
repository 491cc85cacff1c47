//! Process catalog: a `Process` is `(name, needs, results, delay)`;
//! a `Catalog` is an immutable, name-indexed collection of processes.

use std::collections::HashMap;

use crate::stock::Stock;

/// An atomic activity consuming `needs` and, `delay` cycles after it
/// starts, producing `results`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub name: String,
    pub needs: Stock,
    pub results: Stock,
    pub delay: u32,
}

impl Process {
    pub fn new(
        name: impl Into<String>,
        needs: Stock,
        results: Stock,
        delay: u32,
    ) -> Self {
        Process {
            name: name.into(),
            needs,
            results,
            delay,
        }
    }

    /// `needs <= stock` componentwise.
    pub fn is_feasible(&self, stock: &Stock) -> bool {
        stock.covers(&self.needs)
    }
}

/// A read-only, name-indexed set of processes, shared by the planner,
/// scheduler, and verifier.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    processes: HashMap<String, Process>,
    /// Insertion order, preserved for any pass that wants "catalog
    /// order" (e.g. pickStarts Pass D's "iterate the catalog").
    order: Vec<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    pub fn from_processes<I: IntoIterator<Item = Process>>(processes: I) -> Self {
        let mut catalog = Catalog::new();
        for process in processes {
            catalog.insert(process);
        }
        catalog
    }

    /// Insert a process, overwriting any previous entry of the same name
    /// (and its place in catalog order).
    pub fn insert(&mut self, process: Process) {
        if !self.processes.contains_key(&process.name) {
            self.order.push(process.name.clone());
        }
        self.processes.insert(process.name.clone(), process);
    }

    pub fn get(&self, name: &str) -> Option<&Process> {
        self.processes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.processes.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// Processes in the order they were declared in the configuration file.
    pub fn in_declaration_order(&self) -> impl Iterator<Item = &Process> {
        self.order.iter().filter_map(move |name| self.processes.get(name))
    }

    /// All processes, in no particular order.
    pub fn values(&self) -> impl Iterator<Item = &Process> {
        self.processes.values()
    }

    /// Processes that list `resource` among their results.
    pub fn producers_of<'a>(&'a self, resource: &'a str) -> impl Iterator<Item = &'a Process> {
        self.in_declaration_order()
            .filter(move |p| p.results.contains(resource))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn needs(entries: &[(&str, i64)]) -> Stock {
        Stock::from_entries(entries.iter().map(|(n, q)| (n.to_string(), *q)))
    }

    #[test]
    fn feasibility_is_componentwise() {
        let p = Process::new("p", needs(&[("a", 2)]), needs(&[("b", 1)]), 5);
        assert!(p.is_feasible(&needs(&[("a", 2)])));
        assert!(!p.is_feasible(&needs(&[("a", 1)])));
    }

    #[test]
    fn catalog_preserves_declaration_order() {
        let mut catalog = Catalog::new();
        catalog.insert(Process::new("z", Stock::new(), Stock::new(), 1));
        catalog.insert(Process::new("a", Stock::new(), Stock::new(), 1));
        let names: Vec<_> = catalog
            .in_declaration_order()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["z", "a"]);
    }

    #[test]
    fn producers_of_filters_by_result() {
        let mut catalog = Catalog::new();
        catalog.insert(Process::new("make_b", Stock::new(), needs(&[("b", 1)]), 1));
        catalog.insert(Process::new("make_c", Stock::new(), needs(&[("c", 1)]), 1));
        let names: Vec<_> = catalog.producers_of("b").map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["make_b"]);
    }

    #[test]
    fn empty_catalog_has_no_producers() {
        let catalog = Catalog::new();
        assert!(catalog.is_empty());
        assert_eq!(catalog.producers_of("anything").count(), 0);
    }
}
