//! Recalculation of formula cells.
//!
//! Formulas are evaluated when entered. Recalculation re-evaluates the
//! recorded formula sources in dependency order so each formula reads
//! up-to-date results. Formulas on a dependency cycle store `#CIRCULAR`.

use super::Document;
use cellgrid_engine::engine::{
    CIRCULAR_SENTINEL, CellRef, DependencyMap, detect_cycle, extract_dependencies,
};
use std::collections::{HashMap, HashSet, VecDeque};

impl Document {
    /// Re-evaluate every formula cell. Returns the number of cells written.
    pub fn recalculate(&mut self) -> usize {
        let deps = self.dependency_map();
        let targets: HashSet<CellRef> = self.formulas.keys().copied().collect();
        let written = self.recalculate_cells(&deps, &targets);
        log::debug!("recalculated {} formula cells", written);
        written
    }

    /// Re-evaluate the formulas that read `changed` (transitively), plus any
    /// changed cell that is itself a formula.
    pub(crate) fn recalc_dependents(&mut self, changed: &[CellRef]) -> usize {
        let deps = self.dependency_map();

        let mut readers: HashMap<CellRef, Vec<CellRef>> = HashMap::new();
        for (cell, reads) in &deps {
            for dep in reads {
                readers.entry(*dep).or_default().push(*cell);
            }
        }

        let mut targets: HashSet<CellRef> = HashSet::new();
        let mut queue: VecDeque<CellRef> = changed.iter().copied().collect();
        for cell in changed {
            if self.formulas.contains_key(cell) {
                targets.insert(*cell);
            }
        }
        while let Some(cell) = queue.pop_front() {
            for reader in readers.get(&cell).into_iter().flatten() {
                if targets.insert(*reader) {
                    queue.push_back(*reader);
                }
            }
        }

        self.recalculate_cells(&deps, &targets)
    }

    fn dependency_map(&self) -> DependencyMap {
        self.formulas
            .iter()
            .map(|(cell, formula)| (*cell, extract_dependencies(formula)))
            .collect()
    }

    fn recalculate_cells(&mut self, deps: &DependencyMap, targets: &HashSet<CellRef>) -> usize {
        let mut sorted: Vec<CellRef> = targets.iter().copied().collect();
        sorted.sort();

        let mut cyclic = HashSet::new();
        for cell in &sorted {
            if let Some(path) = detect_cycle(cell, deps) {
                let path: Vec<String> = path.iter().map(CellRef::to_string).collect();
                log::warn!("circular reference: {}", path.join(" -> "));
                cyclic.insert(*cell);
            }
        }

        // Cycle members first, so formulas reading them see the sentinel.
        for cell in sorted.iter().filter(|c| cyclic.contains(*c)) {
            self.grid
                .set(*cell, CIRCULAR_SENTINEL, self.config.initial_cols);
        }

        let order = evaluation_order(&sorted, deps, &cyclic);
        for cell in &order {
            if let Some(formula) = self.formulas.get(cell).cloned() {
                self.evaluate_formula_cell(*cell, &formula);
            }
        }

        if !sorted.is_empty() {
            self.modified = true;
        }
        cyclic.len() + order.len()
    }
}

/// Topological order of the acyclic targets: every formula comes after the
/// formulas it reads. Ties are broken row-major.
fn evaluation_order(
    sorted: &[CellRef],
    deps: &DependencyMap,
    cyclic: &HashSet<CellRef>,
) -> Vec<CellRef> {
    let pending: HashSet<CellRef> = sorted
        .iter()
        .copied()
        .filter(|c| !cyclic.contains(c))
        .collect();

    let mut waiting_on: HashMap<CellRef, usize> = HashMap::new();
    let mut readers: HashMap<CellRef, Vec<CellRef>> = HashMap::new();
    for cell in sorted.iter().filter(|c| pending.contains(*c)) {
        let reads: HashSet<&CellRef> = deps
            .get(cell)
            .into_iter()
            .flatten()
            .filter(|d| pending.contains(*d))
            .collect();
        waiting_on.insert(*cell, reads.len());
        for dep in reads {
            readers.entry(*dep).or_default().push(*cell);
        }
    }

    let mut ready: VecDeque<CellRef> = sorted
        .iter()
        .copied()
        .filter(|c| waiting_on.get(c) == Some(&0))
        .collect();
    let mut order = Vec::with_capacity(pending.len());
    while let Some(cell) = ready.pop_front() {
        order.push(cell);
        for reader in readers.get(&cell).into_iter().flatten() {
            if let Some(count) = waiting_on.get_mut(reader) {
                *count -= 1;
                if *count == 0 {
                    ready.push_back(*reader);
                }
            }
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use crate::config::{Config, RecalcMode};
    use crate::document::Document;
    use cellgrid_engine::engine::CellRef;

    fn cell(name: &str) -> CellRef {
        CellRef::parse(name).unwrap()
    }

    fn automatic_doc() -> Document {
        Document::with_config(Config {
            initial_rows: 5,
            initial_cols: 5,
            recalc: RecalcMode::Automatic,
            ..Config::default()
        })
    }

    #[test]
    fn test_recalculate_refreshes_stale_results() {
        let mut doc = Document::new();
        doc.set_cell_from_input(cell("A1"), "1");
        doc.set_cell_from_input(cell("B1"), "=A1");
        doc.set_cell_from_input(cell("C1"), "=SUM(A1:B1)");
        doc.set_cell_from_input(cell("A1"), "10");
        assert_eq!(doc.display_value(cell("C1")), "2");

        assert_eq!(doc.recalculate(), 2);
        assert_eq!(doc.display_value(cell("B1")), "10");
        assert_eq!(doc.display_value(cell("C1")), "20");
    }

    #[test]
    fn test_recalculate_orders_by_dependency_not_position() {
        let mut doc = Document::new();
        doc.set_cell_from_input(cell("A3"), "5");
        // A1 reads A2, which sits below it.
        doc.set_cell_from_input(cell("A1"), "=A2");
        doc.set_cell_from_input(cell("A2"), "=A3");
        assert_eq!(doc.display_value(cell("A1")), "");

        doc.recalculate();
        assert_eq!(doc.display_value(cell("A2")), "5");
        assert_eq!(doc.display_value(cell("A1")), "5");
    }

    #[test]
    fn test_recalculate_marks_cycles() {
        let mut doc = Document::new();
        doc.set_cell_from_input(cell("A1"), "=B1");
        doc.set_cell_from_input(cell("B1"), "=A1");
        doc.set_cell_from_input(cell("C1"), "=COUNT(A1:B1)");
        doc.set_cell_from_input(cell("D1"), "=SUM(D1:D2)");

        doc.recalculate();
        assert_eq!(doc.display_value(cell("A1")), "#CIRCULAR");
        assert_eq!(doc.display_value(cell("B1")), "#CIRCULAR");
        assert_eq!(doc.display_value(cell("D1")), "#CIRCULAR");
        // Readers of a cycle still evaluate, against the sentinel text.
        assert_eq!(doc.display_value(cell("C1")), "2");
        // Sources survive so the cycle can be fixed.
        assert_eq!(doc.editing_value(cell("A1")), "=B1");
    }

    #[test]
    fn test_automatic_mode_updates_dependents() {
        let mut doc = automatic_doc();
        doc.set_cell_from_input(cell("A1"), "1");
        doc.set_cell_from_input(cell("A2"), "=A1");
        doc.set_cell_from_input(cell("A3"), "=SUM(A1:A2)");
        doc.set_cell_from_input(cell("A1"), "4");
        assert_eq!(doc.display_value(cell("A2")), "4");
        assert_eq!(doc.display_value(cell("A3")), "8");
    }

    #[test]
    fn test_automatic_mode_reports_cycle_on_entry() {
        let mut doc = automatic_doc();
        doc.set_cell_from_input(cell("A1"), "=B1");
        let update = doc.set_cell_from_input(cell("B1"), "=A1");
        assert_eq!(update.value, "#CIRCULAR");
        assert_eq!(doc.display_value(cell("A1")), "#CIRCULAR");
    }

    #[test]
    fn test_automatic_mode_clear_updates_dependents() {
        let mut doc = automatic_doc();
        doc.set_cell_from_input(cell("A1"), "3");
        doc.set_cell_from_input(cell("B1"), "=SUM(A1:A2)");
        assert_eq!(doc.display_value(cell("B1")), "3");
        doc.clear_range(cell("A1"), cell("A1"));
        assert_eq!(doc.display_value(cell("B1")), "0");
    }

    #[test]
    fn test_recalculate_empty_document() {
        let mut doc = Document::new();
        assert_eq!(doc.recalculate(), 0);
        assert!(!doc.modified);
    }
}
