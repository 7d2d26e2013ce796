//! Circular dependency detection for formula cells.
//!
//! A formula that reads itself, directly (`A1: =SUM(A1:A3)`) or through other
//! formulas (A1 reads B1, B1 reads A1), has no value. Recalculation uses
//! this depth-first search to find such cells and mark them instead of
//! evaluating them.

use std::collections::{HashMap, HashSet};

use super::CellRef;

/// Formula cell -> cells its formula reads.
pub type DependencyMap = HashMap<CellRef, Vec<CellRef>>;

/// Detect a dependency cycle passing through `start`.
///
/// Returns the cycle as a path that begins and ends with `start`, or None if
/// `start` cannot reach itself. Cycles elsewhere in the map that `start` only
/// feeds into are not reported for it.
pub fn detect_cycle(start: &CellRef, deps: &DependencyMap) -> Option<Vec<CellRef>> {
    let mut visited = HashSet::new();
    let mut path = vec![*start];

    if detect_cycle_dfs(start, start, deps, &mut visited, &mut path) {
        Some(path)
    } else {
        None
    }
}

fn detect_cycle_dfs(
    current: &CellRef,
    target: &CellRef,
    deps: &DependencyMap,
    visited: &mut HashSet<CellRef>,
    path: &mut Vec<CellRef>,
) -> bool {
    let Some(next) = deps.get(current) else {
        return false;
    };

    for dep in next {
        if dep == target {
            path.push(*dep);
            return true;
        }
        if !visited.insert(*dep) {
            continue;
        }
        path.push(*dep);
        if detect_cycle_dfs(dep, target, deps, visited, path) {
            return true;
        }
        path.pop();
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(name: &str) -> CellRef {
        CellRef::parse(name).unwrap()
    }

    #[test]
    fn test_self_reference() {
        let deps = DependencyMap::from([(cell("A1"), vec![cell("A1"), cell("A2")])]);
        assert_eq!(detect_cycle(&cell("A1"), &deps), Some(vec![cell("A1"), cell("A1")]));
    }

    #[test]
    fn test_indirect_cycle() {
        let deps = DependencyMap::from([
            (cell("A1"), vec![cell("B1")]),
            (cell("B1"), vec![cell("C1")]),
            (cell("C1"), vec![cell("A1")]),
        ]);
        assert_eq!(
            detect_cycle(&cell("B1"), &deps),
            Some(vec![cell("B1"), cell("C1"), cell("A1"), cell("B1")])
        );
    }

    #[test]
    fn test_feeding_into_a_cycle_is_not_a_cycle() {
        let deps = DependencyMap::from([
            (cell("A1"), vec![cell("B1")]),
            (cell("B1"), vec![cell("B1")]),
        ]);
        assert_eq!(detect_cycle(&cell("A1"), &deps), None);
        assert!(detect_cycle(&cell("B1"), &deps).is_some());
    }

    #[test]
    fn test_diamond_is_acyclic() {
        let deps = DependencyMap::from([
            (cell("A1"), vec![cell("B1"), cell("C1")]),
            (cell("B1"), vec![cell("D1")]),
            (cell("C1"), vec![cell("D1")]),
        ]);
        assert_eq!(detect_cycle(&cell("A1"), &deps), None);
    }
}
