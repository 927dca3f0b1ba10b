//! Dependency graph checks and cache invalidation.
//!
//! When a formula is entered we must verify it doesn't create a cycle
//! (e.g., A1 references B1, B1 references C1, C1 references A1). The check
//! runs against the prospective graph, before any edge is rewired.

use std::collections::HashSet;

use super::Sheet;
use cellgraph_engine::engine::CellRef;

impl Sheet {
    /// Check whether giving `target` the dependency set `refs` would close a cycle.
    ///
    /// `target`'s current edges are ignored. Returns the cycle path, starting and
    /// ending at `target`, if one is found.
    pub(crate) fn find_cycle(&self, target: CellRef, refs: &[CellRef]) -> Option<Vec<CellRef>> {
        // Shared across sibling searches: a cell fully explored once is acyclic.
        let mut visited = HashSet::new();
        let mut on_stack = HashSet::from([target]);
        let mut path = vec![target];

        for &start in refs {
            if self.find_cycle_dfs(start, &mut visited, &mut on_stack, &mut path) {
                return Some(path);
            }
        }
        None
    }

    /// Depth-first search from `start` along `depends_on` edges.
    ///
    /// Uses an explicit stack of frames, each pairing a cell on the current
    /// path with its precedents still to explore.
    fn find_cycle_dfs(
        &self,
        start: CellRef,
        visited: &mut HashSet<CellRef>,
        on_stack: &mut HashSet<CellRef>,
        path: &mut Vec<CellRef>,
    ) -> bool {
        let mut frames: Vec<Vec<CellRef>> = Vec::new();
        let mut next = Some(start);

        loop {
            if let Some(current) = next.take() {
                if on_stack.contains(&current) {
                    path.push(current);
                    return true;
                }
                if visited.insert(current)
                    && let Some(cell) = self.slot(current)
                {
                    on_stack.insert(current);
                    path.push(current);
                    // Reversed so precedents are popped in ascending order.
                    frames.push(cell.depends_on().rev().collect());
                }
            }

            let Some(pending) = frames.last_mut() else {
                return false;
            };
            match pending.pop() {
                Some(dep) => next = Some(dep),
                None => {
                    frames.pop();
                    if let Some(done) = path.pop() {
                        on_stack.remove(&done);
                    }
                }
            }
        }
    }

    /// Clear cached values of formulas downstream of `changed`.
    ///
    /// A dependent without a cached value is not walked through: whatever
    /// lies beyond it is left as is.
    pub(crate) fn invalidate_dependents(&self, changed: CellRef) {
        let mut to_process = vec![changed];

        while let Some(cell_ref) = to_process.pop() {
            let Some(cell) = self.slot(cell_ref) else {
                continue;
            };
            for dep in cell.dependents() {
                let Some(dependent) = self.slot(dep) else {
                    continue;
                };
                if !dependent.content.has_cache() {
                    continue;
                }
                log::trace!("invalidating cached value of {}", dep);
                dependent.content.invalidate_cache();
                to_process.push(dep);
            }
        }
    }
}
