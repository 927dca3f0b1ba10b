use super::Sheet;
use super::state::check_position;
use crate::cell::Content;
use crate::error::{Result, SheetError};
use cellgraph_engine::engine::CellRef;

impl Sheet {
    /// Set cell contents from input text.
    ///
    /// The edit is all-or-nothing: on a syntax error or a circular dependency
    /// the sheet is left exactly as it was.
    pub fn set_cell(&mut self, pos: CellRef, text: &str) -> Result<()> {
        check_position(pos)?;
        let content = Content::from_input(text)?;

        if let Some(path) = self.find_cycle(pos, content.referenced_cells()) {
            log::debug!("rejecting {:?} at {}: circular dependency", text, pos);
            return Err(SheetError::CircularDependency { cell: pos, path });
        }

        log::debug!("set {} to {:?}", pos, text);
        let refs = content.referenced_cells().to_vec();
        self.vivify(pos);
        self.rewire(pos, &refs);
        if let Some(cell) = self.slot_mut(pos) {
            cell.set_content(content);
        }
        self.invalidate_dependents(pos);
        Ok(())
    }

    /// Replace the outgoing edges of `pos` with `refs`, creating Empty cells
    /// for references that have none yet.
    fn rewire(&mut self, pos: CellRef, refs: &[CellRef]) {
        let old = self
            .slot_mut(pos)
            .map(|cell| std::mem::take(&mut cell.depends_on))
            .unwrap_or_default();
        for dep in old {
            if let Some(cell) = self.slot_mut(dep) {
                cell.dependents.remove(&pos);
            }
        }

        for &dep in refs {
            self.vivify(dep).dependents.insert(pos);
        }
        if let Some(cell) = self.slot_mut(pos) {
            cell.depends_on.extend(refs.iter().copied());
        }
    }

    /// Clear the specified cell.
    ///
    /// A cell other formulas still read keeps its place as an Empty cell;
    /// otherwise it is removed from the grid.
    pub fn clear_cell(&mut self, pos: CellRef) -> Result<()> {
        check_position(pos)?;
        let Some(cell) = self.slot_mut(pos) else {
            return Ok(());
        };

        if cell.is_referenced() {
            log::debug!("clearing {} in place (still referenced)", pos);
            cell.clear();
            self.invalidate_dependents(pos);
            return Ok(());
        }

        log::debug!("removing {}", pos);
        if let Some(cell) = self.take(pos) {
            for dep in cell.depends_on {
                if let Some(precedent) = self.slot_mut(dep) {
                    precedent.dependents.remove(&pos);
                }
            }
        }
        Ok(())
    }
}
