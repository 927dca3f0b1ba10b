//! Cell data structures for the sheet.
//!
//! - [`Content`] - What a cell holds (empty, text, or formula)
//! - [`Cell`] - A dependency-graph node: content plus both adjacency sets
//!
//! Adjacency is stored as addresses into the owning [`Sheet`](crate::Sheet),
//! never as references, so cells can be replaced or removed freely.

mod content;

use std::collections::BTreeSet;

use cellgraph_engine::engine::{CellRef, Value};

pub use content::{Content, ESCAPE_SIGN, FORMULA_SIGN, FormulaContent};

use crate::sheet::Sheet;

/// A cell in the sheet grid.
#[derive(Clone, Debug)]
pub struct Cell {
    pub(crate) content: Content,
    /// Cells this cell's formula reads.
    pub(crate) depends_on: BTreeSet<CellRef>,
    /// Cells whose formulas read this cell.
    pub(crate) dependents: BTreeSet<CellRef>,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell {
            content: Content::Empty,
            depends_on: BTreeSet::new(),
            dependents: BTreeSet::new(),
        }
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Degrade the content to Empty. Dependency edges are graph structure and
    /// are left untouched.
    pub fn clear(&mut self) {
        self.content = Content::Empty;
    }

    pub(crate) fn set_content(&mut self, content: Content) {
        self.content = content;
    }

    pub fn text(&self) -> String {
        self.content.text()
    }

    /// Compute the displayable value, resolving references against `sheet`.
    pub fn value(&self, sheet: &Sheet) -> Value {
        self.content.value(&|pos| sheet.resolve(pos))
    }

    /// Cells referenced by this cell's formula, sorted and deduplicated.
    pub fn referenced_cells(&self) -> Vec<CellRef> {
        self.content.referenced_cells().to_vec()
    }

    /// Whether any other cell's formula reads this cell.
    pub fn is_referenced(&self) -> bool {
        !self.dependents.is_empty()
    }

    pub fn depends_on(&self) -> impl DoubleEndedIterator<Item = CellRef> + '_ {
        self.depends_on.iter().copied()
    }

    pub fn dependents(&self) -> impl DoubleEndedIterator<Item = CellRef> + '_ {
        self.dependents.iter().copied()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new_empty()
    }
}
