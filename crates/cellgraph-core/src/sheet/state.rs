use crate::cell::Cell;
use crate::error::{Result, SheetError};
use cellgraph_engine::engine::CellRef;

/// Height and width of a rectangular region of the sheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub rows: usize,
    pub cols: usize,
}

/// An in-memory sheet: a growable grid of optional cells.
///
/// The grid is kept rectangular; every row has the same number of slots. A
/// slot is `None` until its address is first written or referenced by a
/// formula.
#[derive(Debug, Default)]
pub struct Sheet {
    pub(crate) rows: Vec<Vec<Option<Cell>>>,
    pub(crate) width: usize,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocated grid extent. Grows with writes, never shrinks.
    pub fn extent(&self) -> Size {
        Size {
            rows: self.rows.len(),
            cols: self.width,
        }
    }

    /// The cell at `pos`, or `None` if that slot was never populated.
    pub fn cell(&self, pos: CellRef) -> Result<Option<&Cell>> {
        check_position(pos)?;
        Ok(self.slot(pos))
    }

    /// Mutable access to the cell at `pos`.
    pub fn cell_mut(&mut self, pos: CellRef) -> Result<Option<&mut Cell>> {
        check_position(pos)?;
        Ok(self.slot_mut(pos))
    }

    pub(crate) fn slot(&self, pos: CellRef) -> Option<&Cell> {
        self.rows.get(pos.row)?.get(pos.col)?.as_ref()
    }

    pub(crate) fn slot_mut(&mut self, pos: CellRef) -> Option<&mut Cell> {
        self.rows.get_mut(pos.row)?.get_mut(pos.col)?.as_mut()
    }

    /// Grow the grid so that `pos` has a slot. Existing cells keep their place.
    fn grow_to(&mut self, pos: CellRef) {
        let rows = self.rows.len().max(pos.row + 1);
        let width = self.width.max(pos.col + 1);
        if rows == self.rows.len() && width == self.width {
            return;
        }
        log::trace!(
            "growing grid from {}x{} to {}x{}",
            self.rows.len(),
            self.width,
            rows,
            width
        );
        self.rows.resize_with(rows, Vec::new);
        for row in &mut self.rows {
            row.resize_with(width, || None);
        }
        self.width = width;
    }

    /// The cell at `pos`, creating an Empty one (and growing the grid) if absent.
    /// `pos` must already be validated.
    pub(crate) fn vivify(&mut self, pos: CellRef) -> &mut Cell {
        self.grow_to(pos);
        self.rows[pos.row][pos.col].get_or_insert_with(|| {
            log::trace!("creating cell {}", pos);
            Cell::new_empty()
        })
    }

    /// Remove the cell at `pos` from the grid, returning it.
    pub(crate) fn take(&mut self, pos: CellRef) -> Option<Cell> {
        self.rows.get_mut(pos.row)?.get_mut(pos.col)?.take()
    }

    /// Iterate over every present cell with its address, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (CellRef, &Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, slots)| {
            slots
                .iter()
                .enumerate()
                .filter_map(move |(col, slot)| slot.as_ref().map(|cell| (CellRef::new(row, col), cell)))
        })
    }
}

pub(crate) fn check_position(pos: CellRef) -> Result<()> {
    if pos.is_valid() {
        Ok(())
    } else {
        Err(SheetError::InvalidPosition(pos))
    }
}
