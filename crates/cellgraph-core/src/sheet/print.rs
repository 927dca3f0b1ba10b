use std::fmt;

use super::{Sheet, Size};
use crate::cell::Cell;
use cellgraph_engine::engine::CellRef;

impl Sheet {
    /// Smallest rectangle, anchored at A1, containing every cell with
    /// non-empty text. Recomputed from a full scan on each call.
    pub fn printable_size(&self) -> Size {
        let mut size = Size::default();
        for (pos, cell) in self.cells() {
            if !cell.text().is_empty() {
                size.rows = size.rows.max(pos.row + 1);
                size.cols = size.cols.max(pos.col + 1);
            }
        }
        size
    }

    /// Write cell values as tab-separated lines covering [`printable_size`](Self::printable_size).
    pub fn print_values(&self, out: &mut impl fmt::Write) -> fmt::Result {
        self.print_with(out, |cell| cell.value(self).to_string())
    }

    /// Write raw cell texts as tab-separated lines covering [`printable_size`](Self::printable_size).
    pub fn print_texts(&self, out: &mut impl fmt::Write) -> fmt::Result {
        self.print_with(out, Cell::text)
    }

    fn print_with(
        &self,
        out: &mut impl fmt::Write,
        render: impl Fn(&Cell) -> String,
    ) -> fmt::Result {
        let size = self.printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    out.write_char('\t')?;
                }
                if let Some(cell) = self.slot(CellRef::new(row, col)) {
                    out.write_str(&render(cell))?;
                }
            }
            out.write_char('\n')?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::sheet::{Sheet, Size};
    use cellgraph_engine::engine::CellRef;
    use pretty_assertions::assert_eq;

    fn a1(name: &str) -> CellRef {
        CellRef::parse_a1(name).unwrap()
    }

    fn values(sheet: &Sheet) -> String {
        let mut out = String::new();
        sheet.print_values(&mut out).unwrap();
        out
    }

    fn texts(sheet: &Sheet) -> String {
        let mut out = String::new();
        sheet.print_texts(&mut out).unwrap();
        out
    }

    #[test]
    fn test_empty_sheet() {
        let sheet = Sheet::new();
        assert_eq!(sheet.printable_size(), Size { rows: 0, cols: 0 });
        assert_eq!(values(&sheet), "");
        assert_eq!(texts(&sheet), "");
    }

    #[test]
    fn test_printable_size_ignores_empty_cells() {
        let mut sheet = Sheet::new();
        // D5 is auto-created but empty; it does not count.
        sheet.set_cell(a1("B2"), "=D5").unwrap();
        assert_eq!(sheet.printable_size(), Size { rows: 2, cols: 2 });
        assert!(sheet.cell(a1("D5")).unwrap().is_some());

        sheet.set_cell(a1("C1"), "").unwrap();
        assert_eq!(sheet.printable_size(), Size { rows: 2, cols: 2 });
    }

    #[test]
    fn test_printable_size_after_clear() {
        let mut sheet = Sheet::new();
        sheet.set_cell(a1("A1"), "x").unwrap();
        assert_eq!(sheet.printable_size(), Size { rows: 1, cols: 1 });
        sheet.clear_cell(a1("A1")).unwrap();
        assert_eq!(sheet.printable_size(), Size { rows: 0, cols: 0 });
    }

    #[test]
    fn test_print_grid() {
        let mut sheet = Sheet::new();
        sheet.set_cell(a1("A1"), "5").unwrap();
        sheet.set_cell(a1("B1"), "=A1*2").unwrap();
        sheet.set_cell(a1("C2"), "'=text").unwrap();
        sheet.set_cell(a1("A3"), "=1/0").unwrap();

        assert_eq!(texts(&sheet), "5\t=A1*2\t\n\t\t'=text\n=1/0\t\t\n");
        assert_eq!(values(&sheet), "5\t10\t\n\t\t=text\n#DIV/0!\t\t\n");
    }

    #[test]
    fn test_print_shows_empty_referenced_cells_as_zero() {
        let mut sheet = Sheet::new();
        sheet.set_cell(a1("B1"), "=A1+1").unwrap();
        assert_eq!(values(&sheet), "0\t1\n");
        assert_eq!(texts(&sheet), "\t=A1+1\n");
    }
}
