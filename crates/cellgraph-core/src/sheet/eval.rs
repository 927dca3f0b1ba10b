use std::collections::HashMap;

use super::Sheet;
use super::state::check_position;
use crate::error::Result;
use cellgraph_engine::engine::{Category, CellRef, FormulaError, FormulaValue, Value};

impl Sheet {
    /// Get the value of a cell, or `None` if no cell exists at `pos`.
    pub fn value(&self, pos: CellRef) -> Result<Option<Value>> {
        Ok(self.cell(pos)?.map(|_| self.evaluate(pos)))
    }

    /// Get the raw text of a cell, or `None` if no cell exists at `pos`.
    pub fn text(&self, pos: CellRef) -> Result<Option<String>> {
        check_position(pos)?;
        Ok(self.slot(pos).map(|cell| cell.text()))
    }

    /// Compute the value of the cell at `pos`.
    ///
    /// Precedents are evaluated first, in dependency order, from an explicit
    /// stack. Each formula then reads its references from the values computed
    /// in this pass, so call depth does not grow with the length of a chain.
    pub(crate) fn evaluate(&self, pos: CellRef) -> Value {
        let mut values: HashMap<CellRef, Value> = HashMap::new();
        let mut stack = vec![(pos, false)];

        while let Some((current, ready)) = stack.pop() {
            if values.contains_key(&current) {
                continue;
            }
            let Some(cell) = self.slot(current) else {
                continue;
            };
            if !ready {
                stack.push((current, true));
                stack.extend(
                    cell.depends_on()
                        .filter(|dep| !values.contains_key(dep))
                        .map(|dep| (dep, false)),
                );
                continue;
            }
            let value = cell.content.value(&|dep| match values.get(&dep) {
                Some(value) => to_number(value),
                None => self.resolve(dep),
            });
            values.insert(current, value);
        }

        // An absent cell reads as Empty.
        values.remove(&pos).unwrap_or(Value::Number(0.0))
    }

    /// Resolve a cell reference to a number while evaluating a formula.
    ///
    /// - out-of-bounds reference -> `#REF!`
    /// - no cell -> 0
    /// - text must parse as a number, otherwise `#VALUE!`
    /// - an error value is passed through unchanged
    pub(crate) fn resolve(&self, pos: CellRef) -> FormulaValue {
        if !pos.is_valid() {
            return Err(FormulaError::new(Category::Ref));
        }
        if self.slot(pos).is_none() {
            return Ok(0.0);
        }
        to_number(&self.evaluate(pos))
    }
}

fn to_number(value: &Value) -> FormulaValue {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Text(text) => parse_number(text),
        Value::Error(e) => Err(*e),
    }
}

/// Leading whitespace is skipped; anything else must be part of the number.
fn parse_number(text: &str) -> FormulaValue {
    match text.trim_start().parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(FormulaError::new(Category::Value)),
    }
}

#[cfg(test)]
mod tests {
    use crate::error::SheetError;
    use crate::sheet::Sheet;
    use cellgraph_engine::engine::{Category, CellRef, FormulaError, MAX_ROWS, Value};

    fn a1(name: &str) -> CellRef {
        CellRef::parse_a1(name).unwrap()
    }

    fn error(category: Category) -> Option<Value> {
        Some(Value::Error(FormulaError::new(category)))
    }

    #[test]
    fn test_absent_cell_reads_as_zero() {
        let sheet = Sheet::new();
        assert_eq!(sheet.resolve(a1("Q7")), Ok(0.0));
        assert_eq!(sheet.value(a1("Q7")).unwrap(), None);
        assert_eq!(sheet.text(a1("Q7")).unwrap(), None);
    }

    #[test]
    fn test_numeric_text_is_a_number() {
        let mut sheet = Sheet::new();
        sheet.set_cell(a1("A1"), "2.5").unwrap();
        sheet.set_cell(a1("A2"), "=A1*2").unwrap();
        assert_eq!(sheet.value(a1("A1")).unwrap(), Some(Value::Text("2.5".into())));
        assert_eq!(sheet.value(a1("A2")).unwrap(), Some(Value::Number(5.0)));
    }

    #[test]
    fn test_non_numeric_text_is_value_error() {
        let mut sheet = Sheet::new();
        sheet.set_cell(a1("A1"), "apples").unwrap();
        sheet.set_cell(a1("A2"), "3 ").unwrap();
        sheet.set_cell(a1("A3"), "'").unwrap();
        sheet.set_cell(a1("B1"), "=A1+1").unwrap();
        sheet.set_cell(a1("B2"), "=A2+1").unwrap();
        sheet.set_cell(a1("B3"), "=A3+1").unwrap();
        assert_eq!(sheet.value(a1("B1")).unwrap(), error(Category::Value));
        assert_eq!(sheet.value(a1("B2")).unwrap(), error(Category::Value));
        assert_eq!(sheet.value(a1("B3")).unwrap(), error(Category::Value));
    }

    #[test]
    fn test_leading_whitespace_before_number_is_skipped() {
        let mut sheet = Sheet::new();
        sheet.set_cell(a1("A1"), " 3").unwrap();
        sheet.set_cell(a1("A2"), "\t-2.5").unwrap();
        sheet.set_cell(a1("B1"), "=A1+1").unwrap();
        sheet.set_cell(a1("B2"), "=A2*2").unwrap();
        assert_eq!(sheet.value(a1("B1")).unwrap(), Some(Value::Number(4.0)));
        assert_eq!(sheet.value(a1("B2")).unwrap(), Some(Value::Number(-5.0)));
    }

    #[test]
    fn test_long_chain_evaluates_without_deep_recursion() {
        let mut sheet = Sheet::new();
        let rows = MAX_ROWS;
        // A1 = A2+1, A2 = A3+1, ... with the leaf at the bottom row.
        for row in 0..rows - 1 {
            let next = CellRef::new(row + 1, 0);
            sheet.set_cell(CellRef::new(row, 0), &format!("={}+1", next)).unwrap();
        }
        let leaf = CellRef::new(rows - 1, 0);
        sheet.set_cell(leaf, "1").unwrap();

        assert_eq!(sheet.value(a1("A1")).unwrap(), Some(Value::Number(rows as f64)));
        // Reading fills the caches along the whole chain.
        assert!(sheet.cell(a1("A2")).unwrap().unwrap().content().has_cache());

        sheet.set_cell(leaf, "2").unwrap();
        assert_eq!(sheet.value(a1("A1")).unwrap(), Some(Value::Number(rows as f64 + 1.0)));

        // Closing the loop walks the full chain.
        assert!(matches!(
            sheet.set_cell(leaf, "=A1"),
            Err(SheetError::CircularDependency { .. })
        ));
    }

    #[test]
    fn test_escaped_number_is_still_numeric() {
        let mut sheet = Sheet::new();
        sheet.set_cell(a1("A1"), "'12").unwrap();
        sheet.set_cell(a1("B1"), "=A1").unwrap();
        assert_eq!(sheet.value(a1("A1")).unwrap(), Some(Value::Text("12".into())));
        assert_eq!(sheet.value(a1("B1")).unwrap(), Some(Value::Number(12.0)));
    }

    #[test]
    fn test_out_of_bounds_reference_is_ref_error() {
        let mut sheet = Sheet::new();
        sheet.set_cell(a1("A1"), "=XFE1+1").unwrap();
        assert_eq!(sheet.value(a1("A1")).unwrap(), error(Category::Ref));
        assert_eq!(sheet.text(a1("A1")).unwrap().as_deref(), Some("=#REF!+1"));
        assert!(sheet.cell(a1("A1")).unwrap().unwrap().referenced_cells().is_empty());
    }

    #[test]
    fn test_errors_propagate_downstream() {
        let mut sheet = Sheet::new();
        sheet.set_cell(a1("A1"), "=1/0").unwrap();
        sheet.set_cell(a1("B1"), "=A1+1").unwrap();
        sheet.set_cell(a1("C1"), "=B1*2").unwrap();
        assert_eq!(sheet.value(a1("C1")).unwrap(), error(Category::Div0));

        sheet.set_cell(a1("A1"), "word").unwrap();
        assert_eq!(sheet.value(a1("C1")).unwrap(), error(Category::Value));

        sheet.set_cell(a1("A1"), "4").unwrap();
        assert_eq!(sheet.value(a1("C1")).unwrap(), Some(Value::Number(10.0)));
    }
}
