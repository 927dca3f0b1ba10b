//! cellgraph_engine - Formula parsing and evaluation for cellgraph sheets.

pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;
    use pretty_assertions::assert_eq;

    fn eval(expr: &str, resolve: &dyn Fn(CellRef) -> FormulaValue) -> FormulaValue {
        Formula::parse(expr).unwrap().evaluate(resolve)
    }

    #[test]
    fn test_arithmetic() {
        let zero = |_: CellRef| -> FormulaValue { Ok(0.0) };
        assert_eq!(eval("5 + 3", &zero), Ok(8.0));
        assert_eq!(eval("2 * (3 + 4)", &zero), Ok(14.0));
        assert_eq!(eval("7 / 2", &zero), Ok(3.5));
        assert_eq!(eval("-2 - -2", &zero), Ok(0.0));
    }

    #[test]
    fn test_division_by_zero() {
        let zero = |_: CellRef| -> FormulaValue { Ok(0.0) };
        assert_eq!(
            eval("1 / 0", &zero),
            Err(FormulaError::new(Category::Div0))
        );
        assert_eq!(
            eval("1 / A1", &zero),
            Err(FormulaError::new(Category::Div0))
        );
    }

    #[test]
    fn test_overflow_is_arithmetic_error() {
        let zero = |_: CellRef| -> FormulaValue { Ok(0.0) };
        assert_eq!(
            eval("1e308 * 10", &zero),
            Err(FormulaError::new(Category::Div0))
        );
    }

    #[test]
    fn test_left_error_wins() {
        let resolve = |cell: CellRef| -> FormulaValue {
            if cell.col == 0 {
                Err(FormulaError::new(Category::Value))
            } else {
                Err(FormulaError::new(Category::Ref))
            }
        };
        assert_eq!(
            eval("A1 + B1", &resolve),
            Err(FormulaError::new(Category::Value))
        );
        assert_eq!(
            eval("B1 + A1", &resolve),
            Err(FormulaError::new(Category::Ref))
        );
    }

    #[test]
    fn test_canonical_text_reparses_to_same_tree() {
        for input in ["(A1+B2)*-C3", "1-(2-3)/4", "A1/(B1*C1)", "+-1"] {
            let first = Formula::parse(input).unwrap();
            let second = Formula::parse(&first.expression()).unwrap();
            assert_eq!(first, second, "{}", input);
        }
    }
}
