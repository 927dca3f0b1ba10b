use super::ast::Expr;
use super::cell_ref::CellRef;
use super::parse::{ParseError, parse_expression};
use super::value::FormulaValue;

/// A parsed formula, ready to be evaluated against a sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    ast: Expr,
}

impl Formula {
    /// Parse expression text (without the leading `=`).
    pub fn parse(expression: &str) -> Result<Formula, ParseError> {
        let ast = parse_expression(expression)?;
        log::trace!("parsed formula {:?} as {}", expression, ast);
        Ok(Formula { ast })
    }

    /// Evaluate the formula. Every cell reference is handed to `resolve`,
    /// including out-of-bounds ones.
    pub fn evaluate(&self, resolve: &dyn Fn(CellRef) -> FormulaValue) -> FormulaValue {
        self.ast.evaluate(resolve)
    }

    /// Canonical expression text, without the leading `=`.
    pub fn expression(&self) -> String {
        self.ast.to_string()
    }

    /// In-bounds cells referenced by the formula, deduplicated and sorted.
    pub fn referenced_cells(&self) -> Vec<CellRef> {
        let mut refs = Vec::new();
        self.ast.collect_refs(&mut refs);
        refs.sort();
        refs.dedup();
        refs
    }

    pub fn ast(&self) -> &Expr {
        &self.ast
    }
}
