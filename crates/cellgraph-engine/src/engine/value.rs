//! Cell values and computational error categories.
//!
//! Errors produced while evaluating a formula are data: they are stored as
//! [`Value::Error`] and flow to downstream formulas like any other value.

use std::fmt;

use super::format::format_number;

/// Category of a computational error.
///
/// New categories may be added as the evaluator grows.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
#[non_exhaustive]
pub enum Category {
    /// A referenced cell lies outside the sheet bounds.
    Ref,
    /// A referenced cell's text cannot be interpreted as a number.
    Value,
    /// Division by zero or any other non-finite arithmetic result.
    Div0,
}

/// A computational error carried as a value.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct FormulaError {
    category: Category,
}

impl FormulaError {
    pub fn new(category: Category) -> FormulaError {
        FormulaError { category }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Spreadsheet-style marker for this error (e.g. `#REF!`).
    pub fn as_str(&self) -> &'static str {
        match self.category {
            Category::Ref => "#REF!",
            Category::Value => "#VALUE!",
            Category::Div0 => "#DIV/0!",
        }
    }
}

impl From<Category> for FormulaError {
    fn from(category: Category) -> Self {
        FormulaError::new(category)
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for FormulaError {}

/// Outcome of evaluating a formula.
pub type FormulaValue = Result<f64, FormulaError>;

/// The displayable value of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Error(FormulaError),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<FormulaError> {
        match self {
            Value::Error(e) => Some(*e),
            _ => None,
        }
    }
}

impl From<FormulaValue> for Value {
    fn from(value: FormulaValue) -> Self {
        match value {
            Ok(n) => Value::Number(n),
            Err(e) => Value::Error(e),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
            Value::Error(e) => write!(f, "{}", e),
        }
    }
}
