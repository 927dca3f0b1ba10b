//! Formula engine API.
//!
//! This module provides everything the sheet needs from a formula evaluator:
//!
//! - [`CellRef`] - Cell addresses, bounds and A1 notation
//! - [`Formula`] - Parse, evaluate and canonically render an expression
//! - [`Value`], [`FormulaError`] - Cell values and computational errors
//! - [`format_number`] - Format numbers for display

mod ast;
mod cell_ref;
mod format;
mod formula;
mod parse;
mod value;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use cell_ref::{CellRef, MAX_COLS, MAX_ROWS};
pub use format::format_number;
pub use formula::Formula;
pub use parse::{ParseError, parse_expression};
pub use value::{Category, FormulaError, FormulaValue, Value};
