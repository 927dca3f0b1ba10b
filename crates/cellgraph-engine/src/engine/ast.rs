//! Formula syntax tree: evaluation, canonical rendering and reference collection.

use std::fmt;

use super::cell_ref::CellRef;
use super::format::format_number;
use super::value::{Category, FormulaError, FormulaValue};

/// Binary arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
        }
    }

    /// `a op (b op' c)` differs from `a op b op' c` when op is not associative.
    fn keeps_right_group(self) -> bool {
        matches!(self, BinaryOp::Sub | BinaryOp::Div)
    }

    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
        }
    }
}

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

/// Formula expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    /// Cell reference; may be out of bounds, in which case it evaluates to `#REF!`.
    Ref(CellRef),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

const UNARY_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 4;

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Number(_) | Expr::Ref(_) => ATOM_PRECEDENCE,
            Expr::Unary { .. } => UNARY_PRECEDENCE,
            Expr::Binary { op, .. } => op.precedence(),
        }
    }

    /// Evaluate the tree, resolving each cell reference through `resolve`.
    ///
    /// Errors short-circuit: the first failing operand (left to right) wins.
    pub fn evaluate(&self, resolve: &dyn Fn(CellRef) -> FormulaValue) -> FormulaValue {
        match self {
            Expr::Number(n) if n.is_finite() => Ok(*n),
            Expr::Number(_) => Err(FormulaError::new(Category::Div0)),
            Expr::Ref(cell) => resolve(*cell),
            Expr::Unary { op, operand } => {
                let v = operand.evaluate(resolve)?;
                Ok(match op {
                    UnaryOp::Plus => v,
                    UnaryOp::Minus => -v,
                })
            }
            Expr::Binary { op, left, right } => {
                let lhs = left.evaluate(resolve)?;
                let rhs = right.evaluate(resolve)?;
                let result = op.apply(lhs, rhs);
                if result.is_finite() {
                    Ok(result)
                } else {
                    Err(FormulaError::new(Category::Div0))
                }
            }
        }
    }

    /// Append every in-bounds cell reference, in source order (duplicates kept).
    pub fn collect_refs(&self, out: &mut Vec<CellRef>) {
        match self {
            Expr::Number(_) => {}
            Expr::Ref(cell) => {
                if cell.is_valid() {
                    out.push(*cell);
                }
            }
            Expr::Unary { operand, .. } => operand.collect_refs(out),
            Expr::Binary { left, right, .. } => {
                left.collect_refs(out);
                right.collect_refs(out);
            }
        }
    }

    fn fmt_child(child: &Expr, parens: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if parens {
            write!(f, "({})", child)
        } else {
            write!(f, "{}", child)
        }
    }
}

/// Canonical rendering: no whitespace, parentheses only where required.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => f.write_str(&format_number(*n)),
            Expr::Ref(cell) if cell.is_valid() => write!(f, "{}", cell),
            Expr::Ref(_) => f.write_str("#REF!"),
            Expr::Unary { op, operand } => {
                let sign = match op {
                    UnaryOp::Plus => '+',
                    UnaryOp::Minus => '-',
                };
                write!(f, "{}", sign)?;
                Expr::fmt_child(operand, operand.precedence() < UNARY_PRECEDENCE, f)
            }
            Expr::Binary { op, left, right } => {
                let prec = op.precedence();
                Expr::fmt_child(left, left.precedence() < prec, f)?;
                write!(f, "{}", op.symbol())?;
                let right_parens = right.precedence() < prec
                    || (right.precedence() == prec && op.keeps_right_group());
                Expr::fmt_child(right, right_parens, f)
            }
        }
    }
}
