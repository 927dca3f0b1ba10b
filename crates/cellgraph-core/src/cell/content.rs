//! Cell content: the classified payload of a cell.

use std::cell::Cell as CacheSlot;

use cellgraph_engine::engine::{CellRef, Formula, FormulaValue, ParseError, Value};

/// Input prefix that marks a formula.
pub const FORMULA_SIGN: char = '=';
/// Leading marker that keeps text from being read as a formula or number.
pub const ESCAPE_SIGN: char = '\'';

/// The content stored in a cell.
#[derive(Clone, Debug)]
pub enum Content {
    Empty,
    Text(String),
    Formula(FormulaContent),
}

/// A parsed formula together with its last computed value.
#[derive(Clone, Debug)]
pub struct FormulaContent {
    formula: Formula,
    refs: Vec<CellRef>,
    cache: CacheSlot<Option<FormulaValue>>,
}

impl FormulaContent {
    fn new(formula: Formula) -> FormulaContent {
        let refs = formula.referenced_cells();
        FormulaContent {
            formula,
            refs,
            cache: CacheSlot::new(None),
        }
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Last computed value, if one is cached.
    pub fn cached(&self) -> Option<FormulaValue> {
        self.cache.get()
    }

    /// Evaluates on every call. The cache slot is only filled when empty, and
    /// serves as the "has a value" flag for dependent invalidation.
    fn evaluate(&self, resolve: &dyn Fn(CellRef) -> FormulaValue) -> FormulaValue {
        let value = self.formula.evaluate(resolve);
        if self.cache.get().is_none() {
            self.cache.set(Some(value));
        }
        value
    }
}

impl Content {
    /// Classify raw user input.
    ///
    /// - `=` followed by at least one character -> Formula
    /// - empty string -> Empty
    /// - anything else (including a lone `=`) -> Text
    pub fn from_input(text: &str) -> Result<Content, ParseError> {
        if let Some(expression) = text.strip_prefix(FORMULA_SIGN)
            && !expression.is_empty()
        {
            let formula = Formula::parse(expression)?;
            return Ok(Content::Formula(FormulaContent::new(formula)));
        }
        if text.is_empty() {
            Ok(Content::Empty)
        } else {
            Ok(Content::Text(text.to_string()))
        }
    }

    /// Raw text form, as the user would edit it.
    pub fn text(&self) -> String {
        match self {
            Content::Empty => String::new(),
            Content::Text(text) => text.clone(),
            Content::Formula(f) => format!("{}{}", FORMULA_SIGN, f.formula.expression()),
        }
    }

    /// Displayable value. Formula content resolves references through `resolve`.
    pub fn value(&self, resolve: &dyn Fn(CellRef) -> FormulaValue) -> Value {
        match self {
            Content::Empty => Value::Number(0.0),
            Content::Text(text) => {
                Value::Text(text.strip_prefix(ESCAPE_SIGN).unwrap_or(text).to_string())
            }
            Content::Formula(f) => f.evaluate(resolve).into(),
        }
    }

    /// Cells referenced by this content, deduplicated and sorted.
    pub fn referenced_cells(&self) -> &[CellRef] {
        match self {
            Content::Formula(f) => &f.refs,
            _ => &[],
        }
    }

    pub fn has_cache(&self) -> bool {
        match self {
            Content::Formula(f) => f.cache.get().is_some(),
            _ => false,
        }
    }

    pub fn invalidate_cache(&self) {
        if let Content::Formula(f) = self {
            f.cache.set(None);
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Content::Empty)
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, Content::Formula(_))
    }
}
