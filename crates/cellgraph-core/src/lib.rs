//! cellgraph-core - Sheet model with dependency tracking.
//!
//! A [`Sheet`] owns a grid of [`Cell`]s. Formula cells record which cells they
//! read; the sheet keeps both directions of every edge, refuses edits that
//! would create a cycle, and clears cached formula values downstream of a
//! change.

pub mod cell;
pub mod error;
pub mod sheet;

pub use cell::{Cell, Content};
pub use error::{Result, SheetError};
pub use sheet::{Sheet, Size};

pub use cellgraph_engine::engine::{CellRef, FormulaError, Value};
