//! Error types for cellgraph core.

use thiserror::Error;

use cellgraph_engine::engine::{CellRef, ParseError};

/// Structural faults that abort a sheet operation. Nothing is mutated when
/// one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SheetError {
    #[error("Invalid position {0}")]
    InvalidPosition(CellRef),

    #[error("Formula syntax error: {0}")]
    FormulaSyntax(#[from] ParseError),

    /// `path` starts and ends at `cell`.
    #[error("Circular dependency detected: {}", join_path(.path))]
    CircularDependency { cell: CellRef, path: Vec<CellRef> },
}

fn join_path(path: &[CellRef]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, SheetError>;
