//! Error types for the cellgraph command runner

use cellgraph_core::SheetError;
use thiserror::Error;

/// Errors that can occur while running commands
#[derive(Error, Debug)]
pub enum CellgraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("{0}")]
    Sheet(#[from] SheetError),
}

pub type Result<T> = std::result::Result<T, CellgraphError>;
