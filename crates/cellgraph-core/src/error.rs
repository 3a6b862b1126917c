//! Error types for the sheet model.

use thiserror::Error;

use cellgraph_engine::engine::{ParseError, Position};

/// Reasons an edit to the sheet is refused.
///
/// Evaluation problems (`#REF!`, `#VALUE!`, `#DIV/0!`) are not errors at
/// this level; they are cell values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error("Circular dependency detected at {position}")]
    CircularDependency { position: Position },

    #[error("Formula error: {0}")]
    Parse(
        #[from]
        #[source]
        ParseError,
    ),

    #[error("Invalid position: {0}")]
    InvalidPosition(Position),

    #[error("Invalid sheet configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SheetError>;
