//! cellgraph-core - sheet model, dependency graph and cache invalidation.

pub mod config;
pub mod error;
pub mod sheet;

pub use config::SheetConfig;
pub use error::{Result, SheetError};
pub use sheet::{CellContent, CellHandle, ESCAPE_SIGN, FORMULA_SIGN, Sheet};

pub use cellgraph_engine::engine::{CellError, Position, Size, Value};
