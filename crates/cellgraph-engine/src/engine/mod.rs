//! Spreadsheet engine API.
//!
//! This module provides the formula side of the spreadsheet:
//!
//! - [`Position`], [`Size`] - Grid coordinates (A1 notation ↔ row/col indices)
//! - [`Value`], [`CellError`] - Evaluation results and spreadsheet error values
//! - [`Expr`] - Formula expression tree
//! - [`parse_expression`] - Turn formula text into an [`Expr`]
//! - [`Formula`] - Evaluate, print and inspect a parsed formula
//! - [`format_number`] - Format numbers for display

mod ast;
mod eval;
mod format;
mod parser;
mod position;
mod value;

pub use ast::{BinaryOperator, Expr, UnaryOperator};
pub use eval::Formula;
pub use format::format_number;
pub use parser::{MAX_DEPTH, MAX_NESTING, ParseError, ParseResult, parse_expression};
pub use position::{MAX_COLS, MAX_ROWS, Position, Size};
pub use value::{CellError, Value};
