//! cellgraph - spreadsheet cells with a dependency graph and lazy formulas.
//!
//! ```
//! use cellgraph::{Position, Sheet, Value};
//!
//! let a1 = Position::from_a1("A1").unwrap();
//! let b1 = Position::from_a1("B1").unwrap();
//!
//! let mut sheet = Sheet::new();
//! sheet.set_cell(a1, "=5").unwrap();
//! sheet.set_cell(b1, "=A1+1").unwrap();
//! assert_eq!(sheet.value(b1).unwrap(), Value::Number(6.0));
//!
//! sheet.set_cell(a1, "=10").unwrap();
//! assert_eq!(sheet.value(b1).unwrap(), Value::Number(11.0));
//! ```

pub use cellgraph_core::{
    CellContent, CellHandle, ESCAPE_SIGN, FORMULA_SIGN, Result, Sheet, SheetConfig, SheetError,
};
pub use cellgraph_engine::engine::{
    CellError, Formula, MAX_COLS, MAX_DEPTH, MAX_NESTING, MAX_ROWS, ParseError, Position, Size,
    Value, format_number,
};
