//! Sheet state and edit logic.

mod cell;
mod cycle;
mod graph;
mod ops;
mod state;

pub use cell::{CellContent, ESCAPE_SIGN, FORMULA_SIGN};
pub use state::{CellHandle, Sheet};
