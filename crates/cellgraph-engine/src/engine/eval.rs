//! Parsed formulas and their evaluation.
//!
//! [`Formula`] is the boundary the cell layer talks to: it never looks at
//! the grammar, only at the three things a tree can do (evaluate against a
//! resolver, print itself back, and list the cells it reads).

use std::collections::HashSet;

use super::ast::Expr;
use super::parser::{ParseResult, parse_expression};
use super::position::Position;
use super::value::{CellError, Value};

/// A parsed formula expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    expr: Expr,
}

impl Formula {
    /// Parse formula text. `text` is everything after the leading `=`.
    pub fn parse(text: &str) -> ParseResult<Formula> {
        Ok(Formula {
            expr: parse_expression(text)?,
        })
    }

    /// Evaluate against live cell values.
    ///
    /// `resolver` maps an in-bounds position to a number, or to the error
    /// the referenced cell stands for. References outside the grid never
    /// reach it; they evaluate to `#REF!` directly.
    pub fn evaluate<F>(&self, mut resolver: F) -> Value
    where
        F: FnMut(Position) -> Result<f64, CellError>,
    {
        self.expr.evaluate(&mut resolver).into()
    }

    /// Canonical formula text, without the leading `=`.
    pub fn expression(&self) -> String {
        self.expr.to_string()
    }

    /// In-bounds positions the formula reads, deduplicated in first-seen order.
    pub fn referenced_cells(&self) -> Vec<Position> {
        let mut all = Vec::new();
        self.expr.collect_references(&mut all);

        let mut seen = HashSet::with_capacity(all.len());
        let mut cells: Vec<Position> = Vec::with_capacity(all.len());
        for pos in all {
            if pos.is_valid() && seen.insert(pos) {
                cells.push(pos);
            }
        }
        cells
    }
}
