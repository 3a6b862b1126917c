//! Cell data structures.
//!
//! - [`CellContent`] - What a cell holds (empty, text, or formula)
//! - [`Cell`] - A cell with content, dependency edges, and cached evaluation state

use std::cell::OnceCell;
use std::collections::HashSet;

use cellgraph_engine::engine::{CellError, Formula, ParseResult, Position, Value};

/// Leading character that turns input into a formula.
pub const FORMULA_SIGN: char = '=';
/// Leading character that keeps input literal text; hidden from the value.
pub const ESCAPE_SIGN: char = '\'';

/// Index of a cell in the sheet's arena.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub(crate) struct CellId(pub(crate) usize);

/// The content variant of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContent {
    Empty,
    Text(String),
    Formula(Formula),
}

impl CellContent {
    /// Parse user input into a content variant.
    /// - Empty string -> Empty
    /// - Starts with '=' and has something after it -> Formula (parsed without the '=')
    /// - Otherwise -> Text, kept verbatim
    pub fn from_input(input: &str) -> ParseResult<CellContent> {
        if input.is_empty() {
            return Ok(CellContent::Empty);
        }
        if input.len() > FORMULA_SIGN.len_utf8()
            && let Some(expression) = input.strip_prefix(FORMULA_SIGN)
        {
            return Ok(CellContent::Formula(Formula::parse(expression)?));
        }
        Ok(CellContent::Text(input.to_string()))
    }

    /// Editable source form of the content.
    pub fn text(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text(text) => text.clone(),
            CellContent::Formula(formula) => format!("{}{}", FORMULA_SIGN, formula.expression()),
        }
    }

    /// Positions the content reads from. Empty for everything but formulas.
    pub fn referenced_cells(&self) -> Vec<Position> {
        match self {
            CellContent::Formula(formula) => formula.referenced_cells(),
            CellContent::Empty | CellContent::Text(_) => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }
}

/// A cell in the sheet arena.
///
/// `referenced` and `dependents` are edges into the same arena; the sheet
/// keeps them symmetric.
#[derive(Debug)]
pub(crate) struct Cell {
    pub(crate) position: Position,
    content: CellContent,
    cache: OnceCell<Value>,
    /// Cells this cell's formula reads, in first-seen order.
    pub(crate) referenced: Vec<CellId>,
    /// Cells whose formulas read this cell.
    pub(crate) dependents: HashSet<CellId>,
}

impl Cell {
    pub(crate) fn new_empty(position: Position) -> Cell {
        Cell {
            position,
            content: CellContent::Empty,
            cache: OnceCell::new(),
            referenced: Vec::new(),
            dependents: HashSet::new(),
        }
    }

    pub(crate) fn content(&self) -> &CellContent {
        &self.content
    }

    /// Swap in new content. Any cached result belongs to the old content.
    pub(crate) fn replace_content(&mut self, content: CellContent) {
        debug_assert!(
            !matches!(&content, CellContent::Text(text) if text.is_empty()),
            "text content must not be empty"
        );
        self.content = content;
        self.cache.take();
    }

    /// Current value; formulas are evaluated on first read and cached.
    pub(crate) fn value<F>(&self, resolver: F) -> Value
    where
        F: FnMut(Position) -> Result<f64, CellError>,
    {
        match &self.content {
            CellContent::Empty => Value::empty(),
            CellContent::Text(text) => {
                Value::Text(text.strip_prefix(ESCAPE_SIGN).unwrap_or(text).to_string())
            }
            CellContent::Formula(formula) => {
                self.cache.get_or_init(|| formula.evaluate(resolver)).clone()
            }
        }
    }

    pub(crate) fn has_cache(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Drop the cached result. Returns whether there was one.
    pub(crate) fn invalidate(&mut self) -> bool {
        self.cache.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_cells(_: Position) -> Result<f64, CellError> {
        Ok(0.0)
    }

    #[test]
    fn test_from_input_dispatch() {
        assert_eq!(CellContent::from_input("").unwrap(), CellContent::Empty);
        assert_eq!(
            CellContent::from_input("hello").unwrap(),
            CellContent::Text("hello".to_string())
        );
        assert!(matches!(
            CellContent::from_input("=1+2").unwrap(),
            CellContent::Formula(_)
        ));
        // A lone formula sign is plain text.
        assert_eq!(
            CellContent::from_input("=").unwrap(),
            CellContent::Text("=".to_string())
        );
    }

    #[test]
    fn test_from_input_parse_failure() {
        assert!(CellContent::from_input("=1+").is_err());
    }

    #[test]
    fn test_escaped_text_value_and_text() {
        let mut cell = Cell::new_empty(Position::new(0, 0));
        cell.replace_content(CellContent::from_input("'=not a formula").unwrap());
        assert_eq!(cell.value(no_cells), Value::from("=not a formula"));
        assert_eq!(cell.content().text(), "'=not a formula");
    }

    #[test]
    fn test_formula_text_is_canonical() {
        let content = CellContent::from_input("= ( 1 + 2 ) ").unwrap();
        assert_eq!(content.text(), "=1+2");
    }

    #[test]
    fn test_formula_value_is_cached_until_invalidated() {
        let mut cell = Cell::new_empty(Position::new(0, 0));
        cell.replace_content(CellContent::from_input("=A2*2").unwrap());
        assert!(!cell.has_cache());

        assert_eq!(cell.value(|_| Ok(2.0)), Value::Number(4.0));
        assert!(cell.has_cache());
        // Cached: the resolver is not consulted again.
        assert_eq!(cell.value(|_| Ok(100.0)), Value::Number(4.0));

        assert!(cell.invalidate());
        assert!(!cell.invalidate());
        assert_eq!(cell.value(|_| Ok(100.0)), Value::Number(200.0));
    }

    #[test]
    fn test_non_formula_content_never_caches() {
        let mut cell = Cell::new_empty(Position::new(0, 0));
        cell.replace_content(CellContent::from_input("text").unwrap());
        let _ = cell.value(no_cells);
        assert!(!cell.has_cache());
    }

    #[test]
    fn test_replace_content_drops_cache() {
        let mut cell = Cell::new_empty(Position::new(0, 0));
        cell.replace_content(CellContent::from_input("=1").unwrap());
        let _ = cell.value(no_cells);
        cell.replace_content(CellContent::Empty);
        assert!(!cell.has_cache());
        assert_eq!(cell.value(no_cells), Value::empty());
    }
}
