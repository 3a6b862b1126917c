use std::collections::{HashMap, HashSet};

use cellgraph_engine::engine::{CellError, Position, Size, Value};

use super::cell::{Cell, CellContent, CellId};
use crate::config::SheetConfig;
use crate::error::{Result, SheetError};

/// The grid of cells.
///
/// Cells live in an arena and are never removed: clearing a cell retires it
/// to empty content in place, so dependency edges (arena indices) held by
/// other cells stay valid for the lifetime of the sheet.
#[derive(Debug, Default)]
pub struct Sheet {
    pub(crate) config: SheetConfig,
    pub(crate) cells: Vec<Cell>,
    pub(crate) index: HashMap<Position, CellId>,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SheetConfig) -> Result<Self> {
        config.validate()?;
        Ok(Sheet {
            config,
            ..Self::default()
        })
    }

    pub(crate) fn check_position(&self, pos: Position) -> Result<()> {
        if self.config.contains(pos) {
            Ok(())
        } else {
            Err(SheetError::InvalidPosition(pos))
        }
    }

    pub(crate) fn cell_id(&self, pos: Position) -> Option<CellId> {
        self.index.get(&pos).copied()
    }

    pub(crate) fn get(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.0]
    }

    /// Look up the cell at `pos`, creating an empty one if there is none.
    pub(crate) fn get_or_create(&mut self, pos: Position) -> CellId {
        if let Some(id) = self.cell_id(pos) {
            return id;
        }
        let id = CellId(self.cells.len());
        self.cells.push(Cell::new_empty(pos));
        self.index.insert(pos, id);
        id
    }

    /// Handle to the cell at `pos`, if one has been created.
    ///
    /// Cells referenced by a formula exist (as empty placeholders) even if
    /// nothing was ever written to them.
    pub fn cell(&self, pos: Position) -> Result<Option<CellHandle<'_>>> {
        self.check_position(pos)?;
        Ok(self.cell_id(pos).map(|id| CellHandle { sheet: self, id }))
    }

    /// Value at `pos`; positions without a cell read as empty.
    pub fn value(&self, pos: Position) -> Result<Value> {
        Ok(self
            .cell(pos)?
            .map(|cell| cell.value())
            .unwrap_or_else(Value::empty))
    }

    /// Editable text at `pos`; positions without a cell read as "".
    pub fn text(&self, pos: Position) -> Result<String> {
        Ok(self.cell(pos)?.map(|cell| cell.text()).unwrap_or_default())
    }

    /// All cells created so far, placeholders included, in creation order.
    pub fn cells(&self) -> impl Iterator<Item = CellHandle<'_>> {
        (0..self.cells.len()).map(|i| CellHandle {
            sheet: self,
            id: CellId(i),
        })
    }

    /// Smallest A1-anchored rectangle that covers every non-empty cell.
    pub fn printable_size(&self) -> Size {
        self.cells
            .iter()
            .filter(|cell| !cell.content().is_empty())
            .fold(Size::default(), |size, cell| Size {
                rows: size.rows.max(cell.position.row + 1),
                cols: size.cols.max(cell.position.col + 1),
            })
    }

    pub(crate) fn value_of(&self, id: CellId) -> Value {
        self.fill_caches(id);
        self.get(id).value(|pos| self.resolve(pos))
    }

    /// Evaluate the uncached formulas `id` reads from, deepest first, so the
    /// evaluation of any one formula only ever reads cached neighbours.
    fn fill_caches(&self, id: CellId) {
        // (cell, whether the cells it reads are already done)
        let mut stack = vec![(id, false)];
        let mut expanded = HashSet::new();
        while let Some((current, ready)) = stack.pop() {
            let cell = self.get(current);
            if ready {
                let _ = cell.value(|pos| self.resolve(pos));
                continue;
            }
            if cell.has_cache()
                || !matches!(cell.content(), CellContent::Formula(_))
                || !expanded.insert(current)
            {
                continue;
            }
            stack.push((current, true));
            stack.extend(cell.referenced.iter().map(|&referenced| (referenced, false)));
        }
    }

    /// Numeric value of a referenced position, as formulas see it.
    pub(crate) fn resolve(&self, pos: Position) -> std::result::Result<f64, CellError> {
        if !self.config.contains(pos) {
            return Err(CellError::Ref);
        }
        match self.cell_id(pos) {
            Some(id) => self.value_of(id).to_number(),
            None => Ok(0.0),
        }
    }
}

/// Read-only view of one cell in a [`Sheet`].
#[derive(Clone, Copy)]
pub struct CellHandle<'a> {
    sheet: &'a Sheet,
    id: CellId,
}

impl<'a> CellHandle<'a> {
    fn cell(&self) -> &'a Cell {
        self.sheet.get(self.id)
    }

    pub fn position(&self) -> Position {
        self.cell().position
    }

    pub fn content(&self) -> &'a CellContent {
        self.cell().content()
    }

    /// Current value, evaluating (and caching) a formula if needed.
    pub fn value(&self) -> Value {
        self.sheet.value_of(self.id)
    }

    /// What the user typed, or `=` plus the canonical formula text.
    pub fn text(&self) -> String {
        self.cell().content().text()
    }

    /// Positions this cell reads, deduplicated in first-seen order.
    pub fn referenced_cells(&self) -> Vec<Position> {
        self.cell()
            .referenced
            .iter()
            .map(|id| self.sheet.get(*id).position)
            .collect()
    }

    /// Positions of cells whose formulas read this cell, sorted.
    pub fn dependent_cells(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self
            .cell()
            .dependents
            .iter()
            .map(|id| self.sheet.get(*id).position)
            .collect();
        positions.sort();
        positions
    }

    /// Whether any formula reads this cell.
    pub fn is_referenced(&self) -> bool {
        !self.cell().dependents.is_empty()
    }

    /// Whether a formula result is currently cached.
    pub fn has_cached_value(&self) -> bool {
        self.cell().has_cache()
    }
}

impl std::fmt::Debug for CellHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellHandle")
            .field("position", &self.position())
            .field("content", self.content())
            .finish()
    }
}
