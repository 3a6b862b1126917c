use cellgraph_engine::engine::Position;
use log::debug;

use super::Sheet;
use super::cell::CellContent;
use super::cycle::detect_cycle;
use crate::error::{Result, SheetError};

impl Sheet {
    /// Set cell contents from input text.
    ///
    /// On error (bad position, unparsable formula, circular reference) the
    /// sheet is left exactly as it was.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        self.check_position(pos)?;
        if let Some(id) = self.cell_id(pos)
            && self.get(id).content().text() == text
        {
            return Ok(());
        }

        let content = CellContent::from_input(text)
            .inspect_err(|err| debug!("rejecting input for {}: {}", pos, err))?;

        let references: Vec<Position> = content
            .referenced_cells()
            .into_iter()
            .filter(|p| self.config.contains(*p))
            .collect();

        if let Some(path) = detect_cycle(self, pos, &references) {
            debug!(
                "rejecting formula for {}: cycle {}",
                pos,
                path.iter()
                    .map(Position::to_string)
                    .collect::<Vec<_>>()
                    .join(" -> ")
            );
            return Err(SheetError::CircularDependency { position: pos });
        }

        let id = self.get_or_create(pos);
        self.get_mut(id).replace_content(content);
        self.rebuild_edges(id, &references);
        self.invalidate_dependents(id);
        Ok(())
    }

    /// Clear the specified cell. Dependents keep their edges and read it as empty.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        self.set_cell(pos, "")
    }
}
