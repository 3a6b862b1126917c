//! Dependency edge maintenance and cache invalidation.

use std::collections::HashSet;

use cellgraph_engine::engine::Position;
use log::trace;

use super::Sheet;
use super::cell::CellId;

impl Sheet {
    /// Replace the outgoing edges of `id` with edges to `references`,
    /// creating empty placeholder cells for positions that have none.
    pub(crate) fn rebuild_edges(&mut self, id: CellId, references: &[Position]) {
        let old = std::mem::take(&mut self.get_mut(id).referenced);
        for referenced in old {
            self.get_mut(referenced).dependents.remove(&id);
        }

        let mut referenced = Vec::with_capacity(references.len());
        for &pos in references {
            let target = self.get_or_create(pos);
            self.get_mut(target).dependents.insert(id);
            referenced.push(target);
        }
        trace!(
            "{} now references {} cell(s)",
            self.get(id).position,
            referenced.len()
        );
        self.get_mut(id).referenced = referenced;
    }

    /// Drop cached results of every cell that transitively depends on `changed`.
    /// Returns the number of caches dropped.
    ///
    /// A dependent with no cache is not walked past: a formula is only ever
    /// cached after every formula it read was, and dropping a cache always
    /// cascades, so nothing downstream of it can hold a cache that read it.
    pub(crate) fn invalidate_dependents(&mut self, changed: CellId) -> usize {
        let mut to_process = vec![changed];
        let mut visited = HashSet::new();
        let mut dropped = 0;
        while let Some(id) = to_process.pop() {
            if !visited.insert(id) {
                continue;
            }
            let dependents: Vec<CellId> = self.get(id).dependents.iter().copied().collect();
            for dep in dependents {
                if self.get_mut(dep).invalidate() {
                    dropped += 1;
                    to_process.push(dep);
                }
            }
        }
        trace!(
            "edit at {} dropped {} cached value(s)",
            self.get(changed).position,
            dropped
        );
        dropped
    }
}
