//! Circular dependency detection for formula cells.
//!
//! When a formula is entered, we must verify it doesn't create a cycle
//! (e.g., A1 references B1, B1 references C1, C1 references A1) before the
//! formula is committed. The search runs over the current reference edges
//! plus the candidate's references, so a rejected edit never touches the
//! graph.

use std::collections::{HashMap, HashSet};

use cellgraph_engine::engine::Position;

use super::Sheet;

/// Check whether giving `target` a formula that reads `candidates` would
/// close a cycle.
///
/// Returns `Some(path)` with the cycle in reference order, starting and
/// ending at `target` (`[A1, B1, A1]` for A1 → B1 → A1), or `None`.
pub(crate) fn detect_cycle(
    sheet: &Sheet,
    target: Position,
    candidates: &[Position],
) -> Option<Vec<Position>> {
    let mut visited = HashSet::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut stack = Vec::new();

    for &pos in candidates.iter().rev() {
        if visited.insert(pos) {
            came_from.insert(pos, target);
            stack.push(pos);
        }
    }

    while let Some(current) = stack.pop() {
        if current == target {
            return Some(trace_path(&came_from, target));
        }
        let Some(id) = sheet.cell_id(current) else {
            continue;
        };
        for next_id in sheet.get(id).referenced.iter().rev() {
            let next = sheet.get(*next_id).position;
            if visited.insert(next) {
                came_from.insert(next, current);
                stack.push(next);
            }
        }
    }

    None
}

fn trace_path(came_from: &HashMap<Position, Position>, target: Position) -> Vec<Position> {
    let mut path = vec![target];
    let mut node = target;
    while let Some(&prev) = came_from.get(&node) {
        path.push(prev);
        if prev == target {
            break;
        }
        node = prev;
    }
    path.reverse();
    path
}
