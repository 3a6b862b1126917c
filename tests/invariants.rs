//! Graph invariants over random edit sequences.

use std::collections::{HashMap, HashSet};

use cellgraph::{Position, Sheet, SheetError};
use proptest::prelude::*;

const SIDE: usize = 4;

#[derive(Debug, Clone)]
enum Edit {
    Number(Position, i32),
    Formula(Position, Vec<Position>),
    Clear(Position),
}

impl Edit {
    fn target(&self) -> Position {
        match self {
            Edit::Number(pos, _) | Edit::Formula(pos, _) | Edit::Clear(pos) => *pos,
        }
    }

    fn input(&self) -> String {
        match self {
            Edit::Number(_, n) => n.to_string(),
            Edit::Formula(_, refs) if refs.is_empty() => "=1".to_string(),
            Edit::Formula(_, refs) => {
                let terms: Vec<String> = refs.iter().map(Position::to_string).collect();
                format!("={}", terms.join("+"))
            }
            Edit::Clear(_) => String::new(),
        }
    }
}

fn position() -> impl Strategy<Value = Position> {
    (0..SIDE, 0..SIDE).prop_map(|(row, col)| Position::new(row, col))
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (position(), -50i32..50).prop_map(|(pos, n)| Edit::Number(pos, n)),
        (position(), prop::collection::vec(position(), 0..4))
            .prop_map(|(pos, refs)| Edit::Formula(pos, refs)),
        position().prop_map(Edit::Clear),
    ]
}

fn check_symmetry(sheet: &Sheet) -> Result<(), TestCaseError> {
    for cell in sheet.cells() {
        let me = cell.position();
        for referenced in cell.referenced_cells() {
            let other = sheet.cell(referenced).unwrap();
            prop_assert!(other.is_some(), "{} references missing {}", me, referenced);
            prop_assert!(other.unwrap().dependent_cells().contains(&me));
        }
        for dependent in cell.dependent_cells() {
            let other = sheet.cell(dependent).unwrap().unwrap();
            prop_assert!(other.referenced_cells().contains(&me));
        }
        prop_assert_eq!(cell.referenced_cells(), cell.content().referenced_cells());
    }
    Ok(())
}

fn check_acyclic(sheet: &Sheet) -> Result<(), TestCaseError> {
    let edges: HashMap<Position, Vec<Position>> = sheet
        .cells()
        .map(|cell| (cell.position(), cell.referenced_cells()))
        .collect();
    let mut done = HashSet::new();
    for &start in edges.keys() {
        // (node, index of next edge to follow)
        let mut stack = vec![(start, 0usize)];
        let mut on_path = HashSet::from([start]);
        while let Some((node, next)) = stack.pop() {
            let out = &edges[&node];
            if next < out.len() {
                stack.push((node, next + 1));
                let child = out[next];
                prop_assert!(!on_path.contains(&child), "cycle through {}", child);
                if done.insert(child) {
                    on_path.insert(child);
                    stack.push((child, 0));
                }
            } else {
                on_path.remove(&node);
                done.insert(node);
            }
        }
    }
    Ok(())
}

/// Every value must match what a freshly built sheet computes.
fn check_values_fresh(sheet: &Sheet) -> Result<(), TestCaseError> {
    let mut fresh = Sheet::new();
    for cell in sheet.cells() {
        fresh.set_cell(cell.position(), &cell.text()).unwrap();
    }
    for cell in sheet.cells() {
        prop_assert_eq!(
            cell.value(),
            fresh.value(cell.position()).unwrap(),
            "stale value at {}",
            cell.position()
        );
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_edits_keep_graph_consistent(edits in prop::collection::vec(edit(), 1..40)) {
        let mut sheet = Sheet::new();
        for edit in edits {
            let target = edit.target();
            let before = sheet.text(target).unwrap();
            match sheet.set_cell(target, &edit.input()) {
                Ok(()) => {}
                Err(SheetError::CircularDependency { position }) => {
                    prop_assert_eq!(position, target);
                    prop_assert_eq!(sheet.text(target).unwrap(), before);
                }
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }

            check_symmetry(&sheet)?;
            check_acyclic(&sheet)?;
            // Populate caches so the next edit has something to invalidate.
            check_values_fresh(&sheet)?;
        }
    }
}
