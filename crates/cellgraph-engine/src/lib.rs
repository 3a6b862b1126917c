//! cellgraph-engine - formula values, positions and expression evaluation.

pub mod engine;
