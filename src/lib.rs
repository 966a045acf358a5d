//! Compiles the table graph a user draws on the query-builder canvas into a
//! SQL SELECT statement.
//!
//! The UI owns gestures and display; this crate owns the canvas state
//! ([`graph::Graph`]) and the graph-to-SQL compilation ([`compile`]).

pub mod graph;
pub mod schema;

mod engine;
mod error;

pub use engine::{compile, compile_parts, EMPTY_GRAPH_PLACEHOLDER};
pub use error::Error;
