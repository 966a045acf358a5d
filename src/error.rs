use crate::graph::{ConnectionId, NodeId};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Errors raised at the canvas-store boundary.
///
/// The compiler itself never fails: malformed graph state degrades to
/// well-defined output instead. Only mutations (connecting columns, renaming
/// aliases) and descriptor ingestion can be rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    NodeNotFound(NodeId),
    ColumnNotFound { node: NodeId, column: String },
    SelfConnection(NodeId),
    DuplicateConnection { existing: ConnectionId },
    BadDescriptor(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NodeNotFound(node) => {
                write!(f, "No table with id {node} is placed on the canvas")
            }
            Error::ColumnNotFound { node, column } => {
                write!(f, "Table {node} has no column named '{column}'")
            }
            Error::SelfConnection(node) => {
                write!(f, "Cannot connect table {node} to itself")
            }
            Error::DuplicateConnection { existing } => {
                write!(f, "These columns are already linked by connection {existing}")
            }
            Error::BadDescriptor(message) => {
                write!(f, "Cannot read schema descriptor: {message}")
            }
        }
    }
}
