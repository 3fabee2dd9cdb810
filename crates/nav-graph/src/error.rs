//! Graph-subsystem error type.

use thiserror::Error;

use nav_core::{NavError, NodeId};

/// Errors produced by `nav-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("graph parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;

impl From<GraphError> for NavError {
    fn from(e: GraphError) -> Self {
        match e {
            GraphError::NodeNotFound(n) => NavError::NodeNotFound(n),
            GraphError::Parse(msg) => NavError::Parse(msg),
            GraphError::Io(io) => NavError::Io(io),
        }
    }
}
