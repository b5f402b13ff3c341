//! Error types for DOM operations
//!
//! Simple, flat error hierarchy. Every variant aborts the whole operation;
//! nothing is partially applied.

use crate::types::NodeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType { expected: String, actual: String },

    #[error("Invalid tag name: `{0}`")]
    InvalidTagName(String),

    #[error("Structural violation: {0}")]
    StructuralViolation(String),

    #[error("Item index does not exist: {0}")]
    IndexNotFound(usize),

    #[error("Item index already exists: {0}")]
    IndexExists(usize),

    #[error("Node {node} has no {collection} collection")]
    MissingCollection {
        node: NodeId,
        collection: &'static str,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DomError {
    pub(crate) fn structural(message: impl Into<String>) -> Self {
        DomError::StructuralViolation(message.into())
    }
}
