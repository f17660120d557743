//! Error types shared by the node system

use thiserror::Error;

/// Result type using the crate's error type.
pub type Result<T> = std::result::Result<T, NodeError>;

/// Errors surfaced to the host by checks, activation, and configuration.
///
/// Variants that can come back from `activate` hold only integers and
/// static strings so constructing them never allocates.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("pad {pad} ({label}) expects {expected}")]
    TypeMismatch {
        pad: usize,
        label: &'static str,
        expected: &'static str,
    },

    #[error("invalid buffer dimension {width}x{height}")]
    InvalidDimension { width: i64, height: i64 },

    #[error("node has no accepted type binding")]
    Unresolved,

    #[error("pad {pad} is not bound")]
    UnboundPad { pad: usize },

    #[error("node has no input pad {pad}")]
    UnknownPad { pad: usize },

    #[error("no node with id {0}")]
    UnknownNode(usize),

    #[error("unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl NodeError {
    /// Whether this error leaves the node waiting for a fresh check
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            NodeError::TypeMismatch { .. }
                | NodeError::InvalidDimension { .. }
                | NodeError::Unresolved
                | NodeError::UnboundPad { .. }
        )
    }
}
