//! Node system - type checking, element interface, and built-in nodes

// Core node system modules
pub mod checker;
pub mod element;
pub mod factory;
pub mod host;
pub mod interface;
pub mod port;
pub mod snapshot;
pub mod types;

// Node implementations
pub mod output;

use once_cell::sync::Lazy;

// Re-export core types
pub use checker::{CompatibilityChecker, PadRequirement};
pub use element::{Activation, Element, NodeState};
pub use host::{HostedNode, NodeGraph, NodeId};
pub use interface::{MatrixData, PadValue};
pub use port::{PadDirection, PadId, PadSpec};
pub use snapshot::{Normalization, Rgba8, Snapshot};
pub use types::ValueType;

// Re-export factory types
pub use factory::{NodeCategory, NodeFactory, NodeMetadata, NodeRegistry};

static BUILTIN_REGISTRY: Lazy<NodeRegistry> = Lazy::new(NodeRegistry::with_builtins);

/// Register every node kind this crate provides
pub fn register_builtin_nodes(registry: &mut NodeRegistry) {
    registry.register::<output::PixmapNodeFactory>();
}

/// Process-wide registry holding the built-in nodes
pub fn builtin_registry() -> &'static NodeRegistry {
    &BUILTIN_REGISTRY
}
