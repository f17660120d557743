//! Histogram imager element for typed dataflow graphs
//!
//! The crate exposes a pad-based type system, a static compatibility
//! checker, and the Pixmap node: an output element that accumulates
//! (point, color) samples into a 2D histogram buffer and hands back
//! normalized snapshots for display.

pub mod config;
pub mod constants;
pub mod error;
pub mod nodes;

// Re-export commonly used types
pub use config::{Config, ImagerConfig};
pub use error::{NodeError, Result};
pub use nodes::output::pixmap::{AccumulationPolicy, HistogramAccumulator, ImagerNode};
pub use nodes::{
    builtin_registry, Activation, Element, NodeGraph, NodeRegistry, NodeState, Normalization,
    PadValue, Snapshot, ValueType,
};
