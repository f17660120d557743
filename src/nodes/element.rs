//! The capability set every node kind exposes to the host
//!
//! The host's scheduler dispatches through this trait; node kinds are
//! sibling implementations, not a hierarchy.

use crate::error::Result;
use crate::nodes::interface::PadValue;
use crate::nodes::port::PadSpec;
use crate::nodes::snapshot::Snapshot;
use crate::nodes::types::ValueType;

/// Type-binding state of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// No accepted check since construction or the last topology change
    Unresolved,
    /// Check accepted and resources sized, no sample applied yet
    Resolved,
    /// Receiving activations
    Accumulating,
}

/// What a single activation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The sample landed in the buffer
    Applied,
    /// The sample fell outside the buffer and was discarded
    Dropped,
    /// The node is unresolved and ignored the activation
    Idle,
}

/// Node behavior driven by the host graph
pub trait Element: Send {
    /// Declared pads, inputs first in binding order
    fn pads(&self) -> &[PadSpec];

    /// Validate the values currently resolved on the input pads and prepare
    /// for activation. Returns the output types on acceptance, `None` for
    /// terminal nodes.
    fn check(&mut self, inputs: &[PadValue]) -> Result<Option<Vec<ValueType>>>;

    /// Consume the current input values once. Must not allocate.
    fn activate(&mut self, inputs: &[PadValue]) -> Result<Activation>;

    /// Display image, for nodes that produce one
    fn snapshot(&self) -> Option<Snapshot> {
        None
    }

    /// Called when an inbound connection is added or removed
    fn on_topology_changed(&mut self) {}

    fn state(&self) -> NodeState;
}
