//! Host-side bookkeeping: which values sit on which pads, and when a node
//! needs re-checking
//!
//! Structural changes (binding or unbinding a pad) send the node back to
//! `Unresolved` and schedule a check before the next activation. Plain value
//! updates on an already-bound pad do not.

use crate::config::Config;
use crate::error::{NodeError, Result};
use crate::nodes::element::{Activation, Element, NodeState};
use crate::nodes::factory::NodeRegistry;
use crate::nodes::interface::PadValue;
use crate::nodes::port::{input_count, PadId};
use crate::nodes::snapshot::Snapshot;
use log::{debug, info};
use std::collections::HashMap;

/// Unique identifier for a node
pub type NodeId = usize;

/// An element together with the values the host resolved onto its inputs
pub struct HostedNode {
    node_type: String,
    element: Box<dyn Element>,
    values: Vec<PadValue>,
    bound: Vec<bool>,
    needs_check: bool,
}

impl HostedNode {
    pub fn new(node_type: impl Into<String>, element: Box<dyn Element>) -> Self {
        let inputs = input_count(element.pads());
        Self {
            node_type: node_type.into(),
            element,
            values: vec![PadValue::Integer(0); inputs],
            bound: vec![false; inputs],
            needs_check: true,
        }
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn element(&self) -> &dyn Element {
        self.element.as_ref()
    }

    pub fn state(&self) -> NodeState {
        self.element.state()
    }

    /// Bind a value source to an input pad. This is a topology change.
    pub fn connect(&mut self, pad: PadId, value: PadValue) -> Result<()> {
        self.pad_index(pad)?;
        self.values[pad] = value;
        self.bound[pad] = true;
        self.topology_changed();
        debug!("Connected pad {} on {}", pad, self.node_type);
        Ok(())
    }

    /// Unbind an input pad. This is a topology change.
    pub fn disconnect(&mut self, pad: PadId) -> Result<()> {
        self.pad_index(pad)?;
        self.bound[pad] = false;
        self.topology_changed();
        debug!("Disconnected pad {} on {}", pad, self.node_type);
        Ok(())
    }

    /// Replace the value on a bound pad without a topology change
    pub fn set_value(&mut self, pad: PadId, value: PadValue) -> Result<()> {
        *self.value_mut(pad)? = value;
        Ok(())
    }

    /// Mutable access to a bound pad's value, for in-place updates
    pub fn value_mut(&mut self, pad: PadId) -> Result<&mut PadValue> {
        self.pad_index(pad)?;
        if !self.bound[pad] {
            return Err(NodeError::UnboundPad { pad });
        }
        Ok(&mut self.values[pad])
    }

    pub fn is_fully_bound(&self) -> bool {
        self.bound.iter().all(|b| *b)
    }

    /// Run one evaluation: check first if the topology changed, then
    /// activate with the current pad values.
    pub fn tick(&mut self) -> Result<Activation> {
        if self.needs_check {
            if let Some(pad) = self.bound.iter().position(|b| !b) {
                return Err(NodeError::UnboundPad { pad });
            }
            // One attempt per topology change; a rejected node stays
            // unresolved until its inputs change again.
            self.needs_check = false;
            self.element.check(&self.values)?;
        }

        if self.element.state() == NodeState::Unresolved {
            return Err(NodeError::Unresolved);
        }
        self.element.activate(&self.values)
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.element.snapshot()
    }

    fn topology_changed(&mut self) {
        self.needs_check = true;
        self.element.on_topology_changed();
    }

    fn pad_index(&self, pad: PadId) -> Result<()> {
        if pad < self.values.len() {
            Ok(())
        } else {
            Err(NodeError::UnknownPad { pad })
        }
    }
}

/// The set of nodes a host is driving
#[derive(Default)]
pub struct NodeGraph {
    nodes: HashMap<NodeId, HostedNode>,
    next_node_id: NodeId,
}

impl NodeGraph {
    /// Creates a new empty node graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an element to the graph and returns its ID
    pub fn add_node(&mut self, node_type: &str, element: Box<dyn Element>) -> NodeId {
        let id = self.next_node_id;
        self.nodes.insert(id, HostedNode::new(node_type, element));
        self.next_node_id += 1;
        debug!("Added {} node {}", node_type, id);
        id
    }

    /// Creates a node through the registry and adds it
    pub fn create_node(
        &mut self,
        registry: &NodeRegistry,
        node_type: &str,
        config: &Config,
    ) -> Result<NodeId> {
        let element = registry.create_node(node_type, config)?;
        Ok(self.add_node(node_type, element))
    }

    /// Removes a node, releasing everything it owns
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<HostedNode> {
        let removed = self.nodes.remove(&node_id);
        if let Some(node) = &removed {
            info!("Removed {} node {}", node.node_type(), node_id);
        }
        removed
    }

    pub fn node(&self, node_id: NodeId) -> Result<&HostedNode> {
        self.nodes.get(&node_id).ok_or(NodeError::UnknownNode(node_id))
    }

    pub fn node_mut(&mut self, node_id: NodeId) -> Result<&mut HostedNode> {
        self.nodes
            .get_mut(&node_id)
            .ok_or(NodeError::UnknownNode(node_id))
    }

    /// Evaluate one node once
    pub fn tick(&mut self, node_id: NodeId) -> Result<Activation> {
        self.node_mut(node_id)?.tick()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
