//! Node factory system with self-registration and static metadata
//!
//! Metadata is pure description for the host (palette placement, icon
//! lookup, tooltips); nothing in the node system branches on it.

use crate::config::Config;
use crate::error::{NodeError, Result};
use crate::nodes::element::Element;
use egui::Color32;
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};

/// Hierarchical category system for organizing nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeCategory {
    path: Vec<String>,
}

impl NodeCategory {
    /// Create a new category from path components
    pub fn new(path: &[&str]) -> Self {
        Self {
            path: path.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Get the full path as a slice
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Get the category name (last component)
    pub fn name(&self) -> &str {
        self.path.last().map(|s| s.as_str()).unwrap_or("")
    }

    /// Get the parent category
    pub fn parent(&self) -> Option<NodeCategory> {
        if self.path.len() > 1 {
            Some(NodeCategory {
                path: self.path[..self.path.len() - 1].to_vec(),
            })
        } else {
            None
        }
    }

    /// Check if this category is a child of another
    pub fn is_child_of(&self, other: &NodeCategory) -> bool {
        self.path.len() > other.path.len() && self.path[..other.path.len()] == other.path
    }

    /// Get display string for UI
    pub fn display_string(&self) -> String {
        self.path.join(" > ")
    }

    /// Standard renderers category
    pub fn renderers() -> Self {
        Self::new(&["Renderers"])
    }
}

/// Static description of a node type
#[derive(Debug, Clone)]
pub struct NodeMetadata {
    pub node_type: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub category: NodeCategory,
    /// Icon resource name, resolved by the host
    pub icon: &'static str,
    pub color: Color32,
    pub tags: Vec<&'static str>,
}

impl NodeMetadata {
    /// Create node metadata with sensible defaults
    pub fn new(
        node_type: &'static str,
        display_name: &'static str,
        category: NodeCategory,
        description: &'static str,
    ) -> Self {
        Self {
            node_type,
            display_name,
            description,
            version: "1.0",
            category,
            icon: "",
            color: Color32::from_rgb(100, 100, 100),
            tags: vec![],
        }
    }

    pub fn with_icon(mut self, icon: &'static str) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    pub fn with_tags(mut self, tags: Vec<&'static str>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_version(mut self, version: &'static str) -> Self {
        self.version = version;
        self
    }
}

/// Implemented by each node kind to describe and construct itself
pub trait NodeFactory: Send + Sync {
    /// Get node metadata
    fn metadata() -> NodeMetadata
    where
        Self: Sized;

    /// Create a node instance, rejecting settings it cannot run with
    fn create(config: &Config) -> Result<Box<dyn Element>>
    where
        Self: Sized;
}

/// Function pointer types stored by the registry
type NodeCreator = fn(&Config) -> Result<Box<dyn Element>>;
type MetadataProvider = fn() -> NodeMetadata;

/// Registry for managing node factories
pub struct NodeRegistry {
    creators: BTreeMap<String, NodeCreator>,
    metadata_providers: BTreeMap<String, MetadataProvider>,
    categories: HashMap<NodeCategory, Vec<String>>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            creators: BTreeMap::new(),
            metadata_providers: BTreeMap::new(),
            categories: HashMap::new(),
        }
    }

    /// Create a registry with all built-in nodes registered
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::nodes::register_builtin_nodes(&mut registry);
        registry
    }

    /// Register a node factory
    pub fn register<T: NodeFactory + 'static>(&mut self) {
        let metadata = T::metadata();
        let node_type = metadata.node_type.to_string();

        if self.creators.contains_key(&node_type) {
            warn!("Node type {} registered twice, keeping the latest", node_type);
            if let Some(types) = self.categories.get_mut(&metadata.category) {
                types.retain(|t| t != &node_type);
            }
        }

        self.creators.insert(node_type.clone(), T::create);
        self.metadata_providers.insert(node_type.clone(), T::metadata);

        info!(
            "Registered node type {} in {}",
            node_type,
            metadata.category.display_string()
        );
        self.categories
            .entry(metadata.category)
            .or_default()
            .push(node_type);
    }

    /// Create a node by type name
    pub fn create_node(&self, node_type: &str, config: &Config) -> Result<Box<dyn Element>> {
        let creator = self
            .creators
            .get(node_type)
            .ok_or_else(|| NodeError::UnknownNodeType(node_type.to_string()))?;
        debug!("Creating node of type {}", node_type);
        creator(config)
    }

    /// Get metadata for a node type without creating the node
    pub fn get_node_metadata(&self, node_type: &str) -> Option<NodeMetadata> {
        self.metadata_providers.get(node_type).map(|provider| provider())
    }

    /// All registered node types, sorted
    pub fn node_types(&self) -> Vec<&str> {
        self.creators.keys().map(|s| s.as_str()).collect()
    }

    /// Node types registered under a category
    pub fn nodes_in_category(&self, category: &NodeCategory) -> Vec<&str> {
        self.categories
            .get(category)
            .map(|types| types.iter().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    /// All categories with at least one node, sorted
    pub fn categories(&self) -> Vec<&NodeCategory> {
        let mut categories: Vec<_> = self.categories.keys().collect();
        categories.sort();
        categories
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
