//! Pixmap node implementation
//!
//! - mod.rs: Node metadata and factory implementation
//! - logic.rs: Type binding and per-sample activation
//! - accumulator.rs: The histogram buffer

mod accumulator;
mod logic;

pub use accumulator::{AccumulationPolicy, AccumulatorStats, HistogramAccumulator};
pub use logic::{ImagerNode, PIXMAP_PADS};

use crate::config::Config;
use crate::error::Result;
use crate::nodes::element::Element;
use crate::nodes::{NodeCategory, NodeFactory, NodeMetadata};
use egui::Color32;

/// Histogram imager that renders accumulated samples as an image
#[derive(Default)]
pub struct PixmapNodeFactory;

impl NodeFactory for PixmapNodeFactory {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            "Pixmap",
            "Pixmap",
            NodeCategory::renderers(),
            "Simple pixmap image",
        )
        .with_icon("Pixmap.png")
        .with_color(Color32::from_rgb(65, 45, 45))
        .with_tags(vec!["output", "image", "histogram", "render"])
    }

    fn create(config: &Config) -> Result<Box<dyn Element>> {
        Ok(Box::new(ImagerNode::new(config.imager.clone())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::element::NodeState;

    #[test]
    fn test_pixmap_node_metadata() {
        let metadata = PixmapNodeFactory::metadata();
        assert_eq!(metadata.node_type, "Pixmap");
        assert_eq!(metadata.category.name(), "Renderers");
        assert_eq!(metadata.description, "Simple pixmap image");
        assert_eq!(metadata.icon, "Pixmap.png");
        assert_eq!(metadata.version, "1.0");
    }

    #[test]
    fn test_pixmap_creation_validates_config() {
        let mut config = Config::default();
        config.imager.hit_scale = 0;
        assert!(PixmapNodeFactory::create(&config).is_err());
    }

    #[test]
    fn test_pixmap_node_creation() {
        let node = PixmapNodeFactory::create(&Config::default()).unwrap();
        let labels: Vec<_> = node.pads().iter().map(|pad| pad.short_label).collect();
        assert_eq!(labels, vec!["w", "h", "(x,y)", "c"]);
        assert!(node.pads().iter().all(|pad| pad.is_input()));
        assert_eq!(node.state(), NodeState::Unresolved);
    }
}
