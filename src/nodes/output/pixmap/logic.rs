//! Pixmap node behavior - type binding and per-sample activation

use super::accumulator::HistogramAccumulator;
use crate::config::ImagerConfig;
use crate::constants::color::MAX_CHANNELS;
use crate::constants::pixmap::{COLOR_PAD, HEIGHT_PAD, INPUT_COUNT, POINT_PAD, WIDTH_PAD};
use crate::error::{NodeError, Result};
use crate::nodes::checker::{CompatibilityChecker, PadRequirement};
use crate::nodes::element::{Activation, Element, NodeState};
use crate::nodes::interface::PadValue;
use crate::nodes::port::PadSpec;
use crate::nodes::snapshot::Snapshot;
use crate::nodes::types::ValueType;
use log::{debug, info, warn};
use std::sync::Arc;

/// Input pads in binding order
pub const PIXMAP_PADS: [PadSpec; INPUT_COUNT] = [
    PadSpec::input("w", "width"),
    PadSpec::input("h", "height"),
    PadSpec::input("(x,y)", "point"),
    PadSpec::input("c", "color"),
];

/// Histogram imager: accumulates (point, color) samples into a buffer
/// sized by the width and height pads
#[derive(Debug)]
pub struct ImagerNode {
    config: ImagerConfig,
    checker: CompatibilityChecker,
    state: NodeState,
    resolved_types: Option<Vec<ValueType>>,
    accumulator: Arc<HistogramAccumulator>,
}

impl ImagerNode {
    /// Build a node from validated settings
    pub fn new(config: ImagerConfig) -> Result<Self> {
        config.validate()?;
        let accumulator = Arc::new(HistogramAccumulator::new(&config));
        // The color pad must carry exactly what the buffer stores.
        let checker = CompatibilityChecker::terminal(
            &PIXMAP_PADS,
            vec![
                PadRequirement::Int,
                PadRequirement::Int,
                PadRequirement::IntPair,
                PadRequirement::Color {
                    channels: accumulator.channels(),
                },
            ],
        );
        Ok(Self {
            config,
            checker,
            state: NodeState::Unresolved,
            resolved_types: None,
            accumulator,
        })
    }

    pub fn config(&self) -> &ImagerConfig {
        &self.config
    }

    /// The type-level checker, for hosts that validate before values exist
    pub fn checker(&self) -> &CompatibilityChecker {
        &self.checker
    }

    /// Input types cached from the last accepted check
    pub fn resolved_types(&self) -> Option<&[ValueType]> {
        self.resolved_types.as_deref()
    }

    /// Shared handle to the buffer so a display thread can snapshot it
    /// while this node keeps accumulating
    pub fn display_handle(&self) -> Arc<HistogramAccumulator> {
        Arc::clone(&self.accumulator)
    }

    /// Restart accumulation without changing the buffer size
    pub fn reset(&self) {
        self.accumulator.reset();
    }

    fn mark_unresolved(&mut self) {
        self.state = NodeState::Unresolved;
        self.resolved_types = None;
    }

    fn size_buffer(&self, width: i64, height: i64) -> Result<()> {
        let current = self.accumulator.dimensions();
        let unchanged = current != (0, 0)
            && usize::try_from(width).ok() == Some(current.0)
            && usize::try_from(height).ok() == Some(current.1);
        if unchanged {
            self.accumulator.reset();
            Ok(())
        } else {
            self.accumulator.resize(width, height)
        }
    }
}

impl Element for ImagerNode {
    fn pads(&self) -> &[PadSpec] {
        &PIXMAP_PADS
    }

    fn check(&mut self, inputs: &[PadValue]) -> Result<Option<Vec<ValueType>>> {
        self.mark_unresolved();

        let types: Vec<ValueType> = inputs.iter().map(PadValue::value_type).collect();
        let outputs = self.checker.check(&types).inspect_err(|e| {
            warn!("Pixmap check rejected inputs: {}", e);
        })?;

        // Both are ints once the check passes.
        let width = inputs[WIDTH_PAD].as_int().unwrap_or(0);
        let height = inputs[HEIGHT_PAD].as_int().unwrap_or(0);
        self.size_buffer(width, height).inspect_err(|e| {
            warn!("Pixmap could not size its buffer: {}", e);
        })?;

        self.resolved_types = Some(types);
        self.state = NodeState::Resolved;
        info!("Pixmap resolved at {}x{}", width, height);
        Ok(outputs)
    }

    fn activate(&mut self, inputs: &[PadValue]) -> Result<Activation> {
        if self.state == NodeState::Unresolved {
            return Ok(Activation::Idle);
        }

        let point = inputs[POINT_PAD]
            .read_point()
            .ok_or(NodeError::TypeMismatch {
                pad: POINT_PAD,
                label: PIXMAP_PADS[POINT_PAD].long_label,
                expected: PadRequirement::IntPair.expected(),
            })?;

        let mut color = [0.0f32; MAX_CHANNELS];
        let channels = self.accumulator.channels();
        if inputs[COLOR_PAD].read_color(&mut color) != Some(channels) {
            return Err(NodeError::TypeMismatch {
                pad: COLOR_PAD,
                label: PIXMAP_PADS[COLOR_PAD].long_label,
                expected: "color with the configured channel count",
            });
        }

        self.state = NodeState::Accumulating;
        Ok(self.accumulator.apply(point, &color[..channels]))
    }

    fn snapshot(&self) -> Option<Snapshot> {
        Some(self.accumulator.snapshot())
    }

    fn on_topology_changed(&mut self) {
        if self.state != NodeState::Unresolved {
            debug!("Pixmap inputs changed, awaiting a new check");
        }
        self.mark_unresolved();
    }

    fn state(&self) -> NodeState {
        self.state
    }
}
