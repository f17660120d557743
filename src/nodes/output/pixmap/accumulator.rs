//! Histogram accumulation buffer
//!
//! Cells are stored as one `AtomicU32` per channel. `apply` only needs a
//! shared lock, so a display thread can take snapshots while samples keep
//! landing; a snapshot taken mid-update may see some channels of a cell
//! before the others, which is invisible at histogram sample rates.
//! `resize` and `reset` take the lock exclusively since they change what
//! the cells mean.

use crate::config::ImagerConfig;
use crate::constants::color::MAX_CHANNELS;
use crate::error::{NodeError, Result};
use crate::nodes::element::Activation;
use crate::nodes::snapshot::{Normalization, Snapshot};
use glam::IVec2;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Rule for combining a sample with the cell it lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccumulationPolicy {
    /// Add the sample to the cell, saturating at `u32::MAX`
    #[default]
    Additive,
    /// Keep the per-channel maximum of everything that landed on the cell
    MaxHold,
    /// Overwrite the cell with the latest sample
    ReplaceLatest,
}

/// Sample counters since the last resize or reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccumulatorStats {
    pub applied: u64,
    pub dropped: u64,
}

struct Grid {
    width: usize,
    height: usize,
    cells: Vec<AtomicU32>,
}

impl Grid {
    fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
        }
    }
}

/// Owns the histogram buffer and applies samples to it
pub struct HistogramAccumulator {
    grid: RwLock<Grid>,
    channels: usize,
    policy: AccumulationPolicy,
    normalization: Normalization,
    hit_scale: u32,
    max_dimension: usize,
    applied: AtomicU64,
    dropped: AtomicU64,
}

impl HistogramAccumulator {
    /// Create an accumulator with no buffer; call [`resize`](Self::resize)
    /// before applying samples.
    pub fn new(config: &ImagerConfig) -> Self {
        Self {
            grid: RwLock::new(Grid::empty()),
            channels: config.channels.clamp(1, MAX_CHANNELS),
            policy: config.policy,
            normalization: config.normalization,
            hit_scale: config.hit_scale,
            max_dimension: config.max_dimension,
            applied: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn policy(&self) -> AccumulationPolicy {
        self.policy
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    /// Current buffer size as (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        let grid = self.grid.read().unwrap_or_else(PoisonError::into_inner);
        (grid.width, grid.height)
    }

    /// Reallocate the buffer, discarding everything accumulated so far
    pub fn resize(&self, width: i64, height: i64) -> Result<()> {
        let invalid = || NodeError::InvalidDimension { width, height };
        if width <= 0 || height <= 0 {
            return Err(invalid());
        }
        let w = usize::try_from(width).map_err(|_| invalid())?;
        let h = usize::try_from(height).map_err(|_| invalid())?;
        if w > self.max_dimension || h > self.max_dimension {
            return Err(invalid());
        }
        let len = w
            .checked_mul(h)
            .and_then(|n| n.checked_mul(self.channels))
            .ok_or_else(invalid)?;

        let cells = (0..len).map(|_| AtomicU32::new(0)).collect();
        {
            let mut grid = self.grid.write().unwrap_or_else(PoisonError::into_inner);
            *grid = Grid {
                width: w,
                height: h,
                cells,
            };
        }
        self.clear_stats();
        info!("Resized histogram buffer to {}x{} ({} channels)", w, h, self.channels);
        Ok(())
    }

    /// Zero every cell without reallocating
    pub fn reset(&self) {
        {
            let mut grid = self.grid.write().unwrap_or_else(PoisonError::into_inner);
            for cell in grid.cells.iter_mut() {
                *cell.get_mut() = 0;
            }
        }
        self.clear_stats();
        debug!("Reset histogram buffer");
    }

    /// Apply one sample.
    ///
    /// Points outside `[0, width) x [0, height)` are dropped silently.
    /// Missing color channels contribute nothing. This never allocates.
    pub fn apply(&self, point: IVec2, color: &[f32]) -> Activation {
        let grid = self.grid.read().unwrap_or_else(PoisonError::into_inner);

        let in_bounds = point.x >= 0
            && point.y >= 0
            && (point.x as usize) < grid.width
            && (point.y as usize) < grid.height;
        if !in_bounds {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return Activation::Dropped;
        }

        let base = (point.y as usize * grid.width + point.x as usize) * self.channels;
        let cell = &grid.cells[base..base + self.channels];
        for (ch, slot) in cell.iter().enumerate() {
            let units = self.units(color.get(ch).copied().unwrap_or(0.0));
            match self.policy {
                AccumulationPolicy::Additive => {
                    if units > 0 {
                        // The closure always returns Some, so this cannot fail.
                        let _ = slot.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
                            Some(v.saturating_add(units))
                        });
                    }
                }
                AccumulationPolicy::MaxHold => {
                    slot.fetch_max(units, Ordering::Relaxed);
                }
                AccumulationPolicy::ReplaceLatest => {
                    slot.store(units, Ordering::Relaxed);
                }
            }
        }

        self.applied.fetch_add(1, Ordering::Relaxed);
        Activation::Applied
    }

    /// Unnormalized channel values of one cell; unused channels read 0
    pub fn raw_cell(&self, x: usize, y: usize) -> Option<[u32; MAX_CHANNELS]> {
        let grid = self.grid.read().unwrap_or_else(PoisonError::into_inner);
        if x >= grid.width || y >= grid.height {
            return None;
        }
        let base = (y * grid.width + x) * self.channels;
        let mut out = [0; MAX_CHANNELS];
        for (ch, slot) in grid.cells[base..base + self.channels].iter().enumerate() {
            out[ch] = slot.load(Ordering::Relaxed);
        }
        Some(out)
    }

    /// Normalized copy of the buffer. Leaves accumulation state untouched.
    pub fn snapshot(&self) -> Snapshot {
        let (width, height, raw) = {
            let grid = self.grid.read().unwrap_or_else(PoisonError::into_inner);
            let raw: Vec<u32> = grid
                .cells
                .iter()
                .map(|cell| cell.load(Ordering::Relaxed))
                .collect();
            (grid.width, grid.height, raw)
        };
        Snapshot::from_raw(width, height, self.channels, &raw, self.normalization)
    }

    pub fn stats(&self) -> AccumulatorStats {
        AccumulatorStats {
            applied: self.applied.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }

    fn clear_stats(&self) {
        self.applied.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Accumulation units for one channel sample in [0, 1]; NaN and
    /// negatives contribute nothing
    fn units(&self, sample: f32) -> u32 {
        if !(sample > 0.0) {
            return 0;
        }
        (sample.min(1.0) * self.hit_scale as f32).round() as u32
    }
}

impl std::fmt::Debug for HistogramAccumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (width, height) = self.dimensions();
        f.debug_struct("HistogramAccumulator")
            .field("width", &width)
            .field("height", &height)
            .field("channels", &self.channels)
            .field("policy", &self.policy)
            .field("normalization", &self.normalization)
            .finish()
    }
}
