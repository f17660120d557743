//! Normalized, read-only views of an accumulation buffer

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Mapping from accumulated values to the displayable [0, 1] range
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Normalization {
    /// `v / max`, so an empty cell stays background and counts keep their
    /// ratios
    #[default]
    Linear,
    /// `ln(1 + v) / ln(1 + max)`, compresses dense regions
    Log,
    /// `v / scale`, clipped at 1
    Fixed { scale: f32 },
}

/// 8-bit RGBA pixel, laid out for direct upload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Buffer contents mapped to [0, 1] per channel
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    width: usize,
    height: usize,
    channels: usize,
    values: Vec<f32>,
}

impl Snapshot {
    /// Normalize raw accumulation values laid out row-major, `channels`
    /// values per cell
    pub fn from_raw(
        width: usize,
        height: usize,
        channels: usize,
        raw: &[u32],
        normalization: Normalization,
    ) -> Self {
        let values = match normalization {
            Normalization::Linear => {
                let max = raw.iter().copied().max().unwrap_or(0) as f64;
                if max > 0.0 {
                    raw.iter().map(|v| (*v as f64 / max) as f32).collect()
                } else {
                    vec![0.0; raw.len()]
                }
            }
            Normalization::Log => {
                let max = raw.iter().copied().max().unwrap_or(0) as f64;
                if max > 0.0 {
                    let denom = max.ln_1p();
                    raw.iter().map(|v| ((*v as f64).ln_1p() / denom) as f32).collect()
                } else {
                    vec![0.0; raw.len()]
                }
            }
            Normalization::Fixed { scale } if scale.is_finite() && scale > 0.0 => {
                let scale = scale as f64;
                raw.iter()
                    .map(|v| (*v as f64 / scale).min(1.0) as f32)
                    .collect()
            }
            // Rejected by config validation; an unusable scale shows nothing.
            Normalization::Fixed { .. } => vec![0.0; raw.len()],
        };

        Self {
            width,
            height,
            channels,
            values,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// All normalized values, row-major, `channels` per cell
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Normalized channels of one cell
    pub fn cell(&self, x: usize, y: usize) -> Option<&[f32]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let base = (y * self.width + x) * self.channels;
        Some(&self.values[base..base + self.channels])
    }

    /// True when every cell reads as background (zero)
    pub fn is_background(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    /// Convert to display pixels.
    ///
    /// One channel renders as gray, two as gray plus alpha, three as RGB
    /// and four as RGBA. Missing alpha is opaque.
    pub fn to_rgba8(&self) -> Vec<Rgba8> {
        if self.channels == 0 {
            return vec![Rgba8::zeroed(); self.width * self.height];
        }
        self.values
            .chunks_exact(self.channels)
            .map(|c| match *c {
                [v] => Rgba8 {
                    r: to_u8(v),
                    g: to_u8(v),
                    b: to_u8(v),
                    a: u8::MAX,
                },
                [v, a] => Rgba8 {
                    r: to_u8(v),
                    g: to_u8(v),
                    b: to_u8(v),
                    a: to_u8(a),
                },
                [r, g, b] => Rgba8 {
                    r: to_u8(r),
                    g: to_u8(g),
                    b: to_u8(b),
                    a: u8::MAX,
                },
                [r, g, b, a, ..] => Rgba8 {
                    r: to_u8(r),
                    g: to_u8(g),
                    b: to_u8(b),
                    a: to_u8(a),
                },
                [] => Rgba8::zeroed(),
            })
            .collect()
    }

    /// Pixels as a flat RGBA byte buffer
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.to_rgba8()).to_vec()
    }

    /// Image ready to hand to an egui texture
    pub fn to_color_image(&self) -> egui::ColorImage {
        let pixels = self.to_rgba8();
        egui::ColorImage::from_rgba_unmultiplied(
            [self.width, self.height],
            bytemuck::cast_slice(&pixels),
        )
    }
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scales_by_max() {
        let snap = Snapshot::from_raw(3, 1, 1, &[0, 15, 30], Normalization::Linear);
        assert_eq!(snap.values(), &[0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_linear_flat_buffer_is_lit() {
        let snap = Snapshot::from_raw(2, 2, 1, &[7, 7, 7, 7], Normalization::Linear);
        assert_eq!(snap.values(), &[1.0; 4]);
        assert!(!snap.is_background());

        let empty = Snapshot::from_raw(2, 2, 1, &[0; 4], Normalization::Linear);
        assert!(empty.is_background());
    }

    #[test]
    fn test_log_compression() {
        let snap = Snapshot::from_raw(3, 1, 1, &[0, 9, 99], Normalization::Log);
        let v = snap.values();
        assert_eq!(v[0], 0.0);
        assert!((v[1] - 0.5).abs() < 1e-6);
        assert_eq!(v[2], 1.0);
    }

    #[test]
    fn test_fixed_scale_clips() {
        let snap = Snapshot::from_raw(3, 1, 1, &[0, 50, 500], Normalization::Fixed { scale: 100.0 });
        assert_eq!(snap.values(), &[0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_unusable_fixed_scale_is_background() {
        for scale in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let snap = Snapshot::from_raw(2, 1, 1, &[0, 40], Normalization::Fixed { scale });
            assert!(snap.is_background(), "scale {}", scale);
            assert!(snap.values().iter().all(|v| !v.is_nan()));
        }
    }

    #[test]
    fn test_cell_bounds() {
        let snap = Snapshot::from_raw(2, 2, 2, &[0; 8], Normalization::Linear);
        assert_eq!(snap.cell(1, 1), Some(&[0.0, 0.0][..]));
        assert_eq!(snap.cell(2, 0), None);
    }

    #[test]
    fn test_channel_mapping() {
        let scale = Normalization::Fixed { scale: 255.0 };
        let gray = Snapshot::from_raw(1, 1, 1, &[255], scale).to_rgba8();
        assert_eq!(gray[0], Rgba8 { r: 255, g: 255, b: 255, a: 255 });

        let rgb = Snapshot::from_raw(1, 1, 3, &[255, 0, 51], scale).to_rgba8();
        assert_eq!(rgb[0], Rgba8 { r: 255, g: 0, b: 51, a: 255 });

        let rgba = Snapshot::from_raw(1, 1, 4, &[0, 255, 0, 102], scale).to_rgba8();
        assert_eq!(rgba[0], Rgba8 { r: 0, g: 255, b: 0, a: 102 });
    }

    #[test]
    fn test_byte_layout() {
        let snap = Snapshot::from_raw(2, 1, 3, &[255, 0, 0, 0, 0, 255], Normalization::Fixed { scale: 255.0 });
        assert_eq!(snap.to_rgba_bytes(), vec![255, 0, 0, 255, 0, 0, 255, 255]);
    }

    #[test]
    fn test_color_image_size() {
        let snap = Snapshot::from_raw(3, 2, 4, &[0; 24], Normalization::Linear);
        let image = snap.to_color_image();
        assert_eq!(image.size, [3, 2]);
        assert_eq!(image.pixels.len(), 6);
    }
}
