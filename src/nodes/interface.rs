//! Concrete values the host resolves onto input pads

use crate::constants::color::MAX_CHANNELS;
use crate::nodes::types::ValueType;
use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Element storage for a matrix value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatrixData {
    Integer(Vec<i64>),
    Float(Vec<f64>),
}

impl MatrixData {
    pub fn len(&self) -> usize {
        match self {
            MatrixData::Integer(v) => v.len(),
            MatrixData::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn element_type(&self) -> ValueType {
        match self {
            MatrixData::Integer(_) => ValueType::Integer,
            MatrixData::Float(_) => ValueType::Float,
        }
    }
}

/// Data that flows from the host onto a pad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PadValue {
    Integer(i64),
    Float(f64),
    /// Row-major matrix; `shape` product must equal the data length
    Matrix { shape: Vec<usize>, data: MatrixData },
    /// Channel samples in [0, 1]
    Color(Vec<f32>),
}

impl PadValue {
    /// Integer pair value
    pub fn point(x: i64, y: i64) -> Self {
        PadValue::Matrix {
            shape: vec![2],
            data: MatrixData::Integer(vec![x, y]),
        }
    }

    /// Type tag of this value, as seen by a compatibility check
    pub fn value_type(&self) -> ValueType {
        match self {
            PadValue::Integer(_) => ValueType::Integer,
            PadValue::Float(_) => ValueType::Float,
            PadValue::Matrix { shape, data } => ValueType::Matrix {
                element: Box::new(data.element_type()),
                shape: shape.clone(),
            },
            PadValue::Color(channels) => ValueType::Color {
                channels: channels.len(),
            },
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PadValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Read an integer pair as an image-plane point.
    ///
    /// Coordinates beyond the `i32` range saturate, which keeps them outside
    /// any buffer instead of wrapping back inside it.
    pub fn read_point(&self) -> Option<IVec2> {
        match self {
            PadValue::Matrix {
                shape,
                data: MatrixData::Integer(v),
            } if shape.as_slice() == [2] && v.len() == 2 => {
                Some(IVec2::new(saturate_i32(v[0]), saturate_i32(v[1])))
            }
            _ => None,
        }
    }

    /// Overwrite an integer pair in place. Returns false if this value is
    /// not an integer pair.
    pub fn set_point(&mut self, x: i64, y: i64) -> bool {
        match self {
            PadValue::Matrix {
                shape,
                data: MatrixData::Integer(v),
            } if shape.as_slice() == [2] && v.len() == 2 => {
                v[0] = x;
                v[1] = y;
                true
            }
            _ => false,
        }
    }

    /// Copy color channels into `out`, returning how many were present.
    ///
    /// Accepts a color value or a rank-1 float matrix. Channels beyond
    /// [`MAX_CHANNELS`] are ignored.
    pub fn read_color(&self, out: &mut [f32; MAX_CHANNELS]) -> Option<usize> {
        match self {
            PadValue::Color(channels) => {
                let n = channels.len().min(MAX_CHANNELS);
                out[..n].copy_from_slice(&channels[..n]);
                Some(channels.len())
            }
            PadValue::Matrix {
                shape,
                data: MatrixData::Float(v),
            } if shape.len() == 1 => {
                for (slot, sample) in out.iter_mut().zip(v.iter()) {
                    *slot = *sample as f32;
                }
                Some(v.len())
            }
            _ => None,
        }
    }
}

fn saturate_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
