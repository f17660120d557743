//! Value types carried on pads and the predicates used to validate them
//!
//! Connections are type-erased at the edge, so every node re-validates the
//! types it actually receives whenever the topology changes. The accessors
//! here are total: asking a scalar for its matrix shape yields `None`
//! rather than failing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag for a value flowing through a pad
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// Signed integer scalar
    Integer,
    /// Floating point scalar
    Float,
    /// Matrix of `element` values; rank is the length of `shape`
    Matrix {
        element: Box<ValueType>,
        shape: Vec<usize>,
    },
    /// Fixed-width color with `channels` samples
    Color { channels: usize },
}

impl ValueType {
    /// Build a matrix type, rejecting empty shapes and zero-sized dimensions
    pub fn matrix(element: ValueType, shape: &[usize]) -> Option<Self> {
        if shape.is_empty() || shape.contains(&0) {
            return None;
        }
        Some(ValueType::Matrix {
            element: Box::new(element),
            shape: shape.to_vec(),
        })
    }

    /// Integer pair, the type of a point on the image plane
    pub fn point2i() -> Self {
        ValueType::Matrix {
            element: Box::new(ValueType::Integer),
            shape: vec![2],
        }
    }

    /// Color with the given channel count
    pub fn color(channels: usize) -> Self {
        ValueType::Color { channels }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, ValueType::Integer)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ValueType::Float)
    }

    pub fn is_matrix(&self) -> bool {
        matches!(self, ValueType::Matrix { .. })
    }

    pub fn is_color(&self) -> bool {
        matches!(self, ValueType::Color { .. })
    }

    /// Matrix rank, or 0 for non-matrix types
    pub fn matrix_rank(&self) -> usize {
        self.matrix_shape().map_or(0, |shape| shape.len())
    }

    /// Matrix dimension sizes, or `None` for non-matrix types
    pub fn matrix_shape(&self) -> Option<&[usize]> {
        match self {
            ValueType::Matrix { shape, .. } => Some(shape),
            _ => None,
        }
    }

    /// Matrix element type, or `None` for non-matrix types
    pub fn matrix_element_type(&self) -> Option<&ValueType> {
        match self {
            ValueType::Matrix { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Channel count of a color type, or `None` for anything else
    pub fn color_channels(&self) -> Option<usize> {
        match self {
            ValueType::Color { channels } => Some(*channels),
            _ => None,
        }
    }

    /// Whether this is a rank-1 matrix of exactly `len` elements
    pub fn is_vector_of(&self, len: usize) -> bool {
        self.matrix_shape() == Some(&[len][..])
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Integer => write!(f, "int"),
            ValueType::Float => write!(f, "float"),
            ValueType::Matrix { element, shape } => {
                write!(f, "matrix<{}>", element)?;
                for dim in shape {
                    write!(f, "[{}]", dim)?;
                }
                Ok(())
            }
            ValueType::Color { channels } => write!(f, "color{}", channels),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_predicates() {
        assert!(ValueType::Integer.is_int());
        assert!(!ValueType::Float.is_int());
        assert!(ValueType::Float.is_float());
        assert!(!ValueType::Integer.is_matrix());
        assert_eq!(ValueType::Integer.matrix_rank(), 0);
        assert_eq!(ValueType::Integer.matrix_shape(), None);
        assert_eq!(ValueType::Color { channels: 4 }.matrix_element_type(), None);
    }

    #[test]
    fn test_matrix_accessors() {
        let m = ValueType::matrix(ValueType::Float, &[3, 4]).unwrap();
        assert!(m.is_matrix());
        assert_eq!(m.matrix_rank(), 2);
        assert_eq!(m.matrix_shape(), Some(&[3, 4][..]));
        assert_eq!(m.matrix_element_type(), Some(&ValueType::Float));
        assert!(!m.is_vector_of(3));
    }

    #[test]
    fn test_matrix_shape_must_be_positive() {
        assert!(ValueType::matrix(ValueType::Integer, &[]).is_none());
        assert!(ValueType::matrix(ValueType::Integer, &[2, 0]).is_none());
    }

    #[test]
    fn test_point_type() {
        let p = ValueType::point2i();
        assert!(p.is_vector_of(2));
        assert!(p.matrix_element_type().unwrap().is_int());
        assert_eq!(p, ValueType::matrix(ValueType::Integer, &[2]).unwrap());
    }

    #[test]
    fn test_display() {
        assert_eq!(ValueType::point2i().to_string(), "matrix<int>[2]");
        assert_eq!(ValueType::color(3).to_string(), "color3");
        let nested = ValueType::matrix(ValueType::point2i(), &[5]).unwrap();
        assert_eq!(nested.to_string(), "matrix<matrix<int>[2]>[5]");
    }
}
