//! Static type compatibility checking for node inputs
//!
//! A checker holds one [`PadRequirement`] per input pad and validates the
//! types the host currently sees on those pads. It runs once per topology
//! change, never per sample.

use crate::error::{NodeError, Result};
use crate::nodes::port::PadSpec;
use crate::nodes::types::ValueType;
use log::debug;

/// Constraint a single input pad places on its connected type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadRequirement {
    /// Integer scalar
    Int,
    /// Rank-1 integer matrix of shape [2]
    IntPair,
    /// Color of exactly `channels` samples, or a rank-1 float matrix of
    /// that length
    Color { channels: usize },
}

impl PadRequirement {
    /// Whether `t` satisfies this requirement
    pub fn accepts(&self, t: &ValueType) -> bool {
        match self {
            PadRequirement::Int => t.is_int(),
            PadRequirement::IntPair => {
                t.is_matrix()
                    && t.matrix_rank() == 1
                    && t.matrix_shape().map(|shape| shape[0]) == Some(2)
                    && t.matrix_element_type().is_some_and(ValueType::is_int)
            }
            PadRequirement::Color { channels } => {
                t.color_channels() == Some(*channels)
                    || (t.is_vector_of(*channels)
                        && t.matrix_element_type().is_some_and(ValueType::is_float))
            }
        }
    }

    /// Short description used in mismatch errors
    pub fn expected(&self) -> &'static str {
        match self {
            PadRequirement::Int => "int",
            PadRequirement::IntPair => "matrix<int>[2]",
            PadRequirement::Color { .. } => "color with the configured channel count",
        }
    }
}

/// Validates candidate input types against a node's pad requirements
#[derive(Debug, Clone)]
pub struct CompatibilityChecker {
    labels: Vec<&'static str>,
    requirements: Vec<PadRequirement>,
    outputs: Option<Vec<ValueType>>,
}

impl CompatibilityChecker {
    /// Build a checker for a terminal node; accepted checks produce no
    /// output types.
    ///
    /// `pads` are the node's input pads, in binding order.
    pub fn terminal(pads: &[PadSpec], requirements: Vec<PadRequirement>) -> Self {
        assert_eq!(
            pads.len(),
            requirements.len(),
            "every input pad needs exactly one requirement"
        );
        Self {
            labels: pads.iter().map(|pad| pad.long_label).collect(),
            requirements,
            outputs: None,
        }
    }

    /// Declare the output types an accepted check produces
    pub fn with_outputs(mut self, outputs: Vec<ValueType>) -> Self {
        self.outputs = Some(outputs);
        self
    }

    /// Number of input types `check` expects
    pub fn arity(&self) -> usize {
        self.requirements.len()
    }

    pub fn requirements(&self) -> &[PadRequirement] {
        &self.requirements
    }

    /// Check `inputs` against every requirement in pad order.
    ///
    /// Returns the output types on acceptance (`None` for terminal nodes)
    /// and a [`NodeError::TypeMismatch`] naming the first failing pad on
    /// rejection.
    ///
    /// # Panics
    ///
    /// Panics if `inputs` does not have one type per input pad; that is a
    /// bug in the host integration, not a recoverable rejection.
    pub fn check(&self, inputs: &[ValueType]) -> Result<Option<Vec<ValueType>>> {
        assert_eq!(
            inputs.len(),
            self.requirements.len(),
            "check called with {} input types for {} pads",
            inputs.len(),
            self.requirements.len()
        );

        for (pad, (requirement, t)) in self.requirements.iter().zip(inputs).enumerate() {
            if !requirement.accepts(t) {
                debug!("Pad {} ({}) rejected type {}", pad, self.labels[pad], t);
                return Err(NodeError::TypeMismatch {
                    pad,
                    label: self.labels[pad],
                    expected: requirement.expected(),
                });
            }
        }

        Ok(self.outputs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::interface::{MatrixData, PadValue};
    use proptest::prelude::*;

    fn pads() -> Vec<PadSpec> {
        vec![
            PadSpec::input("w", "width"),
            PadSpec::input("h", "height"),
            PadSpec::input("(x,y)", "point"),
            PadSpec::input("c", "color"),
        ]
    }

    fn scalar() -> impl Strategy<Value = ValueType> {
        prop_oneof![Just(ValueType::Integer), Just(ValueType::Float)]
    }

    fn any_value_type() -> impl Strategy<Value = ValueType> {
        prop_oneof![
            scalar(),
            (1usize..=5).prop_map(ValueType::color),
            (scalar(), prop::collection::vec(1usize..=4, 1..=2))
                .prop_map(|(element, shape)| ValueType::matrix(element, &shape).unwrap()),
        ]
    }

    fn checker() -> CompatibilityChecker {
        CompatibilityChecker::terminal(
            &pads(),
            vec![
                PadRequirement::Int,
                PadRequirement::Int,
                PadRequirement::IntPair,
                PadRequirement::Color { channels: 4 },
            ],
        )
    }

    fn valid() -> [ValueType; 4] {
        [
            ValueType::Integer,
            ValueType::Integer,
            ValueType::point2i(),
            ValueType::color(4),
        ]
    }

    fn invalid() -> [ValueType; 4] {
        [
            ValueType::Float,
            ValueType::matrix(ValueType::Integer, &[1]).unwrap(),
            ValueType::matrix(ValueType::Float, &[2]).unwrap(),
            ValueType::Integer,
        ]
    }

    #[test]
    fn test_accepts_valid_inputs() {
        let result = checker().check(&valid()).unwrap();
        assert!(result.is_none(), "terminal nodes produce no output types");
    }

    #[test]
    fn test_all_sixteen_combinations() {
        let checker = checker();
        for mask in 0u8..16 {
            let inputs: Vec<ValueType> = (0..4)
                .map(|i| {
                    if mask & (1 << i) != 0 {
                        valid()[i].clone()
                    } else {
                        invalid()[i].clone()
                    }
                })
                .collect();
            let accepted = checker.check(&inputs).is_ok();
            assert_eq!(accepted, mask == 0b1111, "mask {:04b}", mask);
        }
    }

    #[test]
    fn test_each_rejection_cause_in_isolation() {
        let checker = checker();
        for pad in 0..4 {
            let mut inputs = valid().to_vec();
            inputs[pad] = invalid()[pad].clone();
            match checker.check(&inputs) {
                Err(NodeError::TypeMismatch { pad: failed, .. }) => assert_eq!(failed, pad),
                other => panic!("pad {}: expected mismatch, got {:?}", pad, other),
            }
        }
    }

    #[test]
    fn test_width_or_height_rejects_regardless_of_rest() {
        let checker = checker();
        let mut inputs = invalid().to_vec();
        inputs[1] = ValueType::Integer;
        assert!(checker.check(&inputs).is_err());

        let mut inputs = valid().to_vec();
        inputs[1] = ValueType::Float;
        assert!(checker.check(&inputs).is_err());
    }

    #[test]
    fn test_point_variants() {
        let req = PadRequirement::IntPair;
        assert!(req.accepts(&ValueType::point2i()));
        assert!(!req.accepts(&ValueType::matrix(ValueType::Integer, &[3]).unwrap()));
        assert!(!req.accepts(&ValueType::matrix(ValueType::Integer, &[2, 1]).unwrap()));
        assert!(!req.accepts(&ValueType::Integer));
    }

    #[test]
    fn test_color_variants() {
        let req = PadRequirement::Color { channels: 3 };
        assert!(req.accepts(&ValueType::color(3)));
        assert!(!req.accepts(&ValueType::color(4)));
        assert!(req.accepts(&ValueType::matrix(ValueType::Float, &[3]).unwrap()));
        assert!(!req.accepts(&ValueType::matrix(ValueType::Integer, &[3]).unwrap()));
        assert!(!req.accepts(&ValueType::matrix(ValueType::Float, &[3, 1]).unwrap()));
        assert!(!req.accepts(&ValueType::Float));
    }

    #[test]
    fn test_value_types_from_pad_values() {
        let values = [
            PadValue::Integer(64),
            PadValue::Integer(48),
            PadValue::point(3, 4),
            PadValue::Matrix {
                shape: vec![4],
                data: MatrixData::Float(vec![1.0, 1.0, 1.0, 1.0]),
            },
        ];
        let types: Vec<ValueType> = values.iter().map(PadValue::value_type).collect();
        assert!(checker().check(&types).is_ok());
    }

    #[test]
    fn test_declared_outputs_returned() {
        let checker = CompatibilityChecker::terminal(
            &[PadSpec::input("a", "a")],
            vec![PadRequirement::Int],
        )
        .with_outputs(vec![ValueType::Float]);
        assert_eq!(
            checker.check(&[ValueType::Integer]).unwrap(),
            Some(vec![ValueType::Float])
        );
    }

    #[test]
    #[should_panic(expected = "check called with 3 input types for 4 pads")]
    fn test_wrong_arity_panics() {
        let _ = checker().check(&valid()[..3]);
    }

    proptest! {
        #[test]
        fn check_agrees_with_first_failing_requirement(
            inputs in prop::collection::vec(any_value_type(), 4),
        ) {
            let checker = checker();
            prop_assert_eq!(checker.arity(), inputs.len());
            let first_failure = checker
                .requirements()
                .iter()
                .zip(&inputs)
                .position(|(req, t)| !req.accepts(t));
            match (checker.check(&inputs), first_failure) {
                (Ok(_), None) => {}
                (Err(NodeError::TypeMismatch { pad, .. }), Some(expected)) => {
                    prop_assert_eq!(pad, expected)
                }
                (result, expected) => {
                    prop_assert!(false, "got {:?}, first failing pad {:?}", result, expected)
                }
            }
        }

        #[test]
        fn non_int_dimension_always_rejects(
            rest in prop::collection::vec(any_value_type(), 4),
            on_height in any::<bool>(),
        ) {
            prop_assume!(!rest[usize::from(on_height)].is_int());
            let mut inputs = rest.clone();
            if on_height {
                inputs[0] = ValueType::Integer;
            }
            let result = checker().check(&inputs);
            let rejected = matches!(
                result,
                Err(NodeError::TypeMismatch { pad, .. }) if pad == usize::from(on_height)
            );
            prop_assert!(rejected);
        }
    }
}
