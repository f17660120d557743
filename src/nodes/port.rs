//! Pad declarations for node inputs and outputs

use serde::{Deserialize, Serialize};

/// Index of a pad within its node's input or output list
pub type PadId = usize;

/// Direction of a pad (input or output)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PadDirection {
    Input,
    Output,
}

/// A named slot on a node
///
/// The short label is what the editor draws on the pad itself, the long
/// label is shown in tooltips and error messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PadSpec {
    pub short_label: &'static str,
    pub long_label: &'static str,
    pub direction: PadDirection,
}

impl PadSpec {
    /// Creates an input pad
    pub const fn input(short_label: &'static str, long_label: &'static str) -> Self {
        Self {
            short_label,
            long_label,
            direction: PadDirection::Input,
        }
    }

    /// Creates an output pad
    pub const fn output(short_label: &'static str, long_label: &'static str) -> Self {
        Self {
            short_label,
            long_label,
            direction: PadDirection::Output,
        }
    }

    /// Checks if this pad is an input
    pub fn is_input(&self) -> bool {
        matches!(self.direction, PadDirection::Input)
    }

    /// Checks if this pad is an output
    pub fn is_output(&self) -> bool {
        matches!(self.direction, PadDirection::Output)
    }
}

/// Number of input pads in a declaration list
pub fn input_count(pads: &[PadSpec]) -> usize {
    pads.iter().filter(|pad| pad.is_input()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_direction() {
        let pad = PadSpec::input("w", "width");
        assert!(pad.is_input());
        assert!(!pad.is_output());
        assert!(PadSpec::output("img", "image").is_output());
    }

    #[test]
    fn test_input_count() {
        let pads = [
            PadSpec::input("a", "first"),
            PadSpec::output("r", "result"),
            PadSpec::input("b", "second"),
        ];
        assert_eq!(input_count(&pads), 2);
    }
}
