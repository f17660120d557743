//! Crate-wide constants and default values
//!
//! Centralized location for all hard-coded values to improve maintainability

/// Color channel limits
pub mod color {
    /// Largest channel count a color pad may carry
    pub const MAX_CHANNELS: usize = 4;

    /// Channel count accepted when no configuration says otherwise (RGBA)
    pub const DEFAULT_CHANNELS: usize = 4;
}

/// Histogram accumulation defaults
pub mod accumulator {
    /// Accumulation units contributed by one full-intensity channel sample
    pub const DEFAULT_HIT_SCALE: u32 = 255;

    /// Largest width or height a buffer may be resized to
    pub const DEFAULT_MAX_DIMENSION: usize = 16_384;
}

/// Pixmap node pad layout
pub mod pixmap {
    /// Width pad index
    pub const WIDTH_PAD: usize = 0;

    /// Height pad index
    pub const HEIGHT_PAD: usize = 1;

    /// Point pad index
    pub const POINT_PAD: usize = 2;

    /// Color pad index
    pub const COLOR_PAD: usize = 3;

    /// Number of input pads
    pub const INPUT_COUNT: usize = 4;
}

/// Configuration file location
pub mod config {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "histimage";

    /// Configuration file name
    pub const FILE_NAME: &str = "config.json";
}
