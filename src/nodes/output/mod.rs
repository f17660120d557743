//! Output nodes for displaying results

pub mod pixmap;

pub use pixmap::PixmapNodeFactory;
