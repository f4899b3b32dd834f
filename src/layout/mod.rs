//! Page layout model and structure features.
//!
//! This module turns pre-computed line geometry into classifier input:
//! - [`line`]: lines, pages and documents as delivered by the layout stage
//! - [`structure`]: per-line structure tokens (type, indentation, width, font, spacing, content shape)
//! - [`window`]: sliding-window aggregation of neighbouring tokens with relative offsets

pub mod line;
pub mod structure;
pub mod window;

// Re-export main types
pub use line::{Document, Line, LineType, LineTypes, Page};
pub use structure::{annotate_document, annotate_line, StructureToken};
pub use window::{format_offset, window_bounds, window_string};
