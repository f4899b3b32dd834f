//! Text normalization for line content.
//!
//! - [`filters`]: cleanup passes applied to raw line text before pattern matching
//! - [`tokenizer`]: the stemmed, stop-word filtered token sets fed to the classifier

pub mod filters;
pub mod tokenizer;

pub use filters::{filter_all, filter_xml};
pub use tokenizer::{is_numeric_noise, Tokenizer};
