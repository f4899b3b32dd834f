//! Partitioned naive-Bayes text classifier.
//!
//! - [`word_store`]: the persistent category → partition → word model
//! - [`partition`]: read-only scoring over a shared model snapshot
//! - [`trainer`]: the mutable training session that builds a model
//!
//! Scoring and training are split: a [`Trainer`] owns its store exclusively,
//! while a [`PartitionClassifier`] holds an `Arc` snapshot that never changes.

pub mod partition;
pub mod trainer;
pub mod word_store;

pub use partition::{PartitionClassifier, PartitionScores};
pub use trainer::Trainer;
pub use word_store::{WordProbability, WordStore, COMPRESSED_SUFFIX, SPACE_TOTALS};
