//! Partitioned naive-Bayes scoring.
//!
//! Every partition of a category is scored independently against the same
//! token set. A partition score is the posterior
//!
//! ```text
//! P(Bi|E) = P(E|Bi)·P(Bi) / (P(E|Bi)·P(Bi) + P(E|¬Bi)·P(¬Bi))
//! ```
//!
//! where `P(E|Bi)` is the product of the stored probabilities of the matched
//! tokens and `P(E|¬Bi)` the product of their complements. Tokens with no
//! entry in the partition contribute a small floor probability scaled by the
//! category size.

use crate::classifier::word_store::{WordStore, NEUTRAL_PROBABILITY, SPACE_TOTALS};
use crate::error::{Error, Result};
use crate::text::Tokenizer;
use std::sync::Arc;

/// Evidence weight of a token the partition has never seen, before scaling.
const UNMATCHED_EVIDENCE: f64 = 0.001;

/// Scores of every candidate partition for one input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionScores {
    scores: Vec<(String, f64)>,
}

impl PartitionScores {
    /// Record the score of a partition.
    pub fn set_score(&mut self, partition: impl Into<String>, score: f64) {
        let partition = partition.into();
        match self.scores.iter_mut().find(|(p, _)| *p == partition) {
            Some(entry) => entry.1 = score,
            None => self.scores.push((partition, score)),
        }
    }

    /// Score of one partition, if it was scored.
    pub fn score(&self, partition: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|(p, _)| p == partition)
            .map(|(_, s)| *s)
    }

    /// Partition with the strictly greatest score.
    ///
    /// Partitions are visited in insertion order and the leader is only replaced
    /// by a strictly greater score, so ties go to the first partition visited.
    /// Returns `None` when no score exceeds zero.
    pub fn max_score_partition(&self) -> Option<&str> {
        let mut best: Option<&str> = None;
        let mut max = 0.0;
        for (partition, score) in &self.scores {
            if *score > max {
                best = Some(partition.as_str());
                max = *score;
            }
        }
        best
    }

    /// Iterate `(partition, score)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(p, s)| (p.as_str(), *s))
    }

    /// Number of scored partitions.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// True if nothing was scored.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Read-only classifier over a shared model snapshot.
///
/// Cloning is cheap; clones share the same model and tokenizer, and any
/// number of threads may classify concurrently.
///
/// # Example
///
/// ```ignore
/// use doc_sections::classifier::PartitionClassifier;
///
/// let classifier = PartitionClassifier::new(store, tokenizer);
/// let label = classifier.classify("Sections", "Table of Contents")?;
/// ```
#[derive(Debug, Clone)]
pub struct PartitionClassifier {
    store: Arc<WordStore>,
    tokenizer: Arc<Tokenizer>,
}

impl PartitionClassifier {
    /// Create a classifier over a model snapshot.
    pub fn new(store: Arc<WordStore>, tokenizer: Arc<Tokenizer>) -> Self {
        Self { store, tokenizer }
    }

    /// The model being scored against.
    pub fn store(&self) -> &WordStore {
        &self.store
    }

    /// The tokenizer applied to every input.
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Classify text into the best-scoring partition of a category.
    ///
    /// # Arguments
    ///
    /// * `category` - Category whose partitions are candidates
    /// * `text` - Raw input; tokenized before scoring
    ///
    /// # Returns
    ///
    /// The label of the partition with the strictly greatest score, or `None`
    /// if no partition scored above zero.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for an empty category or text,
    /// [`Error::Unsupported`] when the category has fewer than two candidate partitions.
    pub fn classify(&self, category: &str, text: &str) -> Result<Option<String>> {
        let scores = self.score(category, text)?;
        Ok(scores.max_score_partition().map(str::to_string))
    }

    /// Score every candidate partition of a category.
    pub fn score(&self, category: &str, text: &str) -> Result<PartitionScores> {
        if category.is_empty() {
            return Err(Error::InvalidArgument("category cannot be empty".to_string()));
        }
        if text.is_empty() {
            return Err(Error::InvalidArgument("input cannot be empty".to_string()));
        }
        let partitions = self
            .store
            .list_partitions(category, &[SPACE_TOTALS])
            .ok_or_else(|| {
                Error::Unsupported(format!(
                    "category '{}' needs at least two partitions to classify",
                    category
                ))
            })?;

        let tokens = self.tokenizer.tokenize(text);
        let mut scores = PartitionScores::default();
        for partition in partitions {
            let score = self.calculate_partial_probability(category, &partition, &tokens);
            log::trace!("{:<14}{:.16}", format!("{}:", partition), score);
            scores.set_score(partition, score);
        }
        Ok(scores)
    }

    /// Posterior probability that `tokens` belong to `partition`.
    ///
    /// Returns 0.5 when no classifiable token has an entry in the partition.
    pub fn calculate_partial_probability(
        &self,
        category: &str,
        partition: &str,
        tokens: &[String],
    ) -> f64 {
        let matched: Vec<f64> = tokens
            .iter()
            .filter(|t| self.tokenizer.is_classifiable(t))
            .filter_map(|t| self.store.get_word_probability(category, partition, t))
            .map(|wp| wp.probability())
            .collect();
        if matched.is_empty() {
            return NEUTRAL_PROBABILITY;
        }

        let space_words = self.store.category_word_count(category) as f64;
        let partition_words = self.store.partition_word_count(category, partition) as f64;
        if space_words <= 0.0 {
            return NEUTRAL_PROBABILITY;
        }

        let p_bi = partition_words / space_words;
        let neg_p_bi = 1.0 - p_bi;
        let mut p_eo_bi = 1.0;
        let mut neg_p_eo_bi = 1.0;
        for p in &matched {
            p_eo_bi *= p;
            neg_p_eo_bi *= 1.0 - p;
        }

        let min_probability = UNMATCHED_EVIDENCE / space_words;
        for _ in 0..tokens.len() - matched.len() {
            p_eo_bi *= min_probability;
            neg_p_eo_bi *= 1.0 - min_probability;
        }

        let numerator = p_eo_bi * p_bi;
        let denominator = numerator + neg_p_eo_bi * neg_p_bi;
        log::trace!(
            "Bayes: {}:{} > {}/{}",
            category,
            partition,
            numerator,
            denominator
        );
        if denominator > 0.0 {
            numerator / denominator
        } else {
            NEUTRAL_PROBABILITY
        }
    }
}
