//! Training session over a mutable word store.
//!
//! A [`Trainer`] owns the model while it is being built. Samples are taught
//! with [`Trainer::teach_match`], then [`Trainer::update_word_probabilities`]
//! recomputes every partition from the session's training counts. The
//! finished model is frozen into a [`PartitionClassifier`] or saved.

use crate::classifier::partition::PartitionClassifier;
use crate::classifier::word_store::{WordStore, SPACE_TOTALS};
use crate::error::{Error, Result};
use crate::text::Tokenizer;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Builder for a word-probability model.
#[derive(Debug)]
pub struct Trainer {
    store: WordStore,
    tokenizer: Arc<Tokenizer>,
    training_counts: Option<HashMap<String, HashMap<String, u64>>>,
}

impl Trainer {
    /// Start a session over an existing (possibly empty) store.
    pub fn new(store: WordStore, tokenizer: Arc<Tokenizer>) -> Self {
        Self {
            store,
            tokenizer,
            training_counts: None,
        }
    }

    /// Reset the per-partition training counts. Must precede any teaching.
    pub fn init_training_count(&mut self) {
        self.training_counts = Some(HashMap::new());
    }

    /// Teach one labelled sample.
    ///
    /// Every classifiable token adds a match to `partition` and to the totals
    /// partition, and counts as one training unit for `partition`.
    ///
    /// # Returns
    ///
    /// The number of tokens taught.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for an empty category, partition or text, or
    /// the reserved totals partition; [`Error::TrainingNotInitialized`] if
    /// [`init_training_count`](Self::init_training_count) was not called.
    /// Nothing is mutated on error.
    pub fn teach_match(&mut self, category: &str, partition: &str, text: &str) -> Result<usize> {
        if category.is_empty() {
            return Err(Error::InvalidArgument("category cannot be empty".to_string()));
        }
        if partition.is_empty() || partition == SPACE_TOTALS {
            return Err(Error::InvalidArgument(format!(
                "'{}' is not a trainable partition",
                partition
            )));
        }
        if text.is_empty() {
            return Err(Error::InvalidArgument("input cannot be empty".to_string()));
        }
        let counts = self
            .training_counts
            .as_mut()
            .ok_or(Error::TrainingNotInitialized)?;

        let mut taught = 0;
        for token in self.tokenizer.tokenize(text) {
            if !self.tokenizer.is_classifiable(&token) {
                continue;
            }
            self.store.add_match(category, partition, &token)?;
            self.store.add_match(category, SPACE_TOTALS, &token)?;
            *counts
                .entry(category.to_string())
                .or_default()
                .entry(partition.to_string())
                .or_insert(0) += 1;
            taught += 1;
        }
        Ok(taught)
    }

    /// Training units counted for a partition in this session.
    pub fn training_count(&self, category: &str, partition: &str) -> u64 {
        self.training_counts
            .as_ref()
            .and_then(|c| c.get(category))
            .and_then(|p| p.get(partition))
            .copied()
            .unwrap_or(0)
    }

    /// Recompute probabilities for every partition of a category.
    ///
    /// Returns the number of word entries updated.
    pub fn update_word_probabilities(&mut self, category: &str) -> Result<usize> {
        if category.is_empty() {
            return Err(Error::InvalidArgument("category cannot be empty".to_string()));
        }
        if self.training_counts.is_none() {
            return Err(Error::TrainingNotInitialized);
        }

        let partitions = self.store.partitions(category, &[SPACE_TOTALS]);
        let cnt_total: u64 = partitions
            .iter()
            .map(|p| self.training_count(category, p))
            .sum();

        let mut updated = 0;
        for partition in &partitions {
            let cnt = self.training_count(category, partition);
            updated += self.store.update_word_probabilities(
                category,
                partition,
                SPACE_TOTALS,
                cnt,
                cnt_total,
            )?;
        }
        log::info!(
            "Updated {} word probabilities over {} partitions of '{}'",
            updated,
            partitions.len(),
            category
        );
        Ok(updated)
    }

    /// The model under construction.
    pub fn store(&self) -> &WordStore {
        &self.store
    }

    /// Persist the model under construction.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.store.save(path)
    }

    /// End the session and return the model.
    pub fn into_store(self) -> WordStore {
        self.store
    }

    /// End the session and freeze the model for scoring.
    pub fn into_classifier(self) -> PartitionClassifier {
        PartitionClassifier::new(Arc::new(self.store), self.tokenizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trainer() -> Trainer {
        let tokenizer = Arc::new(Tokenizer::from_stop_words(["a", "of", "the", "is", "this"]));
        Trainer::new(WordStore::new(), tokenizer)
    }

    #[test]
    fn test_teach_requires_init() {
        let mut trainer = trainer();
        let err = trainer
            .teach_match("Sections", "heading", "Table of Contents")
            .unwrap_err();
        assert!(matches!(err, Error::TrainingNotInitialized));
        assert!(trainer.store().categories().next().is_none());
    }

    #[test]
    fn test_teach_counts_tokens() {
        let mut trainer = trainer();
        trainer.init_training_count();
        let n = trainer
            .teach_match("Sections", "heading", "Table of Contents")
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(trainer.training_count("Sections", "heading"), 2);
        let store = trainer.store();
        assert_eq!(store.partition_word_count("Sections", "heading"), 2);
        assert_eq!(store.partition_word_count("Sections", SPACE_TOTALS), 2);
    }

    #[test]
    fn test_teach_skips_numeric_noise() {
        let mut trainer = trainer();
        trainer.init_training_count();
        let n = trainer.teach_match("Sections", "body", "page 12 f2d100").unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn test_teach_rejects_reserved_partition() {
        let mut trainer = trainer();
        trainer.init_training_count();
        assert!(matches!(
            trainer.teach_match("Sections", SPACE_TOTALS, "text"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            trainer.teach_match("Sections", "body", ""),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_update_probabilities() {
        let mut trainer = trainer();
        trainer.init_training_count();
        trainer
            .teach_match("Sections", "heading", "Table of Contents")
            .unwrap();
        trainer
            .teach_match("Sections", "body", "This is the main content of the document")
            .unwrap();
        assert_eq!(trainer.update_word_probabilities("Sections").unwrap(), 5);

        let store = trainer.store();
        let p = |part: &str, word: &str| {
            store
                .get_word_probability("Sections", part, word)
                .unwrap()
                .probability()
        };
        assert!((p("heading", "tabl") - 0.75).abs() < 1e-12);
        assert!((p("heading", "content") - 0.55).abs() < 1e-12);
        assert!((p("body", "content") - 0.45).abs() < 1e-12);
        assert!((p("body", "document") - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_update_requires_init() {
        let mut trainer = trainer();
        assert!(matches!(
            trainer.update_word_probabilities("Sections"),
            Err(Error::TrainingNotInitialized)
        ));
    }
}
