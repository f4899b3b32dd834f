//! Persistent word-probability store.
//!
//! The model is a three level map, category → partition → word → [`WordProbability`].
//! Training adds matches through [`WordStore::add_match`]; once a session is
//! complete [`WordStore::update_word_probabilities`] turns the accumulated counts
//! into smoothed probabilities.
//!
//! # Persistence
//!
//! A snapshot is the JSON encoding of the whole model. When the file name ends
//! in [`COMPRESSED_SUFFIX`] the JSON is wrapped in a gzip stream; otherwise it
//! is stored as is. Loading a file that does not exist creates, saves and
//! returns a fresh model with a single empty partition.

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name suffix selecting the gzip-compressed snapshot format.
pub const COMPRESSED_SUFFIX: &str = ".gz";

/// Reserved partition holding category-wide word totals.
pub const SPACE_TOTALS: &str = "SPACE_TOTALS";

/// Category created for a fresh model.
pub const DEFAULT_CATEGORY: &str = "DEFAULT";

/// Partition created for a fresh model, and for any category found empty on load.
pub const DEFAULT_PARTITION: &str = "DEFAULT";

/// Probability of a word without trained evidence.
pub const NEUTRAL_PROBABILITY: f64 = 0.5;

/// Words of one partition.
pub type PartitionWords = BTreeMap<String, WordProbability>;

/// Partitions of one category.
pub type CategoryPartitions = BTreeMap<String, PartitionWords>;

/// Statistics for one word in one partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordProbability {
    match_count: u64,
    probability: f64,
    training_partition: Option<u64>,
    training_category: Option<u64>,
}

impl Default for WordProbability {
    fn default() -> Self {
        Self {
            match_count: 0,
            probability: NEUTRAL_PROBABILITY,
            training_partition: None,
            training_category: None,
        }
    }
}

impl WordProbability {
    /// Number of training samples in which the word was seen for this partition.
    pub fn match_count(&self) -> u64 {
        self.match_count
    }

    /// Smoothed probability in \[0, 1\]; 0.5 until recomputed.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Partition training-sample count used in the last recomputation.
    pub fn training_partition(&self) -> Option<u64> {
        self.training_partition
    }

    /// Category training-sample count used in the last recomputation.
    pub fn training_category(&self) -> Option<u64> {
        self.training_category
    }
}

/// Laplace-smoothed word probability.
///
/// `m` is the word's count in the partition, `t` its count across the category,
/// `cnt` and `cnt_total` the partition and category training-sample counts.
/// Sparse evidence is pulled toward 0.5; the result is always inside (0, 1).
pub fn smoothed_probability(m: f64, t: f64, cnt: f64, cnt_total: f64) -> f64 {
    let a = m / cnt;
    let others = cnt_total - cnt;
    let b = if others > 0.0 {
        (t - m).max(0.0) / others
    } else {
        0.0
    };
    let raw = if a + b > 0.0 {
        a / (a + b)
    } else {
        NEUTRAL_PROBABILITY
    };
    (NEUTRAL_PROBABILITY + m * raw) / (1.0 + m)
}

/// In-memory word-probability model with whole-model persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordStore {
    categories: BTreeMap<String, CategoryPartitions>,
}

impl WordStore {
    /// Create an empty store with no categories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding one category with one empty partition.
    pub fn with_default_partition() -> Self {
        let mut store = Self::new();
        store.ensure_partition(DEFAULT_CATEGORY, DEFAULT_PARTITION);
        store
    }

    /// Look up the statistics of a word. `None` means no prior evidence.
    pub fn get_word_probability(
        &self,
        category: &str,
        partition: &str,
        word: &str,
    ) -> Option<&WordProbability> {
        self.categories.get(category)?.get(partition)?.get(word)
    }

    /// Record one more match of `word` in a partition, creating the path if missing.
    ///
    /// Callers keep the [`SPACE_TOTALS`] partition current by calling this for it too.
    pub fn add_match(&mut self, category: &str, partition: &str, word: &str) -> Result<()> {
        require("category", category)?;
        require("partition", partition)?;
        require("word", word)?;

        let entry = self
            .categories
            .entry(category.to_string())
            .or_default()
            .entry(partition.to_string())
            .or_default()
            .entry(word.to_string())
            .or_default();
        entry.match_count = entry.match_count.saturating_add(1);
        Ok(())
    }

    /// Make sure a (possibly empty) partition exists.
    pub fn ensure_partition(&mut self, category: &str, partition: &str) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .entry(partition.to_string())
            .or_default();
    }

    /// Every partition of a category except the excluded labels, in lexical order.
    pub fn partitions(&self, category: &str, excluding: &[&str]) -> Vec<String> {
        self.categories
            .get(category)
            .map(|parts| {
                parts
                    .keys()
                    .filter(|p| !excluding.contains(&p.as_str()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Candidate partitions for scoring, in lexical order.
    ///
    /// Returns `None` when fewer than two partitions remain after exclusion:
    /// a single-partition space offers no choice.
    pub fn list_partitions(&self, category: &str, excluding: &[&str]) -> Option<Vec<String>> {
        let list = self.partitions(category, excluding);
        if list.len() > 1 {
            Some(list)
        } else {
            None
        }
    }

    /// Total (non-unique) match count of one partition.
    pub fn partition_word_count(&self, category: &str, partition: &str) -> u64 {
        self.categories
            .get(category)
            .and_then(|parts| parts.get(partition))
            .map(|words| words.values().map(|w| w.match_count).sum())
            .unwrap_or(0)
    }

    /// Total match count of a category over every partition, [`SPACE_TOTALS`] included.
    pub fn category_word_count(&self, category: &str) -> u64 {
        self.partitions(category, &[])
            .iter()
            .map(|p| self.partition_word_count(category, p))
            .sum()
    }

    /// Recompute the probability of every word in a partition.
    ///
    /// `totals` names the partition holding category-wide counts; `cnt` and
    /// `cnt_total` are the partition and category training-sample counts.
    /// Returns the number of words updated. A partition without training
    /// samples in this session keeps its current probabilities.
    pub fn update_word_probabilities(
        &mut self,
        category: &str,
        partition: &str,
        totals: &str,
        cnt: u64,
        cnt_total: u64,
    ) -> Result<usize> {
        require("category", category)?;
        require("partition", partition)?;
        require("totals", totals)?;

        let Some(parts) = self.categories.get_mut(category) else {
            log::warn!("Word probabilities update failed: no category '{}'", category);
            return Ok(0);
        };
        let Some(sums) = parts.get(totals).cloned() else {
            log::warn!("Word probabilities update failed: no totals partition '{}'", totals);
            return Ok(0);
        };
        let Some(words) = parts.get_mut(partition) else {
            log::warn!("Word probabilities update failed: no partition '{}'", partition);
            return Ok(0);
        };
        if cnt == 0 {
            log::warn!(
                "Partition '{}' has no training samples in this session; probabilities kept",
                partition
            );
            return Ok(0);
        }

        for (word, wp) in words.iter_mut() {
            let m = wp.match_count as f64;
            let t = sums.get(word).map(|s| s.match_count as f64).unwrap_or(m);
            wp.probability = smoothed_probability(m, t, cnt as f64, cnt_total as f64);
            wp.training_partition = Some(cnt);
            wp.training_category = Some(cnt_total);
            log::trace!("WordProbability: {} ({}/{} = {})", word, m, t, wp.probability);
        }
        Ok(words.len())
    }

    /// Category labels in lexical order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(|c| c.as_str())
    }

    /// All partitions of a category, reserved ones included.
    pub fn category(&self, category: &str) -> Option<&CategoryPartitions> {
        self.categories.get(category)
    }

    /// Words of one partition.
    pub fn partition_words(&self, category: &str, partition: &str) -> Option<&PartitionWords> {
        self.categories.get(category)?.get(partition)
    }

    /// Load a snapshot, creating and saving a fresh model if the file does not exist.
    ///
    /// A missing file is never an error: when the fresh model cannot be saved
    /// a warning is logged and the model is returned anyway.
    ///
    /// # Errors
    ///
    /// [`Error::Persistence`] when an existing snapshot cannot be read,
    /// [`Error::DataSource`] when it cannot be decoded.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!("Model {} not found; creating an empty model", path.display());
            let store = Self::with_default_partition();
            if let Err(e) = store.save(path) {
                log::warn!("Cannot save new model: {}", e);
            }
            return Ok(store);
        }

        let file = File::open(path).map_err(|e| Error::persistence(path, e))?;
        let reader = BufReader::new(file);
        let decoded: serde_json::Result<Self> = if is_compressed(path) {
            serde_json::from_reader(GzDecoder::new(reader))
        } else {
            serde_json::from_reader(reader)
        };
        let mut store = decoded.map_err(|e| {
            if e.is_io() {
                Error::persistence(path, e.into())
            } else {
                Error::DataSource(format!("cannot decode model '{}': {}", path.display(), e))
            }
        })?;

        for parts in store.categories.values_mut() {
            if parts.is_empty() {
                parts.insert(DEFAULT_PARTITION.to_string(), PartitionWords::new());
            }
        }
        log::info!(
            "Loaded model {} ({} categories)",
            path.display(),
            store.categories.len()
        );
        Ok(store)
    }

    /// Save a snapshot. The file is written next to the target and renamed into place;
    /// a failed write removes the partial file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::persistence(parent, e))?;
        }

        let tmp = temp_sibling(path);
        if let Err(e) = self.write_snapshot(&tmp, is_compressed(path)) {
            let _ = fs::remove_file(&tmp);
            return Err(Error::persistence(&tmp, e));
        }
        fs::rename(&tmp, path).map_err(|e| Error::persistence(path, e))?;
        log::debug!("Saved model {}", path.display());
        Ok(())
    }

    fn write_snapshot(&self, path: &Path, compressed: bool) -> std::io::Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        if compressed {
            let mut encoder = GzEncoder::new(writer, Compression::default());
            serde_json::to_writer(&mut encoder, self)?;
            encoder.finish()?.flush()
        } else {
            let mut writer = writer;
            serde_json::to_writer(&mut writer, self)?;
            writer.flush()
        }
    }
}

/// Whether a snapshot name selects the compressed format.
pub fn is_compressed(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().ends_with(COMPRESSED_SUFFIX))
        .unwrap_or(false)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn require(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        Err(Error::InvalidArgument(format!("{} cannot be empty", what)))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trained_store() -> WordStore {
        let mut store = WordStore::new();
        for (partition, word) in [("heading", "tabl"), ("heading", "content"), ("body", "content")]
        {
            store.add_match("Sections", partition, word).unwrap();
            store.add_match("Sections", SPACE_TOTALS, word).unwrap();
        }
        store
    }

    #[test]
    fn test_absent_lookup() {
        let store = trained_store();
        assert!(store.get_word_probability("Sections", "body", "tabl").is_none());
        assert!(store.get_word_probability("Other", "body", "content").is_none());
    }

    #[test]
    fn test_add_match_counts() {
        let store = trained_store();
        let wp = store.get_word_probability("Sections", SPACE_TOTALS, "content").unwrap();
        assert_eq!(wp.match_count(), 2);
        assert_eq!(wp.probability(), NEUTRAL_PROBABILITY);
    }

    #[test]
    fn test_add_match_rejects_empty() {
        let mut store = WordStore::new();
        assert!(matches!(
            store.add_match("", "body", "word"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(store.categories().next().is_none());
    }

    #[test]
    fn test_list_partitions_excludes_reserved() {
        let store = trained_store();
        let list = store.list_partitions("Sections", &[SPACE_TOTALS]).unwrap();
        assert_eq!(list, vec!["body", "heading"]);
    }

    #[test]
    fn test_list_partitions_degenerate() {
        let mut store = WordStore::new();
        store.add_match("Sections", SPACE_TOTALS, "x").unwrap();
        assert!(store.list_partitions("Sections", &[SPACE_TOTALS]).is_none());

        store.add_match("Sections", "body", "x").unwrap();
        assert!(store.list_partitions("Sections", &[SPACE_TOTALS]).is_none());
        assert!(store.list_partitions("Missing", &[SPACE_TOTALS]).is_none());
    }

    #[test]
    fn test_word_counts() {
        let store = trained_store();
        assert_eq!(store.partition_word_count("Sections", "heading"), 2);
        assert_eq!(store.partition_word_count("Sections", SPACE_TOTALS), 3);
        assert_eq!(store.category_word_count("Sections"), 6);
    }

    #[test]
    fn test_smoothed_probability() {
        // word only ever seen in this partition
        assert!((smoothed_probability(1.0, 1.0, 2.0, 5.0) - 0.75).abs() < 1e-12);
        // shared word
        assert!((smoothed_probability(1.0, 2.0, 2.0, 5.0) - 0.55).abs() < 1e-12);
        // single-partition space: no "other" samples
        let p = smoothed_probability(3.0, 3.0, 3.0, 3.0);
        assert!(p > 0.0 && p < 1.0);
    }

    #[test]
    fn test_update_word_probabilities() {
        let mut store = trained_store();
        let n = store
            .update_word_probabilities("Sections", "heading", SPACE_TOTALS, 2, 3)
            .unwrap();
        assert_eq!(n, 2);
        let wp = store.get_word_probability("Sections", "heading", "tabl").unwrap();
        assert!((wp.probability() - 0.75).abs() < 1e-12);
        assert_eq!(wp.training_partition(), Some(2));
        assert_eq!(wp.training_category(), Some(3));
    }

    #[test]
    fn test_update_missing_partition_is_noop() {
        let mut store = trained_store();
        let n = store
            .update_word_probabilities("Sections", "footnote", SPACE_TOTALS, 1, 3)
            .unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn test_load_missing_in_unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "file").unwrap();
        let path = blocker.join("model.json.gz");

        let store = WordStore::load(&path).unwrap();
        assert_eq!(store, WordStore::with_default_partition());
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_save_removes_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let tmp = temp_sibling(&path);
        std::os::unix::fs::symlink(dir.path().join("missing/target"), &tmp).unwrap();

        let err = trained_store().save(&path).unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
        assert!(fs::symlink_metadata(&tmp).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_compressed_suffix() {
        assert!(is_compressed(Path::new("models/sections.model.gz")));
        assert!(!is_compressed(Path::new("models/sections.model")));
        assert!(!is_compressed(Path::new("models/gz")));
    }
}
