//! Model inspection: the strongest words of every partition.

use crate::classifier::{WordProbability, WordStore};
use std::cmp::Ordering;
use std::fmt;

/// Words listed per partition.
pub const TOP_WORDS: usize = 20;

/// One word of a partition summary.
#[derive(Debug, Clone, PartialEq)]
pub struct WordSummary {
    /// The (stemmed) word
    pub word: String,
    /// Its probability in the partition
    pub probability: f64,
    /// Its match count in the partition
    pub match_count: u64,
}

/// Summary of one partition.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionSummary {
    /// Partition label
    pub partition: String,
    /// Number of distinct words in the partition
    pub distinct_words: usize,
    /// Highest-probability words, best first
    pub top_words: Vec<WordSummary>,
}

/// Summary of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    /// Category label
    pub category: String,
    /// Partitions, largest vocabulary first
    pub partitions: Vec<PartitionSummary>,
}

/// Summary of a whole model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelAnalysis {
    /// Categories in lexical order
    pub categories: Vec<CategorySummary>,
}

/// Summarize a model.
///
/// Partitions are ordered by distinct word count, descending, then by label.
/// Within a partition the top [`TOP_WORDS`] words are ordered by probability,
/// descending, with ties broken alphabetically.
pub fn analyze_model(store: &WordStore) -> ModelAnalysis {
    let categories = store
        .categories()
        .filter_map(|category| {
            let parts = store.category(category)?;
            let mut partitions: Vec<PartitionSummary> = parts
                .iter()
                .map(|(partition, words)| {
                    let mut ranked: Vec<(&String, &WordProbability)> = words.iter().collect();
                    ranked.sort_by(|a, b| {
                        b.1.probability()
                            .partial_cmp(&a.1.probability())
                            .unwrap_or(Ordering::Equal)
                            .then_with(|| a.0.cmp(b.0))
                    });
                    PartitionSummary {
                        partition: partition.clone(),
                        distinct_words: words.len(),
                        top_words: ranked
                            .into_iter()
                            .take(TOP_WORDS)
                            .map(|(word, wp)| WordSummary {
                                word: word.clone(),
                                probability: wp.probability(),
                                match_count: wp.match_count(),
                            })
                            .collect(),
                    }
                })
                .collect();
            partitions.sort_by(|a, b| {
                b.distinct_words
                    .cmp(&a.distinct_words)
                    .then_with(|| a.partition.cmp(&b.partition))
            });
            Some(CategorySummary {
                category: category.to_string(),
                partitions,
            })
        })
        .collect();

    ModelAnalysis { categories }
}

impl ModelAnalysis {
    /// Write the analysis to the log at info level, one line per partition.
    pub fn log(&self) {
        for line in self.to_string().lines() {
            log::info!("{}", line);
        }
    }
}

fn abbreviate(word: &str, max: usize) -> String {
    if word.chars().count() <= max {
        word.to_string()
    } else {
        let head: String = word.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

impl fmt::Display for ModelAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.categories.iter().map(|c| c.category.as_str()).collect();
        writeln!(
            f,
            "Category collection: {} = {}",
            labels.len(),
            labels.join(" ")
        )?;
        for category in &self.categories {
            let parts: Vec<&str> = category
                .partitions
                .iter()
                .map(|p| p.partition.as_str())
                .collect();
            writeln!(f, "Partition collection: {} = {}", parts.len(), parts.join(" "))?;
            for partition in &category.partitions {
                write!(
                    f,
                    "{:<14}{:>5} = ",
                    format!("{}:", partition.partition),
                    partition.distinct_words
                )?;
                for word in &partition.top_words {
                    write!(
                        f,
                        "{:<14}{:.8}/{:>6}| ",
                        abbreviate(&word.word, 13),
                        word.probability,
                        word.match_count
                    )?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
