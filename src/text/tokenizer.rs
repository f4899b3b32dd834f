//! Tokenizer producing canonical word sets for the partition classifier.
//!
//! Input is split on whitespace, lowercased and stemmed (English Snowball).
//! Stop words are dropped, then the survivors are sorted and deduplicated, so
//! a line is represented by the *set* of its stems.
//!
//! The tokenizer holds no mutable state: identical input always yields an
//! identical token list, and a [`Tokenizer`] can be shared freely across threads.

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

lazy_static! {
    /// Tokens that start with a digit
    static ref RE_DIGIT_LEADING: Regex = Regex::new(r"^\d").unwrap();

    /// Tokens with an embedded run of two or more digits after the first character
    static ref RE_DIGIT_EMBEDDED: Regex = Regex::new(r"^.+\d{2}").unwrap();
}

/// Returns true for tokens that are numeric noise (page numbers, citations, years).
///
/// # Examples
///
/// ```
/// use doc_sections::text::is_numeric_noise;
///
/// assert!(is_numeric_noise("1999"));
/// assert!(is_numeric_noise("lnumb17+1"));
/// assert!(!is_numeric_noise("text-2"));
/// assert!(!is_numeric_noise("court"));
/// ```
pub fn is_numeric_noise(token: &str) -> bool {
    RE_DIGIT_LEADING.is_match(token) || RE_DIGIT_EMBEDDED.is_match(token)
}

/// Whitespace tokenizer with stemming and stop-word filtering.
pub struct Tokenizer {
    stop_words: HashSet<String>,
    stemmer: Stemmer,
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("stop_words", &self.stop_words.len())
            .finish()
    }
}

impl Tokenizer {
    /// Build a tokenizer from a stop-word list file (one word per line).
    ///
    /// # Errors
    ///
    /// A missing or unreadable list is fatal: returns [`Error::Persistence`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::persistence(path, e))?;
        let tokenizer = Self::from_stop_words(text.lines());
        log::debug!(
            "Loaded {} stop words from {}",
            tokenizer.stop_words.len(),
            path.display()
        );
        Ok(tokenizer)
    }

    /// Build a tokenizer from an in-memory stop-word list.
    pub fn from_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self {
            stop_words,
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Tokenize text into a sorted, deduplicated list of stems.
    ///
    /// # Examples
    ///
    /// ```
    /// use doc_sections::text::Tokenizer;
    ///
    /// let tokenizer = Tokenizer::from_stop_words(["of", "the"]);
    /// assert_eq!(tokenizer.tokenize("Table of the Contents"), vec!["content", "tabl"]);
    /// ```
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens: Vec<String> = text
            .split_whitespace()
            .filter_map(|raw| {
                let word = raw.to_lowercase();
                if self.stop_words.contains(&word) {
                    return None;
                }
                let stem = self.stemmer.stem(&word).into_owned();
                if stem.is_empty() || self.stop_words.contains(&stem) {
                    None
                } else {
                    Some(stem)
                }
            })
            .collect();

        tokens.sort();
        tokens.dedup();
        tokens
    }

    /// Whether a (lowercased) word is on the stop list.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Whether a token may be used as classification evidence.
    ///
    /// Empty tokens, stop words and numeric noise are excluded.
    pub fn is_classifiable(&self, token: &str) -> bool {
        !token.is_empty() && !self.is_stop_word(token) && !is_numeric_noise(token)
    }

    /// Number of loaded stop words.
    pub fn stop_word_count(&self) -> usize {
        self.stop_words.len()
    }
}
