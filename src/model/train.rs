//! Corpus training.
//!
//! A training corpus is a directory of plain-text files whose names start
//! with the configured prefix. Every line is one sample, `<label> <text>`,
//! where the text is usually a line exported by
//! [`export_training_data`](crate::model::export_training_data) and then
//! relabelled by hand.

use crate::classifier::{Trainer, WordStore};
use crate::config::SectionConfig;
use crate::error::{Error, Result};
use crate::text::Tokenizer;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Samples between two progress log lines.
const PROGRESS_INTERVAL: usize = 15;

/// Summary of a training run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingReport {
    /// Training files read, in processing order
    pub files: Vec<PathBuf>,
    /// Samples taught
    pub samples: usize,
    /// Lines skipped for lacking a label or text
    pub skipped: usize,
    /// Fewest words in a sample text (0 when nothing was taught)
    pub min_length: usize,
    /// Most words in a sample text
    pub max_length: usize,
}

/// Split a training line into label and text.
///
/// Returns `None` when the line has no text after the label.
pub fn parse_sample(line: &str) -> Option<(&str, &str)> {
    let (label, text) = line.trim().split_once(char::is_whitespace)?;
    let text = text.trim();
    if label.is_empty() || text.is_empty() {
        None
    } else {
        Some((label, text))
    }
}

/// List the training files of a directory, sorted by name.
pub fn training_files(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::persistence(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::persistence(dir, e))?;
        let path = entry.path();
        let matches = path
            .file_name()
            .map(|n| n.to_string_lossy().starts_with(prefix))
            .unwrap_or(false);
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Train a fresh model from the configured corpus and install it.
///
/// The existing model, if any, is moved to the backup path before the new
/// model is saved under the current model path.
///
/// # Errors
///
/// Fails if the stop-word list, the training directory or a training file
/// cannot be read, or the model cannot be saved. Malformed lines are skipped
/// with a warning.
pub fn train_model(config: &SectionConfig) -> Result<TrainingReport> {
    let tokenizer = Arc::new(Tokenizer::from_file(&config.stop_words_path)?);
    let files = training_files(&config.training_dir, &config.training_prefix)?;
    log::info!("Training on {} files.", files.len());

    let mut trainer = Trainer::new(WordStore::new(), tokenizer);
    trainer.init_training_count();

    let mut report = TrainingReport::default();
    let mut min_length = usize::MAX;
    for file in &files {
        log::info!("File: {}", file.display());
        let text = fs::read_to_string(file).map_err(|e| Error::persistence(file, e))?;

        let mut count = 0;
        for (number, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let Some((label, sample)) = parse_sample(line) else {
                log::warn!("{}:{}: no text after label; skipped", file.display(), number + 1);
                report.skipped += 1;
                continue;
            };
            match trainer.teach_match(&config.category, label, sample) {
                Ok(_) => {},
                Err(Error::InvalidArgument(msg)) => {
                    log::warn!("{}:{}: {}; skipped", file.display(), number + 1, msg);
                    report.skipped += 1;
                    continue;
                },
                Err(e) => return Err(e),
            }

            let length = sample.split_whitespace().count();
            min_length = min_length.min(length);
            report.max_length = report.max_length.max(length);
            count += 1;
            if count % PROGRESS_INTERVAL == 0 {
                log::debug!("{}", count);
            }
        }
        log::info!("{} samples", count);
        report.samples += count;
    }
    report.min_length = if report.samples == 0 { 0 } else { min_length };
    report.files = files;
    log::info!(
        "Min/Max training lengths: {}:{}",
        report.min_length,
        report.max_length
    );

    trainer.update_word_probabilities(&config.category)?;
    backup_model(&config.model_path, &config.backup_model_path)?;
    trainer.save(&config.model_path)?;
    log::info!("Training model completed: {}", config.model_path.display());
    Ok(report)
}

/// Move the current model aside, replacing any earlier backup.
fn backup_model(current: &Path, backup: &Path) -> Result<()> {
    if !current.exists() {
        return Ok(());
    }
    if let Some(parent) = backup.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::persistence(parent, e))?;
    }
    if backup.exists() {
        fs::remove_file(backup).map_err(|e| Error::persistence(backup, e))?;
    }
    fs::rename(current, backup).map_err(|e| Error::persistence(backup, e))?;
    log::debug!("Moved {} to {}", current.display(), backup.display());
    Ok(())
}
