//! Section model maintenance and document classification.
//!
//! Usage:
//!   section_model [--config FILE] train
//!   section_model [--config FILE] analyze
//!   section_model [--config FILE] classify <doc.json> [--out FILE]
//!   section_model [--config FILE] export <doc.json> [out.txt]
//!   section_model [--config FILE] correct <doc.json> <corrections.txt> [--out FILE]
//!
//! Documents are JSON-encoded `doc_sections::layout::Document` values.
//! Set `RUST_LOG=debug` for per-line classification output.

use doc_sections::classifier::WordStore;
use doc_sections::config::SectionConfig;
use doc_sections::layout::Document;
use doc_sections::model::{
    analyze_model, apply_corrections, export_training_data, train_model, training_file_name,
};
use doc_sections::pipeline::{LogStatus, SectionTask};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

enum Command {
    Train,
    Analyze,
    Classify { doc: PathBuf },
    Export { doc: PathBuf, out: Option<PathBuf> },
    Correct { doc: PathBuf, corrections: PathBuf },
}

struct CliConfig {
    config_path: Option<PathBuf>,
    command: Command,
    out: Option<PathBuf>,
}

impl CliConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut config_path = None;
        let mut out = None;
        let mut positional = Vec::new();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    i += 1;
                    if i < args.len() {
                        config_path = Some(PathBuf::from(&args[i]));
                    }
                },
                "--out" | "-o" => {
                    i += 1;
                    if i < args.len() {
                        out = Some(PathBuf::from(&args[i]));
                    }
                },
                "--help" | "-h" => return Err(String::new()),
                other => positional.push(other.to_string()),
            }
            i += 1;
        }

        let arg = |n: usize, what: &str| -> Result<PathBuf, String> {
            positional
                .get(n)
                .map(PathBuf::from)
                .ok_or_else(|| format!("missing {}", what))
        };
        let command = match positional.first().map(String::as_str) {
            Some("train") => Command::Train,
            Some("analyze") => Command::Analyze,
            Some("classify") => Command::Classify {
                doc: arg(1, "document")?,
            },
            Some("export") => Command::Export {
                doc: arg(1, "document")?,
                out: positional.get(2).map(PathBuf::from),
            },
            Some("correct") => Command::Correct {
                doc: arg(1, "document")?,
                corrections: arg(2, "corrections file")?,
            },
            Some(other) => return Err(format!("unknown command '{}'", other)),
            None => return Err("missing command".to_string()),
        };

        Ok(Self {
            config_path,
            command,
            out,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  section_model [--config FILE] train");
    eprintln!("  section_model [--config FILE] analyze");
    eprintln!("  section_model [--config FILE] classify <doc.json> [--out FILE]");
    eprintln!("  section_model [--config FILE] export <doc.json> [out.txt]");
    eprintln!("  section_model [--config FILE] correct <doc.json> <corrections.txt> [--out FILE]");
}

fn read_document(path: &Path) -> Result<Document, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let mut doc: Document = serde_json::from_str(&text)?;
    if doc.name.is_empty() {
        doc.name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    Ok(doc)
}

fn write_document(doc: &Document, out: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(doc)?;
    match out {
        Some(path) => fs::write(path, json)?,
        None => println!("{}", json),
    }
    Ok(())
}

fn run(cli: CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config_path {
        Some(path) => SectionConfig::from_json_file(path)?,
        None => SectionConfig::default(),
    };

    match cli.command {
        Command::Train => {
            let report = train_model(&config)?;
            println!(
                "Trained on {} samples from {} files ({} skipped, lengths {}..{})",
                report.samples,
                report.files.len(),
                report.skipped,
                report.min_length,
                report.max_length
            );
            print!("{}", analyze_model(&WordStore::load(&config.model_path)?));
        },
        Command::Analyze => {
            let store = WordStore::load(&config.model_path)?;
            print!("{}", analyze_model(&store));
        },
        Command::Classify { doc } => {
            let mut docs = vec![read_document(&doc)?];
            let task = SectionTask::from_config(&config)?;
            let report = task.run(&mut docs, &LogStatus)?;
            if let Some(failure) = report.failures.into_iter().next() {
                return Err(failure.error.into());
            }
            let labels = task.classifier().labels();
            for line in docs[0].lines() {
                log::debug!("{:<10} {}", labels.label(line.section), line.content);
            }
            write_document(&docs[0], cli.out.as_deref())?;
        },
        Command::Export { doc, out } => {
            let document = read_document(&doc)?;
            let out = out.unwrap_or_else(|| {
                let source = doc
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                config
                    .training_dir
                    .join(training_file_name(&config.training_prefix, &source))
            });
            let count = export_training_data(&document, &config.section_labels, &out)?;
            println!("Exported {} lines to {}", count, out.display());
        },
        Command::Correct { doc, corrections } => {
            let mut document = read_document(&doc)?;
            let report = apply_corrections(&mut document, &config.section_labels, &corrections)?;
            println!(
                "Correction count: {}:{} ({:.0}% accuracy)",
                report.corrections, report.lines, report.accuracy
            );
            if let Some(out) = cli.out.as_deref() {
                write_document(&document, Some(out))?;
            }
        },
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match CliConfig::from_args() {
        Ok(cli) => cli,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("Error: {}", msg);
            }
            print_usage();
            process::exit(2);
        },
    };

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
