use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use shared_types::ContactIndex;
use tracing::{info, warn};
use transform::corpus::{load_corpus, read_json_file};

mod config;

use config::AppConfig;

const CONTACT_INDEX_FILE: &str = "all_emails.json";
const CONTACT_SUMMARY_FILE: &str = "contacts_summary.json";
const CONFIDENTIALITY_FILE: &str = "confidentiality_emails.json";
const ANALYSIS_FILE: &str = "emails_analysis.json";

#[derive(Parser, Debug)]
#[command(
    name = "corrdex",
    about = "Build a per-contact correspondence index from scanned-document extractions"
)]
struct Cli {
    /// Path to the corrdex config file (subject identity and alias table)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate extracted emails into the per-contact index
    Transform {
        /// Directory of per-document extraction JSON files
        #[arg(long, default_value = "data/email_extracted")]
        input_dir: PathBuf,

        /// Directory receiving the index, summary, and exception files
        #[arg(long, default_value = "data")]
        output_dir: PathBuf,
    },

    /// Report corpus-wide sender/receiver statistics
    Analyze {
        /// Directory of per-document extraction JSON files
        #[arg(long, default_value = "data/email_extracted")]
        input_dir: PathBuf,

        /// Directory receiving the analysis report
        #[arg(long, default_value = "data")]
        output_dir: PathBuf,
    },

    /// Attach shared-folder URLs to an existing index
    Link {
        /// Directory of .har captures of the shared-folder listing
        #[arg(long, default_value = "data/dropbox")]
        har_dir: PathBuf,

        /// The contact index to annotate in place
        #[arg(long, default_value = "data/all_emails.json")]
        index: PathBuf,

        /// Keep the extracted folder-entry JSON in this directory
        #[arg(long, value_name = "DIR")]
        entries_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let (app_config, config_path) =
        AppConfig::load(cli.config).context("Failed to load corrdex config")?;
    if config_path.exists() {
        info!("using config at {}", config_path.display());
    }

    match cli.command {
        Command::Transform {
            input_dir,
            output_dir,
        } => run_transform(&app_config, &input_dir, &output_dir),
        Command::Analyze {
            input_dir,
            output_dir,
        } => run_analyze(&input_dir, &output_dir),
        Command::Link {
            har_dir,
            index,
            entries_dir,
        } => run_link(&har_dir, &index, entries_dir.as_deref()),
    }
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}

fn run_transform(app_config: &AppConfig, input_dir: &Path, output_dir: &Path) -> Result<()> {
    let documents = load_corpus(input_dir)
        .with_context(|| format!("Failed to load corpus from {}", input_dir.display()))?;
    info!(
        "processing {} documents from {}",
        documents.len(),
        input_dir.display()
    );

    let mut aggregator = transform::Aggregator::new(
        app_config.subject_identity(),
        app_config.alias_table(),
    );
    for document in &documents {
        aggregator.process_document(document);
    }
    let output = aggregator.finish();

    write_json_pretty(&output_dir.join(CONTACT_INDEX_FILE), &output.contacts)?;
    write_json_pretty(
        &output_dir.join(CONTACT_SUMMARY_FILE),
        &output.contact_summary(),
    )?;
    write_json_pretty(
        &output_dir.join(CONFIDENTIALITY_FILE),
        &output.confidentiality,
    )?;

    let stats = &output.stats;
    info!("transformation complete");
    info!("  documents: {}", stats.documents);
    info!("  emails seen: {}", stats.emails_seen);
    info!("  involving the subject: {}", stats.subject_emails);
    info!("  skipped (not subject): {}", stats.skipped_not_subject);
    info!("  unique contacts: {}", stats.unique_contacts);
    info!(
        "  confidentiality exceptions: {}",
        stats.confidentiality_exceptions
    );
    info!("results saved to {}", output_dir.display());

    Ok(())
}

fn run_analyze(input_dir: &Path, output_dir: &Path) -> Result<()> {
    let documents = load_corpus(input_dir)
        .with_context(|| format!("Failed to load corpus from {}", input_dir.display()))?;
    info!(
        "analyzing {} documents from {}",
        documents.len(),
        input_dir.display()
    );

    let mut analyzer = transform::CorpusAnalyzer::new();
    for document in &documents {
        analyzer.process_document(document);
    }
    let analysis = analyzer.finish();

    write_json_pretty(&output_dir.join(ANALYSIS_FILE), &analysis)?;

    let stats = &analysis.stats;
    info!("analysis complete");
    info!(
        "  files: {} total, {} valid, {} invalid, {} not email",
        stats.total_files, stats.valid_files, stats.invalid_files, stats.not_email_files
    );
    info!("  emails: {}", stats.total_emails);
    info!(
        "  unique senders: {}, unique receivers: {}",
        stats.unique_senders, stats.unique_receivers
    );

    Ok(())
}

fn run_link(har_dir: &Path, index_path: &Path, entries_dir: Option<&Path>) -> Result<()> {
    let mut har_files = Vec::new();
    let entries = fs::read_dir(har_dir)
        .with_context(|| format!("Failed to read HAR directory {}", har_dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("har") {
            har_files.push(path);
        }
    }
    har_files.sort();

    if har_files.is_empty() {
        warn!("no .har files found in {}", har_dir.display());
        return Ok(());
    }

    let mut lookup = transform::LinkLookup::new();
    for har_path in &har_files {
        let har: Value = read_json_file(har_path)
            .with_context(|| format!("Failed to load {}", har_path.display()))?;

        let responses = transform::links::extract_folder_entries(&har);
        info!(
            "{}: {} folder-listing responses",
            har_path.display(),
            responses.len()
        );

        if let Some(dir) = entries_dir {
            let stem = har_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("entries");
            write_json_pretty(&dir.join(format!("{stem}.json")), &responses)?;
        }

        lookup.add_responses(&responses);
    }
    info!("link lookup covers {} filenames", lookup.len());

    let mut index: ContactIndex = read_json_file(index_path)
        .with_context(|| format!("Failed to load index {}", index_path.display()))?;

    let stats = lookup.annotate(&mut index);
    write_json_pretty(index_path, &index)?;

    info!(
        "matched: {}, unmatched: {}",
        stats.matched, stats.unmatched
    );
    info!("updated {}", index_path.display());

    Ok(())
}

/// Write a pretty-printed JSON file atomically: the full document lands in
/// a temp file beside the target and is renamed into place.
fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let dir = dir.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    serde_json::to_writer_pretty(&mut file, value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    file.flush()?;
    file.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
