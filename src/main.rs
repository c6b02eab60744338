//! Command-line interface for palimpsest.

use clap::{Parser, Subcommand};
use palimpsest::common::timestamp::{format_display, parse_timestamp};
use palimpsest::docx::{BuildOptions, RevisionInjector, Sanitizer, build_document};
use palimpsest::store::MetadataStore;
use palimpsest::text::split_into_sentences;
use palimpsest::{Error, Result};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "palimpsest", version, about = "Word document revision-history fabrication and sanitization")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a Word document with a fabricated edit history
    Create {
        /// Text content for the document
        text: Option<String>,
        /// Read text from a file instead
        #[arg(short = 'f', long)]
        input_file: Option<PathBuf>,
        /// Output .docx path
        #[arg(short, long, default_value = "output.docx")]
        output: PathBuf,
        /// Document author name
        #[arg(short, long, default_value = "Palimpsest")]
        author: String,
        /// Start timestamp for the first sentence (e.g. "2025-01-01 10:00:00")
        #[arg(short, long)]
        start_date: Option<String>,
        /// Minimum seconds between fabricated edits
        #[arg(long, default_value_t = 30)]
        min_interval: u32,
        /// Maximum seconds between fabricated edits
        #[arg(long, default_value_t = 300)]
        max_interval: u32,
        /// Produce a clean document without tracked-change markup
        #[arg(long)]
        no_track_changes: bool,
        /// Keep the backdated timeline but show text as final, not suggestions
        #[arg(long)]
        accept_all_changes: bool,
        /// Document title
        #[arg(long)]
        title: Option<String>,
        /// Document subject
        #[arg(long)]
        subject: Option<String>,
        /// Document keywords
        #[arg(long)]
        keywords: Option<String>,
        /// Document comments
        #[arg(long)]
        comments: Option<String>,
        /// Total editing time in minutes
        #[arg(long)]
        total_edit_time: Option<u64>,
        /// Metadata store path
        #[arg(long, default_value = "data/palimpsest.db")]
        db: PathBuf,
    },
    /// Edit the timestamp of one sentence and rebuild the document
    EditTimestamp {
        /// Document to edit
        document: PathBuf,
        /// Sentence position (0-indexed)
        #[arg(short = 'n', long)]
        sentence: u32,
        /// New timestamp (e.g. "2025-01-15 14:30:00")
        #[arg(short, long)]
        timestamp: String,
        /// Metadata store path
        #[arg(long, default_value = "data/palimpsest.db")]
        db: PathBuf,
    },
    /// View stored metadata for a document
    ViewMetadata {
        /// Document to inspect
        document: PathBuf,
        /// Export the metadata snapshot to a JSON file
        #[arg(long)]
        json: Option<PathBuf>,
        /// Metadata store path
        #[arg(long, default_value = "data/palimpsest.db")]
        db: PathBuf,
    },
    /// Remove all metadata and revision history from a document
    Sanitize {
        /// Document to sanitize
        document: PathBuf,
        /// Output path (default: overwrites the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Neutral timestamp to stamp into the properties
        #[arg(long)]
        neutral_date: Option<String>,
    },
}

fn main() -> ExitCode {
    // the handle keeps the logger alive for the whole run
    let _logger = flexi_logger::Logger::try_with_env_or_str("warn")
        .and_then(|logger| logger.start())
        .map_err(|err| eprintln!("warning: could not initialize logging: {err}"))
        .ok();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Create {
            text,
            input_file,
            output,
            author,
            start_date,
            min_interval,
            max_interval,
            no_track_changes,
            accept_all_changes,
            title,
            subject,
            keywords,
            comments,
            total_edit_time,
            db,
        } => {
            let text = match (text, input_file) {
                (Some(text), _) => text,
                (None, Some(path)) => fs::read_to_string(&path)
                    .map_err(|_| Error::NotFound(path.display().to_string()))?,
                (None, None) => {
                    return Err(Error::Validation(
                        "provide either a text argument or --input-file".to_string(),
                    ));
                }
            };
            if text.trim().is_empty() {
                return Err(Error::Validation("text content is empty".to_string()));
            }

            let start = start_date.as_deref().map(parse_timestamp).transpose()?;
            let sentences = split_into_sentences(&text);
            println!("Found {} sentences", sentences.len());

            if let Some(parent) = db.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            let mut store = MetadataStore::open(&db)?;
            let doc = store.create_document(
                &output.display().to_string(),
                &sentences,
                start,
                min_interval,
                max_interval,
                &author,
            )?;

            let injector = RevisionInjector::new();
            let options = BuildOptions {
                accept_changes: no_track_changes || accept_all_changes,
                title,
                subject,
                keywords,
                comments,
                total_edit_minutes: total_edit_time,
            };
            build_document(&doc, &injector, &options, &output)?;

            println!("Document created: {}", output.display());
            println!(
                "Time range: {} -> {}",
                format_display(&doc.created_at),
                format_display(&doc.last_modified)
            );
            Ok(())
        }

        Command::EditTimestamp {
            document,
            sentence,
            timestamp,
            db,
        } => {
            if !document.exists() {
                return Err(Error::NotFound(document.display().to_string()));
            }
            let new_timestamp = parse_timestamp(&timestamp)?;

            let mut store = MetadataStore::open(&db)?;
            let filename = document.display().to_string();
            if !store.update_sentence_timestamp(&filename, sentence, new_timestamp)? {
                return Err(Error::NotFound(format!(
                    "sentence {sentence} of '{filename}'"
                )));
            }

            // rebuild the package so it reflects the stored timeline
            let doc = store
                .document_by_filename(&filename)?
                .ok_or_else(|| Error::NotFound(filename.clone()))?;
            let injector = RevisionInjector::new();
            build_document(&doc, &injector, &BuildOptions::default(), &document)?;

            println!(
                "Sentence {sentence} updated to {}",
                format_display(&new_timestamp)
            );
            Ok(())
        }

        Command::ViewMetadata { document, json, db } => {
            let store = MetadataStore::open(&db)?;
            let filename = document.display().to_string();
            let metadata = store
                .document_metadata(&filename)?
                .ok_or_else(|| Error::NotFound(format!("no metadata for '{filename}'")))?;

            if let Some(path) = json {
                fs::write(&path, serde_json::to_string_pretty(&metadata).map_err(
                    |e| Error::Validation(format!("could not serialize metadata: {e}")),
                )?)?;
                println!("Metadata exported to {}", path.display());
            }

            println!("Filename:  {}", metadata.filename);
            println!("Author:    {}", metadata.author);
            println!("Created:   {}", metadata.created_at);
            println!("Modified:  {}", metadata.last_modified);
            println!("Sentences: {}", metadata.sentence_count);
            for sentence in &metadata.sentences {
                let preview: String = sentence.text.chars().take(50).collect();
                println!(
                    "  [{}] {} | created {} | modified {}",
                    sentence.position, preview, sentence.created, sentence.modified
                );
            }
            Ok(())
        }

        Command::Sanitize {
            document,
            output,
            neutral_date,
        } => {
            let neutral = neutral_date.as_deref().map(parse_timestamp).transpose()?;
            let output = output.unwrap_or_else(|| document.clone());

            Sanitizer::new(neutral).sanitize(&document, &output)?;

            println!("Document sanitized: {}", output.display());
            println!("Removed: track changes, metadata, revision history");
            Ok(())
        }
    }
}
