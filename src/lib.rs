//! Palimpsest - fabricate and strip plausible revision history in
//! WordprocessingML (`.docx`) packages.
//!
//! Given raw text, palimpsest splits it into sentences, fabricates a
//! sequence of timestamped edits (one per sentence) with randomized
//! intervals, persists that provenance in a local SQLite store, and encodes
//! it into a `.docx` package so a word processor shows a believable edit
//! timeline — either as tracked-change suggestions or as already-accepted
//! edits with backdated timestamps. The inverse operation strips all such
//! provenance from an existing package.
//!
//! # Example - fabricating a tracked-change document
//!
//! ```no_run
//! use palimpsest::docx::{BuildOptions, RevisionInjector, build_document};
//! use palimpsest::store::MetadataStore;
//! use palimpsest::text::split_into_sentences;
//! use std::path::Path;
//!
//! # fn main() -> palimpsest::Result<()> {
//! let sentences = split_into_sentences("This is one. This is two.");
//! let mut store = MetadataStore::open("data/palimpsest.db")?;
//! let doc = store.create_document("report.docx", &sentences, None, 30, 300, "Ann")?;
//!
//! let injector = RevisionInjector::new();
//! build_document(&doc, &injector, &BuildOptions::default(), Path::new("report.docx"))?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - sanitizing a document
//!
//! ```no_run
//! use palimpsest::docx::Sanitizer;
//!
//! # fn main() -> palimpsest::Result<()> {
//! Sanitizer::new(None).sanitize("report.docx", "clean.docx")?;
//! # Ok(())
//! # }
//! ```

/// Shared error type, timestamps, identifiers, and XML helpers
pub mod common;

/// WordprocessingML package editor: injector, properties, sanitizer,
/// scaffold, and the ordered repacker
pub mod docx;

/// SQLite-backed metadata store for fabricated edit histories
pub mod store;

/// Sentence segmentation collaborator
pub mod text;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use docx::{BuildOptions, RevisionInjector, Sanitizer, build_document};
pub use store::{Document, DocumentMetadata, MetadataStore, Sentence};
