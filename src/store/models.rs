//! Data model for persisted document provenance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fabricated document with its edit-history metadata.
///
/// Instances returned by the store are fully detached snapshots: later store
/// mutations never retroactively change a previously returned value.
#[derive(Debug, Clone)]
pub struct Document {
    /// Row id in the store
    pub id: i64,
    /// Output filename the document was created under
    pub filename: String,
    /// Creation timestamp (equals the first sentence's timestamp)
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp (equals the last sentence's timestamp)
    pub last_modified: DateTime<Utc>,
    /// Document author
    pub author: String,
    /// Who last modified the document
    pub last_modified_by: String,
    /// Sentences in position order
    pub sentences: Vec<Sentence>,
}

/// A sentence within a document, carrying its fabricated edit timestamps.
#[derive(Debug, Clone)]
pub struct Sentence {
    /// Row id in the store
    pub id: i64,
    /// Owning document id
    pub document_id: i64,
    /// Sentence text (non-empty)
    pub text: String,
    /// Index within the document's display order, dense 0..n-1
    pub position: u32,
    /// When the sentence was "written"
    pub created_timestamp: DateTime<Utc>,
    /// When the sentence was last "edited"
    pub modified_timestamp: DateTime<Utc>,
    /// Sentence author
    pub author: String,
    /// Revision-marker identifier, unique within the document (position + 1)
    pub revision_id: u32,
}

/// Read-only metadata projection suitable for display and JSON export.
///
/// Timestamps are rendered in ISO-8601 textual form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub id: i64,
    pub filename: String,
    pub created_at: String,
    pub last_modified: String,
    pub author: String,
    pub last_modified_by: String,
    pub sentence_count: usize,
    pub sentences: Vec<SentenceMetadata>,
}

/// Per-sentence slice of [`DocumentMetadata`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceMetadata {
    pub position: u32,
    pub text: String,
    pub created: String,
    pub modified: String,
    pub author: String,
    pub revision_id: u32,
}

impl Document {
    /// Build the display/export projection for this document.
    pub fn to_metadata(&self) -> DocumentMetadata {
        DocumentMetadata {
            id: self.id,
            filename: self.filename.clone(),
            created_at: self.created_at.to_rfc3339(),
            last_modified: self.last_modified.to_rfc3339(),
            author: self.author.clone(),
            last_modified_by: self.last_modified_by.clone(),
            sentence_count: self.sentences.len(),
            sentences: self
                .sentences
                .iter()
                .map(|s| SentenceMetadata {
                    position: s.position,
                    text: s.text.clone(),
                    created: s.created_timestamp.to_rfc3339(),
                    modified: s.modified_timestamp.to_rfc3339(),
                    author: s.author.clone(),
                    revision_id: s.revision_id,
                })
                .collect(),
        }
    }
}
