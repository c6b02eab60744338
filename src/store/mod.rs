//! SQLite-backed metadata store for documents and sentences.
//!
//! The store is the source of truth for what the package editor encodes:
//! it assigns per-sentence timestamps with randomized positive intervals at
//! creation time and persists them with the authorship the injector stamps
//! into the package.
//!
//! Error-signaling convention (deliberate, callers rely on both sides):
//! mutations that reference an absent document or position return
//! `Ok(false)` — no exception path; malformed caller input (empty sentence
//! list, min > max interval) raises [`Error::Validation`].

pub mod models;

use crate::common::error::{Error, Result};
use crate::common::timestamp::now_seconds;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use rand::RngExt;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::path::Path;

pub use models::{Document, DocumentMetadata, Sentence, SentenceMetadata};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    created_at TEXT NOT NULL,
    last_modified TEXT NOT NULL,
    author TEXT NOT NULL,
    last_modified_by TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS sentences (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    document_id INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    sentence_text TEXT NOT NULL,
    position INTEGER NOT NULL,
    created_timestamp TEXT NOT NULL,
    modified_timestamp TEXT NOT NULL,
    author TEXT NOT NULL,
    revision_id INTEGER NOT NULL,
    UNIQUE (document_id, position)
);
";

/// Manages document and sentence metadata in a local SQLite database.
///
/// Single-writer, non-concurrent access is assumed; every public mutation
/// runs in its own transaction, so a mid-operation failure leaves no
/// partial document visible to subsequent reads.
pub struct MetadataStore {
    conn: Connection,
}

impl MetadataStore {
    /// Open (or create) a store at the given path and ensure the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::bootstrap(conn)
    }

    /// Open an in-memory store, used mainly by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(SCHEMA)?;
        debug!("metadata store opened, schema ensured");
        Ok(Self { conn })
    }

    /// Create a document together with its sentences in one transaction.
    ///
    /// The first sentence gets `start_timestamp` (or the current time when
    /// omitted); each subsequent sentence's timestamp is the previous one
    /// plus a uniform random interval in `[min_interval, max_interval]`
    /// whole seconds. `created_timestamp == modified_timestamp` at creation,
    /// `position == index`, `revision_id == index + 1`, and the document's
    /// `last_modified` equals the last sentence's timestamp.
    ///
    /// # Errors
    /// [`Error::Validation`] when `texts` is empty or
    /// `min_interval > max_interval`.
    pub fn create_document(
        &mut self,
        filename: &str,
        texts: &[String],
        start_timestamp: Option<DateTime<Utc>>,
        min_interval: u32,
        max_interval: u32,
        author: &str,
    ) -> Result<Document> {
        if texts.is_empty() {
            return Err(Error::Validation("sentence list is empty".to_string()));
        }
        if min_interval > max_interval {
            return Err(Error::Validation(format!(
                "min interval {min_interval} exceeds max interval {max_interval}"
            )));
        }

        let start = start_timestamp.unwrap_or_else(now_seconds);
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO documents (filename, created_at, last_modified, author, last_modified_by)
             VALUES (?1, ?2, ?2, ?3, ?3)",
            params![filename, start.to_rfc3339(), author],
        )?;
        let doc_id = tx.last_insert_rowid();

        let mut rng = rand::rng();
        let mut current = start;
        let mut sentences = Vec::with_capacity(texts.len());

        for (idx, text) in texts.iter().enumerate() {
            tx.execute(
                "INSERT INTO sentences
                 (document_id, sentence_text, position, created_timestamp, modified_timestamp, author, revision_id)
                 VALUES (?1, ?2, ?3, ?4, ?4, ?5, ?6)",
                params![
                    doc_id,
                    text,
                    idx as u32,
                    current.to_rfc3339(),
                    author,
                    (idx + 1) as u32
                ],
            )?;
            sentences.push(Sentence {
                id: tx.last_insert_rowid(),
                document_id: doc_id,
                text: text.clone(),
                position: idx as u32,
                created_timestamp: current,
                modified_timestamp: current,
                author: author.to_string(),
                revision_id: (idx + 1) as u32,
            });

            if idx < texts.len() - 1 {
                let interval = rng.random_range(min_interval..=max_interval);
                current += Duration::seconds(i64::from(interval));
            }
        }

        tx.execute(
            "UPDATE documents SET last_modified = ?1 WHERE id = ?2",
            params![current.to_rfc3339(), doc_id],
        )?;
        tx.commit()?;

        info!(
            "created document '{filename}' with {} sentences spanning {} .. {}",
            sentences.len(),
            start.to_rfc3339(),
            current.to_rfc3339()
        );

        Ok(Document {
            id: doc_id,
            filename: filename.to_string(),
            created_at: start,
            last_modified: current,
            author: author.to_string(),
            last_modified_by: author.to_string(),
            sentences,
        })
    }

    /// Look up a document by filename, with its sentences loaded in
    /// position order. Returns `Ok(None)` when no such document exists.
    pub fn document_by_filename(&self, filename: &str) -> Result<Option<Document>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, filename, created_at, last_modified, author, last_modified_by
                 FROM documents WHERE filename = ?1",
                params![filename],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, filename, created_at, last_modified, author, last_modified_by)) = row else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT id, document_id, sentence_text, position, created_timestamp, modified_timestamp, author, revision_id
             FROM sentences WHERE document_id = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, u32>(7)?,
            ))
        })?;

        let mut sentences = Vec::new();
        for row in rows {
            let (sid, document_id, text, position, created, modified, author, revision_id) = row?;
            sentences.push(Sentence {
                id: sid,
                document_id,
                text,
                position,
                created_timestamp: parse_stored(&created)?,
                modified_timestamp: parse_stored(&modified)?,
                author,
                revision_id,
            });
        }

        Ok(Some(Document {
            id,
            filename,
            created_at: parse_stored(&created_at)?,
            last_modified: parse_stored(&last_modified)?,
            author,
            last_modified_by,
            sentences,
        }))
    }

    /// Update the modified timestamp of one sentence, addressed by document
    /// filename and position.
    ///
    /// Returns `Ok(false)` (without touching anything) when the document or
    /// position does not exist — callers must check the return value. When
    /// the updated sentence holds the highest position, the new timestamp
    /// propagates to the document's `last_modified`; edits at any other
    /// position leave `last_modified` untouched even if that makes it stale
    /// — only the last position is treated as authoritative for the
    /// document-level timestamp.
    pub fn update_sentence_timestamp(
        &mut self,
        filename: &str,
        position: u32,
        new_timestamp: DateTime<Utc>,
    ) -> Result<bool> {
        let tx = self.conn.transaction()?;

        let Some(doc_id) = lookup_document_id(&tx, filename)? else {
            return Ok(false);
        };

        let updated = tx.execute(
            "UPDATE sentences SET modified_timestamp = ?1 WHERE document_id = ?2 AND position = ?3",
            params![new_timestamp.to_rfc3339(), doc_id, position],
        )?;
        if updated == 0 {
            return Ok(false);
        }

        let max_position: u32 = tx.query_row(
            "SELECT MAX(position) FROM sentences WHERE document_id = ?1",
            params![doc_id],
            |row| row.get(0),
        )?;
        if position == max_position {
            tx.execute(
                "UPDATE documents SET last_modified = ?1 WHERE id = ?2",
                params![new_timestamp.to_rfc3339(), doc_id],
            )?;
        }

        tx.commit()?;
        debug!("updated sentence {position} of '{filename}' to {}", new_timestamp.to_rfc3339());
        Ok(true)
    }

    /// Read-only metadata snapshot for display or JSON export.
    /// Returns `Ok(None)` when the document is unknown.
    pub fn document_metadata(&self, filename: &str) -> Result<Option<DocumentMetadata>> {
        Ok(self.document_by_filename(filename)?.map(|doc| doc.to_metadata()))
    }

    /// Delete a document and (by cascade) all its sentences.
    /// Returns `Ok(false)` when no document has the given filename.
    pub fn delete_document(&mut self, filename: &str) -> Result<bool> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute("DELETE FROM documents WHERE filename = ?1", params![filename])?;
        tx.commit()?;
        if deleted > 0 {
            info!("deleted document '{filename}'");
        }
        Ok(deleted > 0)
    }
}

fn lookup_document_id(tx: &Transaction<'_>, filename: &str) -> Result<Option<i64>> {
    Ok(tx
        .query_row(
            "SELECT id FROM documents WHERE filename = ?1",
            params![filename],
            |row| row.get(0),
        )
        .optional()?)
}

fn parse_stored(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| Error::Timestamp(text.to_string()))
}
