//! High-level document assembly.
//!
//! Glues the scaffold, properties editor, injector, and repacker into the
//! one operation callers actually want: turn a stored [`Document`] into a
//! finished `.docx` file on disk.

use crate::common::error::Result;
use crate::store::Document;
use log::info;
use std::path::Path;

use super::injector::RevisionInjector;
use super::package::ExtractedPackage;
use super::properties::{CoreProperties, set_total_edit_time};
use super::template;

/// Options controlling how the fabricated history is encoded.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Encode the history as already-accepted edits (plain final text with
    /// backdated properties) instead of tracked-change suggestions.
    pub accept_changes: bool,
    /// Document title
    pub title: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Document keywords
    pub keywords: Option<String>,
    /// Document comments/description
    pub comments: Option<String>,
    /// Total editing duration in minutes for the extended properties
    pub total_edit_minutes: Option<u64>,
}

/// Build a package from a stored document's sentences and write it to
/// `output`.
///
/// Core-property timestamps come from the document record (creation = first
/// sentence, modification = last), so the package's coarse metadata agrees
/// with the per-sentence revision timeline.
pub fn build_document(
    doc: &Document,
    injector: &RevisionInjector,
    options: &BuildOptions,
    output: &Path,
) -> Result<()> {
    let pkg = ExtractedPackage::empty()?;
    template::write_scaffold(&pkg)?;

    let mut props = CoreProperties::new()
        .creator(&doc.author)
        .last_modified_by(&doc.last_modified_by)
        .created(doc.created_at)
        .modified(doc.last_modified);
    if let Some(ref title) = options.title {
        props = props.title(title);
    }
    if let Some(ref subject) = options.subject {
        props = props.subject(subject);
    }
    if let Some(ref keywords) = options.keywords {
        props = props.keywords(keywords);
    }
    if let Some(ref comments) = options.comments {
        props = props.description(comments);
    }
    props.apply(&pkg)?;

    if let Some(minutes) = options.total_edit_minutes {
        set_total_edit_time(&pkg, minutes)?;
    }

    injector.inject(&pkg, &doc.sentences, options.accept_changes)?;
    pkg.repack(output)?;

    info!(
        "built {} with {} sentences ({})",
        output.display(),
        doc.sentences.len(),
        if options.accept_changes { "accepted edits" } else { "tracked changes" }
    );
    Ok(())
}
