//! Document sanitizer: strips revision history and neutralizes metadata.
//!
//! The inverse of the injector. Insertions are unwrapped in place (their
//! content is kept, provenance discarded), deletions and move/format-change
//! markers are removed with their content, revision tracking is undeclared,
//! and both property parts are rewritten to fixed anonymous values. Every
//! sub-step is a no-op when its target part or element is absent, so
//! sanitizing an already-sanitized package is idempotent.

use crate::common::error::Result;
use crate::common::xml::escape_xml;
use chrono::{DateTime, TimeZone, Utc};
use log::debug;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::path::Path;

use super::constants::part;
use super::element;
use super::package::ExtractedPackage;

/// Fixed value substituted for author-identifying fields.
const ANONYMOUS: &str = "Anonymous";

/// Extended-properties fields naming the producing application, cleared to
/// empty during sanitization.
const APP_FIELDS_TO_CLEAR: &[&str] = &["Application", "Company", "Manager", "AppVersion"];

/// Revision markers whose whole subtree is discarded (their content is not
/// independently meaningful, unlike insertions).
const MARKERS_TO_DROP: &[&str] = &[
    element::W_DEL,
    element::W_MOVE_FROM,
    element::W_MOVE_TO,
    element::W_RPR_CHANGE,
    element::W_PPR_CHANGE,
];

/// Strips provenance from an existing package.
pub struct Sanitizer {
    neutral_timestamp: DateTime<Utc>,
}

impl Sanitizer {
    /// Create a sanitizer using the given neutral timestamp for both the
    /// creation and modification properties, or the fixed default
    /// `2000-01-01T00:00:00Z` when none is supplied.
    pub fn new(neutral_timestamp: Option<DateTime<Utc>>) -> Self {
        let default = Utc
            .with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            neutral_timestamp: neutral_timestamp.unwrap_or(default),
        }
    }

    /// Sanitize `input` and write the result to `output` (which may be the
    /// same path; the original is only replaced at the final repack step).
    pub fn sanitize<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<()> {
        let pkg = ExtractedPackage::extract(input)?;

        if let Some(xml) = pkg.read_part(part::DOCUMENT)? {
            pkg.write_part(part::DOCUMENT, &strip_revision_markers(&xml)?)?;
        }
        if let Some(xml) = pkg.read_part(part::SETTINGS)? {
            pkg.write_part(part::SETTINGS, &remove_track_revisions(&xml)?)?;
        }
        if let Some(xml) = pkg.read_part(part::CORE_PROPERTIES)? {
            pkg.write_part(
                part::CORE_PROPERTIES,
                &neutralize_core_properties(&xml, &self.neutral_timestamp)?,
            )?;
        }
        if let Some(xml) = pkg.read_part(part::APP_PROPERTIES)? {
            pkg.write_part(part::APP_PROPERTIES, &clear_app_properties(&xml)?)?;
        }

        pkg.repack(output)?;
        debug!("sanitized package");
        Ok(())
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Unwrap insertions (children promoted in place) and remove deletion,
/// move, and format-change markers with their content.
fn strip_revision_markers(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut out = String::with_capacity(xml.len());
    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event()?;
        let after = reader.buffer_position() as usize;

        match event {
            // dropping only the wrapper tags promotes the children in place
            Event::Start(ref e) | Event::Empty(ref e)
                if e.name().as_ref() == element::W_INS.as_bytes() => {}
            Event::End(ref e) if e.name().as_ref() == element::W_INS.as_bytes() => {}
            Event::Start(ref e) if is_droppable_marker(e.name().as_ref()) => {
                reader.read_to_end(e.name())?;
            }
            Event::Empty(ref e) if is_droppable_marker(e.name().as_ref()) => {}
            Event::Eof => break,
            _ => out.push_str(&xml[before..after]),
        }
    }
    Ok(out)
}

fn is_droppable_marker(name: &[u8]) -> bool {
    MARKERS_TO_DROP.iter().any(|m| m.as_bytes() == name)
}

/// Remove the `<w:trackRevisions/>` declaration from the settings part.
fn remove_track_revisions(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut out = String::with_capacity(xml.len());
    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event()?;
        let after = reader.buffer_position() as usize;

        match event {
            Event::Start(ref e) if e.name().as_ref() == element::W_TRACK_REVISIONS.as_bytes() => {
                reader.read_to_end(e.name())?;
            }
            Event::Empty(ref e) if e.name().as_ref() == element::W_TRACK_REVISIONS.as_bytes() => {}
            Event::Eof => break,
            _ => out.push_str(&xml[before..after]),
        }
    }
    Ok(out)
}

/// Rewrite author-identifying core properties to anonymous/empty values and
/// set both timestamps to the neutral timestamp.
fn neutralize_core_properties(xml: &str, neutral: &DateTime<Utc>) -> Result<String> {
    let stamp = crate::common::timestamp::format_w3cdtf(neutral);
    let replacements: &[(&str, &str)] = &[
        ("dc:creator", ANONYMOUS),
        ("dc:title", ""),
        ("dc:subject", ""),
        ("dc:description", ""),
        ("cp:lastModifiedBy", ANONYMOUS),
        ("cp:revision", "1"),
        ("cp:keywords", ""),
        ("dcterms:created", &stamp),
        ("dcterms:modified", &stamp),
    ];
    replace_element_text(xml, replacements)
}

/// Clear extended-properties fields naming the producing application.
fn clear_app_properties(xml: &str) -> Result<String> {
    let replacements: Vec<(&str, &str)> =
        APP_FIELDS_TO_CLEAR.iter().map(|field| (*field, "")).collect();
    replace_element_text(xml, &replacements)
}

/// Replace the text content of each listed element, preserving its start
/// tag (attributes included) verbatim. Elements absent from the document
/// are left alone; the pass never fails on missing targets.
fn replace_element_text(xml: &str, replacements: &[(&str, &str)]) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut out = String::with_capacity(xml.len());
    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event()?;
        let after = reader.buffer_position() as usize;

        match event {
            Event::Start(ref e) => {
                let name = e.name();
                if let Some((qname, value)) = replacements
                    .iter()
                    .find(|(qname, _)| qname.as_bytes() == name.as_ref())
                {
                    out.push_str(&xml[before..after]);
                    reader.read_to_end(e.name())?;
                    out.push_str(&escape_xml(value));
                    out.push_str("</");
                    out.push_str(qname);
                    out.push('>');
                } else {
                    out.push_str(&xml[before..after]);
                }
            }
            Event::Empty(ref e) => {
                let name = e.name();
                let raw = &xml[before..after];
                match replacements
                    .iter()
                    .find(|(qname, value)| qname.as_bytes() == name.as_ref() && !value.is_empty())
                {
                    // expand a collapsed element so the value has somewhere to live
                    Some((qname, value)) => {
                        let open = raw.trim_end().trim_end_matches("/>");
                        out.push_str(open);
                        out.push('>');
                        out.push_str(&escape_xml(value));
                        out.push_str("</");
                        out.push_str(qname);
                        out.push('>');
                    }
                    None => out.push_str(raw),
                }
            }
            Event::Eof => break,
            _ => out.push_str(&xml[before..after]),
        }
    }
    Ok(out)
}
