//! Document properties for the package's metadata parts.
//!
//! Core properties (`docProps/core.xml`) are regenerated whole from a
//! builder; the extended-properties part (`docProps/app.xml`) is patched in
//! place because only its total-editing-duration field is under this
//! system's control.

use crate::common::error::Result;
use crate::common::xml::escape_xml;
use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;

use super::constants::{ns, part};
use super::package::ExtractedPackage;

const TOTAL_TIME: &str = "TotalTime";

/// Core document properties (metadata), stored in `docProps/core.xml`.
#[derive(Debug, Clone, Default)]
pub struct CoreProperties {
    /// Document creator/author
    pub creator: Option<String>,
    /// Document title
    pub title: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Document keywords (comma-separated)
    pub keywords: Option<String>,
    /// Document description/comments
    pub description: Option<String>,
    /// Last modified by
    pub last_modified_by: Option<String>,
    /// Revision counter
    pub revision: Option<u32>,
    /// Creation date
    pub created: Option<DateTime<Utc>>,
    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

impl CoreProperties {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document creator/author.
    pub fn creator(mut self, creator: &str) -> Self {
        self.creator = Some(creator.to_string());
        self
    }

    /// Set the document title.
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Set the document subject.
    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    /// Set the document keywords.
    pub fn keywords(mut self, keywords: &str) -> Self {
        self.keywords = Some(keywords.to_string());
        self
    }

    /// Set the document description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Set who last modified the document.
    pub fn last_modified_by(mut self, name: &str) -> Self {
        self.last_modified_by = Some(name.to_string());
        self
    }

    /// Set the revision counter.
    pub fn revision(mut self, revision: u32) -> Self {
        self.revision = Some(revision);
        self
    }

    /// Set the creation date.
    pub fn created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// Set the last modification date.
    pub fn modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Generate the complete core.xml content for this property set.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(&format!(
            r#"<cp:coreProperties xmlns:cp="{}" xmlns:dc="{}" xmlns:dcterms="{}" xmlns:dcmitype="{}" xmlns:xsi="{}">"#,
            ns::CP,
            ns::DC,
            ns::DCTERMS,
            ns::DCMITYPE,
            ns::XSI,
        ));

        if let Some(ref title) = self.title {
            push_element(&mut xml, "dc:title", title);
        }
        if let Some(ref subject) = self.subject {
            push_element(&mut xml, "dc:subject", subject);
        }
        if let Some(ref creator) = self.creator {
            push_element(&mut xml, "dc:creator", creator);
        }
        if let Some(ref keywords) = self.keywords {
            push_element(&mut xml, "cp:keywords", keywords);
        }
        if let Some(ref description) = self.description {
            push_element(&mut xml, "dc:description", description);
        }
        if let Some(ref last_modified_by) = self.last_modified_by {
            push_element(&mut xml, "cp:lastModifiedBy", last_modified_by);
        }
        if let Some(revision) = self.revision {
            push_element(&mut xml, "cp:revision", &revision.to_string());
        }
        if let Some(ref created) = self.created {
            xml.push_str("<dcterms:created xsi:type=\"dcterms:W3CDTF\">");
            xml.push_str(&crate::common::timestamp::format_w3cdtf(created));
            xml.push_str("</dcterms:created>");
        }
        if let Some(ref modified) = self.modified {
            xml.push_str("<dcterms:modified xsi:type=\"dcterms:W3CDTF\">");
            xml.push_str(&crate::common::timestamp::format_w3cdtf(modified));
            xml.push_str("</dcterms:modified>");
        }

        xml.push_str("</cp:coreProperties>");
        xml
    }

    /// Write this property set as the package's core-properties part.
    pub fn apply(&self, pkg: &ExtractedPackage) -> Result<()> {
        pkg.write_part(part::CORE_PROPERTIES, &self.to_xml())
    }
}

fn push_element(xml: &mut String, qname: &str, text: &str) {
    xml.push('<');
    xml.push_str(qname);
    xml.push('>');
    xml.push_str(&escape_xml(text));
    xml.push_str("</");
    xml.push_str(qname);
    xml.push('>');
}

/// Set the total editing duration in the extended-properties part, as a
/// plain integer count of minutes.
///
/// An existing `<TotalTime>` element is replaced, never duplicated. When
/// `docProps/app.xml` is absent a minimal part containing an application
/// name and the duration is synthesized.
pub fn set_total_edit_time(pkg: &ExtractedPackage, minutes: u64) -> Result<()> {
    let Some(xml) = pkg.read_part(part::APP_PROPERTIES)? else {
        let synthesized = format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<Properties xmlns="{ep}" xmlns:vt="{vt}">"#,
                "<Application>Microsoft Office Word</Application>",
                "<TotalTime>{minutes}</TotalTime>",
                "</Properties>"
            ),
            ep = ns::EP,
            vt = ns::VT,
            minutes = minutes,
        );
        return pkg.write_part(part::APP_PROPERTIES, &synthesized);
    };

    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(false);

    let mut out = String::with_capacity(xml.len() + 32);
    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event()?;
        let after = reader.buffer_position() as usize;

        match event {
            // existing duration is dropped; the fresh value lands at the end
            Event::Start(ref e) if e.name().as_ref() == TOTAL_TIME.as_bytes() => {
                reader.read_to_end(e.name())?;
            }
            Event::Empty(ref e) if e.name().as_ref() == TOTAL_TIME.as_bytes() => {}
            Event::End(ref e) if e.name().as_ref() == b"Properties" => {
                out.push_str(&format!("<TotalTime>{minutes}</TotalTime>"));
                out.push_str(&xml[before..after]);
            }
            Event::Eof => break,
            _ => out.push_str(&xml[before..after]),
        }
    }

    pkg.write_part(part::APP_PROPERTIES, &out)
}
