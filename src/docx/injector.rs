//! Content injector: rewrites the document body with one block per
//! sentence, either as revision-tracked insertions or as plain final text.
//!
//! The rewrite is a single streaming pass: events are read with quick-xml
//! and untouched regions are copied from the source byte-for-byte, so
//! everything outside the body's paragraph list survives verbatim. A
//! trailing `<w:sectPr>` is detached during paragraph removal and
//! re-appended as the final body child, which consuming applications
//! require.

use crate::common::error::{Error, Result};
use crate::common::id::generate_session_id;
use crate::common::timestamp::format_w3cdtf;
use crate::store::Sentence;
use log::debug;
use quick_xml::Reader;
use quick_xml::events::Event;

use super::constants::{ns, part};
use super::element;
use super::package::ExtractedPackage;

/// Injects fabricated edit history into an extracted package.
///
/// The root editing-session identifier is generated once per injector
/// instance and reused across every call that instance makes; supply one
/// explicitly to make outputs reproducible in tests.
pub struct RevisionInjector {
    session_id: String,
}

impl RevisionInjector {
    /// Create an injector with a freshly generated root session id.
    pub fn new() -> Self {
        Self {
            session_id: generate_session_id(),
        }
    }

    /// Create an injector with a caller-supplied root session id.
    pub fn with_session_id(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }

    /// The root editing-session identifier this injector stamps.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Rewrite the package body with one block per sentence.
    ///
    /// With `accept_changes == false` each sentence is wrapped in a
    /// `<w:ins>` revision marker carrying its revision id, author, and
    /// modified timestamp, and revision tracking is declared in the
    /// settings part. With `accept_changes == true` the same layout is
    /// emitted as plain final text.
    ///
    /// # Errors
    /// [`Error::Structural`] when `word/document.xml` or its `<w:body>`
    /// cannot be located — the input is not a WordprocessingML package.
    pub fn inject(
        &self,
        pkg: &ExtractedPackage,
        sentences: &[Sentence],
        accept_changes: bool,
    ) -> Result<()> {
        let xml = pkg.read_part(part::DOCUMENT)?.ok_or_else(|| {
            Error::Structural(format!("package has no {}", part::DOCUMENT))
        })?;

        let rewritten = self.rewrite_document(&xml, sentences, accept_changes)?;
        pkg.write_part(part::DOCUMENT, &rewritten)?;

        if !accept_changes {
            self.enable_revision_tracking(pkg)?;
        }
        debug!(
            "injected {} sentence blocks ({})",
            sentences.len(),
            if accept_changes { "clean" } else { "tracked" }
        );
        Ok(())
    }

    /// Stream through `document.xml`, dropping existing paragraphs and
    /// emitting the new sentence blocks before the re-appended sectPr.
    fn rewrite_document(
        &self,
        xml: &str,
        sentences: &[Sentence],
        accept_changes: bool,
    ) -> Result<String> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut out = String::with_capacity(xml.len() + sentences.len() * 256);
        let mut in_body = false;
        let mut found_body = false;
        let mut section_props: Option<String> = None;

        loop {
            let before = reader.buffer_position() as usize;
            let event = reader.read_event()?;
            let after = reader.buffer_position() as usize;

            match event {
                Event::Start(ref e) if !in_body && e.name().as_ref() == element::W_BODY.as_bytes() => {
                    in_body = true;
                    found_body = true;
                    out.push_str(&xml[before..after]);
                }
                Event::Start(ref e) if in_body && e.name().as_ref() == element::W_P.as_bytes() => {
                    // existing paragraph: dropped wholesale
                    reader.read_to_end(e.name())?;
                }
                Event::Empty(ref e) if in_body && e.name().as_ref() == element::W_P.as_bytes() => {}
                Event::Start(ref e)
                    if in_body && e.name().as_ref() == element::W_SECT_PR.as_bytes() =>
                {
                    reader.read_to_end(e.name())?;
                    let end = reader.buffer_position() as usize;
                    section_props = Some(xml[before..end].to_string());
                }
                Event::Empty(ref e)
                    if in_body && e.name().as_ref() == element::W_SECT_PR.as_bytes() =>
                {
                    section_props = Some(xml[before..after].to_string());
                }
                // any other body child (a table, say) is preserved wholesale,
                // paragraphs inside it included
                Event::Start(ref e) if in_body => {
                    reader.read_to_end(e.name())?;
                    let end = reader.buffer_position() as usize;
                    out.push_str(&xml[before..end]);
                }
                Event::End(ref e) if in_body && e.name().as_ref() == element::W_BODY.as_bytes() => {
                    for (idx, sentence) in sentences.iter().enumerate() {
                        let last = idx == sentences.len() - 1;
                        out.push_str(&self.sentence_block(sentence, last, accept_changes));
                    }
                    if let Some(ref sect_pr) = section_props {
                        out.push_str(sect_pr);
                    }
                    out.push_str(&xml[before..after]);
                    in_body = false;
                }
                Event::Eof => break,
                _ => out.push_str(&xml[before..after]),
            }
        }

        if !found_body {
            return Err(Error::Structural(
                "could not find document body".to_string(),
            ));
        }
        Ok(out)
    }

    /// One paragraph block for a sentence. In tracked mode the text run and
    /// the trailing separator run live inside the same insertion marker; in
    /// clean mode the separator is a plain sibling run.
    fn sentence_block(&self, sentence: &Sentence, last: bool, accept_changes: bool) -> String {
        if accept_changes {
            let mut content = element::text_run(&sentence.text, None);
            if !last {
                content.push_str(&element::space_run(None));
            }
            return element::paragraph(None, &content);
        }

        let rsid = Some(self.session_id.as_str());
        let mut runs = element::text_run(&sentence.text, rsid);
        if !last {
            runs.push_str(&element::space_run(rsid));
        }
        let ins = element::insertion(
            sentence.revision_id,
            &sentence.author,
            &format_w3cdtf(&sentence.modified_timestamp),
            &runs,
        );
        element::paragraph(rsid, &ins)
    }

    /// Ensure the settings part declares `<w:trackRevisions/>` and a
    /// `<w:rsids>` block carrying the root session id. Both declarations
    /// are idempotent; an absent settings part is synthesized whole.
    fn enable_revision_tracking(&self, pkg: &ExtractedPackage) -> Result<()> {
        let Some(xml) = pkg.read_part(part::SETTINGS)? else {
            pkg.write_part(part::SETTINGS, &self.minimal_settings_xml())?;
            return Ok(());
        };

        let mut reader = Reader::from_str(&xml);
        reader.config_mut().trim_text(false);

        let mut out = String::with_capacity(xml.len() + 160);
        let mut has_track_revisions = false;
        let mut has_rsids = false;
        let mut rewritten = false;

        loop {
            let before = reader.buffer_position() as usize;
            let event = reader.read_event()?;
            let after = reader.buffer_position() as usize;

            match event {
                Event::Start(ref e) | Event::Empty(ref e)
                    if e.name().as_ref() == element::W_TRACK_REVISIONS.as_bytes() =>
                {
                    has_track_revisions = true;
                    out.push_str(&xml[before..after]);
                }
                Event::Start(ref e) | Event::Empty(ref e)
                    if e.name().as_ref() == element::W_RSIDS.as_bytes() =>
                {
                    has_rsids = true;
                    out.push_str(&xml[before..after]);
                }
                Event::End(ref e) if e.name().as_ref() == element::W_SETTINGS.as_bytes() => {
                    self.push_missing_declarations(&mut out, has_track_revisions, has_rsids);
                    out.push_str(&xml[before..after]);
                    rewritten = true;
                }
                // settings root collapsed to an empty element: expand it
                Event::Empty(ref e) if e.name().as_ref() == element::W_SETTINGS.as_bytes() => {
                    let raw = &xml[before..after];
                    let open = raw.trim_end().trim_end_matches("/>");
                    out.push_str(open);
                    out.push('>');
                    self.push_missing_declarations(&mut out, false, false);
                    out.push_str("</");
                    out.push_str(element::W_SETTINGS);
                    out.push('>');
                    rewritten = true;
                }
                Event::Eof => break,
                _ => out.push_str(&xml[before..after]),
            }
        }

        if !rewritten {
            return Err(Error::Structural(
                "could not find settings root".to_string(),
            ));
        }
        pkg.write_part(part::SETTINGS, &out)
    }

    fn push_missing_declarations(&self, out: &mut String, has_track: bool, has_rsids: bool) {
        if !has_track {
            out.push('<');
            out.push_str(element::W_TRACK_REVISIONS);
            out.push_str("/>");
        }
        if !has_rsids {
            out.push('<');
            out.push_str(element::W_RSIDS);
            out.push_str("><");
            out.push_str(element::W_RSID_ROOT);
            out.push_str(" w:val=\"");
            out.push_str(&self.session_id);
            out.push_str("\"/><");
            out.push_str(element::W_RSID);
            out.push_str(" w:val=\"");
            out.push_str(&self.session_id);
            out.push_str("\"/></");
            out.push_str(element::W_RSIDS);
            out.push('>');
        }
    }

    fn minimal_settings_xml(&self) -> String {
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:settings xmlns:w="{}">"#,
            ns::W
        );
        self.push_missing_declarations(&mut xml, false, false);
        xml.push_str("</w:settings>");
        xml
    }
}

impl Default for RevisionInjector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::timestamp::parse_timestamp;
    use crate::docx::template;

    fn sentence(position: u32, text: &str, stamp: &str) -> Sentence {
        let ts = parse_timestamp(stamp).unwrap();
        Sentence {
            id: position as i64 + 1,
            document_id: 1,
            text: text.to_string(),
            position,
            created_timestamp: ts,
            modified_timestamp: ts,
            author: "Ann".to_string(),
            revision_id: position + 1,
        }
    }

    const DOC_XML: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
        r#"<w:body><w:p><w:r><w:t>old text</w:t></w:r></w:p>"#,
        r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr>"#,
        r#"</w:body></w:document>"#
    );

    #[test]
    fn test_tracked_rewrite_wraps_sentences_in_insertions() {
        let injector = RevisionInjector::with_session_id("00AB12CD");
        let sentences = vec![
            sentence(0, "First.", "2025-01-01 10:00:00"),
            sentence(1, "Second.", "2025-01-01 10:01:00"),
        ];

        let out = injector.rewrite_document(DOC_XML, &sentences, false).unwrap();

        assert!(!out.contains("old text"));
        assert!(out.contains(
            r#"<w:ins w:id="1" w:author="Ann" w:date="2025-01-01T10:00:00Z">"#
        ));
        assert!(out.contains(
            r#"<w:ins w:id="2" w:author="Ann" w:date="2025-01-01T10:01:00Z">"#
        ));
        assert!(out.contains(r#"w:rsidR="00AB12CD""#));
    }

    #[test]
    fn test_separator_run_inside_insertion_in_tracked_mode() {
        let injector = RevisionInjector::with_session_id("00AB12CD");
        let sentences = vec![
            sentence(0, "First.", "2025-01-01 10:00:00"),
            sentence(1, "Second.", "2025-01-01 10:01:00"),
        ];

        let out = injector.rewrite_document(DOC_XML, &sentences, false).unwrap();

        // space run for the first sentence sits before its </w:ins>
        let first_ins_end = out.find("</w:ins>").unwrap();
        let space_at = out.find(r#"<w:t xml:space="preserve"> </w:t>"#).unwrap();
        assert!(space_at < first_ins_end);
        // the last sentence gets no separator
        assert_eq!(out.matches(r#"> </w:t>"#).count(), 1);
    }

    #[test]
    fn test_clean_rewrite_has_no_insertions() {
        let injector = RevisionInjector::with_session_id("00AB12CD");
        let sentences = vec![
            sentence(0, "First.", "2025-01-01 10:00:00"),
            sentence(1, "Second.", "2025-01-01 10:01:00"),
        ];

        let out = injector.rewrite_document(DOC_XML, &sentences, true).unwrap();

        assert!(!out.contains("<w:ins"));
        assert!(!out.contains("w:rsidR"));
        assert!(out.contains(r#"<w:t xml:space="preserve">First.</w:t>"#));
        assert!(out.contains(r#"<w:t xml:space="preserve">Second.</w:t>"#));
    }

    #[test]
    fn test_section_properties_stay_final_child() {
        let injector = RevisionInjector::with_session_id("00AB12CD");
        let sentences = vec![sentence(0, "Only.", "2025-01-01 10:00:00")];

        let out = injector.rewrite_document(DOC_XML, &sentences, false).unwrap();

        let sect = out.find("<w:sectPr>").unwrap();
        let para = out.find("<w:p ").unwrap();
        let body_end = out.find("</w:body>").unwrap();
        assert!(para < sect);
        assert_eq!(&out[sect..body_end], r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr>"#);
    }

    #[test]
    fn test_tables_survive_with_their_paragraphs() {
        let xml = concat!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            "<w:body>",
            "<w:p><w:r><w:t>old text</w:t></w:r></w:p>",
            "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>",
            "</w:body></w:document>"
        );
        let injector = RevisionInjector::with_session_id("00AB12CD");
        let out = injector
            .rewrite_document(xml, &[sentence(0, "New.", "2025-01-01 10:00:00")], false)
            .unwrap();

        assert!(!out.contains("old text"));
        assert!(out.contains("<w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"));
    }

    #[test]
    fn test_missing_body_is_structural_error() {
        let injector = RevisionInjector::new();
        let err = injector
            .rewrite_document("<w:document/>", &[sentence(0, "X.", "2025-01-01")], false)
            .unwrap_err();
        assert!(matches!(err, Error::Structural(_)));
    }

    #[test]
    fn test_enable_revision_tracking_is_idempotent() {
        let pkg = ExtractedPackage::empty().unwrap();
        template::write_scaffold(&pkg).unwrap();

        let injector = RevisionInjector::with_session_id("00AB12CD");
        injector.enable_revision_tracking(&pkg).unwrap();
        let once = pkg.read_part(part::SETTINGS).unwrap().unwrap();
        injector.enable_revision_tracking(&pkg).unwrap();
        let twice = pkg.read_part(part::SETTINGS).unwrap().unwrap();

        assert_eq!(once, twice);
        assert_eq!(once.matches("<w:trackRevisions/>").count(), 1);
        assert!(once.contains(r#"<w:rsidRoot w:val="00AB12CD"/>"#));
    }

    #[test]
    fn test_settings_synthesized_when_absent() {
        let pkg = ExtractedPackage::empty().unwrap();
        let injector = RevisionInjector::with_session_id("00AB12CD");
        injector.enable_revision_tracking(&pkg).unwrap();

        let settings = pkg.read_part(part::SETTINGS).unwrap().unwrap();
        assert!(settings.contains("<w:trackRevisions/>"));
        assert!(settings.contains(r#"<w:rsidRoot w:val="00AB12CD"/>"#));
    }
}
