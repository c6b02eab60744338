//! Typed builders for WordprocessingML structural elements.
//!
//! One constructor function per element kind the injector emits, with the
//! namespace-qualified names held as constants. Construction is decoupled
//! from any tree library: builders return escaped XML fragments that the
//! event-stream rewriter splices into the document part.

use crate::common::xml::escape_xml;

pub const W_P: &str = "w:p";
pub const W_R: &str = "w:r";
pub const W_T: &str = "w:t";
pub const W_INS: &str = "w:ins";
pub const W_DEL: &str = "w:del";
pub const W_BODY: &str = "w:body";
pub const W_SECT_PR: &str = "w:sectPr";
pub const W_SETTINGS: &str = "w:settings";
pub const W_TRACK_REVISIONS: &str = "w:trackRevisions";
pub const W_RSIDS: &str = "w:rsids";
pub const W_RSID_ROOT: &str = "w:rsidRoot";
pub const W_RSID: &str = "w:rsid";
pub const W_MOVE_FROM: &str = "w:moveFrom";
pub const W_MOVE_TO: &str = "w:moveTo";
pub const W_RPR_CHANGE: &str = "w:rPrChange";
pub const W_PPR_CHANGE: &str = "w:pPrChange";

/// A run holding literal text.
///
/// `xml:space="preserve"` is always declared so leading/trailing spaces in
/// the text survive the consuming application's whitespace handling. When a
/// session id is given it is stamped on the run as `w:rsidR`.
pub fn text_run(text: &str, session_id: Option<&str>) -> String {
    let mut xml = String::with_capacity(text.len() + 64);
    xml.push('<');
    xml.push_str(W_R);
    if let Some(rsid) = session_id {
        push_attr(&mut xml, "w:rsidR", rsid);
    }
    xml.push_str("><");
    xml.push_str(W_T);
    xml.push_str(r#" xml:space="preserve">"#);
    xml.push_str(&escape_xml(text));
    xml.push_str("</");
    xml.push_str(W_T);
    xml.push_str("></");
    xml.push_str(W_R);
    xml.push('>');
    xml
}

/// The single-space separator run placed between consecutive sentences.
pub fn space_run(session_id: Option<&str>) -> String {
    text_run(" ", session_id)
}

/// A revision-insertion marker wrapping already-built run content.
///
/// `id` is the revision identifier unique within the document, `date` the
/// edit timestamp in W3CDTF form (`YYYY-MM-DDTHH:MM:SSZ`).
pub fn insertion(id: u32, author: &str, date: &str, content: &str) -> String {
    let mut xml = String::with_capacity(content.len() + 96);
    xml.push('<');
    xml.push_str(W_INS);
    push_attr(&mut xml, "w:id", &id.to_string());
    push_attr(&mut xml, "w:author", author);
    push_attr(&mut xml, "w:date", date);
    xml.push('>');
    xml.push_str(content);
    xml.push_str("</");
    xml.push_str(W_INS);
    xml.push('>');
    xml
}

/// A paragraph wrapping already-built content, optionally stamped with the
/// editing-session id (`w:rsidR` / `w:rsidRDefault`).
pub fn paragraph(session_id: Option<&str>, content: &str) -> String {
    let mut xml = String::with_capacity(content.len() + 64);
    xml.push('<');
    xml.push_str(W_P);
    if let Some(rsid) = session_id {
        push_attr(&mut xml, "w:rsidR", rsid);
        push_attr(&mut xml, "w:rsidRDefault", rsid);
    }
    xml.push('>');
    xml.push_str(content);
    xml.push_str("</");
    xml.push_str(W_P);
    xml.push('>');
    xml
}

fn push_attr(xml: &mut String, name: &str, value: &str) {
    xml.push(' ');
    xml.push_str(name);
    xml.push_str("=\"");
    xml.push_str(&escape_xml(value));
    xml.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_run_preserves_space_and_escapes() {
        let run = text_run("a < b", Some("00AB12CD"));
        assert_eq!(
            run,
            r#"<w:r w:rsidR="00AB12CD"><w:t xml:space="preserve">a &lt; b</w:t></w:r>"#
        );
    }

    #[test]
    fn test_text_run_without_session_id() {
        let run = text_run("plain", None);
        assert_eq!(run, r#"<w:r><w:t xml:space="preserve">plain</w:t></w:r>"#);
    }

    #[test]
    fn test_insertion_attributes() {
        let ins = insertion(3, "Ann O'Nym", "2025-01-01T10:00:00Z", "<w:r/>");
        assert!(ins.starts_with(r#"<w:ins w:id="3" w:author="Ann O&apos;Nym""#));
        assert!(ins.contains(r#"w:date="2025-01-01T10:00:00Z""#));
        assert!(ins.ends_with("<w:r/></w:ins>"));
    }

    #[test]
    fn test_paragraph_rsid_stamping() {
        let p = paragraph(Some("DEADBEEF"), "<w:r/>");
        assert_eq!(
            p,
            r#"<w:p w:rsidR="DEADBEEF" w:rsidRDefault="DEADBEEF"><w:r/></w:p>"#
        );
        assert_eq!(paragraph(None, ""), "<w:p></w:p>");
    }

    #[test]
    fn test_space_run_is_single_space() {
        assert!(space_run(None).contains(r#"<w:t xml:space="preserve"> </w:t>"#));
    }
}
