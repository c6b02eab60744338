//! End-to-end tests: fabricate a package, inspect the raw ZIP/XML, then
//! sanitize it and verify the provenance is gone.

use chrono::{TimeZone, Utc};
use palimpsest::docx::constants::part;
use palimpsest::docx::{
    BuildOptions, ExtractedPackage, RevisionInjector, Sanitizer, build_document,
};
use palimpsest::store::MetadataStore;
use palimpsest::text::split_into_sentences;
use std::fs::File;
use std::path::Path;
use tempfile::TempDir;
use zip::{CompressionMethod, ZipArchive};

const TEXT: &str = "This is one. This is two. This is three.";

fn fabricate(dir: &Path, tracked: bool) -> std::path::PathBuf {
    let output = dir.join(if tracked { "tracked.docx" } else { "clean.docx" });
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();

    let mut store = MetadataStore::open(dir.join("meta.db")).unwrap();
    let doc = store
        .create_document(
            &output.display().to_string(),
            &split_into_sentences(TEXT),
            Some(start),
            60,
            60,
            "Ann Author",
        )
        .unwrap();

    let injector = RevisionInjector::with_session_id("00AB12CD");
    let options = BuildOptions {
        accept_changes: !tracked,
        title: Some("Quarterly Report".to_string()),
        total_edit_minutes: Some(125),
        ..Default::default()
    };
    build_document(&doc, &injector, &options, &output).unwrap();
    output
}

fn read_part(path: &Path, part: &str) -> String {
    let pkg = ExtractedPackage::extract(path).unwrap();
    pkg.read_part(part).unwrap().unwrap()
}

#[test]
fn tracked_document_carries_dated_insertions() {
    let dir = TempDir::new().unwrap();
    let output = fabricate(dir.path(), true);

    let document = read_part(&output, part::DOCUMENT);
    assert!(document.contains(
        r#"<w:ins w:id="1" w:author="Ann Author" w:date="2025-01-01T10:00:00Z">"#
    ));
    assert!(document.contains(
        r#"<w:ins w:id="2" w:author="Ann Author" w:date="2025-01-01T10:01:00Z">"#
    ));
    assert!(document.contains(
        r#"<w:ins w:id="3" w:author="Ann Author" w:date="2025-01-01T10:02:00Z">"#
    ));
    assert!(document.contains(r#"<w:t xml:space="preserve">This is one.</w:t>"#));
    assert!(document.contains(r#"w:rsidR="00AB12CD""#));

    let settings = read_part(&output, part::SETTINGS);
    assert!(settings.contains("<w:trackRevisions/>"));
    assert!(settings.contains(r#"<w:rsidRoot w:val="00AB12CD"/>"#));
}

#[test]
fn core_properties_agree_with_the_timeline() {
    let dir = TempDir::new().unwrap();
    let output = fabricate(dir.path(), true);

    let core = read_part(&output, part::CORE_PROPERTIES);
    assert!(core.contains("<dc:creator>Ann Author</dc:creator>"));
    assert!(core.contains("<dc:title>Quarterly Report</dc:title>"));
    assert!(core.contains(
        r#"<dcterms:created xsi:type="dcterms:W3CDTF">2025-01-01T10:00:00Z</dcterms:created>"#
    ));
    assert!(core.contains(
        r#"<dcterms:modified xsi:type="dcterms:W3CDTF">2025-01-01T10:02:00Z</dcterms:modified>"#
    ));

    let app = read_part(&output, part::APP_PROPERTIES);
    assert!(app.contains("<TotalTime>125</TotalTime>"));
}

#[test]
fn clean_document_has_final_text_without_markers() {
    let dir = TempDir::new().unwrap();
    let output = fabricate(dir.path(), false);

    let document = read_part(&output, part::DOCUMENT);
    assert!(!document.contains("<w:ins"));
    assert!(document.contains(r#"<w:t xml:space="preserve">This is three.</w:t>"#));

    let settings = read_part(&output, part::SETTINGS);
    assert!(!settings.contains("<w:trackRevisions"));

    // coarse metadata still carries the backdated timeline
    let core = read_part(&output, part::CORE_PROPERTIES);
    assert!(core.contains("2025-01-01T10:00:00Z"));
    assert!(core.contains("2025-01-01T10:02:00Z"));
}

#[test]
fn package_manifest_ordering_and_compression() {
    let dir = TempDir::new().unwrap();
    let output = fabricate(dir.path(), true);

    let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
    let first = archive.by_index(0).unwrap();
    assert_eq!(first.name(), "[Content_Types].xml");
    assert_eq!(first.compression(), CompressionMethod::Stored);
    drop(first);

    let second = archive.by_index(1).unwrap();
    assert_eq!(second.name(), "_rels/.rels");
    drop(second);

    let mut names = Vec::new();
    for i in 0..archive.len() {
        names.push(archive.by_index(i).unwrap().name().to_string());
    }
    let unique: std::collections::HashSet<_> = names.iter().collect();
    assert_eq!(unique.len(), names.len());
    assert!(names.iter().any(|n| n == "word/document.xml"));
}

#[test]
fn sanitize_strips_all_provenance() {
    let dir = TempDir::new().unwrap();
    let output = fabricate(dir.path(), true);
    let clean = dir.path().join("sanitized.docx");

    Sanitizer::new(None).sanitize(&output, &clean).unwrap();

    let document = read_part(&clean, part::DOCUMENT);
    assert!(!document.contains("<w:ins"));
    // the text itself survives the unwrapping
    assert!(document.contains("This is one."));
    assert!(document.contains("This is three."));

    let settings = read_part(&clean, part::SETTINGS);
    assert!(!settings.contains("<w:trackRevisions"));

    let core = read_part(&clean, part::CORE_PROPERTIES);
    assert!(core.contains("<dc:creator>Anonymous</dc:creator>"));
    assert!(core.contains("<cp:lastModifiedBy>Anonymous</cp:lastModifiedBy>"));
    assert!(core.contains("2000-01-01T00:00:00Z"));
    assert!(!core.contains("Ann Author"));
    assert!(!core.contains("Quarterly Report"));

    let app = read_part(&clean, part::APP_PROPERTIES);
    assert!(app.contains("<Application></Application>"));
}

#[test]
fn sanitize_twice_is_stable() {
    let dir = TempDir::new().unwrap();
    let output = fabricate(dir.path(), true);
    let once = dir.path().join("once.docx");
    let twice = dir.path().join("twice.docx");

    let sanitizer = Sanitizer::new(None);
    sanitizer.sanitize(&output, &once).unwrap();
    sanitizer.sanitize(&once, &twice).unwrap();

    for part in [
        part::DOCUMENT,
        part::SETTINGS,
        part::CORE_PROPERTIES,
        part::APP_PROPERTIES,
    ] {
        assert_eq!(read_part(&once, part), read_part(&twice, part));
    }
}

#[test]
fn sanitize_can_overwrite_in_place() {
    let dir = TempDir::new().unwrap();
    let output = fabricate(dir.path(), true);

    Sanitizer::new(None).sanitize(&output, &output).unwrap();

    let document = read_part(&output, part::DOCUMENT);
    assert!(!document.contains("<w:ins"));
    assert!(document.contains("This is two."));
}
