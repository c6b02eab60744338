//! Minimal valid package scaffold.
//!
//! The injector and properties editor rewrite subtrees of an extracted
//! package; when fabricating a document from scratch there is no package to
//! extract, so this module lays down the smallest tree a consuming
//! application accepts: content types, root relationships, an empty-body
//! document with default section properties, settings, and both property
//! parts.

use crate::common::error::Result;

use super::constants::{content_type as ct, ns, part, rel_type};
use super::package::ExtractedPackage;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Populate an empty scratch tree with the minimal package parts.
pub fn write_scaffold(pkg: &ExtractedPackage) -> Result<()> {
    pkg.write_part(part::CONTENT_TYPES, &content_types_xml())?;
    pkg.write_part(part::ROOT_RELS, &root_rels_xml())?;
    pkg.write_part(part::DOCUMENT_RELS, &document_rels_xml())?;
    pkg.write_part(part::DOCUMENT, &document_xml())?;
    pkg.write_part(part::SETTINGS, &settings_xml())?;
    pkg.write_part(part::CORE_PROPERTIES, &core_properties_xml())?;
    pkg.write_part(part::APP_PROPERTIES, &app_properties_xml())?;
    Ok(())
}

fn content_types_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
            r#"<Default Extension="rels" ContentType="{rels}"/>"#,
            r#"<Default Extension="xml" ContentType="{xml}"/>"#,
            r#"<Override PartName="/word/document.xml" ContentType="{document}"/>"#,
            r#"<Override PartName="/word/settings.xml" ContentType="{settings}"/>"#,
            r#"<Override PartName="/docProps/core.xml" ContentType="{core}"/>"#,
            r#"<Override PartName="/docProps/app.xml" ContentType="{app}"/>"#,
            "</Types>"
        ),
        decl = XML_DECL,
        rels = ct::OPC_RELATIONSHIPS,
        xml = ct::XML,
        document = ct::WML_DOCUMENT_MAIN,
        settings = ct::WML_SETTINGS,
        core = ct::OPC_CORE_PROPERTIES,
        app = ct::OFC_EXTENDED_PROPERTIES,
    )
}

fn root_rels_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"<Relationship Id="rId1" Type="{document}" Target="word/document.xml"/>"#,
            r#"<Relationship Id="rId2" Type="{core}" Target="docProps/core.xml"/>"#,
            r#"<Relationship Id="rId3" Type="{app}" Target="docProps/app.xml"/>"#,
            "</Relationships>"
        ),
        decl = XML_DECL,
        document = rel_type::OFFICE_DOCUMENT,
        core = rel_type::CORE_PROPERTIES,
        app = rel_type::EXTENDED_PROPERTIES,
    )
}

fn document_rels_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"<Relationship Id="rId1" Type="{settings}" Target="settings.xml"/>"#,
            "</Relationships>"
        ),
        decl = XML_DECL,
        settings = rel_type::SETTINGS,
    )
}

/// Empty body with default A4 section properties as the final child.
fn document_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<w:document xmlns:w="{w}" xmlns:r="{r}">"#,
            "<w:body>",
            "<w:sectPr>",
            r#"<w:pgSz w:w="11906" w:h="16838"/>"#,
            r#"<w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/>"#,
            "</w:sectPr>",
            "</w:body>",
            "</w:document>"
        ),
        decl = XML_DECL,
        w = ns::W,
        r = ns::R,
    )
}

fn settings_xml() -> String {
    format!(
        concat!("{decl}", r#"<w:settings xmlns:w="{w}"></w:settings>"#),
        decl = XML_DECL,
        w = ns::W,
    )
}

fn core_properties_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<cp:coreProperties xmlns:cp="{cp}" xmlns:dc="{dc}" xmlns:dcterms="{dcterms}" xmlns:dcmitype="{dcmitype}" xmlns:xsi="{xsi}">"#,
            "</cp:coreProperties>"
        ),
        decl = XML_DECL,
        cp = ns::CP,
        dc = ns::DC,
        dcterms = ns::DCTERMS,
        dcmitype = ns::DCMITYPE,
        xsi = ns::XSI,
    )
}

fn app_properties_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Properties xmlns="{ep}" xmlns:vt="{vt}">"#,
            "<Application>Microsoft Office Word</Application>",
            "</Properties>"
        ),
        decl = XML_DECL,
        ep = ns::EP,
        vt = ns::VT,
    )
}
