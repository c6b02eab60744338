//! Constant values for the WordprocessingML package layout.
//!
//! Namespace URIs, content types, relationship types, and part names are
//! fixed by the consuming application's format and must be reproduced
//! exactly for the output to be recognized as valid.

/// XML namespace URIs
pub mod ns {
    /// WordprocessingML main namespace (`w:`)
    pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
    /// OPC core-properties namespace (`cp:`)
    pub const CP: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
    /// Dublin Core elements (`dc:`)
    pub const DC: &str = "http://purl.org/dc/elements/1.1/";
    /// Dublin Core terms (`dcterms:`)
    pub const DCTERMS: &str = "http://purl.org/dc/terms/";
    /// Dublin Core metadata initiative types (`dcmitype:`)
    pub const DCMITYPE: &str = "http://purl.org/dc/dcmitype/";
    /// XML Schema instance (`xsi:`)
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
    /// Extended (application) properties
    pub const EP: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";
    /// Variant types used inside extended properties (`vt:`)
    pub const VT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes";
    /// OfficeDocument relationships (`r:`)
    pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
}

/// Content type URIs (like MIME-types) that specify a part's format
pub mod content_type {
    pub const WML_DOCUMENT_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
    pub const WML_SETTINGS: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml";
    pub const OPC_CORE_PROPERTIES: &str =
        "application/vnd.openxmlformats-package.core-properties+xml";
    pub const OFC_EXTENDED_PROPERTIES: &str =
        "application/vnd.openxmlformats-officedocument.extended-properties+xml";
    pub const OPC_RELATIONSHIPS: &str =
        "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
}

/// Relationship type URIs
pub mod rel_type {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const EXTENDED_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
    pub const SETTINGS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings";
}

/// Fixed member names within the package
pub mod part {
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";
    pub const ROOT_RELS: &str = "_rels/.rels";
    pub const DOCUMENT: &str = "word/document.xml";
    pub const DOCUMENT_RELS: &str = "word/_rels/document.xml.rels";
    pub const SETTINGS: &str = "word/settings.xml";
    pub const CORE_PROPERTIES: &str = "docProps/core.xml";
    pub const APP_PROPERTIES: &str = "docProps/app.xml";
}
