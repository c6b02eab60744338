//! Unified error type for palimpsest.
//!
//! One enum covers every failure domain (IO, package structure, XML, ZIP,
//! database, validation), presenting a consistent API to callers.

use thiserror::Error;

/// Main error type for palimpsest operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input rejected before any state was touched
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A file, document, or sentence that should exist does not
    #[error("Not found: {0}")]
    NotFound(String),

    /// Package is malformed beyond what the editor tolerates
    #[error("Malformed package: {0}")]
    Structural(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// Metadata store error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A timestamp string matched none of the accepted formats
    #[error("Unrecognized timestamp: {0}")]
    Timestamp(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Zip(err.to_string())
    }
}

/// Result type for palimpsest operations.
pub type Result<T> = std::result::Result<T, Error>;
