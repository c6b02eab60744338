//! WordprocessingML package editor.
//!
//! Treats a `.docx` package as a semi-structured document: specific XML
//! subtrees (body content, revision markers, properties, editor settings)
//! are surgically rewritten while the rest of the package is preserved
//! byte-for-byte, then the tree is re-serialized with the manifest ordering
//! and compression a consuming application depends on.

pub mod builder;
pub mod constants;
pub mod element;
pub mod injector;
pub mod package;
pub mod properties;
pub mod sanitizer;
pub mod template;

pub use builder::{BuildOptions, build_document};
pub use injector::RevisionInjector;
pub use package::ExtractedPackage;
pub use properties::{CoreProperties, set_total_edit_time};
pub use sanitizer::Sanitizer;
