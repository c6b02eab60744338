//! Physical package handling: extraction to a scratch directory and ordered
//! repacking into a ZIP archive.
//!
//! Some consuming applications open packages more reliably when
//! `[Content_Types].xml` is the first archive entry and uncompressed, with
//! the root relationships next — the same interoperability constraint the
//! ODF `mimetype` entry carries. The repacker reproduces that ordering.

use crate::common::error::{Error, Result};
use log::debug;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::constants::part;

/// An OPC package extracted to a private scratch directory.
///
/// The scratch area lives for exactly one editing pass: it is removed on
/// every exit path (success or error) when the value drops. Parts are
/// addressed by their forward-slash member name within the package.
#[derive(Debug)]
pub struct ExtractedPackage {
    root: TempDir,
}

impl ExtractedPackage {
    /// Create an empty scratch tree, to be populated by the scaffold.
    pub fn empty() -> Result<Self> {
        Ok(Self { root: TempDir::new()? })
    }

    /// Extract an existing package into a fresh scratch directory.
    ///
    /// # Errors
    /// [`Error::NotFound`] when the input file does not exist, and ZIP/IO
    /// errors when it is not a readable archive.
    pub fn extract<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.display().to_string()));
        }

        let root = TempDir::new()?;
        let mut archive = ZipArchive::new(File::open(path)?)?;

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            // enclosed_name rejects absolute paths and .. traversal
            let Some(relative) = entry.enclosed_name() else {
                return Err(Error::Zip(format!(
                    "archive member escapes the package root: {}",
                    entry.name()
                )));
            };
            let target = root.path().join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&target)?;
                continue;
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut contents = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut contents)?;
            fs::write(&target, contents)?;
        }

        debug!("extracted {} to scratch dir", path.display());
        Ok(Self { root })
    }

    /// Absolute path of a member within the scratch tree.
    pub fn part_path(&self, member: &str) -> PathBuf {
        self.root.path().join(member)
    }

    /// Whether the package contains the given member.
    pub fn has_part(&self, member: &str) -> bool {
        self.part_path(member).is_file()
    }

    /// Read a member as UTF-8 text; `Ok(None)` when it is absent.
    pub fn read_part(&self, member: &str) -> Result<Option<String>> {
        let path = self.part_path(member);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    /// Write a member, creating intermediate directories as needed.
    pub fn write_part(&self, member: &str, contents: &str) -> Result<()> {
        let path = self.part_path(member);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    /// Re-serialize the scratch tree as a package archive.
    ///
    /// Entry order and compression: `[Content_Types].xml` first and Stored,
    /// `_rels/.rels` second, every remaining file in sorted order, all
    /// Deflate-compressed; no member is written twice.
    pub fn repack<P: AsRef<Path>>(&self, output: P) -> Result<()> {
        let output = output.as_ref();
        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut members = Vec::new();
        collect_members(self.root.path(), self.root.path(), &mut members)?;
        members.sort();

        let mut zip = ZipWriter::new(File::create(output)?);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut written: HashSet<&str> = HashSet::new();
        if members.iter().any(|m| m == part::CONTENT_TYPES) {
            self.append_member(&mut zip, part::CONTENT_TYPES, stored)?;
            written.insert(part::CONTENT_TYPES);
        }
        if members.iter().any(|m| m == part::ROOT_RELS) {
            self.append_member(&mut zip, part::ROOT_RELS, deflated)?;
            written.insert(part::ROOT_RELS);
        }
        for member in &members {
            if written.contains(member.as_str()) {
                continue;
            }
            self.append_member(&mut zip, member, deflated)?;
        }

        zip.finish()?;
        debug!("repacked {} members into {}", members.len(), output.display());
        Ok(())
    }

    fn append_member(
        &self,
        zip: &mut ZipWriter<File>,
        member: &str,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file(member, options)?;
        zip.write_all(&fs::read(self.part_path(member))?)?;
        Ok(())
    }
}

fn collect_members(base: &Path, dir: &Path, out: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_members(base, &path, out)?;
        } else if let Ok(relative) = path.strip_prefix(base) {
            let member = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            out.push(member);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let pkg = ExtractedPackage::empty().unwrap();
        pkg.write_part("word/document.xml", "<w:document/>").unwrap();
        pkg.write_part(part::CONTENT_TYPES, "<Types/>").unwrap();
        pkg.write_part(part::ROOT_RELS, "<Relationships/>").unwrap();

        let dir = TempDir::new().unwrap();
        let out = dir.path().join("test.docx");
        pkg.repack(&out).unwrap();

        let reloaded = ExtractedPackage::extract(&out).unwrap();
        assert_eq!(
            reloaded.read_part("word/document.xml").unwrap().unwrap(),
            "<w:document/>"
        );
        assert!(reloaded.read_part("missing.xml").unwrap().is_none());
    }

    #[test]
    fn test_entry_order_and_compression() {
        let pkg = ExtractedPackage::empty().unwrap();
        pkg.write_part("word/settings.xml", "<w:settings/>").unwrap();
        pkg.write_part("word/document.xml", "<w:document/>").unwrap();
        pkg.write_part(part::ROOT_RELS, "<Relationships/>").unwrap();
        pkg.write_part(part::CONTENT_TYPES, "<Types/>").unwrap();
        pkg.write_part("docProps/core.xml", "<cp:coreProperties/>").unwrap();

        let dir = TempDir::new().unwrap();
        let out = dir.path().join("ordered.docx");
        pkg.repack(&out).unwrap();

        let mut archive = ZipArchive::new(File::open(&out).unwrap()).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names[0], "[Content_Types].xml");
        assert_eq!(names[1], "_rels/.rels");
        let mut rest = names[2..].to_vec();
        let mut sorted = rest.clone();
        sorted.sort();
        assert_eq!(rest, sorted);
        rest.dedup();
        assert_eq!(rest.len(), names.len() - 2);

        let first = archive.by_index(0).unwrap();
        assert_eq!(first.compression(), CompressionMethod::Stored);
    }

    #[test]
    fn test_extract_missing_file() {
        let err = ExtractedPackage::extract("/nonexistent/input.docx").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
