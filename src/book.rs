//! Opening an e-book and reading its normalized metadata.

use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::archive::Archive;
use crate::error::Result;
use crate::metadata::Metadata;
use crate::opf::{Container, Normalize, PackageInfo, PackageVersion, read_package};

/// Read the normalized metadata of the EPUB in `archive`.
///
/// Locates the package document through `META-INF/container.xml`, picks the
/// package generation from its `version` attribute, and normalizes it. Any
/// failure is terminal; there is no partial result.
pub fn open_metadata<A: Archive>(archive: &mut A) -> Result<Metadata> {
    let container = Container::locate(archive)?;
    let document = read_package(archive, &container)?;
    Ok(document.package.normalize())
}

/// An opened EPUB: its archive, where its package document lives, and the
/// metadata read from it.
#[derive(Debug)]
pub struct Book<A> {
    archive: A,
    container: Container,
    package: PackageInfo,
    version: PackageVersion,
    metadata: Metadata,
}

impl Book<ZipArchive<File>> {
    /// Open an EPUB file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }
}

impl Book<ZipArchive<Cursor<Vec<u8>>>> {
    /// Open an EPUB already held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(data))
    }
}

impl<R: Read + Seek> Book<ZipArchive<R>> {
    pub fn from_reader(reader: R) -> Result<Self> {
        Self::from_archive(ZipArchive::new(reader)?)
    }
}

impl<A: Archive> Book<A> {
    /// Read metadata from any [`Archive`] implementation.
    pub fn from_archive(mut archive: A) -> Result<Self> {
        let container = Container::locate(&mut archive)?;
        let document = read_package(&mut archive, &container)?;
        let metadata = document.package.normalize();
        debug!(
            rootfile = %container.rootfile_path,
            version = %document.info.version,
            "opened book"
        );

        Ok(Self {
            version: document.version(),
            package: document.info,
            archive,
            container,
            metadata,
        })
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn into_metadata(self) -> Metadata {
        self.metadata
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Attributes of the root `<package>` element.
    pub fn package(&self) -> &PackageInfo {
        &self.package
    }

    pub fn version(&self) -> PackageVersion {
        self.version
    }

    /// Read a resource by its href relative to the package document.
    ///
    /// `text/ch1.xhtml` in a book whose package lives at `OEBPS/content.opf`
    /// reads `OEBPS/text/ch1.xhtml`.
    pub fn read_resource(&mut self, href: &str) -> Result<Vec<u8>> {
        let path = self.container.resolve(href);
        self.archive.read_entry(&path)
    }

    /// Give back the underlying archive.
    pub fn into_archive(self) -> A {
        self.archive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::MemoryArchive;
    use crate::error::Error;
    use crate::opf::CONTAINER_PATH;

    const CONTAINER: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

    fn package(version: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="{version}" unique-identifier="p1">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="p1">urn:isbn:123</dc:identifier>
    <dc:title>Sample</dc:title>
  </metadata>
  <manifest>
    <item id="ch1" href="text/ch1.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
</package>"#
        )
    }

    fn archive(version: &str) -> MemoryArchive {
        MemoryArchive::new()
            .with_entry(CONTAINER_PATH, CONTAINER)
            .with_entry("OEBPS/content.opf", package(version))
            .with_entry("OEBPS/text/ch1.xhtml", "<html/>")
            .with_entry("META-INF/com.apple.ibooks.display-options.xml", "<display_options/>")
    }

    #[test]
    fn test_open_metadata() {
        let meta = open_metadata(&mut archive("3.0")).unwrap();
        assert_eq!(meta.title(), Some("Sample"));
        assert_eq!(meta.main_identifier.value, "urn:isbn:123");
    }

    #[test]
    fn test_book_from_archive() {
        let book = Book::from_archive(archive("2.0")).unwrap();
        assert_eq!(book.version(), PackageVersion::Epub2);
        assert_eq!(book.package().unique_identifier, "p1");
        assert_eq!(book.container().rootfile_path, "OEBPS/content.opf");
        assert_eq!(book.metadata().title(), Some("Sample"));
    }

    #[test]
    fn test_read_resource_relative_to_package() {
        let mut book = Book::from_archive(archive("3.0")).unwrap();
        assert_eq!(book.read_resource("text/ch1.xhtml").unwrap(), b"<html/>");
        assert_eq!(
            book.read_resource("../META-INF/com.apple.ibooks.display-options.xml")
                .unwrap(),
            b"<display_options/>"
        );
        assert!(matches!(
            book.read_resource("text/missing.xhtml"),
            Err(Error::EntryNotFound(name)) if name == "OEBPS/text/missing.xhtml"
        ));
    }

    #[test]
    fn test_unsupported_version_fails_whole_open() {
        match Book::from_archive(archive("1.0")) {
            Err(Error::UnsupportedVersion(v)) => assert_eq!(v, 1.0),
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn test_from_bytes_rejects_non_zip() {
        assert!(matches!(
            Book::from_bytes(b"not a zip file".to_vec()),
            Err(Error::Zip(_))
        ));
    }
}
