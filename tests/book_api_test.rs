//! Book API tests.
//!
//! Opening books from disk, bytes and readers, reading resources relative
//! to the package document, and the serialized shape of the metadata model.

use std::fs::File;
use std::io::{Cursor, Write};

use opfmeta::{Book, Error, MemoryArchive, PackageVersion};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTAINER: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OPS/book/package.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

const PACKAGE: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="pub-id"
         prefix="rendition: http://www.idpf.org/vocab/rendition/#" xml:lang="en" dir="ltr">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="pub-id">urn:uuid:a1b2c3</dc:identifier>
    <dc:title id="title">Moby-Dick</dc:title>
    <dc:creator id="creator">Herman Melville</dc:creator>
    <meta refines="#creator" property="file-as">Melville, Herman</meta>
    <meta refines="#creator" property="role" scheme="marc:relators">aut</meta>
    <dc:language>en-US</dc:language>
    <dc:publisher>Harper &amp; Brothers</dc:publisher>
  </metadata>
  <manifest>
    <item id="ch1" href="../text/chapter1.xhtml" media-type="application/xhtml+xml"/>
    <item id="css" href="styles/book.css" media-type="text/css"/>
  </manifest>
  <spine><itemref idref="ch1"/></spine>
</package>"##;

fn build_epub() -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("mimetype", stored).unwrap();
    zip.write_all(b"application/epub+zip").unwrap();
    zip.start_file("META-INF/container.xml", deflated).unwrap();
    zip.write_all(CONTAINER.as_bytes()).unwrap();
    zip.start_file("OPS/book/package.opf", deflated).unwrap();
    zip.write_all(PACKAGE.as_bytes()).unwrap();
    zip.start_file("OPS/text/chapter1.xhtml", deflated).unwrap();
    zip.write_all(b"<html><body>Call me Ishmael.</body></html>").unwrap();
    zip.start_file("OPS/book/styles/book.css", deflated).unwrap();
    zip.write_all(b"body { margin: 0; }").unwrap();
    zip.finish().unwrap().into_inner()
}

// ============================================================================
// Opening
// ============================================================================

#[test]
fn test_open_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("moby-dick.epub");
    File::create(&path).unwrap().write_all(&build_epub()).unwrap();

    let book = Book::open(&path).unwrap();
    assert_eq!(book.version(), PackageVersion::Epub3);
    assert_eq!(book.metadata().title(), Some("Moby-Dick"));
    assert_eq!(book.metadata().creator_names(), vec!["Herman Melville"]);
}

#[test]
fn test_open_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = Book::open(temp_dir.path().join("absent.epub"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_from_reader() {
    let book = Book::from_reader(Cursor::new(build_epub())).unwrap();
    let creators = book.metadata().creators.as_ref().unwrap();
    assert_eq!(creators[0].file_as, "Melville, Herman");
    assert_eq!(creators[0].role, "author");
}

#[test]
fn test_package_header() {
    let book = Book::from_bytes(build_epub()).unwrap();
    let package = book.package();
    assert_eq!(package.version, "3.0");
    assert_eq!(package.unique_identifier, "pub-id");
    assert_eq!(package.lang, "en");
    assert_eq!(package.dir, "ltr");
    assert!(package.prefix.starts_with("rendition:"));
    assert_eq!(book.container().rootfile_path, "OPS/book/package.opf");
    assert_eq!(book.container().package_dir(), "OPS/book");
}

#[test]
fn test_into_metadata() {
    let meta = Book::from_bytes(build_epub()).unwrap().into_metadata();
    assert_eq!(meta.main_identifier.value, "urn:uuid:a1b2c3");
    assert_eq!(meta.languages.unwrap(), vec!["en-US"]);
    assert_eq!(meta.publishers.unwrap()[0].text, "Harper & Brothers");
}

// ============================================================================
// Resources
// ============================================================================

#[test]
fn test_read_resource_relative_to_package() {
    let mut book = Book::from_bytes(build_epub()).unwrap();

    let css = book.read_resource("styles/book.css").unwrap();
    assert_eq!(css, b"body { margin: 0; }");

    let chapter = book.read_resource("../text/chapter1.xhtml").unwrap();
    assert!(String::from_utf8(chapter).unwrap().contains("Ishmael"));
}

#[test]
fn test_read_missing_resource() {
    let mut book = Book::from_bytes(build_epub()).unwrap();
    match book.read_resource("images/cover.jpg") {
        Err(Error::EntryNotFound(name)) => assert_eq!(name, "OPS/book/images/cover.jpg"),
        other => panic!("expected EntryNotFound, got {other:?}"),
    }
}

#[test]
fn test_memory_archive_book() {
    let archive = MemoryArchive::new()
        .with_entry("META-INF/container.xml", CONTAINER)
        .with_entry("OPS/book/package.opf", PACKAGE);
    let book = Book::from_archive(archive).unwrap();
    assert_eq!(book.metadata().title(), Some("Moby-Dick"));
    assert_eq!(book.into_archive().len(), 2);
}

// ============================================================================
// Serialized shape
// ============================================================================

#[test]
fn test_serialized_metadata_shape() {
    let meta = Book::from_bytes(build_epub()).unwrap().into_metadata();
    let json = serde_json::to_value(&meta).unwrap();

    assert_eq!(json["main_identifier"]["value"], "urn:uuid:a1b2c3");
    assert_eq!(json["main_identifier"]["scheme"], "");
    assert_eq!(json["titles"][0]["type"], "");
    assert_eq!(json["creators"][0]["raw_role"], "aut");
    assert_eq!(json["creators"][0]["role"], "author");
    assert_eq!(json["dates"], serde_json::Value::Null);
    assert_eq!(json["contributors"], serde_json::Value::Null);
}
