//! OPF package document handling.
//!
//! The package document comes in two incompatible generations. [`version`]
//! reads just enough of it to pick one, [`epub2`] and [`epub3`] hold the typed
//! trees for each generation, and both implement [`Normalize`] to produce the
//! shared [`Metadata`] model.

pub mod container;
pub mod epub2;
pub mod epub3;
pub mod refines;
pub mod version;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::archive::Archive;
use crate::error::{Error, Result};
use crate::metadata::{Identifier, Metadata};
use crate::util::decode_xml_text;

pub use container::{CONTAINER_PATH, Container};
pub use refines::RefinementIndex;
pub use version::{PackageInfo, PackageVersion};

/// Normalize a schema-specific package tree into the shared metadata model.
pub trait Normalize {
    fn normalize(&self) -> Metadata;
}

/// A decoded package document, tagged by the generation that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPackage {
    Epub2(epub2::Package),
    Epub3(epub3::Package),
}

impl RawPackage {
    /// Decode `text` as the package layout for `version`.
    pub fn decode(entry: &str, text: &str, version: PackageVersion) -> Result<Self> {
        Ok(match version {
            PackageVersion::Epub2 => RawPackage::Epub2(decode_xml_str(entry, text)?),
            PackageVersion::Epub3 => RawPackage::Epub3(decode_xml_str(entry, text)?),
        })
    }

    pub fn version(&self) -> PackageVersion {
        match self {
            RawPackage::Epub2(_) => PackageVersion::Epub2,
            RawPackage::Epub3(_) => PackageVersion::Epub3,
        }
    }
}

impl Normalize for RawPackage {
    fn normalize(&self) -> Metadata {
        match self {
            RawPackage::Epub2(package) => package.normalize(),
            RawPackage::Epub3(package) => package.normalize(),
        }
    }
}

/// A package document read from an archive, with its header attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpfDocument {
    pub info: PackageInfo,
    pub package: RawPackage,
}

impl OpfDocument {
    pub fn version(&self) -> PackageVersion {
        self.package.version()
    }
}

/// Read the package document named by `container`, pick its generation,
/// and decode it with the matching layout.
pub fn read_package<A: Archive>(archive: &mut A, container: &Container) -> Result<OpfDocument> {
    let entry = container.rootfile_path.as_str();
    let bytes = archive.read_entry(entry)?;
    let text = decode_xml_text(&bytes);

    let info: PackageInfo = decode_xml_str(entry, &text)?;
    let version = info.package_version()?;
    debug!(entry, version = %info.version, generation = ?version, "dispatching package document");

    let package = RawPackage::decode(entry, &text, version)?;
    Ok(OpfDocument { info, package })
}

/// Decode an archive entry into `T` via its serde layout.
pub(crate) fn read_xml<A: Archive, T: DeserializeOwned>(archive: &mut A, entry: &str) -> Result<T> {
    let bytes = archive.read_entry(entry)?;
    decode_xml_str(entry, &decode_xml_text(&bytes))
}

pub(crate) fn decode_xml_str<T: DeserializeOwned>(entry: &str, text: &str) -> Result<T> {
    quick_xml::de::from_str(text).map_err(|e| Error::malformed(entry, e))
}

/// A piece of mixed element content.
#[derive(Deserialize)]
enum Chunk {
    #[serde(rename = "$text")]
    Text(String),
    /// Inline markup; its subtree is skipped.
    #[serde(other)]
    Markup,
}

/// Deserialize the character data directly inside an element.
///
/// Text runs separated by inline markup (`Some <b>bold</b> text`) are joined
/// with a single space; text inside the markup itself is dropped.
pub(crate) fn char_data<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let chunks = Vec::<Chunk>::deserialize(deserializer)?;
    let runs: Vec<String> = chunks
        .into_iter()
        .filter_map(|chunk| match chunk {
            Chunk::Text(text) if !text.is_empty() => Some(text),
            _ => None,
        })
        .collect();
    Ok(runs.join(" "))
}

/// Map an optional element sequence, keeping absent distinct from empty.
pub(crate) fn map_all<T, U>(items: &Option<Vec<T>>, f: impl FnMut(&T) -> U) -> Option<Vec<U>> {
    items.as_ref().map(|items| items.iter().map(f).collect())
}

/// Pick the identifier whose `id` equals the package's `unique-identifier`.
///
/// An empty `unique_identifier` matches nothing. If several identifiers
/// share the id, the last one wins.
pub(crate) fn main_identifier<'a, T: 'a>(
    unique_identifier: &str,
    candidates: impl IntoIterator<Item = &'a T>,
    id_of: impl Fn(&T) -> &str,
    normalize: impl Fn(&T) -> Identifier,
) -> Identifier {
    if unique_identifier.is_empty() {
        return Identifier::default();
    }
    candidates
        .into_iter()
        .filter(|c| id_of(*c) == unique_identifier)
        .last()
        .map(normalize)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::MemoryArchive;

    const EPUB3_OPF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="uid">urn:uuid:1234</dc:identifier>
    <dc:title>Three</dc:title>
    <dc:language>en</dc:language>
  </metadata>
  <manifest/>
</package>"#;

    const EPUB2_OPF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
    <dc:identifier id="uid" opf:scheme="ISBN">9780000000000</dc:identifier>
    <dc:title>Two</dc:title>
    <dc:language>en</dc:language>
  </metadata>
  <manifest/>
</package>"#;

    fn container_for(path: &str) -> Container {
        Container {
            rootfile_path: path.to_string(),
            media_type: String::new(),
        }
    }

    #[test]
    fn test_read_package_dispatches_epub3() {
        let mut archive = MemoryArchive::new().with_entry("OPS/package.opf", EPUB3_OPF);
        let doc = read_package(&mut archive, &container_for("OPS/package.opf")).unwrap();
        assert_eq!(doc.version(), PackageVersion::Epub3);
        assert_eq!(doc.info.unique_identifier, "uid");
        assert!(matches!(doc.package, RawPackage::Epub3(_)));
        assert_eq!(doc.package.normalize().title(), Some("Three"));
    }

    #[test]
    fn test_read_package_dispatches_epub2() {
        let mut archive = MemoryArchive::new().with_entry("content.opf", EPUB2_OPF);
        let doc = read_package(&mut archive, &container_for("content.opf")).unwrap();
        assert_eq!(doc.version(), PackageVersion::Epub2);
        let meta = doc.package.normalize();
        assert_eq!(meta.main_identifier.scheme, "ISBN");
        assert_eq!(meta.title(), Some("Two"));
    }

    #[test]
    fn test_read_package_missing_entry() {
        let mut archive = MemoryArchive::new();
        let err = read_package(&mut archive, &container_for("content.opf")).unwrap_err();
        assert!(matches!(err, Error::EntryNotFound(name) if name == "content.opf"));
    }

    #[test]
    fn test_read_package_malformed() {
        let mut archive = MemoryArchive::new().with_entry("content.opf", "<package version=\"3.0\"><metadata>");
        let err = read_package(&mut archive, &container_for("content.opf")).unwrap_err();
        assert!(matches!(err, Error::MalformedXml { entry, .. } if entry == "content.opf"));
    }

    #[derive(Debug, Deserialize)]
    struct Note {
        #[serde(rename = "$value", deserialize_with = "char_data", default)]
        text: String,
    }

    #[test]
    fn test_char_data_skips_inline_markup() {
        let note: Note = quick_xml::de::from_str("<note>Some <b>bold</b> text</note>").unwrap();
        assert_eq!(note.text, "Some text");

        let note: Note = quick_xml::de::from_str("<note>just text</note>").unwrap();
        assert_eq!(note.text, "just text");

        let note: Note = quick_xml::de::from_str("<note><br/></note>").unwrap();
        assert_eq!(note.text, "");

        let note: Note = quick_xml::de::from_str("<note/>").unwrap();
        assert_eq!(note.text, "");
    }

    #[test]
    fn test_read_package_with_markup_in_description() {
        let opf = r#"<package version="3.0" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="uid">urn:uuid:1</dc:identifier>
    <dc:description>Some <b>bold</b> text</dc:description>
  </metadata>
</package>"#;
        let mut archive = MemoryArchive::new().with_entry("c.opf", opf);
        let doc = read_package(&mut archive, &container_for("c.opf")).unwrap();
        let meta = doc.package.normalize();
        assert_eq!(meta.descriptions.unwrap()[0].text, "Some text");
    }

    #[test]
    fn test_map_all_keeps_absent_and_empty_apart() {
        let absent: Option<Vec<u8>> = None;
        let empty: Option<Vec<u8>> = Some(Vec::new());
        assert_eq!(map_all(&absent, |b| *b + 1), None);
        assert_eq!(map_all(&empty, |b| *b + 1), Some(Vec::new()));
        assert_eq!(map_all(&Some(vec![1u8, 2]), |b| *b + 1), Some(vec![2, 3]));
    }

    #[test]
    fn test_main_identifier_selection() {
        let ids = [("a", "first"), ("b", "second"), ("b", "third")];
        let pick = |unique: &str| {
            main_identifier(
                unique,
                ids.iter(),
                |(id, _)| *id,
                |(_, value)| Identifier {
                    value: value.to_string(),
                    scheme: String::new(),
                },
            )
        };

        assert_eq!(pick("a").value, "first");
        assert_eq!(pick("b").value, "third");
        assert!(pick("zzz").is_empty());
        assert!(pick("").is_empty());
    }
}
