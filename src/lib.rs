//! # opfmeta
//!
//! Read EPUB package metadata into one version-independent model.
//!
//! ## Features
//!
//! - Locate the package document through `META-INF/container.xml`
//! - Read both EPUB 2 (`opf:` attributes) and EPUB 3 (`<meta refines>`) packages
//! - Resolve MARC relator codes to display names
//! - Keep absent metadata blocks distinct from empty ones
//!
//! ## Quick Start
//!
//! ```no_run
//! use opfmeta::Book;
//!
//! let book = Book::open("input.epub").unwrap();
//! let meta = book.metadata();
//! println!("{:?} by {:?}", meta.title(), meta.creator_names());
//! ```
//!
//! ## Working with Archives
//!
//! Anything implementing [`Archive`] can be read, including an in-memory
//! [`MemoryArchive`]:
//!
//! ```
//! use opfmeta::{MemoryArchive, open_metadata};
//!
//! let mut archive = MemoryArchive::new()
//!     .with_entry(
//!         "META-INF/container.xml",
//!         r#"<container><rootfiles>
//!              <rootfile full-path="content.opf" media-type="application/oebps-package+xml"/>
//!            </rootfiles></container>"#,
//!     )
//!     .with_entry(
//!         "content.opf",
//!         r#"<package version="3.0" unique-identifier="id">
//!              <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
//!                <dc:identifier id="id">urn:uuid:42</dc:identifier>
//!                <dc:title>Example</dc:title>
//!              </metadata>
//!            </package>"#,
//!     );
//!
//! let meta = open_metadata(&mut archive).unwrap();
//! assert_eq!(meta.title(), Some("Example"));
//! assert_eq!(meta.main_identifier.value, "urn:uuid:42");
//! ```

pub mod archive;
pub mod book;
pub mod error;
pub mod metadata;
pub mod opf;
pub mod relators;
pub(crate) mod util;

pub use archive::{Archive, MemoryArchive};
pub use book::{Book, open_metadata};
pub use error::{Error, Result};
pub use metadata::{Contributor, Date, Identifier, LocalizedText, Metadata, Title};
pub use opf::{Container, Normalize, PackageInfo, PackageVersion, RawPackage};
pub use relators::{relator_name, resolve_role};
