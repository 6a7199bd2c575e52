//! `META-INF/container.xml`: where the package document lives.

use serde::Deserialize;
use tracing::debug;

use crate::archive::Archive;
use crate::error::{Error, Result};
use crate::util::{parent_dir, resolve_path};

/// Fixed location of the container descriptor in every EPUB.
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

const OPF_MEDIA_TYPE: &str = "application/oebps-package+xml";

/// The container descriptor, reduced to the rootfile we read metadata from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    /// Archive-relative path of the package document, e.g. `OEBPS/content.opf`.
    pub rootfile_path: String,
    pub media_type: String,
}

impl Container {
    /// Read and decode the container descriptor from `archive`.
    ///
    /// When several rootfiles are listed, the first OPF rootfile is used,
    /// falling back to the first rootfile of any type.
    pub fn locate<A: Archive>(archive: &mut A) -> Result<Self> {
        let xml: ContainerXml = super::read_xml(archive, CONTAINER_PATH)?;
        let container = Self::from_rootfiles(xml.rootfiles.rootfile)?;
        debug!(rootfile = %container.rootfile_path, "located package document");
        Ok(container)
    }

    fn from_rootfiles(rootfiles: Vec<RootFile>) -> Result<Self> {
        let chosen = rootfiles
            .iter()
            .position(|r| r.media_type == OPF_MEDIA_TYPE)
            .unwrap_or(0);
        let rootfile = rootfiles
            .into_iter()
            .nth(chosen)
            .ok_or_else(|| Error::malformed(CONTAINER_PATH, "no rootfile element"))?;

        let rootfile_path = rootfile.full_path.trim().trim_start_matches('/').to_string();
        if rootfile_path.is_empty() {
            return Err(Error::malformed(CONTAINER_PATH, "rootfile has an empty full-path"));
        }

        Ok(Self {
            rootfile_path,
            media_type: rootfile.media_type,
        })
    }

    /// Directory containing the package document (`""` at the archive root).
    pub fn package_dir(&self) -> &str {
        parent_dir(&self.rootfile_path)
    }

    /// Resolve a package-relative href (as found in the manifest) to an
    /// archive path.
    pub fn resolve(&self, href: &str) -> String {
        resolve_path(self.package_dir(), href)
    }
}

#[derive(Debug, Deserialize)]
struct ContainerXml {
    rootfiles: RootFiles,
}

#[derive(Debug, Default, Deserialize)]
struct RootFiles {
    #[serde(default)]
    rootfile: Vec<RootFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RootFile {
    #[serde(rename = "@full-path")]
    full_path: String,
    #[serde(rename = "@media-type")]
    media_type: String,
}
