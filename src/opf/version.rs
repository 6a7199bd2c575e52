//! Package header attributes and generation dispatch.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The two package document generations this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PackageVersion {
    /// OPF 2.x: refinements live as `opf:` attributes on each element.
    Epub2,
    /// OPF 3.x: refinements live in `<meta refines="#id">` elements.
    Epub3,
}

impl PackageVersion {
    /// Pick a generation for a numeric version.
    ///
    /// `[2.0, 3.0)` is EPUB 2 and `[3.0, 4.0)` is EPUB 3. Comparison is
    /// numeric, so `3.1` and `3.99` are both EPUB 3.
    pub fn from_number(version: f64) -> Result<Self> {
        if (3.0..4.0).contains(&version) {
            Ok(PackageVersion::Epub3)
        } else if (2.0..3.0).contains(&version) {
            Ok(PackageVersion::Epub2)
        } else {
            Err(Error::UnsupportedVersion(version))
        }
    }

    /// Parse the `version` attribute of a package document.
    pub fn parse(version: &str) -> Result<Self> {
        let number: f64 = version
            .trim()
            .parse()
            .map_err(|_| Error::UnparseableVersion(version.to_string()))?;
        Self::from_number(number)
    }
}

/// Attributes of the root `<package>` element.
///
/// Decoding into this type reads the root element's attributes and skips
/// everything beneath it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PackageInfo {
    #[serde(rename = "@version")]
    pub version: String,
    #[serde(rename = "@unique-identifier")]
    pub unique_identifier: String,
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@prefix")]
    pub prefix: String,
    #[serde(rename = "@xml:lang", alias = "@lang")]
    pub lang: String,
    #[serde(rename = "@dir")]
    pub dir: String,
}

impl PackageInfo {
    pub fn package_version(&self) -> Result<PackageVersion> {
        PackageVersion::parse(&self.version)
    }
}
