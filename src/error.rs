//! Error types for opfmeta operations.

use thiserror::Error;

/// Errors that can occur while locating, decoding, or normalizing package metadata.
///
/// Every error is terminal for the call that produced it; no partial metadata is
/// ever returned alongside one.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Entry not found in archive: {0}")]
    EntryNotFound(String),

    #[error("Malformed XML in {entry}: {message}")]
    MalformedXml { entry: String, message: String },

    #[error("Unparseable package version: {0:?}")]
    UnparseableVersion(String),

    #[error("Unsupported package version: {0}")]
    UnsupportedVersion(f64),
}

impl Error {
    pub(crate) fn malformed(entry: &str, message: impl ToString) -> Self {
        Error::MalformedXml {
            entry: entry.to_string(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
