//! Random access to named entries inside an e-book container.

use std::collections::BTreeMap;
use std::io::{Read, Seek};

use zip::ZipArchive;

use crate::error::{Error, Result};

/// A collection of named entries that can be read in any order.
///
/// The metadata engine only ever asks for whole entries by their
/// archive-relative path, so this is the whole surface it needs.
pub trait Archive {
    /// Read the full contents of the entry at `name`.
    ///
    /// Returns [`Error::EntryNotFound`] when no such entry exists.
    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>>;
}

impl<A: Archive + ?Sized> Archive for &mut A {
    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        (**self).read_entry(name)
    }
}

impl<R: Read + Seek> Archive for ZipArchive<R> {
    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        match read_zip_entry(self, name) {
            Err(Error::EntryNotFound(_)) => {}
            other => return other,
        }

        // Fallback: try percent-decoded path (handles malformed EPUBs)
        let decoded = percent_encoding::percent_decode_str(name)
            .decode_utf8()
            .map_err(|_| Error::EntryNotFound(name.to_string()))?;
        if decoded == name {
            return Err(Error::EntryNotFound(name.to_string()));
        }

        read_zip_entry(self, &decoded).map_err(|e| match e {
            Error::EntryNotFound(_) => Error::EntryNotFound(name.to_string()),
            e => e,
        })
    }
}

fn read_zip_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Vec<u8>> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            Ok(contents)
        }
        Err(zip::result::ZipError::FileNotFound) => Err(Error::EntryNotFound(name.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// An in-memory archive backed by a map of entry name to bytes.
///
/// Useful when the entries were already extracted, and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an entry.
    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.entries.insert(name.into(), data.into());
    }

    /// Builder-style variant of [`MemoryArchive::insert`].
    pub fn with_entry(mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(name, data);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Archive for MemoryArchive {
    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| Error::EntryNotFound(name.to_string()))
    }
}
