//! Version-independent metadata model.
//!
//! Both package generations normalize into [`Metadata`]. Every multi-valued
//! field is an `Option<Vec<_>>`: `None` means the package never carried that
//! element, `Some(vec![])` means the block was present but held no entries.
//! Sequences keep document order.

use serde::Serialize;

/// Normalized book metadata (Dublin Core plus refinements).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// The identifier named by the package's `unique-identifier` attribute.
    ///
    /// Left at its default (empty value and scheme) when nothing matches.
    pub main_identifier: Identifier,
    pub identifiers: Option<Vec<Identifier>>,
    /// Raw language tags, one per element, unmodified.
    pub languages: Option<Vec<String>>,
    pub titles: Option<Vec<Title>>,
    pub creators: Option<Vec<Contributor>>,
    pub contributors: Option<Vec<Contributor>>,
    pub publishers: Option<Vec<LocalizedText>>,
    pub subjects: Option<Vec<LocalizedText>>,
    pub descriptions: Option<Vec<LocalizedText>>,
    pub dates: Option<Vec<Date>>,
    pub rights: Option<Vec<LocalizedText>>,
    pub sources: Option<Vec<LocalizedText>>,
    pub relations: Option<Vec<LocalizedText>>,
    pub coverages: Option<Vec<LocalizedText>>,
}

impl Metadata {
    /// The first title, if any.
    pub fn title(&self) -> Option<&str> {
        self.titles
            .as_deref()
            .and_then(|titles| titles.first())
            .map(|t| t.text.as_str())
    }

    /// Names of all creators, in document order.
    pub fn creator_names(&self) -> Vec<&str> {
        self.creators
            .iter()
            .flatten()
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// A book identifier such as an ISBN or UUID URN.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Identifier {
    pub value: String,
    pub scheme: String,
}

impl Identifier {
    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.scheme.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Title {
    pub text: String,
    pub language: String,
    /// `"main"`, `"subtitle"`, `"collection"`, ... or empty when not refined.
    #[serde(rename = "type")]
    pub title_type: String,
    pub file_as: String,
}

/// A creator or contributor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Contributor {
    pub name: String,
    pub language: String,
    pub file_as: String,
    /// Display name resolved from `raw_role` through the relator vocabulary.
    pub role: String,
    /// The relator code as written in the package.
    pub raw_role: String,
}

/// A text value with its declared language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalizedText {
    pub text: String,
    pub language: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Date {
    pub value: String,
    /// The EPUB 2 `event` attribute, or `"publication"` for EPUB 3 dates.
    #[serde(rename = "type")]
    pub date_type: String,
}
