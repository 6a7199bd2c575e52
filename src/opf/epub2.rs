//! OPF 2.x package layout and normalization.
//!
//! In EPUB 2 every refinement (`opf:file-as`, `opf:role`, `opf:event`,
//! `opf:scheme`) is an attribute on the element it describes, so each field
//! maps over in a single pass.

use serde::Deserialize;

use super::{Normalize, char_data, main_identifier, map_all};
use crate::metadata::{Contributor, Date, Identifier, LocalizedText, Metadata, Title};
use crate::relators::resolve_role;

/// OPF 2 has no title-type refinement; every title is reported as the main one.
pub const MAIN_TITLE: &str = "main";

/// Root `<package>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Package {
    #[serde(rename = "@version")]
    pub version: String,
    #[serde(rename = "@unique-identifier")]
    pub unique_identifier: String,
    pub metadata: PackageMetadata,
    pub manifest: Manifest,
}

/// The `<metadata>` block. Each field is `None` when no such element occurs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PackageMetadata {
    #[serde(rename = "title")]
    pub titles: Option<Vec<Text>>,
    #[serde(rename = "identifier")]
    pub identifiers: Option<Vec<IdentifierElement>>,
    #[serde(rename = "language")]
    pub languages: Option<Vec<Plain>>,
    #[serde(rename = "creator")]
    pub creators: Option<Vec<Creator>>,
    #[serde(rename = "contributor")]
    pub contributors: Option<Vec<Creator>>,
    #[serde(rename = "publisher")]
    pub publishers: Option<Vec<Text>>,
    #[serde(rename = "subject")]
    pub subjects: Option<Vec<Text>>,
    #[serde(rename = "description")]
    pub descriptions: Option<Vec<Text>>,
    #[serde(rename = "date")]
    pub dates: Option<Vec<DateElement>>,
    #[serde(rename = "type")]
    pub types: Option<Vec<Plain>>,
    #[serde(rename = "format")]
    pub formats: Option<Vec<Plain>>,
    #[serde(rename = "source")]
    pub sources: Option<Vec<Text>>,
    #[serde(rename = "relation")]
    pub relations: Option<Vec<Text>>,
    #[serde(rename = "coverage")]
    pub coverages: Option<Vec<Text>>,
    pub rights: Option<Vec<Text>>,
    #[serde(rename = "meta")]
    pub metas: Option<Vec<Meta>>,
}

/// `<dc:creator>` / `<dc:contributor>` with their `opf:` attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Creator {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@file-as")]
    pub file_as: String,
    #[serde(rename = "@xml:lang", alias = "@lang")]
    pub lang: String,
    #[serde(rename = "@role")]
    pub role: String,
    #[serde(rename = "$value", deserialize_with = "char_data")]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Text {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@xml:lang", alias = "@lang")]
    pub lang: String,
    #[serde(rename = "$value", deserialize_with = "char_data")]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DateElement {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@event")]
    pub event: String,
    #[serde(rename = "$value", deserialize_with = "char_data")]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Plain {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "$value", deserialize_with = "char_data")]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IdentifierElement {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@scheme")]
    pub scheme: String,
    #[serde(rename = "$value", deserialize_with = "char_data")]
    pub text: String,
}

/// `<meta name="..." content="..."/>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Meta {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@content")]
    pub content: String,
    #[serde(rename = "@scheme")]
    pub scheme: String,
    #[serde(rename = "@xml:lang", alias = "@lang")]
    pub lang: String,
    #[serde(rename = "$text")]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Manifest {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "item")]
    pub items: Option<Vec<Item>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Item {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@href")]
    pub href: String,
    #[serde(rename = "@media-type")]
    pub media_type: String,
    #[serde(rename = "@fallback")]
    pub fallback: String,
    #[serde(rename = "@fallback-style")]
    pub fallback_style: String,
    #[serde(rename = "@required-modules")]
    pub required_modules: String,
    #[serde(rename = "@required-namespace")]
    pub required_namespace: String,
}

impl Normalize for Package {
    fn normalize(&self) -> Metadata {
        let meta = &self.metadata;

        let identifier = |e: &IdentifierElement| Identifier {
            value: e.text.clone(),
            scheme: e.scheme.clone(),
        };

        Metadata {
            main_identifier: main_identifier(
                &self.unique_identifier,
                meta.identifiers.iter().flatten(),
                |e| e.id.as_str(),
                identifier,
            ),
            identifiers: map_all(&meta.identifiers, identifier),
            languages: map_all(&meta.languages, |e| e.text.clone()),
            titles: map_all(&meta.titles, |e| Title {
                text: e.text.clone(),
                language: e.lang.clone(),
                title_type: MAIN_TITLE.to_string(),
                file_as: e.text.clone(),
            }),
            creators: map_all(&meta.creators, contributor),
            contributors: map_all(&meta.contributors, contributor),
            publishers: map_all(&meta.publishers, localized),
            subjects: map_all(&meta.subjects, localized),
            descriptions: map_all(&meta.descriptions, localized),
            dates: map_all(&meta.dates, |e| Date {
                value: e.text.clone(),
                date_type: e.event.clone(),
            }),
            rights: map_all(&meta.rights, localized),
            sources: map_all(&meta.sources, localized),
            relations: map_all(&meta.relations, localized),
            coverages: map_all(&meta.coverages, localized),
        }
    }
}

fn contributor(e: &Creator) -> Contributor {
    Contributor {
        name: e.text.clone(),
        language: e.lang.clone(),
        file_as: e.file_as.clone(),
        role: resolve_role(&e.role),
        raw_role: e.role.clone(),
    }
}

fn localized(e: &Text) -> LocalizedText {
    LocalizedText {
        text: e.text.clone(),
        language: e.lang.clone(),
    }
}
