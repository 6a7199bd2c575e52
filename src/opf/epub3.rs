//! OPF 3.x package layout and normalization.
//!
//! EPUB 3 moved `file-as`, `role` and `title-type` off the Dublin Core
//! elements and into `<meta refines="#id" property="...">` entries, so
//! normalization first builds a [`RefinementIndex`] over the metas.

use serde::Deserialize;

use super::refines::RefinementIndex;
use super::{Normalize, char_data, main_identifier, map_all};
use crate::metadata::{Contributor, Date, Identifier, LocalizedText, Metadata, Title};
use crate::relators::resolve_role;

/// EPUB 3 dates carry no event attribute; they are all publication dates.
pub const PUBLICATION_DATE: &str = "publication";

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
    #[serde(rename = "identifier")]
    pub identifiers: Option<Vec<IdentifierElement>>,
    #[serde(rename = "language")]
    pub languages: Option<Vec<Plain>>,
    #[serde(rename = "title")]
    pub titles: Option<Vec<Text>>,
    #[serde(rename = "meta")]
    pub metas: Option<Vec<Meta>>,
    #[serde(rename = "date")]
    pub dates: Option<Vec<Plain>>,
    #[serde(rename = "type")]
    pub types: Option<Vec<Plain>>,
    #[serde(rename = "creator")]
    pub creators: Option<Vec<Text>>,
    #[serde(rename = "contributor")]
    pub contributors: Option<Vec<Text>>,
    #[serde(rename = "publisher")]
    pub publishers: Option<Vec<Text>>,
    #[serde(rename = "subject")]
    pub subjects: Option<Vec<Text>>,
    #[serde(rename = "description")]
    pub descriptions: Option<Vec<Text>>,
    pub rights: Option<Vec<Text>>,
    #[serde(rename = "source")]
    pub sources: Option<Vec<Text>>,
    #[serde(rename = "relation")]
    pub relations: Option<Vec<Text>>,
    #[serde(rename = "coverage")]
    pub coverages: Option<Vec<Text>>,
    #[serde(rename = "link")]
    pub links: Option<Vec<Link>>,
}

/// `<dc:identifier>`.
///
/// OPF 3 dropped `opf:scheme`, but packages upgraded from EPUB 2 often keep
/// it; when present it is carried through.
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

/// An element with only an id and text content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Plain {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "$value", deserialize_with = "char_data")]
    pub text: String,
}

/// A Dublin Core element with id, direction and language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Text {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@dir")]
    pub dir: String,
    #[serde(rename = "@xml:lang", alias = "@lang")]
    pub lang: String,
    #[serde(rename = "$value", deserialize_with = "char_data")]
    pub text: String,
}

/// A `<meta>` element, either a refinement or a legacy `name`/`content` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Meta {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@dir")]
    pub dir: String,
    #[serde(rename = "@xml:lang", alias = "@lang")]
    pub lang: String,
    #[serde(rename = "@property")]
    pub property: String,
    #[serde(rename = "@refines")]
    pub refines: String,
    #[serde(rename = "@scheme")]
    pub scheme: String,
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@content")]
    pub content: String,
    #[serde(rename = "$text")]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Link {
    #[serde(rename = "@href")]
    pub href: String,
    #[serde(rename = "@rel")]
    pub rel: String,
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@media-type")]
    pub media_type: String,
    #[serde(rename = "@properties")]
    pub properties: String,
    #[serde(rename = "@refines")]
    pub refines: String,
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
    #[serde(rename = "@media-overlay")]
    pub media_overlay: String,
    #[serde(rename = "@properties")]
    pub properties: String,
}

/// Identifier schemes come from the element's own `scheme` attribute, not
/// from `identifier-type` refinements; without one the scheme is empty.
impl Normalize for Package {
    fn normalize(&self) -> Metadata {
        let meta = &self.metadata;
        let metas = meta.metas.as_deref().unwrap_or_default();
        let refinements = RefinementIndex::build(metas);

        let identifier = |e: &IdentifierElement| Identifier {
            value: e.text.clone(),
            scheme: e.scheme.clone(),
        };
        let contributor = |e: &Text| {
            let raw_role = refinements.lookup(&e.id, "role");
            Contributor {
                name: e.text.clone(),
                language: e.lang.clone(),
                file_as: refinements.lookup(&e.id, "file-as").to_string(),
                role: resolve_role(raw_role),
                raw_role: raw_role.to_string(),
            }
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
                title_type: refinements.lookup(&e.id, "title-type").to_string(),
                file_as: refinements.lookup(&e.id, "file-as").to_string(),
            }),
            creators: map_all(&meta.creators, contributor),
            contributors: map_all(&meta.contributors, contributor),
            publishers: map_all(&meta.publishers, localized),
            subjects: map_all(&meta.subjects, localized),
            descriptions: map_all(&meta.descriptions, localized),
            dates: map_all(&meta.dates, |e| Date {
                value: e.text.clone(),
                date_type: PUBLICATION_DATE.to_string(),
            }),
            rights: map_all(&meta.rights, localized),
            sources: map_all(&meta.sources, localized),
            relations: map_all(&meta.relations, localized),
            coverages: map_all(&meta.coverages, localized),
        }
    }
}

fn localized(e: &Text) -> LocalizedText {
    LocalizedText {
        text: e.text.clone(),
        language: e.lang.clone(),
    }
}
