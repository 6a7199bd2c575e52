//! Index of EPUB 3 `<meta refines="#id" property="...">` refinements.

use std::collections::HashMap;

use tracing::trace;

use super::epub3::Meta;

/// Maps a refined element id to its refinements, keyed by property name.
///
/// Only metas carrying both a `refines` target and a `property` are indexed.
/// Legacy EPUB 2 style `name`/`content` metas are skipped and can't be
/// looked up here. When several metas refine the same id with the same
/// property, the last one in document order wins.
#[derive(Debug, Default)]
pub struct RefinementIndex<'a> {
    by_id: HashMap<&'a str, HashMap<&'a str, &'a Meta>>,
}

impl<'a> RefinementIndex<'a> {
    pub fn build(metas: &'a [Meta]) -> Self {
        let mut by_id: HashMap<&'a str, HashMap<&'a str, &'a Meta>> = HashMap::new();

        for meta in metas {
            if meta.refines.is_empty() || meta.property.is_empty() {
                trace!(name = %meta.name, "skipping meta without refines/property");
                continue;
            }
            let target = meta.refines.strip_prefix('#').unwrap_or(meta.refines.as_str());
            by_id
                .entry(target)
                .or_default()
                .insert(meta.property.as_str(), meta);
        }

        Self { by_id }
    }

    /// The meta refining `id` with `property`, if any.
    pub fn get(&self, id: &str, property: &str) -> Option<&'a Meta> {
        if id.is_empty() {
            return None;
        }
        self.by_id.get(id)?.get(property).copied()
    }

    /// Text of the refinement for `id`/`property`, or `""` when absent.
    pub fn lookup(&self, id: &str, property: &str) -> &'a str {
        self.get(id, property).map_or("", |meta| meta.text.as_str())
    }

    /// Number of distinct refined ids.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
