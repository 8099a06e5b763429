//! Catalog of available colormaps.
//!
//! A [`Catalog`] merges any number of record documents (see [`record`])
//! into one resolvable name space. Names are normalized (lowercase, spaces
//! and hyphens to underscores), short names resolve through alias entries
//! to their first-registered namespace, and ambiguous short names resolve
//! with a non-fatal warning listing the conflicting qualified names.
//!
//! Entry data is materialized lazily: the stop data referenced by an entry
//! is parsed on first access and memoized for the catalog's lifetime.

pub mod data;
pub mod record;

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::warn;

use crate::error::{ChromapError, Result};
use crate::stops::{ColorStops, ColormapLike, Interpolation, StopLike};

pub use record::{CatalogRecord, DataRef, ItemEntry, RecordEntry};

/// Separates a namespace from a short name in a qualified name.
pub const NAMESPACE_DELIMITER: char = ':';

/// A loaded catalog entry with its stop data materialized.
#[derive(Debug, Clone)]
pub struct CatalogItem {
    /// The short name, e.g. `"jet"`.
    pub name: String,
    /// The namespace the entry came from, e.g. `"matlab"`.
    pub namespace: String,
    pub category: Option<String>,
    pub license: String,
    pub source: String,
    pub info: String,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    /// Normalized names registered as aliases of this entry.
    pub aliases: Vec<String>,
    pub interpolation: Interpolation,
    pub stops: ColorStops,
}

impl CatalogItem {
    /// `namespace:name`, the unambiguous identifier of this entry.
    pub fn qualified_name(&self) -> String {
        format!("{}{}{}", self.namespace, NAMESPACE_DELIMITER, self.name)
    }
}

/// An unloaded concrete entry, with record defaults already merged in.
#[derive(Debug, Clone)]
struct ItemNode {
    namespace: String,
    name: String,
    data: DataRef,
    category: Option<String>,
    license: Option<String>,
    source: Option<String>,
    info: String,
    authors: Vec<String>,
    tags: Vec<String>,
    interpolation: Interpolation,
}

#[derive(Debug, Clone)]
enum Node {
    Item(ItemNode),
    Alias {
        target: String,
        conflicts: Vec<String>,
    },
}

/// Catalog of available colormaps.
pub struct Catalog {
    /// All resolvable normalized names (short and qualified).
    nodes: HashMap<String, Node>,
    /// `(original, normalized)` names in registration order.
    original_names: Vec<(String, String)>,
    /// Normalized alias name to its qualified target (as written).
    aliases: HashMap<String, String>,
    /// Normalized qualified name to the normalized aliases that point at it.
    rev_aliases: HashMap<String, Vec<String>>,
    /// Memoized materialized entries, keyed per requested name.
    loaded: RwLock<HashMap<String, Arc<CatalogItem>>>,
}

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    Catalog::from_records(&data::builtin_records())
        .expect("built-in catalog records are valid")
});

impl Catalog {
    /// The built-in catalog, constructed once from the embedded records.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Build a catalog from record documents.
    ///
    /// Registration is deterministic and two-pass: concrete entries and
    /// their short-name aliases first, normalized lookup tables second.
    /// The first namespace to provide a short name owns it; later
    /// providers are appended to the alias's conflict list.
    pub fn from_records(records: &[CatalogRecord]) -> Result<Self> {
        // pass 1: nodes keyed by original name, in registration order
        fn register(
            order: &mut Vec<String>,
            nodes: &mut HashMap<String, Node>,
            name: String,
            node: Node,
        ) {
            if !nodes.contains_key(&name) {
                order.push(name.clone());
            }
            nodes.insert(name, node);
        }
        let mut order: Vec<String> = Vec::new();
        let mut nodes: HashMap<String, Node> = HashMap::new();

        for rec in records {
            let namespace = &rec.namespace;
            if namespace.contains(NAMESPACE_DELIMITER) {
                return Err(ChromapError::Record {
                    message: format!("namespace {:?} must not contain a colon", namespace),
                });
            }
            for (name, entry) in &rec.colormaps {
                if name.contains(NAMESPACE_DELIMITER) {
                    return Err(ChromapError::Record {
                        message: format!("colormap name {:?} must not contain a colon", name),
                    });
                }
                let qualified = format!("{}{}{}", namespace, NAMESPACE_DELIMITER, name);

                match entry {
                    RecordEntry::Alias(alias) => {
                        if !alias.alias.contains(NAMESPACE_DELIMITER) {
                            return Err(ChromapError::Record {
                                message: format!(
                                    "alias {:?} -> {:?} is not namespaced",
                                    qualified, alias.alias
                                ),
                            });
                        }
                        let node = Node::Alias {
                            target: alias.alias.clone(),
                            conflicts: alias.conflicts.clone(),
                        };
                        register(&mut order, &mut nodes, qualified, node.clone());
                        register(&mut order, &mut nodes, name.clone(), node);
                    }
                    RecordEntry::Item(item) => {
                        let node = ItemNode {
                            namespace: namespace.clone(),
                            name: name.clone(),
                            data: item.data.clone(),
                            category: item.category.clone().or_else(|| rec.category.clone()),
                            license: item.license.clone().or_else(|| rec.license.clone()),
                            source: item.source.clone().or_else(|| rec.source.clone()),
                            info: item.info.clone(),
                            authors: item
                                .authors
                                .clone()
                                .or_else(|| rec.authors.clone())
                                .unwrap_or_default(),
                            tags: item.tags.clone(),
                            interpolation: item.interpolation.unwrap_or_default(),
                        };
                        register(&mut order, &mut nodes, qualified.clone(), Node::Item(node));

                        // short name: first registrant owns it, later ones
                        // are recorded as conflicts
                        if nodes.contains_key(name) {
                            if let Some(Node::Alias { conflicts, .. }) = nodes.get_mut(name) {
                                conflicts.push(qualified.clone());
                            }
                        } else {
                            register(
                                &mut order,
                                &mut nodes,
                                name.clone(),
                                Node::Alias {
                                    target: qualified.clone(),
                                    conflicts: Vec::new(),
                                },
                            );
                        }

                        // same-namespace alternate spellings
                        for alias in &item.aliases {
                            if alias.contains(NAMESPACE_DELIMITER) {
                                return Err(ChromapError::Record {
                                    message: format!(
                                        "internal alias {:?} in namespace {:?} \
                                         must not contain a colon",
                                        alias, namespace
                                    ),
                                });
                            }
                            register(
                                &mut order,
                                &mut nodes,
                                format!("{}{}{}", namespace, NAMESPACE_DELIMITER, alias),
                                Node::Alias {
                                    target: qualified.clone(),
                                    conflicts: Vec::new(),
                                },
                            );
                        }
                    }
                }
            }
        }

        // pass 2: normalized lookup tables
        let mut catalog = Catalog {
            nodes: HashMap::with_capacity(nodes.len()),
            original_names: Vec::with_capacity(order.len()),
            aliases: HashMap::new(),
            rev_aliases: HashMap::new(),
            loaded: RwLock::new(HashMap::new()),
        };
        for original in order {
            let node = nodes[&original].clone();
            let normalized = norm_name(&original);
            if let Node::Alias { target, .. } = &node {
                catalog
                    .aliases
                    .insert(normalized.clone(), target.clone());
                catalog
                    .rev_aliases
                    .entry(norm_name(target))
                    .or_default()
                    .push(normalized.clone());
            }
            catalog
                .original_names
                .push((original, normalized.clone()));
            catalog.nodes.insert(normalized, node);
        }
        Ok(catalog)
    }

    /// Build a catalog from every `pattern` file found under `root`.
    pub fn load_dir(root: &Path, pattern: &str) -> Result<Self> {
        Self::from_records(&record::load_records_dir(root, pattern)?)
    }

    /// The fully qualified name of a colormap or alias.
    pub fn resolve(&self, name: &str) -> Result<String> {
        let normalized = norm_name(name);
        if let Some(target) = self.aliases.get(&normalized) {
            return Ok(target.clone());
        }
        if self.nodes.contains_key(&normalized) {
            return Ok(normalized);
        }
        Err(ChromapError::NotFound {
            name: name.to_string(),
            normalized,
        })
    }

    /// Load a named entry, materializing and memoizing its data.
    ///
    /// Resolving an ambiguous short name succeeds with the first-registered
    /// entry and logs a warning naming the alternatives; use the fully
    /// qualified name to silence it.
    pub fn get(&self, name: &str) -> Result<Arc<CatalogItem>> {
        if let Some(item) = self.loaded.read().get(name) {
            return Ok(item.clone());
        }
        let key = norm_name(name);
        let item = self.load(&key, name)?;
        let mut loaded = self.loaded.write();
        loaded.insert(name.to_string(), item.clone());
        if key != name {
            loaded.insert(key, item.clone());
        }
        Ok(item)
    }

    fn load(&self, key: &str, requested: &str) -> Result<Arc<CatalogItem>> {
        let node = self.nodes.get(key).ok_or_else(|| ChromapError::NotFound {
            name: requested.to_string(),
            normalized: key.to_string(),
        })?;
        match node {
            Node::Alias { target, conflicts } => {
                if !conflicts.is_empty() {
                    warn!(
                        requested = key,
                        target = target.as_str(),
                        conflicts = conflicts.join(", ").as_str(),
                        "ambiguous colormap name resolves to its first \
                         registrant; use a fully namespaced name to silence \
                         this warning"
                    );
                }
                self.get(target)
            }
            Node::Item(item) => self.materialize(key, item),
        }
    }

    fn materialize(&self, key: &str, node: &ItemNode) -> Result<Arc<CatalogItem>> {
        let like = match &node.data {
            DataRef::Reference(reference) => {
                data::lookup(reference).ok_or_else(|| ChromapError::Record {
                    message: format!("unknown data reference {:?}", reference),
                })?
            }
            DataRef::Inline(rows) => inline_rows(rows)?,
        };
        let stops = ColorStops::parse(like)?.with_interpolation(node.interpolation);
        Ok(Arc::new(CatalogItem {
            name: node.name.clone(),
            namespace: node.namespace.clone(),
            category: node.category.clone(),
            license: node.license.clone().unwrap_or_else(|| "UNKNOWN".to_string()),
            source: node.source.clone().unwrap_or_default(),
            info: node.info.clone(),
            authors: node.authors.clone(),
            tags: node.tags.clone(),
            aliases: self.rev_aliases.get(key).cloned().unwrap_or_default(),
            interpolation: node.interpolation,
            stops,
        }))
    }

    /// Names that address each distinct colormap exactly once.
    ///
    /// When `prefer_short_names` is set, the short form is used where it is
    /// unambiguous (no conflicts) and resolves back to the same entry;
    /// otherwise the qualified form is used. Optionally filtered by
    /// category and interpolation.
    pub fn unique_keys(
        &self,
        prefer_short_names: bool,
        normalized_names: bool,
        categories: &[&str],
        interpolation: Option<Interpolation>,
    ) -> BTreeSet<String> {
        let mut keys = BTreeSet::new();
        for (original, normalized) in &self.original_names {
            let item = match self.nodes.get(normalized) {
                Some(Node::Item(item)) => item,
                _ => continue,
            };
            if !categories.is_empty() {
                let category = item.category.as_deref().unwrap_or("");
                if !categories.contains(&category) {
                    continue;
                }
            }
            if let Some(interp) = interpolation {
                if item.interpolation != interp {
                    continue;
                }
            }
            if prefer_short_names {
                let short = normalized
                    .split_once(NAMESPACE_DELIMITER)
                    .map(|(_, s)| s)
                    .unwrap_or(normalized);
                if let Some(Node::Alias { target, conflicts }) = self.nodes.get(short) {
                    if conflicts.is_empty() && target == original {
                        keys.insert(if normalized_names {
                            short.to_string()
                        } else {
                            original
                                .split_once(NAMESPACE_DELIMITER)
                                .map(|(_, s)| s)
                                .unwrap_or(original)
                                .to_string()
                        });
                        continue;
                    }
                }
            }
            keys.insert(if normalized_names {
                normalized.clone()
            } else {
                original.clone()
            });
        }
        keys
    }

    /// Available short colormap names, without namespace.
    pub fn short_keys(&self) -> BTreeSet<String> {
        self.original_names
            .iter()
            .filter(|(original, _)| !original.contains(NAMESPACE_DELIMITER))
            .map(|(original, _)| original.clone())
            .collect()
    }

    /// Available colormap names, with namespace.
    pub fn namespaced_keys(&self) -> BTreeSet<String> {
        self.original_names
            .iter()
            .filter(|(original, _)| original.contains(NAMESPACE_DELIMITER))
            .map(|(original, _)| original.clone())
            .collect()
    }

    /// All registered names (short and qualified), in registration order.
    pub fn iter_names(&self) -> impl Iterator<Item = &str> {
        self.original_names.iter().map(|(original, _)| original.as_str())
    }

    pub fn len(&self) -> usize {
        self.original_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.original_names.is_empty()
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("names", &self.original_names.len())
            .field("loaded", &self.loaded.read().len())
            .finish()
    }
}

/// Normalize a catalog name: lowercase, spaces and hyphens to underscores.
pub(crate) fn norm_name(name: &str) -> String {
    name.to_lowercase().replace([' ', '-'], "_")
}

fn inline_rows(rows: &[Vec<f64>]) -> Result<ColormapLike> {
    if rows.is_empty() {
        return Err(ChromapError::Record {
            message: "inline colormap data is empty".to_string(),
        });
    }
    let items = rows
        .iter()
        .map(|row| match row.len() {
            3 | 4 => Ok(StopLike::Color(crate::color::ColorLike::Floats(row.clone()))),
            5 => Ok(StopLike::Raw([row[0], row[1], row[2], row[3], row[4]])),
            n => Err(ChromapError::Record {
                message: format!("inline data rows must have 3-5 values, got {}", n),
            }),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ColormapLike::Items(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads_everything() {
        let catalog = Catalog::builtin();
        assert!(catalog.len() > 20);
        for name in catalog.iter_names().map(String::from).collect::<Vec<_>>() {
            catalog.get(&name).unwrap();
        }
    }

    #[test]
    fn test_short_and_qualified_names_resolve_to_same_entry() {
        let catalog = Catalog::builtin();
        let short = catalog.get("jet").unwrap();
        let qualified = catalog.get("matlab:jet").unwrap();
        assert_eq!(short.qualified_name(), qualified.qualified_name());
        assert_eq!(short.stops, qualified.stops);
    }

    #[test]
    fn test_name_normalization() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.resolve("Light Blues").unwrap(), "vispy:light_blues");
        assert_eq!(catalog.resolve("light-blues").unwrap(), "vispy:light_blues");
        assert_eq!(
            catalog.resolve("VISPY:Light_Blues").unwrap(),
            "vispy:light_blues"
        );
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        let catalog = Catalog::builtin();
        let err = catalog.resolve("not-a-cmap").unwrap_err();
        match err {
            ChromapError::NotFound { name, normalized } => {
                assert_eq!(name, "not-a-cmap");
                assert_eq!(normalized, "not_a_cmap");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(catalog.get("not-a-cmap").is_err());
    }

    #[test]
    fn test_conflicting_short_name_resolves_to_first_registrant() {
        // both matlab and gnuplot provide "hot"; matlab registered first
        let catalog = Catalog::builtin();
        let item = catalog.get("hot").unwrap();
        assert_eq!(item.namespace, "matlab");
        let gnuplot = catalog.get("gnuplot:hot").unwrap();
        assert_eq!(gnuplot.namespace, "gnuplot");
        assert_ne!(item.stops, gnuplot.stops);
    }

    #[test]
    fn test_alias_entries_resolve_through_chain() {
        let catalog = Catalog::builtin();
        let via_alias = catalog.get("vispy:single_hue").unwrap();
        assert_eq!(via_alias.name, "light_blues");
        // same-namespace spelling alias from the `aliases` list
        let grey = catalog.get("matlab:grey").unwrap();
        assert_eq!(grey.name, "gray");
        assert!(catalog
            .get("matlab:gray")
            .unwrap()
            .aliases
            .contains(&"matlab:grey".to_string()));
    }

    #[test]
    fn test_record_defaults_are_merged() {
        let catalog = Catalog::builtin();
        let jet = catalog.get("jet").unwrap();
        assert_eq!(jet.license, "PSF");
        assert_eq!(jet.category.as_deref(), Some("miscellaneous"));
        let gray = catalog.get("matlab:gray").unwrap();
        assert_eq!(gray.category.as_deref(), Some("sequential"));
    }

    #[test]
    fn test_lazy_loading_memoizes() {
        let catalog = Catalog::builtin();
        let first = catalog.get("jet").unwrap();
        let second = catalog.get("jet").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        // normalized spelling shares the cache entry
        let third = catalog.get("JET").unwrap();
        assert_eq!(third.qualified_name(), first.qualified_name());
    }

    #[test]
    fn test_nearest_interpolation_from_record() {
        let catalog = Catalog::builtin();
        let tab10 = catalog.get("tab10").unwrap();
        assert_eq!(tab10.interpolation, Interpolation::Nearest);
        assert_eq!(tab10.stops.len(), 10);
    }

    #[test]
    fn test_unique_keys_prefers_unambiguous_short_names() {
        let catalog = Catalog::builtin();
        let unique = catalog.unique_keys(true, false, &[], None);
        // unambiguous short names survive as-is
        assert!(unique.contains("jet"));
        assert!(unique.contains("tab10"));
        // conflicting short names fall back to qualified forms
        assert!(!unique.contains("hot"));
        assert!(unique.contains("matlab:hot"));
        assert!(unique.contains("gnuplot:hot"));
        assert!(!unique.contains("hsv"));

        let qualified = catalog.unique_keys(false, true, &[], None);
        assert!(qualified.contains("matlab:jet"));
        assert!(!qualified.contains("jet"));
    }

    #[test]
    fn test_unique_keys_filters() {
        let catalog = Catalog::builtin();
        let qualitative = catalog.unique_keys(true, false, &["qualitative"], None);
        assert!(qualitative.contains("tab10"));
        assert!(!qualitative.contains("jet"));

        let nearest = catalog.unique_keys(true, false, &[], Some(Interpolation::Nearest));
        assert!(nearest.contains("tab10"));
        assert!(!nearest.contains("jet"));
    }

    #[test]
    fn test_catalog_from_custom_records() {
        let json = r#"{
            "namespace": "demo",
            "colormaps": {
                "fade": {"data": [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]], "category": "sequential"}
            }
        }"#;
        let record = CatalogRecord::from_json(json).unwrap();
        let catalog = Catalog::from_records(&[record]).unwrap();
        let item = catalog.get("fade").unwrap();
        assert_eq!(item.qualified_name(), "demo:fade");
        assert_eq!(item.license, "UNKNOWN");
        assert_eq!(item.stops.len(), 2);
    }

    #[test]
    fn test_bad_records_rejected() {
        let bad_ns = CatalogRecord {
            namespace: "a:b".to_string(),
            license: None,
            source: None,
            authors: None,
            category: None,
            colormaps: Default::default(),
        };
        assert!(matches!(
            Catalog::from_records(&[bad_ns]),
            Err(ChromapError::Record { .. })
        ));
    }
}
