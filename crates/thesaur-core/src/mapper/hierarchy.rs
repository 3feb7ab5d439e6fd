use std::collections::BTreeMap;

use super::{display_label, label_rank, ResultMapper};
use crate::fragments::annotate_label;
use crate::results::{RdfTerm, Row, Solutions};
use crate::types::{
    ChildConcept, HierarchyChild, HierarchyNode, Lookup, PropertyMap, PropertyValue, TopConcept,
    TransitiveResult,
};

/// Best label seen so far for one key, with its rank.
struct Ranked<T> {
    rank: u8,
    value: T,
}

fn keep_best<T>(slot: &mut Option<Ranked<T>>, rank: u8, value: impl FnOnce() -> T) {
    if slot.as_ref().map_or(true, |current| rank < current.rank) {
        *slot = Some(Ranked { rank, value: value() });
    }
}

fn term_rank(term: Option<&RdfTerm>, lang: &str, fallback: Option<&str>) -> u8 {
    match term {
        Some(t) => label_rank(t.language(), lang, fallback),
        None => u8::MAX,
    }
}

impl ResultMapper {
    /// Objects of a single-hop property lookup. `Absent` when the subject
    /// does not exist, `Empty` when it exists without the property.
    pub fn property(&self, solutions: &Solutions, lang: &str) -> Lookup<PropertyMap> {
        if solutions.is_empty() {
            return Lookup::Absent;
        }
        let mut best: BTreeMap<String, Option<Ranked<Option<String>>>> = BTreeMap::new();
        for row in solutions {
            let Some(object) = row.value("object") else {
                continue;
            };
            let label = row.get("label");
            let slot = best.entry(object.to_string()).or_default();
            keep_best(slot, term_rank(label, lang, None), || label.map(|l| display_label(l, lang)));
        }
        if best.is_empty() {
            return Lookup::Empty;
        }
        Lookup::Found(
            best.into_iter()
                .map(|(uri, slot)| {
                    let label = slot.and_then(|r| r.value);
                    (uri, PropertyValue { label, direct: Vec::new() })
                })
                .collect(),
        )
    }

    /// Reachable objects of a transitive lookup, trimmed to `limit`. The
    /// query asks for one row more than `limit`; its presence sets the
    /// truncation flag.
    pub fn transitive(
        &self,
        solutions: &Solutions,
        lang: &str,
        limit: usize,
    ) -> Lookup<TransitiveResult> {
        if solutions.is_empty() {
            return Lookup::Absent;
        }
        let rows: Vec<&Row> = solutions.iter().filter(|r| r.is_bound("object")).collect();
        if rows.is_empty() {
            return Lookup::Empty;
        }
        let truncated = rows.len() > limit;
        let objects = rows
            .into_iter()
            .take(limit)
            .filter_map(|row| {
                let uri = row.value("object")?.to_string();
                let label = ["label", "fallback", "other"]
                    .iter()
                    .find_map(|var| row.get(var))
                    .map(|term| display_label(term, lang));
                let direct = row
                    .non_empty("direct")
                    .map(|d| d.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_default();
                Some((uri, PropertyValue { label, direct }))
            })
            .collect();
        Lookup::Found(TransitiveResult { objects, truncated })
    }

    /// Immediate children, one entry per child with its best label, sorted
    /// by label.
    pub fn children(
        &self,
        solutions: &Solutions,
        lang: &str,
        fallback: Option<&str>,
    ) -> Lookup<Vec<ChildConcept>> {
        if solutions.is_empty() {
            return Lookup::Absent;
        }
        let mut order: Vec<String> = Vec::new();
        let mut seen: BTreeMap<String, (Option<Ranked<String>>, bool, Option<String>)> = BTreeMap::new();
        for row in solutions {
            let Some(child) = row.iri("child") else {
                continue;
            };
            let entry = seen.entry(child.to_string()).or_insert_with(|| {
                order.push(child.to_string());
                (None, row.flag("grandchildren"), None)
            });
            if let Some(label) = row.get("label") {
                keep_best(&mut entry.0, term_rank(Some(label), lang, fallback), || display_label(label, lang));
            }
            if entry.2.is_none() {
                entry.2 = row.value("notation").map(str::to_string);
            }
        }
        if order.is_empty() {
            return Lookup::Empty;
        }
        let mut children: Vec<ChildConcept> = order
            .into_iter()
            .filter_map(|uri| {
                let (label, has_children, notation) = seen.remove(&uri)?;
                Some(ChildConcept {
                    uri,
                    pref_label: label.map(|r| r.value),
                    has_children,
                    notation,
                })
            })
            .collect();
        children.sort_by(|a, b| {
            let key = |c: &ChildConcept| c.pref_label.as_deref().map(str::to_lowercase);
            key(a).cmp(&key(b)).then_with(|| a.uri.cmp(&b.uri))
        });
        Lookup::Found(children)
    }

    /// Top concepts, one per (concept, scheme) pair. Concepts without any
    /// label are left out.
    pub fn top_concepts(&self, solutions: &Solutions, lang: &str, fallback: Option<&str>) -> Vec<TopConcept> {
        let mut order: Vec<(String, String)> = Vec::new();
        let mut best: BTreeMap<(String, String), (Ranked<String>, bool, Option<String>)> = BTreeMap::new();
        for row in solutions {
            let (Some(top), Some(scheme), Some(label)) = (row.iri("top"), row.iri("topuri"), row.get("label")) else {
                continue;
            };
            let key = (top.to_string(), scheme.to_string());
            let rank = term_rank(Some(label), lang, fallback);
            match best.get_mut(&key) {
                Some(entry) if rank < entry.0.rank => entry.0 = Ranked { rank, value: display_label(label, lang) },
                Some(_) => {}
                None => {
                    order.push(key.clone());
                    best.insert(
                        key,
                        (
                            Ranked { rank, value: display_label(label, lang) },
                            row.flag("children"),
                            row.value("notation").map(str::to_string),
                        ),
                    );
                }
            }
        }
        order
            .into_iter()
            .filter_map(|key| {
                let (label, has_children, notation) = best.remove(&key)?;
                Some(TopConcept {
                    uri: key.0,
                    top_concept_of: key.1,
                    label: label.value,
                    has_children,
                    notation,
                })
            })
            .collect()
    }

    /// Ancestor tree keyed by URI. Each node lists its own parents, the
    /// schemes it tops (sorted) and its children.
    pub fn parent_list(&self, solutions: &Solutions, lang: &str) -> Lookup<BTreeMap<String, HierarchyNode>> {
        if solutions.is_empty() {
            return Lookup::Absent;
        }
        let mut nodes: BTreeMap<String, HierarchyNode> = BTreeMap::new();
        for row in solutions {
            let Some(uri) = row.iri("broad") else {
                continue;
            };
            let node = nodes.entry(uri.to_string()).or_insert_with(|| HierarchyNode {
                uri: uri.to_string(),
                ..Default::default()
            });
            if let Some(tops) = row.non_empty("tops") {
                let mut tops: Vec<String> = tops.split_whitespace().map(str::to_string).collect();
                tops.sort();
                tops.dedup();
                node.tops = tops;
            }
            if let Some(child) = row.iri("children") {
                let entry = HierarchyChild {
                    uri: child.to_string(),
                    label: row
                        .get("childlabel")
                        .map(|l| annotate_label(l.value(), l.language(), lang)),
                    has_children: row.flag("grandchildren"),
                    notation: row.value("childnotation").map(str::to_string),
                };
                if !node.narrower.iter().any(|c| c.uri == entry.uri) {
                    node.narrower.push(entry);
                }
            }
            if let Some(label) = row.get("label") {
                node.pref_label = Some(display_label(label, lang));
            }
            if let Some(notation) = row.value("notation") {
                node.notation = Some(notation.to_string());
            }
            if let Some(parent) = row.iri("parent") {
                if !node.broader.iter().any(|b| b == parent) {
                    node.broader.push(parent.to_string());
                }
            }
        }
        if nodes.is_empty() {
            Lookup::Empty
        } else {
            Lookup::Found(nodes)
        }
    }
}
