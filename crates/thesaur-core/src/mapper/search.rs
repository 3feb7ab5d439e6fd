use std::collections::BTreeMap;

use super::{csv, local_part, ResultMapper};
use crate::escape;
use crate::prefix::QNameCache;
use crate::query::{field_csv_var, PREF_LABELS_VAR};
use crate::results::{Row, Solutions};
use crate::types::{AlphabeticalEntry, ConceptHit, FieldValue, SearchSpec, Vocabulary};

impl ResultMapper {
    /// Search hits in result order. Rows without `?s` are placeholders
    /// some stores emit for empty aggregates and are skipped.
    pub fn search_hits(&self, solutions: &Solutions, spec: &SearchSpec) -> Vec<ConceptHit> {
        let mut qnames = self.qnames();
        solutions
            .iter()
            .filter_map(|row| self.search_hit(row, spec, &mut qnames))
            .collect()
    }

    fn search_hit(&self, row: &Row, spec: &SearchSpec, qnames: &mut QNameCache<'_>) -> Option<ConceptHit> {
        let uri = row.iri("s")?.to_string();
        let graph_uri = row.iri("graph").map(str::to_string);

        let mut hit = ConceptHit {
            vocab: self.hit_vocabulary(&uri, graph_uri.as_deref(), &spec.vocabularies),
            localname: spec
                .vocabularies
                .iter()
                .map(|v| v.local_name(&uri))
                .find(|local| *local != uri)
                .map(str::to_string),
            types: row
                .non_empty("types")
                .map(|t| t.split_whitespace().map(|t| qnames.shorten(t)).collect())
                .unwrap_or_default(),
            pref_label: row.value("label").map(str::to_string),
            lang: row.lang("label").map(str::to_string),
            notation: row.value("notation").map(str::to_string),
            uri,
            graph_uri,
            ..Default::default()
        };

        if let Some(term) = row.get("plabel") {
            hit.matched_pref_label = Some(term.value().to_string());
            hit.lang = term.language().map(str::to_string);
        } else if let Some(term) = row.get("alabel") {
            hit.alt_label = Some(term.value().to_string());
            hit.lang = term.language().map(str::to_string);
        } else if let Some(term) = row.get("hlabel") {
            hit.hidden_label = Some(term.value().to_string());
            hit.lang = term.language().map(str::to_string);
        }

        for field in &spec.extra_fields {
            let name = escape::variable_name(field);
            if name.is_empty() || name == "prefLabel" {
                continue;
            }
            if let Some(text) = row.non_empty(&field_csv_var(&name)) {
                let values: Vec<FieldValue> = csv::parse(text).into_iter().filter_map(field_value).collect();
                if !values.is_empty() {
                    hit.fields.insert(format!("skos:{name}"), values);
                }
            }
        }
        if let Some(text) = row.non_empty(PREF_LABELS_VAR) {
            hit.pref_labels = csv::parse(text)
                .into_iter()
                .filter_map(|r| match r.as_slice() {
                    [label, lang, ..] => Some((lang.clone(), label.clone())),
                    _ => None,
                })
                .collect::<BTreeMap<_, _>>();
        }
        Some(hit)
    }

    /// Owning vocabulary of a hit: by the graph it was found in, then by
    /// URI space, then the only candidate. Falls back to the unknown marker.
    fn hit_vocabulary(&self, uri: &str, graph: Option<&str>, candidates: &[Vocabulary]) -> String {
        if let Some(g) = graph {
            if let Some(v) = candidates.iter().find(|v| v.graph.graph.named() == Some(g)) {
                return v.id.clone();
            }
        }
        if let Some(v) = candidates.iter().find(|v| v.local_name(uri) != uri) {
            return v.id.clone();
        }
        match candidates {
            [only] => only.id.clone(),
            _ => self.unknown_vocabulary.clone(),
        }
    }

    /// Alphabetical index entries. An entry found through an alternate
    /// label reports that label's language.
    pub fn alphabetical(&self, solutions: &Solutions) -> Vec<AlphabeticalEntry> {
        solutions
            .iter()
            .filter_map(|row| {
                let uri = row.iri("s")?;
                let mut entry = AlphabeticalEntry {
                    uri: uri.to_string(),
                    localname: local_part(uri).to_string(),
                    pref_label: row.value("label").unwrap_or_default().to_string(),
                    lang: row.lang("label").map(str::to_string),
                    alt_label: None,
                    qualifier: row.non_empty("qualifier").map(str::to_string),
                };
                if let Some(alt) = row.get("alabel") {
                    entry.alt_label = Some(alt.value().to_string());
                    entry.lang = alt.language().map(str::to_string);
                }
                Some(entry)
            })
            .collect()
    }

    pub fn first_characters(&self, solutions: &Solutions) -> Vec<String> {
        solutions
            .iter()
            .filter_map(|row| row.non_empty("l"))
            .map(str::to_string)
            .collect()
    }
}

/// One `"uri","label","literal"` row of an extra field aggregate.
fn field_value(row: Vec<String>) -> Option<FieldValue> {
    let mut cells = row.into_iter();
    let uri = cells.next().unwrap_or_default();
    let label = cells.next().unwrap_or_default();
    let literal = cells.next().unwrap_or_default();
    if !literal.is_empty() {
        return Some(FieldValue::Literal(literal));
    }
    if uri.is_empty() {
        return None;
    }
    Some(FieldValue::Resource {
        uri,
        pref_label: (!label.is_empty()).then_some(label),
    })
}
