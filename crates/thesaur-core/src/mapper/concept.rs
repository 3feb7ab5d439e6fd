use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::ResultMapper;
use crate::fragments::lang_satisfies;
use crate::prefix::{RDF_TYPE, SKOS};
use crate::results::{RdfGraph, RdfTerm, Solutions};
use crate::types::{
    ChangeDate, ChangedConcept, ConceptRecord, SchemeSubject, SchemeSummary, TypeInfo, Vocabulary,
};

impl ResultMapper {
    /// Concept records for `uris` out of a concept-info graph, in request
    /// order. URIs with no outgoing statements do not exist and are left
    /// out.
    pub fn concept_records(
        &self,
        graph: &RdfGraph,
        uris: &[String],
        vocabularies: &[Vocabulary],
    ) -> Vec<ConceptRecord> {
        let mut qnames = self.qnames();
        let pref_label = format!("{SKOS}prefLabel");
        let member = format!("{SKOS}member");

        let mut records = Vec::new();
        for uri in uris {
            let mut properties: BTreeMap<String, Vec<RdfTerm>> = BTreeMap::new();
            let mut types = Vec::new();
            let mut pref_labels = Vec::new();
            for triple in graph.about(uri) {
                if triple.predicate == RDF_TYPE {
                    if let Some(t) = triple.object.as_iri() {
                        let short = qnames.shorten(t);
                        if !types.contains(&short) {
                            types.push(short);
                        }
                    }
                } else if triple.predicate == pref_label {
                    pref_labels.push(triple.object.to_label());
                }
                let values = properties.entry(qnames.shorten(&triple.predicate)).or_default();
                if !values.contains(&triple.object) {
                    values.push(triple.object.clone());
                }
            }
            if properties.is_empty() {
                tracing::debug!(uri = %uri, "no statements about concept");
                continue;
            }
            let mut groups: Vec<String> = graph.subjects(&member, uri).map(str::to_string).collect();
            groups.sort();
            groups.dedup();
            records.push(ConceptRecord {
                vocab: self.record_vocabulary(uri, vocabularies),
                uri: uri.clone(),
                types,
                pref_labels,
                properties,
                groups,
            });
        }
        records
    }

    /// The vocabulary a concept-info result belongs to: the only candidate,
    /// else the first whose URI space contains it.
    fn record_vocabulary(&self, uri: &str, candidates: &[Vocabulary]) -> String {
        match candidates {
            [only] => only.id.clone(),
            _ => candidates
                .iter()
                .find(|v| v.local_name(uri) != uri)
                .map(|v| v.id.clone())
                .unwrap_or_else(|| self.unknown_vocabulary.clone()),
        }
    }

    /// Concept and collection classes keyed by class URI.
    pub fn types(&self, solutions: &Solutions) -> BTreeMap<String, TypeInfo> {
        let mut types: BTreeMap<String, TypeInfo> = BTreeMap::new();
        for row in solutions {
            let Some(uri) = row.iri("type") else {
                continue;
            };
            let info = types.entry(uri.to_string()).or_default();
            if info.label.is_none() {
                info.label = row.value("label").map(str::to_string);
            }
            if info.superclass.is_none() {
                info.superclass = row.iri("superclass").map(str::to_string);
            }
        }
        types
    }

    /// Concept schemes keyed by URI. A scheme's subject is only reported
    /// when its label is in `lang`.
    pub fn concept_schemes(&self, solutions: &Solutions, lang: &str) -> BTreeMap<String, SchemeSummary> {
        let mut schemes: BTreeMap<String, SchemeSummary> = BTreeMap::new();
        for row in solutions {
            let Some(uri) = row.iri("cs") else {
                continue;
            };
            let scheme = schemes.entry(uri.to_string()).or_default();
            if let Some(label) = row.value("label") {
                scheme.label = Some(label.to_string());
            }
            if let Some(label) = row.value("preflabel") {
                scheme.pref_label = Some(label.to_string());
            }
            if let Some(title) = row.value("title") {
                scheme.title = Some(title.to_string());
            }
            if let (Some(domain), Some(label)) = (row.iri("domain"), row.get("domainLabel")) {
                if lang_satisfies(label.language(), lang) {
                    scheme.subject = Some(SchemeSubject {
                        uri: domain.to_string(),
                        pref_label: label.value().to_string(),
                    });
                }
            }
        }
        schemes
    }

    /// One page of the change list in result order.
    pub fn change_list(&self, solutions: &Solutions) -> Vec<ChangedConcept> {
        solutions
            .iter()
            .filter_map(|row| {
                Some(ChangedConcept {
                    uri: row.iri("concept")?.to_string(),
                    pref_label: row.value("label").map(str::to_string),
                    date: row.non_empty("date").map(parse_change_date),
                })
            })
            .collect()
    }
}

/// Reads `xsd:date` (with or without a zone) and `xsd:dateTime` values.
/// Anything else is kept verbatim.
fn parse_change_date(raw: &str) -> ChangeDate {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return ChangeDate::Date(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return ChangeDate::Date(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return ChangeDate::Date(dt.date());
    }
    if let (Some(day), Some(zone)) = (raw.get(..10), raw.get(10..)) {
        let zoned = zone == "Z" || zone.starts_with(['+', '-']);
        if zoned {
            if let Ok(date) = NaiveDate::parse_from_str(day, "%Y-%m-%d") {
                return ChangeDate::Date(date);
            }
        }
    }
    ChangeDate::Raw(raw.to_string())
}
