//! Endpoint response model.
//!
//! SELECT responses arrive as SPARQL 1.1 Query Results JSON and are parsed
//! into [`Solutions`]; CONSTRUCT responses arrive as RDF/JSON and are parsed
//! into an [`RdfGraph`]. Both parsers are format-only: they know nothing about
//! SKOS.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Label;

// ---------------------------------------------------------------------------
// Terms
// ---------------------------------------------------------------------------

/// A single RDF term in a result binding or graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum RdfTerm {
    Iri(String),
    #[serde(rename = "bnode")]
    BlankNode(String),
    Literal {
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        datatype: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
}

impl RdfTerm {
    pub fn literal(value: impl Into<String>, language: Option<&str>) -> Self {
        RdfTerm::Literal {
            value: value.into(),
            datatype: None,
            language: language.map(str::to_string),
        }
    }

    /// Lexical form: the IRI, blank node label or literal value.
    pub fn value(&self) -> &str {
        match self {
            RdfTerm::Iri(v) | RdfTerm::BlankNode(v) => v,
            RdfTerm::Literal { value, .. } => value,
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            RdfTerm::Iri(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, RdfTerm::Literal { .. })
    }

    /// Language tag of a literal; `None` for untagged literals and
    /// non-literals.
    pub fn language(&self) -> Option<&str> {
        match self {
            RdfTerm::Literal {
                language: Some(l), ..
            } if !l.is_empty() => Some(l),
            _ => None,
        }
    }

    /// Boolean reading of an `xsd:boolean` result (`true`/`1`).
    pub fn as_bool(&self) -> bool {
        matches!(self.value(), "true" | "1")
    }

    pub fn to_label(&self) -> Label {
        Label {
            value: self.value().to_string(),
            lang: self.language().map(str::to_string),
        }
    }
}

// ---------------------------------------------------------------------------
// SELECT results
// ---------------------------------------------------------------------------

/// One solution of a SELECT query. Unbound variables are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    bindings: HashMap<String, RdfTerm>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, var: impl Into<String>, term: RdfTerm) -> Self {
        self.bindings.insert(var.into(), term);
        self
    }

    pub fn get(&self, var: &str) -> Option<&RdfTerm> {
        self.bindings.get(var)
    }

    pub fn is_bound(&self, var: &str) -> bool {
        self.bindings.contains_key(var)
    }

    /// Lexical value of `var`, whatever its term kind.
    pub fn value(&self, var: &str) -> Option<&str> {
        self.get(var).map(RdfTerm::value)
    }

    /// Lexical value of `var`, treating an empty string as unbound. Some
    /// stores bind aggregates over empty groups to `""`.
    pub fn non_empty(&self, var: &str) -> Option<&str> {
        self.value(var).filter(|v| !v.is_empty())
    }

    pub fn iri(&self, var: &str) -> Option<&str> {
        self.get(var).and_then(RdfTerm::as_iri)
    }

    pub fn lang(&self, var: &str) -> Option<&str> {
        self.get(var).and_then(RdfTerm::language)
    }

    pub fn flag(&self, var: &str) -> bool {
        self.get(var).is_some_and(RdfTerm::as_bool)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Variable names plus the solution sequence of a SELECT query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solutions {
    pub variables: Vec<String>,
    pub rows: Vec<Row>,
}

impl Solutions {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            variables: Vec::new(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a Solutions {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[derive(Deserialize)]
struct SrjDocument {
    head: SrjHead,
    results: Option<SrjResults>,
}

#[derive(Deserialize)]
struct SrjHead {
    #[serde(default)]
    vars: Vec<String>,
}

#[derive(Deserialize)]
struct SrjResults {
    bindings: Vec<HashMap<String, JsonTerm>>,
}

/// Term object shared by SPARQL JSON results and RDF/JSON.
#[derive(Deserialize)]
struct JsonTerm {
    #[serde(rename = "type")]
    kind: String,
    value: String,
    #[serde(default)]
    datatype: Option<String>,
    #[serde(default, rename = "xml:lang")]
    xml_lang: Option<String>,
    #[serde(default)]
    lang: Option<String>,
}

impl JsonTerm {
    fn into_term(self) -> Result<RdfTerm> {
        match self.kind.as_str() {
            "uri" => Ok(RdfTerm::Iri(self.value)),
            "bnode" => Ok(RdfTerm::BlankNode(self.value)),
            "literal" | "typed-literal" => Ok(RdfTerm::Literal {
                value: self.value,
                datatype: self.datatype,
                language: self.xml_lang.or(self.lang),
            }),
            other => Err(Error::InvalidResponse(format!("unknown term type {other:?}"))),
        }
    }
}

/// Parse a SPARQL 1.1 Query Results JSON document.
pub fn parse_sparql_json(body: &[u8]) -> Result<Solutions> {
    let doc: SrjDocument = serde_json::from_slice(body)?;
    let results = doc
        .results
        .ok_or_else(|| Error::InvalidResponse("missing 'results' in SELECT response".into()))?;

    let rows = results
        .bindings
        .into_iter()
        .map(|binding| {
            let bindings = binding
                .into_iter()
                .map(|(var, term)| term.into_term().map(|t| (var, t)))
                .collect::<Result<HashMap<_, _>>>()?;
            Ok(Row { bindings })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Solutions {
        variables: doc.head.vars,
        rows,
    })
}

// ---------------------------------------------------------------------------
// CONSTRUCT results
// ---------------------------------------------------------------------------

/// An RDF triple in a CONSTRUCT result graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Triple {
    pub subject: RdfTerm,
    pub predicate: String,
    pub object: RdfTerm,
}

/// A CONSTRUCT result graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RdfGraph {
    pub triples: Vec<Triple>,
}

impl RdfGraph {
    pub fn new(triples: Vec<Triple>) -> Self {
        Self { triples }
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Statements whose subject is the IRI `subject`.
    pub fn about<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples
            .iter()
            .filter(move |t| t.subject.as_iri() == Some(subject))
    }

    /// Objects of `subject predicate ?o`.
    pub fn objects<'a>(
        &'a self,
        subject: &'a str,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a RdfTerm> + 'a {
        self.about(subject)
            .filter(move |t| t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// IRI subjects of `?s predicate <object>`.
    pub fn subjects<'a>(
        &'a self,
        predicate: &'a str,
        object: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.triples
            .iter()
            .filter(move |t| t.predicate == predicate && t.object.as_iri() == Some(object))
            .filter_map(|t| t.subject.as_iri())
    }
}

/// Parse an RDF/JSON document (`{ subject: { predicate: [object, ...] } }`).
/// Subjects written as `_:label` are blank nodes.
pub fn parse_rdf_json(body: &[u8]) -> Result<RdfGraph> {
    let doc: HashMap<String, HashMap<String, Vec<JsonTerm>>> = serde_json::from_slice(body)?;
    let mut triples = Vec::new();
    for (subject, predicates) in doc {
        let subject = match subject.strip_prefix("_:") {
            Some(label) => RdfTerm::BlankNode(label.to_string()),
            None => RdfTerm::Iri(subject),
        };
        for (predicate, objects) in predicates {
            for object in objects {
                triples.push(Triple {
                    subject: subject.clone(),
                    predicate: predicate.clone(),
                    object: object.into_term()?,
                });
            }
        }
    }
    Ok(RdfGraph { triples })
}
