//! Core types for thesaur-core.
//!
//! Parameter objects handed to the query builder ([`GraphRef`],
//! [`Vocabulary`], [`SearchSpec`], [`AlphabeticalRequest`]) and the typed
//! records the result mapper produces from endpoint responses.

use serde::Serialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Graph scoping
// ---------------------------------------------------------------------------

/// Which graph of an endpoint a vocabulary lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphTarget {
    /// One fixed named graph.
    Named(String),
    /// Federated mode: the graph is left unbound and captured into `?graph`.
    Wildcard,
    /// The endpoint's default graph; no `GRAPH` pattern is emitted.
    Default,
}

impl GraphTarget {
    /// Parse the configuration form: `"?"` (or any `?var`) is the wildcard,
    /// an empty string is the default graph, anything else a named graph.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => GraphTarget::Default,
            Some(g) if g.starts_with('?') => GraphTarget::Wildcard,
            Some(g) => GraphTarget::Named(g.to_string()),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, GraphTarget::Wildcard)
    }

    pub fn named(&self) -> Option<&str> {
        match self {
            GraphTarget::Named(g) => Some(g),
            _ => None,
        }
    }
}

/// Endpoint URL plus graph target. Immutable per vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GraphRef {
    pub endpoint: String,
    pub graph: GraphTarget,
}

impl GraphRef {
    pub fn new(endpoint: impl Into<String>, graph: GraphTarget) -> Self {
        Self {
            endpoint: endpoint.into(),
            graph,
        }
    }
}

/// A configured vocabulary as seen by the query engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    pub id: String,
    pub graph: GraphRef,
    /// Namespace shared by the vocabulary's concept URIs, used to derive
    /// local names.
    pub uri_space: Option<String>,
    pub search_by_notation: bool,
}

impl Vocabulary {
    pub fn new(id: impl Into<String>, graph: GraphRef) -> Self {
        Self {
            id: id.into(),
            graph,
            uri_space: None,
            search_by_notation: false,
        }
    }

    pub fn with_uri_space(mut self, uri_space: impl Into<String>) -> Self {
        self.uri_space = Some(uri_space.into());
        self
    }

    /// Strip the vocabulary's URI space from `uri`. Returns `uri` unchanged
    /// when it does not live in this vocabulary's namespace.
    pub fn local_name<'a>(&self, uri: &'a str) -> &'a str {
        match &self.uri_space {
            Some(space) if !space.is_empty() => uri.strip_prefix(space.as_str()).unwrap_or(uri),
            _ => uri,
        }
    }
}

// ---------------------------------------------------------------------------
// Search parameters
// ---------------------------------------------------------------------------

/// Parameters of one concept search. Built per request, consumed once.
#[derive(Debug, Clone, Default)]
pub struct SearchSpec {
    pub term: String,
    /// Vocabularies being searched. In federated mode these become the
    /// candidate graphs of the membership restriction.
    pub vocabularies: Vec<Vocabulary>,
    /// Language of the labels to return.
    pub lang: String,
    /// Language the matched label must have; `None` matches any language.
    pub search_lang: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    /// Class URIs or prefixed names; OR'd. Empty means `skos:Concept`.
    pub types: Vec<String>,
    pub parent: Option<String>,
    pub group: Option<String>,
    /// Concept scheme URIs; OR'd.
    pub schemes: Vec<String>,
    pub include_hidden: bool,
    pub include_deprecated: bool,
    /// Collapse hits to one best match per concept.
    pub unique: bool,
    /// Extra SKOS properties (local names such as `broader`) to bundle into
    /// each hit. `prefLabel` returns every preferred label by language.
    pub extra_fields: Vec<String>,
}

impl SearchSpec {
    pub fn new(term: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            lang: lang.into(),
            include_hidden: true,
            ..Default::default()
        }
    }
}

/// Term-matching class derived from the position of `*` wildcards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MatchType {
    Exact,
    Prefix,
    Suffix,
    Regex,
}

// ---------------------------------------------------------------------------
// Alphabetical index
// ---------------------------------------------------------------------------

/// Selector of one page of the alphabetical index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexLetter {
    /// `*`: every label.
    All,
    /// `0-9`: labels starting with a numeric character.
    Digits,
    /// `!*`: labels starting with neither a letter nor a number.
    Other,
    Letter(String),
}

impl IndexLetter {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "*" => IndexLetter::All,
            "0-9" => IndexLetter::Digits,
            "!*" => IndexLetter::Other,
            other => IndexLetter::Letter(other.to_string()),
        }
    }

    /// True for the three classes a text index cannot answer.
    pub fn is_special(&self) -> bool {
        !matches!(self, IndexLetter::Letter(_))
    }
}

#[derive(Debug, Clone)]
pub struct AlphabeticalRequest {
    pub letter: IndexLetter,
    pub lang: String,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    /// Class URIs; empty means `skos:Concept`.
    pub classes: Vec<String>,
    pub include_deprecated: bool,
    /// Property whose value disambiguates entries sharing a label.
    pub qualifier: Option<String>,
}

impl AlphabeticalRequest {
    pub fn new(letter: IndexLetter, lang: impl Into<String>) -> Self {
        Self {
            letter,
            lang: lang.into(),
            limit: None,
            offset: None,
            classes: Vec::new(),
            include_deprecated: false,
            qualifier: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tri-state lookup result
// ---------------------------------------------------------------------------

/// Result of a lookup keyed by one subject URI.
///
/// `Absent` means the subject does not exist at all; `Empty` means it exists
/// but has none of the requested values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum Lookup<T> {
    Absent,
    Empty,
    Found(T),
}

impl<T> Lookup<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Lookup::Empty)
    }

    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_found(&self) -> Option<&T> {
        match self {
            Lookup::Found(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Absent => Lookup::Absent,
            Lookup::Empty => Lookup::Empty,
            Lookup::Found(v) => Lookup::Found(f(v)),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A language-tagged literal value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// One value of a bundled extra field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Resource {
        uri: String,
        #[serde(rename = "prefLabel", skip_serializing_if = "Option::is_none")]
        pref_label: Option<String>,
    },
    Literal(String),
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConceptHit {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_uri: Option<String>,
    /// Id of the vocabulary the hit belongs to, or the configured unknown
    /// marker when it cannot be determined.
    pub vocab: String,
    #[serde(rename = "type")]
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_pref_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_label: Option<String>,
    /// Extra fields keyed by `skos:<field>`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", flatten)]
    pub fields: BTreeMap<String, Vec<FieldValue>>,
    /// Every preferred label keyed by language, when requested.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub pref_labels: BTreeMap<String, String>,
}

impl ConceptHit {
    /// The `broader` extra field, if it was requested.
    pub fn broader(&self) -> &[FieldValue] {
        self.fields
            .get("skos:broader")
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// One entry of the alphabetical index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlphabeticalEntry {
    pub uri: String,
    pub localname: String,
    pub pref_label: String,
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
}

/// Value of a single-hop or transitive property lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct PropertyValue {
    pub label: Option<String>,
    /// Transitive lookups only: neighbours of this object along the same
    /// relation, one hop closer to the origin.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub direct: Vec<String>,
}

/// Object URI → value.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// Transitive lookup output with its truncation flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct TransitiveResult {
    pub objects: PropertyMap,
    /// Set when more objects were reachable than the caller's limit.
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildConcept {
    pub uri: String,
    pub pref_label: Option<String>,
    pub has_children: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopConcept {
    pub uri: String,
    pub top_concept_of: String,
    pub label: String,
    pub has_children: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notation: Option<String>,
}

/// A narrower sibling listed under a hierarchy node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyChild {
    pub uri: String,
    pub label: Option<String>,
    pub has_children: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notation: Option<String>,
}

/// One ancestor (or the origin itself) in a parent-chain lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notation: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub broader: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub narrower: Vec<HierarchyChild>,
    /// Schemes this node is a top concept of, sorted.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tops: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptGroup {
    pub uri: String,
    pub pref_label: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub child_groups: Vec<String>,
    pub has_members: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub uri: String,
    pub is_super: bool,
    pub has_members: bool,
    #[serde(rename = "type")]
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub type_uri: String,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// language → property (prefixed) → label count.
pub type LangCounts = BTreeMap<String, BTreeMap<String, u64>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct TypeInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SchemeSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<SchemeSubject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeSubject {
    pub uri: String,
    pub pref_label: String,
}

/// Date of a change-list entry. Values that are not valid `xsd:date` or
/// `xsd:dateTime` are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChangeDate {
    Date(chrono::NaiveDate),
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedConcept {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<ChangeDate>,
}

/// A concept described by a concept-info CONSTRUCT query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptRecord {
    pub uri: String,
    pub vocab: String,
    #[serde(rename = "type")]
    pub types: Vec<String>,
    pub pref_labels: Vec<Label>,
    /// Outgoing statements keyed by shortened property name.
    pub properties: BTreeMap<String, Vec<crate::results::RdfTerm>>,
    /// URIs of groups the concept is a direct member of.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
}
