//! Static fixtures shared across harnesses.
//!
//! URIs follow the small fish thesaurus used throughout the test suite:
//! `ta1` (Fish) has the narrower concept `ta112` (Carp), which in turn has
//! `ta116` (Bass) and `ta117` (Crucian carp).

use thesaur_core::{GraphRef, GraphTarget, Vocabulary};

pub const ENDPOINT_URL: &str = "http://localhost:3030/ds/sparql";
pub const TEST_GRAPH: &str = "http://www.skosmos.skos/test/";
pub const TEST_NS: &str = "http://www.skosmos.skos/test/";
pub const GROUPS_GRAPH: &str = "http://www.skosmos.skos/groups/";
pub const GROUPS_NS: &str = "http://www.skosmos.skos/groups/";

pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

pub const TA1: &str = "http://www.skosmos.skos/test/ta1";
pub const TA112: &str = "http://www.skosmos.skos/test/ta112";
pub const TA116: &str = "http://www.skosmos.skos/test/ta116";
pub const TA117: &str = "http://www.skosmos.skos/test/ta117";
pub const MISSING: &str = "http://www.skosmos.skos/test/notfound";
pub const CONCEPT_SCHEME: &str = "http://www.skosmos.skos/test/conceptscheme";

/// The `test` vocabulary in its own named graph.
pub fn test_vocabulary() -> Vocabulary {
    Vocabulary::new(
        "test",
        GraphRef::new(ENDPOINT_URL, GraphTarget::Named(TEST_GRAPH.into())),
    )
    .with_uri_space(TEST_NS)
}

/// The `groups` vocabulary in its own named graph.
pub fn groups_vocabulary() -> Vocabulary {
    Vocabulary::new(
        "groups",
        GraphRef::new(ENDPOINT_URL, GraphTarget::Named(GROUPS_GRAPH.into())),
    )
    .with_uri_space(GROUPS_NS)
}

/// SPARQL JSON answer of a transitive broader lookup from `ta116`:
/// ta116 → ta112 → ta1.
pub const TRANSITIVE_BROADER_JSON: &str = r#"{
  "head": { "vars": ["object", "label", "fallback", "other", "direct"] },
  "results": { "bindings": [
    { "object": { "type": "uri", "value": "http://www.skosmos.skos/test/ta116" },
      "label": { "type": "literal", "value": "Bass", "xml:lang": "en" },
      "direct": { "type": "literal", "value": "" } },
    { "object": { "type": "uri", "value": "http://www.skosmos.skos/test/ta112" },
      "label": { "type": "literal", "value": "Carp", "xml:lang": "en" },
      "direct": { "type": "literal", "value": "http://www.skosmos.skos/test/ta116" } },
    { "object": { "type": "uri", "value": "http://www.skosmos.skos/test/ta1" },
      "label": { "type": "literal", "value": "Fish", "xml:lang": "en" },
      "direct": { "type": "literal", "value": "http://www.skosmos.skos/test/ta112" } }
  ] }
}"#;

/// SPARQL JSON answer of a search for `bass` with one matched alternate
/// label.
pub const SEARCH_BASS_JSON: &str = r#"{
  "head": { "vars": ["s", "label", "plabel", "alabel", "hlabel", "notation", "types"] },
  "results": { "bindings": [
    { "s": { "type": "uri", "value": "http://www.skosmos.skos/test/ta116" },
      "label": { "type": "literal", "value": "Bass", "xml:lang": "en" },
      "alabel": { "type": "literal", "value": "Basso", "xml:lang": "it" },
      "types": { "type": "literal", "value": "http://www.w3.org/2004/02/skos/core#Concept http://www.skosmos.skos/test-meta/TestClass" } }
  ] }
}"#;

/// SPARQL JSON answer with no solutions.
pub const EMPTY_SELECT_JSON: &str = r#"{ "head": { "vars": [] }, "results": { "bindings": [] } }"#;

/// RDF/JSON answer of a concept-info query for `ta112`.
pub const CONCEPT_INFO_RDF_JSON: &str = r#"{
  "http://www.skosmos.skos/test/ta112": {
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#type": [
      { "type": "uri", "value": "http://www.w3.org/2004/02/skos/core#Concept" }
    ],
    "http://www.w3.org/2004/02/skos/core#prefLabel": [
      { "type": "literal", "value": "Carp", "lang": "en" },
      { "type": "literal", "value": "Karppi", "lang": "fi" }
    ],
    "http://www.w3.org/2004/02/skos/core#broader": [
      { "type": "uri", "value": "http://www.skosmos.skos/test/ta1" }
    ]
  },
  "http://www.skosmos.skos/test/ta1": {
    "http://www.w3.org/2004/02/skos/core#prefLabel": [
      { "type": "literal", "value": "Fish", "lang": "en" }
    ]
  }
}"#;
