//! thesaur-core: query generation and result mapping for SKOS vocabularies
//! held in a SPARQL store.
//!
//! # Architecture
//!
//! ```text
//! SearchSpec ──► QueryBuilder ──► SparqlEndpoint ──► ResultMapper ──► records
//!                  │    │
//!                  │    └──► Dialect (text index, VALUES syntax, alphabetical index)
//!                  └──► GraphClauseResolver, escape, matching, PrefixTable
//! ```
//!
//! Nothing in this crate performs IO except through a [`SparqlEndpoint`]
//! implementation; [`VocabularyQueries`] ties the pieces together per
//! vocabulary.

pub mod config;
pub mod dialect;
pub mod endpoint;
pub mod error;
pub mod escape;
pub mod fragments;
pub mod graph;
pub mod mapper;
pub mod matching;
pub mod prefix;
pub mod queries;
pub mod query;
pub mod results;
pub mod types;

pub use config::Config;
pub use dialect::{Dialect, DialectStrategy};
pub use endpoint::SparqlEndpoint;
pub use error::{Error, Result};
pub use mapper::ResultMapper;
pub use prefix::PrefixTable;
pub use queries::{VocabularyQueries, VocabularySettings};
pub use query::QueryBuilder;
pub use results::{parse_rdf_json, parse_sparql_json, RdfGraph, RdfTerm, Row, Solutions};
pub use types::*;
