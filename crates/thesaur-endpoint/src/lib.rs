//! thesaur-endpoint: SPARQL 1.1 protocol client for thesaur.
//!
//! [`HttpEndpoint`] implements [`thesaur_core::SparqlEndpoint`] over HTTP or
//! HTTPS: queries are POSTed as `application/sparql-query`, SELECT results
//! are read as SPARQL JSON and CONSTRUCT results as RDF/JSON.

pub mod http;

pub use http::HttpEndpoint;
