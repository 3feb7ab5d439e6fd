//! In-process SPARQL endpoint for integration tests.
//!
//! Answers are queued per query form and handed out in order; once a queue
//! runs dry the endpoint answers with an empty result. Every query text is
//! recorded so tests can assert on what the facade actually sent.
//!
//! # Example
//!
//! ```rust,no_run
//! let endpoint = RecordingEndpoint::new();
//! endpoint.push_select_json(TRANSITIVE_BROADER_JSON);
//! let queries = VocabularyQueries::new(test_vocabulary(), Dialect::default(), prefixes(), &endpoint);
//! // ... run an operation, then inspect endpoint.queries()
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use thesaur_core::{
    parse_rdf_json, parse_sparql_json, Error, RdfGraph, Result, Solutions, SparqlEndpoint,
};

#[derive(Default)]
pub struct RecordingEndpoint {
    selects: Mutex<VecDeque<Result<Solutions>>>,
    graphs: Mutex<VecDeque<Result<RdfGraph>>>,
    queries: Mutex<Vec<String>>,
}

impl RecordingEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_select(&self, solutions: Solutions) {
        self.selects.lock().unwrap().push_back(Ok(solutions));
    }

    /// Queue a SELECT answer given as SPARQL JSON. Panics on malformed
    /// fixtures.
    pub fn push_select_json(&self, body: &str) {
        let solutions = parse_sparql_json(body.as_bytes()).expect("fixture is valid SPARQL JSON");
        self.push_select(solutions);
    }

    pub fn push_graph_json(&self, body: &str) {
        let graph = parse_rdf_json(body.as_bytes()).expect("fixture is valid RDF/JSON");
        self.graphs.lock().unwrap().push_back(Ok(graph));
    }

    pub fn push_select_error(&self, error: Error) {
        self.selects.lock().unwrap().push_back(Err(error));
    }

    /// All query texts received so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// The most recent query. Panics when nothing was sent.
    pub fn last_query(&self) -> String {
        self.queries
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no query was sent")
    }

    fn record(&self, query: &str) {
        self.queries.lock().unwrap().push(query.to_string());
    }
}

impl SparqlEndpoint for RecordingEndpoint {
    async fn select(&self, query: &str) -> Result<Solutions> {
        self.record(query);
        let next = self.selects.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(Solutions::new(Vec::new())))
    }

    async fn construct(&self, query: &str) -> Result<RdfGraph> {
        self.record(query);
        let next = self.graphs.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(RdfGraph::default()))
    }
}
