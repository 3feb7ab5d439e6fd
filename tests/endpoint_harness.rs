#![allow(unused)]
//! HTTP endpoint integration harness.
//!
//! # What this covers
//!
//! - **Protocol**: queries are POSTed with `Content-Type:
//!   application/sparql-query`; SELECT asks for SPARQL JSON and CONSTRUCT
//!   for RDF/JSON.
//! - **Failures**: a slow store yields `Error::Timeout`, a non-2xx answer
//!   yields `Error::Status` with the store's message, and an unreachable
//!   store yields `Error::Transport`.
//! - **End to end**: a facade over the HTTP endpoint maps a real response.
//!
//! # What this does NOT cover
//!
//! - TLS handshakes against a real HTTPS store
//! - A real triple store
//!
//! # Running
//!
//! ```sh
//! cargo test --test endpoint_harness
//! ```

mod common;
use common::*;

use std::time::Duration;

use pretty_assertions::assert_eq;
use thesaur_core::{Dialect, Error, SparqlEndpoint, VocabularyQueries};
use thesaur_endpoint::HttpEndpoint;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn server() -> FakeSparqlEndpoint {
    FakeSparqlEndpoint::start().await.expect("fake endpoint starts")
}

// ---------------------------------------------------------------------------
// Protocol
// ---------------------------------------------------------------------------

#[tokio::test]
async fn select_posts_query_and_parses_json() {
    let server = server().await;
    server.answer_select(TRANSITIVE_BROADER_JSON).await;
    let endpoint = HttpEndpoint::new(&server.url("/sparql"), TIMEOUT).unwrap();

    let solutions = endpoint.select("SELECT * WHERE { ?s ?p ?o }").await.unwrap();
    assert_eq!(solutions.len(), 3);
    let first = solutions.iter().next().unwrap();
    assert_eq!(first.iri("object"), Some(TA116));

    let received = server.received().await;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].content_type.as_deref(), Some("application/sparql-query"));
    assert_eq!(received[0].accept.as_deref(), Some("application/sparql-results+json"));
    assert_eq!(received[0].body, "SELECT * WHERE { ?s ?p ?o }");
}

#[tokio::test]
async fn construct_asks_for_rdf_json() {
    let server = server().await;
    server.answer_construct(CONCEPT_INFO_RDF_JSON).await;
    let endpoint = HttpEndpoint::new(&server.url("/sparql"), TIMEOUT).unwrap();

    let graph = endpoint.construct("CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o }").await.unwrap();
    assert!(!graph.is_empty());
    assert!(graph.about(TA112).next().is_some());

    let received = server.received().await;
    assert_eq!(received[0].accept.as_deref(), Some("application/rdf+json"));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn slow_store_times_out() {
    let server = server().await;
    let timeout = Duration::from_millis(200);
    let endpoint = HttpEndpoint::new(&server.url("/slow"), timeout).unwrap();

    let err = endpoint.select("SELECT * WHERE { ?s ?p ?o }").await.unwrap_err();
    assert!(matches!(err, Error::Timeout(t) if t == timeout), "{err:?}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn error_status_keeps_store_message() {
    let server = server().await;
    let endpoint = HttpEndpoint::new(&server.url("/broken"), TIMEOUT).unwrap();

    let err = endpoint.select("SELECT").await.unwrap_err();
    match &err {
        Error::Status { status, body } => {
            assert_eq!(*status, 500);
            assert!(body.contains("Lexical error"), "{body}");
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert!(err.is_transient());
}

#[tokio::test]
async fn client_error_is_not_transient() {
    let server = server().await;
    let endpoint = HttpEndpoint::new(&server.url("/sparql"), TIMEOUT).unwrap();

    // Nothing canned: the fake store answers 400.
    let err = endpoint.select("SELECT").await.unwrap_err();
    assert!(matches!(err, Error::Status { status: 400, .. }), "{err:?}");
    assert!(!err.is_transient());
}

#[tokio::test]
async fn unreachable_store_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let endpoint = HttpEndpoint::new(&format!("http://127.0.0.1:{port}/sparql"), TIMEOUT).unwrap();

    let err = endpoint.select("SELECT").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn invalid_json_is_invalid_response() {
    let server = server().await;
    server.answer_select("<html>not json</html>").await;
    let endpoint = HttpEndpoint::new(&server.url("/sparql"), TIMEOUT).unwrap();

    let err = endpoint.select("SELECT").await.unwrap_err();
    assert!(matches!(err, Error::InvalidResponse(_)), "{err:?}");
}

#[test]
fn https_endpoint_is_accepted() {
    let endpoint = HttpEndpoint::new("https://store.example/sparql", TIMEOUT).unwrap();
    assert_eq!(endpoint.url().scheme_str(), Some("https"));
}

#[test]
fn other_schemes_are_rejected() {
    let err = HttpEndpoint::new("ftp://store.example/sparql", TIMEOUT).unwrap_err();
    assert!(err.to_string().contains("only http:// and https://"), "{err}");
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn facade_over_http() {
    let server = server().await;
    server.answer_select(TRANSITIVE_BROADER_JSON).await;
    let endpoint = HttpEndpoint::new(&server.url("/sparql"), TIMEOUT).unwrap();
    let queries = VocabularyQueries::new(test_vocabulary(), Dialect::default(), prefixes(), endpoint);

    let result = queries
        .transitive(TA116, &[], "en", 10, false)
        .await
        .unwrap()
        .found()
        .unwrap();
    assert_eq!(result.objects[TA1].label.as_deref(), Some("Fish"));

    let received = server.received().await;
    assert_query_contains!(received[0].body, "skos:broader* ?object");
    assert_balanced(&received[0].body);
}
