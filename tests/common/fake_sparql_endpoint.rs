//! Fake SPARQL protocol server for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves:
//! - `POST /sparql`: answers with the canned body for the query form
//!   (`application/sparql-results+json` for SELECT, `application/rdf+json`
//!   for CONSTRUCT), after checking the request headers
//! - `POST /slow`: never answers within any reasonable timeout
//! - `POST /broken`: answers 500 with a plain-text body
//!
//! # Example
//!
//! ```rust,ignore
//! # tokio_test::block_on(async {
//! let server = FakeSparqlEndpoint::start().await.unwrap();
//! server.answer_select(TRANSITIVE_BROADER_JSON).await;
//! let endpoint = HttpEndpoint::new(&server.url("/sparql"), Duration::from_secs(2)).unwrap();
//! # });
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A request as the server saw it.
#[derive(Debug, Clone)]
pub struct ReceivedQuery {
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub body: String,
}

/// State shared between the router and test code.
#[derive(Default)]
struct EndpointState {
    select_body: Option<String>,
    construct_body: Option<String>,
    received: Vec<ReceivedQuery>,
}

/// Handle to the running fake endpoint.
pub struct FakeSparqlEndpoint {
    addr: SocketAddr,
    state: Arc<Mutex<EndpointState>>,
}

impl FakeSparqlEndpoint {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(EndpointState::default()));

        let app = Router::new()
            .route("/sparql", post(answer))
            .route("/slow", post(stall))
            .route("/broken", post(fail))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the task a moment to register.
        tokio::time::sleep(Duration::from_millis(5)).await;

        Ok(Self { addr, state })
    }

    /// Base URL (e.g. `http://127.0.0.1:PORT`).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Body returned for SELECT queries.
    pub async fn answer_select(&self, body: &str) {
        self.state.lock().await.select_body = Some(body.to_string());
    }

    /// Body returned for CONSTRUCT queries.
    pub async fn answer_construct(&self, body: &str) {
        self.state.lock().await.construct_body = Some(body.to_string());
    }

    pub async fn received(&self) -> Vec<ReceivedQuery> {
        self.state.lock().await.received.clone()
    }
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn answer(
    State(state): State<Arc<Mutex<EndpointState>>>,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let content_type = header_value(&headers, header::CONTENT_TYPE);
    let accept = header_value(&headers, header::ACCEPT);
    let mut state = state.lock().await;
    state.received.push(ReceivedQuery {
        content_type: content_type.clone(),
        accept: accept.clone(),
        body: body.clone(),
    });

    if content_type.as_deref() != Some("application/sparql-query") {
        return (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            [(header::CONTENT_TYPE, "text/plain")],
            "expected application/sparql-query".to_string(),
        );
    }

    let accept = accept.unwrap_or_default();
    let (mime, canned) = if accept.contains("application/rdf+json") {
        ("application/rdf+json", state.construct_body.clone())
    } else {
        (
            "application/sparql-results+json",
            state.select_body.clone(),
        )
    };
    match canned {
        Some(body) => (StatusCode::OK, [(header::CONTENT_TYPE, mime)], body),
        None => (
            StatusCode::BAD_REQUEST,
            [(header::CONTENT_TYPE, "text/plain")],
            "no canned answer for this query form".to_string(),
        ),
    }
}

async fn stall() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_secs(30)).await;
    StatusCode::OK
}

async fn fail() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Error 500: Lexical error at line 1, column 7",
    )
}
