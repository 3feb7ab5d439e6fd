//! HTTP transport for SPARQL queries.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use hyper::{Request, Uri};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use thesaur_core::error::{Error, Result};
use thesaur_core::results::{parse_rdf_json, parse_sparql_json, RdfGraph, Solutions};
use thesaur_core::SparqlEndpoint;

const SPARQL_QUERY: &str = "application/sparql-query";
const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
const RDF_JSON: &str = "application/rdf+json";

/// Longest error body kept in [`Error::Status`].
const MAX_ERROR_BODY: usize = 1024;

/// A SPARQL endpoint reached over HTTP. Cheap to clone; clones share the
/// connection pool.
#[derive(Clone)]
pub struct HttpEndpoint {
    client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    url: Uri,
    timeout: Duration,
}

impl fmt::Debug for HttpEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpEndpoint")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpEndpoint {
    /// Create a client for `url`, which must be `http://` or `https://`.
    /// TLS uses rustls with the bundled webpki root certificates.
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let uri: Uri = url
            .parse()
            .map_err(|e| Error::Transport(format!("invalid endpoint URL {url:?}: {e}")))?;
        if !matches!(uri.scheme_str(), Some("http" | "https")) {
            return Err(Error::Transport(format!(
                "unsupported endpoint URL {url:?}: only http:// and https:// are supported"
            )));
        }
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())
            .map_err(|e| Error::Transport(format!("TLS setup failed: {e}")))?
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Ok(Self {
            client,
            url: uri,
            timeout,
        })
    }

    pub fn url(&self) -> &Uri {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST `query` and return the response body of a 2xx answer. The
    /// whole exchange, body included, runs under the configured timeout.
    async fn post(&self, query: &str, accept: &'static str) -> Result<Bytes> {
        let req = Request::post(self.url.clone())
            .header(CONTENT_TYPE, SPARQL_QUERY)
            .header(ACCEPT, accept)
            .header(USER_AGENT, concat!("thesaur/", env!("CARGO_PKG_VERSION")))
            .body(Full::new(Bytes::from(query.to_owned())))
            .map_err(|e| Error::Transport(e.to_string()))?;

        let exchange = async {
            let resp = self.client.request(req).await.map_err(map_network_error)?;
            let status = resp.status();
            let body = resp
                .into_body()
                .collect()
                .await
                .map_err(|e| Error::Transport(format!("reading response body: {e}")))?
                .to_bytes();
            if !status.is_success() {
                return Err(Error::Status {
                    status: status.as_u16(),
                    body: error_body(&body),
                });
            }
            Ok(body)
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(url = %self.url, timeout = ?self.timeout, "SPARQL request timed out");
                Err(Error::Timeout(self.timeout))
            }
        }
    }
}

impl SparqlEndpoint for HttpEndpoint {
    async fn select(&self, query: &str) -> Result<Solutions> {
        let body = self.post(query, SPARQL_RESULTS_JSON).await?;
        parse_sparql_json(&body)
    }

    async fn construct(&self, query: &str) -> Result<RdfGraph> {
        let body = self.post(query, RDF_JSON).await?;
        parse_rdf_json(&body)
    }
}

/// Map a connection-level failure to a transport error.
fn map_network_error(e: hyper_util::client::legacy::Error) -> Error {
    if e.is_connect() {
        Error::Transport(format!("connection failed: {e}"))
    } else {
        Error::Transport(e.to_string())
    }
}

fn error_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    match text.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn accepts_http_urls() {
        let ep = HttpEndpoint::new("http://localhost:3030/ds/sparql", Duration::from_secs(5)).unwrap();
        assert_eq!(ep.url().path(), "/ds/sparql");
        assert_eq!(ep.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn accepts_https_urls() {
        let ep = HttpEndpoint::new("https://example.org/sparql", Duration::from_secs(1)).unwrap();
        assert_eq!(ep.url().scheme_str(), Some("https"));
    }

    #[test]
    fn rejects_other_schemes() {
        let err = HttpEndpoint::new("ftp://example.org/sparql", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, Error::Transport(msg) if msg.contains("only http:// and https://")));
        assert!(HttpEndpoint::new("not a url", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn long_error_bodies_are_cut() {
        let body = "x".repeat(MAX_ERROR_BODY + 10);
        let cut = error_body(body.as_bytes());
        assert_eq!(cut.chars().count(), MAX_ERROR_BODY + 1);
        assert_eq!(error_body(b"short"), "short");
    }
}
