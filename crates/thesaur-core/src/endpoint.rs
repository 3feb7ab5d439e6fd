//! The seam between query composition and query execution.
//!
//! A [`SparqlEndpoint`] runs one query against a remote store and returns
//! the parsed response. Implementations own the transport and the per-call
//! timeout; dropping the returned future must abort the request.

use std::future::Future;
use std::sync::Arc;

use crate::error::Result;
use crate::results::{RdfGraph, Solutions};

pub trait SparqlEndpoint: Send + Sync {
    /// Run a SELECT query.
    fn select(&self, query: &str) -> impl Future<Output = Result<Solutions>> + Send;

    /// Run a CONSTRUCT query.
    fn construct(&self, query: &str) -> impl Future<Output = Result<RdfGraph>> + Send;
}

impl<T: SparqlEndpoint> SparqlEndpoint for Arc<T> {
    fn select(&self, query: &str) -> impl Future<Output = Result<Solutions>> + Send {
        (**self).select(query)
    }

    fn construct(&self, query: &str) -> impl Future<Output = Result<RdfGraph>> + Send {
        (**self).construct(query)
    }
}

impl<T: SparqlEndpoint> SparqlEndpoint for &T {
    fn select(&self, query: &str) -> impl Future<Output = Result<Solutions>> + Send {
        (**self).select(query)
    }

    fn construct(&self, query: &str) -> impl Future<Output = Result<RdfGraph>> + Send {
        (**self).construct(query)
    }
}
