//! Shared test utilities for thesaur integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Harnesses that only compose queries use the builders
//! and assertions; harnesses that execute operations pair a
//! [`RecordingEndpoint`] (in-process) or a [`FakeSparqlEndpoint`] (real
//! HTTP) with a [`thesaur_core::VocabularyQueries`] facade.

pub mod assertions;
pub mod builders;
pub mod fake_sparql_endpoint;
pub mod fixtures;
pub mod recording_endpoint;

pub use assertions::*;
pub use builders::*;
pub use fake_sparql_endpoint::FakeSparqlEndpoint;
pub use fixtures::*;
pub use recording_endpoint::RecordingEndpoint;
