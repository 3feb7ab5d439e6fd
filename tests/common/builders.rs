//! Test builders: ergonomic constructors for result rows, search specs and
//! query builders.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use std::sync::Arc;

use thesaur_core::{
    Dialect, GraphRef, GraphTarget, PrefixTable, QueryBuilder, RdfTerm, ResultMapper, Row,
    SearchSpec, Solutions, Vocabulary,
};

use super::fixtures::{test_vocabulary, ENDPOINT_URL, TEST_GRAPH, XSD_BOOLEAN};

// ---------------------------------------------------------------------------
// Terms and rows
// ---------------------------------------------------------------------------

pub fn iri(v: &str) -> RdfTerm {
    RdfTerm::Iri(v.to_string())
}

pub fn lit(v: &str) -> RdfTerm {
    RdfTerm::literal(v, None)
}

pub fn lang_lit(v: &str, lang: &str) -> RdfTerm {
    RdfTerm::literal(v, Some(lang))
}

pub fn boolean(v: bool) -> RdfTerm {
    RdfTerm::Literal {
        value: v.to_string(),
        datatype: Some(XSD_BOOLEAN.to_string()),
        language: None,
    }
}

/// Fluent builder for [`Solutions`] fixtures.
///
/// # Example
///
/// ```rust
/// let solutions = SolutionsBuilder::new()
///     .row(|r| r.with("s", iri(TA1)).with("label", lang_lit("Fish", "en")))
///     .build();
/// ```
#[derive(Default)]
pub struct SolutionsBuilder {
    rows: Vec<Row>,
}

impl SolutionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, f: impl FnOnce(Row) -> Row) -> Self {
        self.rows.push(f(Row::new()));
        self
    }

    /// A row with no bindings, as emitted by some stores for aggregates
    /// over an empty group.
    pub fn empty_row(mut self) -> Self {
        self.rows.push(Row::new());
        self
    }

    pub fn build(self) -> Solutions {
        Solutions::new(self.rows)
    }
}

// ---------------------------------------------------------------------------
// Query builders
// ---------------------------------------------------------------------------

pub fn prefixes() -> Arc<PrefixTable> {
    Arc::new(PrefixTable::builtin())
}

pub fn mapper() -> ResultMapper {
    ResultMapper::new(prefixes())
}

/// Builder for the `test` vocabulary graph with the given dialect.
pub fn builder_for(dialect: Dialect) -> QueryBuilder {
    QueryBuilder::new(test_vocabulary().graph, dialect, prefixes())
}

pub fn builder_on(graph: GraphTarget, dialect: Dialect) -> QueryBuilder {
    QueryBuilder::new(GraphRef::new(ENDPOINT_URL, graph), dialect, prefixes())
}

pub fn test_builder() -> QueryBuilder {
    builder_for(Dialect::default())
}

pub fn federated_builder(dialect: Dialect) -> QueryBuilder {
    builder_on(GraphTarget::Wildcard, dialect)
}

pub fn named_graph() -> GraphTarget {
    GraphTarget::Named(TEST_GRAPH.into())
}

/// Fluent builder for [`SearchSpec`].
///
/// # Example
///
/// ```rust
/// let spec = SearchSpecBuilder::new("bass*").lang("en").vocab(test_vocabulary()).build();
/// ```
pub struct SearchSpecBuilder {
    spec: SearchSpec,
}

impl SearchSpecBuilder {
    pub fn new(term: &str) -> Self {
        Self {
            spec: SearchSpec::new(term, "en"),
        }
    }

    pub fn lang(mut self, lang: &str) -> Self {
        self.spec.lang = lang.to_string();
        self
    }

    pub fn search_lang(mut self, lang: &str) -> Self {
        self.spec.search_lang = Some(lang.to_string());
        self
    }

    pub fn vocab(mut self, vocab: Vocabulary) -> Self {
        self.spec.vocabularies.push(vocab);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.spec.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.spec.offset = Some(offset);
        self
    }

    pub fn of_type(mut self, class: &str) -> Self {
        self.spec.types.push(class.to_string());
        self
    }

    pub fn parent(mut self, uri: &str) -> Self {
        self.spec.parent = Some(uri.to_string());
        self
    }

    pub fn group(mut self, uri: &str) -> Self {
        self.spec.group = Some(uri.to_string());
        self
    }

    pub fn without_hidden(mut self) -> Self {
        self.spec.include_hidden = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.spec.unique = true;
        self
    }

    pub fn field(mut self, field: &str) -> Self {
        self.spec.extra_fields.push(field.to_string());
        self
    }

    pub fn build(self) -> SearchSpec {
        self.spec
    }
}
