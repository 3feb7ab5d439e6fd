//! Query composition.
//!
//! [`QueryBuilder`] turns high-level vocabulary operations into complete
//! SPARQL query text for one vocabulary's graph and dialect. Every method is
//! a pure function of its arguments and the builder's immutable settings;
//! the returned text carries its own `PREFIX` prologue.
//!
//! Caller-supplied URIs, terms, language tags and property names are only
//! ever substituted through [`crate::escape`].

use std::sync::Arc;

use crate::dialect::{Dialect, DialectStrategy, ValueKind};
use crate::graph::GraphClauseResolver;
use crate::prefix::PrefixTable;
use crate::types::GraphRef;

mod concept;
mod groups;
mod hierarchy;
mod index;
mod labels;
mod search;
mod stats;

pub use concept::CHANGE_LIST_PAGE_SIZE;
pub use labels::LABEL_PROPERTIES;
pub use search::{field_csv_var, PREF_LABELS_VAR};
pub use stats::LANG_COUNT_PROPERTIES;

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    graph: GraphRef,
    dialect: Dialect,
    prefixes: Arc<PrefixTable>,
}

impl QueryBuilder {
    pub fn new(graph: GraphRef, dialect: Dialect, prefixes: Arc<PrefixTable>) -> Self {
        Self {
            graph,
            dialect,
            prefixes,
        }
    }

    pub fn graph(&self) -> &GraphRef {
        &self.graph
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn prefixes(&self) -> &PrefixTable {
        &self.prefixes
    }

    fn resolver(&self) -> GraphClauseResolver<'_> {
        GraphClauseResolver::new(&self.graph.graph)
    }

    /// `body` scoped to the vocabulary graph.
    fn scoped(&self, body: &str) -> String {
        self.resolver().wrap(body)
    }

    /// Class list for a `?type` restriction; prefixed names are expanded so
    /// configured prefixes outside the prologue table still resolve.
    fn class_values(&self, var: &str, classes: &[String]) -> String {
        let classes: Vec<String> = if classes.is_empty() {
            vec![crate::prefix::SKOS_CONCEPT.to_string()]
        } else {
            classes.iter().map(|c| self.prefixes.expand(c)).collect()
        };
        self.dialect.values_clause(var, &classes, ValueKind::Iri)
    }

    /// Prepend the prologue for the prefixes `query` uses.
    fn finish(&self, query: String) -> String {
        self.prefixes.with_prologue(&query)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::dialect::{Bindings, GraphDbText, JenaText};
    use crate::types::GraphTarget;

    pub fn builder(graph: GraphTarget) -> QueryBuilder {
        builder_with(graph, Dialect::default())
    }

    pub fn builder_with(graph: GraphTarget, dialect: Dialect) -> QueryBuilder {
        QueryBuilder::new(
            GraphRef::new("http://localhost:3030/ds/sparql", graph),
            dialect,
            Arc::new(PrefixTable::builtin()),
        )
    }

    pub fn named() -> QueryBuilder {
        builder(GraphTarget::Named("http://www.skosmos.skos/test/".into()))
    }

    pub fn all_dialects() -> Vec<Dialect> {
        vec![
            Dialect::default(),
            Dialect::JenaText(JenaText::default()),
            Dialect::GraphDbText(GraphDbText::default()),
            Dialect::Bindings(Bindings),
        ]
    }

    /// Braces, brackets and parentheses outside literals and IRIs balance.
    pub fn assert_balanced(query: &str) {
        let mut depth: Vec<char> = Vec::new();
        let mut quote: Option<char> = None;
        let mut escaped = false;
        let mut in_iri = false;
        let chars: Vec<char> = query.chars().collect();
        for (i, &c) in chars.iter().enumerate() {
            if let Some(q) = quote {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            if in_iri {
                if c == '>' {
                    in_iri = false;
                }
                continue;
            }
            match c {
                '\'' | '"' => quote = Some(c),
                '<' if chars
                    .get(i + 1)
                    .is_some_and(|n| !n.is_whitespace() && *n != '=') =>
                {
                    in_iri = true
                }
                '{' | '(' | '[' => depth.push(c),
                '}' | ')' | ']' => {
                    let open = depth.pop().unwrap_or_else(|| panic!("unmatched {c} in\n{query}"));
                    let expected = match c {
                        '}' => '{',
                        ')' => '(',
                        _ => '[',
                    };
                    assert_eq!(open, expected, "mismatched {c} in\n{query}");
                }
                _ => {}
            }
        }
        assert!(quote.is_none(), "unterminated literal in\n{query}");
        assert!(!in_iri, "unterminated IRI in\n{query}");
        assert!(depth.is_empty(), "unclosed {depth:?} in\n{query}");
    }
}
