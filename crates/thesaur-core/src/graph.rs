//! Graph scoping of generated queries.
//!
//! A vocabulary either lives in one named graph, in the endpoint's default
//! graph, or (federated mode) in whichever graph a pattern happens to match,
//! in which case the graph is captured into `?graph` so each hit can be
//! traced back to its vocabulary.

use crate::dialect::{DialectStrategy, ValueKind};
use crate::escape;
use crate::types::{GraphTarget, Vocabulary};

/// Variable that receives the matching graph in federated mode.
pub const GRAPH_VAR: &str = "?graph";

#[derive(Debug, Clone, Copy)]
pub struct GraphClauseResolver<'a> {
    target: &'a GraphTarget,
}

impl<'a> GraphClauseResolver<'a> {
    pub fn new(target: &'a GraphTarget) -> Self {
        Self { target }
    }

    pub fn is_federated(&self) -> bool {
        self.target.is_wildcard()
    }

    /// Opening of the graph pattern, up to and including the brace. Empty
    /// for the default graph.
    pub fn open(&self) -> String {
        match self.target {
            GraphTarget::Named(g) => format!("GRAPH {} {{", escape::iri(g)),
            GraphTarget::Wildcard => format!("GRAPH {GRAPH_VAR} {{"),
            GraphTarget::Default => String::new(),
        }
    }

    /// Closing brace matching [`open`](Self::open).
    pub fn close(&self) -> &'static str {
        match self.target {
            GraphTarget::Default => "",
            _ => "}",
        }
    }

    /// `body` scoped to the target graph.
    pub fn wrap(&self, body: &str) -> String {
        match self.target {
            GraphTarget::Default => body.to_string(),
            _ => format!("{}\n{body}\n{}", self.open(), self.close()),
        }
    }

    /// Membership restriction of `?graph` to the named graphs of
    /// `candidates`. Only emitted in federated mode and only when at least
    /// one candidate has a named graph; `None` otherwise.
    pub fn candidate_graphs_values(
        &self,
        candidates: &[Vocabulary],
        dialect: &(impl DialectStrategy + ?Sized),
    ) -> Option<String> {
        if !self.is_federated() {
            return None;
        }
        let mut graphs: Vec<String> = Vec::new();
        for vocab in candidates {
            if let Some(g) = vocab.graph.graph.named() {
                if !graphs.iter().any(|seen| seen == g) {
                    graphs.push(g.to_string());
                }
            }
        }
        if graphs.is_empty() {
            return None;
        }
        Some(dialect.values_clause(GRAPH_VAR, &graphs, ValueKind::Iri))
    }

    /// Extra `ORDER BY` key that keeps federated results stable across
    /// graphs.
    pub fn order_key(&self) -> Option<&'static str> {
        self.is_federated().then_some(GRAPH_VAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Generic;
    use crate::types::GraphRef;

    fn vocab(id: &str, graph: &str) -> Vocabulary {
        Vocabulary::new(id, GraphRef::new("http://e", GraphTarget::parse(Some(graph))))
    }

    #[test]
    fn named_graph_is_scoped_literally() {
        let target = GraphTarget::Named("http://e.org/g".into());
        let r = GraphClauseResolver::new(&target);
        assert_eq!(r.wrap("?s ?p ?o ."), "GRAPH <http://e.org/g> {\n?s ?p ?o .\n}");
    }

    #[test]
    fn default_graph_adds_nothing() {
        let target = GraphTarget::Default;
        let r = GraphClauseResolver::new(&target);
        assert_eq!(r.wrap("?s ?p ?o ."), "?s ?p ?o .");
        assert_eq!(r.open(), "");
        assert_eq!(r.close(), "");
    }

    #[test]
    fn named_graph_never_gets_candidate_values() {
        let target = GraphTarget::Named("http://e.org/g".into());
        let r = GraphClauseResolver::new(&target);
        let candidates = [vocab("a", "http://e.org/a")];
        assert!(r.candidate_graphs_values(&candidates, &Generic).is_none());
    }

    #[test]
    fn wildcard_restricts_to_distinct_named_candidates() {
        let target = GraphTarget::Wildcard;
        let r = GraphClauseResolver::new(&target);
        assert!(r.wrap("?s ?p ?o .").starts_with("GRAPH ?graph {"));
        let candidates = [
            vocab("a", "http://e.org/a"),
            vocab("b", "http://e.org/b"),
            vocab("a2", "http://e.org/a"),
            vocab("d", ""),
        ];
        let values = r.candidate_graphs_values(&candidates, &Generic).unwrap();
        assert_eq!(values, "VALUES (?graph) { (<http://e.org/a>) (<http://e.org/b>) }");
        assert!(r.candidate_graphs_values(&[], &Generic).is_none());
    }
}
