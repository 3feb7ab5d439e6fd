use super::{generic_alphabetical_query, text_index_alphabetical_query, DialectStrategy};
use crate::escape::{self, LUCENE_RESERVED};
use crate::types::{AlphabeticalRequest, GraphTarget, IndexLetter};

/// GraphDB with a Lucene connector instance named `skosmos`.
#[derive(Debug, Clone, Copy)]
pub struct GraphDbText {
    pub max_results: usize,
}

impl Default for GraphDbText {
    fn default() -> Self {
        Self {
            max_results: super::DEFAULT_TEXT_INDEX_MAX_RESULTS,
        }
    }
}

impl DialectStrategy for GraphDbText {
    fn name(&self) -> &'static str {
        "graphdb-text"
    }

    // The connector query cannot be restricted by language; the label
    // language filter of the surrounding query does that.
    fn text_search_clause(
        &self,
        term: &str,
        property: &str,
        _lang: Option<&str>,
        _graph: &GraphTarget,
    ) -> Option<String> {
        let term = escape::escape_text_query(term, LUCENE_RESERVED);
        Some(format!(
            "BIND(afn:localname({property}) AS ?field)
BIND(CONCAT(?field, ':', '\\\"{term}\\\"') AS ?query)
[] a con-inst:skosmos ;
   con:query ?query ;
   con:entities ?s ;
   con:limit {max} .
?s con:score ?score ;
   {property} ?match .",
            max = self.max_results
        ))
    }

    fn alphabetical_query(&self, req: &AlphabeticalRequest, graph: &GraphTarget) -> String {
        match &req.letter {
            IndexLetter::Letter(l) => text_index_alphabetical_query(self, req, graph, l),
            _ => generic_alphabetical_query(self, req, graph),
        }
    }
}
