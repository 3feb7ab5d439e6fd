use super::{generic_alphabetical_query, text_index_alphabetical_query, DialectStrategy};
use crate::escape::{self, LUCENE_RESERVED_WITH_SPACE};
use crate::types::{AlphabeticalRequest, GraphTarget, IndexLetter};

/// Graph that spans every named graph in a Jena dataset.
const UNION_GRAPH: &str = "urn:x-arq:UnionGraph";

/// Apache Jena with a `jena-text` Lucene index.
#[derive(Debug, Clone, Copy)]
pub struct JenaText {
    pub max_results: usize,
    /// Order labels with `arq:collation` in the request language.
    pub collation: bool,
}

impl Default for JenaText {
    fn default() -> Self {
        Self {
            max_results: super::DEFAULT_TEXT_INDEX_MAX_RESULTS,
            collation: false,
        }
    }
}

impl DialectStrategy for JenaText {
    fn name(&self) -> &'static str {
        "jena-text"
    }

    fn text_search_clause(
        &self,
        term: &str,
        property: &str,
        lang: Option<&str>,
        graph: &GraphTarget,
    ) -> Option<String> {
        let term = escape::escape_text_query(term, LUCENE_RESERVED_WITH_SPACE);
        let lang = match lang.map(escape::lang_tag).filter(|l| !l.is_empty()) {
            Some(l) => format!(" 'lang:{l}'"),
            None => String::new(),
        };
        let clause = format!(
            "(?s ?score ?match) text:query ({property} '{term}'{lang} {}) .",
            self.max_results
        );
        // the text index lives outside the named graphs
        Some(if graph.is_wildcard() {
            format!("GRAPH <{UNION_GRAPH}> {{ {clause} }}")
        } else {
            clause
        })
    }

    fn order_expression(&self, expr: &str, lang: &str) -> String {
        let lang = escape::lang_tag(lang);
        if self.collation && !lang.is_empty() {
            format!("arq:collation('{lang}', {expr})")
        } else {
            expr.to_string()
        }
    }

    fn alphabetical_query(&self, req: &AlphabeticalRequest, graph: &GraphTarget) -> String {
        match &req.letter {
            IndexLetter::Letter(l) => text_index_alphabetical_query(self, req, graph, l),
            _ => generic_alphabetical_query(self, req, graph),
        }
    }
}
