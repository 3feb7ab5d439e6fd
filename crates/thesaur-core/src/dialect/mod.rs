//! Backend dialects.
//!
//! A dialect supplies the query fragments that differ between triple stores:
//! the full-text search clause, the list-membership clause syntax, result
//! paging and the alphabetical index query. The concrete variant is chosen
//! once per vocabulary when configuration is loaded and never per query.
//!
//! Every method has a generic default; variants override only what their
//! backend does differently.

use std::fmt;

use crate::escape;
use crate::fragments::{self, lang_matches};
use crate::matching::classify;
use crate::types::{AlphabeticalRequest, GraphTarget, IndexLetter};
use crate::graph::GraphClauseResolver;

mod bindings;
mod generic;
mod graphdb_text;
mod jena_text;

pub use bindings::Bindings;
pub use generic::Generic;
pub use graphdb_text::GraphDbText;
pub use jena_text::JenaText;

/// Default number of hits requested from a text index. Text indexes
/// truncate silently, so this is the effective ceiling on "all matches".
pub const DEFAULT_TEXT_INDEX_MAX_RESULTS: usize = 100_000;

/// Quoting style of a list-membership clause entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Full IRI, rendered `<...>`.
    Iri,
    /// Plain string literal.
    Literal,
}

impl ValueKind {
    pub fn render(self, value: &str) -> String {
        match self {
            ValueKind::Iri => escape::iri(value),
            ValueKind::Literal => escape::quoted(value),
        }
    }
}

// ---------------------------------------------------------------------------
// Strategy trait
// ---------------------------------------------------------------------------

pub trait DialectStrategy: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Full-text search clause binding `?s` and `?match` for `term` on
    /// `property` (a prefixed name or a variable such as `?prop`). `None`
    /// when the backend has no text index and the match filter alone is
    /// applied to a scan.
    fn text_search_clause(
        &self,
        _term: &str,
        _property: &str,
        _lang: Option<&str>,
        _graph: &GraphTarget,
    ) -> Option<String> {
        None
    }

    /// Multi-variable membership clause over pre-rendered rows.
    fn values_block(&self, vars: &[&str], rows: &[Vec<String>]) -> String {
        format!("VALUES ({}) {{ {} }}", vars.join(" "), render_rows(rows))
    }

    /// Single-variable membership clause; `kind` selects quoting.
    fn values_clause(&self, var: &str, values: &[String], kind: ValueKind) -> String {
        let rows: Vec<Vec<String>> = values.iter().map(|v| vec![kind.render(v)]).collect();
        self.values_block(&[var], &rows)
    }

    fn limit_offset(&self, limit: Option<usize>, offset: Option<usize>) -> String {
        fragments::limit_offset(limit, offset)
    }

    /// Ordering expression for a label sort key.
    fn order_expression(&self, expr: &str, _lang: &str) -> String {
        expr.to_string()
    }

    /// Tie-break applied to search results after label and language.
    fn search_tiebreak(&self) -> Option<&'static str> {
        Some("STR(?s)")
    }

    fn alphabetical_query(&self, req: &AlphabeticalRequest, graph: &GraphTarget) -> String {
        generic_alphabetical_query(self, req, graph)
    }
}

fn render_rows(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|r| format!("({})", r.join(" ")))
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Dialect selection
// ---------------------------------------------------------------------------

/// The closed set of supported dialects.
#[derive(Debug, Clone)]
pub enum Dialect {
    Generic(Generic),
    JenaText(JenaText),
    GraphDbText(GraphDbText),
    Bindings(Bindings),
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::Generic(Generic)
    }
}

impl Dialect {
    /// Resolve a configured dialect name. `max_results` bounds text-index
    /// hits and `collation` enables locale-aware ordering where supported.
    pub fn parse(name: &str, max_results: usize, collation: bool) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "generic" => Some(Dialect::Generic(Generic)),
            "jena-text" | "jenatext" => Some(Dialect::JenaText(JenaText {
                max_results,
                collation,
            })),
            "graphdb-text" | "graphdbtext" => {
                Some(Dialect::GraphDbText(GraphDbText { max_results }))
            }
            "bindings" | "bigdata" => Some(Dialect::Bindings(Bindings)),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn DialectStrategy {
        match self {
            Dialect::Generic(d) => d,
            Dialect::JenaText(d) => d,
            Dialect::GraphDbText(d) => d,
            Dialect::Bindings(d) => d,
        }
    }
}

impl DialectStrategy for Dialect {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn text_search_clause(
        &self,
        term: &str,
        property: &str,
        lang: Option<&str>,
        graph: &GraphTarget,
    ) -> Option<String> {
        self.inner().text_search_clause(term, property, lang, graph)
    }

    fn values_block(&self, vars: &[&str], rows: &[Vec<String>]) -> String {
        self.inner().values_block(vars, rows)
    }

    fn values_clause(&self, var: &str, values: &[String], kind: ValueKind) -> String {
        self.inner().values_clause(var, values, kind)
    }

    fn limit_offset(&self, limit: Option<usize>, offset: Option<usize>) -> String {
        self.inner().limit_offset(limit, offset)
    }

    fn order_expression(&self, expr: &str, lang: &str) -> String {
        self.inner().order_expression(expr, lang)
    }

    fn search_tiebreak(&self) -> Option<&'static str> {
        self.inner().search_tiebreak()
    }

    fn alphabetical_query(&self, req: &AlphabeticalRequest, graph: &GraphTarget) -> String {
        self.inner().alphabetical_query(req, graph)
    }
}

// ---------------------------------------------------------------------------
// Alphabetical index
// ---------------------------------------------------------------------------

/// Anchored pattern for one of the special index classes. The three
/// non-`All` patterns partition every non-empty label by its first
/// character.
pub fn special_class_pattern(letter: &IndexLetter) -> Option<&'static str> {
    match letter {
        IndexLetter::All => None,
        IndexLetter::Digits => Some(r"^\p{N}"),
        IndexLetter::Other => Some(r"^[^\p{L}\p{N}]"),
        IndexLetter::Letter(_) => None,
    }
}

/// Condition selecting labels bound to `var` that belong under `letter`.
fn letter_condition(letter: &IndexLetter, var: &str) -> Option<String> {
    match letter {
        IndexLetter::All => None,
        IndexLetter::Letter(l) => Some(format!(
            "STRSTARTS(LCASE(STR({var})), {})",
            escape::quoted_lowercase(l)
        )),
        special => special_class_pattern(special)
            .map(|p| format!("REGEX(STR({var}), {}, 'i')", escape::quoted(p))),
    }
}

fn class_values(dialect: &(impl DialectStrategy + ?Sized), classes: &[String]) -> String {
    let classes = if classes.is_empty() {
        vec![crate::prefix::SKOS_CONCEPT.to_string()]
    } else {
        classes.to_vec()
    };
    dialect.values_clause("?type", &classes, ValueKind::Iri)
}

fn qualifier_parts(req: &AlphabeticalRequest) -> (&'static str, String, &'static str) {
    match &req.qualifier {
        Some(q) => (
            " ?qualifier",
            format!("OPTIONAL {{ ?s {} ?qualifier }}", escape::iri(q)),
            " LCASE(STR(?qualifier))",
        ),
        None => ("", String::new(), ""),
    }
}

/// Regex/`STRSTARTS` based index query usable on any SPARQL 1.1 store.
pub fn generic_alphabetical_query(
    dialect: &(impl DialectStrategy + ?Sized),
    req: &AlphabeticalRequest,
    graph: &GraphTarget,
) -> String {
    let resolver = GraphClauseResolver::new(graph);
    let lang_cond = |var: &str| lang_matches(var, &req.lang);
    let filter = |var: &str| match letter_condition(&req.letter, var) {
        Some(cond) => format!("FILTER({cond} && {})", lang_cond(var)),
        None => format!("FILTER({})", lang_cond(var)),
    };
    let (qualifier_var, qualifier_clause, qualifier_order) = qualifier_parts(req);
    let deprecated = if req.include_deprecated {
        String::new()
    } else {
        fragments::not_deprecated("?s")
    };
    let body = format!(
        "{{
  ?s skos:prefLabel ?label .
  {pref_filter}
}}
UNION
{{
  {{
    ?s skos:altLabel ?alabel .
    {alt_filter}
  }}
  {{
    ?s skos:prefLabel ?label .
    FILTER({label_lang})
  }}
}}
?s a ?type .
{qualifier_clause}
{deprecated}",
        pref_filter = filter("?label"),
        alt_filter = filter("?alabel"),
        label_lang = lang_cond("?label"),
    );
    let order = dialect.order_expression("LCASE(STR(COALESCE(?alabel, ?label)))", &req.lang);
    format!(
        "SELECT DISTINCT ?s ?label ?alabel{qualifier_var}\nWHERE {{\n{values}\n{scoped}\n}}\nORDER BY {order} STR(?s){qualifier_order}{paging}",
        values = class_values(dialect, &req.classes),
        scoped = resolver.wrap(&body),
        paging = dialect.limit_offset(req.limit, req.offset),
    )
}

/// Index query that narrows candidates through the backend's text index.
/// Only valid for [`IndexLetter::Letter`]; the special classes cannot be
/// expressed as a text-index prefix query.
pub fn text_index_alphabetical_query(
    dialect: &(impl DialectStrategy + ?Sized),
    req: &AlphabeticalRequest,
    graph: &GraphTarget,
    letter: &str,
) -> String {
    let resolver = GraphClauseResolver::new(graph);
    let prefix_term = format!("{letter}*");
    let pref = dialect
        .text_search_clause(&prefix_term, "skos:prefLabel", Some(&req.lang), graph)
        .unwrap_or_default();
    let alt = dialect
        .text_search_clause(&prefix_term, "skos:altLabel", Some(&req.lang), graph)
        .unwrap_or_default();
    let starts = classify(&prefix_term).filter("?match");
    let (qualifier_var, qualifier_clause, qualifier_order) = qualifier_parts(req);
    let deprecated = if req.include_deprecated {
        String::new()
    } else {
        fragments::not_deprecated("?s")
    };
    let body = format!(
        "{{
  {pref}
  FILTER({starts})
  FILTER EXISTS {{ ?s skos:prefLabel ?match }}
  BIND(?match AS ?label)
}}
UNION
{{
  {alt}
  FILTER({starts})
  FILTER EXISTS {{ ?s skos:altLabel ?match }}
  BIND(?match AS ?alabel)
  {{
    ?s skos:prefLabel ?label .
    FILTER({label_lang})
  }}
}}
?s a ?type .
{qualifier_clause}
{deprecated}",
        label_lang = lang_matches("?label", &req.lang),
    );
    let order = dialect.order_expression("LCASE(STR(?match))", &req.lang);
    format!(
        "SELECT DISTINCT ?s ?label ?alabel{qualifier_var}\nWHERE {{\n{values}\n{scoped}\n}}\nORDER BY {order} STR(?s){qualifier_order}{paging}",
        values = class_values(dialect, &req.classes),
        scoped = resolver.wrap(&body),
        paging = dialect.limit_offset(req.limit, req.offset),
    )
}
