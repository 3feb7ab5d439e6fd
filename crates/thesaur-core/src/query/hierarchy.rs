use super::QueryBuilder;
use crate::dialect::{DialectStrategy, ValueKind};
use crate::escape;
use crate::fragments::{lang_matches, pref_label_with_fallback, property_path};

impl QueryBuilder {
    /// Objects of `uri prop ?object` with one label each. Labels in `lang`
    /// win over untagged ones; `any_lang` adds a last resort in any
    /// language. `?object` is unbound when the subject exists but has no
    /// such property.
    pub fn property(&self, uri: &str, prop: &str, lang: &str, any_lang: bool) -> String {
        let subject = escape::iri(uri);
        let any = if any_lang {
            "\n  OPTIONAL { ?object skos:prefLabel ?label . }"
        } else {
            ""
        };
        let body = format!(
            "{subject} a skos:Concept .
OPTIONAL {{
  {subject} {prop} ?object .
  OPTIONAL {{ ?object skos:prefLabel ?label . FILTER({in_lang}) }}
  OPTIONAL {{ ?object skos:prefLabel ?label . FILTER(LANG(?label) = '') }}{any}
}}",
            prop = self.prefixes.resource(prop),
            in_lang = lang_matches("?label", lang),
        );
        self.finish(format!(
            "SELECT ?object ?label\nWHERE {{\n{}\n}}",
            self.scoped(&body)
        ))
    }

    /// Reflexive-transitive closure of `props` from `uri`. Each reached
    /// object carries, in `?direct`, the members of the closure that point
    /// at it directly, i.e. its neighbours one hop closer to `uri`.
    ///
    /// The path operator itself is unbounded; `limit` only caps the
    /// materialized objects. One row beyond the limit is requested so the
    /// caller can tell that the result was truncated.
    pub fn transitive(
        &self,
        uri: &str,
        props: &[String],
        lang: &str,
        fallback: Option<&str>,
        limit: usize,
        any_lang: bool,
    ) -> String {
        let subject = escape::iri(uri);
        let path = property_path(&self.prefixes, props);
        let mut labels = format!(
            "OPTIONAL {{ ?object skos:prefLabel ?lab . FILTER({}) }}",
            lang_matches("?lab", lang)
        );
        if let Some(fb) = fallback.filter(|f| !f.is_empty()) {
            labels.push_str(&format!(
                "\nOPTIONAL {{ ?object skos:prefLabel ?flab . FILTER({}) }}",
                lang_matches("?flab", fb)
            ));
        }
        if any_lang {
            labels.push_str("\nOPTIONAL { ?object skos:prefLabel ?olab . }");
        }
        let body = format!(
            "{subject} a skos:Concept .
OPTIONAL {{
  {subject} {path}* ?object .
  OPTIONAL {{
    ?dir {path} ?object .
    {subject} {path}* ?dir .
  }}
}}
{labels}"
        );
        self.finish(format!(
            "SELECT ?object (SAMPLE(?lab) AS ?label) (SAMPLE(?flab) AS ?fallback) (SAMPLE(?olab) AS ?other) (GROUP_CONCAT(DISTINCT STR(?dir); separator=' ') AS ?direct)
WHERE {{
{}
}}
GROUP BY ?object
LIMIT {}",
            self.scoped(&body),
            limit.saturating_add(1),
        ))
    }

    /// Immediate children of `uri` along the inverse of `props`, each
    /// with an existence check for grandchildren.
    pub fn children(&self, uri: &str, lang: &str, fallback: Option<&str>, props: &[String]) -> String {
        let subject = escape::iri(uri);
        let path = property_path(&self.prefixes, props);
        let body = format!(
            "{subject} a skos:Concept .
OPTIONAL {{
  ?child {path} {subject} .
  {labels}
  OPTIONAL {{ ?child skos:notation ?notation . }}
  BIND(EXISTS {{ ?a {path} ?child . }} AS ?grandchildren)
}}",
            labels = pref_label_with_fallback("?child", "?label", lang, fallback),
        );
        self.finish(format!(
            "SELECT ?child ?label ?grandchildren ?notation\nWHERE {{\n{}\n}}",
            self.scoped(&body)
        ))
    }

    /// Top concepts of the given concept schemes.
    pub fn top_concepts(&self, schemes: &[String], lang: &str, fallback: Option<&str>) -> String {
        let body = format!(
            "?top skos:topConceptOf ?topuri .
{labels}
OPTIONAL {{ ?top skos:notation ?notation . }}
BIND(EXISTS {{ ?top skos:narrower ?a . }} AS ?children)
{values}",
            labels = pref_label_with_fallback("?top", "?label", lang, fallback),
            values = self.dialect.values_clause("?topuri", schemes, ValueKind::Iri),
        );
        self.finish(format!(
            "SELECT DISTINCT ?top ?topuri ?label ?notation ?children\nWHERE {{\n{}\n}}",
            self.scoped(&body)
        ))
    }

    /// Every ancestor of `uri` (and `uri` itself) with its label, its own
    /// parents, the schemes it tops and its children with grandchildren
    /// flags, so a whole breadcrumb tree comes back in one round trip.
    pub fn parent_list(&self, uri: &str, lang: &str, fallback: Option<&str>, props: &[String]) -> String {
        let subject = escape::iri(uri);
        let path = property_path(&self.prefixes, props);
        let body = format!(
            "{subject} a skos:Concept .
OPTIONAL {{
  {subject} {path}* ?broad .
  {broad_labels}
  OPTIONAL {{ ?broad skos:notation ?nota . }}
  OPTIONAL {{ ?broad {path} ?parent . }}
  OPTIONAL {{
    ?children {path} ?broad .
    {child_labels}
    OPTIONAL {{ ?children skos:notation ?childnota . }}
  }}
  BIND(EXISTS {{ ?a {path} ?children . }} AS ?grandchildren)
  OPTIONAL {{ ?broad skos:topConceptOf ?topcs . }}
}}",
            broad_labels = pref_label_with_fallback("?broad", "?lab", lang, fallback),
            child_labels = pref_label_with_fallback("?children", "?childlab", lang, fallback),
        );
        self.finish(format!(
            "SELECT ?broad ?parent ?children ?grandchildren (SAMPLE(?lab) AS ?label) (SAMPLE(?childlab) AS ?childlabel) (GROUP_CONCAT(DISTINCT STR(?topcs); separator=' ') AS ?tops) (SAMPLE(?nota) AS ?notation) (SAMPLE(?childnota) AS ?childnotation)
WHERE {{
{}
}}
GROUP BY ?broad ?parent ?children ?grandchildren",
            self.scoped(&body)
        ))
    }
}
