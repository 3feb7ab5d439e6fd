use super::QueryBuilder;
use crate::dialect::DialectStrategy;
use crate::escape;
use crate::fragments::lang_filter;

/// Label-bearing properties in priority order. A subject's label comes
/// from the first of these that has any value in the requested language.
pub const LABEL_PROPERTIES: [&str; 4] = ["skos:prefLabel", "rdfs:label", "dc:title", "dc11:title"];

/// Properties returned by the all-labels lookup.
const ALL_LABEL_PROPERTIES: [&str; 3] = ["skos:prefLabel", "skos:altLabel", "skos:hiddenLabel"];

impl QueryBuilder {
    /// Labels of `uri` with the priority of the property they came from.
    /// A row without `?label` means the subject exists but is unlabelled;
    /// no rows at all means it does not exist. An empty `lang` accepts
    /// every language.
    pub fn label(&self, uri: &str, lang: &str) -> String {
        let subject = escape::iri(uri);
        let rows: Vec<Vec<String>> = LABEL_PROPERTIES
            .iter()
            .enumerate()
            .map(|(i, p)| vec![p.to_string(), (i + 1).to_string()])
            .collect();
        let body = format!(
            "{subject} a ?type .
OPTIONAL {{
  {values}
  {subject} ?prop ?label .
  {filter}
}}",
            values = self.dialect.values_block(&["?prop", "?pri"], &rows),
            filter = lang_filter("?label", Some(lang)),
        );
        self.finish(format!(
            "SELECT DISTINCT ?label ?pri\nWHERE {{\n{}\n}}",
            self.scoped(&body)
        ))
    }

    /// Preferred, alternate and hidden labels of `uri` in `lang`.
    pub fn all_labels(&self, uri: &str, lang: &str) -> String {
        let subject = escape::iri(uri);
        let rows: Vec<Vec<String>> = ALL_LABEL_PROPERTIES
            .iter()
            .map(|p| vec![p.to_string()])
            .collect();
        let body = format!(
            "{subject} a ?type .
OPTIONAL {{
  {values}
  {subject} ?prop ?val .
  {filter}
}}",
            values = self.dialect.values_block(&["?prop"], &rows),
            filter = lang_filter("?val", Some(lang)),
        );
        self.finish(format!(
            "SELECT DISTINCT ?prop ?val\nWHERE {{\n{}\n}}",
            self.scoped(&body)
        ))
    }

    pub fn notation(&self, uri: &str) -> String {
        let body = format!("{} skos:notation ?notation .", escape::iri(uri));
        self.finish(format!(
            "SELECT ?notation\nWHERE {{\n{}\n}}",
            self.scoped(&body)
        ))
    }

    /// Direct `rdfs:subPropertyOf` values of the property `uri`.
    pub fn super_properties(&self, uri: &str) -> String {
        let body = format!("{} rdfs:subPropertyOf ?superProperty .", escape::iri(uri));
        self.finish(format!(
            "SELECT ?superProperty\nWHERE {{\n{}\n}}",
            self.scoped(&body)
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::query::test_support::*;
    use crate::types::GraphTarget;

    const TA1: &str = "http://www.skosmos.skos/test/ta1";

    #[test]
    fn label_query_lists_properties_by_priority() {
        let q = named().label(TA1, "en");
        assert!(q.contains(
            "VALUES (?prop ?pri) { (skos:prefLabel 1) (rdfs:label 2) (dc:title 3) (dc11:title 4) }"
        ));
        assert!(q.contains("<http://www.skosmos.skos/test/ta1> a ?type ."));
        assert!(q.contains("FILTER(langMatches(LANG(?label), 'en'))"));
        assert!(q.contains("PREFIX dc11: <http://purl.org/dc/elements/1.1/>"));
        assert_balanced(&q);
    }

    #[test]
    fn label_without_language_has_no_filter() {
        let q = named().label(TA1, "");
        assert!(!q.contains("langMatches"));
    }

    #[test]
    fn all_labels_query() {
        let q = builder(GraphTarget::Default).all_labels(TA1, "fi");
        assert!(q.contains("VALUES (?prop) { (skos:prefLabel) (skos:altLabel) (skos:hiddenLabel) }"));
        assert!(q.contains("FILTER(langMatches(LANG(?val), 'fi'))"));
        assert!(!q.contains("GRAPH"));
        assert_balanced(&q);
    }

    #[test]
    fn notation_and_super_properties() {
        let q = named().notation(TA1);
        assert!(q.contains("<http://www.skosmos.skos/test/ta1> skos:notation ?notation ."));
        let q = named().super_properties("http://example.com/myns#subProperty");
        assert!(q.contains("<http://example.com/myns#subProperty> rdfs:subPropertyOf ?superProperty ."));
        assert!(q.contains("PREFIX rdfs:"));
    }

    #[test]
    fn subject_uris_are_escaped() {
        for dialect in all_dialects() {
            let b = builder_with(GraphTarget::Wildcard, dialect);
            let nasty = "http://e.org/x> ?p ?o } #";
            for q in [
                b.label(nasty, "en') }"),
                b.all_labels(nasty, "en"),
                b.notation(nasty),
                b.super_properties(nasty),
            ] {
                assert!(q.contains("<http://e.org/x%3E%20?p%20?o%20%7D%20#>"), "{q}");
                assert_balanced(&q);
            }
        }
    }
}
