use super::QueryBuilder;
use crate::dialect::DialectStrategy;
use crate::escape;

/// Label properties counted per language by the vocabulary statistics.
pub const LANG_COUNT_PROPERTIES: [&str; 3] = ["skos:prefLabel", "skos:altLabel", "skos:hiddenLabel"];

impl QueryBuilder {
    /// Number of resources per concept or collection class, including
    /// subclasses of the configured array and group classes.
    pub fn count_concepts(&self, array_class: Option<&str>, group_class: Option<&str>) -> String {
        let extra: String = [array_class, group_class]
            .into_iter()
            .flatten()
            .map(|c| format!(" UNION {{ ?type rdfs:subClassOf* {} }}", self.prefixes.resource(c)))
            .collect();
        let body = format!(
            "{{
  ?conc a ?type .
  {{ ?type rdfs:subClassOf* skos:Concept . }} UNION {{ ?type rdfs:subClassOf* skos:Collection . }}{extra}
}}
OPTIONAL {{ ?type rdfs:label ?typelabel . }}"
        );
        self.finish(format!(
            "SELECT (COUNT(?conc) AS ?c) ?type ?typelabel\nWHERE {{\n{}\n}}\nGROUP BY ?type ?typelabel",
            self.scoped(&body)
        ))
    }

    /// Label counts per language and label property over instances of
    /// `classes`.
    pub fn count_lang_concepts(&self, langs: &[String], classes: &[String]) -> String {
        let props: Vec<Vec<String>> = LANG_COUNT_PROPERTIES
            .iter()
            .map(|p| vec![p.to_string()])
            .collect();
        let lang_filter = if langs.is_empty() {
            String::new()
        } else {
            let quoted: Vec<String> = langs.iter().map(|l| escape::quoted(&escape::lang_tag(l))).collect();
            format!("\nFILTER(?lang IN ({}))", quoted.join(", "))
        };
        let body = format!(
            "{types}
{props}
?conc a ?type .
?conc ?prop ?label .
BIND(LANG(?label) AS ?lang){lang_filter}",
            types = self.class_values("?type", classes),
            props = self.dialect.values_block(&["?prop"], &props),
        );
        self.finish(format!(
            "SELECT ?lang ?prop (COUNT(?label) AS ?count)\nWHERE {{\n{}\n}}\nGROUP BY ?lang ?prop ?type",
            self.scoped(&body)
        ))
    }
}
