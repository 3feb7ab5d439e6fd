use super::QueryBuilder;
use crate::escape;
use crate::fragments::{lang_matches, not_deprecated};

impl QueryBuilder {
    /// Every instance of `group_class` with its label in `lang`, nested
    /// groups and whether it has members.
    pub fn groups(&self, group_class: &str, lang: &str) -> String {
        let class = self.prefixes.resource(group_class);
        let body = format!(
            "?group a {class} .
OPTIONAL {{
  ?group skos:member|isothes:subGroup ?child .
  ?child a {class} .
}}
BIND(EXISTS {{ ?group skos:member ?submembers }} AS ?members)
OPTIONAL {{ ?group skos:prefLabel ?label }}
OPTIONAL {{ ?group rdfs:label ?label }}
FILTER({})
OPTIONAL {{ ?group skos:notation ?notation }}",
            lang_matches("?label", lang)
        );
        self.finish(format!(
            "SELECT ?group (GROUP_CONCAT(DISTINCT STR(?child); separator=' ') AS ?children) ?label ?members ?notation
WHERE {{
{}
}}
GROUP BY ?group ?label ?members ?notation
ORDER BY LCASE(?label)",
            self.scoped(&body)
        ))
    }

    /// Members of `group`, direct or through `isothes:superGroup`, one row
    /// per member and type.
    pub fn group_contents(
        &self,
        group_class: &str,
        group: &str,
        lang: &str,
        include_deprecated: bool,
    ) -> String {
        let group = escape::iri(group);
        let deprecated = if include_deprecated {
            String::new()
        } else {
            format!("\n{}", not_deprecated("?conc"))
        };
        let body = format!(
            "{group} a {class} .
{{ {group} skos:member ?conc . }} UNION {{ ?conc isothes:superGroup {group} }}{deprecated}
?conc a ?type .
OPTIONAL {{ ?conc skos:prefLabel ?label . FILTER({in_lang}) }}
OPTIONAL {{ ?conc skos:prefLabel ?label . }}
OPTIONAL {{ ?conc skos:notation ?notation }}
BIND(EXISTS {{ ?submembers isothes:superGroup ?conc }} AS ?super)
BIND(EXISTS {{ ?conc skos:member ?submembers }} AS ?members)",
            class = self.prefixes.resource(group_class),
            in_lang = lang_matches("?label", lang),
        );
        self.finish(format!(
            "SELECT ?conc ?super ?label ?members ?type ?notation\nWHERE {{\n{}\n}}\nORDER BY LCASE(?label)",
            self.scoped(&body)
        ))
    }
}
