use super::QueryBuilder;
use crate::dialect::{DialectStrategy, ValueKind};
use crate::escape;
use crate::fragments::lang_matches;
use crate::types::Vocabulary;

/// Fixed page size of the change list.
pub const CHANGE_LIST_PAGE_SIZE: usize = 200;

const CONCEPT_INFO_TEMPLATE: &str = "?s ?p ?uri .
?sp ?uri ?op .
?uri ?p ?o .
?p rdfs:label ?proplabel .
?p rdfs:subPropertyOf ?pp .
?pp rdfs:label ?plabel .
?o a ?ot .
?o skos:prefLabel ?opl .
?o rdfs:label ?ol .
?o rdf:value ?ov .
?o skos:notation ?on .
?o ?oprop ?oval .
?o ?xlprop ?xlval .
?directgroup skos:member ?uri .
?parent skos:member ?group .
?group skos:prefLabel ?grouplabel .
?b1 rdf:first ?item .
?b1 rdf:rest ?b2 .
?item a ?it .
?item skos:prefLabel ?il .
?group a ?grouptype .";

const CONCEPT_INFO_PATTERN: &str = "{
  ?s ?p ?uri .
  FILTER(!isBlank(?s))
  FILTER(?p != skos:inScheme)
}
UNION
{ ?sp ?uri ?op . }
UNION
{
  ?directgroup skos:member ?uri .
  ?group skos:member+ ?uri .
  ?group skos:prefLabel ?grouplabel .
  ?group a ?grouptype .
  OPTIONAL { ?parent skos:member ?group }
}
UNION
{
  ?uri ?p ?o .
  OPTIONAL {
    ?o rdf:rest* ?b1 .
    ?b1 rdf:first ?item .
    ?b1 rdf:rest ?b2 .
    OPTIONAL { ?item a ?it . }
    OPTIONAL { ?item skos:prefLabel ?il . }
  }
  OPTIONAL {
    { ?p rdfs:label ?proplabel . }
    UNION
    { ?p rdfs:subPropertyOf ?pp . }
  }
  OPTIONAL {
    { ?o a ?ot . }
    UNION
    { ?o skos:prefLabel ?opl . }
    UNION
    { ?o rdfs:label ?ol . }
    UNION
    {
      ?o rdf:value ?ov .
      OPTIONAL { ?o ?oprop ?oval . }
    }
    UNION
    { ?o skos:notation ?on . }
    UNION
    {
      ?o a skosxl:Label .
      ?o ?xlprop ?xlval
    }
  }";

impl QueryBuilder {
    /// Everything needed to render the concepts `uris`: incoming links,
    /// outgoing statements with one level of annotation on properties and
    /// objects, RDF lists, and group membership.
    ///
    /// With an `array_class`, arrays whose members all sit directly under
    /// the concept are included so narrower concepts can be shown grouped
    /// by array. `vocabularies` restricts the graphs searched in federated
    /// mode.
    pub fn concept_info(
        &self,
        uris: &[String],
        array_class: Option<&str>,
        vocabularies: &[Vocabulary],
    ) -> String {
        let (array_template, array_pattern) = match array_class {
            Some(class) => {
                let class = self.prefixes.resource(class);
                (
                    format!("\n?x skos:member ?o .\n?x skos:prefLabel ?xl .\n?x a {class} ."),
                    format!(
                        "
  OPTIONAL {{
    ?x skos:member ?o .
    ?x a {class} .
    ?x skos:prefLabel ?xl .
    FILTER NOT EXISTS {{
      ?x skos:member ?other .
      MINUS {{ ?other skos:broader ?uri }}
    }}
  }}"
                    ),
                )
            }
            None => (String::new(), String::new()),
        };
        let candidates = self
            .resolver()
            .candidate_graphs_values(vocabularies, &self.dialect)
            .map(|v| format!("\n{v}"))
            .unwrap_or_default();
        self.finish(format!(
            "CONSTRUCT {{
{CONCEPT_INFO_TEMPLATE}{array_template}
}}
WHERE {{
{values}
{scoped}{candidates}
}}",
            values = self.dialect.values_clause("?uri", uris, ValueKind::Iri),
            scoped = self.scoped(&format!("{CONCEPT_INFO_PATTERN}{array_pattern}\n}}")),
        ))
    }

    /// Concept and collection classes, and their subclasses, that have
    /// labelled instances.
    pub fn types(&self, lang: &str) -> String {
        let body = format!(
            "{{
  {{ BIND(skos:Concept AS ?type) }}
  UNION
  {{ BIND(skos:Collection AS ?type) }}
  UNION
  {{ BIND(isothes:ConceptGroup AS ?type) }}
  UNION
  {{ BIND(isothes:ThesaurusArray AS ?type) }}
  UNION
  {{ ?type rdfs:subClassOf/rdfs:subClassOf* skos:Concept . }}
  UNION
  {{ ?type rdfs:subClassOf/rdfs:subClassOf* skos:Collection . }}
}}
OPTIONAL {{
  ?type rdfs:label ?label .
  FILTER({})
}}
OPTIONAL {{ ?type rdfs:subClassOf ?superclass . }}
FILTER EXISTS {{
  ?s a ?type .
  ?s skos:prefLabel ?prefLabel .
}}",
            lang_matches("?label", lang)
        );
        self.finish(format!(
            "SELECT DISTINCT ?type ?label ?superclass\nWHERE {{\n{}\n}}",
            self.scoped(&body)
        ))
    }

    /// Statements about one concept scheme, without its top concept list.
    pub fn concept_scheme(&self, scheme: &str) -> String {
        let scheme = escape::iri(scheme);
        let body = format!("{scheme} ?property ?value .\nFILTER(?property != skos:hasTopConcept)");
        self.finish(format!(
            "CONSTRUCT {{\n{scheme} ?property ?value .\n}}\nWHERE {{\n{}\n}}",
            self.scoped(&body)
        ))
    }

    /// Every concept scheme with its labels, title and subject.
    pub fn concept_schemes(&self, lang: &str) -> String {
        let body = format!(
            "?cs a skos:ConceptScheme .
OPTIONAL {{
  ?cs dc:subject ?domain .
  ?domain skos:prefLabel ?domainLabel .
  FILTER({domain})
}}
OPTIONAL {{
  ?cs rdfs:label ?label .
  FILTER({label})
}}
OPTIONAL {{
  ?cs skos:prefLabel ?preflabel .
  FILTER({pref})
}}
OPTIONAL {{
  {{ ?cs dc11:title ?title }}
  UNION
  {{ ?cs dc:title ?title }}
  FILTER({title})
}}",
            domain = lang_matches("?domainLabel", lang),
            label = lang_matches("?label", lang),
            pref = lang_matches("?preflabel", lang),
            title = lang_matches("?title", lang),
        );
        self.finish(format!(
            "SELECT ?cs ?label ?preflabel ?title ?domain ?domainLabel\nWHERE {{\n{}\n}}\nORDER BY ?cs",
            self.scoped(&body)
        ))
    }

    /// Concepts carrying the date property `prop`, newest first by year
    /// and month, one fixed-size page at `offset`.
    pub fn change_list(&self, lang: &str, offset: usize, prop: &str) -> String {
        let body = format!(
            "?concept a skos:Concept .
?concept {} ?date .
?concept skos:prefLabel ?label .
FILTER({})",
            self.prefixes.resource(prop),
            lang_matches("?label", lang)
        );
        self.finish(format!(
            "SELECT DISTINCT ?concept ?date ?label
WHERE {{
{}
}}
ORDER BY DESC(YEAR(?date)) DESC(MONTH(?date)) LCASE(?label){}",
            self.scoped(&body),
            self.dialect.limit_offset(Some(CHANGE_LIST_PAGE_SIZE), Some(offset)),
        ))
    }
}
