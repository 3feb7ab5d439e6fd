use super::QueryBuilder;
use crate::dialect::DialectStrategy;
use crate::fragments::lang_matches;
use crate::types::AlphabeticalRequest;

impl QueryBuilder {
    /// One page of the alphabetical index. The dialect decides whether a
    /// letter is answered through its text index or by a label scan.
    /// Classes and the qualifier reach the dialect as full IRIs.
    pub fn alphabetical(&self, req: &AlphabeticalRequest) -> String {
        let mut req = req.clone();
        req.classes = req.classes.iter().map(|c| self.prefixes.expand(c)).collect();
        req.qualifier = req.qualifier.as_deref().map(|q| self.prefixes.expand(q));
        self.finish(self.dialect.alphabetical_query(&req, &self.graph.graph))
    }

    /// Distinct upper-cased first characters of preferred labels in `lang`,
    /// for building the index navigation.
    pub fn first_characters(&self, lang: &str, classes: &[String]) -> String {
        let body = format!(
            "?s skos:prefLabel ?label .
?s a ?type .
FILTER({})",
            lang_matches("?label", lang)
        );
        self.finish(format!(
            "SELECT DISTINCT (UCASE(STR(SUBSTR(?label, 1, 1))) AS ?l)
WHERE {{
{}
{}
}}",
            self.class_values("?type", classes),
            self.scoped(&body),
        ))
    }
}
