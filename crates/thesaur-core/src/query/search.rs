use super::QueryBuilder;
use crate::dialect::DialectStrategy;
use crate::escape;
use crate::fragments::{self, lang_matches};
use crate::matching::{classify, TermMatch};
use crate::types::SearchSpec;

/// Variable carrying every preferred label of a hit as CSV lines.
pub const PREF_LABELS_VAR: &str = "preflabels";

/// Result variable carrying the CSV aggregate of extra field `field`.
pub fn field_csv_var(field: &str) -> String {
    format!("fld_{}_csv", escape::variable_name(field))
}

fn field_var(field: &str) -> String {
    format!("?fld_{}", escape::variable_name(field))
}

impl QueryBuilder {
    /// Concept search.
    ///
    /// The inner query finds one row per matched literal and subject and
    /// packs the match into a sortable `?hit` string: property priority
    /// digit, language tag, `@`, literal. The outer query unpacks it into
    /// `?match` and the matched-label variables, applies the structural
    /// restrictions and folds extra fields into aggregates.
    pub fn search(&self, spec: &SearchSpec) -> String {
        let matcher = classify(&spec.term);
        let list_all = matcher.term.is_empty() || matcher.matches_everything();
        let federated = self.resolver().is_federated();
        let graph_var = if federated { " ?graph" } else { "" };

        let inner = if list_all {
            self.search_all_inner(spec, graph_var)
        } else {
            self.search_inner(spec, &matcher, graph_var)
        };
        let label_priority = if list_all { "" } else { LABEL_PRIORITY };

        let (extra_vars, extra_patterns) = extra_fields(spec);
        let types = self.type_restriction(&spec.types);
        let mut structural = String::new();
        if let Some(parent) = &spec.parent {
            structural.push_str(&format!("?s skos:broader+ {} .\n", escape::iri(parent)));
        }
        if let Some(group) = &spec.group {
            structural.push_str(&format!("{} skos:member ?s .\n", escape::iri(group)));
        }
        let schemes = scheme_restriction(&spec.schemes);
        let deprecated = if spec.include_deprecated {
            String::new()
        } else {
            fragments::not_deprecated("?s")
        };
        let outer = self.scoped(&format!(
            "{types}
{{
{structural}?s a ?type .
{extra_patterns}{schemes}
}}
{deprecated}"
        ));

        let mut order = vec![
            self.dialect
                .order_expression("LCASE(STR(?match))", &spec.lang),
            "LANG(?match)".to_string(),
        ];
        if let Some(key) = self.resolver().order_key() {
            order.push(key.to_string());
        }
        if let Some(tiebreak) = self.dialect.search_tiebreak() {
            order.push(tiebreak.to_string());
        }

        self.finish(format!(
            "SELECT DISTINCT ?s ?label ?plabel ?alabel ?hlabel ?notation{graph_var} (GROUP_CONCAT(DISTINCT STR(?type); separator=' ') AS ?types){extra_vars}
WHERE {{
{{
{inner}
}}
{label_priority}{outer}
}}
GROUP BY ?s ?match ?label ?plabel ?alabel ?hlabel ?notation{graph_var}
ORDER BY {order}{paging}",
            order = order.join(" "),
            paging = self.dialect.limit_offset(spec.limit, spec.offset),
        ))
    }

    /// Inner query for a real search term.
    fn search_inner(&self, spec: &SearchSpec, matcher: &TermMatch, graph_var: &str) -> String {
        let mut props: Vec<Vec<String>> = vec![
            vec!["skos:prefLabel".into(), "1".into()],
            vec!["skos:altLabel".into(), "3".into()],
        ];
        if spec.include_hidden {
            props.push(vec!["skos:hiddenLabel".into(), "5".into()]);
        }
        if spec.vocabularies.iter().any(|v| v.search_by_notation) {
            props.push(vec!["skos:notation".into(), "7".into()]);
        }
        let props = self.dialect.values_block(&["?prop", "?pri"], &props);

        let search_lang = spec.search_lang.as_deref().filter(|l| !l.is_empty());
        let text = self
            .dialect
            .text_search_clause(&matcher.index_term(), "?prop", search_lang, &self.graph.graph)
            .map(|c| format!("{c}\n"))
            .unwrap_or_default();
        let mut cond = matcher.filter("?match");
        if let Some(sl) = search_lang {
            cond.push_str(&format!(" && {}", lang_matches("?match", sl)));
        }

        let label_cond = if spec.lang.is_empty() {
            "LANG(?match) = '' || langMatches(LANG(?label), LANG(?match))".to_string()
        } else {
            lang_matches("?label", &spec.lang)
        };
        // without a display-language label fall back to the matched language
        let label_fallback = if search_lang != Some(spec.lang.as_str()) {
            "\nOPTIONAL { ?s skos:prefLabel ?label . FILTER(langMatches(LANG(?label), LANG(?match))) }"
        } else {
            ""
        };
        let guard = matcher
            .duplicate_guard("?match", "?label", search_lang)
            .map(|g| format!("\n{g}"))
            .unwrap_or_default();

        let body = format!(
            "{{
{props}
{text}?s ?prop ?match .
FILTER({cond})
}}
OPTIONAL {{ ?s skos:prefLabel ?label . FILTER({label_cond}) }}{label_fallback}{guard}
BIND(IF({match_lang}, ?pri, ?pri + 1) AS ?npri)
BIND(CONCAT(STR(?npri), LANG(?match), '@', STR(?match)) AS ?matchstr)
OPTIONAL {{ ?s skos:notation ?notation }}",
            match_lang = lang_matches("?match", &spec.lang),
        );

        let (hit, group) = if spec.unique {
            (
                "(MIN(?matchstr) AS ?hit)",
                format!("\nGROUP BY ?s ?label ?notation{graph_var}"),
            )
        } else {
            ("(?matchstr AS ?hit)", String::new())
        };
        format!(
            "SELECT DISTINCT ?s ?label ?notation{graph_var} {hit}
WHERE {{
{scoped}{candidates}
}}{group}",
            scoped = self.scoped(&body),
            candidates = self.candidate_values(spec),
        )
    }

    /// Inner query listing every concept when the term matches everything.
    fn search_all_inner(&self, spec: &SearchSpec, graph_var: &str) -> String {
        let body = format!(
            "?s skos:prefLabel ?label .
{}
BIND(?label AS ?match)
OPTIONAL {{ ?s skos:notation ?notation }}",
            fragments::lang_filter("?label", Some(&spec.lang)),
        );
        format!(
            "SELECT DISTINCT ?s ?label ?match ?notation{graph_var}
WHERE {{
{scoped}{candidates}
}}",
            scoped = self.scoped(&body),
            candidates = self.candidate_values(spec),
        )
    }

    fn candidate_values(&self, spec: &SearchSpec) -> String {
        self.resolver()
            .candidate_graphs_values(&spec.vocabularies, &self.dialect)
            .map(|v| format!("\n{v}"))
            .unwrap_or_default()
    }

    fn type_restriction(&self, types: &[String]) -> String {
        if types.is_empty() {
            return "?s a skos:Concept .".to_string();
        }
        types
            .iter()
            .map(|t| format!("{{ ?s a {} }}", escape::iri(&self.prefixes.expand(t))))
            .collect::<Vec<_>>()
            .join(" UNION ")
    }
}

const LABEL_PRIORITY: &str = "FILTER(BOUND(?s))
BIND(STR(SUBSTR(?hit, 1, 1)) AS ?pri)
BIND(IF((SUBSTR(STRBEFORE(?hit, '@'), 1) != ?pri), STRLANG(STRAFTER(?hit, '@'), SUBSTR(STRBEFORE(?hit, '@'), 2)), STRAFTER(?hit, '@')) AS ?match)
BIND(IF((?pri = '1' || ?pri = '2') && ?match != ?label, ?match, ?unbound) AS ?plabel)
BIND(IF((?pri = '3' || ?pri = '4'), ?match, ?unbound) AS ?alabel)
BIND(IF((?pri = '5' || ?pri = '6'), ?match, ?unbound) AS ?hlabel)
";

fn scheme_restriction(schemes: &[String]) -> String {
    if schemes.is_empty() {
        return String::new();
    }
    let alternatives: Vec<String> = schemes
        .iter()
        .map(|s| format!("{{ ?s skos:inScheme {} }}", escape::iri(s)))
        .collect();
    format!("\n{{ {} }}", alternatives.join(" UNION "))
}

/// Aggregate projections and optional patterns for extra fields. Each
/// field becomes newline-separated CSV rows of `"uri","label","literal"`
/// with `"` doubled, so one hit stays one row however many values the
/// field has.
fn extra_fields(spec: &SearchSpec) -> (String, String) {
    let mut vars = String::new();
    let mut patterns = String::new();
    for field in &spec.extra_fields {
        let name = escape::variable_name(field);
        if name.is_empty() {
            continue;
        }
        if name == "prefLabel" {
            vars.push_str(&format!(
                " (GROUP_CONCAT(DISTINCT CONCAT('\"', REPLACE(STR(?pref), '\"', '\"\"'), '\"', ',', '\"', LANG(?pref), '\"'); separator='\\n') AS ?{PREF_LABELS_VAR})"
            ));
            patterns.push_str("OPTIONAL { ?s skos:prefLabel ?pref . }\n");
            continue;
        }
        let var = field_var(&name);
        let lab = format!("{var}_lab");
        vars.push_str(&format!(
            " (GROUP_CONCAT(DISTINCT CONCAT('\"', IF(isIRI({var}), STR({var}), ''), '\"', ',', '\"', REPLACE(IF(BOUND({lab}), {lab}, ''), '\"', '\"\"'), '\"', ',', '\"', REPLACE(IF(isLiteral({var}), STR({var}), ''), '\"', '\"\"'), '\"'); separator='\\n') AS ?{csv})",
            csv = field_csv_var(&name),
        ));
        patterns.push_str(&format!(
            "OPTIONAL {{
  ?s skos:{name} {var} .
  FILTER(!isLiteral({var}) || LANG({var}) = '' || {var_lang})
  OPTIONAL {{ {var} skos:prefLabel {lab} . FILTER({lab_lang}) }}
}}
",
            var_lang = lang_matches(&var, &spec.lang),
            lab_lang = lang_matches(&lab, &spec.lang),
        ));
    }
    (vars, patterns)
}
