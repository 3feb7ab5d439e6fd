//! Term-match classification.
//!
//! A raw search term is classified by where its `*` wildcard markers sit.
//! Exact, prefix and suffix matches map onto indexable string operators;
//! everything else falls back to an anchored case-insensitive regex.

use crate::escape::{collapse_wildcards, escape_xpath_regex, quoted, quoted_lowercase};
use crate::fragments::lang_matches;
use crate::types::MatchType;

/// A classified search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatch {
    pub kind: MatchType,
    /// The term with wildcard runs collapsed and, for prefix and suffix
    /// matches, the wildcard marker removed.
    pub term: String,
}

/// Classify `term` into a [`MatchType`] and its normalized form.
pub fn classify(term: &str) -> TermMatch {
    let term = collapse_wildcards(term);
    let stars = term.matches('*').count();

    let (kind, normalized) = if stars == 0 {
        (MatchType::Exact, term)
    } else if stars == 1 && term.len() > 1 && term.ends_with('*') {
        (MatchType::Prefix, term[..term.len() - 1].to_string())
    } else if stars == 1 && term.len() > 1 && term.starts_with('*') {
        (MatchType::Suffix, term[1..].to_string())
    } else {
        (MatchType::Regex, term)
    };

    TermMatch {
        kind,
        term: normalized,
    }
}

impl TermMatch {
    /// The filter condition on `var` (e.g. `?match`) for this match class.
    pub fn filter(&self, var: &str) -> String {
        match self.kind {
            MatchType::Exact => {
                format!("LCASE(STR({var})) = {}", quoted_lowercase(&self.term))
            }
            MatchType::Prefix => {
                format!("STRSTARTS(LCASE(STR({var})), {})", quoted_lowercase(&self.term))
            }
            MatchType::Suffix => {
                format!("STRENDS(LCASE(STR({var})), {})", quoted_lowercase(&self.term))
            }
            MatchType::Regex => {
                format!("REGEX(STR({var}), {}, 'i')", quoted(&self.regex_pattern()))
            }
        }
    }

    /// Anchored XPath pattern with `*` translated to `.*`.
    pub fn regex_pattern(&self) -> String {
        let body = self
            .term
            .split('*')
            .map(escape_xpath_regex)
            .collect::<Vec<_>>()
            .join(".*");
        format!("^{body}$")
    }

    /// For prefix matches: a condition that drops a hit on an alternate
    /// label when the concept's preferred label `label_var` also satisfies
    /// the prefix, so a concept is not listed twice. `None` for other
    /// match classes.
    pub fn duplicate_guard(
        &self,
        match_var: &str,
        label_var: &str,
        search_lang: Option<&str>,
    ) -> Option<String> {
        if self.kind != MatchType::Prefix {
            return None;
        }
        // a preferred label outside the search language never matched, so it
        // cannot stand in for the hit
        let mut shadowed = self.filter(label_var);
        if let Some(sl) = search_lang.filter(|l| !l.is_empty()) {
            shadowed.push_str(&format!(" && {}", lang_matches(label_var, sl)));
        }
        Some(format!(
            "FILTER(!BOUND({label_var}) || STR({match_var}) = STR({label_var}) || !({shadowed}))"
        ))
    }

    /// Term handed to a text index: the normalized term with its wildcard
    /// marker restored for prefix and suffix matches.
    pub fn index_term(&self) -> String {
        match self.kind {
            MatchType::Prefix => format!("{}*", self.term),
            MatchType::Suffix => format!("*{}", self.term),
            _ => self.term.clone(),
        }
    }

    /// True when the term matches every label (a bare `*`).
    pub fn matches_everything(&self) -> bool {
        self.kind == MatchType::Regex && self.term == "*"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("cat", MatchType::Exact, "cat")]
    #[case("cat*", MatchType::Prefix, "cat")]
    #[case("cat**", MatchType::Prefix, "cat")]
    #[case("*cat", MatchType::Suffix, "cat")]
    #[case("c*t", MatchType::Regex, "c*t")]
    #[case("*cat*", MatchType::Regex, "*cat*")]
    #[case("*", MatchType::Regex, "*")]
    #[case("**", MatchType::Regex, "*")]
    fn classification(#[case] raw: &str, #[case] kind: MatchType, #[case] term: &str) {
        let m = classify(raw);
        assert_eq!(m.kind, kind);
        assert_eq!(m.term, term);
    }

    #[test]
    fn exact_filter_lowercases_unicode() {
        let m = classify("ÄYRÄPÄÄ");
        assert_eq!(m.filter("?match"), "LCASE(STR(?match)) = 'äyräpää'");
    }

    #[test]
    fn prefix_filter_escapes_quote() {
        let m = classify("o'neil*");
        assert_eq!(m.filter("?match"), r"STRSTARTS(LCASE(STR(?match)), 'o\'neil')");
    }

    #[test]
    fn suffix_filter() {
        assert_eq!(
            classify("*fish").filter("?match"),
            "STRENDS(LCASE(STR(?match)), 'fish')"
        );
    }

    #[test]
    fn regex_filter_escapes_metacharacters() {
        let m = classify("a.b*c(d)");
        assert_eq!(m.regex_pattern(), r"^a\.b.*c\(d\)$");
        assert_eq!(m.filter("?match"), r"REGEX(STR(?match), '^a\\.b.*c\\(d\\)$', 'i')");
    }

    #[test]
    fn guard_only_for_prefix() {
        assert!(classify("cat").duplicate_guard("?match", "?label", None).is_none());
        let guard = classify("cat*").duplicate_guard("?match", "?label", None).unwrap();
        assert!(guard.contains("STRSTARTS(LCASE(STR(?label)), 'cat')"));
    }

    #[test]
    fn guard_only_shadows_labels_in_search_language() {
        let guard = classify("c*").duplicate_guard("?match", "?label", Some("fi")).unwrap();
        assert_eq!(
            guard,
            "FILTER(!BOUND(?label) || STR(?match) = STR(?label) || \
             !(STRSTARTS(LCASE(STR(?label)), 'c') && langMatches(LANG(?label), 'fi')))"
        );
        let guard = classify("c*").duplicate_guard("?match", "?label", Some("")).unwrap();
        assert!(!guard.contains("langMatches"));
    }

    proptest! {
        #[test]
        fn no_wildcard_is_exact(s in "[^*]+") {
            prop_assert_eq!(classify(&s).kind, MatchType::Exact);
        }

        #[test]
        fn trailing_wildcard_is_prefix(s in "[^*]+") {
            prop_assert_eq!(classify(&format!("{s}*")).kind, MatchType::Prefix);
        }

        #[test]
        fn leading_wildcard_is_suffix(s in "[^*]+") {
            prop_assert_eq!(classify(&format!("*{s}")).kind, MatchType::Suffix);
        }

        #[test]
        fn inner_wildcard_is_regex(a in "[^*]+", b in "[^*]+") {
            prop_assert_eq!(classify(&format!("{a}*{b}")).kind, MatchType::Regex);
        }
    }
}
