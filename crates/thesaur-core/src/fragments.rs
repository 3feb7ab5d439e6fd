//! Small query fragments shared by the dialects and the query builder.
//!
//! Every caller-supplied value is escaped here or in [`crate::escape`];
//! nothing returned from this module embeds raw input.

use crate::escape;
use crate::prefix::PrefixTable;

/// `langMatches(LANG(var), 'lang')`.
pub fn lang_matches(var: &str, lang: &str) -> String {
    format!("langMatches(LANG({var}), '{}')", escape::lang_tag(lang))
}

/// `FILTER(langMatches(...))`, or nothing when `lang` is `None` or empty.
pub fn lang_filter(var: &str, lang: Option<&str>) -> String {
    match lang.filter(|l| !l.is_empty()) {
        Some(l) => format!("FILTER({})", lang_matches(var, l)),
        None => String::new(),
    }
}

pub fn not_deprecated(var: &str) -> String {
    format!("FILTER NOT EXISTS {{ {var} owl:deprecated true }}")
}

/// Alternative property path over `props`, e.g. `(skos:broader|ex:parent)`.
/// A single property is rendered bare.
pub fn property_path(prefixes: &PrefixTable, props: &[String]) -> String {
    let rendered: Vec<String> = props.iter().map(|p| prefixes.resource(p)).collect();
    match rendered.len() {
        0 => "skos:broader".to_string(),
        1 => rendered[0].clone(),
        _ => format!("({})", rendered.join("|")),
    }
}

/// Preferred label of `subject` bound to `var`: first in `lang`, then in
/// `fallback`, then in any language. Later OPTIONALs only bind when the
/// earlier ones did not.
pub fn pref_label_with_fallback(
    subject: &str,
    var: &str,
    lang: &str,
    fallback: Option<&str>,
) -> String {
    let mut out = format!(
        "OPTIONAL {{ {subject} skos:prefLabel {var} . FILTER({}) }}\n",
        lang_matches(var, lang)
    );
    if let Some(fb) = fallback.filter(|f| !f.is_empty()) {
        out.push_str(&format!(
            "OPTIONAL {{ {subject} skos:prefLabel {var} . FILTER({}) }}\n",
            lang_matches(var, fb)
        ));
    }
    out.push_str(&format!("OPTIONAL {{ {subject} skos:prefLabel {var} . }}"));
    out
}

/// `LIMIT` / `OFFSET` lines; zero counts as unset.
pub fn limit_offset(limit: Option<usize>, offset: Option<usize>) -> String {
    let mut out = String::new();
    if let Some(l) = limit.filter(|l| *l > 0) {
        out.push_str(&format!("\nLIMIT {l}"));
    }
    if let Some(o) = offset.filter(|o| *o > 0) {
        out.push_str(&format!("\nOFFSET {o}"));
    }
    out
}

/// True when a label in `label_lang` satisfies a request for `lang`
/// (same tag, or a subtag of it such as `en-GB` for `en`).
pub fn lang_satisfies(label_lang: Option<&str>, lang: &str) -> bool {
    match label_lang {
        None => true,
        Some(l) => {
            l.eq_ignore_ascii_case(lang)
                || (l.get(..lang.len()).is_some_and(|p| p.eq_ignore_ascii_case(lang))
                    && l.as_bytes().get(lang.len()) == Some(&b'-'))
        }
    }
}

/// `value`, annotated with its language in parentheses when that differs
/// from the requested one.
pub fn annotate_label(value: &str, label_lang: Option<&str>, lang: &str) -> String {
    match label_lang {
        Some(l) if !lang_satisfies(Some(l), lang) => format!("{value} ({l})"),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lang_filter_sanitizes() {
        assert_eq!(lang_filter("?l", Some("en')}")), "FILTER(langMatches(LANG(?l), 'en'))");
        assert_eq!(lang_filter("?l", None), "");
        assert_eq!(lang_filter("?l", Some("")), "");
    }

    #[test]
    fn property_paths() {
        let t = PrefixTable::builtin();
        assert_eq!(property_path(&t, &["skos:broader".into()]), "skos:broader");
        assert_eq!(
            property_path(&t, &["skos:broader".into(), "http://e.org/p".into()]),
            "(skos:broader|<http://e.org/p>)"
        );
        assert_eq!(
            property_path(&t, &["urn:x-rel:parent".into(), "ex:up".into()]),
            "(<urn:x-rel:parent>|<ex:up>)"
        );
    }

    #[test]
    fn limit_offset_skips_zero() {
        assert_eq!(limit_offset(Some(10), Some(0)), "\nLIMIT 10");
        assert_eq!(limit_offset(None, Some(5)), "\nOFFSET 5");
        assert_eq!(limit_offset(Some(0), None), "");
    }

    #[test]
    fn annotation_respects_subtags() {
        assert_eq!(annotate_label("Cat", Some("en-GB"), "en"), "Cat");
        assert_eq!(annotate_label("Kissa", Some("fi"), "en"), "Kissa (fi)");
        assert_eq!(annotate_label("X", None, "en"), "X");
        assert_eq!(annotate_label("Y", Some("eng"), "en"), "Y (eng)");
    }
}
