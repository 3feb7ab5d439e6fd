//! Escaping of caller-controlled text for embedding into query text.
//!
//! Every substitution point in the query builder goes through one of these
//! functions. All of them are total: any input string has an escaped form.

use regex::Regex;
use std::sync::LazyLock;

/// Lucene query-parser reserved characters, minus the `*` wildcard marker.
pub const LUCENE_RESERVED: &str = "+-&|!(){}[]^\"~?:\\/";

/// [`LUCENE_RESERVED`] plus space, for indexes that tokenize on whitespace
/// inside a single query term.
pub const LUCENE_RESERVED_WITH_SPACE: &str = " +-&|!(){}[]^\"~?:\\/";

static PREFIXED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_\-]*:[A-Za-z0-9_][A-Za-z0-9_\-.]*$").expect("static regex")
});

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

/// Collapse runs of `*` into a single wildcard marker.
pub fn collapse_wildcards(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    let mut prev_star = false;
    for c in term.chars() {
        if c == '*' {
            if !prev_star {
                out.push(c);
            }
            prev_star = true;
        } else {
            out.push(c);
            prev_star = false;
        }
    }
    out
}

/// Escape `s` for the inside of a single- or double-quoted SPARQL string.
///
/// Backslashes are doubled first, then quotes and line breaks get their
/// SPARQL `ECHAR` form.
pub fn escape_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// `s` as a complete single-quoted SPARQL string literal.
pub fn quoted(s: &str) -> String {
    format!("'{}'", escape_quoted(s))
}

/// Escape a search term for a Lucene-style text-index query, then for the
/// quoted literal it is embedded in. `reserved` is the dialect's escape set.
pub fn escape_text_query(term: &str, reserved: &str) -> String {
    let collapsed = collapse_wildcards(term);
    let mut lucene = String::with_capacity(collapsed.len() + 8);
    for c in collapsed.chars() {
        if reserved.contains(c) {
            lucene.push('\\');
        }
        lucene.push(c);
    }
    escape_quoted(&lucene)
}

/// Lower-case `term` (Unicode-aware) and escape it for a quoted literal.
pub fn quoted_lowercase(term: &str) -> String {
    quoted(&term.to_lowercase())
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// `uri` as an `<IRIREF>`. Characters SPARQL forbids inside an IRI are
/// percent-encoded byte by byte.
pub fn iri(uri: &str) -> String {
    let mut out = String::with_capacity(uri.len() + 2);
    out.push('<');
    for c in uri.chars() {
        if matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\') || (c as u32) <= 0x20 {
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{b:02X}"));
            }
        } else {
            out.push(c);
        }
    }
    out.push('>');
    out
}

pub fn is_prefixed_name(name: &str) -> bool {
    PREFIXED_NAME.is_match(name) && !name.contains("://")
}

/// Language tag or range, reduced to the characters BCP 47 allows plus the
/// `*` range wildcard.
pub fn lang_tag(lang: &str) -> String {
    lang.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '*')
        .collect()
}

/// A SPARQL variable name built from caller input (extra field names).
pub fn variable_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Escape regex metacharacters for an XPath `fn:matches` pattern.
///
/// XPath accepts a narrower set of escapes than the `regex` crate emits
/// (`\#`, `\&` and `\~` are errors), so the escape set is spelled out.
pub fn escape_xpath_regex(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        if ".\\?*+{}()[]^$|-".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
