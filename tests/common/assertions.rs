//! Query-text assertion macros for thesaur harnesses.
//!
//! These add context-rich failure messages that print the whole generated
//! query, which is usually the only way to see why a fragment is missing.

// ---------------------------------------------------------------------------
// Fragment assertions
// ---------------------------------------------------------------------------

/// Assert that a query contains a fragment.
///
/// ```rust
/// assert_query_contains!(query, "GRAPH <http://www.skosmos.skos/test/>");
/// ```
#[macro_export]
macro_rules! assert_query_contains {
    ($query:expr, $fragment:expr) => {{
        let query: &str = &$query;
        let fragment: &str = $fragment;
        if !query.contains(fragment) {
            panic!(
                "assert_query_contains! failed: fragment not found.\n  fragment: {:?}\n  query:\n{}",
                fragment, query
            );
        }
    }};
}

/// Assert that a query does not contain a fragment.
#[macro_export]
macro_rules! assert_query_lacks {
    ($query:expr, $fragment:expr) => {{
        let query: &str = &$query;
        let fragment: &str = $fragment;
        if query.contains(fragment) {
            panic!(
                "assert_query_lacks! failed: fragment present.\n  fragment: {:?}\n  query:\n{}",
                fragment, query
            );
        }
    }};
}

/// Assert that a fragment occurs exactly `n` times.
#[macro_export]
macro_rules! assert_query_count {
    ($query:expr, $fragment:expr, $n:expr) => {{
        let query: &str = &$query;
        let fragment: &str = $fragment;
        let actual = query.matches(fragment).count();
        if actual != $n {
            panic!(
                "assert_query_count! failed for {:?}:\n  expected: {}\n  actual:   {}\n  query:\n{}",
                fragment, $n, actual, query
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// Structural checks
// ---------------------------------------------------------------------------

/// Assert that braces, brackets and parentheses outside string literals and
/// IRIs balance, i.e. that no caller input broke out of its quoting.
pub fn assert_balanced(query: &str) {
    let mut stack: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut in_iri = false;
    let chars: Vec<char> = query.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        if in_iri {
            if c == '>' {
                in_iri = false;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            // `<` opens an IRI only when followed by a non-space character;
            // a bare `<` is a comparison operator.
            '<' if chars.get(i + 1).is_some_and(|n| !n.is_whitespace() && *n != '=') => in_iri = true,
            '{' | '(' | '[' => stack.push(c),
            '}' | ')' | ']' => {
                let open = match c {
                    '}' => '{',
                    ')' => '(',
                    _ => '[',
                };
                match stack.pop() {
                    Some(o) if o == open => {}
                    other => panic!(
                        "assert_balanced failed at char {i}: {c:?} closes {other:?}\n  query:\n{query}"
                    ),
                }
            }
            _ => {}
        }
    }
    assert!(quote.is_none(), "unterminated literal in query:\n{query}");
    assert!(stack.is_empty(), "unclosed {stack:?} in query:\n{query}");
}

/// Assert that every `PREFIX` line is for a prefix the query body uses.
pub fn assert_prologue_minimal(query: &str) {
    let body: String = query
        .lines()
        .filter(|l| !l.starts_with("PREFIX "))
        .collect::<Vec<_>>()
        .join("\n");
    for line in query.lines().filter(|l| l.starts_with("PREFIX ")) {
        let prefix = line["PREFIX ".len()..]
            .split(':')
            .next()
            .unwrap_or_default();
        assert!(
            body.contains(&format!("{prefix}:")),
            "prologue declares unused prefix {prefix:?}\n  query:\n{query}"
        );
    }
}
