//! Namespace prefix table and QName shortening.
//!
//! The table is built once at startup from the built-in namespaces plus any
//! configured extras and is read-only afterwards. [`QNameCache`] memoizes
//! shortening for the duration of one result mapping.

use std::collections::HashMap;

use crate::escape;

/// Built-in namespaces. Dialect-specific prefixes (`text`, `con`, ...) are
/// included so dialect fragments can use them unconditionally.
static BUILTIN: phf::OrderedMap<&'static str, &'static str> = phf::phf_ordered_map! {
    "rdf" => "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
    "rdfs" => "http://www.w3.org/2000/01/rdf-schema#",
    "owl" => "http://www.w3.org/2002/07/owl#",
    "xsd" => "http://www.w3.org/2001/XMLSchema#",
    "skos" => "http://www.w3.org/2004/02/skos/core#",
    "skosxl" => "http://www.w3.org/2008/05/skos-xl#",
    "dc" => "http://purl.org/dc/terms/",
    "dct" => "http://purl.org/dc/terms/",
    "dc11" => "http://purl.org/dc/elements/1.1/",
    "isothes" => "http://purl.org/iso25964/skos-thes#",
    "text" => "http://jena.apache.org/text#",
    "arq" => "http://jena.apache.org/ARQ/function#",
    "con" => "http://www.ontotext.com/connectors/lucene#",
    "con-inst" => "http://www.ontotext.com/connectors/lucene/instance#",
    "afn" => "http://jena.hpl.hp.com/ARQ/function#",
};

pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const SKOS_CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// Immutable prefix → namespace table.
#[derive(Debug, Clone)]
pub struct PrefixTable {
    entries: Vec<(String, String)>,
}

impl Default for PrefixTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PrefixTable {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN
                .entries()
                .map(|(p, ns)| (p.to_string(), ns.to_string()))
                .collect(),
        }
    }

    /// Built-in table extended with `extra`. A configured prefix replaces a
    /// built-in one of the same name.
    pub fn with_extra<I, K, V>(extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::builtin();
        for (prefix, ns) in extra {
            let prefix = prefix.into();
            let ns = ns.into();
            match table.entries.iter_mut().find(|(p, _)| *p == prefix) {
                Some(entry) => entry.1 = ns,
                None => table.entries.push((prefix, ns)),
            }
        }
        table
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, ns)| ns.as_str())
    }

    /// Expand `prefix:local` to a full URI. Strings that are not a known
    /// prefixed name are returned unchanged.
    pub fn expand(&self, name: &str) -> String {
        if let Some((prefix, local)) = name.split_once(':') {
            if !local.starts_with("//") {
                if let Some(ns) = self.namespace(prefix) {
                    return format!("{ns}{local}");
                }
            }
        }
        name.to_string()
    }

    /// A property or class reference as written into a query. Names whose
    /// prefix is in the table stay prefixed so the prologue declares them;
    /// everything else is expanded where possible and written as an IRI,
    /// so `urn:isbn:123` or an undeclared `ex:p` never reach the store bare.
    pub fn resource(&self, name: &str) -> String {
        match name.split_once(':') {
            Some((prefix, _)) if escape::is_prefixed_name(name) && self.namespace(prefix).is_some() => {
                name.to_string()
            }
            _ => escape::iri(&self.expand(name)),
        }
    }

    /// Shorten `uri` to `prefix:local` using the longest matching namespace.
    /// Among prefixes sharing a namespace the first registered wins.
    pub fn shorten(&self, uri: &str) -> Option<String> {
        let mut best: Option<(&str, &str)> = None;
        for (prefix, ns) in &self.entries {
            if let Some(local) = uri.strip_prefix(ns.as_str()) {
                if local.is_empty() || !local.chars().all(is_local_char) {
                    continue;
                }
                if best.map_or(true, |(_, b)| ns.len() > b.len()) {
                    best = Some((prefix.as_str(), ns.as_str()));
                }
            }
        }
        best.map(|(prefix, ns)| format!("{prefix}:{}", &uri[ns.len()..]))
    }

    /// `PREFIX` declarations for every prefix `query` uses and does not
    /// already declare.
    pub fn prologue(&self, query: &str) -> String {
        let mut out = String::new();
        for (prefix, ns) in &self.entries {
            let needle = format!("{prefix}:");
            if uses_prefix(query, &needle) && !query.contains(&format!("PREFIX {needle}")) {
                out.push_str(&format!("PREFIX {needle} <{ns}>\n"));
            }
        }
        out
    }

    /// `query` with its prologue prepended.
    pub fn with_prologue(&self, query: &str) -> String {
        format!("{}{}", self.prologue(query), query)
    }
}

fn is_local_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

/// True when `needle` (`prefix:`) occurs as a standalone prefixed name, not
/// as the tail of a longer name, inside an IRI or inside a string literal.
fn uses_prefix(query: &str, needle: &str) -> bool {
    #[derive(Clone, Copy)]
    enum Scan {
        Code,
        Iri,
        Quoted(char),
    }

    let bytes = query.as_bytes();
    let mut state = Scan::Code;
    let mut escaped = false;
    for (i, c) in query.char_indices() {
        match state {
            Scan::Quoted(quote) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == quote {
                    state = Scan::Code;
                }
            }
            Scan::Iri => {
                if c == '>' {
                    state = Scan::Code;
                }
            }
            Scan::Code => match c {
                '\'' | '"' => state = Scan::Quoted(c),
                // `<` followed by whitespace or `=` is an operator, not an IRI
                '<' if bytes
                    .get(i + 1)
                    .is_some_and(|b| !b.is_ascii_whitespace() && *b != b'=') =>
                {
                    state = Scan::Iri;
                }
                _ if query[i..].starts_with(needle) => {
                    let prev = query[..i].chars().next_back();
                    if prev.map_or(true, |p| !(p.is_alphanumeric() || p == '_' || p == '-')) {
                        return true;
                    }
                }
                _ => {}
            },
        }
    }
    false
}

// ---------------------------------------------------------------------------
// QName cache
// ---------------------------------------------------------------------------

/// Per-call memo of `uri → shortened form`. Falls back to the URI itself
/// when no prefix applies.
#[derive(Debug)]
pub struct QNameCache<'a> {
    prefixes: &'a PrefixTable,
    cache: HashMap<String, String>,
}

impl<'a> QNameCache<'a> {
    pub fn new(prefixes: &'a PrefixTable) -> Self {
        Self {
            prefixes,
            cache: HashMap::new(),
        }
    }

    pub fn shorten(&mut self, uri: &str) -> String {
        if let Some(hit) = self.cache.get(uri) {
            return hit.clone();
        }
        let short = self
            .prefixes
            .shorten(uri)
            .unwrap_or_else(|| uri.to_string());
        self.cache.insert(uri.to_string(), short.clone());
        short
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
