//! Result mapping.
//!
//! [`ResultMapper`] turns endpoint responses into the typed records of
//! [`crate::types`]. Mapping never fails: rows missing the variables an
//! operation keys on are skipped, and anything the store could not tell us
//! (a hit's vocabulary, a label in the requested language) degrades to a
//! marker or a best-effort value.
//!
//! Every method allocates its own [`QNameCache`], so a mapper can be shared
//! freely between concurrent calls.

use std::sync::Arc;

use crate::fragments::lang_satisfies;
use crate::prefix::{PrefixTable, QNameCache};
use crate::results::RdfTerm;

mod concept;
mod csv;
mod groups;
mod hierarchy;
mod labels;
mod search;
mod stats;

/// Vocabulary marker for hits whose vocabulary cannot be determined.
pub const DEFAULT_UNKNOWN_VOCABULARY: &str = "unknown";

#[derive(Debug, Clone)]
pub struct ResultMapper {
    prefixes: Arc<PrefixTable>,
    unknown_vocabulary: String,
}

impl ResultMapper {
    pub fn new(prefixes: Arc<PrefixTable>) -> Self {
        Self {
            prefixes,
            unknown_vocabulary: DEFAULT_UNKNOWN_VOCABULARY.to_string(),
        }
    }

    pub fn with_unknown_vocabulary(mut self, marker: impl Into<String>) -> Self {
        self.unknown_vocabulary = marker.into();
        self
    }

    pub fn unknown_vocabulary(&self) -> &str {
        &self.unknown_vocabulary
    }

    fn qnames(&self) -> QNameCache<'_> {
        QNameCache::new(&self.prefixes)
    }
}

// ---------------------------------------------------------------------------
// Label selection
// ---------------------------------------------------------------------------

/// How well a label's language fits a request; lower is better.
fn label_rank(label_lang: Option<&str>, lang: &str, fallback: Option<&str>) -> u8 {
    match label_lang {
        Some(l) if lang_satisfies(Some(l), lang) => 0,
        Some(l) if fallback.is_some_and(|f| !f.is_empty() && lang_satisfies(Some(l), f)) => 1,
        None => 2,
        Some(_) => 3,
    }
}

/// Label text for display in `lang`: the value, annotated with its own
/// language when that differs.
fn display_label(term: &RdfTerm, lang: &str) -> String {
    crate::fragments::annotate_label(term.value(), term.language(), lang)
}

/// Last segment of a URI after `#` or `/`.
fn local_part(uri: &str) -> &str {
    uri.rsplit(['#', '/']).next().unwrap_or(uri)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::results::{Row, Solutions};

    pub fn mapper() -> ResultMapper {
        ResultMapper::new(Arc::new(PrefixTable::builtin()))
    }

    pub fn iri(v: &str) -> RdfTerm {
        RdfTerm::Iri(v.to_string())
    }

    pub fn lit(v: &str) -> RdfTerm {
        RdfTerm::literal(v, None)
    }

    pub fn lang_lit(v: &str, lang: &str) -> RdfTerm {
        RdfTerm::literal(v, Some(lang))
    }

    pub fn flag(v: bool) -> RdfTerm {
        RdfTerm::Literal {
            value: v.to_string(),
            datatype: Some("http://www.w3.org/2001/XMLSchema#boolean".into()),
            language: None,
        }
    }

    pub fn rows(rows: Vec<Row>) -> Solutions {
        Solutions::new(rows)
    }
}
