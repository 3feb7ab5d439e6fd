use std::collections::BTreeMap;

use super::ResultMapper;
use crate::fragments::lang_satisfies;
use crate::query::LANG_COUNT_PROPERTIES;
use crate::results::Solutions;
use crate::types::{LangCounts, TypeCount};

impl ResultMapper {
    /// Resource counts per type, sorted by type URI. A type label is only
    /// reported when it is in `lang`.
    pub fn count_concepts(&self, solutions: &Solutions, lang: &str) -> Vec<TypeCount> {
        let mut counts: BTreeMap<String, TypeCount> = BTreeMap::new();
        for row in solutions {
            let Some(type_uri) = row.iri("type") else {
                continue;
            };
            let count = row
                .value("c")
                .and_then(|c| c.parse::<u64>().ok())
                .unwrap_or(0);
            let entry = counts.entry(type_uri.to_string()).or_insert_with(|| TypeCount {
                type_uri: type_uri.to_string(),
                count,
                label: None,
            });
            if let Some(label) = row.get("typelabel") {
                if label.language().is_some_and(|l| lang_satisfies(Some(l), lang)) {
                    entry.label = Some(label.value().to_string());
                }
            }
        }
        counts.into_values().collect()
    }

    /// Label counts per language and label property. Every requested
    /// language starts with a zero count for each counted property.
    pub fn count_lang_concepts(&self, solutions: &Solutions, langs: &[String]) -> LangCounts {
        let mut qnames = self.qnames();
        let mut counts: LangCounts = langs
            .iter()
            .map(|lang| {
                let zero: BTreeMap<String, u64> = LANG_COUNT_PROPERTIES
                    .iter()
                    .map(|p| (p.to_string(), 0))
                    .collect();
                (lang.clone(), zero)
            })
            .collect();
        for row in solutions {
            let (Some(lang), Some(prop)) = (row.non_empty("lang"), row.value("prop")) else {
                continue;
            };
            let count = row
                .value("count")
                .and_then(|c| c.parse::<u64>().ok())
                .unwrap_or(0);
            *counts
                .entry(lang.to_string())
                .or_default()
                .entry(qnames.shorten(prop))
                .or_insert(0) += count;
        }
        counts
    }
}
