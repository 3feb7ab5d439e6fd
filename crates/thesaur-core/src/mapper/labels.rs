use std::collections::BTreeMap;

use super::{local_part, ResultMapper};
use crate::results::Solutions;
use crate::types::Lookup;

impl ResultMapper {
    /// Labels keyed by language, taken from the highest-priority property
    /// that has any. Untagged labels are keyed by `""`.
    pub fn label(&self, solutions: &Solutions) -> Lookup<BTreeMap<String, String>> {
        if solutions.is_empty() {
            return Lookup::Absent;
        }
        let labelled: Vec<_> = solutions
            .iter()
            .filter_map(|row| {
                let label = row.get("label")?;
                let pri = row
                    .value("pri")
                    .and_then(|p| p.parse::<u8>().ok())
                    .unwrap_or(u8::MAX);
                Some((pri, label))
            })
            .collect();
        let Some(best) = labelled.iter().map(|(pri, _)| *pri).min() else {
            return Lookup::Empty;
        };
        Lookup::Found(
            labelled
                .into_iter()
                .filter(|(pri, _)| *pri == best)
                .map(|(_, label)| {
                    (
                        label.language().unwrap_or_default().to_string(),
                        label.value().to_string(),
                    )
                })
                .collect(),
        )
    }

    /// Preferred, alternate and hidden labels keyed by property local name
    /// (`prefLabel`, `altLabel`, `hiddenLabel`). Properties without a label
    /// in the language are left out.
    pub fn all_labels(&self, solutions: &Solutions) -> Lookup<BTreeMap<String, Vec<String>>> {
        if solutions.is_empty() {
            return Lookup::Absent;
        }
        let mut labels: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for row in solutions {
            let (Some(prop), Some(val)) = (row.iri("prop"), row.value("val")) else {
                continue;
            };
            let values = labels.entry(local_part(prop).to_string()).or_default();
            if !values.iter().any(|v| v == val) {
                values.push(val.to_string());
            }
        }
        if labels.is_empty() {
            Lookup::Empty
        } else {
            Lookup::Found(labels)
        }
    }

    pub fn notation(&self, solutions: &Solutions) -> Option<String> {
        solutions
            .iter()
            .find_map(|row| row.value("notation"))
            .map(str::to_string)
    }

    /// Super-property URIs, or `None` when the property has none.
    pub fn super_properties(&self, solutions: &Solutions) -> Option<Vec<String>> {
        let supers: Vec<String> = solutions
            .iter()
            .filter_map(|row| row.iri("superProperty"))
            .map(str::to_string)
            .collect();
        (!supers.is_empty()).then_some(supers)
    }
}
