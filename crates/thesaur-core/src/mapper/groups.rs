use super::{label_rank, ResultMapper};
use crate::results::Solutions;
use crate::types::{ConceptGroup, GroupMember};

impl ResultMapper {
    /// One entry per group in result order (the query sorts by label).
    pub fn groups(&self, solutions: &Solutions) -> Vec<ConceptGroup> {
        let mut groups: Vec<ConceptGroup> = Vec::new();
        for row in solutions {
            let Some(uri) = row.iri("group") else {
                continue;
            };
            if groups.iter().any(|g| g.uri == uri) {
                continue;
            }
            let mut child_groups: Vec<String> = row
                .non_empty("children")
                .map(|c| c.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default();
            child_groups.sort();
            child_groups.dedup();
            groups.push(ConceptGroup {
                uri: uri.to_string(),
                pref_label: row.value("label").map(str::to_string),
                child_groups,
                has_members: row.flag("members"),
                notation: row.value("notation").map(str::to_string),
            });
        }
        groups
    }

    /// Group members, one per concept. The query yields one row per type
    /// and label; types are collected in shortened form and the label in
    /// `lang` wins over any other.
    pub fn group_contents(&self, solutions: &Solutions, lang: &str) -> Vec<GroupMember> {
        let mut qnames = self.qnames();
        let mut members: Vec<(u8, GroupMember)> = Vec::new();
        for row in solutions {
            let Some(uri) = row.iri("conc") else {
                continue;
            };
            let idx = match members.iter().position(|(_, m)| m.uri == uri) {
                Some(idx) => idx,
                None => {
                    members.push((
                        u8::MAX,
                        GroupMember {
                            uri: uri.to_string(),
                            is_super: row.flag("super"),
                            has_members: row.flag("members"),
                            types: Vec::new(),
                            pref_label: None,
                            notation: None,
                        },
                    ));
                    members.len() - 1
                }
            };
            let (rank, member) = &mut members[idx];
            if let Some(t) = row.iri("type") {
                let short = qnames.shorten(t);
                if !member.types.contains(&short) {
                    member.types.push(short);
                }
            }
            if let Some(label) = row.get("label") {
                let r = label_rank(label.language(), lang, None);
                if r < *rank {
                    *rank = r;
                    member.pref_label = Some(label.value().to_string());
                }
            }
            if member.notation.is_none() {
                member.notation = row.value("notation").map(str::to_string);
            }
        }
        members.into_iter().map(|(_, m)| m).collect()
    }
}
