use indexmap::IndexMap;
use std::collections::HashSet;

use crate::pr::PullRequestEntry;

/// Identities a report is restricted to. Empty means "everyone".
///
/// Matching is exact: `Bob` and `bob` are different reviewers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllowList(HashSet<String>);

impl AllowList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether `identity` survives filtering.
    pub fn allows(&self, identity: &str) -> bool {
        self.0.is_empty() || self.0.contains(identity)
    }
}

impl FromIterator<String> for AllowList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        AllowList(iter.into_iter().collect())
    }
}

/// Keep only the allowed identities, leaving entries and their order untouched.
pub fn restrict<V>(table: IndexMap<String, V>, allow_list: &AllowList) -> IndexMap<String, V> {
    if allow_list.is_empty() {
        return table;
    }
    table
        .into_iter()
        .filter(|(identity, _)| allow_list.allows(identity))
        .collect()
}

/// Keep only the PRs at least one allowed identity took part in.
pub fn restrict_entries(
    entries: &[PullRequestEntry],
    allow_list: &AllowList,
) -> Vec<PullRequestEntry> {
    entries
        .iter()
        .filter(|entry| {
            allow_list.is_empty() || entry.record.participants().any(|p| allow_list.allows(p))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pr::types::{Comment, PullRequestRecord};

    fn allow(names: &[&str]) -> AllowList {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn entry(number: u64, author: &str, commenter: &str) -> PullRequestEntry {
        PullRequestEntry {
            record: PullRequestRecord {
                number,
                title: None,
                author: Some(author.to_string()),
                comments: vec![Comment {
                    author: commenter.to_string(),
                    body: "ok".to_string(),
                }],
                reviews: vec![],
            },
            raw: serde_json::json!({ "node": { "number": number } }),
        }
    }

    #[test]
    fn test_empty_allow_list_keeps_everything() {
        let table: IndexMap<String, u32> =
            [("alice".to_string(), 1), ("bob".to_string(), 2)].into_iter().collect();
        let restricted = restrict(table.clone(), &AllowList::default());
        assert_eq!(restricted, table);
    }

    #[test]
    fn test_restrict_keeps_order_and_values() {
        let table: IndexMap<String, u32> = [
            ("carol".to_string(), 3),
            ("alice".to_string(), 1),
            ("bob".to_string(), 2),
        ]
        .into_iter()
        .collect();
        let restricted = restrict(table, &allow(&["bob", "carol", "nobody"]));
        let keys: Vec<&str> = restricted.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["carol", "bob"]);
        assert_eq!(restricted["bob"], 2);
    }

    #[test]
    fn test_allow_list_is_case_sensitive() {
        let list = allow(&["bob"]);
        assert!(list.allows("bob"));
        assert!(!list.allows("Bob"));
        assert!(!list.allows(" bob"));
    }

    #[test]
    fn test_restrict_entries_by_participant() {
        let entries = vec![entry(1, "alice", "bob"), entry(2, "carol", "dave")];
        let kept = restrict_entries(&entries, &allow(&["bob"]));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].record.number, 1);

        assert_eq!(restrict_entries(&entries, &AllowList::default()).len(), 2);
    }
}
