//! Quick-find search
//!
//! Flat substring search over every item in the whole forest, never scoped
//! to the current zoom. The query splits on the literal token `OR` (any
//! case) into OR-groups; each group splits on whitespace into required
//! AND-terms. An item matches when its text contains all terms of at least
//! one group, case-insensitively.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::models::Item;

/// One search result, annotated with its ancestor path for disambiguation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: Uuid,
    pub text: String,
    /// Ancestor texts, root first
    pub path: Vec<String>,
}

/// Search the whole forest; an empty query matches everything
pub fn search(items: &[Arc<Item>], query: &str) -> Vec<SearchHit> {
    let groups = parse_groups(query);
    let mut hits = Vec::new();
    let mut path = Vec::new();
    walk(items, &groups, &mut path, &mut hits);
    hits
}

/// Lowercased OR-groups of AND-terms; empty when the query has no terms
fn parse_groups(query: &str) -> Vec<Vec<String>> {
    let mut groups: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for token in query.split_whitespace() {
        if token.eq_ignore_ascii_case("or") {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
        } else {
            current.push(token.to_lowercase());
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

fn matches(text: &str, groups: &[Vec<String>]) -> bool {
    if groups.is_empty() {
        return true;
    }
    let lower = text.to_lowercase();
    groups
        .iter()
        .any(|terms| terms.iter().all(|term| lower.contains(term.as_str())))
}

fn walk(
    items: &[Arc<Item>],
    groups: &[Vec<String>],
    path: &mut Vec<String>,
    hits: &mut Vec<SearchHit>,
) {
    for node in items {
        if matches(&node.text, groups) {
            hits.push(SearchHit {
                id: node.id,
                text: node.text.clone(),
                path: path.clone(),
            });
        }
        path.push(node.text.clone());
        walk(&node.children, groups, path, hits);
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(text: &str) -> Arc<Item> {
        Arc::new(Item::new(text))
    }

    fn branch(text: &str, children: Vec<Arc<Item>>) -> Arc<Item> {
        Arc::new(Item::with_children(text, children))
    }

    #[test]
    fn test_and_within_group_or_between_groups() {
        let both = leaf("Apples and Bananas");
        let only_a = leaf("apples alone");
        let c = leaf("Cherries");
        let none = leaf("durian");
        let forest = vec![
            Arc::clone(&both),
            Arc::clone(&only_a),
            Arc::clone(&c),
            Arc::clone(&none),
        ];

        let hits = search(&forest, "apples bananas OR cherries");
        let ids: Vec<_> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![both.id, c.id]);
    }

    #[test]
    fn test_case_insensitive_or_token() {
        let a = leaf("alpha");
        let b = leaf("beta");
        let forest = vec![Arc::clone(&a), Arc::clone(&b)];
        let hits = search(&forest, "ALPHA or BETA");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let forest = vec![leaf("a"), branch("b", vec![leaf("c")])];
        assert_eq!(search(&forest, "").len(), 3);
        assert_eq!(search(&forest, "   ").len(), 3);
        // a query of nothing but OR tokens has no terms either
        assert_eq!(search(&forest, "OR or").len(), 3);
    }

    #[test]
    fn test_hits_carry_ancestor_paths() {
        let target = leaf("needle here");
        let mid = branch("middle", vec![Arc::clone(&target)]);
        let top = branch("top", vec![Arc::clone(&mid)]);
        let forest = vec![Arc::clone(&top)];

        let hits = search(&forest, "needle");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, vec!["top".to_string(), "middle".to_string()]);
    }

    #[test]
    fn test_search_ignores_collapse_and_zoom() {
        let hidden = leaf("buried needle");
        let mut folded = Item::with_children("folded", vec![Arc::clone(&hidden)]);
        folded.is_collapsed = true;
        let forest = vec![Arc::new(folded)];

        let hits = search(&forest, "needle");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, hidden.id);
    }

    #[test]
    fn test_all_terms_required_within_group() {
        let forest = vec![leaf("only a here")];
        assert!(search(&forest, "a b OR c").is_empty());
    }
}
