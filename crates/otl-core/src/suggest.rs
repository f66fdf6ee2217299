//! Link and tag autocompletion
//!
//! While editing text, an unclosed `[[` or a `#`-prefixed word run behind
//! the caret opens a suggestion popup. Link candidates are the other items
//! of the forest, ranked exact-prefix before substring with forest traversal
//! order breaking ties; tag candidates are the distinct `#tag` tokens found
//! anywhere, alphabetical. Applying a suggestion rewrites the trigger region
//! in place and reports where the caret lands.

use std::collections::BTreeSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::models::Item;

/// An autocompletion trigger found behind the caret
///
/// `start..end` is the byte region to rewrite (from the opening `[[` or `#`
/// to the caret); `query` is the text typed so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Link {
        start: usize,
        end: usize,
        query: String,
    },
    Tag {
        start: usize,
        end: usize,
        query: String,
    },
}

/// A link candidate: the target item and its text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSuggestion {
    pub id: Uuid,
    pub text: String,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Scan backward from the caret for an autocompletion trigger
///
/// Returns `None` when the caret is not a char boundary, the nearest `[[`
/// is already closed, and no `#word` run ends at the caret.
pub fn trigger_at(text: &str, caret: usize) -> Option<Trigger> {
    if caret > text.len() || !text.is_char_boundary(caret) {
        return None;
    }
    let prefix = &text[..caret];

    if let Some(open) = prefix.rfind("[[") {
        if !prefix[open..].contains("]]") {
            return Some(Trigger::Link {
                start: open,
                end: caret,
                query: prefix[open + 2..].to_string(),
            });
        }
    }

    // a run of word characters ending at the caret...
    let run_start = prefix
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word_char(*c))
        .last()
        .map_or(caret, |(i, _)| i);
    // ...prefixed by '#', itself at the start of text or after whitespace
    let hash_start = run_start.checked_sub(1)?;
    if !prefix.is_char_boundary(hash_start) || !prefix[hash_start..].starts_with('#') {
        return None;
    }
    let before_hash = prefix[..hash_start].chars().next_back();
    if before_hash.is_some_and(|c| !c.is_whitespace()) {
        return None;
    }
    Some(Trigger::Tag {
        start: hash_start,
        end: caret,
        query: prefix[run_start..].to_string(),
    })
}

/// Rank link candidates for `query`
///
/// Exact-prefix matches come before substring-only matches; non-matches are
/// excluded; the item being edited never suggests itself; ties keep forest
/// traversal order. Capped at `limit`.
pub fn suggest_links(
    items: &[Arc<Item>],
    query: &str,
    current: Uuid,
    limit: usize,
) -> Vec<LinkSuggestion> {
    let q = query.to_lowercase();
    let mut prefix_hits = Vec::new();
    let mut substring_hits = Vec::new();

    fn walk(
        items: &[Arc<Item>],
        q: &str,
        current: Uuid,
        prefix_hits: &mut Vec<LinkSuggestion>,
        substring_hits: &mut Vec<LinkSuggestion>,
    ) {
        for node in items {
            if node.id != current {
                let lower = node.text.to_lowercase();
                let hit = || LinkSuggestion {
                    id: node.id,
                    text: node.text.clone(),
                };
                if lower.starts_with(q) {
                    prefix_hits.push(hit());
                } else if lower.contains(q) {
                    substring_hits.push(hit());
                }
            }
            walk(&node.children, q, current, prefix_hits, substring_hits);
        }
    }
    walk(items, &q, current, &mut prefix_hits, &mut substring_hits);

    prefix_hits.extend(substring_hits);
    prefix_hits.truncate(limit);
    prefix_hits
}

/// Distinct `#tag` tokens in the whole forest, substring-filtered by
/// `query`, alphabetical, capped at `limit`
pub fn suggest_tags(items: &[Arc<Item>], query: &str, limit: usize) -> Vec<String> {
    let mut tags = BTreeSet::new();
    fn walk(items: &[Arc<Item>], tags: &mut BTreeSet<String>) {
        for node in items {
            collect_tags(&node.text, tags);
            walk(&node.children, tags);
        }
    }
    walk(items, &mut tags);

    let q = query.to_lowercase();
    tags.into_iter()
        .filter(|tag| tag.to_lowercase().contains(&q))
        .take(limit)
        .collect()
}

/// Extract `#tag` tokens from one text: a `#` at the start or after
/// whitespace, followed by at least one word character
fn collect_tags(text: &str, tags: &mut BTreeSet<String>) {
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '#' && prev.map_or(true, char::is_whitespace) {
            let start = i + 1;
            let mut end = start;
            while let Some(&(j, next)) = chars.peek() {
                if is_word_char(next) {
                    end = j + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            if end > start {
                tags.insert(text[start..end].to_string());
            }
        }
        prev = Some(c);
    }
}

/// Apply a chosen suggestion: replace the trigger region with the full
/// token and return the new text plus the caret offset just after it
pub fn apply_suggestion(text: &str, trigger: &Trigger, choice: &str) -> (String, usize) {
    let (start, end, token) = match trigger {
        Trigger::Link { start, end, .. } => (*start, *end, format!("[[{choice}]]")),
        Trigger::Tag { start, end, .. } => (*start, *end, format!("#{choice}")),
    };
    let caret = start + token.len();
    let rewritten = format!("{}{}{}", &text[..start], token, &text[end..]);
    (rewritten, caret)
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
    fn test_link_trigger_behind_caret() {
        let text = "see [[proj";
        let trigger = trigger_at(text, text.len()).unwrap();
        assert_eq!(
            trigger,
            Trigger::Link {
                start: 4,
                end: 10,
                query: "proj".to_string()
            }
        );
    }

    #[test]
    fn test_closed_brackets_do_not_trigger() {
        let text = "see [[done]] and";
        assert_eq!(trigger_at(text, text.len()), None);
    }

    #[test]
    fn test_tag_trigger_needs_word_boundary() {
        let text = "note #ta";
        let trigger = trigger_at(text, text.len()).unwrap();
        assert_eq!(
            trigger,
            Trigger::Tag {
                start: 5,
                end: 8,
                query: "ta".to_string()
            }
        );

        // '#' at the start of text counts
        assert!(matches!(trigger_at("#x", 2), Some(Trigger::Tag { .. })));
        // '#' glued to a word does not
        assert_eq!(trigger_at("item#3", 6), None);
        // bare text does not
        assert_eq!(trigger_at("plain text", 10), None);
    }

    #[test]
    fn test_empty_tag_query_triggers() {
        let trigger = trigger_at("a #", 3).unwrap();
        assert_eq!(
            trigger,
            Trigger::Tag {
                start: 2,
                end: 3,
                query: String::new()
            }
        );
    }

    #[test]
    fn test_suggest_links_prefix_beats_substring() {
        let editing = leaf("project notes");
        let prefix = leaf("Project Alpha");
        let substr = leaf("my project");
        let miss = leaf("unrelated");
        let forest = vec![
            Arc::clone(&editing),
            Arc::clone(&substr),
            Arc::clone(&prefix),
            Arc::clone(&miss),
        ];

        let hits = suggest_links(&forest, "project", editing.id, 10);
        let ids: Vec<_> = hits.iter().map(|h| h.id).collect();
        // prefix match first despite later traversal position, then substring;
        // the edited item and non-matches excluded
        assert_eq!(ids, vec![prefix.id, substr.id]);
    }

    #[test]
    fn test_suggest_links_ties_keep_forest_order() {
        let a = leaf("alpha one");
        let kid = leaf("alpha two");
        let parent = branch("alpha parent", vec![Arc::clone(&kid)]);
        let forest = vec![Arc::clone(&a), Arc::clone(&parent)];

        let hits = suggest_links(&forest, "alpha", Uuid::new_v4(), 10);
        let ids: Vec<_> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![a.id, parent.id, kid.id]);
    }

    #[test]
    fn test_suggest_links_respects_limit() {
        let forest = vec![leaf("a1"), leaf("a2"), leaf("a3")];
        assert_eq!(suggest_links(&forest, "a", Uuid::new_v4(), 2).len(), 2);
    }

    #[test]
    fn test_suggest_tags_distinct_alphabetical() {
        let forest = vec![
            leaf("work on #zebra and #apple"),
            branch("sub", vec![leaf("#apple again, #mango")]),
        ];
        let tags = suggest_tags(&forest, "", 10);
        assert_eq!(tags, vec!["apple", "mango", "zebra"]);

        let tags = suggest_tags(&forest, "AN", 10);
        assert_eq!(tags, vec!["mango"]);
    }

    #[test]
    fn test_apply_link_suggestion() {
        let text = "see [[proj today";
        let trigger = trigger_at(text, 10).unwrap();
        let (rewritten, caret) = apply_suggestion(text, &trigger, "Project Alpha");
        assert_eq!(rewritten, "see [[Project Alpha]] today");
        assert_eq!(caret, "see [[Project Alpha]]".len());
    }

    #[test]
    fn test_apply_tag_suggestion() {
        let text = "note #ta end";
        let trigger = trigger_at(text, 8).unwrap();
        let (rewritten, caret) = apply_suggestion(text, &trigger, "tasks");
        assert_eq!(rewritten, "note #tasks end");
        assert_eq!(caret, "note #tasks".len());
        assert_eq!(&rewritten[caret..], " end");
    }
}
