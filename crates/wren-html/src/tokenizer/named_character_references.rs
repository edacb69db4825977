//! Named character reference trie.
//!
//! [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
//!
//! "Consume the maximum number of characters possible, where the consumed
//! characters are one of the identifiers in the first column of the named
//! character references table."
//!
//! The table in [`super::entities`] is loaded once per process into a trie keyed
//! by character. Every parser shares the same read-only instance, and a walk
//! can stop as soon as no identifier continues with the next character.

use std::sync::LazyLock;

use super::entities::ENTITIES;

/// Process-wide trie, built on first use.
static TRIE: LazyLock<EntityTrie> = LazyLock::new(|| EntityTrie::build(ENTITIES));

/// One trie node: sorted outgoing edges plus the replacement text when the path
/// walked so far is a complete identifier.
#[derive(Debug, Default)]
struct TrieNode {
    children: Vec<(char, u32)>,
    value: Option<&'static str>,
}

/// Trie over the named character reference identifiers.
#[derive(Debug)]
pub struct EntityTrie {
    nodes: Vec<TrieNode>,
}

impl EntityTrie {
    fn build(entries: &[(&str, &'static str)]) -> Self {
        let mut trie = Self {
            nodes: vec![TrieNode::default()],
        };
        for &(name, value) in entries {
            let mut index = 0usize;
            for c in name.chars() {
                index = trie.child_or_insert(index, c);
            }
            trie.nodes[index].value = Some(value);
        }
        trie
    }

    fn child_or_insert(&mut self, index: usize, c: char) -> usize {
        match self.nodes[index]
            .children
            .binary_search_by_key(&c, |&(edge, _)| edge)
        {
            Ok(pos) => self.nodes[index].children[pos].1 as usize,
            Err(pos) => {
                let new_index = self.nodes.len();
                self.nodes.push(TrieNode::default());
                #[allow(clippy::cast_possible_truncation)]
                self.nodes[index]
                    .children
                    .insert(pos, (c, new_index as u32));
                new_index
            }
        }
    }

    fn child(&self, index: usize, c: char) -> Option<usize> {
        let children = &self.nodes.get(index)?.children;
        children
            .binary_search_by_key(&c, |&(edge, _)| edge)
            .ok()
            .map(|pos| children[pos].1 as usize)
    }
}

/// A position in the shared trie, advanced one character at a time.
///
/// The tokenizer consumes input characters one by one, so it walks the trie
/// with a cursor instead of handing over a whole string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrieCursor {
    index: usize,
}

impl TrieCursor {
    /// Cursor at the trie root (the empty prefix).
    #[must_use]
    pub const fn root() -> Self {
        Self { index: 0 }
    }

    /// Follow the edge for `c`, if any identifier continues with it.
    #[must_use]
    pub fn step(self, c: char) -> Option<Self> {
        TRIE.child(self.index, c).map(|index| Self { index })
    }

    /// Replacement text if the prefix walked so far is a full identifier.
    #[must_use]
    pub fn value(self) -> Option<&'static str> {
        TRIE.nodes.get(self.index).and_then(|n| n.value)
    }

    /// True if some identifier extends the prefix walked so far.
    #[must_use]
    pub fn has_children(self) -> bool {
        TRIE.nodes
            .get(self.index)
            .is_some_and(|n| !n.children.is_empty())
    }
}

/// Look up a complete named character reference.
///
/// Returns the replacement string if found.
/// The `name` should NOT include the leading '&'.
///
/// # Example
/// ```
/// use wren_html::tokenizer::named_character_references::lookup_entity;
///
/// assert_eq!(lookup_entity("amp;"), Some("&"));
/// assert_eq!(lookup_entity("amp"), Some("&"));
/// assert_eq!(lookup_entity("xyz;"), None);
/// ```
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    walk(name).and_then(TrieCursor::value)
}

/// Check if any entity name starts with the given prefix.
#[must_use]
pub fn any_entity_has_prefix(prefix: &str) -> bool {
    walk(prefix).is_some()
}

/// Greedy longest match at the start of `input`.
///
/// Returns the number of characters matched and the replacement text. This is
/// the same walk the tokenizer performs, for callers holding a whole string.
///
/// # Example
/// ```
/// use wren_html::tokenizer::named_character_references::longest_match;
///
/// assert_eq!(longest_match("notin;"), Some((6, "\u{2209}")));
/// assert_eq!(longest_match("not;in;"), Some((4, "\u{AC}")));
/// assert_eq!(longest_match("notit;"), Some((3, "\u{AC}")));
/// ```
#[must_use]
pub fn longest_match(input: &str) -> Option<(usize, &'static str)> {
    let mut cursor = TrieCursor::root();
    let mut best = None;
    for (consumed, c) in input.chars().enumerate() {
        let Some(next) = cursor.step(c) else {
            break;
        };
        cursor = next;
        if let Some(value) = cursor.value() {
            best = Some((consumed + 1, value));
        }
    }
    best
}

fn walk(prefix: &str) -> Option<TrieCursor> {
    prefix
        .chars()
        .try_fold(TrieCursor::root(), |cursor, c| cursor.step(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trie_holds_full_table() {
        for &(name, value) in ENTITIES {
            assert_eq!(lookup_entity(name), Some(value), "entity {name}");
        }
    }

    #[test]
    fn test_cursor_reports_dead_ends() {
        let cursor = walk("amp;").expect("amp; is in the table");
        assert_eq!(cursor.value(), Some("&"));
        assert!(!cursor.has_children());
        assert!(cursor.step('x').is_none());
    }
}
