//! [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
//!
//! "Initially, the list of active formatting elements is empty. It is used to
//! handle mis-nested formatting element tags."

use wren_dom::NodeId;

use crate::error::HtmlError;
use crate::tokenizer::{Attribute, Token};

/// An entry in the list: a formatting element or a marker.
#[derive(Debug, Clone)]
pub enum FormattingEntry {
    /// "A marker is an entry in the list of active formatting elements that is
    /// distinct from any element."
    ///
    /// Pushed when entering applet, object, marquee, template, td, th and
    /// caption, so formatting from outside does not leak in.
    Marker,
    /// A formatting element.
    Element {
        /// The element in the tree.
        node: NodeId,
        /// The start tag that created it, kept to recreate an equivalent
        /// element during reconstruction and adoption.
        token: Token,
    },
}

impl FormattingEntry {
    /// The element, unless this is a marker.
    #[must_use]
    pub const fn node(&self) -> Option<NodeId> {
        match self {
            Self::Marker => None,
            Self::Element { node, .. } => Some(*node),
        }
    }
}

/// The list of active formatting elements.
#[derive(Debug, Default, Clone)]
pub struct ActiveFormattingElements {
    entries: Vec<FormattingEntry>,
}

impl ActiveFormattingElements {
    /// An empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, markers included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FormattingEntry> {
        self.entries.get(index)
    }

    /// The last entry.
    #[must_use]
    pub fn last(&self) -> Option<&FormattingEntry> {
        self.entries.last()
    }

    /// "Insert a marker at the end of the list of active formatting elements."
    pub fn push_marker(&mut self) {
        self.entries.push(FormattingEntry::Marker);
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// "1. If there are already three elements in the list of active formatting
    /// elements after the last marker, if any, or anywhere in the list if there
    /// are no markers, that have the same tag name, namespace, and attributes
    /// as element, then remove the earliest such element from the list of
    /// active formatting elements. For these purposes, the attributes must be
    /// compared as they were when the elements were created by the parser; two
    /// elements have the same attributes if all their parsed attributes can be
    /// paired such that the two attributes in each pair have identical names,
    /// namespaces, and values (the order of the attributes does not matter).
    ///
    /// 2. Add element to the list of active formatting elements."
    ///
    /// Formatting elements are always HTML, so the namespace always agrees.
    pub fn push(&mut self, node: NodeId, token: Token) {
        let after_marker = self.after_last_marker();
        let matching: Vec<usize> = self.entries[after_marker..]
            .iter()
            .enumerate()
            .filter_map(|(offset, entry)| match entry {
                FormattingEntry::Element { token: existing, .. }
                    if same_tag_and_attributes(existing, &token) =>
                {
                    Some(after_marker + offset)
                }
                _ => None,
            })
            .collect();

        if matching.len() >= 3 {
            let _ = self.entries.remove(matching[0]);
        }
        self.entries.push(FormattingEntry::Element { node, token });
    }

    /// Index just past the last marker, or 0.
    fn after_last_marker(&self) -> usize {
        self.entries
            .iter()
            .rposition(|e| matches!(e, FormattingEntry::Marker))
            .map_or(0, |i| i + 1)
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    ///
    /// "1. Let entry be the last (most recently added) entry in the list of
    /// active formatting elements.
    /// 2. Remove entry from the list of active formatting elements.
    /// 3. If entry was a marker, then stop the algorithm at this point.
    /// 4. Go to step 1."
    pub fn clear_to_last_marker(&mut self) {
        while let Some(entry) = self.entries.pop() {
            if matches!(entry, FormattingEntry::Marker) {
                break;
            }
        }
    }

    /// Index of the entry for `node`.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.entries.iter().rposition(|e| e.node() == Some(node))
    }

    /// True if `node` has an entry.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.position(node).is_some()
    }

    /// Remove the entry for `node`.
    ///
    /// # Errors
    ///
    /// [`HtmlError::MissingFormattingEntry`] if `node` has no entry.
    pub fn remove(&mut self, node: NodeId) -> Result<(), HtmlError> {
        let index = self.require(node)?;
        let _ = self.entries.remove(index);
        Ok(())
    }

    /// Remove the entry at `index`.
    pub fn remove_at(&mut self, index: usize) {
        if index < self.entries.len() {
            let _ = self.entries.remove(index);
        }
    }

    /// Insert an element entry at a bookmark.
    ///
    /// # Errors
    ///
    /// [`HtmlError::InvalidBookmark`] if `bookmark` is past the end of the
    /// list.
    pub fn insert(&mut self, bookmark: usize, node: NodeId, token: Token) -> Result<(), HtmlError> {
        if bookmark > self.entries.len() {
            return Err(HtmlError::InvalidBookmark(bookmark));
        }
        self.entries
            .insert(bookmark, FormattingEntry::Element { node, token });
        Ok(())
    }

    /// Point the entry for `old` at its replacement element.
    ///
    /// # Errors
    ///
    /// [`HtmlError::MissingFormattingEntry`] if `old` has no entry.
    pub fn replace_node(&mut self, old: NodeId, new_node: NodeId) -> Result<(), HtmlError> {
        let index = self.require(old)?;
        if let Some(FormattingEntry::Element { node, .. }) = self.entries.get_mut(index) {
            *node = new_node;
        }
        Ok(())
    }

    fn require(&self, node: NodeId) -> Result<usize, HtmlError> {
        self.position(node)
            .ok_or(HtmlError::MissingFormattingEntry(node.0))
    }

    /// The start tag that created the element at `index`.
    #[must_use]
    pub fn token_at(&self, index: usize) -> Option<&Token> {
        match self.entries.get(index) {
            Some(FormattingEntry::Element { token, .. }) => Some(token),
            _ => None,
        }
    }

    /// "the last element in the list of active formatting elements that: is
    /// between the end of the list and the last marker in the list, if any,
    /// or the start of the list otherwise, and has the tag name `name`"
    #[must_use]
    pub fn last_element_named(&self, name: &str) -> Option<(usize, NodeId)> {
        let after_marker = self.after_last_marker();
        self.entries[after_marker..]
            .iter()
            .enumerate()
            .rev()
            .find_map(|(offset, entry)| match entry {
                FormattingEntry::Element { node, token } if token.tag_name() == Some(name) => {
                    Some((after_marker + offset, *node))
                }
                _ => None,
            })
    }
}

fn same_tag_and_attributes(a: &Token, b: &Token) -> bool {
    match (a, b) {
        (
            Token::StartTag {
                name: name_a,
                attributes: attrs_a,
                ..
            },
            Token::StartTag {
                name: name_b,
                attributes: attrs_b,
                ..
            },
        ) => name_a == name_b && sorted(attrs_a) == sorted(attrs_b),
        _ => false,
    }
}

fn sorted(attributes: &[Attribute]) -> Vec<(&str, &str)> {
    let mut pairs: Vec<_> = attributes
        .iter()
        .map(|a| (a.name.as_str(), a.value.as_str()))
        .collect();
    pairs.sort_unstable();
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, attrs: &[(&str, &str)]) -> Token {
        Token::StartTag {
            name: name.to_string(),
            self_closing: false,
            attributes: attrs
                .iter()
                .map(|&(n, v)| Attribute::new(n.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_noahs_ark_keeps_three() {
        let mut list = ActiveFormattingElements::new();
        for i in 1..=4 {
            list.push(NodeId(i), tag("b", &[("class", "x")]));
        }
        assert_eq!(list.len(), 3);
        assert!(!list.contains(NodeId(1)));
        assert!(list.contains(NodeId(4)));
    }

    #[test]
    fn test_noahs_ark_ignores_attribute_order_and_respects_markers() {
        let mut list = ActiveFormattingElements::new();
        list.push(NodeId(1), tag("i", &[("a", "1"), ("b", "2")]));
        list.push(NodeId(2), tag("i", &[("b", "2"), ("a", "1")]));
        list.push_marker();
        list.push(NodeId(3), tag("i", &[("a", "1"), ("b", "2")]));
        list.push(NodeId(4), tag("i", &[("a", "1"), ("b", "2")]));
        assert_eq!(list.len(), 5);

        list.push(NodeId(5), tag("i", &[("a", "1"), ("b", "2")]));
        list.push(NodeId(6), tag("i", &[("a", "1"), ("b", "2")]));
        assert!(list.contains(NodeId(1)));
        assert!(!list.contains(NodeId(3)));
    }

    #[test]
    fn test_clear_to_last_marker() {
        let mut list = ActiveFormattingElements::new();
        list.push(NodeId(1), tag("b", &[]));
        list.push_marker();
        list.push(NodeId(2), tag("i", &[]));
        list.clear_to_last_marker();
        assert_eq!(list.len(), 1);
        assert_eq!(list.last_element_named("b"), Some((0, NodeId(1))));
    }

    #[test]
    fn test_bookmark_insert_and_replace() {
        let mut list = ActiveFormattingElements::new();
        list.push(NodeId(1), tag("b", &[]));
        list.push(NodeId(2), tag("i", &[]));

        list.insert(1, NodeId(3), tag("u", &[])).expect("bookmark inside the list");
        assert_eq!(list.position(NodeId(3)), Some(1));
        list.insert(3, NodeId(4), tag("s", &[])).expect("bookmark at the end");
        assert_eq!(list.position(NodeId(4)), Some(3));

        list.replace_node(NodeId(1), NodeId(5)).expect("b has an entry");
        assert_eq!(list.last_element_named("b"), Some((0, NodeId(5))));
        list.remove(NodeId(5)).expect("replacement has an entry");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_missing_entry_is_an_error() {
        let mut list = ActiveFormattingElements::new();
        list.push(NodeId(1), tag("b", &[]));
        list.push_marker();

        assert_eq!(list.remove(NodeId(9)), Err(HtmlError::MissingFormattingEntry(9)));
        assert_eq!(
            list.replace_node(NodeId(9), NodeId(10)),
            Err(HtmlError::MissingFormattingEntry(9))
        );
        assert_eq!(
            list.insert(3, NodeId(10), tag("b", &[])),
            Err(HtmlError::InvalidBookmark(3))
        );
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_last_element_named_stops_at_marker() {
        let mut list = ActiveFormattingElements::new();
        list.push(NodeId(1), tag("a", &[]));
        list.push_marker();
        assert_eq!(list.last_element_named("a"), None);
    }
}
