//! [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
//!
//! "Initially, the stack of open elements is empty. The stack grows downwards;
//! the topmost node on the stack is the first one added to the stack, and the
//! bottommost node of the stack is the most recently added node in the stack."
//!
//! Index 0 is the topmost node (the `html` element). Each entry caches the
//! element's local name and namespace so scope checks never touch the tree.

use wren_dom::{Namespace, NodeId};

use crate::error::HtmlError;

/// One element on the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry {
    /// The element in the tree.
    pub node: NodeId,
    /// Its local name.
    pub tag_name: String,
    /// Its namespace.
    pub namespace: Namespace,
}

impl StackEntry {
    /// Create an entry.
    #[must_use]
    pub fn new(node: NodeId, tag_name: &str, namespace: Namespace) -> Self {
        Self {
            node,
            tag_name: tag_name.to_string(),
            namespace,
        }
    }

    /// An HTML element named `name`.
    #[must_use]
    pub fn is_html(&self, name: &str) -> bool {
        self.namespace == Namespace::Html && self.tag_name == name
    }

    /// An HTML element named one of `names`.
    #[must_use]
    pub fn is_html_one_of(&self, names: &[&str]) -> bool {
        self.namespace == Namespace::Html && names.contains(&self.tag_name.as_str())
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#special)
    ///
    /// "The following elements have varying levels of special parsing rules".
    #[must_use]
    pub fn is_special(&self) -> bool {
        match self.namespace {
            Namespace::Html => SPECIAL_HTML_ELEMENTS.contains(&self.tag_name.as_str()),
            // The foreign members are exactly the foreign scope boundaries.
            Namespace::MathMl | Namespace::Svg => is_default_boundary(self),
        }
    }
}

/// The HTML members of the special category.
const SPECIAL_HTML_ELEMENTS: &[&str] = &[
    "address", "applet", "area", "article", "aside", "base", "basefont", "bgsound",
    "blockquote", "body", "br", "button", "caption", "center", "col", "colgroup", "dd",
    "details", "dir", "div", "dl", "dt", "embed", "fieldset", "figcaption", "figure",
    "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head",
    "header", "hgroup", "hr", "html", "iframe", "img", "input", "keygen", "li", "link",
    "listing", "main", "marquee", "menu", "meta", "nav", "noembed", "noframes", "noscript",
    "object", "ol", "p", "param", "plaintext", "pre", "script", "search", "section",
    "select", "source", "style", "summary", "table", "tbody", "td", "template", "textarea",
    "tfoot", "th", "thead", "title", "tr", "track", "ul", "wbr", "xmp",
];

/// MathML `mi`, `mo`, `mn`, `ms` and `mtext`.
pub(crate) const MATHML_TEXT_INTEGRATION_POINTS: &[&str] = &["mi", "mo", "mn", "ms", "mtext"];

/// SVG `foreignObject`, `desc` and `title`.
pub(crate) const SVG_SCOPE_BOUNDARIES: &[&str] = &["foreignObject", "desc", "title"];

/// HTML elements bounding the default scope.
const DEFAULT_SCOPE_HTML: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
];

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
const IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#generate-all-implied-end-tags-thoroughly)
const IMPLIED_END_TAGS_THOROUGHLY: &[&str] = &[
    "caption", "colgroup", "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt",
    "rtc", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
///
/// Which "has an element in ... scope" variant to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// "has an element in scope"
    Default,
    /// "has an element in list item scope": default plus `ol` and `ul`.
    ListItem,
    /// "has an element in button scope": default plus `button`.
    Button,
    /// "has an element in table scope": `html`, `table` and `template`.
    Table,
    /// "has an element in select scope": every element except `optgroup`
    /// and `option` is a boundary.
    Select,
}

impl Scope {
    fn is_boundary(self, entry: &StackEntry) -> bool {
        match self {
            Self::Default => is_default_boundary(entry),
            Self::ListItem => is_default_boundary(entry) || entry.is_html_one_of(&["ol", "ul"]),
            Self::Button => is_default_boundary(entry) || entry.is_html("button"),
            Self::Table => entry.is_html_one_of(&["html", "table", "template"]),
            Self::Select => !entry.is_html_one_of(&["optgroup", "option"]),
        }
    }
}

fn is_default_boundary(entry: &StackEntry) -> bool {
    match entry.namespace {
        Namespace::Html => DEFAULT_SCOPE_HTML.contains(&entry.tag_name.as_str()),
        Namespace::MathMl => {
            MATHML_TEXT_INTEGRATION_POINTS.contains(&entry.tag_name.as_str())
                || entry.tag_name == "annotation-xml"
        }
        Namespace::Svg => SVG_SCOPE_BOUNDARIES.contains(&entry.tag_name.as_str()),
    }
}

/// The stack of open elements.
#[derive(Debug, Default, Clone)]
pub struct StackOfOpenElements {
    entries: Vec<StackEntry>,
}

impl StackOfOpenElements {
    /// An empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True before the `html` element has been pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from the topmost (`html`) to the current node.
    #[must_use]
    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    /// The entry at `index`, counted from the top.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&StackEntry> {
        self.entries.get(index)
    }

    /// Push onto the stack; the element becomes the current node.
    pub fn push(&mut self, entry: StackEntry) {
        self.entries.push(entry);
    }

    /// Pop the current node.
    pub fn pop(&mut self) -> Option<StackEntry> {
        self.entries.pop()
    }

    /// "The current node is the bottommost node in this stack of open elements."
    #[must_use]
    pub fn current(&self) -> Option<&StackEntry> {
        self.entries.last()
    }

    /// The topmost node, normally the `html` element.
    #[must_use]
    pub fn first(&self) -> Option<&StackEntry> {
        self.entries.first()
    }

    /// True if `node` is on the stack.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.position(node).is_some()
    }

    /// True if an HTML element named `name` is on the stack.
    #[must_use]
    pub fn contains_html(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.is_html(name))
    }

    /// Index of `node`, counted from the top.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.entries.iter().rposition(|e| e.node == node)
    }

    /// Index of the lowest HTML element named `name`.
    #[must_use]
    pub fn last_position_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().rposition(|e| e.is_html(name))
    }

    /// Remove `node` from wherever it is in the stack.
    ///
    /// # Errors
    ///
    /// [`HtmlError::MissingOpenElement`] if `node` is not open.
    pub fn remove(&mut self, node: NodeId) -> Result<(), HtmlError> {
        let index = self.require(node)?;
        let _ = self.entries.remove(index);
        Ok(())
    }

    /// Insert `entry` immediately below `node`, so it becomes the entry
    /// after it.
    ///
    /// # Errors
    ///
    /// [`HtmlError::MissingOpenElement`] if `node` is not open.
    pub fn insert_below(&mut self, node: NodeId, entry: StackEntry) -> Result<(), HtmlError> {
        let index = self.require(node)?;
        self.entries.insert(index + 1, entry);
        Ok(())
    }

    /// Put `entry` in the place of `node`.
    ///
    /// # Errors
    ///
    /// [`HtmlError::MissingOpenElement`] if `node` is not open.
    pub fn replace(&mut self, node: NodeId, entry: StackEntry) -> Result<(), HtmlError> {
        let index = self.require(node)?;
        self.entries[index] = entry;
        Ok(())
    }

    fn require(&self, node: NodeId) -> Result<usize, HtmlError> {
        self.position(node)
            .ok_or(HtmlError::MissingOpenElement(node.0))
    }

    /// Pop entries until `len` remain.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// "Pop elements from the stack of open elements until an HTML element
    /// with the tag name `name` has been popped from the stack."
    ///
    /// Does nothing if no such element is open.
    pub fn pop_until(&mut self, name: &str) {
        if let Some(index) = self.last_position_of(name) {
            self.entries.truncate(index);
        }
    }

    /// Pop until an HTML element with one of `names` has been popped.
    pub fn pop_until_one_of(&mut self, names: &[&str]) {
        if let Some(index) = self.entries.iter().rposition(|e| e.is_html_one_of(names)) {
            self.entries.truncate(index);
        }
    }

    /// Pop until `node` has been popped.
    ///
    /// # Errors
    ///
    /// [`HtmlError::MissingOpenElement`] if `node` is not open; nothing is
    /// popped then.
    pub fn pop_until_node(&mut self, node: NodeId) -> Result<(), HtmlError> {
        let index = self.require(node)?;
        self.entries.truncate(index);
        Ok(())
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "1. Initialize node to be the current node (the bottommost node of the
    /// stack).
    /// 2. If node is the target node, terminate in a match state.
    /// 3. Otherwise, if node is one of the element types in list, terminate in
    /// a failure state.
    /// 4. Otherwise, set node to the previous entry in the stack of open
    /// elements and return to step 2."
    #[must_use]
    pub fn has_in_scope(&self, name: &str, scope: Scope) -> bool {
        self.find_in_scope(|e| e.is_html(name), scope)
    }

    /// Scope check for any of several HTML tag names (the headings).
    #[must_use]
    pub fn has_any_in_scope(&self, names: &[&str], scope: Scope) -> bool {
        self.find_in_scope(|e| e.is_html_one_of(names), scope)
    }

    /// Scope check for a specific element rather than a tag name.
    #[must_use]
    pub fn has_node_in_scope(&self, node: NodeId, scope: Scope) -> bool {
        self.find_in_scope(|e| e.node == node, scope)
    }

    fn find_in_scope(&self, is_target: impl Fn(&StackEntry) -> bool, scope: Scope) -> bool {
        for entry in self.entries.iter().rev() {
            if is_target(entry) {
                return true;
            }
            if scope.is_boundary(entry) {
                return false;
            }
        }
        false
    }

    /// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "While the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an
    /// rp element, an rt element, or an rtc element, the UA must pop the
    /// current node off the stack of open elements."
    ///
    /// `except` names the element the caller is about to close itself.
    pub fn generate_implied_end_tags(&mut self, except: Option<&str>) {
        while let Some(current) = self.current() {
            if !current.is_html_one_of(IMPLIED_END_TAGS) || except.is_some_and(|e| current.is_html(e)) {
                break;
            }
            let _ = self.pop();
        }
    }

    /// [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#generate-all-implied-end-tags-thoroughly)
    pub fn generate_all_implied_end_tags_thoroughly(&mut self) {
        while self
            .current()
            .is_some_and(|current| current.is_html_one_of(IMPLIED_END_TAGS_THOROUGHLY))
        {
            let _ = self.pop();
        }
    }

    /// "Clear the stack back to a table context" and its siblings: pop while
    /// the current node is not one of `names`.
    pub fn clear_back_to(&mut self, names: &[&str]) {
        while self
            .current()
            .is_some_and(|current| !current.is_html_one_of(names))
        {
            let _ = self.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(names: &[(&str, Namespace)]) -> StackOfOpenElements {
        let mut stack = StackOfOpenElements::new();
        for (i, &(name, ns)) in names.iter().enumerate() {
            stack.push(StackEntry::new(NodeId(i + 1), name, ns));
        }
        stack
    }

    fn html_stack(names: &[&str]) -> StackOfOpenElements {
        let with_ns: Vec<_> = names.iter().map(|&n| (n, Namespace::Html)).collect();
        stack_of(&with_ns)
    }

    #[test]
    fn test_default_scope_stops_at_table() {
        let stack = html_stack(&["html", "body", "p", "table", "tr", "td", "span"]);
        assert!(stack.has_in_scope("span", Scope::Default));
        assert!(!stack.has_in_scope("p", Scope::Default));
        assert!(stack.has_in_scope("td", Scope::Table));
        assert!(stack.has_in_scope("table", Scope::Table));
    }

    #[test]
    fn test_button_and_list_item_scopes() {
        let stack = html_stack(&["html", "body", "p", "button", "span"]);
        assert!(stack.has_in_scope("p", Scope::Default));
        assert!(!stack.has_in_scope("p", Scope::Button));

        let stack = html_stack(&["html", "body", "li", "ul", "span"]);
        assert!(stack.has_in_scope("li", Scope::Default));
        assert!(!stack.has_in_scope("li", Scope::ListItem));
    }

    #[test]
    fn test_select_scope_is_inverted() {
        let stack = html_stack(&["html", "body", "select", "optgroup", "option"]);
        assert!(stack.has_in_scope("select", Scope::Select));

        let stack = html_stack(&["html", "body", "select", "div", "option"]);
        assert!(!stack.has_in_scope("select", Scope::Select));
    }

    #[test]
    fn test_foreign_boundaries() {
        let stack = stack_of(&[
            ("html", Namespace::Html),
            ("body", Namespace::Html),
            ("p", Namespace::Html),
            ("svg", Namespace::Svg),
            ("foreignObject", Namespace::Svg),
            ("span", Namespace::Html),
        ]);
        assert!(!stack.has_in_scope("p", Scope::Default));

        // An SVG `title` is a boundary; an HTML `title` target is not matched by it.
        let stack = stack_of(&[
            ("html", Namespace::Html),
            ("body", Namespace::Html),
            ("p", Namespace::Html),
            ("svg", Namespace::Svg),
            ("g", Namespace::Svg),
        ]);
        assert!(stack.has_in_scope("p", Scope::Default));
    }

    #[test]
    fn test_generate_implied_end_tags_respects_exception() {
        let mut stack = html_stack(&["html", "body", "div", "li", "p"]);
        stack.generate_implied_end_tags(Some("li"));
        assert_eq!(stack.current().map(|e| e.tag_name.as_str()), Some("li"));
        stack.generate_implied_end_tags(None);
        assert_eq!(stack.current().map(|e| e.tag_name.as_str()), Some("div"));
    }

    #[test]
    fn test_thorough_variant_closes_table_parts() {
        let mut stack = html_stack(&["html", "body", "table", "tbody", "tr", "td", "p"]);
        stack.generate_all_implied_end_tags_thoroughly();
        assert_eq!(stack.current().map(|e| e.tag_name.as_str()), Some("table"));
    }

    #[test]
    fn test_pop_until_and_clear_back_to() {
        let mut stack = html_stack(&["html", "body", "table", "tbody", "tr", "td"]);
        stack.clear_back_to(&["table", "template", "html"]);
        assert_eq!(stack.len(), 3);
        stack.pop_until("table");
        assert_eq!(stack.len(), 2);
        stack.pop_until("nonexistent");
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_node_operations_on_open_elements() {
        let mut stack = html_stack(&["html", "body", "b", "div"]);
        let b = NodeId(3);
        let div = NodeId(4);

        stack.replace(b, StackEntry::new(NodeId(10), "b", Namespace::Html)).expect("b is open");
        assert_eq!(stack.position(NodeId(10)), Some(2));

        stack.insert_below(div, StackEntry::new(NodeId(11), "i", Namespace::Html)).expect("div is open");
        assert_eq!(stack.current().map(|e| e.node), Some(NodeId(11)));

        stack.remove(div).expect("div is open");
        assert_eq!(stack.len(), 4);

        stack.pop_until_node(NodeId(10)).expect("new b is open");
        assert_eq!(stack.current().map(|e| e.tag_name.as_str()), Some("body"));
    }

    #[test]
    fn test_missing_element_is_an_error() {
        let mut stack = html_stack(&["html", "body", "p"]);
        let gone = NodeId(42);
        let entry = StackEntry::new(NodeId(43), "b", Namespace::Html);

        assert_eq!(stack.remove(gone), Err(HtmlError::MissingOpenElement(42)));
        assert_eq!(stack.replace(gone, entry.clone()), Err(HtmlError::MissingOpenElement(42)));
        assert_eq!(stack.insert_below(gone, entry), Err(HtmlError::MissingOpenElement(42)));
        assert_eq!(stack.pop_until_node(gone), Err(HtmlError::MissingOpenElement(42)));
        // None of the failed calls touched the stack.
        assert_eq!(stack.len(), 3);
    }
}
