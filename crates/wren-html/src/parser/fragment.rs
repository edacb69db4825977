//! [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
//!
//! "The following steps form the HTML fragment parsing algorithm. The
//! algorithm takes as input an Element node, referred to as the context
//! element, which gives the context for the parser, as well as input, a string
//! to parse."
//!
//! The context element never becomes part of the output. It is recreated
//! detached inside the output tree so the tree builder can inspect it, and
//! the parsed nodes end up as children of a `DocumentFragment` root.

use tracing::debug;
use wren_dom::{AttributesMap, DomTree, Namespace, NodeId, NodeType, QuirksMode};

use super::core::{HTMLParser, InsertionMode};
use super::open_elements::StackEntry;
use crate::config::ParserConfig;
use crate::error::HtmlError;
use crate::tokenizer::TokenizerState;

/// The element a fragment is parsed "inside of".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentContext {
    tag_name: String,
    namespace: Namespace,
    attributes: AttributesMap,
    quirks_mode: QuirksMode,
    form_ancestor: bool,
}

impl FragmentContext {
    /// An HTML context element named `tag_name`, as for `innerHTML` on a
    /// no-quirks document.
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        Self::in_namespace(tag_name, Namespace::Html)
    }

    /// A context element in `namespace`, such as an SVG `foreignObject`.
    #[must_use]
    pub fn in_namespace(tag_name: &str, namespace: Namespace) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            namespace,
            attributes: AttributesMap::new(),
            quirks_mode: QuirksMode::NoQuirks,
            form_ancestor: false,
        }
    }

    /// The quirks mode of the document the context element belongs to.
    #[must_use]
    pub const fn with_quirks_mode(mut self, mode: QuirksMode) -> Self {
        self.quirks_mode = mode;
        self
    }

    /// Whether the context element is, or sits inside, a `form`.
    #[must_use]
    pub const fn with_form_ancestor(mut self, form_ancestor: bool) -> Self {
        self.form_ancestor = form_ancestor;
        self
    }

    /// Attributes of the context element. Only a MathML `annotation-xml`
    /// context looks at them, for its `encoding`.
    #[must_use]
    pub fn with_attributes(mut self, attributes: AttributesMap) -> Self {
        self.attributes = attributes;
        self
    }

    /// Describe `node` in `tree` as a fragment context.
    ///
    /// # Errors
    ///
    /// [`HtmlError::ContextNotElement`] if `node` is not an element, and
    /// [`HtmlError::DetachedContext`] if it is not inside a document or
    /// fragment.
    pub fn from_element(tree: &DomTree, node: NodeId) -> Result<Self, HtmlError> {
        let element = tree
            .as_element(node)
            .ok_or(HtmlError::ContextNotElement(node.0))?;

        let top = tree.ancestors(node).last();
        let attached = top
            .and_then(|top| tree.get(top))
            .is_some_and(|n| {
                matches!(
                    n.node_type,
                    NodeType::Document | NodeType::DocumentFragment
                )
            });
        if !attached {
            return Err(HtmlError::DetachedContext(node.0));
        }

        // "the nearest node to the context element that is a form element
        // (going straight up the ancestor chain, and including the element
        // itself, if it is a form element)"
        let form_ancestor = std::iter::once(node)
            .chain(tree.ancestors(node))
            .any(|id| tree.as_element(id).is_some_and(|e| e.is_html("form")));

        Ok(Self {
            tag_name: element.tag_name.clone(),
            namespace: element.namespace,
            attributes: element.attrs.clone(),
            quirks_mode: tree.quirks_mode(),
            form_ancestor,
        })
    }

    /// The context element's local name.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// The context element's namespace.
    #[must_use]
    pub const fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// False for a name no tag could have: empty, or containing whitespace, `/` or `>`.
    fn has_valid_name(&self) -> bool {
        !self.tag_name.is_empty()
            && !self
                .tag_name
                .chars()
                .any(|c| HTMLParser::is_whitespace(c) || c == '/' || c == '>')
    }

    /// [§ 13.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// "Set the state of the HTML parser's tokenization stage as follows,
    /// switching on the context element"
    fn tokenizer_state(&self, scripting: bool) -> TokenizerState {
        if self.namespace != Namespace::Html {
            return TokenizerState::Data;
        }
        match self.tag_name.as_str() {
            "title" | "textarea" => TokenizerState::RCDATA,
            "style" | "xmp" | "iframe" | "noembed" | "noframes" => TokenizerState::RAWTEXT,
            "script" => TokenizerState::ScriptData,
            "noscript" if scripting => TokenizerState::RAWTEXT,
            "plaintext" => TokenizerState::PLAINTEXT,
            _ => TokenizerState::Data,
        }
    }
}

impl HTMLParser {
    /// Create a parser for the fragment parsing algorithm.
    ///
    /// # Errors
    ///
    /// [`HtmlError::InvalidContextName`] if the context's tag name could not
    /// come from markup.
    pub fn new_fragment(config: ParserConfig, context: &FragmentContext) -> Result<Self, HtmlError> {
        if !context.has_valid_name() {
            return Err(HtmlError::InvalidContextName(context.tag_name.clone()));
        }

        // STEP 1-3: "Create a new Document node, and mark it as being an HTML
        //            document." "If the node document of the context element
        //            is in quirks mode, then let the Document be in quirks
        //            mode. Otherwise, ... limited-quirks mode ..."
        let mut tree = DomTree::new_fragment();
        tree.set_quirks_mode(context.quirks_mode);
        let mut parser = Self::with_tree(config, tree);

        // STEP 5: "Set the state of the HTML parser's tokenization stage as
        //          follows, switching on the context element"
        parser
            .tokenizer
            .switch_to(context.tokenizer_state(config.scripting));

        // STEP 6-8: "Let root be the result of creating an html element..."
        //           "Append root to the Document node created above."
        //           "Set up the parser's stack of open elements so that it
        //           contains just the single element root."
        let html = parser
            .tree
            .create_element("html", Namespace::Html, AttributesMap::new());
        let root = parser.tree.root();
        parser.tree.append_child(root, html);
        parser
            .stack
            .push(StackEntry::new(html, "html", Namespace::Html));

        let context_element = parser.tree.create_element(
            &context.tag_name,
            context.namespace,
            context.attributes.clone(),
        );
        parser.fragment_context = Some(StackEntry::new(
            context_element,
            &context.tag_name,
            context.namespace,
        ));

        // STEP 9: "If the context element is a template element, then push "in
        //          template" onto the stack of template insertion modes so that
        //          it is the new current template insertion mode."
        if context.namespace == Namespace::Html && context.tag_name == "template" {
            parser.template_insertion_modes.push(InsertionMode::InTemplate);
        }

        // STEP 11: "Reset the parser's insertion mode appropriately."
        parser.reset_insertion_mode_appropriately();

        // STEP 12: "Set the parser's form element pointer to the nearest node
        //           to the context element that is a form element..."
        if context.form_ancestor {
            let form = parser
                .tree
                .create_element("form", Namespace::Html, AttributesMap::new());
            parser.form_element_pointer = Some(form);
        }

        debug!(
            context = %context.tag_name,
            namespace = %context.namespace,
            mode = %parser.insertion_mode,
            "fragment parser created"
        );
        Ok(parser)
    }

    /// STEP 15: "Return root's children, in tree order."
    ///
    /// The children move up to the fragment root and the synthetic `html`
    /// element is detached. Does nothing for a document parse.
    pub(super) fn finish_fragment(&mut self) {
        if self.fragment_context.is_none() {
            return;
        }
        let root = self.tree.root();
        let Some(html) = self.tree.first_child(root) else {
            return;
        };
        self.tree.move_children(html, root);
        self.tree.detach(html);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_names_that_no_tag_could_have() {
        assert!(FragmentContext::new("div").has_valid_name());
        assert!(FragmentContext::new("annotation-xml").has_valid_name());
        assert!(!FragmentContext::new("").has_valid_name());
        assert!(!FragmentContext::new("a b").has_valid_name());
        assert!(!FragmentContext::new("a/").has_valid_name());
        assert!(!FragmentContext::new("a>").has_valid_name());
    }

    #[test]
    fn test_tokenizer_state_follows_context() {
        assert_eq!(
            FragmentContext::new("textarea").tokenizer_state(false),
            TokenizerState::RCDATA
        );
        assert_eq!(
            FragmentContext::new("noscript").tokenizer_state(true),
            TokenizerState::RAWTEXT
        );
        assert_eq!(
            FragmentContext::new("noscript").tokenizer_state(false),
            TokenizerState::Data
        );
        assert_eq!(
            FragmentContext::in_namespace("title", Namespace::Svg).tokenizer_state(false),
            TokenizerState::Data
        );
    }

    #[test]
    fn test_from_element_checks_the_node() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let form = tree.create_element("form", Namespace::Html, AttributesMap::new());
        let div = tree.create_element("div", Namespace::Html, AttributesMap::new());
        tree.append_child(root, form);
        tree.append_child(form, div);

        let context = FragmentContext::from_element(&tree, div).expect("attached element");
        assert_eq!(context.tag_name(), "div");
        assert!(context.form_ancestor);

        let text = tree.create_text("x");
        tree.append_child(div, text);
        assert_eq!(
            FragmentContext::from_element(&tree, text),
            Err(HtmlError::ContextNotElement(text.0))
        );

        let loose = tree.create_element("p", Namespace::Html, AttributesMap::new());
        assert_eq!(
            FragmentContext::from_element(&tree, loose),
            Err(HtmlError::DetachedContext(loose.0))
        );
    }
}
