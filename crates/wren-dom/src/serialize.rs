//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
//!
//! Turns a subtree back into markup. Parsing the output again yields an
//! equivalent tree for any tree the parser produced.

use crate::{DomTree, Namespace, NodeId, NodeType};

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// Void elements plus the legacy ones the serializer also treats as void.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// "If the parent of current node is a style, script, xmp, iframe, noembed,
/// noframes, or plaintext element, or if the parent of current node is a
/// noscript element and scripting is enabled for the node..."
const RAW_TEXT_PARENTS: &[&str] = &[
    "style",
    "script",
    "xmp",
    "iframe",
    "noembed",
    "noframes",
    "plaintext",
];

/// Serialize the children of `id`, like `innerHTML`.
#[must_use]
pub fn serialize_children(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    let parent = tree.template_contents(id).unwrap_or(id);
    for &child in tree.children(parent) {
        serialize_node_into(tree, child, &mut out);
    }
    out
}

/// Serialize `id` itself and its subtree, like `outerHTML`.
#[must_use]
pub fn serialize_node(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    serialize_node_into(tree, id, &mut out);
    out
}

fn serialize_node_into(tree: &DomTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Document | NodeType::DocumentFragment => {
            for &child in tree.children(id) {
                serialize_node_into(tree, child, out);
            }
        }
        NodeType::Doctype(doctype) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(&doctype.name);
            out.push('>');
        }
        NodeType::Comment(data) => {
            out.push_str("<!--");
            out.push_str(data);
            out.push_str("-->");
        }
        NodeType::Text(data) => {
            let raw_parent = tree
                .parent(id)
                .and_then(|p| tree.as_element(p))
                .is_some_and(|e| {
                    e.namespace == Namespace::Html && RAW_TEXT_PARENTS.contains(&e.tag_name.as_str())
                });
            if raw_parent {
                out.push_str(data);
            } else {
                escape_into(data, false, out);
            }
        }
        NodeType::Element(element) => {
            out.push('<');
            out.push_str(&element.tag_name);
            for (name, value) in &element.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            out.push('>');

            let is_html = element.namespace == Namespace::Html;
            if is_html && VOID_ELEMENTS.contains(&element.tag_name.as_str()) {
                return;
            }

            // "If current node is a pre, textarea, or listing element, and the
            // first child node of the element, if any, is a Text node whose
            // character data has as its first character a U+000A LINE FEED
            // (LF) character, then append a U+000A LINE FEED (LF) character."
            if is_html
                && matches!(element.tag_name.as_str(), "pre" | "textarea" | "listing")
                && tree
                    .first_child(id)
                    .and_then(|c| tree.as_text(c))
                    .is_some_and(|t| t.starts_with('\n'))
            {
                out.push('\n');
            }

            out.push_str(&serialize_children(tree, id));
            out.push_str("</");
            out.push_str(&element.tag_name);
            out.push('>');
        }
    }
}

/// [§ 13.3 Escaping a string](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
fn escape_into(text: &str, attribute_mode: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            '"' if attribute_mode => out.push_str("&quot;"),
            '<' if !attribute_mode => out.push_str("&lt;"),
            '>' if !attribute_mode => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AttributesMap;

    #[test]
    fn test_escapes_text_and_attributes() {
        let mut tree = DomTree::new();
        let mut attrs = AttributesMap::new();
        let _ = attrs.insert("title".to_string(), "a \"b\" & <c>".to_string());
        let p = tree.create_element("p", Namespace::Html, attrs);
        tree.append_child(NodeId::ROOT, p);
        let text = tree.create_text("1 < 2 & 3");
        tree.append_child(p, text);

        assert_eq!(
            serialize_node(&tree, p),
            "<p title=\"a &quot;b&quot; &amp; <c>\">1 &lt; 2 &amp; 3</p>"
        );
    }

    #[test]
    fn test_void_and_raw_text_elements() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div", Namespace::Html, AttributesMap::new());
        let br = tree.create_element("br", Namespace::Html, AttributesMap::new());
        let script = tree.create_element("script", Namespace::Html, AttributesMap::new());
        let code = tree.create_text("if (a < b) {}");
        tree.append_child(NodeId::ROOT, div);
        tree.append_child(div, br);
        tree.append_child(div, script);
        tree.append_child(script, code);

        assert_eq!(
            serialize_children(&tree, div),
            "<br><script>if (a < b) {}</script>"
        );
    }

    #[test]
    fn test_pre_leading_newline_is_doubled() {
        let mut tree = DomTree::new();
        let pre = tree.create_element("pre", Namespace::Html, AttributesMap::new());
        let text = tree.create_text("\nbody");
        tree.append_child(NodeId::ROOT, pre);
        tree.append_child(pre, text);

        assert_eq!(serialize_node(&tree, pre), "<pre>\n\nbody</pre>");
    }
}
