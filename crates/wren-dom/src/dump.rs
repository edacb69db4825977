//! Indented one-line-per-node rendering of a tree.
//!
//! The format is the one used by the html5lib tree-construction fixtures:
//!
//! ```text
//! | <!DOCTYPE html>
//! | <html>
//! |   <head>
//! |   <body>
//! |     <p>
//! |       class="x"
//! |       "text"
//! ```
//!
//! Foreign elements carry their namespace prefix (`<svg svg>`, `<math mi>`),
//! attributes are listed sorted under their element, and template contents
//! appear under a `content` line.

use std::fmt::Write;

use crate::{DomTree, Namespace, NodeId, NodeType};

/// Render every child of `id` (not `id` itself).
#[must_use]
pub fn dump_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    for &child in tree.children(id) {
        dump_node(tree, child, 0, &mut out);
    }
    out
}

fn dump_node(tree: &DomTree, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    match &node.node_type {
        NodeType::Document | NodeType::DocumentFragment => {
            for &child in tree.children(id) {
                dump_node(tree, child, depth, out);
            }
        }
        NodeType::Doctype(doctype) => {
            let _ = write!(out, "| {indent}<!DOCTYPE {}", doctype.name);
            if !doctype.public_id.is_empty() || !doctype.system_id.is_empty() {
                let _ = write!(out, " \"{}\" \"{}\"", doctype.public_id, doctype.system_id);
            }
            out.push_str(">\n");
        }
        NodeType::Comment(data) => {
            let _ = writeln!(out, "| {indent}<!-- {data} -->");
        }
        NodeType::Text(data) => {
            let _ = writeln!(out, "| {indent}\"{data}\"");
        }
        NodeType::Element(element) => {
            match element.namespace {
                Namespace::Html => {
                    let _ = writeln!(out, "| {indent}<{}>", element.tag_name);
                }
                ns => {
                    let _ = writeln!(out, "| {indent}<{ns} {}>", element.tag_name);
                }
            }
            let attr_indent = "  ".repeat(depth + 1);
            for (name, value) in &element.attrs {
                let _ = writeln!(out, "| {attr_indent}{name}=\"{value}\"");
            }
            if let Some(contents) = element.template_contents {
                let _ = writeln!(out, "| {attr_indent}content");
                for &child in tree.children(contents) {
                    dump_node(tree, child, depth + 2, out);
                }
            }
            for &child in tree.children(id) {
                dump_node(tree, child, depth + 1, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AttributesMap;

    #[test]
    fn test_dump_nests_and_lists_attributes() {
        let mut tree = DomTree::new();
        let doctype = tree.create_doctype("html", "", "");
        tree.append_child(NodeId::ROOT, doctype);
        let mut attrs = AttributesMap::new();
        let _ = attrs.insert("id".to_string(), "main".to_string());
        let div = tree.create_element("div", Namespace::Html, attrs);
        tree.append_child(NodeId::ROOT, div);
        let svg = tree.create_element("svg", Namespace::Svg, AttributesMap::new());
        tree.append_child(div, svg);
        let text = tree.create_text("hi");
        tree.append_child(div, text);

        assert_eq!(
            dump_tree(&tree, NodeId::ROOT),
            "| <!DOCTYPE html>\n| <div>\n|   id=\"main\"\n|   <svg svg>\n|   \"hi\"\n"
        );
    }
}
