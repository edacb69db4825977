//! JSON rendering of a parsed tree.

use std::collections::BTreeMap;

use serde::Serialize;
use wren_dom::{DomTree, NodeId, NodeType};

/// One node and its subtree, shaped for `serde_json`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum JsonNode {
    /// The root of a document parse.
    Document {
        quirks_mode: String,
        children: Vec<JsonNode>,
    },
    /// The root of a fragment parse, or template contents.
    Fragment { children: Vec<JsonNode> },
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    Element {
        tag_name: String,
        namespace: String,
        attributes: BTreeMap<String, String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<Box<JsonNode>>,
        children: Vec<JsonNode>,
    },
    Text { content: String },
    Comment { content: String },
}

impl JsonNode {
    /// Convert `id` and everything under it.
    ///
    /// Returns `None` for an id that is not in the tree.
    pub fn from_tree(tree: &DomTree, id: NodeId) -> Option<Self> {
        let node = tree.get(id)?;
        let children = || {
            tree.children(id)
                .iter()
                .filter_map(|&child| Self::from_tree(tree, child))
                .collect()
        };

        Some(match &node.node_type {
            NodeType::Document => Self::Document {
                quirks_mode: tree.quirks_mode().to_string(),
                children: children(),
            },
            NodeType::DocumentFragment => Self::Fragment {
                children: children(),
            },
            NodeType::Doctype(doctype) => Self::Doctype {
                name: doctype.name.clone(),
                public_id: doctype.public_id.clone(),
                system_id: doctype.system_id.clone(),
            },
            NodeType::Element(element) => Self::Element {
                tag_name: element.tag_name.clone(),
                namespace: element.namespace.url().to_string(),
                attributes: element.attrs.clone(),
                content: element
                    .template_contents
                    .and_then(|contents| Self::from_tree(tree, contents))
                    .map(Box::new),
                children: children(),
            },
            NodeType::Text(data) => Self::Text {
                content: data.clone(),
            },
            NodeType::Comment(data) => Self::Comment {
                content: data.clone(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wren_html::parse_document;

    #[test]
    fn test_document_json_shape() {
        let tree = parse_document("<!DOCTYPE html><p class=x>hi<!--c-->");
        let json = JsonNode::from_tree(&tree, tree.root()).expect("root");
        let value = serde_json::to_value(&json).expect("serializable");

        assert_eq!(value["type"], "document");
        assert_eq!(value["quirksMode"], "no-quirks");
        assert_eq!(value["children"][0]["type"], "doctype");

        let body = &value["children"][1]["children"][1];
        assert_eq!(body["tagName"], "body");
        let p = &body["children"][0];
        assert_eq!(p["namespace"], "http://www.w3.org/1999/xhtml");
        assert_eq!(p["attributes"]["class"], "x");
        assert_eq!(p["children"][0]["content"], "hi");
        assert_eq!(p["children"][1]["type"], "comment");
        assert!(p.get("content").is_none());
    }

    #[test]
    fn test_template_contents_are_included() {
        let tree = parse_document("<template><b>x</b></template>");
        let json = JsonNode::from_tree(&tree, tree.root()).expect("root");
        let value = serde_json::to_value(&json).expect("serializable");

        let template = &value["children"][0]["children"][0]["children"][0];
        assert_eq!(template["tagName"], "template");
        assert_eq!(template["content"]["type"], "fragment");
        assert_eq!(template["content"]["children"][0]["tagName"], "b");
        assert_eq!(template["children"], serde_json::json!([]));
    }
}
