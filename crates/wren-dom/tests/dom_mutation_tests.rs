//! Tree mutations as the HTML tree builder performs them: building a
//! document, moving children between elements, foster parenting before a
//! table, and keeping template contents out of the main tree.

use wren_dom::{AttributesMap, DomTree, Namespace, NodeId, NodeType};

/// Helper to create a detached HTML element with no attributes
fn html_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.create_element(tag, Namespace::Html, AttributesMap::new())
}

/// Helper to build `#document > html > (head, body)` and return `(html, body)`
fn skeleton(tree: &mut DomTree) -> (NodeId, NodeId) {
    let html = html_element(tree, "html");
    let head = html_element(tree, "head");
    let body = html_element(tree, "body");
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, head);
    tree.append_child(html, body);
    (html, body)
}

/// Helper to list the tag names of `parent`'s element children
fn child_tags(tree: &DomTree, parent: NodeId) -> Vec<String> {
    tree.children(parent)
        .iter()
        .filter_map(|&id| tree.as_element(id))
        .map(|e| e.tag_name.clone())
        .collect()
}

// ========== Document shape ==========

#[test]
fn test_document_element_skips_doctype_and_comments() {
    let mut tree = DomTree::new();
    let doctype = tree.create_doctype("html", "", "");
    let comment = tree.create_comment("before html");
    tree.append_child(NodeId::ROOT, doctype);
    tree.append_child(NodeId::ROOT, comment);
    let (html, body) = skeleton(&mut tree);

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.body(), Some(body));
    assert_eq!(tree.children(NodeId::ROOT), &[doctype, comment, html]);
}

#[test]
fn test_frameset_counts_as_body_once_body_is_detached() {
    let mut tree = DomTree::new();
    let (html, body) = skeleton(&mut tree);
    let frameset = html_element(&mut tree, "frameset");

    tree.detach(body);
    tree.append_child(html, frameset);

    assert_eq!(tree.parent(body), None);
    assert_eq!(tree.body(), Some(frameset));
    assert_eq!(child_tags(&tree, html), ["head", "frameset"]);
}

#[test]
fn test_fragment_root_has_no_body() {
    let mut tree = DomTree::new_fragment();
    let p = html_element(&mut tree, "p");
    tree.append_child(tree.root(), p);

    assert!(matches!(
        tree.get(tree.root()).map(|n| &n.node_type),
        Some(NodeType::DocumentFragment)
    ));
    assert_eq!(tree.document_element(), Some(p));
    assert_eq!(tree.body(), None);
}

// ========== Namespaces ==========

#[test]
fn test_same_local_name_in_different_namespaces() {
    let mut tree = DomTree::new();
    let (_, body) = skeleton(&mut tree);
    let svg = tree.create_element("svg", Namespace::Svg, AttributesMap::new());
    let svg_title = tree.create_element("title", Namespace::Svg, AttributesMap::new());
    let math = tree.create_element("math", Namespace::MathMl, AttributesMap::new());
    tree.append_child(body, svg);
    tree.append_child(svg, svg_title);
    tree.append_child(body, math);

    let title = tree.as_element(svg_title).expect("element");
    assert_eq!(title.tag_name, "title");
    assert!(!title.is_html("title"));
    assert_eq!(title.namespace.to_string(), "svg");
    assert_eq!(
        tree.as_element(math).map(|e| e.namespace),
        Some(Namespace::MathMl)
    );
}

#[test]
fn test_only_html_template_gets_contents() {
    let mut tree = DomTree::new();
    let html_template = html_element(&mut tree, "template");
    let svg_template = tree.create_element("template", Namespace::Svg, AttributesMap::new());

    assert!(tree.template_contents(html_template).is_some());
    assert_eq!(tree.template_contents(svg_template), None);
}

#[test]
fn test_attributes_are_kept_in_name_order() {
    let mut tree = DomTree::new();
    let mut attrs = AttributesMap::new();
    attrs.insert("id".into(), "main".into());
    attrs.insert("class".into(), "wide".into());
    let div = tree.create_element("div", Namespace::Html, attrs);

    let element = tree.as_element(div).expect("element");
    assert_eq!(element.get_attribute("id"), Some("main"));
    assert_eq!(element.get_attribute("style"), None);
    let names: Vec<&str> = element.attrs.keys().map(String::as_str).collect();
    assert_eq!(names, ["class", "id"]);
}

// ========== Template contents ==========

#[test]
fn test_template_contents_stay_out_of_the_main_tree() {
    let mut tree = DomTree::new();
    let (_, body) = skeleton(&mut tree);
    let template = html_element(&mut tree, "template");
    tree.append_child(body, template);
    let contents = tree.template_contents(template).expect("html template");

    let td = html_element(&mut tree, "td");
    let text = tree.create_text("cell");
    tree.append_child(contents, td);
    tree.append_child(td, text);

    assert!(tree.children(template).is_empty());
    assert_eq!(tree.parent(contents), None);
    assert_eq!(tree.text_content(body), "");
    assert_eq!(tree.text_content(contents), "cell");
    assert_eq!(tree.ancestors(text).collect::<Vec<_>>(), [td, contents]);
}

// ========== Moving children ==========

#[test]
fn test_move_children_into_a_formatting_clone() {
    // <b><div>1<i>2</i>3</div></b>: the div's children move into a new b
    // that is then appended to the div.
    let mut tree = DomTree::new();
    let (_, body) = skeleton(&mut tree);
    let b = html_element(&mut tree, "b");
    let div = html_element(&mut tree, "div");
    tree.append_child(body, b);
    tree.append_child(b, div);
    let one = tree.create_text("1");
    let i = html_element(&mut tree, "i");
    let two = tree.create_text("2");
    let three = tree.create_text("3");
    tree.append_child(div, one);
    tree.append_child(div, i);
    tree.append_child(i, two);
    tree.append_child(div, three);

    tree.append_child(body, div);
    let clone = html_element(&mut tree, "b");
    tree.move_children(div, clone);
    tree.append_child(div, clone);

    assert!(tree.children(b).is_empty());
    assert_eq!(tree.children(body), &[b, div]);
    assert_eq!(tree.children(div), &[clone]);
    assert_eq!(tree.children(clone), &[one, i, three]);
    assert_eq!(tree.parent(one), Some(clone));
    assert_eq!(tree.prev_sibling(i), Some(one));
    assert_eq!(tree.next_sibling(i), Some(three));
    assert_eq!(tree.text_content(body), "123");
}

#[test]
fn test_move_children_appends_after_existing_children() {
    let mut tree = DomTree::new_fragment();
    let html = html_element(&mut tree, "html");
    tree.append_child(tree.root(), html);
    let p = html_element(&mut tree, "p");
    let span = html_element(&mut tree, "span");
    tree.append_child(html, p);
    tree.append_child(html, span);

    let root = tree.root();
    tree.move_children(html, root);
    tree.detach(html);

    assert_eq!(tree.children(root), &[p, span]);
    assert_eq!(tree.next_sibling(p), Some(span));
    assert_eq!(tree.parent(html), None);
}

#[test]
fn test_move_children_of_empty_element() {
    let mut tree = DomTree::new();
    let (_, body) = skeleton(&mut tree);
    let empty = html_element(&mut tree, "div");
    let text = tree.create_text("kept");
    tree.append_child(body, text);

    tree.move_children(empty, body);

    assert_eq!(tree.children(body), &[text]);
}

// ========== Foster parenting ==========

#[test]
fn test_insert_before_table_fosters_content() {
    let mut tree = DomTree::new();
    let (_, body) = skeleton(&mut tree);
    let before = tree.create_text("a");
    let table = html_element(&mut tree, "table");
    tree.append_child(body, before);
    tree.append_child(body, table);

    let fostered = html_element(&mut tree, "div");
    tree.insert_before(body, fostered, table);

    assert_eq!(tree.children(body), &[before, fostered, table]);
    assert_eq!(tree.next_sibling(before), Some(fostered));
    assert_eq!(tree.prev_sibling(table), Some(fostered));
    assert_eq!(tree.next_sibling(fostered), Some(table));
}

#[test]
fn test_insert_before_moves_a_node_out_of_its_old_parent() {
    let mut tree = DomTree::new();
    let (_, body) = skeleton(&mut tree);
    let table = html_element(&mut tree, "table");
    let tr = html_element(&mut tree, "tr");
    let td = html_element(&mut tree, "td");
    tree.append_child(body, table);
    tree.append_child(table, tr);
    tree.append_child(tr, td);

    tree.insert_before(body, td, table);

    assert!(tree.children(tr).is_empty());
    assert_eq!(child_tags(&tree, body), ["td", "table"]);
    assert_eq!(tree.parent(td), Some(body));
}

#[test]
fn test_insert_before_foreign_reference_appends() {
    let mut tree = DomTree::new();
    let (_, body) = skeleton(&mut tree);
    let table = html_element(&mut tree, "table");
    let elsewhere = html_element(&mut tree, "p");
    tree.append_child(body, table);

    let node = tree.create_comment("x");
    tree.insert_before(body, node, elsewhere);

    assert_eq!(tree.children(body), &[table, node]);
    assert_eq!(tree.prev_sibling(node), Some(table));
}

// ========== Removal ==========

#[test]
fn test_remove_child_ignores_non_children() {
    let mut tree = DomTree::new();
    let (html, body) = skeleton(&mut tree);
    let p = html_element(&mut tree, "p");
    tree.append_child(body, p);

    tree.remove_child(html, p);
    assert_eq!(tree.parent(p), Some(body));

    tree.remove_child(body, p);
    assert_eq!(tree.parent(p), None);
    assert!(tree.children(body).is_empty());
}

#[test]
fn test_detached_subtree_keeps_its_own_children() {
    let mut tree = DomTree::new();
    let (_, body) = skeleton(&mut tree);
    let ul = html_element(&mut tree, "ul");
    let first = html_element(&mut tree, "li");
    let second = html_element(&mut tree, "li");
    tree.append_child(body, ul);
    tree.append_child(ul, first);
    tree.append_child(ul, second);

    tree.detach(ul);
    tree.detach(ul);

    assert!(tree.children(body).is_empty());
    assert_eq!(tree.children(ul), &[first, second]);
    assert_eq!(tree.ancestors(second).collect::<Vec<_>>(), [ul]);
}
