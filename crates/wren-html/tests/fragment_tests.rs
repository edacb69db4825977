//! Integration tests for the fragment parsing algorithm.
//!
//! [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)

use wren_dom::dump::dump_tree;
use wren_dom::{AttributesMap, Namespace, NodeId, NodeType, QuirksMode};
use wren_html::{
    FragmentContext, HtmlError, ParseErrorCode, ParserConfig, parse_document, parse_fragment,
    parse_fragment_with_config,
};

/// Helper to parse `html` inside an HTML element named `context` and dump
/// the resulting nodes
fn dump_in(context: &str, html: &str) -> String {
    let tree = parse_fragment(html, &FragmentContext::new(context)).expect("valid context");
    dump_tree(&tree, NodeId::ROOT)
}

#[test]
fn test_root_is_a_document_fragment() {
    let tree = parse_fragment("<p>x", &FragmentContext::new("div")).expect("valid context");
    assert!(matches!(
        tree.get(tree.root()).map(|n| &n.node_type),
        Some(NodeType::DocumentFragment)
    ));
}

#[test]
fn test_div_context() {
    assert_eq!(
        dump_in("div", "<p>a</p><b>b"),
        "| <p>\n|   \"a\"\n| <b>\n|   \"b\"\n"
    );
}

#[test]
fn test_no_html_head_or_body_is_created() {
    assert_eq!(dump_in("body", "text"), "| \"text\"\n");
}

#[test]
fn test_td_context_elides_nested_table() {
    let tree = parse_fragment("<table>A</table>", &FragmentContext::new("td")).expect("valid");
    let children = tree.children(tree.root());
    assert_eq!(children.len(), 1);
    assert_eq!(tree.as_text(children[0]), Some("A"));
}

#[test]
fn test_td_context_keeps_ordinary_content() {
    assert_eq!(dump_in("td", "<b>x</b>"), "| <b>\n|   \"x\"\n");
}

#[test]
fn test_tr_context() {
    assert_eq!(
        dump_in("tr", "<td>1<td>2"),
        "| <td>\n|   \"1\"\n| <td>\n|   \"2\"\n"
    );
}

#[test]
fn test_table_context_implies_tbody() {
    assert_eq!(
        dump_in("table", "<tr><td>x"),
        "| <tbody>\n|   <tr>\n|     <td>\n|       \"x\"\n"
    );
}

#[test]
fn test_select_context() {
    assert_eq!(
        dump_in("select", "<option>a<option>b<div>"),
        "| <option>\n|   \"a\"\n| <option>\n|   \"b\"\n"
    );
}

#[test]
fn test_template_context() {
    assert_eq!(
        dump_in("template", "<tr><td>x"),
        "| <tr>\n|   <td>\n|     \"x\"\n"
    );
}

#[test]
fn test_rcdata_context() {
    assert_eq!(dump_in("textarea", "<b>x</b>&amp;"), "| \"<b>x</b>&\"\n");
    assert_eq!(dump_in("title", "a<b>"), "| \"a<b>\"\n");
}

#[test]
fn test_rawtext_context() {
    assert_eq!(dump_in("style", "a &amp; <b>"), "| \"a &amp; <b>\"\n");
}

#[test]
fn test_noscript_context_follows_scripting_flag() {
    let context = FragmentContext::new("noscript");
    let on = parse_fragment_with_config("<p>x", &context, ParserConfig::default().with_scripting(true))
        .expect("valid context");
    assert_eq!(dump_tree(&on.tree, NodeId::ROOT), "| \"<p>x\"\n");

    let off = parse_fragment_with_config("<p>x", &context, ParserConfig::default())
        .expect("valid context");
    assert_eq!(dump_tree(&off.tree, NodeId::ROOT), "| <p>\n|   \"x\"\n");
}

#[test]
fn test_svg_context() {
    let context = FragmentContext::in_namespace("svg", Namespace::Svg);
    let tree = parse_fragment("<circle r=\"1\"/><foreignobject>", &context).expect("valid context");
    assert_eq!(
        dump_tree(&tree, NodeId::ROOT),
        "| <svg circle>\n|   r=\"1\"\n| <svg foreignObject>\n"
    );
}

#[test]
fn test_cdata_in_foreign_context() {
    let context = FragmentContext::in_namespace("math", Namespace::MathMl);
    let tree = parse_fragment("<![CDATA[a<b]]>", &context).expect("valid context");
    assert_eq!(dump_tree(&tree, NodeId::ROOT), "| \"a<b\"\n");
}

#[test]
fn test_annotation_xml_encoding_makes_an_integration_point() {
    let mut attrs = AttributesMap::new();
    let _ = attrs.insert("encoding".to_string(), "text/html".to_string());
    let context =
        FragmentContext::in_namespace("annotation-xml", Namespace::MathMl).with_attributes(attrs);
    let tree = parse_fragment("<div>x</div>", &context).expect("valid context");
    assert_eq!(dump_tree(&tree, NodeId::ROOT), "| <div>\n|   \"x\"\n");
}

#[test]
fn test_quirks_context_keeps_table_in_paragraph() {
    let context = FragmentContext::new("div").with_quirks_mode(QuirksMode::Quirks);
    let tree = parse_fragment("<p><table>", &context).expect("valid context");
    assert_eq!(dump_tree(&tree, NodeId::ROOT), "| <p>\n|   <table>\n");

    let tree = parse_fragment("<p><table>", &FragmentContext::new("div")).expect("valid context");
    assert_eq!(dump_tree(&tree, NodeId::ROOT), "| <p>\n| <table>\n");
}

#[test]
fn test_form_ancestor_blocks_nested_form() {
    let context = FragmentContext::new("div").with_form_ancestor(true);
    let tree = parse_fragment("<form><input>", &context).expect("valid context");
    assert_eq!(dump_tree(&tree, NodeId::ROOT), "| <input>\n");

    let tree = parse_fragment("<form><input>", &FragmentContext::new("div")).expect("valid");
    assert_eq!(dump_tree(&tree, NodeId::ROOT), "| <form>\n|   <input>\n");
}

#[test]
fn test_context_from_parsed_document() {
    let document = parse_document("<form><div id=target></div></form>");
    let body = document.body().expect("body");
    let form = document.children(body)[0];
    let div = document.children(form)[0];

    let context = FragmentContext::from_element(&document, div).expect("attached element");
    assert_eq!(context.tag_name(), "div");
    assert_eq!(context.namespace(), Namespace::Html);

    let tree = parse_fragment("<form>x", &context).expect("valid context");
    assert_eq!(dump_tree(&tree, NodeId::ROOT), "| \"x\"\n");
}

#[test]
fn test_context_must_be_an_attached_element() {
    let document = parse_document("<p>x</p>");
    let body = document.body().expect("body");
    let p = document.children(body)[0];
    let text = document.children(p)[0];

    assert_eq!(
        FragmentContext::from_element(&document, text),
        Err(HtmlError::ContextNotElement(text.0))
    );
}

#[test]
fn test_invalid_context_name() {
    assert_eq!(
        parse_fragment("x", &FragmentContext::new("")).err(),
        Some(HtmlError::InvalidContextName(String::new()))
    );
    assert_eq!(
        parse_fragment("x", &FragmentContext::new("a b")).err(),
        Some(HtmlError::InvalidContextName("a b".to_string()))
    );
}

#[test]
fn test_end_html_is_an_error_in_a_fragment() {
    let output = parse_fragment_with_config(
        "x</body></html>y",
        &FragmentContext::new("div"),
        ParserConfig::default(),
    )
    .expect("valid context");
    assert_eq!(dump_tree(&output.tree, NodeId::ROOT), "| \"xy\"\n");
    assert!(
        output
            .issues
            .iter()
            .any(|issue| issue.code == ParseErrorCode::UnexpectedEndTag)
    );
}

#[test]
fn test_fragment_inherits_context_quirks_mode() {
    let context = FragmentContext::new("div").with_quirks_mode(QuirksMode::LimitedQuirks);
    let output = parse_fragment_with_config("<!DOCTYPE html>", &context, ParserConfig::default())
        .expect("valid context");
    assert_eq!(output.quirks_mode, QuirksMode::LimitedQuirks);
    assert!(output.tree.children(output.tree.root()).is_empty());
}
