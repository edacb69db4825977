//! Integration tests for the HTML parser.
//!
//! Most tests compare against the html5lib tree dump produced by
//! [`wren_dom::dump::dump_tree`].

use wren_dom::dump::dump_tree;
use wren_dom::{DomTree, NodeId, NodeType, QuirksMode};
use wren_html::{ParseErrorCode, ParserConfig, parse_document, parse_document_with_config};

/// Helper to parse HTML and return the DOM tree
fn parse(html: &str) -> DomTree {
    parse_document(html)
}

/// Helper to parse HTML and render the whole document as a tree dump
fn dump(html: &str) -> String {
    dump_tree(&parse(html), NodeId::ROOT)
}

/// Helper to collect the error codes a document produces
fn errors(html: &str) -> Vec<ParseErrorCode> {
    parse_document_with_config(html, ParserConfig::default())
        .issues
        .into_iter()
        .map(|issue| issue.code)
        .collect()
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if tree.as_element(from).is_some_and(|e| e.tag_name == tag) {
        return Some(from);
    }
    tree.children(from)
        .iter()
        .find_map(|&child| find_element(tree, child, tag))
}

/// Helper to find all elements with a given tag name under a subtree
fn find_all_elements(tree: &DomTree, from: NodeId, tag: &str) -> Vec<NodeId> {
    let mut result = Vec::new();
    if tree.as_element(from).is_some_and(|e| e.tag_name == tag) {
        result.push(from);
    }
    for &child in tree.children(from) {
        result.extend(find_all_elements(tree, child, tag));
    }
    result
}

fn text_of(tree: &DomTree, id: NodeId) -> String {
    tree.text_content(id)
}

// ========== Document structure ==========

#[test]
fn test_document_structure() {
    assert_eq!(
        dump("<!DOCTYPE html><html><head></head><body></body></html>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n"
    );
}

#[test]
fn test_implied_html_head_body() {
    assert_eq!(
        dump("<p>Hello <b>world</b>"),
        "| <html>\n|   <head>\n|   <body>\n|     <p>\n|       \"Hello \"\n|       <b>\n|         \"world\"\n"
    );
}

#[test]
fn test_empty_input_still_builds_skeleton() {
    assert_eq!(dump(""), "| <html>\n|   <head>\n|   <body>\n");
}

#[test]
fn test_comments_around_the_document() {
    assert_eq!(
        dump("<!--a--><html></html><!--b-->"),
        "| <!-- a -->\n| <html>\n|   <head>\n|   <body>\n| <!-- b -->\n"
    );
}

#[test]
fn test_text_is_merged_into_one_node() {
    let tree = parse("A&amp;B");
    let body = tree.body().expect("body");
    assert_eq!(tree.children(body).len(), 1);
    assert_eq!(tree.as_text(tree.children(body)[0]), Some("A&B"));
}

#[test]
fn test_whitespace_before_html_is_dropped() {
    assert_eq!(dump("  \n<html>"), "| <html>\n|   <head>\n|   <body>\n");
}

#[test]
fn test_null_characters_in_body_are_dropped() {
    let tree = parse("a\0b");
    assert_eq!(text_of(&tree, tree.body().expect("body")), "ab");
}

#[test]
fn test_attributes_on_repeated_html_and_body_are_merged() {
    let tree = parse(r#"<body id="a"><body id="b" class="c">"#);
    let body = tree.as_element(tree.body().expect("body")).expect("element");
    assert_eq!(body.get_attribute("id"), Some("a"));
    assert_eq!(body.get_attribute("class"), Some("c"));
}

// ========== Head ==========

#[test]
fn test_head_elements() {
    assert_eq!(
        dump("<meta charset=utf-8><title>T</title><link rel=icon>"),
        "| <html>\n|   <head>\n|     <meta>\n|       charset=\"utf-8\"\n|     <title>\n|       \"T\"\n|     <link>\n|       rel=\"icon\"\n|   <body>\n"
    );
}

#[test]
fn test_title_content_preserved() {
    let tree = parse("<title>My <test> &amp; Title</title>");
    let title = find_element(&tree, NodeId::ROOT, "title").expect("title");
    assert_eq!(text_of(&tree, title), "My <test> & Title");
}

#[test]
fn test_style_element_content_preserved() {
    let tree = parse("<style><div>not a tag</div> &amp;</style>");
    let style = find_element(&tree, NodeId::ROOT, "style").expect("style");
    assert_eq!(text_of(&tree, style), "<div>not a tag</div> &amp;");
    assert!(find_element(&tree, NodeId::ROOT, "div").is_none());
}

#[test]
fn test_script_content_preserved() {
    let tree = parse("<script>if (a < b && c) { x = '</p>'; }</script>");
    let script = find_element(&tree, NodeId::ROOT, "script").expect("script");
    assert_eq!(text_of(&tree, script), "if (a < b && c) { x = '</p>'; }");
}

#[test]
fn test_text_after_head_element_opens_body() {
    assert_eq!(
        dump("<title>T</title>x"),
        "| <html>\n|   <head>\n|     <title>\n|       \"T\"\n|   <body>\n|     \"x\"\n"
    );
}

#[test]
fn test_head_element_after_head_goes_into_head() {
    assert_eq!(
        dump("<head></head><style></style>"),
        "| <html>\n|   <head>\n|     <style>\n|   <body>\n"
    );
}

#[test]
fn test_noscript_depends_on_scripting_flag() {
    let off = parse_document_with_config("<body><noscript><p>x</p></noscript>", ParserConfig::default());
    let noscript = find_element(&off.tree, NodeId::ROOT, "noscript").expect("noscript");
    assert!(find_element(&off.tree, noscript, "p").is_some());

    let on = parse_document_with_config(
        "<body><noscript><p>x</p></noscript>",
        ParserConfig::default().with_scripting(true),
    );
    let noscript = find_element(&on.tree, NodeId::ROOT, "noscript").expect("noscript");
    assert!(find_element(&on.tree, noscript, "p").is_none());
    assert_eq!(text_of(&on.tree, noscript), "<p>x</p>");
}

#[test]
fn test_noscript_in_head_without_scripting() {
    assert_eq!(
        dump("<head><noscript><link rel=x><p>y"),
        "| <html>\n|   <head>\n|     <noscript>\n|       <link>\n|         rel=\"x\"\n|   <body>\n|     <p>\n|       \"y\"\n"
    );
}

// ========== Body ==========

#[test]
fn test_void_elements() {
    assert_eq!(
        dump("<p>a<br>b<img src=x>c<hr>"),
        "| <html>\n|   <head>\n|   <body>\n|     <p>\n|       \"a\"\n|       <br>\n|       \"b\"\n|       <img>\n|         src=\"x\"\n|       \"c\"\n|     <hr>\n"
    );
}

#[test]
fn test_self_closing_void_is_acknowledged() {
    let codes = errors("<!DOCTYPE html><br/>");
    assert!(codes.is_empty(), "unexpected errors: {codes:?}");
}

#[test]
fn test_self_closing_non_void_keeps_children() {
    assert_eq!(
        dump("<!DOCTYPE html><span/>a</span>b"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <span>\n|       \"a\"\n|     \"b\"\n"
    );
    assert!(
        errors("<!DOCTYPE html><span/>a")
            .contains(&ParseErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus)
    );
}

#[test]
fn test_image_becomes_img() {
    let tree = parse("<image src=x>");
    assert!(find_element(&tree, NodeId::ROOT, "img").is_some());
    assert!(find_element(&tree, NodeId::ROOT, "image").is_none());
}

#[test]
fn test_stray_end_tags() {
    // "</p>" with no p in button scope inserts an empty p; "</br>" is a br.
    assert_eq!(
        dump("<!DOCTYPE html><body></p></br></div>"),
        "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n|     <p>\n|     <br>\n"
    );
    assert!(errors("<!DOCTYPE html><body></div>").contains(&ParseErrorCode::UnexpectedEndTag));
}

#[test]
fn test_generate_implied_end_tags() {
    let tree = parse("<p>first<p>second");
    let body = tree.body().expect("body");
    let ps = find_all_elements(&tree, body, "p");
    assert_eq!(ps.len(), 2);
    assert_eq!(tree.parent(ps[1]), Some(body));
    assert_eq!(text_of(&tree, ps[0]), "first");
    assert_eq!(text_of(&tree, ps[1]), "second");
}

#[test]
fn test_block_closes_open_paragraph() {
    assert_eq!(
        dump("<p>a<div>b</div>"),
        "| <html>\n|   <head>\n|   <body>\n|     <p>\n|       \"a\"\n|     <div>\n|       \"b\"\n"
    );
}

#[test]
fn test_headings_do_not_nest() {
    assert_eq!(
        dump("<h1>a<h2>b"),
        "| <html>\n|   <head>\n|   <body>\n|     <h1>\n|       \"a\"\n|     <h2>\n|       \"b\"\n"
    );
}

#[test]
fn test_buttons_do_not_nest() {
    let tree = parse("<button>a<button>b");
    let body = tree.body().expect("body");
    let buttons = find_all_elements(&tree, body, "button");
    assert_eq!(buttons.len(), 2);
    assert_eq!(tree.parent(buttons[1]), Some(body));
}

#[test]
fn test_nested_form_is_ignored() {
    let tree = parse("<form><div><form><input></form></div>");
    assert_eq!(find_all_elements(&tree, NodeId::ROOT, "form").len(), 1);
    assert!(find_element(&tree, NodeId::ROOT, "input").is_some());
}

#[test]
fn test_pre_and_textarea_drop_leading_newline() {
    let tree = parse("<pre>\nx</pre><textarea>\ny</textarea>");
    let pre = find_element(&tree, NodeId::ROOT, "pre").expect("pre");
    let textarea = find_element(&tree, NodeId::ROOT, "textarea").expect("textarea");
    assert_eq!(text_of(&tree, pre), "x");
    assert_eq!(text_of(&tree, textarea), "y");
}

#[test]
fn test_plaintext_swallows_the_rest() {
    let tree = parse("<plaintext><b>x</b></plaintext>");
    let plaintext = find_element(&tree, NodeId::ROOT, "plaintext").expect("plaintext");
    assert_eq!(text_of(&tree, plaintext), "<b>x</b></plaintext>");
}

#[test]
fn test_any_other_end_tag_stops_at_special() {
    // "</span>" with a special div above the span is ignored.
    assert_eq!(
        dump("<span><div>text</span>more"),
        "| <html>\n|   <head>\n|   <body>\n|     <span>\n|       <div>\n|         \"textmore\"\n"
    );
}

#[test]
fn test_eof_with_open_elements_is_reported() {
    assert!(errors("<!DOCTYPE html><div>").contains(&ParseErrorCode::UnexpectedEofInElement));
    // p, li and friends may be left open.
    assert!(errors("<!DOCTYPE html><p>x<li>y").is_empty());
}

// ========== Lists ==========

#[test]
fn test_li_implicit_close() {
    assert_eq!(
        dump("<ul><li>A<li>B</ul>"),
        "| <html>\n|   <head>\n|   <body>\n|     <ul>\n|       <li>\n|         \"A\"\n|       <li>\n|         \"B\"\n"
    );
}

#[test]
fn test_dd_dt_implicit_close() {
    let tree = parse("<dl><dt>T<dd>D<dt>T2</dl>");
    let dl = find_element(&tree, NodeId::ROOT, "dl").expect("dl");
    let names: Vec<&str> = tree
        .children(dl)
        .iter()
        .filter_map(|&id| tree.as_element(id).map(|e| e.tag_name.as_str()))
        .collect();
    assert_eq!(names, ["dt", "dd", "dt"]);
}

#[test]
fn test_nested_lists() {
    let tree = parse("<ul><li>A<ul><li>B</li></ul></li></ul>");
    let outer = find_element(&tree, NodeId::ROOT, "ul").expect("ul");
    assert_eq!(tree.children(outer).len(), 1);
    let inner = find_all_elements(&tree, outer, "ul")[1];
    assert_eq!(text_of(&tree, inner), "B");
}

#[test]
fn test_stray_list_end_tags_are_ignored() {
    let tree = parse("<body></li></ol>text</body>");
    assert_eq!(text_of(&tree, tree.body().expect("body")), "text");
    assert!(find_element(&tree, NodeId::ROOT, "li").is_none());
}

// ========== Formatting elements and the adoption agency ==========

#[test]
fn test_adoption_agency_with_furthest_block() {
    assert_eq!(
        dump("<a><p>X</a>Y"),
        "| <html>\n|   <head>\n|   <body>\n|     <a>\n|     <p>\n|       <a>\n|         \"X\"\n|       \"Y\"\n"
    );
}

#[test]
fn test_adoption_agency_moves_block_out_of_formatting() {
    assert_eq!(
        dump("<b>1<p>2</b>3</p>"),
        "| <html>\n|   <head>\n|   <body>\n|     <b>\n|       \"1\"\n|     <p>\n|       <b>\n|         \"2\"\n|       \"3\"\n"
    );
}

#[test]
fn test_adoption_agency_simple_misnesting() {
    assert_eq!(
        dump("<p><b>X<i>Y</b>Z</i></p>"),
        "| <html>\n|   <head>\n|   <body>\n|     <p>\n|       <b>\n|         \"X\"\n|         <i>\n|           \"Y\"\n|       <i>\n|         \"Z\"\n"
    );
}

#[test]
fn test_adoption_agency_no_furthest_block() {
    let tree = parse("<p><b><i>text</b>after</p>");
    let p = find_element(&tree, NodeId::ROOT, "p").expect("p");
    let b = find_element(&tree, p, "b").expect("b");
    let i = find_element(&tree, b, "i").expect("i");
    assert_eq!(text_of(&tree, i), "text");
    // The i is reopened for the text after </b>.
    assert_eq!(find_all_elements(&tree, p, "i").len(), 2);
}

#[test]
fn test_misnested_formatting_is_reported() {
    assert!(errors("<!DOCTYPE html><b><i></b>").contains(&ParseErrorCode::MisnestedFormattingElement));
}

#[test]
fn test_formatting_reconstruction_across_blocks() {
    assert_eq!(
        dump("<p><b>x</p><p>y"),
        "| <html>\n|   <head>\n|   <body>\n|     <p>\n|       <b>\n|         \"x\"\n|     <p>\n|       <b>\n|         \"y\"\n"
    );
}

#[test]
fn test_nested_anchor_tags() {
    assert_eq!(
        dump(r#"<a href="1">first<a href="2">second"#),
        "| <html>\n|   <head>\n|   <body>\n|     <a>\n|       href=\"1\"\n|       \"first\"\n|     <a>\n|       href=\"2\"\n|       \"second\"\n"
    );
}

#[test]
fn test_noahs_ark_limits_identical_entries() {
    // Only three identical formatting elements are kept for reconstruction.
    let tree = parse("<p><b><b><b><b>x</p><p>y");
    let ps = find_all_elements(&tree, NodeId::ROOT, "p");
    assert_eq!(find_all_elements(&tree, ps[1], "b").len(), 3);
}

#[test]
fn test_deep_misnesting_terminates() {
    let mut html = String::new();
    for _ in 0..50 {
        html.push_str("<b><div>");
    }
    html.push('x');
    for _ in 0..50 {
        html.push_str("</b>");
    }
    let tree = parse(&html);
    assert_eq!(text_of(&tree, tree.body().expect("body")), "x");
}

#[test]
fn test_adoption_agency_gives_up_after_eight_clones() {
    let mut html = String::from("<b>");
    for _ in 0..20 {
        html.push_str("<div>");
    }
    html.push_str("X</b>");
    let tree = parse(&html);
    let body = tree.body().expect("body");

    // The original b plus one clone per outer loop iteration.
    assert_eq!(find_all_elements(&tree, body, "b").len(), 9);
    let divs = find_all_elements(&tree, body, "div");
    assert_eq!(divs.len(), 20);

    // The divs past the eighth are never reached, so the text stays inside
    // the last clone.
    let innermost = *divs.last().expect("twenty divs");
    assert_eq!(text_of(&tree, innermost), "X");
    let wrapping_b = tree
        .ancestors(innermost)
        .filter(|&id| tree.as_element(id).is_some_and(|e| e.is_html("b")))
        .count();
    assert_eq!(wrapping_b, 1);
    let ninth = divs[8];
    assert!(
        tree.parent(ninth)
            .and_then(|p| tree.as_element(p))
            .is_some_and(|e| e.is_html("b"))
    );
}

// ========== Tables ==========

#[test]
fn test_table_sections_are_implied() {
    assert_eq!(
        dump("<table><tr><td>1</td></tr></table>"),
        "| <html>\n|   <head>\n|   <body>\n|     <table>\n|       <tbody>\n|         <tr>\n|           <td>\n|             \"1\"\n"
    );
}

#[test]
fn test_foster_parenting_moves_block_before_table() {
    let tree = parse("<table><div>X</div></table>");
    let body = tree.body().expect("body");
    let table = find_element(&tree, body, "table").expect("table");
    let div = find_element(&tree, body, "div").expect("div");

    assert_eq!(tree.children(body), &[div, table]);
    assert_eq!(text_of(&tree, div), "X");
    assert!(tree.children(table).is_empty());
}

#[test]
fn test_foster_parenting_text() {
    assert_eq!(
        dump("<table>x<tr><td>y</td></tr></table>"),
        "| <html>\n|   <head>\n|   <body>\n|     \"x\"\n|     <table>\n|       <tbody>\n|         <tr>\n|           <td>\n|             \"y\"\n"
    );
}

#[test]
fn test_whitespace_in_table_stays_in_table() {
    let tree = parse("<table> <tr><td>a</td></tr></table>");
    let table = find_element(&tree, NodeId::ROOT, "table").expect("table");
    let first = tree.children(table)[0];
    assert_eq!(tree.as_text(first), Some(" "));
}

#[test]
fn test_caption_and_colgroup() {
    assert_eq!(
        dump("<table><caption>c</caption><col><tr><td>d"),
        "| <html>\n|   <head>\n|   <body>\n|     <table>\n|       <caption>\n|         \"c\"\n|       <colgroup>\n|         <col>\n|       <tbody>\n|         <tr>\n|           <td>\n|             \"d\"\n"
    );
}

#[test]
fn test_cells_close_each_other() {
    let tree = parse("<table><tr><td>a<td>b<tr><th>c</table>");
    assert_eq!(find_all_elements(&tree, NodeId::ROOT, "tr").len(), 2);
    let cells = find_all_elements(&tree, NodeId::ROOT, "td");
    assert_eq!(cells.len(), 2);
    assert_eq!(text_of(&tree, cells[1]), "b");
    assert!(find_element(&tree, NodeId::ROOT, "th").is_some());
}

#[test]
fn test_table_in_paragraph_depends_on_quirks() {
    let standards = parse("<!DOCTYPE html><p><table>");
    let p = find_element(&standards, NodeId::ROOT, "p").expect("p");
    assert!(find_element(&standards, p, "table").is_none());

    let quirks = parse("<p><table>");
    let p = find_element(&quirks, NodeId::ROOT, "p").expect("p");
    assert!(find_element(&quirks, p, "table").is_some());
}

#[test]
fn test_hidden_input_stays_in_table() {
    let tree = parse("<table><input type=hidden><input type=text></table>");
    let table = find_element(&tree, NodeId::ROOT, "table").expect("table");
    let inputs = find_all_elements(&tree, NodeId::ROOT, "input");
    assert_eq!(inputs.len(), 2);
    for input in inputs {
        let kind = tree
            .as_element(input)
            .and_then(|e| e.get_attribute("type"))
            .expect("type");
        let expected = if kind == "hidden" { Some(table) } else { tree.body() };
        assert_eq!(tree.parent(input), expected, "input type={kind}");
    }
}

// ========== Select ==========

#[test]
fn test_select_options() {
    assert_eq!(
        dump("<select><option>a<option>b<optgroup><option>c</select>"),
        "| <html>\n|   <head>\n|   <body>\n|     <select>\n|       <option>\n|         \"a\"\n|       <option>\n|         \"b\"\n|       <optgroup>\n|         <option>\n|           \"c\"\n"
    );
}

#[test]
fn test_select_ignores_most_markup() {
    let tree = parse("<select><div>x</div><b>y</b></select>");
    let select = find_element(&tree, NodeId::ROOT, "select").expect("select");
    assert!(find_element(&tree, select, "div").is_none());
    assert_eq!(text_of(&tree, select), "xy");
}

#[test]
fn test_table_tag_closes_select_in_table() {
    let tree = parse("<table><tr><td><select><option>a<td>b</table>");
    let cells = find_all_elements(&tree, NodeId::ROOT, "td");
    assert_eq!(cells.len(), 2);
    assert_eq!(text_of(&tree, cells[1]), "b");
}

// ========== Templates ==========

#[test]
fn test_template_contents() {
    assert_eq!(
        dump("<template><p>x</p></template>"),
        "| <html>\n|   <head>\n|     <template>\n|       content\n|         <p>\n|           \"x\"\n|   <body>\n"
    );
}

#[test]
fn test_template_children_are_not_tree_children() {
    let tree = parse("<body><template><tr><td>x</td></tr></template>");
    let template = find_element(&tree, NodeId::ROOT, "template").expect("template");
    assert!(tree.children(template).is_empty());

    let contents = tree.template_contents(template).expect("contents");
    assert!(matches!(
        tree.get(contents).map(|n| &n.node_type),
        Some(NodeType::DocumentFragment)
    ));
    // A tr directly in a template needs no table around it.
    let tr = tree.children(contents)[0];
    assert_eq!(tree.as_element(tr).map(|e| e.tag_name.as_str()), Some("tr"));
}

#[test]
fn test_stray_template_end_tag() {
    assert!(
        errors("<!DOCTYPE html><body></template>").contains(&ParseErrorCode::UnexpectedEndTag)
    );
}

// ========== Frameset ==========

#[test]
fn test_frameset_document() {
    assert_eq!(
        dump("<frameset><frame></frameset><noframes>x</noframes>"),
        "| <html>\n|   <head>\n|   <frameset>\n|     <frame>\n|   <noframes>\n|     \"x\"\n"
    );
}

#[test]
fn test_frameset_ignored_after_content() {
    let tree = parse("<p>x<frameset>");
    assert!(find_element(&tree, NodeId::ROOT, "frameset").is_none());
}

// ========== Foreign content ==========

#[test]
fn test_svg_and_foreign_object() {
    assert_eq!(
        dump(r#"<svg viewbox="0 0 1 1"><foreignobject><p>x</p></foreignobject></svg>"#),
        "| <html>\n|   <head>\n|   <body>\n|     <svg svg>\n|       viewBox=\"0 0 1 1\"\n|       <svg foreignObject>\n|         <p>\n|           \"x\"\n"
    );
}

#[test]
fn test_mathml() {
    assert_eq!(
        dump("<math><mi>x</mi></math>"),
        "| <html>\n|   <head>\n|   <body>\n|     <math math>\n|       <math mi>\n|         \"x\"\n"
    );
}

#[test]
fn test_html_breaks_out_of_svg() {
    assert_eq!(
        dump("<svg><circle/><p>x"),
        "| <html>\n|   <head>\n|   <body>\n|     <svg svg>\n|       <svg circle>\n|     <p>\n|       \"x\"\n"
    );
}

#[test]
fn test_cdata_in_svg() {
    let tree = parse("<svg><![CDATA[a<b]]></svg>");
    let svg = find_element(&tree, NodeId::ROOT, "svg").expect("svg");
    assert_eq!(text_of(&tree, svg), "a<b");
}

#[test]
fn test_self_closing_foreign_element_has_no_children() {
    let tree = parse("<svg><path/>text</svg>");
    let path = find_element(&tree, NodeId::ROOT, "path").expect("path");
    assert!(tree.children(path).is_empty());
    assert!(errors("<!DOCTYPE html><svg><path/></svg>").is_empty());
}

// ========== Quirks mode ==========

fn quirks_of(html: &str) -> QuirksMode {
    parse_document_with_config(html, ParserConfig::default()).quirks_mode
}

#[test]
fn test_quirks_mode_from_doctype() {
    assert_eq!(quirks_of("<!DOCTYPE html>"), QuirksMode::NoQuirks);
    assert_eq!(quirks_of("<p>no doctype"), QuirksMode::Quirks);
    assert_eq!(
        quirks_of(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN">"#),
        QuirksMode::Quirks
    );
    assert_eq!(
        quirks_of(
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd">"#
        ),
        QuirksMode::LimitedQuirks
    );
    assert_eq!(
        quirks_of(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "x">"#),
        QuirksMode::LimitedQuirks
    );
    assert_eq!(quirks_of("<!DOCTYPE svg>"), QuirksMode::Quirks);
}

#[test]
fn test_iframe_srcdoc_never_quirks_for_missing_doctype() {
    let output = parse_document_with_config(
        "<p>x",
        ParserConfig::default().with_iframe_srcdoc(true),
    );
    assert_eq!(output.quirks_mode, QuirksMode::NoQuirks);
}

#[test]
fn test_late_doctype_is_ignored() {
    let tree = parse("<p>x<!DOCTYPE html>");
    assert_eq!(tree.quirks_mode(), QuirksMode::Quirks);
    assert!(errors("<p><!DOCTYPE html>").contains(&ParseErrorCode::UnexpectedDoctype));
}

// ========== Diagnostics ==========

#[test]
fn test_issue_collection_can_be_turned_off() {
    let output = parse_document_with_config(
        "</div><span/>",
        ParserConfig::default().with_collect_issues(false),
    );
    assert!(output.issues.is_empty());
}

#[test]
fn test_issues_are_in_input_order() {
    let output = parse_document_with_config("<!DOCTYPE html>a</x>b</y>", ParserConfig::default());
    let offsets: Vec<usize> = output.issues.iter().map(|i| i.offset).collect();
    assert_eq!(offsets.len(), 2);
    assert!(offsets[0] < offsets[1]);
    assert_eq!(output.issues[0].detail.as_deref(), Some("x"));
}
