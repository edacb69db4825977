//! Serializing parsed trees and parsing the result again.

use wren_dom::dump::dump_tree;
use wren_dom::serialize::{serialize_children, serialize_node};
use wren_dom::NodeId;
use wren_html::{FragmentContext, parse_document, parse_fragment};

/// Helper to check that `parse(serialize(parse(html)))` matches `parse(html)`
fn assert_round_trip(html: &str) {
    let first = parse_document(html);
    let markup = serialize_children(&first, NodeId::ROOT);
    let second = parse_document(&markup);
    assert_eq!(
        dump_tree(&second, NodeId::ROOT),
        dump_tree(&first, NodeId::ROOT),
        "round trip of {html:?} through {markup:?}"
    );
}

#[test]
fn test_serialize_document() {
    let tree = parse_document("<!DOCTYPE html><title>T</title><p class=a>x<br>y");
    assert_eq!(
        serialize_children(&tree, NodeId::ROOT),
        "<!DOCTYPE html><html><head><title>T</title></head><body><p class=\"a\">x<br>y</p></body></html>"
    );
}

#[test]
fn test_serialize_escapes_decoded_text() {
    let tree = parse_document("<p title='say \"hi\" &amp; go'>1 &lt; 2 &amp;&nbsp;3</p>");
    let body = tree.body().expect("body");
    assert_eq!(
        serialize_children(&tree, body),
        "<p title=\"say &quot;hi&quot; &amp; go\">1 &lt; 2 &amp;&nbsp;3</p>"
    );
}

#[test]
fn test_serialize_raw_text_unescaped() {
    let tree = parse_document("<script>a < b && c</script>");
    let script = tree.children(tree.children(tree.document_element().expect("html"))[0])[0];
    assert_eq!(
        serialize_node(&tree, script),
        "<script>a < b && c</script>"
    );
}

#[test]
fn test_serialize_template_contents() {
    let tree = parse_document("<template><b>x</b></template>");
    let head = tree.children(tree.document_element().expect("html"))[0];
    assert_eq!(
        serialize_children(&tree, head),
        "<template><b>x</b></template>"
    );
}

#[test]
fn test_serialize_fragment() {
    let tree = parse_fragment("<li>a<li>b", &FragmentContext::new("ul")).expect("valid context");
    assert_eq!(
        serialize_children(&tree, tree.root()),
        "<li>a</li><li>b</li>"
    );
}

#[test]
fn test_round_trip_simple_documents() {
    assert_round_trip("<!DOCTYPE html><html><head><title>x</title></head><body><p>a</p></body></html>");
    assert_round_trip("<p>Hello <b>world</b> and <i>more</i></p>");
    assert_round_trip("<ul><li>one</li><li>two<ol><li>nested</li></ol></li></ul>");
    assert_round_trip("<dl><dt>term</dt><dd>definition</dd></dl>");
}

#[test]
fn test_round_trip_tables() {
    assert_round_trip(
        "<table><caption>c</caption><colgroup><col></colgroup><thead><tr><th>h</th></tr></thead>\
         <tbody><tr><td>1</td><td>2</td></tr></tbody></table>",
    );
}

#[test]
fn test_round_trip_special_text() {
    assert_round_trip("<pre>\n\nstarts with a newline</pre>");
    assert_round_trip("<textarea>\n&lt;b&gt;</textarea>");
    assert_round_trip("<style>p > a { color: red }</style><script>if (a < b) {}</script>");
    assert_round_trip("<p>&amp;&lt;&gt;&nbsp;&quot;</p>");
    assert_round_trip("<p title=\"&quot;quoted&quot; &amp; more\">x</p>");
}

#[test]
fn test_round_trip_foreign_content() {
    assert_round_trip(
        "<svg viewBox=\"0 0 10 10\"><circle r=\"1\"></circle><foreignObject><p>x</p></foreignObject></svg>",
    );
    assert_round_trip("<math><mi>x</mi><mo>+</mo><mn>1</mn></math>");
}

#[test]
fn test_round_trip_templates_and_comments() {
    assert_round_trip("<!-- top --><template><tr><td>x</td></tr></template><p><!-- inner -->y</p>");
}

#[test]
fn test_round_trip_repaired_markup() {
    // Malformed input is repaired once; the repaired tree is stable.
    assert_round_trip("<p><b>x<p>y</b>z");
    assert_round_trip("<table><div>X</div></table>");
    assert_round_trip("<a><p>X</a>Y");
}
