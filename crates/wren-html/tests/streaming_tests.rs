//! Incremental parsing: chunked input, suspension and cancellation.

use wren_dom::dump::dump_tree;
use wren_dom::NodeId;
use wren_html::{HTMLParser, HtmlError, InsertionMode, ParserConfig, parse_document};

const DOCUMENT: &str = "<!DOCTYPE html>\r\n<html lang=en><head><title>A &amp; B</title>\r\n\
<script>if (a < b) { x = '<!--'; }</script></head>\r\n\
<body><p class=\"intro\">caf&eacute; &notin; &#x41;&#66 &amp</p>\r\n\
<table><tr><td>1<td>2</table><!-- done --><svg><![CDATA[x<y]]></svg>\
<pre>\r\nline</pre><textarea>\r\nt</textarea></body></html>";

/// Helper to feed `html` in chunks of `size` characters, then finish
fn parse_in_chunks(html: &str, size: usize) -> String {
    let mut parser = HTMLParser::new(ParserConfig::default());
    let chars: Vec<char> = html.chars().collect();
    for chunk in chars.chunks(size) {
        let chunk: String = chunk.iter().collect();
        parser.feed(&chunk).expect("parser is still running");
    }
    dump_tree(&parser.finish().tree, NodeId::ROOT)
}

fn parse_whole(html: &str) -> String {
    dump_tree(&parse_document(html), NodeId::ROOT)
}

#[test]
fn test_single_characters_match_one_shot() {
    assert_eq!(parse_in_chunks(DOCUMENT, 1), parse_whole(DOCUMENT));
}

#[test]
fn test_every_chunk_size_matches_one_shot() {
    let expected = parse_whole(DOCUMENT);
    for size in 2..24 {
        assert_eq!(parse_in_chunks(DOCUMENT, size), expected, "chunk size {size}");
    }
}

#[test]
fn test_every_split_point_matches_one_shot() {
    let expected = parse_whole(DOCUMENT);
    let boundaries: Vec<usize> = DOCUMENT.char_indices().map(|(i, _)| i).collect();
    for &split in &boundaries {
        let mut parser = HTMLParser::new(ParserConfig::default());
        let (head, tail) = DOCUMENT.split_at(split);
        parser.feed(head).expect("running");
        parser.feed(tail).expect("running");
        let actual = dump_tree(&parser.finish().tree, NodeId::ROOT);
        assert_eq!(actual, expected, "split at byte {split}");
    }
}

#[test]
fn test_split_doctype_keeps_standards_mode() {
    let mut parser = HTMLParser::new(ParserConfig::default());
    for chunk in ["<!DOC", "TYPE ht", "ml>", "<p>x"] {
        parser.feed(chunk).expect("running");
    }
    let output = parser.finish();
    assert_eq!(output.quirks_mode, wren_dom::QuirksMode::NoQuirks);
}

#[test]
fn test_empty_chunks_are_harmless() {
    let mut parser = HTMLParser::new(ParserConfig::default());
    for chunk in ["", "<p>", "", "x", ""] {
        parser.feed(chunk).expect("running");
    }
    assert_eq!(
        dump_tree(&parser.finish().tree, NodeId::ROOT),
        parse_whole("<p>x")
    );
}

#[test]
fn test_tree_grows_as_input_arrives() {
    let mut parser = HTMLParser::new(ParserConfig::default());
    parser.feed("<p>first").expect("running");
    let body = parser.tree().body().expect("body exists once content arrives");
    assert_eq!(parser.tree().text_content(body), "first");

    parser.feed(" second").expect("running");
    assert_eq!(parser.tree().text_content(body), "first second");
}

#[test]
fn test_insertion_mode_is_observable_between_chunks() {
    let mut parser = HTMLParser::new(ParserConfig::default());
    assert_eq!(parser.insertion_mode(), InsertionMode::Initial);

    parser.feed("<!DOCTYPE html><title>a").expect("running");
    assert_eq!(parser.insertion_mode(), InsertionMode::Text);

    parser.feed("</title><table><tr><td>").expect("running");
    assert_eq!(parser.insertion_mode(), InsertionMode::InCell);
}

#[test]
fn test_abort_keeps_partial_tree() {
    let mut parser = HTMLParser::new(ParserConfig::default());
    parser.feed("<p>kept").expect("running");
    let nodes = parser.tree().len();

    parser.abort();
    assert_eq!(parser.feed("<div>dropped</div>"), Err(HtmlError::Finished));

    let output = parser.finish();
    assert_eq!(output.tree.len(), nodes);
    let body = output.tree.body().expect("body");
    assert_eq!(output.tree.text_content(body), "kept");
}

#[test]
fn test_abort_handle_from_another_thread() {
    let mut parser = HTMLParser::new(ParserConfig::default());
    parser.feed("<p>a").expect("running");

    let handle = parser.abort_handle();
    std::thread::spawn(move || handle.abort())
        .join()
        .expect("abort thread");

    assert!(parser.abort_handle().is_aborted());
    assert_eq!(parser.feed("b"), Err(HtmlError::Finished));
    let output = parser.finish();
    let body = output.tree.body().expect("body");
    assert_eq!(output.tree.text_content(body), "a");
}

#[test]
fn test_config_is_kept() {
    let config = ParserConfig::default().with_scripting(true);
    let parser = HTMLParser::new(config);
    assert_eq!(parser.config(), &config);
}

#[test]
fn test_issues_are_visible_before_finish() {
    let mut parser = HTMLParser::new(ParserConfig::default());
    parser.feed("<!DOCTYPE html><body></div>").expect("running");
    assert_eq!(parser.issues().len(), 1);
}
