//! Property tests: arbitrary input never panics, and chunking never changes
//! the tree.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use wren_dom::dump::dump_tree;
use wren_dom::NodeId;
use wren_html::{FragmentContext, HTMLParser, HTMLTokenizer, ParserConfig, parse_document, parse_fragment};

/// Pieces of markup that reach the interesting corners of the tree builder
/// much faster than random characters do.
const PIECES: &[&str] = &[
    "<!DOCTYPE html>", "<html>", "</html>", "<head>", "<body>", "</body>", "<p>", "</p>", "<b>",
    "</b>", "<i>", "</i>", "<a href=x>", "</a>", "<div>", "</div>", "<table>", "</table>",
    "<tr>", "<td>", "</td>", "<caption>", "<col>", "<select>", "<option>", "</select>",
    "<template>", "</template>", "<svg>", "</svg>", "<math>", "<mi>", "<foreignObject>",
    "<![CDATA[", "]]>", "<!--", "-->", "<script>", "</script>", "<title>", "</title>",
    "<textarea>", "<pre>", "<li>", "<frameset>", "<frame>", "<br/>", "<span/>", "&amp",
    "&notin;", "&#x41;", "&", "\r\n", "\r", "\n", " ", "x", "\0", "<", ">", "</", "=\"",
];

/// A document assembled from [`PIECES`].
#[derive(Debug, Clone)]
struct Markup(String);

impl Arbitrary for Markup {
    fn arbitrary(g: &mut Gen) -> Self {
        let count = usize::arbitrary(g) % 40;
        let markup = (0..count)
            .filter_map(|_| g.choose(PIECES))
            .copied()
            .collect();
        Self(markup)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(Self))
    }
}

fn parse_in_chunks(input: &str, sizes: &[u8]) -> String {
    let mut parser = HTMLParser::new(ParserConfig::default());
    let chars: Vec<char> = input.chars().collect();
    let mut start = 0;
    let mut sizes = sizes.iter().map(|&s| usize::from(s % 8) + 1).cycle();
    while start < chars.len() {
        let end = (start + sizes.next().unwrap_or(1)).min(chars.len());
        let chunk: String = chars[start..end].iter().collect();
        if parser.feed(&chunk).is_err() {
            break;
        }
        start = end;
    }
    dump_tree(&parser.finish().tree, NodeId::ROOT)
}

#[quickcheck]
fn prop_tokenizer_always_ends_with_eof(input: String) -> bool {
    let tokens: Vec<_> = HTMLTokenizer::new(input).collect();
    tokens.last().is_some_and(wren_html::Token::is_eof)
}

#[quickcheck]
fn prop_arbitrary_text_never_panics(input: String) -> bool {
    let tree = parse_document(&input);
    tree.body().is_some() || tree.document_element().is_some()
}

#[quickcheck]
fn prop_arbitrary_markup_never_panics(markup: Markup) -> bool {
    let tree = parse_document(&markup.0);
    tree.document_element().is_some()
}

#[quickcheck]
fn prop_fragments_never_panic(markup: Markup) -> bool {
    ["div", "td", "tr", "table", "select", "template", "title", "svg"]
        .iter()
        .all(|context| parse_fragment(&markup.0, &FragmentContext::new(context)).is_ok())
}

#[quickcheck]
fn prop_chunked_text_matches_one_shot(input: String, sizes: Vec<u8>) -> bool {
    parse_in_chunks(&input, &sizes) == dump_tree(&parse_document(&input), NodeId::ROOT)
}

#[quickcheck]
fn prop_chunked_markup_matches_one_shot(markup: Markup, sizes: Vec<u8>) -> bool {
    parse_in_chunks(&markup.0, &sizes) == dump_tree(&parse_document(&markup.0), NodeId::ROOT)
}
