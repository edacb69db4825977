//! HTML tokenizer and tree builder for the wren DOM.
//!
//! # Scope
//!
//! This crate implements:
//! - **Input stream** ([WHATWG § 13.2.3.5](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream))
//!   - Newline normalization across chunk boundaries, lookahead and pushback
//!
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Every tokenizer state, including script data escapes and CDATA sections
//!   - Named and numeric character references
//!
//! - **HTML Parser / Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All 23 insertion modes and the rules for foreign content
//!   - Adoption agency, foster parenting and active formatting reconstruction
//!   - Template contents, quirks mode detection and fragment parsing
//!
//! # Example
//!
//! ```
//! use wren_html::parse_document;
//!
//! let tree = parse_document("<p>Hello <b>world</b>");
//! let body = tree.body().expect("body is always created");
//! assert_eq!(tree.text_content(body), "Hello world");
//! ```
//!
//! # Not Implemented
//!
//! - Encoding sniffing: input is already-decoded text
//! - Script execution and `document.write`

/// Parser options.
pub mod config;
/// Parse errors and API errors.
pub mod error;
/// The preprocessed input stream.
pub mod input;
/// HTML parser and tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

use tracing::debug_span;
use wren_dom::DomTree;

pub use config::ParserConfig;
pub use error::{HtmlError, ParseErrorCode, ParseIssue};
pub use parser::{
    AbortHandle, FragmentContext, HTMLParser, InsertionMode, ParseOutput, print_tree,
};
pub use tokenizer::{Attribute, HTMLTokenizer, Token, TokenizerState};

/// Parse a complete document with the default configuration.
#[must_use]
pub fn parse_document(input: &str) -> DomTree {
    parse_document_with_config(input, ParserConfig::default()).tree
}

/// Parse a complete document, returning the tree with its parse errors and
/// quirks mode. A tree builder failure is reported in
/// [`ParseOutput::failure`] alongside the partial tree.
#[must_use]
pub fn parse_document_with_config(input: &str, config: ParserConfig) -> ParseOutput {
    let span = debug_span!("parse_document", len = input.len());
    let _enter = span.enter();

    let mut parser = HTMLParser::new(config);
    // Any failure is carried to the output by `finish`.
    let _ = parser.feed(input);
    parser.finish()
}

/// Parse `input` as if it were assigned to the `innerHTML` of `context`.
///
/// The returned tree's root is a `DocumentFragment` whose children are the
/// parsed nodes.
///
/// # Errors
///
/// Returns [`HtmlError::InvalidContextName`] if the context's tag name could
/// not come from markup.
pub fn parse_fragment(input: &str, context: &FragmentContext) -> Result<DomTree, HtmlError> {
    parse_fragment_with_config(input, context, ParserConfig::default()).map(|output| output.tree)
}

/// [`parse_fragment`] with an explicit configuration, also returning parse
/// errors.
///
/// # Errors
///
/// Returns [`HtmlError::InvalidContextName`] if the context's tag name could
/// not come from markup, or the tree builder's failure if it stopped on a
/// broken invariant.
pub fn parse_fragment_with_config(
    input: &str,
    context: &FragmentContext,
    config: ParserConfig,
) -> Result<ParseOutput, HtmlError> {
    let span = debug_span!("parse_fragment", context = context.tag_name(), len = input.len());
    let _enter = span.enter();

    let mut parser = HTMLParser::new_fragment(config, context)?;
    parser.feed(input)?;
    let mut output = parser.finish();
    match output.failure.take() {
        Some(err) => Err(err),
        None => Ok(output),
    }
}
