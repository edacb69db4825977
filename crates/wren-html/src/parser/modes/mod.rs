//! [§ 13.2.6.4 The rules for parsing tokens in HTML content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhtml)
//!
//! One handler per insertion mode, grouped by the part of the document they
//! deal with.

mod after;
mod body;
mod head;
mod initial;
mod select;
mod table;
mod template;

use crate::tokenizer::Token;

use super::core::HTMLParser;

/// A start tag the tree builder acts on as if it had been in the input, such
/// as the implied `head`, `body` or `tbody`.
pub(super) fn synthetic_start_tag(name: &str) -> Token {
    Token::StartTag {
        name: name.to_string(),
        self_closing: false,
        attributes: Vec::new(),
    }
}

/// "A character token that is one of U+0009 CHARACTER TABULATION, U+000A
/// LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or
/// U+0020 SPACE"
pub(super) fn is_whitespace_token(token: &Token) -> bool {
    matches!(token, Token::Character { data } if HTMLParser::is_whitespace(*data))
}

/// Start tag with one of `names`.
pub(super) fn is_start_tag_one_of(token: &Token, names: &[&str]) -> bool {
    matches!(token, Token::StartTag { name, .. } if names.contains(&name.as_str()))
}

/// End tag with one of `names`.
pub(super) fn is_end_tag_one_of(token: &Token, names: &[&str]) -> bool {
    matches!(token, Token::EndTag { name, .. } if names.contains(&name.as_str()))
}
