//! Integration tests for the HTML tokenizer.

use wren_html::{HTMLTokenizer, ParseErrorCode, Token, TokenizerState};

/// Helper to tokenize a complete string
fn tokenize(input: &str) -> Vec<Token> {
    HTMLTokenizer::new(input.to_string()).collect()
}

/// Helper to join the character tokens of a run back into a string
fn text(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::Character { data } => Some(*data),
            _ => None,
        })
        .collect()
}

/// Helper to tokenize the body of a raw text element. The tree builder
/// normally makes this switch; here the test does it by hand after the start
/// tag has been emitted.
fn tokenize_after_start_tag(input: &str, state: TokenizerState) -> (Token, Vec<Token>) {
    let mut tokenizer = HTMLTokenizer::new(input.to_string());
    let start = tokenizer.next_token().expect("start tag");
    tokenizer.switch_to(state);
    let rest = tokenizer.collect();
    (start, rest)
}

fn error_codes(input: &str) -> Vec<ParseErrorCode> {
    let mut tokenizer = HTMLTokenizer::new(input.to_string());
    while tokenizer.next_token().is_some() {}
    tokenizer.take_errors().into_iter().map(|e| e.code).collect()
}

#[test]
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 6); // 5 chars + EOF
    assert_eq!(tokens[0], Token::Character { data: 'H' });
    assert_eq!(tokens[4], Token::Character { data: 'o' });
    assert_eq!(tokens[5], Token::EndOfFile);
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert_eq!(*public_identifier, None);
            assert_eq!(*system_identifier, None);
            assert!(!force_quirks);
        }
        other => panic!("Expected DOCTYPE token, got {other:?}"),
    }
}

#[test]
fn test_doctype_with_identifiers() {
    let tokens = tokenize(
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" 'http://www.w3.org/TR/html4/strict.dtd'>"#,
    );
    match &tokens[0] {
        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } => {
            // Doctype names are lowercased.
            assert_eq!(name.as_deref(), Some("html"));
            assert_eq!(public_identifier.as_deref(), Some("-//W3C//DTD HTML 4.01//EN"));
            assert_eq!(
                system_identifier.as_deref(),
                Some("http://www.w3.org/TR/html4/strict.dtd")
            );
            assert!(!force_quirks);
        }
        other => panic!("Expected DOCTYPE token, got {other:?}"),
    }
}

#[test]
fn test_missing_doctype_name_forces_quirks() {
    let tokens = tokenize("<!DOCTYPE>");
    assert!(matches!(
        tokens[0],
        Token::Doctype {
            name: None,
            force_quirks: true,
            ..
        }
    ));
    assert!(error_codes("<!DOCTYPE>").contains(&ParseErrorCode::MissingDoctypeName));
}

#[test]
fn test_start_tag() {
    let tokens = tokenize("<DiV>");
    assert_eq!(tokens.len(), 2);
    assert_eq!(
        tokens[0],
        Token::StartTag {
            name: "div".to_string(),
            self_closing: false,
            attributes: Vec::new(),
        }
    );
}

#[test]
fn test_end_tag() {
    let tokens = tokenize("</div>");
    assert_eq!(tokens.len(), 2);
    assert!(tokens[0].is_end_tag("div"));
}

#[test]
fn test_end_tag_attributes_are_dropped() {
    let tokens = tokenize(r#"</p class="x">"#);
    assert_eq!(tokens[0], Token::EndTag { name: "p".into() });
    assert!(error_codes(r#"</p class="x">"#).contains(&ParseErrorCode::EndTagWithAttributes));
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    assert!(matches!(
        &tokens[0],
        Token::StartTag { name, self_closing: true, .. } if name == "br"
    ));
}

#[test]
fn test_self_closing_flag_is_recorded_for_any_tag() {
    // The tokenizer records the flag; deciding whether it is honored is the
    // tree builder's job.
    let tokens = tokenize("<span/>");
    assert!(matches!(
        &tokens[0],
        Token::StartTag { name, self_closing: true, .. } if name == "span"
    ));
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hello -->");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: " hello ".to_string()
        }
    );
}

#[test]
fn test_abrupt_empty_comment() {
    let tokens = tokenize("<!-->x");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: String::new()
        }
    );
    assert_eq!(text(&tokens), "x");
    assert!(error_codes("<!-->").contains(&ParseErrorCode::AbruptClosingOfEmptyComment));
}

#[test]
fn test_bogus_comment_from_processing_instruction() {
    let tokens = tokenize("<?xml version=\"1.0\"?>");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: "?xml version=\"1.0\"?".to_string()
        }
    );
}

#[test]
fn test_cdata_outside_foreign_content_is_a_comment() {
    let tokens = tokenize("<![CDATA[x]]>");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: "[CDATA[x]]".to_string()
        }
    );
    assert!(error_codes("<![CDATA[x]]>").contains(&ParseErrorCode::CdataInHtmlContent));
}

#[test]
fn test_cdata_in_foreign_content_is_text() {
    let mut tokenizer = HTMLTokenizer::new("<![CDATA[a<b]]>".to_string());
    tokenizer.set_allow_cdata(true);
    let tokens: Vec<Token> = tokenizer.collect();
    assert_eq!(text(&tokens), "a<b");
}

#[test]
fn test_attribute_quoting_styles() {
    let tokens = tokenize(r#"<div a="1" b='2' c=3 d>"#);
    let token = &tokens[0];
    assert_eq!(token.attribute("a"), Some("1"));
    assert_eq!(token.attribute("b"), Some("2"));
    assert_eq!(token.attribute("c"), Some("3"));
    assert_eq!(token.attribute("d"), Some(""));
}

#[test]
fn test_attribute_names_are_lowercased() {
    let tokens = tokenize("<div CLASS=x>");
    assert_eq!(tokens[0].attribute("class"), Some("x"));
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let tokens = tokenize("<div id=a id=b>");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes[0].value, "a");
        }
        other => panic!("Expected StartTag token, got {other:?}"),
    }
    assert!(error_codes("<div id=a id=b>").contains(&ParseErrorCode::DuplicateAttribute));
}

#[test]
fn test_tag_with_text_content() {
    let tokens = tokenize("<p>Hi</p>");
    assert!(tokens[0].is_start_tag("p"));
    assert_eq!(text(&tokens), "Hi");
    assert!(tokens[tokens.len() - 2].is_end_tag("p"));
    assert!(tokens[tokens.len() - 1].is_eof());
}

#[test]
fn test_tokenizer_does_not_switch_for_special_elements() {
    // Without the tree builder, the content of <style> is ordinary markup.
    let tokens = tokenize("<style><b></style>");
    assert!(tokens[1].is_start_tag("b"));
}

#[test]
fn test_rawtext_ignores_markup() {
    let (start, rest) =
        tokenize_after_start_tag("<style><div>not a tag</div></style>", TokenizerState::RAWTEXT);
    assert!(start.is_start_tag("style"));
    assert_eq!(text(&rest), "<div>not a tag</div>");
    assert!(rest[rest.len() - 2].is_end_tag("style"));
}

#[test]
fn test_rawtext_wrong_end_tag_is_text() {
    let (_, rest) = tokenize_after_start_tag("<style>a</notastyle>b</style>", TokenizerState::RAWTEXT);
    assert_eq!(text(&rest), "a</notastyle>b");
}

#[test]
fn test_rawtext_does_not_decode_references() {
    let (_, rest) = tokenize_after_start_tag("<xmp>&amp;</xmp>", TokenizerState::RAWTEXT);
    assert_eq!(text(&rest), "&amp;");
}

#[test]
fn test_rcdata_decodes_references_but_not_tags() {
    let (_, rest) = tokenize_after_start_tag(
        "<textarea><b>&lt;bold&gt;</b></textarea>",
        TokenizerState::RCDATA,
    );
    assert_eq!(text(&rest), "<b><bold></b>");
    assert!(rest[rest.len() - 2].is_end_tag("textarea"));
}

#[test]
fn test_rcdata_lone_less_than() {
    let (_, rest) = tokenize_after_start_tag("<title>a < b</title>", TokenizerState::RCDATA);
    assert_eq!(text(&rest), "a < b");
}

#[test]
fn test_script_data_escaped_comment() {
    let (_, rest) = tokenize_after_start_tag(
        "<script><!--</script>--></script>",
        TokenizerState::ScriptData,
    );
    // An escaped script ends at the first matching end tag.
    let end = rest
        .iter()
        .position(|t| t.is_end_tag("script"))
        .expect("script end tag");
    assert_eq!(text(&rest[..end]), "<!--");
}

#[test]
fn test_script_double_escaped() {
    let (_, rest) = tokenize_after_start_tag(
        "<script><!--<script></script>--></script>",
        TokenizerState::ScriptData,
    );
    assert_eq!(text(&rest), "<!--<script></script>-->");
    assert!(rest[rest.len() - 2].is_end_tag("script"));
}

#[test]
fn test_plaintext_never_ends() {
    let (_, rest) = tokenize_after_start_tag("<plaintext></plaintext>", TokenizerState::PLAINTEXT);
    assert_eq!(text(&rest), "</plaintext>");
}

#[test]
fn test_newlines_are_normalized() {
    let tokens = tokenize("a\r\nb\rc");
    assert_eq!(text(&tokens), "a\nb\nc");
}

#[test]
fn test_null_in_data_is_passed_through() {
    let tokens = tokenize("a\0b");
    assert_eq!(text(&tokens), "a\0b");
    assert!(error_codes("a\0b").contains(&ParseErrorCode::UnexpectedNullCharacter));
}

#[test]
fn test_eof_in_tag_drops_the_tag() {
    let tokens = tokenize("<div class=");
    assert_eq!(tokens, vec![Token::EndOfFile]);
    assert!(error_codes("<div class=").contains(&ParseErrorCode::EofInTag));
}

#[test]
fn test_lone_less_than_is_text() {
    let tokens = tokenize("1 < 2");
    assert_eq!(text(&tokens), "1 < 2");
    assert!(error_codes("1 < 2").contains(&ParseErrorCode::InvalidFirstCharacterOfTagName));
}

// =============================================================================
// Character references
// =============================================================================

#[test]
fn test_character_reference_bare_ampersand() {
    assert_eq!(text(&tokenize("a & b")), "a & b");
}

#[test]
fn test_longest_named_match() {
    assert_eq!(text(&tokenize("&notin;")), "\u{2209}");
}

#[test]
fn test_shorter_match_followed_by_literal_text() {
    assert_eq!(text(&tokenize("&not;in;")), "\u{AC}in;");
}

#[test]
fn test_legacy_reference_without_semicolon() {
    assert_eq!(text(&tokenize("&amp")), "&");
    assert_eq!(text(&tokenize("&amp is ok")), "& is ok");
    assert!(
        error_codes("&amp").contains(&ParseErrorCode::MissingSemicolonAfterCharacterReference)
    );
}

#[test]
fn test_legacy_prefix_in_text() {
    // "&notit;" has no entry, but its legacy prefix "&not" does.
    assert_eq!(text(&tokenize("&notit;")), "\u{AC}it;");
}

#[test]
fn test_unknown_named_reference() {
    assert_eq!(text(&tokenize("&notreal;")), "\u{AC}real;");
    assert_eq!(text(&tokenize("&zzz;")), "&zzz;");
    assert!(error_codes("&zzz;").contains(&ParseErrorCode::UnknownNamedCharacterReference));
}

#[test]
fn test_reference_in_attribute() {
    let tokens = tokenize(r#"<a href="?a=1&amp;b=2">"#);
    assert_eq!(tokens[0].attribute("href"), Some("?a=1&b=2"));
}

#[test]
fn test_ambiguous_ampersand_in_attribute() {
    // Inside an attribute a legacy match followed by an alphanumeric or "="
    // is left alone.
    let tokens = tokenize(r#"<a href="?x=1&not=2&notit">"#);
    assert_eq!(tokens[0].attribute("href"), Some("?x=1&not=2&notit"));

    let tokens = tokenize(r#"<a title="&not!">"#);
    assert_eq!(tokens[0].attribute("title"), Some("\u{AC}!"));
}

#[test]
fn test_numeric_references() {
    assert_eq!(text(&tokenize("&#65;&#x42;&#X43;")), "ABC");
    assert_eq!(text(&tokenize("&#65")), "A");
}

#[test]
fn test_numeric_reference_remapping() {
    // Windows-1252 remap table
    assert_eq!(text(&tokenize("&#x80;")), "\u{20AC}");
    assert_eq!(text(&tokenize("&#150;")), "\u{2013}");
    // Out of range and surrogates become U+FFFD
    assert_eq!(text(&tokenize("&#x110000;")), "\u{FFFD}");
    assert_eq!(text(&tokenize("&#xD800;")), "\u{FFFD}");
    assert_eq!(text(&tokenize("&#0;")), "\u{FFFD}");
    assert!(error_codes("&#0;").contains(&ParseErrorCode::NullCharacterReference));
}

#[test]
fn test_numeric_reference_without_digits() {
    assert_eq!(text(&tokenize("&#;")), "&#;");
    assert_eq!(text(&tokenize("&#x;")), "&#x;");
    assert!(error_codes("&#;").contains(
        &ParseErrorCode::AbsenceOfDigitsInNumericCharacterReference
    ));
}

#[test]
fn test_error_offsets_point_into_the_input() {
    let mut tokenizer = HTMLTokenizer::new("abc&zzz;".to_string());
    while tokenizer.next_token().is_some() {}
    let errors = tokenizer.take_errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].offset >= 3);
    assert!(errors[0].offset <= 8);
}

// =============================================================================
// Streaming
// =============================================================================

#[test]
fn test_streaming_tokenizer_waits_for_input() {
    let mut tokenizer = HTMLTokenizer::streaming();
    tokenizer.feed("<di");
    assert_eq!(tokenizer.next_token(), None);

    tokenizer.feed("v>x");
    assert!(tokenizer.next_token().is_some_and(|t| t.is_start_tag("div")));

    tokenizer.close();
    let rest: Vec<Token> = tokenizer.collect();
    assert_eq!(rest, vec![Token::new_character('x'), Token::EndOfFile]);
}

#[test]
fn test_streaming_reference_split_across_chunks() {
    let mut tokenizer = HTMLTokenizer::streaming();
    let mut tokens = Vec::new();
    for chunk in ["&no", "ti", "n;"] {
        tokenizer.feed(chunk);
        tokens.extend(tokenizer.by_ref());
    }
    tokenizer.close();
    tokens.extend(tokenizer.by_ref());
    assert_eq!(text(&tokens), "\u{2209}");
}

#[test]
fn test_streaming_crlf_split_across_chunks() {
    let mut tokenizer = HTMLTokenizer::streaming();
    let mut tokens = Vec::new();
    for chunk in ["a\r", "\nb"] {
        tokenizer.feed(chunk);
        tokens.extend(tokenizer.by_ref());
    }
    tokenizer.close();
    tokens.extend(tokenizer.by_ref());
    assert_eq!(text(&tokens), "a\nb");
}

#[test]
fn test_discarded_input_produces_nothing() {
    let mut tokenizer = HTMLTokenizer::new("<p>text".to_string());
    tokenizer.discard_input();
    assert_eq!(tokenizer.next_token(), None);
}
