//! Comment, DOCTYPE and CDATA states.
//!
//! [§ 13.2.5.41](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
//! through [§ 13.2.5.71](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-end-state).

use super::state_machine::{HTMLTokenizer, TokenizerState};
use super::token::{DoctypeBuilder, TokenBuilder};
use crate::error::ParseErrorCode;

// =============================================================================
// Comments
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    pub(super) fn handle_bogus_comment_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some('\0') => {
                self.log_parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_comment('\u{FFFD}');
            }
            Some(c) => self.append_to_comment(c),
            None => {
                self.emit_token();
                self.emit_eof_token();
            }
        }
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// This state looks ahead instead of consuming. If the buffered input is
    /// a prefix of one of the keywords, it waits for more.
    pub(super) fn handle_markup_declaration_open_state(&mut self) {
        // "Two U+002D HYPHEN-MINUS characters (-)": "Consume those two
        // characters, create a comment token whose data is the empty string,
        // and switch to the comment start state."
        match self.next_few_characters_are("--") {
            Some(true) => {
                self.consume_string("--");
                self.current_token = Some(TokenBuilder::comment(""));
                self.switch_to(TokenizerState::CommentStart);
                return;
            }
            None => return self.wait_for_input(),
            Some(false) => {}
        }

        // "ASCII case-insensitive match for the word "DOCTYPE"": "Consume those
        // characters and switch to the DOCTYPE state."
        match self.next_few_characters_are_case_insensitive("DOCTYPE") {
            Some(true) => {
                self.consume_string("DOCTYPE");
                self.switch_to(TokenizerState::DOCTYPE);
                return;
            }
            None => return self.wait_for_input(),
            Some(false) => {}
        }

        // "The string "[CDATA[" (the five uppercase letters "CDATA" with a
        // U+005B LEFT SQUARE BRACKET character before and after)": "Consume
        // those characters. If there is an adjusted current node and it is not
        // an element in the HTML namespace, then switch to the CDATA section
        // state. Otherwise, this is a cdata-in-html-content parse error. Create
        // a comment token whose data is the "[CDATA[" string. Switch to the
        // bogus comment state."
        match self.next_few_characters_are("[CDATA[") {
            Some(true) => {
                self.consume_string("[CDATA[");
                if self.allow_cdata {
                    self.switch_to(TokenizerState::CDATASection);
                } else {
                    self.log_parse_error(ParseErrorCode::CdataInHtmlContent);
                    self.current_token = Some(TokenBuilder::comment("[CDATA["));
                    self.switch_to(TokenizerState::BogusComment);
                }
                return;
            }
            None => return self.wait_for_input(),
            Some(false) => {}
        }

        // "Anything else": "This is an incorrectly-opened-comment parse error.
        // Create a comment token whose data is the empty string. Switch to the
        // bogus comment state (don't consume anything in the current state)."
        self.log_parse_error(ParseErrorCode::IncorrectlyOpenedComment);
        self.current_token = Some(TokenBuilder::comment(""));
        self.switch_to(TokenizerState::BogusComment);
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    pub(super) fn handle_comment_start_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentStartDash),
            Some('>') => {
                self.log_parse_error(ParseErrorCode::AbruptClosingOfEmptyComment);
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    pub(super) fn handle_comment_start_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            Some('>') => {
                self.log_parse_error(ParseErrorCode::AbruptClosingOfEmptyComment);
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.emit_comment_at_eof(),
            Some(_) => {
                self.append_to_comment('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    pub(super) fn handle_comment_state(&mut self) {
        match self.current_input_character {
            Some('<') => {
                self.append_to_comment('<');
                self.switch_to(TokenizerState::CommentLessThanSign);
            }
            Some('-') => self.switch_to(TokenizerState::CommentEndDash),
            Some('\0') => {
                self.log_parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_comment('\u{FFFD}');
            }
            Some(c) => self.append_to_comment(c),
            None => self.emit_comment_at_eof(),
        }
    }

    /// [§ 13.2.5.46 Comment less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-state)
    pub(super) fn handle_comment_less_than_sign_state(&mut self) {
        match self.current_input_character {
            Some('!') => {
                self.append_to_comment('!');
                self.switch_to(TokenizerState::CommentLessThanSignBang);
            }
            Some('<') => self.append_to_comment('<'),
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.47 Comment less-than sign bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-state)
    pub(super) fn handle_comment_less_than_sign_bang_state(&mut self) {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::CommentLessThanSignBangDash);
        } else {
            self.reconsume_in(TokenizerState::Comment);
        }
    }

    /// [§ 13.2.5.48 Comment less-than sign bang dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-state)
    pub(super) fn handle_comment_less_than_sign_bang_dash_state(&mut self) {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::CommentLessThanSignBangDashDash);
        } else {
            self.reconsume_in(TokenizerState::CommentEndDash);
        }
    }

    /// [§ 13.2.5.49 Comment less-than sign bang dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-dash-state)
    pub(super) fn handle_comment_less_than_sign_bang_dash_dash_state(&mut self) {
        match self.current_input_character {
            Some('>') | None => {}
            Some(_) => self.log_parse_error(ParseErrorCode::NestedComment),
        }
        self.reconsume_in(TokenizerState::CommentEnd);
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    pub(super) fn handle_comment_end_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            None => self.emit_comment_at_eof(),
            Some(_) => {
                self.append_to_comment('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    pub(super) fn handle_comment_end_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some('!') => self.switch_to(TokenizerState::CommentEndBang),
            Some('-') => self.append_to_comment('-'),
            None => self.emit_comment_at_eof(),
            Some(_) => {
                self.append_str_to_comment("--");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    pub(super) fn handle_comment_end_bang_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.append_str_to_comment("--!");
                self.switch_to(TokenizerState::CommentEndDash);
            }
            Some('>') => {
                self.log_parse_error(ParseErrorCode::IncorrectlyClosedComment);
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.emit_comment_at_eof(),
            Some(_) => {
                self.append_str_to_comment("--!");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// "This is an eof-in-comment parse error. Emit the current comment
    /// token. Emit an end-of-file token."
    fn emit_comment_at_eof(&mut self) {
        self.log_parse_error(ParseErrorCode::EofInComment);
        self.emit_token();
        self.emit_eof_token();
    }
}

// =============================================================================
// DOCTYPE
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    pub(super) fn handle_doctype_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPEName);
            }
            Some('>') => self.reconsume_in(TokenizerState::BeforeDOCTYPEName),
            // "This is an eof-in-doctype parse error. Create a new DOCTYPE
            // token. Set its force-quirks flag to on. Emit the current token.
            // Emit an end-of-file token."
            None => {
                self.current_token = Some(TokenBuilder::doctype());
                self.emit_doctype_at_eof();
            }
            Some(_) => {
                self.log_parse_error(ParseErrorCode::MissingWhitespaceBeforeDoctypeName);
                self.reconsume_in(TokenizerState::BeforeDOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    pub(super) fn handle_before_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('\0') => {
                self.log_parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.start_doctype_with_name('\u{FFFD}');
            }
            Some('>') => {
                self.log_parse_error(ParseErrorCode::MissingDoctypeName);
                self.current_token = Some(TokenBuilder::doctype());
                self.with_doctype(|doctype| doctype.force_quirks = true);
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => {
                self.current_token = Some(TokenBuilder::doctype());
                self.emit_doctype_at_eof();
            }
            // "ASCII upper alpha: Create a new DOCTYPE token. Set the token's
            // name to the lowercase version of the current input character."
            Some(c) => self.start_doctype_with_name(c.to_ascii_lowercase()),
        }
    }

    fn start_doctype_with_name(&mut self, first: char) {
        self.current_token = Some(TokenBuilder::doctype());
        self.with_doctype(|doctype| doctype.name = Some(first.to_string()));
        self.switch_to(TokenizerState::DOCTYPEName);
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    pub(super) fn handle_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::AfterDOCTYPEName);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some('\0') => {
                self.log_parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.with_doctype(|doctype| push_to(&mut doctype.name, '\u{FFFD}'));
            }
            Some(c) => {
                self.with_doctype(|doctype| push_to(&mut doctype.name, c.to_ascii_lowercase()));
            }
            None => self.emit_doctype_at_eof(),
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    pub(super) fn handle_after_doctype_name_state(&mut self) {
        let c = match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => return,
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
                return;
            }
            None => return self.emit_doctype_at_eof(),
            Some(c) => c,
        };

        // "If the six characters starting from the current input character are
        // an ASCII case-insensitive match for the word "PUBLIC", then consume
        // those characters and switch to the after DOCTYPE public keyword
        // state."
        for (keyword, next_state) in [
            ("PUBLIC", TokenizerState::AfterDOCTYPEPublicKeyword),
            ("SYSTEM", TokenizerState::AfterDOCTYPESystemKeyword),
        ] {
            let mut letters = keyword.chars();
            if !letters.next().is_some_and(|k| k.eq_ignore_ascii_case(&c)) {
                continue;
            }
            let rest = letters.as_str();
            match self.next_few_characters_are_case_insensitive(rest) {
                Some(true) => {
                    self.consume_string(rest);
                    self.switch_to(next_state);
                    return;
                }
                None => return self.wait_for_input_and_reconsume(),
                Some(false) => {}
            }
        }

        // "Otherwise, this is an invalid-character-sequence-after-doctype-name
        // parse error. Set the current DOCTYPE token's force-quirks flag to
        // on. Reconsume in the bogus DOCTYPE state."
        self.log_parse_error(ParseErrorCode::InvalidCharacterSequenceAfterDoctypeName);
        self.with_doctype(|doctype| doctype.force_quirks = true);
        self.reconsume_in(TokenizerState::BogusDOCTYPE);
    }

    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    pub(super) fn handle_after_doctype_public_keyword_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPEPublicIdentifier);
            }
            Some(quote @ ('"' | '\'')) => {
                self.log_parse_error(ParseErrorCode::MissingWhitespaceAfterDoctypePublicKeyword);
                self.begin_public_identifier(quote);
            }
            _ => self.handle_missing_public_identifier(),
        }
    }

    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    pub(super) fn handle_before_doctype_public_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some(quote @ ('"' | '\'')) => self.begin_public_identifier(quote),
            _ => self.handle_missing_public_identifier(),
        }
    }

    /// "Set the current DOCTYPE token's public identifier to the empty string
    /// (not missing), then switch to the DOCTYPE public identifier
    /// (double-quoted) state."
    fn begin_public_identifier(&mut self, quote: char) {
        self.with_doctype(|doctype| doctype.public_identifier = Some(String::new()));
        self.switch_to(if quote == '"' {
            TokenizerState::DOCTYPEPublicIdentifierDoubleQuoted
        } else {
            TokenizerState::DOCTYPEPublicIdentifierSingleQuoted
        });
    }

    /// The `>`, EOF and "anything else" branches shared by the two states
    /// that expect a quoted public identifier.
    fn handle_missing_public_identifier(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.log_parse_error(ParseErrorCode::MissingDoctypePublicIdentifier);
                self.with_doctype(|doctype| doctype.force_quirks = true);
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.emit_doctype_at_eof(),
            Some(_) => {
                self.log_parse_error(ParseErrorCode::MissingQuoteBeforeDoctypePublicIdentifier);
                self.with_doctype(|doctype| doctype.force_quirks = true);
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    /// [§ 13.2.5.60 DOCTYPE public identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(single-quoted)-state)
    pub(super) fn handle_doctype_public_identifier_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterDOCTYPEPublicIdentifier),
            Some('\0') => {
                self.log_parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.with_doctype(|doctype| push_to(&mut doctype.public_identifier, '\u{FFFD}'));
            }
            Some('>') => {
                self.log_parse_error(ParseErrorCode::AbruptDoctypePublicIdentifier);
                self.with_doctype(|doctype| doctype.force_quirks = true);
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some(c) => self.with_doctype(|doctype| push_to(&mut doctype.public_identifier, c)),
            None => self.emit_doctype_at_eof(),
        }
    }

    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    pub(super) fn handle_after_doctype_public_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BetweenDOCTYPEPublicAndSystemIdentifiers);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some(quote @ ('"' | '\'')) => {
                self.log_parse_error(
                    ParseErrorCode::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                );
                self.begin_system_identifier(quote);
            }
            _ => self.handle_missing_system_identifier_quote(),
        }
    }

    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    pub(super) fn handle_between_doctype_public_and_system_identifiers_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some(quote @ ('"' | '\'')) => self.begin_system_identifier(quote),
            _ => self.handle_missing_system_identifier_quote(),
        }
    }

    /// [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    pub(super) fn handle_after_doctype_system_keyword_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPESystemIdentifier);
            }
            Some(quote @ ('"' | '\'')) => {
                self.log_parse_error(ParseErrorCode::MissingWhitespaceAfterDoctypeSystemKeyword);
                self.begin_system_identifier(quote);
            }
            _ => self.handle_missing_system_identifier(),
        }
    }

    /// [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    pub(super) fn handle_before_doctype_system_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some(quote @ ('"' | '\'')) => self.begin_system_identifier(quote),
            _ => self.handle_missing_system_identifier(),
        }
    }

    fn begin_system_identifier(&mut self, quote: char) {
        self.with_doctype(|doctype| doctype.system_identifier = Some(String::new()));
        self.switch_to(if quote == '"' {
            TokenizerState::DOCTYPESystemIdentifierDoubleQuoted
        } else {
            TokenizerState::DOCTYPESystemIdentifierSingleQuoted
        });
    }

    /// After the SYSTEM keyword, `>` means the identifier is missing.
    fn handle_missing_system_identifier(&mut self) {
        if self.current_input_character == Some('>') {
            self.log_parse_error(ParseErrorCode::MissingDoctypeSystemIdentifier);
            self.with_doctype(|doctype| doctype.force_quirks = true);
            self.switch_to(TokenizerState::Data);
            self.emit_token();
        } else {
            self.handle_missing_system_identifier_quote();
        }
    }

    fn handle_missing_system_identifier_quote(&mut self) {
        if self.current_input_character.is_none() {
            self.emit_doctype_at_eof();
        } else {
            self.log_parse_error(ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier);
            self.with_doctype(|doctype| doctype.force_quirks = true);
            self.reconsume_in(TokenizerState::BogusDOCTYPE);
        }
    }

    /// [§ 13.2.5.65 DOCTYPE system identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(double-quoted)-state)
    /// [§ 13.2.5.66 DOCTYPE system identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(single-quoted)-state)
    pub(super) fn handle_doctype_system_identifier_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterDOCTYPESystemIdentifier),
            Some('\0') => {
                self.log_parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.with_doctype(|doctype| push_to(&mut doctype.system_identifier, '\u{FFFD}'));
            }
            Some('>') => {
                self.log_parse_error(ParseErrorCode::AbruptDoctypeSystemIdentifier);
                self.with_doctype(|doctype| doctype.force_quirks = true);
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some(c) => self.with_doctype(|doctype| push_to(&mut doctype.system_identifier, c)),
            None => self.emit_doctype_at_eof(),
        }
    }

    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    pub(super) fn handle_after_doctype_system_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.emit_doctype_at_eof(),
            // "(This does not set the current DOCTYPE token's force-quirks
            // flag to on.)"
            Some(_) => {
                self.log_parse_error(ParseErrorCode::UnexpectedCharacterAfterDoctypeSystemIdentifier);
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    pub(super) fn handle_bogus_doctype_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some('\0') => self.log_parse_error(ParseErrorCode::UnexpectedNullCharacter),
            Some(_) => {}
            None => {
                self.emit_token();
                self.emit_eof_token();
            }
        }
    }

    /// "This is an eof-in-doctype parse error. Set the current DOCTYPE token's
    /// force-quirks flag to on. Emit the current DOCTYPE token. Emit an
    /// end-of-file token."
    fn emit_doctype_at_eof(&mut self) {
        self.log_parse_error(ParseErrorCode::EofInDoctype);
        self.with_doctype(|doctype| doctype.force_quirks = true);
        self.emit_token();
        self.emit_eof_token();
    }

    fn with_doctype(&mut self, f: impl FnOnce(&mut DoctypeBuilder)) {
        if let Some(TokenBuilder::Doctype(doctype)) = &mut self.current_token {
            f(doctype);
        }
    }
}

/// "Append the current input character to the current DOCTYPE token's ..."
/// A missing field becomes present on its first character.
fn push_to(field: &mut Option<String>, c: char) {
    field.get_or_insert_with(String::new).push(c);
}

// =============================================================================
// CDATA
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    ///
    /// U+0000 is emitted as-is; the tree builder handles it in foreign content.
    pub(super) fn handle_cdata_section_state(&mut self) {
        match self.current_input_character {
            Some(']') => self.switch_to(TokenizerState::CDATASectionBracket),
            Some(c) => self.emit_character_token(c),
            None => {
                self.log_parse_error(ParseErrorCode::EofInCdata);
                self.emit_eof_token();
            }
        }
    }

    /// [§ 13.2.5.70 CDATA section bracket state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-bracket-state)
    pub(super) fn handle_cdata_section_bracket_state(&mut self) {
        if self.current_input_character == Some(']') {
            self.switch_to(TokenizerState::CDATASectionEnd);
        } else {
            self.emit_character_token(']');
            self.reconsume_in(TokenizerState::CDATASection);
        }
    }

    /// [§ 13.2.5.71 CDATA section end state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-end-state)
    pub(super) fn handle_cdata_section_end_state(&mut self) {
        match self.current_input_character {
            Some(']') => self.emit_character_token(']'),
            Some('>') => self.switch_to(TokenizerState::Data),
            _ => {
                self.emit_str("]]");
                self.reconsume_in(TokenizerState::CDATASection);
            }
        }
    }
}
