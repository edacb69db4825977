//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! State transitions, lookahead, token emission and the bookkeeping the
//! state handlers share.

use super::state_machine::{HTMLTokenizer, TokenizerState};
use super::token::{Attribute, TagBuilder, Token, TokenBuilder};
use crate::error::{ParseErrorCode, ParseIssue};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "Switch to the X state"
    ///
    /// The next character is consumed on the next step. The tree builder also
    /// calls this after the start tags of raw text and RCDATA elements.
    pub const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// The same character is processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }

    /// Stop until more input arrives, without having consumed anything in
    /// the current state.
    pub(super) const fn wait_for_input(&mut self) {
        self.waiting_for_input = true;
    }

    /// Stop until more input arrives, then process the current character
    /// again in the same state.
    pub(super) const fn wait_for_input_and_reconsume(&mut self) {
        self.reconsume = true;
        self.waiting_for_input = true;
    }

    /// The return state set by whichever state entered the character
    /// reference states.
    pub(super) fn take_return_state(&mut self) -> TokenizerState {
        self.return_state.take().unwrap_or(TokenizerState::Data)
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "If the next few characters are..."
    ///
    /// `None` means the answer depends on input that has not arrived yet.
    pub(super) fn next_few_characters_are(&self, target: &str) -> Option<bool> {
        self.input.starts_with(target, false)
    }

    /// "...an ASCII case-insensitive match for the word..."
    pub(super) fn next_few_characters_are_case_insensitive(&self, target: &str) -> Option<bool> {
        self.input.starts_with(target, true)
    }

    /// Consume characters already verified by a lookahead.
    pub(super) fn consume_string(&mut self, target: &str) {
        let _ = self.input.consume(target.chars().count());
    }

    /// [§ 4.5 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// CR never reaches the tokenizer, so it is not listed.
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Emit the current token"
    ///
    /// Finishes the current attribute first, so a duplicate name is dropped
    /// before the token leaves the tokenizer.
    pub(super) fn emit_token(&mut self) {
        self.finish_current_attribute();
        let Some(builder) = self.current_token.take() else {
            return;
        };
        if let TokenBuilder::Tag(tag) = &builder {
            if !tag.is_end {
                self.last_start_tag_name = Some(tag.name.clone());
            } else if !tag.attributes.is_empty() {
                // [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
                // "When an end tag token is emitted with attributes, that is an
                // end-tag-with-attributes parse error."
                self.log_parse_error(ParseErrorCode::EndTagWithAttributes);
            }
        }
        self.pending.push_back(builder.build());
    }

    /// "Emit the current input character as a character token."
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.pending.push_back(Token::new_character(c));
    }

    /// Emit one character token per character of `text`.
    pub(super) fn emit_str(&mut self, text: &str) {
        self.pending.extend(text.chars().map(Token::new_character));
    }

    /// "This is an unexpected-null-character parse error. Emit a U+FFFD
    /// REPLACEMENT CHARACTER character token."
    pub(super) fn emit_replacement_character(&mut self) {
        self.log_parse_error(ParseErrorCode::UnexpectedNullCharacter);
        self.emit_character_token('\u{FFFD}');
    }

    /// "Emit an end-of-file token."
    ///
    /// A tag or comment still under construction is dropped, matching the
    /// "eof-in-tag" handling where the token is never emitted.
    pub(super) fn emit_eof_token(&mut self) {
        self.current_token = None;
        self.pending.push_back(Token::EndOfFile);
        self.at_eof = true;
    }
}

// =============================================================================
// Current Token Helpers
// =============================================================================

impl HTMLTokenizer {
    fn current_tag(&mut self) -> Option<&mut TagBuilder> {
        match &mut self.current_token {
            Some(TokenBuilder::Tag(tag)) => Some(tag),
            _ => None,
        }
    }

    pub(super) fn append_to_tag_name(&mut self, c: char) {
        if let Some(tag) = self.current_tag() {
            tag.name.push(c);
        }
    }

    pub(super) fn append_to_attribute_name(&mut self, c: char) {
        if let Some(attr) = self.current_tag().and_then(|tag| tag.attributes.last_mut()) {
            attr.name.push(c);
        }
    }

    pub(super) fn append_to_attribute_value(&mut self, c: char) {
        if let Some(attr) = self.current_tag().and_then(|tag| tag.attributes.last_mut()) {
            attr.value.push(c);
        }
    }

    pub(super) fn append_to_comment(&mut self, c: char) {
        if let Some(TokenBuilder::Comment(data)) = &mut self.current_token {
            data.push(c);
        }
    }

    pub(super) fn append_str_to_comment(&mut self, text: &str) {
        if let Some(TokenBuilder::Comment(data)) = &mut self.current_token {
            data.push_str(text);
        }
    }

    /// "Start a new attribute in the current tag token."
    pub(super) fn start_new_attribute(&mut self) {
        self.finish_current_attribute();
        if let Some(tag) = self.current_tag() {
            tag.attributes.push(Attribute::new(String::new(), String::new()));
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "When the user agent leaves the attribute name state (and before
    /// emitting the tag token, if appropriate), the complete attribute's name
    /// must be compared to the other attributes on the same token; if there is
    /// already an attribute on the token with the exact same name, then this
    /// is a duplicate-attribute parse error and the new attribute must be
    /// removed from the token."
    ///
    /// The check runs when the next attribute starts or the tag is emitted.
    /// The attribute's value is dropped along with it, so the first
    /// occurrence wins either way.
    pub(super) fn finish_current_attribute(&mut self) {
        let Some(tag) = self.current_tag() else {
            return;
        };
        if tag.current_attribute_is_duplicate() {
            let _ = tag.attributes.pop();
            self.log_parse_error(ParseErrorCode::DuplicateAttribute);
        }
    }
}

// =============================================================================
// RCDATA/RAWTEXT Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        match (&self.last_start_tag_name, &self.current_token) {
            (Some(last_start_tag), Some(TokenBuilder::Tag(tag))) => {
                tag.is_end && &tag.name == last_start_tag
            }
            _ => false,
        }
    }

    /// "Anything else": "Emit a U+003C LESS-THAN SIGN character token, a
    /// U+002F SOLIDUS character token, and a character token for each of the
    /// characters in the temporary buffer (in the order they were added to
    /// the buffer). Reconsume in the RCDATA state."
    ///
    /// Used by all four end tag name states with their own text state.
    pub(super) fn emit_end_tag_name_anything_else(&mut self, text_state: TokenizerState) {
        self.emit_str("</");
        let buffer = std::mem::take(&mut self.temporary_buffer);
        self.emit_str(&buffer);
        self.current_token = None;
        self.reconsume_in(text_state);
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Records a parse error at the current input offset. The tree builder
    /// collects these with [`take_errors`](Self::take_errors).
    pub(super) fn log_parse_error(&mut self, code: ParseErrorCode) {
        let offset = self.input.position();
        tracing::trace!(%code, offset, state = %self.state, "tokenizer parse error");
        self.errors.push(ParseIssue::new(code, offset));
    }
}
