//! Character reference states for the HTML tokenizer.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)

use super::named_character_references::TrieCursor;
use super::state_machine::{HTMLTokenizer, TokenizerState};
use crate::error::ParseErrorCode;

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// "If the number is one of the numbers in the first column of the following
/// table, then find the row with that number in the first column, and set
/// the character reference code to the number in the second column."
///
/// References in the C1 range are read as Windows-1252. Codes in the range
/// with no entry here (0x81, 0x8D, 0x8F, 0x90, 0x9D) are kept as they are.
const C1_REPLACEMENTS: [(u32, char); 27] = [
    (0x80, '\u{20AC}'), // EURO SIGN
    (0x82, '\u{201A}'), // SINGLE LOW-9 QUOTATION MARK
    (0x83, '\u{0192}'), // LATIN SMALL LETTER F WITH HOOK
    (0x84, '\u{201E}'), // DOUBLE LOW-9 QUOTATION MARK
    (0x85, '\u{2026}'), // HORIZONTAL ELLIPSIS
    (0x86, '\u{2020}'), // DAGGER
    (0x87, '\u{2021}'), // DOUBLE DAGGER
    (0x88, '\u{02C6}'), // MODIFIER LETTER CIRCUMFLEX ACCENT
    (0x89, '\u{2030}'), // PER MILLE SIGN
    (0x8A, '\u{0160}'), // LATIN CAPITAL LETTER S WITH CARON
    (0x8B, '\u{2039}'), // SINGLE LEFT-POINTING ANGLE QUOTATION MARK
    (0x8C, '\u{0152}'), // LATIN CAPITAL LIGATURE OE
    (0x8E, '\u{017D}'), // LATIN CAPITAL LETTER Z WITH CARON
    (0x91, '\u{2018}'), // LEFT SINGLE QUOTATION MARK
    (0x92, '\u{2019}'), // RIGHT SINGLE QUOTATION MARK
    (0x93, '\u{201C}'), // LEFT DOUBLE QUOTATION MARK
    (0x94, '\u{201D}'), // RIGHT DOUBLE QUOTATION MARK
    (0x95, '\u{2022}'), // BULLET
    (0x96, '\u{2013}'), // EN DASH
    (0x97, '\u{2014}'), // EM DASH
    (0x98, '\u{02DC}'), // SMALL TILDE
    (0x99, '\u{2122}'), // TRADE MARK SIGN
    (0x9A, '\u{0161}'), // LATIN SMALL LETTER S WITH CARON
    (0x9B, '\u{203A}'), // SINGLE RIGHT-POINTING ANGLE QUOTATION MARK
    (0x9C, '\u{0153}'), // LATIN SMALL LIGATURE OE
    (0x9E, '\u{017E}'), // LATIN SMALL LETTER Z WITH CARON
    (0x9F, '\u{0178}'), // LATIN CAPITAL LETTER Y WITH DIAERESIS
];

/// Anything above this is out of range already, so accumulation can stop
/// growing and never overflows.
const CODE_POINT_CEILING: u32 = 0x11_0000;

impl HTMLTokenizer {
    /// Returns true if the return state is an attribute value state.
    /// Per spec: "consumed as part of an attribute"
    pub(super) const fn is_consumed_as_part_of_attribute(&self) -> bool {
        matches!(
            self.return_state,
            Some(
                TokenizerState::AttributeValueDoubleQuoted
                    | TokenizerState::AttributeValueSingleQuoted
                    | TokenizerState::AttributeValueUnquoted
            )
        )
    }

    /// "Flush code points consumed as a character reference"
    ///
    /// "If the character reference was consumed as part of an attribute, then
    /// append each character to the current attribute's value. Otherwise,
    /// emit each character as a character token."
    pub(super) fn flush_code_points_consumed_as_character_reference(&mut self) {
        let buffer = std::mem::take(&mut self.temporary_buffer);
        if self.is_consumed_as_part_of_attribute() {
            for c in buffer.chars() {
                self.append_to_attribute_value(c);
            }
        } else {
            self.emit_str(&buffer);
        }
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    pub(super) fn handle_character_reference_state(&mut self) {
        // "Set the temporary buffer to the empty string. Append a U+0026
        // AMPERSAND (&) character to the temporary buffer."
        self.temporary_buffer.clear();
        self.temporary_buffer.push('&');

        match self.current_input_character {
            Some(c) if c.is_ascii_alphanumeric() => {
                self.reconsume_in(TokenizerState::NamedCharacterReference);
            }
            Some('#') => {
                self.temporary_buffer.push('#');
                self.switch_to(TokenizerState::NumericCharacterReference);
            }
            _ => {
                self.flush_code_points_consumed_as_character_reference();
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
        }
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    ///
    /// "Consume the maximum number of characters possible, where the consumed
    /// characters are one of the identifiers in the first column of the named
    /// character references table. Append each character to the temporary
    /// buffer when it's consumed."
    ///
    /// The walk follows the trie as far as it goes, then returns whatever was
    /// read past the longest match to the input. If the buffer runs out while
    /// the trie could still continue and more input may arrive, everything is
    /// returned and the state is retried later.
    pub(super) fn handle_named_character_reference_state(&mut self) {
        let Some(first) = self.current_input_character else {
            self.flush_code_points_consumed_as_character_reference();
            let return_state = self.take_return_state();
            return self.reconsume_in(return_state);
        };

        // Characters read after `first`, and the longest match as a count of
        // those characters plus its replacement text.
        let mut consumed = String::new();
        let mut read = 0usize;
        let mut best: Option<(usize, &'static str)> = None;

        if let Some(mut cursor) = TrieCursor::root().step(first) {
            if let Some(value) = cursor.value() {
                best = Some((0, value));
            }
            while cursor.has_children() {
                let Some(c) = self.input.next_char() else {
                    if self.input.is_closed() {
                        break;
                    }
                    self.input.pushback(&consumed);
                    return self.wait_for_input_and_reconsume();
                };
                consumed.push(c);
                read += 1;
                let Some(next) = cursor.step(c) else {
                    break;
                };
                cursor = next;
                if let Some(value) = cursor.value() {
                    best = Some((read, value));
                }
            }
        }

        let Some((matched, value)) = best else {
            // "Otherwise: Flush code points consumed as a character reference.
            // Switch to the ambiguous ampersand state."
            self.input.pushback(&consumed);
            self.flush_code_points_consumed_as_character_reference();
            return self.reconsume_in(TokenizerState::AmbiguousAmpersand);
        };

        let split = consumed
            .char_indices()
            .nth(matched)
            .map_or(consumed.len(), |(index, _)| index);
        let (name_tail, overflow) = consumed.split_at(split);
        self.input.pushback(overflow);
        self.temporary_buffer.push(first);
        self.temporary_buffer.push_str(name_tail);

        let ends_with_semicolon = self.temporary_buffer.ends_with(';');

        // "If the character reference was consumed as part of an attribute, and
        // the last character matched is not a U+003B SEMICOLON character (;),
        // and the next input character is either a U+003D EQUALS SIGN character
        // (=) or an ASCII alphanumeric, then, for historical reasons, flush code
        // points consumed as a character reference and switch to the return
        // state."
        if self.is_consumed_as_part_of_attribute() && !ends_with_semicolon {
            let next = self.input.peek(0);
            if next.is_none() && !self.input.is_closed() {
                let taken = self.temporary_buffer.split_off(1);
                self.input.pushback(&taken[first.len_utf8()..]);
                return self.wait_for_input_and_reconsume();
            }
            if next.is_some_and(|c| c == '=' || c.is_ascii_alphanumeric()) {
                self.flush_code_points_consumed_as_character_reference();
                let return_state = self.take_return_state();
                return self.switch_to(return_state);
            }
        }

        // "If the last character matched is not a U+003B SEMICOLON character
        // (;), then this is a missing-semicolon-after-character-reference parse
        // error. Set the temporary buffer to the empty string. Append one or two
        // characters corresponding to the character reference name to the
        // temporary buffer. Flush code points consumed as a character
        // reference. Switch to the return state."
        if !ends_with_semicolon {
            self.log_parse_error(ParseErrorCode::MissingSemicolonAfterCharacterReference);
        }
        self.temporary_buffer.clear();
        self.temporary_buffer.push_str(value);
        self.flush_code_points_consumed_as_character_reference();
        let return_state = self.take_return_state();
        self.switch_to(return_state);
    }

    /// [§ 13.2.5.74 Ambiguous ampersand state](https://html.spec.whatwg.org/multipage/parsing.html#ambiguous-ampersand-state)
    pub(super) fn handle_ambiguous_ampersand_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphanumeric() => {
                if self.is_consumed_as_part_of_attribute() {
                    self.append_to_attribute_value(c);
                } else {
                    self.emit_character_token(c);
                }
            }
            Some(';') => {
                self.log_parse_error(ParseErrorCode::UnknownNamedCharacterReference);
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
            _ => {
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
        }
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    pub(super) fn handle_numeric_character_reference_state(&mut self) {
        self.character_reference_code = 0;
        match self.current_input_character {
            Some(c @ ('x' | 'X')) => {
                self.temporary_buffer.push(c);
                self.switch_to(TokenizerState::HexadecimalCharacterReferenceStart);
            }
            _ => self.reconsume_in(TokenizerState::DecimalCharacterReferenceStart),
        }
    }

    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    pub(super) fn handle_hexadecimal_character_reference_start_state(&mut self) {
        if self
            .current_input_character
            .is_some_and(|c| c.is_ascii_hexdigit())
        {
            self.reconsume_in(TokenizerState::HexadecimalCharacterReference);
        } else {
            self.abandon_numeric_character_reference();
        }
    }

    /// [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    pub(super) fn handle_decimal_character_reference_start_state(&mut self) {
        if self
            .current_input_character
            .is_some_and(|c| c.is_ascii_digit())
        {
            self.reconsume_in(TokenizerState::DecimalCharacterReference);
        } else {
            self.abandon_numeric_character_reference();
        }
    }

    /// "This is an absence-of-digits-in-numeric-character-reference parse
    /// error. Flush code points consumed as a character reference. Reconsume
    /// in the return state."
    fn abandon_numeric_character_reference(&mut self) {
        self.log_parse_error(ParseErrorCode::AbsenceOfDigitsInNumericCharacterReference);
        self.flush_code_points_consumed_as_character_reference();
        let return_state = self.take_return_state();
        self.reconsume_in(return_state);
    }

    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    pub(super) fn handle_hexadecimal_character_reference_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_hexdigit() => {
                // is_ascii_hexdigit guarantees a digit value
                let digit = c.to_digit(16).unwrap_or(0);
                self.accumulate_character_reference_code(16, digit);
            }
            Some(';') => self.switch_to(TokenizerState::NumericCharacterReferenceEnd),
            _ => {
                self.log_parse_error(ParseErrorCode::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(TokenizerState::NumericCharacterReferenceEnd);
            }
        }
    }

    /// [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    pub(super) fn handle_decimal_character_reference_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_digit() => {
                let digit = c.to_digit(10).unwrap_or(0);
                self.accumulate_character_reference_code(10, digit);
            }
            Some(';') => self.switch_to(TokenizerState::NumericCharacterReferenceEnd),
            _ => {
                self.log_parse_error(ParseErrorCode::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(TokenizerState::NumericCharacterReferenceEnd);
            }
        }
    }

    /// "Multiply the character reference code by 16. Add a numeric version of
    /// the current input character to the character reference code."
    const fn accumulate_character_reference_code(&mut self, radix: u32, digit: u32) {
        let code = self
            .character_reference_code
            .saturating_mul(radix)
            .saturating_add(digit);
        self.character_reference_code = if code > CODE_POINT_CEILING {
            CODE_POINT_CEILING
        } else {
            code
        };
    }

    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    ///
    /// Consumes nothing. When entered by "reconsume", the pending character is
    /// reconsumed in the return state.
    pub(super) fn handle_numeric_character_reference_end_state(&mut self) {
        let code = self.character_reference_code;
        let resolved = match code {
            // "If the number is 0x00, then this is a null-character-reference
            // parse error. Set the character reference code to 0xFFFD."
            0 => {
                self.log_parse_error(ParseErrorCode::NullCharacterReference);
                '\u{FFFD}'
            }
            // "If the number is greater than 0x10FFFF, then this is a
            // character-reference-outside-unicode-range parse error."
            c if c > 0x10_FFFF => {
                self.log_parse_error(ParseErrorCode::CharacterReferenceOutsideUnicodeRange);
                '\u{FFFD}'
            }
            // "If the number is a surrogate, then this is a
            // surrogate-character-reference parse error."
            0xD800..=0xDFFF => {
                self.log_parse_error(ParseErrorCode::SurrogateCharacterReference);
                '\u{FFFD}'
            }
            c => {
                if is_noncharacter(c) {
                    self.log_parse_error(ParseErrorCode::NoncharacterCharacterReference);
                }
                // "If the number is 0x0D, or a control that's not ASCII
                // whitespace, then this is a control-character-reference parse
                // error."
                let mut c = c;
                if c == 0x0D || (is_control(c) && !is_ascii_whitespace(c)) {
                    self.log_parse_error(ParseErrorCode::ControlCharacterReference);
                    if let Some(&(_, replacement)) =
                        C1_REPLACEMENTS.iter().find(|&&(from, _)| from == c)
                    {
                        c = u32::from(replacement);
                    }
                }
                char::from_u32(c).unwrap_or('\u{FFFD}')
            }
        };

        // "Set the temporary buffer to the empty string. Append a code point
        // equal to the character reference code to the temporary buffer. Flush
        // code points consumed as a character reference. Switch to the return
        // state."
        self.temporary_buffer.clear();
        self.temporary_buffer.push(resolved);
        self.flush_code_points_consumed_as_character_reference();
        let return_state = self.take_return_state();
        self.switch_to(return_state);
    }
}

/// [Noncharacter](https://infra.spec.whatwg.org/#noncharacter): U+FDD0 to
/// U+FDEF, and the last two code points of every plane.
const fn is_noncharacter(c: u32) -> bool {
    matches!(c, 0xFDD0..=0xFDEF) || (c & 0xFFFE) == 0xFFFE
}

/// [Control](https://infra.spec.whatwg.org/#control): a C0 control or U+007F
/// DELETE to U+009F.
const fn is_control(c: u32) -> bool {
    c <= 0x1F || matches!(c, 0x7F..=0x9F)
}

const fn is_ascii_whitespace(c: u32) -> bool {
    matches!(c, 0x09 | 0x0A | 0x0C | 0x0D | 0x20)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noncharacters() {
        assert!(is_noncharacter(0xFDD0));
        assert!(is_noncharacter(0xFFFF));
        assert!(is_noncharacter(0x10_FFFE));
        assert!(!is_noncharacter(0xFFFD));
    }

    #[test]
    fn test_c1_table_is_sorted_and_in_range() {
        assert!(C1_REPLACEMENTS.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(C1_REPLACEMENTS.iter().all(|&(code, _)| (0x80..=0x9F).contains(&code)));
    }
}
