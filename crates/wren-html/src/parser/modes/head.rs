//! Everything up to the `body`: "in head", "in head noscript", "after head",
//! and the "text" mode that raw text and RCDATA elements return through.

use super::{is_end_tag_one_of, is_start_tag_one_of, is_whitespace_token, synthetic_start_tag};
use crate::error::ParseErrorCode;
use crate::parser::core::{HTMLParser, InsertionMode};
use crate::parser::open_elements::StackEntry;
use crate::tokenizer::{Token, TokenizerState};
use wren_dom::Namespace;

/// Void metadata elements that are inserted and immediately popped.
const HEAD_VOID_ELEMENTS: &[&str] = &["base", "basefont", "bgsound", "link", "meta"];

/// Start tags that "after head" hands back to the "in head" rules.
const HEAD_ELEMENTS_AFTER_HEAD: &[&str] = &[
    "base", "basefont", "bgsound", "link", "meta", "noframes", "script", "style", "template",
    "title",
];

impl HTMLParser {
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(in crate::parser) fn handle_in_head_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Insert the character."
            Token::Character { data } if Self::is_whitespace(*data) => self.insert_character(*data),

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::UnexpectedDoctype, token),

            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is "html""
                // "Process the token using the rules for the "in body" insertion mode."
                "html" => self.process_using_rules_for(InsertionMode::InBody, token),

                // "A start tag whose tag name is one of: "base", "basefont",
                // "bgsound", "link""
                // "Insert an HTML element for the token. Immediately pop the
                // current node off the stack of open elements."
                // "Acknowledge the token's self-closing flag, if it is set."
                //
                // "meta" follows the same steps; the character encoding
                // changes it also describes have no effect on a parse of
                // already decoded text.
                n if HEAD_VOID_ELEMENTS.contains(&n) => {
                    let _ = self.insert_html_element(token);
                    let _ = self.stack.pop();
                    self.acknowledge_self_closing();
                }

                // "A start tag whose tag name is "title""
                // "Follow the generic RCDATA element parsing algorithm."
                "title" => self.parse_generic_rcdata(token),

                // "A start tag whose tag name is "noscript", if the scripting
                // flag is enabled"
                // "A start tag whose tag name is one of: "noframes", "style""
                // "Follow the generic raw text element parsing algorithm."
                "noscript" if self.config.scripting => self.parse_generic_raw_text(token),
                "noframes" | "style" => self.parse_generic_raw_text(token),

                // "A start tag whose tag name is "noscript", if the scripting
                // flag is disabled"
                // "Insert an HTML element for the token."
                // "Switch the insertion mode to "in head noscript"."
                "noscript" => {
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InHeadNoscript);
                }

                // "A start tag whose tag name is "script""
                "script" => self.insert_script_element(token),

                // "A start tag whose tag name is "template""
                "template" => {
                    // "Insert an HTML element for the token."
                    let _ = self.insert_html_element(token);
                    // "Insert a marker at the end of the list of active
                    // formatting elements."
                    self.active_formatting_elements.push_marker();
                    // "Set the frameset-ok flag to "not ok"."
                    self.frameset_ok = false;
                    // "Switch the insertion mode to "in template"."
                    self.switch_mode(InsertionMode::InTemplate);
                    // "Push "in template" onto the stack of template insertion
                    // modes so that it is the new current template insertion
                    // mode."
                    self.template_insertion_modes.push(InsertionMode::InTemplate);
                }

                // "A start tag whose tag name is "head""
                // "Parse error. Ignore the token."
                "head" => self.parse_error(ParseErrorCode::UnexpectedStartTag, token),

                _ => self.in_head_anything_else(token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "head""
                // "Pop the current node (which will be the head element) off
                // the stack of open elements."
                // "Switch the insertion mode to "after head"."
                "head" => {
                    let _ = self.stack.pop();
                    self.switch_mode(InsertionMode::AfterHead);
                }

                // "An end tag whose tag name is one of: "body", "html", "br""
                // "Act as described in the "anything else" entry below."
                "body" | "html" | "br" => self.in_head_anything_else(token),

                // "An end tag whose tag name is "template""
                "template" => self.close_template_element(token),

                // "Any other end tag"
                // "Parse error. Ignore the token."
                _ => self.parse_error(ParseErrorCode::UnexpectedEndTag, token),
            },

            _ => self.in_head_anything_else(token),
        }
    }

    /// "Pop the current node (which will be the head element) off the stack of
    /// open elements."
    /// "Switch the insertion mode to "after head"."
    /// "Reprocess the token."
    fn in_head_anything_else(&mut self, token: &Token) {
        let _ = self.stack.pop();
        self.switch_mode(InsertionMode::AfterHead);
        self.process_token(token);
    }

    /// The "in head" steps for a `script` start tag. Nothing is ever run, so
    /// the element is inserted and its contents become its text.
    fn insert_script_element(&mut self, token: &Token) {
        // STEP 1: "Let the adjusted insertion location be the appropriate place
        //          for inserting a node."
        let place = self.appropriate_place(None);

        // STEP 2: "Create an element for the token in the HTML namespace, with
        //          the intended parent being the element in which the adjusted
        //          insertion location finds itself."
        let script = self.create_element_for_token(token, Namespace::Html);

        // STEP 6: "Insert the newly created element at the adjusted insertion
        //          location."
        self.insert_node_at(place, script);

        // STEP 7: "Push the element onto the stack of open elements so that it
        //          is the new current node."
        self.stack
            .push(StackEntry::new(script, "script", Namespace::Html));

        // STEP 8: "Switch the tokenizer to the script data state."
        self.tokenizer.switch_to(TokenizerState::ScriptData);

        // STEP 9-10: "Let the original insertion mode be the current insertion
        //             mode." "Switch the insertion mode to "text"."
        self.switch_mode_returning(InsertionMode::Text);
    }

    /// The "in head" steps for a `template` end tag, also reached from "in
    /// body", "in table" and "in template".
    pub(in crate::parser) fn close_template_element(&mut self, token: &Token) {
        // "If there is no template element on the stack of open elements, then
        // this is a parse error; ignore the token."
        if !self.stack.contains_html("template") {
            self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
            return;
        }

        // STEP 1: "Generate all implied end tags thoroughly."
        self.stack.generate_all_implied_end_tags_thoroughly();

        // STEP 2: "If the current node is not a template element, then this is
        //          a parse error."
        if !self.current_node_is("template") {
            self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
        }

        // STEP 3: "Pop elements from the stack of open elements until a
        //          template element has been popped from the stack."
        self.stack.pop_until("template");

        // STEP 4: "Clear the list of active formatting elements up to the last
        //          marker."
        self.active_formatting_elements.clear_to_last_marker();

        // STEP 5: "Pop the current template insertion mode off the stack of
        //          template insertion modes."
        let _ = self.template_insertion_modes.pop();

        // STEP 6: "Reset the insertion mode appropriately."
        self.reset_insertion_mode_appropriately();
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(in crate::parser) fn handle_in_head_noscript_mode(&mut self, token: &Token) {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::UnexpectedDoctype, token),

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "An end tag whose tag name is "noscript""
            // "Pop the current node (which will be a noscript element) from the
            // stack of open elements; the new current node will be a head
            // element."
            // "Switch the insertion mode to "in head"."
            Token::EndTag { name, .. } if name == "noscript" => {
                let _ = self.stack.pop();
                self.switch_mode(InsertionMode::InHead);
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A
            // LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR),
            // or U+0020 SPACE"
            // "A comment token"
            // "A start tag whose tag name is one of: "basefont", "bgsound",
            // "link", "meta", "noframes", "style""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::Comment { .. } => self.process_using_rules_for(InsertionMode::InHead, token),
            _ if is_whitespace_token(token)
                || is_start_tag_one_of(
                    token,
                    &["basefont", "bgsound", "link", "meta", "noframes", "style"],
                ) =>
            {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            // "An end tag whose tag name is "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name, .. } if name == "br" => self.in_head_noscript_anything_else(token),

            // "A start tag whose tag name is one of: "head", "noscript""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            _ if is_start_tag_one_of(token, &["head", "noscript"]) => {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
            }
            Token::EndTag { .. } => self.parse_error(ParseErrorCode::UnexpectedEndTag, token),

            _ => self.in_head_noscript_anything_else(token),
        }
    }

    /// "Parse error."
    /// "Pop the current node (which will be a noscript element) from the stack
    /// of open elements; the new current node will be a head element."
    /// "Switch the insertion mode to "in head"."
    /// "Reprocess the token."
    fn in_head_noscript_anything_else(&mut self, token: &Token) {
        let code = match token {
            Token::Character { .. } => ParseErrorCode::UnexpectedCharacter,
            Token::EndOfFile => ParseErrorCode::UnexpectedEofInElement,
            _ => ParseErrorCode::UnexpectedStartTag,
        };
        self.parse_error_detail(code, token.tag_name().or(Some("noscript")));
        let _ = self.stack.pop();
        self.switch_mode(InsertionMode::InHead);
        self.process_token(token);
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(in crate::parser) fn handle_after_head_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A
            // LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR),
            // or U+0020 SPACE"
            // "Insert the character."
            Token::Character { data } if Self::is_whitespace(*data) => self.insert_character(*data),

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::UnexpectedDoctype, token),

            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is "html""
                // "Process the token using the rules for the "in body" insertion mode."
                "html" => self.process_using_rules_for(InsertionMode::InBody, token),

                // "A start tag whose tag name is "body""
                // "Insert an HTML element for the token."
                // "Set the frameset-ok flag to "not ok"."
                // "Switch the insertion mode to "in body"."
                "body" => {
                    let _ = self.insert_html_element(token);
                    self.frameset_ok = false;
                    self.switch_mode(InsertionMode::InBody);
                }

                // "A start tag whose tag name is "frameset""
                // "Insert an HTML element for the token."
                // "Switch the insertion mode to "in frameset"."
                "frameset" => {
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InFrameset);
                }

                // "A start tag whose tag name is one of: "base", "basefont",
                // "bgsound", "link", "meta", "noframes", "script", "style",
                // "template", "title""
                n if HEAD_ELEMENTS_AFTER_HEAD.contains(&n) => {
                    // "Parse error."
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);

                    // "Push the node pointed to by the head element pointer
                    // onto the stack of open elements."
                    let Some(head) = self.head_element_pointer else {
                        self.process_using_rules_for(InsertionMode::InHead, token);
                        return;
                    };
                    self.stack.push(StackEntry::new(head, "head", Namespace::Html));

                    // "Process the token using the rules for the "in head"
                    // insertion mode."
                    self.process_using_rules_for(InsertionMode::InHead, token);

                    // "Remove the node pointed to by the head element pointer
                    // from the stack of open elements. (It might not be the
                    // current node at this point.)"
                    if let Err(err) = self.stack.remove(head) {
                        self.fail(err);
                    }
                }

                // "A start tag whose tag name is "head""
                // "Parse error. Ignore the token."
                "head" => self.parse_error(ParseErrorCode::UnexpectedStartTag, token),

                _ => self.after_head_anything_else(token),
            },

            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::EndTag { name, .. } if name == "template" => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            // "An end tag whose tag name is one of: "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            _ if is_end_tag_one_of(token, &["body", "html", "br"]) => {
                self.after_head_anything_else(token);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => self.parse_error(ParseErrorCode::UnexpectedEndTag, token),

            _ => self.after_head_anything_else(token),
        }
    }

    /// "Insert an HTML element for a "body" start tag token with no attributes."
    /// "Switch the insertion mode to "in body"."
    /// "Reprocess the current token."
    fn after_head_anything_else(&mut self, token: &Token) {
        let _ = self.insert_html_element(&synthetic_start_tag("body"));
        self.switch_mode(InsertionMode::InBody);
        self.process_token(token);
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(in crate::parser) fn handle_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token"
            // "Insert the token's character."
            Token::Character { data } => self.insert_character(*data),

            // "An end-of-file token"
            // "Parse error."
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode and
            // reprocess the token."
            Token::EndOfFile => {
                let open = self.current_node().map(|n| n.tag_name.clone());
                self.parse_error_detail(ParseErrorCode::UnexpectedEofInElement, open.as_deref());
                let _ = self.stack.pop();
                self.return_to_original_mode();
                self.process_token(token);
            }

            // "An end tag whose tag name is "script""
            // "Any other end tag"
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode."
            //
            // The script is never prepared or run; popping it is all that
            // remains of the script end tag steps.
            Token::EndTag { .. } => {
                let _ = self.stack.pop();
                self.return_to_original_mode();
            }

            // The tokenizer emits nothing else in the raw text states.
            Token::StartTag { .. } | Token::Comment { .. } | Token::Doctype { .. } => {}
        }
    }
}
