//! "in select" and "in select in table".

use crate::error::ParseErrorCode;
use crate::parser::core::{HTMLParser, InsertionMode};
use crate::parser::open_elements::Scope;
use crate::tokenizer::Token;

/// Table tags that close a `select` opened inside a table.
const TABLE_TAGS: &[&str] = &["caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th"];

impl HTMLParser {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(in crate::parser) fn handle_in_select_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter, token);
            }

            // "Any other character token"
            // "Insert the token's character."
            Token::Character { data } => self.insert_character(*data),

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

                // "A start tag whose tag name is "option""
                // "If the current node is an option element, pop that node from
                // the stack of open elements."
                // "Insert an HTML element for the token."
                "option" => {
                    self.pop_if_current("option");
                    let _ = self.insert_html_element(token);
                }

                // "A start tag whose tag name is "optgroup""
                // "If the current node is an option element, pop that node from
                // the stack of open elements."
                // "If the current node is an optgroup element, pop that node
                // from the stack of open elements."
                // "Insert an HTML element for the token."
                "optgroup" => {
                    self.pop_if_current("option");
                    self.pop_if_current("optgroup");
                    let _ = self.insert_html_element(token);
                }

                // "A start tag whose tag name is "hr""
                // Same as "optgroup", then: "Immediately pop the current node
                // off the stack of open elements." "Acknowledge the token's
                // self-closing flag, if it is set."
                "hr" => {
                    self.pop_if_current("option");
                    self.pop_if_current("optgroup");
                    let _ = self.insert_html_element(token);
                    let _ = self.stack.pop();
                    self.acknowledge_self_closing();
                }

                // "A start tag whose tag name is "select""
                // "Parse error."
                // "If the stack of open elements does not have a select element
                // in select scope, ignore the token. (fragment case)"
                // "Otherwise: Pop elements from the stack of open elements until
                // a select element has been popped from the stack. Reset the
                // insertion mode appropriately."
                "select" => {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    if self.stack.has_in_scope("select", Scope::Select) {
                        self.close_select();
                    }
                }

                // "A start tag whose tag name is one of: "input", "keygen",
                // "textarea""
                // "Parse error."
                // "If the stack of open elements does not have a select element
                // in select scope, ignore the token. (fragment case)"
                // "Otherwise: ...Reprocess the token."
                "input" | "keygen" | "textarea" => {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    if self.stack.has_in_scope("select", Scope::Select) {
                        self.close_select();
                        self.process_token(token);
                    }
                }

                // "A start tag whose tag name is one of: "script", "template""
                // "Process the token using the rules for the "in head" insertion mode."
                "script" | "template" => {
                    self.process_using_rules_for(InsertionMode::InHead, token);
                }

                // "Anything else"
                // "Parse error. Ignore the token."
                _ => self.parse_error(ParseErrorCode::UnexpectedStartTag, token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "optgroup""
                "optgroup" => {
                    // "First, if the current node is an option element, and the
                    // node immediately before it in the stack of open elements
                    // is an optgroup element, then pop the current node from
                    // the stack of open elements."
                    let len = self.stack.len();
                    if self.current_node_is("option")
                        && len
                            .checked_sub(2)
                            .and_then(|i| self.stack.get(i))
                            .is_some_and(|n| n.is_html("optgroup"))
                    {
                        let _ = self.stack.pop();
                    }
                    // "If the current node is an optgroup element, then pop that
                    // node from the stack of open elements. Otherwise, this is a
                    // parse error; ignore the token."
                    if self.current_node_is("optgroup") {
                        let _ = self.stack.pop();
                    } else {
                        self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                    }
                }

                // "An end tag whose tag name is "option""
                // "If the current node is an option element, then pop that node
                // from the stack of open elements. Otherwise, this is a parse
                // error; ignore the token."
                "option" => {
                    if self.current_node_is("option") {
                        let _ = self.stack.pop();
                    } else {
                        self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                    }
                }

                // "An end tag whose tag name is "select""
                // "If the stack of open elements does not have a select element
                // in select scope, this is a parse error; ignore the token.
                // (fragment case)"
                // "Otherwise: Pop elements from the stack of open elements until
                // a select element has been popped from the stack. Reset the
                // insertion mode appropriately."
                "select" => {
                    if self.stack.has_in_scope("select", Scope::Select) {
                        self.close_select();
                    } else {
                        self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                    }
                }

                // "An end tag whose tag name is "template""
                // "Process the token using the rules for the "in head" insertion mode."
                "template" => self.process_using_rules_for(InsertionMode::InHead, token),

                // "Anything else"
                // "Parse error. Ignore the token."
                _ => self.parse_error(ParseErrorCode::UnexpectedEndTag, token),
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::EndOfFile => self.process_using_rules_for(InsertionMode::InBody, token),
        }
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(in crate::parser) fn handle_in_select_in_table_mode(&mut self, token: &Token) {
        match token {
            // "A start tag whose tag name is one of: "caption", "table",
            // "tbody", "tfoot", "thead", "tr", "td", "th""
            // "Parse error."
            // "Pop elements from the stack of open elements until a select
            // element has been popped from the stack."
            // "Reset the insertion mode appropriately."
            // "Reprocess the token."
            Token::StartTag { name, .. } if TABLE_TAGS.contains(&name.as_str()) => {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                self.close_select();
                self.process_token(token);
            }

            // "An end tag whose tag name is one of: "caption", "table",
            // "tbody", "tfoot", "thead", "tr", "td", "th""
            // "Parse error."
            // "If the stack of open elements does not have an element in table
            // scope that is an HTML element with the same tag name as that of
            // the token, then ignore the token."
            // "Otherwise: ...Reprocess the token."
            Token::EndTag { name, .. } if TABLE_TAGS.contains(&name.as_str()) => {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                if self.stack.has_in_scope(name, Scope::Table) {
                    self.close_select();
                    self.process_token(token);
                }
            }

            // "Anything else"
            // "Process the token using the rules for the "in select" insertion mode."
            _ => self.handle_in_select_mode(token),
        }
    }

    fn pop_if_current(&mut self, name: &str) {
        if self.current_node_is(name) {
            let _ = self.stack.pop();
        }
    }

    /// "Pop elements from the stack of open elements until a select element
    /// has been popped from the stack. Reset the insertion mode appropriately."
    fn close_select(&mut self) {
        self.stack.pop_until("select");
        self.reset_insertion_mode_appropriately();
    }
}
