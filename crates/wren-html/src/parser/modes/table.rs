//! Tables: "in table", "in table text", "in caption", "in column group",
//! "in table body", "in row" and "in cell".

use super::{is_end_tag_one_of, is_start_tag_one_of, synthetic_start_tag};
use crate::error::ParseErrorCode;
use crate::parser::core::{HTMLParser, InsertionMode};
use crate::parser::open_elements::Scope;
use crate::tokenizer::Token;

/// "Clear the stack back to a table context"
const TABLE_CONTEXT: &[&str] = &["table", "template", "html"];

/// "Clear the stack back to a table body context"
const TABLE_BODY_CONTEXT: &[&str] = &["tbody", "tfoot", "thead", "template", "html"];

/// "Clear the stack back to a table row context"
const TABLE_ROW_CONTEXT: &[&str] = &["tr", "template", "html"];

const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot", "thead"];

impl HTMLParser {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(in crate::parser) fn handle_in_table_mode(&mut self, token: &Token) {
        match token {
            // "A character token, if the current node is table, tbody,
            // template, tfoot, thead, or tr element"
            Token::Character { .. }
                if self.current_node().is_some_and(|n| {
                    n.is_html_one_of(&["table", "tbody", "template", "tfoot", "thead", "tr"])
                }) =>
            {
                // "Let the pending table character tokens be an empty list of
                // tokens."
                self.pending_table_character_tokens.clear();
                // "Let the original insertion mode be the current insertion
                // mode."
                // "Switch the insertion mode to "in table text" and reprocess
                // the token."
                self.switch_mode_returning(InsertionMode::InTableText);
                self.process_token(token);
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::UnexpectedDoctype, token),

            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is "caption""
                // "Clear the stack back to a table context."
                // "Insert a marker at the end of the list of active formatting
                // elements."
                // "Insert an HTML element for the token, then switch the
                // insertion mode to "in caption"."
                "caption" => {
                    self.stack.clear_back_to(TABLE_CONTEXT);
                    self.active_formatting_elements.push_marker();
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InCaption);
                }

                // "A start tag whose tag name is "colgroup""
                // "Clear the stack back to a table context."
                // "Insert an HTML element for the token, then switch the
                // insertion mode to "in column group"."
                "colgroup" => {
                    self.stack.clear_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InColumnGroup);
                }

                // "A start tag whose tag name is "col""
                // "Clear the stack back to a table context."
                // "Insert an HTML element for a "colgroup" start tag token with
                // no attributes, then switch the insertion mode to "in column
                // group"."
                // "Reprocess the current token."
                "col" => {
                    self.stack.clear_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element(&synthetic_start_tag("colgroup"));
                    self.switch_mode(InsertionMode::InColumnGroup);
                    self.process_token(token);
                }

                // "A start tag whose tag name is one of: "tbody", "tfoot", "thead""
                // "Clear the stack back to a table context."
                // "Insert an HTML element for the token, then switch the
                // insertion mode to "in table body"."
                "tbody" | "tfoot" | "thead" => {
                    self.stack.clear_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InTableBody);
                }

                // "A start tag whose tag name is one of: "td", "th", "tr""
                // "Clear the stack back to a table context."
                // "Insert an HTML element for a "tbody" start tag token with no
                // attributes, then switch the insertion mode to "in table body"."
                // "Reprocess the current token."
                "td" | "th" | "tr" => {
                    self.stack.clear_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element(&synthetic_start_tag("tbody"));
                    self.switch_mode(InsertionMode::InTableBody);
                    self.process_token(token);
                }

                // "A start tag whose tag name is "table""
                // "Parse error."
                // "If the stack of open elements does not have a table element
                // in table scope, ignore the token."
                // "Otherwise: Pop elements from this stack until a table
                // element has been popped from the stack. Reset the insertion
                // mode appropriately. Reprocess the token."
                "table" => {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    if self.stack.has_in_scope("table", Scope::Table) {
                        self.stack.pop_until("table");
                        self.reset_insertion_mode_appropriately();
                        self.process_token(token);
                    }
                }

                // "A start tag whose tag name is one of: "style", "script",
                // "template""
                // "Process the token using the rules for the "in head"
                // insertion mode."
                "style" | "script" | "template" => {
                    self.process_using_rules_for(InsertionMode::InHead, token);
                }

                // "A start tag whose tag name is "input""
                // "If the token does not have an attribute with the name
                // "type", or if it does, but that attribute's value is not an
                // ASCII case-insensitive match for the string "hidden", then:
                // act as described in the "anything else" entry below."
                // "Otherwise: Parse error. Insert an HTML element for the
                // token. Pop that input element off the stack of open
                // elements. Acknowledge the token's self-closing flag, if it
                // is set."
                "input"
                    if token
                        .attribute("type")
                        .is_some_and(|t| t.eq_ignore_ascii_case("hidden")) =>
                {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    let _ = self.insert_html_element(token);
                    let _ = self.stack.pop();
                    self.acknowledge_self_closing();
                }

                // "A start tag whose tag name is "form""
                // "Parse error."
                // "If there is a template element on the stack of open
                // elements, or if the form element pointer is not null, ignore
                // the token."
                // "Otherwise: Insert an HTML element for the token, and set the
                // form element pointer to point to the element created. Pop
                // that form element off the stack of open elements."
                "form" => {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    if self.stack.contains_html("template") || self.form_element_pointer.is_some() {
                        return;
                    }
                    let form = self.insert_html_element(token);
                    self.form_element_pointer = Some(form);
                    let _ = self.stack.pop();
                }

                _ => self.in_table_anything_else(token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "table""
                // "If the stack of open elements does not have a table element
                // in table scope, this is a parse error; ignore the token."
                // "Otherwise: Pop elements from this stack until a table
                // element has been popped from the stack. Reset the insertion
                // mode appropriately."
                "table" => {
                    if !self.stack.has_in_scope("table", Scope::Table) {
                        self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                        return;
                    }
                    self.stack.pop_until("table");
                    self.reset_insertion_mode_appropriately();
                }

                // "An end tag whose tag name is one of: "body", "caption",
                // "col", "colgroup", "html", "tbody", "td", "tfoot", "th",
                // "thead", "tr""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot"
                | "th" | "thead" | "tr" => {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                }

                // "An end tag whose tag name is "template""
                // "Process the token using the rules for the "in head"
                // insertion mode."
                "template" => self.process_using_rules_for(InsertionMode::InHead, token),

                _ => self.in_table_anything_else(token),
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::EndOfFile => self.process_using_rules_for(InsertionMode::InBody, token),

            Token::Character { .. } => self.in_table_anything_else(token),
        }
    }

    /// "Parse error. Enable foster parenting, process the token using the
    /// rules for the "in body" insertion mode, and then disable foster
    /// parenting."
    fn in_table_anything_else(&mut self, token: &Token) {
        let code = match token {
            Token::Character { .. } => ParseErrorCode::UnexpectedCharacter,
            Token::EndTag { .. } => ParseErrorCode::UnexpectedEndTag,
            _ => ParseErrorCode::UnexpectedStartTag,
        };
        self.parse_error(code, token);
        self.foster_parenting = true;
        self.process_using_rules_for(InsertionMode::InBody, token);
        self.foster_parenting = false;
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(in crate::parser) fn handle_in_table_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter, token);
            }

            // "Any other character token"
            // "Append the character token to the pending table character
            // tokens list."
            Token::Character { data } => self.pending_table_character_tokens.push(*data),

            // "Anything else"
            _ => {
                let pending = std::mem::take(&mut self.pending_table_character_tokens);

                // "If any of the tokens in the pending table character tokens
                // list are character tokens that are not ASCII whitespace, then
                // this is a parse error: reprocess the character tokens in the
                // pending table character tokens list using the rules given in
                // the "anything else" entry in the "in table" insertion mode."
                if pending.chars().any(|c| !Self::is_whitespace(c)) {
                    self.parse_error_detail(ParseErrorCode::UnexpectedCharacter, Some("table"));
                    self.foster_parenting = true;
                    for c in pending.chars() {
                        self.process_using_rules_for(
                            InsertionMode::InBody,
                            &Token::new_character(c),
                        );
                    }
                    self.foster_parenting = false;
                } else {
                    // "Otherwise, insert the characters given by the pending
                    // table character tokens list."
                    for c in pending.chars() {
                        self.insert_character(c);
                    }
                }

                // "Switch the insertion mode to the original insertion mode and
                // reprocess the token."
                self.return_to_original_mode();
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(in crate::parser) fn handle_in_caption_mode(&mut self, token: &Token) {
        // "An end tag whose tag name is "caption""
        if token.is_end_tag("caption") {
            let _ = self.close_caption(token);
            return;
        }

        // "A start tag whose tag name is one of: "caption", "col", "colgroup",
        // "tbody", "td", "tfoot", "th", "thead", "tr""
        // "An end tag whose tag name is "table""
        // "If the stack of open elements does not have a caption element in
        // table scope, this is a parse error; ignore the token. (fragment
        // case)"
        // "Otherwise: ...close the caption... Reprocess the token."
        if is_start_tag_one_of(
            token,
            &["caption", "col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr"],
        ) || token.is_end_tag("table")
        {
            if self.close_caption(token) {
                self.process_token(token);
            }
            return;
        }

        // "An end tag whose tag name is one of: "body", "col", "colgroup",
        // "html", "tbody", "td", "tfoot", "th", "thead", "tr""
        // "Parse error. Ignore the token."
        if is_end_tag_one_of(
            token,
            &["body", "col", "colgroup", "html", "tbody", "td", "tfoot", "th", "thead", "tr"],
        ) {
            self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
            return;
        }

        // "Anything else"
        // "Process the token using the rules for the "in body" insertion mode."
        self.process_using_rules_for(InsertionMode::InBody, token);
    }

    /// The `</caption>` steps. Returns false if the token was ignored.
    fn close_caption(&mut self, token: &Token) -> bool {
        // "If the stack of open elements does not have a caption element in
        // table scope, this is a parse error; ignore the token. (fragment
        // case)"
        if !self.stack.has_in_scope("caption", Scope::Table) {
            self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
            return false;
        }
        // "Generate implied end tags."
        self.stack.generate_implied_end_tags(None);
        // "Now, if the current node is not a caption element, then this is a
        // parse error."
        if !self.current_node_is("caption") {
            self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
        }
        // "Pop elements from this stack until a caption element has been
        // popped from the stack."
        self.stack.pop_until("caption");
        // "Clear the list of active formatting elements up to the last marker."
        self.active_formatting_elements.clear_to_last_marker();
        // "Switch the insertion mode to "in table"."
        self.switch_mode(InsertionMode::InTable);
        true
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    pub(in crate::parser) fn handle_in_column_group_mode(&mut self, token: &Token) {
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

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "col""
            // "Insert an HTML element for the token. Immediately pop the
            // current node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            Token::StartTag { name, .. } if name == "col" => {
                let _ = self.insert_html_element(token);
                let _ = self.stack.pop();
                self.acknowledge_self_closing();
            }

            // "An end tag whose tag name is "colgroup""
            // "If the current node is not a colgroup element, then this is a
            // parse error; ignore the token."
            // "Otherwise, pop the current node from the stack of open
            // elements. Switch the insertion mode to "in table"."
            Token::EndTag { name, .. } if name == "colgroup" => {
                if !self.current_node_is("colgroup") {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                let _ = self.stack.pop();
                self.switch_mode(InsertionMode::InTable);
            }

            // "An end tag whose tag name is "col""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. } if name == "col" => {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
            }

            // "A start tag whose tag name is "template""
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::StartTag { name, .. } | Token::EndTag { name, .. } if name == "template" => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::EndOfFile => self.process_using_rules_for(InsertionMode::InBody, token),

            // "Anything else"
            // "If the current node is not a colgroup element, then this is a
            // parse error; ignore the token."
            // "Otherwise, pop the current node from the stack of open
            // elements."
            // "Switch the insertion mode to "in table"."
            // "Reprocess the token."
            _ => {
                if !self.current_node_is("colgroup") {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    return;
                }
                let _ = self.stack.pop();
                self.switch_mode(InsertionMode::InTable);
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    pub(in crate::parser) fn handle_in_table_body_mode(&mut self, token: &Token) {
        match token {
            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is "tr""
                // "Clear the stack back to a table body context."
                // "Insert an HTML element for the token, then switch the
                // insertion mode to "in row"."
                "tr" => {
                    self.stack.clear_back_to(TABLE_BODY_CONTEXT);
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InRow);
                }

                // "A start tag whose tag name is one of: "th", "td""
                // "Parse error."
                // "Clear the stack back to a table body context."
                // "Insert an HTML element for a "tr" start tag token with no
                // attributes, then switch the insertion mode to "in row"."
                // "Reprocess the current token."
                "th" | "td" => {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    self.stack.clear_back_to(TABLE_BODY_CONTEXT);
                    let _ = self.insert_html_element(&synthetic_start_tag("tr"));
                    self.switch_mode(InsertionMode::InRow);
                    self.process_token(token);
                }

                // "A start tag whose tag name is one of: "caption", "col",
                // "colgroup", "tbody", "tfoot", "thead""
                "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" => {
                    self.leave_table_body(token);
                }

                _ => self.process_using_rules_for(InsertionMode::InTable, token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name as
                // the token, this is a parse error; ignore the token."
                // "Otherwise: Clear the stack back to a table body context. Pop
                // the current node from the stack of open elements. Switch the
                // insertion mode to "in table"."
                n @ ("tbody" | "tfoot" | "thead") => {
                    if !self.stack.has_in_scope(n, Scope::Table) {
                        self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                        return;
                    }
                    self.stack.clear_back_to(TABLE_BODY_CONTEXT);
                    let _ = self.stack.pop();
                    self.switch_mode(InsertionMode::InTable);
                }

                // "An end tag whose tag name is "table""
                "table" => self.leave_table_body(token),

                // "An end tag whose tag name is one of: "body", "caption",
                // "col", "colgroup", "html", "td", "th", "tr""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr" => {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                }

                _ => self.process_using_rules_for(InsertionMode::InTable, token),
            },

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion mode."
            _ => self.process_using_rules_for(InsertionMode::InTable, token),
        }
    }

    /// "If the stack of open elements does not have a tbody, thead, or tfoot
    /// element in table scope, this is a parse error; ignore the token."
    /// "Otherwise: Clear the stack back to a table body context. Pop the
    /// current node from the stack of open elements. Switch the insertion mode
    /// to "in table". Reprocess the token."
    fn leave_table_body(&mut self, token: &Token) {
        if !self.stack.has_any_in_scope(TABLE_SECTIONS, Scope::Table) {
            self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
            return;
        }
        self.stack.clear_back_to(TABLE_BODY_CONTEXT);
        let _ = self.stack.pop();
        self.switch_mode(InsertionMode::InTable);
        self.process_token(token);
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    pub(in crate::parser) fn handle_in_row_mode(&mut self, token: &Token) {
        match token {
            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is one of: "th", "td""
                // "Clear the stack back to a table row context."
                // "Insert an HTML element for the token, then switch the
                // insertion mode to "in cell"."
                // "Insert a marker at the end of the list of active formatting
                // elements."
                "th" | "td" => {
                    self.stack.clear_back_to(TABLE_ROW_CONTEXT);
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InCell);
                    self.active_formatting_elements.push_marker();
                }

                // "A start tag whose tag name is one of: "caption", "col",
                // "colgroup", "tbody", "tfoot", "thead", "tr""
                "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr" => {
                    if self.close_row(token) {
                        self.process_token(token);
                    }
                }

                _ => self.process_using_rules_for(InsertionMode::InTable, token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "tr""
                "tr" => {
                    let _ = self.close_row(token);
                }

                // "An end tag whose tag name is "table""
                "table" => {
                    if self.close_row(token) {
                        self.process_token(token);
                    }
                }

                // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name as
                // the token, this is a parse error; ignore the token."
                // "If the stack of open elements does not have a tr element in
                // table scope, ignore the token."
                // "Otherwise: ...Reprocess the token."
                n @ ("tbody" | "tfoot" | "thead") => {
                    if !self.stack.has_in_scope(n, Scope::Table) {
                        self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                        return;
                    }
                    if self.close_row(token) {
                        self.process_token(token);
                    }
                }

                // "An end tag whose tag name is one of: "body", "caption",
                // "col", "colgroup", "html", "td", "th""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" => {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                }

                _ => self.process_using_rules_for(InsertionMode::InTable, token),
            },

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion mode."
            _ => self.process_using_rules_for(InsertionMode::InTable, token),
        }
    }

    /// The `</tr>` steps. Returns false if the token was ignored.
    fn close_row(&mut self, token: &Token) -> bool {
        // "If the stack of open elements does not have a tr element in table
        // scope, this is a parse error; ignore the token."
        if !self.stack.has_in_scope("tr", Scope::Table) {
            self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
            return false;
        }
        // "Otherwise: Clear the stack back to a table row context. Pop the
        // current node (which will be a tr element) from the stack of open
        // elements. Switch the insertion mode to "in table body"."
        self.stack.clear_back_to(TABLE_ROW_CONTEXT);
        let _ = self.stack.pop();
        self.switch_mode(InsertionMode::InTableBody);
        true
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    pub(in crate::parser) fn handle_in_cell_mode(&mut self, token: &Token) {
        match token {
            // "An end tag whose tag name is one of: "td", "th""
            Token::EndTag { name, .. } if name == "td" || name == "th" => {
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name as
                // that of the token, then this is a parse error; ignore the
                // token."
                if !self.stack.has_in_scope(name, Scope::Table) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                // "Generate implied end tags."
                self.stack.generate_implied_end_tags(None);
                // "Now, if the current node is not an HTML element with the
                // same tag name as the token, then this is a parse error."
                if !self.current_node_is(name) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                }
                // "Pop elements from the stack of open elements until an HTML
                // element with the same tag name as the token has been popped
                // from the stack."
                self.stack.pop_until(name);
                // "Clear the list of active formatting elements up to the last
                // marker."
                self.active_formatting_elements.clear_to_last_marker();
                // "Switch the insertion mode to "in row"."
                self.switch_mode(InsertionMode::InRow);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Assert: The stack of open elements has a td or th element in
            // table scope."
            // "Close the cell (see below) and reprocess the token."
            _ if is_start_tag_one_of(
                token,
                &["caption", "col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr"],
            ) =>
            {
                // Only a fragment parse can get here with no open cell.
                if !self.stack.has_any_in_scope(&["td", "th"], Scope::Table) {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    return;
                }
                self.close_the_cell();
                self.process_token(token);
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html""
            // "Parse error. Ignore the token."
            _ if is_end_tag_one_of(token, &["body", "caption", "col", "colgroup", "html"]) => {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
            }

            // "An end tag whose tag name is one of: "table", "tbody", "tfoot",
            // "thead", "tr""
            // "If the stack of open elements does not have an element in table
            // scope that is an HTML element with the same tag name as that of
            // the token, then this is a parse error; ignore the token."
            // "Otherwise, close the cell (see below) and reprocess the token."
            Token::EndTag { name, .. }
                if ["table", "tbody", "tfoot", "thead", "tr"].contains(&name.as_str()) =>
            {
                if !self.stack.has_in_scope(name, Scope::Table) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                self.close_the_cell();
                self.process_token(token);
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion mode."
            _ => self.process_using_rules_for(InsertionMode::InBody, token),
        }
    }
}

