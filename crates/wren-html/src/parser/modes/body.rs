//! [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
//!
//! The largest of the insertion modes. Most other modes fall back to these
//! rules for tokens they do not handle themselves.

use wren_dom::{Namespace, NodeId, QuirksMode};

use super::synthetic_start_tag;
use crate::error::{HtmlError, ParseErrorCode};
use crate::parser::adoption_agency::AdoptionOutcome;
use crate::parser::core::{HTMLParser, InsertionMode};
use crate::parser::foreign_content::adjusted_foreign_start_tag;
use crate::parser::open_elements::{Scope, StackEntry};
use crate::tokenizer::{Attribute, Token, TokenizerState};

/// Start tags handed to the "in head" rules.
const HEAD_ELEMENTS: &[&str] = &[
    "base", "basefont", "bgsound", "link", "meta", "noframes", "script", "style", "template",
    "title",
];

/// Elements that may still be open at the end of the body without a parse
/// error.
const ALLOWED_OPEN_AT_END: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "tbody", "td",
    "tfoot", "th", "thead", "tr", "body", "html",
];

/// Block containers whose start tag closes an open `p`.
const BLOCK_START_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div",
    "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "main", "menu", "nav",
    "ol", "p", "search", "section", "summary", "ul",
];

/// End tags closed by the generic block rule.
const BLOCK_END_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "button", "center", "details", "dialog", "dir",
    "div", "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "listing",
    "main", "menu", "nav", "ol", "pre", "search", "section", "summary", "ul",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Formatting elements other than `a` and `nobr`.
const FORMATTING_START_TAGS: &[&str] = &[
    "b", "big", "code", "em", "font", "i", "s", "small", "strike", "strong", "tt", "u",
];

/// End tags that run the adoption agency algorithm.
const FORMATTING_END_TAGS: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt",
    "u",
];

/// Elements that push a marker onto the list of active formatting elements.
const MARKER_ELEMENTS: &[&str] = &["applet", "marquee", "object"];

/// Void elements that also clear the frameset-ok flag.
const VOID_PHRASING_ELEMENTS: &[&str] = &["area", "br", "embed", "img", "keygen", "wbr"];

/// Table parts that are ignored outside a table.
const STRAY_TABLE_TAGS: &[&str] = &[
    "caption", "col", "colgroup", "frame", "head", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// Modes in which a `select` opens "in select in table".
const TABLE_MODES: &[InsertionMode] = &[
    InsertionMode::InTable,
    InsertionMode::InCaption,
    InsertionMode::InTableBody,
    InsertionMode::InRow,
    InsertionMode::InCell,
];

impl HTMLParser {
    pub(in crate::parser) fn handle_in_body_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter, token);
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Reconstruct the active formatting elements, if any."
            // "Insert the token's character."
            //
            // "Any other character token"
            // "...Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
                if !Self::is_whitespace(*data) {
                    self.frameset_ok = false;
                }
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::UnexpectedDoctype, token),

            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => self.in_body_start_tag(token, name, *self_closing, attributes),

            Token::EndTag { name, .. } => self.in_body_end_tag(token, name),

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If the stack of template insertion modes is not empty, then
                // process the token using the rules for the "in template"
                // insertion mode."
                if !self.template_insertion_modes.is_empty() {
                    self.process_using_rules_for(InsertionMode::InTemplate, token);
                    return;
                }

                // "Otherwise, follow these steps:"
                // "If there is a node in the stack of open elements that is not
                // either a dd element, a dt element, ... the body element, or
                // the html element, then this is a parse error."
                // "Stop parsing."
                self.report_unclosed_elements();
            }
        }
    }

    fn in_body_start_tag(
        &mut self,
        token: &Token,
        name: &str,
        self_closing: bool,
        attributes: &[Attribute],
    ) {
        match name {
            // "A start tag whose tag name is "html""
            "html" => {
                // "Parse error."
                self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                // "If there is a template element on the stack of open
                // elements, then ignore the token."
                if self.stack.contains_html("template") {
                    return;
                }
                // "Otherwise, for each attribute on the token, check to see if
                // the attribute is already present on the top element of the
                // stack of open elements. If it is not, add the attribute and
                // its corresponding value to that element."
                if let Some(html) = self.stack.first().map(|n| n.node) {
                    self.merge_attributes(html, attributes);
                }
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title""
            // "Process the token using the rules for the "in head" insertion mode."
            n if HEAD_ELEMENTS.contains(&n) => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            // "A start tag whose tag name is "body""
            "body" => {
                // "Parse error."
                self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                // "If the stack of open elements has only one node on it, if
                // the second element on the stack of open elements is not a
                // body element, or if there is a template element on the stack
                // of open elements, then ignore the token. (fragment case or
                // there is a template element on the stack)"
                let Some(body) = self.second_element_if_body() else {
                    return;
                };
                if self.stack.contains_html("template") {
                    return;
                }
                // "Otherwise, set the frameset-ok flag to "not ok"; then, for
                // each attribute on the token, check to see if the attribute
                // is already present on the body element (the second element)
                // on the stack of open elements, and if it is not, add the
                // attribute and its corresponding value to that element."
                self.frameset_ok = false;
                self.merge_attributes(body, attributes);
            }

            // "A start tag whose tag name is "frameset""
            "frameset" => {
                // "Parse error."
                self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                // "If the stack of open elements has only one node on it, or if
                // the second element on the stack of open elements is not a
                // body element, then ignore the token. (fragment case or there
                // is a template element on the stack)"
                // "If the frameset-ok flag is set to "not ok", ignore the token."
                let Some(body) = self.second_element_if_body() else {
                    return;
                };
                if !self.frameset_ok {
                    return;
                }
                // "Otherwise, run the following steps:"
                // STEP 1: "Remove the second element on the stack of open
                //          elements from its parent node, if it has one."
                self.tree.detach(body);
                // STEP 2: "Pop all the nodes from the bottom of the stack of
                //          open elements, from the current node up to, but not
                //          including, the root html element."
                self.stack.truncate(1);
                // STEP 3: "Insert an HTML element for the token."
                let _ = self.insert_html_element(token);
                // STEP 4: "Switch the insertion mode to "in frameset"."
                self.switch_mode(InsertionMode::InFrameset);
            }

            // "A start tag whose tag name is one of: "address", "article",
            // "aside", "blockquote", "center", "details", "dialog", "dir",
            // "div", "dl", "fieldset", "figcaption", "figure", "footer",
            // "header", "hgroup", "main", "menu", "nav", "ol", "p", "search",
            // "section", "summary", "ul""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Insert an HTML element for the token."
            n if BLOCK_START_TAGS.contains(&n) => {
                self.close_p_in_button_scope();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4",
            // "h5", "h6""
            n if HEADINGS.contains(&n) => {
                // "If the stack of open elements has a p element in button
                // scope, then close a p element."
                self.close_p_in_button_scope();
                // "If the current node is an HTML element whose tag name is one
                // of "h1", "h2", "h3", "h4", "h5", or "h6", then this is a
                // parse error; pop the current node off the stack of open
                // elements."
                if self
                    .current_node()
                    .is_some_and(|n| n.is_html_one_of(HEADINGS))
                {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    let _ = self.stack.pop();
                }
                // "Insert an HTML element for the token."
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "pre", "listing""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Insert an HTML element for the token."
            // "If the next token is a U+000A LINE FEED (LF) character token,
            // then ignore that token and move on to the next one. (Newlines at
            // the start of pre blocks are ignored as an authoring convenience.)"
            // "Set the frameset-ok flag to "not ok"."
            "pre" | "listing" => {
                self.close_p_in_button_scope();
                let _ = self.insert_html_element(token);
                self.skip_next_newline = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "form""
            "form" => {
                // "If the form element pointer is not null, and there is no
                // template element on the stack of open elements, then this is
                // a parse error; ignore the token."
                let in_template = self.stack.contains_html("template");
                if self.form_element_pointer.is_some() && !in_template {
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    return;
                }
                // "Otherwise: If the stack of open elements has a p element in
                // button scope, then close a p element."
                self.close_p_in_button_scope();
                // "Insert an HTML element for the token, and, if there is no
                // template element on the stack of open elements, set the form
                // element pointer to point to the element created."
                let form = self.insert_html_element(token);
                if !in_template {
                    self.form_element_pointer = Some(form);
                }
            }

            // "A start tag whose tag name is "li""
            "li" => self.start_list_item(token, &["li"]),

            // "A start tag whose tag name is one of: "dd", "dt""
            "dd" | "dt" => self.start_list_item(token, &["dd", "dt"]),

            // "A start tag whose tag name is "plaintext""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Insert an HTML element for the token."
            // "Switch the tokenizer to the PLAINTEXT state."
            "plaintext" => {
                self.close_p_in_button_scope();
                let _ = self.insert_html_element(token);
                self.tokenizer.switch_to(TokenizerState::PLAINTEXT);
            }

            // "A start tag whose tag name is "button""
            "button" => {
                // "If the stack of open elements has a button element in
                // scope, then run these substeps:"
                if self.stack.has_in_scope("button", Scope::Default) {
                    // "Parse error."
                    self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    // "Generate implied end tags."
                    self.stack.generate_implied_end_tags(None);
                    // "Pop elements from the stack of open elements until a
                    // button element has been popped from the stack."
                    self.stack.pop_until("button");
                }
                // "Reconstruct the active formatting elements, if any."
                // "Insert an HTML element for the token."
                // "Set the frameset-ok flag to "not ok"."
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "a""
            "a" => {
                // "If the list of active formatting elements contains an a
                // element between the end of the list and the last marker on
                // the list (or the start of the list if there is no marker on
                // the list), then this is a parse error; run the adoption
                // agency algorithm for the token, then remove that element from
                // the list of active formatting elements and the stack of open
                // elements if the adoption agency algorithm didn't already
                // remove it (it might not have if the element is not in table
                // scope)."
                if let Some((_, existing)) = self.active_formatting_elements.last_element_named("a") {
                    self.parse_error(ParseErrorCode::MisnestedFormattingElement, token);
                    let result = self
                        .run_adoption_agency("a", token)
                        .and_then(|_| self.forget_formatting_element(existing));
                    if let Err(err) = result {
                        self.fail(err);
                        return;
                    }
                }
                // "Reconstruct the active formatting elements, if any."
                // "Insert an HTML element for the token. Push onto the list of
                // active formatting elements that element."
                self.insert_formatting_element(token);
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em",
            // "font", "i", "s", "small", "strike", "strong", "tt", "u""
            n if FORMATTING_START_TAGS.contains(&n) => self.insert_formatting_element(token),

            // "A start tag whose tag name is "nobr""
            "nobr" => {
                // "Reconstruct the active formatting elements, if any."
                self.reconstruct_active_formatting_elements();
                // "If the stack of open elements has a nobr element in scope,
                // then this is a parse error; run the adoption agency algorithm
                // for the token, then once again reconstruct the active
                // formatting elements, if any."
                if self.stack.has_in_scope("nobr", Scope::Default) {
                    self.parse_error(ParseErrorCode::MisnestedFormattingElement, token);
                    if let Err(err) = self.run_adoption_agency("nobr", token) {
                        self.fail(err);
                        return;
                    }
                }
                // "Insert an HTML element for the token. Push onto the list of
                // active formatting elements that element."
                self.insert_formatting_element(token);
            }

            // "A start tag whose tag name is one of: "applet", "marquee", "object""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            // "Insert a marker at the end of the list of active formatting elements."
            // "Set the frameset-ok flag to "not ok"."
            n if MARKER_ELEMENTS.contains(&n) => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.active_formatting_elements.push_marker();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "table""
            // "If the Document is not set to quirks mode, and the stack of open
            // elements has a p element in button scope, then close a p element."
            // "Insert an HTML element for the token."
            // "Set the frameset-ok flag to "not ok"."
            // "Switch the insertion mode to "in table"."
            "table" => {
                if self.tree.quirks_mode() != QuirksMode::Quirks {
                    self.close_p_in_button_scope();
                }
                if self.is_table_directly_in_cell_context() {
                    // A table cannot nest directly in a cell fragment. It stays
                    // detached, so its contents are elided and foster-parented
                    // text lands in the fragment itself.
                    let table = self.create_element_for_token(token, Namespace::Html);
                    self.stack
                        .push(StackEntry::new(table, "table", Namespace::Html));
                } else {
                    let _ = self.insert_html_element(token);
                }
                self.frameset_ok = false;
                self.switch_mode(InsertionMode::InTable);
            }

            // "A start tag whose tag name is one of: "area", "br", "embed",
            // "img", "keygen", "wbr""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            // "Set the frameset-ok flag to "not ok"."
            n if VOID_PHRASING_ELEMENTS.contains(&n) => {
                self.reconstruct_active_formatting_elements();
                self.insert_void_element(token);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "input""
            "input" => {
                self.reconstruct_active_formatting_elements();
                self.insert_void_element(token);
                // "If the token does not have an attribute with the name
                // "type", or if it does, but that attribute's value is not an
                // ASCII case-insensitive match for the string "hidden", then:
                // set the frameset-ok flag to "not ok"."
                if !token
                    .attribute("type")
                    .is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
                {
                    self.frameset_ok = false;
                }
            }

            // "A start tag whose tag name is one of: "param", "source", "track""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            "param" | "source" | "track" => self.insert_void_element(token),

            // "A start tag whose tag name is "hr""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            // "Set the frameset-ok flag to "not ok"."
            "hr" => {
                self.close_p_in_button_scope();
                self.insert_void_element(token);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "image""
            // "Parse error. Change the token's tag name to "img" and reprocess
            // it. (Don't ask.)"
            "image" => {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                let img = Token::StartTag {
                    name: "img".to_string(),
                    self_closing,
                    attributes: attributes.to_vec(),
                };
                self.process_token(&img);
            }

            // "A start tag whose tag name is "textarea""
            "textarea" => {
                // STEP 1: "Insert an HTML element for the token."
                let _ = self.insert_html_element(token);
                // STEP 2: "If the next token is a U+000A LINE FEED (LF)
                //          character token, then ignore that token and move on
                //          to the next one."
                self.skip_next_newline = true;
                // STEP 3: "Switch the tokenizer to the RCDATA state."
                self.tokenizer.switch_to(TokenizerState::RCDATA);
                // STEP 5: "Set the frameset-ok flag to "not ok"."
                self.frameset_ok = false;
                // STEP 4, 6: "Let the original insertion mode be the current
                //             insertion mode." "Switch the insertion mode to
                //             "text"."
                self.switch_mode_returning(InsertionMode::Text);
            }

            // "A start tag whose tag name is "xmp""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Reconstruct the active formatting elements, if any."
            // "Set the frameset-ok flag to "not ok"."
            // "Follow the generic raw text element parsing algorithm."
            "xmp" => {
                self.close_p_in_button_scope();
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                self.parse_generic_raw_text(token);
            }

            // "A start tag whose tag name is "iframe""
            // "Set the frameset-ok flag to "not ok"."
            // "Follow the generic raw text element parsing algorithm."
            "iframe" => {
                self.frameset_ok = false;
                self.parse_generic_raw_text(token);
            }

            // "A start tag whose tag name is "noembed""
            // "A start tag whose tag name is "noscript", if the scripting flag
            // is enabled"
            // "Follow the generic raw text element parsing algorithm."
            "noembed" => self.parse_generic_raw_text(token),
            "noscript" if self.config.scripting => self.parse_generic_raw_text(token),

            // "A start tag whose tag name is "select""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            // "Set the frameset-ok flag to "not ok"."
            // "If the insertion mode is one of "in table", "in caption", "in
            // table body", "in row", or "in cell", then switch the insertion
            // mode to "in select in table". Otherwise, switch the insertion
            // mode to "in select"."
            "select" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                if TABLE_MODES.contains(&self.insertion_mode) {
                    self.switch_mode(InsertionMode::InSelectInTable);
                } else {
                    self.switch_mode(InsertionMode::InSelect);
                }
            }

            // "A start tag whose tag name is one of: "optgroup", "option""
            // "If the current node is an option element, then pop the current
            // node off the stack of open elements."
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            "optgroup" | "option" => {
                if self.current_node_is("option") {
                    let _ = self.stack.pop();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "rb", "rtc""
            // "If the stack of open elements has a ruby element in scope, then
            // generate implied end tags. If the current node is not now a ruby
            // element, this is a parse error."
            // "Insert an HTML element for the token."
            "rb" | "rtc" => {
                if self.stack.has_in_scope("ruby", Scope::Default) {
                    self.stack.generate_implied_end_tags(None);
                    if !self.current_node_is("ruby") {
                        self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    }
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "rp", "rt""
            // "If the stack of open elements has a ruby element in scope, then
            // generate implied end tags, except for rtc elements. If the
            // current node is not now a rtc element or a ruby element, this is
            // a parse error."
            // "Insert an HTML element for the token."
            "rp" | "rt" => {
                if self.stack.has_in_scope("ruby", Scope::Default) {
                    self.stack.generate_implied_end_tags(Some("rtc"));
                    if !self
                        .current_node()
                        .is_some_and(|n| n.is_html_one_of(&["rtc", "ruby"]))
                    {
                        self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
                    }
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is "math""
            // "A start tag whose tag name is "svg""
            "math" => self.insert_foreign_root(token, Namespace::MathMl, self_closing),
            "svg" => self.insert_foreign_root(token, Namespace::Svg, self_closing),

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "frame", "head", "tbody", "td", "tfoot", "th",
            // "thead", "tr""
            // "Parse error. Ignore the token."
            n if STRAY_TABLE_TAGS.contains(&n) => {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
            }

            // "Any other start tag"
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            _ => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }
        }
    }

    fn in_body_end_tag(&mut self, token: &Token, name: &str) {
        match name {
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            "template" => self.process_using_rules_for(InsertionMode::InHead, token),

            // "An end tag whose tag name is "body""
            // "If the stack of open elements does not have a body element in
            // scope, this is a parse error; ignore the token."
            // "Otherwise, if there is a node in the stack of open elements that
            // is not either a dd element, ... then this is a parse error."
            // "Switch the insertion mode to "after body"."
            "body" => {
                if !self.stack.has_in_scope("body", Scope::Default) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                self.report_unclosed_elements();
                self.switch_mode(InsertionMode::AfterBody);
            }

            // "An end tag whose tag name is "html""
            // "If the stack of open elements does not have a body element in
            // scope, this is a parse error; ignore the token."
            // "Otherwise, if there is a node in the stack of open elements that
            // is not either a dd element, ... then this is a parse error."
            // "Switch the insertion mode to "after body"."
            // "Reprocess the token."
            "html" => {
                if !self.stack.has_in_scope("body", Scope::Default) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                self.report_unclosed_elements();
                self.switch_mode(InsertionMode::AfterBody);
                self.process_token(token);
            }

            // "An end tag whose tag name is one of: "address", "article",
            // "aside", "blockquote", "button", "center", "details", "dialog",
            // "dir", "div", "dl", "fieldset", "figcaption", "figure", "footer",
            // "header", "hgroup", "listing", "main", "menu", "nav", "ol", "pre",
            // "search", "section", "summary", "ul""
            // "If the stack of open elements does not have an element in scope
            // that is an HTML element with the same tag name as that of the
            // token, then this is a parse error; ignore the token."
            // "Otherwise, run these steps: Generate implied end tags. If the
            // current node is not an HTML element with the same tag name as
            // that of the token, then this is a parse error. Pop elements from
            // the stack of open elements until an HTML element with the same
            // tag name as the token has been popped from the stack."
            n if BLOCK_END_TAGS.contains(&n) || MARKER_ELEMENTS.contains(&n) => {
                if !self.stack.has_in_scope(n, Scope::Default) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                self.stack.generate_implied_end_tags(None);
                if !self.current_node_is(n) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                }
                self.stack.pop_until(n);

                // "An end tag token whose tag name is one of: "applet",
                // "marquee", "object"" additionally:
                // "Clear the list of active formatting elements up to the last
                // marker."
                if MARKER_ELEMENTS.contains(&n) {
                    self.active_formatting_elements.clear_to_last_marker();
                }
            }

            // "An end tag whose tag name is "form""
            "form" => self.in_body_form_end_tag(token),

            // "An end tag whose tag name is "p""
            // "If the stack of open elements does not have a p element in button
            // scope, then this is a parse error; insert an HTML element for a
            // "p" start tag token with no attributes."
            // "Close a p element."
            "p" => {
                if !self.stack.has_in_scope("p", Scope::Button) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                    let _ = self.insert_html_element(&synthetic_start_tag("p"));
                }
                self.close_a_p_element();
            }

            // "An end tag whose tag name is "li""
            // "If the stack of open elements does not have an li element in
            // list item scope, then this is a parse error; ignore the token."
            // "Otherwise: Generate implied end tags, except for li elements. If
            // the current node is not an li element, then this is a parse
            // error. Pop elements from the stack of open elements until an li
            // element has been popped from the stack."
            "li" => self.close_element_with_implied_end_tags(token, "li", Scope::ListItem),

            // "An end tag whose tag name is one of: "dd", "dt""
            // Same steps as "li", checking default scope.
            "dd" | "dt" => self.close_element_with_implied_end_tags(token, name, Scope::Default),

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4",
            // "h5", "h6""
            n if HEADINGS.contains(&n) => {
                // "If the stack of open elements does not have an element in
                // scope that is an HTML element and whose tag name is one of
                // "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
                // error; ignore the token."
                if !self.stack.has_any_in_scope(HEADINGS, Scope::Default) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                    return;
                }
                // "Generate implied end tags."
                self.stack.generate_implied_end_tags(None);
                // "If the current node is not an HTML element with the same tag
                // name as that of the token, then this is a parse error."
                if !self.current_node_is(n) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                }
                // "Pop elements from the stack of open elements until an HTML
                // element whose tag name is one of "h1", "h2", "h3", "h4", "h5",
                // or "h6" has been popped from the stack."
                self.stack.pop_until_one_of(HEADINGS);
            }

            // "An end tag whose tag name is one of: "a", "b", "big", "code",
            // "em", "font", "i", "nobr", "s", "small", "strike", "strong",
            // "tt", "u""
            // "Run the adoption agency algorithm for the token."
            n if FORMATTING_END_TAGS.contains(&n) => {
                match self.run_adoption_agency(n, token) {
                    Ok(AdoptionOutcome::Done) => {}
                    Ok(AdoptionOutcome::AnyOtherEndTag) => self.any_other_end_tag(token, n),
                    Err(err) => self.fail(err),
                }
            }

            // "An end tag whose tag name is "br""
            // "Parse error. Drop the attributes from the token, and act as
            // described in the next entry; i.e. act as if this was a "br" start
            // tag token with no attributes, rather than the end tag token that
            // it actually is."
            "br" => {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                self.handle_in_body_mode(&synthetic_start_tag("br"));
            }

            // "Any other end tag"
            _ => self.any_other_end_tag(token, name),
        }
    }

    /// "for each attribute on the token, check to see if the attribute is
    /// already present on" `element`; "If it is not, add the attribute and its
    /// corresponding value to that element."
    fn merge_attributes(&mut self, element: NodeId, attributes: &[Attribute]) {
        let Some(data) = self.tree.as_element_mut(element) else {
            return;
        };
        for attribute in attributes {
            data.attrs
                .entry(attribute.name.clone())
                .or_insert_with(|| attribute.value.clone());
        }
    }

    /// True while parsing a `td` or `th` fragment with nothing open but the
    /// synthetic root.
    fn is_table_directly_in_cell_context(&self) -> bool {
        self.stack.len() == 1
            && self
                .fragment_context
                .as_ref()
                .is_some_and(|context| context.is_html_one_of(&["td", "th"]))
    }

    /// The body element, if it is the second element on the stack.
    fn second_element_if_body(&self) -> Option<NodeId> {
        self.stack
            .get(1)
            .filter(|entry| entry.is_html("body"))
            .map(|entry| entry.node)
    }

    /// Record a parse error if an element that needs an end tag is still open.
    fn report_unclosed_elements(&mut self) {
        let unclosed = self
            .stack
            .entries()
            .iter()
            .find(|entry| !entry.is_html_one_of(ALLOWED_OPEN_AT_END))
            .map(|entry| entry.tag_name.clone());
        if let Some(unclosed) = unclosed {
            self.parse_error_detail(ParseErrorCode::UnexpectedEofInElement, Some(&unclosed));
        }
    }

    /// The shared "li" and "dd"/"dt" start tag steps. `closes` names the
    /// elements an open list item of this kind implicitly ends.
    fn start_list_item(&mut self, token: &Token, closes: &[&str]) {
        // STEP 1: "Set the frameset-ok flag to "not ok"."
        self.frameset_ok = false;

        // STEP 2-5: "Initialize node to be the current node (the bottommost
        //            node of the stack)."
        //            "Loop: If node is an li element, then run these substeps:
        //            Generate implied end tags, except for li elements. If the
        //            current node is not an li element, then this is a parse
        //            error. Pop elements from the stack of open elements until
        //            an li element has been popped from the stack. Jump to the
        //            step labeled done below."
        //            "If node is in the special category, but is not an
        //            address, div, or p element, then jump to the step labeled
        //            done below."
        //            "Otherwise, set node to the previous entry in the stack of
        //            open elements and return to the step labeled loop."
        let found = self
            .stack
            .entries()
            .iter()
            .rev()
            .find(|entry| {
                entry.is_html_one_of(closes)
                    || (entry.is_special() && !entry.is_html_one_of(&["address", "div", "p"]))
            })
            .filter(|entry| entry.is_html_one_of(closes))
            .map(|entry| entry.tag_name.clone());

        if let Some(open) = found {
            self.stack.generate_implied_end_tags(Some(&open));
            if !self.current_node_is(&open) {
                self.parse_error(ParseErrorCode::UnexpectedStartTag, token);
            }
            self.stack.pop_until(&open);
        }

        // STEP 6: "Done: If the stack of open elements has a p element in
        //          button scope, then close a p element."
        self.close_p_in_button_scope();

        // STEP 7: "Finally, insert an HTML element for the token."
        let _ = self.insert_html_element(token);
    }

    /// "Reconstruct the active formatting elements, if any."
    /// "Insert an HTML element for the token. Push onto the list of active
    /// formatting elements that element."
    fn insert_formatting_element(&mut self, token: &Token) {
        self.reconstruct_active_formatting_elements();
        let element = self.insert_html_element(token);
        self.active_formatting_elements.push(element, token.clone());
    }

    /// "Insert an HTML element for the token. Immediately pop the current node
    /// off the stack of open elements." "Acknowledge the token's self-closing
    /// flag, if it is set."
    fn insert_void_element(&mut self, token: &Token) {
        let _ = self.insert_html_element(token);
        let _ = self.stack.pop();
        self.acknowledge_self_closing();
    }

    /// The `math` and `svg` start tags.
    fn insert_foreign_root(&mut self, token: &Token, namespace: Namespace, self_closing: bool) {
        // "Reconstruct the active formatting elements, if any."
        self.reconstruct_active_formatting_elements();

        // "Adjust MathML attributes for the token." / "Adjust SVG attributes
        // for the token." "Adjust foreign attributes for the token."
        let adjusted = adjusted_foreign_start_tag(token, namespace, false);

        // "Insert a foreign element for the token, with the MathML namespace /
        // SVG namespace and false."
        let _ = self.insert_foreign_element(&adjusted, namespace);

        // "If the token has its self-closing flag set, pop the current node off
        // the stack of open elements and acknowledge the token's self-closing
        // flag."
        if self_closing {
            let _ = self.stack.pop();
            self.acknowledge_self_closing();
        }
    }

    fn in_body_form_end_tag(&mut self, token: &Token) {
        // "If there is no template element on the stack of open elements, then
        // run these substeps:"
        if !self.stack.contains_html("template") {
            // STEP 1: "Let node be the element that the form element pointer is
            //          set to, or null if it is not set to an element."
            // STEP 2: "Set the form element pointer to null."
            let node = self.form_element_pointer.take();

            // STEP 3: "If node is null or if the stack of open elements does not
            //          have node in scope, then this is a parse error; return
            //          and ignore the token."
            let Some(node) = node.filter(|&n| self.stack.has_node_in_scope(n, Scope::Default))
            else {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                return;
            };

            // STEP 4: "Generate implied end tags."
            self.stack.generate_implied_end_tags(None);

            // STEP 5: "If the current node is not node, then this is a parse
            //          error."
            if self.current_node().map(|n| n.node) != Some(node) {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
            }

            // STEP 6: "Remove node from the stack of open elements."
            if let Err(err) = self.stack.remove(node) {
                self.fail(err);
            }
            return;
        }

        // "If there is a template element on the stack of open elements, then
        // run these substeps instead:"
        // STEP 1: "If the stack of open elements does not have a form element
        //          in scope, then this is a parse error; return and ignore the
        //          token."
        // STEP 2: "Generate implied end tags."
        // STEP 3: "If the current node is not a form element, then this is a
        //          parse error."
        // STEP 4: "Pop elements from the stack of open elements until a form
        //          element has been popped from the stack."
        if !self.stack.has_in_scope("form", Scope::Default) {
            self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
            return;
        }
        self.stack.generate_implied_end_tags(None);
        if !self.current_node_is("form") {
            self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
        }
        self.stack.pop_until("form");
    }

    /// The `</li>`, `</dd>` and `</dt>` steps.
    fn close_element_with_implied_end_tags(&mut self, token: &Token, name: &str, scope: Scope) {
        if !self.stack.has_in_scope(name, scope) {
            self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
            return;
        }
        self.stack.generate_implied_end_tags(Some(name));
        if !self.current_node_is(name) {
            self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
        }
        self.stack.pop_until(name);
    }

    /// Remove `node` from the list of active formatting elements and the stack
    /// of open elements if it is still in them.
    fn forget_formatting_element(&mut self, node: NodeId) -> Result<(), HtmlError> {
        if self.active_formatting_elements.contains(node) {
            self.active_formatting_elements.remove(node)?;
        }
        if self.stack.contains(node) {
            self.stack.remove(node)?;
        }
        Ok(())
    }

    /// "Any other end tag" in body.
    fn any_other_end_tag(&mut self, token: &Token, name: &str) {
        // STEP 1: "Initialize node to be the current node (the bottommost node
        //          of the stack)."
        for index in (0..self.stack.len()).rev() {
            let Some(node) = self.stack.get(index) else {
                return;
            };

            // STEP 2: "Loop: If node is an HTML element with the same tag name
            //          as the token, then:"
            if node.is_html(name) {
                let node = node.node;
                // "Generate implied end tags, except for HTML elements with the
                // same tag name as the token."
                self.stack.generate_implied_end_tags(Some(name));
                // "If node is not the current node, then this is a parse error."
                if self.current_node().map(|n| n.node) != Some(node) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                }
                // "Pop all the nodes from the current node up to node,
                // including node, then stop these steps."
                if let Err(err) = self.stack.pop_until_node(node) {
                    self.fail(err);
                }
                return;
            }

            // STEP 3: "Otherwise, if node is in the special category, then this
            //          is a parse error; ignore the token, and return."
            if node.is_special() {
                self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
                return;
            }

            // STEP 4: "Set node to the previous entry in the stack of open
            //          elements."
        }
    }
}
