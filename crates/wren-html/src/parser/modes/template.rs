use crate::error::ParseErrorCode;
use crate::parser::core::{HTMLParser, InsertionMode};
use crate::tokenizer::Token;

/// Start tags handed to the "in head" rules from inside a template.
const HEAD_ELEMENTS: &[&str] = &[
    "base", "basefont", "bgsound", "link", "meta", "noframes", "script", "style", "template",
    "title",
];

impl HTMLParser {
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    pub(in crate::parser) fn handle_in_template_mode(&mut self, token: &Token) {
        match token {
            // "A character token"
            // "A comment token"
            // "A DOCTYPE token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Character { .. } | Token::Comment { .. } | Token::Doctype { .. } => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title""
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::StartTag { name, .. } if HEAD_ELEMENTS.contains(&name.as_str()) => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }
            Token::EndTag { name, .. } if name == "template" => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            // "A start tag whose tag name is one of: "caption", "colgroup",
            // "tbody", "tfoot", "thead""
            // "A start tag whose tag name is "col""
            // "A start tag whose tag name is "tr""
            // "A start tag whose tag name is one of: "td", "th""
            // "Any other start tag"
            // "Pop the current template insertion mode off the stack of
            // template insertion modes."
            // "Push X onto the stack of template insertion modes so that it is
            // the new current template insertion mode."
            // "Switch the insertion mode to X, and reprocess the token."
            Token::StartTag { name, .. } => {
                let mode = match name.as_str() {
                    "caption" | "colgroup" | "tbody" | "tfoot" | "thead" => InsertionMode::InTable,
                    "col" => InsertionMode::InColumnGroup,
                    "tr" => InsertionMode::InTableBody,
                    "td" | "th" => InsertionMode::InRow,
                    _ => InsertionMode::InBody,
                };
                let _ = self.template_insertion_modes.pop();
                self.template_insertion_modes.push(mode);
                self.switch_mode(mode);
                self.process_token(token);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => self.parse_error(ParseErrorCode::UnexpectedEndTag, token),

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If there is no template element on the stack of open
                // elements, then stop parsing. (fragment case)"
                if !self.stack.contains_html("template") {
                    return;
                }
                // "Otherwise, this is a parse error."
                self.parse_error_detail(ParseErrorCode::UnexpectedEofInElement, Some("template"));
                // "Pop elements from the stack of open elements until a
                // template element has been popped from the stack."
                self.stack.pop_until("template");
                // "Clear the list of active formatting elements up to the last
                // marker."
                self.active_formatting_elements.clear_to_last_marker();
                // "Pop the current template insertion mode off the stack of
                // template insertion modes."
                let _ = self.template_insertion_modes.pop();
                // "Reset the insertion mode appropriately."
                self.reset_insertion_mode_appropriately();
                // "Reprocess the token."
                self.process_token(token);
            }
        }
    }
}
