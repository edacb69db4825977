//! Foreign content parsing support for SVG and MathML.
//!
//! [§ 13.2.6.3 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

pub mod mathml;
pub mod svg;

pub use mathml::adjust_mathml_attributes;
pub use svg::{adjust_svg_attributes, adjust_svg_tag_name};

use wren_dom::{DomTree, Namespace};

use super::core::HTMLParser;
use super::open_elements::StackEntry;
use crate::error::ParseErrorCode;
use crate::tokenizer::{Attribute, Token};

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// "When the steps below require the user agent to adjust foreign attributes
/// for a token, then, if any of the attributes on the token match the strings
/// in the first column of the following table, let the attribute be a namespaced
/// attribute, with the prefix being the string in the second column, the local
/// name being the string in the third column, and the namespace being the
/// namespace in the fourth column."
///
/// Format: (`attribute_name`, prefix, `local_name`)
///
/// Attributes in the DOM are keyed by qualified name, so the adjustment only
/// decides which qualified name is stored.
const FOREIGN_ATTRIBUTE_ADJUSTMENTS: &[(&str, &str, &str)] = &[
    ("xlink:actuate", "xlink", "actuate"),
    ("xlink:arcrole", "xlink", "arcrole"),
    ("xlink:href", "xlink", "href"),
    ("xlink:role", "xlink", "role"),
    ("xlink:show", "xlink", "show"),
    ("xlink:title", "xlink", "title"),
    ("xlink:type", "xlink", "type"),
    ("xml:lang", "xml", "lang"),
    ("xml:space", "xml", "space"),
    ("xmlns", "", "xmlns"),
    ("xmlns:xlink", "xmlns", "xlink"),
];

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
pub fn adjust_foreign_attributes(attributes: &mut [Attribute]) {
    for attr in attributes {
        if let Some(&(_, prefix, local_name)) = FOREIGN_ATTRIBUTE_ADJUSTMENTS
            .iter()
            .find(|&&(from, _, _)| from == attr.name)
        {
            attr.name = if prefix.is_empty() {
                local_name.to_string()
            } else {
                format!("{prefix}:{local_name}")
            };
        }
    }
}

/// A copy of a start tag with its names fixed up for `namespace`: MathML or
/// SVG attribute adjustment, then foreign attribute adjustment. SVG tag names
/// are adjusted only when `adjust_tag_name` is set.
#[must_use]
pub fn adjusted_foreign_start_tag(token: &Token, namespace: Namespace, adjust_tag_name: bool) -> Token {
    let mut token = token.clone();
    if let Token::StartTag {
        name, attributes, ..
    } = &mut token
    {
        match namespace {
            Namespace::MathMl => adjust_mathml_attributes(attributes),
            Namespace::Svg => {
                if adjust_tag_name {
                    *name = adjust_svg_tag_name(name).to_string();
                }
                adjust_svg_attributes(attributes);
            }
            Namespace::Html => {}
        }
        adjust_foreign_attributes(attributes);
    }
    token
}

/// Start tags that break out of foreign content back into HTML.
const BREAKOUT_START_TAGS: &[&str] = &[
    "b",
    "big",
    "blockquote",
    "body",
    "br",
    "center",
    "code",
    "dd",
    "div",
    "dl",
    "dt",
    "em",
    "embed",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "hr",
    "i",
    "img",
    "li",
    "listing",
    "menu",
    "meta",
    "nobr",
    "ol",
    "p",
    "pre",
    "ruby",
    "s",
    "small",
    "span",
    "strong",
    "strike",
    "sub",
    "sup",
    "table",
    "tt",
    "u",
    "ul",
    "var",
];

/// "A start tag whose tag name is one of: ... A start tag whose tag name is
/// "font", if the token has any attributes named "color", "face", or "size".
/// An end tag whose tag name is "br", "p""
fn is_breakout_token(token: &Token) -> bool {
    match token {
        Token::StartTag { name, .. } if name == "font" => ["color", "face", "size"]
            .iter()
            .any(|attr| token.attribute(attr).is_some()),
        Token::StartTag { name, .. } => BREAKOUT_START_TAGS.contains(&name.as_str()),
        Token::EndTag { name, .. } => name == "br" || name == "p",
        _ => false,
    }
}

/// [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
///
/// "A node is an HTML integration point if it is one of the following
/// elements: A MathML annotation-xml element whose start tag token had an
/// attribute with the name "encoding" whose value was an ASCII
/// case-insensitive match for the string "text/html"; A MathML annotation-xml
/// element whose start tag token had an attribute with the name "encoding"
/// whose value was an ASCII case-insensitive match for the string
/// "application/xhtml+xml"; An SVG foreignObject element; An SVG desc element;
/// An SVG title element"
#[must_use]
pub fn is_html_integration_point(tree: &DomTree, entry: &StackEntry) -> bool {
    match entry.namespace {
        Namespace::Svg => matches!(entry.tag_name.as_str(), "foreignObject" | "desc" | "title"),
        Namespace::MathMl if entry.tag_name == "annotation-xml" => tree
            .as_element(entry.node)
            .and_then(|e| e.get_attribute("encoding"))
            .is_some_and(|encoding| {
                encoding.eq_ignore_ascii_case("text/html")
                    || encoding.eq_ignore_ascii_case("application/xhtml+xml")
            }),
        _ => false,
    }
}

/// True for a MathML text integration point.
#[must_use]
pub fn is_mathml_text_integration_point(entry: &StackEntry) -> bool {
    entry.namespace == Namespace::MathMl && mathml::is_text_integration_point(&entry.tag_name)
}

impl HTMLParser {
    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// True when the token goes to the current insertion mode rather than
    /// the foreign content rules.
    pub(in crate::parser) fn is_html_content(&self, token: &Token) -> bool {
        // "If the stack of open elements is empty"
        // "If the adjusted current node is an element in the HTML namespace"
        let Some(adjusted) = self.adjusted_current_node() else {
            return true;
        };
        if adjusted.namespace == Namespace::Html {
            return true;
        }

        let is_character = matches!(token, Token::Character { .. });
        let start_tag_name = match token {
            Token::StartTag { name, .. } => Some(name.as_str()),
            _ => None,
        };

        // "If the adjusted current node is a MathML text integration point and
        // the token is a start tag whose tag name is neither "mglyph" nor
        // "malignmark"" / "...and the token is a character token"
        if is_mathml_text_integration_point(adjusted)
            && (is_character
                || start_tag_name.is_some_and(|n| n != "mglyph" && n != "malignmark"))
        {
            return true;
        }

        // "If the adjusted current node is a MathML annotation-xml element and
        // the token is a start tag whose tag name is "svg""
        if adjusted.namespace == Namespace::MathMl
            && adjusted.tag_name == "annotation-xml"
            && start_tag_name == Some("svg")
        {
            return true;
        }

        // "If the adjusted current node is an HTML integration point and the
        // token is a start tag" / "...and the token is a character token"
        if is_html_integration_point(&self.tree, adjusted)
            && (is_character || start_tag_name.is_some())
        {
            return true;
        }

        // "If the token is an end-of-file token"
        token.is_eof()
    }

    /// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
    pub(in crate::parser) fn process_foreign_content(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Insert a U+FFFD REPLACEMENT CHARACTER character."
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter, token);
                self.insert_character('\u{FFFD}');
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Insert the token's character."
            //
            // "Any other character token"
            // "Insert the token's character. Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
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

            _ if is_breakout_token(token) => {
                // "Parse error."
                self.parse_error(ParseErrorCode::UnexpectedStartTag, token);

                // "While the current node is not a MathML text integration
                // point, an HTML integration point, or an element in the HTML
                // namespace, pop elements from the stack of open elements."
                while let Some(current) = self.current_node() {
                    if current.namespace == Namespace::Html
                        || is_mathml_text_integration_point(current)
                        || is_html_integration_point(&self.tree, current)
                    {
                        break;
                    }
                    let _ = self.stack.pop();
                }

                // "Reprocess the token according to the rules given in the
                // section corresponding to the current insertion mode in HTML
                // content."
                self.process_using_rules_for(self.insertion_mode, token);
            }

            // "Any other start tag"
            Token::StartTag { self_closing, .. } => {
                let Some(namespace) = self.adjusted_current_node().map(|n| n.namespace) else {
                    return;
                };

                // "If the adjusted current node is an element in the MathML
                // namespace, adjust MathML attributes for the token."
                // "If the adjusted current node is an element in the SVG
                // namespace, and the token's tag name is one of the ones in
                // the first column of the following table, change the tag
                // name..." "...adjust SVG attributes for the token."
                // "Adjust foreign attributes for the token."
                let adjusted = adjusted_foreign_start_tag(token, namespace, true);

                // "Insert a foreign element for the token, with adjusted
                // current node's namespace and false."
                let _ = self.insert_foreign_element(&adjusted, namespace);

                // "If the token has its self-closing flag set, then run the
                // appropriate steps from the following list:"
                // "If the token's tag name is "script", and the new current
                // node is in the SVG namespace: Acknowledge the token's
                // self-closing flag, and then act as described in the steps
                // for a "script" end tag below."
                // "Otherwise: Pop the current node off the stack of open
                // elements and acknowledge the token's self-closing flag."
                //
                // Nothing is executed, so both branches pop.
                if *self_closing {
                    let _ = self.stack.pop();
                    self.acknowledge_self_closing();
                }
            }

            // "An end tag whose tag name is "script", if the current node is
            // an SVG script element"
            // "Pop the current node off the stack of open elements."
            Token::EndTag { name, .. }
                if name == "script"
                    && self
                        .current_node()
                        .is_some_and(|n| n.namespace == Namespace::Svg && n.tag_name == "script") =>
            {
                let _ = self.stack.pop();
            }

            // "Any other end tag"
            Token::EndTag { name, .. } => self.foreign_content_end_tag(name, token),

            Token::EndOfFile => {}
        }
    }

    /// "Any other end tag" in foreign content.
    fn foreign_content_end_tag(&mut self, name: &str, token: &Token) {
        // STEP 1: "Initialize node to be the current node (the bottommost node
        //          of the stack)."
        let Some(mut index) = self.stack.len().checked_sub(1) else {
            return;
        };

        // STEP 2: "If node's tag name, converted to ASCII lowercase, is not the
        //          same as the tag name of the token, then this is a parse error."
        if self
            .stack
            .get(index)
            .is_some_and(|n| !n.tag_name.eq_ignore_ascii_case(name))
        {
            self.parse_error(ParseErrorCode::UnexpectedEndTag, token);
        }

        // STEP 3: "Loop:"
        loop {
            // "If node is the topmost element in the stack of open elements,
            // then return. (fragment case)"
            if index == 0 {
                return;
            }
            let Some(node) = self.stack.get(index) else {
                return;
            };

            // "If node's tag name, converted to ASCII lowercase, is the same as
            // the tag name of the token, pop elements from the stack of open
            // elements until node has been popped from the stack, and then
            // return."
            if node.tag_name.eq_ignore_ascii_case(name) {
                self.stack.truncate(index);
                return;
            }

            // "Set node to the previous entry in the stack of open elements."
            index -= 1;

            // "If node is not an element in the HTML namespace, return to the
            // step labeled loop."
            // "Otherwise, process the token according to the rules given in
            // the section corresponding to the current insertion mode in HTML
            // content."
            if self
                .stack
                .get(index)
                .is_some_and(|n| n.namespace == Namespace::Html)
            {
                self.process_using_rules_for(self.insertion_mode, token);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_attributes_keep_qualified_names() {
        let mut attrs = vec![
            Attribute::new("xlink:href".to_string(), "#a".to_string()),
            Attribute::new("xmlns".to_string(), "http://www.w3.org/2000/svg".to_string()),
            Attribute::new("href".to_string(), "#b".to_string()),
        ];
        adjust_foreign_attributes(&mut attrs);
        assert_eq!(attrs[0].name, "xlink:href");
        assert_eq!(attrs[1].name, "xmlns");
        assert_eq!(attrs[2].name, "href");
    }

    #[test]
    fn test_font_breaks_out_only_with_presentational_attributes() {
        let plain = Token::StartTag {
            name: "font".to_string(),
            self_closing: false,
            attributes: Vec::new(),
        };
        let colored = Token::StartTag {
            name: "font".to_string(),
            self_closing: false,
            attributes: vec![Attribute::new("color".to_string(), "red".to_string())],
        };
        assert!(!is_breakout_token(&plain));
        assert!(is_breakout_token(&colored));
    }
}
