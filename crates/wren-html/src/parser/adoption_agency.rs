//! [§ 13.2.6.4.7 The adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
//!
//! Repairs misnested formatting elements such as `<b><p>x</b>y</p>`. The
//! outer loop runs at most eight times and the inner loop drops entries from
//! the list of active formatting elements after three passes, so the
//! algorithm always terminates.

use wren_dom::Namespace;

use super::core::HTMLParser;
use super::open_elements::{Scope, StackEntry};
use crate::error::{HtmlError, ParseErrorCode};
use crate::tokenizer::Token;

/// "If outer loop counter is greater than or equal to 8, then return."
const OUTER_LOOP_LIMIT: usize = 8;

/// "If inner loop counter is greater than 3 and node is in the list of active
/// formatting elements, then remove node from the list of active formatting
/// elements."
const INNER_LOOP_LIMIT: usize = 3;

/// How the algorithm ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AdoptionOutcome {
    /// The end tag was fully handled.
    Done,
    /// "act as described in the "any other end tag" entry above"
    AnyOtherEndTag,
}

impl HTMLParser {
    /// Run the adoption agency algorithm for an end tag (or a synthesized one)
    /// named `subject`.
    ///
    /// # Errors
    ///
    /// Fails when formatting element or furthest block has gone missing from
    /// the stack of open elements or the list of active formatting elements
    /// partway through. The caller stops the parse.
    pub(super) fn run_adoption_agency(
        &mut self,
        subject: &str,
        token: &Token,
    ) -> Result<AdoptionOutcome, HtmlError> {
        // STEP 2: "If the current node is an HTML element whose tag name is
        //          subject, and the current node is not in the list of active
        //          formatting elements, then pop the current node off the stack
        //          of open elements and return."
        if let Some(current) = self.current_node()
            && current.is_html(subject)
            && !self.active_formatting_elements.contains(current.node)
        {
            let _ = self.stack.pop();
            return Ok(AdoptionOutcome::Done);
        }

        // STEP 3-5: "Let outer loop counter be 0." "Outer loop: If outer loop
        //            counter is greater than or equal to 8, then return."
        for _ in 0..OUTER_LOOP_LIMIT {
            // STEP 7: "Let formatting element be the last element in the list
            //          of active formatting elements that: is between the end
            //          of the list and the last marker in the list, if any, or
            //          the start of the list otherwise, and has the tag name
            //          subject."
            // STEP 8: "If there is no such element, then return and instead
            //          act as described in the "any other end tag" entry above."
            let Some((formatting_index, formatting_element)) =
                self.active_formatting_elements.last_element_named(subject)
            else {
                return Ok(AdoptionOutcome::AnyOtherEndTag);
            };

            // STEP 9: "If formatting element is not in the stack of open
            //          elements, then this is a parse error; remove the element
            //          from the list, and return."
            let Some(formatting_stack_index) = self.stack.position(formatting_element) else {
                self.parse_error(ParseErrorCode::MisnestedFormattingElement, token);
                self.active_formatting_elements.remove_at(formatting_index);
                return Ok(AdoptionOutcome::Done);
            };

            // STEP 10: "If formatting element is in the stack of open elements,
            //           but the element is not in scope, then this is a parse
            //           error; return."
            if !self
                .stack
                .has_node_in_scope(formatting_element, Scope::Default)
            {
                self.parse_error(ParseErrorCode::MisnestedFormattingElement, token);
                return Ok(AdoptionOutcome::Done);
            }

            // STEP 11: "If formatting element is not the current node, this is
            //           a parse error. (But do not return.)"
            if self.current_node().map(|n| n.node) != Some(formatting_element) {
                self.parse_error(ParseErrorCode::MisnestedFormattingElement, token);
            }

            // STEP 12: "Let furthest block be the topmost node in the stack of
            //           open elements that is lower in the stack than formatting
            //           element, and is an element in the special category."
            let furthest_block = self.stack.entries()[formatting_stack_index + 1..]
                .iter()
                .find(|entry| entry.is_special())
                .map(|entry| entry.node);

            // STEP 13: "If there is no furthest block, then the UA must first
            //           pop all the nodes from the bottom of the stack of open
            //           elements, from the current node up to and including
            //           formatting element, then remove formatting element from
            //           the list of active formatting elements, and finally
            //           return."
            let Some(furthest_block) = furthest_block else {
                self.stack.truncate(formatting_stack_index);
                self.active_formatting_elements.remove(formatting_element)?;
                return Ok(AdoptionOutcome::Done);
            };

            // STEP 14: "Let common ancestor be the element immediately above
            //           formatting element in the stack of open elements."
            //
            // The html element is never a formatting element, so there is
            // always one.
            let common_ancestor = formatting_stack_index
                .checked_sub(1)
                .and_then(|i| self.stack.get(i))
                .map(|n| n.node)
                .ok_or(HtmlError::MissingOpenElement(formatting_element.0))?;

            // STEP 15: "Let a bookmark note the position of formatting element
            //           in the list of active formatting elements relative to
            //           the elements on either side of it in the list."
            let mut bookmark = formatting_index;

            // STEP 16: "Let node and last node be furthest block."
            let mut node_index = self
                .stack
                .position(furthest_block)
                .ok_or(HtmlError::MissingOpenElement(furthest_block.0))?;
            let mut last_node = furthest_block;

            // STEP 17-18: "Let inner loop counter be 0." "Inner loop:"
            let mut inner_loop_counter = 0;
            loop {
                // STEP 18.1: "Increment inner loop counter by 1."
                inner_loop_counter += 1;

                // STEP 18.2: "Let node be the element immediately above node in
                //             the stack of open elements, or if node is no
                //             longer in the stack of open elements (e.g. because
                //             it got removed by this algorithm), the element
                //             that was immediately above node in the stack of
                //             open elements before node was removed."
                //
                // Removing node leaves the element above it at the same index,
                // so stepping the index up covers both cases. Formatting
                // element sits above furthest block, so the walk reaches it
                // before the top of the stack.
                node_index = node_index
                    .checked_sub(1)
                    .ok_or(HtmlError::MissingOpenElement(formatting_element.0))?;
                let node = self
                    .stack
                    .get(node_index)
                    .map(|n| n.node)
                    .ok_or(HtmlError::MissingOpenElement(formatting_element.0))?;

                // STEP 18.3: "If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }

                // STEP 18.4: "If inner loop counter is greater than 3 and node
                //             is in the list of active formatting elements,
                //             then remove node from the list of active
                //             formatting elements."
                if inner_loop_counter > INNER_LOOP_LIMIT
                    && let Some(position) = self.active_formatting_elements.position(node)
                {
                    self.active_formatting_elements.remove_at(position);
                    if position < bookmark {
                        bookmark -= 1;
                    }
                }

                // STEP 18.5: "If node is not in the list of active formatting
                //             elements, then remove node from the stack of open
                //             elements and continue."
                let Some(node_formatting_index) = self.active_formatting_elements.position(node)
                else {
                    self.stack.remove(node)?;
                    continue;
                };

                // STEP 18.6: "Create an element for the token for which the
                //             element node was created, in the HTML namespace,
                //             with common ancestor as the intended parent;
                //             replace the entry for node in the list of active
                //             formatting elements with an entry for the new
                //             element, replace the entry for node in the stack
                //             of open elements with an entry for the new
                //             element, and let node be the new element."
                let node_token = self
                    .active_formatting_elements
                    .token_at(node_formatting_index)
                    .cloned()
                    .ok_or(HtmlError::MissingFormattingEntry(node.0))?;
                let new_element = self.create_element_for_token(&node_token, Namespace::Html);
                self.active_formatting_elements
                    .replace_node(node, new_element)?;
                self.stack.replace(
                    node,
                    StackEntry::new(
                        new_element,
                        node_token.tag_name().unwrap_or_default(),
                        Namespace::Html,
                    ),
                )?;
                let node = new_element;

                // STEP 18.7: "If last node is furthest block, then move the
                //             aforementioned bookmark to be immediately after
                //             the new node in the list of active formatting
                //             elements."
                if last_node == furthest_block {
                    bookmark = node_formatting_index + 1;
                }

                // STEP 18.8: "Append last node to node."
                self.tree.append_child(node, last_node);

                // STEP 18.9: "Set last node to node."
                last_node = node;
            }

            // STEP 19: "Insert whatever last node ended up being in the
            //           appropriate place for inserting a node, but using
            //           common ancestor as the override target."
            let place = self.appropriate_place(Some(common_ancestor));
            self.insert_node_at(place, last_node);

            // STEP 20: "Create an element for the token for which formatting
            //           element was created, in the HTML namespace, with
            //           furthest block as the intended parent."
            let formatting_position = self
                .active_formatting_elements
                .position(formatting_element)
                .ok_or(HtmlError::MissingFormattingEntry(formatting_element.0))?;
            let formatting_token = self
                .active_formatting_elements
                .token_at(formatting_position)
                .cloned()
                .ok_or(HtmlError::MissingFormattingEntry(formatting_element.0))?;
            let new_element = self.create_element_for_token(&formatting_token, Namespace::Html);

            // STEP 21: "Take all of the child nodes of furthest block and
            //           append them to the element created in the last step."
            self.tree.move_children(furthest_block, new_element);

            // STEP 22: "Append that new element to furthest block."
            self.tree.append_child(furthest_block, new_element);

            // STEP 23: "Remove formatting element from the list of active
            //           formatting elements, and insert the new element into
            //           the list of active formatting elements at the position
            //           of the aforementioned bookmark."
            self.active_formatting_elements.remove_at(formatting_position);
            if formatting_position < bookmark {
                bookmark -= 1;
            }
            self.active_formatting_elements
                .insert(bookmark, new_element, formatting_token.clone())?;

            // STEP 24: "Remove formatting element from the stack of open
            //           elements, and insert the new element into the stack of
            //           open elements immediately below the position of
            //           furthest block in that stack."
            self.stack.remove(formatting_element)?;
            self.stack.insert_below(
                furthest_block,
                StackEntry::new(
                    new_element,
                    formatting_token.tag_name().unwrap_or_default(),
                    Namespace::Html,
                ),
            )?;
        }

        Ok(AdoptionOutcome::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;

    /// A parser with `<b><div>` open in the body and nothing above `b`.
    fn parser_with_bare_formatting_element() -> HTMLParser {
        let mut parser = HTMLParser::new(ParserConfig::default());
        parser.feed("<b><div>x").expect("parser is running");
        for _ in 0..2 {
            let top = parser.stack.first().map(|entry| entry.node).expect("html and body are open");
            parser.stack.remove(top).expect("top entry is open");
        }
        assert!(parser.stack.first().is_some_and(|entry| entry.is_html("b")));
        parser
    }

    #[test]
    fn test_missing_common_ancestor_stops_the_parse() {
        let mut parser = parser_with_bare_formatting_element();
        let b = parser.stack.first().map(|entry| entry.node).expect("b is open");

        let err = parser.feed("</b>y").expect_err("b has no common ancestor");
        assert_eq!(err, HtmlError::MissingOpenElement(b.0));
        assert_eq!(parser.feed("more"), Err(HtmlError::MissingOpenElement(b.0)));

        let output = parser.finish();
        assert_eq!(output.failure, Some(HtmlError::MissingOpenElement(b.0)));
        let body = output.tree.body().expect("body was built before the failure");
        assert_eq!(output.tree.text_content(body), "x");
    }

    #[test]
    fn test_end_tag_without_formatting_entry_falls_through() {
        let mut parser = HTMLParser::new(ParserConfig::default());
        parser.feed("<p>").expect("parser is running");
        let token = Token::EndTag { name: "b".into() };
        assert_eq!(
            parser.run_adoption_agency("b", &token),
            Ok(AdoptionOutcome::AnyOtherEndTag)
        );
    }
}
