//! [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//!
//! Node creation and placement shared by the insertion modes, along with the
//! bookkeeping algorithms of § 13.2.4: resetting the insertion mode and
//! reconstructing the active formatting elements.

use wren_dom::{AttributesMap, Namespace, NodeId, NodeType};

use super::active_formatting::FormattingEntry;
use super::core::{HTMLParser, InsertionMode};
use super::open_elements::{Scope, StackEntry};
use crate::error::ParseErrorCode;
use crate::tokenizer::{Token, TokenizerState};

/// "The adjusted insertion location": a parent, and the child to insert
/// before (`None` appends).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionPoint {
    /// The node that receives the new child.
    pub parent: NodeId,
    /// The existing child the new node goes in front of.
    pub before: Option<NodeId>,
}

impl InsertionPoint {
    const fn append_to(parent: NodeId) -> Self {
        Self {
            parent,
            before: None,
        }
    }
}

/// Elements whose presence as the target turns on foster parenting.
const FOSTER_PARENTING_TARGETS: &[&str] = &["table", "tbody", "tfoot", "thead", "tr"];

impl HTMLParser {
    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "The appropriate place for inserting a node, optionally using a
    /// particular override target"
    pub(super) fn appropriate_place(&self, override_target: Option<NodeId>) -> InsertionPoint {
        // STEP 1: "If there was an override target specified, then let target
        //          be the override target. Otherwise, let target be the
        //          current node."
        let target = override_target
            .or_else(|| self.current_node().map(|n| n.node))
            .unwrap_or_else(|| self.tree.root());

        // STEP 2: "Determine the adjusted insertion location using the first
        //          matching steps from the following list:"
        let place = if self.foster_parenting
            && self.tree.as_element(target).is_some_and(|e| {
                e.namespace == Namespace::Html
                    && FOSTER_PARENTING_TARGETS.contains(&e.tag_name.as_str())
            }) {
            self.foster_parent_place()
        } else {
            // "Otherwise: Let adjusted insertion location be inside target,
            // after its last child (if any)."
            InsertionPoint::append_to(target)
        };

        // STEP 3: "If the adjusted insertion location is inside a template
        //          element, let it instead be inside the template element's
        //          template contents, after its last child (if any)."
        match self.tree.template_contents(place.parent) {
            Some(contents) => InsertionPoint::append_to(contents),
            None => place,
        }
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    ///
    /// "If foster parenting is enabled and target is a table, tbody, tfoot,
    /// thead, or tr element"
    fn foster_parent_place(&self) -> InsertionPoint {
        let entries = self.stack.entries();

        // "Let last template be the last template element in the stack of
        // open elements, if any."
        // "Let last table be the last table element in the stack of open
        // elements, if any."
        let last_template = self.stack.last_position_of("template");
        let last_table = self.stack.last_position_of("table");

        // "If there is a last template and either there is no last table, or
        // there is one, but last template is lower (more recently added) than
        // last table in the stack of open elements, then: let adjusted
        // insertion location be inside last template's template contents,
        // after its last child (if any), and abort these steps."
        if let Some(template) = last_template
            && last_table.is_none_or(|table| template > table)
        {
            return InsertionPoint::append_to(entries[template].node);
        }

        // "If there is no last table, then let adjusted insertion location be
        // inside the first element in the stack of open elements (the html
        // element), after its last child (if any), and abort these steps.
        // (fragment case)"
        let Some(table_index) = last_table else {
            return InsertionPoint::append_to(
                self.stack.first().map_or(self.tree.root(), |n| n.node),
            );
        };

        // "If last table has a parent node, then let adjusted insertion
        // location be inside last table's parent node, immediately before
        // last table, and abort these steps."
        let table = entries[table_index].node;
        if let Some(parent) = self.tree.parent(table) {
            return InsertionPoint {
                parent,
                before: Some(table),
            };
        }

        // "Let previous element be the element immediately above last table
        // in the stack of open elements."
        // "Let adjusted insertion location be inside previous element, after
        // its last child (if any)."
        let previous = table_index
            .checked_sub(1)
            .and_then(|i| entries.get(i))
            .map_or(table, |n| n.node);
        InsertionPoint::append_to(previous)
    }

    pub(super) fn insert_node_at(&mut self, place: InsertionPoint, node: NodeId) {
        match place.before {
            Some(reference) => self.tree.insert_before(place.parent, node, reference),
            None => self.tree.append_child(place.parent, node),
        }
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// "Create an element for a token". The element is left detached.
    pub(super) fn create_element_for_token(&mut self, token: &Token, namespace: Namespace) -> NodeId {
        let mut attrs = AttributesMap::new();
        let name = match token {
            Token::StartTag {
                name, attributes, ..
            } => {
                for attr in attributes {
                    let _ = attrs
                        .entry(attr.name.clone())
                        .or_insert_with(|| attr.value.clone());
                }
                name.as_str()
            }
            _ => token.tag_name().unwrap_or_default(),
        };
        self.tree.create_element(name, namespace, attrs)
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    ///
    /// "Insert a foreign element": create the element, insert it at the
    /// appropriate place and push it onto the stack of open elements.
    pub(super) fn insert_foreign_element(&mut self, token: &Token, namespace: Namespace) -> NodeId {
        let place = self.appropriate_place(None);
        let node = self.create_element_for_token(token, namespace);
        self.insert_node_at(place, node);
        self.stack.push(StackEntry::new(
            node,
            token.tag_name().unwrap_or_default(),
            namespace,
        ));
        node
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// "To insert an HTML element given a token token: insert a foreign
    /// element given token, the HTML namespace, and false."
    pub(super) fn insert_html_element(&mut self, token: &Token) -> NodeId {
        self.insert_foreign_element(token, Namespace::Html)
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// Adjacent characters are merged into one Text node.
    pub(super) fn insert_character(&mut self, c: char) {
        // STEP 2: "Let the adjusted insertion location be the appropriate
        //          place for inserting a node."
        let place = self.appropriate_place(None);

        // STEP 3: "If the adjusted insertion location is in a Document node,
        //          then return."
        if self
            .tree
            .get(place.parent)
            .is_some_and(|n| n.node_type == NodeType::Document)
        {
            return;
        }

        // STEP 4: "If there is a Text node immediately before the adjusted
        //          insertion location, then append data to that Text node's
        //          data."
        let previous = match place.before {
            Some(reference) => self.tree.prev_sibling(reference),
            None => self.tree.last_child(place.parent),
        };
        if let Some(previous) = previous
            && let Some(node) = self.tree.get_mut(previous)
            && let NodeType::Text(data) = &mut node.node_type
        {
            data.push(c);
            return;
        }

        // "Otherwise, create a new Text node whose data is data and whose node
        // document is the same as that of the element in which the adjusted
        // insertion location finds itself, and insert the newly created node
        // at the adjusted insertion location."
        let mut buffer = [0; 4];
        let text = self.tree.create_text(c.encode_utf8(&mut buffer));
        self.insert_node_at(place, text);
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    ///
    /// "Insert a comment" at the appropriate place.
    pub(super) fn insert_comment(&mut self, data: &str) {
        let place = self.appropriate_place(None);
        let comment = self.tree.create_comment(data);
        self.insert_node_at(place, comment);
    }

    /// "Insert a comment as the last child of" `parent`.
    pub(super) fn insert_comment_in(&mut self, parent: NodeId, data: &str) {
        let comment = self.tree.create_comment(data);
        self.tree.append_child(parent, comment);
    }

    /// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// "The generic raw text element parsing algorithm"
    pub(super) fn parse_generic_raw_text(&mut self, token: &Token) {
        self.parse_generic_text(token, TokenizerState::RAWTEXT);
    }

    /// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#generic-rcdata-element-parsing-algorithm)
    ///
    /// "The generic RCDATA element parsing algorithm"
    pub(super) fn parse_generic_rcdata(&mut self, token: &Token) {
        self.parse_generic_text(token, TokenizerState::RCDATA);
    }

    fn parse_generic_text(&mut self, token: &Token, state: TokenizerState) {
        // STEP 1: "Insert an HTML element for the token."
        let _ = self.insert_html_element(token);
        // STEP 2: "switch the tokenizer to the RAWTEXT state" / "RCDATA state"
        self.tokenizer.switch_to(state);
        // STEP 3: "Let the original insertion mode be the current insertion mode."
        // STEP 4: "Then, switch the insertion mode to "text"."
        self.switch_mode_returning(InsertionMode::Text);
    }

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    ///
    /// "Reset the insertion mode appropriately"
    pub(super) fn reset_insertion_mode_appropriately(&mut self) {
        let mode = self.appropriate_insertion_mode();
        self.switch_mode(mode);
    }

    fn appropriate_insertion_mode(&self) -> InsertionMode {
        let entries = self.stack.entries();

        // STEP 2: "Let node be the last node in the stack of open elements."
        for index in (0..entries.len()).rev() {
            // STEP 3: "Loop: If node is the first node in the stack of open
            //          elements, then set last to true, and, if the parser was
            //          created as part of the HTML fragment parsing algorithm
            //          (fragment case), set node to the context element passed
            //          to that algorithm."
            let last = index == 0;
            let node = match (&self.fragment_context, last) {
                (Some(context), true) => context,
                _ => &entries[index],
            };
            if node.namespace != Namespace::Html {
                if last {
                    return InsertionMode::InBody;
                }
                continue;
            }

            match node.tag_name.as_str() {
                // STEP 4: "If node is a select element, run these substeps:"
                "select" => {
                    // "If last is true, jump to the step below labeled done."
                    if !last {
                        // "Let ancestor be node."
                        // "Loop: If ancestor is the first node in the stack of
                        // open elements, jump to the step below labeled done."
                        // "Let ancestor be the node before ancestor in the
                        // stack of open elements."
                        // "If ancestor is a template node, jump to the step
                        // below labeled done."
                        // "If ancestor is a table node, switch the insertion
                        // mode to "in select in table" and return."
                        for ancestor in entries[..index].iter().rev() {
                            if ancestor.is_html("template") {
                                break;
                            }
                            if ancestor.is_html("table") {
                                return InsertionMode::InSelectInTable;
                            }
                        }
                    }
                    // "Done: Switch the insertion mode to "in select" and return."
                    return InsertionMode::InSelect;
                }
                // STEP 5: "If node is a td or th element and last is false..."
                "td" | "th" if !last => return InsertionMode::InCell,
                // STEP 6
                "tr" => return InsertionMode::InRow,
                // STEP 7
                "tbody" | "thead" | "tfoot" => return InsertionMode::InTableBody,
                // STEP 8
                "caption" => return InsertionMode::InCaption,
                // STEP 9
                "colgroup" => return InsertionMode::InColumnGroup,
                // STEP 10
                "table" => return InsertionMode::InTable,
                // STEP 11: "If node is a template element, then switch the
                //           insertion mode to the current template insertion
                //           mode and return."
                "template" => {
                    return self
                        .current_template_insertion_mode()
                        .unwrap_or(InsertionMode::InTemplate);
                }
                // STEP 12: "If node is a head element and last is false..."
                "head" if !last => return InsertionMode::InHead,
                // STEP 13
                "body" => return InsertionMode::InBody,
                // STEP 14
                "frameset" => return InsertionMode::InFrameset,
                // STEP 15: "If node is an html element, run these substeps:"
                // "If the head element pointer is null, switch the insertion
                // mode to "before head" and return. (fragment case)"
                // "Otherwise, the head element pointer is not null, switch the
                // insertion mode to "after head" and return."
                "html" => {
                    return if self.head_element_pointer.is_none() {
                        InsertionMode::BeforeHead
                    } else {
                        InsertionMode::AfterHead
                    };
                }
                _ => {}
            }

            // STEP 16: "If last is true, then switch the insertion mode to "in
            //           body" and return. (fragment case)"
            if last {
                return InsertionMode::InBody;
            }
            // STEP 17: "Let node now be the node before node in the stack of
            //           open elements." STEP 18: "Return to the step labeled loop."
        }
        InsertionMode::InBody
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// "Reconstruct the active formatting elements, if any"
    pub(super) fn reconstruct_active_formatting_elements(&mut self) {
        // STEP 1: "If there are no entries in the list of active formatting
        //          elements, then there is nothing to reconstruct; stop this
        //          algorithm."
        // STEP 2: "If the last (most recently added) entry in the list of
        //          active formatting elements is a marker, or if it is an
        //          element that is in the stack of open elements, then there is
        //          nothing to reconstruct; stop this algorithm."
        let is_settled = |parser: &Self, index: usize| match parser.active_formatting_elements.get(index) {
            Some(FormattingEntry::Element { node, .. }) => parser.stack.contains(*node),
            _ => true,
        };
        let Some(mut index) = self.active_formatting_elements.len().checked_sub(1) else {
            return;
        };
        if is_settled(self, index) {
            return;
        }

        // STEP 4-6: "Rewind: If there are no entries before entry in the list
        //            of active formatting elements, then jump to the step
        //            labeled create. Let entry be the entry one earlier than
        //            entry in the list of active formatting elements. If entry
        //            is neither a marker nor an element that is also in the
        //            stack of open elements, go to the step labeled rewind."
        // STEP 7: "Advance: Let entry be the element one later than entry in
        //          the list of active formatting elements."
        while index > 0 {
            if is_settled(self, index - 1) {
                break;
            }
            index -= 1;
        }

        // STEP 8: "Create: Insert an HTML element for the token for which the
        //          element entry was created, to obtain new element."
        // STEP 9: "Replace the entry for entry in the list with an entry for
        //          new element."
        // STEP 10: "If the entry for new element in the list of active
        //           formatting elements is not the last entry in the list,
        //           return to the step labeled advance."
        for i in index..self.active_formatting_elements.len() {
            let Some(FormattingEntry::Element { node, token }) =
                self.active_formatting_elements.get(i).cloned()
            else {
                continue;
            };
            let element = self.insert_html_element(&token);
            if let Err(err) = self.active_formatting_elements.replace_node(node, element) {
                self.fail(err);
                return;
            }
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "When the steps above say the user agent is to close a p element, it
    /// means that the user agent must generate implied end tags, except for p
    /// elements. If the current node is not a p element, then this is a parse
    /// error. Pop elements from the stack of open elements until a p element
    /// has been popped from the stack."
    pub(super) fn close_a_p_element(&mut self) {
        self.stack.generate_implied_end_tags(Some("p"));
        if !self.current_node_is("p") {
            self.parse_error_detail(ParseErrorCode::UnexpectedEndTag, Some("p"));
        }
        self.stack.pop_until("p");
    }

    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    pub(super) fn close_p_in_button_scope(&mut self) {
        if self.stack.has_in_scope("p", Scope::Button) {
            self.close_a_p_element();
        }
    }

    /// [§ 13.2.6.4.15](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    ///
    /// "Where the steps above say to close the cell, they mean to run the
    /// following algorithm: Generate implied end tags. If the current node is
    /// not now a td element or a th element, then this is a parse error. Pop
    /// elements from the stack of open elements stack until a td element or a
    /// th element has been popped from the stack. Clear the list of active
    /// formatting elements up to the last marker. Switch the insertion mode to
    /// "in row"."
    pub(super) fn close_the_cell(&mut self) {
        self.stack.generate_implied_end_tags(None);
        if !self
            .current_node()
            .is_some_and(|n| n.is_html_one_of(&["td", "th"]))
        {
            self.parse_error_detail(ParseErrorCode::UnexpectedEndTag, Some("td"));
        }
        self.stack.pop_until_one_of(&["td", "th"]);
        self.active_formatting_elements.clear_to_last_marker();
        self.switch_mode(InsertionMode::InRow);
    }
}
