use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use strum_macros::Display;
use tracing::{debug, error, trace};
use wren_common::warning::warn_once;
use wren_dom::{DomTree, Namespace, NodeId, QuirksMode};

use super::active_formatting::ActiveFormattingElements;
use super::open_elements::{StackEntry, StackOfOpenElements};
use crate::config::ParserConfig;
use crate::error::{HtmlError, ParseErrorCode, ParseIssue};
use crate::tokenizer::{HTMLTokenizer, Token};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// Cooperative cancellation for a running parse.
///
/// Clones share one flag, so a handle taken before parsing can stop the
/// parser from another thread. The parser checks it between tokens.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    /// Request that the parser stop.
    pub fn abort(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// True once [`abort`](Self::abort) has been called on any clone.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// What a finished parse hands back.
#[derive(Debug)]
pub struct ParseOutput {
    /// The constructed tree. For a fragment parse the root is a
    /// `DocumentFragment` holding the parsed nodes.
    pub tree: DomTree,
    /// Parse errors, in the order they were found. Empty when
    /// [`ParserConfig::collect_issues`] is off.
    pub issues: Vec<ParseIssue>,
    /// The document's quirks mode.
    pub quirks_mode: QuirksMode,
    /// Set when tree construction stopped because its own bookkeeping broke.
    /// The tree holds what was built up to that point.
    pub failure: Option<HtmlError>,
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The HTML parser builds a DOM tree from a stream of tokens.
///
/// Input is pushed with [`feed`](Self::feed) in chunks of any size; tokens are
/// pulled from the tokenizer until it runs dry, so a parse can be suspended at
/// any character boundary and resumed with the next chunk.
pub struct HTMLParser {
    pub(super) config: ParserConfig,

    pub(super) tokenizer: HTMLTokenizer,

    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    pub(super) insertion_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    ///
    /// Where the "text" and "in table text" modes return to.
    pub(super) original_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    pub(super) template_insertion_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    pub(super) stack: StackOfOpenElements,

    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    pub(super) active_formatting_elements: ActiveFormattingElements,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    pub(super) head_element_pointer: Option<NodeId>,

    /// "The form element pointer points to the last form element that was
    /// opened and whose end tag has not yet been seen."
    pub(super) form_element_pointer: Option<NodeId>,

    pub(super) tree: DomTree,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    pub(super) frameset_ok: bool,

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    pub(super) foster_parenting: bool,

    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    ///
    /// "The pending table character tokens list"
    pub(super) pending_table_character_tokens: String,

    /// Set when a handler acknowledges the self-closing flag of the token
    /// being processed.
    self_closing_acknowledged: bool,

    /// Drop the next token if it is a U+000A LINE FEED (after `pre`,
    /// `listing` and `textarea` start tags).
    pub(super) skip_next_newline: bool,

    /// The context element of a fragment parse, created detached in `tree`.
    pub(super) fragment_context: Option<StackEntry>,

    stopped: bool,
    failure: Option<HtmlError>,
    abort: AbortHandle,
    issues: Vec<ParseIssue>,
}

impl HTMLParser {
    /// Create a parser for a full document.
    #[must_use]
    pub fn new(config: ParserConfig) -> Self {
        Self::with_tree(config, DomTree::new())
    }

    pub(super) fn with_tree(config: ParserConfig, tree: DomTree) -> Self {
        Self {
            config,
            tokenizer: HTMLTokenizer::streaming(),
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            template_insertion_modes: Vec::new(),
            stack: StackOfOpenElements::new(),
            active_formatting_elements: ActiveFormattingElements::new(),
            head_element_pointer: None,
            form_element_pointer: None,
            tree,
            frameset_ok: true,
            foster_parenting: false,
            pending_table_character_tokens: String::new(),
            self_closing_acknowledged: false,
            skip_next_newline: false,
            fragment_context: None,
            stopped: false,
            failure: None,
            abort: AbortHandle::default(),
            issues: Vec::new(),
        }
    }

    /// The configuration this parser was created with.
    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// A handle that can stop this parser, possibly from another thread.
    #[must_use]
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// The current insertion mode.
    #[must_use]
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.insertion_mode
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Parse errors recorded so far.
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Append a chunk of input and build as much of the tree as it allows.
    ///
    /// # Errors
    ///
    /// Returns [`HtmlError::Finished`] if the parser was aborted or has
    /// already seen the end of its input, and the recorded failure once tree
    /// construction has stopped on a broken invariant.
    pub fn feed(&mut self, chunk: &str) -> Result<(), HtmlError> {
        if self.abort.is_aborted() {
            self.halt();
        }
        if self.stopped {
            return Err(self.failure.clone().unwrap_or(HtmlError::Finished));
        }
        self.tokenizer.feed(chunk);
        self.pump();
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Signal the end of input, run the end-of-file steps and return the tree.
    #[must_use]
    pub fn finish(mut self) -> ParseOutput {
        if self.abort.is_aborted() {
            self.halt();
        }
        if !self.stopped {
            self.tokenizer.close();
            self.pump();
        }
        self.collect_tokenizer_errors();
        self.finish_fragment();

        debug!(
            nodes = self.tree.len(),
            issues = self.issues.len(),
            quirks_mode = %self.tree.quirks_mode(),
            "parse finished"
        );

        ParseOutput {
            quirks_mode: self.tree.quirks_mode(),
            tree: self.tree,
            issues: self.issues,
            failure: self.failure,
        }
    }

    /// Stop parsing now. Buffered input is discarded; the tree keeps whatever
    /// was built.
    pub fn abort(&mut self) {
        self.abort.abort();
        self.halt();
    }

    /// Stop tree construction on a broken invariant. Only the first failure
    /// is kept.
    pub(super) fn fail(&mut self, err: HtmlError) {
        error!(
            %err,
            mode = %self.insertion_mode,
            offset = self.tokenizer.position(),
            "tree construction stopped"
        );
        self.tokenizer.discard_input();
        self.stopped = true;
        if self.failure.is_none() {
            self.failure = Some(err);
        }
    }

    fn halt(&mut self) {
        if !self.stopped {
            debug!(offset = self.tokenizer.position(), "parse aborted");
        }
        self.tokenizer.discard_input();
        self.stopped = true;
    }

    /// Pull tokens until the tokenizer needs more input or parsing stops.
    fn pump(&mut self) {
        while !self.stopped {
            if self.abort.is_aborted() {
                self.halt();
                break;
            }
            if self.process_next_token().is_none() {
                break;
            }
        }
    }

    /// Run the next token through tree construction and return it, or `None`
    /// if the tokenizer needs more input.
    fn process_next_token(&mut self) -> Option<Token> {
        let foreign = self
            .adjusted_current_node()
            .is_some_and(|n| n.namespace != Namespace::Html);
        self.tokenizer.set_allow_cdata(foreign);

        let token = self.tokenizer.next_token()?;
        self.collect_tokenizer_errors();
        self.dispatch(&token);

        // [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
        // Every end-of-file branch ends in "stop parsing".
        if token.is_eof() {
            self.stopped = true;
        }
        Some(token)
    }

    fn collect_tokenizer_errors(&mut self) {
        for issue in self.tokenizer.take_errors() {
            self.record_issue(issue);
        }
    }

    /// Handle one token from the tokenizer.
    fn dispatch(&mut self, token: &Token) {
        // [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
        // "If the next token is a U+000A LINE FEED (LF) character token, then
        // ignore that token and move on to the next one."
        if std::mem::take(&mut self.skip_next_newline)
            && matches!(token, Token::Character { data: '\n' })
        {
            return;
        }

        self.self_closing_acknowledged = false;
        self.process_token(token);

        // [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#acknowledge-self-closing-flag)
        // "When a start tag token is emitted with its self-closing flag set, if
        // the flag is not acknowledged when it is processed by the tree
        // construction stage, that is a parse error."
        if matches!(token, Token::StartTag { self_closing: true, .. })
            && !self.self_closing_acknowledged
        {
            self.parse_error(
                ParseErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus,
                token,
            );
        }
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// Route a token to the current insertion mode or to the rules for
    /// foreign content. "Reprocess the token" comes back through here.
    pub(super) fn process_token(&mut self, token: &Token) {
        if self.is_html_content(token) {
            self.process_using_rules_for(self.insertion_mode, token);
        } else {
            self.process_foreign_content(token);
        }
    }

    /// "Process the token using the rules for the X insertion mode"
    pub(super) fn process_using_rules_for(&mut self, mode: InsertionMode, token: &Token) {
        match mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.handle_in_template_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
        }
    }

    /// "Switch the insertion mode to X"
    pub(super) fn switch_mode(&mut self, mode: InsertionMode) {
        trace!(from = %self.insertion_mode, to = %mode, "insertion mode");
        self.insertion_mode = mode;
    }

    /// Remember the current mode and switch to `mode` ("text" and "in table
    /// text" return to it).
    pub(super) fn switch_mode_returning(&mut self, mode: InsertionMode) {
        self.original_insertion_mode = Some(self.insertion_mode);
        self.switch_mode(mode);
    }

    /// "Switch the insertion mode to the original insertion mode"
    pub(super) fn return_to_original_mode(&mut self) {
        let mode = self
            .original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InBody);
        self.switch_mode(mode);
    }

    /// "Acknowledge the token's self-closing flag"
    pub(super) const fn acknowledge_self_closing(&mut self) {
        self.self_closing_acknowledged = true;
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    ///
    /// "The current node is the bottommost node in this stack of open elements."
    pub(super) fn current_node(&self) -> Option<&StackEntry> {
        self.stack.current()
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#adjusted-current-node)
    ///
    /// "The adjusted current node is the context element if the parser was
    /// created as part of the HTML fragment parsing algorithm and the stack of
    /// open elements has only one element in it (fragment case); otherwise,
    /// the adjusted current node is the current node."
    pub(super) fn adjusted_current_node(&self) -> Option<&StackEntry> {
        if self.stack.len() == 1
            && let Some(context) = &self.fragment_context
        {
            return Some(context);
        }
        self.stack.current()
    }

    /// True if the current node is the HTML element `name`.
    pub(super) fn current_node_is(&self, name: &str) -> bool {
        self.current_node().is_some_and(|n| n.is_html(name))
    }

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#current-template-insertion-mode)
    pub(super) fn current_template_insertion_mode(&self) -> Option<InsertionMode> {
        self.template_insertion_modes.last().copied()
    }

    /// [§ 4.5 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// "ASCII whitespace is U+0009 TAB, U+000A LF, U+000C FF, U+000D CR,
    /// or U+0020 SPACE."
    pub(super) const fn is_whitespace(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
    }

    /// Record a tree construction parse error for `token`.
    pub(super) fn parse_error(&mut self, code: ParseErrorCode, token: &Token) {
        let detail = token.tag_name().map(str::to_string);
        self.parse_error_detail(code, detail.as_deref());
    }

    /// Record a parse error with optional detail text.
    pub(super) fn parse_error_detail(&mut self, code: ParseErrorCode, detail: Option<&str>) {
        let mut issue = ParseIssue::new(code, self.tokenizer.position());
        if let Some(detail) = detail {
            issue = issue.with_detail(detail);
        }
        self.record_issue(issue);
    }

    fn record_issue(&mut self, issue: ParseIssue) {
        debug!(
            code = %issue.code,
            offset = issue.offset,
            detail = issue.detail.as_deref().unwrap_or(""),
            mode = %self.insertion_mode,
            "parse error"
        );
        let code: &'static str = issue.code.into();
        let _ = warn_once("wren-html", code);
        if self.config.collect_issues {
            self.issues.push(issue);
        }
    }
}

/// Print a DOM tree for debugging, in the `| <tag>` dump format.
pub fn print_tree(tree: &DomTree, id: NodeId) {
    print!("{}", wren_dom::dump::dump_tree(tree, id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::fragment::FragmentContext;

    /// Feed all of `input` at once, then check after every token that once
    /// the `html` element is open it stays at the root of the stack.
    fn assert_html_stays_at_root(mut parser: HTMLParser, input: &str) {
        parser.tokenizer.feed(input);
        parser.tokenizer.close();
        let mut html_opened = false;
        while !parser.stopped {
            let Some(token) = parser.process_next_token() else {
                break;
            };
            if token.is_eof() {
                break;
            }
            html_opened |= !parser.stack.is_empty();
            if html_opened {
                assert!(
                    parser.stack.first().is_some_and(|entry| entry.is_html("html")),
                    "{input:?}: stack root lost after {token:?}"
                );
            }
        }
        assert!(html_opened, "{input:?}: html was never opened");
        assert_eq!(parser.failure, None, "{input:?}");
    }

    #[test]
    fn test_html_stays_at_root_of_documents() {
        let documents = [
            "<b><p>x</b>y</p>",
            "<a><p><a>1</a>2</p>",
            "<b><i><u><s>x</b>y</s></u></i>",
            "<p><b><div><i>x</p>y</div>",
            "</html></body></p><p>after",
            "<html><body></body></html><p>late",
            "<table><tr><td>a<b>b</td>c</b></table>",
            "<table>x<tr>y<td>z</table>",
            "<table><caption><div>c</table><p>after",
            "<table><colgroup><col></colgroup><tbody><tr></tbody></table></table>",
            "<select><option>a<table><td>x</select>",
            "<template><tr><td>x</td></tr></template>",
            "<template><template><col></template></template><p>",
            "<head><template><div></head></template>",
            "<frameset><frame></frameset><noframes>x</noframes>",
            "<frameset><frameset></frameset></frameset></html>x",
            "<body><frameset>",
            "<svg><foreignObject><p>x</svg><math><mi><b>y</math>",
            "<!DOCTYPE html><title>t</title></head><body></html>",
        ];
        for input in documents {
            assert_html_stays_at_root(HTMLParser::new(ParserConfig::default()), input);
        }
    }

    #[test]
    fn test_html_stays_at_root_of_fragments() {
        let fragments = [
            ("div", "<b><p>x</b>y</p></div></html>"),
            ("td", "a</td></tr></table><b>b"),
            ("tr", "<td>x<td>y</tr>"),
            ("template", "<col><tr></template>"),
            ("select", "<option>a</select><b>"),
            ("frameset", "<frame></frameset>"),
        ];
        for (context, input) in fragments {
            let context = FragmentContext::new(context);
            let parser =
                HTMLParser::new_fragment(ParserConfig::default(), &context).expect("valid context");
            assert_html_stays_at_root(parser, input);
        }
    }
}
