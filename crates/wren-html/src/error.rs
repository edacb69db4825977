//! Parse diagnostics and API errors.
//!
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! "This specification defines the parsing rules for HTML documents, whether
//! they are syntactically correct or not. Certain points in the parsing
//! algorithm are said to be parse errors. The error handling for parse errors
//! is well-defined."
//!
//! Parse errors never stop the parser; they are recorded as [`ParseIssue`]s.
//! Misuse of the API, or a tree builder step that finds its own bookkeeping
//! inconsistent, is a different matter and is reported as [`HtmlError`].

use core::fmt;

use strum_macros::{Display, IntoStaticStr};
use thiserror::Error;

/// Error codes for parse errors.
///
/// The tokenizer codes are the ones the standard names in
/// [§ 13.2.2](https://html.spec.whatwg.org/multipage/parsing.html#parse-error-abrupt-closing-of-empty-comment).
/// Tree construction errors are unnamed in the standard, so they are grouped
/// by the kind of token that was unexpected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ParseErrorCode {
    // =========================================================================
    // Tokenizer
    // =========================================================================
    /// `<!-->` or `<!--->`
    AbruptClosingOfEmptyComment,
    /// `>` inside a DOCTYPE public identifier
    AbruptDoctypePublicIdentifier,
    /// `>` inside a DOCTYPE system identifier
    AbruptDoctypeSystemIdentifier,
    /// `&#` or `&#x` with no digits
    AbsenceOfDigitsInNumericCharacterReference,
    /// `<![CDATA[` outside foreign content
    CdataInHtmlContent,
    /// Numeric reference above U+10FFFF
    CharacterReferenceOutsideUnicodeRange,
    /// Numeric reference to a control character
    ControlCharacterReference,
    /// Attribute name repeated on one tag
    DuplicateAttribute,
    /// End tag carrying attributes
    EndTagWithAttributes,
    /// `</p/>`
    EndTagWithTrailingSolidus,
    /// `<` at end of input
    EofBeforeTagName,
    /// End of input inside a CDATA section
    EofInCdata,
    /// End of input inside a comment
    EofInComment,
    /// End of input inside a DOCTYPE
    EofInDoctype,
    /// End of input inside `<!--` in script data
    EofInScriptHtmlCommentLikeText,
    /// End of input inside a tag
    EofInTag,
    /// `--!>`
    IncorrectlyClosedComment,
    /// `<!` not followed by `--`, DOCTYPE or CDATA
    IncorrectlyOpenedComment,
    /// Junk after the DOCTYPE name
    InvalidCharacterSequenceAfterDoctypeName,
    /// `<` followed by something that cannot start a tag name
    InvalidFirstCharacterOfTagName,
    /// `<a b=>`
    MissingAttributeValue,
    /// `<!DOCTYPE>`
    MissingDoctypeName,
    /// `PUBLIC` with no identifier
    MissingDoctypePublicIdentifier,
    /// `SYSTEM` with no identifier
    MissingDoctypeSystemIdentifier,
    /// `</>`
    MissingEndTagName,
    /// Unquoted DOCTYPE public identifier
    MissingQuoteBeforeDoctypePublicIdentifier,
    /// Unquoted DOCTYPE system identifier
    MissingQuoteBeforeDoctypeSystemIdentifier,
    /// Character reference not terminated by `;`
    MissingSemicolonAfterCharacterReference,
    /// `PUBLIC"`
    MissingWhitespaceAfterDoctypePublicKeyword,
    /// `SYSTEM"`
    MissingWhitespaceAfterDoctypeSystemKeyword,
    /// `<!DOCTYPEhtml>`
    MissingWhitespaceBeforeDoctypeName,
    /// `<a b="c"d>`
    MissingWhitespaceBetweenAttributes,
    /// Public and system identifiers run together
    MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
    /// `<!--` inside a comment
    NestedComment,
    /// Numeric reference to a noncharacter
    NoncharacterCharacterReference,
    /// `&#0;`
    NullCharacterReference,
    /// Numeric reference to a surrogate
    SurrogateCharacterReference,
    /// Junk after the DOCTYPE system identifier
    UnexpectedCharacterAfterDoctypeSystemIdentifier,
    /// `"`, `'` or `<` in an attribute name
    UnexpectedCharacterInAttributeName,
    /// `"`, `'`, `<`, `=` or `` ` `` in an unquoted attribute value
    UnexpectedCharacterInUnquotedAttributeValue,
    /// `<a =b>`
    UnexpectedEqualsSignBeforeAttributeName,
    /// U+0000 in the input
    UnexpectedNullCharacter,
    /// `<?`
    UnexpectedQuestionMarkInsteadOfTagName,
    /// `/` inside a tag not followed by `>`
    UnexpectedSolidusInTag,
    /// `&name;` that is not in the table
    UnknownNamedCharacterReference,

    // =========================================================================
    // Tree construction
    // =========================================================================
    /// DOCTYPE token anywhere but the start of the document
    UnexpectedDoctype,
    /// Start tag not allowed in the current insertion mode
    UnexpectedStartTag,
    /// End tag with no matching open element, or not allowed here
    UnexpectedEndTag,
    /// Non-whitespace text where only whitespace is allowed
    UnexpectedCharacter,
    /// End of input with elements still open that require an end tag
    UnexpectedEofInElement,
    /// End tag that closes a formatting element across other open elements
    MisnestedFormattingElement,
    /// `<span/>`: the self-closing flag on an element that is not void
    NonVoidHtmlElementStartTagWithTrailingSolidus,
}

/// A recorded parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Which error occurred.
    pub code: ParseErrorCode,
    /// Extra context, usually the offending tag name.
    pub detail: Option<String>,
    /// Character offset into the (newline-normalized) input.
    pub offset: usize,
}

impl ParseIssue {
    /// Create an issue with no detail text.
    #[must_use]
    pub const fn new(code: ParseErrorCode, offset: usize) -> Self {
        Self {
            code,
            detail: None,
            offset,
        }
    }

    /// Attach detail text.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.offset, self.code)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

/// Errors in how the parser API was used, and broken tree builder
/// invariants.
///
/// These are distinct from parse errors: malformed markup never produces an
/// `HtmlError`. The `Missing*` and `InvalidBookmark` variants mean a stack or
/// list operation was asked about an entry that is not there; the parse stops
/// when one occurs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HtmlError {
    /// A fragment context was built from a node that is not an element.
    #[error("fragment context node {0} is not an element")]
    ContextNotElement(usize),

    /// A fragment context element is not attached to a document.
    #[error("fragment context element {0} is detached from its document")]
    DetachedContext(usize),

    /// A fragment context tag name that no start tag could have produced.
    #[error("invalid fragment context tag name {0:?}")]
    InvalidContextName(String),

    /// Input was fed to a parser that has already finished or been aborted.
    #[error("parser has already finished")]
    Finished,

    /// A tree builder step referred to an element (by node id) that is not
    /// on the stack of open elements.
    #[error("element {0} is not on the stack of open elements")]
    MissingOpenElement(usize),

    /// A tree builder step referred to an element (by node id) that has no
    /// entry in the list of active formatting elements.
    #[error("element {0} has no entry in the list of active formatting elements")]
    MissingFormattingEntry(usize),

    /// An adoption agency bookmark pointed past the end of the list of
    /// active formatting elements.
    #[error("bookmark {0} is outside the list of active formatting elements")]
    InvalidBookmark(usize),
}
