//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! "The output of the tokenization step is a series of zero or more of the
//! following tokens: DOCTYPE, start tag, end tag, comment, character,
//! end-of-file."
//!
//! [`Token`] is what leaves the tokenizer. While a tag, comment or DOCTYPE is
//! still being read, the state machine holds a [`TokenBuilder`] instead and
//! only turns it into a `Token` when it is emitted.

/// A name/value pair on a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name.
    pub name: String,
    /// Value with character references decoded.
    pub value: String,
}

impl Attribute {
    /// Create an attribute.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// A token handed to the tree builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// "DOCTYPE tokens have a name, a public identifier, a system identifier,
    /// and a force-quirks flag."
    ///
    /// `None` is "missing", which the quirks rules tell apart from empty.
    Doctype {
        /// The lowercased name.
        name: Option<String>,
        /// The public identifier.
        public_identifier: Option<String>,
        /// The system identifier.
        system_identifier: Option<String>,
        /// Set by malformed DOCTYPEs.
        force_quirks: bool,
    },

    /// A start tag. Attribute names are unique; the first occurrence wins.
    StartTag {
        /// The lowercased tag name.
        name: String,
        /// `<br/>`
        self_closing: bool,
        /// In source order.
        attributes: Vec<Attribute>,
    },

    /// An end tag. Attributes and a trailing solidus are parse errors and
    /// never reach the tree builder.
    EndTag {
        /// The lowercased tag name.
        name: String,
    },

    /// "Comment and character tokens have data."
    Comment {
        /// Everything between the delimiters.
        data: String,
    },

    /// One code point; a run of text is a run of tokens.
    Character {
        /// The character.
        data: char,
    },

    /// No more input.
    EndOfFile,
}

impl Token {
    /// A character token.
    #[must_use]
    pub const fn new_character(c: char) -> Self {
        Self::Character { data: c }
    }

    /// True for [`Token::EndOfFile`].
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfFile)
    }

    /// The tag name of a start or end tag token.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name } => Some(name),
            _ => None,
        }
    }

    /// True for a start tag token with the given name.
    #[must_use]
    pub fn is_start_tag(&self, tag: &str) -> bool {
        matches!(self, Self::StartTag { name, .. } if name == tag)
    }

    /// True for an end tag token with the given name.
    #[must_use]
    pub fn is_end_tag(&self, tag: &str) -> bool {
        matches!(self, Self::EndTag { name } if name == tag)
    }

    /// Value of the named attribute on a start tag.
    #[must_use]
    pub fn attribute(&self, attr_name: &str) -> Option<&str> {
        match self {
            Self::StartTag { attributes, .. } => attributes
                .iter()
                .find(|a| a.name == attr_name)
                .map(|a| a.value.as_str()),
            _ => None,
        }
    }
}

/// The token the state machine is in the middle of reading.
///
/// "Create a new start tag token", "create a comment token" and "create a new
/// DOCTYPE token" each start one of these. Every state only ever touches one
/// kind, so the tokenizer's append helpers act on the kind they expect and
/// leave any other alone.
#[derive(Debug)]
pub(super) enum TokenBuilder {
    Tag(TagBuilder),
    Comment(String),
    Doctype(DoctypeBuilder),
}

impl TokenBuilder {
    /// An empty start tag.
    pub(super) fn start_tag() -> Self {
        Self::Tag(TagBuilder::default())
    }

    /// An empty end tag.
    pub(super) fn end_tag() -> Self {
        Self::Tag(TagBuilder {
            is_end: true,
            ..TagBuilder::default()
        })
    }

    /// A comment whose data starts as `data`.
    pub(super) fn comment(data: &str) -> Self {
        Self::Comment(data.to_string())
    }

    /// "When a DOCTYPE token is created, its name, public identifier, and
    /// system identifier must be marked as missing, and the force-quirks flag
    /// must be set to off."
    pub(super) fn doctype() -> Self {
        Self::Doctype(DoctypeBuilder::default())
    }

    /// Turn the builder into the token it describes. End tag attributes are
    /// dropped here; the caller reports them.
    pub(super) fn build(self) -> Token {
        match self {
            Self::Tag(tag) if tag.is_end => Token::EndTag { name: tag.name },
            Self::Tag(tag) => Token::StartTag {
                name: tag.name,
                self_closing: tag.self_closing,
                attributes: tag.attributes,
            },
            Self::Comment(data) => Token::Comment { data },
            Self::Doctype(doctype) => Token::Doctype {
                name: doctype.name,
                public_identifier: doctype.public_identifier,
                system_identifier: doctype.system_identifier,
                force_quirks: doctype.force_quirks,
            },
        }
    }
}

/// A start or end tag being read.
#[derive(Debug, Default)]
pub(super) struct TagBuilder {
    pub(super) is_end: bool,
    pub(super) name: String,
    pub(super) self_closing: bool,
    pub(super) attributes: Vec<Attribute>,
}

impl TagBuilder {
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "if there is already an attribute on the token with the exact same
    /// name, then this is a duplicate-attribute parse error"
    pub(super) fn current_attribute_is_duplicate(&self) -> bool {
        let Some((current, earlier)) = self.attributes.split_last() else {
            return false;
        };
        earlier.iter().any(|attr| attr.name == current.name)
    }
}

/// A DOCTYPE being read.
#[derive(Debug, Default)]
pub(super) struct DoctypeBuilder {
    pub(super) name: Option<String>,
    pub(super) public_identifier: Option<String>,
    pub(super) system_identifier: Option<String>,
    pub(super) force_quirks: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_tag_builder_drops_attributes() {
        let mut builder = TokenBuilder::end_tag();
        if let TokenBuilder::Tag(tag) = &mut builder {
            tag.name.push_str("p");
            tag.attributes.push(Attribute::new("class".into(), "x".into()));
        }
        assert_eq!(builder.build(), Token::EndTag { name: "p".into() });
    }

    #[test]
    fn test_duplicate_is_checked_against_earlier_attributes_only() {
        let mut tag = TagBuilder::default();
        assert!(!tag.current_attribute_is_duplicate());
        tag.attributes.push(Attribute::new("a".into(), String::new()));
        assert!(!tag.current_attribute_is_duplicate());
        tag.attributes.push(Attribute::new("b".into(), String::new()));
        assert!(!tag.current_attribute_is_duplicate());
        tag.attributes.push(Attribute::new("a".into(), "late".into()));
        assert!(tag.current_attribute_is_duplicate());
    }

    #[test]
    fn test_fresh_doctype_is_all_missing() {
        assert_eq!(
            TokenBuilder::doctype().build(),
            Token::Doctype {
                name: None,
                public_identifier: None,
                system_identifier: None,
                force_quirks: false,
            }
        );
    }
}
