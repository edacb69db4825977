//! Parser configuration.

/// Options that change how a document is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// [§ 13.2.6 The scripting flag](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    ///
    /// "The scripting flag is set to "enabled" if scripting was enabled for the
    /// Document with which the parser is associated when the parser was
    /// created, and "disabled" otherwise."
    ///
    /// Nothing is ever executed; the flag only decides whether `noscript`
    /// content is raw text or markup.
    pub scripting: bool,

    /// Record parse errors in the output. They are logged either way.
    pub collect_issues: bool,

    /// [§ 13.2.6.4.1](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    ///
    /// "If the document is not an iframe srcdoc document..." A srcdoc document
    /// never enters quirks mode because of a missing DOCTYPE.
    pub iframe_srcdoc: bool,
}

impl ParserConfig {
    /// Set the scripting flag.
    #[must_use]
    pub const fn with_scripting(mut self, scripting: bool) -> Self {
        self.scripting = scripting;
        self
    }

    /// Turn parse-error collection on or off.
    #[must_use]
    pub const fn with_collect_issues(mut self, collect: bool) -> Self {
        self.collect_issues = collect;
        self
    }

    /// Mark the document as an iframe srcdoc document.
    #[must_use]
    pub const fn with_iframe_srcdoc(mut self, srcdoc: bool) -> Self {
        self.iframe_srcdoc = srcdoc;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            scripting: false,
            collect_issues: true,
            iframe_srcdoc: false,
        }
    }
}
