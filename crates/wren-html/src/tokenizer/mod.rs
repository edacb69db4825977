//! HTML tokenizer module.
//!
//! Implements [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard.

/// Character reference states per § 13.2.5.72 to § 13.2.5.80.
pub mod character_reference;
mod entities;
/// Helper methods for tokenizer state transitions.
pub mod helpers;
/// Comment, DOCTYPE and CDATA states.
pub mod markup_declarations;
/// Named character reference lookup table per § 13.5.
pub mod named_character_references;
/// HTML tokenizer state machine implementation.
pub mod state_machine;
/// Token types produced by the tokenizer.
pub mod token;

pub use state_machine::{HTMLTokenizer, TokenizerState};
pub use token::{Attribute, Token};
