//! HTML parser module for tree construction.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)

mod active_formatting;
mod adoption_agency;
mod core;
mod fragment;
mod insertion;
mod modes;
mod open_elements;

/// SVG and MathML handling per § 13.2.6.5.
pub mod foreign_content;
/// DOCTYPE classification per § 13.2.6.4.1.
pub mod quirks;

pub use self::core::{print_tree, AbortHandle, HTMLParser, InsertionMode, ParseOutput};
pub use active_formatting::{ActiveFormattingElements, FormattingEntry};
pub use fragment::FragmentContext;
pub use open_elements::{Scope, StackEntry, StackOfOpenElements};
