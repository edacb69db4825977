//! Integration tests for named character reference lookup.

use wren_html::tokenizer::named_character_references::{
    any_entity_has_prefix, longest_match, lookup_entity,
};

#[test]
fn test_lookup_common_entities() {
    assert_eq!(lookup_entity("amp;"), Some("&"));
    assert_eq!(lookup_entity("lt;"), Some("<"));
    assert_eq!(lookup_entity("gt;"), Some(">"));
    assert_eq!(lookup_entity("quot;"), Some("\""));
    assert_eq!(lookup_entity("nbsp;"), Some("\u{00A0}"));
}

#[test]
fn test_lookup_legacy_entities() {
    // Legacy entities without semicolon
    assert_eq!(lookup_entity("amp"), Some("&"));
    assert_eq!(lookup_entity("lt"), Some("<"));
    assert_eq!(lookup_entity("not"), Some("\u{AC}"));
    // Only a fixed set of names has a legacy form
    assert_eq!(lookup_entity("notin"), None);
}

#[test]
fn test_lookup_multi_code_point_entities() {
    assert_eq!(lookup_entity("fjlig;"), Some("fj"));
    assert_eq!(lookup_entity("NotEqualTilde;"), Some("\u{2242}\u{338}"));
}

#[test]
fn test_lookup_unknown_entity() {
    assert_eq!(lookup_entity("notarealentity;"), None);
    assert_eq!(lookup_entity(""), None);
}

#[test]
fn test_prefix_matching() {
    assert!(any_entity_has_prefix("a")); // amp, apos, alpha, etc.
    assert!(any_entity_has_prefix("am")); // amp
    assert!(any_entity_has_prefix("amp")); // amp, amp;
    assert!(any_entity_has_prefix("amp;")); // amp;
    assert!(!any_entity_has_prefix("ampx")); // nothing
    assert!(!any_entity_has_prefix("xyz")); // nothing
}

#[test]
fn test_longest_match_is_greedy() {
    assert_eq!(longest_match("notin;"), Some((6, "\u{2209}")));
    assert_eq!(longest_match("not;in;"), Some((4, "\u{AC}")));
    assert_eq!(longest_match("amp"), Some((3, "&")));
    assert_eq!(longest_match("ampersand"), Some((3, "&")));
    assert_eq!(longest_match("zzz"), None);
}
