//! Parser warnings with process-wide de-duplication.
//!
//! The tokenizer and tree builder report every parse error at `debug` level,
//! but a document full of the same mistake would flood a `warn` subscriber.
//! [`warn_once`] lets each unique `(component, message)` pair through a single
//! time per process.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Emit a warning once per unique `component`/`message` pair.
///
/// Returns `true` if this call emitted the warning, `false` if the same
/// message had already been reported.
///
/// # Example
/// ```
/// use wren_common::warning::warn_once;
///
/// let first = warn_once("HTML Tokenizer", "doc-example: eof-in-tag");
/// let second = warn_once("HTML Tokenizer", "doc-example: eof-in-tag");
/// assert!(first);
/// assert!(!second);
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        tracing::warn!(component, "{message}");
    }
    should_emit
}

/// Clear all recorded warnings so they can be reported again.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_deduplicates_per_component() {
        assert!(warn_once("unit-a", "duplicate message"));
        assert!(!warn_once("unit-a", "duplicate message"));
        assert!(warn_once("unit-b", "duplicate message"));
    }
}
