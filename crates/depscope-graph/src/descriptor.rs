//! Descriptor extraction from a file's documentation comment.
//!
//! A descriptor is a flat key/value mapping written inside one block comment:
//!
//! ```text
//! /**
//!  * @Description: order list page
//!  * @Author: lin
//!  */
//! ```
//!
//! The grammar is deliberately loose. Whitespace and `*` are removed from the
//! whole comment, the remaining text is split into `@`-introduced tokens, and
//! each token is read as `key[:value]`:
//!
//! - text before the first `@` is ignored, as are empty tokens (`@@`)
//! - the key runs up to the first `:`, the value is everything after it
//! - a token without `:` is a flag: the token is the key, the value is empty
//! - a token with an empty key (`@:x`) is dropped
//! - repeated keys keep the last value

use std::collections::BTreeMap;

/// Key/value metadata mined from a file's descriptor comment.
pub type Descriptor = BTreeMap<String, String>;

/// Marker used to pick the descriptor comment when none is configured.
pub const DEFAULT_MARKER: &str = "@Description";

/// Return the first block comment containing `marker`.
pub fn find_marked_comment<'c>(
    block_comments: impl IntoIterator<Item = &'c str>,
    marker: &str,
) -> Option<&'c str> {
    block_comments
        .into_iter()
        .find(|comment| comment.contains(marker))
}

/// Parse descriptor tokens out of a comment's text.
pub fn parse_descriptor(comment: &str) -> Descriptor {
    let compact: String = comment
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '*')
        .collect();

    compact
        .split('@')
        .skip(1)
        .filter(|token| !token.is_empty())
        .filter_map(|token| {
            let (key, value) = token.split_once(':').unwrap_or((token, ""));
            (!key.is_empty()).then(|| (key.to_string(), value.to_string()))
        })
        .collect()
}

/// Extract the descriptor from a file's block comments.
///
/// Files without a marked comment get an empty descriptor.
pub fn extract_descriptor<'c>(
    block_comments: impl IntoIterator<Item = &'c str>,
    marker: &str,
) -> Descriptor {
    find_marked_comment(block_comments, marker)
        .map(parse_descriptor)
        .unwrap_or_default()
}
