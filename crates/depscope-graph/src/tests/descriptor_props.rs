//! Property tests for descriptor parsing.

use proptest::prelude::*;

use crate::descriptor::{Descriptor, parse_descriptor};

fn key() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_-]{0,12}"
}

fn value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.:/-]{0,16}"
}

// Whitespace and `*` that parsing must ignore
fn noise() -> impl Strategy<Value = String> {
    "[ \t\n*]{0,3}"
}

proptest! {
    #[test]
    fn entries_survive_comment_decoration(
        entries in prop::collection::vec((key(), value(), noise()), 0..8),
    ) {
        let mut comment = String::from("*\n");
        let mut expected = Descriptor::new();

        for (key, value, pad) in &entries {
            comment.push_str(&format!(" * @{key}:{pad}{value}{pad}\n"));
            expected.insert(key.clone(), value.clone());
        }

        prop_assert_eq!(parse_descriptor(&comment), expected);
    }

    #[test]
    fn never_panics(comment in ".{0,200}") {
        let _ = parse_descriptor(&comment);
    }

    #[test]
    fn keys_are_never_empty_or_contain_separators(comment in "[@:a-z \n*]{0,60}") {
        for key in parse_descriptor(&comment).keys() {
            prop_assert!(!key.is_empty());
            prop_assert!(!key.contains('@'));
            prop_assert!(!key.contains(':'));
        }
    }
}
