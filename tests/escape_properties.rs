use proptest::prelude::*;
use sudb::wire::xml::escape;

const ENTITIES: [&str; 5] = ["&amp;", "&quot;", "&lt;", "&gt;", "&apos;"];

/// Reference inverse of the escaping: substitutions undone in reverse
/// order, the ampersand last.
fn unescape(text: &str) -> String {
    text.replace("&apos;", "'")
        .replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

proptest! {
    #[test]
    fn escape_round_trips(text in "\\PC*") {
        prop_assert_eq!(unescape(&escape(&text)), text);
    }

    #[test]
    fn escaped_text_is_attribute_safe(text in "\\PC*") {
        let escaped = escape(&text);
        prop_assert!(!escaped.contains('"'));
        prop_assert!(!escaped.contains('<'));
        prop_assert!(!escaped.contains('>'));
        prop_assert!(!escaped.contains('\''));
        for (idx, _) in escaped.match_indices('&') {
            prop_assert!(
                ENTITIES.iter().any(|e| escaped[idx..].starts_with(e)),
                "bare ampersand at {} in {:?}",
                idx,
                escaped
            );
        }
    }
}
