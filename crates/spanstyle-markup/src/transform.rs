//! Case transforms over text fragments.

use std::borrow::Cow;

use spanstyle_css::TextTransform;

/// Applies `transform` to `text`. Pure and stateless; safe to call on any
/// sub-range of a larger string.
///
/// Note that Unicode case mapping can change the length of the result
/// (`ß` uppercases to `SS`), so callers tracking offsets must recompute
/// them from the returned value.
pub fn apply(transform: TextTransform, text: &str) -> Cow<'_, str> {
    match transform {
        TextTransform::None => Cow::Borrowed(text),
        TextTransform::Uppercase => Cow::Owned(text.to_uppercase()),
        TextTransform::Lowercase => Cow::Owned(text.to_lowercase()),
        TextTransform::Capitalize => Cow::Owned(capitalize(text)),
    }
}

/// Title case over the lowercased input: the first letter of each
/// whitespace-delimited word is uppercased, the rest lowercased.
fn capitalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_none_borrows() {
        assert!(matches!(apply(TextTransform::None, "Text"), Cow::Borrowed("Text")));
    }

    #[test]
    fn test_uppercase() {
        assert_eq!(apply(TextTransform::Uppercase, "straße"), "STRASSE");
    }

    #[test]
    fn test_lowercase() {
        assert_eq!(apply(TextTransform::Lowercase, "HeLLo"), "hello");
    }

    #[test]
    fn test_capitalize_title_cases_each_word() {
        assert_eq!(
            apply(TextTransform::Capitalize, "hello WORLD again"),
            "Hello World Again"
        );
    }

    #[test]
    fn test_capitalize_preserves_whitespace() {
        assert_eq!(apply(TextTransform::Capitalize, "a  b\nc"), "A  B\nC");
    }

    proptest! {
        #[test]
        fn apply_is_idempotent_for_upper_and_lower(s in "\\PC*") {
            let upper = apply(TextTransform::Uppercase, &s).into_owned();
            let upper_again = apply(TextTransform::Uppercase, &upper);
            prop_assert_eq!(upper_again.as_ref(), upper.as_str());

            let lower = apply(TextTransform::Lowercase, &s).into_owned();
            let lower_again = apply(TextTransform::Lowercase, &lower);
            prop_assert_eq!(lower_again.as_ref(), lower.as_str());
        }

        #[test]
        fn none_is_identity(s in "\\PC*") {
            let result = apply(TextTransform::None, &s);
            prop_assert_eq!(result.as_ref(), s.as_str());
        }
    }
}
