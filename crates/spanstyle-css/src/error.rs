//! Stylesheet parsing errors.

use thiserror::Error;

/// Error type for stylesheet parsing failures.
///
/// Parsing is all-or-nothing: a `ParseError` means no styles from the
/// offending call were applied anywhere. Unknown property *names* are not
/// errors (they are skipped for forward compatibility); unparsable values
/// for known properties are.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Malformed rule or declaration syntax.
    #[error("malformed stylesheet near '{context}'")]
    Syntax { context: String },

    /// A known property was given a value that cannot be coerced to its
    /// declared type.
    #[error("invalid value '{value}' for property '{property}'")]
    InvalidValue { property: String, value: String },

    /// A color value that is neither valid hex nor a known color name.
    #[error("invalid color '{value}'")]
    InvalidColor { value: String },

    /// A `var($name)` or `$name` reference to a variable that was never
    /// declared.
    #[error("missing variable '${name}'")]
    MissingVariable { name: String },

    /// `merge_rule` was handed CSS containing more or fewer rules than the
    /// single one it supports.
    #[error("expected exactly one rule, found {found}")]
    SingleRuleExpected { found: usize },
}
