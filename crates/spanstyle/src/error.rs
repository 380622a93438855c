use thiserror::Error;

use spanstyle_css::ParseError;
use spanstyle_markup::ConvertError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// A registry with this id is already live in the pool.
    #[error("a registry with id '{id}' already exists")]
    DuplicateInstance { id: String },

    /// A tag override referenced a selector the registry does not hold.
    #[error("no style record for selector '{selector}'")]
    UnknownSelector { selector: String },

    /// Stylesheet file could not be read.
    #[error("failed to load stylesheet: {message}")]
    Load { message: String },
}
