use thiserror::Error;

/// Errors from markup conversion. No partial output accompanies any of
/// these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// The style map has no entry for the default selector.
    #[error("no style record for default selector '{selector}'")]
    DefaultStyleNotFound { selector: String },

    /// The markup contains an `<img>` but no resolver was configured.
    #[error("image tag found but no image resolver is configured")]
    MissingImageResolver,

    /// The configured resolver returned nothing for an image source.
    #[error("image source '{src}' could not be resolved")]
    UnresolvedImage { src: String },

    /// The reader could not make sense of the input at all.
    #[error("unreadable markup: {message}")]
    Markup { message: String },
}
