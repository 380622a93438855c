//! Call-scoped custom tag overrides.

/// Maps a markup tag to a style for one conversion or one inline
/// stylesheet. `name` borrows an existing registry record; `css` layers
/// a one-rule fragment on top (or stands alone for a brand-new tag).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CssTag {
    pub tag: String,
    pub name: Option<String>,
    pub css: Option<String>,
}

impl CssTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            name: None,
            css: None,
        }
    }

    /// Borrow the registry record registered under `name`.
    pub fn styled_as(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Layer a one-rule CSS fragment over the base record.
    pub fn with_css(mut self, css: impl Into<String>) -> Self {
        self.css = Some(css.into());
        self
    }
}
