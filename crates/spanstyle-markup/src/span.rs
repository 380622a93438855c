//! Output model: plain text plus attributed ranges.

use spanstyle_css::{ColorRgb, TextStyle};

/// Placeholder character inserted where an `<img>` appeared.
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// Relative size scale per heading level (`h1` through `h6`).
/// Headings render bold at this scale.
pub const HEADER_SIZES: [f32; 6] = [1.5, 1.4, 1.3, 1.2, 1.1, 1.0];

/// One attribute attached to a range of text.
#[derive(Debug, Clone, PartialEq)]
pub enum SpanAttribute {
    Bold,
    Italic,
    Underline,
    Superscript,
    Subscript,
    Monospace,
    /// Font size multiplier (`big` is 1.25, `small` is 0.8).
    RelativeSize(f32),
    Foreground(ColorRgb),
    FontFace(String),
    /// Hyperlink target.
    Link(String),
    /// Resolved image source; the range covers one
    /// [`OBJECT_REPLACEMENT`] character.
    Image(String),
    Paragraph,
    Quote,
    /// Heading level 1 through 6; scale per [`HEADER_SIZES`].
    Heading(u8),
    /// A custom-tag range carrying its full resolved style record.
    Styled(Box<TextStyle>),
}

/// An attributed range. `start..end` are byte offsets into the owning
/// [`StyledString`]'s text, always on character boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledRun {
    pub start: usize,
    pub end: usize,
    pub attr: SpanAttribute,
}

/// Plain text with attributed ranges, ordered by resolution time (the
/// innermost of two nested tags closes first and so comes first).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyledString {
    pub text: String,
    pub runs: Vec<StyledRun>,
}

impl StyledString {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Runs whose range contains the byte offset `pos`.
    pub fn runs_at(&self, pos: usize) -> impl Iterator<Item = &StyledRun> {
        self.runs.iter().filter(move |r| r.start <= pos && pos < r.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_at() {
        let s = StyledString {
            text: "hello world".to_string(),
            runs: vec![
                StyledRun {
                    start: 0,
                    end: 5,
                    attr: SpanAttribute::Bold,
                },
                StyledRun {
                    start: 6,
                    end: 11,
                    attr: SpanAttribute::Italic,
                },
            ],
        };

        let at_start: Vec<_> = s.runs_at(0).collect();
        assert_eq!(at_start.len(), 1);
        assert_eq!(at_start[0].attr, SpanAttribute::Bold);

        // end is exclusive
        assert_eq!(s.runs_at(5).count(), 0);
        assert_eq!(s.runs_at(6).count(), 1);
    }
}
