//! The Style Record: typographic properties for one selector.
//!
//! A [`TextStyle`] is a plain cloneable value. Optional properties use
//! `None` for "unset" (distinct from zero); `letter_spacing` and
//! `line_height` use `0.0` for "none", matching their CSS meaning. A
//! negative `line_height` is passed through untouched; some layout hosts
//! use it as an offset convention and the core treats it as opaque.
//!
//! Merging follows the non-overwrite discipline described on
//! [`TextStyle::merge`], including the deliberate asymmetry for the four
//! closed-enum properties.

use crate::color::ColorRgb;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Text decoration line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

/// Case transform applied to rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
    Lowercase,
    Capitalize,
}

/// Overflow handling hint for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextOverflow {
    #[default]
    None,
    Ellipsis,
    Clip,
}

/// Font slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

macro_rules! keyword_enum {
    ($ty:ident { $($variant:ident => $kw:literal),+ $(,)? }) => {
        impl $ty {
            /// Case-insensitive keyword lookup.
            pub fn from_keyword(s: &str) -> Option<Self> {
                match s.to_lowercase().as_str() {
                    $($kw => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// The CSS keyword for this variant.
            pub fn keyword(self) -> &'static str {
                match self {
                    $(Self::$variant => $kw,)+
                }
            }
        }
    };
}

keyword_enum!(TextAlign {
    Left => "left",
    Center => "center",
    Right => "right",
    Justify => "justify",
});

keyword_enum!(TextDecoration {
    None => "none",
    Underline => "underline",
    LineThrough => "line-through",
});

keyword_enum!(TextTransform {
    None => "none",
    Uppercase => "uppercase",
    Lowercase => "lowercase",
    Capitalize => "capitalize",
});

keyword_enum!(TextOverflow {
    None => "none",
    Ellipsis => "ellipsis",
    Clip => "clip",
});

keyword_enum!(FontStyle {
    Normal => "normal",
    Italic => "italic",
});

keyword_enum!(FontWeight {
    Normal => "normal",
    Bold => "bold",
});

/// Padding on the four sides of a styled target.
///
/// `None` means "inherit from the target", not zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub left: Option<f32>,
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
}

impl Padding {
    pub fn is_unset(&self) -> bool {
        self.left.is_none() && self.top.is_none() && self.right.is_none() && self.bottom.is_none()
    }
}

/// Resolved typographic properties for one selector.
///
/// The selector name is fixed at construction and never merged; everything
/// else is a plain value that [`merge`](TextStyle::merge) and
/// [`Clone`] copy field by field (no property is a nested mutable
/// structure, so a shallow copy is a full copy).
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    name: String,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub font_style: FontStyle,
    pub font_weight: FontWeight,
    pub letter_spacing: f32,
    pub line_height: f32,
    pub text_align: TextAlign,
    pub text_decoration: TextDecoration,
    pub text_decoration_color: Option<String>,
    pub text_indent: f32,
    pub text_overflow: TextOverflow,
    pub text_transform: TextTransform,
    pub color: Option<ColorRgb>,
    pub background_color: Option<ColorRgb>,
    pub padding: Padding,
    pub lines: Option<u32>,
}

impl TextStyle {
    /// Creates an empty style for the given selector.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty; a selector name is the record's identity
    /// and must be non-empty.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "selector name must be non-empty");

        Self {
            name,
            font_family: None,
            font_size: None,
            font_style: FontStyle::Normal,
            font_weight: FontWeight::Normal,
            letter_spacing: 0.0,
            line_height: 0.0,
            text_align: TextAlign::Left,
            text_decoration: TextDecoration::None,
            text_decoration_color: None,
            text_indent: 0.0,
            text_overflow: TextOverflow::None,
            text_transform: TextTransform::None,
            color: None,
            background_color: None,
            padding: Padding::default(),
            lines: None,
        }
    }

    /// The selector this record belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A copy of this record under a different selector name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.name = name.into();
        assert!(!copy.name.is_empty(), "selector name must be non-empty");
        copy
    }

    /// The distance between the font size and the line height.
    ///
    /// `None` when the font size is unset. Callers that position text by a
    /// line-height offset use this; the core attaches no meaning to the
    /// sign.
    pub fn line_height_offset(&self) -> Option<f32> {
        self.font_size.map(|size| size - self.line_height)
    }

    /// Merges `source` into `self`.
    ///
    /// Every property with a non-default value on `source` is copied onto
    /// `self`, unless `self` already holds a non-default value for it and
    /// `overwrite_existing` is false.
    ///
    /// Four properties are asymmetric on purpose: a non-default
    /// `text_align`, `text_decoration`, `text_overflow` or `text_transform`
    /// on `source` always wins, even when `overwrite_existing` is false.
    /// Callers rely on a style fragment's enum choices surviving a
    /// fill-in-the-gaps merge.
    ///
    /// The selector name never merges.
    pub fn merge(&mut self, source: &TextStyle, overwrite_existing: bool) {
        fn take_opt<T: Clone>(target: &mut Option<T>, source: &Option<T>, overwrite: bool) {
            if source.is_some() && (target.is_none() || overwrite) {
                target.clone_from(source);
            }
        }

        fn take_f32(target: &mut f32, source: f32, overwrite: bool) {
            if source != 0.0 && (*target == 0.0 || overwrite) {
                *target = source;
            }
        }

        take_opt(&mut self.font_family, &source.font_family, overwrite_existing);
        take_opt(&mut self.font_size, &source.font_size, overwrite_existing);
        take_f32(&mut self.letter_spacing, source.letter_spacing, overwrite_existing);
        take_f32(&mut self.line_height, source.line_height, overwrite_existing);
        take_f32(&mut self.text_indent, source.text_indent, overwrite_existing);
        take_opt(
            &mut self.text_decoration_color,
            &source.text_decoration_color,
            overwrite_existing,
        );
        take_opt(&mut self.color, &source.color, overwrite_existing);
        take_opt(
            &mut self.background_color,
            &source.background_color,
            overwrite_existing,
        );
        take_opt(&mut self.lines, &source.lines, overwrite_existing);

        take_opt(&mut self.padding.left, &source.padding.left, overwrite_existing);
        take_opt(&mut self.padding.top, &source.padding.top, overwrite_existing);
        take_opt(&mut self.padding.right, &source.padding.right, overwrite_existing);
        take_opt(&mut self.padding.bottom, &source.padding.bottom, overwrite_existing);

        if source.font_style != FontStyle::Normal
            && (self.font_style == FontStyle::Normal || overwrite_existing)
        {
            self.font_style = source.font_style;
        }
        if source.font_weight != FontWeight::Normal
            && (self.font_weight == FontWeight::Normal || overwrite_existing)
        {
            self.font_weight = source.font_weight;
        }

        // Asymmetric enums: a non-default source value forces the overwrite.
        if source.text_align != TextAlign::Left {
            self.text_align = source.text_align;
        }
        if source.text_decoration != TextDecoration::None {
            self.text_decoration = source.text_decoration;
        }
        if source.text_overflow != TextOverflow::None {
            self.text_overflow = source.text_overflow;
        }
        if source.text_transform != TextTransform::None {
            self.text_transform = source.text_transform;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(name: &str) -> TextStyle {
        TextStyle::new(name)
    }

    #[test]
    #[should_panic(expected = "non-empty")]
    fn test_empty_name_rejected() {
        TextStyle::new("");
    }

    #[test]
    fn test_new_is_all_defaults() {
        let s = style("body");
        assert_eq!(s.name(), "body");
        assert_eq!(s.font_size, None);
        assert_eq!(s.text_align, TextAlign::Left);
        assert_eq!(s.letter_spacing, 0.0);
        assert!(s.padding.is_unset());
    }

    #[test]
    fn test_renamed_keeps_properties() {
        let mut s = style("h1");
        s.font_size = Some(24.0);
        let r = s.renamed("h2");
        assert_eq!(r.name(), "h2");
        assert_eq!(r.font_size, Some(24.0));
    }

    #[test]
    fn test_keyword_lookup_case_insensitive() {
        assert_eq!(TextAlign::from_keyword("CENTER"), Some(TextAlign::Center));
        assert_eq!(
            TextDecoration::from_keyword("Line-Through"),
            Some(TextDecoration::LineThrough)
        );
        assert_eq!(FontWeight::from_keyword("bold"), Some(FontWeight::Bold));
        assert_eq!(TextTransform::from_keyword("wavy"), None);
    }

    #[test]
    fn test_line_height_offset() {
        let mut s = style("p");
        assert_eq!(s.line_height_offset(), None);
        s.font_size = Some(18.0);
        s.line_height = 22.0;
        assert_eq!(s.line_height_offset(), Some(-4.0));
    }

    // =========================================================================
    // Merge semantics
    // =========================================================================

    #[test]
    fn test_merge_fills_unset_properties() {
        let mut target = style("a");
        let mut source = style("b");
        source.font_size = Some(12.0);
        source.letter_spacing = 1.5;

        target.merge(&source, false);

        assert_eq!(target.font_size, Some(12.0));
        assert_eq!(target.letter_spacing, 1.5);
        assert_eq!(target.name(), "a"); // name never merges
    }

    #[test]
    fn test_merge_non_overwrite_keeps_existing_scalars() {
        let mut target = style("a");
        target.font_size = Some(20.0);
        target.font_family = Some("Archer".to_string());

        let mut source = style("b");
        source.font_size = Some(12.0);
        source.font_family = Some("Avenir".to_string());

        target.merge(&source, false);

        assert_eq!(target.font_size, Some(20.0));
        assert_eq!(target.font_family.as_deref(), Some("Archer"));
    }

    #[test]
    fn test_merge_overwrite_replaces_existing_scalars() {
        let mut target = style("a");
        target.font_size = Some(20.0);

        let mut source = style("b");
        source.font_size = Some(12.0);

        target.merge(&source, true);

        assert_eq!(target.font_size, Some(12.0));
    }

    #[test]
    fn test_merge_enum_asymmetry_wins_without_overwrite() {
        let mut target = style("a");
        target.text_align = TextAlign::Right;
        target.text_transform = TextTransform::Lowercase;

        let mut source = style("b");
        source.text_align = TextAlign::Center;
        source.text_transform = TextTransform::Uppercase;

        target.merge(&source, false);

        // Source's non-default enums overwrite even in non-overwrite mode.
        assert_eq!(target.text_align, TextAlign::Center);
        assert_eq!(target.text_transform, TextTransform::Uppercase);
    }

    #[test]
    fn test_merge_default_enum_on_source_leaves_target() {
        let mut target = style("a");
        target.text_decoration = TextDecoration::Underline;

        let source = style("b");
        target.merge(&source, false);

        assert_eq!(target.text_decoration, TextDecoration::Underline);
    }

    #[test]
    fn test_merge_font_weight_is_symmetric() {
        let mut target = style("a");
        target.font_weight = FontWeight::Bold;

        let mut source = style("b");
        source.font_weight = FontWeight::Normal;

        // Normal is the default, so nothing to merge; Bold stays.
        target.merge(&source, true);
        assert_eq!(target.font_weight, FontWeight::Bold);
    }

    #[test]
    fn test_merge_padding_per_side() {
        let mut target = style("a");
        target.padding.left = Some(4.0);

        let mut source = style("b");
        source.padding.left = Some(8.0);
        source.padding.top = Some(2.0);

        target.merge(&source, false);

        assert_eq!(target.padding.left, Some(4.0));
        assert_eq!(target.padding.top, Some(2.0));
    }

    #[test]
    fn test_merge_idempotent_under_overwrite() {
        let mut a = style("a");
        a.font_size = Some(20.0);
        a.text_align = TextAlign::Right;

        let mut b = style("b");
        b.font_size = Some(12.0);
        b.color = Some(crate::ColorRgb::new(1, 2, 3));

        let mut once = a.clone();
        once.merge(&b, true);

        let mut twice = once.clone();
        twice.merge(&b, true);

        assert_eq!(once, twice);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_style(name: &'static str) -> impl Strategy<Value = TextStyle> {
        (
            proptest::option::of(1.0f32..100.0),
            proptest::option::of("[A-Za-z]{1,12}"),
            0..4usize,
            0..4usize,
            proptest::option::of(0u8..=255),
        )
            .prop_map(move |(size, family, align, transform, red)| {
                let mut s = TextStyle::new(name);
                s.font_size = size;
                s.font_family = family;
                s.text_align = [
                    TextAlign::Left,
                    TextAlign::Center,
                    TextAlign::Right,
                    TextAlign::Justify,
                ][align];
                s.text_transform = [
                    TextTransform::None,
                    TextTransform::Uppercase,
                    TextTransform::Lowercase,
                    TextTransform::Capitalize,
                ][transform];
                s.color = red.map(|r| ColorRgb::new(r, 0, 0));
                s
            })
    }

    proptest! {
        #[test]
        fn merge_overwrite_is_idempotent(a in arb_style("a"), b in arb_style("b")) {
            let mut once = a.clone();
            once.merge(&b, true);

            let mut twice = once.clone();
            twice.merge(&b, true);

            prop_assert_eq!(once, twice);
        }

        #[test]
        fn merge_never_touches_name(a in arb_style("a"), b in arb_style("b")) {
            let mut merged = a.clone();
            merged.merge(&b, true);
            prop_assert_eq!(merged.name(), "a");
        }

        #[test]
        fn merge_non_overwrite_keeps_set_scalars(a in arb_style("a"), b in arb_style("b")) {
            let mut merged = a.clone();
            merged.merge(&b, false);

            if a.font_size.is_some() {
                prop_assert_eq!(merged.font_size, a.font_size);
            }
            if a.font_family.is_some() {
                prop_assert_eq!(merged.font_family, a.font_family);
            }
        }

        #[test]
        fn merge_enum_asymmetry(a in arb_style("a"), b in arb_style("b")) {
            let mut merged = a.clone();
            merged.merge(&b, false);

            let expected = if b.text_transform != TextTransform::None {
                b.text_transform
            } else {
                a.text_transform
            };
            prop_assert_eq!(merged.text_transform, expected);
        }
    }
}
