//! HTML-like markup to styled ranges.
//!
//! The converter walks tag soup with `quick-xml` in a tolerant
//! configuration (mismatched and unclosed tags are fine) and produces a
//! [`StyledString`]: collapsed plain text plus attributed ranges.
//!
//! Built-in tags cover the usual inline set (`b`, `i`, `u`, `sup`,
//! `sub`, `tt`, `big`, `small`, `font`, `a`, `img`) and the structural
//! set (`p`, `div`, `blockquote`, `br`, `h1`-`h6`). Any tag whose name
//! matches a selector in the style map (other than the default selector)
//! becomes a custom styled range carrying the full style record.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use spanstyle_css::TextStyle;
//! use spanstyle_markup::{MarkupConverter, SpanAttribute};
//!
//! let mut styles = HashMap::new();
//! styles.insert("body".to_string(), TextStyle::new("body"));
//!
//! let converter = MarkupConverter::new(&styles, "body");
//! let styled = converter.convert("<b>hello</b> world").unwrap();
//!
//! assert_eq!(styled.text, "hello world");
//! assert_eq!(styled.runs[0].start, 0);
//! assert_eq!(styled.runs[0].end, 5);
//! assert_eq!(styled.runs[0].attr, SpanAttribute::Bold);
//! ```

use std::collections::HashMap;
use std::mem;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use spanstyle_css::{ColorRgb, TextStyle, TextTransform};

use crate::error::ConvertError;
use crate::span::{SpanAttribute, StyledRun, StyledString, OBJECT_REPLACEMENT};
use crate::transform;

/// Resolves `<img src>` values to whatever identifier the renderer needs
/// (a path, a cache key, a data URI).
pub trait ImageResolver {
    fn resolve(&self, src: &str) -> Option<String>;
}

/// Looks up named colors referenced as `<font color="@name">`.
pub trait PaletteResolver {
    fn color(&self, name: &str) -> Option<ColorRgb>;
}

/// Open-tag bookkeeping. Custom tags all share one variant so a close of
/// any custom tag resolves the most recent custom marker.
#[derive(Debug, Clone, PartialEq)]
enum Marker {
    Bold,
    Italic,
    Underline,
    Superscript,
    Subscript,
    Monospace,
    Big,
    Small,
    Paragraph,
    Quote,
    Heading(u8),
    Font {
        color: Option<String>,
        face: Option<String>,
    },
    Anchor {
        href: Option<String>,
    },
    Styled {
        selector: String,
    },
}

#[derive(Debug)]
struct OpenMark {
    marker: Marker,
    start: usize,
}

/// Converts markup to a [`StyledString`] against a selector→style map.
pub struct MarkupConverter<'a> {
    styles: &'a HashMap<String, TextStyle>,
    default_selector: &'a str,
    images: Option<&'a dyn ImageResolver>,
    palette: Option<&'a dyn PaletteResolver>,
}

impl<'a> MarkupConverter<'a> {
    pub fn new(styles: &'a HashMap<String, TextStyle>, default_selector: &'a str) -> Self {
        Self {
            styles,
            default_selector,
            images: None,
            palette: None,
        }
    }

    pub fn with_images(mut self, resolver: &'a dyn ImageResolver) -> Self {
        self.images = Some(resolver);
        self
    }

    pub fn with_palette(mut self, palette: &'a dyn PaletteResolver) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn convert(&self, source: &str) -> Result<StyledString, ConvertError> {
        let default_style =
            self.styles
                .get(self.default_selector)
                .ok_or_else(|| ConvertError::DefaultStyleNotFound {
                    selector: self.default_selector.to_string(),
                })?;
        let default_transform = default_style.text_transform;

        let mut reader = Reader::from_str(source);
        let config = reader.config_mut();
        config.expand_empty_elements = true;
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        let mut out = StyledString::default();
        let mut stack: Vec<OpenMark> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(tag)) => self.open_tag(&tag, &mut out, &mut stack)?,
                Ok(Event::End(tag)) => {
                    let name = String::from_utf8_lossy(tag.name().as_ref()).to_lowercase();
                    self.close_tag(&name, &mut out, &mut stack);
                }
                Ok(Event::Text(text)) => {
                    let chunk = match text.unescape() {
                        Ok(t) => t.into_owned(),
                        // Tag soup: treat a bad entity as literal text.
                        Err(_) => String::from_utf8_lossy(&text).into_owned(),
                    };
                    append_text(&mut out, &chunk);
                }
                Ok(Event::CData(data)) => {
                    append_text(&mut out, &String::from_utf8_lossy(&data));
                }
                Ok(Event::Eof) => break,
                Ok(_) => {} // comments, declarations, processing instructions
                Err(e) => {
                    return Err(ConvertError::Markup {
                        message: e.to_string(),
                    })
                }
            }
        }

        // Tags still open behave as if closed at end of input.
        while let Some(mark) = stack.pop() {
            self.close_marker(&mut out, &mut stack, mark);
        }

        fix_paragraph_runs(&mut out);

        if default_transform != TextTransform::None {
            apply_default_transform(&mut out, default_transform);
        }

        Ok(out)
    }

    fn open_tag(
        &self,
        tag: &BytesStart,
        out: &mut StyledString,
        stack: &mut Vec<OpenMark>,
    ) -> Result<(), ConvertError> {
        let name = String::from_utf8_lossy(tag.name().as_ref()).to_lowercase();

        // Registered selectors take priority over the built-in tag set.
        if name != self.default_selector && self.styles.contains_key(&name) {
            stack.push(OpenMark {
                marker: Marker::Styled { selector: name },
                start: out.text.len(),
            });
            return Ok(());
        }

        if let Some(level) = heading_level(&name) {
            paragraph_break(out);
            stack.push(OpenMark {
                marker: Marker::Heading(level),
                start: out.text.len(),
            });
            return Ok(());
        }

        let marker = match name.as_str() {
            "br" => {
                out.text.push('\n');
                return Ok(());
            }
            "p" | "div" => {
                paragraph_break(out);
                Marker::Paragraph
            }
            "blockquote" => {
                paragraph_break(out);
                Marker::Quote
            }
            "b" | "strong" => Marker::Bold,
            "i" | "em" | "cite" | "dfn" => Marker::Italic,
            "u" => Marker::Underline,
            "tt" => Marker::Monospace,
            "sup" => Marker::Superscript,
            "sub" => Marker::Subscript,
            "big" => Marker::Big,
            "small" => Marker::Small,
            "font" => Marker::Font {
                color: attr_value(tag, b"color"),
                face: attr_value(tag, b"face"),
            },
            "a" => Marker::Anchor {
                href: attr_value(tag, b"href"),
            },
            "img" => {
                let src = attr_value(tag, b"src").unwrap_or_default();
                let resolver = self.images.ok_or(ConvertError::MissingImageResolver)?;
                let resolved = resolver
                    .resolve(&src)
                    .ok_or(ConvertError::UnresolvedImage { src })?;
                let start = out.text.len();
                out.text.push(OBJECT_REPLACEMENT);
                out.runs.push(StyledRun {
                    start,
                    end: out.text.len(),
                    attr: SpanAttribute::Image(resolved),
                });
                return Ok(());
            }
            // Unregistered tags are pure containers.
            _ => return Ok(()),
        };

        stack.push(OpenMark {
            marker,
            start: out.text.len(),
        });
        Ok(())
    }

    fn close_tag(&self, name: &str, out: &mut StyledString, stack: &mut Vec<OpenMark>) {
        if name != self.default_selector && self.styles.contains_key(name) {
            // LIFO across custom kinds; the closing tag's style wins.
            let probe = Marker::Styled {
                selector: String::new(),
            };
            if let Some(mut mark) = pop_mark(stack, &probe) {
                mark.marker = Marker::Styled {
                    selector: name.to_string(),
                };
                self.close_marker(out, stack, mark);
            }
            return;
        }

        if let Some(probe) = close_probe(name) {
            // Orphan close tags have no marker to pop and are ignored.
            if let Some(mark) = pop_mark(stack, &probe) {
                self.close_marker(out, stack, mark);
            }
        }
    }

    /// Resolves one popped marker into runs. `stack` holds the still-open
    /// markers, whose starts must survive any length-changing transform.
    fn close_marker(&self, out: &mut StyledString, stack: &mut Vec<OpenMark>, mark: OpenMark) {
        let start = mark.start;
        let mut end = out.text.len();

        let attr = match mark.marker {
            Marker::Bold => SpanAttribute::Bold,
            Marker::Italic => SpanAttribute::Italic,
            Marker::Underline => SpanAttribute::Underline,
            Marker::Superscript => SpanAttribute::Superscript,
            Marker::Subscript => SpanAttribute::Subscript,
            Marker::Monospace => SpanAttribute::Monospace,
            Marker::Big => SpanAttribute::RelativeSize(1.25),
            Marker::Small => SpanAttribute::RelativeSize(0.8),
            Marker::Paragraph => {
                paragraph_break(out);
                end = out.text.len();
                SpanAttribute::Paragraph
            }
            Marker::Quote => {
                paragraph_break(out);
                end = out.text.len();
                SpanAttribute::Quote
            }
            Marker::Heading(level) => {
                paragraph_break(out);
                end = out.text.len();
                // The attribute covers the text, not the blank line after.
                while end > start && out.text.as_bytes()[end - 1] == b'\n' {
                    end -= 1;
                }
                SpanAttribute::Heading(level)
            }
            Marker::Anchor { href } => match href {
                Some(href) => SpanAttribute::Link(href),
                None => return,
            },
            Marker::Font { color, face } => {
                if start != end {
                    if let Some(color) = color {
                        if let Some(resolved) = self.resolve_font_color(&color) {
                            out.runs.push(StyledRun {
                                start,
                                end,
                                attr: SpanAttribute::Foreground(resolved),
                            });
                        }
                    }
                    if let Some(face) = face {
                        out.runs.push(StyledRun {
                            start,
                            end,
                            attr: SpanAttribute::FontFace(face),
                        });
                    }
                }
                return;
            }
            Marker::Styled { selector } => {
                if let Some(style) = self.styles.get(&selector) {
                    transform_range(out, stack, style.text_transform, start, out.text.len());
                    let end = out.text.len();
                    if start != end {
                        out.runs.push(StyledRun {
                            start,
                            end,
                            attr: SpanAttribute::Styled(Box::new(style.clone())),
                        });
                    }
                }
                return;
            }
        };

        if start != end {
            out.runs.push(StyledRun { start, end, attr });
        }
    }

    /// `@name` goes through the palette; anything else is a color
    /// literal. Unresolvable colors are skipped, not errors.
    fn resolve_font_color(&self, color: &str) -> Option<ColorRgb> {
        if let Some(name) = color.strip_prefix('@') {
            self.palette.and_then(|p| p.color(name))
        } else {
            ColorRgb::parse(color).ok()
        }
    }
}

fn heading_level(name: &str) -> Option<u8> {
    let bytes = name.as_bytes();
    if bytes.len() == 2 && bytes[0] == b'h' && (b'1'..=b'6').contains(&bytes[1]) {
        Some(bytes[1] - b'0')
    } else {
        None
    }
}

/// Marker shape to pop for a built-in closing tag; `None` for tags that
/// never open a marker.
fn close_probe(name: &str) -> Option<Marker> {
    Some(match name {
        "p" | "div" => Marker::Paragraph,
        "blockquote" => Marker::Quote,
        "b" | "strong" => Marker::Bold,
        "i" | "em" | "cite" | "dfn" => Marker::Italic,
        "u" => Marker::Underline,
        "tt" => Marker::Monospace,
        "sup" => Marker::Superscript,
        "sub" => Marker::Subscript,
        "big" => Marker::Big,
        "small" => Marker::Small,
        "font" => Marker::Font {
            color: None,
            face: None,
        },
        "a" => Marker::Anchor { href: None },
        other => Marker::Heading(heading_level(other)?),
    })
}

/// Pops the most recent open marker of the same kind as `like`
/// (heading levels and custom selectors count as one kind each).
fn pop_mark(stack: &mut Vec<OpenMark>, like: &Marker) -> Option<OpenMark> {
    let idx = stack
        .iter()
        .rposition(|m| mem::discriminant(&m.marker) == mem::discriminant(like))?;
    Some(stack.remove(idx))
}

fn attr_value(tag: &BytesStart, name: &[u8]) -> Option<String> {
    tag.attributes().with_checks(false).flatten().find_map(|a| {
        if a.key.as_ref().eq_ignore_ascii_case(name) {
            Some(match a.unescape_value() {
                Ok(v) => v.into_owned(),
                Err(_) => String::from_utf8_lossy(&a.value).into_owned(),
            })
        } else {
            None
        }
    })
}

/// Whitespace runs collapse to one space; never after existing trailing
/// whitespace, never at the start of the buffer.
fn append_text(out: &mut StyledString, chunk: &str) {
    for c in chunk.chars() {
        if matches!(c, ' ' | '\n' | '\t' | '\r') {
            match out.text.chars().next_back() {
                None | Some(' ') | Some('\n') => {}
                Some(_) => out.text.push(' '),
            }
        } else {
            out.text.push(c);
        }
    }
}

/// Ensures the buffer ends with a blank line: appends one or two
/// newlines, or nothing when a blank line is already there.
fn paragraph_break(out: &mut StyledString) {
    if out.text.ends_with('\n') {
        if !out.text.ends_with("\n\n") {
            out.text.push('\n');
        }
    } else if !out.text.is_empty() {
        out.text.push_str("\n\n");
    }
}

/// When the last line of a paragraph-type range is blank, pull the end
/// back by one; drop ranges that become empty.
fn fix_paragraph_runs(out: &mut StyledString) {
    for run in &mut out.runs {
        if matches!(
            run.attr,
            SpanAttribute::Paragraph | SpanAttribute::Quote | SpanAttribute::Heading(_)
        ) {
            let bytes = out.text.as_bytes();
            if run.end >= 2 && bytes[run.end - 1] == b'\n' && bytes[run.end - 2] == b'\n' {
                run.end -= 1;
            }
        }
    }
    out.runs.retain(|r| r.start < r.end);
}

/// Transforms `text[start..end]` in place, keeping every run and open
/// marker consistent when the case mapping changes byte lengths.
///
/// The range is split into elementary segments at every run or marker
/// boundary inside it and processed right to left, so a length change in
/// one segment only shifts offsets at or past that segment's end.
fn transform_range(
    out: &mut StyledString,
    stack: &mut [OpenMark],
    transform: TextTransform,
    start: usize,
    end: usize,
) {
    if start >= end || transform == TextTransform::None {
        return;
    }

    let mut cuts: Vec<usize> = vec![start, end];
    for run in &out.runs {
        for pos in [run.start, run.end] {
            if pos > start && pos < end {
                cuts.push(pos);
            }
        }
    }
    for mark in stack.iter() {
        if mark.start > start && mark.start < end {
            cuts.push(mark.start);
        }
    }
    cuts.sort_unstable();
    cuts.dedup();

    for w in (0..cuts.len() - 1).rev() {
        let (seg_start, seg_end) = (cuts[w], cuts[w + 1]);
        let replacement = {
            let segment = &out.text[seg_start..seg_end];
            let transformed = transform::apply(transform, segment);
            if transformed.as_ref() == segment {
                continue;
            }
            transformed.into_owned()
        };

        let delta = replacement.len() as isize - (seg_end - seg_start) as isize;
        out.text.replace_range(seg_start..seg_end, &replacement);

        if delta != 0 {
            for run in &mut out.runs {
                if run.start >= seg_end {
                    run.start = (run.start as isize + delta) as usize;
                }
                if run.end >= seg_end {
                    run.end = (run.end as isize + delta) as usize;
                }
            }
            for mark in stack.iter_mut() {
                if mark.start >= seg_end {
                    mark.start = (mark.start as isize + delta) as usize;
                }
            }
        }
    }
}

/// Applies the default selector's transform to every maximal region not
/// covered by a custom styled range (those carry their own transform,
/// applied when they closed).
fn apply_default_transform(out: &mut StyledString, transform: TextTransform) {
    let mut covered: Vec<(usize, usize)> = out
        .runs
        .iter()
        .filter(|r| matches!(r.attr, SpanAttribute::Styled(_)))
        .map(|r| (r.start, r.end))
        .collect();
    covered.sort_unstable();

    let mut merged: Vec<(usize, usize)> = Vec::new();
    for (s, e) in covered {
        match merged.last_mut() {
            Some(last) if s <= last.1 => last.1 = last.1.max(e),
            _ => merged.push((s, e)),
        }
    }

    let mut gaps = Vec::new();
    let mut cursor = 0;
    for (s, e) in &merged {
        if *s > cursor {
            gaps.push((cursor, *s));
        }
        cursor = *e;
    }
    if cursor < out.text.len() {
        gaps.push((cursor, out.text.len()));
    }

    let mut no_stack: Vec<OpenMark> = Vec::new();
    for (s, e) in gaps.into_iter().rev() {
        transform_range(out, &mut no_stack, transform, s, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spanstyle_css::TextAlign;

    fn styles_with_body() -> HashMap<String, TextStyle> {
        let mut styles = HashMap::new();
        styles.insert("body".to_string(), TextStyle::new("body"));
        styles
    }

    fn convert(source: &str) -> StyledString {
        let styles = styles_with_body();
        MarkupConverter::new(&styles, "body").convert(source).unwrap()
    }

    struct FixedImages;
    impl ImageResolver for FixedImages {
        fn resolve(&self, src: &str) -> Option<String> {
            (!src.is_empty()).then(|| format!("res:{}", src))
        }
    }

    struct OrangePalette;
    impl PaletteResolver for OrangePalette {
        fn color(&self, name: &str) -> Option<ColorRgb> {
            (name == "accent").then_some(ColorRgb::new(255, 102, 0))
        }
    }

    #[test]
    fn test_bold_single_range() {
        let styled = convert("<b>hi</b>");
        assert_eq!(styled.text, "hi");
        assert_eq!(
            styled.runs,
            vec![StyledRun {
                start: 0,
                end: 2,
                attr: SpanAttribute::Bold
            }]
        );
    }

    #[test]
    fn test_nested_inline_tags() {
        let styled = convert("<b>one <i>two</i></b>");
        assert_eq!(styled.text, "one two");
        // inner closes first
        assert_eq!(styled.runs[0].attr, SpanAttribute::Italic);
        assert_eq!((styled.runs[0].start, styled.runs[0].end), (4, 7));
        assert_eq!(styled.runs[1].attr, SpanAttribute::Bold);
        assert_eq!((styled.runs[1].start, styled.runs[1].end), (0, 7));
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(convert("a\n   b\t\tc").text, "a b c");
    }

    #[test]
    fn test_leading_whitespace_skipped() {
        assert_eq!(convert("   hello").text, "hello");
    }

    #[test]
    fn test_no_space_after_newline() {
        assert_eq!(convert("a<br/> b").text, "a\nb");
    }

    #[test]
    fn test_two_paragraphs_single_blank_line() {
        let styled = convert("<p>one</p><p>two</p>");
        assert_eq!(styled.text, "one\n\ntwo\n\n");

        let paragraphs: Vec<_> = styled
            .runs
            .iter()
            .filter(|r| r.attr == SpanAttribute::Paragraph)
            .collect();
        assert_eq!(paragraphs.len(), 2);
        // fix-up pulls the end back off the blank line
        assert_eq!((paragraphs[0].start, paragraphs[0].end), (0, 4));
        assert_eq!((paragraphs[1].start, paragraphs[1].end), (5, 9));
    }

    #[test]
    fn test_br_inserts_newline() {
        assert_eq!(convert("a<br/>b").text, "a\nb");
        assert_eq!(convert("a<br>b").text, "a\nb");
    }

    #[test]
    fn test_heading_range_excludes_trailing_newlines() {
        let styled = convert("<h1>Title</h1>rest");
        assert_eq!(styled.text, "Title\n\nrest");
        assert_eq!(
            styled.runs,
            vec![StyledRun {
                start: 0,
                end: 5,
                attr: SpanAttribute::Heading(1)
            }]
        );
    }

    #[test]
    fn test_all_heading_levels() {
        for level in 1..=6u8 {
            let styled = convert(&format!("<h{level}>t</h{level}>"));
            assert!(styled
                .runs
                .iter()
                .any(|r| r.attr == SpanAttribute::Heading(level)));
        }
    }

    #[test]
    fn test_blockquote_quote_range() {
        let styled = convert("intro<blockquote>quoted</blockquote>");
        assert_eq!(styled.text, "intro\n\nquoted\n\n");
        let quote = styled
            .runs
            .iter()
            .find(|r| r.attr == SpanAttribute::Quote)
            .unwrap();
        assert_eq!((quote.start, quote.end), (7, 14));
    }

    #[test]
    fn test_big_small_relative_sizes() {
        let styled = convert("<big>a</big><small>b</small>");
        assert_eq!(styled.runs[0].attr, SpanAttribute::RelativeSize(1.25));
        assert_eq!(styled.runs[1].attr, SpanAttribute::RelativeSize(0.8));
    }

    #[test]
    fn test_sub_sup_tt_u() {
        let styled = convert("<sup>a</sup><sub>b</sub><tt>c</tt><u>d</u>");
        let attrs: Vec<_> = styled.runs.iter().map(|r| r.attr.clone()).collect();
        assert_eq!(
            attrs,
            vec![
                SpanAttribute::Superscript,
                SpanAttribute::Subscript,
                SpanAttribute::Monospace,
                SpanAttribute::Underline,
            ]
        );
    }

    #[test]
    fn test_font_color_and_face() {
        let styled = convert("<font color=\"#ff0000\" face=\"Avenir\">x</font>");
        assert_eq!(
            styled.runs[0].attr,
            SpanAttribute::Foreground(ColorRgb::new(255, 0, 0))
        );
        assert_eq!(
            styled.runs[1].attr,
            SpanAttribute::FontFace("Avenir".to_string())
        );
    }

    #[test]
    fn test_font_palette_color() {
        let styles = styles_with_body();
        let palette = OrangePalette;
        let styled = MarkupConverter::new(&styles, "body")
            .with_palette(&palette)
            .convert("<font color=\"@accent\">x</font>")
            .unwrap();
        assert_eq!(
            styled.runs[0].attr,
            SpanAttribute::Foreground(ColorRgb::new(255, 102, 0))
        );
    }

    #[test]
    fn test_font_unresolvable_color_skipped() {
        // no palette configured, and an invalid literal
        let a = convert("<font color=\"@accent\">x</font>");
        let b = convert("<font color=\"notacolor\">x</font>");
        assert!(a.runs.is_empty());
        assert!(b.runs.is_empty());
    }

    #[test]
    fn test_anchor_link() {
        let styled = convert("<a href=\"https://example.com\">go</a>");
        assert_eq!(
            styled.runs[0].attr,
            SpanAttribute::Link("https://example.com".to_string())
        );
    }

    #[test]
    fn test_anchor_without_href_emits_nothing() {
        assert!(convert("<a>go</a>").runs.is_empty());
    }

    #[test]
    fn test_img_requires_resolver() {
        let styles = styles_with_body();
        let err = MarkupConverter::new(&styles, "body")
            .convert("<img src=\"pic.png\"/>")
            .unwrap_err();
        assert_eq!(err, ConvertError::MissingImageResolver);
    }

    #[test]
    fn test_img_unresolved_is_fatal() {
        let styles = styles_with_body();
        let images = FixedImages;
        let err = MarkupConverter::new(&styles, "body")
            .with_images(&images)
            .convert("<img src=\"\"/>")
            .unwrap_err();
        assert_eq!(err, ConvertError::UnresolvedImage { src: String::new() });
    }

    #[test]
    fn test_img_placeholder_and_run() {
        let styles = styles_with_body();
        let images = FixedImages;
        let styled = MarkupConverter::new(&styles, "body")
            .with_images(&images)
            .convert("see <img src=\"pic.png\"/> here")
            .unwrap();
        assert_eq!(styled.text, format!("see {} here", OBJECT_REPLACEMENT));
        let img = &styled.runs[0];
        assert_eq!(img.attr, SpanAttribute::Image("res:pic.png".to_string()));
        assert_eq!(img.end - img.start, OBJECT_REPLACEMENT.len_utf8());
    }

    #[test]
    fn test_entities_unescape() {
        assert_eq!(convert("a &amp; b &lt;c&gt;").text, "a & b <c>");
    }

    #[test]
    fn test_unclosed_tag_resolves_at_eof() {
        let styled = convert("<b>hi");
        assert_eq!(
            styled.runs,
            vec![StyledRun {
                start: 0,
                end: 2,
                attr: SpanAttribute::Bold
            }]
        );
    }

    #[test]
    fn test_orphan_close_ignored() {
        let styled = convert("hi</b></i>");
        assert_eq!(styled.text, "hi");
        assert!(styled.runs.is_empty());
    }

    #[test]
    fn test_empty_ranges_discarded() {
        assert!(convert("<b></b><u></u>").runs.is_empty());
    }

    #[test]
    fn test_missing_default_style() {
        let styles = HashMap::new();
        let err = MarkupConverter::new(&styles, "body")
            .convert("x")
            .unwrap_err();
        assert_eq!(
            err,
            ConvertError::DefaultStyleNotFound {
                selector: "body".to_string()
            }
        );
    }

    #[test]
    fn test_custom_tag_styled_range() {
        let mut styles = styles_with_body();
        let mut spot = TextStyle::new("spot");
        spot.color = Some(ColorRgb::new(0, 128, 0));
        spot.text_align = TextAlign::Center;
        styles.insert("spot".to_string(), spot.clone());

        let styled = MarkupConverter::new(&styles, "body")
            .convert("ab <spot>cd</spot>")
            .unwrap();

        assert_eq!(styled.text, "ab cd");
        assert_eq!(
            styled.runs,
            vec![StyledRun {
                start: 3,
                end: 5,
                attr: SpanAttribute::Styled(Box::new(spot))
            }]
        );
    }

    #[test]
    fn test_custom_tag_applies_own_transform() {
        let mut styles = styles_with_body();
        let mut shout = TextStyle::new("shout");
        shout.text_transform = TextTransform::Uppercase;
        styles.insert("shout".to_string(), shout);

        let styled = MarkupConverter::new(&styles, "body")
            .convert("<shout>hi</shout> there")
            .unwrap();
        assert_eq!(styled.text, "HI there");
    }

    #[test]
    fn test_default_transform_skips_custom_ranges() {
        let mut styles = HashMap::new();
        let mut body = TextStyle::new("body");
        body.text_transform = TextTransform::Uppercase;
        styles.insert("body".to_string(), body);
        styles.insert("plain".to_string(), TextStyle::new("plain"));

        let styled = MarkupConverter::new(&styles, "body")
            .convert("<plain>hi</plain> there")
            .unwrap();
        assert_eq!(styled.text, "hi THERE");
    }

    #[test]
    fn test_default_transform_covers_builtin_ranges() {
        let mut styles = HashMap::new();
        let mut body = TextStyle::new("body");
        body.text_transform = TextTransform::Capitalize;
        styles.insert("body".to_string(), body);

        let styled = MarkupConverter::new(&styles, "body")
            .convert("one <b>two</b> three")
            .unwrap();
        assert_eq!(styled.text, "One Two Three");
        assert_eq!((styled.runs[0].start, styled.runs[0].end), (4, 7));
    }

    #[test]
    fn test_length_changing_transform_keeps_runs_consistent() {
        let mut styles = HashMap::new();
        let mut body = TextStyle::new("body");
        body.text_transform = TextTransform::Uppercase;
        styles.insert("body".to_string(), body);

        // the fi ligature uppercases to two-character "FI", shrinking the
        // byte length from 3 to 2
        let styled = MarkupConverter::new(&styles, "body")
            .convert("\u{fb01}<b>x</b>")
            .unwrap();
        assert_eq!(styled.text, "FIX");
        assert_eq!(
            styled.runs,
            vec![StyledRun {
                start: 2,
                end: 3,
                attr: SpanAttribute::Bold
            }]
        );
    }

    #[test]
    fn test_interleaved_custom_tags_pop_lifo() {
        let mut styles = styles_with_body();
        styles.insert("x".to_string(), TextStyle::new("x"));
        styles.insert("y".to_string(), TextStyle::new("y"));

        // </x> resolves the most recent custom marker (y's), with x's style
        let styled = MarkupConverter::new(&styles, "body")
            .convert("<x>a<y>b</x>c</y>")
            .unwrap();
        assert_eq!(styled.text, "abc");

        let selectors: Vec<&str> = styled
            .runs
            .iter()
            .filter_map(|r| match &r.attr {
                SpanAttribute::Styled(s) => Some(s.name()),
                _ => None,
            })
            .collect();
        assert_eq!(selectors, vec!["x", "y"]);
        assert_eq!((styled.runs[0].start, styled.runs[0].end), (1, 2));
        assert_eq!((styled.runs[1].start, styled.runs[1].end), (0, 3));
    }

    #[test]
    fn test_unregistered_tag_is_container() {
        let styled = convert("<section>hi <span>there</span></section>");
        assert_eq!(styled.text, "hi there");
        assert!(styled.runs.is_empty());
    }

    #[test]
    fn test_default_selector_tag_is_not_custom() {
        // <body> matches the default selector and stays structural
        let styled = convert("<body>hi</body>");
        assert_eq!(styled.text, "hi");
        assert!(styled.runs.is_empty());
    }
}
