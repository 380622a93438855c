//! Serialization of a style record back to CSS text.
//!
//! The output is a single rule in canonical form: properties in a fixed
//! order, defaults suppressed, colors as lowercase hex. Feeding the
//! output back through [`crate::parse`] reproduces the record.

use crate::model::{
    FontStyle, FontWeight, TextAlign, TextDecoration, TextOverflow, TextStyle, TextTransform,
};

/// Renders `style` as one CSS rule under `selector`.
///
/// Only properties that differ from their defaults are emitted, so an
/// empty record serializes to an empty rule body.
pub fn to_css(selector: &str, style: &TextStyle) -> String {
    let mut out = String::new();
    out.push_str(selector);
    out.push('{');

    if let Some(family) = &style.font_family {
        if family.contains(char::is_whitespace) {
            push_prop(&mut out, "font-family", &format!("\"{}\"", family));
        } else {
            push_prop(&mut out, "font-family", family);
        }
    }
    if let Some(size) = style.font_size {
        push_prop(&mut out, "font-size", &format!("{}px", fmt_num(size)));
    }
    if style.font_style != FontStyle::Normal {
        push_prop(&mut out, "font-style", style.font_style.keyword());
    }
    if style.font_weight != FontWeight::Normal {
        push_prop(&mut out, "font-weight", style.font_weight.keyword());
    }
    if style.letter_spacing != 0.0 {
        push_prop(&mut out, "letter-spacing", &fmt_num(style.letter_spacing));
    }
    if style.line_height != 0.0 {
        push_prop(&mut out, "line-height", &fmt_num(style.line_height));
    }
    if style.text_align != TextAlign::Left {
        push_prop(&mut out, "text-align", style.text_align.keyword());
    }
    if style.text_decoration != TextDecoration::None {
        push_prop(&mut out, "text-decoration", style.text_decoration.keyword());
    }
    if let Some(color) = &style.text_decoration_color {
        push_prop(&mut out, "text-decoration-color", color);
    }
    if style.text_indent != 0.0 {
        push_prop(&mut out, "text-indent", &fmt_num(style.text_indent));
    }
    if style.text_overflow != TextOverflow::None {
        push_prop(&mut out, "text-overflow", style.text_overflow.keyword());
    }
    if style.text_transform != TextTransform::None {
        push_prop(&mut out, "text-transform", style.text_transform.keyword());
    }
    if let Some(color) = style.color {
        push_prop(&mut out, "color", &color.to_hex());
    }
    if let Some(color) = style.background_color {
        push_prop(&mut out, "background-color", &color.to_hex());
    }
    if let Some(v) = style.padding.left {
        push_prop(&mut out, "padding-left", &fmt_num(v));
    }
    if let Some(v) = style.padding.top {
        push_prop(&mut out, "padding-top", &fmt_num(v));
    }
    if let Some(v) = style.padding.right {
        push_prop(&mut out, "padding-right", &fmt_num(v));
    }
    if let Some(v) = style.padding.bottom {
        push_prop(&mut out, "padding-bottom", &fmt_num(v));
    }
    if let Some(n) = style.lines {
        push_prop(&mut out, "lines", &n.to_string());
    }

    out.push('}');
    out
}

fn push_prop(out: &mut String, name: &str, value: &str) {
    out.push_str(name);
    out.push(':');
    out.push_str(value);
    out.push(';');
}

/// Integral values print without a trailing `.0`.
fn fmt_num(v: f32) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}
