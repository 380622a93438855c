//! CSS stylesheet parsing.
//!
//! # Design
//!
//! This module implements a subset of CSS level 3, tailored for text
//! styling. Selectors name style records; declarations set typographic
//! properties on them.
//!
//! The parser is built on top of `cssparser` (the same tokenizer used by
//! Firefox), ensuring robust handling of syntax, comments, and escapes.
//!
//! ## Mapping
//!
//! - **Selectors**: bare type selectors (`body`) and class selectors
//!   (`.headline`) both map to style names; the leading dot is stripped.
//!   Comma lists define several records from one rule:
//!   - `h1` -> defines style "h1"
//!   - `.title, .header` -> defines styles "title" and "header"
//!
//! - **Properties**: the supported set is listed in [`TextStyle`]'s
//!   field table. Unknown properties are skipped; a known property with
//!   an unparseable value aborts the whole parse.
//!
//! - **Variables**: `$name: value;` at the top level declares a variable,
//!   and `var($name)` or bare `$name` inside a declaration substitutes it.
//!   Referencing an undeclared variable is an error.
//!
//! # Example
//!
//! ```css
//! $accent: #ff6600;
//!
//! body {
//!     font-family: Avenir;
//!     font-size: 16px;
//! }
//!
//! h1, h2 {
//!     font-weight: bold;
//!     color: var($accent);
//!     text-transform: uppercase;
//! }
//! ```

use std::collections::HashMap;

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError as CssError, ParseErrorKind, Parser,
    ParserInput, ParserState, QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, Token,
};
use once_cell::sync::Lazy;

use crate::color::ColorRgb;
use crate::error::ParseError;
use crate::model::{
    FontStyle, FontWeight, TextAlign, TextDecoration, TextOverflow, TextStyle, TextTransform,
};

/// Parses a stylesheet into style records keyed by selector name.
pub fn parse(css: &str) -> Result<HashMap<String, TextStyle>, ParseError> {
    parse_sheet(css).map(|(styles, _)| styles)
}

/// As [`parse`], also returning the number of qualified rules seen. A
/// comma-list prelude defines several records from one rule, so the rule
/// count and the record count differ.
fn parse_sheet(css: &str) -> Result<(HashMap<String, TextStyle>, usize), ParseError> {
    let resolved = resolve_variables(css)?;
    let mut input = ParserInput::new(&resolved);
    let mut parser = Parser::new(&mut input);

    let mut sheet = SheetParser {
        styles: HashMap::new(),
        rules: 0,
    };

    let rule_list_parser = cssparser::StyleSheetParser::new(&mut parser, &mut sheet);

    for result in rule_list_parser {
        if let Err((error, slice)) = result {
            return Err(convert_error(error, slice));
        }
    }

    Ok((sheet.styles, sheet.rules))
}

/// Parses a fragment containing exactly one rule and merges it over
/// `target`, returning the combined record.
///
/// The fragment's selector name is ignored; the result keeps `target`'s
/// name. More or fewer than one rule is an error.
pub fn merge_rule(
    target: &TextStyle,
    css: &str,
    overwrite_existing: bool,
) -> Result<TextStyle, ParseError> {
    let mut merged = target.clone();
    merge_rule_into(&mut merged, css, overwrite_existing)?;
    Ok(merged)
}

/// In-place variant of [`merge_rule`].
pub fn merge_rule_into(
    target: &mut TextStyle,
    css: &str,
    overwrite_existing: bool,
) -> Result<(), ParseError> {
    let (rules, found) = parse_sheet(css)?;
    // A comma-list prelude yields one rule but several identical records;
    // any of them serves as the fragment.
    match rules.into_values().next() {
        Some(fragment) if found == 1 => {
            target.merge(&fragment, overwrite_existing);
            Ok(())
        }
        _ => Err(ParseError::SingleRuleExpected { found }),
    }
}

// =============================================================================
// Variable resolution
// =============================================================================

/// Lifts `$name: value;` declarations out of the top level and substitutes
/// `var($name)` / `$name` references in the remainder.
fn resolve_variables(css: &str) -> Result<String, ParseError> {
    let chars: Vec<char> = css.chars().collect();
    let mut vars: HashMap<String, String> = HashMap::new();
    let mut body = String::with_capacity(css.len());

    let mut depth = 0usize;
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            // Comments pass through untouched so the tokenizer sees them.
            '/' if chars.get(i + 1) == Some(&'*') => {
                let start = i;
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i = (i + 2).min(chars.len());
                body.extend(&chars[start..i]);
            }
            '{' => {
                depth += 1;
                body.push('{');
                i += 1;
            }
            '}' => {
                depth = depth.saturating_sub(1);
                body.push('}');
                i += 1;
            }
            '$' if depth == 0 => {
                i += 1;
                let name = read_ident(&chars, &mut i);
                if name.is_empty() {
                    return Err(ParseError::Syntax {
                        context: "$".to_string(),
                    });
                }
                while i < chars.len() && chars[i].is_whitespace() {
                    i += 1;
                }
                if chars.get(i) != Some(&':') {
                    return Err(ParseError::Syntax {
                        context: format!("${}", name),
                    });
                }
                i += 1;
                let mut value = String::new();
                while i < chars.len() && chars[i] != ';' {
                    value.push(chars[i]);
                    i += 1;
                }
                if chars.get(i) == Some(&';') {
                    i += 1;
                }
                vars.insert(name, value.trim().to_string());
            }
            c => {
                body.push(c);
                i += 1;
            }
        }
    }

    substitute_references(&body, &vars)
}

fn substitute_references(
    body: &str,
    vars: &HashMap<String, String>,
) -> Result<String, ParseError> {
    let chars: Vec<char> = body.chars().collect();
    let mut out = String::with_capacity(body.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '/' if chars.get(i + 1) == Some(&'*') => {
                let start = i;
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i = (i + 2).min(chars.len());
                out.extend(&chars[start..i]);
            }
            // var($name)
            'v' if starts_with(&chars, i, "var(") => {
                let mut j = i + 4;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if chars.get(j) == Some(&'$') {
                    j += 1;
                    let name = read_ident(&chars, &mut j);
                    while j < chars.len() && chars[j].is_whitespace() {
                        j += 1;
                    }
                    if !name.is_empty() && chars.get(j) == Some(&')') {
                        let value = vars
                            .get(&name)
                            .ok_or(ParseError::MissingVariable { name: name.clone() })?;
                        out.push_str(value);
                        i = j + 1;
                        continue;
                    }
                }
                out.push('v');
                i += 1;
            }
            '$' => {
                i += 1;
                let name = read_ident(&chars, &mut i);
                if name.is_empty() {
                    out.push('$');
                    continue;
                }
                let value = vars
                    .get(&name)
                    .ok_or(ParseError::MissingVariable { name: name.clone() })?;
                out.push_str(value);
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    Ok(out)
}

fn read_ident(chars: &[char], i: &mut usize) -> String {
    let start = *i;
    while *i < chars.len() && (chars[*i].is_alphanumeric() || chars[*i] == '-' || chars[*i] == '_')
    {
        *i += 1;
    }
    chars[start..*i].iter().collect()
}

fn starts_with(chars: &[char], at: usize, needle: &str) -> bool {
    needle
        .chars()
        .enumerate()
        .all(|(k, c)| chars.get(at + k) == Some(&c))
}

// =============================================================================
// Rule parsing
// =============================================================================

/// Declaration-level errors. `UnknownProperty` is recoverable (the
/// declaration is skipped); everything else aborts the parse.
#[derive(Debug, Clone, PartialEq)]
enum DeclError {
    UnknownProperty,
    EmptySelector,
    InvalidValue { property: String, value: String },
    InvalidColor { value: String },
}

fn convert_error(error: CssError<'_, DeclError>, slice: &str) -> ParseError {
    match error.kind {
        ParseErrorKind::Custom(DeclError::InvalidValue { property, value }) => {
            ParseError::InvalidValue { property, value }
        }
        ParseErrorKind::Custom(DeclError::InvalidColor { value }) => {
            ParseError::InvalidColor { value }
        }
        _ => ParseError::Syntax {
            context: snippet(slice),
        },
    }
}

fn snippet(slice: &str) -> String {
    let trimmed = slice.trim();
    if trimmed.len() > 60 {
        let mut end = 60;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        trimmed[..end].to_string()
    } else {
        trimmed.to_string()
    }
}

struct SheetParser {
    styles: HashMap<String, TextStyle>,
    rules: usize,
}

impl<'i> QualifiedRuleParser<'i> for SheetParser {
    type Prelude = Vec<String>;
    type QualifiedRule = ();
    type Error = DeclError;

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, CssError<'i, Self::Error>> {
        let mut names = Vec::new();

        loop {
            let token = match input.next() {
                Ok(t) => t.clone(),
                Err(_) => break,
            };
            match token {
                // Class selectors lose the leading dot.
                Token::Delim('.') => {
                    let name = input.expect_ident()?;
                    names.push(name.as_ref().to_string());
                }
                Token::Ident(name) => {
                    names.push(name.as_ref().to_string());
                }
                Token::Comma => continue,
                _ => {
                    // Ignore other tokens
                }
            }
        }

        if names.is_empty() {
            return Err(input.new_custom_error(DeclError::EmptySelector));
        }
        Ok(names)
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, CssError<'i, Self::Error>> {
        self.rules += 1;

        let mut decl_parser = DeclParser;
        let rule_parser = RuleBodyParser::new(input, &mut decl_parser);

        let mut decls = Vec::new();
        for result in rule_parser {
            match result {
                Ok(decl) => decls.push(decl),
                Err((error, _slice)) => match &error.kind {
                    // Unknown properties are skipped, as CSS recovery
                    // would. Bad values abort the parse.
                    ParseErrorKind::Custom(DeclError::UnknownProperty) => continue,
                    ParseErrorKind::Custom(_) => return Err(error),
                    ParseErrorKind::Basic(_) => continue,
                },
            }
        }

        for name in prelude {
            let style = self
                .styles
                .entry(name.clone())
                .or_insert_with(|| TextStyle::new(name));
            for decl in &decls {
                decl.apply(style);
            }
        }
        Ok(())
    }
}

impl<'i> AtRuleParser<'i> for SheetParser {
    type Prelude = ();
    type AtRule = ();
    type Error = DeclError;
}

struct DeclParser;

/// A parsed declaration: a typed value plus the setter that installs it.
struct Decl {
    set: fn(&mut TextStyle, &PropValue),
    value: PropValue,
}

impl Decl {
    fn apply(&self, style: &mut TextStyle) {
        (self.set)(style, &self.value);
    }
}

#[derive(Debug, Clone, PartialEq)]
enum PropValue {
    Length(f32),
    Text(String),
    Color(ColorRgb),
    Align(TextAlign),
    Decoration(TextDecoration),
    Transform(TextTransform),
    Overflow(TextOverflow),
    Slant(FontStyle),
    Weight(FontWeight),
    Count(u32),
    Sides { left: f32, top: f32, right: f32, bottom: f32 },
}

/// How a property's value tokens are parsed.
#[derive(Clone, Copy)]
enum PropKind {
    Length,
    Family,
    Color,
    ColorText,
    Align,
    Decoration,
    Transform,
    Overflow,
    Slant,
    Weight,
    Count,
    PaddingShorthand,
}

struct Property {
    kind: PropKind,
    set: fn(&mut TextStyle, &PropValue),
}

static PROPERTIES: Lazy<HashMap<&'static str, Property>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, Property> = HashMap::new();

    m.insert(
        "font-family",
        Property {
            kind: PropKind::Family,
            set: |s, v| {
                if let PropValue::Text(t) = v {
                    s.font_family = Some(t.clone());
                }
            },
        },
    );
    m.insert(
        "font-size",
        Property {
            kind: PropKind::Length,
            set: |s, v| {
                if let PropValue::Length(x) = v {
                    s.font_size = Some(*x);
                }
            },
        },
    );
    m.insert(
        "font-style",
        Property {
            kind: PropKind::Slant,
            set: |s, v| {
                if let PropValue::Slant(x) = v {
                    s.font_style = *x;
                }
            },
        },
    );
    m.insert(
        "font-weight",
        Property {
            kind: PropKind::Weight,
            set: |s, v| {
                if let PropValue::Weight(x) = v {
                    s.font_weight = *x;
                }
            },
        },
    );
    m.insert(
        "letter-spacing",
        Property {
            kind: PropKind::Length,
            set: |s, v| {
                if let PropValue::Length(x) = v {
                    s.letter_spacing = *x;
                }
            },
        },
    );
    m.insert(
        "line-height",
        Property {
            kind: PropKind::Length,
            set: |s, v| {
                if let PropValue::Length(x) = v {
                    s.line_height = *x;
                }
            },
        },
    );
    m.insert(
        "text-align",
        Property {
            kind: PropKind::Align,
            set: |s, v| {
                if let PropValue::Align(x) = v {
                    s.text_align = *x;
                }
            },
        },
    );
    m.insert(
        "text-decoration",
        Property {
            kind: PropKind::Decoration,
            set: |s, v| {
                if let PropValue::Decoration(x) = v {
                    s.text_decoration = *x;
                }
            },
        },
    );
    m.insert(
        "text-decoration-color",
        Property {
            kind: PropKind::ColorText,
            set: |s, v| {
                if let PropValue::Text(t) = v {
                    s.text_decoration_color = Some(t.clone());
                }
            },
        },
    );
    m.insert(
        "text-indent",
        Property {
            kind: PropKind::Length,
            set: |s, v| {
                if let PropValue::Length(x) = v {
                    s.text_indent = *x;
                }
            },
        },
    );
    m.insert(
        "text-overflow",
        Property {
            kind: PropKind::Overflow,
            set: |s, v| {
                if let PropValue::Overflow(x) = v {
                    s.text_overflow = *x;
                }
            },
        },
    );
    m.insert(
        "text-transform",
        Property {
            kind: PropKind::Transform,
            set: |s, v| {
                if let PropValue::Transform(x) = v {
                    s.text_transform = *x;
                }
            },
        },
    );
    m.insert(
        "color",
        Property {
            kind: PropKind::Color,
            set: |s, v| {
                if let PropValue::Color(c) = v {
                    s.color = Some(*c);
                }
            },
        },
    );
    m.insert(
        "background-color",
        Property {
            kind: PropKind::Color,
            set: |s, v| {
                if let PropValue::Color(c) = v {
                    s.background_color = Some(*c);
                }
            },
        },
    );
    m.insert(
        "padding",
        Property {
            kind: PropKind::PaddingShorthand,
            set: |s, v| {
                if let PropValue::Sides { left, top, right, bottom } = v {
                    s.padding.left = Some(*left);
                    s.padding.top = Some(*top);
                    s.padding.right = Some(*right);
                    s.padding.bottom = Some(*bottom);
                }
            },
        },
    );
    m.insert(
        "padding-left",
        Property {
            kind: PropKind::Length,
            set: |s, v| {
                if let PropValue::Length(x) = v {
                    s.padding.left = Some(*x);
                }
            },
        },
    );
    m.insert(
        "padding-top",
        Property {
            kind: PropKind::Length,
            set: |s, v| {
                if let PropValue::Length(x) = v {
                    s.padding.top = Some(*x);
                }
            },
        },
    );
    m.insert(
        "padding-right",
        Property {
            kind: PropKind::Length,
            set: |s, v| {
                if let PropValue::Length(x) = v {
                    s.padding.right = Some(*x);
                }
            },
        },
    );
    m.insert(
        "padding-bottom",
        Property {
            kind: PropKind::Length,
            set: |s, v| {
                if let PropValue::Length(x) = v {
                    s.padding.bottom = Some(*x);
                }
            },
        },
    );
    m.insert(
        "lines",
        Property {
            kind: PropKind::Count,
            set: |s, v| {
                if let PropValue::Count(n) = v {
                    s.lines = Some(*n);
                }
            },
        },
    );

    m
});

impl<'i> DeclarationParser<'i> for DeclParser {
    type Declaration = Decl;
    type Error = DeclError;

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, CssError<'i, Self::Error>> {
        let property = name.as_ref().to_lowercase();
        let spec = PROPERTIES
            .get(property.as_str())
            .ok_or_else(|| input.new_custom_error(DeclError::UnknownProperty))?;

        let value = parse_prop_value(&property, spec.kind, input)?;
        Ok(Decl {
            set: spec.set,
            value,
        })
    }
}

impl<'i> AtRuleParser<'i> for DeclParser {
    type Prelude = ();
    type AtRule = Decl;
    type Error = DeclError;
}

impl<'i> QualifiedRuleParser<'i> for DeclParser {
    type Prelude = ();
    type QualifiedRule = Decl;
    type Error = DeclError;
}

impl<'i> RuleBodyItemParser<'i, Decl, DeclError> for DeclParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

// =============================================================================
// Value parsing
// =============================================================================

fn parse_prop_value<'i, 't>(
    property: &str,
    kind: PropKind,
    input: &mut Parser<'i, 't>,
) -> Result<PropValue, CssError<'i, DeclError>> {
    match kind {
        PropKind::Length => parse_length(property, input).map(PropValue::Length),
        PropKind::Family => parse_family(property, input).map(PropValue::Text),
        PropKind::Color => parse_color(input).map(PropValue::Color),
        PropKind::ColorText => parse_color_text(property, input).map(PropValue::Text),
        PropKind::Align => {
            parse_keyword(property, input, TextAlign::from_keyword).map(PropValue::Align)
        }
        PropKind::Decoration => {
            parse_keyword(property, input, TextDecoration::from_keyword).map(PropValue::Decoration)
        }
        PropKind::Transform => {
            parse_keyword(property, input, TextTransform::from_keyword).map(PropValue::Transform)
        }
        PropKind::Overflow => {
            parse_keyword(property, input, TextOverflow::from_keyword).map(PropValue::Overflow)
        }
        PropKind::Slant => {
            parse_keyword(property, input, FontStyle::from_keyword).map(PropValue::Slant)
        }
        PropKind::Weight => {
            parse_keyword(property, input, FontWeight::from_keyword).map(PropValue::Weight)
        }
        PropKind::Count => parse_count(property, input).map(PropValue::Count),
        PropKind::PaddingShorthand => parse_padding(property, input),
    }
}

fn invalid<'i>(
    input: &mut Parser<'i, '_>,
    property: &str,
    value: impl Into<String>,
) -> CssError<'i, DeclError> {
    input.new_custom_error(DeclError::InvalidValue {
        property: property.to_string(),
        value: value.into(),
    })
}

fn token_text(token: &Token) -> String {
    match token {
        Token::Ident(s) | Token::QuotedString(s) | Token::UnquotedUrl(s) => s.as_ref().to_string(),
        Token::Hash(s) | Token::IDHash(s) => format!("#{}", s),
        Token::Number { value, .. } => value.to_string(),
        Token::Dimension { value, unit, .. } => format!("{}{}", value, unit),
        Token::Percentage { unit_value, .. } => format!("{}%", unit_value * 100.0),
        other => format!("{:?}", other),
    }
}

/// Lengths are unitless numbers or `px` dimensions; any other unit is an
/// error.
fn parse_length<'i, 't>(
    property: &str,
    input: &mut Parser<'i, 't>,
) -> Result<f32, CssError<'i, DeclError>> {
    let token = input.next()?.clone();
    match token {
        Token::Number { value, .. } => Ok(value),
        Token::Dimension { value, ref unit, .. } if unit.eq_ignore_ascii_case("px") => Ok(value),
        ref other => Err(invalid(input, property, token_text(other))),
    }
}

/// First font family in the list; unquoted multi-word names are joined
/// with spaces.
fn parse_family<'i, 't>(
    property: &str,
    input: &mut Parser<'i, 't>,
) -> Result<String, CssError<'i, DeclError>> {
    let mut parts: Vec<String> = Vec::new();

    loop {
        let token = match input.next() {
            Ok(t) => t.clone(),
            Err(_) => break,
        };
        match token {
            Token::QuotedString(s) | Token::Ident(s) => parts.push(s.as_ref().to_string()),
            Token::Comma => break,
            _ => {}
        }
    }

    if parts.is_empty() {
        Err(invalid(input, property, ""))
    } else {
        Ok(parts.join(" "))
    }
}

fn parse_color<'i, 't>(input: &mut Parser<'i, 't>) -> Result<ColorRgb, CssError<'i, DeclError>> {
    let token = input.next()?.clone();
    let text = match token {
        Token::Ident(name) => name.as_ref().to_string(),
        Token::Hash(val) | Token::IDHash(val) => format!("#{}", val),
        ref other => token_text(other),
    };
    ColorRgb::parse(&text)
        .map_err(|_| input.new_custom_error(DeclError::InvalidColor { value: text.clone() }))
}

/// A color kept as its textual form. Validated but not resolved; the
/// renderer decides how to interpret it.
fn parse_color_text<'i, 't>(
    property: &str,
    input: &mut Parser<'i, 't>,
) -> Result<String, CssError<'i, DeclError>> {
    let token = input.next()?.clone();
    match token {
        Token::Ident(name) => Ok(name.as_ref().to_string()),
        Token::Hash(val) | Token::IDHash(val) => Ok(format!("#{}", val)),
        ref other => Err(invalid(input, property, token_text(other))),
    }
}

fn parse_keyword<'i, 't, T>(
    property: &str,
    input: &mut Parser<'i, 't>,
    lookup: fn(&str) -> Option<T>,
) -> Result<T, CssError<'i, DeclError>> {
    let ident = input.expect_ident()?.as_ref().to_string();
    lookup(&ident).ok_or_else(|| invalid(input, property, ident.clone()))
}

fn parse_count<'i, 't>(
    property: &str,
    input: &mut Parser<'i, 't>,
) -> Result<u32, CssError<'i, DeclError>> {
    let token = input.next()?.clone();
    match token {
        Token::Number {
            int_value: Some(n), ..
        } if n >= 0 => Ok(n as u32),
        ref other => Err(invalid(input, property, token_text(other))),
    }
}

/// CSS shorthand expansion: 1 value applies to all sides; 2 are
/// vertical/horizontal; 3 are top, horizontal, bottom; 4 are
/// top, right, bottom, left.
fn parse_padding<'i, 't>(
    property: &str,
    input: &mut Parser<'i, 't>,
) -> Result<PropValue, CssError<'i, DeclError>> {
    let mut values = Vec::new();
    loop {
        let token = match input.next() {
            Ok(t) => t.clone(),
            Err(_) => break,
        };
        match token {
            Token::Number { value, .. } => values.push(value),
            Token::Dimension { value, ref unit, .. } if unit.eq_ignore_ascii_case("px") => {
                values.push(value)
            }
            Token::Comma => continue,
            ref other => return Err(invalid(input, property, token_text(other))),
        }
        if values.len() > 4 {
            return Err(invalid(input, property, "too many values"));
        }
    }

    let (top, right, bottom, left) = match values.as_slice() {
        [a] => (*a, *a, *a, *a),
        [v, h] => (*v, *h, *v, *h),
        [t, h, b] => (*t, *h, *b, *h),
        [t, r, b, l] => (*t, *r, *b, *l),
        _ => return Err(invalid(input, property, "")),
    };

    Ok(PropValue::Sides {
        left,
        top,
        right,
        bottom,
    })
}
