//! HTML-like markup to styled text ranges.
//!
//! This crate converts a permissive subset of HTML into a
//! [`StyledString`]: the plain text with whitespace collapsed, plus a
//! list of attributed ranges ([`StyledRun`]). It pairs with
//! `spanstyle-css`, whose [`TextStyle`](spanstyle_css::TextStyle)
//! records drive custom tags and text transforms.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use spanstyle_css::parse;
//! use spanstyle_markup::{MarkupConverter, SpanAttribute};
//!
//! let styles = parse("body { font-size: 16px; }").unwrap();
//! let converter = MarkupConverter::new(&styles, "body");
//!
//! let styled = converter
//!     .convert("<p>First paragraph</p><p>Second, with <b>emphasis</b></p>")
//!     .unwrap();
//!
//! assert_eq!(styled.text, "First paragraph\n\nSecond, with emphasis\n\n");
//! assert!(styled.runs.iter().any(|r| r.attr == SpanAttribute::Bold));
//! ```
//!
//! Input is treated as tag soup: unclosed tags are resolved at end of
//! input, orphan close tags are ignored, and unknown tags are pure
//! containers. The only fatal conditions are a missing default style,
//! image resolution failures, and input the reader cannot scan at all.

pub mod converter;
pub mod error;
pub mod span;
pub mod transform;

pub use converter::{ImageResolver, MarkupConverter, PaletteResolver};
pub use error::ConvertError;
pub use span::{SpanAttribute, StyledRun, StyledString, HEADER_SIZES, OBJECT_REPLACEMENT};
