//! CSS-driven text styling.
//!
//! `spanstyle` ties together its two sibling crates: stylesheets parsed
//! by `spanstyle-css` feed a [`StyleRegistry`], and markup runs through
//! `spanstyle-markup` against the registry's records to produce plain
//! text plus attributed ranges that any renderer can paint.
//!
//! # Quick Start
//!
//! ```rust
//! use spanstyle::{CssTag, SpanAttribute, StyleRegistry};
//!
//! let mut registry = StyleRegistry::new("main");
//! registry
//!     .set_css(
//!         "body { font-family: Avenir; font-size: 16px; } \
//!          alert { color: red; text-transform: uppercase; }",
//!     )
//!     .unwrap();
//!
//! let styled = registry
//!     .styled_string("Stay <alert>calm</alert>, <b>please</b>.", "body", &[])
//!     .unwrap();
//!
//! assert_eq!(styled.text, "Stay CALM, please.");
//! assert!(styled
//!     .runs
//!     .iter()
//!     .any(|r| r.attr == SpanAttribute::Bold));
//! ```
//!
//! Per-call tag overrides go through [`CssTag`]:
//!
//! ```rust
//! # use spanstyle::{CssTag, StyleRegistry};
//! # let mut registry = StyleRegistry::new("main");
//! # registry.set_css("body { font-size: 16px; } em-big { font-size: 24px; }").unwrap();
//! let tags = [CssTag::new("huge").styled_as("em-big")];
//! let styled = registry.styled_string("<huge>wow</huge>", "body", &tags).unwrap();
//! assert_eq!(styled.text, "wow");
//! ```
//!
//! Hosts that manage several registries (one per document, screen, or
//! theme) own them through a [`RegistryPool`] keyed by id.

pub mod error;
pub mod html;
pub mod registry;
pub mod tags;

pub use error::Error;
pub use registry::{RegistryPool, StyleRegistry};
pub use tags::CssTag;

pub use spanstyle_css::{
    merge_rule, parse, to_css, ColorRgb, FontStyle, FontWeight, Padding, ParseError, TextAlign,
    TextDecoration, TextOverflow, TextStyle, TextTransform,
};
pub use spanstyle_markup::{
    ConvertError, ImageResolver, MarkupConverter, PaletteResolver, SpanAttribute, StyledRun,
    StyledString,
};

/// Selector that styles text outside any tag; also the `<style>` block
/// fallback rule in [`html::with_inline_styles`].
pub const DEFAULT_SELECTOR: &str = "body";
