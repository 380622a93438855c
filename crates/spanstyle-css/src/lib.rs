//! CSS-subset stylesheet parsing for text styling.
//!
//! This crate turns a small, typography-focused subset of CSS into plain
//! [`TextStyle`] records that a renderer (or the `spanstyle-markup`
//! converter) can consume. It knows nothing about layout or markup; it
//! only parses, merges, and serializes style records.
//!
//! # Example
//!
//! ```rust
//! use spanstyle_css::{parse, TextAlign};
//!
//! let css = r#"
//!     $accent: #ff6600;
//!
//!     body {
//!         font-family: Avenir;
//!         font-size: 16px;
//!     }
//!
//!     h1, .callout {
//!         font-weight: bold;
//!         color: var($accent);
//!         text-align: center;
//!     }
//! "#;
//!
//! let styles = parse(css).unwrap();
//! assert_eq!(styles["body"].font_size, Some(16.0));
//! assert_eq!(styles["h1"].text_align, TextAlign::Center);
//! assert_eq!(styles["callout"].color, styles["h1"].color);
//! ```
//!
//! # Merging
//!
//! Records combine through [`TextStyle::merge`], which fills unset
//! properties from a source record (or overwrites everything when asked).
//! [`merge_rule`] layers a one-rule CSS fragment over an existing record,
//! which is how per-tag overrides are built.

pub mod color;
pub mod error;
pub mod model;
pub mod parser;
pub mod serialize;

pub use color::ColorRgb;
pub use error::ParseError;
pub use model::{
    FontStyle, FontWeight, Padding, TextAlign, TextDecoration, TextOverflow, TextStyle,
    TextTransform,
};
pub use parser::{merge_rule, merge_rule_into, parse};
pub use serialize::to_css;
