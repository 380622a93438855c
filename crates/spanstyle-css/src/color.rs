//! Color value parsing for stylesheets.
//!
//! Supports two color formats:
//!
//! - **Named colors**: the 16 basic CSS color keywords (`red`, `teal`, ...)
//! - **RGB hex**: `#ff6b35` or `#f80` (3 or 6 digit)
//!
//! Colors stay in RGB; mapping to a platform color type is the renderer's
//! concern.

use crate::error::ParseError;

/// An RGB color resolved from a stylesheet value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorRgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a color from a string value.
    ///
    /// Accepts hex codes (`#ff6b35`, `#f80`) and the 16 basic CSS color
    /// names, case-insensitively.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        Self::parse_named(s)
    }

    /// Parses a hex color code (without the # prefix).
    fn parse_hex(hex: &str) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidColor {
            value: format!("#{}", hex),
        };

        // Byte-indexed below, so reject non-ASCII up front.
        if !hex.is_ascii() {
            return Err(invalid());
        }

        match hex.len() {
            // 3-digit hex: #rgb -> #rrggbb
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).map_err(|_| invalid())? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).map_err(|_| invalid())? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).map_err(|_| invalid())? * 17;
                Ok(Self::new(r, g, b))
            }
            // 6-digit hex: #rrggbb
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| invalid())?;
                let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| invalid())?;
                let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| invalid())?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(invalid()),
        }
    }

    /// Parses a basic CSS color keyword.
    fn parse_named(name: &str) -> Result<Self, ParseError> {
        let (r, g, b) = match name.to_lowercase().as_str() {
            "black" => (0x00, 0x00, 0x00),
            "silver" => (0xc0, 0xc0, 0xc0),
            "gray" | "grey" => (0x80, 0x80, 0x80),
            "white" => (0xff, 0xff, 0xff),
            "maroon" => (0x80, 0x00, 0x00),
            "red" => (0xff, 0x00, 0x00),
            "purple" => (0x80, 0x00, 0x80),
            "fuchsia" | "magenta" => (0xff, 0x00, 0xff),
            "green" => (0x00, 0x80, 0x00),
            "lime" => (0x00, 0xff, 0x00),
            "olive" => (0x80, 0x80, 0x00),
            "yellow" => (0xff, 0xff, 0x00),
            "navy" => (0x00, 0x00, 0x80),
            "blue" => (0x00, 0x00, 0xff),
            "teal" => (0x00, 0x80, 0x80),
            "aqua" | "cyan" => (0x00, 0xff, 0xff),
            _ => {
                return Err(ParseError::InvalidColor {
                    value: name.to_string(),
                })
            }
        };

        Ok(Self::new(r, g, b))
    }

    /// Serializes to a `#rrggbb` hex string.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for ColorRgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
