use crate::foundation::core::Rgba8;
use crate::foundation::error::{NewsprintError, NewsprintResult};
use serde::Serialize;
use std::fmt;

/// A color as the user typed or picked it: any CSS `<color>` string.
///
/// The text is stored verbatim; it is only interpreted when the renderer resolves effective
/// styles, so an invalid value never blocks editing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CssColor(String);

impl CssColor {
    /// Wrap a color string without validating it.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The color text as entered.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into straight RGBA8 (named colors, hex, `rgb()`, `hsl()`, `hwb()`, ...).
    pub fn parse(&self) -> NewsprintResult<Rgba8> {
        parse_css_color(&self.0)
    }

    /// Return `true` when the text parses as a CSS color.
    pub fn is_valid(&self) -> bool {
        self.parse().is_ok()
    }
}

impl Default for CssColor {
    fn default() -> Self {
        Self::new("#000000")
    }
}

impl fmt::Display for CssColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CssColor {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CssColor {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Parse a CSS `<color>` into straight RGBA8 channels.
pub(crate) fn parse_css_color(input: &str) -> NewsprintResult<Rgba8> {
    let s = input.trim();
    if s.is_empty() {
        return Err(NewsprintError::validation("empty color value"));
    }
    let parsed = csscolorparser::parse(s)
        .map_err(|e| NewsprintError::validation(format!("invalid color \"{s}\": {e}")))?;
    let [r, g, b, a] = parsed.to_rgba8();
    Ok(Rgba8::new(r, g, b, a))
}
