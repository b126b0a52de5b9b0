//! The composition state: one flat record of everything the user can edit.

use crate::assets::color::CssColor;
use crate::assets::image_loader::EmbeddedImage;
use crate::foundation::error::{NewsprintError, NewsprintResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Which of the five fixed templates arranges the article.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// Centered heading, image and caption; dateline prefixed to the body.
    #[default]
    Classic,
    /// Accent-bordered heading over a two-column grid.
    SideBySide,
    /// Everything inside a bordered box.
    Bordered,
    /// Right-aligned heading, body column beside a narrow image column.
    Sidebar,
    /// Full-width image on top, two-column body beneath.
    Magazine,
}

impl Layout {
    /// Every template, in selector order.
    pub const ALL: [Layout; 5] = [
        Layout::Classic,
        Layout::SideBySide,
        Layout::Bordered,
        Layout::Sidebar,
        Layout::Magazine,
    ];

    /// Stable selector value.
    pub fn name(self) -> &'static str {
        match self {
            Layout::Classic => "classic",
            Layout::SideBySide => "side-by-side",
            Layout::Bordered => "bordered",
            Layout::Sidebar => "sidebar",
            Layout::Magazine => "magazine",
        }
    }

    /// Human label shown in the selector.
    pub fn label(self) -> &'static str {
        match self {
            Layout::Classic => "Classic",
            Layout::SideBySide => "Side by Side",
            Layout::Bordered => "Bordered",
            Layout::Sidebar => "Sidebar",
            Layout::Magazine => "Magazine",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layout {
    type Err = NewsprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_choice(s);
        let layout = match key.as_str() {
            "classic" | "layout1" => Layout::Classic,
            "side-by-side" | "sidebyside" | "layout2" => Layout::SideBySide,
            "bordered" | "layout3" => Layout::Bordered,
            "sidebar" | "layout4" => Layout::Sidebar,
            "magazine" | "layout5" => Layout::Magazine,
            _ => {
                return Err(NewsprintError::validation(format!(
                    "unknown layout \"{s}\" (expected classic, side-by-side, bordered, sidebar or magazine)"
                )));
            }
        };
        Ok(layout)
    }
}

/// How the image is fitted into its box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageFit {
    /// Scale to fit entirely inside the box, preserving aspect ratio.
    #[default]
    Contain,
    /// Scale to cover the whole box, preserving aspect ratio; overflow is clipped.
    Cover,
    /// Stretch to exactly the box size.
    Fill,
    /// Like `Contain`, but never upscale.
    ScaleDown,
}

impl ImageFit {
    /// Every fit mode, in selector order.
    pub const ALL: [ImageFit; 4] = [
        ImageFit::Contain,
        ImageFit::Cover,
        ImageFit::Fill,
        ImageFit::ScaleDown,
    ];

    /// CSS `object-fit` keyword.
    pub fn name(self) -> &'static str {
        match self {
            ImageFit::Contain => "contain",
            ImageFit::Cover => "cover",
            ImageFit::Fill => "fill",
            ImageFit::ScaleDown => "scale-down",
        }
    }
}

impl fmt::Display for ImageFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImageFit {
    type Err = NewsprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_choice(s).as_str() {
            "contain" => Ok(ImageFit::Contain),
            "cover" => Ok(ImageFit::Cover),
            "fill" => Ok(ImageFit::Fill),
            "scale-down" | "scaledown" => Ok(ImageFit::ScaleDown),
            _ => Err(NewsprintError::validation(format!(
                "unknown image fit \"{s}\" (expected contain, cover, fill or scale-down)"
            ))),
        }
    }
}

fn normalize_choice(s: &str) -> String {
    s.trim()
        .to_ascii_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Inclusive numeric range declared by an input control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct NumericRange {
    /// Smallest value offered by the control.
    pub min: u32,
    /// Largest value offered by the control.
    pub max: u32,
}

impl NumericRange {
    /// Build a range.
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Return `true` when `v` lies within `[min, max]`.
    pub fn contains(self, v: u32) -> bool {
        self.min <= v && v <= self.max
    }
}

/// All user-editable content and style fields of one article.
///
/// Lives only for the duration of an editing session and is never read back from disk. Field
/// names serialize in camelCase.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    /// Headline text.
    pub heading: String,
    /// Headline font size in px.
    pub heading_size: u32,
    /// Headline color.
    pub heading_color: CssColor,

    /// Embedded article image, if one was loaded.
    pub image: Option<EmbeddedImage>,
    /// Image box height in px.
    pub image_height: u32,
    /// Image box width as a percentage of the available width.
    pub image_width_percent: u32,
    /// How the image fills its box.
    pub image_fit: ImageFit,

    /// Caption text.
    pub image_description: String,
    /// Caption font size in px.
    pub image_desc_size: u32,
    /// Caption color.
    pub image_desc_color: CssColor,

    /// Dateline text, e.g. "New York, Dec 7, 2025".
    pub place_and_date: String,
    /// Dateline font size in px.
    pub place_date_size: u32,
    /// Dateline color.
    pub place_date_color: CssColor,

    /// Body text. Line breaks are preserved.
    pub main_content: String,
    /// Body font size in px.
    pub content_size: u32,
    /// Body color.
    pub content_color: CssColor,

    /// Page background.
    pub background_color: CssColor,
    /// Selected template.
    pub layout: Layout,
}

impl Default for Composition {
    fn default() -> Self {
        Self {
            heading: String::new(),
            heading_size: 32,
            heading_color: CssColor::new("#000000"),
            image: None,
            image_height: 400,
            image_width_percent: 100,
            image_fit: ImageFit::Contain,
            image_description: String::new(),
            image_desc_size: 14,
            image_desc_color: CssColor::new("#666666"),
            place_and_date: String::new(),
            place_date_size: 16,
            place_date_color: CssColor::new("#000000"),
            main_content: String::new(),
            content_size: 16,
            content_color: CssColor::new("#000000"),
            background_color: CssColor::new("#ffffff"),
            layout: Layout::Classic,
        }
    }
}

impl Composition {
    /// Pretty JSON view of the live state, for display.
    pub fn to_json_pretty(&self) -> NewsprintResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| NewsprintError::serde(format!("serialize composition: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/state.rs"]
mod tests;
