use crate::foundation::error::{NewsprintError, NewsprintResult};
use crate::scene::state::{Composition, NumericRange};
use std::fmt;
use std::str::FromStr;

/// Declared range of the headline size control.
pub const HEADING_SIZE_RANGE: NumericRange = NumericRange::new(12, 72);
/// Declared range of the caption size control.
pub const IMAGE_DESC_SIZE_RANGE: NumericRange = NumericRange::new(10, 24);
/// Declared range of the dateline size control.
pub const PLACE_DATE_SIZE_RANGE: NumericRange = NumericRange::new(10, 32);
/// Declared range of the body size control.
pub const CONTENT_SIZE_RANGE: NumericRange = NumericRange::new(12, 32);
/// Declared range of the image height control.
pub const IMAGE_HEIGHT_RANGE: NumericRange = NumericRange::new(100, 800);
/// Declared range of the image width control.
pub const IMAGE_WIDTH_PERCENT_RANGE: NumericRange = NumericRange::new(20, 100);

/// Input kind of a field editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text; stored verbatim.
    Text,
    /// Whole number.
    Number,
    /// CSS color text.
    Color,
    /// One of a fixed set of options.
    Choice,
}

/// An editable composition field. The image has its own loader and is not listed here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// Headline text.
    Heading,
    /// Headline size in px.
    HeadingSize,
    /// Headline color.
    HeadingColor,
    /// Image box height in px.
    ImageHeight,
    /// Image box width in percent.
    ImageWidthPercent,
    /// Image fitting mode.
    ImageFit,
    /// Caption text.
    ImageDescription,
    /// Caption size in px.
    ImageDescSize,
    /// Caption color.
    ImageDescColor,
    /// Dateline text.
    PlaceAndDate,
    /// Dateline size in px.
    PlaceDateSize,
    /// Dateline color.
    PlaceDateColor,
    /// Body text.
    MainContent,
    /// Body size in px.
    ContentSize,
    /// Body color.
    ContentColor,
    /// Page background color.
    BackgroundColor,
    /// Selected template.
    Layout,
}

impl Field {
    /// Every field, in editor panel order.
    pub const ALL: [Field; 17] = [
        Field::Heading,
        Field::HeadingSize,
        Field::HeadingColor,
        Field::ImageHeight,
        Field::ImageWidthPercent,
        Field::ImageFit,
        Field::ImageDescription,
        Field::ImageDescSize,
        Field::ImageDescColor,
        Field::PlaceAndDate,
        Field::PlaceDateSize,
        Field::PlaceDateColor,
        Field::MainContent,
        Field::ContentSize,
        Field::ContentColor,
        Field::BackgroundColor,
        Field::Layout,
    ];

    /// camelCase name, matching the serialized state.
    pub fn name(self) -> &'static str {
        match self {
            Field::Heading => "heading",
            Field::HeadingSize => "headingSize",
            Field::HeadingColor => "headingColor",
            Field::ImageHeight => "imageHeight",
            Field::ImageWidthPercent => "imageWidthPercent",
            Field::ImageFit => "imageFit",
            Field::ImageDescription => "imageDescription",
            Field::ImageDescSize => "imageDescSize",
            Field::ImageDescColor => "imageDescColor",
            Field::PlaceAndDate => "placeAndDate",
            Field::PlaceDateSize => "placeDateSize",
            Field::PlaceDateColor => "placeDateColor",
            Field::MainContent => "mainContent",
            Field::ContentSize => "contentSize",
            Field::ContentColor => "contentColor",
            Field::BackgroundColor => "backgroundColor",
            Field::Layout => "layout",
        }
    }

    /// Input kind.
    pub fn kind(self) -> FieldKind {
        match self {
            Field::Heading | Field::ImageDescription | Field::PlaceAndDate | Field::MainContent => {
                FieldKind::Text
            }
            Field::HeadingSize
            | Field::ImageHeight
            | Field::ImageWidthPercent
            | Field::ImageDescSize
            | Field::PlaceDateSize
            | Field::ContentSize => FieldKind::Number,
            Field::HeadingColor
            | Field::ImageDescColor
            | Field::PlaceDateColor
            | Field::ContentColor
            | Field::BackgroundColor => FieldKind::Color,
            Field::ImageFit | Field::Layout => FieldKind::Choice,
        }
    }

    /// Declared range for numeric fields. Advisory only: values outside it are still accepted.
    pub fn range(self) -> Option<NumericRange> {
        match self {
            Field::HeadingSize => Some(HEADING_SIZE_RANGE),
            Field::ImageDescSize => Some(IMAGE_DESC_SIZE_RANGE),
            Field::PlaceDateSize => Some(PLACE_DATE_SIZE_RANGE),
            Field::ContentSize => Some(CONTENT_SIZE_RANGE),
            Field::ImageHeight => Some(IMAGE_HEIGHT_RANGE),
            Field::ImageWidthPercent => Some(IMAGE_WIDTH_PERCENT_RANGE),
            _ => None,
        }
    }

    /// Current value of this field in `comp`, as an editor would display it.
    pub fn value_in(self, comp: &Composition) -> String {
        match self {
            Field::Heading => comp.heading.clone(),
            Field::HeadingSize => comp.heading_size.to_string(),
            Field::HeadingColor => comp.heading_color.to_string(),
            Field::ImageHeight => comp.image_height.to_string(),
            Field::ImageWidthPercent => comp.image_width_percent.to_string(),
            Field::ImageFit => comp.image_fit.name().to_string(),
            Field::ImageDescription => comp.image_description.clone(),
            Field::ImageDescSize => comp.image_desc_size.to_string(),
            Field::ImageDescColor => comp.image_desc_color.to_string(),
            Field::PlaceAndDate => comp.place_and_date.clone(),
            Field::PlaceDateSize => comp.place_date_size.to_string(),
            Field::PlaceDateColor => comp.place_date_color.to_string(),
            Field::MainContent => comp.main_content.clone(),
            Field::ContentSize => comp.content_size.to_string(),
            Field::ContentColor => comp.content_color.to_string(),
            Field::BackgroundColor => comp.background_color.to_string(),
            Field::Layout => comp.layout.name().to_string(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = NewsprintError;

    /// Accepts camelCase, kebab-case and snake_case names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Field::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(&key))
            .ok_or_else(|| NewsprintError::validation(format!("unknown field \"{s}\"")))
    }
}

/// Parse numeric input the way a number control reports it: leading integer part.
///
/// Out-of-range values are returned as typed, but every numeric field is a pixel or percent
/// count, so a negative value has no representation and is rejected with its own message.
pub(crate) fn parse_number(field: Field, raw: &str) -> NewsprintResult<u32> {
    let t = raw.trim();
    if let Ok(v) = t.parse::<u32>() {
        return Ok(v);
    }
    match t.parse::<f64>() {
        Ok(v) if v.is_finite() && v < 0.0 && v.trunc() != 0.0 => Err(NewsprintError::validation(
            format!("{field} below 0 is not representable, got \"{raw}\""),
        )),
        Ok(v) if v.is_finite() && v > -1.0 && v <= f64::from(u32::MAX) => Ok(v.trunc() as u32),
        _ => Err(NewsprintError::validation(format!(
            "{field} expects a number, got \"{raw}\""
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/field.rs"]
mod tests;
