use crate::foundation::core::Rgba8;
use crate::foundation::error::{NewsprintError, NewsprintResult};
use crate::render::tree::{Span, Style, TextAlign};
use std::borrow::Cow;

const GENERIC_FAMILY: &str = "sans-serif";
const NORMAL_LINE_HEIGHT: f32 = 1.2;
const NORMAL_WEIGHT: u16 = 400;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Vertical extent of one laid-out line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LineBox {
    pub(crate) top: f32,
    pub(crate) bottom: f32,
}

/// Stateful helper for building Parley text layouts.
///
/// Uses system fonts, optionally preceded by one registered font family.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    preferred_family: Option<String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            preferred_family: None,
        }
    }

    /// Register font bytes and prefer their family over the system default.
    pub(crate) fn register_font(&mut self, font_bytes: Vec<u8>) -> NewsprintResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            NewsprintError::validation("no font families registered from font bytes")
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| NewsprintError::validation("registered font family has no name"))?
            .to_string();
        self.preferred_family = Some(family_name.clone());
        Ok(family_name)
    }

    /// Family registered through [`Self::register_font`], if any.
    pub(crate) fn preferred_family(&self) -> Option<&str> {
        self.preferred_family.as_deref()
    }

    /// Shape and lay out a paragraph of spans.
    ///
    /// `style` supplies the paragraph defaults (size, weight, italics, tracking, line height,
    /// alignment, case mapping); spans override size, weight and color for their range. Colors
    /// must already be resolved; unresolved ones fall back to the paragraph color.
    pub(crate) fn layout_paragraph(
        &mut self,
        spans: &[Span],
        style: &Style,
        max_width_px: Option<f32>,
    ) -> NewsprintResult<parley::Layout<TextBrushRgba8>> {
        let size_px = style.font_size.unwrap_or(16.0);
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(NewsprintError::render(
                "text size_px must be finite and > 0",
            ));
        }
        let paragraph_color = style
            .color
            .as_ref()
            .and_then(|c| c.resolved())
            .unwrap_or(Rgba8::BLACK);

        let mut text = String::new();
        let mut ranges = Vec::with_capacity(spans.len());
        for span in spans {
            let start = text.len();
            text.push_str(&style.text_transform.apply(&span.text));
            ranges.push(start..text.len());
        }

        let stack = match &self.preferred_family {
            Some(family) => format!("\"{family}\", {GENERIC_FAMILY}"),
            None => GENERIC_FAMILY.to_string(),
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(stack)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::LineHeight(
            parley::style::LineHeight::FontSizeRelative(
                style.line_height.unwrap_or(NORMAL_LINE_HEIGHT),
            ),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(
                style.font_weight.unwrap_or(NORMAL_WEIGHT),
            )),
        ));
        if style.italic {
            builder.push_default(parley::style::StyleProperty::FontStyle(
                parley::style::FontStyle::Italic,
            ));
        }
        if style.letter_spacing_em != 0.0 {
            builder.push_default(parley::style::StyleProperty::LetterSpacing(
                style.letter_spacing_em * size_px,
            ));
        }
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            paragraph_color,
        )));

        for (span, range) in spans.iter().zip(ranges) {
            if range.is_empty() {
                continue;
            }
            if let Some(sz) = span.font_size {
                builder.push(parley::style::StyleProperty::FontSize(sz), range.clone());
            }
            if let Some(w) = span.font_weight {
                builder.push(
                    parley::style::StyleProperty::FontWeight(parley::style::FontWeight::new(
                        f32::from(w),
                    )),
                    range.clone(),
                );
            }
            if let Some(c) = span.color.as_ref().and_then(|c| c.resolved()) {
                builder.push(
                    parley::style::StyleProperty::Brush(TextBrushRgba8::from(c)),
                    range,
                );
            }
        }

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(&text);
        layout.break_all_lines(max_width_px);
        layout.align(
            max_width_px,
            alignment(style.text_align),
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }
}

fn alignment(a: TextAlign) -> parley::Alignment {
    match a {
        TextAlign::Start => parley::Alignment::Start,
        TextAlign::Center => parley::Alignment::Center,
        TextAlign::End => parley::Alignment::End,
        TextAlign::Justify => parley::Alignment::Justify,
    }
}

/// Vertical line extents of a laid-out paragraph, in layout order.
pub(crate) fn line_boxes(layout: &parley::Layout<TextBrushRgba8>) -> Vec<LineBox> {
    layout
        .lines()
        .map(|line| {
            let m = line.metrics();
            LineBox {
                top: m.min_coord,
                bottom: m.max_coord,
            }
        })
        .collect()
}

/// Split lines into at most `columns` balanced columns.
///
/// Returns the index of the first line of each column and the resulting column height.
pub(crate) fn balance_columns(lines: &[LineBox], columns: u16) -> (Vec<usize>, f32) {
    let Some(last) = lines.last() else {
        return (vec![0], 0.0);
    };
    let total = last.bottom - lines[0].top;
    if columns <= 1 || lines.len() == 1 {
        return (vec![0], total);
    }

    let step = lines
        .iter()
        .map(|l| l.bottom - l.top)
        .fold(f32::INFINITY, f32::min)
        .max(1.0);
    let mut target = total / f32::from(columns);
    loop {
        let starts = split_at_height(lines, columns as usize, target);
        let height = tallest_column(lines, &starts);
        if height <= target + 0.01 || target >= total {
            return (starts, height);
        }
        target += step;
    }
}

fn split_at_height(lines: &[LineBox], columns: usize, target: f32) -> Vec<usize> {
    let mut starts = vec![0usize];
    let mut col_top = lines[0].top;
    for (i, line) in lines.iter().enumerate().skip(1) {
        if line.bottom - col_top > target + 0.01 && starts.len() < columns {
            starts.push(i);
            col_top = line.top;
        }
    }
    starts
}

fn tallest_column(lines: &[LineBox], starts: &[usize]) -> f32 {
    let mut tallest = 0.0f32;
    for (c, &start) in starts.iter().enumerate() {
        let end = starts.get(c + 1).copied().unwrap_or(lines.len());
        if end > start {
            tallest = tallest.max(lines[end - 1].bottom - lines[start].top);
        }
    }
    tallest
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
