use crate::assets::color::CssColor;
use crate::assets::image_loader::{EmbeddedImage, load_image};
use crate::editor::field::{Field, parse_number};
use crate::export::exporter::Exporter;
use crate::export::sink::{Artifact, ArtifactSink};
use crate::foundation::error::{NewsprintError, NewsprintResult};
use crate::render::templates::render;
use crate::render::tree::Node;
use crate::scene::state::{Composition, ImageFit, Layout};
use std::path::Path;

/// One editing session: the composition plus its always-current preview.
///
/// Every setter overwrites exactly one field and re-renders before returning, so
/// [`EditorSession::preview`] never lags behind [`EditorSession::state`].
#[derive(Debug, Clone)]
pub struct EditorSession {
    state: Composition,
    preview: Node,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// Start from the default composition.
    pub fn new() -> Self {
        Self::from_state(Composition::default())
    }

    /// Start from an existing composition.
    pub fn from_state(state: Composition) -> Self {
        let preview = render(&state);
        Self { state, preview }
    }

    /// Current composition.
    pub fn state(&self) -> &Composition {
        &self.state
    }

    /// Current preview tree.
    pub fn preview(&self) -> &Node {
        &self.preview
    }

    /// Textual rendering of the preview.
    pub fn outline(&self) -> String {
        self.preview.outline()
    }

    fn update(&mut self, f: impl FnOnce(&mut Composition)) {
        f(&mut self.state);
        self.preview = render(&self.state);
    }

    fn update_number(&mut self, field: Field, v: u32, f: impl FnOnce(&mut Composition, u32)) {
        if let Some(range) = field.range()
            && !range.contains(v)
        {
            tracing::warn!(
                field = field.name(),
                value = v,
                min = range.min,
                max = range.max,
                "value outside the declared range; applying as typed"
            );
        }
        self.update(|c| f(c, v));
    }

    fn update_color(&mut self, field: Field, v: CssColor, f: impl FnOnce(&mut Composition, CssColor)) {
        if !v.is_valid() {
            tracing::warn!(field = field.name(), value = %v, "unparseable color");
        }
        self.update(|c| f(c, v));
    }

    /// Set the headline.
    pub fn set_heading(&mut self, v: impl Into<String>) {
        let v = v.into();
        self.update(|c| c.heading = v);
    }

    /// Set the headline size in px.
    pub fn set_heading_size(&mut self, v: u32) {
        self.update_number(Field::HeadingSize, v, |c, v| c.heading_size = v);
    }

    /// Set the headline color.
    pub fn set_heading_color(&mut self, v: impl Into<CssColor>) {
        self.update_color(Field::HeadingColor, v.into(), |c, v| c.heading_color = v);
    }

    /// Replace (or clear) the image.
    pub fn set_image(&mut self, v: Option<EmbeddedImage>) {
        self.update(|c| c.image = v);
    }

    /// Set the image box height in px.
    pub fn set_image_height(&mut self, v: u32) {
        self.update_number(Field::ImageHeight, v, |c, v| c.image_height = v);
    }

    /// Set the image box width in percent.
    pub fn set_image_width_percent(&mut self, v: u32) {
        self.update_number(Field::ImageWidthPercent, v, |c, v| c.image_width_percent = v);
    }

    /// Set the image fitting mode.
    pub fn set_image_fit(&mut self, v: ImageFit) {
        self.update(|c| c.image_fit = v);
    }

    /// Set the caption.
    pub fn set_image_description(&mut self, v: impl Into<String>) {
        let v = v.into();
        self.update(|c| c.image_description = v);
    }

    /// Set the caption size in px.
    pub fn set_image_desc_size(&mut self, v: u32) {
        self.update_number(Field::ImageDescSize, v, |c, v| c.image_desc_size = v);
    }

    /// Set the caption color.
    pub fn set_image_desc_color(&mut self, v: impl Into<CssColor>) {
        self.update_color(Field::ImageDescColor, v.into(), |c, v| c.image_desc_color = v);
    }

    /// Set the dateline.
    pub fn set_place_and_date(&mut self, v: impl Into<String>) {
        let v = v.into();
        self.update(|c| c.place_and_date = v);
    }

    /// Set the dateline size in px.
    pub fn set_place_date_size(&mut self, v: u32) {
        self.update_number(Field::PlaceDateSize, v, |c, v| c.place_date_size = v);
    }

    /// Set the dateline color.
    pub fn set_place_date_color(&mut self, v: impl Into<CssColor>) {
        self.update_color(Field::PlaceDateColor, v.into(), |c, v| c.place_date_color = v);
    }

    /// Set the body text.
    pub fn set_main_content(&mut self, v: impl Into<String>) {
        let v = v.into();
        self.update(|c| c.main_content = v);
    }

    /// Set the body size in px.
    pub fn set_content_size(&mut self, v: u32) {
        self.update_number(Field::ContentSize, v, |c, v| c.content_size = v);
    }

    /// Set the body color.
    pub fn set_content_color(&mut self, v: impl Into<CssColor>) {
        self.update_color(Field::ContentColor, v.into(), |c, v| c.content_color = v);
    }

    /// Set the page background color.
    pub fn set_background_color(&mut self, v: impl Into<CssColor>) {
        self.update_color(Field::BackgroundColor, v.into(), |c, v| c.background_color = v);
    }

    /// Switch template. Field values, including the image, are kept.
    pub fn set_layout(&mut self, v: Layout) {
        self.update(|c| c.layout = v);
    }

    /// Apply raw editor input to `field`.
    ///
    /// Text is stored verbatim. Numeric input that is not a number, or is negative, is rejected
    /// and leaves the session untouched.
    #[tracing::instrument(level = "debug", skip_all, fields(field = %field))]
    pub fn apply(&mut self, field: Field, raw: &str) -> NewsprintResult<()> {
        match field {
            Field::Heading => self.set_heading(raw),
            Field::HeadingSize => self.set_heading_size(parse_number(field, raw)?),
            Field::HeadingColor => self.set_heading_color(raw.trim()),
            Field::ImageHeight => self.set_image_height(parse_number(field, raw)?),
            Field::ImageWidthPercent => self.set_image_width_percent(parse_number(field, raw)?),
            Field::ImageFit => self.set_image_fit(raw.parse()?),
            Field::ImageDescription => self.set_image_description(raw),
            Field::ImageDescSize => self.set_image_desc_size(parse_number(field, raw)?),
            Field::ImageDescColor => self.set_image_desc_color(raw.trim()),
            Field::PlaceAndDate => self.set_place_and_date(raw),
            Field::PlaceDateSize => self.set_place_date_size(parse_number(field, raw)?),
            Field::PlaceDateColor => self.set_place_date_color(raw.trim()),
            Field::MainContent => self.set_main_content(raw),
            Field::ContentSize => self.set_content_size(parse_number(field, raw)?),
            Field::ContentColor => self.set_content_color(raw.trim()),
            Field::BackgroundColor => self.set_background_color(raw.trim()),
            Field::Layout => self.set_layout(raw.parse()?),
        }
        Ok(())
    }

    /// Apply a `field=value` assignment (the value may itself contain `=`).
    pub fn apply_assignment(&mut self, assignment: &str) -> NewsprintResult<()> {
        let (name, raw) = assignment.split_once('=').ok_or_else(|| {
            NewsprintError::validation(format!(
                "expected FIELD=VALUE, got \"{assignment}\""
            ))
        })?;
        let field: Field = name.parse()?;
        self.apply(field, raw)
    }

    /// Load the selected file as the article image. No selection leaves the session unchanged.
    ///
    /// Returns `true` when an image was loaded.
    pub fn load_image(&mut self, selection: Option<&Path>) -> NewsprintResult<bool> {
        match load_image(selection)? {
            Some(img) => {
                self.set_image(Some(img));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Export the current preview through `exporter` into `sink`.
    ///
    /// The session is only read; a failed export leaves it exactly as it was.
    pub fn export(
        &self,
        exporter: &mut Exporter,
        sink: &mut dyn ArtifactSink,
    ) -> NewsprintResult<Artifact> {
        exporter.export(&self.preview, &self.state.background_color, sink)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/session.rs"]
mod tests;
