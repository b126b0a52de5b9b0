use crate::assets::color::CssColor;
use crate::export::sink::{Artifact, ArtifactSink, JPEG_MIME};
use crate::foundation::core::{Bitmap, Rgba8};
use crate::foundation::error::{NewsprintError, NewsprintResult};
use crate::render::cpu::{CpuRasterOpts, CpuRasterizer};
use crate::render::layout::compute_layout;
use crate::render::resolve::{force_root_background, is_fully_resolved, resolve_effective_styles};
use crate::render::text::TextLayoutEngine;
use crate::render::tree::Node;
use anyhow::Context as _;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const FILE_PREFIX: &str = "newspaper-article-";
const FILE_EXT: &str = "jpeg";

/// Options for [`Exporter`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOpts {
    pub(crate) scale: f32,
    pub(crate) jpeg_quality: u8,
    pub(crate) viewport_width: f32,
    pub(crate) font_path: Option<PathBuf>,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            scale: 2.0,
            jpeg_quality: 95,
            viewport_width: 800.0,
            font_path: None,
        }
    }
}

impl ExportOpts {
    /// Device pixels per CSS pixel (default 2).
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// JPEG quality, 1..=100 (default 95).
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Width of the preview column in CSS pixels (default 800).
    pub fn with_viewport_width(mut self, width: f32) -> Self {
        self.viewport_width = width;
        self
    }

    /// Extra font file preferred over system fonts.
    pub fn with_font_path(mut self, path: Option<PathBuf>) -> Self {
        self.font_path = path;
        self
    }

    /// Configured scale.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Configured JPEG quality.
    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// Configured viewport width.
    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }
}

/// Source of wall-clock time for artifact names.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_unix_ms(&self) -> u64;
}

/// [`Clock`] backed by [`SystemTime`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Turns preview trees into JPEG artifacts.
///
/// Each export works on a clone of the given tree; the caller's preview is never modified.
pub struct Exporter {
    opts: ExportOpts,
    engine: TextLayoutEngine,
    clock: Box<dyn Clock>,
    last_stamp_ms: Option<u64>,
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("opts", &self.opts)
            .field("font_family", &self.engine.preferred_family())
            .field("last_stamp_ms", &self.last_stamp_ms)
            .finish()
    }
}

impl Exporter {
    /// Create an exporter. Registers `opts.font_path` when set.
    pub fn new(opts: ExportOpts) -> NewsprintResult<Self> {
        if !(1..=100).contains(&opts.jpeg_quality) {
            return Err(NewsprintError::validation(format!(
                "jpeg quality must be in 1..=100, got {}",
                opts.jpeg_quality
            )));
        }
        let mut engine = TextLayoutEngine::new();
        if let Some(path) = &opts.font_path {
            let family = register_font_file(&mut engine, path)?;
            tracing::debug!(family, path = %path.display(), "registered export font");
        }
        Ok(Self {
            opts,
            engine,
            clock: Box::new(SystemClock),
            last_stamp_ms: None,
        })
    }

    /// Replace the clock used for artifact names.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Options in effect.
    pub fn opts(&self) -> &ExportOpts {
        &self.opts
    }

    /// Resolve, lay out and rasterize a snapshot of `preview` over an opaque `background`.
    #[tracing::instrument(level = "debug", skip_all, fields(background = %background))]
    pub fn rasterize(&mut self, preview: &Node, background: &CssColor) -> NewsprintResult<Bitmap> {
        let bg = background
            .parse()
            .map_err(|e| NewsprintError::render(format!("background color: {e}")))?
            .opaque();

        let mut tree = preview.clone();
        let pinned = resolve_effective_styles(&mut tree);
        force_root_background(&mut tree, bg);
        if !is_fully_resolved(&tree) {
            return Err(NewsprintError::render(
                "visual tree still has unresolved colors after resolution",
            ));
        }
        tracing::debug!(pinned, nodes = tree.node_count(), "styles resolved");

        let layout = compute_layout(&tree, self.opts.viewport_width, &mut self.engine)?;
        CpuRasterizer::new(CpuRasterOpts {
            scale: self.opts.scale,
        })
        .rasterize(&tree, &layout)
    }

    /// Produce the JPEG bytes for `preview` without naming or delivering them.
    pub fn render_jpeg(&mut self, preview: &Node, background: &CssColor) -> NewsprintResult<Vec<u8>> {
        let bitmap = self.rasterize(preview, background)?;
        let backdrop = background.parse()?.opaque();
        encode_jpeg(&bitmap, backdrop, self.opts.jpeg_quality)
    }

    /// Export `preview` and deliver the artifact to `sink`.
    ///
    /// On any failure nothing is delivered.
    #[tracing::instrument(level = "info", skip_all)]
    pub fn export(
        &mut self,
        preview: &Node,
        background: &CssColor,
        sink: &mut dyn ArtifactSink,
    ) -> NewsprintResult<Artifact> {
        let bytes = self.render_jpeg(preview, background)?;
        let artifact = Artifact {
            file_name: self.next_file_name(),
            mime: JPEG_MIME,
            bytes,
        };
        sink.deliver(&artifact)?;
        tracing::info!(file = %artifact.file_name, bytes = artifact.bytes.len(), "exported");
        Ok(artifact)
    }

    fn next_file_name(&mut self) -> String {
        let now = self.clock.now_unix_ms();
        let stamp = match self.last_stamp_ms {
            Some(last) if now <= last => last + 1,
            _ => now,
        };
        self.last_stamp_ms = Some(stamp);
        artifact_file_name(stamp)
    }
}

/// `newspaper-article-<unix-ms>.jpeg`.
pub fn artifact_file_name(unix_ms: u64) -> String {
    format!("{FILE_PREFIX}{unix_ms}.{FILE_EXT}")
}

/// Flatten `bitmap` onto `backdrop` and encode it as a baseline JPEG.
pub fn encode_jpeg(bitmap: &Bitmap, backdrop: Rgba8, quality: u8) -> NewsprintResult<Vec<u8>> {
    if bitmap.width == 0 || bitmap.height == 0 {
        return Err(NewsprintError::encode("cannot encode an empty bitmap"));
    }
    let rgb = bitmap.to_rgb8_over(backdrop);
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality)
        .encode(
            &rgb,
            bitmap.width,
            bitmap.height,
            image::ExtendedColorType::Rgb8,
        )
        .context("encode jpeg")?;
    if out.is_empty() {
        return Err(NewsprintError::encode("jpeg encoder produced no data"));
    }
    Ok(out)
}

fn register_font_file(engine: &mut TextLayoutEngine, path: &Path) -> NewsprintResult<String> {
    let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
    engine.register_font(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/export/exporter.rs"]
mod tests;
