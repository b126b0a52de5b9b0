use crate::assets::image_loader::{EmbeddedImage, ImagePixels};
use crate::foundation::core::{Affine, Bitmap};
use crate::foundation::error::{NewsprintError, NewsprintResult};
use crate::render::layout::{LayoutResult, RectPx, ShapedText};
use crate::render::tree::{ColorValue, Content, Node, Style};
use crate::scene::state::ImageFit;
use std::collections::HashMap;
use std::sync::Arc;
use vello_cpu::kurbo::Shape as _;

/// Options for the CPU rasterizer.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CpuRasterOpts {
    /// Device pixels per CSS pixel.
    pub(crate) scale: f32,
}

/// Map image space onto an `bw`x`bh` box for an `iw`x`ih` image, centered per CSS `object-fit`.
pub(crate) fn fit_image(fit: ImageFit, iw: f64, ih: f64, bw: f64, bh: f64) -> Affine {
    if iw <= 0.0 || ih <= 0.0 {
        return Affine::scale(0.0);
    }
    let (sx, sy) = match fit {
        ImageFit::Fill => (bw / iw, bh / ih),
        ImageFit::Contain => {
            let s = (bw / iw).min(bh / ih);
            (s, s)
        }
        ImageFit::Cover => {
            let s = (bw / iw).max(bh / ih);
            (s, s)
        }
        ImageFit::ScaleDown => {
            let s = (bw / iw).min(bh / ih).min(1.0);
            (s, s)
        }
    };
    Affine::translate(((bw - iw * sx) / 2.0, (bh - ih * sy) / 2.0)) * Affine::scale_non_uniform(sx, sy)
}

/// Paints a laid-out visual tree with `vello_cpu`.
///
/// Every color must be resolved beforehand; an unresolved one is refused rather than guessed at.
pub(crate) struct CpuRasterizer {
    opts: CpuRasterOpts,
    images: HashMap<String, (vello_cpu::Image, u32, u32)>,
    fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

impl CpuRasterizer {
    pub(crate) fn new(opts: CpuRasterOpts) -> Self {
        Self {
            opts,
            images: HashMap::new(),
            fonts: HashMap::new(),
        }
    }

    /// Rasterize `root` using the boxes in `layout`. Returns premultiplied RGBA8.
    #[tracing::instrument(level = "debug", skip_all, fields(scale = self.opts.scale))]
    pub(crate) fn rasterize(&mut self, root: &Node, layout: &LayoutResult) -> NewsprintResult<Bitmap> {
        let scale = self.opts.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(NewsprintError::render("raster scale must be finite and > 0"));
        }
        let width = device_px(layout.width, scale)?;
        let height = device_px(layout.height, scale)?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        let base = vello_cpu::kurbo::Affine::scale(f64::from(scale));
        let mut next = 0usize;
        self.paint_node(&mut ctx, root, layout, base, &mut next)?;

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        tracing::debug!(width, height, nodes = next, "rasterized");
        Ok(Bitmap {
            width: u32::from(width),
            height: u32::from(height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn paint_node(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        node: &Node,
        layout: &LayoutResult,
        base: vello_cpu::kurbo::Affine,
        next: &mut usize,
    ) -> NewsprintResult<()> {
        let idx = *next;
        *next += 1;
        let rect = layout
            .rects
            .get(idx)
            .copied()
            .ok_or_else(|| NewsprintError::render("layout does not match visual tree"))?;
        let s = &node.style;

        ctx.set_transform(base);
        let rounded = s.radius_top > 0.0 || s.radius_bottom > 0.0;
        if rounded {
            ctx.push_clip_layer(&rounded_path(rect, s));
        }
        if let Some(bg) = &s.background {
            ctx.set_paint(paint_color(bg)?);
            ctx.fill_rect(&to_cpu_rect(rect));
        }
        paint_borders(ctx, rect, s)?;
        if rounded {
            ctx.pop_layer();
        }

        let content = content_box(rect, s);
        match &node.content {
            Content::None => {}
            Content::Image(embedded) => self.paint_image(ctx, embedded, content, s, base)?,
            Content::Text(_) => {
                let shaped = layout
                    .texts
                    .get(idx)
                    .and_then(Option::as_ref)
                    .ok_or_else(|| NewsprintError::render("text node was not shaped"))?;
                self.paint_text(ctx, shaped, content, base);
            }
        }

        for c in &node.children {
            self.paint_node(ctx, c, layout, base, next)?;
        }
        Ok(())
    }

    fn paint_image(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        embedded: &EmbeddedImage,
        content: RectPx,
        s: &Style,
        base: vello_cpu::kurbo::Affine,
    ) -> NewsprintResult<()> {
        if content.w <= 0.0 || content.h <= 0.0 {
            return Ok(());
        }

        let (paint, w, h) = match self.images.get(embedded.data_url()) {
            Some(cached) => cached.clone(),
            None => {
                let pixels = embedded.decode_premul()?;
                let entry = (pixels_to_image(&pixels)?, pixels.width, pixels.height);
                self.images
                    .insert(embedded.data_url().to_string(), entry.clone());
                entry
            }
        };

        let placement = fit_image(
            s.object_fit,
            f64::from(w),
            f64::from(h),
            f64::from(content.w),
            f64::from(content.h),
        );

        ctx.set_transform(base);
        ctx.push_clip_layer(&rounded_path(content, s));
        let to_box = Affine::translate((f64::from(content.x), f64::from(content.y))) * placement;
        ctx.set_transform(base * affine_to_cpu(to_box));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(w),
            f64::from(h),
        ));
        ctx.set_transform(base);
        ctx.pop_layer();
        Ok(())
    }

    fn paint_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        shaped: &ShapedText,
        content: RectPx,
        base: vello_cpu::kurbo::Affine,
    ) {
        let first_top = shaped.lines.first().map(|l| l.top).unwrap_or(0.0);
        for (li, line) in shaped.layout.lines().enumerate() {
            let col = shaped.column_of(li);
            let col_top = shaped
                .column_starts
                .get(col)
                .and_then(|&start| shaped.lines.get(start))
                .map(|l| l.top)
                .unwrap_or(first_top);
            let dx = col as f32 * (shaped.column_width + shaped.column_gap);
            let dy = first_top - col_top;
            ctx.set_transform(
                base * vello_cpu::kurbo::Affine::translate((
                    f64::from(content.x + dx),
                    f64::from(content.y + dy),
                )),
            );

            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let font_ref = run.run().font();
                let font = self.font_for(font_ref.data.id(), font_ref.index, font_ref.data.data());
                // Positioned glyphs carry the run offset and the line baseline.
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    fn font_for(&mut self, blob_id: u64, index: u32, bytes: &[u8]) -> vello_cpu::peniko::FontData {
        self.fonts
            .entry((blob_id, index))
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes.to_vec()), index)
            })
            .clone()
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn device_px(css_px: f32, scale: f32) -> NewsprintResult<u16> {
    let px = (css_px * scale).ceil().max(1.0);
    if px > f32::from(u16::MAX) {
        return Err(NewsprintError::render(format!(
            "raster size {px}px exceeds the renderer limit"
        )));
    }
    Ok(px as u16)
}

fn paint_color(c: &ColorValue) -> NewsprintResult<vello_cpu::peniko::Color> {
    let c = c
        .resolved()
        .ok_or_else(|| NewsprintError::render("unresolved color reached the rasterizer"))?;
    Ok(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a))
}

fn to_cpu_rect(r: RectPx) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(
        f64::from(r.x),
        f64::from(r.y),
        f64::from(r.x + r.w),
        f64::from(r.y + r.h),
    )
}

fn rounded_path(r: RectPx, s: &Style) -> vello_cpu::kurbo::BezPath {
    let top = f64::from(s.radius_top);
    let bottom = f64::from(s.radius_bottom);
    vello_cpu::kurbo::RoundedRect::from_rect(
        to_cpu_rect(r),
        vello_cpu::kurbo::RoundedRectRadii::new(top, top, bottom, bottom),
    )
    .to_path(0.1)
}

fn content_box(rect: RectPx, s: &Style) -> RectPx {
    rect.inset(
        s.padding.top + s.border_width.top,
        s.padding.right + s.border_width.right,
        s.padding.bottom + s.border_width.bottom,
        s.padding.left + s.border_width.left,
    )
}

fn paint_borders(
    ctx: &mut vello_cpu::RenderContext,
    r: RectPx,
    s: &Style,
) -> NewsprintResult<()> {
    let bw = &s.border_width;
    let bc = &s.border_color;
    let sides = [
        (bw.top, &bc.top, RectPx { h: bw.top, ..r }),
        (
            bw.right,
            &bc.right,
            RectPx {
                x: r.x + r.w - bw.right,
                w: bw.right,
                ..r
            },
        ),
        (
            bw.bottom,
            &bc.bottom,
            RectPx {
                y: r.y + r.h - bw.bottom,
                h: bw.bottom,
                ..r
            },
        ),
        (bw.left, &bc.left, RectPx { w: bw.left, ..r }),
    ];
    for (width, color, strip) in sides {
        if width <= 0.0 {
            continue;
        }
        let color = color
            .as_ref()
            .ok_or_else(|| NewsprintError::render("border side has no color"))?;
        ctx.set_paint(paint_color(color)?);
        ctx.fill_rect(&to_cpu_rect(strip));
    }
    Ok(())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> NewsprintResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| NewsprintError::image("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| NewsprintError::image("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(NewsprintError::image("image byte len mismatch"));
    }
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in bytes.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        });
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn pixels_to_image(img: &ImagePixels) -> NewsprintResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
