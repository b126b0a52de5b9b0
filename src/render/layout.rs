use crate::foundation::error::{NewsprintError, NewsprintResult};
use crate::render::text::{LineBox, TextBrushRgba8, TextLayoutEngine, balance_columns, line_boxes};
use crate::render::tree::{Content, Display, Justify, Length, Node, Span, Style};
use taffy::prelude::{AvailableSpace, NodeId, Rect, Size};
use taffy::style::{
    AlignItems, Dimension, FlexDirection, JustifyContent, LengthPercentage, LengthPercentageAuto,
};

/// Axis-aligned box in CSS pixels, relative to the preview root.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct RectPx {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) w: f32,
    pub(crate) h: f32,
}

impl RectPx {
    /// Shrink by per-side insets, clamping to zero size.
    pub(crate) fn inset(self, top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            x: self.x + left,
            y: self.y + top,
            w: (self.w - left - right).max(0.0),
            h: (self.h - top - bottom).max(0.0),
        }
    }
}

/// A paragraph shaped at its final width, split into columns.
pub(crate) struct ShapedText {
    pub(crate) layout: parley::Layout<TextBrushRgba8>,
    pub(crate) lines: Vec<LineBox>,
    /// First line index of each column.
    pub(crate) column_starts: Vec<usize>,
    pub(crate) column_width: f32,
    pub(crate) column_gap: f32,
}

impl ShapedText {
    /// Column index of `line`.
    pub(crate) fn column_of(&self, line: usize) -> usize {
        self.column_starts
            .iter()
            .rposition(|&start| start <= line)
            .unwrap_or(0)
    }
}

/// Laid-out visual tree. Entries are indexed in pre-order, matching [`Node::walk`].
pub(crate) struct LayoutResult {
    pub(crate) rects: Vec<RectPx>,
    pub(crate) texts: Vec<Option<ShapedText>>,
    pub(crate) width: f32,
    pub(crate) height: f32,
}

#[derive(Debug, Clone, Copy)]
struct LayoutNodeCtx {
    node: usize,
}

/// Lay out `root` at `viewport_width` CSS pixels.
///
/// The root's height grows with its content (never below its declared minimum).
#[tracing::instrument(level = "debug", skip_all, fields(viewport_width = viewport_width))]
pub(crate) fn compute_layout(
    root: &Node,
    viewport_width: f32,
    engine: &mut TextLayoutEngine,
) -> NewsprintResult<LayoutResult> {
    if !viewport_width.is_finite() || viewport_width <= 0.0 {
        return Err(NewsprintError::render("viewport width must be finite and > 0"));
    }

    let mut nodes = Vec::<&Node>::new();
    root.walk(&mut |n, _| nodes.push(n));

    let mut taffy = taffy::TaffyTree::<LayoutNodeCtx>::new();
    let mut node_to_taffy = vec![None; nodes.len()];
    let mut next = 0usize;
    let taffy_root = build_subtree(&mut taffy, root, &mut next, &mut node_to_taffy)
        .map_err(taffy_err)?;

    let mut root_style = taffy.style(taffy_root).map_err(taffy_err)?.clone();
    root_style.size.width = Dimension::length(viewport_width);
    taffy.set_style(taffy_root, root_style).map_err(taffy_err)?;

    let mut measure_err: Option<NewsprintError> = None;
    taffy
        .compute_layout_with_measure(
            taffy_root,
            Size {
                width: AvailableSpace::Definite(viewport_width),
                height: AvailableSpace::MaxContent,
            },
            |known, available, _node_id, node_context, _style| {
                let Some(ctx) = node_context else {
                    return Size::ZERO;
                };
                let node = nodes[ctx.node];
                match measure_node(node, known, available, engine) {
                    Ok(sz) => sz,
                    Err(e) => {
                        measure_err.get_or_insert(e);
                        Size::ZERO
                    }
                }
            },
        )
        .map_err(taffy_err)?;
    if let Some(e) = measure_err {
        return Err(e);
    }

    let mut rects = vec![RectPx::default(); nodes.len()];
    place(&taffy, root, 0.0, 0.0, &mut 0, &node_to_taffy, &mut rects)?;

    let mut texts = Vec::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        let Content::Text(spans) = &node.content else {
            texts.push(None);
            continue;
        };
        let s = &node.style;
        let content = rects[i].inset(
            s.padding.top + s.border_width.top,
            s.padding.right + s.border_width.right,
            s.padding.bottom + s.border_width.bottom,
            s.padding.left + s.border_width.left,
        );
        texts.push(Some(shape_text(spans, s, content.w, engine)?));
    }

    let width = rects[0].w;
    let height = rects[0].h;
    tracing::debug!(nodes = nodes.len(), width, height, "layout computed");
    Ok(LayoutResult {
        rects,
        texts,
        width,
        height,
    })
}

fn taffy_err(e: taffy::TaffyError) -> NewsprintError {
    NewsprintError::render(format!("layout failed: {e}"))
}

fn build_subtree(
    taffy: &mut taffy::TaffyTree<LayoutNodeCtx>,
    node: &Node,
    next: &mut usize,
    node_to_taffy: &mut [Option<NodeId>],
) -> Result<NodeId, taffy::TaffyError> {
    let idx = *next;
    *next += 1;

    let mut children_ids = Vec::<NodeId>::with_capacity(node.children.len());
    for c in &node.children {
        children_ids.push(build_subtree(taffy, c, next, node_to_taffy)?);
    }

    let style = taffy_style(&node.style);
    let ctx = LayoutNodeCtx { node: idx };
    let nid = if children_ids.is_empty() {
        taffy.new_leaf_with_context(style, ctx)?
    } else {
        taffy.new_with_children(style, &children_ids)?
    };
    node_to_taffy[idx] = Some(nid);
    Ok(nid)
}

fn place(
    taffy: &taffy::TaffyTree<LayoutNodeCtx>,
    node: &Node,
    parent_x: f32,
    parent_y: f32,
    next: &mut usize,
    node_to_taffy: &[Option<NodeId>],
    rects: &mut [RectPx],
) -> NewsprintResult<()> {
    let idx = *next;
    *next += 1;
    let nid = node_to_taffy[idx].ok_or_else(|| NewsprintError::render("layout node missing"))?;
    let l = taffy.layout(nid).map_err(taffy_err)?;
    let rect = RectPx {
        x: parent_x + l.location.x,
        y: parent_y + l.location.y,
        w: l.size.width,
        h: l.size.height,
    };
    rects[idx] = rect;
    for c in &node.children {
        place(taffy, c, rect.x, rect.y, next, node_to_taffy, rects)?;
    }
    Ok(())
}

fn dimension(l: Length) -> Dimension {
    match l {
        Length::Auto => Dimension::auto(),
        Length::Px(v) => Dimension::length(v),
        Length::Percent(p) => Dimension::percent(p / 100.0),
    }
}

fn taffy_style(s: &Style) -> taffy::style::Style {
    let (flex_direction, align_items) = match s.display {
        Display::Block => (FlexDirection::Column, AlignItems::Stretch),
        Display::Row => (FlexDirection::Row, AlignItems::FlexStart),
    };
    let justify_content = match s.justify {
        Justify::Start => JustifyContent::FlexStart,
        Justify::Center => JustifyContent::Center,
    };
    let side_margin = |v: f32| {
        if s.center_self {
            LengthPercentageAuto::auto()
        } else {
            LengthPercentageAuto::length(v)
        }
    };

    let mut style = taffy::style::Style {
        display: taffy::style::Display::Flex,
        flex_direction,
        align_items: Some(align_items),
        justify_content: Some(justify_content),
        gap: Size {
            width: LengthPercentage::length(s.gap),
            height: LengthPercentage::length(s.gap),
        },
        padding: Rect {
            left: LengthPercentage::length(s.padding.left),
            right: LengthPercentage::length(s.padding.right),
            top: LengthPercentage::length(s.padding.top),
            bottom: LengthPercentage::length(s.padding.bottom),
        },
        border: Rect {
            left: LengthPercentage::length(s.border_width.left),
            right: LengthPercentage::length(s.border_width.right),
            top: LengthPercentage::length(s.border_width.top),
            bottom: LengthPercentage::length(s.border_width.bottom),
        },
        margin: Rect {
            left: side_margin(s.margin.left),
            right: side_margin(s.margin.right),
            top: LengthPercentageAuto::length(s.margin.top),
            bottom: LengthPercentageAuto::length(s.margin.bottom),
        },
        size: Size {
            width: dimension(s.width),
            height: dimension(s.height),
        },
        min_size: Size {
            width: Dimension::auto(),
            height: s
                .min_height
                .map(Dimension::length)
                .unwrap_or(Dimension::auto()),
        },
        max_size: Size {
            width: s
                .max_width
                .map(Dimension::length)
                .unwrap_or(Dimension::auto()),
            height: Dimension::auto(),
        },
        ..Default::default()
    };
    if let Some(grow) = s.flex_grow {
        style.flex_grow = grow;
        style.flex_basis = Dimension::length(0.0);
        style.min_size.width = Dimension::length(0.0);
    }
    style
}

fn measure_node(
    node: &Node,
    known: Size<Option<f32>>,
    available: Size<AvailableSpace>,
    engine: &mut TextLayoutEngine,
) -> NewsprintResult<Size<f32>> {
    let Content::Text(spans) = &node.content else {
        // Images carry explicit sizes; containers without children collapse.
        return Ok(Size {
            width: known.width.unwrap_or(0.0),
            height: known.height.unwrap_or(0.0),
        });
    };
    if let (Some(width), Some(height)) = (known.width, known.height) {
        return Ok(Size { width, height });
    }

    let max_width = known.width.or(match available.width {
        AvailableSpace::Definite(w) => Some(w),
        AvailableSpace::MinContent => Some(0.0),
        AvailableSpace::MaxContent => None,
    });
    let (w, h) = measure_text(spans, &node.style, max_width, engine)?;
    Ok(Size {
        width: known.width.unwrap_or(w),
        height: known.height.unwrap_or(h),
    })
}

fn column_width(style: &Style, width: f32) -> f32 {
    let n = style.column_count.max(1);
    let gaps = style.column_gap * f32::from(n - 1);
    ((width - gaps) / f32::from(n)).max(0.0)
}

fn measure_text(
    spans: &[Span],
    style: &Style,
    max_width: Option<f32>,
    engine: &mut TextLayoutEngine,
) -> NewsprintResult<(f32, f32)> {
    match max_width {
        Some(w) if style.column_count > 1 => {
            let layout = engine.layout_paragraph(spans, style, Some(column_width(style, w)))?;
            let (_, height) = balance_columns(&line_boxes(&layout), style.column_count);
            Ok((w, height))
        }
        _ => {
            let layout = engine.layout_paragraph(spans, style, max_width)?;
            Ok((layout.width(), layout.height()))
        }
    }
}

fn shape_text(
    spans: &[Span],
    style: &Style,
    content_width: f32,
    engine: &mut TextLayoutEngine,
) -> NewsprintResult<ShapedText> {
    let columns = style.column_count.max(1);
    let col_w = column_width(style, content_width);
    let layout = engine.layout_paragraph(spans, style, Some(col_w))?;
    let lines = line_boxes(&layout);
    let (column_starts, _) = balance_columns(&lines, columns);
    Ok(ShapedText {
        layout,
        lines,
        column_starts,
        column_width: col_w,
        column_gap: style.column_gap,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
