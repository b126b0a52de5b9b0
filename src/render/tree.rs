//! Visual tree produced by the layout templates.
//!
//! The tree is a small, CSS-shaped box model: block and row containers, text paragraphs made of
//! styled spans, and image boxes. Colors stay as authored (`ColorValue::Css`) until effective
//! style resolution pins them to RGBA before rasterization.

use crate::assets::color::CssColor;
use crate::assets::image_loader::EmbeddedImage;
use crate::foundation::core::Rgba8;
use crate::scene::state::ImageFit;
use serde::Serialize;
use std::fmt::Write as _;

/// What a node (or span) stands for in the article.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// The preview root.
    Root,
    /// Structural wrapper with no field of its own.
    Container,
    /// Headline.
    Heading,
    /// Article image.
    Image,
    /// Image caption.
    Caption,
    /// Place and date.
    Dateline,
    /// Body text.
    Body,
    /// Separator text that belongs to no field (e.g. the ": " after an inline dateline).
    Punctuation,
}

impl Role {
    /// Roles that carry a composition field.
    pub const FIELDS: [Role; 5] = [
        Role::Heading,
        Role::Image,
        Role::Caption,
        Role::Dateline,
        Role::Body,
    ];
}

/// A color-valued property.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorValue {
    /// Authored color text, not yet interpreted.
    Css(CssColor),
    /// Fully resolved color, safe for the rasterizer.
    Resolved(Rgba8),
}

impl ColorValue {
    /// Return the resolved color, if this value has been pinned.
    pub fn resolved(&self) -> Option<Rgba8> {
        match self {
            ColorValue::Resolved(c) => Some(*c),
            ColorValue::Css(_) => None,
        }
    }
}

impl From<&CssColor> for ColorValue {
    fn from(c: &CssColor) -> Self {
        ColorValue::Css(c.clone())
    }
}

/// A size along one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Length {
    /// Determined by content and container.
    #[default]
    Auto,
    /// Absolute CSS pixels.
    Px(f32),
    /// Percentage (0..=100) of the containing block.
    Percent(f32),
}

/// Per-side values (top, right, bottom, left).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Edges<T> {
    /// Top side.
    pub top: T,
    /// Right side.
    pub right: T,
    /// Bottom side.
    pub bottom: T,
    /// Left side.
    pub left: T,
}

impl<T: Clone> Edges<T> {
    /// Same value on every side.
    pub fn all(v: T) -> Self {
        Self {
            top: v.clone(),
            right: v.clone(),
            bottom: v.clone(),
            left: v,
        }
    }

    /// Mutable access to every side, in top/right/bottom/left order.
    pub fn each_mut(&mut self) -> [&mut T; 4] {
        [
            &mut self.top,
            &mut self.right,
            &mut self.bottom,
            &mut self.left,
        ]
    }
}

impl Edges<f32> {
    /// Vertical-only edges.
    pub fn vertical(top: f32, bottom: f32) -> Self {
        Self {
            top,
            bottom,
            ..Self::default()
        }
    }
}

/// Main-axis arrangement of a container's children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    /// Children stacked vertically, stretched to full width.
    #[default]
    Block,
    /// Children side by side.
    Row,
}

/// Placement of children along a row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Justify {
    /// Packed at the start.
    #[default]
    Start,
    /// Centered.
    Center,
}

/// Horizontal alignment of text lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    /// Left in LTR text.
    #[default]
    Start,
    /// Centered.
    Center,
    /// Right in LTR text.
    End,
    /// Stretched to both edges (last line starts).
    Justify,
}

/// Case mapping applied when text is shaped. Field text itself is never rewritten.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextTransform {
    /// Text as written.
    #[default]
    None,
    /// All caps.
    Uppercase,
}

impl TextTransform {
    /// Apply the mapping to `s`.
    pub fn apply(self, s: &str) -> String {
        match self {
            TextTransform::None => s.to_string(),
            TextTransform::Uppercase => s.to_uppercase(),
        }
    }
}

/// Box and paint properties of a node. Unset colors inherit (`color`) or are transparent.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Style {
    /// Child arrangement.
    pub display: Display,
    /// Child placement along a row.
    pub justify: Justify,
    /// Gap between children in px.
    pub gap: f32,
    /// Inner spacing in px.
    pub padding: Edges<f32>,
    /// Outer spacing in px.
    pub margin: Edges<f32>,
    /// Center horizontally inside the parent (`margin-inline: auto`).
    pub center_self: bool,
    /// Box width.
    pub width: Length,
    /// Box height.
    pub height: Length,
    /// Minimum box height in px.
    pub min_height: Option<f32>,
    /// Maximum box width in px.
    pub max_width: Option<f32>,
    /// Share of free row space taken by this box; `Some` also zeroes its flex basis.
    pub flex_grow: Option<f32>,

    /// Text color; inherited when unset.
    pub color: Option<ColorValue>,
    /// Background fill.
    pub background: Option<ColorValue>,
    /// Border widths in px.
    pub border_width: Edges<f32>,
    /// Border colors; an unset side uses the effective text color.
    pub border_color: Edges<Option<ColorValue>>,
    /// Corner radius for the top corners in px.
    pub radius_top: f32,
    /// Corner radius for the bottom corners in px.
    pub radius_bottom: f32,

    /// Font size in px.
    pub font_size: Option<f32>,
    /// CSS font weight (400 normal, 600 semibold, 700 bold).
    pub font_weight: Option<u16>,
    /// Italic face.
    pub italic: bool,
    /// Extra tracking, in em.
    pub letter_spacing_em: f32,
    /// Line height as a multiple of the font size.
    pub line_height: Option<f32>,
    /// Line alignment.
    pub text_align: TextAlign,
    /// Case mapping.
    pub text_transform: TextTransform,
    /// Number of text columns (1 = single column).
    pub column_count: u16,
    /// Gap between text columns in px.
    pub column_gap: f32,

    /// Image fitting.
    pub object_fit: ImageFit,
}

impl Style {
    /// Uniform radius on all corners.
    pub fn with_radius(mut self, r: f32) -> Self {
        self.radius_top = r;
        self.radius_bottom = r;
        self
    }

    /// Same border color on every side.
    pub fn with_border_color(mut self, c: ColorValue) -> Self {
        self.border_color = Edges::all(Some(c));
        self
    }
}

/// One run of text with its own size, weight and color.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Span {
    /// Field this run displays.
    pub role: Role,
    /// Field text, verbatim.
    pub text: String,
    /// Font size override in px.
    pub font_size: Option<f32>,
    /// Font weight override.
    pub font_weight: Option<u16>,
    /// Text color override; inherits the paragraph color when unset.
    pub color: Option<ColorValue>,
}

impl Span {
    /// A span that inherits everything from its paragraph.
    pub fn plain(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            font_size: None,
            font_weight: None,
            color: None,
        }
    }
}

/// Node payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Content {
    /// Pure container.
    #[default]
    None,
    /// A paragraph of styled spans.
    Text(Vec<Span>),
    /// A replaced image element. Only self-contained data URLs can be placed in the tree.
    Image(EmbeddedImage),
}

/// A box in the visual tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    /// What this node stands for.
    pub role: Role,
    /// Box and paint properties.
    pub style: Style,
    /// Text, image or nothing.
    pub content: Content,
    /// Child boxes in paint order.
    pub children: Vec<Node>,
}

impl Node {
    /// Empty container.
    pub fn container(role: Role, style: Style) -> Self {
        Self {
            role,
            style,
            content: Content::None,
            children: Vec::new(),
        }
    }

    /// Paragraph node.
    pub fn text(role: Role, style: Style, spans: Vec<Span>) -> Self {
        Self {
            role,
            style,
            content: Content::Text(spans),
            children: Vec::new(),
        }
    }

    /// Image node.
    pub fn image(style: Style, image: EmbeddedImage) -> Self {
        Self {
            role: Role::Image,
            style,
            content: Content::Image(image),
            children: Vec::new(),
        }
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Append `child` when present.
    pub fn push_opt(&mut self, child: Option<Node>) {
        if let Some(c) = child {
            self.children.push(c);
        }
    }

    /// Depth-first, pre-order walk.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Node, usize)) {
        fn go<'a>(n: &'a Node, depth: usize, f: &mut impl FnMut(&'a Node, usize)) {
            f(n, depth);
            for c in &n.children {
                go(c, depth + 1, f);
            }
        }
        go(self, 0, f);
    }

    /// All nodes with the given role, in document order.
    pub fn find_all(&self, role: Role) -> Vec<&Node> {
        let mut out = Vec::new();
        self.walk(&mut |n, _| {
            if n.role == role {
                out.push(n);
            }
        });
        out
    }

    /// All spans with the given role, in document order.
    pub fn spans_with_role(&self, role: Role) -> Vec<&Span> {
        let mut out = Vec::new();
        self.walk(&mut |n, _| {
            if let Content::Text(spans) = &n.content {
                out.extend(spans.iter().filter(|s| s.role == role));
            }
        });
        out
    }

    /// Concatenated span text of the subtree, as authored (no case mapping).
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.walk(&mut |n, _| {
            if let Content::Text(spans) = &n.content {
                for s in spans {
                    out.push_str(&s.text);
                }
            }
        });
        out
    }

    /// Number of nodes in the subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut n = 0;
        self.walk(&mut |_, _| n += 1);
        n
    }

    /// Indented, human-readable description of the tree (the textual live preview).
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.walk(&mut |n, depth| {
            let indent = "  ".repeat(depth);
            let _ = write!(out, "{indent}{}", role_name(n.role));
            let mut attrs = Vec::<String>::new();
            if n.style.display == Display::Row {
                attrs.push("row".to_string());
            }
            if n.style.text_align != TextAlign::Start {
                attrs.push(format!("align={}", align_name(n.style.text_align)));
            }
            if let Some(sz) = n.style.font_size {
                attrs.push(format!("size={sz}px"));
            }
            if let Some(w) = n.style.font_weight {
                attrs.push(format!("weight={w}"));
            }
            if n.style.italic {
                attrs.push("italic".to_string());
            }
            if n.style.text_transform == TextTransform::Uppercase {
                attrs.push("uppercase".to_string());
            }
            if n.style.column_count > 1 {
                attrs.push(format!("columns={}", n.style.column_count));
            }
            if let Some(c) = &n.style.color {
                attrs.push(format!("color={}", color_text(c)));
            }
            if let Some(c) = &n.style.background {
                attrs.push(format!("background={}", color_text(c)));
            }
            match n.style.width {
                Length::Auto => {}
                Length::Px(v) => attrs.push(format!("width={v}px")),
                Length::Percent(v) => attrs.push(format!("width={v}%")),
            }
            if let Length::Px(v) = n.style.height {
                attrs.push(format!("height={v}px"));
            }
            if !attrs.is_empty() {
                let _ = write!(out, " [{}]", attrs.join(" "));
            }
            match &n.content {
                Content::None => {}
                Content::Text(spans) => {
                    let text: Vec<String> = spans
                        .iter()
                        .map(|s| format!("{:?}", n.style.text_transform.apply(&s.text)))
                        .collect();
                    let _ = write!(out, " {}", text.join(" + "));
                }
                Content::Image(img) => {
                    let _ = write!(
                        out,
                        " <{} fit={}>",
                        img.mime(),
                        n.style.object_fit.name()
                    );
                }
            }
            out.push('\n');
        });
        out
    }
}

fn role_name(r: Role) -> &'static str {
    match r {
        Role::Root => "root",
        Role::Container => "box",
        Role::Heading => "heading",
        Role::Image => "image",
        Role::Caption => "caption",
        Role::Dateline => "dateline",
        Role::Body => "body",
        Role::Punctuation => "punct",
    }
}

fn align_name(a: TextAlign) -> &'static str {
    match a {
        TextAlign::Start => "start",
        TextAlign::Center => "center",
        TextAlign::End => "end",
        TextAlign::Justify => "justify",
    }
}

fn color_text(c: &ColorValue) -> String {
    match c {
        ColorValue::Css(css) => css.as_str().to_string(),
        ColorValue::Resolved(rgba) => rgba.to_hex(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/tree.rs"]
mod tests;
