//! The five article templates.
//!
//! Every template reads the same `Composition` fields and nothing else. Field blocks are emitted
//! only for non-empty fields; sizes and colors are applied identically everywhere, only the
//! arrangement differs.

use crate::render::tree::{
    ColorValue, Display, Edges, Justify, Length, Node, Role, Span, Style,
    TextAlign, TextTransform,
};
use crate::scene::state::{Composition, Layout};

const ROOT_PADDING_PX: f32 = 48.0;
const ROOT_MIN_HEIGHT_PX: f32 = 600.0;
const BODY_LINE_HEIGHT: f32 = 1.625;
const MAGAZINE_MAX_WIDTH_PX: f32 = 1024.0;

const WEIGHT_SEMIBOLD: u16 = 600;
const WEIGHT_BOLD: u16 = 700;

/// Build the preview tree for `comp` using its selected layout.
#[tracing::instrument(level = "trace", skip_all, fields(layout = %comp.layout))]
pub fn render(comp: &Composition) -> Node {
    let mut root = Node::container(
        Role::Root,
        Style {
            padding: Edges::all(ROOT_PADDING_PX),
            min_height: Some(ROOT_MIN_HEIGHT_PX),
            background: Some(ColorValue::from(&comp.background_color)),
            ..Style::default()
        },
    );
    match comp.layout {
        Layout::Classic => classic(comp, &mut root),
        Layout::SideBySide => side_by_side(comp, &mut root),
        Layout::Bordered => bordered(comp, &mut root),
        Layout::Sidebar => sidebar(comp, &mut root),
        Layout::Magazine => magazine(comp, &mut root),
    }
    root
}

fn classic(c: &Composition, root: &mut Node) {
    root.push_opt(heading(
        c,
        Style {
            text_align: TextAlign::Center,
            margin: Edges::vertical(0.0, 24.0),
            padding: Edges::vertical(0.0, 16.0),
            ..Style::default()
        },
    ));
    root.push_opt(centered_image(c, 8.0, 16.0));
    root.push_opt(caption(
        c,
        Style {
            text_align: TextAlign::Center,
            margin: Edges::vertical(0.0, 24.0),
            ..Style::default()
        },
    ));

    // The dateline rides inline at the head of the body; without a body there is no paragraph.
    if c.main_content.is_empty() {
        return;
    }
    let mut spans = Vec::with_capacity(3);
    if !c.place_and_date.is_empty() {
        let inline = |role: Role, text: &str| Span {
            role,
            text: text.to_string(),
            font_size: Some(px(c.place_date_size)),
            font_weight: Some(WEIGHT_SEMIBOLD),
            color: Some(ColorValue::from(&c.place_date_color)),
        };
        spans.push(inline(Role::Dateline, &c.place_and_date));
        spans.push(inline(Role::Punctuation, ": "));
    }
    spans.push(Span::plain(Role::Body, c.main_content.clone()));
    root.children.push(Node::text(Role::Body, body_style(c), spans));
}

fn side_by_side(c: &Composition, root: &mut Node) {
    let accent = ColorValue::from(&c.heading_color);
    root.push_opt(heading(
        c,
        Style {
            margin: Edges::vertical(0.0, 24.0),
            padding: Edges {
                left: 16.0,
                ..Edges::default()
            },
            border_width: Edges {
                left: 4.0,
                ..Edges::default()
            },
            border_color: Edges {
                left: Some(accent),
                ..Edges::default()
            },
            ..Style::default()
        },
    ));

    let mut left = column(Some(1.0), Length::Auto);
    left.push_opt(full_width_image(c, 8.0));
    left.push_opt(caption(
        c,
        Style {
            margin: Edges::vertical(12.0, 0.0),
            ..Style::default()
        },
    ));

    let mut right = column(Some(1.0), Length::Auto);
    right.push_opt(dateline(
        c,
        Style {
            margin: Edges::vertical(0.0, 16.0),
            ..Style::default()
        },
    ));
    right.push_opt(body(c, body_style(c)));

    root.children.push(row(32.0).with_child(left).with_child(right));
}

fn bordered(c: &Composition, root: &mut Node) {
    let mut frame = Node::container(
        Role::Container,
        Style {
            padding: Edges::all(32.0),
            border_width: Edges::all(4.0),
            ..Style::default()
        }
        .with_radius(8.0)
        .with_border_color(ColorValue::from(&c.heading_color)),
    );

    frame.push_opt(heading(
        c,
        Style {
            text_align: TextAlign::Center,
            margin: Edges::vertical(0.0, 24.0),
            ..Style::default()
        },
    ));
    frame.push_opt(dateline(
        c,
        Style {
            text_align: TextAlign::Center,
            text_transform: TextTransform::Uppercase,
            letter_spacing_em: 0.025,
            margin: Edges::vertical(0.0, 24.0),
            ..Style::default()
        },
    ));
    frame.push_opt(centered_image(c, 4.0, 16.0));
    frame.push_opt(caption(
        c,
        Style {
            text_align: TextAlign::Center,
            margin: Edges::vertical(0.0, 24.0),
            padding: Edges::vertical(12.0, 12.0),
            border_width: Edges::vertical(1.0, 1.0),
            border_color: Edges {
                top: Some(ColorValue::from(&c.image_desc_color)),
                bottom: Some(ColorValue::from(&c.image_desc_color)),
                ..Edges::default()
            },
            ..Style::default()
        },
    ));
    frame.push_opt(body(c, body_style(c)));

    root.children.push(frame);
}

fn sidebar(c: &Composition, root: &mut Node) {
    root.push_opt(heading(
        c,
        Style {
            text_align: TextAlign::End,
            margin: Edges::vertical(0.0, 16.0),
            ..Style::default()
        },
    ));
    root.push_opt(dateline(
        c,
        Style {
            text_align: TextAlign::End,
            text_transform: TextTransform::Uppercase,
            letter_spacing_em: 0.1,
            margin: Edges::vertical(0.0, 24.0),
            ..Style::default()
        },
    ));

    let mut main = column(Some(1.0), Length::Auto);
    main.push_opt(body(c, body_style(c)));

    let mut aside = column(None, Length::Percent(100.0 / 3.0));
    aside.push_opt(full_width_image(c, 8.0));
    aside.push_opt(caption(
        c,
        Style {
            margin: Edges::vertical(12.0, 0.0),
            ..Style::default()
        },
    ));

    root.children.push(row(32.0).with_child(main).with_child(aside));
}

fn magazine(c: &Composition, root: &mut Node) {
    let mut page = Node::container(
        Role::Container,
        Style {
            max_width: Some(MAGAZINE_MAX_WIDTH_PX),
            center_self: true,
            ..Style::default()
        },
    );
    page.push_opt(c.image.as_ref().map(|img| {
        Node::image(
            Style {
                width: Length::Percent(100.0),
                height: Length::Px(px(c.image_height)),
                radius_top: 8.0,
                object_fit: c.image_fit,
                ..Style::default()
            },
            img.clone(),
        )
    }));

    let mut text = Node::container(
        Role::Container,
        Style {
            padding: Edges::all(32.0),
            ..Style::default()
        },
    );
    text.push_opt(heading(
        c,
        Style {
            margin: Edges::vertical(0.0, 16.0),
            ..Style::default()
        },
    ));
    text.push_opt(dateline(
        c,
        Style {
            text_transform: TextTransform::Uppercase,
            margin: Edges::vertical(0.0, 24.0),
            ..Style::default()
        },
    ));
    text.push_opt(caption(
        c,
        Style {
            margin: Edges::vertical(0.0, 24.0),
            padding: Edges::vertical(0.0, 16.0),
            border_width: Edges::vertical(0.0, 1.0),
            border_color: Edges {
                bottom: Some(ColorValue::from(&c.image_desc_color)),
                ..Edges::default()
            },
            ..Style::default()
        },
    ));
    text.push_opt(body(
        c,
        Style {
            column_count: 2,
            column_gap: 32.0,
            ..body_style(c)
        },
    ));

    page.children.push(text);
    root.children.push(page);
}

fn px(v: u32) -> f32 {
    v as f32
}

fn heading(c: &Composition, layout: Style) -> Option<Node> {
    if c.heading.is_empty() {
        return None;
    }
    Some(Node::text(
        Role::Heading,
        Style {
            font_size: Some(px(c.heading_size)),
            font_weight: Some(WEIGHT_BOLD),
            color: Some(ColorValue::from(&c.heading_color)),
            ..layout
        },
        vec![Span::plain(Role::Heading, c.heading.clone())],
    ))
}

fn caption(c: &Composition, layout: Style) -> Option<Node> {
    if c.image_description.is_empty() {
        return None;
    }
    Some(Node::text(
        Role::Caption,
        Style {
            font_size: Some(px(c.image_desc_size)),
            italic: true,
            color: Some(ColorValue::from(&c.image_desc_color)),
            ..layout
        },
        vec![Span::plain(Role::Caption, c.image_description.clone())],
    ))
}

fn dateline(c: &Composition, layout: Style) -> Option<Node> {
    if c.place_and_date.is_empty() {
        return None;
    }
    Some(Node::text(
        Role::Dateline,
        Style {
            font_size: Some(px(c.place_date_size)),
            font_weight: Some(WEIGHT_SEMIBOLD),
            color: Some(ColorValue::from(&c.place_date_color)),
            ..layout
        },
        vec![Span::plain(Role::Dateline, c.place_and_date.clone())],
    ))
}

fn body_style(c: &Composition) -> Style {
    Style {
        font_size: Some(px(c.content_size)),
        color: Some(ColorValue::from(&c.content_color)),
        line_height: Some(BODY_LINE_HEIGHT),
        text_align: TextAlign::Justify,
        ..Style::default()
    }
}

fn body(c: &Composition, style: Style) -> Option<Node> {
    if c.main_content.is_empty() {
        return None;
    }
    Some(Node::text(
        Role::Body,
        style,
        vec![Span::plain(Role::Body, c.main_content.clone())],
    ))
}

/// Image inside a centering row, sized by the width-percent control.
fn centered_image(c: &Composition, radius: f32, margin_bottom: f32) -> Option<Node> {
    let img = c.image.as_ref()?;
    let image = Node::image(
        Style {
            width: Length::Percent(px(c.image_width_percent)),
            height: Length::Px(px(c.image_height)),
            object_fit: c.image_fit,
            ..Style::default()
        }
        .with_radius(radius),
        img.clone(),
    );
    Some(
        Node::container(
            Role::Container,
            Style {
                display: Display::Row,
                justify: Justify::Center,
                margin: Edges::vertical(0.0, margin_bottom),
                ..Style::default()
            },
        )
        .with_child(image),
    )
}

/// Image stretched across its column; the width-percent control does not apply.
fn full_width_image(c: &Composition, radius: f32) -> Option<Node> {
    let img = c.image.as_ref()?;
    Some(Node::image(
        Style {
            width: Length::Percent(100.0),
            height: Length::Px(px(c.image_height)),
            object_fit: c.image_fit,
            ..Style::default()
        }
        .with_radius(radius),
        img.clone(),
    ))
}

fn row(gap: f32) -> Node {
    Node::container(
        Role::Container,
        Style {
            display: Display::Row,
            gap,
            ..Style::default()
        },
    )
}

fn column(flex_grow: Option<f32>, width: Length) -> Node {
    Node::container(
        Role::Container,
        Style {
            flex_grow,
            width,
            ..Style::default()
        },
    )
}

#[cfg(test)]
#[path = "../../tests/unit/render/templates.rs"]
mod tests;
