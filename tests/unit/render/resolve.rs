use super::*;
use crate::assets::color::CssColor;
use crate::render::tree::{Edges, Role, Span, Style};
use crate::scene::state::{Composition, Layout};

fn css(s: &str) -> Option<ColorValue> {
    Some(ColorValue::Css(CssColor::new(s)))
}

#[test]
fn color_inherits_into_borders_and_spans() {
    let child = Node::text(
        Role::Caption,
        Style {
            border_width: Edges::vertical(1.0, 1.0),
            ..Style::default()
        },
        vec![Span::plain(Role::Caption, "cap")],
    );
    let mut root = Node::container(
        Role::Root,
        Style {
            color: css("rgb(10, 20, 30)"),
            background: css("rgb(10, 20, 30)"),
            ..Style::default()
        },
    )
    .with_child(child);

    resolve_effective_styles(&mut root);
    let expected = ColorValue::Resolved(Rgba8::new(10, 20, 30, 255));

    assert_eq!(root.style.background, Some(expected.clone()));
    let c = &root.children[0];
    assert_eq!(c.style.color, Some(expected.clone()));
    assert_eq!(c.style.border_color.top, Some(expected.clone()));
    let Content::Text(spans) = &c.content else {
        panic!("text");
    };
    assert_eq!(spans[0].color, Some(expected));
    assert!(is_fully_resolved(&root));
}

#[test]
fn invalid_declarations_are_dropped() {
    let mut root = Node::container(
        Role::Root,
        Style {
            color: css("not-a-color"),
            background: css("also-bad"),
            border_color: Edges::all(css("#zzzzzz")),
            ..Style::default()
        },
    );
    resolve_effective_styles(&mut root);
    assert_eq!(root.style.color, Some(ColorValue::Resolved(Rgba8::BLACK)));
    assert_eq!(root.style.background, None);
    assert_eq!(
        root.style.border_color.left,
        Some(ColorValue::Resolved(Rgba8::BLACK))
    );
}

#[test]
fn every_template_resolves_completely() {
    for layout in Layout::ALL {
        let comp = Composition {
            layout,
            heading: "H".to_string(),
            heading_color: CssColor::new("hsl(120, 100%, 25%)"),
            image_description: "C".to_string(),
            image_desc_color: CssColor::new("rebeccapurple"),
            place_and_date: "D".to_string(),
            main_content: "B".to_string(),
            background_color: CssColor::new("rgb(245, 245, 245)"),
            ..Composition::default()
        };
        let mut tree = crate::render::templates::render(&comp);
        assert!(!is_fully_resolved(&tree), "{layout}");
        let n = resolve_effective_styles(&mut tree);
        assert!(n > 0);
        assert!(is_fully_resolved(&tree), "{layout}");
        assert_eq!(
            tree.style.background,
            Some(ColorValue::Resolved(Rgba8::new(245, 245, 245, 255)))
        );
    }
}

#[test]
fn forced_background_is_opaque() {
    let mut root = Node::container(Role::Root, Style::default());
    force_root_background(&mut root, Rgba8::new(0xf5, 0xf5, 0xf5, 0));
    assert_eq!(
        root.style.background,
        Some(ColorValue::Resolved(Rgba8::new(0xf5, 0xf5, 0xf5, 255)))
    );
}
