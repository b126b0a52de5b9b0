use super::*;
use crate::render::tree::{Edges, Role};
use crate::assets::image_loader::EmbeddedImage;

fn image_node(width: Length, height: f32) -> Node {
    // Payload is never decoded during layout; only the declared box matters.
    let img = EmbeddedImage::from_data_url("data:image/png;base64,AAAA").expect("data url");
    Node::image(
        Style {
            width,
            height: Length::Px(height),
            ..Style::default()
        },
        img,
    )
}

fn root(children: Vec<Node>) -> Node {
    let mut r = Node::container(
        Role::Root,
        Style {
            padding: Edges::all(48.0),
            min_height: Some(600.0),
            ..Style::default()
        },
    );
    r.children = children;
    r
}

#[test]
fn root_spans_viewport_and_respects_min_height() {
    let tree = root(Vec::new());
    let mut engine = TextLayoutEngine::new();
    let out = compute_layout(&tree, 800.0, &mut engine).expect("layout");
    assert_eq!(out.width, 800.0);
    assert_eq!(out.height, 600.0);
    assert_eq!(out.rects.len(), 1);
    assert!(out.texts[0].is_none());
}

#[test]
fn percent_width_image_is_centered_in_row() {
    let row = Node::container(
        Role::Container,
        Style {
            display: Display::Row,
            justify: Justify::Center,
            ..Style::default()
        },
    )
    .with_child(image_node(Length::Percent(50.0), 300.0));
    let tree = root(vec![row]);

    let mut engine = TextLayoutEngine::new();
    let out = compute_layout(&tree, 800.0, &mut engine).expect("layout");
    let img = out.rects[2];
    // content box is 800 - 2 * 48 = 704 wide
    assert_eq!(img.w, 352.0);
    assert_eq!(img.h, 300.0);
    assert_eq!(img.x, 48.0 + 176.0);
    assert_eq!(img.y, 48.0);
}

#[test]
fn tall_content_grows_root() {
    let tree = root(vec![image_node(Length::Percent(100.0), 800.0)]);
    let mut engine = TextLayoutEngine::new();
    let out = compute_layout(&tree, 800.0, &mut engine).expect("layout");
    assert_eq!(out.height, 800.0 + 96.0);
}

#[test]
fn rejects_degenerate_viewport() {
    let mut engine = TextLayoutEngine::new();
    assert!(compute_layout(&root(Vec::new()), 0.0, &mut engine).is_err());
    assert!(compute_layout(&root(Vec::new()), f32::NAN, &mut engine).is_err());
}

#[test]
fn inset_clamps_at_zero() {
    let r = RectPx {
        x: 0.0,
        y: 0.0,
        w: 10.0,
        h: 10.0,
    };
    let i = r.inset(1.0, 2.0, 3.0, 4.0);
    assert_eq!((i.x, i.y, i.w, i.h), (4.0, 1.0, 4.0, 6.0));
    assert_eq!(r.inset(20.0, 20.0, 20.0, 20.0).w, 0.0);
}
