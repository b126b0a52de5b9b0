use std::io::Cursor;

use super::*;
use crate::render::tree::{Content, Role};

fn png_image() -> EmbeddedImage {
    let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([10, 120, 200, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    EmbeddedImage::from_bytes(&buf).unwrap()
}

#[test]
fn starts_with_defaults_and_matching_preview() {
    let s = EditorSession::new();
    assert_eq!(s.state(), &Composition::default());
    assert_eq!(s.preview(), &render(&Composition::default()));
}

#[test]
fn setters_rerender_immediately() {
    let mut s = EditorSession::new();
    s.set_heading("Breaking News");
    assert_eq!(s.preview().find_all(Role::Heading).len(), 1);
    assert_eq!(s.preview().text_content(), "Breaking News");

    s.set_heading_size(48);
    assert_eq!(s.preview().find_all(Role::Heading)[0].style.font_size, Some(48.0));

    s.set_heading("");
    assert!(s.preview().find_all(Role::Heading).is_empty());
}

#[test]
fn apply_parses_per_field_kind() {
    let mut s = EditorSession::new();
    s.apply(Field::Heading, "  spaced  ").unwrap();
    s.apply(Field::ContentSize, "20").unwrap();
    s.apply(Field::ContentColor, " #333333 ").unwrap();
    s.apply(Field::Layout, "magazine").unwrap();
    s.apply(Field::ImageFit, "cover").unwrap();

    let c = s.state();
    assert_eq!(c.heading, "  spaced  ");
    assert_eq!(c.content_size, 20);
    assert_eq!(c.content_color.as_str(), "#333333");
    assert_eq!(c.layout, Layout::Magazine);
    assert_eq!(c.image_fit, ImageFit::Cover);
}

#[test]
fn invalid_numeric_input_leaves_session_untouched() {
    let mut s = EditorSession::new();
    s.set_heading("Keep");
    let before = s.clone();
    let err = s.apply(Field::HeadingSize, "large").unwrap_err();
    assert!(matches!(err, NewsprintError::Validation(_)));
    assert_eq!(s.state(), before.state());
    assert_eq!(s.preview(), before.preview());
    assert!(s.apply(Field::Layout, "layout9").is_err());
    assert_eq!(s.state(), before.state());
}

#[test]
fn out_of_range_numbers_are_applied_as_typed() {
    let mut s = EditorSession::new();
    s.set_heading("Big");
    s.apply(Field::HeadingSize, "500").unwrap();
    assert_eq!(s.state().heading_size, 500);
    assert_eq!(s.preview().find_all(Role::Heading)[0].style.font_size, Some(500.0));
}

#[test]
fn assignments_split_on_first_equals() {
    let mut s = EditorSession::new();
    s.apply_assignment("main-content=a=b").unwrap();
    assert_eq!(s.state().main_content, "a=b");
    assert!(s.apply_assignment("no-equals-sign").is_err());
    assert!(s.apply_assignment("bogus=1").is_err());
}

#[test]
fn no_image_selection_changes_nothing() {
    let mut s = EditorSession::new();
    let before = s.clone();
    assert!(!s.load_image(None).unwrap());
    assert_eq!(s.state(), before.state());
}

#[test]
fn layout_switch_keeps_image_and_caption() {
    let mut s = EditorSession::new();
    let img = png_image();
    s.set_image(Some(img.clone()));
    s.set_image_description("A caption");
    for layout in Layout::ALL {
        s.set_layout(layout);
        assert_eq!(s.state().image.as_ref(), Some(&img));
        let images = s.preview().find_all(Role::Image);
        assert_eq!(images.len(), 1, "{layout}");
        assert_eq!(images[0].content, Content::Image(img.clone()));
        assert_eq!(s.preview().spans_with_role(Role::Caption)[0].text, "A caption");
    }
}
