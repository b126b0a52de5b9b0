use super::*;
use crate::assets::color::CssColor;
use crate::assets::image_loader::EmbeddedImage;
use crate::render::tree::Content;

fn sample_image() -> EmbeddedImage {
    EmbeddedImage::from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap()
}

fn full() -> Composition {
    Composition {
        heading: "Harbor Bridge Reopens".to_string(),
        image: Some(sample_image()),
        image_description: "Crews remove the last barrier at dawn.".to_string(),
        place_and_date: "Lisbon, Mar 3, 2026".to_string(),
        main_content: "Traffic returned on Tuesday.\nOfficials praised the crews.".to_string(),
        ..Composition::default()
    }
}

fn span_texts(tree: &Node, role: Role) -> Vec<String> {
    tree.spans_with_role(role)
        .into_iter()
        .map(|s| s.text.clone())
        .collect()
}

#[test]
fn every_layout_presents_each_field_exactly_once() {
    for layout in Layout::ALL {
        let comp = Composition {
            layout,
            ..full()
        };
        let tree = render(&comp);

        assert_eq!(span_texts(&tree, Role::Heading), vec![comp.heading.clone()], "{layout}");
        assert_eq!(
            span_texts(&tree, Role::Caption),
            vec![comp.image_description.clone()],
            "{layout}"
        );
        assert_eq!(
            span_texts(&tree, Role::Dateline),
            vec![comp.place_and_date.clone()],
            "{layout}"
        );
        assert_eq!(
            span_texts(&tree, Role::Body),
            vec![comp.main_content.clone()],
            "{layout}"
        );

        let images = tree.find_all(Role::Image);
        assert_eq!(images.len(), 1, "{layout}");
        assert_eq!(
            images[0].content,
            Content::Image(sample_image())
        );
    }
}

#[test]
fn rendering_never_touches_the_state() {
    let comp = full();
    let before = comp.clone();
    for layout in Layout::ALL {
        let c = Composition {
            layout,
            ..comp.clone()
        };
        let _ = render(&c);
        let _ = render(&c);
        assert_eq!(
            Composition {
                layout: before.layout,
                ..c
            },
            before
        );
    }
}

#[test]
fn empty_fields_render_no_blocks() {
    for layout in Layout::ALL {
        let tree = render(&Composition {
            layout,
            ..Composition::default()
        });
        for role in Role::FIELDS {
            assert!(tree.find_all(role).is_empty(), "{layout}: {role:?} node");
            assert!(tree.spans_with_role(role).is_empty(), "{layout}: {role:?} span");
        }
    }
}

#[test]
fn per_field_size_and_color_are_uniform_across_layouts() {
    for layout in Layout::ALL {
        let comp = Composition {
            layout,
            heading_size: 41,
            heading_color: CssColor::new("#123456"),
            image_desc_size: 13,
            content_size: 19,
            ..full()
        };
        let tree = render(&comp);
        let heading = tree.find_all(Role::Heading)[0];
        assert_eq!(heading.style.font_size, Some(41.0));
        assert_eq!(
            heading.style.color,
            Some(ColorValue::Css(CssColor::new("#123456")))
        );
        assert_eq!(heading.style.font_weight, Some(700));

        let caption = tree.find_all(Role::Caption)[0];
        assert_eq!(caption.style.font_size, Some(13.0));
        assert!(caption.style.italic);

        let body = tree.find_all(Role::Body)[0];
        assert_eq!(body.style.font_size, Some(19.0));
        assert_eq!(body.style.text_align, TextAlign::Justify);

        let img = tree.find_all(Role::Image)[0];
        assert_eq!(img.style.height, Length::Px(400.0));
        assert_eq!(img.style.object_fit, comp.image_fit);
    }
}

#[test]
fn declared_extremes_render_unchanged() {
    for (size, expected) in [(12u32, 12.0f32), (72, 72.0)] {
        let tree = render(&Composition {
            heading: "Edge".to_string(),
            heading_size: size,
            ..Composition::default()
        });
        assert_eq!(tree.find_all(Role::Heading)[0].style.font_size, Some(expected));
    }
    for (h, w) in [(100u32, 20u32), (800, 100)] {
        let tree = render(&Composition {
            image: Some(sample_image()),
            image_height: h,
            image_width_percent: w,
            ..Composition::default()
        });
        let img = tree.find_all(Role::Image)[0];
        assert_eq!(img.style.height, Length::Px(h as f32));
        assert_eq!(img.style.width, Length::Percent(w as f32));
    }
}

#[test]
fn breaking_news_classic_scenario() {
    let comp = Composition {
        heading: "Breaking News".to_string(),
        layout: Layout::Classic,
        background_color: CssColor::new("#ffffff"),
        ..Composition::default()
    };
    let tree = render(&comp);

    assert_eq!(
        tree.style.background,
        Some(ColorValue::Css(CssColor::new("#ffffff")))
    );
    let headings = tree.find_all(Role::Heading);
    assert_eq!(headings.len(), 1);
    let h = headings[0];
    assert_eq!(h.style.text_align, TextAlign::Center);
    assert_eq!(h.style.font_weight, Some(700));
    assert_eq!(h.style.font_size, Some(32.0));
    assert_eq!(h.style.color, Some(ColorValue::Css(CssColor::new("#000000"))));
    assert!(tree.find_all(Role::Image).is_empty());
    assert!(tree.find_all(Role::Caption).is_empty());
}

#[test]
fn classic_inlines_dateline_before_body() {
    let comp = full();
    let tree = render(&comp);
    let body = tree.find_all(Role::Body)[0];
    let Content::Text(spans) = &body.content else {
        panic!("body is a paragraph");
    };
    assert_eq!(spans.len(), 3);
    assert_eq!(spans[0].role, Role::Dateline);
    assert_eq!(spans[0].font_weight, Some(600));
    assert_eq!(spans[0].font_size, Some(16.0));
    assert_eq!(spans[1].role, Role::Punctuation);
    assert_eq!(spans[2].role, Role::Body);
    assert!(tree.find_all(Role::Dateline).is_empty());
}

#[test]
fn classic_drops_dateline_without_body() {
    let tree = render(&Composition {
        place_and_date: "Oslo".to_string(),
        ..Composition::default()
    });
    assert!(tree.spans_with_role(Role::Dateline).is_empty());

    let tree = render(&Composition {
        place_and_date: "Oslo".to_string(),
        layout: Layout::Bordered,
        ..Composition::default()
    });
    assert_eq!(span_texts(&tree, Role::Dateline), vec!["Oslo".to_string()]);
}

#[test]
fn switching_classic_to_magazine_moves_image_to_full_width_top() {
    let comp = full();
    let classic = render(&comp);
    let magazine = render(&Composition {
        layout: Layout::Magazine,
        ..comp.clone()
    });

    // Classic: image sits in a centering row, sized by the width-percent control.
    let wrapper = &classic.children[1];
    assert_eq!(wrapper.style.display, Display::Row);
    assert_eq!(wrapper.style.justify, Justify::Center);
    assert_eq!(wrapper.children[0].role, Role::Image);

    // Magazine: image is the first thing on the page, full width.
    let page = &magazine.children[0];
    let top = &page.children[0];
    assert_eq!(top.role, Role::Image);
    assert_eq!(top.style.width, Length::Percent(100.0));

    assert_eq!(
        span_texts(&classic, Role::Caption),
        span_texts(&magazine, Role::Caption)
    );
}

#[test]
fn template_specific_decorations() {
    let comp = full();

    let sbs = render(&Composition {
        layout: Layout::SideBySide,
        ..comp.clone()
    });
    let h = sbs.find_all(Role::Heading)[0];
    assert_eq!(h.style.border_width.left, 4.0);
    assert_eq!(
        h.style.border_color.left,
        Some(ColorValue::Css(comp.heading_color.clone()))
    );
    assert_eq!(sbs.children[1].style.display, Display::Row);
    assert_eq!(sbs.children[1].children.len(), 2);

    let bordered = render(&Composition {
        layout: Layout::Bordered,
        ..comp.clone()
    });
    let frame = &bordered.children[0];
    assert_eq!(frame.style.border_width, Edges::all(4.0));
    let d = bordered.find_all(Role::Dateline)[0];
    assert_eq!(d.style.text_transform, TextTransform::Uppercase);
    assert_eq!(d.style.text_align, TextAlign::Center);
    let cap = bordered.find_all(Role::Caption)[0];
    assert_eq!(cap.style.border_width.top, 1.0);
    assert_eq!(cap.style.border_width.bottom, 1.0);

    let sidebar = render(&Composition {
        layout: Layout::Sidebar,
        ..comp.clone()
    });
    let d = sidebar.find_all(Role::Dateline)[0];
    assert_eq!(d.style.text_align, TextAlign::End);
    assert!(d.style.letter_spacing_em > 0.05);
    let aside = &sidebar.children.last().unwrap().children[1];
    assert_eq!(aside.style.width, Length::Percent(100.0 / 3.0));
    assert_eq!(aside.children[0].role, Role::Image);

    let magazine = render(&Composition {
        layout: Layout::Magazine,
        ..comp
    });
    let body = magazine.find_all(Role::Body)[0];
    assert_eq!(body.style.column_count, 2);
    assert_eq!(body.style.column_gap, 32.0);
}
