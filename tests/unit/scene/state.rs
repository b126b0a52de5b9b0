use super::*;

#[test]
fn defaults_match_a_fresh_editor() {
    let c = Composition::default();
    assert!(c.heading.is_empty());
    assert_eq!(c.heading_size, 32);
    assert_eq!(c.heading_color.as_str(), "#000000");
    assert!(c.image.is_none());
    assert_eq!(c.image_height, 400);
    assert_eq!(c.image_width_percent, 100);
    assert_eq!(c.image_fit, ImageFit::Contain);
    assert_eq!(c.image_desc_size, 14);
    assert_eq!(c.image_desc_color.as_str(), "#666666");
    assert_eq!(c.place_date_size, 16);
    assert_eq!(c.content_size, 16);
    assert_eq!(c.background_color.as_str(), "#ffffff");
    assert_eq!(c.layout, Layout::Classic);
}

#[test]
fn layout_parses_names_labels_and_legacy_values() {
    assert_eq!("classic".parse::<Layout>().unwrap(), Layout::Classic);
    assert_eq!("Side by Side".parse::<Layout>().unwrap(), Layout::SideBySide);
    assert_eq!("side_by_side".parse::<Layout>().unwrap(), Layout::SideBySide);
    assert_eq!("layout3".parse::<Layout>().unwrap(), Layout::Bordered);
    assert_eq!(" Sidebar ".parse::<Layout>().unwrap(), Layout::Sidebar);
    assert_eq!("MAGAZINE".parse::<Layout>().unwrap(), Layout::Magazine);
    assert!("tabloid".parse::<Layout>().is_err());

    for l in Layout::ALL {
        assert_eq!(l.name().parse::<Layout>().unwrap(), l);
        assert_eq!(l.label().parse::<Layout>().unwrap(), l);
    }
}

#[test]
fn image_fit_parses_css_keywords() {
    for f in ImageFit::ALL {
        assert_eq!(f.name().parse::<ImageFit>().unwrap(), f);
    }
    assert_eq!("Scale Down".parse::<ImageFit>().unwrap(), ImageFit::ScaleDown);
    assert!("stretch".parse::<ImageFit>().is_err());
}

#[test]
fn serde_uses_camel_case_and_kebab_enums() {
    let c = Composition {
        heading: "Breaking News".to_string(),
        layout: Layout::SideBySide,
        image_fit: ImageFit::ScaleDown,
        ..Composition::default()
    };
    let v: serde_json::Value = serde_json::from_str(&c.to_json_pretty().unwrap()).unwrap();
    assert_eq!(v["heading"], "Breaking News");
    assert_eq!(v["headingSize"], 32);
    assert_eq!(v["imageWidthPercent"], 100);
    assert_eq!(v["layout"], "side-by-side");
    assert_eq!(v["imageFit"], "scale-down");
    assert!(v["image"].is_null());
}

#[test]
fn numeric_range_is_inclusive() {
    let r = NumericRange::new(12, 72);
    assert!(r.contains(12));
    assert!(r.contains(72));
    assert!(!r.contains(11));
    assert!(!r.contains(73));
}
