use std::io::Cursor;

use super::*;
use base64::{Engine as _, engine::general_purpose};

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([200, 30, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn embeds_png_as_data_url_without_reencoding() {
    let bytes = png_bytes(3, 2);
    let img = EmbeddedImage::from_bytes(&bytes).unwrap();
    assert!(img.data_url().starts_with("data:image/png;base64,"));
    assert_eq!(img.mime(), "image/png");
    assert_eq!(img.decode_bytes().unwrap(), bytes);
}

#[test]
fn rejects_non_image_bytes() {
    let err = EmbeddedImage::from_bytes(b"plain text, not pixels").unwrap_err();
    assert!(matches!(err, NewsprintError::Validation(_)));
}

#[test]
fn data_url_parsing_checks_shape() {
    assert!(EmbeddedImage::from_data_url("data:image/png;base64,AAAA").is_ok());
    assert!(EmbeddedImage::from_data_url("https://example.com/a.png").is_err());
    assert!(EmbeddedImage::from_data_url("data:text/plain;base64,AAAA").is_err());
    assert!(EmbeddedImage::from_data_url("data:image/png;base64,").is_err());
    assert!(EmbeddedImage::from_data_url("data:image/png,raw").is_err());
}

#[test]
fn no_selection_is_a_silent_noop() {
    assert_eq!(load_image(None).unwrap(), None);
}

#[test]
fn load_from_disk_round_trips_bytes() {
    let dir = std::path::PathBuf::from("target").join("image_loader_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("photo.png");
    let bytes = png_bytes(4, 4);
    std::fs::write(&path, &bytes).unwrap();

    let loaded = load_image(Some(&path)).unwrap().unwrap();
    assert!(!loaded.data_url().is_empty());
    assert_eq!(loaded.decode_bytes().unwrap(), bytes);
}

#[test]
fn missing_file_is_an_error() {
    let path = std::path::Path::new("target/image_loader_unit/does-not-exist.png");
    assert!(load_image(Some(path)).is_err());
}

#[test]
fn loaded_file_decodes_to_premultiplied_pixels() {
    let dir = std::path::PathBuf::from("target").join("image_loader_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("translucent.png");
    let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([200, 100, 0, 128]));
    image::DynamicImage::ImageRgba8(img)
        .save_with_format(&path, image::ImageFormat::Png)
        .unwrap();

    let loaded = load_image(Some(&path)).unwrap().unwrap();
    let pixels = loaded.decode_premul().unwrap();
    assert_eq!((pixels.width, pixels.height), (3, 2));
    assert_eq!(pixels.rgba8_premul.len(), 3 * 2 * 4);
    assert_eq!(&pixels.rgba8_premul[..4], &[100, 50, 0, 128]);
}

#[test]
fn payload_must_match_declared_mime() {
    let png = png_bytes(2, 2);
    let payload = general_purpose::STANDARD.encode(&png);
    let mislabeled = EmbeddedImage::from_data_url(format!("data:image/jpeg;base64,{payload}")).unwrap();
    assert!(matches!(
        mislabeled.decode_premul(),
        Err(NewsprintError::Other(_))
    ));

    let unknown = EmbeddedImage::from_data_url(format!("data:image/x-unknown;base64,{payload}")).unwrap();
    assert!(matches!(unknown.decode_premul(), Err(NewsprintError::Image(_))));
}
