use std::io::Cursor;

use super::*;

fn png_bytes(rgba: Vec<u8>, w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let buf = png_bytes(vec![100u8, 50u8, 200u8, 128u8], 1, 1);

    let decoded = decode_image(&buf, Path::new("inline.png")).unwrap();
    assert_eq!(decoded.width, 1);
    assert_eq!(decoded.height, 1);
    assert_eq!(
        decoded.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn corrupt_bytes_are_asset_errors() {
    let err = decode_image(b"not a png", Path::new("broken.png")).unwrap_err();
    assert_eq!(err.path, Path::new("broken.png"));
    assert!(err.reason.contains("decode"));
}

#[test]
fn missing_file_is_asset_error() {
    let err = load_image(Path::new("definitely/not/here.png")).unwrap_err();
    assert!(err.reason.contains("read"));
}
