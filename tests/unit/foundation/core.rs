use super::*;

#[test]
fn canonical_and_preview_keep_half_ratio() {
    assert_eq!(Canvas::CANONICAL.width, Canvas::PREVIEW.width * 2);
    assert_eq!(Canvas::CANONICAL.height, Canvas::PREVIEW.height * 2);
}

#[test]
fn empty_canvas_is_rejected() {
    assert!(Canvas::new(0, 10).is_err());
    assert_eq!(Canvas::new(3, 2).unwrap().area(), 6);
}

#[test]
fn size_validation_rejects_degenerate_extents() {
    assert!(Size::new(10.0, 0.0).validate("overlay").is_err());
    assert!(Size::new(f64::NAN, 4.0).validate("overlay").is_err());
    Size::new(1.0, 1.0).validate("overlay").unwrap();
    Size::new(MAX_LAYER_EXTENT, 1.0).validate("overlay").unwrap();
    let err = Size::new(1e5, 1e5).validate("image").unwrap_err();
    assert!(matches!(err, ThumbError::InvalidSpec(_)));
    assert_eq!(Size::new(10.4, 2.6).to_pixels(), (10, 3));
}

#[test]
fn position_rounds_to_nearest_pixel() {
    assert_eq!(Position::new(99.5, -0.4).to_pixel(), (100, 0));
}
