use super::*;

#[test]
fn generated_ids_are_unique() {
    let a = LayerId::generate();
    let b = LayerId::generate();
    assert_ne!(a, b);
    assert_eq!(a.as_str().len(), 36);
}

#[test]
fn stops_must_be_sorted_in_range_and_at_least_two() {
    let red = Color::RED;
    assert!(validate_stops(&[GradientStop::new(0.0, red)]).is_err());
    assert!(validate_stops(&[GradientStop::new(0.5, red), GradientStop::new(0.2, red)]).is_err());
    assert!(validate_stops(&[GradientStop::new(0.2, red), GradientStop::new(0.2, red)]).is_err());
    assert!(validate_stops(&[GradientStop::new(-0.1, red), GradientStop::new(1.0, red)]).is_err());
    assert!(validate_stops(&[GradientStop::new(0.0, red), GradientStop::new(f64::NAN, red)]).is_err());
    validate_stops(&[
        GradientStop::new(0.0, red),
        GradientStop::new(0.3, red),
        GradientStop::new(1.0, red),
    ])
    .unwrap();
}

#[test]
fn layer_json_is_flat_and_tagged() {
    let layer = Layer::with_id(
        "hl",
        LayerKind::Overlay(OverlayLayer::new(
            OverlayShape::Circle,
            Size::new(100.0, 50.0),
            Color::BLUE,
        )),
    )
    .at(10.0, 20.0)
    .with_opacity(0.5);

    let v = serde_json::to_value(&layer).unwrap();
    assert_eq!(v["type"], "overlay");
    assert_eq!(v["id"], "hl");
    assert_eq!(v["shape"], "circle");
    assert_eq!(v["color"], "#0000ff");
    assert_eq!(v["rotationDegrees"], 0.0);
    assert_eq!(v["size"]["width"], 100.0);

    let back: Layer = serde_json::from_value(v).unwrap();
    assert_eq!(back, layer);
}

#[test]
fn text_layer_defaults_fill_in_missing_fields() {
    let json = r#"{
        "type": "text",
        "id": "t1",
        "text": "HOT!",
        "fontFamily": "Montserrat",
        "fontSizePt": 120
    }"#;
    let layer: Layer = serde_json::from_str(json).unwrap();
    assert!(layer.visible);
    assert_eq!(layer.opacity, 1.0);
    let LayerKind::Text(t) = &layer.kind else {
        panic!("expected text layer");
    };
    assert_eq!(t.color, Color::WHITE);
    assert_eq!(t.align, TextAlign::Center);
    assert!(t.shadow.is_none());
    layer.validate().unwrap();
}

#[test]
fn unknown_layer_type_is_rejected() {
    let json = r#"{"type": "video", "id": "v"}"#;
    assert!(serde_json::from_str::<Layer>(json).is_err());
}

#[test]
fn background_variants_round_trip() {
    for bg in [
        BackgroundSpec::default(),
        BackgroundSpec::Gradient {
            stops: vec![
                GradientStop::new(0.0, Color::RED),
                GradientStop::new(1.0, Color::YELLOW),
            ],
            direction: GradientDirection::DiagonalTrBl,
        },
        BackgroundSpec::Image {
            source_path: "bg.png".to_owned(),
            blur_radius: 4.0,
            brightness: 0.8,
            contrast: 1.2,
            saturation: 1.0,
        },
    ] {
        let s = serde_json::to_string(&bg).unwrap();
        let back: BackgroundSpec = serde_json::from_str(&s).unwrap();
        assert_eq!(back, bg);
        bg.validate().unwrap();
    }

    let v = serde_json::to_value(BackgroundSpec::Image {
        source_path: "a.png".to_owned(),
        blur_radius: 0.0,
        brightness: 1.0,
        contrast: 1.0,
        saturation: 1.0,
    })
    .unwrap();
    assert_eq!(v["type"], "image");
    assert_eq!(v["sourcePath"], "a.png");
}

#[test]
fn validation_rejects_out_of_range_fields() {
    let mut layer = Layer::with_id(
        "t",
        LayerKind::Text(TextLayer::new("x", "Montserrat", 40.0)),
    );
    layer.opacity = 1.5;
    let err = layer.validate().unwrap_err();
    assert!(err.to_string().contains("layer t"));

    layer.opacity = 1.0;
    if let LayerKind::Text(t) = &mut layer.kind {
        t.font_size_pt = 0.0;
    }
    assert!(matches!(layer.validate(), Err(ThumbError::InvalidSpec(_))));

    let img = Layer::with_id(
        "i",
        LayerKind::Image(ImageLayer {
            shadow: Some(ImageShadow {
                offset_x: 0.0,
                offset_y: 4.0,
                blur_radius: -1.0,
                opacity: 0.5,
                color: Color::BLACK,
            }),
            ..ImageLayer::new("a.png", Size::new(10.0, 10.0))
        }),
    );
    assert!(img.validate().is_err());

    let overlay = Layer::with_id(
        "o",
        LayerKind::Overlay(OverlayLayer::new(
            OverlayShape::Rectangle,
            Size::new(0.0, 10.0),
            Color::RED,
        )),
    );
    assert!(overlay.validate().is_err());
}

#[test]
fn validation_bounds_placement_and_blur() {
    let overlay = || {
        Layer::with_id(
            "o",
            LayerKind::Overlay(OverlayLayer::new(
                OverlayShape::Circle,
                Size::new(40.0, 40.0),
                Color::RED,
            )),
        )
    };
    overlay().at(-500.0, 2000.0).validate().unwrap();
    assert!(matches!(
        overlay().at(1e19, 0.0).validate(),
        Err(ThumbError::InvalidSpec(_))
    ));

    let mut blurred = overlay();
    if let LayerKind::Overlay(o) = &mut blurred.kind {
        o.blur_radius = 1e5;
    }
    assert!(matches!(blurred.validate(), Err(ThumbError::InvalidSpec(_))));

    let mut text = TextLayer::new("x", "Montserrat", 40.0);
    text.shadow = Some(TextShadow {
        offset_x: 1e12,
        offset_y: 0.0,
        blur_radius: 2.0,
        color: Color::BLACK,
    });
    assert!(Layer::with_id("t", LayerKind::Text(text.clone())).validate().is_err());
    text.shadow = None;
    text.font_size_pt = 1e9;
    assert!(Layer::with_id("t", LayerKind::Text(text)).validate().is_err());

    let huge = BackgroundSpec::Image {
        source_path: "bg.png".to_owned(),
        blur_radius: 1e6,
        brightness: 1.0,
        contrast: 1.0,
        saturation: 1.0,
    };
    assert!(huge.validate().is_err());
}
