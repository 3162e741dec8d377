use super::*;
use crate::{
    assets::color::Color,
    scene::model::{BackgroundSpec, ImageLayer, OverlayLayer, OverlayShape},
};

fn engine(placeholder: PlaceholderStyle) -> Engine {
    Engine::with_fonts(
        EngineOpts {
            placeholder,
            parallel_layers: false,
            ..EngineOpts::default()
        },
        FontLibrary::empty(),
    )
}

fn white_workspace() -> Workspace {
    let mut ws = Workspace::new();
    ws.set_background(BackgroundSpec::Solid {
        color: Color::WHITE,
    });
    ws
}

#[test]
fn engine_opts_deserialize_with_defaults() {
    let opts: EngineOpts = serde_json::from_str(r#"{"placeholder":"omit"}"#).unwrap();
    assert_eq!(opts.placeholder, PlaceholderStyle::Omit);
    assert!(opts.parallel_layers);
    assert_eq!(opts.text, TextPolicy::default());
}

#[test]
fn omitted_placeholder_leaves_canvas_untouched() {
    let mut ws = white_workspace();
    let id = ws
        .add_layer(
            Layer::new(LayerKind::Image(ImageLayer::new(
                "/missing/pic.png",
                Size::new(100.0, 100.0),
            )))
            .at(10.0, 10.0),
        )
        .unwrap();
    let out = engine(PlaceholderStyle::Omit)
        .render_canvas(&ws, Resolution::Canonical)
        .unwrap();
    assert_eq!(out.issues.len(), 1);
    assert_eq!(out.issues[0].target, IssueTarget::Layer(id));
    assert!(out.buffer.data().chunks_exact(4).all(|p| p == [255, 255, 255, 255]));
}

#[test]
fn hatched_placeholder_is_drawn_at_the_layer() {
    let mut ws = white_workspace();
    ws.add_layer(
        Layer::new(LayerKind::Image(ImageLayer::new(
            "/missing/pic.png",
            Size::new(100.0, 100.0),
        )))
        .at(10.0, 10.0),
    )
    .unwrap();
    let out = engine(PlaceholderStyle::Hatched)
        .render_canvas(&ws, Resolution::Canonical)
        .unwrap();
    assert_eq!(out.buffer.pixel(5, 5), Some([255, 255, 255, 255]));
    assert_ne!(out.buffer.pixel(50, 50), Some([255, 255, 255, 255]));
}

#[test]
fn text_without_any_face_is_omitted_with_an_issue() {
    let mut ws = white_workspace();
    ws.add_layer(Layer::new(LayerKind::Text(crate::scene::model::TextLayer::new(
        "hi", "Nope", 40.0,
    ))))
    .unwrap();
    let out = engine(PlaceholderStyle::Hatched)
        .render_canvas(&ws, Resolution::Canonical)
        .unwrap();
    assert_eq!(out.issues.len(), 1);
    assert!(out.font_fallbacks.is_empty());
}

#[test]
fn isolated_render_is_cropped_to_rotated_bounds() {
    let layer = Layer::new(LayerKind::Overlay(OverlayLayer::new(
        OverlayShape::Rectangle,
        Size::new(40.0, 20.0),
        Color::RED,
    )))
    .rotated(90.0);
    let buf = engine(PlaceholderStyle::Hatched)
        .render_layer_isolated(&layer)
        .unwrap();
    assert!((i64::from(buf.width()) - 20).abs() <= 2);
    assert!((i64::from(buf.height()) - 40).abs() <= 2);
}

#[test]
fn isolated_missing_image_with_omit_is_an_asset_error() {
    let layer = Layer::new(LayerKind::Image(ImageLayer::new(
        "/missing/pic.png",
        Size::new(10.0, 10.0),
    )));
    let err = engine(PlaceholderStyle::Omit)
        .render_layer_isolated(&layer)
        .unwrap_err();
    assert!(matches!(err, ThumbError::AssetLoad(_)));
}

#[test]
fn export_png_writes_straight_alpha() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/out.png");
    let buf = PixelBuffer::filled(3, 2, [64, 0, 0, 128]).unwrap();
    export_png(&buf, &path).unwrap();
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (3, 2));
    let px = img.get_pixel(1, 1).0;
    assert_eq!(px[3], 128);
    assert!((i32::from(px[0]) - 127).abs() <= 1);
}
