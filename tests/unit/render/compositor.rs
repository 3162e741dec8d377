use super::*;
use crate::{
    assets::{color::Color, fonts::FontLibrary},
    render::engine::EngineOpts,
    scene::model::{BackgroundSpec, GradientDirection, GradientStop},
};

fn engine() -> Engine {
    Engine::with_fonts(EngineOpts::default(), FontLibrary::empty())
}

fn solid(color: Color) -> Workspace {
    let mut ws = Workspace::new();
    ws.set_background(BackgroundSpec::Solid { color });
    ws
}

#[test]
fn starts_dirty_and_ends_clean() {
    let mut c = Compositor::new();
    assert_eq!(c.state(), CompositorState::Dirty);
    assert!(c.last_good().is_none());
    c.render(&engine(), &solid(Color::RED), Resolution::Preview)
        .unwrap();
    assert_eq!(c.state(), CompositorState::Clean);
    assert_eq!(
        c.last_good().unwrap().buffer.pixel(0, 0),
        Some([255, 0, 0, 255])
    );
}

#[test]
fn failed_render_keeps_last_good_buffer() {
    let engine = engine();
    let mut c = Compositor::new();
    c.render(&engine, &solid(Color::BLUE), Resolution::Preview)
        .unwrap();
    let before = c.last_good().unwrap().buffer.digest();

    let mut broken = Workspace::new();
    broken.set_background(BackgroundSpec::Gradient {
        stops: vec![
            GradientStop::new(0.8, Color::RED),
            GradientStop::new(0.2, Color::YELLOW),
        ],
        direction: GradientDirection::Horizontal,
    });
    c.mark_dirty();
    let err = c.render(&engine, &broken, Resolution::Preview).unwrap_err();
    assert!(matches!(err, ThumbError::InvalidSpec(_)));
    assert_eq!(c.state(), CompositorState::Clean);
    assert_eq!(c.last_good().unwrap().buffer.digest(), before);
}

#[test]
fn fingerprint_tracks_snapshot_and_resolution() {
    let a = solid(Color::RED);
    let b = solid(Color::BLUE);
    let fa = snapshot_fingerprint(&a, Resolution::Canonical).unwrap();
    assert_eq!(fa, snapshot_fingerprint(&a.clone(), Resolution::Canonical).unwrap());
    assert_ne!(fa, snapshot_fingerprint(&b, Resolution::Canonical).unwrap());
    assert_ne!(fa, snapshot_fingerprint(&a, Resolution::Preview).unwrap());
}

#[test]
fn changed_snapshot_rerenders_without_mark_dirty() {
    let engine = engine();
    let mut c = Compositor::new();
    c.render(&engine, &solid(Color::RED), Resolution::Preview)
        .unwrap();
    let out = c
        .render(&engine, &solid(Color::BLUE), Resolution::Preview)
        .unwrap();
    assert_eq!(out.buffer.pixel(0, 0), Some([0, 0, 255, 255]));
}
