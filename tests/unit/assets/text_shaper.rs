use super::*;
use crate::assets::fonts::{FontLibrary, FontOpts};

fn any_face() -> Option<ResolvedFace> {
    let lib = FontLibrary::load(&FontOpts {
        dirs: Vec::new(),
        system_fonts: true,
        default_family: String::new(),
    });
    lib.resolve("sans-serif")
}

#[test]
fn rejects_bad_sizes() {
    let Some(face) = any_face() else {
        return;
    };
    let mut shaper = TextShaper::new();
    assert!(shaper.shape_line("a", &face, 0.0, 0.0).is_err());
    assert!(shaper.shape_line("a", &face, f32::NAN, 0.0).is_err());
    assert!(shaper.shape_line("a", &face, 10.0, f32::INFINITY).is_err());
}

#[test]
fn longer_text_is_wider_and_size_scales_width() {
    let Some(face) = any_face() else {
        return;
    };
    let mut shaper = TextShaper::new();
    let short = shaper.measure("HOT", &face, 40.0, 0.0).unwrap();
    let long = shaper.measure("HOT HOT HOT", &face, 40.0, 0.0).unwrap();
    assert!(short > 0.0);
    assert!(long > short * 2.0);

    let big = shaper.measure("HOT", &face, 80.0, 0.0).unwrap();
    assert!((big / short - 2.0).abs() < 0.1);
}

#[test]
fn tracking_widens_the_line() {
    let Some(face) = any_face() else {
        return;
    };
    let mut shaper = TextShaper::new();
    let plain = shaper.measure("ABCD", &face, 32.0, 0.0).unwrap();
    let spaced = shaper.measure("ABCD", &face, 32.0, 5.0).unwrap();
    let tight = shaper.measure("ABCD", &face, 32.0, -2.0).unwrap();
    assert!(spaced > plain + 10.0);
    assert!(tight < plain);
}

#[test]
fn glyphs_sit_on_the_baseline() {
    let Some(face) = any_face() else {
        return;
    };
    let mut shaper = TextShaper::new();
    let line = shaper.shape_line("Hi", &face, 50.0, 0.0).unwrap();
    assert_eq!(line.glyphs.len(), 2);
    assert!(line.ascent > 0.0);
    for g in &line.glyphs {
        assert!((g.y - line.baseline).abs() < 0.5);
    }
    assert!(line.glyphs[1].x > line.glyphs[0].x);
}

#[test]
fn face_registers_once_per_shaper() {
    let Some(face) = any_face() else {
        return;
    };
    let mut shaper = TextShaper::new();
    shaper.measure("abc", &face, 20.0, 0.0).unwrap();
    shaper.measure("abcdef", &face, 30.0, 1.0).unwrap();
    let name = shaper.family_for(&face).unwrap();
    assert_eq!(shaper.families.len(), 1);
    assert_eq!(shaper.families.get(&face.key), Some(&name));
}
