use super::*;
use crate::assets::fonts::FontOpts;

fn by_chars(s: &str, size: f64) -> ThumbResult<f64> {
    Ok(s.chars().count() as f64 * size * 0.5)
}

fn any_face() -> Option<ResolvedFace> {
    FontLibrary::load(&FontOpts {
        dirs: Vec::new(),
        system_fonts: true,
        default_family: String::new(),
    })
    .resolve("sans-serif")
}

#[test]
fn fit_size_keeps_size_when_words_fit() {
    let policy = TextPolicy::default();
    let size = fit_size(&["short words"], 1000.0, 100.0, &policy, by_chars).unwrap();
    assert_eq!(size, 100.0);
}

#[test]
fn fit_size_steps_down_until_the_longest_word_fits() {
    let policy = TextPolicy::default();
    // 10 chars at 0.5em: fits 400px once size <= 80.
    let size = fit_size(&["ABCDEFGHIJ x"], 400.0, 100.0, &policy, by_chars).unwrap();
    assert_eq!(size, 80.0);
}

#[test]
fn fit_size_stops_at_the_floor() {
    let policy = TextPolicy::default();
    let size = fit_size(&["ABCDEFGHIJ"], 100.0, 100.0, &policy, by_chars).unwrap();
    assert_eq!(size, 60.0);
}

#[test]
fn wrap_breaks_between_words_greedily() {
    let lines = wrap_paragraph("aa bb cc", 5.0, |s| Ok(s.len() as f64)).unwrap();
    assert_eq!(lines, vec!["aa bb", "cc"]);
}

#[test]
fn wrap_hard_breaks_words_wider_than_the_box() {
    let lines = wrap_paragraph("xy abcdefgh", 3.0, |s| Ok(s.len() as f64)).unwrap();
    assert_eq!(lines, vec!["xy", "abc", "def", "gh"]);
}

#[test]
fn wrap_of_blank_paragraph_is_one_empty_line() {
    let lines = wrap_paragraph("   ", 10.0, |s| Ok(s.len() as f64)).unwrap();
    assert_eq!(lines, vec![String::new()]);
}

#[test]
fn rendered_text_has_fill_and_stroke_colors() {
    let Some(face) = any_face() else {
        return;
    };
    let mut layer = TextLayer::new("HOT!", "sans-serif", 80.0);
    layer.color = Color::YELLOW;
    layer.stroke_width_px = 4.0;
    layer.stroke_color = Color::BLUE;
    let mut shaper = TextShaper::new();
    let out = render_text(&layer, face, &mut shaper, &TextPolicy::default()).unwrap();

    assert!(out.content.width > 40.0);
    assert!(out.raster.offset.0 < 0 && out.raster.offset.1 < 0);
    let px: Vec<&[u8]> = out.raster.buffer.data().chunks_exact(4).collect();
    assert!(px.iter().any(|p| *p == [255, 255, 0, 255]));
    assert!(px.iter().any(|p| *p == [0, 0, 255, 255]));
}

#[test]
fn max_width_fixes_box_width_and_wraps() {
    let Some(face) = any_face() else {
        return;
    };
    let mut layer = TextLayer::new("one two three four five six", "sans-serif", 40.0);
    layer.max_width_px = Some(200.0);
    let mut shaper = TextShaper::new();
    let out = render_text(&layer, face, &mut shaper, &TextPolicy::default()).unwrap();
    assert_eq!(out.content.width, 200.0);
    assert!(out.lines.len() > 1);
    assert!(out.size_px <= 40.0);
}

#[test]
fn explicit_newlines_start_new_lines() {
    let Some(face) = any_face() else {
        return;
    };
    let layer = TextLayer::new("A\nB\r\nC", "sans-serif", 30.0);
    let mut shaper = TextShaper::new();
    let (_, lines) = layout_lines(&layer, &face, &mut shaper, &TextPolicy::default()).unwrap();
    assert_eq!(lines, vec!["A", "B", "C"]);
}

#[test]
fn empty_library_reports_asset_error() {
    let layer = TextLayer::new("x", "Nope", 20.0);
    let err = resolve_face(&layer, &FontLibrary::empty()).unwrap_err();
    assert!(err.reason.contains("no font face"));
}
