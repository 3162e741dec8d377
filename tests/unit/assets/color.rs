use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Color = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Color::RED);

    let c: Color = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert_eq!(c, Color::rgba(0, 0, 255, 128));

    let c: Color = serde_json::from_value(json!("#fc0")).unwrap();
    assert_eq!(c, Color::rgb(255, 204, 0));
}

#[test]
fn parses_names_objects_and_arrays() {
    let c: Color = serde_json::from_value(json!("White")).unwrap();
    assert_eq!(c, Color::WHITE);

    let c: Color = serde_json::from_value(json!({"r": 1.0, "g": 0.5, "b": 0.0})).unwrap();
    assert_eq!(c, Color::rgb(255, 128, 0));

    let c: Color = serde_json::from_value(json!([0.0, 0.0, 1.0, 0.5])).unwrap();
    assert_eq!(c, Color::rgba(0, 0, 255, 128));
}

#[test]
fn rejects_malformed_colors() {
    assert!(serde_json::from_value::<Color>(json!("#12")).is_err());
    assert!(serde_json::from_value::<Color>(json!("#zzzzzz")).is_err());
    assert!(serde_json::from_value::<Color>(json!([1.0, 2.0])).is_err());
}

#[test]
fn serializes_to_canonical_hex() {
    assert_eq!(serde_json::to_value(Color::RED).unwrap(), json!("#ff0000"));
    assert_eq!(
        serde_json::to_value(Color::rgba(1, 2, 3, 4)).unwrap(),
        json!("#01020304")
    );
}

#[test]
fn alpha_factor_and_premul() {
    let c = Color::BLUE.with_alpha_factor(0.5);
    assert_eq!(c.a, 128);
    assert_eq!(c.to_premul(), [0, 0, 128, 128]);
}
