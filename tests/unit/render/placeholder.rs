use super::*;

#[test]
fn hatching_is_deterministic_and_striped() {
    let a = hatched(48, 48, BASE_COLOR.to_premul()).unwrap();
    let b = hatched(48, 48, BASE_COLOR.to_premul()).unwrap();
    assert_eq!(a, b);

    let stripe = a.pixel(0, 0).unwrap();
    let gap = a.pixel(12, 0).unwrap();
    assert_ne!(stripe, gap);
    assert_eq!(gap, BASE_COLOR.to_premul());
    assert_eq!(a.pixel(3, 21), Some(stripe));
}

#[test]
fn transparent_base_gives_translucent_stripes() {
    let buf = hatched(8, 8, [0, 0, 0, 0]).unwrap();
    assert_eq!(buf.pixel(0, 0).unwrap()[3], 0x99);
}
