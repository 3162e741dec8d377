use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn premultiply_then_demultiply_is_close() {
    let px = [200u8, 100, 50, 128];
    let back = demultiply_px(premultiply_px(px));
    for c in 0..3 {
        assert!((i32::from(back[c]) - i32::from(px[c])).abs() <= 2);
    }
    assert_eq!(back[3], 128);
}

#[test]
fn transparent_pixels_collapse_to_zero() {
    assert_eq!(premultiply_px([9, 9, 9, 0]), [0, 0, 0, 0]);
    assert_eq!(demultiply_px([0, 0, 0, 0]), [0, 0, 0, 0]);
}

#[test]
fn clamp_premul_limits_channels_to_alpha() {
    let mut px = vec![250u8, 10, 90, 80];
    clamp_premul_in_place(&mut px);
    assert_eq!(px, vec![80, 10, 80, 80]);
}
