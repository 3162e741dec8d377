use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_dst_transparent_returns_scaled_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn half_blue_over_white_is_the_midpoint() {
    let out = over([255, 255, 255, 255], [0, 0, 255, 255], 0.5);
    assert_eq!(out, [127, 127, 255, 255]);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
    over_in_place(&mut dst, &[255, 0, 0, 255, 0, 0, 0, 0], 1.0).unwrap();
    assert_eq!(dst, vec![255, 0, 0, 255, 0, 0, 0, 0]);
}

#[test]
fn composite_at_clips_to_destination() {
    let mut dst = PixelBuffer::filled(4, 4, [0, 0, 0, 255]).unwrap();
    let src = PixelBuffer::filled(3, 3, [255, 255, 255, 255]).unwrap();
    composite_at(&mut dst, &src, -1, 2, 1.0);

    assert_eq!(dst.pixel(0, 2), Some([255, 255, 255, 255]));
    assert_eq!(dst.pixel(1, 3), Some([255, 255, 255, 255]));
    assert_eq!(dst.pixel(2, 2), Some([0, 0, 0, 255]));
    assert_eq!(dst.pixel(0, 1), Some([0, 0, 0, 255]));
}

#[test]
fn composite_fully_outside_is_noop() {
    let mut dst = PixelBuffer::filled(4, 4, [0, 0, 0, 255]).unwrap();
    let before = dst.clone();
    let src = PixelBuffer::filled(2, 2, [255, 255, 255, 255]).unwrap();
    composite_at(&mut dst, &src, 10, 0, 1.0);
    composite_at(&mut dst, &src, -2, -2, 1.0);
    composite_at(&mut dst, &src, 0, 0, 0.0);
    assert_eq!(dst, before);
}

#[test]
fn stack_covers_all_parts_and_paints_in_order() {
    let below = Raster {
        buffer: PixelBuffer::filled(2, 2, [255, 0, 0, 255]).unwrap(),
        offset: (-1, -1),
    };
    let above = Raster {
        buffer: PixelBuffer::filled(2, 2, [0, 0, 255, 255]).unwrap(),
        offset: (0, 0),
    };
    let out = stack_rasters(&[&below, &above]).unwrap();
    assert_eq!(out.offset, (-1, -1));
    assert_eq!((out.buffer.width(), out.buffer.height()), (3, 3));
    assert_eq!(out.buffer.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(out.buffer.pixel(1, 1), Some([0, 0, 255, 255]));
    assert_eq!(out.buffer.pixel(2, 0), Some([0, 0, 0, 0]));
}

#[test]
fn extreme_placements_clip_instead_of_overflowing() {
    let mut dst = PixelBuffer::filled(4, 4, [0, 0, 0, 255]).unwrap();
    let before = dst.clone();
    let src = PixelBuffer::filled(2, 2, [255, 255, 255, 255]).unwrap();
    composite_at(&mut dst, &src, i64::MAX, 0, 1.0);
    composite_at(&mut dst, &src, 0, i64::MAX - 1, 1.0);
    composite_at(&mut dst, &src, i64::MIN, i64::MIN, 1.0);
    assert_eq!(dst, before);
}

#[test]
fn stacking_rasters_too_far_apart_is_an_error() {
    let near = Raster::at_origin(PixelBuffer::filled(2, 2, [255, 0, 0, 255]).unwrap());
    let far = Raster {
        buffer: PixelBuffer::filled(2, 2, [255, 0, 0, 255]).unwrap(),
        offset: (i64::MAX - 1, 0),
    };
    let err = stack_rasters(&[&near, &far]).unwrap_err();
    assert!(matches!(err, ThumbError::Internal(_)));
}
