use super::*;

#[test]
fn zero_sized_buffers_are_internal_errors() {
    let err = PixelBuffer::transparent(0, 4).unwrap_err();
    assert!(matches!(err, ThumbError::Internal(_)));
}

#[test]
fn oversized_buffers_are_refused_before_allocating() {
    let err = PixelBuffer::transparent(100_000, 100_000).unwrap_err();
    assert!(matches!(err, ThumbError::Internal(_)));
    assert!(PixelBuffer::filled(u32::MAX, 2, [0; 4]).is_err());
}

#[test]
fn from_premul_checks_length() {
    assert!(PixelBuffer::from_premul(2, 2, vec![0; 15]).is_err());
    let buf = PixelBuffer::from_premul(2, 2, vec![7; 16]).unwrap();
    assert_eq!(buf.pixel(1, 1), Some([7, 7, 7, 7]));
    assert_eq!(buf.pixel(2, 0), None);
}

#[test]
fn crop_pads_outside_with_transparent() {
    let buf = PixelBuffer::filled(2, 2, [255, 0, 0, 255]).unwrap();
    let out = buf.crop(-1, 0, 3, 1).unwrap();
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(out.pixel(1, 0), Some([255, 0, 0, 255]));
    assert_eq!(out.pixel(2, 0), Some([255, 0, 0, 255]));
}

#[test]
fn straight_export_unpremultiplies() {
    let buf = PixelBuffer::filled(1, 1, [64, 0, 0, 128]).unwrap();
    let straight = buf.to_straight_rgba8();
    assert_eq!(straight[3], 128);
    assert!((i32::from(straight[0]) - 128).abs() <= 1);
}

#[test]
fn digest_tracks_content() {
    let a = PixelBuffer::filled(3, 3, [1, 2, 3, 4]).unwrap();
    let mut b = a.clone();
    assert_eq!(a.digest(), b.digest());
    b.data_mut()[0] = 9;
    assert_ne!(a.digest(), b.digest());
}
