use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(128, 128), 64);
}

#[test]
fn premultiply_zeroes_transparent_and_keeps_opaque() {
    let mut px = vec![200u8, 100, 50, 0, 200, 100, 50, 255, 200, 100, 50, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[0..4], &[0, 0, 0, 0]);
    assert_eq!(&px[4..8], &[200, 100, 50, 255]);
    assert_eq!(&px[8..12], &[100, 50, 25, 128]);
}
