use super::*;

#[test]
fn canvas_rejects_zero_and_oversized() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    assert!(Canvas::new(1200, 300).is_ok());
}

#[test]
fn canvas_scaled_multiplies_both_sides() {
    let c = Canvas::BANNER.scaled(2).unwrap();
    assert_eq!(c, Canvas::new(2400, 600).unwrap());
    assert!(Canvas::BANNER.scaled(0).is_err());
    assert!((Canvas::BANNER.aspect() - 4.0).abs() < 1e-12);
}

#[test]
fn lerp_hits_endpoints() {
    let a = Rgba8::rgb(0, 0, 0);
    let b = Rgba8::rgb(200, 100, 50);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 0.5), Rgba8::rgb(100, 50, 25));
}

#[test]
fn shade_clamps_to_byte_range() {
    let c = Rgba8::rgb(200, 100, 10).shade(2.0);
    assert_eq!(c, Rgba8::rgb(255, 200, 20));
}
