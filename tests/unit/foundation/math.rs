use super::*;

#[test]
fn smoothstep_is_clamped_and_monotonic() {
    assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
    assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
    assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-12);
    let mut prev = 0.0;
    for i in 0..=20 {
        let v = smoothstep(0.2, 0.8, i as f64 / 20.0);
        assert!(v >= prev);
        prev = v;
    }
}

#[test]
fn smoothstep_degenerate_edges_is_a_step() {
    assert_eq!(smoothstep(0.5, 0.5, 0.4), 0.0);
    assert_eq!(smoothstep(0.5, 0.5, 0.5), 1.0);
}

#[test]
fn fract_wraps_negative_values() {
    assert!((fract(1.25) - 0.25).abs() < 1e-12);
    assert!((fract(-0.25) - 0.75).abs() < 1e-12);
}

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(0, 200), 0);
    assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
    assert_eq!(clamp01(1.5), 1.0);
}
