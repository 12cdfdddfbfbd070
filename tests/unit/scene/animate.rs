use super::*;
use crate::foundation::core::Canvas;
use crate::params::Preset;
use crate::render::hud::scanline_y;

fn close(a: DVec3, b: DVec3) -> bool {
    (a - b).length() < 1e-9
}

#[test]
fn loop_is_seamless() {
    for preset in Preset::ALL {
        let p = preset.defaults();
        let a = frame_state(&p, 0.0);
        let b = frame_state(&p, 1.0);
        assert!(close(a.camera.eye, b.camera.eye), "{preset}");
        assert!(close(a.camera.up, b.camera.up), "{preset}");
        assert!(close(a.plate.center, b.plate.center), "{preset}");
        assert!(close(a.halo.normal(), b.halo.normal()), "{preset}");
        for v in [DVec3::X, DVec3::Y] {
            assert!(close(a.halo.rotation * v, b.halo.rotation * v), "{preset}");
            assert!(close(a.core.rotation * v, b.core.rotation * v), "{preset}");
        }
        assert!((a.pedestal_yaw - b.pedestal_yaw).abs() < 1e-12);
        let (y0, y1) = (
            scanline_y(Canvas::BANNER, 0.0, p.hud.scan_speed),
            scanline_y(Canvas::BANNER, 1.0, p.hud.scan_speed),
        );
        assert_eq!(y0, y1, "{preset}");
    }
}

#[test]
fn camera_always_looks_at_anchor() {
    let p = Preset::Military.defaults();
    for t in sample_times(12) {
        let s = frame_state(&p, t);
        assert_eq!(s.camera.target, ANCHOR);
        assert!(s.camera.eye.distance(ANCHOR) > 1.0);
    }
}

#[test]
fn orbit_offset_stays_in_ring_plane() {
    let mut p = Preset::Greco.defaults();
    p.cam.lift = 0.0;
    p.cam.bob = 0.0;
    for t in sample_times(8) {
        let s = frame_state(&p, t);
        let n = (DQuat::from_rotation_y(p.halo.ry) * DQuat::from_rotation_x(p.halo.rx)
            * DQuat::from_rotation_x(p.halo.wobble * (t * TAU).sin()))
            * DVec3::Z;
        let offset = s.camera.eye - ANCHOR;
        assert!(offset.dot(n).abs() < 1e-9, "t={t}");
        assert!((offset.length() - p.cam.r).abs() < 1e-9, "t={t}");
    }
}

#[test]
fn roll_turns_up_about_the_view_axis() {
    let p = Preset::Hybrid.defaults();
    let s = frame_state(&p, 0.25);
    let f = s.camera.forward();
    assert!((s.camera.up.dot(f) - DVec3::Y.dot(f)).abs() < 1e-9);
    assert!(!close(s.camera.up, DVec3::Y));
    assert!((s.camera.up.length() - 1.0).abs() < 1e-9);
    let level = frame_state(&p, 0.0);
    assert!(close(level.camera.up, DVec3::Y));
}

#[test]
fn orbit_sweeps_sideways_over_the_loop() {
    let p = Preset::Greco.defaults();
    let quarter = frame_state(&p, 0.25).camera.eye;
    let three_quarter = frame_state(&p, 0.75).camera.eye;
    assert!((quarter - three_quarter).length() > 1.0);
}

#[test]
fn orbit_base_falls_back_to_z_when_ring_faces_forward() {
    assert!(close(orbit_base(DVec3::Z), DVec3::Z));
    assert!(close(orbit_base(DVec3::Y), DVec3::Z));
    let b = orbit_base(DVec3::new(0.0, -0.84, 0.54));
    assert!(b.dot(DVec3::new(0.0, -0.84, 0.54).normalize()).abs() < 1e-9);
    assert!((b.length() - 1.0).abs() < 1e-12);
}

#[test]
fn plate_sits_between_anchor_and_camera() {
    let p = Preset::Hybrid.defaults();
    let s = frame_state(&p, 0.3);
    let to_cam = (s.camera.eye - ANCHOR).normalize();
    let along = (s.plate.center - ANCHOR - DVec3::Y * p.text.lift).dot(to_cam);
    assert!((along - p.text.pull).abs() < 1e-9);
    assert!(s.plate.normal.dot(to_cam) > 0.9);
    assert!((s.plate.width - s.plate.height * PLATE_ASPECT).abs() < 1e-12);
}

#[test]
fn spin_and_core_rotation_close_the_loop_for_any_speed() {
    let mut p = Preset::Greco.defaults();
    p.halo.spin = 0.37;
    let a = frame_state(&p, 0.0);
    let b = frame_state(&p, 1.0);
    assert!(close(a.halo.rotation * DVec3::X, b.halo.rotation * DVec3::X));
    let mid = frame_state(&p, 0.25);
    assert!(!close(a.core.rotation * DVec3::X, mid.core.rotation * DVec3::X));
}

#[test]
fn plate_is_four_times_wider_than_tall() {
    let mut p = Preset::Greco.defaults();
    p.text.size = 0.5;
    let s = frame_state(&p, 0.0);
    assert!((s.plate.height - 2.15).abs() < 1e-12);
    assert!((s.plate.width - 8.6).abs() < 1e-12);
}

#[test]
fn plate_corners_form_a_rectangle() {
    let s = frame_state(&Preset::Greco.defaults(), 0.1);
    let [tl, tr, bl] = s.plate.corners(0.0);
    assert!(((tr - tl).length() - s.plate.width).abs() < 1e-9);
    assert!(((bl - tl).length() - s.plate.height).abs() < 1e-9);
    assert!((tr - tl).dot(bl - tl).abs() < 1e-9);
}

#[test]
fn frame_count_rounds_and_never_hits_zero() {
    assert_eq!(frame_count(24, 3.0), 72);
    assert_eq!(frame_count(15, 3.0), 45);
    assert_eq!(frame_count(24, 0.0), 1);
    assert_eq!(frame_count(0, 3.0), 1);
    assert_eq!(frame_count(24, f64::NAN), 1);
}

#[test]
fn sample_times_are_half_open() {
    let ts: Vec<f64> = sample_times(4).collect();
    assert_eq!(ts, vec![0.0, 0.25, 0.5, 0.75]);
    assert_eq!(sample_times(0).collect::<Vec<_>>(), vec![0.0]);
}
