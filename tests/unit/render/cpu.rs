use super::*;
use crate::params::Preset;
use crate::render::backend::Quality;

fn small_opts() -> RenderOpts {
    RenderOpts {
        canvas: Canvas::new(240, 60).unwrap(),
        scale: 1,
        quality: Quality::Preview,
        font: None,
    }
}

#[test]
fn frames_are_opaque_at_the_supersampled_size() {
    let mut opts = small_opts();
    opts.scale = 2;
    let mut r = CpuRenderer::new(opts).unwrap();
    let f = r.render(&Preset::Greco.defaults(), 0.22).unwrap();
    assert_eq!((f.width, f.height), (480, 120));
    assert_eq!(f.data.len(), 480 * 120 * 4);
    assert!(f.data.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn scene_loop_endpoints_match() {
    let mut r = CpuRenderer::new(small_opts()).unwrap();
    let mut p = Preset::Hybrid.defaults();
    p.hud.scan_speed = 1.1;
    let a = r.render(&p, 0.0).unwrap();
    let b = r.render(&p, 1.0).unwrap();
    let max_diff = a
        .data
        .iter()
        .zip(&b.data)
        .map(|(x, y)| x.abs_diff(*y))
        .max()
        .unwrap();
    assert!(max_diff <= 2, "max channel diff {max_diff}");
}

#[test]
fn rendering_is_deterministic_and_animated() {
    let mut r = CpuRenderer::new(small_opts()).unwrap();
    let p = Preset::Military.defaults();
    let a = r.render(&p, 0.3).unwrap();
    let again = r.render(&p, 0.3).unwrap();
    let later = r.render(&p, 0.6).unwrap();
    assert_eq!(a.data, again.data);
    assert_ne!(a.data, later.data);
}

#[test]
fn scene_draws_over_the_background() {
    let mut r = CpuRenderer::new(small_opts()).unwrap();
    let p = Preset::Greco.defaults();
    let frame = r.render(&p, 0.0).unwrap();
    let bg = background(r.render_canvas(), &p.preset.palette(), 0.0);
    let changed = frame
        .data
        .chunks_exact(4)
        .zip(bg.chunks_exact(4))
        .filter(|(a, b)| a != b)
        .count();
    assert!(changed > 240 * 60 / 10, "only {changed} pixels differ from the background");
}

#[test]
fn invalid_params_and_times_are_rejected() {
    let mut r = CpuRenderer::new(small_opts()).unwrap();
    let mut p = Preset::Greco.defaults();
    assert!(r.render(&p, f64::NAN).is_err());
    p.cam.fov = 500.0;
    assert!(r.render(&p, 0.0).is_err());
}

#[test]
fn background_is_opaque_and_varies() {
    let c = Canvas::new(64, 16).unwrap();
    let bg = background(c, &Preset::Greco.palette(), 0.0);
    assert_eq!(bg.len(), 64 * 16 * 4);
    assert!(bg.chunks_exact(4).all(|px| px[3] == 255));
    assert_ne!(bg[..4], bg[bg.len() - 4..]);
}

#[test]
fn plate_affine_maps_texture_corners_to_projected_corners() {
    let p = Preset::Greco.defaults();
    let state = frame_state(&p, 0.1);
    let proj = state.camera.projector(Canvas::BANNER);
    let corners = state.plate.corners(0.0);
    let a = plate_affine(&proj, corners).unwrap();
    let tr = proj.project(corners[1]).unwrap();
    let bl = proj.project(corners[2]).unwrap();
    let mapped_tr = a * Point::new(PLATE_TEX_W, 0.0);
    let mapped_bl = a * Point::new(0.0, PLATE_TEX_H);
    assert!((mapped_tr.x - tr.x).abs() < 1e-6 && (mapped_tr.y - tr.y).abs() < 1e-6);
    assert!((mapped_bl.x - bl.x).abs() < 1e-6 && (mapped_bl.y - bl.y).abs() < 1e-6);
}

#[test]
fn polygon_closes_and_polyline_does_not() {
    let pts = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0)];
    assert!(matches!(
        polygon(pts).elements().last(),
        Some(kurbo::PathEl::ClosePath)
    ));
    assert_eq!(polyline(pts).elements().len(), 3);
}
