use std::f64::consts::TAU;

use glam::{DQuat, DVec3, EulerRot};

use crate::params::SceneParams;
use crate::scene::camera::Camera;

/// Fixed point the camera orbits and looks toward.
pub const ANCHOR: DVec3 = DVec3::new(0.0, 0.35, 0.0);

/// Halo ring base position before the `halo.x`/`halo.y` offsets.
pub const HALO_BASE: DVec3 = DVec3::new(0.0, 0.55, -0.2);
pub const HALO_RADIUS: f64 = 1.1;
pub const HALO_TUBE: f64 = 0.05;

pub const PEDESTAL_SIZE: DVec3 = DVec3::new(7.8, 1.6, 2.4);
pub const PEDESTAL_CENTER: DVec3 = DVec3::new(0.0, -0.2, 0.0);

/// Nameplate aspect (width / height) and height per unit of `text.size`.
pub const PLATE_ASPECT: f64 = 4.0;
pub const PLATE_HEIGHT_PER_SIZE: f64 = 4.3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingPose {
    pub center: DVec3,
    pub rotation: DQuat,
    pub radius: f64,
}

impl RingPose {
    pub fn normal(&self) -> DVec3 {
        self.rotation * DVec3::Z
    }
}

/// Oriented rectangle carrying the nameplate text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatePose {
    pub center: DVec3,
    pub normal: DVec3,
    pub right: DVec3,
    pub up: DVec3,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl PlatePose {
    /// Top-left, top-right and bottom-left corners, offset along `-normal` by `back`.
    pub fn corners(&self, back: f64) -> [DVec3; 3] {
        let c = self.center - self.normal * back;
        let hw = self.right * (self.width * 0.5);
        let hh = self.up * (self.height * 0.5);
        [c - hw + hh, c + hw + hh, c - hw - hh]
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CorePose {
    pub center: DVec3,
    pub rotation: DQuat,
    pub size: f64,
}

/// Everything that moves, evaluated for one normalized time value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameState {
    pub t: f64,
    pub camera: Camera,
    pub halo: RingPose,
    pub plate: PlatePose,
    pub core: CorePose,
    pub pedestal_yaw: f64,
}

/// Evaluate the scene at `t ∈ [0, 1)`.
///
/// Every motion term is periodic in `t` with period 1, so `t = 0` and `t = 1` give the same
/// frame and the encoded loop has no seam.
pub fn frame_state(params: &SceneParams, t: f64) -> FrameState {
    let phase = t * TAU;
    let s = phase.sin();

    let halo = halo_pose(params, phase);
    let camera = camera_at(params, halo.normal(), phase);
    let plate = plate_pose(params, camera.eye);

    let core = CorePose {
        center: DVec3::new(params.core.x, params.core.y, params.core.z),
        rotation: DQuat::from_euler(EulerRot::YXZ, phase, 0.6 * s, 0.2 * s),
        size: params.core.size,
    };

    FrameState {
        t,
        camera,
        halo,
        plate,
        core,
        pedestal_yaw: 0.02 * s,
    }
}

fn halo_pose(params: &SceneParams, phase: f64) -> RingPose {
    let h = &params.halo;
    let tilt = DQuat::from_rotation_y(h.ry) * DQuat::from_rotation_x(h.rx);
    let wobble = DQuat::from_rotation_x(h.wobble * phase.sin());
    let spin = DQuat::from_rotation_z(TAU * h.spin * phase.sin());
    RingPose {
        center: HALO_BASE + DVec3::new(h.x, h.y, 0.0),
        rotation: tilt * wobble * spin,
        radius: HALO_RADIUS,
    }
}

/// Rotate the base orbital offset within the halo plane, then aim at [`ANCHOR`].
fn camera_at(params: &SceneParams, ring_normal: DVec3, phase: f64) -> Camera {
    let c = &params.cam;
    let base = orbit_base(ring_normal) * c.r;
    let theta = c.sweep * phase.sin();
    let offset = DQuat::from_axis_angle(ring_normal, theta) * base;
    let eye = ANCHOR + offset + DVec3::Y * (c.lift + c.bob * (2.0 * phase).sin());

    let mut camera = Camera {
        eye,
        target: ANCHOR,
        up: DVec3::Y,
        fov_y_deg: c.fov,
        near: 0.1,
        far: 100.0,
    };
    camera.up = DQuat::from_axis_angle(camera.forward(), c.roll * phase.sin()) * DVec3::Y;
    camera
}

/// World +Z projected onto the plane with normal `n`; +Z itself when that degenerates.
pub fn orbit_base(n: DVec3) -> DVec3 {
    let n = n.try_normalize().unwrap_or(DVec3::Z);
    (DVec3::Z - n * n.dot(DVec3::Z))
        .try_normalize()
        .unwrap_or(DVec3::Z)
}

fn plate_pose(params: &SceneParams, eye: DVec3) -> PlatePose {
    let tp = &params.text;
    let to_cam = (eye - ANCHOR).try_normalize().unwrap_or(DVec3::Z);
    let center = ANCHOR + to_cam * tp.pull + DVec3::Y * tp.lift;
    let normal = (to_cam * (1.0 - tp.face_bias) + DVec3::Z * tp.face_bias)
        .try_normalize()
        .unwrap_or(DVec3::Z);
    let right = DVec3::Y.cross(normal).try_normalize().unwrap_or(DVec3::X);
    let up = normal.cross(right);
    let height = tp.size * PLATE_HEIGHT_PER_SIZE;
    PlatePose {
        center,
        normal,
        right,
        up,
        width: height * PLATE_ASPECT,
        height,
        depth: tp.depth,
    }
}

/// Frames in a loop of `seconds` at `fps`, never zero.
pub fn frame_count(fps: u32, seconds: f64) -> u32 {
    let n = (f64::from(fps) * seconds).round();
    if n.is_finite() && n >= 1.0 {
        n.min(f64::from(u32::MAX)) as u32
    } else {
        1
    }
}

/// `t_i = i / frames` for `i ∈ [0, frames)`.
pub fn sample_times(frames: u32) -> impl Iterator<Item = f64> {
    let frames = frames.max(1);
    (0..frames).map(move |i| f64::from(i) / f64::from(frames))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/animate.rs"]
mod tests;
